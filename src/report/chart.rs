use std::path::{Path, PathBuf};

use plotters::prelude::*;

use super::ReportSink;
use crate::{
    error::{FoldChainError, Result},
    experiment::{RoundCount, TrialResult},
};

/// Renders collisions per round as a PNG line chart, one series per capacity
#[derive(Debug, Clone)]
pub struct ChartSink {
    /// Output image
    path: PathBuf,
    /// Chart caption
    title: String,
    /// Counts of every finished round
    rounds: Vec<Vec<RoundCount>>,
}

impl ChartSink {
    /// Image size in pixels
    const SIZE: (u32, u32) = (1200, 800);
    /// Font used for caption and axis descriptions
    const FONT: &'static str = "sans-serif";

    /// Creates a sink that draws to `path` once the run is over
    #[must_use]
    pub fn new(path: impl Into<PathBuf>, title: impl Into<String>) -> Self {
        Self { path: path.into(), title: title.into(), rounds: Vec::new() }
    }

    /// Where the chart is written
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Collisions of the series at `position` in every recorded round
    fn series(&self, position: usize) -> Vec<(usize, f64)> {
        self.rounds
            .iter()
            .enumerate()
            .filter_map(|(round, counts)| {
                counts.get(position).map(|c| (round.saturating_add(1), to_f64(c.collisions)))
            })
            .collect()
    }

    /// Draws the chart
    #[allow(clippy::arithmetic_side_effects)]
    fn render(&self, results: &[TrialResult]) -> Result<()> {
        let root = BitMapBackend::new(&self.path, Self::SIZE).into_drawing_area();
        root.fill(&WHITE).map_err(chart_error)?;

        let max_collisions = self
            .rounds
            .iter()
            .flatten()
            .map(|c| to_f64(c.collisions))
            .fold(1.0, f64::max)
            * 1.1;
        let last_round = self.rounds.len().max(1);

        let mut chart = ChartBuilder::on(&root)
            .caption(&self.title, (Self::FONT, 35))
            .margin(15)
            .x_label_area_size(60)
            .y_label_area_size(60)
            .build_cartesian_2d(1..last_round.saturating_add(1), 0.0..max_collisions)
            .map_err(chart_error)?;

        chart
            .configure_mesh()
            .x_labels(last_round)
            .x_desc("Round")
            .y_desc("Collisions")
            .axis_desc_style((Self::FONT, 16))
            .draw()
            .map_err(chart_error)?;

        for (position, result) in results.iter().enumerate() {
            let color = Palette99::pick(position).to_rgba();
            let line_style = ShapeStyle::from(&color).stroke_width(2);
            let points = self.series(position);

            chart
                .draw_series(LineSeries::new(points.iter().copied(), line_style))
                .map_err(chart_error)?
                .label(format!(
                    "Table size {} (average {:.2})",
                    result.capacity(),
                    result.average()
                ))
                .legend(move |(x, y)| {
                    PathElement::new(vec![(x, y), (x.saturating_add(20), y)], line_style)
                });

            chart
                .draw_series(points.iter().map(|&point| Circle::new(point, 4, color.filled())))
                .map_err(chart_error)?;
        }

        chart
            .configure_series_labels()
            .background_style(&WHITE.mix(0.8))
            .border_style(&BLACK)
            .position(SeriesLabelPosition::UpperLeft)
            .draw()
            .map_err(chart_error)?;

        root.present().map_err(chart_error)?;
        log::info!("collision chart written to {}", self.path.display());
        Ok(())
    }
}

impl ReportSink for ChartSink {
    fn round_finished(&mut self, _round: usize, counts: &[RoundCount]) -> Result<()> {
        self.rounds.push(counts.to_vec());
        Ok(())
    }

    fn summary(&mut self, results: &[TrialResult]) -> Result<()> {
        self.render(results)
    }
}

/// Collision counts stay far below 2^52, so the conversion is exact
#[allow(clippy::cast_precision_loss)]
fn to_f64(count: usize) -> f64 {
    count as f64
}

/// Wraps a plotters failure
fn chart_error(err: impl std::fmt::Display) -> FoldChainError {
    FoldChainError::Chart(err.to_string())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_series_follow_round_order() {
        let mut sink = ChartSink::new("unused.png", "collisions");
        sink.round_finished(1, &[
            RoundCount { capacity: 1009, collisions: 360 },
            RoundCount { capacity: 2003, collisions: 210 },
        ])
        .unwrap();
        sink.round_finished(2, &[
            RoundCount { capacity: 1009, collisions: 370 },
            RoundCount { capacity: 2003, collisions: 205 },
        ])
        .unwrap();

        assert_eq!(sink.series(0), vec![(1, 360.0), (2, 370.0)]);
        assert_eq!(sink.series(1), vec![(1, 210.0), (2, 205.0)]);
        assert!(sink.series(2).is_empty());
        assert_eq!(sink.path(), Path::new("unused.png"));
    }

    #[test]
    fn test_unwritable_path_is_an_error() {
        let mut sink = ChartSink::new("/nonexistent-dir/for/sure/chart.png", "collisions");
        sink.round_finished(1, &[RoundCount { capacity: 7, collisions: 1 }]).unwrap();
        let err = sink.summary(&[TrialResult::new(7, vec![1]).unwrap()]).unwrap_err();
        assert!(matches!(err, FoldChainError::Chart(_)));
    }
}
