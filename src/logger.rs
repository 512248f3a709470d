//! One-shot `env_logger` setup

use std::sync::Once;

use env_logger::Builder;
use log::LevelFilter;

/// Guards against installing the logger twice
static INIT: Once = Once::new();

/// Installs the global logger at `Info`, overridable through `RUST_LOG`
///
/// `verbose` lowers this crate's default to `Debug`. Later calls are no-ops.
pub fn initialize_logger(verbose: bool) {
    INIT.call_once_force(|_| {
        let crate_level = if verbose { LevelFilter::Debug } else { LevelFilter::Info };

        let mut builder = Builder::new();
        builder
            .filter_level(LevelFilter::Info)
            .filter_module("foldchain", crate_level)
            .format_timestamp_millis()
            .parse_default_env();

        // Another logger may already be installed by an embedding application
        if builder.try_init().is_err() {
            log::debug!("logger already initialized, keeping the existing one");
        }
    });
}
