//! Logging setup on top of `env_logger`

pub use log::{debug, info, warn, error, trace};

/// Initialize the logging system
///
/// Defaults to `info`; `RUST_LOG` overrides it (e.g. `RUST_LOG=collision_engine=trace`).
pub fn init() {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();
}

/// Initialize the logging system, ignoring repeated initialization
///
/// Useful from tests, where several entry points may race to install the
/// logger. Returns whether this call installed it.
pub fn try_init() -> bool {
    env_logger::builder().is_test(true).try_init().is_ok()
}
