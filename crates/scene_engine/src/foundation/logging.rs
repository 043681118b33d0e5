//! Logging bootstrap over the `log` facade

pub use log::{debug, error, info, trace, warn};

/// Initialize the logging system for binaries.
///
/// Respects `RUST_LOG`; call once at startup.
pub fn init() {
    env_logger::init();
}

/// Initialize logging inside tests.
///
/// Safe to call from every test; repeated initialization is ignored.
pub fn init_for_tests() {
    let _ = env_logger::builder().is_test(true).try_init();
}
