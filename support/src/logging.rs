//! One-shot `env_logger` bootstrap, analogous in spirit to
//! `kaspa-core`'s `core::log` module but without the custom macro layer:
//! call sites use `log::debug!`/`log::trace!` directly, this just wires the
//! facade to an output once per process.

use std::sync::Once;

static INIT: Once = Once::new();

/// Initializes `env_logger` the first time it is called; subsequent calls
/// are no-ops. Safe to call from every test module that wants log output
/// under `--nocapture`.
pub fn init_test_logging() {
    INIT.call_once(|| {
        let _ = env_logger::builder().is_test(true).try_init();
    });
}
