//! Browser console output for `tracing` events
//!
//! Library diagnostics behind a failed operation are logged here and never
//! shown on the page. Errors go to `console.error`, warnings to
//! `console.warn`.

use std::sync::Once;
use tracing::Level;

/// Most verbose level forwarded to the console.
pub const CONSOLE_LEVEL: Level = Level::WARN;

static INIT: Once = Once::new();

/// Install the console subscriber; later calls are no-ops.
pub fn init() {
    INIT.call_once(|| {
        if tracing::dispatcher::has_been_set() {
            return;
        }
        install();
    });
}

#[cfg(target_arch = "wasm32")]
fn install() {
    let config = tracing_wasm::WASMLayerConfigBuilder::new()
        .set_max_level(CONSOLE_LEVEL)
        .set_report_logs_in_timings(false)
        .build();
    tracing_wasm::set_as_global_default_with_config(config);
}

#[cfg(not(target_arch = "wasm32"))]
fn install() {}

#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use wasm_bindgen_test::*;

    #[wasm_bindgen_test]
    fn test_init_installs_global_subscriber_once() {
        init();
        init();
        assert!(tracing::dispatcher::has_been_set());
        assert!(tracing::enabled!(Level::ERROR));
        assert!(tracing::enabled!(Level::WARN));
        assert!(!tracing::enabled!(Level::DEBUG));
    }
}
