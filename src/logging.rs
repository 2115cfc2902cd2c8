//! Log and panic hook installation.
//!
//! The library only emits `tracing` events; who listens is up to the host.
//! In the browser we route them to the devtools console. Native binaries
//! install their own subscriber.

/// Install the browser console subscriber and panic hook. Safe to call more
/// than once.
#[cfg(target_arch = "wasm32")]
pub fn init() {
    use std::sync::Once;

    static INIT: Once = Once::new();

    console_error_panic_hook::set_once();
    INIT.call_once(|| {
        let _ = wasm_tracing::set_as_global_default();
    });
}

/// Native builds leave subscriber setup to the binary or test harness.
#[cfg(not(target_arch = "wasm32"))]
pub fn init() {}
