//! Cooperative scheduling for long scans.
//!
//! A scan gives control back to the host between chunks of work. In the
//! browser that means a `setTimeout(0)` hop through the event loop so input
//! and paint get a turn; natively it is a single `Pending` poll.
//!
//! Each scan also holds a [`SearchTicket`]. Starting another scan (or
//! cancelling) bumps the shared generation, and the old ticket reports itself
//! stale at its next yield point.

use std::cell::Cell;
use std::rc::Rc;

/// Monotonic counter identifying the newest search request.
#[derive(Debug, Clone, Default)]
pub struct SearchGeneration(Rc<Cell<u64>>);

impl SearchGeneration {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new request, superseding every outstanding ticket.
    pub fn begin(&self) -> SearchTicket {
        let id = self.0.get().wrapping_add(1);
        self.0.set(id);
        SearchTicket {
            id,
            current: Rc::clone(&self.0),
        }
    }

    /// Supersede outstanding tickets without starting a new request.
    pub fn supersede(&self) {
        self.0.set(self.0.get().wrapping_add(1));
    }

    pub fn current(&self) -> u64 {
        self.0.get()
    }
}

/// Handle held by one in-flight scan.
#[derive(Debug, Clone)]
pub struct SearchTicket {
    id: u64,
    current: Rc<Cell<u64>>,
}

impl SearchTicket {
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Whether no newer request has been made since this ticket was issued.
    pub fn is_current(&self) -> bool {
        self.current.get() == self.id
    }
}

/// Give control back to the host event loop once.
#[cfg(target_arch = "wasm32")]
pub async fn yield_to_host() {
    use wasm_bindgen::JsValue;

    let promise = js_sys::Promise::new(&mut |resolve: js_sys::Function, _reject| {
        let scheduled = web_sys::window().is_some_and(|window| {
            window
                .set_timeout_with_callback_and_timeout_and_arguments_0(&resolve, 0)
                .is_ok()
        });
        if !scheduled {
            let _ = resolve.call0(&JsValue::UNDEFINED);
        }
    });
    let _ = wasm_bindgen_futures::JsFuture::from(promise).await;
}

/// Give control back to the executor once.
#[cfg(not(target_arch = "wasm32"))]
pub async fn yield_to_host() {
    YieldNow { yielded: false }.await;
}

#[cfg(not(target_arch = "wasm32"))]
struct YieldNow {
    yielded: bool,
}

#[cfg(not(target_arch = "wasm32"))]
impl std::future::Future for YieldNow {
    type Output = ();

    fn poll(
        mut self: std::pin::Pin<&mut Self>,
        cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<()> {
        if self.yielded {
            return std::task::Poll::Ready(());
        }
        self.yielded = true;
        cx.waker().wake_by_ref();
        std::task::Poll::Pending
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp
)]
mod tests {
    use super::*;

    #[test]
    fn test_newer_ticket_supersedes_older() {
        let generation = SearchGeneration::new();
        let first = generation.begin();
        assert!(first.is_current());
        let second = generation.begin();
        assert!(!first.is_current());
        assert!(second.is_current());
        generation.supersede();
        assert!(!second.is_current());
    }

    #[test]
    fn test_yield_completes() {
        futures::executor::block_on(async {
            yield_to_host().await;
            yield_to_host().await;
        });
    }
}
