use core::{future::poll_fn, task::Poll};

use atomic::{Atomic, Ordering};
use embassy_sync::waitqueue::AtomicWaker;

/// One-bit "bus operation complete" flag shared with the interrupt handler.
///
/// The handler only ever calls [`raise`]; the master is the only party that
/// observes and clears the flag. With a single setter and a single clearer
/// a plain load followed by a store is enough, the orderings keep the flag
/// access from moving across the interrupt boundary.
///
/// [`raise`]: Self::raise
pub struct InterruptSignal {
    raised: Atomic<bool>,
    waker: AtomicWaker,
}

impl InterruptSignal {
    pub const fn new() -> Self {
        Self {
            raised: Atomic::new(false),
            waker: AtomicWaker::new(),
        }
    }

    /// Marks the current bus operation as complete. Called from the ISR.
    pub fn raise(&self) {
        self.raised.store(true, Ordering::Release);
        self.waker.wake();
    }

    pub fn is_raised(&self) -> bool {
        self.raised.load(Ordering::Acquire)
    }

    /// Consumes the flag, returning whether it was raised.
    pub(crate) fn take(&self) -> bool {
        if self.raised.load(Ordering::Acquire) {
            self.raised.store(false, Ordering::Release);
            true
        } else {
            false
        }
    }

    /// Resolves once the flag is raised. Does not clear it.
    pub async fn wait(&self) {
        poll_fn(|cx| {
            if self.is_raised() {
                return Poll::Ready(());
            }

            self.waker.register(cx.waker());

            // The ISR may have fired between the check and the registration.
            if self.is_raised() {
                Poll::Ready(())
            } else {
                Poll::Pending
            }
        })
        .await
    }
}

impl Default for InterruptSignal {
    fn default() -> Self {
        Self::new()
    }
}
