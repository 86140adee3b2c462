//! Hand-off from the receive interrupt to the polling loop.
//!
//! The interrupt side only ever stores `true` into one atomic flag. Everything
//! else happens when the loop takes the flag.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Consumer side of the receive-ready flag, owned by the receive pipeline.
#[derive(Debug, Default)]
pub(crate) struct RxFlag {
    raised: Arc<AtomicBool>,
}

impl RxFlag {
    /// Create a lowered flag.
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Handle to give to the interrupt handler.
    pub(crate) fn handle(&self) -> InterruptHandle {
        InterruptHandle {
            raised: Arc::clone(&self.raised),
        }
    }

    /// Lower the flag, returning whether it was raised.
    pub(crate) fn take(&self) -> bool {
        self.raised.swap(false, Ordering::AcqRel)
    }

    /// Whether a frame is waiting, without clearing the flag.
    pub(crate) fn is_raised(&self) -> bool {
        self.raised.load(Ordering::Acquire)
    }
}

/// Producer side of the receive-ready flag.
///
/// [`InterruptHandle::signal`] is lock-free and allocation-free, so it is safe
/// to call from interrupt context or another thread.
#[derive(Debug, Clone)]
pub struct InterruptHandle {
    raised: Arc<AtomicBool>,
}

impl InterruptHandle {
    /// Mark a received frame as available.
    #[inline]
    pub fn signal(&self) {
        self.raised.store(true, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn take_clears_the_flag() {
        let flag = RxFlag::new();
        assert!(!flag.take());
        flag.handle().signal();
        assert!(flag.is_raised());
        assert!(flag.take());
        assert!(!flag.take());
    }

    #[test]
    fn repeated_signals_collapse() {
        let flag = RxFlag::new();
        let handle = flag.handle();
        handle.signal();
        handle.signal();
        assert!(flag.take());
        assert!(!flag.is_raised());
    }

    #[test]
    fn signal_from_another_thread() {
        let flag = RxFlag::new();
        let handle = flag.handle();
        std::thread::spawn(move || handle.signal()).join().unwrap();
        assert!(flag.take());
    }
}
