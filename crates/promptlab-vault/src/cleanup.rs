//! One-shot erase-on-exit registration.

use std::sync::atomic::{AtomicBool, Ordering};

/// Guard for the unload hook.
///
/// Registration flips the flag once; firing consumes it. Repeated
/// registration is a no-op, so the hook can never run twice for one arming.
#[derive(Debug, Default)]
pub struct AutoCleanup {
    armed: AtomicBool,
}

impl AutoCleanup {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm the hook. Returns `true` only if it was not already armed.
    pub fn register(&self) -> bool {
        !self.armed.swap(true, Ordering::SeqCst)
    }

    /// Disarm the hook without firing it.
    pub fn cancel(&self) -> bool {
        self.armed.swap(false, Ordering::SeqCst)
    }

    /// Consume the hook. Returns `true` if it was armed and should run now.
    pub fn take(&self) -> bool {
        self.armed.swap(false, Ordering::SeqCst)
    }

    pub fn is_registered(&self) -> bool {
        self.armed.load(Ordering::SeqCst)
    }
}
