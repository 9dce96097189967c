//! Interrupt handling
//!
//! The Ctrl+C handler only flips a flag and wakes waiters. The check runner
//! reads the flag between checks; the mock server awaits [`interrupted`].

use std::sync::atomic::{AtomicBool, Ordering};

use once_cell::sync::Lazy;
use tokio::sync::Notify;

static INTERRUPTED: AtomicBool = AtomicBool::new(false);
static INTERRUPT_NOTIFY: Lazy<Notify> = Lazy::new(Notify::new);

/// Check if Ctrl+C was pressed
#[inline]
pub fn was_interrupted() -> bool {
    INTERRUPTED.load(Ordering::SeqCst)
}

/// Set the interrupted flag (called from signal handler)
pub fn set_interrupted() {
    INTERRUPTED.store(true, Ordering::SeqCst);
    INTERRUPT_NOTIFY.notify_waiters();
}

/// Resolve once the interrupted flag is set
pub async fn interrupted() {
    loop {
        let notified = INTERRUPT_NOTIFY.notified();
        tokio::pin!(notified);
        // Register before checking the flag so a concurrent set is not missed
        notified.as_mut().enable();

        if was_interrupted() {
            return;
        }
        notified.await;
    }
}
