use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::Notify;

// One-shot termination signal. Firing never blocks and only the first call counts.
#[derive(Debug, Default)]
pub struct StopSignal {
    fired: AtomicBool,
    notify: Notify,
}

impl StopSignal {
    /// Fires the signal. Returns true only for the call that actually fired it.
    pub fn terminate(&self) -> bool {
        if self.fired.swap(true, Ordering::AcqRel) {
            return false;
        }
        // notify_one stores a permit, so a waiter that is not parked yet still wakes.
        self.notify.notify_one();
        true
    }

    pub fn is_terminated(&self) -> bool {
        self.fired.load(Ordering::Acquire)
    }

    /// Resolves once the signal has fired. Meant for a single waiter: the owning actor.
    pub async fn wait(&self) {
        if self.is_terminated() {
            return;
        }
        self.notify.notified().await;
    }
}
