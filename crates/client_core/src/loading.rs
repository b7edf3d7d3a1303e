use std::{future::Future, sync::Arc};

use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;

/// Boolean "work in progress" flag observed by any number of subscribers.
///
/// Writes are last-write-wins and there is no reference counting: callers that
/// share one indicator across overlapping operations pair `on`/`off`
/// themselves.
#[derive(Clone)]
pub struct LoadingIndicator {
    flag: Arc<watch::Sender<bool>>,
}

impl Default for LoadingIndicator {
    fn default() -> Self {
        Self::new()
    }
}

impl LoadingIndicator {
    pub fn new() -> Self {
        let (flag, _) = watch::channel(false);
        Self {
            flag: Arc::new(flag),
        }
    }

    pub fn on(&self) {
        self.set(true);
    }

    pub fn off(&self) {
        self.set(false);
    }

    pub fn is_loading(&self) -> bool {
        *self.flag.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.flag.subscribe()
    }

    /// Current value first, then every change.
    pub fn stream(&self) -> WatchStream<bool> {
        WatchStream::new(self.flag.subscribe())
    }

    /// Keeps the flag on while `work` runs. The flag goes off when `work`
    /// finishes or when the returned future is dropped early.
    pub async fn show_until_completed<F>(&self, work: F) -> F::Output
    where
        F: Future,
    {
        let _off = self.hold();
        work.await
    }

    /// Turns the flag on and returns a guard that turns it off on drop.
    pub fn hold(&self) -> LoadingGuard<'_> {
        self.on();
        LoadingGuard { indicator: self }
    }

    fn set(&self, value: bool) {
        self.flag.send_if_modified(|current| {
            if *current == value {
                return false;
            }
            *current = value;
            true
        });
    }
}

pub struct LoadingGuard<'a> {
    indicator: &'a LoadingIndicator,
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.indicator.off();
    }
}
