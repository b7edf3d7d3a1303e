use std::sync::Arc;

use tokio::sync::watch;
use tokio_stream::{wrappers::WatchStream, Stream, StreamExt};
use tracing::warn;

/// Latest user-facing error message. No history is kept.
#[derive(Clone)]
pub struct MessagesNotifier {
    latest: Arc<watch::Sender<Option<String>>>,
}

impl Default for MessagesNotifier {
    fn default() -> Self {
        Self::new()
    }
}

impl MessagesNotifier {
    pub fn new() -> Self {
        let (latest, _) = watch::channel(None);
        Self {
            latest: Arc::new(latest),
        }
    }

    /// Publishes `message`. Every report notifies, repeated text included.
    pub fn report_error(&self, message: impl Into<String>) {
        let message = message.into();
        warn!("messages: {message}");
        self.latest.send_replace(Some(message));
    }

    /// Publishes the last of `messages`, if any.
    pub fn report_errors<I>(&self, messages: I)
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        if let Some(last) = messages.into_iter().last() {
            self.report_error(last);
        }
    }

    /// Clears the banner.
    pub fn dismiss(&self) {
        self.latest.send_if_modified(|current| current.take().is_some());
    }

    pub fn latest(&self) -> Option<String> {
        self.latest.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<String>> {
        self.latest.subscribe()
    }

    /// The latest message, if one is showing, then every new report.
    pub fn stream(&self) -> impl Stream<Item = String> + Send + Unpin + 'static {
        WatchStream::new(self.latest.subscribe()).filter_map(|message| message)
    }
}
