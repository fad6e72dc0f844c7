//! Server-event transport seam
//!
//! A transport turns one [`StreamRequest`] into an ordered channel of
//! [`TransportEvent`]s. The session consumes the channel; the transport owns
//! whatever produces it.

mod http;
mod scripted;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::thread_id::ThreadId;

pub use http::{HttpEventTransport, stream_url};
pub use scripted::{ScriptedTransport, ScriptedStream};

/// Parameters of one request/response exchange
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamRequest {
    pub user_message: String,
    pub thread_id: ThreadId,
}

/// What a connection delivers to the session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportEvent {
    /// Data of one `message` event, still JSON-encoded
    Message(String),
    /// Connection could not be established or was dropped
    Error(String),
}

/// Exclusive handle to one open connection.
///
/// Closing aborts the producer and drops the receiver, so anything queued but
/// not yet received is discarded.
#[derive(Debug)]
pub struct TransportHandle {
    rx: Option<mpsc::UnboundedReceiver<TransportEvent>>,
    task: Option<JoinHandle<()>>,
}

impl TransportHandle {
    pub fn new(rx: mpsc::UnboundedReceiver<TransportEvent>, task: Option<JoinHandle<()>>) -> Self {
        Self { rx: Some(rx), task }
    }

    /// Handle that reports a single error and then ends.
    pub fn failed(reason: impl Into<String>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let _ = tx.send(TransportEvent::Error(reason.into()));
        Self::new(rx, None)
    }

    /// Next event in arrival order. `None` once closed or the producer is gone.
    pub async fn recv(&mut self) -> Option<TransportEvent> {
        match self.rx.as_mut() {
            Some(rx) => rx.recv().await,
            None => None,
        }
    }

    pub fn close(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
        self.rx = None;
    }

    pub fn is_closed(&self) -> bool {
        self.rx.is_none()
    }
}

impl Drop for TransportHandle {
    fn drop(&mut self) {
        self.close();
    }
}

/// Opens one event-stream connection per request
pub trait EventTransport: Send + Sync {
    fn open(&self, request: &StreamRequest) -> TransportHandle;
}

impl<T: EventTransport + ?Sized> EventTransport for std::sync::Arc<T> {
    fn open(&self, request: &StreamRequest) -> TransportHandle {
        (**self).open(request)
    }
}
