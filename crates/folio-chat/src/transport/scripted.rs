//! In-memory transport for tests and offline demos.

use std::collections::VecDeque;
use std::sync::Arc;

use parking_lot::Mutex;
use serde_json::json;
use tokio::sync::mpsc;

use super::{EventTransport, StreamRequest, TransportEvent, TransportHandle};

/// Sending side of one scripted connection
#[derive(Debug, Clone)]
pub struct ScriptedStream {
    tx: mpsc::UnboundedSender<TransportEvent>,
}

impl ScriptedStream {
    /// Returns false once the session has closed the connection.
    pub fn raw(&self, data: impl Into<String>) -> bool {
        self.tx.send(TransportEvent::Message(data.into())).is_ok()
    }

    pub fn data(&self, fragment: &str) -> bool {
        self.raw(json!({ "event": "data", "data": fragment }).to_string())
    }

    pub fn end(&self) -> bool {
        self.raw(json!({ "event": "end" }).to_string())
    }

    pub fn error(&self, reason: impl Into<String>) -> bool {
        self.tx.send(TransportEvent::Error(reason.into())).is_ok()
    }

    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

#[derive(Debug, Default)]
struct ScriptedState {
    requests: Vec<StreamRequest>,
    scripts: VecDeque<Vec<TransportEvent>>,
    streams: Vec<ScriptedStream>,
}

/// Records every request and hands out a live sender per connection.
#[derive(Debug, Clone, Default)]
pub struct ScriptedTransport {
    state: Arc<Mutex<ScriptedState>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue events delivered as soon as the next connection opens.
    pub fn enqueue(&self, events: Vec<TransportEvent>) {
        self.state.lock().scripts.push_back(events);
    }

    /// Queue a reply that streams `fragments` then ends.
    pub fn enqueue_reply(&self, fragments: &[&str]) {
        let mut events: Vec<TransportEvent> = fragments
            .iter()
            .map(|f| TransportEvent::Message(json!({ "event": "data", "data": f }).to_string()))
            .collect();
        events.push(TransportEvent::Message(json!({ "event": "end" }).to_string()));
        self.enqueue(events);
    }

    pub fn requests(&self) -> Vec<StreamRequest> {
        self.state.lock().requests.clone()
    }

    pub fn open_count(&self) -> usize {
        self.state.lock().requests.len()
    }

    /// Sender of the most recently opened connection.
    pub fn latest(&self) -> Option<ScriptedStream> {
        self.state.lock().streams.last().cloned()
    }

    /// Sender of the `index`-th connection, in open order.
    pub fn stream(&self, index: usize) -> Option<ScriptedStream> {
        self.state.lock().streams.get(index).cloned()
    }
}

impl EventTransport for ScriptedTransport {
    fn open(&self, request: &StreamRequest) -> TransportHandle {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut state = self.state.lock();
        state.requests.push(request.clone());
        if let Some(script) = state.scripts.pop_front() {
            for event in script {
                let _ = tx.send(event);
            }
        }
        state.streams.push(ScriptedStream { tx });
        TransportHandle::new(rx, None)
    }
}
