//! Conversation state machine
//!
//! [`ChatSession`] is pure: it never touches the network. Every inbound
//! transport event goes through [`ChatSession::apply`], which mutates the
//! transcript and reports what changed. [`StreamingChatSession`] pairs it with
//! an [`EventTransport`] and owns the single active connection.

use serde::Serialize;

use crate::config::ChatConfig;
use crate::event::ServerEvent;
use crate::message::{Message, MessageId};
use crate::thread_id::ThreadId;
use crate::transport::{EventTransport, StreamRequest, TransportEvent, TransportHandle};

/// Where the current send cycle stands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CyclePhase {
    /// No request outstanding
    Idle,
    /// Connection opened, no fragment yet
    Sending,
    /// At least one fragment received
    Streaming,
}

/// Effect of one transport event on the session
#[derive(Debug, Clone, PartialEq)]
pub enum SessionUpdate {
    /// First fragment of the reply created a new assistant message
    AssistantStarted { id: MessageId, fragment: String },
    /// Fragment appended to the in-progress assistant message
    AssistantAppended { id: MessageId, fragment: String },
    /// Server signalled the end of the reply
    Finished,
    /// Transport failed; `id` is the apology message that was appended
    Failed { id: MessageId, reason: String },
    /// Event had no effect
    Ignored,
}

impl SessionUpdate {
    /// Whether the cycle is over and the connection should be closed.
    pub fn is_terminal(&self) -> bool {
        matches!(self, SessionUpdate::Finished | SessionUpdate::Failed { .. })
    }
}

#[derive(Debug, Clone)]
pub struct ChatSession {
    thread_id: Option<ThreadId>,
    transcript: Vec<Message>,
    pending_assistant: Option<MessageId>,
    composing: bool,
    phase: CyclePhase,
    next_id: u64,
    greeting: Option<String>,
    apology: String,
}

impl ChatSession {
    pub fn new(config: &ChatConfig) -> Self {
        Self {
            thread_id: None,
            transcript: Vec::new(),
            pending_assistant: None,
            composing: false,
            phase: CyclePhase::Idle,
            next_id: 1,
            greeting: config.greeting.clone(),
            apology: config.apology.clone(),
        }
    }

    /// Generate the thread identity and post the greeting, if any.
    ///
    /// Initialization happens once; later calls return the existing id.
    pub fn start(&mut self) -> &ThreadId {
        self.start_with_thread(ThreadId::generate())
    }

    /// Like [`start`](Self::start) with a caller-supplied identity.
    pub fn start_with_thread(&mut self, thread_id: ThreadId) -> &ThreadId {
        if self.thread_id.is_none() {
            tracing::debug!(thread_id = %thread_id, "Chat session started");
            if let Some(greeting) = self.greeting.clone() {
                let id = self.allocate_id();
                self.transcript.push(Message::assistant(id, greeting));
            }
        }
        self.thread_id.get_or_insert(thread_id)
    }

    /// Record the user's message and open a cycle.
    ///
    /// Returns the request to send, or `None` when the call is a no-op: blank
    /// text, session not started, or a reply still being composed. A cycle
    /// that is already streaming is superseded.
    pub fn begin_send(&mut self, text: &str) -> Option<StreamRequest> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return None;
        }
        let thread_id = self.thread_id.clone()?;
        if self.composing {
            tracing::debug!("Reply still being composed, ignoring send");
            return None;
        }
        if self.phase != CyclePhase::Idle {
            self.interrupt();
        }

        let id = self.allocate_id();
        self.transcript.push(Message::user(id, text));
        self.composing = true;
        self.pending_assistant = None;
        self.phase = CyclePhase::Sending;

        Some(StreamRequest {
            user_message: trimmed.to_string(),
            thread_id,
        })
    }

    /// Feed one transport event through the state machine.
    pub fn apply(&mut self, event: TransportEvent) -> SessionUpdate {
        if self.phase == CyclePhase::Idle {
            tracing::debug!(event = ?event, "Dropping event outside an active cycle");
            return SessionUpdate::Ignored;
        }

        match event {
            TransportEvent::Error(reason) => {
                tracing::warn!(reason = %reason, "Chat connection failed");
                let id = self.allocate_id();
                self.transcript
                    .push(Message::assistant(id, self.apology.clone()));
                self.finish_cycle();
                SessionUpdate::Failed { id, reason }
            }
            TransportEvent::Message(raw) => match ServerEvent::parse(&raw) {
                Ok(ServerEvent::End) => {
                    self.finish_cycle();
                    SessionUpdate::Finished
                }
                Ok(ServerEvent::Data(fragment)) if fragment.is_empty() => SessionUpdate::Ignored,
                Ok(ServerEvent::Data(fragment)) => self.append_fragment(fragment),
                Ok(ServerEvent::Other(kind)) => {
                    tracing::debug!(kind = %kind, "Ignoring unknown chat event");
                    SessionUpdate::Ignored
                }
                Err(e) => {
                    tracing::warn!(error = %e, payload = %raw, "Failed to parse chat event");
                    SessionUpdate::Ignored
                }
            },
        }
    }

    /// Force the session back to idle. Returns whether a cycle was active.
    pub fn interrupt(&mut self) -> bool {
        let was_active = self.phase != CyclePhase::Idle;
        if was_active {
            tracing::debug!(phase = ?self.phase, "Interrupting chat cycle");
        }
        self.finish_cycle();
        was_active
    }

    pub fn thread_id(&self) -> Option<&ThreadId> {
        self.thread_id.as_ref()
    }

    pub fn transcript(&self) -> &[Message] {
        &self.transcript
    }

    pub fn is_composing(&self) -> bool {
        self.composing
    }

    pub fn phase(&self) -> CyclePhase {
        self.phase
    }

    pub fn pending_assistant_id(&self) -> Option<MessageId> {
        self.pending_assistant
    }

    fn append_fragment(&mut self, fragment: String) -> SessionUpdate {
        match self.pending_assistant {
            None => {
                let id = self.allocate_id();
                self.transcript
                    .push(Message::assistant(id, fragment.clone()));
                self.pending_assistant = Some(id);
                // First fragment replaces the typing indicator.
                self.composing = false;
                self.phase = CyclePhase::Streaming;
                SessionUpdate::AssistantStarted { id, fragment }
            }
            Some(id) => match self.transcript.iter_mut().rev().find(|m| m.id == id) {
                Some(message) => {
                    message.text.push_str(&fragment);
                    SessionUpdate::AssistantAppended { id, fragment }
                }
                None => SessionUpdate::Ignored,
            },
        }
    }

    fn finish_cycle(&mut self) {
        self.composing = false;
        self.pending_assistant = None;
        self.phase = CyclePhase::Idle;
    }

    fn allocate_id(&mut self) -> MessageId {
        let id = MessageId::new(self.next_id);
        self.next_id += 1;
        id
    }
}

/// A [`ChatSession`] wired to a transport, holding at most one connection.
pub struct StreamingChatSession<T: EventTransport> {
    session: ChatSession,
    transport: T,
    active: Option<TransportHandle>,
}

impl<T: EventTransport> StreamingChatSession<T> {
    pub fn new(transport: T, config: &ChatConfig) -> Self {
        Self {
            session: ChatSession::new(config),
            transport,
            active: None,
        }
    }

    pub fn start(&mut self) -> ThreadId {
        self.session.start().clone()
    }

    /// Send one utterance. Returns false when the call was a no-op.
    ///
    /// The user message is in the transcript before this returns; the reply
    /// arrives through [`next_update`](Self::next_update).
    pub fn send_message(&mut self, text: &str) -> bool {
        let Some(request) = self.session.begin_send(text) else {
            return false;
        };
        self.close_transport();
        self.active = Some(self.transport.open(&request));
        true
    }

    /// Wait for the next event on the active connection and apply it.
    ///
    /// Returns `None` when no connection is open. A connection that ends
    /// without a terminal event is treated as a transport failure.
    pub async fn next_update(&mut self) -> Option<SessionUpdate> {
        let handle = self.active.as_mut()?;
        let update = match handle.recv().await {
            Some(event) => self.session.apply(event),
            None => {
                let update = self
                    .session
                    .apply(TransportEvent::Error("Connection closed".to_string()));
                self.close_transport();
                return Some(update);
            }
        };
        if update.is_terminal() {
            self.close_transport();
        }
        Some(update)
    }

    /// Pump events until the current cycle ends.
    pub async fn finish_cycle(&mut self) -> Vec<SessionUpdate> {
        let mut updates = Vec::new();
        while let Some(update) = self.next_update().await {
            updates.push(update);
        }
        updates
    }

    /// Drop the active connection and return to idle. Also the teardown path.
    pub fn close(&mut self) {
        self.close_transport();
        self.session.interrupt();
    }

    pub fn session(&self) -> &ChatSession {
        &self.session
    }

    pub fn transcript(&self) -> &[Message] {
        self.session.transcript()
    }

    pub fn is_composing(&self) -> bool {
        self.session.is_composing()
    }

    pub fn phase(&self) -> CyclePhase {
        self.session.phase()
    }

    pub fn thread_id(&self) -> Option<&ThreadId> {
        self.session.thread_id()
    }

    pub fn has_active_connection(&self) -> bool {
        self.active.is_some()
    }

    fn close_transport(&mut self) {
        if let Some(mut handle) = self.active.take() {
            handle.close();
        }
    }
}
