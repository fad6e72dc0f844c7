//! Folio Chat - streaming chat session client
//!
//! This crate provides:
//! - A pure conversation state machine fed by server events
//! - An incremental `text/event-stream` decoder
//! - A reqwest transport that opens one event stream per user message
//! - A scripted transport for tests and offline use

pub mod config;
pub mod error;
pub mod event;
pub mod message;
pub mod session;
pub mod sse;
pub mod thread_id;
pub mod transport;

// Re-export commonly used types
pub use config::{AGENT_BACKEND_ENV, ChatConfig, DEFAULT_APOLOGY, DEFAULT_GREETING};
pub use error::{ChatError, Result};
pub use event::ServerEvent;
pub use message::{Message, MessageId, Sender};
pub use session::{ChatSession, CyclePhase, SessionUpdate, StreamingChatSession};
pub use sse::{SseDecoder, SseFrame};
pub use thread_id::ThreadId;
pub use transport::{
    EventTransport, HttpEventTransport, ScriptedStream, ScriptedTransport, StreamRequest,
    TransportEvent, TransportHandle, stream_url,
};
