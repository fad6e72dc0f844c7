//! reqwest-backed event-stream transport

use futures::StreamExt;
use reqwest::Client;
use reqwest::header::{ACCEPT, CACHE_CONTROL, CONTENT_TYPE};
use tokio::sync::mpsc;
use url::Url;

use super::{EventTransport, StreamRequest, TransportEvent, TransportHandle};
use crate::error::{ChatError, Result};
use crate::sse::SseDecoder;

const DISABLE_SYSTEM_PROXY_ENV: &str = "FOLIO_DISABLE_SYSTEM_PROXY";
const EVENT_STREAM: &str = "text/event-stream";

/// Build `<base>/chat/stream?user_message=..&thread_id=..`.
pub fn stream_url(base: &str, request: &StreamRequest) -> Result<Url> {
    let mut url = Url::parse(&format!("{}/chat/stream", base.trim_end_matches('/')))?;
    url.query_pairs_mut()
        .append_pair("user_message", &request.user_message)
        .append_pair("thread_id", request.thread_id.as_str());
    Ok(url)
}

/// Opens a `GET` event stream against the chat backend for every request.
#[derive(Debug, Clone)]
pub struct HttpEventTransport {
    client: Client,
    base_url: Option<String>,
}

impl HttpEventTransport {
    /// A missing base URL is accepted here; every `open` then fails fast.
    pub fn new(base_url: Option<String>) -> Result<Self> {
        Ok(Self::with_client(build_http_client()?, base_url))
    }

    pub fn with_client(client: Client, base_url: Option<String>) -> Self {
        Self { client, base_url }
    }

    pub fn base_url(&self) -> Option<&str> {
        self.base_url.as_deref()
    }
}

impl EventTransport for HttpEventTransport {
    fn open(&self, request: &StreamRequest) -> TransportHandle {
        let Some(base) = self.base_url.as_deref() else {
            tracing::warn!("Chat backend URL missing, failing connection");
            return TransportHandle::failed(ChatError::MissingBackend.to_string());
        };

        let url = match stream_url(base, request) {
            Ok(url) => url,
            Err(e) => return TransportHandle::failed(e.to_string()),
        };

        let runtime = match tokio::runtime::Handle::try_current() {
            Ok(handle) => handle,
            Err(e) => return TransportHandle::failed(format!("No async runtime: {}", e)),
        };

        tracing::debug!(thread_id = %request.thread_id, url = %url, "Opening chat event stream");

        let (tx, rx) = mpsc::unbounded_channel();
        let client = self.client.clone();
        let task = runtime.spawn(async move {
            if let Err(e) = pump(&client, url, &tx).await {
                tracing::warn!(error = %e, "Chat event stream failed");
                let _ = tx.send(TransportEvent::Error(e.to_string()));
            }
        });

        TransportHandle::new(rx, Some(task))
    }
}

/// Forward `message` events until the body ends. Ending is always an error
/// from the transport's point of view; a normal reply closes the handle on
/// `end` before this is observed.
async fn pump(
    client: &Client,
    url: Url,
    tx: &mpsc::UnboundedSender<TransportEvent>,
) -> Result<()> {
    let response = client
        .get(url)
        .header(ACCEPT, EVENT_STREAM)
        .header(CACHE_CONTROL, "no-cache")
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        return Err(ChatError::Status {
            status: status.as_u16(),
        });
    }

    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
        .to_string();
    if !content_type.to_ascii_lowercase().starts_with(EVENT_STREAM) {
        return Err(ChatError::ContentType(content_type));
    }

    let mut decoder = SseDecoder::new();
    let mut body = response.bytes_stream();

    while let Some(chunk) = body.next().await {
        let chunk = chunk?;
        for frame in decoder.push(&chunk) {
            if !frame.is_message() {
                tracing::debug!(event = ?frame.event, "Skipping non-message event");
                continue;
            }
            if tx.send(TransportEvent::Message(frame.data)).is_err() {
                // Receiver closed: the session moved on.
                return Ok(());
            }
        }
    }

    if decoder.has_partial() {
        tracing::debug!("Discarding incomplete event at end of stream");
    }
    Err(ChatError::StreamClosed)
}

fn build_http_client() -> Result<Client> {
    if std::env::var_os(DISABLE_SYSTEM_PROXY_ENV).is_some() || cfg!(test) {
        Ok(Client::builder().no_proxy().build()?)
    } else {
        Ok(Client::new())
    }
}
