use folio_chat::{
    ChatConfig, CyclePhase, DEFAULT_APOLOGY, HttpEventTransport, Sender, SessionUpdate,
    StreamingChatSession,
};
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn sse_body(payloads: &[&str]) -> String {
    payloads.iter().map(|p| format!("data: {}\n\n", p)).collect()
}

fn event_stream(body: impl Into<String>) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(body.into(), "text/event-stream")
}

fn chat_for(base_url: Option<String>) -> StreamingChatSession<HttpEventTransport> {
    let transport = HttpEventTransport::new(base_url).unwrap();
    StreamingChatSession::new(transport, &ChatConfig::default())
}

fn texts(chat: &StreamingChatSession<HttpEventTransport>) -> Vec<(Sender, String)> {
    chat.transcript()
        .iter()
        .map(|m| (m.sender, m.text.clone()))
        .collect()
}

#[tokio::test]
async fn test_streams_reply_from_backend() {
    let server = MockServer::start().await;
    let mut chat = chat_for(Some(server.uri()));
    let thread_id = chat.start();

    Mock::given(method("GET"))
        .and(path("/chat/stream"))
        .and(query_param("user_message", "Hi there"))
        .and(query_param("thread_id", thread_id.as_str()))
        .and(header("accept", "text/event-stream"))
        .respond_with(event_stream(sse_body(&[
            r#"{"event":"data","data":"Hello"}"#,
            r#"{"event":"data","data":" there"}"#,
            r#"{"event":"end"}"#,
        ])))
        .expect(1)
        .mount(&server)
        .await;

    assert!(chat.send_message("  Hi there "));
    assert!(chat.is_composing());
    let updates = chat.finish_cycle().await;

    assert_eq!(updates.last(), Some(&SessionUpdate::Finished));
    assert_eq!(
        texts(&chat),
        vec![
            (Sender::User, "  Hi there ".to_string()),
            (Sender::Assistant, "Hello there".to_string()),
        ]
    );
    assert!(!chat.is_composing());
    assert_eq!(chat.phase(), CyclePhase::Idle);
}

#[tokio::test]
async fn test_skips_comments_and_named_events() {
    let server = MockServer::start().await;
    let body = format!(
        ": keep-alive\n\nevent: ping\ndata: {{}}\n\n{}",
        sse_body(&[
            r#"{"event":"data","data":"ok"}"#,
            "not json",
            r#"{"event":"end"}"#,
        ])
    );
    Mock::given(path("/chat/stream"))
        .respond_with(event_stream(body))
        .mount(&server)
        .await;

    let mut chat = chat_for(Some(server.uri()));
    chat.start();
    chat.send_message("Hi");
    chat.finish_cycle().await;

    assert_eq!(chat.transcript().len(), 2);
    assert_eq!(chat.transcript()[1].text, "ok");
}

#[tokio::test]
async fn test_http_error_status_appends_apology() {
    let server = MockServer::start().await;
    Mock::given(path("/chat/stream"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let mut chat = chat_for(Some(server.uri()));
    chat.start();
    chat.send_message("Hi");
    let updates = chat.finish_cycle().await;

    assert!(matches!(updates.as_slice(), [SessionUpdate::Failed { .. }]));
    assert_eq!(
        texts(&chat),
        vec![
            (Sender::User, "Hi".to_string()),
            (Sender::Assistant, DEFAULT_APOLOGY.to_string()),
        ]
    );
    assert!(!chat.is_composing());
}

#[tokio::test]
async fn test_wrong_content_type_fails() {
    let server = MockServer::start().await;
    Mock::given(path("/chat/stream"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw(r#"{"event":"end"}"#, "application/json"),
        )
        .mount(&server)
        .await;

    let mut chat = chat_for(Some(server.uri()));
    chat.start();
    chat.send_message("Hi");
    let updates = chat.finish_cycle().await;

    match updates.as_slice() {
        [SessionUpdate::Failed { reason, .. }] => assert!(reason.contains("content type")),
        other => panic!("unexpected updates: {:?}", other),
    }
}

#[tokio::test]
async fn test_stream_without_end_is_a_failure() {
    let server = MockServer::start().await;
    Mock::given(path("/chat/stream"))
        .respond_with(event_stream(sse_body(&[r#"{"event":"data","data":"Hel"}"#])))
        .mount(&server)
        .await;

    let mut chat = chat_for(Some(server.uri()));
    chat.start();
    chat.send_message("Hi");
    chat.finish_cycle().await;

    let texts: Vec<&str> = chat.transcript().iter().map(|m| m.text.as_str()).collect();
    assert_eq!(texts, vec!["Hi", "Hel", DEFAULT_APOLOGY]);
}

#[tokio::test]
async fn test_missing_backend_fails_without_request() {
    let server = MockServer::start().await;
    let mut chat = chat_for(None);
    chat.start();
    assert!(chat.send_message("Hi"));
    chat.finish_cycle().await;

    assert_eq!(chat.transcript().len(), 2);
    assert_eq!(chat.transcript()[1].text, DEFAULT_APOLOGY);
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_connection_refused_appends_apology() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let uri = format!("http://{}", listener.local_addr().unwrap());
    drop(listener);

    let mut chat = chat_for(Some(uri));
    chat.start();
    chat.send_message("Hi");
    let updates = chat.finish_cycle().await;

    assert!(matches!(updates.as_slice(), [SessionUpdate::Failed { .. }]));
    assert_eq!(chat.transcript().len(), 2);
}

#[tokio::test]
async fn test_second_exchange_reuses_thread() {
    let server = MockServer::start().await;
    let mut chat = chat_for(Some(server.uri()));
    let thread_id = chat.start();

    Mock::given(path("/chat/stream"))
        .and(query_param("thread_id", thread_id.as_str()))
        .respond_with(event_stream(sse_body(&[
            r#"{"event":"data","data":"ack"}"#,
            r#"{"event":"end"}"#,
        ])))
        .expect(2)
        .mount(&server)
        .await;

    for text in ["one", "two"] {
        assert!(chat.send_message(text));
        chat.finish_cycle().await;
    }

    let texts: Vec<&str> = chat.transcript().iter().map(|m| m.text.as_str()).collect();
    assert_eq!(texts, vec!["one", "ack", "two", "ack"]);
}
