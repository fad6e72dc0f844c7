use std::time::Duration;

use assert_cmd::Command;
use predicates::str::{contains, starts_with};
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn folio(home: &TempDir) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("folio"));
    cmd.env("HOME", home.path())
        .env("XDG_DATA_HOME", home.path().join("data"))
        .env("FOLIO_CONFIG", home.path().join("missing.toml"))
        .env_remove("FOLIO_AGENT_BACKEND")
        .env_remove("FOLIO_MAIN_SERVER");
    cmd
}

#[test]
fn test_cli_help() {
    let home = TempDir::new().unwrap();
    folio(&home)
        .arg("--help")
        .assert()
        .success()
        .stdout(contains("Folio"));
}

#[test]
fn test_cli_version() {
    let home = TempDir::new().unwrap();
    folio(&home).arg("--version").assert().success();
}

#[test]
fn test_cli_completions() {
    let home = TempDir::new().unwrap();
    folio(&home)
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(starts_with("_folio"));
}

#[test]
fn test_chat_without_backend_prints_apology() {
    let home = TempDir::new().unwrap();
    folio(&home)
        .args(["chat", "--message", "Hi"])
        .assert()
        .success()
        .stdout(contains("Sorry, I couldn't connect to the server. Please try again."));
}

#[test]
fn test_chat_json_transcript() {
    let home = TempDir::new().unwrap();
    folio(&home)
        .args(["--format", "json", "chat", "--no-greeting", "--message", "Hi"])
        .assert()
        .success()
        .stdout(contains("\"thread_id\": \"thread_"))
        .stdout(contains("\"sender\": \"user\""))
        .stdout(contains("\"sender\": \"assistant\""));
}

#[test]
fn test_profile_without_server_fails() {
    let home = TempDir::new().unwrap();
    folio(&home)
        .arg("profile")
        .assert()
        .failure()
        .stderr(contains("Main server URL is not configured"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_chat_quit_while_reply_is_pending() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/chat/stream"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw("", "text/event-stream")
                .set_delay(Duration::from_secs(60)),
        )
        .mount(&server)
        .await;

    let home = TempDir::new().unwrap();
    folio(&home)
        .args(["--backend-url", &server.uri(), "chat", "--no-greeting"])
        .write_stdin("Hi\n/quit\n")
        .timeout(Duration::from_secs(20))
        .assert()
        .success()
        .stdout(contains("assistant is typing..."));
}
