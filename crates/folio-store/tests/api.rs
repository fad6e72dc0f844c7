use folio_store::{AppStore, HttpPortfolioApi, PortfolioApi, StoreError};
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn profile_body() -> serde_json::Value {
    json!({
        "success": true,
        "user": {
            "_id": "u1",
            "name": "Ada",
            "email": "ada@example.com",
            "role": "admin",
            "title": "Engineer",
            "description": "Builds things",
            "stack": [],
            "aboutMe": { "heading": "Hi", "description": "About" },
            "githubLink": "https://github.com/ada",
            "linkedInLink": "https://linkedin.com/in/ada",
            "copyright": 2025,
            "createdAt": "2025-01-01T00:00:00.000Z",
            "updatedAt": "2025-01-01T00:00:00.000Z"
        }
    })
}

fn projects_body(page: u32) -> serde_json::Value {
    json!({
        "success": true,
        "totalProjects": 1,
        "totalPages": 4,
        "currentPage": page,
        "projects": [{
            "_id": "p1",
            "userId": "u1",
            "title": "Folio",
            "description": "Portfolio",
            "category": "web",
            "keyFeatures": ["chat"],
            "stack": ["rust"],
            "thumbnail": { "public_id": "t", "url": "https://cdn.example.com/t.png" },
            "snapshots": [{ "public_id": "s", "url": "https://cdn.example.com/s.png" }],
            "githubLink": "https://github.com/ada/folio",
            "live": "https://folio.example.com",
            "createdAt": "2025-01-01T00:00:00Z",
            "updatedAt": "2025-01-02T00:00:00Z"
        }]
    })
}

#[tokio::test]
async fn test_fetch_profile() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/me"))
        .respond_with(ResponseTemplate::new(200).set_body_json(profile_body()))
        .expect(1)
        .mount(&server)
        .await;

    let api = HttpPortfolioApi::new(Some(format!("{}/", server.uri())));
    let profile = api.fetch_profile().await.unwrap();
    assert_eq!(profile.name, "Ada");
}

#[tokio::test]
async fn test_store_loads_requested_page() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/projects"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(projects_body(2)))
        .expect(1)
        .mount(&server)
        .await;

    let store = AppStore::new();
    let api = HttpPortfolioApi::new(Some(server.uri()));
    store.load_projects(&api, Some(2)).await.unwrap();

    let state = store.snapshot();
    assert_eq!(state.projects.current_page, 2);
    assert_eq!(state.projects.total_pages, 4);
    assert_eq!(state.projects.projects[0].title, "Folio");
}

#[tokio::test]
async fn test_server_message_becomes_state_error() {
    let server = MockServer::start().await;
    Mock::given(path("/api/v1/me"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "success": false,
            "message": "User not found"
        })))
        .mount(&server)
        .await;

    let store = AppStore::new();
    let api = HttpPortfolioApi::new(Some(server.uri()));
    let err = store.load_profile(&api).await.unwrap_err();

    assert!(matches!(err, StoreError::Api { status: 404, .. }));
    assert_eq!(
        store.select(|s| s.profile.error.clone()).as_deref(),
        Some("User not found")
    );
}

#[tokio::test]
async fn test_error_without_message_uses_fallback() {
    let server = MockServer::start().await;
    Mock::given(path("/api/v1/projects"))
        .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
        .mount(&server)
        .await;

    let store = AppStore::new();
    let api = HttpPortfolioApi::new(Some(server.uri()));
    assert!(store.load_projects(&api, None).await.is_err());
    assert_eq!(
        store.select(|s| s.projects.error.clone()).as_deref(),
        Some("Server error.")
    );
}

#[tokio::test]
async fn test_missing_server_is_config_error() {
    let api = HttpPortfolioApi::new(None);
    assert!(matches!(
        api.fetch_profile().await,
        Err(StoreError::MissingServer)
    ));
}
