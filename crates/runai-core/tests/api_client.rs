//! Request helper and session exchange behavior against a mock backend.

use std::sync::Arc;

use runai_core::api::{ApiClient, ApiError, Method, NO_BODY, UNKNOWN_SERVER_ERROR};
use runai_core::auth::{KeyValueStore, MemoryStore, SessionState, SessionStore, EMAIL_KEY, TOKEN_KEY};
use runai_core::forms::ProfileForm;
use runai_core::models::UserProfile;
use serde_json::json;
use wiremock::matchers::{any, body_json, body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Helper: client pointing at the mock server with an empty session.
fn logged_out_client(server: &MockServer) -> (Arc<MemoryStore>, ApiClient) {
    let backend = Arc::new(MemoryStore::new());
    let session = SessionStore::initialize(backend.clone());
    let client = ApiClient::new(&server.uri(), session).expect("client builds");
    (backend, client)
}

/// Helper: client whose session already holds `tok` for `a@b.com`.
fn logged_in_client(server: &MockServer) -> ApiClient {
    let backend = Arc::new(MemoryStore::with_entries([
        (TOKEN_KEY, "tok"),
        (EMAIL_KEY, "a@b.com"),
    ]));
    let session = SessionStore::initialize(backend);
    ApiClient::new(&server.uri(), session).expect("client builds")
}

async fn request_count(server: &MockServer) -> usize {
    server
        .received_requests()
        .await
        .map(|requests| requests.len())
        .unwrap_or(0)
}

// ============================================================================
// Authenticated request helper
// ============================================================================

#[tokio::test]
async fn call_without_session_is_unauthenticated_and_sends_nothing() {
    let server = MockServer::start().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"documents": []})))
        .mount(&server)
        .await;
    let (_, client) = logged_out_client(&server);

    let result = client.call(Method::GET, "/documents", NO_BODY).await;
    assert!(matches!(result, Err(ApiError::Unauthenticated)), "got {result:?}");

    let result = client.ask("How should I taper?").await;
    assert!(matches!(result, Err(ApiError::Unauthenticated)), "got {result:?}");

    assert_eq!(request_count(&server).await, 0);
}

#[tokio::test]
async fn call_attaches_bearer_token_and_json_content_type() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/documents"))
        .and(header("authorization", "Bearer tok"))
        .and(header("content-type", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "documents": [
                {"name": "marathon_plan.pdf", "size": "1.2 Mo"},
                {"name": "recovery.pdf", "size": "300 Ko"}
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;
    let client = logged_in_client(&server);

    let documents = client.list_documents().await.expect("documents load");
    assert_eq!(documents.len(), 2);
    assert_eq!(documents[0].name, "marathon_plan.pdf");
    assert_eq!(documents[0].size, "1.2 Mo");
}

#[tokio::test]
async fn success_with_non_json_body_is_malformed() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/documents"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>not json</html>"))
        .mount(&server)
        .await;
    let client = logged_in_client(&server);

    let raw = client.call(Method::GET, "/documents", NO_BODY).await;
    assert!(matches!(raw, Err(ApiError::MalformedResponse(_))), "got {raw:?}");

    let typed = client.list_documents().await;
    assert!(matches!(typed, Err(ApiError::MalformedResponse(_))), "got {typed:?}");
}

#[tokio::test]
async fn success_with_wrong_shape_is_malformed() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/program/generate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"program_text": "..."})))
        .mount(&server)
        .await;
    let client = logged_in_client(&server);

    let result = client.generate_program().await;
    assert!(matches!(result, Err(ApiError::MalformedResponse(_))), "got {result:?}");
}

#[tokio::test]
async fn failure_carries_status_and_detail() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/update_rag"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({
            "detail": "Index update failed: FileNotFoundError"
        })))
        .mount(&server)
        .await;
    let client = logged_in_client(&server);

    match client.update_rag().await {
        Err(ApiError::RequestFailed { status, message }) => {
            assert_eq!(status, 500);
            assert_eq!(message, "Index update failed: FileNotFoundError");
        }
        other => panic!("expected RequestFailed, got {other:?}"),
    }
}

#[tokio::test]
async fn failure_without_json_body_uses_unknown_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/query"))
        .respond_with(ResponseTemplate::new(502).set_body_string("Bad Gateway"))
        .mount(&server)
        .await;
    let client = logged_in_client(&server);

    match client.ask("Hello").await {
        Err(ApiError::RequestFailed { status, message }) => {
            assert_eq!(status, 502);
            assert_eq!(message, UNKNOWN_SERVER_ERROR);
        }
        other => panic!("expected RequestFailed, got {other:?}"),
    }
}

#[tokio::test]
async fn failure_with_json_but_no_detail_reports_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/user/parameters"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"error": "missing"})))
        .mount(&server)
        .await;
    let client = logged_in_client(&server);

    let err = client.fetch_profile().await.unwrap_err();
    assert_eq!(err.status(), Some(404));
    assert_eq!(err.user_message(), "Server error (404)");
}

#[tokio::test]
async fn unauthorized_call_keeps_session() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/documents"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "detail": "Could not validate credentials"
        })))
        .expect(1)
        .mount(&server)
        .await;
    let client = logged_in_client(&server);

    let err = client.list_documents().await.unwrap_err();
    assert_eq!(err.user_message(), "Could not validate credentials");
    // No automatic logout and no retry
    assert!(client.session().is_active());
}

#[tokio::test]
async fn unreachable_backend_is_network_failure() {
    let backend = Arc::new(MemoryStore::with_entries([(TOKEN_KEY, "tok"), (EMAIL_KEY, "a@b.com")]));
    let session = SessionStore::initialize(backend);
    let client = ApiClient::new("http://127.0.0.1:1", session).unwrap();

    let result = client.list_documents().await;
    assert!(matches!(result, Err(ApiError::NetworkFailure(_))), "got {result:?}");
}

// ============================================================================
// Feature endpoints
// ============================================================================

#[tokio::test]
async fn ask_posts_query_and_returns_answer() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/query"))
        .and(body_json(json!({"query": "How do I pace a 10k?"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "query": "How do I pace a 10k?",
            "answer": "Start conservatively.",
            "model": "gemini-2.5-flash"
        })))
        .expect(1)
        .mount(&server)
        .await;
    let client = logged_in_client(&server);

    let answer = client.ask("How do I pace a 10k?").await.unwrap();
    assert_eq!(answer, "Start conservatively.");
}

#[tokio::test]
async fn save_profile_sends_nulls_for_empty_fields() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/user/parameters"))
        .and(header("authorization", "Bearer tok"))
        .and(body_json(json!({
            "age": 30,
            "weight_kg": 72.5,
            "height_cm": 180,
            "sport_goal": null,
            "activity_level": "Débutant",
            "gender": "Non spécifié",
            "time_per_week_hours": 5.5,
            "sleep_hours": null
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "ok"})))
        .expect(1)
        .mount(&server)
        .await;
    let client = logged_in_client(&server);

    let form = ProfileForm {
        age: "30".to_string(),
        weight_kg: "72.5".to_string(),
        height_cm: "180".to_string(),
        time_per_week_hours: "5.5".to_string(),
        ..ProfileForm::default()
    };
    let profile = form.to_profile().unwrap();
    client.save_profile(&profile).await.unwrap();
}

#[tokio::test]
async fn save_profile_accepts_success_without_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/user/parameters"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;
    let client = logged_in_client(&server);

    let result = client.save_profile(&UserProfile::default()).await;
    assert!(result.is_ok(), "got {result:?}");
}

#[tokio::test]
async fn save_profile_ignores_non_json_success_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/user/parameters"))
        .respond_with(ResponseTemplate::new(200).set_body_string("saved"))
        .mount(&server)
        .await;
    let client = logged_in_client(&server);

    client.save_profile(&UserProfile::default()).await.unwrap();
}

#[tokio::test]
async fn save_profile_failure_still_reports_detail() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/user/parameters"))
        .respond_with(
            ResponseTemplate::new(422).set_body_json(json!({"detail": [{"msg": "age too high"}]})),
        )
        .mount(&server)
        .await;
    let client = logged_in_client(&server);

    let err = client.save_profile(&UserProfile::default()).await.unwrap_err();
    assert_eq!(err.status(), Some(422));
    assert_eq!(err.user_message(), "age too high");
}

#[tokio::test]
async fn save_profile_without_session_sends_nothing() {
    let server = MockServer::start().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;
    let (_, client) = logged_out_client(&server);

    let result = client.save_profile(&UserProfile::default()).await;
    assert!(matches!(result, Err(ApiError::Unauthenticated)), "got {result:?}");
    assert_eq!(request_count(&server).await, 0);
}

#[tokio::test]
async fn incomplete_profile_form_never_reaches_backend() {
    let server = MockServer::start().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;
    let client = logged_in_client(&server);

    let form = ProfileForm {
        age: "30".to_string(),
        ..ProfileForm::default()
    };
    assert!(!form.is_submittable());
    if let Ok(profile) = form.to_profile() {
        client.save_profile(&profile).await.unwrap();
    }

    assert_eq!(request_count(&server).await, 0);
}

#[tokio::test]
async fn fetch_profile_accepts_nulls() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/user/parameters"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "age": null, "weight_kg": 70.0, "height_cm": null,
            "sport_goal": "Trail 50k", "activity_level": null
        })))
        .mount(&server)
        .await;
    let client = logged_in_client(&server);

    let profile = client.fetch_profile().await.unwrap();
    assert_eq!(profile.age, None);
    assert_eq!(profile.weight_kg, Some(70.0));
    assert_eq!(profile.sport_goal.as_deref(), Some("Trail 50k"));
    assert_eq!(profile.gender, None);
}

#[tokio::test]
async fn generate_program_returns_markdown() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/program/generate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "program": "# Week 1\n\n| Day | Session |\n|---|---|\n| Mon | Rest |"
        })))
        .mount(&server)
        .await;
    let client = logged_in_client(&server);

    let program = client.generate_program().await.unwrap();
    assert!(program.starts_with("# Week 1"));
}

// ============================================================================
// Login and registration exchanges
// ============================================================================

#[tokio::test]
async fn login_success_starts_session_with_submitted_identity() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/token"))
        .and(header("content-type", "application/x-www-form-urlencoded"))
        .and(body_string_contains("username=a%40b.com"))
        .and(body_string_contains("password=hunter2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "abc123",
            "token_type": "bearer"
        })))
        .expect(1)
        .mount(&server)
        .await;
    let (backend, client) = logged_out_client(&server);

    client.login("a@b.com", "hunter2").await.unwrap();

    let session = client.session();
    assert_eq!(session.state(), SessionState::LoggedIn);
    assert_eq!(session.token().as_deref(), Some("abc123"));
    assert_eq!(session.identity().as_deref(), Some("a@b.com"));
    assert_eq!(backend.get(TOKEN_KEY).unwrap().as_deref(), Some("abc123"));
    assert_eq!(backend.get(EMAIL_KEY).unwrap().as_deref(), Some("a@b.com"));
}

#[tokio::test]
async fn login_rejection_surfaces_detail_and_stays_logged_out() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/token"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "detail": "Invalid credentials"
        })))
        .mount(&server)
        .await;
    let (backend, client) = logged_out_client(&server);

    let err = client.login("a@b.com", "wrong").await.unwrap_err();
    assert_eq!(err.user_message(), "Invalid credentials");
    assert_eq!(err.status(), Some(401));
    assert_eq!(client.session().state(), SessionState::LoggedOut);
    assert_eq!(backend.get(TOKEN_KEY).unwrap(), None);
    assert_eq!(backend.get(EMAIL_KEY).unwrap(), None);
}

#[tokio::test]
async fn login_rejection_without_detail_uses_fallback() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/token"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({})))
        .mount(&server)
        .await;
    let (_, client) = logged_out_client(&server);

    let err = client.login("a@b.com", "pw").await.unwrap_err();
    assert_eq!(err.user_message(), "Login failed. Check your email and password.");
}

#[tokio::test]
async fn login_rejection_with_html_body_uses_fallback() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/token"))
        .respond_with(ResponseTemplate::new(502).set_body_string("<html>Bad Gateway</html>"))
        .mount(&server)
        .await;
    let (_, client) = logged_out_client(&server);

    let err = client.login("a@b.com", "pw").await.unwrap_err();
    assert_eq!(err.status(), Some(502));
    assert_eq!(err.user_message(), "Login failed. Check your email and password.");
    assert!(!client.session().is_active());
}

#[tokio::test]
async fn register_rejection_with_html_body_uses_fallback() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/register"))
        .respond_with(ResponseTemplate::new(500).set_body_string("Internal Server Error"))
        .mount(&server)
        .await;
    let (_, client) = logged_out_client(&server);

    let err = client.register("a@b.com", "pw").await.unwrap_err();
    assert_eq!(err.user_message(), "Registration failed. Please check your details.");
}

#[tokio::test]
async fn login_success_without_token_is_malformed() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"token_type": "bearer"})))
        .mount(&server)
        .await;
    let (_, client) = logged_out_client(&server);

    let result = client.login("a@b.com", "pw").await;
    assert!(matches!(result, Err(ApiError::MalformedResponse(_))), "got {result:?}");
    assert!(!client.session().is_active());
}

#[tokio::test]
async fn register_posts_json_and_starts_session() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/register"))
        .and(body_json(json!({"email": "new@runner.io", "password": "pw"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "fresh",
            "token_type": "bearer"
        })))
        .expect(1)
        .mount(&server)
        .await;
    let (backend, client) = logged_out_client(&server);

    client.register("new@runner.io", "pw").await.unwrap();

    assert_eq!(client.session().token().as_deref(), Some("fresh"));
    assert_eq!(backend.get(EMAIL_KEY).unwrap().as_deref(), Some("new@runner.io"));
}

#[tokio::test]
async fn register_duplicate_email_surfaces_detail() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/register"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "detail": "Email already registered"
        })))
        .mount(&server)
        .await;
    let (_, client) = logged_out_client(&server);

    let err = client.register("a@b.com", "pw").await.unwrap_err();
    assert_eq!(err.user_message(), "Email already registered");
    assert!(!client.session().is_active());
}

#[tokio::test]
async fn logout_after_login_ends_session_and_blocks_calls() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"access_token": "abc123"})))
        .expect(1)
        .mount(&server)
        .await;
    let (backend, client) = logged_out_client(&server);

    client.login("a@b.com", "pw").await.unwrap();
    client.logout();

    assert!(!client.session().is_active());
    assert_eq!(backend.get(TOKEN_KEY).unwrap(), None);
    let result = client.list_documents().await;
    assert!(matches!(result, Err(ApiError::Unauthenticated)), "got {result:?}");
    // Only the login exchange went out
    assert_eq!(request_count(&server).await, 1);
}
