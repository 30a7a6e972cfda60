//! Mock API tests for the libris library.
//!
//! These tests use wiremock to simulate the library API and exercise the
//! session, HTTP wrapper and route guard without a real server.

use std::sync::Arc;
use std::time::Duration;

use libris::error::{AuthError, TransportError};
use libris::models::GenreInput;
use libris::{
    ApiClient, ApiUrl, AuthSession, AuthToken, ClientConfig, Credentials, DashboardSummary,
    Decision, Error, History, MemoryTokenStore, RegisterInput, RegistrationOutcome, RouteGuard,
    SessionState, TokenStore,
};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

struct Harness {
    session: AuthSession,
    tokens: Arc<MemoryTokenStore>,
    history: Arc<History>,
}

fn harness(server: &MockServer, tokens: MemoryTokenStore) -> Harness {
    let api = ApiUrl::new(format!("http://127.0.0.1:{}", server.address().port())).unwrap();
    let tokens = Arc::new(tokens);
    let history = Arc::new(History::new());
    let client = ApiClient::new(
        ClientConfig::new(api).with_timeout(Duration::from_secs(2)),
        tokens.clone(),
        history.clone(),
    )
    .unwrap();

    Harness {
        session: AuthSession::new(client),
        tokens,
        history,
    }
}

async fn mount_login(server: &MockServer, username: &str, password: &str, token: &str) {
    Mock::given(method("POST"))
        .and(path("/api/v1/auth/login"))
        .and(body_json(json!({"username": username, "password": password})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "token": token,
            "user": {"id": 1, "username": username}
        })))
        .mount(server)
        .await;
}

async fn mount_me(server: &MockServer, token: &str, username: &str, role: &str) {
    Mock::given(method("GET"))
        .and(path("/api/v1/auth/me"))
        .and(header("authorization", format!("Bearer {token}").as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 1,
            "username": username,
            "email": format!("{username}@example.com"),
            "role": role
        })))
        .mount(server)
        .await;
}

// ============================================================================
// Login
// ============================================================================

#[tokio::test]
async fn test_login_success_authenticates_admin() {
    let server = MockServer::start().await;
    mount_login(&server, "alice", "secret", "tok123").await;
    mount_me(&server, "tok123", "alice", "ROLE_ADMIN").await;

    let h = harness(&server, MemoryTokenStore::new());
    let outcome = h.session.login(&Credentials::new("alice", "secret")).await;

    assert!(outcome.success, "{:?}", outcome.message);
    assert!(h.session.is_authenticated().await);
    assert!(h.session.is_admin().await);
    assert_eq!(h.tokens.get().unwrap(), Some(AuthToken::new("tok123")));

    let decision = h
        .session
        .navigate(&RouteGuard::library(), "/dashboard/books/create")
        .await;
    assert_eq!(decision, Decision::Allow);
}

#[tokio::test]
async fn test_login_invalid_credentials_keeps_prior_token() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/auth/login"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "status": 401,
            "message": "Invalid username or password"
        })))
        .mount(&server)
        .await;

    let h = harness(&server, MemoryTokenStore::with_token(AuthToken::new("older")));
    let outcome = h.session.login(&Credentials::new("alice", "wrong")).await;

    assert!(!outcome.success);
    assert_eq!(outcome.message.as_deref(), Some("Invalid username or password"));
    assert_eq!(h.session.state().await, SessionState::Anonymous);
    assert_eq!(h.tokens.get().unwrap(), Some(AuthToken::new("older")));
    assert_eq!(h.history.current(), None);
}

#[tokio::test]
async fn test_login_failure_without_message_uses_fallback() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/auth/login"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let h = harness(&server, MemoryTokenStore::new());
    let outcome = h.session.login(&Credentials::new("alice", "secret")).await;

    assert!(!outcome.success);
    assert_eq!(outcome.message.as_deref(), Some("Login failed"));
    assert!(!h.tokens.contains());
}

#[tokio::test]
async fn test_login_then_failed_user_fetch_is_not_success() {
    let server = MockServer::start().await;
    mount_login(&server, "alice", "secret", "tok123").await;

    Mock::given(method("GET"))
        .and(path("/api/v1/auth/me"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let h = harness(&server, MemoryTokenStore::new());
    let outcome = h.session.login(&Credentials::new("alice", "secret")).await;

    assert!(!outcome.success);
    assert_eq!(h.session.state().await, SessionState::Anonymous);
    assert!(!h.tokens.contains());
}

// ============================================================================
// Registration
// ============================================================================

#[tokio::test]
async fn test_register_does_not_authenticate() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/auth/register"))
        .and(body_json(json!({
            "username": "bob",
            "email": "bob@example.com",
            "password": "hunter22"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": 2,
            "username": "bob",
            "email": "bob@example.com",
            "role": "ROLE_USER"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let h = harness(&server, MemoryTokenStore::new());
    let outcome = h
        .session
        .register(&RegisterInput::new("bob", "bob@example.com", "hunter22"))
        .await;

    assert!(outcome.success);
    assert!(!h.session.is_authenticated().await);
    assert!(!h.tokens.contains());
}

#[tokio::test]
async fn test_register_conflict_surfaces_server_message() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/auth/register"))
        .respond_with(ResponseTemplate::new(409).set_body_json(json!({
            "status": 409,
            "message": "Username is already taken"
        })))
        .mount(&server)
        .await;

    let h = harness(&server, MemoryTokenStore::new());
    let outcome = h
        .session
        .register_and_login(&RegisterInput::new("bob", "bob@example.com", "hunter22"))
        .await;

    assert_eq!(
        outcome,
        RegistrationOutcome::RegistrationFailed {
            message: "Username is already taken".into()
        }
    );
}

#[tokio::test]
async fn test_register_then_login_failure_is_distinct() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/auth/register"))
        .respond_with(
            ResponseTemplate::new(201).set_body_json(json!({"id": 2, "username": "bob"})),
        )
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/v1/auth/login"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let h = harness(&server, MemoryTokenStore::new());
    let outcome = h
        .session
        .register_and_login(&RegisterInput::new("bob", "bob@example.com", "hunter22"))
        .await;

    assert_eq!(
        outcome,
        RegistrationOutcome::RegisteredLoginFailed {
            message: "Login failed".into()
        }
    );
}

#[tokio::test]
async fn test_register_and_login_success() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/auth/register"))
        .respond_with(
            ResponseTemplate::new(201).set_body_json(json!({"id": 2, "username": "bob"})),
        )
        .mount(&server)
        .await;
    mount_login(&server, "bob", "hunter22", "bobtok").await;
    mount_me(&server, "bobtok", "bob", "ROLE_USER").await;

    let h = harness(&server, MemoryTokenStore::new());
    let outcome = h
        .session
        .register_and_login(&RegisterInput::new("bob", "bob@example.com", "hunter22"))
        .await;

    assert_eq!(outcome, RegistrationOutcome::Registered);
    assert!(h.session.is_authenticated().await);
    assert!(!h.session.is_admin().await);
}

// ============================================================================
// Session lifecycle
// ============================================================================

#[tokio::test]
async fn test_initialize_without_token_makes_no_request() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/auth/me"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let h = harness(&server, MemoryTokenStore::new());
    h.session.initialize_auth().await;

    assert_eq!(h.session.state().await, SessionState::Anonymous);
}

#[tokio::test]
async fn test_initialize_with_valid_token_restores_user() {
    let server = MockServer::start().await;
    mount_me(&server, "saved", "carol", "ROLE_USER").await;

    let h = harness(&server, MemoryTokenStore::with_token(AuthToken::new("saved")));
    h.session.initialize_auth().await;

    let user = h.session.user().await.unwrap();
    assert_eq!(user.username, "carol");
    assert!(!h.session.is_admin().await);
}

#[tokio::test]
async fn test_initialize_with_rejected_token_logs_out() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/auth/me"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "status": 401,
            "message": "Token expired"
        })))
        .mount(&server)
        .await;

    let h = harness(&server, MemoryTokenStore::with_token(AuthToken::new("stale")));
    h.session.initialize_auth().await;

    assert_eq!(h.session.state().await, SessionState::Anonymous);
    assert!(!h.tokens.contains());
    assert_eq!(h.history.current().as_deref(), Some("/login"));
}

#[tokio::test]
async fn test_logout_after_login_clears_everything() {
    let server = MockServer::start().await;
    mount_login(&server, "alice", "secret", "tok123").await;
    mount_me(&server, "tok123", "alice", "ROLE_ADMIN").await;

    let h = harness(&server, MemoryTokenStore::new());
    assert!(h.session.login(&Credentials::new("alice", "secret")).await.success);

    h.session.logout().await;
    h.session.logout().await;

    assert_eq!(h.session.state().await, SessionState::Anonymous);
    assert!(!h.tokens.contains());
}

#[tokio::test]
async fn test_superseded_fetch_is_discarded() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/auth/me"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"id": 1, "username": "alice", "role": "ROLE_ADMIN"}))
                .set_delay(Duration::from_millis(300)),
        )
        .mount(&server)
        .await;

    let h = harness(&server, MemoryTokenStore::with_token(AuthToken::new("tok")));
    let session = h.session.clone();

    let (fetched, ()) = tokio::join!(session.fetch_current_user(), async {
        tokio::time::sleep(Duration::from_millis(50)).await;
        h.session.logout().await;
    });

    assert_eq!(fetched, None);
    assert_eq!(h.session.state().await, SessionState::Anonymous);
    assert!(!h.tokens.contains());
}

#[tokio::test]
async fn test_superseded_unauthorized_fetch_spares_new_login() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/auth/me"))
        .and(header("authorization", "Bearer old"))
        .respond_with(
            ResponseTemplate::new(401)
                .set_body_json(json!({"status": 401, "message": "Token expired"}))
                .set_delay(Duration::from_millis(300)),
        )
        .mount(&server)
        .await;
    mount_login(&server, "alice", "secret", "new").await;
    mount_me(&server, "new", "alice", "ROLE_ADMIN").await;

    let h = harness(&server, MemoryTokenStore::with_token(AuthToken::new("old")));
    let session = h.session.clone();

    let ((), outcome) = tokio::join!(session.initialize_auth(), async {
        tokio::time::sleep(Duration::from_millis(50)).await;
        h.session.logout().await;
        h.session.login(&Credentials::new("alice", "secret")).await
    });

    assert!(outcome.success, "{:?}", outcome.message);
    assert!(h.session.is_authenticated().await);
    assert!(h.session.is_admin().await);
    assert_eq!(h.tokens.get().unwrap(), Some(AuthToken::new("new")));
    assert_eq!(h.history.current(), None);
}

#[tokio::test]
async fn test_fetch_superseded_by_newer_fetch() {
    let server = MockServer::start().await;

    // The first request is answered late with a stale profile; the second
    // one immediately with the current profile.
    Mock::given(method("GET"))
        .and(path("/api/v1/auth/me"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"id": 1, "username": "alice", "role": "ROLE_USER"}))
                .set_delay(Duration::from_millis(300)),
        )
        .up_to_n_times(1)
        .mount(&server)
        .await;
    mount_me(&server, "tok", "alice", "ROLE_ADMIN").await;

    let h = harness(&server, MemoryTokenStore::with_token(AuthToken::new("tok")));
    let session = h.session.clone();

    let (stale, fresh) = tokio::join!(session.fetch_current_user(), async {
        tokio::time::sleep(Duration::from_millis(50)).await;
        h.session.fetch_current_user().await
    });

    assert_eq!(stale, None);
    assert!(fresh.is_some_and(|user| user.is_admin()));
    assert!(h.session.is_admin().await);
    assert_eq!(h.tokens.get().unwrap(), Some(AuthToken::new("tok")));
}

#[tokio::test]
async fn test_stale_token_rejection_redirects_once() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/books"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let h = harness(&server, MemoryTokenStore::with_token(AuthToken::new("old")));
    let books = h.session.client().books();

    let (first, second) = tokio::join!(books.list(), books.list());
    assert!(first.is_err() && second.is_err());
    assert!(!h.tokens.contains());
    assert_eq!(h.history.entries(), vec!["/login"]);
}

// ============================================================================
// Route guard with a live session
// ============================================================================

#[tokio::test]
async fn test_anonymous_dashboard_redirects_to_login() {
    let server = MockServer::start().await;
    let h = harness(&server, MemoryTokenStore::new());

    let decision = h.session.navigate(&RouteGuard::library(), "/dashboard").await;
    assert_eq!(decision, Decision::Redirect("/login".into()));
}

#[tokio::test]
async fn test_non_admin_edit_redirects_to_dashboard() {
    let server = MockServer::start().await;
    mount_me(&server, "usertok", "dave", "ROLE_USER").await;

    let h = harness(&server, MemoryTokenStore::with_token(AuthToken::new("usertok")));

    // The guard lazily initializes the session from the stored token.
    let decision = h
        .session
        .navigate(&RouteGuard::library(), "/dashboard/authors/5/edit")
        .await;
    assert_eq!(decision, Decision::Redirect("/dashboard".into()));
    assert!(h.session.is_authenticated().await);
}

#[tokio::test]
async fn test_authenticated_user_bounced_from_login_page() {
    let server = MockServer::start().await;
    mount_me(&server, "usertok", "dave", "ROLE_USER").await;

    let h = harness(&server, MemoryTokenStore::with_token(AuthToken::new("usertok")));
    let decision = h.session.navigate(&RouteGuard::library(), "/login").await;
    assert_eq!(decision, Decision::Redirect("/dashboard".into()));
}

// ============================================================================
// HTTP wrapper
// ============================================================================

#[tokio::test]
async fn test_requests_carry_bearer_token() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/genres"))
        .and(header("authorization", "Bearer tok123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 1, "name": "Fantasy", "description": "Dragons"}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let h = harness(&server, MemoryTokenStore::with_token(AuthToken::new("tok123")));
    let genres = h.session.client().genres().list().await.unwrap();
    assert_eq!(genres.len(), 1);
    assert_eq!(genres[0].name, "Fantasy");
}

#[tokio::test]
async fn test_requests_without_token_have_no_header() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/books"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let h = harness(&server, MemoryTokenStore::new());
    h.session.client().books().list().await.unwrap();

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert!(!requests[0].headers.contains_key("authorization"));
}

#[tokio::test]
async fn test_unauthorized_crud_call_clears_token_and_redirects() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/api/v1/books/3"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;

    let h = harness(&server, MemoryTokenStore::with_token(AuthToken::new("stale")));
    let err = h.session.client().books().delete(3).await.unwrap_err();

    assert!(matches!(err, Error::Auth(AuthError::Unauthorized { .. })));
    assert!(!h.tokens.contains());
    assert_eq!(h.history.entries(), vec!["/login"]);
}

#[tokio::test]
async fn test_forbidden_is_a_protocol_error_and_keeps_token() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/genres"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({
            "status": 403,
            "message": "Access denied"
        })))
        .mount(&server)
        .await;

    let h = harness(&server, MemoryTokenStore::with_token(AuthToken::new("usertok")));
    let input = GenreInput {
        name: "Poetry".into(),
        description: String::new(),
    };
    let err = h.session.client().genres().create(&input).await.unwrap_err();

    assert_eq!(err.status(), Some(403));
    assert_eq!(err.server_message(), Some("Access denied"));
    assert!(h.tokens.contains());
    assert_eq!(h.history.current(), None);
}

#[tokio::test]
async fn test_update_sends_put_with_body() {
    let server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/api/v1/genres/4"))
        .and(body_json(json!({"name": "Horror", "description": "Scary"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 4, "name": "Horror", "description": "Scary"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let h = harness(&server, MemoryTokenStore::with_token(AuthToken::new("admintok")));
    let input = GenreInput {
        name: "Horror".into(),
        description: "Scary".into(),
    };
    let genre = h.session.client().genres().update(4, &input).await.unwrap();
    assert_eq!(genre.id, 4);
}

#[tokio::test]
async fn test_slow_response_times_out() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/authors"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([]))
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&server)
        .await;

    let h = harness(&server, MemoryTokenStore::new());
    let err = h.session.client().authors().list().await.unwrap_err();

    assert!(matches!(
        err,
        Error::Transport(TransportError::Timeout { duration_ms: 2000 })
    ));
}

// ============================================================================
// Dashboard
// ============================================================================

#[tokio::test]
async fn test_dashboard_counts_collections() {
    let server = MockServer::start().await;
    mount_me(&server, "tok", "alice", "ROLE_ADMIN").await;

    Mock::given(method("GET"))
        .and(path("/api/v1/books"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 1, "title": "Dune", "isbn": "1", "description": "", "authorId": 1, "genreId": 1},
            {"id": 2, "title": "Emma", "isbn": "2", "description": "", "authorId": 2, "genreId": 2}
        ])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/authors"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 1, "name": "Frank Herbert", "biography": ""}
        ])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/genres"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let h = harness(&server, MemoryTokenStore::with_token(AuthToken::new("tok")));
    h.session.initialize_auth().await;

    let summary = DashboardSummary::load(&h.session).await.unwrap();
    assert_eq!(
        summary,
        DashboardSummary {
            username: "alice".into(),
            is_admin: true,
            books: 2,
            authors: 1,
            genres: 0,
        }
    );
}

#[tokio::test]
async fn test_dashboard_requires_session() {
    let server = MockServer::start().await;
    let h = harness(&server, MemoryTokenStore::new());

    let err = DashboardSummary::load(&h.session).await.unwrap_err();
    assert!(matches!(err, Error::Auth(AuthError::NotAuthenticated)));
}
