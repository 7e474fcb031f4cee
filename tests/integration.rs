use std::io::Write;
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use tower::ServiceExt;

use grouper_auth::auth::{
    AuthLimits, AuthRequest, AuthResult, AuthenticationService, PasswordVerifier, UserCredential,
    hash_password,
};
use grouper_auth::config::{AuthServerConfig, HashingConfig};
use grouper_auth::error::StoreError;
use grouper_auth::server::{build_service, router};
use grouper_auth::storage::{CredentialStore, MemoryCredentialStore};

const FAST: HashingConfig = HashingConfig {
    memory_kib: 1024,
    iterations: 1,
    parallelism: 1,
};

// Helper stores standing in for a broken or stalled backend
struct UnreachableStore;

#[async_trait]
impl CredentialStore for UnreachableStore {
    async fn lookup(&self, _username: &str) -> Result<Option<UserCredential>, StoreError> {
        Err(StoreError::Backend("connection refused".into()))
    }
}

struct StalledStore;

#[async_trait]
impl CredentialStore for StalledStore {
    async fn lookup(&self, _username: &str) -> Result<Option<UserCredential>, StoreError> {
        tokio::time::sleep(Duration::from_secs(30)).await;
        Ok(None)
    }
}

fn alice_store() -> MemoryCredentialStore {
    let hash = hash_password("correct-password", &FAST).expect("hashing should succeed");
    MemoryCredentialStore::new([("alice", hash)])
}

fn service_with(store: Arc<dyn CredentialStore>, limits: AuthLimits) -> AuthenticationService {
    let verifier = PasswordVerifier::new(None, &FAST).expect("reference hash");
    AuthenticationService::new(store, verifier, limits)
}

fn alice_service() -> AuthenticationService {
    service_with(Arc::new(alice_store()), AuthLimits::default())
}

async fn login(service: &AuthenticationService, username: &str, password: &str) -> AuthResult {
    service
        .authenticate(AuthRequest::new(username, password))
        .await
}

#[tokio::test]
async fn test_registered_user_with_correct_password() {
    let service = alice_service();
    assert_eq!(
        login(&service, "alice", "correct-password").await,
        AuthResult::Authenticated
    );
}

#[tokio::test]
async fn test_registered_user_with_wrong_password() {
    let service = alice_service();
    assert_eq!(
        login(&service, "alice", "wrong").await,
        AuthResult::InvalidCredentials
    );
    assert_eq!(
        login(&service, "alice", "").await,
        AuthResult::InvalidCredentials
    );
}

#[tokio::test]
async fn test_unknown_user_matches_wrong_password_outcome() {
    let service = alice_service();
    let unknown = login(&service, "bob", "anything").await;
    let wrong = login(&service, "alice", "anything").await;

    assert_eq!(unknown, AuthResult::InvalidCredentials);
    assert_eq!(unknown, wrong);
    assert_eq!(
        login(&service, "ALICE", "correct-password").await,
        AuthResult::InvalidCredentials
    );
}

#[tokio::test]
async fn test_unreachable_backend_is_store_unavailable() {
    let service = service_with(Arc::new(UnreachableStore), AuthLimits::default());

    for (username, password) in [("alice", "correct-password"), ("bob", "anything")] {
        assert_eq!(
            login(&service, username, password).await,
            AuthResult::StoreUnavailable
        );
    }
}

#[tokio::test]
async fn test_stalled_backend_is_bounded_by_lookup_timeout() {
    let limits = AuthLimits {
        lookup_timeout: Duration::from_millis(100),
        ..AuthLimits::default()
    };
    let service = service_with(Arc::new(StalledStore), limits);

    let started = Instant::now();
    let result = login(&service, "alice", "correct-password").await;

    assert_eq!(result, AuthResult::StoreUnavailable);
    assert!(started.elapsed() < Duration::from_secs(5));
}

#[tokio::test]
async fn test_repeated_calls_are_idempotent() {
    let service = alice_service();

    for _ in 0..3 {
        assert_eq!(
            login(&service, "alice", "correct-password").await,
            AuthResult::Authenticated
        );
        assert_eq!(
            login(&service, "alice", "wrong").await,
            AuthResult::InvalidCredentials
        );
        assert_eq!(
            login(&service, "bob", "anything").await,
            AuthResult::InvalidCredentials
        );
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_calls_are_independent() {
    let service = alice_service();

    let handles: Vec<_> = (0..16)
        .map(|i| {
            let service = service.clone();
            tokio::spawn(async move {
                let password = if i % 2 == 0 { "correct-password" } else { "wrong" };
                (i, login(&service, "alice", password).await)
            })
        })
        .collect();

    for handle in handles {
        let (i, result) = handle.await.expect("task should not panic");
        let expected = if i % 2 == 0 {
            AuthResult::Authenticated
        } else {
            AuthResult::InvalidCredentials
        };
        assert_eq!(result, expected);
    }
}

#[tokio::test]
async fn test_unknown_user_costs_comparable_time() {
    let service = alice_service();

    // Warm up the blocking pool before measuring.
    login(&service, "alice", "warmup").await;

    let mut found = Duration::MAX;
    let mut missing = Duration::MAX;
    for _ in 0..5 {
        let started = Instant::now();
        login(&service, "alice", "wrong").await;
        found = found.min(started.elapsed());

        let started = Instant::now();
        login(&service, "bob", "wrong").await;
        missing = missing.min(started.elapsed());
    }

    let ratio = found.as_secs_f64() / missing.as_secs_f64();
    assert!(
        (0.1..10.0).contains(&ratio),
        "found={found:?} missing={missing:?}"
    );
}

#[tokio::test]
async fn test_unusable_stored_hash_costs_comparable_time() {
    let store = MemoryCredentialStore::new([("alice", "$2b$10$tooShort")]);
    let service = service_with(Arc::new(store), AuthLimits::default());

    login(&service, "alice", "warmup").await;

    let mut unusable = Duration::MAX;
    let mut missing = Duration::MAX;
    for _ in 0..5 {
        let started = Instant::now();
        assert_eq!(
            login(&service, "alice", "wrong").await,
            AuthResult::InvalidCredentials
        );
        unusable = unusable.min(started.elapsed());

        let started = Instant::now();
        login(&service, "bob", "wrong").await;
        missing = missing.min(started.elapsed());
    }

    let ratio = unusable.as_secs_f64() / missing.as_secs_f64();
    assert!(
        (0.1..10.0).contains(&ratio),
        "unusable={unusable:?} missing={missing:?}"
    );
}

fn form_request(body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body.to_owned()))
        .expect("valid request")
}

async fn post_login(service: AuthenticationService, body: &str) -> (StatusCode, Vec<u8>) {
    let response = router(service)
        .oneshot(form_request(body))
        .await
        .expect("router is infallible");
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body should be readable");
    (status, bytes.to_vec())
}

#[tokio::test]
async fn test_http_login_success() {
    let (status, body) = post_login(
        alice_service(),
        "username=alice&password=correct-password",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert!(String::from_utf8_lossy(&body).contains("Success"));
}

#[tokio::test]
async fn test_http_rejections_are_uniform() {
    let service = alice_service();
    let (wrong_status, wrong_body) =
        post_login(service.clone(), "username=alice&password=wrong").await;
    let (unknown_status, unknown_body) =
        post_login(service, "username=bob&password=anything").await;

    assert_eq!(wrong_status, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_body, unknown_body);
    let rendered = String::from_utf8_lossy(&wrong_body);
    assert!(!rendered.contains("username"));
    assert!(!rendered.contains("password"));
}

#[tokio::test]
async fn test_http_backend_failure_is_service_unavailable() {
    let service = service_with(Arc::new(UnreachableStore), AuthLimits::default());
    let (status, body) = post_login(service, "username=alice&password=correct-password").await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert!(!String::from_utf8_lossy(&body).contains("connection refused"));
}

#[tokio::test]
async fn test_service_built_from_config_file() {
    let hash = hash_password("correct-password", &FAST).unwrap();
    let body = format!(
        r#"
bind_address = "127.0.0.1"
port = 8080
lookup_timeout_ms = 1000
verify_timeout_ms = 5000
max_username_length = 64
max_password_length = 256

[hashing]
memory_kib = 1024
iterations = 1
parallelism = 1

[store]
backend = "memory"

[[store.users]]
username = "alice"
password_hash = "{hash}"
"#
    );
    let mut file = tempfile::Builder::new()
        .suffix(".toml")
        .tempfile()
        .expect("temp file");
    file.write_all(body.as_bytes()).expect("write config");

    let config = AuthServerConfig::load_from(file.path()).expect("config should load");
    let service = build_service(&config).expect("service should build");

    assert_eq!(
        login(&service, "alice", "correct-password").await,
        AuthResult::Authenticated
    );
    assert_eq!(
        login(&service, "bob", "correct-password").await,
        AuthResult::InvalidCredentials
    );
}
