// SPDX-License-Identifier: MIT

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    response::Response,
    Router,
};
use tempfile::TempDir;
use tower::ServiceExt;

use driving_hours::auth::SessionManager;
use driving_hours::config::Config;
use driving_hours::models::{Role, User};
use driving_hours::routes::create_router;
use driving_hours::storage::JsonStore;
use driving_hours::AppState;

/// A fully wired application over a throwaway data directory. The directory
/// is removed when the test app is dropped.
pub struct TestApp {
    pub router: Router,
    pub state: Arc<AppState>,
    _data_dir: TempDir,
}

#[allow(dead_code)]
pub fn create_test_app() -> TestApp {
    let data_dir = TempDir::new().expect("failed to create temp data dir");

    let config = Config::test_default(data_dir.path().to_path_buf());
    let store = JsonStore::new(data_dir.path()).expect("failed to create store");
    let sessions = SessionManager::new(store.clone(), false);

    let state = Arc::new(AppState {
        config,
        store,
        sessions,
    });

    TestApp {
        router: create_router(state.clone()),
        state,
        _data_dir: data_dir,
    }
}

/// Create and persist a user in the pool. Bcrypt cost 4 keeps tests fast.
#[allow(dead_code)]
pub fn make_user(app: &TestApp, email: &str, password: &str, role: Role) -> User {
    let hash = bcrypt::hash(password, 4).expect("failed to hash test password");
    let mut user = User::new(email, "Test User", hash, role);
    app.state
        .store
        .save_user(&mut user)
        .expect("failed to save test user");
    user
}

/// Sign in through the real login handler and return the session cookie
/// value, ready for a `Cookie` request header.
#[allow(dead_code)]
pub async fn login(app: &TestApp, email: &str, password: &str) -> String {
    let body = format!(
        "email={}&password={}",
        urlencode(email),
        urlencode(password)
    );

    let response = app
        .router
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/login")
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(
        response.status(),
        StatusCode::SEE_OTHER,
        "login did not redirect; wrong credentials?"
    );

    let set_cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .expect("login response missing Set-Cookie")
        .to_str()
        .unwrap();

    // "session=<token>; Path=/; ..." -> "session=<token>"
    set_cookie
        .split(';')
        .next()
        .expect("malformed Set-Cookie")
        .to_string()
}

/// Minimal form-encoding for test inputs.
#[allow(dead_code)]
pub fn urlencode(s: &str) -> String {
    let mut out = String::new();
    for b in s.bytes() {
        match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(b as char)
            }
            b' ' => out.push('+'),
            _ => out.push_str(&format!("%{b:02X}")),
        }
    }
    out
}

#[allow(dead_code)]
pub async fn body_string(response: Response) -> String {
    use http_body_util::BodyExt;
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}
