// SPDX-License-Identifier: MIT

//! End-to-end flows through the real router: login, role gating, hour
//! logging, and the last-admin delete guard.

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use tower::ServiceExt;

use driving_hours::models::Role;

mod common;

fn location(response: &axum::response::Response) -> &str {
    response
        .headers()
        .get(header::LOCATION)
        .expect("missing Location header")
        .to_str()
        .unwrap()
}

async fn get(app: &common::TestApp, uri: &str, cookie: Option<&str>) -> axum::response::Response {
    let mut builder = Request::builder().uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    app.router
        .clone()
        .oneshot(builder.body(Body::empty()).unwrap())
        .await
        .unwrap()
}

async fn post_form(
    app: &common::TestApp,
    uri: &str,
    cookie: Option<&str>,
    body: &str,
) -> axum::response::Response {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    app.router
        .clone()
        .oneshot(builder.body(Body::from(body.to_string())).unwrap())
        .await
        .unwrap()
}

#[tokio::test]
async fn login_sets_cookie_and_redirects_by_role() {
    let app = common::create_test_app();
    common::make_user(&app, "driver@example.com", "hunter2driver", Role::Driver);
    common::make_user(&app, "boss@example.com", "hunter2admin!", Role::Admin);

    let response = post_form(
        &app,
        "/login",
        None,
        "email=driver%40example.com&password=hunter2driver",
    )
    .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/driver");

    let set_cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .unwrap()
        .to_str()
        .unwrap();
    assert!(set_cookie.starts_with("session="));
    assert!(set_cookie.contains("HttpOnly"));
    assert!(set_cookie.contains("SameSite=Lax"));
    assert!(set_cookie.contains("Path=/"));
    assert!(!set_cookie.contains("Secure"));

    let response = post_form(
        &app,
        "/login",
        None,
        "email=boss%40example.com&password=hunter2admin%21",
    )
    .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/admin");
}

#[tokio::test]
async fn wrong_password_shows_uniform_error() {
    let app = common::create_test_app();
    common::make_user(&app, "driver@example.com", "hunter2driver", Role::Driver);

    let wrong_password = post_form(
        &app,
        "/login",
        None,
        "email=driver%40example.com&password=nope",
    )
    .await;
    assert_eq!(wrong_password.status(), StatusCode::OK);
    let body = common::body_string(wrong_password).await;
    assert!(body.contains("Invalid email or password"));

    // Unknown email produces the exact same message.
    let unknown_email = post_form(
        &app,
        "/login",
        None,
        "email=nobody%40example.com&password=nope",
    )
    .await;
    let body = common::body_string(unknown_email).await;
    assert!(body.contains("Invalid email or password"));
}

#[tokio::test]
async fn unauthenticated_requests_redirect_to_login() {
    let app = common::create_test_app();

    for uri in ["/driver", "/admin", "/admin/users"] {
        let response = get(&app, uri, None).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER, "{uri}");
        assert_eq!(location(&response), "/login", "{uri}");
    }
}

#[tokio::test]
async fn drivers_cannot_reach_admin_routes() {
    let app = common::create_test_app();
    common::make_user(&app, "driver@example.com", "hunter2driver", Role::Driver);
    let cookie = common::login(&app, "driver@example.com", "hunter2driver").await;

    let response = get(&app, "/admin/users", Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/driver");
}

#[tokio::test]
async fn logout_clears_the_session() {
    let app = common::create_test_app();
    common::make_user(&app, "driver@example.com", "hunter2driver", Role::Driver);
    let cookie = common::login(&app, "driver@example.com", "hunter2driver").await;

    let response = post_form(&app, "/logout", Some(&cookie), "").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/login");

    // The old cookie no longer grants access.
    let response = get(&app, "/driver", Some(&cookie)).await;
    assert_eq!(location(&response), "/login");
}

#[tokio::test]
async fn logging_hours_persists_and_celebrates() {
    let app = common::create_test_app();
    let user = common::make_user(&app, "driver@example.com", "hunter2driver", Role::Driver);
    let cookie = common::login(&app, "driver@example.com", "hunter2driver").await;

    let response = post_form(
        &app,
        "/driver/log",
        Some(&cookie),
        "date=2026-08-20&day_hours=2&day_minutes=30&night_hours=1&night_minutes=0",
    )
    .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/driver?celebrate=1");

    let saved = app.state.store.get_user(&user.id).unwrap().unwrap();
    let entry = saved.driving_log.entry("2026-08-20").unwrap();
    assert_eq!(entry.day_hours, 2.5);
    assert_eq!(entry.night_hours, 1.0);
}

#[tokio::test]
async fn zero_hours_removes_the_entry() {
    let app = common::create_test_app();
    let user = common::make_user(&app, "driver@example.com", "hunter2driver", Role::Driver);
    let cookie = common::login(&app, "driver@example.com", "hunter2driver").await;

    post_form(
        &app,
        "/driver/log",
        Some(&cookie),
        "date=2026-08-20&day_hours=3&night_hours=0",
    )
    .await;

    // Writing all zeros for the same date clears it, with no celebration.
    let response = post_form(
        &app,
        "/driver/log",
        Some(&cookie),
        "date=2026-08-20&day_hours=0&night_hours=0",
    )
    .await;
    assert_eq!(location(&response), "/driver");

    let saved = app.state.store.get_user(&user.id).unwrap().unwrap();
    assert!(!saved.driving_log.has_entry("2026-08-20"));
}

#[tokio::test]
async fn missing_date_redirects_with_error() {
    let app = common::create_test_app();
    common::make_user(&app, "driver@example.com", "hunter2driver", Role::Driver);
    let cookie = common::login(&app, "driver@example.com", "hunter2driver").await;

    let response = post_form(&app, "/driver/log", Some(&cookie), "day_hours=2").await;
    assert_eq!(location(&response), "/driver?error=date_required");
}

#[tokio::test]
async fn last_admin_cannot_be_deleted() {
    let app = common::create_test_app();

    // Single admin in the pool, nothing in the primary slot.
    let admin = common::make_user(&app, "boss@example.com", "hunter2admin!", Role::Admin);
    let cookie = common::login(&app, "boss@example.com", "hunter2admin!").await;

    let response = post_form(
        &app,
        &format!("/admin/users/{}/delete", admin.id),
        Some(&cookie),
        "",
    )
    .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/admin/users");

    // Still there.
    assert!(app.state.store.get_user(&admin.id).unwrap().is_some());
}

#[tokio::test]
async fn one_of_two_admins_can_be_deleted() {
    let app = common::create_test_app();

    let first = common::make_user(&app, "boss@example.com", "hunter2admin!", Role::Admin);
    common::make_user(&app, "other@example.com", "hunter2admin!", Role::Admin);
    let cookie = common::login(&app, "boss@example.com", "hunter2admin!").await;

    // Self-deletion is allowed when another admin remains, and ends the
    // deleter's session.
    let response = post_form(
        &app,
        &format!("/admin/users/{}/delete", first.id),
        Some(&cookie),
        "",
    )
    .await;
    assert_eq!(location(&response), "/login");
    assert!(app.state.store.get_user(&first.id).unwrap().is_none());

    let response = get(&app, "/admin", Some(&cookie)).await;
    assert_eq!(location(&response), "/login");
}

#[tokio::test]
async fn slot_admin_counts_toward_the_guard() {
    let app = common::create_test_app();

    // One pool admin plus a populated primary slot: deleting the pool admin
    // is fine because the slot admin remains.
    let pool_admin = common::make_user(&app, "boss@example.com", "hunter2admin!", Role::Admin);
    let mut slot = driving_hours::models::User::new(
        "root@example.com",
        "Root",
        bcrypt::hash("rootpassword", 4).unwrap(),
        Role::Admin,
    );
    app.state.store.save_admin(&mut slot).unwrap();

    let cookie = common::login(&app, "boss@example.com", "hunter2admin!").await;
    post_form(
        &app,
        &format!("/admin/users/{}/delete", pool_admin.id),
        Some(&cookie),
        "",
    )
    .await;

    assert!(app.state.store.get_user(&pool_admin.id).unwrap().is_none());
}

#[tokio::test]
async fn responses_carry_security_headers() {
    let app = common::create_test_app();

    let response = get(&app, "/login", None).await;
    let headers = response.headers();
    assert_eq!(headers.get("x-content-type-options").unwrap(), "nosniff");
    assert_eq!(headers.get("x-frame-options").unwrap(), "DENY");
    assert!(headers.contains_key("content-security-policy"));
    assert!(headers.contains_key("referrer-policy"));
}
