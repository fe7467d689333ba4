// SPDX-License-Identifier: MIT

//! Admin management flows: creating users, editing hours on a driver's
//! behalf, and profile updates for both admin storage locations.

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use tower::ServiceExt;

use driving_hours::auth::password::verify_password;
use driving_hours::models::{Role, User};

mod common;

async fn post_form(
    app: &common::TestApp,
    uri: &str,
    cookie: &str,
    body: &str,
) -> axum::response::Response {
    app.router
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .header(header::COOKIE, cookie)
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap()
}

async fn admin_cookie(app: &common::TestApp) -> String {
    common::make_user(app, "boss@example.com", "hunter2admin!", Role::Admin);
    common::login(app, "boss@example.com", "hunter2admin!").await
}

#[tokio::test]
async fn admin_creates_a_driver() {
    let app = common::create_test_app();
    let cookie = admin_cookie(&app).await;

    let response = post_form(
        &app,
        "/admin/users",
        &cookie,
        "email=new%40example.com&name=New+Driver&password=longenough&role=driver\
         &required_day_hours=40&required_night_hours=10",
    )
    .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let created = app
        .state
        .store
        .get_user_by_email("new@example.com")
        .unwrap()
        .expect("driver not created");
    assert_eq!(created.name, "New Driver");
    assert_eq!(created.role, Role::Driver);
    assert_eq!(created.required_day_hours, 40.0);
    assert_eq!(created.required_night_hours, 10.0);
    assert!(verify_password("longenough", &created.password_hash));
}

#[tokio::test]
async fn duplicate_email_is_rejected() {
    let app = common::create_test_app();
    let cookie = admin_cookie(&app).await;
    common::make_user(&app, "taken@example.com", "hunter2driver", Role::Driver);

    let response = post_form(
        &app,
        "/admin/users",
        &cookie,
        "email=taken%40example.com&name=Dup&password=longenough&role=driver",
    )
    .await;

    // Re-rendered form with the error, not a redirect.
    assert_eq!(response.status(), StatusCode::OK);
    let body = common::body_string(response).await;
    assert!(body.contains("Email already in use"));
}

#[tokio::test]
async fn short_password_is_rejected() {
    let app = common::create_test_app();
    let cookie = admin_cookie(&app).await;

    let response = post_form(
        &app,
        "/admin/users",
        &cookie,
        "email=new%40example.com&name=New&password=short&role=driver",
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert!(app
        .state
        .store
        .get_user_by_email("new@example.com")
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn admin_edits_driver_hours() {
    let app = common::create_test_app();
    let cookie = admin_cookie(&app).await;
    let driver = common::make_user(&app, "driver@example.com", "hunter2driver", Role::Driver);

    let uri = format!("/admin/users/{}/hours", driver.id);
    let response = post_form(
        &app,
        &uri,
        &cookie,
        "date=2026-08-19&day_hours=4&day_minutes=15&night_hours=0&night_minutes=0",
    )
    .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let saved = app.state.store.get_user(&driver.id).unwrap().unwrap();
    let entry = saved.driving_log.entry("2026-08-19").unwrap();
    assert_eq!(entry.day_hours, 4.25);

    // Delete takes precedence over any hour fields.
    post_form(&app, &uri, &cookie, "date=2026-08-19&delete=1&day_hours=9").await;
    let saved = app.state.store.get_user(&driver.id).unwrap().unwrap();
    assert!(!saved.driving_log.has_entry("2026-08-19"));
}

#[tokio::test]
async fn admin_updates_driver_requirements() {
    let app = common::create_test_app();
    let cookie = admin_cookie(&app).await;
    let driver = common::make_user(&app, "driver@example.com", "hunter2driver", Role::Driver);

    let response = post_form(
        &app,
        &format!("/admin/users/{}", driver.id),
        &cookie,
        "email=driver%40example.com&name=Renamed&required_day_hours=50&required_night_hours=15",
    )
    .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let saved = app.state.store.get_user(&driver.id).unwrap().unwrap();
    assert_eq!(saved.name, "Renamed");
    assert_eq!(saved.required_day_hours, 50.0);
    assert_eq!(saved.required_night_hours, 15.0);
}

#[tokio::test]
async fn pool_admin_profile_update_stays_in_the_pool() {
    let app = common::create_test_app();
    let admin = common::make_user(&app, "boss@example.com", "hunter2admin!", Role::Admin);
    let cookie = common::login(&app, "boss@example.com", "hunter2admin!").await;

    let response = post_form(&app, "/admin/profile", &cookie, "name=Renamed+Boss").await;
    assert_eq!(response.status(), StatusCode::OK);

    let saved = app.state.store.get_user(&admin.id).unwrap().unwrap();
    assert_eq!(saved.name, "Renamed Boss");
    assert!(app.state.store.get_admin().unwrap().is_none());
}

#[tokio::test]
async fn slot_admin_profile_update_stays_in_the_slot() {
    let app = common::create_test_app();

    let mut slot = User::new(
        "root@example.com",
        "Root",
        bcrypt::hash("rootpassword", 4).unwrap(),
        Role::Admin,
    );
    app.state.store.save_admin(&mut slot).unwrap();
    let cookie = common::login(&app, "root@example.com", "rootpassword").await;

    let response = post_form(
        &app,
        "/admin/profile",
        &cookie,
        "name=Root&current_password=rootpassword&new_password=newrootpassword",
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let saved = app.state.store.get_admin().unwrap().unwrap();
    assert!(verify_password("newrootpassword", &saved.password_hash));
    // No duplicate record appears in the pool.
    assert!(app.state.store.get_user(&slot.id).unwrap().is_none());
}
