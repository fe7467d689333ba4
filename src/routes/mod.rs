// SPDX-License-Identifier: MIT

//! HTTP route handlers.

pub mod admin;
pub mod auth;
pub mod driver;

use axum::{
    extract::State,
    middleware,
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
    Router,
};
use axum_extra::extract::cookie::CookieJar;
use std::sync::Arc;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use crate::middleware::auth::{require_admin, require_driver};
use crate::AppState;

/// Send signed-in users to their dashboard, everyone else to the login page.
async fn root(State(state): State<Arc<AppState>>, jar: CookieJar) -> Response {
    match state.sessions.user_from_jar(&jar) {
        Ok(Some(user)) if user.is_admin() => Redirect::to("/admin").into_response(),
        Ok(Some(_)) => Redirect::to("/driver").into_response(),
        _ => Redirect::to("/login").into_response(),
    }
}

/// Build the complete router with all routes.
pub fn create_router(state: Arc<AppState>) -> Router {
    let public_routes = Router::new()
        .route("/", get(root))
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/logout", post(auth::logout));

    let driver_routes = Router::new()
        .route("/driver", get(driver::dashboard))
        .route("/driver/log", post(driver::log_hours))
        .route(
            "/driver/profile",
            get(driver::profile).post(driver::update_profile),
        )
        .route_layer(middleware::from_fn_with_state(state.clone(), require_driver));

    let admin_routes = Router::new()
        .route("/admin", get(admin::dashboard))
        .route("/admin/users", get(admin::list_users).post(admin::create_user))
        .route("/admin/users/new", get(admin::new_user_form))
        .route(
            "/admin/users/{id}",
            get(admin::view_driver).post(admin::update_user),
        )
        .route("/admin/users/{id}/edit", get(admin::edit_user_form))
        .route("/admin/users/{id}/delete", post(admin::delete_user))
        .route(
            "/admin/users/{id}/hours",
            get(admin::edit_hours_form).post(admin::update_hours),
        )
        .route(
            "/admin/profile",
            get(admin::profile).post(admin::update_profile),
        )
        .route_layer(middleware::from_fn_with_state(state.clone(), require_admin));

    Router::new()
        .merge(public_routes)
        .merge(driver_routes)
        .merge(admin_routes)
        .layer(middleware::from_fn(
            crate::middleware::security::add_security_headers,
        ))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .with_state(state)
}
