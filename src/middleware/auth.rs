// SPDX-License-Identifier: MIT

//! Session-cookie authentication middleware.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::CookieJar;
use std::sync::Arc;

use crate::models::User;
use crate::AppState;

/// Authenticated user, inserted into request extensions by the middleware.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

/// Admin-only routes. Signed-in drivers are sent to their own dashboard,
/// everyone else to the login page.
pub async fn require_admin(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Response {
    match state.sessions.user_from_jar(&jar) {
        Ok(Some(user)) if user.is_admin() => {
            request.extensions_mut().insert(CurrentUser(user));
            next.run(request).await
        }
        Ok(Some(_)) => Redirect::to("/driver").into_response(),
        _ => Redirect::to("/login").into_response(),
    }
}

/// Driver-only routes; the mirror image of [`require_admin`].
pub async fn require_driver(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Response {
    match state.sessions.user_from_jar(&jar) {
        Ok(Some(user)) if user.is_driver() => {
            request.extensions_mut().insert(CurrentUser(user));
            next.run(request).await
        }
        Ok(Some(_)) => Redirect::to("/admin").into_response(),
        _ => Redirect::to("/login").into_response(),
    }
}
