// SPDX-License-Identifier: MIT

//! Login and logout.

use axum::{
    extract::State,
    response::{Html, IntoResponse, Redirect, Response},
    Form,
};
use axum_extra::extract::cookie::CookieJar;
use serde::Deserialize;
use std::sync::Arc;

use crate::auth::password::verify_password;
use crate::error::Result;
use crate::views;
use crate::AppState;

#[derive(Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    email: String,
    #[serde(default)]
    password: String,
}

pub async fn login_page(State(state): State<Arc<AppState>>, jar: CookieJar) -> Response {
    // Already signed in: straight to the right dashboard.
    match state.sessions.user_from_jar(&jar) {
        Ok(Some(user)) if user.is_admin() => Redirect::to("/admin").into_response(),
        Ok(Some(_)) => Redirect::to("/driver").into_response(),
        _ => Html(views::login_page(None, "")).into_response(),
    }
}

pub async fn login(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Form(form): Form<LoginForm>,
) -> Result<Response> {
    let email = form.email.trim();
    if email.is_empty() || form.password.is_empty() {
        return Ok(Html(views::login_page(
            Some("Email and password are required"),
            email,
        ))
        .into_response());
    }

    let user = match state.store.get_user_by_email(email) {
        Ok(user) => user,
        Err(err) => {
            tracing::error!(error = %err, "login lookup failed");
            return Ok(Html(views::login_page(
                Some("An error occurred. Please try again."),
                email,
            ))
            .into_response());
        }
    };

    // Same message for an unknown email and a wrong password.
    let Some(user) = user.filter(|u| verify_password(&form.password, &u.password_hash)) else {
        return Ok(Html(views::login_page(Some("Invalid email or password"), email)).into_response());
    };

    let jar = state.sessions.create_session(jar, &user.id)?;
    let target = if user.is_admin() { "/admin" } else { "/driver" };

    tracing::info!(user_id = %user.id, "user signed in");

    Ok((jar, Redirect::to(target)).into_response())
}

pub async fn logout(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
) -> Result<impl IntoResponse> {
    let jar = state.sessions.destroy_session(jar)?;
    Ok((jar, Redirect::to("/login")))
}
