// SPDX-License-Identifier: MIT

//! Admin user management: create, edit, delete, view stats, edit hours.

use axum::{
    extract::{Path, State},
    response::{Html, IntoResponse, Redirect, Response},
    Extension, Form,
};
use axum_extra::extract::cookie::CookieJar;
use serde::Deserialize;
use std::sync::Arc;

use crate::auth::password::hash_password;
use crate::error::Result;
use crate::middleware::auth::CurrentUser;
use crate::models::{Role, User};
use crate::validation;
use crate::views;
use crate::AppState;

use super::driver::{apply_log_form, profile_errors, LogForm, ProfileForm};

fn parse_hours_field(s: &str) -> f64 {
    s.trim().parse().unwrap_or(0.0)
}

pub async fn dashboard(
    State(state): State<Arc<AppState>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> Result<Html<String>> {
    let drivers = state.store.list_drivers()?;
    Ok(Html(views::admin_dashboard(&user, &drivers)))
}

pub async fn list_users(
    State(state): State<Arc<AppState>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> Result<Html<String>> {
    let users = state.store.list_users()?;
    Ok(Html(views::admin_users(&user, &users)))
}

pub async fn new_user_form(
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> Html<String> {
    let blank = User::new("", "", String::new(), Role::Driver);
    Html(views::user_form(&user, &blank, true, true, &[]))
}

#[derive(Deserialize, Default)]
pub struct UserForm {
    #[serde(default)]
    email: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    password: String,
    #[serde(default)]
    role: String,
    #[serde(default)]
    required_day_hours: String,
    #[serde(default)]
    required_night_hours: String,
}

pub async fn create_user(
    State(state): State<Arc<AppState>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Form(form): Form<UserForm>,
) -> Result<Response> {
    let role = match form.role.as_str() {
        "admin" => Role::Admin,
        _ => Role::Driver,
    };

    let mut errors = Vec::new();
    if let Err(e) = validation::validate_email(&form.email) {
        errors.push(e.to_string());
    }
    if let Err(e) = validation::validate_name(&form.name) {
        errors.push(e.to_string());
    }
    if let Err(e) = validation::validate_password(&form.password) {
        errors.push(e.to_string());
    }

    let day_hours = parse_hours_field(&form.required_day_hours);
    let night_hours = parse_hours_field(&form.required_night_hours);

    let preview = |errors: &[String]| {
        let mut edit = User::new(form.email.trim(), form.name.trim(), String::new(), role);
        edit.required_day_hours = day_hours;
        edit.required_night_hours = night_hours;
        Html(views::user_form(&user, &edit, true, true, errors)).into_response()
    };

    if !errors.is_empty() {
        return Ok(preview(&errors));
    }

    if state.store.get_user_by_email(form.email.trim())?.is_some() {
        return Ok(preview(&["Email already in use".to_string()]));
    }

    let hash = hash_password(&form.password)?;
    let mut new_user = User::new(form.email.trim(), form.name.trim(), hash, role);
    new_user.required_day_hours = day_hours;
    new_user.required_night_hours = night_hours;

    state.store.save_user(&mut new_user)?;
    tracing::info!(user_id = %new_user.id, role = ?role, "admin created user");

    Ok(Redirect::to("/admin/users").into_response())
}

pub async fn view_driver(
    State(state): State<Arc<AppState>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> Result<Response> {
    let Some(driver) = state.store.get_user(&id)? else {
        return Ok(Redirect::to("/admin/users").into_response());
    };
    Ok(Html(views::driver_stats(&user, &driver)).into_response())
}

pub async fn edit_user_form(
    State(state): State<Arc<AppState>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> Result<Response> {
    let Some(edit) = state.store.get_user(&id)? else {
        return Ok(Redirect::to("/admin/users").into_response());
    };

    // Admins cannot change another admin's password.
    let can_change_password = !edit.is_admin();
    Ok(Html(views::user_form(&user, &edit, false, can_change_password, &[])).into_response())
}

pub async fn update_user(
    State(state): State<Arc<AppState>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(id): Path<String>,
    Form(form): Form<UserForm>,
) -> Result<Response> {
    let Some(mut edit) = state.store.get_user(&id)? else {
        return Ok(Redirect::to("/admin/users").into_response());
    };

    let can_change_password = !edit.is_admin();

    let mut errors = Vec::new();
    if let Err(e) = validation::validate_email(&form.email) {
        errors.push(e.to_string());
    }
    if let Err(e) = validation::validate_name(&form.name) {
        errors.push(e.to_string());
    }

    let day_hours = parse_hours_field(&form.required_day_hours);
    let night_hours = parse_hours_field(&form.required_night_hours);

    if errors.is_empty() {
        // Reject an email already held by a different account.
        if let Some(existing) = state.store.get_user_by_email(form.email.trim())? {
            if existing.id != edit.id {
                errors.push("Email already in use".to_string());
            }
        }
    }

    edit.email = form.email.trim().to_string();
    edit.name = form.name.trim().to_string();
    edit.required_day_hours = day_hours;
    edit.required_night_hours = night_hours;

    if !errors.is_empty() {
        return Ok(
            Html(views::user_form(&user, &edit, false, can_change_password, &errors))
                .into_response(),
        );
    }

    if !form.password.is_empty() && can_change_password {
        edit.password_hash = hash_password(&form.password)?;
    }

    state.store.save_user(&mut edit)?;

    Ok(Redirect::to("/admin/users").into_response())
}

/// Size of the admin set: the primary slot plus admin-role pool entries.
fn admin_count(state: &AppState) -> Result<usize> {
    let mut count = state
        .store
        .list_users()?
        .iter()
        .filter(|u| u.is_admin())
        .count();
    if state.store.get_admin()?.is_some() {
        count += 1;
    }
    Ok(count)
}

pub async fn delete_user(
    State(state): State<Arc<AppState>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    jar: CookieJar,
    Path(id): Path<String>,
) -> Result<Response> {
    let Some(target) = state.store.get_user(&id)? else {
        return Ok(Redirect::to("/admin/users").into_response());
    };

    // Never remove the last admin account, whether it lives in the primary
    // slot or in the pool.
    if target.is_admin() && admin_count(&state)? <= 1 {
        tracing::warn!(user_id = %id, "refusing to delete the last admin account");
        return Ok(Redirect::to("/admin/users").into_response());
    }

    state.store.delete_user(&id)?;
    tracing::info!(user_id = %id, "admin deleted user");

    // Deleting yourself ends your session.
    if id == user.id {
        let jar = state.sessions.destroy_session(jar)?;
        return Ok((jar, Redirect::to("/login")).into_response());
    }

    Ok(Redirect::to("/admin/users").into_response())
}

pub async fn edit_hours_form(
    State(state): State<Arc<AppState>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> Result<Response> {
    let Some(driver) = state.store.get_user(&id)? else {
        return Ok(Redirect::to("/admin/users").into_response());
    };
    Ok(Html(views::driver_hours(&user, &driver)).into_response())
}

pub async fn update_hours(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Form(form): Form<LogForm>,
) -> Result<Response> {
    let Some(mut driver) = state.store.get_user(&id)? else {
        return Ok(Redirect::to("/admin/users").into_response());
    };

    let back = format!("/admin/users/{id}/hours");
    if form.date.is_empty() {
        return Ok(Redirect::to(&back).into_response());
    }

    apply_log_form(&mut driver.driving_log, &form)?;
    state.store.save_user(&mut driver)?;

    Ok(Redirect::to(&back).into_response())
}

pub async fn profile(Extension(CurrentUser(user)): Extension<CurrentUser>) -> Html<String> {
    Html(views::profile_page(&user, "/admin/profile", &[], None))
}

/// The signed-in admin may live in the primary slot or in the pool; write
/// back to wherever the record came from.
fn save_current_admin(state: &AppState, user: &mut User) -> Result<()> {
    let slot_holds_user = state
        .store
        .get_admin()?
        .is_some_and(|slot| slot.id == user.id);

    if slot_holds_user {
        state.store.save_admin(user)?;
    } else {
        state.store.save_user(user)?;
    }
    Ok(())
}

pub async fn update_profile(
    State(state): State<Arc<AppState>>,
    Extension(CurrentUser(mut user)): Extension<CurrentUser>,
    Form(form): Form<ProfileForm>,
) -> Result<Html<String>> {
    let errors = profile_errors(&user, &form);
    if !errors.is_empty() {
        return Ok(Html(views::profile_page(
            &user,
            "/admin/profile",
            &errors,
            None,
        )));
    }

    user.name = form.name.trim().to_string();
    let success = if form.new_password.is_empty() {
        "Profile updated successfully"
    } else {
        user.password_hash = hash_password(&form.new_password)?;
        "Profile and password updated successfully"
    };

    save_current_admin(&state, &mut user)?;

    Ok(Html(views::profile_page(
        &user,
        "/admin/profile",
        &[],
        Some(success),
    )))
}
