// SPDX-License-Identifier: MIT

//! Driver dashboard, hour logging, and profile.

use axum::{
    extract::{Query, State},
    response::{Html, IntoResponse, Redirect, Response},
    Extension, Form,
};
use chrono::Datelike;
use serde::Deserialize;
use std::sync::Arc;

use crate::auth::password::{hash_password, verify_password};
use crate::calendar;
use crate::error::Result;
use crate::middleware::auth::CurrentUser;
use crate::models::DayEntry;
use crate::validation;
use crate::views;
use crate::AppState;

/// Query and form fields arrive as strings; HTML forms submit empty fields
/// as empty strings, which simply parse to zero.
fn parse_number<T: std::str::FromStr + Default>(s: &str) -> T {
    s.trim().parse().unwrap_or_default()
}

#[derive(Deserialize, Default)]
pub struct DashboardQuery {
    #[serde(default)]
    year: String,
    #[serde(default)]
    month: String,
    #[serde(default)]
    celebrate: String,
}

pub async fn dashboard(
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Query(query): Query<DashboardQuery>,
) -> Html<String> {
    let today = chrono::Local::now().date_naive();

    let mut year: i32 = parse_number(&query.year);
    let mut month: u32 = parse_number(&query.month);
    if year == 0 {
        year = today.year();
    }
    if month == 0 {
        month = today.month();
    }

    let cal = calendar::month_view(
        year,
        month,
        |date| user.driving_log.has_entry(date),
        |date| user.driving_log.entry(date),
    );

    Html(views::driver_dashboard(
        &user,
        views::greeting(),
        &cal,
        query.celebrate == "1",
    ))
}

#[derive(Deserialize, Default)]
pub struct LogForm {
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub delete: String,
    #[serde(default)]
    pub day_hours: String,
    #[serde(default)]
    pub day_minutes: String,
    #[serde(default)]
    pub night_hours: String,
    #[serde(default)]
    pub night_minutes: String,
}

impl LogForm {
    /// Combine hour and minute fields into decimal hours.
    pub fn decimal_hours(&self) -> (f64, f64) {
        let day = parse_number::<f64>(&self.day_hours) + parse_number::<f64>(&self.day_minutes) / 60.0;
        let night =
            parse_number::<f64>(&self.night_hours) + parse_number::<f64>(&self.night_minutes) / 60.0;
        (day, night)
    }
}

/// Apply a log form to a driving log. Shared with the admin hours editor.
pub fn apply_log_form(
    log: &mut crate::models::DrivingLog,
    form: &LogForm,
) -> Result<bool> {
    validation::validate_date(&form.date)?;

    if form.delete == "1" {
        log.remove_entry(&form.date);
        return Ok(false);
    }

    let (day_hours, night_hours) = form.decimal_hours();
    validation::validate_hours(day_hours)?;
    validation::validate_hours(night_hours)?;

    let entry = DayEntry {
        day_hours,
        night_hours,
    };
    let logged = !entry.is_empty();
    log.set_entry(&form.date, entry);
    Ok(logged)
}

pub async fn log_hours(
    State(state): State<Arc<AppState>>,
    Extension(CurrentUser(mut user)): Extension<CurrentUser>,
    Form(form): Form<LogForm>,
) -> Result<Response> {
    if form.date.is_empty() {
        return Ok(Redirect::to("/driver?error=date_required").into_response());
    }

    let logged = apply_log_form(&mut user.driving_log, &form)?;
    state.store.save_user(&mut user)?;

    // Only celebrate when hours were actually logged.
    let target = if logged { "/driver?celebrate=1" } else { "/driver" };
    Ok(Redirect::to(target).into_response())
}

#[derive(Deserialize, Default)]
pub struct ProfileForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub current_password: String,
    #[serde(default)]
    pub new_password: String,
}

pub async fn profile(Extension(CurrentUser(user)): Extension<CurrentUser>) -> Html<String> {
    Html(views::profile_page(&user, "/driver/profile", &[], None))
}

/// Validate a profile form against the signed-in user. Returns the list of
/// problems; empty means the update may proceed.
pub fn profile_errors(user: &crate::models::User, form: &ProfileForm) -> Vec<String> {
    let mut errors = Vec::new();

    if let Err(e) = validation::validate_name(&form.name) {
        errors.push(e.to_string());
    }

    if !form.new_password.is_empty() {
        if form.current_password.is_empty() {
            errors.push("Current password is required to set a new password".to_string());
        } else if !verify_password(&form.current_password, &user.password_hash) {
            errors.push("Current password is incorrect".to_string());
        } else if let Err(e) = validation::validate_password(&form.new_password) {
            errors.push(e.to_string());
        }
    }

    errors
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
            "/driver/profile",
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

    state.store.save_user(&mut user)?;

    Ok(Html(views::profile_page(
        &user,
        "/driver/profile",
        &[],
        Some(success),
    )))
}
