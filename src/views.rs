// SPDX-License-Identifier: MIT

//! Minimal server-rendered views.
//!
//! Deliberately thin: plain string building with HTML escaping, no template
//! engine. Handlers pass fully computed data in; nothing here touches
//! storage.

use axum::http::StatusCode;
use chrono::Timelike;

use crate::calendar::CalendarMonth;
use crate::models::User;

pub fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Time-of-day greeting for the dashboard header.
pub fn greeting() -> &'static str {
    match chrono::Local::now().hour() {
        5..=11 => "Good morning",
        12..=16 => "Good afternoon",
        17..=20 => "Good evening",
        _ => "Good night",
    }
}

fn layout(title: &str, user: Option<&User>, body: &str) -> String {
    let nav = match user {
        Some(u) if u.is_admin() => {
            "<nav><a href=\"/admin\">Dashboard</a> <a href=\"/admin/users\">Users</a> \
             <a href=\"/admin/profile\">Profile</a> \
             <form method=\"post\" action=\"/logout\"><button>Log out</button></form></nav>"
        }
        Some(_) => {
            "<nav><a href=\"/driver\">Dashboard</a> <a href=\"/driver/profile\">Profile</a> \
             <form method=\"post\" action=\"/logout\"><button>Log out</button></form></nav>"
        }
        None => "",
    };

    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head><meta charset=\"utf-8\">\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\
         <title>{} - Driving Hours</title></head>\n\
         <body><header><h1>Driving Hours</h1>{}</header>\n<main>{}</main>\n</body>\n</html>",
        escape(title),
        nav,
        body
    )
}

fn errors_html(errors: &[String]) -> String {
    if errors.is_empty() {
        return String::new();
    }
    let items: String = errors
        .iter()
        .map(|e| format!("<li>{}</li>", escape(e)))
        .collect();
    format!("<ul class=\"errors\">{items}</ul>")
}

pub fn error_page(status: StatusCode, message: &str) -> String {
    layout(
        "Error",
        None,
        &format!(
            "<h2>{}</h2><p>{}</p><p><a href=\"/\">Back</a></p>",
            status.as_u16(),
            escape(message)
        ),
    )
}

pub fn login_page(error: Option<&str>, email: &str) -> String {
    let error_html = error
        .map(|e| format!("<p class=\"error\">{}</p>", escape(e)))
        .unwrap_or_default();

    layout(
        "Login",
        None,
        &format!(
            "<h2>Login</h2>{error_html}\
             <form method=\"post\" action=\"/login\">\
             <label>Email <input type=\"email\" name=\"email\" value=\"{}\" required></label>\
             <label>Password <input type=\"password\" name=\"password\" required></label>\
             <button type=\"submit\">Sign in</button></form>",
            escape(email)
        ),
    )
}

fn progress_section(user: &User) -> String {
    format!(
        "<section class=\"progress\">\
         <p>Day hours: {:.1} / {:.1} ({:.0}%)</p>\
         <p>Night hours: {:.1} / {:.1} ({:.0}%)</p>\
         <p>Total: {:.1}h &middot; weekly average (last 4 weeks): {:.1}h</p>\
         </section>",
        user.total_day_hours(),
        user.required_day_hours,
        user.day_progress(),
        user.total_night_hours(),
        user.required_night_hours,
        user.night_progress(),
        user.total_hours(),
        user.weekly_average(),
    )
}

fn calendar_table(cal: &CalendarMonth, base: &str) -> String {
    let mut rows = String::new();
    for week in cal.days.chunks(7) {
        rows.push_str("<tr>");
        for day in week {
            let mut classes = Vec::new();
            if day.other_month {
                classes.push("other-month");
            }
            if day.today {
                classes.push("today");
            }
            if day.has_entry {
                classes.push("has-entry");
            }
            let hours = day
                .entry
                .map(|e| format!("<span>{:.1}d / {:.1}n</span>", e.day_hours, e.night_hours))
                .unwrap_or_default();
            rows.push_str(&format!(
                "<td class=\"{}\" data-date=\"{}\">{}{}</td>",
                classes.join(" "),
                day.date,
                day.day,
                hours
            ));
        }
        rows.push_str("</tr>");
    }

    format!(
        "<nav class=\"calendar-nav\">\
         <a href=\"{base}?year={}&amp;month={}\">&laquo; prev</a> \
         <strong>{} {}</strong> \
         <a href=\"{base}?year={}&amp;month={}\">next &raquo;</a></nav>\
         <table class=\"calendar\">\
         <tr><th>Sun</th><th>Mon</th><th>Tue</th><th>Wed</th><th>Thu</th><th>Fri</th><th>Sat</th></tr>\
         {rows}</table>",
        cal.prev_year, cal.prev_month, cal.month_name, cal.year, cal.next_year, cal.next_month
    )
}

fn log_form(action: &str) -> String {
    format!(
        "<form method=\"post\" action=\"{action}\">\
         <label>Date <input type=\"date\" name=\"date\" required></label>\
         <fieldset><legend>Day</legend>\
         <input name=\"day_hours\" size=\"3\" inputmode=\"numeric\">h \
         <input name=\"day_minutes\" size=\"3\" inputmode=\"numeric\">m</fieldset>\
         <fieldset><legend>Night</legend>\
         <input name=\"night_hours\" size=\"3\" inputmode=\"numeric\">h \
         <input name=\"night_minutes\" size=\"3\" inputmode=\"numeric\">m</fieldset>\
         <label><input type=\"checkbox\" name=\"delete\" value=\"1\"> Delete this entry</label>\
         <button type=\"submit\">Save</button></form>"
    )
}

/// Log entries as a table, newest date first.
fn entries_table(user: &User) -> String {
    let mut entries: Vec<_> = user.driving_log.iter().collect();
    entries.sort_by(|a, b| b.0.cmp(a.0));

    if entries.is_empty() {
        return "<p>No hours logged yet.</p>".to_string();
    }

    let rows: String = entries
        .iter()
        .map(|(date, e)| {
            format!(
                "<tr><td>{}</td><td>{:.1}</td><td>{:.1}</td></tr>",
                escape(date),
                e.day_hours,
                e.night_hours
            )
        })
        .collect();

    format!(
        "<table class=\"entries\"><tr><th>Date</th><th>Day</th><th>Night</th></tr>{rows}</table>"
    )
}

pub fn driver_dashboard(
    user: &User,
    greeting: &str,
    cal: &CalendarMonth,
    celebrate: bool,
) -> String {
    let celebrate_html = if celebrate {
        "<p class=\"celebrate\">Hours logged &mdash; nice work!</p>"
    } else {
        ""
    };

    layout(
        "Dashboard",
        Some(user),
        &format!(
            "<h2>{}, {}</h2>{}{}{}<h3>Log hours</h3>{}",
            escape(greeting),
            escape(&user.name),
            celebrate_html,
            progress_section(user),
            calendar_table(cal, "/driver"),
            log_form("/driver/log")
        ),
    )
}

pub fn profile_page(
    user: &User,
    action: &str,
    errors: &[String],
    success: Option<&str>,
) -> String {
    let success_html = success
        .map(|s| format!("<p class=\"success\">{}</p>", escape(s)))
        .unwrap_or_default();

    layout(
        "Profile",
        Some(user),
        &format!(
            "<h2>Profile</h2>{}{}\
             <form method=\"post\" action=\"{action}\">\
             <label>Name <input name=\"name\" value=\"{}\" required></label>\
             <label>Current password <input type=\"password\" name=\"current_password\"></label>\
             <label>New password <input type=\"password\" name=\"new_password\"></label>\
             <button type=\"submit\">Save</button></form>",
            errors_html(errors),
            success_html,
            escape(&user.name)
        ),
    )
}

pub fn admin_dashboard(user: &User, drivers: &[User]) -> String {
    let rows: String = drivers
        .iter()
        .map(|d| {
            format!(
                "<tr><td><a href=\"/admin/users/{}\">{}</a></td>\
                 <td>{:.1} / {:.1}</td><td>{:.1} / {:.1}</td><td>{:.1}h</td></tr>",
                d.id,
                escape(&d.name),
                d.total_day_hours(),
                d.required_day_hours,
                d.total_night_hours(),
                d.required_night_hours,
                d.weekly_average()
            )
        })
        .collect();

    layout(
        "Admin Dashboard",
        Some(user),
        &format!(
            "<h2>Drivers</h2>\
             <table class=\"drivers\"><tr><th>Name</th><th>Day</th><th>Night</th>\
             <th>Weekly avg</th></tr>{rows}</table>\
             <p><a href=\"/admin/users/new\">Create user</a></p>"
        ),
    )
}

pub fn admin_users(user: &User, users: &[User]) -> String {
    let rows: String = users
        .iter()
        .map(|u| {
            format!(
                "<tr><td>{}</td><td>{}</td><td>{:?}</td>\
                 <td><a href=\"/admin/users/{id}\">Stats</a> \
                 <a href=\"/admin/users/{id}/edit\">Edit</a> \
                 <a href=\"/admin/users/{id}/hours\">Hours</a> \
                 <form method=\"post\" action=\"/admin/users/{id}/delete\">\
                 <button>Delete</button></form></td></tr>",
                escape(&u.name),
                escape(&u.email),
                u.role,
                id = u.id,
            )
        })
        .collect();

    layout(
        "Manage Users",
        Some(user),
        &format!(
            "<h2>Users</h2>\
             <table class=\"users\"><tr><th>Name</th><th>Email</th><th>Role</th>\
             <th>Actions</th></tr>{rows}</table>\
             <p><a href=\"/admin/users/new\">Create user</a></p>"
        ),
    )
}

pub fn user_form(
    user: &User,
    edit: &User,
    is_new: bool,
    can_change_password: bool,
    errors: &[String],
) -> String {
    let (title, action) = if is_new {
        ("Create User".to_string(), "/admin/users".to_string())
    } else {
        (
            format!("Edit {}", edit.name),
            format!("/admin/users/{}", edit.id),
        )
    };

    let role_field = if is_new {
        "<label>Role <select name=\"role\">\
         <option value=\"driver\">Driver</option>\
         <option value=\"admin\">Admin</option></select></label>"
            .to_string()
    } else {
        String::new()
    };

    let password_field = if can_change_password {
        "<label>Password <input type=\"password\" name=\"password\"></label>".to_string()
    } else {
        String::new()
    };

    layout(
        &title,
        Some(user),
        &format!(
            "<h2>{}</h2>{}\
             <form method=\"post\" action=\"{action}\">\
             <label>Email <input type=\"email\" name=\"email\" value=\"{}\" required></label>\
             <label>Name <input name=\"name\" value=\"{}\" required></label>\
             {role_field}{password_field}\
             <label>Required day hours <input name=\"required_day_hours\" value=\"{}\"></label>\
             <label>Required night hours <input name=\"required_night_hours\" value=\"{}\"></label>\
             <button type=\"submit\">Save</button></form>",
            escape(&title),
            errors_html(errors),
            escape(&edit.email),
            escape(&edit.name),
            edit.required_day_hours,
            edit.required_night_hours,
        ),
    )
}

pub fn driver_stats(user: &User, driver: &User) -> String {
    layout(
        &format!("{} - Statistics", driver.name),
        Some(user),
        &format!(
            "<h2>{}</h2><p>{}</p>{}{}\
             <p><a href=\"/admin/users/{}/hours\">Edit hours</a></p>",
            escape(&driver.name),
            escape(&driver.email),
            progress_section(driver),
            entries_table(driver),
            driver.id
        ),
    )
}

pub fn driver_hours(user: &User, driver: &User) -> String {
    layout(
        &format!("{} - Edit Hours", driver.name),
        Some(user),
        &format!(
            "<h2>Hours for {}</h2>{}<h3>Add or change an entry</h3>{}",
            escape(&driver.name),
            entries_table(driver),
            log_form(&format!("/admin/users/{}/hours", driver.id))
        ),
    )
}
