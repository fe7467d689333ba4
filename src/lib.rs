// SPDX-License-Identifier: MIT

//! Driving-Hours: track driver logged hours against admin-set requirements.
//!
//! Server-rendered web application with two roles (admin, driver),
//! cookie-based sessions, and JSON-file-backed persistence under a single
//! data directory.

pub mod auth;
pub mod calendar;
pub mod config;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod storage;
pub mod validation;
pub mod views;

use auth::SessionManager;
use config::Config;
use storage::JsonStore;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub store: JsonStore,
    pub sessions: SessionManager,
}
