// SPDX-License-Identifier: MIT

//! Cookie-backed session management over the session store.

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use ring::rand::{SecureRandom, SystemRandom};

use crate::error::{AppError, Result};
use crate::models::session::SESSION_DURATION_DAYS;
use crate::models::{Session, User};
use crate::storage::JsonStore;

pub const SESSION_COOKIE: &str = "session";

/// Raw token length in bytes, before URL-safe base64 encoding.
pub const TOKEN_BYTES: usize = 32;

#[derive(Clone)]
pub struct SessionManager {
    store: JsonStore,
    secure: bool,
}

impl SessionManager {
    pub fn new(store: JsonStore, secure: bool) -> Self {
        Self { store, secure }
    }

    /// Generate a cryptographically random, URL-safe session token.
    pub fn generate_token() -> Result<String> {
        let mut bytes = [0u8; TOKEN_BYTES];
        SystemRandom::new()
            .fill(&mut bytes)
            .map_err(|_| AppError::Internal(anyhow::anyhow!("system random source unavailable")))?;
        Ok(URL_SAFE_NO_PAD.encode(bytes))
    }

    /// Create and persist a session for the user; returns the jar with the
    /// session cookie added.
    pub fn create_session(&self, jar: CookieJar, user_id: &str) -> Result<CookieJar> {
        let token = Self::generate_token()?;
        let session = Session::new(token.clone(), user_id.to_string());
        self.store.save_session(&session)?;

        let cookie = Cookie::build((SESSION_COOKIE, token))
            .path("/")
            .http_only(true)
            .secure(self.secure)
            .same_site(SameSite::Lax)
            .max_age(time::Duration::days(SESSION_DURATION_DAYS))
            .build();

        Ok(jar.add(cookie))
    }

    /// Delete the current session (if any) and clear the cookie.
    pub fn destroy_session(&self, jar: CookieJar) -> Result<CookieJar> {
        if let Some(cookie) = jar.get(SESSION_COOKIE) {
            self.store.delete_session(cookie.value())?;
        }
        Ok(jar.remove(Cookie::build((SESSION_COOKIE, "")).path("/").build()))
    }

    /// Resolve the user behind the session cookie, if the session is valid.
    pub fn user_from_jar(&self, jar: &CookieJar) -> Result<Option<User>> {
        let Some(cookie) = jar.get(SESSION_COOKIE) else {
            return Ok(None);
        };
        let Some(session) = self.store.get_session(cookie.value())? else {
            return Ok(None);
        };
        self.user_for_id(&session.user_id)
    }

    /// Look a user up by id across the primary admin slot and the pool.
    pub fn user_for_id(&self, user_id: &str) -> Result<Option<User>> {
        if let Some(admin) = self.store.get_admin()? {
            if admin.id == user_id {
                return Ok(Some(admin));
            }
        }
        Ok(self.store.get_user(user_id)?)
    }
}
