// SPDX-License-Identifier: MIT

//! First-run initialization: make sure an admin identity exists before the
//! service accepts traffic.

use crate::models::{Role, User};

use super::json::JsonStore;

/// Placeholder email for the bootstrap admin account.
pub const BOOTSTRAP_ADMIN_EMAIL: &str = "admin@localhost";
pub const BOOTSTRAP_ADMIN_NAME: &str = "Admin";

/// Freshly generated credentials for the primary admin. The plaintext
/// password exists only in this value: it is reported once to the operator
/// and never persisted or logged.
#[derive(Debug)]
pub struct AdminCredentials {
    pub email: String,
    pub password: String,
}

/// Populate the primary admin slot if it is empty.
///
/// Returns the generated credentials when this run created the admin, `None`
/// when the slot was already populated. The hasher and password generator
/// are passed in rather than hard-wired so callers (and tests) choose the
/// implementations.
pub fn initialize<H, G>(
    store: &JsonStore,
    hash_password: H,
    generate_password: G,
    password_length: usize,
) -> anyhow::Result<Option<AdminCredentials>>
where
    H: Fn(&str) -> anyhow::Result<String>,
    G: Fn(usize) -> anyhow::Result<String>,
{
    if store.get_admin()?.is_some() {
        return Ok(None);
    }

    let password = generate_password(password_length)?;
    let hash = hash_password(&password)?;

    let mut admin = User::new(BOOTSTRAP_ADMIN_EMAIL, BOOTSTRAP_ADMIN_NAME, hash, Role::Admin);
    store.save_admin(&mut admin)?;

    tracing::info!(email = BOOTSTRAP_ADMIN_EMAIL, "created primary admin account");

    Ok(Some(AdminCredentials {
        email: admin.email,
        password,
    }))
}
