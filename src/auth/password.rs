// SPDX-License-Identifier: MIT

//! Password hashing and random credential generation.
//!
//! Hashing is bcrypt (salted, deliberately slow); the hash library performs
//! the constant-time comparison during verification. Generated passwords
//! come from the system CSPRNG, never a general-purpose PRNG.

use anyhow::{anyhow, Context};
use ring::rand::{SecureRandom, SystemRandom};

/// Character set for generated passwords. 62 symbols is just under 6 bits
/// per character, so the default 16-character password carries ~95 bits of
/// entropy.
const PASSWORD_CHARSET: &[u8] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

pub fn hash_password(password: &str) -> anyhow::Result<String> {
    bcrypt::hash(password, bcrypt::DEFAULT_COST).context("failed to hash password")
}

/// Check a password against a stored hash. A malformed hash counts as a
/// mismatch rather than an error.
pub fn verify_password(password: &str, hash: &str) -> bool {
    bcrypt::verify(password, hash).unwrap_or(false)
}

/// Generate a random password over [`PASSWORD_CHARSET`]. Rejection sampling
/// keeps the character distribution uniform.
pub fn generate_password(length: usize) -> anyhow::Result<String> {
    let rng = SystemRandom::new();
    let mut password = String::with_capacity(length);
    let mut byte = [0u8; 1];

    // Largest multiple of the charset size that fits in a byte; draws at or
    // above it are rejected to avoid modulo bias.
    let limit = 256 / PASSWORD_CHARSET.len() * PASSWORD_CHARSET.len();

    while password.len() < length {
        rng.fill(&mut byte)
            .map_err(|_| anyhow!("system random source unavailable"))?;
        let v = byte[0] as usize;
        if v < limit {
            password.push(PASSWORD_CHARSET[v % PASSWORD_CHARSET.len()] as char);
        }
    }

    Ok(password)
}
