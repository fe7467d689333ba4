// SPDX-License-Identifier: MIT

//! Flat-file JSON store for users, the primary admin slot, and sessions.
//!
//! No in-memory cache: every read hits disk. Two reader/writer locks, one
//! guarding all user-file and admin-slot I/O and one guarding the sessions
//! document, serialize concurrent access per collection.

use chrono::Utc;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use crate::models::{Role, Session, User};

use super::layout;

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("storage I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to decode record at {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to encode record: {0}")]
    Encode(#[source] serde_json::Error),
}

type Result<T> = std::result::Result<T, StorageError>;

struct StoreInner {
    data_dir: PathBuf,
    /// Guards all user-file and admin-slot I/O.
    records: RwLock<()>,
    /// Guards the consolidated sessions document.
    sessions: RwLock<()>,
}

/// Handle to the flat-file store. Cheap to clone; all clones share the same
/// locks.
#[derive(Clone)]
pub struct JsonStore {
    inner: Arc<StoreInner>,
}

/// The single document holding every session, keyed by token. The whole
/// collection is loaded and rewritten together so expiry sweeps stay simple.
#[derive(Debug, Default, Serialize, Deserialize)]
struct SessionsFile {
    #[serde(default)]
    sessions: HashMap<String, Session>,
}

impl JsonStore {
    pub fn new(data_dir: impl Into<PathBuf>) -> Result<Self> {
        let data_dir = data_dir.into();
        let users_dir = data_dir.join(layout::USERS_DIR);
        fs::create_dir_all(&users_dir).map_err(|e| StorageError::Io {
            path: users_dir,
            source: e,
        })?;

        Ok(Self {
            inner: Arc::new(StoreInner {
                data_dir,
                records: RwLock::new(()),
                sessions: RwLock::new(()),
            }),
        })
    }

    fn user_path(&self, id: &str) -> PathBuf {
        self.inner
            .data_dir
            .join(layout::USERS_DIR)
            .join(format!("{id}.json"))
    }

    fn admin_path(&self) -> PathBuf {
        self.inner.data_dir.join(layout::ADMIN_FILE)
    }

    fn sessions_path(&self) -> PathBuf {
        self.inner.data_dir.join(layout::SESSIONS_FILE)
    }

    // --- User operations -------------------------------------------------

    /// Read one user record; `None` if no record exists for the id.
    pub fn get_user(&self, id: &str) -> Result<Option<User>> {
        let _guard = self.inner.records.read().unwrap();
        self.get_user_unlocked(id)
    }

    fn get_user_unlocked(&self, id: &str) -> Result<Option<User>> {
        // Ids are generated UUIDs; anything path-like is not a record.
        if !valid_id(id) {
            return Ok(None);
        }
        read_json(&self.user_path(id))
    }

    /// Linear scan by exact (case-sensitive) email, primary admin slot first.
    pub fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let _guard = self.inner.records.read().unwrap();

        if let Some(admin) = read_json::<User>(&self.admin_path())? {
            if admin.email == email {
                return Ok(Some(admin));
            }
        }

        for user in self.list_users_unlocked()? {
            if user.email == email {
                return Ok(Some(user));
            }
        }

        Ok(None)
    }

    /// Enumerate every record in the user pool. Unreadable or corrupt
    /// records are skipped so one bad file cannot take down the listing.
    pub fn list_users(&self) -> Result<Vec<User>> {
        let _guard = self.inner.records.read().unwrap();
        self.list_users_unlocked()
    }

    fn list_users_unlocked(&self) -> Result<Vec<User>> {
        let users_dir = self.inner.data_dir.join(layout::USERS_DIR);
        let entries = match fs::read_dir(&users_dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(StorageError::Io {
                    path: users_dir,
                    source: e,
                })
            }
        };

        let mut users = Vec::new();
        for entry in entries {
            let path = match entry {
                Ok(entry) => entry.path(),
                Err(err) => {
                    tracing::warn!(error = %err, "skipping unreadable directory entry");
                    continue;
                }
            };
            if path.is_dir() || path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            match read_json::<User>(&path) {
                Ok(Some(user)) => users.push(user),
                Ok(None) => {}
                Err(err) => {
                    tracing::warn!(path = %path.display(), error = %err, "skipping unreadable user record");
                }
            }
        }

        Ok(users)
    }

    pub fn list_drivers(&self) -> Result<Vec<User>> {
        Ok(self
            .list_users()?
            .into_iter()
            .filter(|u| u.role == Role::Driver)
            .collect())
    }

    /// Upsert a user record, stamping `updated_at`.
    pub fn save_user(&self, user: &mut User) -> Result<()> {
        let _guard = self.inner.records.write().unwrap();
        user.updated_at = Utc::now();
        write_json(&self.user_path(&user.id), user)
    }

    /// Remove a user record. Deleting a non-existent id is not an error.
    pub fn delete_user(&self, id: &str) -> Result<()> {
        let _guard = self.inner.records.write().unwrap();
        if !valid_id(id) {
            return Ok(());
        }
        let path = self.user_path(id);
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StorageError::Io { path, source: e }),
        }
    }

    // --- Admin slot operations -------------------------------------------

    /// Read the primary admin slot; `None` if the slot is unpopulated.
    pub fn get_admin(&self) -> Result<Option<User>> {
        let _guard = self.inner.records.read().unwrap();
        read_json(&self.admin_path())
    }

    /// Write the primary admin slot, stamping `updated_at`.
    pub fn save_admin(&self, admin: &mut User) -> Result<()> {
        let _guard = self.inner.records.write().unwrap();
        admin.updated_at = Utc::now();
        write_json(&self.admin_path(), admin)
    }

    // --- Session operations ----------------------------------------------

    /// Look up a session by token. Expired sessions are treated as
    /// nonexistent even if they have not been swept yet.
    pub fn get_session(&self, token: &str) -> Result<Option<Session>> {
        let _guard = self.inner.sessions.read().unwrap();
        let file = self.load_sessions()?;
        Ok(file
            .sessions
            .get(token)
            .filter(|s| !s.is_expired())
            .cloned())
    }

    /// Insert or overwrite a session by token; atomic rewrite of the whole
    /// collection.
    pub fn save_session(&self, session: &Session) -> Result<()> {
        let _guard = self.inner.sessions.write().unwrap();
        let mut file = self.load_sessions()?;
        file.sessions.insert(session.token.clone(), session.clone());
        self.store_sessions(&file)
    }

    /// Remove a session if present; no-op otherwise.
    pub fn delete_session(&self, token: &str) -> Result<()> {
        let _guard = self.inner.sessions.write().unwrap();
        let mut file = self.load_sessions()?;
        file.sessions.remove(token);
        self.store_sessions(&file)
    }

    /// Remove every session whose expiry has passed. Returns the number of
    /// sessions removed.
    pub fn sweep_expired_sessions(&self) -> Result<usize> {
        let _guard = self.inner.sessions.write().unwrap();
        let mut file = self.load_sessions()?;
        let before = file.sessions.len();
        file.sessions.retain(|_, s| !s.is_expired());
        let removed = before - file.sessions.len();
        self.store_sessions(&file)?;
        Ok(removed)
    }

    fn load_sessions(&self) -> Result<SessionsFile> {
        Ok(read_json(&self.sessions_path())?.unwrap_or_default())
    }

    fn store_sessions(&self, file: &SessionsFile) -> Result<()> {
        write_json(&self.sessions_path(), file)
    }
}

fn valid_id(id: &str) -> bool {
    !id.is_empty() && !id.contains(['/', '\\']) && id != "." && id != ".."
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    let data = match fs::read(path) {
        Ok(data) => data,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(e) => {
            return Err(StorageError::Io {
                path: path.to_path_buf(),
                source: e,
            })
        }
    };
    serde_json::from_slice(&data)
        .map(Some)
        .map_err(|e| StorageError::Decode {
            path: path.to_path_buf(),
            source: e,
        })
}

/// Write via a temp file in the same directory and an atomic rename, so a
/// crash or a concurrent read never observes a partially written record.
fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let data = serde_json::to_vec_pretty(value).map_err(StorageError::Encode)?;

    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    let tmp = dir.join(format!(".tmp-{}", uuid::Uuid::new_v4()));

    let result = (|| {
        fs::write(&tmp, &data)?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&tmp, fs::Permissions::from_mode(0o600))?;
        }
        fs::rename(&tmp, path)
    })();

    if let Err(e) = result {
        let _ = fs::remove_file(&tmp);
        return Err(StorageError::Io {
            path: path.to_path_buf(),
            source: e,
        });
    }

    Ok(())
}
