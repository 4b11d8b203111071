//! services/taskflow/src/stores/session.rs
//!
//! Account registration, credential checks, and the single "current user" pointer.

use crate::adapters::records::{SessionUserRecord, UserRecord};
use crate::error::AuthError;
use crate::stores::{json, keys};
use chrono::Utc;
use regex::Regex;
use std::sync::{Arc, LazyLock};
use taskflow_core::domain::{new_id, SessionUser, User};
use taskflow_core::ports::{KeyValueStore, PasswordHasher, PortResult};
use tracing::{error, info, warn};

pub const MIN_PASSWORD_CHARS: usize = 6;

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"));

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Owns the user collection and the current-session pointer.
#[derive(Clone)]
pub struct SessionStore {
    store: Arc<dyn KeyValueStore>,
    hasher: Arc<dyn PasswordHasher>,
}

impl SessionStore {
    pub fn new(store: Arc<dyn KeyValueStore>, hasher: Arc<dyn PasswordHasher>) -> Self {
        Self { store, hasher }
    }

    /// Creates an account and signs it in.
    pub fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<SessionUser, AuthError> {
        // 1. Validate the input
        if name.trim().is_empty() || email.trim().is_empty() || password.trim().is_empty() {
            return Err(AuthError::Validation("all fields are required".to_string()));
        }
        if password.chars().count() < MIN_PASSWORD_CHARS {
            return Err(AuthError::Validation(format!(
                "password must be at least {} characters",
                MIN_PASSWORD_CHARS
            )));
        }
        let email = normalize_email(email);
        if !EMAIL_RE.is_match(&email) {
            return Err(AuthError::Validation(format!("'{}' is not a valid email", email)));
        }

        // 2. Enforce email uniqueness
        let mut users = self.load_users()?;
        if users.iter().any(|u| u.email == email) {
            return Err(AuthError::DuplicateEmail);
        }

        // 3. Hash the password and persist the account
        let user = User {
            id: new_id(),
            name: name.trim().to_string(),
            email,
            password_hash: self.hasher.hash(password)?,
            created_at: Utc::now(),
        };
        users.push(UserRecord::from_domain(&user));
        json::write(self.store.as_ref(), keys::USERS, &users)?;

        // 4. Sign the new account in; an account that cannot be signed in is withdrawn
        match self.establish(&user) {
            Ok(session) => {
                info!(user_id = %user.id, "account registered");
                Ok(session)
            }
            Err(e) => {
                users.pop();
                if let Err(rollback) = json::write(self.store.as_ref(), keys::USERS, &users) {
                    error!(user_id = %user.id, error = %rollback, "failed to withdraw account");
                }
                Err(e)
            }
        }
    }

    /// Checks credentials and signs the matching account in.
    pub fn login(&self, email: &str, password: &str) -> Result<SessionUser, AuthError> {
        if email.trim().is_empty() || password.trim().is_empty() {
            return Err(AuthError::Validation("email and password are required".to_string()));
        }

        let email = normalize_email(email);
        let users = self.load_users()?;
        let Some(record) = users.into_iter().find(|u| u.email == email) else {
            return Err(AuthError::InvalidCredentials);
        };
        if !self.hasher.verify(password, &record.password_hash)? {
            warn!(user_id = %record.id, "login rejected");
            return Err(AuthError::InvalidCredentials);
        }

        let user = record.to_domain();
        info!(user_id = %user.id, "logged in");
        self.establish(&user)
    }

    /// Clears the session pointer. Calling it while logged out is a no-op.
    pub fn logout(&self) -> PortResult<()> {
        self.store.remove(keys::CURRENT_USER).map_err(|e| {
            error!(error = %e, "failed to clear the session");
            e
        })?;
        info!("logged out");
        Ok(())
    }

    /// The signed-in user, if any. Missing or unreadable pointers read as `None`.
    pub fn current_session(&self) -> Option<SessionUser> {
        let record: Option<SessionUserRecord> =
            json::read_or_default(self.store.as_ref(), keys::CURRENT_USER);
        record.map(SessionUserRecord::to_domain)
    }

    /// Every registered account, without password hashes.
    pub fn users(&self) -> Result<Vec<SessionUser>, AuthError> {
        Ok(self
            .load_users()?
            .into_iter()
            .map(|u| u.to_domain().to_session())
            .collect())
    }

    /// A damaged user list is an error here, never an empty list.
    fn load_users(&self) -> Result<Vec<UserRecord>, AuthError> {
        Ok(json::read::<Vec<UserRecord>>(self.store.as_ref(), keys::USERS)?.unwrap_or_default())
    }

    fn establish(&self, user: &User) -> Result<SessionUser, AuthError> {
        let session = user.to_session();
        json::write(
            self.store.as_ref(),
            keys::CURRENT_USER,
            &SessionUserRecord::from_domain(&session),
        )?;
        Ok(session)
    }
}
