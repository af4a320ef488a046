//! Auth service: user registry, password verification, and session tokens.
//!
//! Passwords are stored as hex sha256(salt || password) with a random
//! per-user salt. Sessions are opaque uuid tokens handed to the client in an
//! http-only cookie; there is no expiry beyond server restart (the store is
//! in-memory anyway).

use std::collections::HashMap;

use axum::http::HeaderMap;
use serde::Serialize;
use sha2::{Digest, Sha256};
use thiserror::Error;
use uuid::Uuid;

pub const SESSION_COOKIE: &str = "taskdeckSession";

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Email already in use")]
    EmailInUse,

    #[error("Invalid credentials")]
    InvalidCredentials,
}

/// Public user shape (never carries hash or salt).
#[derive(Debug, Clone, Serialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone)]
struct UserRecord {
    user: User,
    salt: String,
    password_hash: String,
}

/// In-memory user and session storage.
pub struct AuthService {
    /// user_id -> record
    users: HashMap<String, UserRecord>,
    /// lowercase email -> user_id
    emails: HashMap<String, String>,
    /// session token -> user_id
    sessions: HashMap<String, String>,
}

impl AuthService {
    pub fn new() -> Self {
        Self {
            users: HashMap::new(),
            emails: HashMap::new(),
            sessions: HashMap::new(),
        }
    }

    fn hash_password(salt: &str, password: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(salt.as_bytes());
        hasher.update(password.as_bytes());
        hex::encode(hasher.finalize())
    }

    /// Register a new user and open a session for them.
    pub fn register(
        &mut self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<(User, String), AuthError> {
        let email_key = email.to_lowercase();
        if self.emails.contains_key(&email_key) {
            return Err(AuthError::EmailInUse);
        }
        let salt = Uuid::new_v4().simple().to_string();
        let user = User {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            email: email_key.clone(),
        };
        let record = UserRecord {
            user: user.clone(),
            password_hash: Self::hash_password(&salt, password),
            salt,
        };
        self.emails.insert(email_key, user.id.clone());
        self.users.insert(user.id.clone(), record);
        log::info!("[auth] registered user {} ({})", user.name, user.id);
        let token = self.open_session(&user.id);
        Ok((user, token))
    }

    /// Verify credentials and open a session. The error does not reveal
    /// whether the email or the password was wrong.
    pub fn login(&mut self, email: &str, password: &str) -> Result<(User, String), AuthError> {
        let user_id = self
            .emails
            .get(&email.to_lowercase())
            .cloned()
            .ok_or(AuthError::InvalidCredentials)?;
        let record = self
            .users
            .get(&user_id)
            .ok_or(AuthError::InvalidCredentials)?;
        if Self::hash_password(&record.salt, password) != record.password_hash {
            return Err(AuthError::InvalidCredentials);
        }
        let user = record.user.clone();
        let token = self.open_session(&user_id);
        Ok((user, token))
    }

    fn open_session(&mut self, user_id: &str) -> String {
        let token = Uuid::new_v4().simple().to_string();
        self.sessions.insert(token.clone(), user_id.to_string());
        token
    }

    pub fn logout(&mut self, token: &str) {
        self.sessions.remove(token);
    }

    /// Resolve a session token to its user, if the session is live.
    pub fn user_for_token(&self, token: &str) -> Option<User> {
        let user_id = self.sessions.get(token)?;
        self.users.get(user_id).map(|r| r.user.clone())
    }
}

impl Default for AuthService {
    fn default() -> Self {
        Self::new()
    }
}

/// Pull the session token out of the request's Cookie header.
pub fn session_token(headers: &HeaderMap) -> Option<String> {
    let cookies = headers.get("cookie")?.to_str().ok()?;
    cookies.split(';').find_map(|pair| {
        let (name, value) = pair.trim().split_once('=')?;
        if name == SESSION_COOKIE {
            Some(value.to_string())
        } else {
            None
        }
    })
}

/// Set-Cookie value establishing a session.
pub fn session_cookie(token: &str) -> String {
    format!(
        "{}={}; HttpOnly; SameSite=Lax; Path=/",
        SESSION_COOKIE, token
    )
}

/// Set-Cookie value clearing the session.
pub fn clear_session_cookie() -> String {
    format!("{}=; Max-Age=0; HttpOnly; Path=/", SESSION_COOKIE)
}
