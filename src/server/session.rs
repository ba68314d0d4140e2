//! Per-session storage of the most recently generated script.
//!
//! Sessions are identified by a random id carried in a signed `session` cookie. The store
//! lives in [`AppState`](super::state::AppState) and is handed to handlers explicitly.

use std::collections::HashMap;
use std::convert::Infallible;

use axum::extract::FromRequestParts;
use axum::http::header::COOKIE;
use axum::http::request::Parts;
use axum::http::HeaderValue;
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use chrono::{DateTime, Duration, Utc};
use hmac::{Hmac, Mac};
use parking_lot::Mutex;
use sha2::Sha256;

use super::state::AppState;

pub const SESSION_COOKIE: &str = "session";

type HmacSha256 = Hmac<Sha256>;

#[derive(Debug, Clone)]
struct StoredScript {
    code: String,
    created_at: DateTime<Utc>,
}

/// Last generated script per session, last write wins.
///
/// At most `max_scripts` sessions are kept; storing for a new session beyond that evicts
/// the oldest script.
pub struct SessionStore {
    signer: HmacSha256,
    max_scripts: usize,
    scripts: Mutex<HashMap<String, StoredScript>>,
}

impl SessionStore {
    /// Creates an empty store whose cookies are signed with `secret_key`.
    pub fn new(secret_key: &str, max_scripts: usize) -> Self {
        let signer = HmacSha256::new_from_slice(secret_key.as_bytes())
            .expect("HMAC can take a key of any size");
        Self {
            signer,
            max_scripts: max_scripts.max(1),
            scripts: Mutex::new(HashMap::new()),
        }
    }

    /// Builds the cookie value `<id>.<signature>` for a session id.
    pub fn sign(&self, session_id: &str) -> String {
        let mut mac = self.signer.clone();
        mac.update(session_id.as_bytes());
        let signature = URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes());
        format!("{session_id}.{signature}")
    }

    /// Returns the session id of a cookie value when its signature checks out.
    pub fn verify(&self, cookie_value: &str) -> Option<String> {
        let (session_id, signature) = cookie_value.rsplit_once('.')?;
        let signature = URL_SAFE_NO_PAD.decode(signature).ok()?;

        let mut mac = self.signer.clone();
        mac.update(session_id.as_bytes());
        mac.verify_slice(&signature).ok()?;

        Some(session_id.to_string())
    }

    pub fn store_script(&self, session_id: &str, code: String, now: DateTime<Utc>) {
        let mut scripts = self.scripts.lock();

        while !scripts.contains_key(session_id) && scripts.len() >= self.max_scripts {
            let Some(oldest) = scripts
                .iter()
                .min_by_key(|(_, stored)| stored.created_at)
                .map(|(id, _)| id.clone())
            else {
                break;
            };
            scripts.remove(&oldest);
            tracing::debug!(session = %oldest, "Evicted oldest script, session limit reached");
        }

        scripts.insert(session_id.to_string(), StoredScript { code, created_at: now });
    }

    pub fn script(&self, session_id: &str) -> Option<String> {
        self.scripts.lock().get(session_id).map(|stored| stored.code.clone())
    }

    /// Drops every script older than `ttl` and returns how many were removed.
    pub fn sweep(&self, now: DateTime<Utc>, ttl: Duration) -> usize {
        let mut scripts = self.scripts.lock();
        let before = scripts.len();
        scripts.retain(|_, stored| now - stored.created_at <= ttl);
        before - scripts.len()
    }

    pub fn len(&self) -> usize {
        self.scripts.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// The caller's session, taken from a valid `session` cookie or freshly allocated.
#[derive(Debug, Clone)]
pub struct Session {
    pub id: String,
    pub is_new: bool,
}

impl Session {
    /// `Set-Cookie` value to send back when the session was allocated for this request.
    pub fn set_cookie(&self, store: &SessionStore) -> Option<HeaderValue> {
        if !self.is_new {
            return None;
        }
        let cookie = format!(
            "{SESSION_COOKIE}={}; HttpOnly; SameSite=Lax; Path=/",
            store.sign(&self.id)
        );
        HeaderValue::from_str(&cookie).ok()
    }
}

impl FromRequestParts<AppState> for Session {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let existing = parts
            .headers
            .get_all(COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .flat_map(|header| header.split(';'))
            .filter_map(|pair| pair.trim().strip_prefix(SESSION_COOKIE)?.strip_prefix('='))
            .find_map(|value| state.sessions.verify(value));

        Ok(match existing {
            Some(id) => Session { id, is_new: false },
            None => Session {
                id: uuid::Uuid::new_v4().to_string(),
                is_new: true,
            },
        })
    }
}
