//! Authenticated session state.
//!
//! The session is an explicit, injected object rather than ambient
//! global state: the app creates a [`SessionStore`] at startup,
//! hydrates from disk, hands the [`Session`] to the API client, and
//! clears the store on sign-out. The token and profile are the only
//! data this client ever persists; domain data never touches disk.

use base64::Engine;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::config::Config;
use crate::error::Result;

/// Login response from `POST /auth/login` and `POST /auth/google`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginData {
    pub token: String,
    /// The backend sends this as a string.
    pub user_id: String,
    pub name: String,
    #[serde(default)]
    pub avatar: Option<String>,
}

/// The signed-in user and their bearer token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub user_id: i64,
    pub name: String,
    #[serde(default)]
    pub avatar: Option<String>,
    pub token: String,
}

impl Session {
    /// Build a session from a login response. A non-numeric user id
    /// degrades to 0 rather than failing the sign-in.
    pub fn from_login(data: LoginData) -> Self {
        Self {
            user_id: data.user_id.parse().unwrap_or_default(),
            name: data.name,
            avatar: data.avatar,
            token: data.token,
        }
    }

    /// Whether this session's token is past its `exp` claim.
    pub fn is_expired(&self) -> bool {
        token_expired(&self.token)
    }
}

/// Whether a JWT is expired.
///
/// Decodes the payload segment (base64url, no padding) and compares
/// the `exp` claim to now. Any malformed token counts as expired; the
/// caller will just re-authenticate.
pub fn token_expired(token: &str) -> bool {
    let Some(payload) = token.split('.').nth(1) else {
        return true;
    };
    let Ok(bytes) = base64::engine::general_purpose::URL_SAFE_NO_PAD.decode(payload) else {
        return true;
    };
    let Ok(claims) = serde_json::from_slice::<serde_json::Value>(&bytes) else {
        return true;
    };
    match claims.get("exp").and_then(|v| v.as_i64()) {
        Some(exp) => Utc::now().timestamp() > exp,
        None => true,
    }
}

/// On-disk session persistence.
///
/// Lifecycle: [`load`](SessionStore::load) on app start,
/// [`store`](SessionStore::store) on sign-in,
/// [`clear`](SessionStore::clear) on sign-out.
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Store at the default XDG location.
    pub fn open_default() -> Self {
        Self::new(Config::session_path())
    }

    /// Hydrate the persisted session, if any.
    ///
    /// A missing file yields `None`. An expired or unreadable session
    /// is discarded on the spot (the file is removed) and also yields
    /// `None`, so stale credentials never survive a restart.
    pub fn load(&self) -> Result<Option<Session>> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let session: Session = match serde_json::from_str(&content) {
            Ok(session) => session,
            Err(e) => {
                tracing::warn!(error = %e, "Discarding unreadable session file");
                self.clear()?;
                return Ok(None);
            }
        };

        if session.is_expired() {
            tracing::info!("Stored session token is expired, signing out");
            self.clear()?;
            return Ok(None);
        }

        Ok(Some(session))
    }

    /// Persist a session (sign-in).
    pub fn store(&self, session: &Session) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, serde_json::to_string_pretty(session)?)?;
        Ok(())
    }

    /// Remove the persisted session (sign-out). Missing file is fine.
    pub fn clear(&self) -> Result<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Unsigned test token with the given exp claim.
    fn token_with_exp(exp: i64) -> String {
        let header =
            base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(br#"{"alg":"none"}"#);
        let payload = base64::engine::general_purpose::URL_SAFE_NO_PAD
            .encode(format!(r#"{{"exp":{exp},"sub":"1"}}"#));
        format!("{header}.{payload}.sig")
    }

    fn session(token: String) -> Session {
        Session {
            user_id: 1,
            name: "Ana".to_string(),
            avatar: None,
            token,
        }
    }

    #[test]
    fn test_token_expiry() {
        let future = Utc::now().timestamp() + 3600;
        let past = Utc::now().timestamp() - 3600;
        assert!(!token_expired(&token_with_exp(future)));
        assert!(token_expired(&token_with_exp(past)));
    }

    #[test]
    fn test_malformed_tokens_count_as_expired() {
        assert!(token_expired(""));
        assert!(token_expired("not-a-jwt"));
        assert!(token_expired("a.b.c"));
        // Valid base64 but no exp claim.
        let payload = base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(b"{}");
        assert!(token_expired(&format!("h.{payload}.s")));
    }

    #[test]
    fn test_from_login_parses_user_id() {
        let data = LoginData {
            token: "t".to_string(),
            user_id: "42".to_string(),
            name: "Ana".to_string(),
            avatar: None,
        };
        assert_eq!(Session::from_login(data).user_id, 42);

        let data = LoginData {
            token: "t".to_string(),
            user_id: "garbage".to_string(),
            name: "Ana".to_string(),
            avatar: None,
        };
        assert_eq!(Session::from_login(data).user_id, 0);
    }

    #[test]
    fn test_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::new(dir.path().join("session.json"));

        assert!(store.load().unwrap().is_none());

        let fresh = session(token_with_exp(Utc::now().timestamp() + 3600));
        store.store(&fresh).unwrap();

        let loaded = store.load().unwrap().expect("session should hydrate");
        assert_eq!(loaded.user_id, 1);
        assert_eq!(loaded.name, "Ana");

        store.clear().unwrap();
        assert!(store.load().unwrap().is_none());
        // Clearing twice is fine.
        store.clear().unwrap();
    }

    #[test]
    fn test_expired_session_discarded_on_load() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::new(dir.path().join("session.json"));

        let stale = session(token_with_exp(Utc::now().timestamp() - 10));
        store.store(&stale).unwrap();

        assert!(store.load().unwrap().is_none());
        // The file itself is gone, not just ignored.
        assert!(!dir.path().join("session.json").exists());
    }

    #[test]
    fn test_corrupt_session_discarded_on_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, "{not json").unwrap();

        let store = SessionStore::new(path.clone());
        assert!(store.load().unwrap().is_none());
        assert!(!path.exists());
    }
}
