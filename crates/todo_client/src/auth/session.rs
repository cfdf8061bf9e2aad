use crate::error::{ClientError, Result};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::{
    fs::{create_dir_all, read_to_string, File},
    io::Write,
    path::PathBuf,
    time::{SystemTime, UNIX_EPOCH},
};

/// Tokens closer than this to their expiry are treated as stale.
const EXPIRY_BUFFER_SECS: u64 = 60;

const SESSION_FILE_NAME: &str = ".session.json";

/// Bearer session issued at login
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Session {
    pub token: String,
    /// Unix seconds from the token's `exp` claim, if the token carries one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<u64>,
}

impl Session {
    /// Build a session from a raw bearer token, decoding its expiry.
    pub fn from_token(token: impl Into<String>) -> Result<Self> {
        let token = token.into();
        if token.trim().is_empty() {
            return Err(ClientError::InvalidToken("empty token".to_string()));
        }
        let expires_at = decode_jwt_expiry(&token);
        Ok(Session { token, expires_at })
    }

    /// Client-side expiry check. Tokens without a decodable `exp` claim are
    /// treated as non-expiring.
    pub fn is_valid(&self) -> bool {
        let Some(expires_at) = self.expires_at else {
            return true;
        };
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|duration| duration.as_secs())
            .unwrap_or(0);
        expires_at.saturating_sub(EXPIRY_BUFFER_SECS) > now
    }
}

/// Read the `exp` claim out of a JWT payload. No signature verification:
/// the server is the authority, this only gates needless requests.
fn decode_jwt_expiry(token: &str) -> Option<u64> {
    let payload = token.split('.').nth(1)?;
    let bytes = URL_SAFE_NO_PAD.decode(payload).ok()?;
    let claims: serde_json::Value = serde_json::from_slice(&bytes).ok()?;
    claims.get("exp")?.as_u64()
}

/// File-backed session cache under the app data directory
#[derive(Debug, Clone)]
pub struct SessionStore {
    data_dir: PathBuf,
}

impl SessionStore {
    pub fn new(data_dir: PathBuf) -> Self {
        SessionStore { data_dir }
    }

    fn session_path(&self) -> PathBuf {
        self.data_dir.join(SESSION_FILE_NAME)
    }

    /// Load the cached session, if any. A file that no longer parses is
    /// discarded.
    pub fn load(&self) -> Option<Session> {
        let cached_str = read_to_string(self.session_path()).ok()?;
        match serde_json::from_str::<Session>(&cached_str) {
            Ok(session) => Some(session),
            Err(err) => {
                warn!("Discarding unreadable session file: {err}");
                let _ = std::fs::remove_file(self.session_path());
                None
            }
        }
    }

    pub fn save(&self, session: &Session) -> Result<()> {
        create_dir_all(&self.data_dir)?;
        let serialized = serde_json::to_string(session)?;
        let mut file = File::create(self.session_path())?;
        file.write_all(serialized.as_bytes())?;
        info!("Session saved to {:?}", self.session_path());
        Ok(())
    }

    /// Remove the cached session. Missing file is fine.
    pub fn clear(&self) -> Result<()> {
        let path = self.session_path();
        if path.exists() {
            std::fs::remove_file(&path)?;
            info!("Session cleared");
        }
        Ok(())
    }

    pub fn exists(&self) -> bool {
        self.session_path().exists()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn fake_jwt(exp: u64) -> String {
        let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
        let payload = URL_SAFE_NO_PAD.encode(format!(r#"{{"sub":"user","exp":{exp}}}"#));
        format!("{header}.{payload}.sig")
    }

    fn now_secs() -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_secs()
    }

    #[test]
    fn decode_expiry_from_jwt() {
        let session = Session::from_token(fake_jwt(1234567890)).unwrap();
        assert_eq!(session.expires_at, Some(1234567890));
    }

    #[test]
    fn opaque_token_has_no_expiry() {
        let session = Session::from_token("not-a-jwt").unwrap();
        assert_eq!(session.expires_at, None);
        assert!(session.is_valid());
    }

    #[test]
    fn empty_token_rejected() {
        assert!(matches!(
            Session::from_token("   "),
            Err(ClientError::InvalidToken(_))
        ));
    }

    #[test]
    fn token_expiry_buffer() {
        let valid = Session::from_token(fake_jwt(now_secs() + 120)).unwrap();
        let stale = Session::from_token(fake_jwt(now_secs() + 30)).unwrap();
        let expired = Session::from_token(fake_jwt(now_secs() - 3600)).unwrap();

        assert!(valid.is_valid());
        assert!(!stale.is_valid());
        assert!(!expired.is_valid());
    }

    #[test]
    fn session_store_round_trip() {
        let dir = tempdir().expect("tempdir");
        let store = SessionStore::new(dir.path().to_path_buf());

        let session = Session::from_token(fake_jwt(now_secs() + 3600)).unwrap();
        store.save(&session).expect("save session");
        assert!(store.exists());

        let loaded = store.load().expect("load session");
        assert_eq!(loaded.token, session.token);
        assert_eq!(loaded.expires_at, session.expires_at);

        store.clear().expect("clear session");
        assert!(!store.exists());
        assert!(store.load().is_none());
    }

    #[test]
    fn session_store_discards_garbage() {
        let dir = tempdir().expect("tempdir");
        let store = SessionStore::new(dir.path().to_path_buf());
        std::fs::write(dir.path().join(SESSION_FILE_NAME), "not json").unwrap();

        assert!(store.load().is_none());
        assert!(!store.exists());
    }
}
