/*
[INPUT]:  Access token after login, API base URL, session file path
[OUTPUT]: Persisted session that survives restarts; restored SessionToken
[POS]:    State layer - session persistence
[UPDATE]: When changing the session file format or its location
[UPDATE]: 2026-10-19 create the temp file owner-only, remove it on failure
*/

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use soliforge_client::{SessionToken, normalize_base_url};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, warn};

use crate::config::SessionConfig;

/// Session record written to disk
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredSession {
    /// API the token was issued by
    pub api_url: String,
    #[serde(default)]
    pub username: Option<String>,
    pub access_token: String,
    #[serde(default = "default_token_type")]
    pub token_type: String,
    pub saved_at: DateTime<Utc>,
}

fn default_token_type() -> String {
    "bearer".to_string()
}

impl StoredSession {
    pub fn new(api_url: &str, username: Option<&str>, token: &SessionToken) -> Self {
        Self {
            api_url: canonical_api_url(api_url),
            username: username.map(str::to_string),
            access_token: token.access_token.clone(),
            token_type: token.token_type.clone(),
            saved_at: Utc::now(),
        }
    }

    pub fn to_token(&self) -> SessionToken {
        SessionToken::new(self.access_token.clone(), self.token_type.clone())
    }

    pub fn matches_api(&self, api_url: &str) -> bool {
        canonical_api_url(&self.api_url) == canonical_api_url(api_url)
    }
}

fn canonical_api_url(raw: &str) -> String {
    normalize_base_url(raw)
        .map(|url| url.to_string())
        .unwrap_or_else(|_| raw.trim().to_string())
}

#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn default_path() -> Result<PathBuf> {
        Ok(dirs::data_dir()
            .ok_or_else(|| anyhow!("Could not determine data directory"))?
            .join("soliforge")
            .join("session.json"))
    }

    pub fn from_config(config: &SessionConfig) -> Result<Self> {
        match &config.token_path {
            Some(path) => Ok(Self::new(path)),
            None => Ok(Self::new(Self::default_path()?)),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the session file; an unreadable file is treated as signed out
    pub async fn load(&self) -> Result<Option<StoredSession>> {
        if !fs::try_exists(&self.path).await.unwrap_or(false) {
            return Ok(None);
        }
        let content = fs::read_to_string(&self.path)
            .await
            .with_context(|| format!("read session file {}", self.path.display()))?;
        match serde_json::from_str(&content) {
            Ok(session) => Ok(Some(session)),
            Err(err) => {
                warn!(path = %self.path.display(), error = %err, "ignoring corrupt session file");
                Ok(None)
            }
        }
    }

    pub async fn save(&self, session: &StoredSession) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .await
                .with_context(|| format!("create {}", parent.display()))?;
        }
        let content = serde_json::to_string_pretty(session)?;

        // Atomic write: write to temp file then rename
        let temp_path = self.path.with_extension("tmp");
        let written = async {
            write_private(&temp_path, content.as_bytes()).await?;
            fs::rename(&temp_path, &self.path)
                .await
                .with_context(|| format!("replace {}", self.path.display()))
        }
        .await;
        if let Err(err) = written {
            let _ = fs::remove_file(&temp_path).await;
            return Err(err);
        }

        debug!(path = %self.path.display(), "session saved");
        Ok(())
    }

    pub async fn clear(&self) -> Result<()> {
        match fs::remove_file(&self.path).await {
            Ok(()) => {
                info!(path = %self.path.display(), "session cleared");
                Ok(())
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err).with_context(|| format!("remove {}", self.path.display())),
        }
    }

    /// Token to resume with, if one was saved for this API and has not expired
    pub async fn restore(&self, api_url: &str, now: DateTime<Utc>) -> Result<Option<SessionToken>> {
        let Some(session) = self.load().await? else {
            return Ok(None);
        };
        if !session.matches_api(api_url) {
            debug!(saved = %session.api_url, api_url, "stored session belongs to another API");
            return Ok(None);
        }
        let token = session.to_token();
        if token.is_expired_at(now) {
            info!("stored session expired; sign in again");
            return Ok(None);
        }
        Ok(Some(token))
    }
}

/// Create `path` readable by the owner only, replacing a stale copy
async fn write_private(path: &Path, content: &[u8]) -> Result<()> {
    match fs::remove_file(path).await {
        Ok(()) => {}
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
        Err(err) => {
            return Err(err).with_context(|| format!("remove stale {}", path.display()));
        }
    }

    let mut options = fs::OpenOptions::new();
    options.write(true).create_new(true);
    #[cfg(unix)]
    options.mode(0o600);

    let mut file = options
        .open(path)
        .await
        .with_context(|| format!("create {}", path.display()))?;
    file.write_all(content).await?;
    file.sync_all().await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn temp_store() -> SessionStore {
        let path = std::env::temp_dir()
            .join(format!("soliforge-session-{}", uuid::Uuid::new_v4()))
            .join("session.json");
        SessionStore::new(path)
    }

    fn jwt(exp: i64) -> String {
        use base64::Engine;
        use base64::engine::general_purpose::URL_SAFE_NO_PAD;

        let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
        let payload = URL_SAFE_NO_PAD.encode(format!(r#"{{"sub":"alice","exp":{exp}}}"#));
        format!("{header}.{payload}.sig")
    }

    #[tokio::test]
    async fn test_save_and_restore() {
        let store = temp_store();
        let exp = (Utc::now() + Duration::hours(1)).timestamp();
        let token = SessionToken::bearer(jwt(exp));
        let session = StoredSession::new("http://localhost:8000/api", Some("alice"), &token);
        store.save(&session).await.unwrap();

        assert_eq!(store.load().await.unwrap(), Some(session));
        let restored = store
            .restore("http://localhost:8000/api/", Utc::now())
            .await
            .unwrap()
            .expect("token should be restored");
        assert_eq!(restored.access_token, token.access_token);
        assert_eq!(restored.subject.as_deref(), Some("alice"));

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mode = std::fs::metadata(store.path()).unwrap().permissions().mode();
            assert_eq!(mode & 0o777, 0o600);
        }

        store.clear().await.unwrap();
        assert!(store.load().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_restore_skips_other_api_and_expired_tokens() {
        let store = temp_store();
        let expired = Utc::now() - Duration::minutes(5);
        let token = SessionToken::bearer(jwt(expired.timestamp()));
        store
            .save(&StoredSession::new("http://localhost:8000/api", None, &token))
            .await
            .unwrap();

        assert!(store.restore("http://localhost:8000/api", Utc::now()).await.unwrap().is_none());
        assert!(store.restore("http://example.com/api", expired - Duration::hours(1)).await.unwrap().is_none());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_save_replaces_world_readable_files() {
        use std::os::unix::fs::PermissionsExt;

        let store = temp_store();
        let temp_path = store.path().with_extension("tmp");
        std::fs::create_dir_all(store.path().parent().unwrap()).unwrap();
        for path in [store.path(), temp_path.as_path()] {
            std::fs::write(path, "{}").unwrap();
            std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o644)).unwrap();
        }

        let token = SessionToken::bearer("tok");
        store
            .save(&StoredSession::new("http://localhost:8000/api", None, &token))
            .await
            .unwrap();

        let mode = std::fs::metadata(store.path()).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
        assert!(!temp_path.exists());
    }

    #[tokio::test]
    async fn test_failed_save_removes_temp_file() {
        let store = temp_store();
        // a non-empty directory at the session path makes the rename fail
        std::fs::create_dir_all(store.path().join("occupied")).unwrap();

        let token = SessionToken::bearer("tok");
        let result = store
            .save(&StoredSession::new("http://localhost:8000/api", None, &token))
            .await;

        assert!(result.is_err());
        assert!(!store.path().with_extension("tmp").exists());
    }

    #[tokio::test]
    async fn test_missing_and_corrupt_files_are_signed_out() {
        let store = temp_store();
        assert!(store.load().await.unwrap().is_none());
        store.clear().await.unwrap();

        std::fs::create_dir_all(store.path().parent().unwrap()).unwrap();
        std::fs::write(store.path(), "not json").unwrap();
        assert!(store.load().await.unwrap().is_none());
    }
}
