//! Keychain-backed session persistence for the CLI.

#[cfg(test)]
use std::collections::HashMap;
#[cfg(test)]
use std::sync::{Mutex, OnceLock};

#[cfg(not(test))]
use keyring::Entry;

use todo_core::auth::{AuthError, AuthResult, AuthSession, SessionContext, SessionPersistence};
use todo_core::config::ClientConfig;

#[cfg(not(test))]
const KEYRING_SERVICE_NAME: &str = "todo-cli";

/// One keychain entry per backend project
#[derive(Clone)]
pub struct SessionStore {
    username: String,
}

impl SessionStore {
    pub fn for_config(config: &ClientConfig) -> Self {
        let project = config
            .firebase_project_id
            .as_deref()
            .map(str::trim)
            .filter(|project| !project.is_empty())
            .unwrap_or("default");
        Self {
            username: format!("firebase_session:{project}"),
        }
    }

    #[cfg(test)]
    fn test_store() -> &'static Mutex<HashMap<String, String>> {
        static STORE: OnceLock<Mutex<HashMap<String, String>>> = OnceLock::new();
        STORE.get_or_init(|| Mutex::new(HashMap::new()))
    }

    #[cfg(not(test))]
    fn entry(&self) -> AuthResult<Entry> {
        Entry::new(KEYRING_SERVICE_NAME, &self.username)
            .map_err(|error| AuthError::SecureStorage(error.to_string()))
    }
}

impl SessionPersistence for SessionStore {
    #[cfg(not(test))]
    fn load_session(&self) -> AuthResult<Option<AuthSession>> {
        match self.entry()?.get_password() {
            Ok(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(error) => Err(AuthError::SecureStorage(error.to_string())),
        }
    }

    #[cfg(test)]
    fn load_session(&self) -> AuthResult<Option<AuthSession>> {
        let guard = Self::test_store()
            .lock()
            .map_err(|error| AuthError::SecureStorage(error.to_string()))?;
        guard
            .get(&self.username)
            .map(|raw| serde_json::from_str(raw))
            .transpose()
            .map_err(AuthError::from)
    }

    #[cfg(not(test))]
    fn save_session(&self, session: &AuthSession) -> AuthResult<()> {
        let raw = serde_json::to_string(session)?;
        self.entry()?
            .set_password(&raw)
            .map_err(|error| AuthError::SecureStorage(error.to_string()))
    }

    #[cfg(test)]
    fn save_session(&self, session: &AuthSession) -> AuthResult<()> {
        let raw = serde_json::to_string(session)?;
        let mut guard = Self::test_store()
            .lock()
            .map_err(|error| AuthError::SecureStorage(error.to_string()))?;
        guard.insert(self.username.clone(), raw);
        Ok(())
    }

    #[cfg(not(test))]
    fn clear_session(&self) -> AuthResult<()> {
        match self.entry()?.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(error) => Err(AuthError::SecureStorage(error.to_string())),
        }
    }

    #[cfg(test)]
    fn clear_session(&self) -> AuthResult<()> {
        let mut guard = Self::test_store()
            .lock()
            .map_err(|error| AuthError::SecureStorage(error.to_string()))?;
        guard.remove(&self.username);
        Ok(())
    }
}

/// Session context restored from the keychain.
pub async fn restore_session(config: &ClientConfig) -> AuthResult<SessionContext<SessionStore>> {
    let mut session = SessionContext::new(config, SessionStore::for_config(config))?;
    session.initialize().await?;
    Ok(session)
}

#[cfg(test)]
mod tests {
    use todo_core::auth::AuthUser;

    use super::*;

    fn session() -> AuthSession {
        AuthSession {
            id_token: "secret-id-token".to_string(),
            refresh_token: "secret-refresh-token".to_string(),
            expires_at: i64::MAX,
            user: AuthUser {
                id: "user".to_string(),
                email: Some("user@example.com".to_string()),
                display_name: None,
            },
        }
    }

    fn config(project: &str) -> ClientConfig {
        ClientConfig {
            firebase_project_id: Some(project.to_string()),
            ..ClientConfig::default()
        }
    }

    #[test]
    fn sessions_are_scoped_per_project() {
        let first = SessionStore::for_config(&config("alpha"));
        let second = SessionStore::for_config(&config("beta"));

        first.save_session(&session()).unwrap();
        assert!(first.load_session().unwrap().is_some());
        assert!(second.load_session().unwrap().is_none());

        first.clear_session().unwrap();
        assert!(first.load_session().unwrap().is_none());
    }

    #[test]
    fn blank_project_uses_default_entry() {
        let store = SessionStore::for_config(&config("  "));
        assert_eq!(store.username, "firebase_session:default");
    }
}
