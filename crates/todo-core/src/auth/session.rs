//! Session context handed to the rest of the app at start-up.

use super::{AuthError, AuthResult, AuthSession, AuthUser, FirebaseAuthClient, SessionPersistence};
use crate::config::ClientConfig;
use crate::util::normalize_text_option;

/// Owns the auth client and the signed-in session for one app run.
///
/// Built once at start, `initialize`d to restore a persisted session, and
/// torn down with `logout`. List operations never consult it; it only feeds
/// the user identity to display code and the ID token to the store client.
pub struct SessionContext<S: SessionPersistence> {
    client: Option<FirebaseAuthClient<S>>,
    current: Option<AuthSession>,
}

impl<S: SessionPersistence> SessionContext<S> {
    /// Auth is optional: without an API key the context stays signed out.
    pub fn new(config: &ClientConfig, store: S) -> AuthResult<Self> {
        let client = match normalize_text_option(config.firebase_api_key.clone()) {
            Some(api_key) => Some(FirebaseAuthClient::new(api_key, store)?),
            None => None,
        };
        Ok(Self {
            client,
            current: None,
        })
    }

    #[must_use]
    pub const fn is_configured(&self) -> bool {
        self.client.is_some()
    }

    /// Restore a persisted session, refreshing it when expired.
    pub async fn initialize(&mut self) -> AuthResult<Option<&AuthUser>> {
        self.current = match &self.client {
            Some(client) => client.restore_session().await?,
            None => None,
        };
        if let Some(session) = &self.current {
            tracing::debug!(user = %session.user.id, "Restored auth session");
        }
        Ok(self.current_user())
    }

    #[must_use]
    pub fn current_user(&self) -> Option<&AuthUser> {
        self.current.as_ref().map(|session| &session.user)
    }

    #[must_use]
    pub fn id_token(&self) -> Option<&str> {
        self.current
            .as_ref()
            .map(|session| session.id_token.as_str())
    }

    pub async fn login(&mut self, email: &str, password: &str) -> AuthResult<&AuthUser> {
        let session = self.client()?.sign_in(email, password).await?;
        tracing::info!(user = %session.user.id, "Signed in");
        Ok(&self.current.insert(session).user)
    }

    pub async fn register(&mut self, email: &str, password: &str) -> AuthResult<&AuthUser> {
        let session = self.client()?.sign_up(email, password).await?;
        tracing::info!(user = %session.user.id, "Registered new account");
        Ok(&self.current.insert(session).user)
    }

    /// End the session and forget the persisted tokens.
    pub fn logout(&mut self) -> AuthResult<()> {
        if let Some(client) = &self.client {
            client.sign_out()?;
        }
        self.current = None;
        Ok(())
    }

    fn client(&self) -> AuthResult<&FirebaseAuthClient<S>> {
        self.client.as_ref().ok_or(AuthError::NotConfigured)
    }
}

/// Greeting shown above the list for a signed-in user.
#[must_use]
pub fn welcome_line(user: Option<&AuthUser>) -> Option<String> {
    let user = user?;
    let name = user
        .display_name
        .as_deref()
        .or(user.email.as_deref())
        .filter(|name| !name.trim().is_empty())?;
    Some(format!("Welcome back, {name}"))
}
