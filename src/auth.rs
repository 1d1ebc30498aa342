use crate::api::dto::UserProfile;
use crate::api::{ApiError, Backend};
use std::sync::{Arc, RwLock};

/// Signed-in user and the backend that holds the token.
///
/// Built once in `main` and handed down to whatever needs it; nothing reaches
/// it through globals.
pub struct AuthSession {
    backend: Arc<dyn Backend>,
    user: RwLock<Option<UserProfile>>,
}

impl AuthSession {
    pub fn new(backend: Arc<dyn Backend>) -> Self {
        Self {
            backend,
            user: RwLock::new(None),
        }
    }

    pub fn backend(&self) -> Arc<dyn Backend> {
        Arc::clone(&self.backend)
    }

    pub fn current_user(&self) -> Option<UserProfile> {
        match self.user.read() {
            Ok(user) => user.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.backend.has_token() && self.current_user().is_some()
    }

    fn set_user(&self, user: Option<UserProfile>) {
        match self.user.write() {
            Ok(mut slot) => *slot = user,
            Err(poisoned) => *poisoned.into_inner() = user,
        }
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<UserProfile, ApiError> {
        tracing::info!("Signing in {}", email);
        self.backend.login(email, password).await?;
        self.load_profile().await
    }

    pub async fn register(
        &self,
        email: &str,
        password: &str,
        name: &str,
    ) -> Result<UserProfile, ApiError> {
        tracing::info!("Registering {}", email);
        self.backend.register(email, password, name).await?;
        self.load_profile().await
    }

    /// Re-reads the profile for the held token. Without a token there is
    /// nothing to refresh.
    pub async fn refresh(&self) -> Result<Option<UserProfile>, ApiError> {
        if !self.backend.has_token() {
            return Ok(None);
        }
        self.load_profile().await.map(Some)
    }

    pub fn logout(&self) {
        tracing::info!("Signing out");
        self.backend.clear_token();
        self.set_user(None);
    }

    /// Drops the session after the backend rejected the token.
    pub fn invalidate(&self) {
        tracing::warn!("Session invalidated by the server");
        self.backend.clear_token();
        self.set_user(None);
    }

    async fn load_profile(&self) -> Result<UserProfile, ApiError> {
        match self.backend.profile().await {
            Ok(profile) => {
                self.set_user(Some(profile.clone()));
                Ok(profile)
            }
            Err(err) => {
                tracing::warn!("Fetching profile failed: {}", err);
                if err.is_auth_failure() {
                    self.invalidate();
                }
                Err(err)
            }
        }
    }
}

impl std::fmt::Debug for AuthSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthSession")
            .field("user", &self.current_user())
            .finish_non_exhaustive()
    }
}
