//! Shared session context with injected durable persistence.
//!
//! [`SessionContext`] replaces the global mutable session singleton of
//! earlier shells: it is an explicit object handed to the API client and
//! the realtime dispatcher at construction time. The in-memory credential
//! is the read-many/write-rarely source of truth; the injected
//! [`KvStore`] is a side-effect hook written on every mutating auth
//! action and read once at startup.

use std::sync::Arc;

use tokio::sync::RwLock;

use super::credential::{MerchantId, Role, SessionCredential, UserId};
use crate::error::StoreError;
use crate::persistence::{KvStore, keys};

/// Process-wide session state shared by both client components.
///
/// Cloning is cheap; all clones observe the same credential.
#[derive(Debug, Clone)]
pub struct SessionContext {
    credential: Arc<RwLock<Option<SessionCredential>>>,
    store: Arc<dyn KvStore>,
}

impl SessionContext {
    /// Creates a context with no credential loaded.
    #[must_use]
    pub fn new(store: Arc<dyn KvStore>) -> Self {
        Self {
            credential: Arc::new(RwLock::new(None)),
            store,
        }
    }

    /// Rehydrates the credential from durable storage.
    ///
    /// Called once at startup. A missing or empty stored token leaves the
    /// context unauthenticated; a non-numeric or non-positive stored
    /// merchant id is treated as absent.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] on backend failure.
    pub async fn load(&self) -> Result<(), StoreError> {
        let token = self.store.get(keys::TOKEN).await?.unwrap_or_default();
        if token.is_empty() {
            return Ok(());
        }

        let user_id = self
            .store
            .get(keys::USER_ID)
            .await?
            .and_then(|v| v.parse::<i64>().ok())
            .map(UserId::new);
        let Some(user_id) = user_id else {
            tracing::warn!("stored token without user id, discarding session");
            return Ok(());
        };

        let merchant_id = self
            .store
            .get(keys::MERCHANT_ID)
            .await?
            .and_then(|v| v.parse::<i64>().ok())
            .and_then(MerchantId::from_raw);

        let role = self
            .store
            .get(keys::CURRENT_ROLE)
            .await?
            .map(|v| Role::from_tag(&v))
            .unwrap_or_default();

        let mut guard = self.credential.write().await;
        *guard = Some(SessionCredential {
            token,
            user_id,
            merchant_id,
            role,
        });
        tracing::debug!(%user_id, "session rehydrated from durable store");
        Ok(())
    }

    /// Installs a credential after a successful login and persists it.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if persistence fails; the in-memory
    /// credential is installed regardless so the session stays usable.
    pub async fn login(&self, credential: SessionCredential) -> Result<(), StoreError> {
        {
            let mut guard = self.credential.write().await;
            *guard = Some(credential.clone());
        }

        self.store.set(keys::TOKEN, &credential.token).await?;
        self.store
            .set(keys::USER_ID, &credential.user_id.to_string())
            .await?;
        self.store
            .set(keys::CURRENT_ROLE, credential.role.as_str())
            .await?;
        match credential.merchant_id {
            Some(id) => self.store.set(keys::MERCHANT_ID, &id.to_string()).await?,
            None => self.store.delete(keys::MERCHANT_ID).await?,
        }

        tracing::info!(user_id = %credential.user_id, role = credential.role.as_str(), "session established");
        Ok(())
    }

    /// Clears the credential and the entire durable store.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] on backend failure; the in-memory
    /// credential is cleared regardless.
    pub async fn logout(&self) -> Result<(), StoreError> {
        {
            let mut guard = self.credential.write().await;
            *guard = None;
        }
        self.store.clear().await?;
        tracing::info!("session cleared");
        Ok(())
    }

    /// Returns a snapshot of the current credential, if any.
    pub async fn credential(&self) -> Option<SessionCredential> {
        self.credential.read().await.clone()
    }

    /// Returns the bearer token when an authenticated session exists.
    pub async fn bearer_token(&self) -> Option<String> {
        let guard = self.credential.read().await;
        guard
            .as_ref()
            .filter(|c| c.is_authenticated())
            .map(|c| c.token.clone())
    }

    /// Returns `true` when a credential with a non-empty token is present.
    pub async fn is_authenticated(&self) -> bool {
        let guard = self.credential.read().await;
        guard.as_ref().is_some_and(SessionCredential::is_authenticated)
    }

    /// Persists the phone number used at login.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] on backend failure.
    pub async fn remember_phone(&self, phone: &str) -> Result<(), StoreError> {
        self.store.set(keys::PHONE, phone).await
    }

    /// Caches a profile blob (user or merchant) in durable storage.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] on backend failure.
    pub async fn cache_profile(
        &self,
        key: &'static str,
        profile: &serde_json::Value,
    ) -> Result<(), StoreError> {
        self.store.set(key, &profile.to_string()).await
    }

    /// Returns the injected durable store handle.
    #[must_use]
    pub fn store(&self) -> &Arc<dyn KvStore> {
        &self.store
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;

    fn context() -> SessionContext {
        SessionContext::new(Arc::new(MemoryStore::new()))
    }

    #[tokio::test]
    async fn starts_unauthenticated() {
        let ctx = context();
        assert!(!ctx.is_authenticated().await);
        assert_eq!(ctx.bearer_token().await, None);
    }

    #[tokio::test]
    async fn login_persists_and_load_rehydrates() {
        let store: Arc<dyn KvStore> = Arc::new(MemoryStore::new());
        let ctx = SessionContext::new(Arc::clone(&store));

        let Some(merchant_id) = MerchantId::from_raw(7) else {
            panic!("valid merchant id");
        };
        let cred = SessionCredential::for_merchant("tok-1", UserId::new(11), merchant_id);
        let Ok(()) = ctx.login(cred.clone()).await else {
            panic!("login failed");
        };
        assert!(ctx.is_authenticated().await);

        // Fresh context over the same store simulates a restart.
        let restarted = SessionContext::new(store);
        let Ok(()) = restarted.load().await else {
            panic!("load failed");
        };
        assert_eq!(restarted.credential().await, Some(cred));
    }

    #[tokio::test]
    async fn load_discards_non_positive_merchant_id() {
        let store: Arc<dyn KvStore> = Arc::new(MemoryStore::new());
        let _ = store.set(keys::TOKEN, "tok-2").await;
        let _ = store.set(keys::USER_ID, "5").await;
        let _ = store.set(keys::MERCHANT_ID, "-3").await;

        let ctx = SessionContext::new(store);
        let Ok(()) = ctx.load().await else {
            panic!("load failed");
        };
        let Some(cred) = ctx.credential().await else {
            panic!("credential expected");
        };
        assert_eq!(cred.merchant_id, None);
    }

    #[tokio::test]
    async fn load_without_user_id_stays_unauthenticated() {
        let store: Arc<dyn KvStore> = Arc::new(MemoryStore::new());
        let _ = store.set(keys::TOKEN, "orphan-token").await;

        let ctx = SessionContext::new(store);
        let Ok(()) = ctx.load().await else {
            panic!("load failed");
        };
        assert!(!ctx.is_authenticated().await);
    }

    #[tokio::test]
    async fn logout_clears_memory_and_store() {
        let store: Arc<dyn KvStore> = Arc::new(MemoryStore::new());
        let ctx = SessionContext::new(Arc::clone(&store));

        let Ok(()) = ctx
            .login(SessionCredential::new("tok-3", UserId::new(2)))
            .await
        else {
            panic!("login failed");
        };
        let _ = ctx.remember_phone("13900000000").await;

        let Ok(()) = ctx.logout().await else {
            panic!("logout failed");
        };
        assert!(!ctx.is_authenticated().await);
        assert_eq!(store.get(keys::TOKEN).await.ok().flatten(), None);
        assert_eq!(store.get(keys::PHONE).await.ok().flatten(), None);
    }
}
