//! Identity provider seam.
//!
//! Sign-in itself happens elsewhere; the notes service only needs the email of
//! whoever is signed in. [`InMemoryIdentityProvider`] covers tests and front
//! ends that keep the signed-in email locally.

use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthUser {
    pub email: String,
    #[serde(default)]
    pub is_email_verified: bool,
}

impl AuthUser {
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            is_email_verified: false,
        }
    }
}

/// External authentication service
pub trait IdentityProvider {
    /// The signed-in user, if any
    fn current_user(&self) -> impl Future<Output = Result<Option<AuthUser>>> + Send;

    /// Ask the provider to email a verification link to the current user
    fn send_email_verification(&self) -> impl Future<Output = Result<()>> + Send;

    fn logout(&self) -> impl Future<Output = Result<()>> + Send;
}

#[derive(Debug, Default)]
pub struct InMemoryIdentityProvider {
    user: Mutex<Option<AuthUser>>,
    verification_requests: AtomicUsize,
}

impl InMemoryIdentityProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Provider that starts out signed in as `email`
    pub fn signed_in(email: impl Into<String>) -> Self {
        let provider = Self::new();
        provider.sign_in(AuthUser::new(email));
        provider
    }

    pub fn sign_in(&self, user: AuthUser) {
        *self.user.lock().unwrap_or_else(PoisonError::into_inner) = Some(user);
    }

    /// Number of verification emails requested so far
    pub fn verification_requests(&self) -> usize {
        self.verification_requests.load(Ordering::Relaxed)
    }

    fn snapshot(&self) -> Option<AuthUser> {
        self.user
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl IdentityProvider for InMemoryIdentityProvider {
    async fn current_user(&self) -> Result<Option<AuthUser>> {
        Ok(self.snapshot())
    }

    async fn send_email_verification(&self) -> Result<()> {
        let user = self.snapshot().ok_or(Error::NotAuthenticated)?;
        self.verification_requests.fetch_add(1, Ordering::Relaxed);
        tracing::info!("Verification email requested for {}", user.email);
        Ok(())
    }

    async fn logout(&self) -> Result<()> {
        self.user
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[tokio::test(flavor = "multi_thread")]
    async fn test_signed_in_provider_reports_user() {
        let provider = InMemoryIdentityProvider::signed_in("a@x.com");
        let user = provider.current_user().await.unwrap().unwrap();
        assert_eq!(user, AuthUser::new("a@x.com"));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_logout_clears_user() {
        let provider = InMemoryIdentityProvider::signed_in("a@x.com");
        provider.logout().await.unwrap();
        assert!(provider.current_user().await.unwrap().is_none());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_verification_requires_sign_in() {
        let provider = InMemoryIdentityProvider::new();
        assert!(matches!(
            provider.send_email_verification().await,
            Err(Error::NotAuthenticated)
        ));

        provider.sign_in(AuthUser::new("a@x.com"));
        provider.send_email_verification().await.unwrap();
        assert_eq!(provider.verification_requests(), 1);
    }
}
