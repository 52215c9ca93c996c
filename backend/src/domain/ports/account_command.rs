//! Driving port for account registration and login.
//!
//! Inbound adapters call this port to create accounts and check credentials
//! without knowing how users are stored or passwords hashed.

use async_trait::async_trait;

use crate::domain::{Error, LoginCredentials, Registration, UserProfile};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountCommand: Send + Sync {
    /// Create an account and return its public profile.
    async fn register(&self, registration: Registration) -> Result<UserProfile, Error>;

    /// Check credentials and return the matching profile.
    async fn login(&self, credentials: LoginCredentials) -> Result<UserProfile, Error>;
}
