//! Driving port for reading account profiles.

use async_trait::async_trait;

use crate::domain::{Error, UserId, UserProfile};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountQuery: Send + Sync {
    /// Profile of the session's user; `NotFound` if the account is gone.
    async fn profile(&self, user: &UserId) -> Result<UserProfile, Error>;
}
