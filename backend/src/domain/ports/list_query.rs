//! Driving port for reading personal lists.

use async_trait::async_trait;

use crate::domain::lists::{ListId, PersonalList};
use crate::domain::{Error, UserId};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ListQuery: Send + Sync {
    /// A list that is published or owned by `viewer`; `NotFound` otherwise.
    async fn get(&self, id: &ListId, viewer: Option<UserId>) -> Result<PersonalList, Error>;

    /// Every list visible to `viewer`.
    async fn list_visible(&self, viewer: Option<UserId>) -> Result<Vec<PersonalList>, Error>;
}
