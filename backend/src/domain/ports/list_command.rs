//! Driving port for personal list mutations.
//!
//! Ownership checks conflate "missing" and "owned by someone else": both
//! surface as `NotFound` so callers cannot probe for other users' drafts.

use async_trait::async_trait;

use crate::domain::lists::{ListEdit, ListId, PersonalList, Reaction};
use crate::domain::{Error, UserId};

/// Unvalidated publish payload; the service turns rule violations into
/// `Validation` errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishRequest {
    pub name: String,
    pub items: Vec<String>,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ListCommand: Send + Sync {
    /// Create an empty draft owned by `owner`.
    async fn create(&self, owner: &UserId) -> Result<PersonalList, Error>;

    /// Replace the name and items of a draft.
    async fn update(
        &self,
        id: &ListId,
        owner: &UserId,
        edit: ListEdit,
    ) -> Result<PersonalList, Error>;

    /// Publish a draft and fold it into its community list.
    async fn publish(
        &self,
        id: &ListId,
        owner: &UserId,
        request: PublishRequest,
    ) -> Result<PersonalList, Error>;

    /// Delete a list, retracting its community votes if it was published.
    /// Returns the deleted list.
    async fn delete(&self, id: &ListId, owner: &UserId) -> Result<PersonalList, Error>;

    /// Toggle a like or dislike; drafts are returned unchanged.
    async fn toggle_reaction(
        &self,
        id: &ListId,
        caller: &UserId,
        reaction: Reaction,
    ) -> Result<PersonalList, Error>;

    /// Append a comment; drafts are returned unchanged.
    async fn add_comment(
        &self,
        id: &ListId,
        caller: &UserId,
        text: String,
    ) -> Result<PersonalList, Error>;

    /// Count a view of a published list; drafts are ignored.
    async fn record_view(&self, id: &ListId) -> Result<(), Error>;
}
