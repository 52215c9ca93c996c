//! Port for personal list persistence.
//!
//! Lists follow a read-modify-write pattern with optimistic concurrency:
//! callers advance the revision on the domain object and pass the revision
//! they read as `expected_revision`. View counters use an atomic increment
//! that also advances the revision, so a save based on an earlier read fails
//! instead of writing back a stale count.

use async_trait::async_trait;

use crate::domain::UserId;
use crate::domain::lists::{ListId, PersonalList};

use super::define_port_error;

define_port_error! {
    /// Errors raised by personal list repository adapters.
    pub enum PersonalListRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "list repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "list repository query failed: {message}",
        /// Optimistic concurrency check failed.
        RevisionMismatch { expected: u32, actual: u32 } =>
            "revision mismatch: expected {expected}, found {actual}",
        /// The list vanished between read and write.
        Missing { id: String } => "list {id} does not exist",
        /// The owner already has a published list under this name.
        DuplicateName { name: String } =>
            "a published list named {name} already exists for this owner",
    }
}

/// Result of an atomic view increment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewOutcome {
    /// The list is published and its counter was incremented.
    Counted,
    /// The list exists but is a draft; nothing changed.
    NotPublished,
    /// No list has the identifier.
    Missing,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PersonalListRepository: Send + Sync {
    /// Store a newly created list.
    async fn insert(&self, list: &PersonalList) -> Result<(), PersonalListRepositoryError>;

    async fn find_by_id(
        &self,
        id: &ListId,
    ) -> Result<Option<PersonalList>, PersonalListRepositoryError>;

    /// Lists owned by `viewer` plus every published list, oldest first.
    async fn list_visible_to(
        &self,
        viewer: Option<UserId>,
    ) -> Result<Vec<PersonalList>, PersonalListRepositoryError>;

    /// A published list owned by `owner` under exactly `name`, if any.
    async fn find_published_by_owner_and_name(
        &self,
        owner: &UserId,
        name: &str,
    ) -> Result<Option<PersonalList>, PersonalListRepositoryError>;

    /// Overwrite a list if the stored revision equals `expected_revision`.
    ///
    /// `list.revision()` must already hold the new revision. Fails with
    /// `DuplicateName` when a published list would share its owner and name
    /// with another published list.
    async fn save(
        &self,
        list: &PersonalList,
        expected_revision: u32,
    ) -> Result<(), PersonalListRepositoryError>;

    /// Remove a list. Returns `false` when nothing was deleted.
    async fn delete(&self, id: &ListId) -> Result<bool, PersonalListRepositoryError>;

    /// Increment the view counter of a published list and advance its
    /// revision in one write.
    async fn increment_views(&self, id: &ListId)
    -> Result<ViewOutcome, PersonalListRepositoryError>;
}
