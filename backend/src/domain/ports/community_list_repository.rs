//! Port for community list persistence.
//!
//! Community lists are keyed by name. Adapters enforce name uniqueness so
//! two publishers racing to create the same aggregate cannot both succeed;
//! the loser sees [`CommunityListRepositoryError::DuplicateName`] and retries
//! against the winner's record.

use async_trait::async_trait;

use crate::domain::lists::{CommunityList, CommunityListId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by community list repository adapters.
    pub enum CommunityListRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "community repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "community repository query failed: {message}",
        /// Optimistic concurrency check failed.
        RevisionMismatch { expected: u32, actual: u32 } =>
            "revision mismatch: expected {expected}, found {actual}",
        /// A community list with this name already exists.
        DuplicateName { name: String } =>
            "community list {name} already exists",
        /// The community list vanished between read and write.
        Missing { id: String } => "community list {id} does not exist",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CommunityListRepository: Send + Sync {
    /// Store a new aggregate; fails with `DuplicateName` if the name is taken.
    async fn insert(&self, list: &CommunityList) -> Result<(), CommunityListRepositoryError>;

    async fn find_by_id(
        &self,
        id: &CommunityListId,
    ) -> Result<Option<CommunityList>, CommunityListRepositoryError>;

    async fn find_by_name(
        &self,
        name: &str,
    ) -> Result<Option<CommunityList>, CommunityListRepositoryError>;

    /// Every aggregate, oldest first.
    async fn list_all(&self) -> Result<Vec<CommunityList>, CommunityListRepositoryError>;

    /// Overwrite an aggregate if the stored revision equals `expected_revision`.
    async fn save(
        &self,
        list: &CommunityList,
        expected_revision: u32,
    ) -> Result<(), CommunityListRepositoryError>;

    /// Erase an aggregate if the stored revision equals `expected_revision`.
    async fn delete(
        &self,
        id: &CommunityListId,
        expected_revision: u32,
    ) -> Result<(), CommunityListRepositoryError>;

    /// Increment the view counter and advance the revision in one write.
    /// Returns `false` when missing.
    async fn increment_views(
        &self,
        id: &CommunityListId,
    ) -> Result<bool, CommunityListRepositoryError>;
}
