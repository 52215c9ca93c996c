//! Keeps community aggregates in step with published personal lists.
//!
//! Each fold or retraction is a read-modify-write cycle guarded by the
//! aggregate's revision. Losing a race (a revision mismatch, a duplicate
//! name on first insert, or the record vanishing mid-cycle) re-reads and
//! tries again, up to [`MAX_WRITE_ATTEMPTS`] times.

use std::sync::Arc;

use serde_json::json;
use tracing::{debug, warn};

use crate::domain::Error;
use crate::domain::lists::{CommunityList, CommunityListId, PublishedOn, PublishedRanking};
use crate::domain::ports::{CommunityListRepository, CommunityListRepositoryError};

/// Read-modify-write attempts before giving up with `Conflict`.
pub const MAX_WRITE_ATTEMPTS: u32 = 5;

/// Message returned when a published list has no community aggregate.
pub const COMMUNITY_LIST_ERROR: &str = "Error with CommunityList";

/// Message returned when a community list id matches nothing.
pub const COMMUNITY_NOT_FOUND: &str = "Community List not found!";

/// Applies and retracts published rankings against community aggregates.
#[derive(Clone)]
pub struct CommunityLedger<C> {
    repo: Arc<C>,
}

impl<C> CommunityLedger<C> {
    pub fn new(repo: Arc<C>) -> Self {
        Self { repo }
    }
}

impl<C> CommunityLedger<C>
where
    C: CommunityListRepository,
{
    /// Whether a community aggregate exists for `name`.
    pub async fn exists(&self, name: &str) -> Result<bool, Error> {
        let found = self
            .repo
            .find_by_name(name)
            .await
            .map_err(map_community_error)?;
        Ok(found.is_some())
    }

    /// Fold `ranking` into the aggregate named after it, creating the
    /// aggregate on first publish.
    pub async fn fold(
        &self,
        ranking: &PublishedRanking,
        on: PublishedOn,
    ) -> Result<CommunityList, Error> {
        for attempt in 1..=MAX_WRITE_ATTEMPTS {
            let existing = self
                .repo
                .find_by_name(ranking.name())
                .await
                .map_err(map_community_error)?;

            let outcome = match existing {
                None => {
                    let mut created =
                        CommunityList::open(CommunityListId::random(), ranking.name(), on);
                    created.fold(ranking.items(), on);
                    self.repo.insert(&created).await.map(|()| created)
                }
                Some(mut list) => {
                    list.fold(ranking.items(), on);
                    let expected = list.advance_revision();
                    self.repo.save(&list, expected).await.map(|()| list)
                }
            };

            match outcome {
                Ok(list) => return Ok(list),
                Err(err) if is_contended(&err) => {
                    debug!(attempt, name = ranking.name(), error = %err, "community fold lost a race; retrying");
                }
                Err(err) => return Err(map_community_error(err)),
            }
        }
        Err(contention_exhausted(ranking.name()))
    }

    /// Remove a ranking's contribution from the aggregate named `name`,
    /// erasing the aggregate once no votes remain.
    ///
    /// A missing aggregate is a `Conflict`: the published list and its
    /// community record have diverged.
    pub async fn retract(&self, name: &str, items: &[String], on: PublishedOn) -> Result<(), Error> {
        for attempt in 1..=MAX_WRITE_ATTEMPTS {
            let Some(mut list) = self
                .repo
                .find_by_name(name)
                .await
                .map_err(map_community_error)?
            else {
                warn!(name, "published list has no community aggregate");
                return Err(Error::conflict(COMMUNITY_LIST_ERROR));
            };

            let retraction = list.retract(items, on);
            let expected = list.advance_revision();
            let outcome = if retraction.should_delete {
                self.repo.delete(list.id(), expected).await
            } else {
                self.repo.save(&list, expected).await
            };

            match outcome {
                Ok(()) => {
                    if retraction.should_delete {
                        debug!(name, "community aggregate emptied and removed");
                    }
                    return Ok(());
                }
                Err(err) if is_contended(&err) => {
                    debug!(attempt, name, error = %err, "community retraction lost a race; retrying");
                }
                Err(err) => return Err(map_community_error(err)),
            }
        }
        Err(contention_exhausted(name))
    }
}

fn is_contended(error: &CommunityListRepositoryError) -> bool {
    matches!(
        error,
        CommunityListRepositoryError::RevisionMismatch { .. }
            | CommunityListRepositoryError::DuplicateName { .. }
            | CommunityListRepositoryError::Missing { .. }
    )
}

fn contention_exhausted(name: &str) -> Error {
    warn!(name, attempts = MAX_WRITE_ATTEMPTS, "community aggregate stayed contended");
    Error::conflict("The community list is busy, please try again.").with_details(json!({
        "code": "revision_mismatch",
        "attempts": MAX_WRITE_ATTEMPTS,
    }))
}

pub(crate) fn map_community_error(error: CommunityListRepositoryError) -> Error {
    match error {
        CommunityListRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("community repository unavailable: {message}"))
        }
        CommunityListRepositoryError::Query { message } => {
            Error::internal(format!("community repository error: {message}"))
        }
        CommunityListRepositoryError::RevisionMismatch { expected, actual } => {
            Error::conflict("revision mismatch").with_details(json!({
                "expectedRevision": expected,
                "actualRevision": actual,
                "code": "revision_mismatch",
            }))
        }
        CommunityListRepositoryError::DuplicateName { name } => {
            Error::conflict(format!("community list {name} already exists"))
        }
        CommunityListRepositoryError::Missing { .. } => Error::not_found(COMMUNITY_NOT_FOUND),
    }
}
