//! Personal list use-cases.
//!
//! Publishing and deleting keep the community aggregates consistent with the
//! set of published lists:
//! - publish folds into the community list first, then saves the personal
//!   list, retracting the fold again if that save fails;
//! - delete removes the personal list first, then retracts, restoring the
//!   personal list if the retraction fails.
//!
//! Either way each published ranking is counted exactly once.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use serde_json::json;
use tracing::{debug, error, info, warn};

use crate::domain::account_service::resolve_caller;
use crate::domain::community_ledger::{COMMUNITY_LIST_ERROR, CommunityLedger, MAX_WRITE_ATTEMPTS};
use crate::domain::lists::{
    Comment, ListEdit, ListId, PersonalList, PublishValidationError, PublishedOn,
    PublishedRanking, Reaction,
};
use crate::domain::ports::{
    CommunityListRepository, ListCommand, ListQuery, PersonalListRepository,
    PersonalListRepositoryError, PublishRequest, UserRepository, ViewOutcome,
};
use crate::domain::{Error, UserId};

/// Message returned for missing lists and lists owned by someone else.
pub const LIST_NOT_FOUND: &str = "Top 5 List not found!";
/// Message returned when publishing a second list under the same name.
pub const DUPLICATE_PUBLISH_NAME: &str = "Cannot publish list with same name";
/// Message returned when a blank comment is submitted.
pub const BLANK_COMMENT: &str = "Please enter a comment.";

/// Personal list service implementing [`ListCommand`] and [`ListQuery`].
#[derive(Clone)]
pub struct ListService<L, C, U> {
    lists: Arc<L>,
    users: Arc<U>,
    ledger: CommunityLedger<C>,
    clock: Arc<dyn Clock>,
}

impl<L, C, U> ListService<L, C, U> {
    pub fn new(lists: Arc<L>, community: Arc<C>, users: Arc<U>, clock: Arc<dyn Clock>) -> Self {
        Self {
            lists,
            users,
            ledger: CommunityLedger::new(community),
            clock,
        }
    }

    fn today(&self) -> PublishedOn {
        PublishedOn::from(self.clock.local().date_naive())
    }
}

impl<L, C, U> ListService<L, C, U>
where
    L: PersonalListRepository,
    C: CommunityListRepository,
    U: UserRepository,
{
    async fn find_owned(&self, id: &ListId, owner: &UserId) -> Result<PersonalList, Error> {
        self.lists
            .find_by_id(id)
            .await
            .map_err(map_list_error)?
            .filter(|list| list.is_owned_by(owner))
            .ok_or_else(|| Error::not_found(LIST_NOT_FOUND))
    }

    /// Apply `change` to a published list and save it, retrying on lost
    /// races. Drafts come back unchanged to their owner and are not found
    /// for anyone else.
    async fn update_published<F>(
        &self,
        id: &ListId,
        viewer: &UserId,
        change: F,
    ) -> Result<PersonalList, Error>
    where
        F: Fn(&mut PersonalList) -> bool + Send + Sync,
    {
        for attempt in 1..=MAX_WRITE_ATTEMPTS {
            let mut list = self
                .lists
                .find_by_id(id)
                .await
                .map_err(map_list_error)?
                .filter(|list| list.is_visible_to(Some(viewer)))
                .ok_or_else(|| Error::not_found(LIST_NOT_FOUND))?;
            if !change(&mut list) {
                return Ok(list);
            }
            let expected = list.advance_revision();
            match self.lists.save(&list, expected).await {
                Ok(()) => return Ok(list),
                Err(PersonalListRepositoryError::RevisionMismatch { .. }) => {
                    debug!(attempt, list_id = %id, "list engagement lost a race; retrying");
                }
                Err(err) => return Err(map_list_error(err)),
            }
        }
        Err(Error::conflict("The list is busy, please try again.").with_details(json!({
            "code": "revision_mismatch",
            "attempts": MAX_WRITE_ATTEMPTS,
        })))
    }
}

#[async_trait]
impl<L, C, U> ListCommand for ListService<L, C, U>
where
    L: PersonalListRepository,
    C: CommunityListRepository,
    U: UserRepository,
{
    async fn create(&self, owner: &UserId) -> Result<PersonalList, Error> {
        let user =
            resolve_caller(self.users.as_ref(), owner, "Please log in to create new list").await?;
        let list = PersonalList::draft(ListId::random(), *user.id(), user.display_name());
        self.lists.insert(&list).await.map_err(map_list_error)?;
        info!(list_id = %list.id(), owner = %owner, "created draft list");
        Ok(list)
    }

    async fn update(
        &self,
        id: &ListId,
        owner: &UserId,
        edit: ListEdit,
    ) -> Result<PersonalList, Error> {
        let mut list = self.find_owned(id, owner).await?;
        list.apply_edit(edit)
            .map_err(|err| Error::conflict(err.to_string()))?;
        let expected = list.advance_revision();
        self.lists
            .save(&list, expected)
            .await
            .map_err(map_list_error)?;
        Ok(list)
    }

    async fn publish(
        &self,
        id: &ListId,
        owner: &UserId,
        request: PublishRequest,
    ) -> Result<PersonalList, Error> {
        let ranking = PublishedRanking::try_new(&request.name, &request.items)
            .map_err(publish_validation_error)?;
        let mut list = self.find_owned(id, owner).await?;
        let today = self.today();
        list.publish(&ranking, today)
            .map_err(|err| Error::conflict(err.to_string()))?;

        let clash = self
            .lists
            .find_published_by_owner_and_name(owner, ranking.name())
            .await
            .map_err(map_list_error)?;
        if clash.is_some_and(|existing| existing.id() != id) {
            return Err(Error::conflict(DUPLICATE_PUBLISH_NAME));
        }

        self.ledger.fold(&ranking, today).await?;

        let expected = list.advance_revision();
        if let Err(err) = self.lists.save(&list, expected).await {
            let failure = map_list_error(err);
            if let Err(compensation) = self
                .ledger
                .retract(ranking.name(), ranking.items(), today)
                .await
            {
                error!(list_id = %id, error = %compensation, "failed to undo community fold after publish failure");
            }
            return Err(failure);
        }

        info!(list_id = %id, name = ranking.name(), "published list");
        Ok(list)
    }

    async fn delete(&self, id: &ListId, owner: &UserId) -> Result<PersonalList, Error> {
        let list = self.find_owned(id, owner).await?;

        if list.is_published() && !self.ledger.exists(list.name()).await? {
            warn!(list_id = %id, name = list.name(), "published list has no community aggregate");
            return Err(Error::conflict(COMMUNITY_LIST_ERROR));
        }

        let removed = self.lists.delete(id).await.map_err(map_list_error)?;
        if !removed {
            return Err(Error::not_found(LIST_NOT_FOUND));
        }

        if list.is_published() {
            if let Err(err) = self
                .ledger
                .retract(list.name(), list.items(), self.today())
                .await
            {
                if let Err(restore) = self.lists.insert(&list).await {
                    error!(list_id = %id, error = %restore, "failed to restore list after retraction failure");
                }
                return Err(err);
            }
        }

        info!(list_id = %id, published = list.is_published(), "deleted list");
        Ok(list)
    }

    async fn toggle_reaction(
        &self,
        id: &ListId,
        caller: &UserId,
        reaction: Reaction,
    ) -> Result<PersonalList, Error> {
        let user = resolve_caller(self.users.as_ref(), caller, "Please login to like/dislike").await?;
        let user_id = *user.id();
        self.update_published(id, &user_id, move |list| list.react(reaction, user_id))
            .await
    }

    async fn add_comment(
        &self,
        id: &ListId,
        caller: &UserId,
        text: String,
    ) -> Result<PersonalList, Error> {
        let text = text.trim();
        if text.is_empty() {
            return Err(Error::invalid_request(BLANK_COMMENT));
        }
        let user =
            resolve_caller(self.users.as_ref(), caller, "Please login to leave comments").await?;
        let comment = Comment::new(user.display_name(), text);
        self.update_published(id, user.id(), move |list| list.comment(comment.clone()))
            .await
    }

    async fn record_view(&self, id: &ListId) -> Result<(), Error> {
        match self
            .lists
            .increment_views(id)
            .await
            .map_err(map_list_error)?
        {
            ViewOutcome::Counted | ViewOutcome::NotPublished => Ok(()),
            ViewOutcome::Missing => Err(Error::not_found(LIST_NOT_FOUND)),
        }
    }
}

#[async_trait]
impl<L, C, U> ListQuery for ListService<L, C, U>
where
    L: PersonalListRepository,
    C: CommunityListRepository,
    U: UserRepository,
{
    async fn get(&self, id: &ListId, viewer: Option<UserId>) -> Result<PersonalList, Error> {
        self.lists
            .find_by_id(id)
            .await
            .map_err(map_list_error)?
            .filter(|list| list.is_visible_to(viewer.as_ref()))
            .ok_or_else(|| Error::not_found(LIST_NOT_FOUND))
    }

    async fn list_visible(&self, viewer: Option<UserId>) -> Result<Vec<PersonalList>, Error> {
        self.lists
            .list_visible_to(viewer)
            .await
            .map_err(map_list_error)
    }
}

fn publish_validation_error(error: PublishValidationError) -> Error {
    let details = match &error {
        PublishValidationError::MissingName => json!({ "field": "name" }),
        PublishValidationError::WrongItemCount { found } => {
            json!({ "field": "items", "found": found })
        }
        PublishValidationError::BlankItem { position } => {
            json!({ "field": "items", "position": position })
        }
        PublishValidationError::DuplicateItem { item } => {
            json!({ "field": "items", "duplicate": item })
        }
    };
    Error::validation(error.to_string()).with_details(details)
}

pub(crate) fn map_list_error(error: PersonalListRepositoryError) -> Error {
    match error {
        PersonalListRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("list repository unavailable: {message}"))
        }
        PersonalListRepositoryError::Query { message } => {
            Error::internal(format!("list repository error: {message}"))
        }
        PersonalListRepositoryError::RevisionMismatch { expected, actual } => {
            Error::conflict("The list was changed by another request.").with_details(json!({
                "expectedRevision": expected,
                "actualRevision": actual,
                "code": "revision_mismatch",
            }))
        }
        PersonalListRepositoryError::Missing { .. } => Error::not_found(LIST_NOT_FOUND),
        PersonalListRepositoryError::DuplicateName { .. } => {
            Error::conflict(DUPLICATE_PUBLISH_NAME)
        }
    }
}

#[cfg(test)]
#[path = "list_service_tests.rs"]
mod tests;
