//! Community list reads and engagement.
//!
//! Votes are only changed through [`super::CommunityLedger`] when personal
//! lists are published or deleted; this service handles everything else.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::debug;

use crate::domain::account_service::resolve_caller;
use crate::domain::community_ledger::{COMMUNITY_NOT_FOUND, MAX_WRITE_ATTEMPTS, map_community_error};
use crate::domain::list_service::BLANK_COMMENT;
use crate::domain::lists::{Comment, CommunityList, CommunityListId, Reaction};
use crate::domain::ports::{
    CommunityListCommand, CommunityListQuery, CommunityListRepository,
    CommunityListRepositoryError, UserRepository,
};
use crate::domain::{Error, UserId};

/// Community list service implementing the community driving ports.
#[derive(Clone)]
pub struct CommunityListService<C, U> {
    lists: Arc<C>,
    users: Arc<U>,
}

impl<C, U> CommunityListService<C, U> {
    pub fn new(lists: Arc<C>, users: Arc<U>) -> Self {
        Self { lists, users }
    }
}

impl<C, U> CommunityListService<C, U>
where
    C: CommunityListRepository,
    U: UserRepository,
{
    async fn update<F>(&self, id: &CommunityListId, change: F) -> Result<CommunityList, Error>
    where
        F: Fn(&mut CommunityList) + Send + Sync,
    {
        for attempt in 1..=MAX_WRITE_ATTEMPTS {
            let mut list = self
                .lists
                .find_by_id(id)
                .await
                .map_err(map_community_error)?
                .ok_or_else(|| Error::not_found(COMMUNITY_NOT_FOUND))?;
            change(&mut list);
            let expected = list.advance_revision();
            match self.lists.save(&list, expected).await {
                Ok(()) => return Ok(list),
                Err(CommunityListRepositoryError::RevisionMismatch { .. }) => {
                    debug!(attempt, community_id = %id, "community engagement lost a race; retrying");
                }
                Err(err) => return Err(map_community_error(err)),
            }
        }
        Err(Error::conflict("The community list is busy, please try again.").with_details(
            json!({
                "code": "revision_mismatch",
                "attempts": MAX_WRITE_ATTEMPTS,
            }),
        ))
    }
}

#[async_trait]
impl<C, U> CommunityListCommand for CommunityListService<C, U>
where
    C: CommunityListRepository,
    U: UserRepository,
{
    async fn toggle_reaction(
        &self,
        id: &CommunityListId,
        caller: &UserId,
        reaction: Reaction,
    ) -> Result<CommunityList, Error> {
        let user = resolve_caller(self.users.as_ref(), caller, "Please login to like/dislike").await?;
        let user_id = *user.id();
        self.update(id, move |list| list.react(reaction, user_id))
            .await
    }

    async fn add_comment(
        &self,
        id: &CommunityListId,
        caller: &UserId,
        text: String,
    ) -> Result<CommunityList, Error> {
        let text = text.trim();
        if text.is_empty() {
            return Err(Error::invalid_request(BLANK_COMMENT));
        }
        let user =
            resolve_caller(self.users.as_ref(), caller, "Please login to leave comments").await?;
        let comment = Comment::new(user.display_name(), text);
        self.update(id, move |list| list.comment(comment.clone()))
            .await
    }

    async fn record_view(&self, id: &CommunityListId) -> Result<(), Error> {
        let counted = self
            .lists
            .increment_views(id)
            .await
            .map_err(map_community_error)?;
        if counted {
            Ok(())
        } else {
            Err(Error::not_found(COMMUNITY_NOT_FOUND))
        }
    }
}

#[async_trait]
impl<C, U> CommunityListQuery for CommunityListService<C, U>
where
    C: CommunityListRepository,
    U: UserRepository,
{
    async fn get(&self, id: &CommunityListId) -> Result<CommunityList, Error> {
        self.lists
            .find_by_id(id)
            .await
            .map_err(map_community_error)?
            .ok_or_else(|| Error::not_found(COMMUNITY_NOT_FOUND))
    }

    async fn list(&self) -> Result<Vec<CommunityList>, Error> {
        self.lists.list_all().await.map_err(map_community_error)
    }
}
