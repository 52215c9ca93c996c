//! Driving port for community list engagement.

use async_trait::async_trait;

use crate::domain::lists::{CommunityList, CommunityListId, Reaction};
use crate::domain::{Error, UserId};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CommunityListCommand: Send + Sync {
    async fn toggle_reaction(
        &self,
        id: &CommunityListId,
        caller: &UserId,
        reaction: Reaction,
    ) -> Result<CommunityList, Error>;

    async fn add_comment(
        &self,
        id: &CommunityListId,
        caller: &UserId,
        text: String,
    ) -> Result<CommunityList, Error>;

    async fn record_view(&self, id: &CommunityListId) -> Result<(), Error>;
}
