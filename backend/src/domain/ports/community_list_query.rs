//! Driving port for reading community aggregates. Open to anonymous callers.

use async_trait::async_trait;

use crate::domain::Error;
use crate::domain::lists::{CommunityList, CommunityListId};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CommunityListQuery: Send + Sync {
    async fn get(&self, id: &CommunityListId) -> Result<CommunityList, Error>;

    async fn list(&self) -> Result<Vec<CommunityList>, Error>;
}
