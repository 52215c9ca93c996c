//! In-memory community list repository.

use std::sync::Mutex;

use async_trait::async_trait;

use super::lock;
use crate::domain::lists::{CommunityList, CommunityListId};
use crate::domain::ports::{CommunityListRepository, CommunityListRepositoryError};

/// Aggregates kept in creation order; names are unique.
#[derive(Debug, Default)]
pub struct MemoryCommunityListRepository {
    lists: Mutex<Vec<CommunityList>>,
}

impl MemoryCommunityListRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

fn check_revision(
    stored: &CommunityList,
    expected_revision: u32,
) -> Result<(), CommunityListRepositoryError> {
    if stored.revision() == expected_revision {
        Ok(())
    } else {
        Err(CommunityListRepositoryError::revision_mismatch(
            expected_revision,
            stored.revision(),
        ))
    }
}

#[async_trait]
impl CommunityListRepository for MemoryCommunityListRepository {
    async fn insert(&self, list: &CommunityList) -> Result<(), CommunityListRepositoryError> {
        let mut lists = lock(&self.lists).map_err(CommunityListRepositoryError::query)?;
        if lists.iter().any(|existing| existing.name() == list.name()) {
            return Err(CommunityListRepositoryError::duplicate_name(list.name()));
        }
        lists.push(list.clone());
        Ok(())
    }

    async fn find_by_id(
        &self,
        id: &CommunityListId,
    ) -> Result<Option<CommunityList>, CommunityListRepositoryError> {
        let lists = lock(&self.lists).map_err(CommunityListRepositoryError::query)?;
        Ok(lists.iter().find(|list| list.id() == id).cloned())
    }

    async fn find_by_name(
        &self,
        name: &str,
    ) -> Result<Option<CommunityList>, CommunityListRepositoryError> {
        let lists = lock(&self.lists).map_err(CommunityListRepositoryError::query)?;
        Ok(lists.iter().find(|list| list.name() == name).cloned())
    }

    async fn list_all(&self) -> Result<Vec<CommunityList>, CommunityListRepositoryError> {
        let lists = lock(&self.lists).map_err(CommunityListRepositoryError::query)?;
        Ok(lists.clone())
    }

    async fn save(
        &self,
        list: &CommunityList,
        expected_revision: u32,
    ) -> Result<(), CommunityListRepositoryError> {
        let mut lists = lock(&self.lists).map_err(CommunityListRepositoryError::query)?;
        let stored = lists
            .iter_mut()
            .find(|existing| existing.id() == list.id())
            .ok_or_else(|| CommunityListRepositoryError::missing(list.id().to_string()))?;
        check_revision(stored, expected_revision)?;
        *stored = list.clone();
        Ok(())
    }

    async fn delete(
        &self,
        id: &CommunityListId,
        expected_revision: u32,
    ) -> Result<(), CommunityListRepositoryError> {
        let mut lists = lock(&self.lists).map_err(CommunityListRepositoryError::query)?;
        let index = lists
            .iter()
            .position(|existing| existing.id() == id)
            .ok_or_else(|| CommunityListRepositoryError::missing(id.to_string()))?;
        check_revision(&lists[index], expected_revision)?;
        lists.remove(index);
        Ok(())
    }

    async fn increment_views(
        &self,
        id: &CommunityListId,
    ) -> Result<bool, CommunityListRepositoryError> {
        let mut lists = lock(&self.lists).map_err(CommunityListRepositoryError::query)?;
        let Some(list) = lists.iter_mut().find(|list| list.id() == id) else {
            return Ok(false);
        };
        list.record_view();
        list.advance_revision();
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::UserId;
    use crate::domain::lists::{PublishedOn, Reaction};
    use chrono::NaiveDate;

    fn open(name: &str) -> CommunityList {
        let on = PublishedOn::from(NaiveDate::from_ymd_opt(2024, 1, 1).expect("valid date"));
        CommunityList::open(CommunityListId::random(), name, on)
    }

    #[tokio::test]
    async fn names_are_unique() {
        let repo = MemoryCommunityListRepository::new();
        repo.insert(&open("Films")).await.expect("first insert");

        let err = repo.insert(&open("Films")).await.expect_err("duplicate");
        assert_eq!(err, CommunityListRepositoryError::duplicate_name("Films"));
    }

    #[tokio::test]
    async fn views_invalidate_earlier_reads() {
        let repo = MemoryCommunityListRepository::new();
        let list = open("Films");
        repo.insert(&list).await.expect("insert");

        let mut stale = repo.find_by_name("Films").await.expect("read").expect("stored");
        assert!(repo.increment_views(list.id()).await.expect("increment"));
        stale.react(Reaction::Dislike, UserId::random());
        let expected = stale.advance_revision();

        let err = repo.save(&stale, expected).await.expect_err("stale save");
        assert_eq!(err, CommunityListRepositoryError::revision_mismatch(1_u32, 2_u32));
        let stored = repo.find_by_id(list.id()).await.expect("read").expect("stored");
        assert_eq!(stored.engagement().views(), 1);
    }

    #[tokio::test]
    async fn delete_respects_revision() {
        let repo = MemoryCommunityListRepository::new();
        let list = open("Films");
        repo.insert(&list).await.expect("insert");

        let err = repo.delete(list.id(), 7).await.expect_err("stale delete");
        assert_eq!(err, CommunityListRepositoryError::revision_mismatch(7_u32, 1_u32));
        repo.delete(list.id(), 1).await.expect("delete");
        assert!(repo.find_by_name("Films").await.expect("lookup").is_none());
    }

    #[tokio::test]
    async fn views_increment_in_place() {
        let repo = MemoryCommunityListRepository::new();
        let list = open("Films");
        repo.insert(&list).await.expect("insert");

        assert!(repo.increment_views(list.id()).await.expect("increment"));
        let stored = repo.find_by_id(list.id()).await.expect("lookup").expect("present");
        assert_eq!(stored.engagement().views(), 1);
        assert_eq!(stored.revision(), list.revision());
    }
}
