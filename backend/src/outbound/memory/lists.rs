//! In-memory personal list repository.

use std::sync::Mutex;

use async_trait::async_trait;

use super::lock;
use crate::domain::UserId;
use crate::domain::lists::{ListId, PersonalList};
use crate::domain::ports::{PersonalListRepository, PersonalListRepositoryError, ViewOutcome};

/// Lists kept in creation order.
#[derive(Debug, Default)]
pub struct MemoryPersonalListRepository {
    lists: Mutex<Vec<PersonalList>>,
}

impl MemoryPersonalListRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PersonalListRepository for MemoryPersonalListRepository {
    async fn insert(&self, list: &PersonalList) -> Result<(), PersonalListRepositoryError> {
        let mut lists = lock(&self.lists).map_err(PersonalListRepositoryError::query)?;
        if lists.iter().any(|existing| existing.id() == list.id()) {
            return Err(PersonalListRepositoryError::query(format!(
                "list {} already exists",
                list.id()
            )));
        }
        lists.push(list.clone());
        Ok(())
    }

    async fn find_by_id(
        &self,
        id: &ListId,
    ) -> Result<Option<PersonalList>, PersonalListRepositoryError> {
        let lists = lock(&self.lists).map_err(PersonalListRepositoryError::query)?;
        Ok(lists.iter().find(|list| list.id() == id).cloned())
    }

    async fn list_visible_to(
        &self,
        viewer: Option<UserId>,
    ) -> Result<Vec<PersonalList>, PersonalListRepositoryError> {
        let lists = lock(&self.lists).map_err(PersonalListRepositoryError::query)?;
        Ok(lists
            .iter()
            .filter(|list| list.is_visible_to(viewer.as_ref()))
            .cloned()
            .collect())
    }

    async fn find_published_by_owner_and_name(
        &self,
        owner: &UserId,
        name: &str,
    ) -> Result<Option<PersonalList>, PersonalListRepositoryError> {
        let lists = lock(&self.lists).map_err(PersonalListRepositoryError::query)?;
        Ok(lists
            .iter()
            .find(|list| list.is_published() && list.is_owned_by(owner) && list.name() == name)
            .cloned())
    }

    async fn save(
        &self,
        list: &PersonalList,
        expected_revision: u32,
    ) -> Result<(), PersonalListRepositoryError> {
        let mut lists = lock(&self.lists).map_err(PersonalListRepositoryError::query)?;
        let clash = list.is_published()
            && lists.iter().any(|existing| {
                existing.id() != list.id()
                    && existing.is_published()
                    && existing.is_owned_by(list.owner())
                    && existing.name() == list.name()
            });
        if clash {
            return Err(PersonalListRepositoryError::duplicate_name(list.name()));
        }
        let stored = lists
            .iter_mut()
            .find(|existing| existing.id() == list.id())
            .ok_or_else(|| PersonalListRepositoryError::missing(list.id().to_string()))?;
        if stored.revision() != expected_revision {
            return Err(PersonalListRepositoryError::revision_mismatch(
                expected_revision,
                stored.revision(),
            ));
        }
        *stored = list.clone();
        Ok(())
    }

    async fn delete(&self, id: &ListId) -> Result<bool, PersonalListRepositoryError> {
        let mut lists = lock(&self.lists).map_err(PersonalListRepositoryError::query)?;
        let before = lists.len();
        lists.retain(|list| list.id() != id);
        Ok(lists.len() != before)
    }

    async fn increment_views(
        &self,
        id: &ListId,
    ) -> Result<ViewOutcome, PersonalListRepositoryError> {
        let mut lists = lock(&self.lists).map_err(PersonalListRepositoryError::query)?;
        let Some(list) = lists.iter_mut().find(|list| list.id() == id) else {
            return Ok(ViewOutcome::Missing);
        };
        if !list.is_published() {
            return Ok(ViewOutcome::NotPublished);
        }
        list.record_view();
        list.advance_revision();
        Ok(ViewOutcome::Counted)
    }
}
