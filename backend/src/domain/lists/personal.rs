//! User-owned Top 5 lists.

use super::{
    Comment, Engagement, ListEdit, ListId, PublishedOn, PublishedRanking, Reaction, LIST_LENGTH,
};
use crate::domain::UserId;

/// Name given to freshly created lists.
pub const DRAFT_LIST_NAME: &str = "Untitled";

/// Error raised when a mutation is not allowed in the list's current state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ListStateError {
    #[error("Cannot modify published list!")]
    AlreadyPublished,
}

/// Stored fields of a personal list, used by adapters to rebuild one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonalListParts {
    pub id: ListId,
    pub owner: UserId,
    pub owner_name: String,
    pub name: String,
    pub items: Vec<String>,
    pub engagement: Engagement,
    pub published_on: Option<PublishedOn>,
    pub revision: u32,
}

/// A user's ranked list of five items.
///
/// ## Invariants
/// - `id` and `owner` never change after creation.
/// - Unpublished lists carry default engagement; publishing resets it.
/// - Name and items are frozen once published.
/// - `revision` starts at 1 and grows by one per stored save.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonalList {
    id: ListId,
    owner: UserId,
    owner_name: String,
    name: String,
    items: Vec<String>,
    engagement: Engagement,
    published_on: Option<PublishedOn>,
    revision: u32,
}

impl PersonalList {
    /// New unpublished list with placeholder name and blank items.
    pub fn draft(id: ListId, owner: UserId, owner_name: impl Into<String>) -> Self {
        Self {
            id,
            owner,
            owner_name: owner_name.into(),
            name: DRAFT_LIST_NAME.to_owned(),
            items: vec![String::new(); LIST_LENGTH],
            engagement: Engagement::default(),
            published_on: None,
            revision: 1,
        }
    }

    pub fn from_parts(parts: PersonalListParts) -> Self {
        let PersonalListParts {
            id,
            owner,
            owner_name,
            name,
            items,
            engagement,
            published_on,
            revision,
        } = parts;
        Self {
            id,
            owner,
            owner_name,
            name,
            items,
            engagement,
            published_on,
            revision,
        }
    }

    pub fn id(&self) -> &ListId {
        &self.id
    }

    pub fn owner(&self) -> &UserId {
        &self.owner
    }

    /// Owner display name captured at creation, used for rendering.
    pub fn owner_name(&self) -> &str {
        &self.owner_name
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn items(&self) -> &[String] {
        &self.items
    }

    pub fn engagement(&self) -> &Engagement {
        &self.engagement
    }

    pub fn published_on(&self) -> Option<PublishedOn> {
        self.published_on
    }

    pub fn is_published(&self) -> bool {
        self.published_on.is_some()
    }

    pub fn revision(&self) -> u32 {
        self.revision
    }

    pub fn is_owned_by(&self, user: &UserId) -> bool {
        self.owner == *user
    }

    /// Published lists are public; drafts are visible to their owner only.
    pub fn is_visible_to(&self, viewer: Option<&UserId>) -> bool {
        self.is_published() || viewer.is_some_and(|user| self.is_owned_by(user))
    }

    /// Replace the name and items of a draft.
    pub fn apply_edit(&mut self, edit: ListEdit) -> Result<(), ListStateError> {
        if self.is_published() {
            return Err(ListStateError::AlreadyPublished);
        }
        let (name, items) = edit.into_parts();
        self.name = name;
        self.items = items;
        Ok(())
    }

    /// Freeze the list under `ranking` and reset its engagement.
    pub fn publish(
        &mut self,
        ranking: &PublishedRanking,
        on: PublishedOn,
    ) -> Result<(), ListStateError> {
        if self.is_published() {
            return Err(ListStateError::AlreadyPublished);
        }
        self.name = ranking.name().to_owned();
        self.items = ranking.items().to_vec();
        self.engagement = Engagement::default();
        self.published_on = Some(on);
        Ok(())
    }

    /// Toggle a reaction. Returns `false` without changes on drafts.
    pub fn react(&mut self, reaction: Reaction, user: UserId) -> bool {
        if !self.is_published() {
            return false;
        }
        self.engagement.toggle(reaction, user);
        true
    }

    /// Append a comment. Returns `false` without changes on drafts.
    pub fn comment(&mut self, comment: Comment) -> bool {
        if !self.is_published() {
            return false;
        }
        self.engagement.add_comment(comment);
        true
    }

    /// Count a view. Stores call this for published lists only.
    pub fn record_view(&mut self) {
        self.engagement.record_view();
    }

    /// Advance the revision ahead of a save and return the one the store
    /// must still hold for the save to succeed.
    pub fn advance_revision(&mut self) -> u32 {
        let expected = self.revision;
        self.revision = expected.saturating_add(1);
        expected
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rstest::{fixture, rstest};

    fn today() -> PublishedOn {
        PublishedOn::from(NaiveDate::from_ymd_opt(2024, 3, 9).expect("valid date"))
    }

    fn ranking(name: &str) -> PublishedRanking {
        let items = ["A", "B", "C", "D", "E"].map(String::from);
        PublishedRanking::try_new(name, &items).expect("valid ranking")
    }

    #[fixture]
    fn draft() -> PersonalList {
        PersonalList::draft(ListId::random(), UserId::random(), "Ada Lovelace")
    }

    #[rstest]
    fn drafts_start_blank(draft: PersonalList) {
        assert_eq!(draft.name(), DRAFT_LIST_NAME);
        assert_eq!(draft.items().len(), LIST_LENGTH);
        assert!(draft.items().iter().all(String::is_empty));
        assert!(!draft.is_published());
        assert_eq!(draft.engagement(), &Engagement::default());
        assert_eq!(draft.revision(), 1);
    }

    #[rstest]
    fn drafts_are_private_to_owner(draft: PersonalList) {
        let owner = *draft.owner();
        assert!(draft.is_visible_to(Some(&owner)));
        assert!(!draft.is_visible_to(Some(&UserId::random())));
        assert!(!draft.is_visible_to(None));
    }

    #[rstest]
    fn publishing_freezes_list_and_resets_engagement(mut draft: PersonalList) {
        draft.publish(&ranking("Films"), today()).expect("first publish");

        assert!(draft.is_published());
        assert!(draft.is_visible_to(None));
        assert_eq!(draft.name(), "Films");
        assert_eq!(draft.published_on(), Some(today()));
        assert_eq!(
            draft.publish(&ranking("Films"), today()),
            Err(ListStateError::AlreadyPublished)
        );
        let edit = ListEdit::try_new("x", vec![String::new(); LIST_LENGTH]).expect("edit");
        assert_eq!(draft.apply_edit(edit), Err(ListStateError::AlreadyPublished));
    }

    #[rstest]
    fn drafts_ignore_engagement(mut draft: PersonalList) {
        assert!(!draft.react(Reaction::Like, UserId::random()));
        assert!(!draft.comment(Comment::new("Ada Lovelace", "hello")));
        assert_eq!(draft.engagement(), &Engagement::default());
    }

    #[rstest]
    fn advance_revision_returns_previous(mut draft: PersonalList) {
        assert_eq!(draft.advance_revision(), 1);
        assert_eq!(draft.revision(), 2);
    }
}
