//! Community aggregates: one per distinct published list name.

use super::{
    Comment, CommunityListId, Engagement, PublishedOn, Reaction, RetractionAnomaly, VoteTally,
};
use crate::domain::UserId;

/// Owner label rendered for every community list.
pub const COMMUNITY_OWNER: &str = "Community";

/// Stored fields of a community list, used by adapters to rebuild one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommunityListParts {
    pub id: CommunityListId,
    pub name: String,
    pub tally: VoteTally,
    pub engagement: Engagement,
    pub published_on: PublishedOn,
    pub revision: u32,
}

/// Outcome of retracting a published list from its community aggregate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommunityRetraction {
    /// `true` when no votes remain and the record must be erased.
    pub should_delete: bool,
    pub anomalies: Vec<RetractionAnomaly>,
}

/// Vote-weighted aggregate of every list published under one name.
///
/// ## Invariants
/// - `name` is unique across community lists.
/// - A stored community list always has at least one tracked item.
/// - `published_on` is the date of the latest contributing publish or
///   retraction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommunityList {
    id: CommunityListId,
    name: String,
    tally: VoteTally,
    engagement: Engagement,
    published_on: PublishedOn,
    revision: u32,
}

impl CommunityList {
    /// Empty aggregate for `name`; callers fold a ranking in before storing it.
    pub fn open(id: CommunityListId, name: impl Into<String>, on: PublishedOn) -> Self {
        Self {
            id,
            name: name.into(),
            tally: VoteTally::default(),
            engagement: Engagement::default(),
            published_on: on,
            revision: 1,
        }
    }

    pub fn from_parts(parts: CommunityListParts) -> Self {
        let CommunityListParts {
            id,
            name,
            tally,
            engagement,
            published_on,
            revision,
        } = parts;
        Self {
            id,
            name,
            tally,
            engagement,
            published_on,
            revision,
        }
    }

    pub fn id(&self) -> &CommunityListId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn tally(&self) -> &VoteTally {
        &self.tally
    }

    pub fn engagement(&self) -> &Engagement {
        &self.engagement
    }

    pub fn published_on(&self) -> PublishedOn {
        self.published_on
    }

    pub fn revision(&self) -> u32 {
        self.revision
    }

    /// Add a ranked list's weights.
    pub fn fold(&mut self, ranked: &[String], on: PublishedOn) {
        let tally = std::mem::take(&mut self.tally);
        self.tally = tally.apply_votes(ranked);
        self.published_on = on;
    }

    /// Remove a ranked list's weights.
    pub fn retract(&mut self, ranked: &[String], on: PublishedOn) -> CommunityRetraction {
        let tally = std::mem::take(&mut self.tally);
        let outcome = tally.retract_votes(ranked);
        self.tally = outcome.tally;
        self.published_on = on;
        CommunityRetraction {
            should_delete: outcome.should_delete,
            anomalies: outcome.anomalies,
        }
    }

    pub fn react(&mut self, reaction: Reaction, user: UserId) {
        self.engagement.toggle(reaction, user);
    }

    pub fn comment(&mut self, comment: Comment) {
        self.engagement.add_comment(comment);
    }

    pub fn record_view(&mut self) {
        self.engagement.record_view();
    }

    /// See [`super::PersonalList::advance_revision`].
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
    use rstest::rstest;

    fn on(day: u32) -> PublishedOn {
        PublishedOn::from(NaiveDate::from_ymd_opt(2024, 5, day).expect("valid date"))
    }

    fn ranked(items: [&str; 5]) -> Vec<String> {
        items.map(String::from).to_vec()
    }

    #[rstest]
    fn fold_and_retract_track_latest_date() {
        let mut list = CommunityList::open(CommunityListId::random(), "Films", on(1));
        let first = ranked(["A", "B", "C", "D", "E"]);
        let second = ranked(["B", "A", "F", "G", "H"]);

        list.fold(&first, on(2));
        list.fold(&second, on(3));
        assert_eq!(list.tally().votes_for("A"), Some(9));
        assert_eq!(list.published_on(), on(3));

        let outcome = list.retract(&second, on(4));
        assert!(!outcome.should_delete);
        assert_eq!(list.tally().votes_for("A"), Some(5));
        assert_eq!(list.tally().votes_for("F"), None);
        assert_eq!(list.published_on(), on(4));

        let outcome = list.retract(&first, on(5));
        assert!(outcome.should_delete);
        assert!(outcome.anomalies.is_empty());
    }

    #[rstest]
    fn engagement_needs_no_publish_state() {
        let mut list = CommunityList::open(CommunityListId::random(), "Films", on(1));
        let user = UserId::random();

        list.react(Reaction::Dislike, user);
        list.comment(Comment::new("Ada Lovelace", "nice"));

        assert_eq!(list.engagement().dislikes(), &[user]);
        assert_eq!(list.engagement().comments().len(), 1);
    }
}
