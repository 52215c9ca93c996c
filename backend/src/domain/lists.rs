//! Top 5 lists and their community aggregates.
//!
//! Personal lists are owned by one user and become public, and frozen, once
//! published. Every publish folds the list's ranking into the community list
//! sharing its name; deleting a published list retracts that contribution.

mod community;
mod engagement;
mod ids;
mod personal;
mod publish;
mod votes;

use std::fmt;

use chrono::{Datelike, NaiveDate};

pub use community::{COMMUNITY_OWNER, CommunityList, CommunityListParts, CommunityRetraction};
pub use engagement::{Comment, Engagement, Reaction};
pub use ids::{CommunityListId, InvalidListId, ListId};
pub use personal::{DRAFT_LIST_NAME, ListStateError, PersonalList, PersonalListParts};
pub use publish::{ListEdit, ListEditError, PublishValidationError, PublishedRanking};
pub use votes::{ItemVote, Retraction, RetractionAnomaly, VoteTally, rank_weight};

/// Number of ranked items in every list.
pub const LIST_LENGTH: usize = 5;

/// Calendar day a list was published, rendered as `[year, month, day]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PublishedOn(NaiveDate);

impl PublishedOn {
    pub fn date(&self) -> NaiveDate {
        self.0
    }

    /// `[year, month, day]` with a 1-based month.
    ///
    /// # Examples
    /// ```
    /// use chrono::NaiveDate;
    /// use lister::domain::lists::PublishedOn;
    ///
    /// let on = PublishedOn::from(NaiveDate::from_ymd_opt(2024, 1, 31).unwrap());
    /// assert_eq!(on.triple(), [2024, 1, 31]);
    /// ```
    pub fn triple(&self) -> [i32; 3] {
        // Month and day are at most 31, so the casts are lossless.
        [self.0.year(), self.0.month() as i32, self.0.day() as i32]
    }
}

impl From<NaiveDate> for PublishedOn {
    fn from(value: NaiveDate) -> Self {
        Self(value)
    }
}

impl fmt::Display for PublishedOn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
