//! Rank-weighted vote tallies for community lists.
//!
//! A tally is an ordered collection of `(item, votes)` entries. Order is the
//! order in which items were first voted for; it decides ties when the top
//! five are rendered. Folding and retracting are pure: they take the tally by
//! value and hand back the updated one, leaving persistence to the caller.

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::LIST_LENGTH;

/// Points awarded to the item at `position` (0-indexed) of a ranked list.
///
/// The first item earns [`LIST_LENGTH`] points and the last earns one.
/// Positions past the end of a list earn nothing.
///
/// # Examples
/// ```
/// use lister::domain::lists::rank_weight;
///
/// assert_eq!(rank_weight(0), 5);
/// assert_eq!(rank_weight(4), 1);
/// assert_eq!(rank_weight(5), 0);
/// ```
pub fn rank_weight(position: usize) -> u32 {
    let remaining = LIST_LENGTH.saturating_sub(position);
    u32::try_from(remaining).unwrap_or(0)
}

/// Accumulated votes for a single item name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemVote {
    pub name: String,
    pub votes: u32,
}

impl ItemVote {
    pub fn new(name: impl Into<String>, votes: u32) -> Self {
        Self {
            name: name.into(),
            votes,
        }
    }
}

/// Inconsistency found while retracting votes.
///
/// Neither case aborts the retraction: a tally is a derived aggregate and
/// the best recovery is to keep it as close to the truth as possible.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RetractionAnomaly {
    /// The item had no entry in the tally.
    MissingItem { name: String },
    /// The item held fewer votes than the retracted weight; it was removed.
    Underflow { name: String, held: u32, weight: u32 },
}

/// Result of [`VoteTally::retract_votes`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Retraction {
    pub tally: VoteTally,
    /// `true` when no items remain and the community record should be erased.
    pub should_delete: bool,
    pub anomalies: Vec<RetractionAnomaly>,
}

/// Ordered vote tally keyed by item name.
///
/// ## Invariants
/// - Item names are unique.
/// - Every stored count is positive; entries that reach zero are removed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<ItemVote>", into = "Vec<ItemVote>")]
pub struct VoteTally {
    items: Vec<ItemVote>,
}

impl VoteTally {
    /// Rebuild a tally from stored entries.
    ///
    /// Duplicate names are merged into the first occurrence and zero counts
    /// are dropped so the invariants hold for whatever the store returned.
    pub fn from_items(entries: impl IntoIterator<Item = ItemVote>) -> Self {
        let mut tally = Self::default();
        for entry in entries {
            tally.add(&entry.name, entry.votes);
        }
        tally
    }

    /// Entries in first-vote order.
    pub fn items(&self) -> &[ItemVote] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Votes currently held by `name`, if tracked.
    pub fn votes_for(&self, name: &str) -> Option<u32> {
        self.position(name).map(|index| self.items[index].votes)
    }

    /// Fold a ranked list into the tally.
    ///
    /// Item `i` earns [`rank_weight`]`(i)` points; new names are appended.
    ///
    /// # Examples
    /// ```
    /// use lister::domain::lists::VoteTally;
    ///
    /// let ranked = ["A", "B", "C", "D", "E"].map(String::from);
    /// let tally = VoteTally::default().apply_votes(&ranked);
    /// assert_eq!(tally.votes_for("A"), Some(5));
    /// assert_eq!(tally.votes_for("E"), Some(1));
    /// ```
    #[must_use]
    pub fn apply_votes(mut self, ranked: &[String]) -> Self {
        for (position, name) in ranked.iter().enumerate().take(LIST_LENGTH) {
            self.add(name, rank_weight(position));
        }
        self
    }

    /// Remove a ranked list's contribution from the tally.
    ///
    /// Entries reaching zero are removed. Missing entries and underflows are
    /// logged and reported in [`Retraction::anomalies`]; an underflowing entry
    /// is clamped to zero and therefore removed.
    pub fn retract_votes(mut self, ranked: &[String]) -> Retraction {
        let mut anomalies = Vec::new();
        for (position, name) in ranked.iter().enumerate().take(LIST_LENGTH) {
            let weight = rank_weight(position);
            let Some(index) = self.position(name) else {
                warn!(item = %name, weight, "retracting votes for an item missing from the tally");
                anomalies.push(RetractionAnomaly::MissingItem { name: name.clone() });
                continue;
            };
            let held = self.items[index].votes;
            if held > weight {
                self.items[index].votes = held - weight;
                continue;
            }
            if held < weight {
                warn!(item = %name, held, weight, "vote count would go negative; clamping to zero");
                anomalies.push(RetractionAnomaly::Underflow {
                    name: name.clone(),
                    held,
                    weight,
                });
            }
            self.items.remove(index);
        }
        let should_delete = self.items.is_empty();
        Retraction {
            tally: self,
            should_delete,
            anomalies,
        }
    }

    /// Up to five entries ordered by votes, highest first.
    ///
    /// The sort is stable, so ties keep first-vote order.
    pub fn top_five(&self) -> Vec<&ItemVote> {
        let mut ranked: Vec<&ItemVote> = self.items.iter().collect();
        ranked.sort_by(|left, right| right.votes.cmp(&left.votes));
        ranked.truncate(LIST_LENGTH);
        ranked
    }

    /// Top five rendered as `"<name> (<votes> votes)"`.
    pub fn render_top_five(&self) -> Vec<String> {
        self.top_five()
            .into_iter()
            .map(|entry| format!("{} ({} votes)", entry.name, entry.votes))
            .collect()
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.items.iter().position(|entry| entry.name == name)
    }

    fn add(&mut self, name: &str, votes: u32) {
        if votes == 0 {
            return;
        }
        match self.position(name) {
            Some(index) => {
                let entry = &mut self.items[index];
                entry.votes = entry.votes.saturating_add(votes);
            }
            None => self.items.push(ItemVote::new(name, votes)),
        }
    }
}

impl From<Vec<ItemVote>> for VoteTally {
    fn from(value: Vec<ItemVote>) -> Self {
        Self::from_items(value)
    }
}

impl From<VoteTally> for Vec<ItemVote> {
    fn from(value: VoteTally) -> Self {
        value.items
    }
}
