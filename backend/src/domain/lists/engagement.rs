//! Likes, dislikes, views and comments shared by personal and community lists.

use serde::{Deserialize, Serialize};

use crate::domain::UserId;

/// Reaction a caller can toggle on a published list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Reaction {
    Like,
    Dislike,
}

/// A comment left on a published list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    /// Display name of the author when the comment was written.
    pub author: String,
    pub text: String,
}

impl Comment {
    pub fn new(author: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            author: author.into(),
            text: text.into(),
        }
    }
}

/// Engagement counters for a list.
///
/// ## Invariants
/// - A user id appears in at most one of `likes` and `dislikes`.
/// - Neither set holds duplicates; insertion order is preserved.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Engagement {
    likes: Vec<UserId>,
    dislikes: Vec<UserId>,
    views: u64,
    comments: Vec<Comment>,
}

impl Engagement {
    /// Rebuild engagement from stored parts, restoring the set invariants.
    pub fn from_parts(
        likes: Vec<UserId>,
        dislikes: Vec<UserId>,
        views: u64,
        comments: Vec<Comment>,
    ) -> Self {
        let mut engagement = Self {
            views,
            comments,
            ..Self::default()
        };
        for user in likes {
            if !engagement.likes.contains(&user) {
                engagement.likes.push(user);
            }
        }
        for user in dislikes {
            if !engagement.likes.contains(&user) && !engagement.dislikes.contains(&user) {
                engagement.dislikes.push(user);
            }
        }
        engagement
    }

    pub fn likes(&self) -> &[UserId] {
        &self.likes
    }

    pub fn dislikes(&self) -> &[UserId] {
        &self.dislikes
    }

    pub fn views(&self) -> u64 {
        self.views
    }

    pub fn comments(&self) -> &[Comment] {
        &self.comments
    }

    /// Toggle `reaction` for `user`.
    ///
    /// Repeating a reaction removes it; switching removes the opposite one.
    ///
    /// # Examples
    /// ```
    /// use lister::domain::UserId;
    /// use lister::domain::lists::{Engagement, Reaction};
    ///
    /// let user = UserId::random();
    /// let mut engagement = Engagement::default();
    /// engagement.toggle(Reaction::Like, user);
    /// engagement.toggle(Reaction::Dislike, user);
    /// assert!(engagement.likes().is_empty());
    /// assert_eq!(engagement.dislikes(), &[user]);
    /// ```
    pub fn toggle(&mut self, reaction: Reaction, user: UserId) {
        let (chosen, opposite) = match reaction {
            Reaction::Like => (&mut self.likes, &mut self.dislikes),
            Reaction::Dislike => (&mut self.dislikes, &mut self.likes),
        };
        if let Some(index) = chosen.iter().position(|existing| *existing == user) {
            chosen.remove(index);
            return;
        }
        opposite.retain(|existing| *existing != user);
        chosen.push(user);
    }

    pub fn add_comment(&mut self, comment: Comment) {
        self.comments.push(comment);
    }

    pub fn record_view(&mut self) {
        self.views = self.views.saturating_add(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Reaction::Like)]
    #[case(Reaction::Dislike)]
    fn toggling_twice_restores_original_state(#[case] reaction: Reaction) {
        let user = UserId::random();
        let mut engagement = Engagement::default();

        engagement.toggle(reaction, user);
        engagement.toggle(reaction, user);

        assert_eq!(engagement, Engagement::default());
    }

    #[rstest]
    fn like_then_dislike_leaves_only_dislike() {
        let user = UserId::random();
        let mut engagement = Engagement::default();

        engagement.toggle(Reaction::Like, user);
        engagement.toggle(Reaction::Dislike, user);

        assert!(engagement.likes().is_empty());
        assert_eq!(engagement.dislikes(), &[user]);
    }

    #[rstest]
    fn reactions_from_different_users_are_independent() {
        let ada = UserId::random();
        let grace = UserId::random();
        let mut engagement = Engagement::default();

        engagement.toggle(Reaction::Like, ada);
        engagement.toggle(Reaction::Dislike, grace);

        assert_eq!(engagement.likes(), &[ada]);
        assert_eq!(engagement.dislikes(), &[grace]);
    }

    #[rstest]
    fn from_parts_drops_duplicates_and_overlaps() {
        let ada = UserId::random();
        let grace = UserId::random();
        let engagement =
            Engagement::from_parts(vec![ada, ada], vec![ada, grace, grace], 3, Vec::new());

        assert_eq!(engagement.likes(), &[ada]);
        assert_eq!(engagement.dislikes(), &[grace]);
        assert_eq!(engagement.views(), 3);
    }

    #[rstest]
    fn comments_keep_order() {
        let mut engagement = Engagement::default();
        engagement.add_comment(Comment::new("Ada Lovelace", "first"));
        engagement.add_comment(Comment::new("Grace Hopper", "second"));
        engagement.record_view();

        let texts: Vec<&str> = engagement.comments().iter().map(|c| c.text.as_str()).collect();
        assert_eq!(texts, ["first", "second"]);
        assert_eq!(engagement.views(), 1);
    }
}
