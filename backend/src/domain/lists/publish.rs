//! Validation of publish and edit payloads.

use std::collections::HashSet;
use std::fmt;

use super::LIST_LENGTH;

/// Reasons a publish payload is rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublishValidationError {
    MissingName,
    WrongItemCount { found: usize },
    BlankItem { position: usize },
    DuplicateItem { item: String },
}

impl fmt::Display for PublishValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingName | Self::WrongItemCount { .. } | Self::BlankItem { .. } => {
                write!(f, "Must fill in all items and title.")
            }
            Self::DuplicateItem { .. } => write!(f, "All items should be unique"),
        }
    }
}

impl std::error::Error for PublishValidationError {}

/// A validated ranking ready to be published.
///
/// ## Invariants
/// - `name` is trimmed and non-empty.
/// - Exactly [`LIST_LENGTH`] items, each trimmed, non-empty and distinct.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishedRanking {
    name: String,
    items: Vec<String>,
}

impl PublishedRanking {
    /// Validate a raw publish payload.
    ///
    /// # Examples
    /// ```
    /// use lister::domain::lists::PublishedRanking;
    ///
    /// let items = ["Pizza", "Sushi", "Tacos", "Ramen", "Curry"].map(String::from);
    /// let ranking = PublishedRanking::try_new("Dinners", &items).unwrap();
    /// assert_eq!(ranking.items()[0], "Pizza");
    ///
    /// let dupes = ["Pizza", "Pizza", "Tacos", "Ramen", "Curry"].map(String::from);
    /// assert!(PublishedRanking::try_new("Dinners", &dupes).is_err());
    /// ```
    pub fn try_new(name: &str, items: &[String]) -> Result<Self, PublishValidationError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(PublishValidationError::MissingName);
        }
        if items.len() != LIST_LENGTH {
            return Err(PublishValidationError::WrongItemCount { found: items.len() });
        }

        let mut seen = HashSet::with_capacity(LIST_LENGTH);
        let mut cleaned = Vec::with_capacity(LIST_LENGTH);
        for (position, raw) in items.iter().enumerate() {
            let item = raw.trim();
            if item.is_empty() {
                return Err(PublishValidationError::BlankItem { position });
            }
            if !seen.insert(item) {
                return Err(PublishValidationError::DuplicateItem {
                    item: item.to_owned(),
                });
            }
            cleaned.push(item.to_owned());
        }

        Ok(Self {
            name: name.to_owned(),
            items: cleaned,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Items in rank order.
    pub fn items(&self) -> &[String] {
        &self.items
    }
}

/// Draft edit of an unpublished list. Blank items are allowed while editing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListEdit {
    name: String,
    items: Vec<String>,
}

/// Reasons an edit payload is rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListEditError {
    WrongItemCount { found: usize },
}

impl fmt::Display for ListEditError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::WrongItemCount { found } => write!(
                f,
                "A Top 5 List needs exactly {LIST_LENGTH} items, got {found}."
            ),
        }
    }
}

impl std::error::Error for ListEditError {}

impl ListEdit {
    pub fn try_new(name: impl Into<String>, items: Vec<String>) -> Result<Self, ListEditError> {
        if items.len() != LIST_LENGTH {
            return Err(ListEditError::WrongItemCount { found: items.len() });
        }
        Ok(Self {
            name: name.into(),
            items,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn items(&self) -> &[String] {
        &self.items
    }

    pub(crate) fn into_parts(self) -> (String, Vec<String>) {
        (self.name, self.items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn items(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|item| (*item).to_owned()).collect()
    }

    #[rstest]
    #[case("", &["A", "B", "C", "D", "E"], PublishValidationError::MissingName)]
    #[case("  ", &["A", "B", "C", "D", "E"], PublishValidationError::MissingName)]
    #[case("Films", &["A", "B", "C", "D"], PublishValidationError::WrongItemCount { found: 4 })]
    #[case("Films", &["A", "B", "C", "D", "E", "F"], PublishValidationError::WrongItemCount { found: 6 })]
    #[case("Films", &["A", "B", " ", "D", "E"], PublishValidationError::BlankItem { position: 2 })]
    #[case("Films", &["A", "B", "C", "A", "E"], PublishValidationError::DuplicateItem { item: "A".into() })]
    #[case("Films", &["A", "B ", "C", " B", "E"], PublishValidationError::DuplicateItem { item: "B".into() })]
    fn rejects_invalid_payloads(
        #[case] name: &str,
        #[case] raw: &[&str],
        #[case] expected: PublishValidationError,
    ) {
        let err = PublishedRanking::try_new(name, &items(raw)).expect_err("payload must fail");
        assert_eq!(err, expected);
    }

    #[rstest]
    fn messages_match_client_copy() {
        assert_eq!(
            PublishValidationError::BlankItem { position: 0 }.to_string(),
            "Must fill in all items and title."
        );
        assert_eq!(
            PublishValidationError::DuplicateItem { item: "A".into() }.to_string(),
            "All items should be unique"
        );
    }

    #[rstest]
    fn trims_name_and_items() {
        let ranking = PublishedRanking::try_new(" Films ", &items(&[" A", "B ", "C", "D", "E"]))
            .expect("valid payload");
        assert_eq!(ranking.name(), "Films");
        assert_eq!(ranking.items(), items(&["A", "B", "C", "D", "E"]).as_slice());
    }

    #[rstest]
    fn edits_allow_blanks_but_need_five_items() {
        let edit = ListEdit::try_new("", items(&["", "", "", "", ""])).expect("blank draft");
        assert_eq!(edit.items().len(), LIST_LENGTH);
        assert_eq!(
            ListEdit::try_new("x", items(&["a"])),
            Err(ListEditError::WrongItemCount { found: 1 })
        );
    }
}
