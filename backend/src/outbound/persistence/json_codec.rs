//! JSONB encoding for list columns that have no relational shape.
//!
//! Comments keep their order as an array of `{ "author", "text" }` objects and
//! vote tallies as an array of `{ "name", "votes" }` objects, so insertion
//! order (and with it the tie-break for rendering) survives a round trip.

use serde_json::Value;

use crate::domain::lists::{Comment, VoteTally};

pub(super) fn comments_to_json(comments: &[Comment]) -> Result<Value, String> {
    serde_json::to_value(comments).map_err(|err| format!("encode comments: {err}"))
}

pub(super) fn json_to_comments(value: Value) -> Result<Vec<Comment>, String> {
    serde_json::from_value(value).map_err(|err| format!("decode comments: {err}"))
}

pub(super) fn tally_to_json(tally: &VoteTally) -> Result<Value, String> {
    serde_json::to_value(tally).map_err(|err| format!("encode vote tally: {err}"))
}

pub(super) fn json_to_tally(value: Value) -> Result<VoteTally, String> {
    serde_json::from_value(value).map_err(|err| format!("decode vote tally: {err}"))
}
