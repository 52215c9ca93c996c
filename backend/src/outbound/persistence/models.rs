//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain. They exist solely to satisfy Diesel's
//! type requirements for queries and mutations.

use chrono::NaiveDate;
use diesel::prelude::*;
use serde_json::Value;
use uuid::Uuid;

use super::schema::{community_lists, top5_lists, users};

/// Row struct for reading from the users table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password_hash: String,
}

/// Insertable struct for creating new user records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub id: Uuid,
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub email: &'a str,
    pub password_hash: &'a str,
}

// ---------------------------------------------------------------------------
// Personal list models
// ---------------------------------------------------------------------------

/// Row struct for reading and inserting personal lists.
#[derive(Debug, Clone, PartialEq, Queryable, Selectable, Insertable)]
#[diesel(table_name = top5_lists)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct PersonalListRow {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub owner_name: String,
    pub name: String,
    pub items: Vec<String>,
    pub likes: Vec<Uuid>,
    pub dislikes: Vec<Uuid>,
    pub views: i64,
    pub comments: Value,
    pub published_on: Option<NaiveDate>,
    pub revision: i32,
}

/// Changeset written by revision-checked saves.
///
/// Owner columns are fixed at creation and deliberately absent.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = top5_lists)]
#[diesel(treat_none_as_null = true)]
pub(crate) struct PersonalListUpdate<'a> {
    pub name: &'a str,
    pub items: &'a [String],
    pub likes: &'a [Uuid],
    pub dislikes: &'a [Uuid],
    pub views: i64,
    pub comments: &'a Value,
    pub published_on: Option<NaiveDate>,
    pub revision: i32,
}

// ---------------------------------------------------------------------------
// Community list models
// ---------------------------------------------------------------------------

/// Row struct for reading and inserting community aggregates.
#[derive(Debug, Clone, PartialEq, Queryable, Selectable, Insertable)]
#[diesel(table_name = community_lists)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct CommunityListRow {
    pub id: Uuid,
    pub name: String,
    pub items: Value,
    pub likes: Vec<Uuid>,
    pub dislikes: Vec<Uuid>,
    pub views: i64,
    pub comments: Value,
    pub published_on: NaiveDate,
    pub revision: i32,
}

/// Changeset written by revision-checked saves.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = community_lists)]
pub(crate) struct CommunityListUpdate<'a> {
    pub items: &'a Value,
    pub likes: &'a [Uuid],
    pub dislikes: &'a [Uuid],
    pub views: i64,
    pub comments: &'a Value,
    pub published_on: NaiveDate,
    pub revision: i32,
}
