//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match the database migrations exactly. They are used
//! by Diesel for compile-time query validation and type-safe SQL generation.
//!
//! # Maintenance
//!
//! When migrations change the schema, this file should be regenerated or
//! manually updated to reflect those changes. The `diesel print-schema`
//! command can generate these definitions from a live database.

diesel::table! {
    /// Registered accounts.
    ///
    /// `email` is stored lower-cased and carries a unique index.
    users (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        first_name -> Varchar,
        last_name -> Varchar,
        /// Lower-cased login email (unique).
        email -> Varchar,
        /// Argon2 PHC string.
        password_hash -> Text,
        /// Record creation timestamp.
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Personal Top 5 lists.
    ///
    /// A partial unique index on `(owner_id, name)` covers published rows
    /// only, so drafts may share names.
    top5_lists (id) {
        id -> Uuid,
        /// Owning account (foreign key to `users.id`).
        owner_id -> Uuid,
        /// Owner display name captured at creation.
        owner_name -> Varchar,
        name -> Varchar,
        /// Exactly five ranked entries; blanks allowed on drafts.
        items -> Array<Text>,
        likes -> Array<Uuid>,
        dislikes -> Array<Uuid>,
        views -> Int8,
        /// JSON array of `{ "author", "text" }` objects.
        comments -> Jsonb,
        /// Publication date; `NULL` for drafts.
        published_on -> Nullable<Date>,
        /// Optimistic concurrency revision.
        revision -> Int4,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Community aggregates, one per published list name.
    community_lists (id) {
        id -> Uuid,
        /// Aggregate key (unique).
        name -> Varchar,
        /// JSON array of `{ "name", "votes" }` objects in insertion order.
        items -> Jsonb,
        likes -> Array<Uuid>,
        dislikes -> Array<Uuid>,
        views -> Int8,
        comments -> Jsonb,
        /// Date of the latest contributing publish or retraction.
        published_on -> Date,
        revision -> Int4,
        created_at -> Timestamptz,
    }
}

diesel::joinable!(top5_lists -> users (owner_id));

diesel::allow_tables_to_appear_in_same_query!(users, top5_lists, community_lists);
