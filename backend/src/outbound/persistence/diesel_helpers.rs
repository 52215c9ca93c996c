//! Shared helpers for Diesel repository implementations.
//!
//! This module provides common utilities for database access including:
//! - Error classification from Diesel errors into port error constructors
//! - Revision and counter casting between database and domain types

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::debug;

use super::pool::PoolError;

/// How a Diesel failure should surface through a port error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum DieselFailure {
    /// The connection dropped; callers may retry later.
    Connection(&'static str),
    /// A unique index rejected the write. Carries the constraint name.
    UniqueViolation(Option<String>),
    /// Any other failure.
    Query(&'static str),
}

/// Extract a readable message from a pool error.
pub(crate) fn pool_error_message(error: PoolError) -> String {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => message,
    }
}

/// Classify a Diesel error and emit debug context.
pub(crate) fn classify_diesel_error(error: DieselError) -> DieselFailure {
    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        _ => debug!(
            error_type = %std::any::type_name_of_val(&error),
            "diesel operation failed"
        ),
    }

    match error {
        DieselError::NotFound => DieselFailure::Query("record not found"),
        DieselError::QueryBuilderError(_) => DieselFailure::Query("database query error"),
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
            DieselFailure::UniqueViolation(info.constraint_name().map(str::to_owned))
        }
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            DieselFailure::Connection("database connection error")
        }
        DieselError::DeserializationError(_) | DieselError::SerializationError(_) => {
            DieselFailure::Query("database row could not be converted")
        }
        _ => DieselFailure::Query("database error"),
    }
}

/// Cast database revision (i32) to domain revision (u32).
///
/// Revisions are always positive, enforced by a `CHECK` constraint.
#[expect(
    clippy::cast_sign_loss,
    reason = "revision is always non-negative in database"
)]
pub(crate) fn cast_revision(revision: i32) -> u32 {
    revision as u32
}

/// Cast domain revision (u32) to database revision (i32).
#[expect(
    clippy::cast_possible_wrap,
    reason = "revision values are always small positive integers"
)]
pub(crate) fn cast_revision_for_db(revision: u32) -> i32 {
    revision as i32
}

/// Cast a stored view counter to the domain type.
#[expect(
    clippy::cast_sign_loss,
    reason = "views are always non-negative in database"
)]
pub(crate) fn cast_views(views: i64) -> u64 {
    views as u64
}

/// Cast a domain view counter for storage, saturating at `i64::MAX`.
pub(crate) fn cast_views_for_db(views: u64) -> i64 {
    i64::try_from(views).unwrap_or(i64::MAX)
}
