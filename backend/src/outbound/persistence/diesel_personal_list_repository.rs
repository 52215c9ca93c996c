//! PostgreSQL-backed `PersonalListRepository` implementation using Diesel ORM.
//!
//! Saves are conditional updates on `(id, revision)`. When no row matches, a
//! follow-up read tells a revision mismatch apart from a deleted list. View
//! counts use a single `UPDATE ... SET views = views + 1, revision = revision + 1`.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::domain::UserId;
use crate::domain::lists::{Engagement, ListId, PersonalList, PersonalListParts, PublishedOn};
use crate::domain::ports::{PersonalListRepository, PersonalListRepositoryError, ViewOutcome};

use super::diesel_helpers::{
    DieselFailure, cast_revision, cast_revision_for_db, cast_views, cast_views_for_db,
    classify_diesel_error, pool_error_message,
};
use super::json_codec::{comments_to_json, json_to_comments};
use super::models::{PersonalListRow, PersonalListUpdate};
use super::pool::{DbPool, PoolError};
use super::schema::top5_lists;

/// Diesel-backed implementation of the personal list repository port.
#[derive(Clone)]
pub struct DieselPersonalListRepository {
    pool: DbPool,
}

impl DieselPersonalListRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> PersonalListRepositoryError {
    PersonalListRepositoryError::connection(pool_error_message(error))
}

/// Partial unique index over published `(owner_id, name)` pairs.
const PUBLISHED_NAME_KEY: &str = "top5_lists_published_name_key";

fn map_failure(failure: DieselFailure) -> PersonalListRepositoryError {
    match failure {
        DieselFailure::Connection(message) => PersonalListRepositoryError::connection(message),
        DieselFailure::UniqueViolation(constraint) => PersonalListRepositoryError::query(format!(
            "unique constraint {} violated",
            constraint.as_deref().unwrap_or("<unknown>")
        )),
        DieselFailure::Query(message) => PersonalListRepositoryError::query(message),
    }
}

fn map_diesel_error(error: diesel::result::Error) -> PersonalListRepositoryError {
    map_failure(classify_diesel_error(error))
}

/// Like [`map_diesel_error`], but reports a clash on the published name
/// index as [`PersonalListRepositoryError::DuplicateName`].
fn map_save_error(error: diesel::result::Error, name: &str) -> PersonalListRepositoryError {
    match classify_diesel_error(error) {
        DieselFailure::UniqueViolation(Some(constraint)) if constraint == PUBLISHED_NAME_KEY => {
            PersonalListRepositoryError::duplicate_name(name)
        }
        failure => map_failure(failure),
    }
}

fn user_ids(ids: &[UserId]) -> Vec<Uuid> {
    ids.iter().map(|id| *id.as_uuid()).collect()
}

/// Convert a domain list into its stored row.
pub(super) fn list_to_row(list: &PersonalList) -> Result<PersonalListRow, String> {
    let engagement = list.engagement();
    Ok(PersonalListRow {
        id: *list.id().as_uuid(),
        owner_id: *list.owner().as_uuid(),
        owner_name: list.owner_name().to_owned(),
        name: list.name().to_owned(),
        items: list.items().to_vec(),
        likes: user_ids(engagement.likes()),
        dislikes: user_ids(engagement.dislikes()),
        views: cast_views_for_db(engagement.views()),
        comments: comments_to_json(engagement.comments())?,
        published_on: list.published_on().map(|on| on.date()),
        revision: cast_revision_for_db(list.revision()),
    })
}

/// Convert a stored row back into a domain list.
pub(super) fn row_to_list(row: PersonalListRow) -> Result<PersonalList, String> {
    let comments =
        json_to_comments(row.comments).map_err(|err| format!("list {}: {err}", row.id))?;
    let engagement = Engagement::from_parts(
        row.likes.into_iter().map(UserId::from).collect(),
        row.dislikes.into_iter().map(UserId::from).collect(),
        cast_views(row.views),
        comments,
    );
    Ok(PersonalList::from_parts(PersonalListParts {
        id: ListId::from(row.id),
        owner: UserId::from(row.owner_id),
        owner_name: row.owner_name,
        name: row.name,
        items: row.items,
        engagement,
        published_on: row.published_on.map(PublishedOn::from),
        revision: cast_revision(row.revision),
    }))
}

fn rows_to_lists(rows: Vec<PersonalListRow>) -> Result<Vec<PersonalList>, PersonalListRepositoryError> {
    rows.into_iter()
        .map(row_to_list)
        .collect::<Result<Vec<_>, _>>()
        .map_err(PersonalListRepositoryError::query)
}

#[async_trait]
impl PersonalListRepository for DieselPersonalListRepository {
    async fn insert(&self, list: &PersonalList) -> Result<(), PersonalListRepositoryError> {
        let row = list_to_row(list).map_err(PersonalListRepositoryError::query)?;
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        diesel::insert_into(top5_lists::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn find_by_id(
        &self,
        id: &ListId,
    ) -> Result<Option<PersonalList>, PersonalListRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<PersonalListRow> = top5_lists::table
            .filter(top5_lists::id.eq(id.as_uuid()))
            .select(PersonalListRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_list)
            .transpose()
            .map_err(PersonalListRepositoryError::query)
    }

    async fn list_visible_to(
        &self,
        viewer: Option<UserId>,
    ) -> Result<Vec<PersonalList>, PersonalListRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let mut query = top5_lists::table
            .select(PersonalListRow::as_select())
            .order(top5_lists::created_at.asc())
            .into_boxed();
        query = match viewer {
            Some(viewer) => query.filter(
                top5_lists::published_on
                    .is_not_null()
                    .or(top5_lists::owner_id.eq(*viewer.as_uuid())),
            ),
            None => query.filter(top5_lists::published_on.is_not_null()),
        };
        let rows = query.load(&mut conn).await.map_err(map_diesel_error)?;

        rows_to_lists(rows)
    }

    async fn find_published_by_owner_and_name(
        &self,
        owner: &UserId,
        name: &str,
    ) -> Result<Option<PersonalList>, PersonalListRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<PersonalListRow> = top5_lists::table
            .filter(top5_lists::owner_id.eq(owner.as_uuid()))
            .filter(top5_lists::name.eq(name))
            .filter(top5_lists::published_on.is_not_null())
            .select(PersonalListRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_list)
            .transpose()
            .map_err(PersonalListRepositoryError::query)
    }

    async fn save(
        &self,
        list: &PersonalList,
        expected_revision: u32,
    ) -> Result<(), PersonalListRepositoryError> {
        let row = list_to_row(list).map_err(PersonalListRepositoryError::query)?;
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let update = PersonalListUpdate {
            name: &row.name,
            items: &row.items,
            likes: &row.likes,
            dislikes: &row.dislikes,
            views: row.views,
            comments: &row.comments,
            published_on: row.published_on,
            revision: row.revision,
        };

        let updated_rows = diesel::update(top5_lists::table)
            .filter(
                top5_lists::id
                    .eq(row.id)
                    .and(top5_lists::revision.eq(cast_revision_for_db(expected_revision))),
            )
            .set(&update)
            .execute(&mut conn)
            .await
            .map_err(|err| map_save_error(err, list.name()))?;
        if updated_rows > 0 {
            return Ok(());
        }

        let actual: Option<i32> = top5_lists::table
            .filter(top5_lists::id.eq(row.id))
            .select(top5_lists::revision)
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Err(match actual {
            Some(actual) => PersonalListRepositoryError::revision_mismatch(
                expected_revision,
                cast_revision(actual),
            ),
            None => PersonalListRepositoryError::missing(list.id().to_string()),
        })
    }

    async fn delete(&self, id: &ListId) -> Result<bool, PersonalListRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let deleted = diesel::delete(top5_lists::table.filter(top5_lists::id.eq(id.as_uuid())))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(deleted > 0)
    }

    async fn increment_views(
        &self,
        id: &ListId,
    ) -> Result<ViewOutcome, PersonalListRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let updated = diesel::update(
            top5_lists::table
                .filter(top5_lists::id.eq(id.as_uuid()))
                .filter(top5_lists::published_on.is_not_null()),
        )
        .set((
            top5_lists::views.eq(top5_lists::views + 1_i64),
            top5_lists::revision.eq(top5_lists::revision + 1),
        ))
        .execute(&mut conn)
        .await
        .map_err(map_diesel_error)?;
        if updated > 0 {
            return Ok(ViewOutcome::Counted);
        }

        let exists: Option<Uuid> = top5_lists::table
            .filter(top5_lists::id.eq(id.as_uuid()))
            .select(top5_lists::id)
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(if exists.is_some() {
            ViewOutcome::NotPublished
        } else {
            ViewOutcome::Missing
        })
    }
}
