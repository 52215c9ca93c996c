//! PostgreSQL-backed `CommunityListRepository` implementation using Diesel ORM.
//!
//! The unique index on `community_lists.name` arbitrates concurrent first
//! publishes: the losing insert surfaces as `DuplicateName`.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::{AsyncConnection, RunQueryDsl};
use uuid::Uuid;

use crate::domain::UserId;
use crate::domain::lists::{
    CommunityList, CommunityListId, CommunityListParts, Engagement, PublishedOn,
};
use crate::domain::ports::{CommunityListRepository, CommunityListRepositoryError};

use super::diesel_helpers::{
    DieselFailure, cast_revision, cast_revision_for_db, cast_views, cast_views_for_db,
    classify_diesel_error, pool_error_message,
};
use super::json_codec::{comments_to_json, json_to_comments, json_to_tally, tally_to_json};
use super::models::{CommunityListRow, CommunityListUpdate};
use super::pool::{DbPool, PoolError};
use super::schema::community_lists;

/// Diesel-backed implementation of the community list repository port.
#[derive(Clone)]
pub struct DieselCommunityListRepository {
    pool: DbPool,
}

impl DieselCommunityListRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> CommunityListRepositoryError {
    CommunityListRepositoryError::connection(pool_error_message(error))
}

fn map_diesel_error(
    error: diesel::result::Error,
    name: Option<&str>,
) -> CommunityListRepositoryError {
    match (classify_diesel_error(error), name) {
        (DieselFailure::UniqueViolation(_), Some(name)) => {
            CommunityListRepositoryError::duplicate_name(name)
        }
        (DieselFailure::UniqueViolation(_), None) => {
            CommunityListRepositoryError::query("unique constraint violated")
        }
        (DieselFailure::Connection(message), _) => {
            CommunityListRepositoryError::connection(message)
        }
        (DieselFailure::Query(message), _) => CommunityListRepositoryError::query(message),
    }
}

fn map_query_error(error: diesel::result::Error) -> CommunityListRepositoryError {
    map_diesel_error(error, None)
}

fn user_ids(ids: &[UserId]) -> Vec<Uuid> {
    ids.iter().map(|id| *id.as_uuid()).collect()
}

/// Convert a domain aggregate into its stored row.
pub(super) fn list_to_row(list: &CommunityList) -> Result<CommunityListRow, String> {
    let engagement = list.engagement();
    Ok(CommunityListRow {
        id: *list.id().as_uuid(),
        name: list.name().to_owned(),
        items: tally_to_json(list.tally())?,
        likes: user_ids(engagement.likes()),
        dislikes: user_ids(engagement.dislikes()),
        views: cast_views_for_db(engagement.views()),
        comments: comments_to_json(engagement.comments())?,
        published_on: list.published_on().date(),
        revision: cast_revision_for_db(list.revision()),
    })
}

/// Convert a stored row back into a domain aggregate.
pub(super) fn row_to_list(row: CommunityListRow) -> Result<CommunityList, String> {
    let id = row.id;
    let tally = json_to_tally(row.items).map_err(|err| format!("community list {id}: {err}"))?;
    let comments =
        json_to_comments(row.comments).map_err(|err| format!("community list {id}: {err}"))?;
    let engagement = Engagement::from_parts(
        row.likes.into_iter().map(UserId::from).collect(),
        row.dislikes.into_iter().map(UserId::from).collect(),
        cast_views(row.views),
        comments,
    );
    Ok(CommunityList::from_parts(CommunityListParts {
        id: CommunityListId::from(id),
        name: row.name,
        tally,
        engagement,
        published_on: PublishedOn::from(row.published_on),
        revision: cast_revision(row.revision),
    }))
}

/// Explain why a revision-guarded write touched no rows.
async fn diagnose_stale_write<C>(
    conn: &mut C,
    id: Uuid,
    expected_revision: u32,
) -> CommunityListRepositoryError
where
    C: AsyncConnection<Backend = diesel::pg::Pg> + Send,
{
    let actual: Result<Option<i32>, _> = community_lists::table
        .filter(community_lists::id.eq(id))
        .select(community_lists::revision)
        .first(conn)
        .await
        .optional();
    match actual {
        Ok(Some(actual)) => {
            CommunityListRepositoryError::revision_mismatch(expected_revision, cast_revision(actual))
        }
        Ok(None) => CommunityListRepositoryError::missing(id.to_string()),
        Err(err) => map_query_error(err),
    }
}

#[async_trait]
impl CommunityListRepository for DieselCommunityListRepository {
    async fn insert(&self, list: &CommunityList) -> Result<(), CommunityListRepositoryError> {
        let row = list_to_row(list).map_err(CommunityListRepositoryError::query)?;
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        diesel::insert_into(community_lists::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(|err| map_diesel_error(err, Some(list.name())))
    }

    async fn find_by_id(
        &self,
        id: &CommunityListId,
    ) -> Result<Option<CommunityList>, CommunityListRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<CommunityListRow> = community_lists::table
            .filter(community_lists::id.eq(id.as_uuid()))
            .select(CommunityListRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_query_error)?;

        row.map(row_to_list)
            .transpose()
            .map_err(CommunityListRepositoryError::query)
    }

    async fn find_by_name(
        &self,
        name: &str,
    ) -> Result<Option<CommunityList>, CommunityListRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<CommunityListRow> = community_lists::table
            .filter(community_lists::name.eq(name))
            .select(CommunityListRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_query_error)?;

        row.map(row_to_list)
            .transpose()
            .map_err(CommunityListRepositoryError::query)
    }

    async fn list_all(&self) -> Result<Vec<CommunityList>, CommunityListRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<CommunityListRow> = community_lists::table
            .select(CommunityListRow::as_select())
            .order(community_lists::created_at.asc())
            .load(&mut conn)
            .await
            .map_err(map_query_error)?;

        rows.into_iter()
            .map(row_to_list)
            .collect::<Result<Vec<_>, _>>()
            .map_err(CommunityListRepositoryError::query)
    }

    async fn save(
        &self,
        list: &CommunityList,
        expected_revision: u32,
    ) -> Result<(), CommunityListRepositoryError> {
        let row = list_to_row(list).map_err(CommunityListRepositoryError::query)?;
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let update = CommunityListUpdate {
            items: &row.items,
            likes: &row.likes,
            dislikes: &row.dislikes,
            views: row.views,
            comments: &row.comments,
            published_on: row.published_on,
            revision: row.revision,
        };

        let updated_rows = diesel::update(community_lists::table)
            .filter(
                community_lists::id
                    .eq(row.id)
                    .and(community_lists::revision.eq(cast_revision_for_db(expected_revision))),
            )
            .set(&update)
            .execute(&mut conn)
            .await
            .map_err(map_query_error)?;
        if updated_rows == 0 {
            return Err(diagnose_stale_write(&mut conn, row.id, expected_revision).await);
        }
        Ok(())
    }

    async fn delete(
        &self,
        id: &CommunityListId,
        expected_revision: u32,
    ) -> Result<(), CommunityListRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let deleted = diesel::delete(
            community_lists::table
                .filter(community_lists::id.eq(id.as_uuid()))
                .filter(community_lists::revision.eq(cast_revision_for_db(expected_revision))),
        )
        .execute(&mut conn)
        .await
        .map_err(map_query_error)?;
        if deleted == 0 {
            return Err(diagnose_stale_write(&mut conn, *id.as_uuid(), expected_revision).await);
        }
        Ok(())
    }

    async fn increment_views(
        &self,
        id: &CommunityListId,
    ) -> Result<bool, CommunityListRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let updated = diesel::update(community_lists::table.filter(community_lists::id.eq(id.as_uuid())))
            .set((
                community_lists::views.eq(community_lists::views + 1_i64),
                community_lists::revision.eq(community_lists::revision + 1),
            ))
            .execute(&mut conn)
            .await
            .map_err(map_query_error)?;
        Ok(updated > 0)
    }
}
