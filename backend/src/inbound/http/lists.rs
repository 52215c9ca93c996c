//! Personal Top 5 list handlers.
//!
//! ```text
//! POST   /api/top5list
//! PUT    /api/top5list/{id}            {"name":"...","items":[5 strings]}
//! PUT    /api/top5list/publish/{id}    {"name":"...","items":[5 strings]}
//! DELETE /api/top5list/{id}
//! GET    /api/top5list/{id}
//! GET    /api/top5list
//! PUT    /api/top5list/views/{id}
//! PUT    /api/top5list/likes/{id}
//! PUT    /api/top5list/dislikes/{id}
//! PUT    /api/top5list/comments/{id}   {"comment":"..."}
//! ```
//!
//! Drafts are visible to their owner only; everyone sees published lists.

use actix_web::{HttpResponse, delete, get, post, put, web};

use crate::domain::Error;
use crate::domain::lists::{ListEdit, Reaction};
use crate::domain::ports::PublishRequest;
use crate::inbound::http::ApiResult;
use crate::inbound::http::lists_dto::{
    CommentRequest, CreatedResponse, DeletedResponse, ListBody, ListBodyRequest, ListResponse,
    ListsResponse, PublishedResponse, UpdatedResponse, parse_list_id,
};
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

pub(super) const LOGIN_TO_CREATE: &str = "Please log in to create new list";
pub(super) const LOGIN_REQUIRED: &str = "Unauthorized";
pub(super) const LOGIN_TO_REACT: &str = "Please login to like/dislike";
pub(super) const LOGIN_TO_COMMENT: &str = "Please login to leave comments";
const LIST_UPDATED: &str = "Top 5 List updated!";

/// Create an empty draft owned by the caller.
#[utoipa::path(
    post,
    path = "/api/top5list",
    responses(
        (status = 201, description = "Draft created", body = CreatedResponse),
        (status = 403, description = "Not logged in", body = ErrorSchema)
    ),
    tags = ["lists"],
    operation_id = "createList"
)]
#[post("")]
pub async fn create_list(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<HttpResponse> {
    let owner = session.require_user_id(LOGIN_TO_CREATE)?;
    let list = state.lists.create(&owner).await?;
    Ok(HttpResponse::Created().json(CreatedResponse {
        success: true,
        top5_list: ListBody::from(&list),
        message: "Top 5 List Created!".to_owned(),
    }))
}

/// Replace the name and items of one of the caller's drafts.
#[utoipa::path(
    put,
    path = "/api/top5list/{id}",
    params(("id" = String, Path, description = "List id")),
    request_body = ListBodyRequest,
    responses(
        (status = 200, description = "Draft updated", body = UpdatedResponse),
        (status = 400, description = "Missing name or items", body = ErrorSchema),
        (status = 403, description = "Not logged in or list already published", body = ErrorSchema),
        (status = 404, description = "No such draft for this caller", body = ErrorSchema)
    ),
    tags = ["lists"],
    operation_id = "updateList"
)]
#[put("/{id}")]
pub async fn update_list(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<ListBodyRequest>,
) -> ApiResult<web::Json<UpdatedResponse>> {
    let owner = session.require_user_id(LOGIN_REQUIRED)?;
    let id = parse_list_id(&path)?;
    let (name, items) = payload.into_inner().into_parts()?;
    let edit = ListEdit::try_new(name, items).map_err(|err| Error::invalid_request(err.to_string()))?;
    let list = state.lists.update(&id, &owner, edit).await?;
    Ok(web::Json(UpdatedResponse {
        success: true,
        id: list.id().to_string(),
        message: LIST_UPDATED.to_owned(),
    }))
}

/// Publish a draft and fold its ranking into the community list.
#[utoipa::path(
    put,
    path = "/api/top5list/publish/{id}",
    params(("id" = String, Path, description = "List id")),
    request_body = ListBodyRequest,
    responses(
        (status = 200, description = "List published", body = PublishedResponse),
        (status = 400, description = "Missing name or items", body = ErrorSchema),
        (status = 403, description = "Invalid ranking, duplicate name or already published", body = ErrorSchema),
        (status = 404, description = "No such draft for this caller", body = ErrorSchema)
    ),
    tags = ["lists"],
    operation_id = "publishList"
)]
#[put("/publish/{id}")]
pub async fn publish_list(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<ListBodyRequest>,
) -> ApiResult<web::Json<PublishedResponse>> {
    let owner = session.require_user_id(LOGIN_REQUIRED)?;
    let id = parse_list_id(&path)?;
    let (name, items) = payload.into_inner().into_parts()?;
    let list = state
        .lists
        .publish(&id, &owner, PublishRequest { name, items })
        .await?;
    Ok(web::Json(PublishedResponse {
        success: true,
        id: list.id().to_string(),
        top5_list: ListBody::from(&list),
        message: LIST_UPDATED.to_owned(),
    }))
}

/// Delete one of the caller's lists, retracting its community votes.
#[utoipa::path(
    delete,
    path = "/api/top5list/{id}",
    params(("id" = String, Path, description = "List id")),
    responses(
        (status = 200, description = "List deleted", body = DeletedResponse),
        (status = 403, description = "Not logged in or community list inconsistent", body = ErrorSchema),
        (status = 404, description = "No such list for this caller", body = ErrorSchema)
    ),
    tags = ["lists"],
    operation_id = "deleteList"
)]
#[delete("/{id}")]
pub async fn delete_list(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<DeletedResponse>> {
    let owner = session.require_user_id(LOGIN_REQUIRED)?;
    let id = parse_list_id(&path)?;
    let list = state.lists.delete(&id, &owner).await?;
    Ok(web::Json(DeletedResponse {
        success: true,
        data: ListBody::from(&list),
    }))
}

/// Fetch a published list, or a draft owned by the caller.
#[utoipa::path(
    get,
    path = "/api/top5list/{id}",
    params(("id" = String, Path, description = "List id")),
    responses(
        (status = 200, description = "List", body = ListResponse),
        (status = 404, description = "Missing or not visible", body = ErrorSchema)
    ),
    tags = ["lists"],
    operation_id = "getList",
    security([])
)]
#[get("/{id}")]
pub async fn get_list(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<ListResponse>> {
    let viewer = session.user_id()?;
    let id = parse_list_id(&path)?;
    let list = state.lists_query.get(&id, viewer).await?;
    Ok(web::Json(ListResponse::new(&list)))
}

/// Every published list plus the caller's own drafts.
#[utoipa::path(
    get,
    path = "/api/top5list",
    responses((status = 200, description = "Visible lists", body = ListsResponse)),
    tags = ["lists"],
    operation_id = "listLists",
    security([])
)]
#[get("")]
pub async fn list_lists(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<ListsResponse>> {
    let viewer = session.user_id()?;
    let lists = state.lists_query.list_visible(viewer).await?;
    Ok(web::Json(lists.iter().collect()))
}

/// Count a view of a published list.
#[utoipa::path(
    put,
    path = "/api/top5list/views/{id}",
    params(("id" = String, Path, description = "List id")),
    responses(
        (status = 200, description = "View recorded", body = UpdatedResponse),
        (status = 404, description = "No such list", body = ErrorSchema)
    ),
    tags = ["lists"],
    operation_id = "viewList",
    security([])
)]
#[put("/views/{id}")]
pub async fn view_list(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<UpdatedResponse>> {
    let id = parse_list_id(&path)?;
    state.lists.record_view(&id).await?;
    Ok(web::Json(UpdatedResponse {
        success: true,
        id: id.to_string(),
        message: "Top 5 List views updated!".to_owned(),
    }))
}

async fn react(
    state: &HttpState,
    session: &SessionContext,
    raw_id: &str,
    reaction: Reaction,
) -> ApiResult<web::Json<ListResponse>> {
    let caller = session.require_user_id(LOGIN_TO_REACT)?;
    let id = parse_list_id(raw_id)?;
    let list = state.lists.toggle_reaction(&id, &caller, reaction).await?;
    Ok(web::Json(ListResponse::new(&list)))
}

/// Toggle the caller's like on a published list.
#[utoipa::path(
    put,
    path = "/api/top5list/likes/{id}",
    params(("id" = String, Path, description = "List id")),
    responses(
        (status = 200, description = "Updated list", body = ListResponse),
        (status = 403, description = "Not logged in", body = ErrorSchema),
        (status = 404, description = "No such list", body = ErrorSchema)
    ),
    tags = ["lists"],
    operation_id = "likeList"
)]
#[put("/likes/{id}")]
pub async fn like_list(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<ListResponse>> {
    react(&state, &session, &path, Reaction::Like).await
}

/// Toggle the caller's dislike on a published list.
#[utoipa::path(
    put,
    path = "/api/top5list/dislikes/{id}",
    params(("id" = String, Path, description = "List id")),
    responses(
        (status = 200, description = "Updated list", body = ListResponse),
        (status = 403, description = "Not logged in", body = ErrorSchema),
        (status = 404, description = "No such list", body = ErrorSchema)
    ),
    tags = ["lists"],
    operation_id = "dislikeList"
)]
#[put("/dislikes/{id}")]
pub async fn dislike_list(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<ListResponse>> {
    react(&state, &session, &path, Reaction::Dislike).await
}

/// Comment on a published list as the caller.
#[utoipa::path(
    put,
    path = "/api/top5list/comments/{id}",
    params(("id" = String, Path, description = "List id")),
    request_body = CommentRequest,
    responses(
        (status = 200, description = "Updated list", body = ListResponse),
        (status = 400, description = "Blank comment", body = ErrorSchema),
        (status = 403, description = "Not logged in", body = ErrorSchema),
        (status = 404, description = "No such list", body = ErrorSchema)
    ),
    tags = ["lists"],
    operation_id = "commentList"
)]
#[put("/comments/{id}")]
pub async fn comment_list(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<CommentRequest>,
) -> ApiResult<web::Json<ListResponse>> {
    let caller = session.require_user_id(LOGIN_TO_COMMENT)?;
    let id = parse_list_id(&path)?;
    let list = state
        .lists
        .add_comment(&id, &caller, payload.into_inner().comment)
        .await?;
    Ok(web::Json(ListResponse::new(&list)))
}

/// Mount list routes; the caller supplies the `/api` prefix.
///
/// Community routes register first so `/community` is not read as a list id.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/top5list")
            .configure(super::community::configure)
            .service(create_list)
            .service(list_lists)
            .service(publish_list)
            .service(view_list)
            .service(like_list)
            .service(dislike_list)
            .service(comment_list)
            .service(update_list)
            .service(delete_list)
            .service(get_list),
    );
}

#[cfg(test)]
#[path = "lists_tests.rs"]
mod tests;
