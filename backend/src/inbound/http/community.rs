//! Community list handlers.
//!
//! Community lists are the vote-weighted aggregates of every list published
//! under one name. Reading them is anonymous; reacting and commenting need a
//! session.

use actix_web::{get, put, web};

use crate::domain::lists::Reaction;
use crate::inbound::http::ApiResult;
use crate::inbound::http::lists::{LOGIN_TO_COMMENT, LOGIN_TO_REACT};
use crate::inbound::http::lists_dto::{
    CommentRequest, ListResponse, ListsResponse, UpdatedResponse, parse_community_id,
};
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// All community lists with their top five items.
#[utoipa::path(
    get,
    path = "/api/top5list/community",
    responses((status = 200, description = "Community lists", body = ListsResponse)),
    tags = ["community"],
    operation_id = "listCommunityLists",
    security([])
)]
#[get("/community")]
pub async fn list_community(state: web::Data<HttpState>) -> ApiResult<web::Json<ListsResponse>> {
    let lists = state.community_query.list().await?;
    Ok(web::Json(lists.iter().collect()))
}

#[utoipa::path(
    get,
    path = "/api/top5list/community/{id}",
    params(("id" = String, Path, description = "Community list id")),
    responses(
        (status = 200, description = "Community list", body = ListResponse),
        (status = 404, description = "No such community list", body = ErrorSchema)
    ),
    tags = ["community"],
    operation_id = "getCommunityList",
    security([])
)]
#[get("/community/{id}")]
pub async fn get_community(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<ListResponse>> {
    let id = parse_community_id(&path)?;
    let list = state.community_query.get(&id).await?;
    Ok(web::Json(ListResponse::new(&list)))
}

#[utoipa::path(
    put,
    path = "/api/top5list/community/views/{id}",
    params(("id" = String, Path, description = "Community list id")),
    responses(
        (status = 200, description = "View recorded", body = UpdatedResponse),
        (status = 404, description = "No such community list", body = ErrorSchema)
    ),
    tags = ["community"],
    operation_id = "viewCommunityList",
    security([])
)]
#[put("/community/views/{id}")]
pub async fn view_community(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<UpdatedResponse>> {
    let id = parse_community_id(&path)?;
    state.community.record_view(&id).await?;
    Ok(web::Json(UpdatedResponse {
        success: true,
        id: id.to_string(),
        message: "Community List views updated!".to_owned(),
    }))
}

async fn react(
    state: &HttpState,
    session: &SessionContext,
    raw_id: &str,
    reaction: Reaction,
) -> ApiResult<web::Json<ListResponse>> {
    let caller = session.require_user_id(LOGIN_TO_REACT)?;
    let id = parse_community_id(raw_id)?;
    let list = state.community.toggle_reaction(&id, &caller, reaction).await?;
    Ok(web::Json(ListResponse::new(&list)))
}

#[utoipa::path(
    put,
    path = "/api/top5list/community/likes/{id}",
    params(("id" = String, Path, description = "Community list id")),
    responses(
        (status = 200, description = "Updated community list", body = ListResponse),
        (status = 403, description = "Not logged in or list busy", body = ErrorSchema),
        (status = 404, description = "No such community list", body = ErrorSchema)
    ),
    tags = ["community"],
    operation_id = "likeCommunityList"
)]
#[put("/community/likes/{id}")]
pub async fn like_community(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<ListResponse>> {
    react(&state, &session, &path, Reaction::Like).await
}

#[utoipa::path(
    put,
    path = "/api/top5list/community/dislikes/{id}",
    params(("id" = String, Path, description = "Community list id")),
    responses(
        (status = 200, description = "Updated community list", body = ListResponse),
        (status = 403, description = "Not logged in or list busy", body = ErrorSchema),
        (status = 404, description = "No such community list", body = ErrorSchema)
    ),
    tags = ["community"],
    operation_id = "dislikeCommunityList"
)]
#[put("/community/dislikes/{id}")]
pub async fn dislike_community(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<ListResponse>> {
    react(&state, &session, &path, Reaction::Dislike).await
}

#[utoipa::path(
    put,
    path = "/api/top5list/community/comments/{id}",
    params(("id" = String, Path, description = "Community list id")),
    request_body = CommentRequest,
    responses(
        (status = 200, description = "Updated community list", body = ListResponse),
        (status = 400, description = "Blank comment", body = ErrorSchema),
        (status = 403, description = "Not logged in or list busy", body = ErrorSchema),
        (status = 404, description = "No such community list", body = ErrorSchema)
    ),
    tags = ["community"],
    operation_id = "commentCommunityList"
)]
#[put("/community/comments/{id}")]
pub async fn comment_community(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<CommentRequest>,
) -> ApiResult<web::Json<ListResponse>> {
    let caller = session.require_user_id(LOGIN_TO_COMMENT)?;
    let id = parse_community_id(&path)?;
    let list = state
        .community
        .add_comment(&id, &caller, payload.into_inner().comment)
        .await?;
    Ok(web::Json(ListResponse::new(&list)))
}

/// Register community routes inside the `/top5list` scope.
pub(super) fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(list_community)
        .service(get_community)
        .service(view_community)
        .service(like_community)
        .service(dislike_community)
        .service(comment_community);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use actix_web::http::StatusCode;
    use actix_web::{App, test};
    use chrono::NaiveDate;
    use rstest::rstest;
    use serde_json::Value;

    use crate::domain::lists::{CommunityList, CommunityListId, ItemVote};
    use crate::domain::ports::{MockCommunityListCommand, MockCommunityListQuery};
    use crate::domain::{Error, UserId};
    use crate::inbound::http::test_utils::test_state;

    fn snacks(id: CommunityListId) -> CommunityList {
        let on = NaiveDate::from_ymd_opt(2024, 7, 14)
            .expect("valid date")
            .into();
        let mut list = CommunityList::open(id, "Snacks", on);
        list.fold(
            &["Chips", "Pretzels", "Nuts", "Olives", "Dates"].map(String::from),
            on,
        );
        list
    }

    fn state_with(query: MockCommunityListQuery, command: MockCommunityListCommand) -> HttpState {
        let mut state = test_state();
        state.community_query = Arc::new(query);
        state.community = Arc::new(command);
        state
    }

    async fn call(state: HttpState, req: test::TestRequest) -> (StatusCode, Value) {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .wrap(crate::inbound::http::test_utils::test_session_middleware())
                .service(web::scope("/api").configure(crate::inbound::http::configure_api)),
        )
        .await;
        let res = test::call_service(&app, req.to_request()).await;
        let status = res.status();
        (status, test::read_body_json(res).await)
    }

    #[rstest]
    #[actix_web::test]
    async fn community_list_route_is_not_read_as_a_list_id() {
        let id = CommunityListId::random();
        let mut query = MockCommunityListQuery::new();
        query
            .expect_list()
            .times(1)
            .returning(move || Ok(vec![snacks(id)]));

        let (status, body) = call(
            state_with(query, MockCommunityListCommand::new()),
            test::TestRequest::get().uri("/api/top5list/community"),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        let first = &body["idNamePairs"][0];
        assert_eq!(first["_id"], id.to_string());
        assert_eq!(first["owner"], "Community");
        assert_eq!(first["items"][0], "Chips (5 votes)");
        assert_eq!(first["items"][4], "Dates (1 votes)");
    }

    #[rstest]
    #[actix_web::test]
    async fn missing_community_list_is_not_found() {
        let mut query = MockCommunityListQuery::new();
        query
            .expect_get()
            .times(1)
            .returning(|_| Err(Error::not_found("Community List not found!")));

        let (status, body) = call(
            state_with(query, MockCommunityListCommand::new()),
            test::TestRequest::get()
                .uri(&format!("/api/top5list/community/{}", CommunityListId::random())),
        )
        .await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["errorMessage"], "Community List not found!");
    }

    #[rstest]
    #[actix_web::test]
    async fn views_are_anonymous() {
        let id = CommunityListId::random();
        let mut command = MockCommunityListCommand::new();
        command
            .expect_record_view()
            .withf(move |seen| *seen == id)
            .times(1)
            .returning(|_| Ok(()));

        let (status, body) = call(
            state_with(MockCommunityListQuery::new(), command),
            test::TestRequest::put().uri(&format!("/api/top5list/community/views/{id}")),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Community List views updated!");
        assert_eq!(body["id"], id.to_string());
    }

    #[rstest]
    #[case("likes", LOGIN_TO_REACT)]
    #[case("dislikes", LOGIN_TO_REACT)]
    #[case("comments", LOGIN_TO_COMMENT)]
    #[actix_web::test]
    async fn engagement_requires_a_session(#[case] action: &str, #[case] message: &str) {
        let uri = format!(
            "/api/top5list/community/{action}/{}",
            CommunityListId::random()
        );

        let (status, body) = call(
            state_with(MockCommunityListQuery::new(), MockCommunityListCommand::new()),
            test::TestRequest::put()
                .uri(&uri)
                .set_json(CommentRequest {
                    comment: "hi".into(),
                }),
        )
        .await;

        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["errorMessage"], message);
        assert_eq!(body["code"], "unauthenticated");
    }

    #[rstest]
    #[actix_web::test]
    async fn reactions_use_the_reaction_kind() {
        let mut list = snacks(CommunityListId::random());
        let user = UserId::random();
        list.react(Reaction::Dislike, user);
        let body = crate::inbound::http::lists_dto::ListBody::from(&list);
        assert_eq!((body.likes, body.dislikes), (0, 1));
        assert_eq!(list.tally().items()[0], ItemVote::new("Chips", 5));
    }
}
