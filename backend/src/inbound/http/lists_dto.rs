//! Top 5 list DTOs and path parsing helpers.
//!
//! Payloads keep the camelCase shape the web client renders, including the
//! `_id` key and comments as `[author, text]` pairs.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::Error;
use crate::domain::community_ledger::COMMUNITY_NOT_FOUND;
use crate::domain::list_service::LIST_NOT_FOUND;
use crate::domain::lists::{COMMUNITY_OWNER, CommunityList, CommunityListId, ListId, PersonalList};

pub(super) const MISSING_BODY: &str = "You must provide a body to update";

/// Parse a personal list id, treating malformed ids as unknown lists.
pub(super) fn parse_list_id(raw: &str) -> Result<ListId, Error> {
    raw.parse().map_err(|_| Error::not_found(LIST_NOT_FOUND))
}

/// Parse a community list id, treating malformed ids as unknown lists.
pub(super) fn parse_community_id(raw: &str) -> Result<CommunityListId, Error> {
    raw.parse().map_err(|_| Error::not_found(COMMUNITY_NOT_FOUND))
}

/// Name and items sent when editing or publishing a list.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct ListBodyRequest {
    #[schema(example = "Best Pizza Toppings")]
    pub name: Option<String>,
    #[schema(max_items = 5)]
    pub items: Option<Vec<String>>,
}

impl ListBodyRequest {
    /// Both fields, or `InvalidRequest` when either is absent.
    pub(super) fn into_parts(self) -> Result<(String, Vec<String>), Error> {
        match (self.name, self.items) {
            (Some(name), Some(items)) => Ok((name, items)),
            _ => Err(Error::invalid_request(MISSING_BODY)),
        }
    }
}

/// Comment sent to either kind of list.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(default)]
pub struct CommentRequest {
    #[schema(example = "Pineapple belongs at number one.")]
    pub comment: String,
}

/// Rendered list as shown by the web client.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ListBody {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub items: Vec<String>,
    pub owner: String,
    /// Number of likes.
    pub likes: usize,
    /// Number of dislikes.
    pub dislikes: usize,
    pub views: u64,
    /// `[author, text]` pairs in posting order.
    #[schema(value_type = Vec<Vec<String>>)]
    pub comments: Vec<[String; 2]>,
    pub published: bool,
    /// `[year, month, day]`, absent for drafts.
    #[schema(value_type = Option<Vec<i32>>)]
    pub published_at: Option<[i32; 3]>,
}

impl From<&PersonalList> for ListBody {
    fn from(list: &PersonalList) -> Self {
        let engagement = list.engagement();
        Self {
            id: list.id().to_string(),
            name: list.name().to_owned(),
            items: list.items().to_vec(),
            owner: list.owner_name().to_owned(),
            likes: engagement.likes().len(),
            dislikes: engagement.dislikes().len(),
            views: engagement.views(),
            comments: engagement
                .comments()
                .iter()
                .map(|c| [c.author.clone(), c.text.clone()])
                .collect(),
            published: list.is_published(),
            published_at: list.published_on().map(|on| on.triple()),
        }
    }
}

impl From<&CommunityList> for ListBody {
    fn from(list: &CommunityList) -> Self {
        let engagement = list.engagement();
        Self {
            id: list.id().to_string(),
            name: list.name().to_owned(),
            items: list.tally().render_top_five(),
            owner: COMMUNITY_OWNER.to_owned(),
            likes: engagement.likes().len(),
            dislikes: engagement.dislikes().len(),
            views: engagement.views(),
            comments: engagement
                .comments()
                .iter()
                .map(|c| [c.author.clone(), c.text.clone()])
                .collect(),
            published: true,
            published_at: Some(list.published_on().triple()),
        }
    }
}

/// `{ success, top5List }`
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ListResponse {
    pub success: bool,
    #[serde(rename = "top5List")]
    pub top5_list: ListBody,
}

impl ListResponse {
    pub(super) fn new(list: impl Into<ListBody>) -> Self {
        Self {
            success: true,
            top5_list: list.into(),
        }
    }
}

/// `{ success, top5List, message }` returned on creation.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct CreatedResponse {
    pub success: bool,
    #[serde(rename = "top5List")]
    pub top5_list: ListBody,
    pub message: String,
}

/// `{ success, id, message }`
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct UpdatedResponse {
    pub success: bool,
    pub id: String,
    pub message: String,
}

/// `{ success, id, top5List, message }` returned after publishing.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct PublishedResponse {
    pub success: bool,
    pub id: String,
    #[serde(rename = "top5List")]
    pub top5_list: ListBody,
    pub message: String,
}

/// `{ success, data }` returned after deletion.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct DeletedResponse {
    pub success: bool,
    pub data: ListBody,
}

/// `{ success, idNamePairs }`
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ListsResponse {
    pub success: bool,
    pub id_name_pairs: Vec<ListBody>,
}

impl<T> FromIterator<T> for ListsResponse
where
    T: Into<ListBody>,
{
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            success: true,
            id_name_pairs: iter.into_iter().map(Into::into).collect(),
        }
    }
}
