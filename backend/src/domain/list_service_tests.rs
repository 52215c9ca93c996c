//! Tests for the personal list service.
//!
//! Most cases run against the in-memory adapters so community bookkeeping is
//! observed end to end; mocks cover paths that must not touch a port.

use std::sync::Arc;

use chrono::{DateTime, Local, TimeZone, Utc};
use mockable::Clock;
use rstest::{fixture, rstest};

use super::*;
use crate::domain::lists::{CommunityList, Engagement, LIST_LENGTH};
use crate::domain::ports::{
    CommunityListRepository as _, MockCommunityListRepository, MockPersonalListRepository,
    UserRepository as _,
};
use crate::domain::{EmailAddress, ErrorCode, PasswordHash, PersonName, User};
use crate::outbound::memory::{
    MemoryCommunityListRepository, MemoryPersonalListRepository, MemoryUserRepository,
};

struct FixtureClock {
    utc_now: DateTime<Utc>,
}

impl Clock for FixtureClock {
    fn local(&self) -> DateTime<Local> {
        self.utc_now.with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.utc_now
    }
}

fn fixture_timestamp() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 7, 14, 12, 0, 0)
        .single()
        .expect("valid fixture timestamp")
}

fn fixture_clock() -> Arc<dyn Clock> {
    Arc::new(FixtureClock {
        utc_now: fixture_timestamp(),
    })
}

fn fixture_day() -> PublishedOn {
    PublishedOn::from(fixture_timestamp().with_timezone(&Local).date_naive())
}

type MemoryListService =
    ListService<MemoryPersonalListRepository, MemoryCommunityListRepository, MemoryUserRepository>;

struct Harness {
    service: MemoryListService,
    lists: Arc<MemoryPersonalListRepository>,
    community: Arc<MemoryCommunityListRepository>,
    users: Arc<MemoryUserRepository>,
}

impl Harness {
    async fn user(&self, first: &str, last: &str) -> UserId {
        let email = format!("{}@example.com", first.to_lowercase());
        let user = User::new(
            UserId::random(),
            PersonName::new(first).expect("first name"),
            PersonName::new(last).expect("last name"),
            EmailAddress::new(email).expect("email"),
            PasswordHash::new("hash").expect("hash"),
        );
        self.users.insert(&user).await.expect("seed user");
        *user.id()
    }

    async fn community(&self, name: &str) -> Option<CommunityList> {
        self.community.find_by_name(name).await.expect("community lookup")
    }

    async fn published(&self, owner: &UserId, name: &str, items: [&str; 5]) -> PersonalList {
        let draft = self.service.create(owner).await.expect("create draft");
        self.service
            .publish(draft.id(), owner, request(name, items))
            .await
            .expect("publish")
    }
}

#[fixture]
fn harness() -> Harness {
    let lists = Arc::new(MemoryPersonalListRepository::new());
    let community = Arc::new(MemoryCommunityListRepository::new());
    let users = Arc::new(MemoryUserRepository::new());
    let service = ListService::new(
        Arc::clone(&lists),
        Arc::clone(&community),
        Arc::clone(&users),
        fixture_clock(),
    );
    Harness {
        service,
        lists,
        community,
        users,
    }
}

fn request(name: &str, items: [&str; 5]) -> PublishRequest {
    PublishRequest {
        name: name.to_owned(),
        items: items.map(String::from).to_vec(),
    }
}

#[rstest]
#[tokio::test]
async fn create_starts_an_owned_draft(harness: Harness) {
    let owner = harness.user("Ada", "Lovelace").await;

    let list = harness.service.create(&owner).await.expect("create");

    assert_eq!(list.owner(), &owner);
    assert_eq!(list.owner_name(), "Ada Lovelace");
    assert_eq!(list.items().len(), LIST_LENGTH);
    assert!(!list.is_published());
}

#[rstest]
#[tokio::test]
async fn create_requires_a_known_user(harness: Harness) {
    let err = harness
        .service
        .create(&UserId::random())
        .await
        .expect_err("unknown user");
    assert_eq!(err.code(), ErrorCode::Unauthenticated);
}

#[rstest]
#[tokio::test]
async fn publish_weights_items_by_rank(harness: Harness) {
    let owner = harness.user("Ada", "Lovelace").await;

    let list = harness
        .published(&owner, "Films", ["A", "B", "C", "D", "E"])
        .await;

    assert_eq!(list.published_on(), Some(fixture_day()));
    let community = harness.community("Films").await.expect("community list");
    let tally = community.tally();
    for (item, votes) in [("A", 5), ("B", 4), ("C", 3), ("D", 2), ("E", 1)] {
        assert_eq!(tally.votes_for(item), Some(votes), "votes for {item}");
    }
    assert_eq!(community.published_on(), fixture_day());
}

#[rstest]
#[tokio::test]
async fn overlapping_lists_sum_their_weights(harness: Harness) {
    let ada = harness.user("Ada", "Lovelace").await;
    let grace = harness.user("Grace", "Hopper").await;

    harness
        .published(&ada, "Food", ["Pizza", "Tacos", "Sushi", "Pho", "Ramen"])
        .await;
    harness
        .published(&grace, "Food", ["Pizza", "Curry", "Tacos", "Dal", "Pho"])
        .await;

    let community = harness.community("Food").await.expect("community list");
    let tally = community.tally();
    assert_eq!(tally.votes_for("Pizza"), Some(10));
    assert_eq!(tally.votes_for("Tacos"), Some(7));
    assert_eq!(tally.votes_for("Pho"), Some(3));
    assert_eq!(tally.len(), 7);
}

#[rstest]
#[tokio::test]
async fn publishing_the_same_name_twice_is_a_conflict(harness: Harness) {
    let owner = harness.user("Ada", "Lovelace").await;
    harness
        .published(&owner, "Films", ["A", "B", "C", "D", "E"])
        .await;
    let second = harness.service.create(&owner).await.expect("create");

    let err = harness
        .service
        .publish(second.id(), &owner, request("Films", ["F", "G", "H", "I", "J"]))
        .await
        .expect_err("duplicate name");

    assert_eq!(err.code(), ErrorCode::Conflict);
    assert_eq!(err.message(), DUPLICATE_PUBLISH_NAME);
    let community = harness.community("Films").await.expect("community list");
    assert_eq!(community.tally().votes_for("F"), None);
    let stored = harness
        .lists
        .find_by_id(second.id())
        .await
        .expect("lookup")
        .expect("draft kept");
    assert!(!stored.is_published());
}

#[rstest]
#[case::missing_name(request("  ", ["A", "B", "C", "D", "E"]))]
#[case::blank_item(request("Films", ["A", "B", " ", "D", "E"]))]
#[case::duplicate_item(request("Films", ["A", "B", "A", "D", "E"]))]
#[tokio::test]
async fn invalid_publish_requests_change_nothing(
    harness: Harness,
    #[case] publish: PublishRequest,
) {
    let owner = harness.user("Ada", "Lovelace").await;
    let draft = harness.service.create(&owner).await.expect("create");

    let err = harness
        .service
        .publish(draft.id(), &owner, publish)
        .await
        .expect_err("invalid request");

    assert_eq!(err.code(), ErrorCode::Validation);
    assert!(err.details().is_some());
    assert!(harness.community("Films").await.is_none());
    let stored = harness
        .lists
        .find_by_id(draft.id())
        .await
        .expect("lookup")
        .expect("draft kept");
    assert_eq!(stored, draft);
}

#[rstest]
#[tokio::test]
async fn published_lists_cannot_be_republished_or_edited(harness: Harness) {
    let owner = harness.user("Ada", "Lovelace").await;
    let list = harness
        .published(&owner, "Films", ["A", "B", "C", "D", "E"])
        .await;

    let republish = harness
        .service
        .publish(list.id(), &owner, request("Books", ["A", "B", "C", "D", "E"]))
        .await
        .expect_err("already published");
    let edit = ListEdit::try_new("Books", vec![String::new(); LIST_LENGTH]).expect("edit");
    let update = harness
        .service
        .update(list.id(), &owner, edit)
        .await
        .expect_err("already published");

    assert_eq!(republish.code(), ErrorCode::Conflict);
    assert_eq!(update.code(), ErrorCode::Conflict);
    assert!(harness.community("Books").await.is_none());
}

#[rstest]
#[tokio::test]
async fn drafts_are_private_until_published(harness: Harness) {
    let owner = harness.user("Ada", "Lovelace").await;
    let stranger = harness.user("Grace", "Hopper").await;
    let edit = ListEdit::try_new(
        "Films",
        ["A", "B", "", "", ""].map(String::from).to_vec(),
    )
    .expect("edit");
    let draft = harness.service.create(&owner).await.expect("create");
    let draft = harness
        .service
        .update(draft.id(), &owner, edit)
        .await
        .expect("update");

    assert_eq!(draft.items()[1], "B");
    assert!(harness.service.get(draft.id(), Some(owner)).await.is_ok());
    let hidden = harness
        .service
        .get(draft.id(), Some(stranger))
        .await
        .expect_err("not visible");
    assert_eq!(hidden.code(), ErrorCode::NotFound);
    assert!(harness.service.list_visible(None).await.expect("list").is_empty());
    let not_owner = harness
        .service
        .update(
            draft.id(),
            &stranger,
            ListEdit::try_new("x", vec![String::new(); LIST_LENGTH]).expect("edit"),
        )
        .await
        .expect_err("not the owner");
    assert_eq!(not_owner.message(), LIST_NOT_FOUND);
}

#[rstest]
#[tokio::test]
async fn deleting_a_published_list_retracts_its_votes(harness: Harness) {
    let ada = harness.user("Ada", "Lovelace").await;
    let grace = harness.user("Grace", "Hopper").await;
    let first = harness
        .published(&ada, "Food", ["Pizza", "Tacos", "Sushi", "Pho", "Ramen"])
        .await;
    let second = harness
        .published(&grace, "Food", ["Pizza", "Curry", "Tacos", "Dal", "Pho"])
        .await;

    harness.service.delete(second.id(), &grace).await.expect("delete");
    let community = harness.community("Food").await.expect("community kept");
    assert_eq!(community.tally().votes_for("Pizza"), Some(5));
    assert_eq!(community.tally().votes_for("Curry"), None);

    harness.service.delete(first.id(), &ada).await.expect("delete");
    assert!(harness.community("Food").await.is_none());
    assert!(harness.service.list_visible(None).await.expect("list").is_empty());
}

#[rstest]
#[tokio::test]
async fn deleting_someone_elses_list_is_not_found(harness: Harness) {
    let owner = harness.user("Ada", "Lovelace").await;
    let stranger = harness.user("Grace", "Hopper").await;
    let list = harness
        .published(&owner, "Films", ["A", "B", "C", "D", "E"])
        .await;

    let err = harness
        .service
        .delete(list.id(), &stranger)
        .await
        .expect_err("not the owner");

    assert_eq!(err.code(), ErrorCode::NotFound);
    let community = harness.community("Films").await.expect("community kept");
    assert_eq!(community.tally().votes_for("A"), Some(5));
}

#[rstest]
#[tokio::test]
async fn deleting_a_published_list_without_community_record_is_a_conflict(harness: Harness) {
    let owner = harness.user("Ada", "Lovelace").await;
    let list = harness
        .published(&owner, "Films", ["A", "B", "C", "D", "E"])
        .await;
    let community = harness.community("Films").await.expect("community list");
    harness
        .community
        .delete(community.id(), community.revision())
        .await
        .expect("drop community record");

    let err = harness
        .service
        .delete(list.id(), &owner)
        .await
        .expect_err("diverged state");

    assert_eq!(err.code(), ErrorCode::Conflict);
    assert_eq!(err.message(), COMMUNITY_LIST_ERROR);
    assert!(
        harness
            .lists
            .find_by_id(list.id())
            .await
            .expect("lookup")
            .is_some()
    );
}

#[tokio::test]
async fn deleting_a_draft_never_touches_community_lists() {
    let owner = UserId::random();
    let draft = PersonalList::draft(ListId::random(), owner, "Ada Lovelace");
    let stored = draft.clone();
    let mut lists = MockPersonalListRepository::new();
    lists
        .expect_find_by_id()
        .times(1)
        .return_once(move |_| Ok(Some(stored)));
    lists.expect_delete().times(1).return_once(|_| Ok(true));
    let service = ListService::new(
        Arc::new(lists),
        Arc::new(MockCommunityListRepository::new()),
        Arc::new(MemoryUserRepository::new()),
        fixture_clock(),
    );

    let deleted = service.delete(draft.id(), &owner).await.expect("delete");

    assert_eq!(deleted, draft);
}

#[tokio::test]
async fn failed_personal_save_undoes_the_community_fold() {
    let owner = UserId::random();
    let draft = PersonalList::draft(ListId::random(), owner, "Ada Lovelace");
    let stored = draft.clone();
    let mut lists = MockPersonalListRepository::new();
    lists
        .expect_find_by_id()
        .return_once(move |_| Ok(Some(stored)));
    lists
        .expect_find_published_by_owner_and_name()
        .return_once(|_, _| Ok(None));
    lists
        .expect_save()
        .return_once(|_, _| Err(PersonalListRepositoryError::connection("refused")));
    let community = Arc::new(MemoryCommunityListRepository::new());
    let service = ListService::new(
        Arc::new(lists),
        Arc::clone(&community),
        Arc::new(MemoryUserRepository::new()),
        fixture_clock(),
    );

    let err = service
        .publish(draft.id(), &owner, request("Films", ["A", "B", "C", "D", "E"]))
        .await
        .expect_err("save fails");

    assert_eq!(err.code(), ErrorCode::ServiceUnavailable);
    assert!(
        community
            .find_by_name("Films")
            .await
            .expect("lookup")
            .is_none()
    );
}

#[tokio::test]
async fn name_clash_found_at_save_is_a_conflict_and_undoes_the_fold() {
    let owner = UserId::random();
    let draft = PersonalList::draft(ListId::random(), owner, "Ada Lovelace");
    let stored = draft.clone();
    let mut lists = MockPersonalListRepository::new();
    lists
        .expect_find_by_id()
        .return_once(move |_| Ok(Some(stored)));
    lists
        .expect_find_published_by_owner_and_name()
        .return_once(|_, _| Ok(None));
    lists
        .expect_save()
        .return_once(|_, _| Err(PersonalListRepositoryError::duplicate_name("Films")));
    let community = Arc::new(MemoryCommunityListRepository::new());
    let service = ListService::new(
        Arc::new(lists),
        Arc::clone(&community),
        Arc::new(MemoryUserRepository::new()),
        fixture_clock(),
    );

    let err = service
        .publish(draft.id(), &owner, request("Films", ["A", "B", "C", "D", "E"]))
        .await
        .expect_err("name already taken");

    assert_eq!(err.code(), ErrorCode::Conflict);
    assert_eq!(err.message(), DUPLICATE_PUBLISH_NAME);
    assert!(
        community
            .find_by_name("Films")
            .await
            .expect("lookup")
            .is_none()
    );
}

#[rstest]
#[tokio::test]
async fn reactions_toggle_on_published_lists(harness: Harness) {
    let owner = harness.user("Ada", "Lovelace").await;
    let fan = harness.user("Grace", "Hopper").await;
    let list = harness
        .published(&owner, "Films", ["A", "B", "C", "D", "E"])
        .await;

    let liked = harness
        .service
        .toggle_reaction(list.id(), &fan, Reaction::Like)
        .await
        .expect("like");
    assert_eq!(liked.engagement().likes(), &[fan]);

    let disliked = harness
        .service
        .toggle_reaction(list.id(), &fan, Reaction::Dislike)
        .await
        .expect("dislike");
    assert!(disliked.engagement().likes().is_empty());
    assert_eq!(disliked.engagement().dislikes(), &[fan]);

    let cleared = harness
        .service
        .toggle_reaction(list.id(), &fan, Reaction::Dislike)
        .await
        .expect("undo dislike");
    assert_eq!(cleared.engagement(), &Engagement::default());
}

#[rstest]
#[tokio::test]
async fn reactions_on_drafts_are_ignored(harness: Harness) {
    let owner = harness.user("Ada", "Lovelace").await;
    let draft = harness.service.create(&owner).await.expect("create");

    let list = harness
        .service
        .toggle_reaction(draft.id(), &owner, Reaction::Like)
        .await
        .expect("no-op");

    assert!(list.engagement().likes().is_empty());
    assert_eq!(list.revision(), draft.revision());
}

#[rstest]
#[tokio::test]
async fn engagement_on_someone_elses_draft_is_not_found(harness: Harness) {
    let owner = harness.user("Ada", "Lovelace").await;
    let stranger = harness.user("Grace", "Hopper").await;
    let draft = harness.service.create(&owner).await.expect("create");

    let reacted = harness
        .service
        .toggle_reaction(draft.id(), &stranger, Reaction::Dislike)
        .await
        .expect_err("draft is private");
    let commented = harness
        .service
        .add_comment(draft.id(), &stranger, "peek".into())
        .await
        .expect_err("draft is private");

    for err in [reacted, commented] {
        assert_eq!(err.code(), ErrorCode::NotFound);
        assert_eq!(err.message(), LIST_NOT_FOUND);
    }
}

#[rstest]
#[tokio::test]
async fn comments_are_trimmed_and_attributed(harness: Harness) {
    let owner = harness.user("Ada", "Lovelace").await;
    let fan = harness.user("Grace", "Hopper").await;
    let list = harness
        .published(&owner, "Films", ["A", "B", "C", "D", "E"])
        .await;

    let list = harness
        .service
        .add_comment(list.id(), &fan, "  Bold choices  ".to_owned())
        .await
        .expect("comment");

    assert_eq!(
        list.engagement().comments(),
        &[Comment::new("Grace Hopper", "Bold choices")]
    );
    let blank = harness
        .service
        .add_comment(list.id(), &fan, "   ".to_owned())
        .await
        .expect_err("blank");
    assert_eq!(blank.message(), BLANK_COMMENT);
}

#[rstest]
#[tokio::test]
async fn views_count_only_published_lists(harness: Harness) {
    let owner = harness.user("Ada", "Lovelace").await;
    let draft = harness.service.create(&owner).await.expect("create");
    let list = harness
        .published(&owner, "Films", ["A", "B", "C", "D", "E"])
        .await;

    harness.service.record_view(list.id()).await.expect("view");
    harness.service.record_view(list.id()).await.expect("view");
    harness.service.record_view(draft.id()).await.expect("draft view");

    let viewed = harness.service.get(list.id(), None).await.expect("get");
    assert_eq!(viewed.engagement().views(), 2);
    let draft = harness
        .service
        .get(draft.id(), Some(owner))
        .await
        .expect("get draft");
    assert_eq!(draft.engagement().views(), 0);
    let missing = harness
        .service
        .record_view(&ListId::random())
        .await
        .expect_err("missing");
    assert_eq!(missing.code(), ErrorCode::NotFound);
}
