//! Builders wiring domain services to either database or in-memory adapters.

use std::sync::Arc;

use actix_web::web;
use mockable::{Clock, DefaultClock};
use tracing::warn;

use crate::domain::ports::{
    CommunityListRepository, PasswordHasher, PersonalListRepository, UserRepository,
};
use crate::domain::{AccountService, CommunityListService, ListService};
use crate::inbound::http::state::HttpState;
use crate::outbound::memory::{
    MemoryCommunityListRepository, MemoryPersonalListRepository, MemoryUserRepository,
};
use crate::outbound::persistence::{
    DbPool, DieselCommunityListRepository, DieselPersonalListRepository, DieselUserRepository,
};
use crate::outbound::security::Argon2PasswordHasher;

use super::{ServerConfig, Storage};

/// Repository triple backing the domain services.
struct Repositories<U, L, C> {
    users: Arc<U>,
    lists: Arc<L>,
    community: Arc<C>,
}

fn assemble<U, L, C, H>(
    repos: Repositories<U, L, C>,
    hasher: Arc<H>,
    clock: Arc<dyn Clock>,
) -> HttpState
where
    U: UserRepository + 'static,
    L: PersonalListRepository + 'static,
    C: CommunityListRepository + 'static,
    H: PasswordHasher + 'static,
{
    let Repositories {
        users,
        lists,
        community,
    } = repos;
    HttpState::from_services(
        Arc::new(AccountService::new(users.clone(), hasher)),
        Arc::new(ListService::new(
            lists,
            community.clone(),
            users.clone(),
            clock,
        )),
        Arc::new(CommunityListService::new(community, users)),
    )
}

fn database_state(pool: &DbPool, hasher: Arc<Argon2PasswordHasher>) -> HttpState {
    assemble(
        Repositories {
            users: Arc::new(DieselUserRepository::new(pool.clone())),
            lists: Arc::new(DieselPersonalListRepository::new(pool.clone())),
            community: Arc::new(DieselCommunityListRepository::new(pool.clone())),
        },
        hasher,
        Arc::new(DefaultClock),
    )
}

/// HTTP state over process-local collections.
///
/// Data lives as long as the returned state; nothing is persisted.
///
/// # Examples
/// ```
/// use std::sync::Arc;
///
/// use lister::outbound::security::Argon2PasswordHasher;
/// use lister::server::in_memory_state;
///
/// let state = in_memory_state(Arc::new(Argon2PasswordHasher::new()));
/// let _lists = state.lists.clone();
/// ```
pub fn in_memory_state(hasher: Arc<Argon2PasswordHasher>) -> HttpState {
    assemble(
        Repositories {
            users: Arc::new(MemoryUserRepository::new()),
            lists: Arc::new(MemoryPersonalListRepository::new()),
            community: Arc::new(MemoryCommunityListRepository::new()),
        },
        hasher,
        Arc::new(DefaultClock),
    )
}

/// Build the shared HTTP state, preferring the database when configured.
pub(super) fn build_http_state(config: &ServerConfig) -> web::Data<HttpState> {
    let hasher = Arc::new(Argon2PasswordHasher::new());
    let state = match config.storage() {
        Storage::Postgres(pool) => database_state(pool, hasher),
        Storage::Memory => {
            warn!("no database configured; lists and accounts are kept in memory only");
            in_memory_state(hasher)
        }
    };
    web::Data::new(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{LoginCredentials, Registration};
    use crate::inbound::http::session_config::SessionSettings;
    use rstest::{fixture, rstest};

    #[fixture]
    fn state() -> HttpState {
        let hasher = Argon2PasswordHasher::with_params(8 * 1024, 1, 1).expect("test params");
        in_memory_state(Arc::new(hasher))
    }

    #[rstest]
    #[tokio::test]
    async fn in_memory_services_share_one_user_store(state: HttpState) {
        let registration = Registration::try_from_parts(
            "Ada",
            "Lovelace",
            "ada@example.com",
            "analytical",
            "analytical",
        )
        .expect("valid registration");
        let profile = state
            .accounts
            .register(registration)
            .await
            .expect("register");

        let credentials = LoginCredentials::try_from_parts("ADA@example.com", "analytical")
            .expect("credentials");
        let logged_in = state.accounts.login(credentials).await.expect("login");
        assert_eq!(logged_in.id, profile.id);

        let draft = state.lists.create(&profile.id).await.expect("list owner resolves");
        assert_eq!(draft.owner_name(), "Ada Lovelace");
        let visible = state
            .lists_query
            .list_visible(Some(profile.id))
            .await
            .expect("list visible");
        assert_eq!(visible.len(), 1);
        assert!(state.community_query.list().await.expect("community").is_empty());
    }

    #[rstest]
    #[tokio::test]
    async fn missing_pool_falls_back_to_memory() {
        let session = SessionSettings {
            key: actix_web::cookie::Key::generate(),
            cookie_secure: false,
            same_site: actix_web::cookie::SameSite::Strict,
        };
        let config = ServerConfig::new(session, ([127, 0, 0, 1], 0).into());
        assert_eq!(config.storage().label(), "memory");

        let state = build_http_state(&config);

        assert!(state.community_query.list().await.expect("community").is_empty());
    }
}
