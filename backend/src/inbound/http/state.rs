//! Shared HTTP adapter state.
//!
//! Handlers accept this state via `actix_web::web::Data` so they depend only
//! on the driving ports and stay testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{
    AccountCommand, AccountQuery, CommunityListCommand, CommunityListQuery, ListCommand,
    ListQuery,
};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub accounts: Arc<dyn AccountCommand>,
    pub accounts_query: Arc<dyn AccountQuery>,
    pub lists: Arc<dyn ListCommand>,
    pub lists_query: Arc<dyn ListQuery>,
    pub community: Arc<dyn CommunityListCommand>,
    pub community_query: Arc<dyn CommunityListQuery>,
}

impl HttpState {
    /// Build state from services implementing both halves of each port pair.
    ///
    /// Tests that need to stub one side can construct the struct directly.
    pub fn from_services<A, L, C>(accounts: Arc<A>, lists: Arc<L>, community: Arc<C>) -> Self
    where
        A: AccountCommand + AccountQuery + 'static,
        L: ListCommand + ListQuery + 'static,
        C: CommunityListCommand + CommunityListQuery + 'static,
    {
        Self {
            accounts: accounts.clone(),
            accounts_query: accounts,
            lists: lists.clone(),
            lists_query: lists,
            community: community.clone(),
            community_query: community,
        }
    }
}
