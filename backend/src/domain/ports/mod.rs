//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports (repositories, password hashing) are implemented by outbound
//! adapters. Driving ports (account, list and community use-cases) are
//! implemented by domain services and consumed by inbound adapters.

mod macros;
pub(crate) use macros::define_port_error;

mod account_command;
mod account_query;
mod community_list_command;
mod community_list_query;
mod community_list_repository;
mod list_command;
mod list_query;
mod password_hasher;
mod personal_list_repository;
mod user_repository;

#[cfg(test)]
pub use account_command::MockAccountCommand;
pub use account_command::AccountCommand;
#[cfg(test)]
pub use account_query::MockAccountQuery;
pub use account_query::AccountQuery;
#[cfg(test)]
pub use community_list_command::MockCommunityListCommand;
pub use community_list_command::CommunityListCommand;
#[cfg(test)]
pub use community_list_query::MockCommunityListQuery;
pub use community_list_query::CommunityListQuery;
#[cfg(test)]
pub use community_list_repository::MockCommunityListRepository;
pub use community_list_repository::{CommunityListRepository, CommunityListRepositoryError};
#[cfg(test)]
pub use list_command::MockListCommand;
pub use list_command::{ListCommand, PublishRequest};
#[cfg(test)]
pub use list_query::MockListQuery;
pub use list_query::ListQuery;
#[cfg(test)]
pub use password_hasher::MockPasswordHasher;
pub use password_hasher::{PasswordHashError, PasswordHasher};
#[cfg(test)]
pub use personal_list_repository::MockPersonalListRepository;
pub use personal_list_repository::{
    PersonalListRepository, PersonalListRepositoryError, ViewOutcome,
};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{UserPersistenceError, UserRepository};
