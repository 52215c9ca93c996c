//! Account registration, login and profile lookup.
//!
//! Password hashing runs on the blocking thread pool so slow hash parameters
//! never stall the async workers.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;
use zeroize::Zeroizing;

use crate::domain::ports::{
    AccountCommand, AccountQuery, PasswordHashError, PasswordHasher, UserPersistenceError,
    UserRepository,
};
use crate::domain::{
    EmailAddress, Error, LoginCredentials, PasswordHash, Registration, User, UserId, UserProfile,
};

/// Message returned when registering an email that is already in use.
pub const DUPLICATE_EMAIL_MESSAGE: &str = "An account with this email address already exists.";
/// Message returned when the password does not match the stored hash.
pub const INCORRECT_PASSWORD_MESSAGE: &str = "Incorrect password.";

/// Account service implementing the account driving ports.
#[derive(Clone)]
pub struct AccountService<U, H> {
    users: Arc<U>,
    hasher: Arc<H>,
}

impl<U, H> AccountService<U, H> {
    pub fn new(users: Arc<U>, hasher: Arc<H>) -> Self {
        Self { users, hasher }
    }
}

impl<U, H> AccountService<U, H>
where
    U: UserRepository,
    H: PasswordHasher + 'static,
{
    async fn hash_password(&self, password: &str) -> Result<PasswordHash, Error> {
        let hasher = Arc::clone(&self.hasher);
        let password = Zeroizing::new(password.to_owned());
        tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|err| Error::internal(format!("password hashing task failed: {err}")))?
            .map_err(map_hash_error)
    }

    async fn verify_password(&self, password: &str, hash: PasswordHash) -> Result<bool, Error> {
        let hasher = Arc::clone(&self.hasher);
        let password = Zeroizing::new(password.to_owned());
        tokio::task::spawn_blocking(move || hasher.verify(&password, &hash))
            .await
            .map_err(|err| Error::internal(format!("password verification task failed: {err}")))?
            .map_err(map_hash_error)
    }
}

#[async_trait]
impl<U, H> AccountCommand for AccountService<U, H>
where
    U: UserRepository,
    H: PasswordHasher + 'static,
{
    async fn register(&self, registration: Registration) -> Result<UserProfile, Error> {
        let taken = self
            .users
            .find_by_email(registration.email())
            .await
            .map_err(map_user_error)?;
        if taken.is_some() {
            return Err(Error::invalid_request(DUPLICATE_EMAIL_MESSAGE));
        }

        let hash = self.hash_password(registration.password()).await?;
        let user = User::new(
            UserId::random(),
            registration.first_name().clone(),
            registration.last_name().clone(),
            registration.email().clone(),
            hash,
        );

        // The lookup above is advisory; the store's unique index decides races.
        self.users.insert(&user).await.map_err(|err| match err {
            UserPersistenceError::DuplicateEmail { .. } => {
                Error::invalid_request(DUPLICATE_EMAIL_MESSAGE)
            }
            other => map_user_error(other),
        })?;

        info!(user_id = %user.id(), "registered account");
        Ok(user.profile())
    }

    async fn login(&self, credentials: LoginCredentials) -> Result<UserProfile, Error> {
        let unknown = || {
            Error::invalid_request(format!(
                "Email address {} does not exist.",
                credentials.email()
            ))
        };
        let email = EmailAddress::new(credentials.email()).map_err(|_| unknown())?;
        let user = self
            .users
            .find_by_email(&email)
            .await
            .map_err(map_user_error)?
            .ok_or_else(unknown)?;

        let matches = self
            .verify_password(credentials.password(), user.password_hash().clone())
            .await?;
        if !matches {
            return Err(Error::invalid_request(INCORRECT_PASSWORD_MESSAGE));
        }

        info!(user_id = %user.id(), "account logged in");
        Ok(user.profile())
    }
}

#[async_trait]
impl<U, H> AccountQuery for AccountService<U, H>
where
    U: UserRepository,
    H: PasswordHasher + 'static,
{
    async fn profile(&self, user: &UserId) -> Result<UserProfile, Error> {
        self.users
            .find_by_id(user)
            .await
            .map_err(map_user_error)?
            .map(|found| found.profile())
            .ok_or_else(|| Error::not_found("User not found"))
    }
}

/// Resolve the session's user, failing with `Unauthenticated` when the
/// account no longer exists.
pub(crate) async fn resolve_caller<U>(users: &U, id: &UserId, message: &str) -> Result<User, Error>
where
    U: UserRepository + ?Sized,
{
    users
        .find_by_id(id)
        .await
        .map_err(map_user_error)?
        .ok_or_else(|| Error::unauthenticated(message))
}

pub(crate) fn map_user_error(error: UserPersistenceError) -> Error {
    match error {
        UserPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("user repository unavailable: {message}"))
        }
        UserPersistenceError::Query { message } => {
            Error::internal(format!("user repository error: {message}"))
        }
        UserPersistenceError::DuplicateEmail { .. } => {
            Error::invalid_request(DUPLICATE_EMAIL_MESSAGE)
        }
    }
}

fn map_hash_error(error: PasswordHashError) -> Error {
    Error::internal(error.to_string())
}
