//! HTTP inbound adapter exposing the REST endpoints.

use actix_web::web;

pub mod community;
pub mod error;
pub mod health;
pub mod lists;
pub mod lists_dto;
pub mod schemas;
pub mod session;
pub mod session_config;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod users;

pub use crate::domain::ApiResult;

/// Register account and list routes. Mount inside an `/api` scope wrapped by
/// the session middleware.
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.configure(users::configure).configure(lists::configure);
}
