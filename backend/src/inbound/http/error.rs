//! Actix rendering of domain errors.
//!
//! Validation, conflict and missing-session failures all answer
//! `403 Forbidden`, which is the contract existing clients rely on. Internal
//! failures are logged in full and reach the client only as a generic message
//! carrying the trace id.

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use tracing::error;

use crate::domain::{Error, ErrorCode, TRACE_ID_HEADER};

const INTERNAL_MESSAGE: &str = "Internal server error";

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        match self.code() {
            ErrorCode::InvalidRequest => StatusCode::BAD_REQUEST,
            ErrorCode::NotFound => StatusCode::NOT_FOUND,
            ErrorCode::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
            ErrorCode::Unauthenticated | ErrorCode::Validation | ErrorCode::Conflict => {
                StatusCode::FORBIDDEN
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        let mut response = HttpResponse::build(self.status_code());
        if let Some(id) = self.trace_id() {
            response.insert_header((TRACE_ID_HEADER, id.to_owned()));
        }
        if self.code() != ErrorCode::InternalError {
            return response.json(self);
        }

        error!(message = self.message(), trace_id = ?self.trace_id(), "request failed");
        let public = match self.trace_id() {
            Some(id) => Error::internal(INTERNAL_MESSAGE).with_trace_id(id),
            None => Error::internal(INTERNAL_MESSAGE),
        };
        response.json(public)
    }
}
