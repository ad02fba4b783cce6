use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use thiserror::Error;

use crate::protocol::SimpleResponse;

/// Every failure a request can end in. Each variant maps onto one HTTP status.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{0}")]
    Validation(String),
    #[error("start time must be before end time")]
    InvalidRange,

    #[error("missing bearer token")]
    TokenMissing,
    #[error("invalid token")]
    TokenInvalid,
    #[error("token has expired")]
    TokenExpired,
    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("{0}")]
    Forbidden(&'static str),

    #[error("no such user")]
    UserNotFound,
    #[error("no such slot")]
    SlotNotFound,
    #[error("no such appointment")]
    AppointmentNotFound,

    #[error("email already registered")]
    DuplicateEmail,
    #[error("slot already booked")]
    SlotAlreadyBooked,
    #[error("slot overlaps an existing slot")]
    SlotOverlap,
    #[error("appointment already cancelled")]
    AlreadyCancelled,

    #[error("store unavailable")]
    StoreUnavailable,
    #[error("DB error: {0}")]
    Database(#[from] diesel::result::Error),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl ServiceError {
    pub fn validation<S: ToString>(msg: S) -> Self {
        ServiceError::Validation(msg.to_string())
    }

    fn is_internal(&self) -> bool {
        matches!(
            self,
            ServiceError::StoreUnavailable | ServiceError::Database(_) | ServiceError::Internal(_)
        )
    }
}

impl ResponseError for ServiceError {
    fn status_code(&self) -> StatusCode {
        use ServiceError::*;

        match self {
            Validation(_) | InvalidRange => StatusCode::BAD_REQUEST,
            TokenMissing | TokenInvalid | TokenExpired | InvalidCredentials => {
                StatusCode::UNAUTHORIZED
            }
            Forbidden(_) => StatusCode::FORBIDDEN,
            UserNotFound | SlotNotFound | AppointmentNotFound => StatusCode::NOT_FOUND,
            DuplicateEmail | SlotAlreadyBooked | SlotOverlap | AlreadyCancelled => {
                StatusCode::CONFLICT
            }
            StoreUnavailable | Database(_) | Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let body = if self.is_internal() {
            tracing::error!(error = %self, "request failed");
            match self {
                ServiceError::StoreUnavailable => SimpleResponse::err(self),
                _ => SimpleResponse::err("internal server error"),
            }
        } else {
            tracing::debug!(error = %self, "request rejected");
            SimpleResponse::err(self)
        };
        HttpResponse::build(self.status_code()).json(body)
    }
}
