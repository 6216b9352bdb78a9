//! Uniform JSON response envelope.
//!
//! Every response body has exactly two top-level keys, `data` and `error`.
//! Exactly one of them is non-null; the constructors are the only way to
//! build an envelope, so the pairing cannot be violated.

use axum::{Json, http::StatusCode};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T> {
    data: Option<T>,
    error: Option<ErrorBody>,
}

impl<T> Envelope<T> {
    pub fn success(data: T) -> Self {
        Self {
            data: Some(data),
            error: None,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            data: None,
            error: Some(ErrorBody {
                message: message.into(),
            }),
        }
    }

    pub fn data(&self) -> Option<&T> {
        self.data.as_ref()
    }

    pub fn error(&self) -> Option<&ErrorBody> {
        self.error.as_ref()
    }
}

/// Status code plus envelope body, as returned by the handlers.
pub type EnvelopeResponse<T> = (StatusCode, Json<Envelope<T>>);

/// 200 with `data` populated.
pub fn respond_ok<T>(data: T) -> EnvelopeResponse<T> {
    (StatusCode::OK, Json(Envelope::success(data)))
}

/// Any status with `error.message` populated.
pub fn respond_error<T>(status: StatusCode, message: impl Into<String>) -> EnvelopeResponse<T> {
    (status, Json(Envelope::failure(message)))
}
