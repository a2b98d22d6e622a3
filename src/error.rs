// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application error types with consistent API responses.
//!
//! The response shapes follow the contract the frontend was written
//! against: auth and not-found failures carry a `msg` field, validation
//! failures carry an `error` array with one entry per violated field, and
//! anything internal is an opaque plain-text 500.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// A single field validation failure.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct FieldError {
    pub field: String,
    pub msg: String,
}

impl FieldError {
    pub fn new(field: &str, msg: &str) -> Self {
        Self {
            field: field.to_string(),
            msg: msg.to_string(),
        }
    }
}

/// Application error type that converts to HTTP responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("No token, authorization denied")]
    Unauthorized,

    #[error("token is not valid")]
    InvalidToken,

    #[error("Validation failed")]
    Validation(Vec<FieldError>),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Write conflict: {0}")]
    Conflict(String),

    #[error("GitHub API error: {0}")]
    GithubApi(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Convert `validator` output into a 400 with per-field messages.
    pub fn from_validation(errors: validator::ValidationErrors) -> Self {
        let mut fields = Vec::new();
        for (field, failures) in errors.field_errors() {
            for failure in failures {
                let msg = failure
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("{} is invalid", field));
                fields.push(FieldError::new(&field, &msg));
            }
        }
        // Deterministic ordering for clients and tests
        fields.sort_by(|a, b| a.field.cmp(&b.field));
        AppError::Validation(fields)
    }
}

/// JSON error body with a single message.
#[derive(Serialize)]
struct MsgResponse {
    msg: String,
}

/// JSON error body listing validation failures.
#[derive(Serialize)]
struct ValidationResponse {
    error: Vec<FieldError>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let text = self.to_string();
        match self {
            AppError::Unauthorized | AppError::InvalidToken => {
                let body = MsgResponse { msg: text };
                (StatusCode::UNAUTHORIZED, Json(body)).into_response()
            }
            AppError::Validation(fields) => {
                let body = ValidationResponse { error: fields };
                (StatusCode::BAD_REQUEST, Json(body)).into_response()
            }
            AppError::NotFound(msg) => {
                let body = MsgResponse { msg };
                (StatusCode::NOT_FOUND, Json(body)).into_response()
            }
            AppError::Conflict(msg) => {
                let body = MsgResponse { msg };
                (StatusCode::CONFLICT, Json(body)).into_response()
            }
            AppError::GithubApi(msg) => {
                tracing::error!(error = %msg, "GitHub API error");
                (StatusCode::INTERNAL_SERVER_ERROR, "Server error").into_response()
            }
            AppError::Database(msg) => {
                tracing::error!(error = %msg, "Database error");
                (StatusCode::INTERNAL_SERVER_ERROR, "Server error").into_response()
            }
            AppError::Internal(err) => {
                tracing::error!(error = %err, "Internal server error");
                (StatusCode::INTERNAL_SERVER_ERROR, "Server error").into_response()
            }
        }
    }
}

/// Result type alias for handlers
pub type Result<T> = std::result::Result<T, AppError>;
