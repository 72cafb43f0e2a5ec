//! # API Shared
//!
//! Shared utilities and definitions for the ConvertX API.
//!
//! Contains:
//! - Wire types shared by every endpoint (`HealthRes`, `ErrorRes`)
//! - Shared services like `HealthService`
//! - Authentication utilities (`ApiKeyGuard`)
//!
//! Used by `api-rest` and the `convertx-run` binary.

pub mod auth;
pub mod health;

pub use auth::{ApiKeyGuard, AuthError, API_KEY_HEADER};
pub use health::HealthService;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Health check response body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct HealthRes {
    pub ok: bool,
}

/// Body of every error response: `{ "error": "<message>" }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ErrorRes {
    pub error: String,
}

impl ErrorRes {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
