/**
 * Routes Module
 * API route handlers
 */
use serde::{Deserialize, Serialize};

pub mod admin;
pub mod auth;
pub mod extract;
pub mod health;
pub mod public;
pub mod upload;

/// Error body shared by every handler
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SuccessResponse {
    pub success: bool,
    pub message: String,
}

impl SuccessResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }
}
