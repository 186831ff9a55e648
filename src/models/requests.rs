//! Request DTOs for the portal API
//!
//! Query strings and bodies accepted by the HTTP handlers.

use serde::Deserialize;

use crate::models::SuggestionStatus;

/// Query string for paged listings (`?page=&limit=`)
///
/// A missing or zero `limit` means the configured default page size.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageQuery {
    #[serde(default)]
    pub page: usize,
    #[serde(default)]
    pub limit: usize,
}

/// Query string for `GET /volunteers/search`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
    #[serde(default)]
    pub page: usize,
    #[serde(default)]
    pub limit: usize,
}

/// Body of `POST /volunteers/:id/approve`
#[derive(Debug, Clone, Deserialize)]
pub struct ApproveRequest {
    /// Admin making the decision
    pub by: String,
}

/// Body of `POST /volunteers/:id/reject`
#[derive(Debug, Clone, Deserialize)]
pub struct RejectRequest {
    pub by: String,
    #[serde(default)]
    pub reason: Option<String>,
}

/// Body of `POST /events/:id/register`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub user_id: String,
    #[serde(default)]
    pub user_roll_number: String,
    #[serde(default)]
    pub user_name: String,
}

/// Body of `POST /suggestions/:id/review`
#[derive(Debug, Clone, Deserialize)]
pub struct ReviewRequest {
    pub status: SuggestionStatus,
    pub by: String,
    #[serde(default)]
    pub response: Option<String>,
}

impl RegisterRequest {
    pub fn validate(&self) -> Option<String> {
        if self.user_id.trim().is_empty() {
            return Some("Field 'userId' cannot be empty".to_string());
        }
        None
    }
}

impl ReviewRequest {
    pub fn validate(&self) -> Option<String> {
        validate_actor(&self.by)
    }
}

impl ApproveRequest {
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        validate_actor(&self.by)
    }
}

impl RejectRequest {
    pub fn validate(&self) -> Option<String> {
        validate_actor(&self.by)
    }
}

fn validate_actor(by: &str) -> Option<String> {
    if by.trim().is_empty() {
        return Some("Field 'by' cannot be empty".to_string());
    }
    None
}
