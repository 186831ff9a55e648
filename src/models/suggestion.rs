//! Suggestion box entries.

use serde::{Deserialize, Serialize};

use crate::access::{PagedDataAccess, Record};
use crate::error::Result;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Suggestion {
    pub id: String,
    pub user_id: String,
    pub user_name: String,
    pub user_roll_number: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: SuggestionCategory,
    #[serde(default)]
    pub status: SuggestionStatus,
    #[serde(default)]
    pub timestamp: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reviewed_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reviewed_at: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SuggestionCategory {
    #[default]
    General,
    Event,
    System,
    Achievement,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SuggestionStatus {
    #[default]
    Pending,
    Reviewed,
    Implemented,
    Rejected,
}

impl Suggestion {
    /// Records an admin's review.
    pub fn review(
        &mut self,
        status: SuggestionStatus,
        by: impl Into<String>,
        response: Option<String>,
        at_ms: i64,
    ) {
        self.status = status;
        self.reviewed_by = Some(by.into());
        self.reviewed_at = Some(at_ms);
        self.response = response;
    }
}

impl Record for Suggestion {
    const COLLECTION: &'static str = "suggestions";

    fn id(&self) -> &str {
        &self.id
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![
            self.title.as_str(),
            self.user_name.as_str(),
            self.user_roll_number.as_str(),
        ]
    }
}

// == Review ==
impl PagedDataAccess<Suggestion> {
    /// Records an admin's review of suggestion `id` through the write queue.
    pub async fn review(
        &self,
        id: &str,
        status: SuggestionStatus,
        by: impl Into<String>,
        response: Option<String>,
    ) -> Result<Suggestion> {
        let by = by.into();
        let at = chrono::Utc::now().timestamp_millis();
        self.update(id, move |s| s.review(status, by, response, at))
            .await
    }
}
