//! Service events and volunteer registrations for them.

use serde::{Deserialize, Serialize};

use crate::access::{PagedDataAccess, Record};
use crate::error::{DataError, Result};

/// An event published by the admins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub start_date: String,
    #[serde(default)]
    pub end_date: String,
    #[serde(default)]
    pub registrations: Vec<EventRegistration>,
    #[serde(default)]
    pub timestamp: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventRegistration {
    pub user_id: String,
    pub user_roll_number: String,
    pub user_name: String,
    pub registered_at: i64,
    #[serde(default)]
    pub is_approved: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub approved_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub approved_at: Option<i64>,
}

impl Event {
    pub fn is_registered(&self, user_id: &str) -> bool {
        self.registrations.iter().any(|r| r.user_id == user_id)
    }

    /// Adds a registration unless the user already has one.
    ///
    /// Returns false when the user was already registered.
    pub fn register(&mut self, registration: EventRegistration) -> bool {
        if self.is_registered(&registration.user_id) {
            return false;
        }
        self.registrations.push(registration);
        true
    }
}

impl Record for Event {
    const COLLECTION: &'static str = "events";

    fn id(&self) -> &str {
        &self.id
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![self.title.as_str(), self.description.as_str()]
    }
}

// == Registration ==
impl PagedDataAccess<Event> {
    /// Registers a user for event `event_id` through the write queue.
    ///
    /// A second registration by the same user is an `InvalidRequest`.
    pub async fn register(
        &self,
        event_id: &str,
        registration: EventRegistration,
    ) -> Result<Event> {
        self.try_update(event_id, move |event| {
            let user_id = registration.user_id.clone();
            if event.register(registration) {
                Ok(())
            } else {
                Err(DataError::InvalidRequest(format!(
                    "user {} is already registered",
                    user_id
                )))
            }
        })
        .await
    }
}
