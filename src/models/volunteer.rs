//! Volunteer records and the approval workflow.

use serde::{Deserialize, Serialize};

use crate::access::{PagedDataAccess, Record};
use crate::error::Result;

/// A registered student volunteer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Volunteer {
    pub id: String,
    pub full_name: String,
    pub roll_number: String,
    pub branch: String,
    #[serde(default)]
    pub qr_code: String,
    /// Registration time (Unix milliseconds)
    #[serde(default)]
    pub timestamp: i64,
    #[serde(default)]
    pub is_approved: bool,
    #[serde(default)]
    pub is_rejected: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub approved_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub approved_at: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rejected_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rejected_at: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rejection_reason: Option<String>,
    #[serde(default)]
    pub join_date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
}

/// Where a volunteer stands in the approval workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApprovalStatus {
    Pending,
    Approved,
    Rejected,
}

impl Volunteer {
    /// Creates a pending registration.
    pub fn new(
        id: impl Into<String>,
        full_name: impl Into<String>,
        roll_number: impl Into<String>,
        branch: impl Into<String>,
    ) -> Self {
        let id = id.into();
        Self {
            qr_code: format!("NSS-{}", id),
            id,
            full_name: full_name.into(),
            roll_number: roll_number.into(),
            branch: branch.into(),
            timestamp: chrono::Utc::now().timestamp_millis(),
            is_approved: false,
            is_rejected: false,
            approved_by: None,
            approved_at: None,
            rejected_by: None,
            rejected_at: None,
            rejection_reason: None,
            join_date: chrono::Utc::now().format("%Y-%m-%d").to_string(),
            end_date: None,
        }
    }

    pub fn status(&self) -> ApprovalStatus {
        if self.is_rejected {
            ApprovalStatus::Rejected
        } else if self.is_approved {
            ApprovalStatus::Approved
        } else {
            ApprovalStatus::Pending
        }
    }

    /// Marks the volunteer approved, clearing any earlier rejection.
    pub fn approve(&mut self, by: impl Into<String>, at_ms: i64) {
        self.is_approved = true;
        self.is_rejected = false;
        self.approved_by = Some(by.into());
        self.approved_at = Some(at_ms);
        self.rejected_by = None;
        self.rejected_at = None;
        self.rejection_reason = None;
    }

    /// Marks the volunteer rejected, revoking any earlier approval.
    pub fn reject(&mut self, by: impl Into<String>, reason: Option<String>, at_ms: i64) {
        self.is_approved = false;
        self.is_rejected = true;
        self.rejected_by = Some(by.into());
        self.rejected_at = Some(at_ms);
        self.rejection_reason = reason;
        self.approved_by = None;
        self.approved_at = None;
    }
}

impl Record for Volunteer {
    const COLLECTION: &'static str = "volunteers";

    fn id(&self) -> &str {
        &self.id
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![
            self.full_name.as_str(),
            self.roll_number.as_str(),
            self.branch.as_str(),
        ]
    }
}

/// Splits volunteers by approval status, preserving order within each group.
#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct StatusPartition {
    pub approved: Vec<Volunteer>,
    pub pending: Vec<Volunteer>,
    pub rejected: Vec<Volunteer>,
}

impl StatusPartition {
    pub fn from_volunteers(volunteers: impl IntoIterator<Item = Volunteer>) -> Self {
        let mut partition = Self::default();
        for volunteer in volunteers {
            match volunteer.status() {
                ApprovalStatus::Approved => partition.approved.push(volunteer),
                ApprovalStatus::Pending => partition.pending.push(volunteer),
                ApprovalStatus::Rejected => partition.rejected.push(volunteer),
            }
        }
        partition
    }
}

// == Approval Workflow ==
impl PagedDataAccess<Volunteer> {
    /// Approves volunteer `id` through the write queue.
    pub async fn approve(&self, id: &str, by: impl Into<String>) -> Result<Volunteer> {
        let by = by.into();
        let at = chrono::Utc::now().timestamp_millis();
        self.update(id, move |v| v.approve(by, at)).await
    }

    /// Rejects volunteer `id` through the write queue.
    pub async fn reject(
        &self,
        id: &str,
        by: impl Into<String>,
        reason: Option<String>,
    ) -> Result<Volunteer> {
        let by = by.into();
        let at = chrono::Utc::now().timestamp_millis();
        self.update(id, move |v| v.reject(by, reason, at)).await
    }

    pub async fn partition(&self) -> Result<StatusPartition> {
        Ok(StatusPartition::from_volunteers(self.get_all().await?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_new_volunteer_is_pending() {
        let v = Volunteer::new("u1", "Asha Rao", "21CS001", "CSE");
        assert_eq!(v.status(), ApprovalStatus::Pending);
        assert_eq!(v.qr_code, "NSS-u1");
    }

    #[test]
    fn test_approve_then_reject() {
        let mut v = Volunteer::new("u1", "Asha Rao", "21CS001", "CSE");

        v.approve("admin", 10);
        assert_eq!(v.status(), ApprovalStatus::Approved);
        assert_eq!(v.approved_by.as_deref(), Some("admin"));

        v.reject("admin", Some("duplicate".to_string()), 20);
        assert_eq!(v.status(), ApprovalStatus::Rejected);
        assert!(v.approved_by.is_none());
        assert_eq!(v.rejection_reason.as_deref(), Some("duplicate"));
    }

    #[test]
    fn test_matches_any_field_case_insensitive() {
        let v = Volunteer::new("u1", "Asha Rao", "21CS001", "Mechanical");

        assert!(v.matches("asha"));
        assert!(v.matches("21cs"));
        assert!(v.matches("mech"));
        assert!(!v.matches("civil"));
    }

    #[test]
    fn test_deserializes_camel_case_with_defaults() {
        let v: Volunteer = serde_json::from_value(json!({
            "id": "u9",
            "fullName": "Ravi K",
            "rollNumber": "20EE010",
            "branch": "EEE",
            "isApproved": true
        }))
        .unwrap();

        assert_eq!(v.full_name, "Ravi K");
        assert_eq!(v.status(), ApprovalStatus::Approved);
        assert!(v.end_date.is_none());
    }

    #[test]
    fn test_status_partition() {
        let mut approved = Volunteer::new("a", "A", "1", "CSE");
        approved.approve("admin", 1);
        let mut rejected = Volunteer::new("r", "R", "2", "CSE");
        rejected.reject("admin", None, 1);
        let pending = Volunteer::new("p", "P", "3", "CSE");

        let partition = StatusPartition::from_volunteers(vec![approved, pending, rejected]);

        assert_eq!(partition.approved.len(), 1);
        assert_eq!(partition.pending[0].id, "p");
        assert_eq!(partition.rejected[0].id, "r");
    }

    mod workflow {
        use super::super::{ApprovalStatus, Volunteer};
        use crate::access::PagedDataAccess;
        use crate::backend::MemoryBackend;
        use crate::config::{CacheConfig, PageConfig};
        use crate::error::DataError;
        use std::sync::Arc;

        fn access() -> PagedDataAccess<Volunteer> {
            let people = vec![
                serde_json::to_value(Volunteer::new("u1", "Asha Rao", "21CS001", "CSE")).unwrap(),
                serde_json::to_value(Volunteer::new("u2", "Ravi K", "20EE010", "EEE")).unwrap(),
            ];
            PagedDataAccess::new(
                Arc::new(MemoryBackend::with_collection("volunteers", people)),
                CacheConfig::default(),
                PageConfig::default(),
            )
        }

        #[tokio::test]
        async fn test_approve_and_reject_persist() {
            let access = access();

            let approved = access.approve("u1", "admin").await.unwrap();
            assert_eq!(approved.status(), ApprovalStatus::Approved);

            let rejected = access
                .reject("u2", "admin", Some("incomplete".to_string()))
                .await
                .unwrap();
            assert_eq!(rejected.rejection_reason.as_deref(), Some("incomplete"));

            let partition = access.partition().await.unwrap();
            assert_eq!(partition.approved.len(), 1);
            assert_eq!(partition.rejected.len(), 1);
            assert!(partition.pending.is_empty());
        }

        #[tokio::test]
        async fn test_approve_unknown_volunteer() {
            let access = access();
            let result = access.approve("nobody", "admin").await;
            assert!(matches!(result, Err(DataError::NotFound(_))));
        }
    }
}
