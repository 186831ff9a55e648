//! Domain records and the DTOs of the HTTP API.

pub mod event;
pub mod requests;
pub mod responses;
pub mod suggestion;
pub mod volunteer;

pub use event::{Event, EventRegistration};
pub use requests::{
    ApproveRequest, PageQuery, RegisterRequest, RejectRequest, ReviewRequest, SearchQuery,
};
pub use responses::{CollectionStats, HealthResponse, SaveResponse, StatsResponse};
pub use suggestion::{Suggestion, SuggestionCategory, SuggestionStatus};
pub use volunteer::{ApprovalStatus, StatusPartition, Volunteer};
