//! API Handlers
//!
//! HTTP request handlers for the portal data endpoints.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use tracing::warn;

use crate::access::{Page, PagedDataAccess, Record, SearchSession};
use crate::backend::{Backend, JsonFileBackend};
use crate::config::Config;
use crate::error::{DataError, Result};
use crate::models::{
    ApproveRequest, CollectionStats, Event, EventRegistration, HealthResponse, PageQuery,
    RegisterRequest, RejectRequest, ReviewRequest, SaveResponse, SearchQuery, StatsResponse,
    StatusPartition, Suggestion, Volunteer,
};

/// Application state shared across all handlers.
///
/// One [`PagedDataAccess`] per collection, all over the same backend.
#[derive(Clone)]
pub struct AppState {
    pub volunteers: Arc<PagedDataAccess<Volunteer>>,
    pub events: Arc<PagedDataAccess<Event>>,
    pub suggestions: Arc<PagedDataAccess<Suggestion>>,
    search_debounce: Duration,
}

impl AppState {
    /// Must be called inside a Tokio runtime.
    pub fn new(backend: Arc<dyn Backend>, config: &Config) -> Self {
        let cache = config.cache();
        let paging = config.paging();
        Self {
            volunteers: Arc::new(PagedDataAccess::new(backend.clone(), cache, paging)),
            events: Arc::new(PagedDataAccess::new(backend.clone(), cache, paging)),
            suggestions: Arc::new(PagedDataAccess::new(backend, cache, paging)),
            search_debounce: config.search_debounce(),
        }
    }

    /// Opens a debounced search-as-you-type session over the volunteers.
    pub fn volunteer_search(&self) -> SearchSession<Volunteer> {
        SearchSession::new(Arc::clone(&self.volunteers), self.search_debounce)
    }

    /// Creates the state over JSON collection files in `config.data_dir`.
    pub fn from_config(config: &Config) -> Self {
        Self::new(Arc::new(JsonFileBackend::new(config.data_dir.clone())), config)
    }
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}

/// Handler for GET /stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    Json(StatsResponse {
        volunteers: collection_stats(&state.volunteers).await,
        events: collection_stats(&state.events).await,
        suggestions: collection_stats(&state.suggestions).await,
    })
}

// == Volunteers ==
/// Handler for GET /volunteers
///
/// Serves the page, then warms the following pages in the background.
pub async fn list_volunteers_handler(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<Json<Page<Volunteer>>> {
    list_page(state.volunteers, query).await
}

/// Handler for GET /volunteers/search
pub async fn search_volunteers_handler(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<Volunteer>>> {
    let found = state
        .volunteers
        .search(&query.q, query.page, query.limit)
        .await?;
    Ok(Json(found))
}

/// Handler for GET /volunteers/by-status
pub async fn partition_volunteers_handler(
    State(state): State<AppState>,
) -> Result<Json<StatusPartition>> {
    Ok(Json(state.volunteers.partition().await?))
}

/// Handler for GET /volunteers/:id
pub async fn get_volunteer_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Volunteer>> {
    Ok(Json(state.volunteers.get_by_id(&id).await?))
}

/// Handler for PUT /volunteers
pub async fn save_volunteer_handler(
    State(state): State<AppState>,
    Json(volunteer): Json<Volunteer>,
) -> Result<Json<SaveResponse>> {
    save(&state.volunteers, volunteer).await
}

/// Handler for POST /volunteers/:id/approve
pub async fn approve_volunteer_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<ApproveRequest>,
) -> Result<Json<Volunteer>> {
    if let Some(error_msg) = req.validate() {
        return Err(DataError::InvalidRequest(error_msg));
    }
    Ok(Json(state.volunteers.approve(&id, req.by).await?))
}

/// Handler for POST /volunteers/:id/reject
pub async fn reject_volunteer_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<RejectRequest>,
) -> Result<Json<Volunteer>> {
    if let Some(error_msg) = req.validate() {
        return Err(DataError::InvalidRequest(error_msg));
    }
    Ok(Json(state.volunteers.reject(&id, req.by, req.reason).await?))
}

// == Events & Suggestions ==
/// Handler for GET /events
pub async fn list_events_handler(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<Json<Page<Event>>> {
    list_page(state.events, query).await
}

/// Handler for PUT /events
pub async fn save_event_handler(
    State(state): State<AppState>,
    Json(event): Json<Event>,
) -> Result<Json<SaveResponse>> {
    save(&state.events, event).await
}

/// Handler for POST /events/:id/register
pub async fn register_event_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<RegisterRequest>,
) -> Result<Json<Event>> {
    if let Some(error_msg) = req.validate() {
        return Err(DataError::InvalidRequest(error_msg));
    }
    let registration = EventRegistration {
        user_id: req.user_id,
        user_roll_number: req.user_roll_number,
        user_name: req.user_name,
        registered_at: chrono::Utc::now().timestamp_millis(),
        is_approved: false,
        approved_by: None,
        approved_at: None,
    };
    Ok(Json(state.events.register(&id, registration).await?))
}

/// Handler for GET /suggestions
pub async fn list_suggestions_handler(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<Json<Page<Suggestion>>> {
    list_page(state.suggestions, query).await
}

/// Handler for PUT /suggestions
pub async fn save_suggestion_handler(
    State(state): State<AppState>,
    Json(suggestion): Json<Suggestion>,
) -> Result<Json<SaveResponse>> {
    save(&state.suggestions, suggestion).await
}

/// Handler for POST /suggestions/:id/review
pub async fn review_suggestion_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<ReviewRequest>,
) -> Result<Json<Suggestion>> {
    if let Some(error_msg) = req.validate() {
        return Err(DataError::InvalidRequest(error_msg));
    }
    let reviewed = state
        .suggestions
        .review(&id, req.status, req.by, req.response)
        .await?;
    Ok(Json(reviewed))
}

async fn list_page<T: Record>(
    access: Arc<PagedDataAccess<T>>,
    query: PageQuery,
) -> Result<Json<Page<T>>> {
    let page = access.get_page(query.page, query.limit).await?;

    let limit = page.limit;
    let current = page.page;
    tokio::spawn(async move {
        if let Err(e) = access.prefetch(current, limit).await {
            warn!("Prefetch of {} after page {} failed: {}", T::COLLECTION, current, e);
        }
    });

    Ok(Json(page))
}

async fn save<T: Record>(access: &PagedDataAccess<T>, item: T) -> Result<Json<SaveResponse>> {
    if item.id().trim().is_empty() {
        return Err(DataError::InvalidRequest("Record id cannot be empty".to_string()));
    }
    let id = item.id().to_string();
    access.save(item).await?;
    Ok(Json(SaveResponse::new(T::COLLECTION, id)))
}

async fn collection_stats<T: Record>(access: &PagedDataAccess<T>) -> CollectionStats {
    CollectionStats::new(access.cache_stats().await, access.pending_writes())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::MemoryBackend;

    fn test_state() -> AppState {
        let people = (0..30)
            .map(|i| {
                serde_json::to_value(Volunteer::new(
                    format!("v{:02}", i),
                    format!("Volunteer {}", i),
                    format!("21CS{:03}", i),
                    "CSE",
                ))
                .unwrap()
            })
            .collect();
        let backend = Arc::new(MemoryBackend::with_collection("volunteers", people));
        AppState::new(backend, &Config::default())
    }

    #[tokio::test]
    async fn test_list_uses_default_page_size() {
        let state = test_state();

        let page = list_volunteers_handler(State(state), Query(PageQuery::default()))
            .await
            .unwrap();

        assert_eq!(page.items.len(), 20);
        assert_eq!(page.total, 30);
        assert!(page.has_more);
    }

    #[tokio::test]
    async fn test_get_missing_volunteer() {
        let state = test_state();

        let result = get_volunteer_handler(State(state), Path("nobody".to_string())).await;
        assert!(matches!(result, Err(DataError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_save_then_get() {
        let state = test_state();
        let volunteer = Volunteer::new("new", "Meera Das", "22ME004", "MECH");

        save_volunteer_handler(State(state.clone()), Json(volunteer))
            .await
            .unwrap();

        let found = get_volunteer_handler(State(state), Path("new".to_string()))
            .await
            .unwrap();
        assert_eq!(found.full_name, "Meera Das");
    }

    #[tokio::test]
    async fn test_save_rejects_blank_id() {
        let state = test_state();
        let volunteer = Volunteer::new(" ", "No Id", "x", "y");

        let result = save_volunteer_handler(State(state), Json(volunteer)).await;
        assert!(matches!(result, Err(DataError::InvalidRequest(_))));
    }

    #[tokio::test]
    async fn test_approve_requires_actor() {
        let state = test_state();
        let req = ApproveRequest { by: String::new() };

        let result = approve_volunteer_handler(State(state), Path("v01".to_string()), Json(req)).await;
        assert!(matches!(result, Err(DataError::InvalidRequest(_))));
    }

    #[tokio::test]
    async fn test_stats_handler_counts_reads() {
        let state = test_state();
        get_volunteer_handler(State(state.clone()), Path("v01".to_string()))
            .await
            .unwrap();

        let stats = stats_handler(State(state)).await;
        assert_eq!(stats.volunteers.cache.misses, 1);
        assert_eq!(stats.events.cache.size, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_volunteer_search_uses_configured_debounce() {
        let state = test_state();
        let session = state.volunteer_search();

        session.input("volunteer 2");
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(session.state().results.is_empty());

        tokio::time::sleep(Duration::from_millis(300)).await;
        // "Volunteer 2" and "Volunteer 20".."Volunteer 29"
        assert_eq!(session.state().results.len(), 11);
    }

    #[tokio::test]
    async fn test_health_handler() {
        let response = health_handler().await;
        assert_eq!(response.status, "healthy");
    }
}
