//! Search Session
//!
//! Search-as-you-type over a [`PagedDataAccess`]: keystrokes are debounced,
//! and results of superseded queries never replace fresher state.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio::sync::watch;
use tracing::warn;

use crate::access::{Debouncer, GenerationToken, PagedDataAccess, Record};

/// Number of results a session asks for.
pub const DEFAULT_SEARCH_LIMIT: usize = 50;

/// What a search box should currently show.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchState<T> {
    /// Generation of the input that produced this state
    pub generation: u64,
    pub query: String,
    pub results: Vec<T>,
    pub loading: bool,
    pub error: Option<String>,
}

impl<T> Default for SearchState<T> {
    fn default() -> Self {
        Self {
            generation: 0,
            query: String::new(),
            results: Vec::new(),
            loading: false,
            error: None,
        }
    }
}

/// Debounced search bound to one input box.
pub struct SearchSession<T: Record> {
    access: Arc<PagedDataAccess<T>>,
    debouncer: Debouncer,
    state: Arc<watch::Sender<SearchState<T>>>,
    limit: usize,
}

impl<T: Record> SearchSession<T> {
    pub fn new(access: Arc<PagedDataAccess<T>>, delay: Duration) -> Self {
        let (state, _) = watch::channel(SearchState::default());
        Self {
            access,
            debouncer: Debouncer::new(delay),
            state: Arc::new(state),
            limit: DEFAULT_SEARCH_LIMIT,
        }
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    pub fn subscribe(&self) -> watch::Receiver<SearchState<T>> {
        self.state.subscribe()
    }

    pub fn state(&self) -> SearchState<T> {
        self.state.borrow().clone()
    }

    // == Input ==
    /// Feeds the current contents of the search box.
    ///
    /// Blank input clears the results at once. Anything else runs a search
    /// once the input has been quiet for the debounce delay.
    pub fn input(&self, query: impl Into<String>) -> GenerationToken {
        let query = query.into();

        if query.trim().is_empty() {
            let token = self.debouncer.cancel();
            let generation = token.id();
            publish(&self.state, &token, move |state| {
                *state = SearchState {
                    generation,
                    query,
                    ..SearchState::default()
                };
            });
            return token;
        }

        let access = Arc::clone(&self.access);
        let state = Arc::clone(&self.state);
        let limit = self.limit;

        self.debouncer.schedule(move |token| async move {
            let generation = token.id();
            let started_query = query.clone();
            publish(&state, &token, move |s| {
                s.generation = generation;
                s.query = started_query;
                s.loading = true;
                s.error = None;
            });

            let outcome = access.search(&query, 0, limit).await;
            if let Err(e) = &outcome {
                warn!("Search for {:?} failed: {}", query, e);
            }

            publish(&state, &token, move |s| {
                s.generation = generation;
                s.query = query;
                s.loading = false;
                match outcome {
                    Ok(results) => {
                        s.results = results;
                        s.error = None;
                    }
                    Err(e) => s.error = Some(e.to_string()),
                }
            });
        })
    }

    /// Drops any pending search without touching the shown state.
    pub fn cancel(&self) {
        self.debouncer.cancel();
    }
}

/// Applies `update` only if `token` is still current and not older than
/// what is already published. Returns whether the state changed.
fn publish<T>(
    state: &watch::Sender<SearchState<T>>,
    token: &GenerationToken,
    update: impl FnOnce(&mut SearchState<T>),
) -> bool {
    state.send_if_modified(|current| {
        if !token.is_current() || token.id() < current.generation {
            return false;
        }
        update(current);
        true
    })
}
