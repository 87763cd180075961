//! Libris API - the HTTP surface
//!
//! One axum fallback route feeds every request to the action selector;
//! the selected action runs the matching engine command.

pub mod config;
pub mod dispatch;
pub mod error;
pub mod routes;
pub mod seed;

use std::sync::Arc;

use axum::Router;
use libris_core::{ActionSelector, InMemoryStore, Result, SelectorOptions};

use crate::routes::{registrations, Action};

/// Shared, read-only request state
#[derive(Debug, Clone)]
pub struct AppState {
    pub selector: Arc<ActionSelector<Action>>,
    pub store: InMemoryStore,
}

impl AppState {
    /// Build the selector over the library table
    ///
    /// # Errors
    ///
    /// Any registration error; the table is validated here, before serving.
    pub fn new(options: SelectorOptions, store: InMemoryStore) -> Result<Self> {
        let table = registrations(options.default_version);
        let selector = ActionSelector::new(options, table)?;
        Ok(Self {
            selector: Arc::new(selector),
            store,
        })
    }
}

/// The application router
pub fn build_router(state: AppState) -> Router {
    Router::new().fallback(dispatch::dispatch).with_state(state)
}
