use std::sync::Arc;

use openlaunch_scheduler::Scheduler;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: openlaunch_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Launch scheduler, built over the configured capacity policy.
    pub scheduler: Arc<Scheduler>,
    /// In-process event bus for platform events.
    pub event_bus: Arc<openlaunch_events::EventBus>,
}
