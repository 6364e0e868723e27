//! rsvp-api library interface
//!
//! Router, handlers and background notification queue of the RSVP service.
//! Exposed as a library so integration tests can drive the router directly.

pub mod api;
pub mod error;
pub mod notify;

pub use crate::error::{ApiError, ApiResult};

use std::sync::Arc;

use axum::Router;
use rsvp_common::email::Mailer;
use rsvp_common::store::Store;
use rsvp_common::{Config, GuestDirectory};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::notify::{NotificationQueue, NotifySettings};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub store: Arc<dyn Store>,
    /// Guest list cache, shared with nothing else in the process
    pub directory: Arc<GuestDirectory>,
    pub mailer: Arc<dyn Mailer>,
    /// Fire-and-forget admin notifications
    pub notifications: NotificationQueue,
}

impl AppState {
    /// Wire up state and start the notification worker
    ///
    /// Must be called from within a tokio runtime.
    pub fn new(config: Config, store: Arc<dyn Store>, mailer: Arc<dyn Mailer>) -> Self {
        let directory = Arc::new(GuestDirectory::new(Arc::clone(&store)));
        let notifications =
            NotificationQueue::start(Arc::clone(&mailer), NotifySettings::from_config(&config));

        Self {
            config: Arc::new(config),
            store,
            directory,
            mailer,
            notifications,
        }
    }
}

/// Build application router
///
/// All routes live under `/api` and accept cross-origin requests.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(api::name_routes())
        .merge(api::rsvp_routes())
        .merge(api::avatar_routes())
        .merge(api::verify_routes())
        .merge(api::health_routes())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}
