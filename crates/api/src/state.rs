use std::sync::Arc;

use crate::config::ServerConfig;
use crate::mailer::Mailer;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: critica_db::DbPool,
    /// Server configuration (JWT secret, confirmation-code lifetime, etc).
    pub config: Arc<ServerConfig>,
    /// Notification collaborator delivering confirmation codes.
    pub mailer: Arc<Mailer>,
}
