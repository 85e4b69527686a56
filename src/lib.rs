pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod tasks;

use actix_web::HttpResponse;
use std::sync::Arc;
use std::time::Duration;

pub use config::Settings;
pub use error::AppError;
pub type Result<T> = std::result::Result<T, AppError>;

pub use auth::{AuthService, AuthenticatedUser, AuthenticationGate, TokenService};
pub use db::{DbOperations, Task, User};
pub use tasks::TaskService;

/// Health check endpoint handler
/// Returns a JSON response with server status and timestamp
pub async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

/// Application state shared across all components
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Settings>,
    pub db: DbOperations,
    pub auth: AuthService,
    pub tasks: TaskService,
}

impl AppState {
    pub async fn new(config: Settings) -> Result<Self> {
        let db = DbOperations::new_with_options(
            &config.database.url,
            config.database.max_connections,
            Duration::from_secs(5),
        )
        .await?;

        Ok(Self::with_db(config, db))
    }

    /// Assemble the component graph over an existing data layer. Used by
    /// tests that bring their own pool.
    pub fn with_db(config: Settings, db: DbOperations) -> Self {
        let tokens = TokenService::new(&config.auth.jwt_secret, config.auth.token_ttl_secs);
        let auth = AuthService::new(db.clone(), tokens);
        let tasks = TaskService::new(db.clone(), config.sync.todo_api_url.clone());

        Self {
            config: Arc::new(config),
            db,
            auth,
            tasks,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_app_state_clone_shares_config() {
        let config = Settings::new_for_test().expect("Failed to load test config");
        let db = DbOperations::new_lazy(&config.database.url, config.database.max_connections)
            .expect("Failed to build lazy pool");

        let state = AppState::with_db(config, db);
        let cloned = state.clone();

        assert!(Arc::ptr_eq(&state.config, &cloned.config));
    }
}
