//! JobTrack Backend
//!
//! REST backend for a job-application tracker: auth, application/interview
//! CRUD, profile, and dashboard aggregation over SQLite persistence.

mod api;
mod auth;
mod config;
mod dashboard;
mod db;
mod errors;
mod models;

use std::sync::Arc;
use std::time::Duration;

use axum::{
    middleware,
    routing::{delete, get, post, put},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use config::Config;
use db::Repository;

/// How often expired sessions are swept out.
const SESSION_PURGE_INTERVAL: Duration = Duration::from_secs(15 * 60);

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub repo: Arc<Repository>,
    pub config: Arc<Config>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::from_env();

    // Initialize logging
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting JobTrack Backend");
    tracing::info!("Database path: {:?}", config.db_path);
    tracing::info!("Bind address: {}", config.bind_addr);

    // Initialize database
    let pool = db::init_database(&config.db_path).await?;
    let repo = Arc::new(Repository::new(pool));

    // Create application state
    let state = AppState {
        repo: Arc::clone(&repo),
        config: Arc::new(config.clone()),
    };

    // Recurring session cleanup, cancelled on shutdown
    let purge_task = tokio::spawn(purge_sessions_loop(repo));

    // Build router
    let app = create_router(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("Server listening on {}", config.bind_addr);

    axum::serve(listener, app).await?;

    purge_task.abort();

    Ok(())
}

/// Periodically remove expired sessions from the database.
async fn purge_sessions_loop(repo: Arc<Repository>) {
    let mut interval = tokio::time::interval(SESSION_PURGE_INTERVAL);
    loop {
        interval.tick().await;
        match repo.purge_expired_sessions().await {
            Ok(0) => {}
            Ok(n) => tracing::debug!("Purged {} expired sessions", n),
            Err(e) => tracing::warn!("Session purge failed: {}", e),
        }
    }
}

/// Create the application router with all routes.
pub fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Clone the repository for the auth layer
    let auth_repo = Arc::clone(&state.repo);

    // Routes that require a live session
    let protected_routes = Router::new()
        // Applications
        .route("/applications", get(api::list_applications))
        .route("/applications", post(api::create_application))
        .route("/applications/{id}", get(api::get_application))
        .route("/applications/{id}", put(api::update_application))
        .route("/applications/{id}", delete(api::delete_application))
        // Interviews
        .route("/interviews", get(api::list_interviews))
        .route("/interviews", post(api::create_interview))
        .route("/interviews/{id}", get(api::get_interview))
        .route("/interviews/{id}", put(api::update_interview))
        .route("/interviews/{id}", delete(api::delete_interview))
        // Dashboard
        .route("/dashboard/stats", get(api::dashboard_stats))
        .route("/dashboard/activity", get(api::dashboard_activity))
        .route("/dashboard/timeline", get(api::dashboard_timeline))
        // Profile
        .route("/profile/me", get(api::get_profile))
        .route("/profile/applications", get(api::get_profile_applications))
        .route("/profile/personal", put(api::update_personal))
        .route("/profile/professional", put(api::update_professional))
        .route("/profile/skills", post(api::add_skill))
        .route("/profile/skills/{skill}", delete(api::remove_skill))
        // Logout needs the session it is ending
        .route("/auth/logout", post(api::logout))
        .layer(middleware::from_fn(move |req, next| {
            auth::session_auth_layer(Arc::clone(&auth_repo), req, next)
        }));

    // Auth entry points (no session required)
    let auth_routes = Router::new()
        .route("/auth/register", post(api::register))
        .route("/auth/login", post(api::login))
        .route("/auth/verify", get(api::verify))
        .route("/auth/forgot-password", post(api::forgot_password))
        .route("/auth/reset-password/{token}", put(api::reset_password));

    // Health check (no auth required)
    let health_routes = Router::new().route("/health", get(health_check));

    Router::new()
        .nest("/api", protected_routes.merge(auth_routes))
        .merge(health_routes)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "OK"
}

#[cfg(test)]
mod tests;
