//! REST API over a shared store.

pub mod dto;
pub mod error;
mod handlers;

use std::sync::Arc;

use anyhow::Context;
use axum::routing::{get, patch, post};
use axum::Router;
use parking_lot::Mutex;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::store::Store;

/// Shared state for axum handlers. Store work is serialized by the mutex and
/// the guard is never held across an `.await`.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<Mutex<Box<dyn Store>>>,
}

impl AppState {
    pub fn new(store: Box<dyn Store>) -> Self {
        Self {
            store: Arc::new(Mutex::new(store)),
        }
    }
}

fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(handlers::register))
        .route("/auth/login", post(handlers::login))
        .route("/auth/user", get(handlers::current_user))
        .route(
            "/transactions",
            get(handlers::list_transactions).post(handlers::create_transaction),
        )
        .route("/budgets", get(handlers::list_budgets).post(handlers::create_budget))
        .route("/budgets/{id}/spent", patch(handlers::update_budget_spent))
        .route("/goals", get(handlers::list_goals).post(handlers::create_goal))
        .route("/goals/{id}", axum::routing::delete(handlers::delete_goal))
        .route("/goals/{id}/progress", patch(handlers::update_goal_progress))
        .route("/goals/{id}/complete", patch(handlers::set_goal_completed))
        .route("/finance/data", get(handlers::finance_data))
        .route("/summary", get(handlers::summary))
        .route("/reports", get(handlers::report))
        .route("/insights", get(handlers::insights))
        .route("/alerts", get(handlers::list_alerts).delete(handlers::clear_alerts))
        .route("/alerts/check", post(handlers::check_alerts))
        .route("/alerts/read-all", post(handlers::mark_all_alerts_read))
        .route("/alerts/{id}/read", patch(handlers::mark_alert_read))
}

/// Build the axum router (separated for testing).
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .nest("/api", api_routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind `addr` and serve until Ctrl-C.
pub async fn serve(store: Box<dyn Store>, addr: &str) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!(addr = %listener.local_addr()?, "fintrack API listening");
    axum::serve(listener, router(AppState::new(store)))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;
    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for ctrl-c");
    }
    info!("shutdown requested");
}
