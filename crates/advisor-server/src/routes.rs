//! Router

use axum::{
    routing::{delete, get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::handlers::{
    ask_question, delete_session, generate_report, growth_estimates, health_check, plan_investment,
    portfolio, submit_feedback,
};
use crate::state::AppState;

pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Health & info
        .route("/health", get(health_check))
        // Planning
        .route("/api/portfolio", post(portfolio))
        .route("/api/plan", post(plan_investment))
        .route("/api/growth", get(growth_estimates))
        .route("/api/report", post(generate_report))
        // Session
        .route("/api/ask", post(ask_question))
        .route("/api/feedback", post(submit_feedback))
        .route("/api/session/{id}", delete(delete_session))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
