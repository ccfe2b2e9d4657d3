use axum::{
    routing::{delete, get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::handlers;
use tally_core::TallyContext;

/// Create the main application router with all API endpoints
pub fn create_router(ctx: Arc<TallyContext>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Transaction store
        .route(
            "/api/bank-statements",
            get(handlers::get_bank_statements).post(handlers::save_bank_statements),
        )
        .route("/api/transactions", get(handlers::get_transactions))
        // Templates
        .route("/api/templates", get(handlers::get_templates).post(handlers::create_template))
        .route(
            "/api/templates/:id",
            get(handlers::get_template)
                .put(handlers::update_template)
                .delete(handlers::delete_template),
        )
        // Fields
        .route("/api/fields", get(handlers::get_fields).post(handlers::add_field))
        .route("/api/fields/:id", delete(handlers::remove_field))
        // Import
        .route("/api/import/preview", post(handlers::preview_import))
        .route("/api/import", post(handlers::run_import))
        // Charts
        .route("/api/charts/:kind", get(handlers::get_chart))
        .with_state(ctx)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
