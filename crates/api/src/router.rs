//! Route table and middleware stack.

use std::time::Duration;

use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderValue, Method};
use axum::routing::{get, post, put};
use axum::Router;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use crate::config::ServerConfig;
use crate::handlers::{health, lifecycle, publishing, reviews, solutions, versions};
use crate::state::AppState;

/// Build the full application router with middleware layers applied.
pub fn build_router(state: AppState) -> Router {
    let api = Router::new()
        // Solutions
        .route(
            "/solutions",
            post(solutions::create_solution).get(solutions::list_solutions),
        )
        .route(
            "/solutions/{id}",
            get(solutions::get_solution).patch(solutions::update_solution),
        )
        .route("/solutions/{id}/fork", post(solutions::fork_solution))
        .route("/solutions/{id}/lineage", get(solutions::get_lineage))
        // Lifecycle transitions
        .route("/solutions/{id}/submit", post(lifecycle::submit_for_review))
        .route("/solutions/{id}/review", post(lifecycle::review))
        .route("/solutions/{id}/ready", post(lifecycle::mark_ready_to_publish))
        .route("/solutions/{id}/publish", post(lifecycle::publish))
        .route("/solutions/{id}/suspend", post(lifecycle::suspend))
        .route("/solutions/{id}/restore", post(lifecycle::restore))
        .route("/solutions/{id}/archive", post(lifecycle::archive))
        .route("/solutions/batch", post(lifecycle::batch_transition))
        // Versions
        .route(
            "/solutions/{id}/versions",
            post(versions::create_version).get(versions::get_version_history),
        )
        .route(
            "/solutions/{id}/versions/compare",
            get(versions::compare_versions),
        )
        .route(
            "/solutions/{id}/versions/{version}/rollback",
            post(versions::rollback_to_version),
        )
        // Review ledger
        .route("/solutions/{id}/reviews", get(reviews::get_review_history))
        .route("/reviews/queue", get(reviews::get_review_queue))
        .route("/reviews/statistics", get(reviews::get_review_statistics))
        // Publishing overlay
        .route(
            "/solutions/{id}/publishing",
            put(publishing::upsert_publishing).get(publishing::get_publishing),
        );

    let cors = build_cors_layer(&state.config);

    Router::new()
        .route("/health", get(health::health))
        .nest("/api/v1", api)
        .layer(CatchPanicLayer::new())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TimeoutLayer::new(Duration::from_secs(
            state.config.request_timeout_secs,
        )))
        .layer(cors)
        .with_state(state)
}

fn build_cors_layer(config: &ServerConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .cors_origins
        .iter()
        .filter_map(|o| o.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
        ])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE])
}
