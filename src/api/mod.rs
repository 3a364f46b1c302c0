//! HTTP API server

use axum::{
    http::{header, HeaderName},
    routing::{get, MethodRouter},
    Router,
};
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::storage::RunStore;

pub mod error;
pub mod handlers;
pub mod state;

pub use error::{ApiError, ErrorBody};
pub use state::AppState;

/// Build the API router using the provided application state
///
/// Every path also answers with a single trailing slash. Unknown paths and
/// unsupported methods get the JSON 404 body instead of an empty response.
pub fn create_router(state: AppState) -> Router {
    let routes: Vec<(&str, MethodRouter<AppState>)> = vec![
        ("/", get(handlers::welcome)),
        ("/good", get(handlers::good)),
        ("/bad", get(handlers::bad)),
        ("/test", get(handlers::test_dump)),
        (
            "/runs",
            get(handlers::list_runs).post(handlers::create_run),
        ),
        ("/runs/filter", get(handlers::filter_runs)),
        (
            "/runs/:id",
            get(handlers::get_run)
                .put(handlers::update_run)
                .delete(handlers::delete_run),
        ),
        ("/runs/date/:date", get(handlers::runs_by_date)),
        (
            "/runs/distance/greater/:distance",
            get(handlers::runs_distance_greater),
        ),
        (
            "/runs/distance/lesser/:distance",
            get(handlers::runs_distance_lesser),
        ),
        ("/runs/pace/faster/:pace", get(handlers::runs_pace_faster)),
        ("/runs/pace/slower/:pace", get(handlers::runs_pace_slower)),
        ("/runs/notes/:keyword", get(handlers::runs_by_notes)),
    ];

    routes
        .into_iter()
        .fold(Router::<AppState>::new(), |router, (path, methods)| {
            let methods = methods.fallback(handlers::not_found);
            let router = match path {
                "/" => router,
                _ => router.route(&format!("{}/", path), methods.clone()),
            };
            router.route(path, methods)
        })
        .fallback(handlers::not_found)
        .layer(cors_layer())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Convenience helper wrapping a store in fresh state
pub fn create_store_router(store: Arc<dyn RunStore>) -> Router {
    create_router(AppState::new(store))
}

/// Any origin; the request headers browsers send with JSON bodies
fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers([
            header::ORIGIN,
            HeaderName::from_static("x-requested-with"),
            header::CONTENT_TYPE,
            header::ACCEPT,
        ])
}
