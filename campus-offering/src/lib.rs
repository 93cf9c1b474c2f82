//! campus-offering library - course offering validation and persistence
//!
//! Registers course sections against a semester registration, department,
//! academic faculty and instructor, and rejects instructor double-booking.

use axum::Router;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer};

pub mod api;
pub mod locks;
pub mod pagination;
pub mod payload;
pub mod query;
pub mod repository;
pub mod schedule;
pub mod service;
pub mod validators;

pub use service::OfferedCourseService;

/// Default per-request deadline
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<OfferedCourseService>,
}

impl AppState {
    pub fn new(service: OfferedCourseService) -> Self {
        Self {
            service: Arc::new(service),
        }
    }
}

/// Build application router
pub fn build_router(state: AppState, request_timeout: Duration) -> Router {
    use axum::routing::{get, post};

    let offered_courses = Router::new()
        .route(
            "/offered-courses/create-offered-course",
            post(api::create_offered_course),
        )
        .route("/offered-courses", get(api::get_all_offered_courses))
        .route(
            "/offered-courses/:id",
            get(api::get_single_offered_course)
                .patch(api::update_offered_course)
                .delete(api::delete_offered_course),
        );

    Router::new()
        .merge(offered_courses)
        .merge(api::health_routes())
        .layer(TimeoutLayer::new(request_timeout))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
