//! HTTP API handlers for campus-offering

pub mod error;
pub mod health;
pub mod offered_courses;

pub use error::ApiError;
pub use health::health_routes;
pub use offered_courses::{
    create_offered_course, delete_offered_course, get_all_offered_courses,
    get_single_offered_course, update_offered_course,
};
