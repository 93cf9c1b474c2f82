//! Offered course endpoints
//!
//! Thin adapters from HTTP to `OfferedCourseService`.

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    Json,
};
use serde::Serialize;

use campus_common::db::OfferedCourse;
use campus_common::uuid_utils;

use super::error::ApiError;
use crate::pagination::PageMeta;
use crate::payload::{CreateOfferedCourse, UpdateOfferedCourse};
use crate::query::OfferedCourseQuery;
use crate::AppState;

/// Success envelope
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<PageMeta>,
    pub data: T,
}

impl<T> ApiResponse<T> {
    fn ok(message: &str, data: T) -> Json<Self> {
        Json(Self {
            success: true,
            message: message.to_string(),
            meta: None,
            data,
        })
    }
}

/// POST /offered-courses/create-offered-course
pub async fn create_offered_course(
    State(state): State<AppState>,
    payload: Result<Json<CreateOfferedCourse>, JsonRejection>,
) -> Result<Json<ApiResponse<OfferedCourse>>, ApiError> {
    let Json(payload) = payload?;
    let created = state.service.create_offered_course(payload).await?;
    Ok(ApiResponse::ok("Offered course is created successfully !", created))
}

/// GET /offered-courses
pub async fn get_all_offered_courses(
    State(state): State<AppState>,
    query: Result<Query<OfferedCourseQuery>, QueryRejection>,
) -> Result<Json<ApiResponse<Vec<OfferedCourse>>>, ApiError> {
    let Query(query) = query?;
    let page = state.service.get_all_offered_courses(&query).await?;

    Ok(Json(ApiResponse {
        success: true,
        message: "Offered courses retrieved successfully !".to_string(),
        meta: Some(page.meta),
        data: page.data,
    }))
}

/// GET /offered-courses/:id
pub async fn get_single_offered_course(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<OfferedCourse>>, ApiError> {
    let id = uuid_utils::parse(&id)?;
    let course = state.service.get_single_offered_course(id).await?;
    Ok(ApiResponse::ok("Offered course retrieved successfully !", course))
}

/// PATCH /offered-courses/:id
pub async fn update_offered_course(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateOfferedCourse>, JsonRejection>,
) -> Result<Json<ApiResponse<OfferedCourse>>, ApiError> {
    let id = uuid_utils::parse(&id)?;
    let Json(patch) = payload?;
    let updated = state.service.update_offered_course(id, patch).await?;
    Ok(ApiResponse::ok("Offered course is updated successfully !", updated))
}

/// DELETE /offered-courses/:id
pub async fn delete_offered_course(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    let id = uuid_utils::parse(&id)?;
    state.service.delete_offered_course(id).await?;
    Ok(ApiResponse::ok("Offered course is deleted successfully !", ()))
}
