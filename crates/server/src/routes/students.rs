use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};
use serde::Serialize;
use service::roster::{StudentView, SubmitInput};

use super::ServerState;
use crate::errors::ApiError;

#[derive(Serialize)]
pub struct StudentResponse {
    pub success: bool,
    pub student: StudentView,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitResponse {
    pub success: bool,
    pub message: String,
    pub total_points: u64,
    pub points_added: u64,
}

/// Fetch one student with the derived `canFillToday` flag.
#[utoipa::path(
    get,
    path = "/api/student/{id}",
    tag = "student",
    params(("id" = String, Path, description = "Student id, matched exactly")),
    responses(
        (status = 200, description = "Student found", body = crate::openapi::StudentResponseDoc),
        (status = 404, description = "Student not found", body = crate::openapi::FailureDoc),
        (status = 500, description = "Storage failure", body = crate::openapi::FailureDoc)
    )
)]
pub async fn get_student(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<Json<StudentResponse>, ApiError> {
    let student = state.roster.get_student(&id).await?;
    Ok(Json(StudentResponse { success: true, student }))
}

/// Record today's selections; at most once per local calendar day.
#[utoipa::path(
    post,
    path = "/api/submit",
    tag = "student",
    request_body = crate::openapi::SubmitRequestDoc,
    responses(
        (status = 200, description = "Points added", body = crate::openapi::SubmitResponseDoc),
        (status = 400, description = "Invalid body or already filled today", body = crate::openapi::FailureDoc),
        (status = 404, description = "Student not found", body = crate::openapi::FailureDoc),
        (status = 500, description = "Storage failure", body = crate::openapi::FailureDoc)
    )
)]
pub async fn submit(
    State(state): State<ServerState>,
    payload: Result<Json<SubmitInput>, JsonRejection>,
) -> Result<Json<SubmitResponse>, ApiError> {
    let Json(input) = payload?;
    let outcome = state.roster.submit(input).await?;
    Ok(Json(SubmitResponse {
        success: true,
        message: "Points added successfully".into(),
        total_points: outcome.total_points,
        points_added: outcome.points_added,
    }))
}
