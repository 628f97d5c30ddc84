use axum::{
    extract::{rejection::JsonRejection, Request, State},
    middleware::Next,
    response::Response,
    Json,
};
use serde::Serialize;
use service::roster::{NewStudentInput, StudentRecord};
use tracing::warn;

use super::ServerState;
use crate::errors::ApiError;

#[derive(Serialize)]
pub struct StudentsResponse {
    pub success: bool,
    pub students: Vec<StudentRecord>,
}

#[derive(Serialize)]
pub struct AddStudentResponse {
    pub success: bool,
    pub message: String,
    pub student: StudentRecord,
}

/// Full roster, every field, in stored order.
#[utoipa::path(
    get,
    path = "/api/admin/all-students",
    tag = "admin",
    responses(
        (status = 200, description = "All students", body = crate::openapi::StudentsResponseDoc),
        (status = 401, description = "Admin key configured and missing/wrong", body = crate::openapi::FailureDoc),
        (status = 500, description = "Storage failure", body = crate::openapi::FailureDoc)
    )
)]
pub async fn list_all_students(State(state): State<ServerState>) -> Result<Json<StudentsResponse>, ApiError> {
    let students = state.roster.list_students().await?;
    Ok(Json(StudentsResponse { success: true, students }))
}

/// Register a student with zeroed points.
#[utoipa::path(
    post,
    path = "/api/admin/add-student",
    tag = "admin",
    request_body = crate::openapi::AddStudentRequestDoc,
    responses(
        (status = 200, description = "Student created", body = crate::openapi::AddStudentResponseDoc),
        (status = 400, description = "Missing fields or duplicate id", body = crate::openapi::FailureDoc),
        (status = 401, description = "Admin key configured and missing/wrong", body = crate::openapi::FailureDoc),
        (status = 500, description = "Storage failure", body = crate::openapi::FailureDoc)
    )
)]
pub async fn add_student(
    State(state): State<ServerState>,
    payload: Result<Json<NewStudentInput>, JsonRejection>,
) -> Result<Json<AddStudentResponse>, ApiError> {
    let Json(input) = payload?;
    let student = state.roster.add_student(input).await?;
    Ok(Json(AddStudentResponse { success: true, message: "Student added successfully".into(), student }))
}

/// Middleware: when an admin key is configured, require it in `X-API-Key`
/// (or query `api_key`). Without a configured key the routes stay open.
pub async fn require_admin_key(
    State(state): State<ServerState>,
    req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let Some(expected) = state.admin_api_key.as_deref() else {
        return Ok(next.run(req).await);
    };

    let key_from_header = req
        .headers()
        .get("X-API-Key")
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string());

    let key = key_from_header.or_else(|| {
        req.uri().query().and_then(|q| {
            q.split('&').find_map(|pair| {
                let mut it = pair.splitn(2, '=');
                match (it.next(), it.next()) {
                    (Some("api_key"), Some(v)) => Some(v.to_string()),
                    _ => None,
                }
            })
        })
    });

    match key {
        Some(k) if k == expected => Ok(next.run(req).await),
        _ => {
            warn!(path = %req.uri().path(), "admin request without a valid API key");
            Err(ApiError::unauthorized())
        }
    }
}
