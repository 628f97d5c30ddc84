use std::collections::BTreeMap;

use serde::Serialize;
use utoipa::OpenApi;
use utoipa::ToSchema;

#[derive(ToSchema)]
pub struct HealthResponse { pub status: String }

#[derive(ToSchema)]
pub struct FailureDoc { pub success: bool, pub message: String }

#[derive(ToSchema, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentViewDoc {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub grade: String,
    #[serde(rename = "class")]
    pub class_name: String,
    pub total_points: u64,
    pub can_fill_today: bool,
}

#[derive(ToSchema, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentRecordDoc {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub grade: String,
    #[serde(rename = "class")]
    pub class_name: String,
    pub total_points: u64,
    /// RFC 3339 timestamp of the latest accepted submission
    pub last_fill_date: Option<String>,
    pub points_by_category: BTreeMap<String, u64>,
}

#[derive(ToSchema)]
pub struct StudentResponseDoc { pub success: bool, pub student: StudentViewDoc }

#[derive(ToSchema)]
pub struct StudentsResponseDoc { pub success: bool, pub students: Vec<StudentRecordDoc> }

#[derive(ToSchema, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitRequestDoc { pub student_id: String, pub selections: Vec<String> }

#[derive(ToSchema, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitResponseDoc { pub success: bool, pub message: String, pub total_points: u64, pub points_added: u64 }

#[derive(ToSchema, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddStudentRequestDoc {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub grade: String,
    pub class_name: String,
}

#[derive(ToSchema)]
pub struct AddStudentResponseDoc { pub success: bool, pub message: String, pub student: StudentRecordDoc }

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::students::get_student,
        crate::routes::students::submit,
        crate::routes::admin::list_all_students,
        crate::routes::admin::add_student,
    ),
    components(
        schemas(
            HealthResponse,
            FailureDoc,
            StudentViewDoc,
            StudentRecordDoc,
            StudentResponseDoc,
            StudentsResponseDoc,
            SubmitRequestDoc,
            SubmitResponseDoc,
            AddStudentRequestDoc,
            AddStudentResponseDoc,
        )
    ),
    tags(
        (name = "health"),
        (name = "student"),
        (name = "admin")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_lists_every_roster_route() {
        let doc = ApiDoc::openapi();
        let paths: Vec<&String> = doc.paths.paths.keys().collect();
        for p in ["/health", "/api/student/{id}", "/api/submit", "/api/admin/all-students", "/api/admin/add-student"] {
            assert!(paths.iter().any(|k| k.as_str() == p), "missing {p}");
        }
    }
}
