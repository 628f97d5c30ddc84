use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post},
    Json, Router,
};
use service::roster::RosterService;
use tower_http::{
    cors::CorsLayer,
    services::{ServeDir, ServeFile},
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;
use utoipa::OpenApi;

use common::types::Health;

use crate::openapi::ApiDoc;

pub mod admin;
pub mod students;

/// Shared handler state.
#[derive(Clone)]
pub struct ServerState {
    pub roster: Arc<RosterService>,
    /// Required `X-API-Key` for admin routes; `None` leaves them open.
    pub admin_api_key: Option<Arc<str>>,
}

impl ServerState {
    pub fn new(roster: Arc<RosterService>, admin_api_key: Option<String>) -> Self {
        Self { roster, admin_api_key: admin_api_key.map(Arc::from) }
    }
}

#[utoipa::path(get, path = "/health", tag = "health", responses((status = 200, description = "OK", body = crate::openapi::HealthResponse)))]
pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

/// Build the full application router: student routes, admin routes, and the
/// static front-end as fallback.
pub fn build_router(state: ServerState, static_dir: &str, cors: CorsLayer) -> Router {
    let index = format!("{}/index.html", static_dir.trim_end_matches('/'));
    let static_files = ServeDir::new(static_dir).fallback(ServeFile::new(index));

    let public = Router::new()
        .route("/health", get(health))
        .route("/api-docs/openapi.json", get(openapi_json));

    let student_routes = Router::new()
        .route("/api/student/:id", get(students::get_student))
        .route("/api/submit", post(students::submit));

    let admin_routes = Router::new()
        .route("/api/admin/all-students", get(admin::list_all_students))
        .route("/api/admin/add-student", post(admin::add_student))
        .route_layer(middleware::from_fn_with_state(state.clone(), admin::require_admin_key));

    public
        .merge(student_routes)
        .merge(admin_routes)
        .with_state(state)
        .fallback_service(static_files)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
