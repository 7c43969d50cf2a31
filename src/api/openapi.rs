//! OpenAPI specification endpoints

use actix_web::{HttpResponse, get};
use utoipa::OpenApi;

use crate::api::error::ApiError;
use crate::api::{assessment, health};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Attack Surface Gateway",
        description = "Collects attack-surface form input, forwards it to the scoring service and shapes the answer for display"
    ),
    paths(
        assessment::get_defaults,
        assessment::run_assessment,
        assessment::list_assessments,
        health::liveness,
        health::readiness,
    ),
    components(schemas(
        assessment::AssessmentForm,
        assessment::FormBaseline,
        crate::api::error::ErrorResponse,
        crate::model::NormalizedRequest,
        crate::model::AssessmentResult,
        crate::model::AssessmentSummary,
        crate::model::AssessmentView,
        health::HealthStatus,
        health::ReadinessStatus,
        health::DependencyHealth,
    )),
    tags(
        (name = "assessments", description = "Attack-surface risk assessments"),
        (name = "health", description = "Liveness and readiness probes")
    )
)]
pub struct ApiDoc;

/// Serve OpenAPI JSON specification
#[get("/openapi.json")]
pub async fn openapi_json() -> HttpResponse {
    HttpResponse::Ok().json(ApiDoc::openapi())
}

/// Serve OpenAPI YAML specification
#[get("/openapi.yaml")]
pub async fn openapi_yaml() -> Result<HttpResponse, ApiError> {
    let yaml = ApiDoc::openapi()
        .to_yaml()
        .map_err(|e| ApiError::Internal(e.to_string()))?;

    Ok(HttpResponse::Ok().content_type("text/yaml").body(yaml))
}

/// Configure OpenAPI routes
pub fn configure(cfg: &mut actix_web::web::ServiceConfig) {
    cfg.service(openapi_json).service(openapi_yaml);
}
