//! REST API endpoints for attack-surface assessments

use std::collections::BTreeMap;

use actix_web::{HttpResponse, get, post, web};
use serde::Deserialize;
use serde_json::Value;
use utoipa::ToSchema;

use crate::api::error::ApiError;
use crate::app::AppState;
use crate::model::{AssessmentField, AssessmentInput, RawValue};
use crate::service::{AssessmentSession, build_view, normalize};

/// Starting point for a submitted form
#[derive(Debug, Clone, Copy, Default, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum FormBaseline {
    /// Demo SaaS defaults
    #[default]
    Demo,
    /// Every numeric field blank, every flag off
    Empty,
}

/// Form edits to apply on top of a baseline before submitting
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct AssessmentForm {
    #[serde(default)]
    pub baseline: FormBaseline,
    /// Field name to raw control value. Numbers and strings are treated as
    /// text box contents, booleans as checkbox state.
    #[serde(default)]
    #[schema(value_type = Object)]
    pub fields: BTreeMap<String, Value>,
}

impl AssessmentForm {
    fn into_session(self) -> Result<AssessmentSession, ApiError> {
        let mut session = match self.baseline {
            FormBaseline::Demo => AssessmentSession::new(),
            FormBaseline::Empty => AssessmentSession::with_input(AssessmentInput::empty()),
        };

        for (name, value) in &self.fields {
            let field: AssessmentField = name.parse()?;
            session.edit(field, raw_value(field, value)?)?;
        }

        Ok(session)
    }
}

fn raw_value(field: AssessmentField, value: &Value) -> Result<RawValue, ApiError> {
    match value {
        Value::String(s) => Ok(RawValue::Text(s.clone())),
        Value::Number(n) => Ok(RawValue::Text(n.to_string())),
        Value::Bool(b) => Ok(RawValue::Flag(*b)),
        Value::Null if field.is_flag() => Ok(RawValue::Flag(false)),
        Value::Null => Ok(RawValue::Text(String::new())),
        Value::Array(_) | Value::Object(_) => Err(ApiError::BadRequest(format!(
            "field '{}' must be a string, number or boolean",
            field
        ))),
    }
}

/// Normalized demo baseline used to seed a fresh form
#[utoipa::path(
    get,
    path = "/v1/assessments/defaults",
    responses(
        (status = 200, description = "Demo baseline", body = crate::model::NormalizedRequest)
    ),
    tag = "assessments"
)]
#[get("/v1/assessments/defaults")]
pub async fn get_defaults() -> HttpResponse {
    HttpResponse::Ok().json(normalize(&AssessmentInput::default()))
}

/// Normalize a form, run it through the scoring service and return the
/// results panel view
#[utoipa::path(
    post,
    path = "/v1/assessments",
    request_body = AssessmentForm,
    responses(
        (status = 200, description = "Assessment completed", body = crate::model::AssessmentView),
        (status = 400, description = "Unknown field or wrong value type", body = crate::api::error::ErrorResponse),
        (status = 422, description = "Scoring service rejected the input", body = crate::api::error::ErrorResponse),
        (status = 502, description = "Scoring service failed or answered with a malformed assessment", body = crate::api::error::ErrorResponse),
        (status = 504, description = "Scoring service timed out", body = crate::api::error::ErrorResponse)
    ),
    tag = "assessments"
)]
#[post("/v1/assessments")]
pub async fn run_assessment(
    state: web::Data<AppState>,
    form: web::Json<AssessmentForm>,
) -> Result<HttpResponse, ApiError> {
    let mut session = form.into_inner().into_session()?;
    let result = session.submit(state.backend.as_ref()).await?;

    tracing::info!(
        score = result.x_score,
        drivers = result.drivers.len(),
        "Assessment completed"
    );

    Ok(HttpResponse::Ok().json(build_view(result)))
}

/// Recent assessments stored by the scoring service
#[utoipa::path(
    get,
    path = "/v1/assessments",
    responses(
        (status = 200, description = "Recent assessments", body = Vec<crate::model::AssessmentSummary>),
        (status = 502, description = "Scoring service unavailable", body = crate::api::error::ErrorResponse)
    ),
    tag = "assessments"
)]
#[get("/v1/assessments")]
pub async fn list_assessments(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let summaries = state.backend.list_recent().await?;
    Ok(HttpResponse::Ok().json(summaries))
}

/// Configure assessment routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(get_defaults)
        .service(run_assessment)
        .service(list_assessments);
}
