//! Scoring service client
//!
//! One POST per submission, no retries and no caching. Timeouts come from the
//! configured bound; cancellation from a caller supplied future.

use std::future::Future;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use url::Url;

use crate::model::{
    AssessmentResult, AssessmentSummary, NormalizedRequest, ScoringConfig, ServiceHealth,
};
use crate::service::error::AssessmentError;
use crate::service::validation::validate_result;

const ASSESSMENTS_PATH: &str = "assessments";
const HEALTH_PATH: &str = "health";

/// Operations the HTTP surface needs from a scoring service
#[async_trait]
pub trait ScoringBackend: Send + Sync {
    /// Submit one normalized request and wait for the assessment
    async fn submit(&self, request: &NormalizedRequest) -> Result<AssessmentResult, AssessmentError>;

    /// Most recent assessments stored by the service
    async fn list_recent(&self) -> Result<Vec<AssessmentSummary>, AssessmentError>;

    async fn health(&self) -> Result<ServiceHealth, AssessmentError>;
}

/// HTTP client for the attack surface scoring service
pub struct ScoringClient {
    client: Client,
    base_url: String,
    timeout: Duration,
}

impl ScoringClient {
    /// Create a client for `base_url` with a per-exchange `timeout`
    pub fn new(base_url: &Url, timeout: Duration) -> Result<Self, AssessmentError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url: base_url.as_str().trim_end_matches('/').to_string(),
            timeout,
        })
    }

    pub fn from_config(config: &ScoringConfig) -> Result<Self, AssessmentError> {
        Self::new(&config.base_url, config.timeout())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    /// Submit, giving up with [`AssessmentError::Cancelled`] if `cancel`
    /// completes first
    ///
    /// The in-flight exchange is dropped on cancellation.
    pub async fn submit_with_cancel<F>(
        &self,
        request: &NormalizedRequest,
        cancel: F,
    ) -> Result<AssessmentResult, AssessmentError>
    where
        F: Future<Output = ()> + Send,
    {
        tokio::select! {
            biased;
            _ = cancel => {
                tracing::info!(name = %request.name, "Assessment request cancelled by caller");
                Err(AssessmentError::Cancelled)
            }
            result = self.post_assessment(request) => result,
        }
    }

    async fn post_assessment(
        &self,
        request: &NormalizedRequest,
    ) -> Result<AssessmentResult, AssessmentError> {
        let url = self.endpoint(ASSESSMENTS_PATH);
        let start_time = Instant::now();

        tracing::debug!(url = %url, name = %request.name, "Submitting assessment to scoring service");

        let response = self
            .client
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(|e| self.transport_error(e, &url))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| self.transport_error(e, &url))?;

        if !status.is_success() {
            let message = error_message(status, &body);
            tracing::warn!(
                url = %url,
                status = status.as_u16(),
                message = %message,
                "Scoring service rejected assessment"
            );
            return Err(AssessmentError::Service {
                status: status.as_u16(),
                message,
            });
        }

        let result: AssessmentResult = serde_json::from_str(&body).map_err(|e| {
            tracing::error!(url = %url, error = %e, "Undecodable assessment body");
            AssessmentError::ContractViolation(format!("Failed to decode assessment: {}", e))
        })?;

        let validation = validate_result(&result);
        for warning in &validation.warnings {
            tracing::warn!(url = %url, warning = %warning, "Assessment contract warning");
        }
        if !validation.is_valid {
            tracing::error!(url = %url, errors = ?validation.errors, "Assessment failed contract validation");
            return Err(AssessmentError::ContractViolation(validation.errors.join("; ")));
        }

        tracing::info!(
            url = %url,
            elapsed_ms = start_time.elapsed().as_millis(),
            x_score = result.x_score,
            samples = result.x_values.len(),
            drivers = result.drivers.len(),
            "Assessment received"
        );

        Ok(result)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, AssessmentError> {
        let url = self.endpoint(path);

        tracing::debug!(url = %url, "Querying scoring service");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| self.transport_error(e, &url))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| self.transport_error(e, &url))?;

        if !status.is_success() {
            return Err(AssessmentError::Service {
                status: status.as_u16(),
                message: error_message(status, &body),
            });
        }

        serde_json::from_str(&body).map_err(|e| {
            AssessmentError::ContractViolation(format!("Failed to decode {} response: {}", path, e))
        })
    }

    fn transport_error(&self, err: reqwest::Error, url: &str) -> AssessmentError {
        if err.is_timeout() {
            tracing::error!(url = %url, timeout_ms = self.timeout.as_millis(), "Scoring service timed out");
            AssessmentError::Timeout(self.timeout)
        } else {
            tracing::error!(url = %url, error = %err, "Scoring service request failed");
            AssessmentError::from(err)
        }
    }
}

#[async_trait]
impl ScoringBackend for ScoringClient {
    async fn submit(&self, request: &NormalizedRequest) -> Result<AssessmentResult, AssessmentError> {
        self.post_assessment(request).await
    }

    async fn list_recent(&self) -> Result<Vec<AssessmentSummary>, AssessmentError> {
        self.get_json(ASSESSMENTS_PATH).await
    }

    async fn health(&self) -> Result<ServiceHealth, AssessmentError> {
        self.get_json(HEALTH_PATH).await
    }
}

/// Best human readable message for a failed exchange
///
/// A JSON body carrying a non-empty `detail` yields that detail (strings
/// verbatim, anything else as compact JSON). Any other JSON body is returned
/// whole. Bodies that are not JSON fall back to the status code.
pub fn error_message(status: StatusCode, body: &str) -> String {
    let fallback = || format!("request failed with status code {}", status.as_u16());

    let data: serde_json::Value = match serde_json::from_str(body) {
        Ok(value) => value,
        Err(_) => return fallback(),
    };

    match data.get("detail") {
        None | Some(serde_json::Value::Null) => data.to_string(),
        Some(serde_json::Value::String(detail)) if detail.is_empty() => data.to_string(),
        Some(serde_json::Value::String(detail)) => detail.clone(),
        Some(detail) => detail.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::AssessmentInput;
    use crate::service::normalize::normalize;
    use axum::http::StatusCode as AxumStatus;
    use axum::routing::{get, post};
    use axum::{Json, Router};
    use serde_json::json;

    async fn spawn_scoring_service(router: Router) -> Url {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        Url::parse(&format!("http://{}", addr)).unwrap()
    }

    fn client(url: &Url) -> ScoringClient {
        ScoringClient::new(url, Duration::from_secs(5)).unwrap()
    }

    fn result_body() -> serde_json::Value {
        serde_json::to_value(AssessmentResult::sample()).unwrap()
    }

    #[test]
    fn test_error_message_uses_structured_detail() {
        let message = error_message(
            StatusCode::UNPROCESSABLE_ENTITY,
            r#"{"detail": [{"msg": "invalid"}]}"#,
        );
        assert_eq!(message, r#"[{"msg":"invalid"}]"#);
    }

    #[test]
    fn test_error_message_uses_string_detail_verbatim() {
        let message = error_message(
            StatusCode::NOT_FOUND,
            r#"{"detail": "Risk model with ID 4 not found"}"#,
        );
        assert_eq!(message, "Risk model with ID 4 not found");
    }

    #[test]
    fn test_error_message_without_detail_returns_body() {
        let message = error_message(StatusCode::BAD_REQUEST, r#"{"error": "bad"}"#);
        assert_eq!(message, r#"{"error":"bad"}"#);

        let message = error_message(StatusCode::BAD_REQUEST, r#"{"detail": null}"#);
        assert_eq!(message, r#"{"detail":null}"#);

        let message = error_message(StatusCode::BAD_REQUEST, r#"{"detail": ""}"#);
        assert_eq!(message, r#"{"detail":""}"#);
    }

    #[test]
    fn test_error_message_falls_back_to_status() {
        assert_eq!(
            error_message(StatusCode::BAD_GATEWAY, "<html>upstream down</html>"),
            "request failed with status code 502"
        );
        assert_eq!(
            error_message(StatusCode::INTERNAL_SERVER_ERROR, ""),
            "request failed with status code 500"
        );
    }

    #[test]
    fn test_base_url_trailing_slash_is_trimmed() {
        let url = Url::parse("http://scoring.local:8000/").unwrap();
        let client = ScoringClient::new(&url, Duration::from_secs(1)).unwrap();
        assert_eq!(client.endpoint(ASSESSMENTS_PATH), "http://scoring.local:8000/assessments");
    }

    #[tokio::test]
    async fn test_submit_posts_normalized_body() {
        let router = Router::new().route(
            "/assessments",
            post(|Json(body): Json<serde_json::Value>| async move {
                assert_eq!(body["public_endpoints"], json!(0));
                assert_eq!(body["waf_enabled"], json!(false));
                let mut result = serde_json::to_value(AssessmentResult::sample()).unwrap();
                result["name"] = body["name"].clone();
                (AxumStatus::CREATED, Json(result))
            }),
        );
        let url = spawn_scoring_service(router).await;

        let request = normalize(&AssessmentInput::empty());
        let result = client(&url).submit(&request).await.unwrap();

        assert_eq!(result.name.as_deref(), Some(""));
        assert_eq!(result.x_values.len(), 5);
    }

    #[tokio::test]
    async fn test_zone_less_created_at_is_accepted() {
        let router = Router::new().route(
            "/assessments",
            post(|| async {
                let mut result = result_body();
                result["created_at"] = json!("2025-01-10T08:30:00.123456");
                (AxumStatus::CREATED, Json(result))
            }),
        );
        let url = spawn_scoring_service(router).await;

        let request = normalize(&AssessmentInput::default());
        let result = client(&url).submit(&request).await.unwrap();

        assert!(result.created_at.is_some());
        assert_eq!(result.x_score, 41.237);
    }

    #[tokio::test]
    async fn test_unprocessable_detail_is_surfaced() {
        let router = Router::new().route(
            "/assessments",
            post(|| async {
                (
                    AxumStatus::UNPROCESSABLE_ENTITY,
                    Json(json!({"detail": [{"msg": "invalid"}]})),
                )
            }),
        );
        let url = spawn_scoring_service(router).await;

        let request = normalize(&AssessmentInput::default());
        let err = client(&url).submit(&request).await.unwrap_err();

        match err {
            AssessmentError::Service { status, message } => {
                assert_eq!(status, 422);
                assert_eq!(message, r#"[{"msg":"invalid"}]"#);
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_mismatched_curve_is_contract_violation() {
        let router = Router::new().route(
            "/assessments",
            post(|| async {
                let mut body = result_body();
                body["r_values"] = json!([1.0, 2.0]);
                (AxumStatus::CREATED, Json(body))
            }),
        );
        let url = spawn_scoring_service(router).await;

        let request = normalize(&AssessmentInput::default());
        let err = client(&url).submit(&request).await.unwrap_err();
        assert!(matches!(err, AssessmentError::ContractViolation(ref m) if m.contains("lengths differ")));
    }

    #[tokio::test]
    async fn test_undecodable_success_body_is_contract_violation() {
        let router = Router::new().route("/assessments", post(|| async { "not json" }));
        let url = spawn_scoring_service(router).await;

        let request = normalize(&AssessmentInput::default());
        let err = client(&url).submit(&request).await.unwrap_err();
        assert!(matches!(err, AssessmentError::ContractViolation(_)));
    }

    #[tokio::test]
    async fn test_slow_service_times_out() {
        let router = Router::new().route(
            "/assessments",
            post(|| async {
                tokio::time::sleep(Duration::from_secs(10)).await;
                Json(result_body())
            }),
        );
        let url = spawn_scoring_service(router).await;

        let client = ScoringClient::new(&url, Duration::from_millis(200)).unwrap();
        let request = normalize(&AssessmentInput::default());
        let err = client.submit(&request).await.unwrap_err();

        assert!(matches!(err, AssessmentError::Timeout(d) if d == Duration::from_millis(200)));
        assert!(err.is_transport());
    }

    #[tokio::test]
    async fn test_cancel_abandons_inflight_exchange() {
        let router = Router::new().route(
            "/assessments",
            post(|| async {
                tokio::time::sleep(Duration::from_secs(10)).await;
                Json(result_body())
            }),
        );
        let url = spawn_scoring_service(router).await;

        let (cancel_tx, cancel_rx) = tokio::sync::oneshot::channel::<()>();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(50)).await;
            let _ = cancel_tx.send(());
        });

        let request = normalize(&AssessmentInput::default());
        let err = client(&url)
            .submit_with_cancel(&request, async move {
                let _ = cancel_rx.await;
            })
            .await
            .unwrap_err();

        assert!(matches!(err, AssessmentError::Cancelled));
    }

    #[tokio::test]
    async fn test_uncancelled_submit_completes() {
        let router = Router::new().route(
            "/assessments",
            post(|| async { (AxumStatus::CREATED, Json(result_body())) }),
        );
        let url = spawn_scoring_service(router).await;

        let request = normalize(&AssessmentInput::default());
        let result = client(&url)
            .submit_with_cancel(&request, std::future::pending::<()>())
            .await
            .unwrap();
        assert_eq!(result, AssessmentResult::sample());
    }

    #[tokio::test]
    async fn test_unreachable_service_is_transport_error() {
        // Bind then drop so nothing is listening on the port
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let url = Url::parse(&format!("http://{}", addr)).unwrap();
        let request = normalize(&AssessmentInput::default());
        let err = client(&url).submit(&request).await.unwrap_err();

        assert!(matches!(err, AssessmentError::Transport(_)));
    }

    #[tokio::test]
    async fn test_list_recent_and_health() {
        let router = Router::new()
            .route(
                "/assessments",
                get(|| async {
                    Json(json!([{
                        "id": 3,
                        "name": "Demo SaaS",
                        "created_at": "2025-03-01T12:00:00Z",
                        "x_score": 52.4,
                        "drivers": [{"factor": "MFA Gap", "points": 4.1, "direction": "increase"}],
                        "recommendations": ["Raise MFA adoption above 90%."]
                    }]))
                }),
            )
            .route("/health", get(|| async { Json(json!({"status": "healthy"})) }));
        let url = spawn_scoring_service(router).await;
        let client = client(&url);

        let recent = client.list_recent().await.unwrap();
        assert_eq!(recent.len(), 1);
        assert_eq!(recent[0].id, 3);
        assert_eq!(recent[0].drivers[0].factor, "MFA Gap");

        let health = client.health().await.unwrap();
        assert_eq!(health.status, "healthy");
    }
}
