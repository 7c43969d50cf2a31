//! Per-session form state
//!
//! Owned by exactly one caller (a UI session or a single HTTP request), so
//! concurrent sessions never share anything.

use crate::model::{AssessmentField, AssessmentInput, AssessmentResult, InputError, RawValue};
use crate::service::error::AssessmentError;
use crate::service::normalize::normalize;
use crate::service::scoring::ScoringBackend;

#[derive(Debug, Clone, Default)]
pub struct AssessmentSession {
    input: AssessmentInput,
    last_result: Option<AssessmentResult>,
    last_error: Option<String>,
}

impl AssessmentSession {
    /// A session seeded with the demo baseline
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_input(input: AssessmentInput) -> Self {
        Self {
            input,
            last_result: None,
            last_error: None,
        }
    }

    pub fn input(&self) -> &AssessmentInput {
        &self.input
    }

    pub fn last_result(&self) -> Option<&AssessmentResult> {
        self.last_result.as_ref()
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn edit(&mut self, field: AssessmentField, raw: RawValue) -> Result<(), InputError> {
        self.input.set_field(field, raw)
    }

    /// Back to the demo baseline with no result or error shown
    pub fn reset(&mut self) {
        self.input = AssessmentInput::default();
        self.last_result = None;
        self.last_error = None;
    }

    /// Normalize the current form and run one exchange
    ///
    /// The previous result and error are cleared first. On failure the
    /// session keeps the error message and stays usable for another attempt.
    pub async fn submit(
        &mut self,
        backend: &dyn ScoringBackend,
    ) -> Result<&AssessmentResult, AssessmentError> {
        self.last_result = None;
        self.last_error = None;

        let request = normalize(&self.input);
        match backend.submit(&request).await {
            Ok(result) => Ok(&*self.last_result.insert(result)),
            Err(e) => {
                self.last_error = Some(e.to_string());
                Err(e)
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::model::{AssessmentSummary, NormalizedRequest, ServiceHealth};
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Backend answering from a fixed script and recording what it was sent
    pub(crate) struct FakeBackend {
        pub outcome: fn(&NormalizedRequest) -> Result<AssessmentResult, AssessmentError>,
        pub seen: Mutex<Vec<NormalizedRequest>>,
    }

    impl FakeBackend {
        pub(crate) fn new(
            outcome: fn(&NormalizedRequest) -> Result<AssessmentResult, AssessmentError>,
        ) -> Self {
            Self {
                outcome,
                seen: Mutex::new(Vec::new()),
            }
        }

        pub(crate) fn succeeding() -> Self {
            Self::new(|_| Ok(AssessmentResult::sample()))
        }
    }

    #[async_trait]
    impl ScoringBackend for FakeBackend {
        async fn submit(
            &self,
            request: &NormalizedRequest,
        ) -> Result<AssessmentResult, AssessmentError> {
            self.seen.lock().unwrap().push(request.clone());
            (self.outcome)(request)
        }

        async fn list_recent(&self) -> Result<Vec<AssessmentSummary>, AssessmentError> {
            Ok(Vec::new())
        }

        async fn health(&self) -> Result<ServiceHealth, AssessmentError> {
            Ok(ServiceHealth {
                status: "healthy".to_string(),
            })
        }
    }

    #[tokio::test]
    async fn test_submit_normalizes_current_form() {
        let backend = FakeBackend::succeeding();
        let mut session = AssessmentSession::new();
        session
            .edit(AssessmentField::MfaAdoptionPct, RawValue::Text("150".into()))
            .unwrap();
        session
            .edit(AssessmentField::AdminEndpoints, RawValue::Text("six".into()))
            .unwrap();

        let result = session.submit(&backend).await.unwrap();
        assert_eq!(result.x_score, 41.237);

        let seen = backend.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].mfa_adoption_pct, 150.0);
        assert_eq!(seen[0].admin_endpoints, 0);
    }

    #[tokio::test]
    async fn test_failure_is_kept_and_session_stays_usable() {
        let failing = FakeBackend::new(|_| {
            Err(AssessmentError::Service {
                status: 422,
                message: r#"[{"msg":"invalid"}]"#.to_string(),
            })
        });
        let mut session = AssessmentSession::new();

        assert!(session.submit(&failing).await.is_err());
        assert_eq!(session.last_error(), Some(r#"[{"msg":"invalid"}]"#));
        assert!(session.last_result().is_none());

        let backend = FakeBackend::succeeding();
        session.submit(&backend).await.unwrap();
        assert!(session.last_error().is_none());
        assert!(session.last_result().is_some());
    }

    #[tokio::test]
    async fn test_reset_restores_baseline() {
        let backend = FakeBackend::succeeding();
        let mut session = AssessmentSession::with_input(AssessmentInput::empty());
        session.submit(&backend).await.unwrap();

        session.reset();
        assert_eq!(session.input(), &AssessmentInput::default());
        assert!(session.last_result().is_none());
        assert!(session.last_error().is_none());
    }

    #[tokio::test]
    async fn test_all_zero_submission_is_interpretable() {
        use crate::service::interpret::{build_series, classify_severity};

        let backend = FakeBackend::succeeding();
        let mut session = AssessmentSession::with_input(AssessmentInput::empty());
        let result = session.submit(&backend).await.unwrap().clone();

        let seen = backend.seen.lock().unwrap();
        assert_eq!(seen[0].monthly_requests, 0);
        assert!(!seen[0].waf_enabled && !seen[0].rate_limiting_enabled);

        let _ = classify_severity(result.x_score);
        assert!(!build_series(&result).is_empty());
    }
}
