use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::input::{AssessmentInput, FieldInput};

/// Wire body of `POST /assessments`
///
/// Every field is present and every number is finite. Out of range values are
/// forwarded as entered; the scoring service owns range enforcement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct NormalizedRequest {
    pub name: String,
    pub public_endpoints: i64,
    pub admin_endpoints: i64,
    pub third_party_integrations: i64,
    pub monthly_active_users: i64,
    pub privileged_accounts: i64,
    pub mfa_adoption_pct: f64,
    pub failed_login_rate_pct: f64,
    pub monthly_requests: i64,
    pub unique_countries: i64,
    pub traffic_concentration_pct: f64,
    pub open_critical_vulns: i64,
    pub mean_patch_time_days: i64,
    pub waf_enabled: bool,
    pub rate_limiting_enabled: bool,
}

impl From<NormalizedRequest> for AssessmentInput {
    fn from(request: NormalizedRequest) -> Self {
        Self {
            name: request.name,
            public_endpoints: FieldInput::Value(request.public_endpoints),
            admin_endpoints: FieldInput::Value(request.admin_endpoints),
            third_party_integrations: FieldInput::Value(request.third_party_integrations),
            monthly_active_users: FieldInput::Value(request.monthly_active_users),
            privileged_accounts: FieldInput::Value(request.privileged_accounts),
            mfa_adoption_pct: FieldInput::Value(request.mfa_adoption_pct),
            failed_login_rate_pct: FieldInput::Value(request.failed_login_rate_pct),
            monthly_requests: FieldInput::Value(request.monthly_requests),
            unique_countries: FieldInput::Value(request.unique_countries),
            traffic_concentration_pct: FieldInput::Value(request.traffic_concentration_pct),
            open_critical_vulns: FieldInput::Value(request.open_critical_vulns),
            mean_patch_time_days: FieldInput::Value(request.mean_patch_time_days),
            waf_enabled: request.waf_enabled,
            rate_limiting_enabled: request.rate_limiting_enabled,
        }
    }
}
