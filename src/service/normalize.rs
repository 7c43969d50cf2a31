//! Request normalization
//!
//! The single place where unusable numeric input becomes a wire value.
//! Empty and unparseable fields become `0`; everything else passes through
//! untouched, including percentages outside [0, 100].

use crate::model::input::{AssessmentInput, FieldInput, NumericField};
use crate::model::NormalizedRequest;

/// Turn an edited form into a request the scoring service accepts
pub fn normalize(input: &AssessmentInput) -> NormalizedRequest {
    let mut substituted = 0usize;

    let request = NormalizedRequest {
        name: input.name.clone(),
        public_endpoints: or_zero(&input.public_endpoints, &mut substituted),
        admin_endpoints: or_zero(&input.admin_endpoints, &mut substituted),
        third_party_integrations: or_zero(&input.third_party_integrations, &mut substituted),
        monthly_active_users: or_zero(&input.monthly_active_users, &mut substituted),
        privileged_accounts: or_zero(&input.privileged_accounts, &mut substituted),
        mfa_adoption_pct: or_zero(&input.mfa_adoption_pct, &mut substituted),
        failed_login_rate_pct: or_zero(&input.failed_login_rate_pct, &mut substituted),
        monthly_requests: or_zero(&input.monthly_requests, &mut substituted),
        unique_countries: or_zero(&input.unique_countries, &mut substituted),
        traffic_concentration_pct: or_zero(&input.traffic_concentration_pct, &mut substituted),
        open_critical_vulns: or_zero(&input.open_critical_vulns, &mut substituted),
        mean_patch_time_days: or_zero(&input.mean_patch_time_days, &mut substituted),
        waf_enabled: input.waf_enabled,
        rate_limiting_enabled: input.rate_limiting_enabled,
    };

    if substituted > 0 {
        tracing::debug!(
            name = %request.name,
            substituted,
            "Defaulted empty or non-numeric fields to 0"
        );
    }

    request
}

fn or_zero<T: NumericField>(field: &FieldInput<T>, substituted: &mut usize) -> T {
    match field.value() {
        Some(value) => value,
        None => {
            *substituted += 1;
            T::default()
        }
    }
}
