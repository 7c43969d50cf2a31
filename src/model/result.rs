use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;

const NAIVE_TIMESTAMP_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Parse a service timestamp, reading zone-less values as UTC
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }

    NAIVE_TIMESTAMP_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .map(|naive| naive.and_utc())
}

/// `created_at` is display metadata; an unreadable value decodes as `None`
fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
    let parsed = raw.as_ref().and_then(|v| v.as_str()).and_then(parse_timestamp);

    if parsed.is_none() {
        if let Some(value) = raw.filter(|v| !v.is_null()) {
            tracing::debug!(value = %value, "Ignoring unreadable created_at");
        }
    }

    Ok(parsed)
}

/// Which way a driver pushes the score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum DriverDirection {
    Increase,
    Decrease,
}

/// Signed contribution of one input factor to the score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Driver {
    pub factor: String,
    /// Score points; negative values reduce risk
    pub points: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub direction: Option<DriverDirection>,
}

/// Risk assessment returned by the scoring service
///
/// Immutable once received. `x_values`, `r_values` and `r_prime_values` are
/// positionally aligned samples of R(x) and R'(x).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct AssessmentResult {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub created_at: Option<DateTime<Utc>>,

    /// Headline attack surface score in [0, 100]
    pub x_score: f64,
    pub x_values: Vec<f64>,
    pub r_values: Vec<f64>,
    pub r_prime_values: Vec<f64>,
    #[serde(default)]
    pub r_double_prime_values: Vec<f64>,
    /// First x at which R'(x) exceeds the threshold, if any
    #[serde(default)]
    pub x_unsafe_start: Option<f64>,
    #[serde(default)]
    pub threshold: Option<f64>,

    /// Symbolic forms of R(x) and its derivatives
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expression_r: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expression_r_prime: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expression_r_double_prime: Option<String>,

    /// Ranked by the service; order is preserved as received
    pub drivers: Vec<Driver>,
    pub recommendations: Vec<String>,
}

/// Entry of `GET /assessments` on the scoring service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct AssessmentSummary {
    pub id: i64,
    pub name: String,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub created_at: Option<DateTime<Utc>>,
    pub x_score: f64,
    #[serde(default)]
    pub drivers: Vec<Driver>,
    #[serde(default)]
    pub recommendations: Vec<String>,
}

/// Body of `GET /health` on the scoring service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ServiceHealth {
    pub status: String,
}

#[cfg(test)]
impl AssessmentResult {
    /// Small well-formed result shared by unit tests
    pub(crate) fn sample() -> Self {
        Self {
            id: Some(7),
            name: Some("Demo SaaS".to_string()),
            created_at: None,
            x_score: 41.237,
            x_values: vec![0.0, 25.0, 50.0, 75.0, 100.0],
            r_values: vec![5.0, 34.375, 82.5, 149.375, 235.0],
            r_prime_values: vec![0.8, 1.55, 2.3, 3.05, 3.8],
            r_double_prime_values: vec![],
            x_unsafe_start: Some(73.333),
            threshold: Some(3.0),
            expression_r: None,
            expression_r_prime: None,
            expression_r_double_prime: None,
            drivers: vec![
                Driver {
                    factor: "Monthly Active Users".to_string(),
                    points: 8.4,
                    direction: Some(DriverDirection::Increase),
                },
                Driver {
                    factor: "Rate Limiting Enabled".to_string(),
                    points: -6.0,
                    direction: Some(DriverDirection::Decrease),
                },
                Driver {
                    factor: "Public Endpoints".to_string(),
                    points: 5.0,
                    direction: None,
                },
            ],
            recommendations: vec!["Enable a WAF in front of public endpoints.".to_string()],
        }
    }
}
