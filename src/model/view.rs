//! Chart and card ready shapes handed to the UI layer

use serde::Serialize;
use utoipa::ToSchema;

/// Severity band of an attack surface score
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    pub fn label(&self) -> &'static str {
        match self {
            Severity::Low => "Low",
            Severity::Medium => "Medium",
            Severity::High => "High",
            Severity::Critical => "Critical",
        }
    }
}

/// One sample of the risk curve, rounded for display
#[derive(Debug, Clone, Copy, PartialEq, Serialize, ToSchema)]
pub struct SeriesPoint {
    pub x: f64,
    pub r: f64,
    pub r_prime: f64,
}

/// Region of x where risk growth is unsafe
#[derive(Debug, Clone, Copy, PartialEq, Serialize, ToSchema)]
pub struct UnsafeZone {
    pub start: f64,
    pub end: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, ToSchema)]
pub struct Domain {
    pub min: f64,
    pub max: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct ScoreCard {
    pub score: f64,
    pub score_text: String,
    pub severity: Severity,
    pub severity_label: String,
    pub unsafe_start_text: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct RiskCharts {
    pub series: Vec<SeriesPoint>,
    pub domain: Option<Domain>,
    pub unsafe_zone: Option<UnsafeZone>,
    pub unsafe_marker_label: Option<String>,
    pub threshold: Option<f64>,
    pub threshold_label: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum DriverEffect {
    IncreasesRisk,
    ReducesRisk,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct DriverRow {
    pub factor: String,
    pub points: f64,
    pub points_text: String,
    pub effect: DriverEffect,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct RecommendationList {
    pub items: Vec<String>,
    pub empty_message: Option<String>,
}

/// Everything the results panel renders for one assessment
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct AssessmentView {
    pub name: Option<String>,
    pub score_card: ScoreCard,
    pub charts: RiskCharts,
    pub drivers: Vec<DriverRow>,
    pub recommendations: RecommendationList,
}
