//! Maps an interpreted assessment onto the results panel view model

use crate::model::view::{
    AssessmentView, Domain, DriverEffect, DriverRow, RecommendationList, RiskCharts, ScoreCard,
};
use crate::model::{AssessmentResult, Driver, DriverDirection};
use crate::service::interpret::{
    build_series, classify_severity, max_x, min_x, top_drivers, unsafe_zone, DEFAULT_TOP_DRIVERS,
};

const NO_RECOMMENDATIONS: &str = "No major issues detected.";

pub fn build_view(result: &AssessmentResult) -> AssessmentView {
    AssessmentView {
        name: result.name.clone(),
        score_card: score_card(result),
        charts: charts(result),
        drivers: top_drivers(result, DEFAULT_TOP_DRIVERS)
            .iter()
            .map(driver_row)
            .collect(),
        recommendations: RecommendationList {
            items: result.recommendations.clone(),
            empty_message: result
                .recommendations
                .is_empty()
                .then(|| NO_RECOMMENDATIONS.to_string()),
        },
    }
}

fn score_card(result: &AssessmentResult) -> ScoreCard {
    let severity = classify_severity(result.x_score);
    ScoreCard {
        score: result.x_score,
        score_text: format!("{:.1}", result.x_score),
        severity,
        severity_label: severity.label().to_string(),
        unsafe_start_text: result.x_unsafe_start.map(|x| format!("{:.1}", x)),
    }
}

fn charts(result: &AssessmentResult) -> RiskCharts {
    let zone = unsafe_zone(result);
    let domain = match (min_x(result), max_x(result)) {
        (Some(min), Some(max)) => Some(Domain { min, max }),
        _ => None,
    };

    RiskCharts {
        series: build_series(result),
        domain,
        unsafe_marker_label: zone.map(|z| format!("Unsafe at x={:.1}", z.start)),
        unsafe_zone: zone,
        threshold: result.threshold,
        threshold_label: result.threshold.map(|t| format!("Threshold = {}", t)),
    }
}

fn driver_row(driver: &Driver) -> DriverRow {
    let effect = match driver.direction {
        Some(DriverDirection::Increase) => DriverEffect::IncreasesRisk,
        Some(DriverDirection::Decrease) => DriverEffect::ReducesRisk,
        None if driver.points < 0.0 => DriverEffect::ReducesRisk,
        None => DriverEffect::IncreasesRisk,
    };

    DriverRow {
        factor: driver.factor.clone(),
        points: driver.points,
        points_text: signed_points(driver.points),
        effect,
    }
}

fn signed_points(points: f64) -> String {
    // fold -0.0 into +0.0
    let points = points + 0.0;
    if points >= 0.0 {
        format!("+{:.2}", points)
    } else {
        format!("{:.2}", points)
    }
}
