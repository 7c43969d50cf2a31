pub mod config;
pub mod input;
pub mod request;
pub mod result;
pub mod view;

pub use config::{Config, ScoringConfig};
pub use input::{AssessmentField, AssessmentInput, InputError, RawValue};
pub use request::NormalizedRequest;
pub use result::{AssessmentResult, AssessmentSummary, Driver, DriverDirection, ServiceHealth};
pub use view::{AssessmentView, SeriesPoint, Severity, UnsafeZone};
