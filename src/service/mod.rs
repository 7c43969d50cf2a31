pub mod error;
pub mod interpret;
pub mod normalize;
pub mod presentation;
pub mod scoring;
pub mod session;
pub mod validation;

pub use error::AssessmentError;
pub use normalize::normalize;
pub use presentation::build_view;
pub use scoring::{ScoringBackend, ScoringClient};
pub use session::AssessmentSession;
