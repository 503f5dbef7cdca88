//! repp-ui library interface
//!
//! Submission orchestration for the Real Estate Price Predictor: the
//! prediction service client, the input form, the single-flight submission
//! controller and a small terminal front end.

pub mod api_client;
pub mod controller;
pub mod form;
pub mod render;
pub mod session;

pub use crate::api_client::{ApiClient, ApiError, ErrorMessage, PredictionApi};
pub use crate::controller::{SubmissionController, SubmissionState, SubmitOutcome};
pub use crate::form::{InputForm, InputMode};

/// Version, commit and build time, e.g. `repp-ui v0.1.0 [1a2b3c4d] built ... (release)`
pub fn build_id() -> String {
    format!(
        "repp-ui v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    )
}
