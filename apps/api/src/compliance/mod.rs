// Compliance assessment of a resume against a job description.
// Flow: build prompt → TextCompletionClient → strict schema validation.
// Model output is parsed as data only; it is never evaluated.

pub mod handlers;
pub mod prompts;
pub mod service;
pub mod validator;

pub use service::{AssessmentFailure, AssessmentPolicy, ComplianceAssessmentService};
