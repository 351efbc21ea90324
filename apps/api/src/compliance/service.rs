//! Compliance Assessment: orchestrates prompt → completion → schema validation.
//!
//! The completion client is injected once at startup as `Arc<dyn TextCompletionClient>`.
//! Timeout and transport retry are caller policies applied here, never inside the client.

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tracing::{info, warn};

use crate::compliance::prompts::build_compliance_prompt;
use crate::compliance::validator::{parse_compliance_response, ComplianceResult, ParseFailure};
use crate::llm_client::{CompletionError, TextCompletionClient};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Caller-side policies around the completion call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AssessmentPolicy {
    /// Upper bound for one completion attempt. Expiry counts as a transport failure.
    pub timeout: Duration,
    /// Extra attempts after a transport failure. Upstream and parse failures are never retried.
    pub transport_retries: u32,
}

impl Default for AssessmentPolicy {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            transport_retries: 0,
        }
    }
}

/// Coarse failure category, used for logging and HTTP status mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    Transport,
    Upstream,
    Parse,
}

/// Every way an assessment can fail, as one tagged error.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AssessmentFailure {
    #[error("completion transport failed: {message}")]
    Transport { message: String, timed_out: bool },

    #[error("completion provider failed (status {status:?}): {message}")]
    Upstream { status: Option<u16>, message: String },

    #[error("completion output did not match the schema: {0}")]
    Parse(ParseFailure),
}

impl AssessmentFailure {
    pub fn kind(&self) -> FailureKind {
        match self {
            AssessmentFailure::Transport { .. } => FailureKind::Transport,
            AssessmentFailure::Upstream { .. } => FailureKind::Upstream,
            AssessmentFailure::Parse(_) => FailureKind::Parse,
        }
    }
}

impl From<CompletionError> for AssessmentFailure {
    fn from(e: CompletionError) -> Self {
        match e {
            CompletionError::Transport { message, timed_out } => {
                AssessmentFailure::Transport { message, timed_out }
            }
            CompletionError::Upstream { status, message } => {
                AssessmentFailure::Upstream { status, message }
            }
        }
    }
}

pub struct ComplianceAssessmentService {
    client: Arc<dyn TextCompletionClient>,
    policy: AssessmentPolicy,
}

impl ComplianceAssessmentService {
    pub fn new(client: Arc<dyn TextCompletionClient>, policy: AssessmentPolicy) -> Self {
        Self { client, policy }
    }

    /// Assesses a resume against a job description.
    ///
    /// Transport and upstream failures return before the validator runs.
    pub async fn assess(
        &self,
        resume: &str,
        job_description: &str,
    ) -> Result<ComplianceResult, AssessmentFailure> {
        let prompt = build_compliance_prompt(resume, job_description);

        let raw = self.complete_with_policy(&prompt).await.map_err(|e| {
            let failure = AssessmentFailure::from(e);
            warn!(kind = ?failure.kind(), "Compliance completion failed: {failure}");
            failure
        })?;

        let result = parse_compliance_response(&raw).map_err(|failure| {
            warn!(
                kind = ?FailureKind::Parse,
                raw_len = raw.len(),
                "Compliance response rejected: {}",
                failure.reason
            );
            AssessmentFailure::Parse(failure)
        })?;

        if result.score_clamped || result.fields_sanitized {
            warn!(
                score_clamped = result.score_clamped,
                fields_sanitized = result.fields_sanitized,
                "Compliance response required sanitization"
            );
        }
        info!(
            score = result.score,
            missing_keywords = result.missing_keywords.len(),
            suggestions = result.suggestions.len(),
            "Compliance assessment complete"
        );

        Ok(result)
    }

    /// One completion call under the timeout, repeated only on transport failure.
    async fn complete_with_policy(&self, prompt: &str) -> Result<String, CompletionError> {
        let mut attempt = 0u32;

        loop {
            let outcome =
                match tokio::time::timeout(self.policy.timeout, self.client.complete(prompt)).await
                {
                    Ok(result) => result,
                    Err(_) => Err(CompletionError::Transport {
                        message: format!(
                            "no response within {}ms",
                            self.policy.timeout.as_millis()
                        ),
                        timed_out: true,
                    }),
                };

            match outcome {
                Err(CompletionError::Transport { ref message, .. })
                    if attempt < self.policy.transport_retries =>
                {
                    attempt += 1;
                    warn!(attempt, "Completion transport failure, retrying: {message}");
                }
                other => return other,
            }
        }
    }
}
