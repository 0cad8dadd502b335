//! Review client and local simulation engine.
//!
//! One review action is one outbound `POST {language, code}` to the backend.
//! On any failure — connect error, timeout, non-2xx status, malformed body —
//! the client switches to the local simulation engine after a fixed simulated
//! delay and the caller still receives a normal outcome. No retries: this is
//! resilience by substitution, not recovery. The only error the caller ever
//! sees is the empty-buffer precondition.
//!
//! The backend's own score field is intentionally not consumed; only
//! `feedback` is read from the response and the score is synthesized
//! client-side on both paths (see DESIGN.md).

use std::sync::OnceLock;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::{CodeMetrics, Language, ReviewOutcome};

/// Default backend endpoint for review requests.
pub const DEFAULT_ENDPOINT: &str = "http://localhost:8080/api/review";

/// Artificial latency of the simulation engine, so a fallback result does not
/// arrive suspiciously faster than a real one.
pub const SIMULATED_LATENCY: Duration = Duration::from_millis(1500);

const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Failures surfaced to the caller. Backend failures are not among them —
/// those are absorbed by the simulation fallback.
#[derive(Debug, Error)]
pub enum ReviewError {
    /// The buffer was empty or whitespace-only; no request was issued.
    #[error("nothing to review: the buffer is empty")]
    EmptyCode,
}

#[derive(Serialize)]
struct ReviewRequest<'a> {
    language: &'a str,
    code: &'a str,
}

#[derive(Deserialize)]
struct ReviewResponse {
    feedback: String,
}

/// Shared HTTP client with connect and request timeouts.
///
/// Built once; the builder only fails if the TLS backend cannot initialize,
/// in which case a default client still serves the plain-HTTP endpoint.
fn http_client() -> &'static reqwest::Client {
    static CLIENT: OnceLock<reqwest::Client> = OnceLock::new();
    CLIENT.get_or_init(|| {
        reqwest::Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|e| {
                tracing::error!("failed to build review HTTP client: {e}; using defaults");
                reqwest::Client::new()
            })
    })
}

/// Issues review requests against a fixed endpoint, falling back to the
/// simulation engine on any backend failure.
#[derive(Debug, Clone)]
pub struct ReviewClient {
    endpoint: String,
    simulated_latency: Duration,
}

impl Default for ReviewClient {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_owned(),
            simulated_latency: SIMULATED_LATENCY,
        }
    }
}

impl ReviewClient {
    /// Client against a non-default endpoint (config override).
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self { endpoint: endpoint.into(), ..Self::default() }
    }

    /// Overrides the simulation delay. Tests set this to zero.
    pub fn with_simulated_latency(mut self, latency: Duration) -> Self {
        self.simulated_latency = latency;
        self
    }

    /// Runs one review action.
    ///
    /// # Errors
    ///
    /// Returns [`ReviewError::EmptyCode`] for an empty or whitespace-only
    /// buffer, before any network activity. Backend failures never surface:
    /// they are logged and replaced by a simulated outcome.
    pub async fn review(
        &self,
        language: Language,
        code: &str,
    ) -> Result<ReviewOutcome, ReviewError> {
        if code.trim().is_empty() {
            return Err(ReviewError::EmptyCode);
        }

        match self.post_review(language, code).await {
            Ok(feedback) => Ok(ReviewOutcome {
                feedback,
                // The backend does not score yet; synthesize one (7..=10).
                score: rand::random_range(7..=10),
                metrics: CodeMetrics {
                    cyclomatic_complexity: None,
                    maintainability_index: None,
                    bugs_detected: 0,
                },
            }),
            Err(err) => {
                tracing::warn!("review backend unavailable ({err}); using local simulation");
                tokio::time::sleep(self.simulated_latency).await;
                Ok(simulate(language))
            }
        }
    }

    /// The single backend call. Any `Err` routes the caller to simulation.
    async fn post_review(
        &self,
        language: Language,
        code: &str,
    ) -> Result<String, reqwest::Error> {
        let response = http_client()
            .post(&self.endpoint)
            .json(&ReviewRequest { language: language.as_str(), code })
            .send()
            .await?
            .error_for_status()?;
        let body: ReviewResponse = response.json().await?;
        Ok(body.feedback)
    }
}

/// Local simulation engine: deterministic shape, randomized values.
///
/// Score is uniform in 6..=9; the feedback template is parameterized only by
/// the language tag; metrics are drawn from fixed ranges (complexity 1..=10,
/// maintainability 60..=99, bugs 0..=2).
pub fn simulate(language: Language) -> ReviewOutcome {
    ReviewOutcome {
        feedback: format!(
            "Analysis Complete for {} codebase.\n\n\
             1. Security: No major vulnerabilities found. Ensure inputs are sanitized.\n\
             2. Performance: Time complexity looks optimal (O(n)). Consider memoizing heavy calculations.\n\
             3. Maintainability: Good naming conventions detected. Consider breaking down large functions.\n\n\
             Suggestion: Run a linter to catch minor formatting inconsistencies.",
            language.as_str()
        ),
        score: rand::random_range(6..=9),
        metrics: CodeMetrics {
            cyclomatic_complexity: Some(rand::random_range(1..=10)),
            maintainability_index: Some(rand::random_range(60..=99)),
            bugs_detected: rand::random_range(0..=2),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // An unroutable endpoint: connections to port 9 on localhost are refused
    // immediately, forcing the fallback path without waiting on a timeout.
    const DEAD_ENDPOINT: &str = "http://127.0.0.1:9/api/review";

    #[tokio::test]
    async fn empty_code_is_rejected_without_a_network_call() {
        let client = ReviewClient::new(DEAD_ENDPOINT);
        let err = client.review(Language::Javascript, "   \n\t").await.unwrap_err();
        assert!(matches!(err, ReviewError::EmptyCode));
    }

    #[tokio::test]
    async fn backend_failure_falls_back_to_simulation() {
        let client =
            ReviewClient::new(DEAD_ENDPOINT).with_simulated_latency(Duration::ZERO);
        let outcome = client.review(Language::Python, "x = 1").await.unwrap();
        assert!((6..=9).contains(&outcome.score));
        assert!(outcome.feedback.contains("python"));
        assert!((1..=10).contains(&outcome.metrics.cyclomatic_complexity.unwrap()));
        assert!((60..=99).contains(&outcome.metrics.maintainability_index.unwrap()));
        assert!(outcome.metrics.bugs_detected <= 2);
    }

    #[test]
    fn simulated_outcomes_stay_inside_their_ranges() {
        for _ in 0..64 {
            let outcome = simulate(Language::Go);
            assert!((6..=9).contains(&outcome.score));
            assert!((1..=10).contains(&outcome.metrics.cyclomatic_complexity.unwrap()));
            assert!((60..=99).contains(&outcome.metrics.maintainability_index.unwrap()));
            assert!(outcome.metrics.bugs_detected <= 2);
        }
    }

    #[test]
    fn simulated_feedback_is_parameterized_by_language_only() {
        let a = simulate(Language::Java).feedback;
        let b = simulate(Language::Java).feedback;
        assert_eq!(a, b);
        assert!(a.starts_with("Analysis Complete for java codebase."));
    }
}
