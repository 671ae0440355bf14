//! Fallback chain executor.
//!
//! Tries providers in priority order and stops at the first success:
//! 1. Each provider that accepts the request is attempted exactly once
//! 2. Failures are logged and the next provider is tried
//! 3. If all fail, the terminal heuristic scores the request, unless the
//!    chain forbids fallback, in which case the caller gets
//!    `ServiceUnavailable`
//!
//! No retries, no voting across providers.

use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, warn};

use super::heuristic::Heuristic;
use super::provider::ClassificationProvider;
use super::risk::{ArtifactKind, ClassificationRequest, ClassificationResult};
use crate::error::{ClassifyError, ProviderErrorKind};

/// Ordered providers plus one terminal heuristic for an artifact kind.
///
/// Built once at startup and shared immutably afterwards.
pub struct FallbackChain {
    kind: ArtifactKind,
    providers: Vec<Arc<dyn ClassificationProvider>>,
    heuristic: Box<dyn Heuristic>,
    fallback_on_failure: bool,
}

impl FallbackChain {
    /// Creates a chain with no providers that falls back to `heuristic`.
    pub fn new(kind: ArtifactKind, heuristic: impl Heuristic + 'static) -> Self {
        Self {
            kind,
            providers: Vec::new(),
            heuristic: Box::new(heuristic),
            fallback_on_failure: true,
        }
    }

    /// Appends a provider at the lowest priority so far.
    pub fn with_provider(mut self, provider: Arc<dyn ClassificationProvider>) -> Self {
        self.providers.push(provider);
        self
    }

    /// Sets whether exhausting every provider degrades to the heuristic.
    pub fn fallback_on_failure(mut self, enabled: bool) -> Self {
        self.fallback_on_failure = enabled;
        self
    }

    /// Returns the artifact kind this chain serves.
    pub fn kind(&self) -> ArtifactKind {
        self.kind
    }

    /// Returns true if the heuristic may stand in for failed providers.
    pub fn allows_fallback(&self) -> bool {
        self.fallback_on_failure
    }

    /// Returns provider names in priority order.
    pub fn provider_names(&self) -> Vec<&'static str> {
        self.providers.iter().map(|p| p.name()).collect()
    }

    /// Returns the name of the terminal heuristic.
    pub fn heuristic_name(&self) -> &'static str {
        self.heuristic.name()
    }

    /// Runs the chain and returns the first successful result.
    pub async fn execute(
        &self,
        request: &ClassificationRequest,
    ) -> Result<ClassificationResult, ClassifyError> {
        self.execute_with_trace(request).await.0
    }

    /// Runs the chain and also reports every attempt that was made.
    pub async fn execute_with_trace(
        &self,
        request: &ClassificationRequest,
    ) -> (Result<ClassificationResult, ClassifyError>, ChainTrace) {
        let start = Instant::now();
        let mut trace = ChainTrace::default();
        let mut failures = Vec::new();

        for provider in &self.providers {
            if !provider.accepts(request) {
                debug!(provider = provider.name(), kind = %self.kind, "Provider skipped request");
                trace.attempts.push(ProviderAttempt {
                    provider: provider.name(),
                    outcome: AttemptOutcome::Skipped,
                    duration_us: 0,
                });
                continue;
            }

            debug!(provider = provider.name(), kind = %self.kind, "Trying provider");
            let attempt_start = Instant::now();
            let outcome = provider.classify(request).await;
            let duration_us = attempt_start.elapsed().as_micros() as u64;

            match outcome {
                Ok(result) => {
                    trace.attempts.push(ProviderAttempt {
                        provider: provider.name(),
                        outcome: AttemptOutcome::Succeeded,
                        duration_us,
                    });
                    trace.duration_us = start.elapsed().as_micros() as u64;
                    return (Ok(result), trace);
                }
                Err(e) => {
                    warn!(
                        provider = provider.name(),
                        kind = %self.kind,
                        error_kind = %e.kind,
                        "Provider failed: {}",
                        e.message
                    );
                    trace.attempts.push(ProviderAttempt {
                        provider: provider.name(),
                        outcome: AttemptOutcome::Failed(e.kind),
                        duration_us,
                    });
                    failures.push(format!("{}: {}", e.provider, e.kind));
                }
            }
        }

        trace.duration_us = start.elapsed().as_micros() as u64;

        if !self.fallback_on_failure {
            let reason = if failures.is_empty() {
                "no provider available".to_string()
            } else {
                failures.join(", ")
            };
            warn!(kind = %self.kind, "All providers failed and fallback is disabled");
            return (
                Err(ClassifyError::ServiceUnavailable {
                    kind: self.kind,
                    reason,
                }),
                trace,
            );
        }

        debug!(
            kind = %self.kind,
            heuristic = self.heuristic.name(),
            "All providers failed, using heuristic"
        );
        let result = self.heuristic.score(request);
        trace.used_heuristic = true;
        trace.duration_us = start.elapsed().as_micros() as u64;
        (Ok(result), trace)
    }
}

/// What happened to one provider during a chain run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptOutcome {
    Succeeded,
    Failed(ProviderErrorKind),
    /// The provider does not accept this request.
    Skipped,
}

/// A single provider step of a chain run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderAttempt {
    pub provider: &'static str,
    pub outcome: AttemptOutcome,
    /// Time spent in the provider call (microseconds).
    pub duration_us: u64,
}

/// Record of a chain run.
#[derive(Debug, Clone, Default)]
pub struct ChainTrace {
    /// Attempts in the order they were made.
    pub attempts: Vec<ProviderAttempt>,
    /// Whether the heuristic produced the result.
    pub used_heuristic: bool,
    /// Total chain duration (microseconds).
    pub duration_us: u64,
}

impl ChainTrace {
    /// Returns the providers that were actually called.
    pub fn attempted(&self) -> Vec<&'static str> {
        self.attempts
            .iter()
            .filter(|a| a.outcome != AttemptOutcome::Skipped)
            .map(|a| a.provider)
            .collect()
    }

    /// Returns the number of failed attempts.
    pub fn failures(&self) -> usize {
        self.attempts
            .iter()
            .filter(|a| matches!(a.outcome, AttemptOutcome::Failed(_)))
            .count()
    }
}
