//! Pipeline configuration.
//!
//! Injected at construction; tests substitute deterministic fakes for
//! the capability ports without touching any global state.

use std::time::Duration;

/// What to substitute when the verification capability itself fails.
///
/// `FailOpen` passes the paper as reliable so a verification outage
/// never blocks the pipeline. A systemic outage then silently marks
/// every paper reliable, which is why the policy is explicit here and
/// logged loudly when it fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerificationFailurePolicy {
    /// Substitute a high-reliability pass-through
    FailOpen,
    /// Substitute low reliability, engaging the bounded correction loop
    FailClosed,
}

/// Configuration for one pipeline instance.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Maximum correction attempts per paper
    pub max_retries: u32,
    /// Time bound applied to each capability call
    pub call_timeout: Duration,
    /// Policy when the verification capability fails
    pub verification_failure_policy: VerificationFailurePolicy,
}

impl PipelineConfig {
    /// Create the default configuration
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With a correction-retry budget
    #[must_use]
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// With a per-call time bound
    #[must_use]
    pub fn with_call_timeout(mut self, timeout: Duration) -> Self {
        self.call_timeout = timeout;
        self
    }

    /// With a verification-failure policy
    #[must_use]
    pub fn with_verification_failure_policy(mut self, policy: VerificationFailurePolicy) -> Self {
        self.verification_failure_policy = policy;
        self
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            max_retries: 2,
            call_timeout: Duration::from_secs(180),
            verification_failure_policy: VerificationFailurePolicy::FailOpen,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = PipelineConfig::new();
        assert_eq!(config.max_retries, 2);
        assert_eq!(
            config.verification_failure_policy,
            VerificationFailurePolicy::FailOpen
        );
    }

    #[test]
    fn builder() {
        let config = PipelineConfig::new()
            .with_max_retries(0)
            .with_call_timeout(Duration::from_secs(5))
            .with_verification_failure_policy(VerificationFailurePolicy::FailClosed);
        assert_eq!(config.max_retries, 0);
        assert_eq!(config.call_timeout, Duration::from_secs(5));
        assert_eq!(
            config.verification_failure_policy,
            VerificationFailurePolicy::FailClosed
        );
    }
}
