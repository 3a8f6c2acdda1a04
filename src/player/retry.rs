// SPDX-License-Identifier: MPL-2.0
//! Load-with-retry over a [`SourceLoader`].
//!
//! Failed loads are retried with exponential backoff. A load that was
//! interrupted by a newer load is not a failure and ends the loop silently.

use crate::application::port::SourceLoader;
use crate::config::{RecoveryConfig, MAX_MAX_LOAD_ATTEMPTS, MIN_MAX_LOAD_ATTEMPTS};
use crate::domain::error::EngineError;
use crate::domain::video::SourceDescriptor;
use std::time::Duration;

/// Attempt budget and backoff base.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
}

impl RetryPolicy {
    #[must_use]
    pub fn from_config(config: &RecoveryConfig) -> Self {
        Self {
            max_attempts: config
                .max_load_attempts
                .clamp(MIN_MAX_LOAD_ATTEMPTS, MAX_MAX_LOAD_ATTEMPTS),
            base_delay: Duration::from_millis(config.backoff_base_ms),
        }
    }

    /// Wait after failed attempt number `attempt` (1-based): `base * 2^attempt`.
    #[must_use]
    pub fn delay_after(&self, attempt: u32) -> Duration {
        self.base_delay
            .saturating_mul(2_u32.saturating_pow(attempt.min(16)))
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from_config(&RecoveryConfig::default())
    }
}

/// How a retried load ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    Loaded,
    /// A newer load took over; nothing to report.
    Superseded,
    /// Every attempt failed; carries the last error.
    Failed(EngineError),
}

/// Loads `source`, retrying failures per `policy`.
///
/// No wait follows the final attempt.
pub async fn load_with_retry<L>(
    loader: &L,
    source: &SourceDescriptor,
    policy: RetryPolicy,
) -> LoadOutcome
where
    L: SourceLoader + ?Sized,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut attempt = 1;
    loop {
        match loader.load(source).await {
            Ok(()) => {
                tracing::debug!(attempt, "source loaded");
                return LoadOutcome::Loaded;
            }
            Err(err) if err.is_interruption() => {
                tracing::debug!(attempt, "load superseded by a newer request");
                return LoadOutcome::Superseded;
            }
            Err(err) if attempt >= max_attempts => {
                tracing::error!(attempt, %err, "load failed, giving up");
                return LoadOutcome::Failed(err);
            }
            Err(err) => {
                let delay = policy.delay_after(attempt);
                tracing::warn!(attempt, %err, ?delay, "load failed, retrying");
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
        }
    }
}
