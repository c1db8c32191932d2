//! Uniform retry wrapper around workflow calls
//!
//! Every action runs under the same policy: on any error, sleep a uniform
//! random pause drawn from the configured bounds, then re-invoke, up to the
//! attempt cap. Exhaustion yields the caller-supplied default. No backoff and
//! no error classification.

use rand::Rng;
use std::future::Future;
use std::time::Duration;
use tracing::{error, warn};

use crate::config::FarmerConfig;
use crate::error::FarmerResult;

/// Retry policy shared by all per-account actions
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Maximum invocations of the wrapped operation
    pub max_attempts: u32,
    /// Pause bounds in seconds, inclusive
    pub pause_secs: [u64; 2],
}

impl RetryPolicy {
    pub fn from_config(config: &FarmerConfig) -> Self {
        Self {
            max_attempts: config.attempts,
            pause_secs: config.pause_between_attempts,
        }
    }
}

/// Draw a uniform random pause from [min, max] seconds, inclusive
pub fn sample_pause(bounds: [u64; 2]) -> Duration {
    let secs = rand::thread_rng().gen_range(bounds[0]..=bounds[1]);
    Duration::from_secs(secs)
}

/// Run `op` under `policy`, returning `default` once attempts are exhausted.
///
/// The pause is slept after every failure, including the last one, before
/// the default is returned.
pub async fn with_retry<T, F, Fut>(policy: &RetryPolicy, default: T, label: &str, mut op: F) -> T
where
    F: FnMut() -> Fut,
    Fut: Future<Output = FarmerResult<T>>,
{
    for attempt in 1..=policy.max_attempts {
        match op().await {
            Ok(value) => return value,
            Err(e) => {
                let pause = sample_pause(policy.pause_secs);
                warn!(
                    "{} failed (attempt {}/{}): {}. Waiting {}s",
                    label,
                    attempt,
                    policy.max_attempts,
                    e,
                    pause.as_secs()
                );
                tokio::time::sleep(pause).await;
            }
        }
    }

    error!("{} exhausted {} attempts", label, policy.max_attempts);
    default
}
