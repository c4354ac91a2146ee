//! Restart supervision for watcher tasks.
//!
//! A watcher failure never propagates past the supervisor. Each failure is
//! logged and answered with a fresh attempt, optionally delayed by the
//! restart policy and by any server-provided retry-after hint.

use std::future::Future;
use std::time::{Duration, Instant};

use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use pradon_core::{CoreError, ErrorExt};

/// An attempt that survived this long resets the failure counter before
/// the next backoff is computed.
const STABLE_RUN_RESET: Duration = Duration::from_secs(60);

/// Restart scheduling for a supervised watcher.
///
/// The default restarts immediately and forever. A non-zero initial delay
/// turns on exponential backoff: the delay doubles per consecutive failure
/// up to `max_delay`.
#[derive(Debug, Clone)]
pub struct RestartPolicy {
    pub initial_delay: Duration,
    pub max_delay: Duration,
}

impl Default for RestartPolicy {
    fn default() -> Self {
        Self {
            initial_delay: Duration::ZERO,
            max_delay: Duration::from_secs(300),
        }
    }
}

impl RestartPolicy {
    pub fn with_initial_delay(initial_delay: Duration) -> Self {
        Self {
            initial_delay,
            ..Default::default()
        }
    }

    /// Delay before the next attempt, given a count of consecutive
    /// failures. A zero initial delay always yields zero.
    fn delay_for(&self, consecutive_failures: u32) -> Duration {
        if self.initial_delay.is_zero() || consecutive_failures == 0 {
            return Duration::ZERO;
        }
        let exponent = consecutive_failures.saturating_sub(1).min(16);
        let delay = self.initial_delay.saturating_mul(2u32.saturating_pow(exponent));
        delay.min(self.max_delay)
    }
}

/// Runs `run_attempt` forever, restarting after every exit, clean or
/// failed, until `shutdown` fires. Attempts exit cleanly only once they
/// observe cancellation, and the check at the top of the loop ends the
/// supervision right after.
pub async fn supervise<F, Fut>(
    name: &'static str,
    policy: RestartPolicy,
    shutdown: CancellationToken,
    mut run_attempt: F,
) where
    F: FnMut(CancellationToken) -> Fut,
    Fut: Future<Output = Result<(), CoreError>>,
{
    let mut consecutive_failures: u32 = 0;

    loop {
        if shutdown.is_cancelled() {
            break;
        }

        info!(watcher = name, attempt_failures = consecutive_failures, "starting watcher attempt");
        let started = Instant::now();

        match run_attempt(shutdown.clone()).await {
            Ok(()) => {
                consecutive_failures = 0;
            }
            Err(e) => {
                if started.elapsed() >= STABLE_RUN_RESET {
                    consecutive_failures = 0;
                }
                consecutive_failures = consecutive_failures.saturating_add(1);
                error!(
                    watcher = name,
                    error = %e,
                    failures = consecutive_failures,
                    "watcher failed, restarting"
                );

                let mut delay = policy.delay_for(consecutive_failures);
                if let Some(hint) = e.retry_after() {
                    // The server told us how long to stay away. Honor it as
                    // a lower bound.
                    delay = delay.max(hint);
                }

                if !delay.is_zero() {
                    warn!(
                        watcher = name,
                        delay_ms = delay.as_millis() as u64,
                        "delaying restart"
                    );
                    tokio::select! {
                        _ = shutdown.cancelled() => break,
                        _ = tokio::time::sleep(delay) => {}
                    }
                }
            }
        }
    }

    info!(watcher = name, "supervision ended");
}
