//! Database readiness gate.
//!
//! The server must never accept traffic against a database that is still
//! initializing. [`ReadinessGate`] is the startup barrier that enforces
//! this: it polls a health probe at a fixed interval and only resolves
//! once the probe succeeds, so everything sequenced after it (migrations,
//! binding the listener) observes a database that is accepting
//! connections.
//!
//! The schedule mirrors a container-orchestrator health check:
//!
//! - a fixed interval between attempts,
//! - a per-attempt timeout,
//! - a start period during which failures are expected and do not count
//!   against the retry budget,
//! - a budget of consecutive counted failures after which the dependency
//!   is declared unhealthy.
//!
//! A successful probe opens the gate immediately, even inside the start
//! period. An exhausted budget aborts startup with [`GateExhausted`];
//! restart policy belongs to the surrounding orchestration, not this
//! process.

use std::fmt;
use std::future::Future;
use std::time::Duration;

use sqlx::PgPool;
use tokio::time::{Instant, sleep, timeout};

/// Probe schedule for a [`ReadinessGate`].
#[derive(Debug, Clone, Copy)]
pub struct ProbePolicy {
    /// Delay between the end of one attempt and the start of the next.
    pub interval: Duration,
    /// Maximum time a single probe attempt may run before it is treated
    /// as a failure.
    pub attempt_timeout: Duration,
    /// Grace window measured from the first attempt. Failures inside it
    /// do not consume the retry budget.
    pub start_period: Duration,
    /// Consecutive counted failures after which the gate gives up.
    pub retries: u32,
}

impl Default for ProbePolicy {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(5),
            attempt_timeout: Duration::from_secs(5),
            start_period: Duration::from_secs(10),
            retries: 5,
        }
    }
}

/// Outcome of a gate that opened: how long it took and what it observed.
#[derive(Debug, Clone, Copy)]
pub struct ReadyReport {
    /// Total probe attempts, including the successful one.
    pub attempts: u32,
    /// Failures that consumed retry budget (i.e. outside the start period).
    pub counted_failures: u32,
    /// Wall time from the first attempt to success.
    pub elapsed: Duration,
}

/// The probe kept failing until the retry budget ran out.
#[derive(Debug, thiserror::Error)]
#[error("database unhealthy after {attempts} probe attempts over {elapsed:?}: {last_error}")]
pub struct GateExhausted {
    /// Total probe attempts made.
    pub attempts: u32,
    /// Wall time from the first attempt to giving up.
    pub elapsed: Duration,
    /// Failure message from the final attempt.
    pub last_error: String,
}

/// Startup barrier that delays its caller until a dependency's health
/// probe succeeds.
#[derive(Debug, Clone)]
pub struct ReadinessGate {
    policy: ProbePolicy,
}

impl ReadinessGate {
    /// Creates a gate with the given probe schedule.
    #[must_use]
    pub fn new(policy: ProbePolicy) -> Self {
        Self { policy }
    }

    /// Polls `probe` until it succeeds or the retry budget is exhausted.
    ///
    /// Each attempt is bounded by the policy's `attempt_timeout`; a
    /// timeout counts as a failure. Failures within `start_period` of the
    /// first attempt are logged but not counted. The first success
    /// returns, so counted failures are consecutive by construction.
    ///
    /// # Errors
    ///
    /// Returns [`GateExhausted`] once `retries` counted failures have
    /// accumulated.
    pub async fn wait_for<F, Fut, E>(&self, mut probe: F) -> Result<ReadyReport, GateExhausted>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<(), E>>,
        E: fmt::Display,
    {
        let started = Instant::now();
        let mut attempts: u32 = 0;
        let mut counted_failures: u32 = 0;

        loop {
            attempts = attempts.saturating_add(1);

            let failure = match timeout(self.policy.attempt_timeout, probe()).await {
                Ok(Ok(())) => {
                    return Ok(ReadyReport {
                        attempts,
                        counted_failures,
                        elapsed: started.elapsed(),
                    });
                }
                Ok(Err(e)) => e.to_string(),
                Err(_) => format!(
                    "probe timed out after {:?}",
                    self.policy.attempt_timeout
                ),
            };

            if started.elapsed() < self.policy.start_period {
                tracing::debug!(
                    attempt = attempts,
                    error = %failure,
                    "probe failed within start period"
                );
            } else {
                counted_failures = counted_failures.saturating_add(1);
                tracing::warn!(
                    attempt = attempts,
                    counted = counted_failures,
                    budget = self.policy.retries,
                    error = %failure,
                    "database probe failed"
                );
                if counted_failures >= self.policy.retries {
                    return Err(GateExhausted {
                        attempts,
                        elapsed: started.elapsed(),
                        last_error: failure,
                    });
                }
            }

            sleep(self.policy.interval).await;
        }
    }
}

/// Health probe: executes a trivial query against the pool.
///
/// The code-level equivalent of `pg_isready` for the configured
/// user/database pair — the query only succeeds once the server accepts
/// connections and the credentials and database name resolve.
///
/// # Errors
///
/// Returns the underlying [`sqlx::Error`] when the database is not
/// reachable or not ready.
pub async fn ping(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use std::cell::Cell;

    use super::*;

    fn test_policy() -> ProbePolicy {
        ProbePolicy::default()
    }

    #[tokio::test(start_paused = true)]
    async fn opens_immediately_on_first_success() {
        let gate = ReadinessGate::new(test_policy());

        let result = gate
            .wait_for(|| async { Ok::<(), String>(()) })
            .await;

        let Ok(report) = result else {
            panic!("gate should open");
        };
        assert_eq!(report.attempts, 1);
        assert_eq!(report.counted_failures, 0);
        assert_eq!(report.elapsed, Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn success_during_start_period_opens_gate() {
        let gate = ReadinessGate::new(test_policy());
        let calls = Cell::new(0u32);

        // Fails once at t=0s, succeeds at t=5s — still inside the 10s grace.
        let result = gate
            .wait_for(|| {
                let n = calls.get() + 1;
                calls.set(n);
                async move {
                    if n >= 2 {
                        Ok(())
                    } else {
                        Err("connection refused".to_string())
                    }
                }
            })
            .await;

        let Ok(report) = result else {
            panic!("gate should open");
        };
        assert_eq!(report.attempts, 2);
        assert_eq!(report.counted_failures, 0);
        assert_eq!(report.elapsed, Duration::from_secs(5));
    }

    #[tokio::test(start_paused = true)]
    async fn grace_failures_do_not_consume_budget() {
        let gate = ReadinessGate::new(test_policy());
        let calls = Cell::new(0u32);

        // Attempts land at t = 0, 5, 10, 15; the first two are inside the
        // start period, so only the t=10 failure is counted.
        let result = gate
            .wait_for(|| {
                let n = calls.get() + 1;
                calls.set(n);
                async move {
                    if n >= 4 {
                        Ok(())
                    } else {
                        Err("starting up".to_string())
                    }
                }
            })
            .await;

        let Ok(report) = result else {
            panic!("gate should open");
        };
        assert_eq!(report.attempts, 4);
        assert_eq!(report.counted_failures, 1);
        assert_eq!(report.elapsed, Duration::from_secs(15));
    }

    #[tokio::test(start_paused = true)]
    async fn exhausts_budget_within_worst_case_bound() {
        let gate = ReadinessGate::new(test_policy());
        let calls = Cell::new(0u32);

        let result = gate
            .wait_for(|| {
                calls.set(calls.get() + 1);
                async { Err::<(), _>("connection refused".to_string()) }
            })
            .await;

        let Err(exhausted) = result else {
            panic!("gate should exhaust");
        };
        // Attempts at t = 0, 5 (grace) then 10, 15, 20, 25, 30 (counted).
        assert_eq!(exhausted.attempts, 7);
        assert_eq!(calls.get(), 7);
        assert_eq!(exhausted.elapsed, Duration::from_secs(30));
        // Declared worst case for the default schedule: 10s + 5 * 5s.
        assert!(exhausted.elapsed <= Duration::from_secs(35));
        assert!(exhausted.last_error.contains("connection refused"));
    }

    #[tokio::test(start_paused = true)]
    async fn hanging_probe_is_timed_out_and_counted() {
        let gate = ReadinessGate::new(test_policy());

        // Never resolves: every attempt burns the full 5s timeout. With
        // the 5s interval, attempts start at t = 0, 10, 20, 30, 40, 50 and
        // all but the first finish past the start period.
        let result = gate
            .wait_for(|| std::future::pending::<Result<(), String>>())
            .await;

        let Err(exhausted) = result else {
            panic!("gate should exhaust");
        };
        assert_eq!(exhausted.attempts, 6);
        assert!(exhausted.last_error.contains("timed out"));
    }

    #[tokio::test(start_paused = true)]
    async fn zero_start_period_counts_every_failure() {
        let gate = ReadinessGate::new(ProbePolicy {
            start_period: Duration::ZERO,
            retries: 2,
            ..test_policy()
        });

        let result = gate
            .wait_for(|| async { Err::<(), _>("no route to host".to_string()) })
            .await;

        let Err(exhausted) = result else {
            panic!("gate should exhaust");
        };
        assert_eq!(exhausted.attempts, 2);
        assert_eq!(exhausted.elapsed, Duration::from_secs(5));
    }
}
