//! Race coordinator.
//!
//! Launches one fetch task per source at the same time and resolves to the
//! first success, to `Exhausted` once every source has failed, or to
//! `TimedOut` when the global deadline passes first. Whatever is still in
//! flight at that point is aborted and never awaited.
//!
//! ```text
//! Pending ──first Success──▶ Winner
//!    │ ────all Failure─────▶ Exhausted
//!    └─────deadline────────▶ TimedOut
//! ```

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tokio::time::{Instant, sleep};

use super::fetch::{self, FetchOutcome};
use super::http::DEFAULT_TIMEOUT;
use super::models::{AttemptRecord, LookupPayload, LookupStatus, NormalizedAddress};
use super::source::SourceHandle;

/// Default global deadline for one resolution.
pub const DEFAULT_DEADLINE: Duration = Duration::from_secs(1);

// =============================================================================
// Options
// =============================================================================

/// Time budget for a race.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RaceOptions {
    /// Bound on each individual adapter call.
    pub per_call_timeout: Duration,
    /// Bound on the whole resolution, however many sources are pending.
    pub deadline: Duration,
}

impl Default for RaceOptions {
    fn default() -> Self {
        Self {
            per_call_timeout: DEFAULT_TIMEOUT,
            deadline: DEFAULT_DEADLINE,
        }
    }
}

impl RaceOptions {
    #[must_use]
    pub const fn new(per_call_timeout: Duration, deadline: Duration) -> Self {
        Self {
            per_call_timeout,
            deadline,
        }
    }
}

// =============================================================================
// Outcome
// =============================================================================

/// Terminal state of a race.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RaceOutcome {
    /// The first source to succeed.
    Winner(NormalizedAddress),
    /// Every source failed before the deadline.
    Exhausted,
    /// The deadline passed with no success.
    TimedOut,
}

impl RaceOutcome {
    /// The winning address, if any.
    #[must_use]
    pub const fn winner(&self) -> Option<&NormalizedAddress> {
        match self {
            Self::Winner(address) => Some(address),
            Self::Exhausted | Self::TimedOut => None,
        }
    }

    /// Short name for logs.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Winner(_) => "winner",
            Self::Exhausted => "exhausted",
            Self::TimedOut => "timed_out",
        }
    }
}

/// What a race resolved to, plus what it saw on the way.
#[derive(Debug, Clone)]
pub struct RaceReport {
    pub outcome: RaceOutcome,
    /// Fetch results received before resolution, in arrival order.
    pub attempts: Vec<AttemptRecord>,
    pub elapsed: Duration,
}

impl RaceReport {
    /// Convert into the renderable lookup payload.
    ///
    /// `Exhausted` and `TimedOut` both map to [`LookupStatus::Timeout`].
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn into_payload(self, cep: &str, deadline: Duration) -> LookupPayload {
        let (status, address) = match self.outcome {
            RaceOutcome::Winner(address) => (LookupStatus::Ok, Some(address)),
            RaceOutcome::Exhausted | RaceOutcome::TimedOut => (LookupStatus::Timeout, None),
        };

        LookupPayload {
            cep: cep.to_string(),
            status,
            address,
            elapsed_ms: self.elapsed.as_millis() as u64,
            deadline_ms: deadline.as_millis() as u64,
            attempts: self.attempts,
        }
    }
}

// =============================================================================
// Resolution
// =============================================================================

/// Race `sources` for `cep` and return exactly one outcome.
///
/// Returns as soon as the outcome is known: first success, all sources
/// failed, or deadline. Remaining tasks are aborted on return.
#[allow(clippy::cast_possible_truncation)]
pub async fn resolve(cep: &str, sources: &[SourceHandle], options: RaceOptions) -> RaceReport {
    let start = Instant::now();
    let deadline = sleep(options.deadline);
    tokio::pin!(deadline);

    // One slot per producer: every task sends exactly once, so none blocks.
    let (tx, mut rx) = mpsc::channel(sources.len().max(1));
    let mut tasks = JoinSet::new();
    let cep_shared: Arc<str> = Arc::from(cep);

    for handle in sources {
        tracing::debug!(source = %handle.label, cep, "Launching fetch task");
        fetch::spawn(
            &mut tasks,
            handle.clone(),
            Arc::clone(&cep_shared),
            options.per_call_timeout,
            tx.clone(),
        );
    }
    // Only the tasks hold senders now; the channel closes when they are done.
    drop(tx);

    let mut attempts = Vec::with_capacity(sources.len());
    let outcome = loop {
        tokio::select! {
            biased;
            delivery = rx.recv() => match delivery {
                Some(report) => {
                    attempts.push(report.to_record());
                    if let FetchOutcome::Success(address) = report.outcome {
                        break RaceOutcome::Winner(address);
                    }
                }
                None => break RaceOutcome::Exhausted,
            },
            () = &mut deadline => break RaceOutcome::TimedOut,
        }
    };

    rx.close();
    tasks.abort_all();

    let elapsed = start.elapsed();
    let elapsed_ms = elapsed.as_millis() as u64;
    match &outcome {
        RaceOutcome::Winner(address) => {
            tracing::info!(
                source = %address.source,
                cep,
                elapsed_ms,
                outcome = outcome.label(),
                "Race won"
            );
        }
        RaceOutcome::Exhausted => {
            tracing::info!(
                cep,
                elapsed_ms,
                outcome = outcome.label(),
                failed = attempts.len(),
                "All sources failed"
            );
        }
        RaceOutcome::TimedOut => {
            tracing::warn!(
                cep,
                elapsed_ms,
                outcome = outcome.label(),
                deadline_ms = options.deadline.as_millis() as u64,
                "Race deadline elapsed"
            );
        }
    }

    RaceReport {
        outcome,
        attempts,
        elapsed,
    }
}
