//! Fetch tasks: one adapter call as an independent unit of work.
//!
//! A fetch task bounds the adapter call with the per-call timeout, tags a
//! success with the source label, and turns every error into
//! [`FetchOutcome::Failure`]. Nothing escapes the task as an `Err`.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tokio::time::{Instant, timeout};

use super::models::{AttemptRecord, NormalizedAddress};
use super::source::SourceHandle;
use crate::error::CepError;

// =============================================================================
// Fetch Outcome
// =============================================================================

/// What a single fetch task produced.
#[derive(Debug)]
pub enum FetchOutcome {
    /// The source answered with a usable address.
    Success(NormalizedAddress),
    /// The source failed; the race keeps waiting on the others.
    Failure { source: String, error: CepError },
}

impl FetchOutcome {
    /// Label of the source this outcome came from.
    #[must_use]
    pub fn source(&self) -> &str {
        match self {
            Self::Success(address) => &address.source,
            Self::Failure { source, .. } => source,
        }
    }

    /// Whether the fetch succeeded.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }
}

/// A finished fetch task: its outcome plus how long it took.
#[derive(Debug)]
pub struct FetchReport {
    pub outcome: FetchOutcome,
    pub duration: Duration,
}

impl FetchReport {
    /// Summarize this report for output.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn to_record(&self) -> AttemptRecord {
        let (error, error_code) = match &self.outcome {
            FetchOutcome::Success(_) => (None, None),
            FetchOutcome::Failure { error, .. } => {
                (Some(error.to_string()), Some(error.error_code().to_string()))
            }
        };

        AttemptRecord {
            source: self.outcome.source().to_string(),
            success: self.outcome.is_success(),
            duration_ms: self.duration.as_millis() as u64,
            error,
            error_code,
        }
    }
}

// =============================================================================
// Execution
// =============================================================================

/// Run one adapter call to completion and contain its result.
#[allow(clippy::cast_possible_truncation)]
pub async fn run(handle: &SourceHandle, cep: &str, per_call_timeout: Duration) -> FetchReport {
    let start = Instant::now();

    let result = match timeout(per_call_timeout, handle.adapter.lookup(cep)).await {
        Ok(result) => result,
        Err(_) => Err(CepError::Timeout {
            millis: per_call_timeout.as_millis() as u64,
        }),
    };
    let duration = start.elapsed();
    let duration_ms = duration.as_millis() as u64;

    let outcome = match result {
        Ok(address) => {
            tracing::debug!(source = %handle.label, cep, duration_ms, "Source answered");
            FetchOutcome::Success(address.attributed(handle.label.as_str()))
        }
        Err(error) => {
            tracing::warn!(
                source = %handle.label,
                cep,
                duration_ms,
                error = %error,
                code = error.error_code(),
                "Source failed"
            );
            FetchOutcome::Failure {
                source: handle.label.clone(),
                error,
            }
        }
    };

    FetchReport { outcome, duration }
}

/// Spawn a fetch task onto `tasks`, delivering its report through `tx`.
///
/// The task owns a sender clone; once every task has finished (or been
/// aborted) the channel closes. A send after the receiver is gone is
/// dropped.
pub fn spawn(
    tasks: &mut JoinSet<()>,
    handle: SourceHandle,
    cep: Arc<str>,
    per_call_timeout: Duration,
    tx: mpsc::Sender<FetchReport>,
) {
    tasks.spawn(async move {
        let report = run(&handle, &cep, per_call_timeout).await;
        if tx.send(report).await.is_err() {
            tracing::trace!(source = %handle.label, "Race already resolved, discarding outcome");
        }
    });
}
