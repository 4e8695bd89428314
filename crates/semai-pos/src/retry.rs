//! # Commit Retry Policy
//!
//! Bounded retry for the transactional commits (checkout, invoice issue).
//!
//! ## Rules
//! - Only transient store errors retry (`DbError::is_transient()`);
//!   validation and constraint failures surface immediately
//! - At most [`MAX_COMMIT_ATTEMPTS`] attempts with a short linear backoff
//! - Idempotency comes from the client-generated draft id: if an attempt
//!   actually committed but its acknowledgement was lost, the replay trips
//!   the primary key and is reported as [`CommitOutcome::Replayed`] so the
//!   caller can load the committed row instead of double-charging

use std::future::Future;
use std::time::Duration;

use tracing::warn;

use semai_db::{DbError, DbResult};

/// Maximum commit attempts, first try included.
pub(crate) const MAX_COMMIT_ATTEMPTS: u32 = 3;

/// How a guarded commit ended.
#[derive(Debug)]
pub(crate) enum CommitOutcome<T> {
    /// This attempt wrote the rows.
    Fresh(T),
    /// A duplicate-id rejection after a transient failure: an earlier
    /// attempt committed. The caller should fetch by id.
    Replayed,
}

/// Runs `commit` with the retry policy above.
pub(crate) async fn commit_with_retry<T, F, Fut>(
    what: &str,
    mut commit: F,
) -> DbResult<CommitOutcome<T>>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = DbResult<T>>,
{
    let mut saw_transient = false;

    for attempt in 1..=MAX_COMMIT_ATTEMPTS {
        match commit().await {
            Ok(value) => return Ok(CommitOutcome::Fresh(value)),

            Err(e) if e.is_transient() && attempt < MAX_COMMIT_ATTEMPTS => {
                warn!(what, attempt, error = %e, "Transient store failure, retrying commit");
                saw_transient = true;
                tokio::time::sleep(Duration::from_millis(50 * attempt as u64)).await;
            }

            Err(DbError::UniqueViolation { .. }) if saw_transient => {
                // The "failed" earlier attempt actually landed
                warn!(what, attempt, "Duplicate id on retry; treating as committed");
                return Ok(CommitOutcome::Replayed);
            }

            Err(e) => return Err(e),
        }
    }

    // Last attempt was transient too
    Err(DbError::Busy(format!("{what}: gave up after {MAX_COMMIT_ATTEMPTS} attempts")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[tokio::test]
    async fn test_first_success_needs_one_attempt() {
        let calls = AtomicU32::new(0);
        let outcome = commit_with_retry("test", || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Ok::<_, DbError>(42) }
        })
        .await
        .unwrap();

        assert!(matches!(outcome, CommitOutcome::Fresh(42)));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_transient_then_success() {
        let calls = AtomicU32::new(0);
        let outcome = commit_with_retry("test", || {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            async move {
                if n == 0 {
                    Err(DbError::Busy("database is locked".into()))
                } else {
                    Ok(7)
                }
            }
        })
        .await
        .unwrap();

        assert!(matches!(outcome, CommitOutcome::Fresh(7)));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_duplicate_after_transient_is_replay() {
        let calls = AtomicU32::new(0);
        let outcome = commit_with_retry("test", || {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            async move {
                if n == 0 {
                    Err::<i32, _>(DbError::Busy("database is locked".into()))
                } else {
                    Err(DbError::UniqueViolation {
                        field: "sales.id".into(),
                        value: "unknown".into(),
                    })
                }
            }
        })
        .await
        .unwrap();

        assert!(matches!(outcome, CommitOutcome::Replayed));
    }

    #[tokio::test]
    async fn test_deterministic_errors_do_not_retry() {
        let calls = AtomicU32::new(0);
        let err = commit_with_retry("test", || {
            calls.fetch_add(1, Ordering::SeqCst);
            async {
                Err::<i32, _>(DbError::StockConflict {
                    product_id: "p-1".into(),
                    requested: 2,
                })
            }
        })
        .await
        .unwrap_err();

        assert!(matches!(err, DbError::StockConflict { .. }));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_gives_up_after_max_attempts() {
        let calls = AtomicU32::new(0);
        let err = commit_with_retry("test", || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err::<i32, _>(DbError::PoolExhausted) }
        })
        .await
        .unwrap_err();

        assert!(err.is_transient());
        assert_eq!(calls.load(Ordering::SeqCst), MAX_COMMIT_ATTEMPTS);
    }
}
