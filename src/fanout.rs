//! Fan-out/fan-in over a set of keys.
//!
//! Every key gets its own tokio task. Each task sends exactly one [`Outcome`]
//! into a channel sized to the number of keys, so sends never wait. The
//! collector drains the channel until every sender has been dropped, which only
//! happens once all tasks have finished; the returned collection is therefore
//! complete. Output order follows task completion and is not stable.

use crate::github::FetchError;
use std::{future::Future, num::NonZeroUsize, sync::Arc};
use tokio::sync::{mpsc, Semaphore};
use tracing::debug;

/// How many fetches may be in flight at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Concurrency {
    #[default]
    Unbounded,
    Limited(NonZeroUsize),
}

impl Concurrency {
    /// `0` means unbounded.
    #[must_use]
    pub fn from_limit(limit: usize) -> Self {
        NonZeroUsize::new(limit).map_or(Self::Unbounded, Self::Limited)
    }
}

/// Result of one fan-out task, tagged with the key it ran for.
#[derive(Debug)]
pub struct Outcome<T> {
    pub key: String,
    pub result: Result<T, FetchError>,
}

/// Run `fetch` once per key and gather every outcome.
///
/// A task that panics never reports, so its key is missing from the output just
/// like a failed fetch would be after [`successes`].
pub async fn fan_out<T, F, Fut>(
    keys: Vec<String>,
    concurrency: Concurrency,
    fetch: F,
) -> Vec<Outcome<T>>
where
    T: Send + 'static,
    F: Fn(String) -> Fut,
    Fut: Future<Output = Result<T, FetchError>> + Send + 'static,
{
    let total = keys.len();
    let (tx, mut rx) = mpsc::channel(total.max(1));

    let limiter = match concurrency {
        Concurrency::Unbounded => None,
        Concurrency::Limited(limit) => Some(Arc::new(Semaphore::new(limit.get()))),
    };

    for key in keys {
        let tx = tx.clone();
        let limiter = limiter.clone();
        let task = fetch(key.clone());

        tokio::spawn(async move {
            // Held until the fetch completes; the semaphore is never closed.
            let _permit = match limiter {
                Some(semaphore) => semaphore.acquire_owned().await.ok(),
                None => None,
            };

            let result = task.await;

            let _ = tx.send(Outcome { key, result }).await;
        });
    }

    // The channel closes once the last task drops its sender.
    drop(tx);

    let mut outcomes = Vec::with_capacity(total);
    while let Some(outcome) = rx.recv().await {
        outcomes.push(outcome);
    }

    debug!("fan-out finished: {} of {} tasks reported", outcomes.len(), total);

    outcomes
}

/// Keep successful results and silently drop failed keys.
pub fn successes<T>(outcomes: Vec<Outcome<T>>) -> Vec<T> {
    outcomes
        .into_iter()
        .filter_map(|outcome| match outcome.result {
            Ok(value) => Some(value),
            Err(e) => {
                debug!("dropping {}: {}", outcome.key, e);
                None
            }
        })
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::time::{sleep, Duration};

    fn keys(names: &[&str]) -> Vec<String> {
        names.iter().map(ToString::to_string).collect()
    }

    fn failure(key: &str) -> FetchError {
        FetchError::BaseUrl(key.to_string())
    }

    #[test]
    fn zero_limit_is_unbounded() {
        assert_eq!(Concurrency::from_limit(0), Concurrency::Unbounded);
        assert_eq!(
            Concurrency::from_limit(4),
            Concurrency::Limited(NonZeroUsize::new(4).unwrap())
        );
    }

    #[tokio::test]
    async fn every_key_reports_once() {
        let outcomes = fan_out(keys(&["a", "b", "c"]), Concurrency::Unbounded, |key| async move {
            Ok::<_, FetchError>(key.to_uppercase())
        })
        .await;

        let reported: HashSet<String> = outcomes.iter().map(|o| o.key.clone()).collect();
        let expected: HashSet<String> = keys(&["a", "b", "c"]).into_iter().collect();
        assert_eq!(outcomes.len(), 3);
        assert_eq!(reported, expected);
        assert!(outcomes
            .iter()
            .all(|o| o.result.as_ref().unwrap() == &o.key.to_uppercase()));
    }

    #[tokio::test]
    async fn failures_are_reported_then_dropped() {
        let outcomes = fan_out(keys(&["a", "b", "c"]), Concurrency::Unbounded, |key| async move {
            if key == "b" {
                Err(failure(&key))
            } else {
                Ok(key)
            }
        })
        .await;

        let failed: Vec<&str> = outcomes
            .iter()
            .filter(|o| o.result.is_err())
            .map(|o| o.key.as_str())
            .collect();
        assert_eq!(failed, vec!["b"]);

        let mut ok = successes(outcomes);
        ok.sort();
        assert_eq!(ok, vec!["a".to_string(), "c".to_string()]);
    }

    #[tokio::test]
    async fn empty_input_returns_nothing() {
        let outcomes = fan_out(Vec::new(), Concurrency::Unbounded, |key| async move {
            Ok::<_, FetchError>(key)
        })
        .await;
        assert!(outcomes.is_empty());
    }

    #[tokio::test]
    async fn panicking_task_is_missing_from_output() {
        let outcomes = fan_out(keys(&["a", "boom"]), Concurrency::Unbounded, |key| async move {
            assert_ne!(key, "boom", "task failure");
            Ok::<_, FetchError>(key)
        })
        .await;

        assert_eq!(outcomes.len(), 1);
        assert_eq!(outcomes[0].key, "a");
    }

    #[tokio::test]
    async fn limited_concurrency_caps_in_flight_fetches() {
        let in_flight = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));
        let names: Vec<String> = (0..12).map(|i| format!("user{i}")).collect();

        let outcomes = fan_out(
            names,
            Concurrency::from_limit(3),
            |key| {
                let in_flight = Arc::clone(&in_flight);
                let peak = Arc::clone(&peak);
                async move {
                    let now = in_flight.fetch_add(1, Ordering::SeqCst) + 1;
                    peak.fetch_max(now, Ordering::SeqCst);
                    sleep(Duration::from_millis(20)).await;
                    in_flight.fetch_sub(1, Ordering::SeqCst);
                    Ok::<_, FetchError>(key)
                }
            },
        )
        .await;

        assert_eq!(outcomes.len(), 12);
        assert!(peak.load(Ordering::SeqCst) <= 3);
        assert!(peak.load(Ordering::SeqCst) >= 1);
    }
}
