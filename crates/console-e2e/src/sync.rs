// Polling and retry primitives
//
// The console front-end is rendered by jQuery and Angular, which keep
// mutating the DOM after navigation. Everything the page facades do is
// built on these two mechanisms: wait for an observable condition to
// become true, and re-run an interaction from scratch when the page
// replaced an element mid-flight.

use std::future::Future;
use std::time::{Duration, Instant};

use crate::error::{Error, ErrorKind, Result};

/// Default budget for [`wait_for`]
pub const DEFAULT_POLL_TIMEOUT: Duration = Duration::from_secs(10);

/// Default interval between probe evaluations
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(300);

/// Default attempt budget for [`retry_on`]
pub const DEFAULT_RETRY_BUDGET: usize = 50;

/// Timeout/interval pair for [`wait_for`].
#[derive(Debug, Clone, Copy)]
pub struct PollOptions {
    pub timeout: Duration,
    pub poll_interval: Duration,
}

impl Default for PollOptions {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_POLL_TIMEOUT,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

impl PollOptions {
    pub fn new(timeout: Duration, poll_interval: Duration) -> Self {
        Self {
            timeout,
            poll_interval,
        }
    }

    /// Default interval with a caller-supplied timeout.
    pub fn timeout(timeout: Duration) -> Self {
        Self {
            timeout,
            ..Self::default()
        }
    }
}

/// Repeatedly evaluates `probe` until it returns true or `opts.timeout`
/// elapses.
///
/// The probe is treated as opaque; it may run scripts against the live
/// session. Returns as soon as the probe first reports true. A false
/// probe sleeps one interval and re-evaluates, so failure comes no
/// earlier than the timeout and no later than one interval past it. A
/// probe error propagates immediately.
///
/// `condition` is a human-readable description carried into the
/// [`Error::Timeout`] diagnostic.
pub async fn wait_for<F, Fut>(condition: &str, opts: PollOptions, mut probe: F) -> Result<()>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<bool>>,
{
    let start = Instant::now();
    loop {
        if probe().await? {
            return Ok(());
        }
        let waited = start.elapsed();
        if waited >= opts.timeout {
            return Err(Error::Timeout {
                condition: condition.to_string(),
                waited,
            });
        }
        tokio::time::sleep(opts.poll_interval).await;
    }
}

/// Invokes `op` until it succeeds, absorbing failures of exactly the
/// declared transient `kind`.
///
/// First success wins. An error of any other kind propagates unchanged
/// after a single invocation. Retries are immediate, with no backoff;
/// after `budget` failing invocations the retrier gives up with
/// [`Error::ExhaustedRetries`].
///
/// The operation may have performed partial work before failing (a
/// half-done click, say); nothing is rolled back here, so operations
/// handed to this function must be idempotent or resumable.
pub async fn retry_on<T, F, Fut>(kind: ErrorKind, budget: usize, mut op: F) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let mut attempts = 0;
    loop {
        if attempts == budget {
            return Err(Error::ExhaustedRetries { attempts, kind });
        }
        attempts += 1;
        match op().await {
            Err(err) if err.kind() == kind => continue,
            other => return other,
        }
    }
}
