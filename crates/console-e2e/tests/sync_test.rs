// Tests for the condition poller and the transient-failure retrier
//
// These run without a browser; the probes and operations are plain
// closures with call counters. Timing assertions use generous bounds so
// a loaded CI machine does not produce false failures.

use std::cell::Cell;
use std::time::{Duration, Instant};

use console_e2e::{Error, ErrorKind, PollOptions, retry_on, wait_for};

fn stale() -> Error {
    Error::StaleElement("tree re-rendered".to_string())
}

// ============================================================================
// Condition poller
// ============================================================================

#[tokio::test]
async fn poller_returns_immediately_on_a_true_probe() {
    let calls = Cell::new(0u32);
    let started = Instant::now();

    wait_for(
        "probe already true",
        PollOptions::new(Duration::from_secs(1), Duration::from_millis(300)),
        || {
            calls.set(calls.get() + 1);
            async { Ok(true) }
        },
    )
    .await
    .expect("an already-true probe must succeed");

    assert_eq!(calls.get(), 1);
    // no sleep may have happened
    assert!(started.elapsed() < Duration::from_millis(300));
}

#[tokio::test]
async fn poller_succeeds_as_soon_as_the_probe_turns_true() {
    // timeout 1.0s, interval 0.3s, probe false/false/true
    let calls = Cell::new(0u32);
    let started = Instant::now();

    wait_for(
        "third probe turns true",
        PollOptions::new(Duration::from_secs(1), Duration::from_millis(300)),
        || {
            calls.set(calls.get() + 1);
            let done = calls.get() >= 3;
            async move { Ok(done) }
        },
    )
    .await
    .expect("probe turned true before the timeout");

    let elapsed = started.elapsed();
    assert_eq!(calls.get(), 3, "probe must be evaluated exactly 3 times");
    assert!(
        elapsed >= Duration::from_millis(600),
        "two intervals must have been slept, got {elapsed:?}"
    );
    assert!(
        elapsed < Duration::from_secs(1),
        "success must not wait for the timeout, got {elapsed:?}"
    );
}

#[tokio::test]
async fn poller_times_out_on_a_never_true_probe() {
    let calls = Cell::new(0u32);
    let timeout = Duration::from_millis(200);
    let interval = Duration::from_millis(50);
    let started = Instant::now();

    let err = wait_for("condition that never holds", PollOptions::new(timeout, interval), || {
        calls.set(calls.get() + 1);
        async { Ok(false) }
    })
    .await
    .expect_err("a never-true probe must time out");

    let elapsed = started.elapsed();
    assert_eq!(err.kind(), ErrorKind::Timeout);
    match err {
        Error::Timeout { condition, waited } => {
            assert!(condition.contains("never holds"));
            assert!(waited >= timeout);
        }
        other => panic!("expected Timeout, got {other:?}"),
    }
    assert!(elapsed >= timeout, "failure before the timeout, after {elapsed:?}");
    // no later than timeout + one interval, with slack for scheduling
    assert!(
        elapsed < timeout + interval + Duration::from_millis(200),
        "failure came too late, after {elapsed:?}"
    );
    assert!(calls.get() >= 2, "probe must have been re-evaluated");
}

#[tokio::test]
async fn poller_propagates_a_probe_error() {
    let calls = Cell::new(0u32);

    let err = wait_for("probe that explodes", PollOptions::default(), || {
        calls.set(calls.get() + 1);
        async { Err(Error::Assertion("probe exploded".to_string())) }
    })
    .await
    .expect_err("a failing probe must propagate");

    assert_eq!(calls.get(), 1, "no retry on a probe error");
    assert!(matches!(err, Error::Assertion(_)));
}

// ============================================================================
// Transient-failure retrier
// ============================================================================

#[tokio::test]
async fn retrier_returns_the_first_success() {
    // stale on attempts 1-4, succeeds with 42 on attempt 5
    let calls = Cell::new(0u32);

    let value = retry_on(ErrorKind::Stale, 5, || {
        calls.set(calls.get() + 1);
        let attempt = calls.get();
        async move {
            if attempt <= 4 {
                Err(stale())
            } else {
                Ok(42)
            }
        }
    })
    .await
    .expect("fifth attempt succeeds within the budget");

    assert_eq!(value, 42);
    assert_eq!(calls.get(), 5, "exactly k+1 invocations");
}

#[tokio::test]
async fn retrier_does_not_retry_after_a_success() {
    let calls = Cell::new(0u32);

    let value = retry_on(ErrorKind::Stale, 50, || {
        calls.set(calls.get() + 1);
        async { Ok("ready") }
    })
    .await
    .expect("first attempt succeeds");

    assert_eq!(value, "ready");
    assert_eq!(calls.get(), 1, "first success wins");
}

#[tokio::test]
async fn retrier_gives_up_after_the_budget() {
    let calls = Cell::new(0u32);

    let err = retry_on(ErrorKind::Stale, 3, || {
        calls.set(calls.get() + 1);
        async { Err::<(), _>(stale()) }
    })
    .await
    .expect_err("a permanently stale operation must exhaust the budget");

    assert_eq!(calls.get(), 3, "exactly the budget number of invocations");
    assert_eq!(err.kind(), ErrorKind::ExhaustedRetries);
    match err {
        Error::ExhaustedRetries { attempts, kind } => {
            assert_eq!(attempts, 3);
            assert_eq!(kind, ErrorKind::Stale);
        }
        other => panic!("expected ExhaustedRetries, got {other:?}"),
    }
}

#[tokio::test]
async fn retrier_propagates_other_error_kinds_unchanged() {
    let calls = Cell::new(0u32);

    let err = retry_on(ErrorKind::Stale, 50, || {
        calls.set(calls.get() + 1);
        async {
            Err::<(), _>(Error::ElementNotFound {
                selector: "#gone".to_string(),
            })
        }
    })
    .await
    .expect_err("a non-transient failure must propagate");

    assert_eq!(calls.get(), 1, "no retry for a foreign error kind");
    assert_eq!(err.kind(), ErrorKind::NotFound);
    match err {
        Error::ElementNotFound { selector } => assert_eq!(selector, "#gone"),
        other => panic!("expected ElementNotFound, got {other:?}"),
    }
}

#[tokio::test]
async fn retrier_with_a_zero_budget_never_invokes_the_operation() {
    let calls = Cell::new(0u32);

    let err = retry_on(ErrorKind::Stale, 0, || {
        calls.set(calls.get() + 1);
        async { Ok(()) }
    })
    .await
    .expect_err("a zero budget cannot succeed");

    assert_eq!(calls.get(), 0);
    assert_eq!(err.kind(), ErrorKind::ExhaustedRetries);
}
