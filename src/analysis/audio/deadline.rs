use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::Duration;

/// Outcome of a job that may run past its deadline.
#[derive(Debug)]
pub(crate) enum Deadline<T> {
    Finished(T),
    TimedOut(Duration),
    /// The job panicked or its worker could not be started.
    Failed(String),
}

/// Run `job` on a dedicated thread and wait at most `timeout` for its result.
///
/// With no timeout the job runs inline. A job that outlives its deadline keeps running
/// detached and its result is dropped when it finishes. Panics are caught in both modes.
pub(crate) fn run_with_deadline<T, F>(timeout: Option<Duration>, job: F) -> Deadline<T>
where
    T: Send + 'static,
    F: FnOnce() -> T + Send + 'static,
{
    let Some(timeout) = timeout else {
        return match catch_unwind(AssertUnwindSafe(job)) {
            Ok(value) => Deadline::Finished(value),
            Err(payload) => Deadline::Failed(panic_to_string(payload)),
        };
    };
    let (tx, rx) = mpsc::sync_channel(1);
    let spawned = thread::Builder::new()
        .name("remixid-decode".to_string())
        .spawn(move || {
            let outcome = catch_unwind(AssertUnwindSafe(job)).map_err(panic_to_string);
            let _ = tx.send(outcome);
        });
    if let Err(err) = spawned {
        return Deadline::Failed(format!("could not start decode worker: {err}"));
    }
    match rx.recv_timeout(timeout) {
        Ok(Ok(value)) => Deadline::Finished(value),
        Ok(Err(message)) => Deadline::Failed(message),
        Err(RecvTimeoutError::Timeout) => Deadline::TimedOut(timeout),
        Err(RecvTimeoutError::Disconnected) => {
            Deadline::Failed("decode worker exited without a result".to_string())
        }
    }
}

fn panic_to_string(payload: Box<dyn std::any::Any + Send>) -> String {
    let message = if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_string()
    };
    format!("decoder panicked: {message}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    #[test]
    fn fast_job_finishes() {
        let out = run_with_deadline(Some(Duration::from_secs(5)), || 41 + 1);
        assert!(matches!(out, Deadline::Finished(42)));
    }

    #[test]
    fn slow_job_times_out_with_its_deadline() {
        let limit = Duration::from_millis(20);
        let out = run_with_deadline(Some(limit), || {
            thread::sleep(Duration::from_millis(500));
            1
        });
        assert!(matches!(out, Deadline::TimedOut(d) if d == limit));
    }

    #[test]
    fn no_deadline_runs_inline() {
        let id = thread::current().id();
        let out = run_with_deadline(None, move || thread::current().id() == id);
        assert!(matches!(out, Deadline::Finished(true)));
    }

    #[test]
    fn panicking_worker_fails_without_waiting_for_the_deadline() {
        let started = Instant::now();
        let out: Deadline<u32> =
            run_with_deadline(Some(Duration::from_secs(30)), || panic!("decoder blew up"));
        assert!(started.elapsed() < Duration::from_secs(10));
        match out {
            Deadline::Failed(reason) => assert!(reason.contains("decoder blew up"), "{reason}"),
            other => panic!("expected failure, got {other:?}"),
        }
    }

    #[test]
    fn inline_panic_is_caught() {
        let out: Deadline<u32> = run_with_deadline(None, || panic!("inline {}", 7));
        assert!(matches!(out, Deadline::Failed(reason) if reason.contains("inline 7")));
    }
}
