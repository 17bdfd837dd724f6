//! Continue a freshly launched process until it stops in a given function

use std::time::Duration;

use crate::common::logging::trace_line;
use crate::common::Result;
use crate::engine::{Process, StopReason};

/// Bounds for [`break_at_function`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    /// Resumes attempted before giving up
    pub max_iterations: u32,
    /// Pause before each resume
    pub interval: Duration,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            max_iterations: 10,
            interval: Duration::from_secs(1),
        }
    }
}

/// Poll `process` until thread 0 is stopped at a breakpoint in `func`
///
/// Returns `Ok(false)` once `policy.max_iterations` resumes have gone by
/// without a match. Engine errors from resuming are propagated.
pub async fn break_at_function(
    process: &mut dyn Process,
    func: &str,
    policy: PollPolicy,
    trace: bool,
) -> Result<bool> {
    let mut count = 0;
    loop {
        if let Some(thread) = process.thread_at_index(0) {
            let reason = thread.stop_reason();
            if trace {
                trace_line("StopReason =", reason);
            }

            if reason == StopReason::Breakpoint {
                let name = thread.frame_at_index(0).and_then(|frame| frame.function_name());
                if trace {
                    trace_line("function =", name.as_deref().unwrap_or("<unknown>"));
                }
                if name.as_deref() == Some(func) {
                    return Ok(true);
                }
            }
        }

        // The inferior is in a transient state; continue it
        tokio::time::sleep(policy.interval).await;
        if trace {
            trace_line("Continuing the process", "");
        }
        process.resume()?;

        count += 1;
        if count >= policy.max_iterations {
            tracing::warn!(func, iterations = count, "gave up waiting for breakpoint");
            if trace {
                trace_line(&format!("Reached {} iterations, giving up...", count), "");
            }
            return Ok(false);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::scripted::{ScriptedProcess, Stop};
    use tokio::time::Instant;

    fn assert_elapsed(started: Instant, expected: Duration) {
        let elapsed = started.elapsed();
        assert!(
            elapsed >= expected && elapsed < expected + Duration::from_millis(50),
            "elapsed {:?}, expected {:?}",
            elapsed,
            expected
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_immediate_match_does_not_resume() {
        let mut process = ScriptedProcess::new([Stop::breakpoint("main")]);
        let observer = process.clone();
        let started = Instant::now();

        let hit = break_at_function(&mut process, "main", PollPolicy::default(), false)
            .await
            .unwrap();

        assert!(hit);
        assert_eq!(observer.resume_count(), 0);
        assert_elapsed(started, Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_match_after_transient_stops() {
        let mut process = ScriptedProcess::new([
            Stop::new(StopReason::Signal, Some("_start")),
            Stop::breakpoint("helper"),
            Stop::breakpoint("main"),
        ]);
        let observer = process.clone();

        let hit = break_at_function(&mut process, "main", PollPolicy::default(), false)
            .await
            .unwrap();

        assert!(hit);
        assert_eq!(observer.resume_count(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_gives_up_after_ten_iterations() {
        let mut process = ScriptedProcess::new([Stop::breakpoint("helper")]);
        let observer = process.clone();
        let started = Instant::now();

        let hit = break_at_function(&mut process, "main", PollPolicy::default(), false)
            .await
            .unwrap();

        assert!(!hit);
        assert_eq!(observer.resume_count(), 10);
        assert_elapsed(started, Duration::from_secs(10));
    }

    #[tokio::test(start_paused = true)]
    async fn test_policy_is_overridable() {
        let mut process = ScriptedProcess::new([Stop::new(StopReason::Trace, None)]);
        let observer = process.clone();
        let policy = PollPolicy {
            max_iterations: 3,
            interval: Duration::from_millis(100),
        };
        let started = Instant::now();

        let hit = break_at_function(&mut process, "main", policy, false).await.unwrap();

        assert!(!hit);
        assert_eq!(observer.resume_count(), 3);
        assert_elapsed(started, Duration::from_millis(300));
    }
}
