//! Environment-driven harness settings

use std::path::PathBuf;
use std::time::Duration;

use super::{Error, Result};

/// Set to `YES` to echo every dispatched command and its output
pub const TRACE_VAR: &str = "DEBUGGER_TEST_TRACE";

/// Root of the test tree; sessions change into `<root>/<test dir>`
pub const TEST_ROOT_VAR: &str = "DEBUGGER_TEST_ROOT";

/// Maximum attempts for commands that launch the inferior
pub const MAX_LAUNCH_COUNT_VAR: &str = "DEBUGGER_TEST_MAX_LAUNCH_COUNT";

/// Seconds to wait after each launch attempt
pub const TIME_WAIT_VAR: &str = "DEBUGGER_TEST_TIME_WAIT";

const DEFAULT_MAX_LAUNCH_COUNT: u32 = 3;
const DEFAULT_TIME_WAIT: Duration = Duration::from_secs(1);

/// Harness settings read from the environment
#[derive(Debug, Clone, PartialEq)]
pub struct HarnessEnv {
    /// Echo commands and output regardless of per-call settings
    pub trace: bool,
    /// Relocate the working directory under this root during setup
    pub test_root: Option<PathBuf>,
    /// Attempts for launch-class commands
    pub max_launch_count: u32,
    /// Pause after each launch attempt
    pub time_wait: Duration,
}

impl Default for HarnessEnv {
    fn default() -> Self {
        Self {
            trace: false,
            test_root: None,
            max_launch_count: DEFAULT_MAX_LAUNCH_COUNT,
            time_wait: DEFAULT_TIME_WAIT,
        }
    }
}

impl HarnessEnv {
    /// Read settings from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read settings through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut env = Self::default();

        env.trace = lookup(TRACE_VAR)
            .map(|v| v.trim().eq_ignore_ascii_case("yes"))
            .unwrap_or(false);

        env.test_root = lookup(TEST_ROOT_VAR)
            .filter(|v| !v.is_empty())
            .map(PathBuf::from);

        if let Some(raw) = lookup(MAX_LAUNCH_COUNT_VAR) {
            let count: u32 = raw.trim().parse().map_err(|_| {
                Error::Config(format!("{} must be a positive integer, got '{}'", MAX_LAUNCH_COUNT_VAR, raw))
            })?;
            if count == 0 {
                return Err(Error::Config(format!("{} must be at least 1", MAX_LAUNCH_COUNT_VAR)));
            }
            env.max_launch_count = count;
        }

        if let Some(raw) = lookup(TIME_WAIT_VAR) {
            let secs: f64 = raw.trim().parse().map_err(|_| {
                Error::Config(format!("{} must be a number of seconds, got '{}'", TIME_WAIT_VAR, raw))
            })?;
            env.time_wait = Duration::try_from_secs_f64(secs).map_err(|_| {
                Error::Config(format!("{} must be a non-negative duration, got '{}'", TIME_WAIT_VAR, raw))
            })?;
        }

        Ok(env)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let env = HarnessEnv::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(env, HarnessEnv::default());
        assert_eq!(env.max_launch_count, 3);
        assert_eq!(env.time_wait, Duration::from_secs(1));
        assert!(!env.trace);
    }

    #[test]
    fn test_overrides() {
        let env = HarnessEnv::from_lookup(lookup_from(&[
            (TRACE_VAR, "YES"),
            (TEST_ROOT_VAR, "/srv/tests"),
            (MAX_LAUNCH_COUNT_VAR, "5"),
            (TIME_WAIT_VAR, "0.25"),
        ]))
        .unwrap();

        assert!(env.trace);
        assert_eq!(env.test_root, Some(PathBuf::from("/srv/tests")));
        assert_eq!(env.max_launch_count, 5);
        assert_eq!(env.time_wait, Duration::from_millis(250));
    }

    #[test]
    fn test_trace_requires_yes() {
        let env = HarnessEnv::from_lookup(lookup_from(&[(TRACE_VAR, "1")])).unwrap();
        assert!(!env.trace);
    }

    #[test]
    fn test_malformed_numbers_are_config_errors() {
        let err = HarnessEnv::from_lookup(lookup_from(&[(MAX_LAUNCH_COUNT_VAR, "three")])).unwrap_err();
        assert!(matches!(err, Error::Config(_)));

        let err = HarnessEnv::from_lookup(lookup_from(&[(MAX_LAUNCH_COUNT_VAR, "0")])).unwrap_err();
        assert!(matches!(err, Error::Config(_)));

        let err = HarnessEnv::from_lookup(lookup_from(&[(TIME_WAIT_VAR, "-1")])).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
