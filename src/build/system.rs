//! Running OS commands on behalf of tests

use std::collections::HashMap;
use std::path::Path;
use std::process::Stdio;

use tokio::process::Command;

use crate::common::logging::trace_line;
use crate::common::{Error, Result};

/// Run `program` with `args` and return its stdout
///
/// `dir` sets the working directory and `env` adds variables on top of the
/// inherited environment. A non-zero exit is an error carrying the output.
pub async fn system(
    program: &str,
    args: &[String],
    dir: Option<&Path>,
    env: &HashMap<String, String>,
    trace: bool,
) -> Result<String> {
    let resolved = which::which(program)
        .map_err(|_| Error::Config(format!("'{}' not found in PATH", program)))?;

    let mut cmd = Command::new(&resolved);
    cmd.args(args)
        .envs(env)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());
    if let Some(dir) = dir {
        cmd.current_dir(dir);
    }

    let command_line = std::iter::once(program.to_string())
        .chain(args.iter().cloned())
        .collect::<Vec<_>>()
        .join(" ");
    tracing::debug!(command = %command_line, "running OS command");

    let output = cmd.output().await.map_err(|e| {
        Error::Config(format!("Failed to execute '{}': {}", command_line, e))
    })?;

    let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
    let stderr = String::from_utf8_lossy(&output.stderr).into_owned();

    if trace {
        eprintln!();
        trace_line("os command:", &command_line);
        trace_line("stdout:", &stdout);
        trace_line("stderr:", &stderr);
        trace_line("retcode:", format!("{:?}", output.status.code()));
        eprintln!();
    }

    if !output.status.success() {
        return Err(Error::CommandFailed {
            command: command_line,
            code: output.status.code(),
            output: format!("{}{}", stdout, stderr).trim().to_string(),
        });
    }

    Ok(stdout)
}

/// The process environment as `KEY=VALUE` strings
pub fn env_array() -> Vec<String> {
    std::env::vars().map(|(k, v)| format!("{}={}", k, v)).collect()
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    fn sh(script: &str) -> Vec<String> {
        vec!["-c".to_string(), script.to_string()]
    }

    #[tokio::test]
    async fn test_captures_stdout() {
        let out = system("sh", &sh("echo hello"), None, &HashMap::new(), false)
            .await
            .unwrap();
        assert_eq!(out, "hello\n");
    }

    #[tokio::test]
    async fn test_passes_environment_and_dir() {
        let dir = tempfile::tempdir().unwrap();
        let mut env = HashMap::new();
        env.insert("HARNESS_GREETING".to_string(), "hola".to_string());

        let out = system(
            "sh",
            &sh("echo $HARNESS_GREETING; pwd"),
            Some(dir.path()),
            &env,
            false,
        )
        .await
        .unwrap();

        let mut lines = out.lines();
        assert_eq!(lines.next(), Some("hola"));
        let pwd = std::path::PathBuf::from(lines.next().unwrap());
        assert_eq!(
            pwd.canonicalize().unwrap(),
            dir.path().canonicalize().unwrap()
        );
    }

    #[tokio::test]
    async fn test_nonzero_exit_is_an_error() {
        let err = system("sh", &sh("echo oops >&2; exit 3"), None, &HashMap::new(), false)
            .await
            .unwrap_err();
        match err {
            Error::CommandFailed { code, output, .. } => {
                assert_eq!(code, Some(3));
                assert_eq!(output, "oops");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_missing_program() {
        let err = system("definitely-not-a-real-program-xyz", &[], None, &HashMap::new(), false)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_env_array_format() {
        let vars = env_array();
        assert!(vars.iter().all(|v| v.contains('=')));
    }
}
