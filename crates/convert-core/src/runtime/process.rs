//! Subprocess execution with live output
//!
//! Commands run to completion with no timeout. Output is echoed line by line
//! as it arrives and the exit status is handed back to the caller, which
//! decides whether a failure matters.

use anyhow::{Context, Result};
use colored::Colorize;
use std::ffi::{OsStr, OsString};
use std::path::Path;
use std::process::{ExitStatus, Stdio};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command as TokioCommand;

/// Human-readable command line, e.g. `git add config.ru`
pub fn command_line<S: AsRef<OsStr>>(program: &str, args: &[S]) -> String {
    std::iter::once(program.to_string())
        .chain(args.iter().map(|arg| arg.as_ref().to_string_lossy().into_owned()))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Run `program` in `cwd`, streaming stdout and stderr until it exits
///
/// Only a failure to spawn or wait is an error; a non-zero exit is returned
/// as an [`ExitStatus`].
pub async fn run_streaming<I, S>(program: &str, args: I, cwd: &Path) -> Result<ExitStatus>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let args: Vec<OsString> = args.into_iter().map(|arg| arg.as_ref().to_owned()).collect();
    let cmd = command_line(program, &args);
    println!();
    println!("{} {}", "Running:".dimmed(), cmd.yellow());
    println!();

    let mut child = TokioCommand::new(program)
        .args(&args)
        .current_dir(cwd)
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .with_context(|| format!("Failed to start `{}`", cmd))?;

    let stdout = child
        .stdout
        .take()
        .context("Failed to capture stdout")?;
    let stderr = child
        .stderr
        .take()
        .context("Failed to capture stderr")?;

    let mut stdout_reader = BufReader::new(stdout).lines();
    let mut stderr_reader = BufReader::new(stderr).lines();
    let mut stdout_open = true;
    let mut stderr_open = true;

    while stdout_open || stderr_open {
        tokio::select! {
            line = stdout_reader.next_line(), if stdout_open => {
                match line {
                    Ok(Some(line)) => println!("  {}", line),
                    Ok(None) => stdout_open = false,
                    Err(e) => {
                        eprintln!("{} {}", "Error reading stdout:".red(), e);
                        stdout_open = false;
                    }
                }
            }
            line = stderr_reader.next_line(), if stderr_open => {
                match line {
                    Ok(Some(line)) => eprintln!("  {}", line.yellow()),
                    Ok(None) => stderr_open = false,
                    Err(e) => {
                        eprintln!("{} {}", "Error reading stderr:".red(), e);
                        stderr_open = false;
                    }
                }
            }
        }
    }

    let status = child
        .wait()
        .await
        .with_context(|| format!("Failed to wait for `{}`", cmd))?;
    println!();

    Ok(status)
}

/// Short description of an exit status for warnings
pub fn describe(status: &ExitStatus) -> String {
    match status.code() {
        Some(code) => format!("exit code {}", code),
        None => "terminated by signal".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_line_joins_args() {
        assert_eq!(
            command_line("git", &["commit", "-am", "converted to torquebox."]),
            "git commit -am converted to torquebox."
        );
        assert_eq!(command_line::<&str>("bundle", &[]), "bundle");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_returns_exit_status() {
        let dir = tempfile::tempdir().unwrap();
        let status = run_streaming("sh", ["-c", "echo out; echo err >&2; exit 3"], dir.path())
            .await
            .unwrap();

        assert!(!status.success());
        assert_eq!(status.code(), Some(3));
        assert_eq!(describe(&status), "exit code 3");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_runs_in_given_directory() {
        let dir = tempfile::tempdir().unwrap();
        let status = run_streaming("sh", ["-c", "touch marker"], dir.path())
            .await
            .unwrap();

        assert!(status.success());
        assert!(dir.path().join("marker").exists());
    }

    #[tokio::test]
    async fn test_missing_program_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let program = "definitely-not-a-real-program-xyz";
        let result = run_streaming(program, ["--version"], dir.path()).await;
        assert!(result.is_err());
    }
}
