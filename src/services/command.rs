use crate::models::errors::SystemError;
use log::{debug, warn};
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tokio::time::timeout;

/// Captured result of a finished subprocess.
#[derive(Debug, Clone)]
pub struct CommandOutput {
    pub success: bool,
    pub stdout: String,
    pub stderr: String,
}

/// Runs `program args...` and waits at most `limit` for it to exit.
///
/// The child is killed if the wait is abandoned. A non-zero exit is still
/// returned as output; callers decide whether that matters.
pub async fn run_command(
    program: &str,
    args: &[&str],
    limit: Duration,
) -> Result<CommandOutput, SystemError> {
    debug!("Running command: {} {}", program, args.join(" "));

    let child = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .kill_on_drop(true)
        .output();

    match timeout(limit, child).await {
        Ok(Ok(output)) => Ok(CommandOutput {
            success: output.status.success(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        }),
        Ok(Err(e)) => {
            warn!("Failed to start {}: {}", program, e);
            Err(SystemError::CommandUnavailable)
        }
        Err(_) => {
            warn!("{} {} timed out after {:?}", program, args.join(" "), limit);
            Err(SystemError::CommandTimedOut)
        }
    }
}

/// Like [`run_command`], but a non-zero exit is an error and only stdout is kept.
pub async fn run_checked(program: &str, args: &[&str], limit: Duration) -> Result<String, SystemError> {
    let output = run_command(program, args, limit).await?;
    if output.success {
        Ok(output.stdout)
    } else {
        debug!(
            "{} {} exited with failure: {}",
            program,
            args.join(" "),
            output.stderr.trim()
        );
        Err(SystemError::CommandFailed)
    }
}
