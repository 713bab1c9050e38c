//! External tool execution.

use oratool_core::{OratoolError, Result, ToolCommand};
use std::process::{ExitStatus, Stdio};
use tracing::{debug, info, warn};

/// Renders the command line with the password masked, space separated.
pub fn dry_run<C: ToolCommand + ?Sized>(command: &C) -> String {
    command.render_redacted().join(" ")
}

/// Runs the tool with inherited stdio and waits for it to exit.
///
/// A non-zero exit is reported as [`OratoolError::ProcessFailed`] unless
/// `no_fail` is set, in which case the status is returned as is.
///
/// # Errors
/// Returns a configuration error for an empty executable path, an I/O error
/// if the process cannot be started, or `ProcessFailed` as described above.
pub async fn run<C: ToolCommand + ?Sized>(command: &C, no_fail: bool) -> Result<ExitStatus> {
    let program = command.program();
    if program.is_empty() {
        return Err(OratoolError::configuration("executable path is empty"));
    }

    info!("Running {}", dry_run(command));

    let args = command.render();
    let status = tokio::process::Command::new(program)
        .args(args.iter().skip(1))
        .stdin(Stdio::inherit())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .status()
        .await
        .map_err(|e| OratoolError::io(format!("failed to launch {program}"), e))?;

    debug!("{} exited with {}", program, status);

    if status.success() {
        return Ok(status);
    }

    if no_fail {
        warn!("{} failed with {}; ignoring", program, status);
        return Ok(status);
    }

    Err(OratoolError::ProcessFailed {
        program: program.to_string(),
        code: status.code(),
    })
}
