use std::io;
use std::process::{Command, Stdio};
use thiserror::Error;

/// Failure of an external command the packager shells out to.
///
/// Subprocess output is never captured for replay; by the time one of
/// these is raised the command's own output has already been streamed to
/// the console.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("failed to launch `{command}`")]
    Launch {
        command: String,
        #[source]
        source: io::Error,
    },

    #[error("`{command}` exited with status {exit_code}")]
    Failed { command: String, exit_code: i32 },

    #[error("`{command}` produced output that was not valid UTF-8")]
    NonUtf8Output { command: String },
}

/// Run a command with stdout and stderr inherited from this process,
/// blocking until it exits. Non-zero exit is an error; there is no
/// timeout and no retry.
pub fn run_streamed(cmd: &mut Command) -> Result<(), CommandError> {
    let command = render(cmd);

    let status = cmd
        .status()
        .map_err(|source| CommandError::Launch {
            command: command.clone(),
            source,
        })?;

    if !status.success() {
        return Err(CommandError::Failed {
            command,
            exit_code: status.code().unwrap_or(-1),
        });
    }

    Ok(())
}

/// Run a command with stderr inherited and stdout captured, blocking
/// until it exits. Returns stdout exactly as written, trailing newline
/// included.
pub fn capture_stdout(cmd: &mut Command) -> Result<String, CommandError> {
    let command = render(cmd);

    let output = cmd
        .stderr(Stdio::inherit())
        .output()
        .map_err(|source| CommandError::Launch {
            command: command.clone(),
            source,
        })?;

    if !output.status.success() {
        return Err(CommandError::Failed {
            command,
            exit_code: output.status.code().unwrap_or(-1),
        });
    }

    String::from_utf8(output.stdout).map_err(|_| CommandError::NonUtf8Output { command })
}

/// Human-readable rendering of a command line for error messages.
fn render(cmd: &Command) -> String {
    let mut rendered = cmd.get_program().to_string_lossy().into_owned();
    for arg in cmd.get_args() {
        rendered.push(' ');
        rendered.push_str(&arg.to_string_lossy());
    }
    rendered
}
