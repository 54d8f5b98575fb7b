//! Process execution for tool runners.
//!
//! Tool crates never touch `std::process` directly. They describe an
//! invocation with [`ProcessSettings`], build argument lists with
//! [`ArgumentBuilder`], and hand both to the context's [`ProcessRunner`].
//! Tests swap in a fake runner to assert on the exact argument vector.

use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::process::{Command, Stdio};
use tracing::debug;

// ============================================================================
// Settings
// ============================================================================

/// What happens to the child's stdout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputMode {
    /// Stream to the parent's stdout.
    #[default]
    Inherit,
    /// Collect into [`ProcessOutput::stdout`].
    Capture,
}

/// A single tool invocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessSettings {
    /// Program name or path.
    pub program: String,
    /// Arguments in the order they are passed to the program.
    pub args: Vec<String>,
    /// Working directory, or the parent's when `None`.
    pub working_dir: Option<PathBuf>,
    /// Extra environment variables, sorted by name.
    pub env: BTreeMap<String, String>,
    /// Stdout handling.
    pub output: OutputMode,
}

impl ProcessSettings {
    /// Creates settings for `program` with no arguments.
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            working_dir: None,
            env: BTreeMap::new(),
            output: OutputMode::Inherit,
        }
    }

    /// Appends a single argument.
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Appends every argument from the builder.
    pub fn args(mut self, builder: ArgumentBuilder) -> Self {
        self.args.extend(builder.into_args());
        self
    }

    /// Sets the working directory.
    pub fn working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    /// Adds an environment variable.
    pub fn env(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.insert(name.into(), value.into());
        self
    }

    /// Captures stdout instead of streaming it.
    pub fn capture_output(mut self) -> Self {
        self.output = OutputMode::Capture;
        self
    }
}

/// Result of a completed tool invocation.
#[derive(Debug, Clone, Default)]
pub struct ProcessOutput {
    /// Exit code reported by the tool.
    pub exit_code: i32,
    /// Captured stdout, empty unless [`OutputMode::Capture`] was requested.
    pub stdout: String,
}

impl ProcessOutput {
    /// Returns `true` when the tool exited with code zero.
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }

    /// Maps a non-zero exit code to [`CoreError::ToolFailed`].
    pub fn ensure_success(&self, program: &str) -> Result<(), CoreError> {
        if self.success() {
            Ok(())
        } else {
            Err(CoreError::ToolFailed {
                program: program.to_string(),
                code: self.exit_code,
            })
        }
    }
}

// ============================================================================
// Runner
// ============================================================================

/// Executes tool invocations on behalf of the context.
pub trait ProcessRunner: Send + Sync {
    /// Runs the program to completion.
    ///
    /// A non-zero exit code is not an error here; callers decide via
    /// [`ProcessOutput::ensure_success`]. Errors are reserved for the
    /// program being missing or failing to start.
    fn run(&self, settings: &ProcessSettings) -> Result<ProcessOutput, CoreError>;
}

/// [`ProcessRunner`] backed by `std::process::Command`.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdProcessRunner;

impl StdProcessRunner {
    /// Creates the standard runner.
    pub fn new() -> Self {
        Self
    }
}

impl ProcessRunner for StdProcessRunner {
    fn run(&self, settings: &ProcessSettings) -> Result<ProcessOutput, CoreError> {
        debug!(
            program = %settings.program,
            args = %render_args(&settings.args),
            "running tool"
        );

        let mut command = Command::new(&settings.program);
        command.args(&settings.args);
        if let Some(dir) = &settings.working_dir {
            command.current_dir(dir);
        }
        for (name, value) in &settings.env {
            command.env(name, value);
        }

        let (status, stdout) = match settings.output {
            OutputMode::Inherit => {
                let status = command.status().map_err(|e| spawn_error(e, settings))?;
                (status, String::new())
            }
            OutputMode::Capture => {
                command.stdout(Stdio::piped());
                let out = command.output().map_err(|e| spawn_error(e, settings))?;
                let stdout = String::from_utf8_lossy(&out.stdout).into_owned();
                (out.status, stdout)
            }
        };

        let exit_code = status.code().ok_or_else(|| CoreError::ToolTerminated {
            program: settings.program.clone(),
        })?;
        debug!(program = %settings.program, exit_code, "tool finished");

        Ok(ProcessOutput { exit_code, stdout })
    }
}

fn spawn_error(err: std::io::Error, settings: &ProcessSettings) -> CoreError {
    if err.kind() == std::io::ErrorKind::NotFound {
        CoreError::ToolNotFound {
            program: settings.program.clone(),
        }
    } else {
        CoreError::Io(err)
    }
}

// ============================================================================
// Argument building
// ============================================================================

/// Ordered argument list with switch helpers.
///
/// Arguments are kept as discrete entries; no shell is involved, so quoting
/// only matters for the rendered log line.
#[derive(Debug, Clone, Default)]
pub struct ArgumentBuilder {
    args: Vec<String>,
}

impl ArgumentBuilder {
    /// Creates an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a bare argument.
    pub fn append(&mut self, arg: impl Into<String>) -> &mut Self {
        self.args.push(arg.into());
        self
    }

    /// Appends `switch` followed by `value` as two entries.
    pub fn append_switch(&mut self, switch: &str, value: impl Into<String>) -> &mut Self {
        self.args.push(switch.to_string());
        self.args.push(value.into());
        self
    }

    /// Appends a single `switch=value` entry.
    pub fn append_joined(&mut self, switch: &str, value: impl Into<String>) -> &mut Self {
        self.args.push(format!("{}={}", switch, value.into()));
        self
    }

    /// Returns `true` when nothing has been appended.
    pub fn is_empty(&self) -> bool {
        self.args.is_empty()
    }

    /// Renders the arguments for display, quoting entries with spaces.
    pub fn render(&self) -> String {
        render_args(&self.args)
    }

    /// Consumes the builder into the argument vector.
    pub fn into_args(self) -> Vec<String> {
        self.args
    }
}

fn render_args(args: &[String]) -> String {
    let mut rendered = String::new();
    for arg in args {
        if !rendered.is_empty() {
            rendered.push(' ');
        }
        if arg.contains(' ') {
            rendered.push('"');
            rendered.push_str(arg);
            rendered.push('"');
        } else {
            rendered.push_str(arg);
        }
    }
    rendered
}
