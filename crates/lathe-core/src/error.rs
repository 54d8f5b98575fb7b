//! Error type shared by the core context and process plumbing.

/// Errors raised by the core context and by tool execution.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// The tool executable could not be located.
    #[error("could not find executable '{program}'")]
    ToolNotFound {
        /// Program name as requested by the caller.
        program: String,
    },

    /// The tool ran but exited with a non-zero code.
    #[error("'{program}' failed with exit code {code}")]
    ToolFailed {
        /// Program name as requested by the caller.
        program: String,
        /// Exit code reported by the operating system.
        code: i32,
    },

    /// The tool was terminated before reporting an exit code.
    #[error("'{program}' terminated without an exit code")]
    ToolTerminated {
        /// Program name as requested by the caller.
        program: String,
    },

    /// Underlying IO failure.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
