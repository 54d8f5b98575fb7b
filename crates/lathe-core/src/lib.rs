//! lathe-core - Execution context for the Lathe build tool
//!
//! Holds everything a build script step needs at call time: the ambient
//! [`BuildContext`], command line [`Arguments`], the configured
//! [`Verbosity`], and process plumbing ([`ProcessRunner`],
//! [`ArgumentBuilder`]) that tool crates build on.

mod arguments;
mod context;
mod error;
mod process;
mod verbosity;

pub use arguments::Arguments;
pub use context::{BuildContext, Environment};
pub use error::CoreError;
pub use process::{
    ArgumentBuilder, OutputMode, ProcessOutput, ProcessRunner, ProcessSettings, StdProcessRunner,
};
pub use verbosity::{ParseVerbosityError, Verbosity};
