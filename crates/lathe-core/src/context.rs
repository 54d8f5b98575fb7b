//! The ambient build context.

use crate::arguments::Arguments;
use crate::error::CoreError;
use crate::process::{ProcessRunner, StdProcessRunner};
use crate::verbosity::Verbosity;
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Host environment as seen by the build.
#[derive(Debug, Clone)]
pub struct Environment {
    working_dir: PathBuf,
    variables: BTreeMap<String, String>,
}

impl Environment {
    /// Captures the current process environment.
    pub fn capture() -> Result<Self, CoreError> {
        Ok(Self {
            working_dir: std::env::current_dir()?,
            variables: std::env::vars().collect(),
        })
    }

    /// Creates an environment rooted at `working_dir` with no variables.
    pub fn with_working_dir(working_dir: impl Into<PathBuf>) -> Self {
        Self {
            working_dir: working_dir.into(),
            variables: BTreeMap::new(),
        }
    }

    /// Directory tool invocations run in by default.
    pub fn working_dir(&self) -> &Path {
        &self.working_dir
    }

    /// Looks up an environment variable.
    pub fn var(&self, name: &str) -> Option<&str> {
        self.variables.get(name).map(String::as_str)
    }

    /// Sets or replaces an environment variable.
    pub fn set_var(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.variables.insert(name.into(), value.into());
    }
}

/// Ambient state handed to every aliased tool call.
///
/// The generated script surface resolves this once per call through
/// `getContext()`; tool runners take it as their first parameter and pull
/// the process runner, arguments and verbosity from it.
#[derive(Clone)]
pub struct BuildContext {
    environment: Environment,
    arguments: Arguments,
    verbosity: Verbosity,
    runner: Arc<dyn ProcessRunner>,
}

impl BuildContext {
    /// Creates a context from its parts.
    pub fn new(
        environment: Environment,
        arguments: Arguments,
        verbosity: Verbosity,
        runner: Arc<dyn ProcessRunner>,
    ) -> Self {
        Self {
            environment,
            arguments,
            verbosity,
            runner,
        }
    }

    /// Creates a context over the real environment and process runner.
    pub fn from_env(arguments: Arguments, verbosity: Verbosity) -> Result<Self, CoreError> {
        Ok(Self::new(
            Environment::capture()?,
            arguments,
            verbosity,
            Arc::new(StdProcessRunner::new()),
        ))
    }

    /// The host environment.
    pub fn environment(&self) -> &Environment {
        &self.environment
    }

    /// Arguments passed to the build script.
    pub fn arguments(&self) -> &Arguments {
        &self.arguments
    }

    /// Configured output level.
    pub fn verbosity(&self) -> Verbosity {
        self.verbosity
    }

    /// Runner used for tool invocations.
    pub fn runner(&self) -> &dyn ProcessRunner {
        self.runner.as_ref()
    }
}

impl fmt::Debug for BuildContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BuildContext")
            .field("environment", &self.environment)
            .field("arguments", &self.arguments)
            .field("verbosity", &self.verbosity)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::{ProcessOutput, ProcessSettings};

    struct NullRunner;

    impl ProcessRunner for NullRunner {
        fn run(&self, _settings: &ProcessSettings) -> Result<ProcessOutput, CoreError> {
            Ok(ProcessOutput::default())
        }
    }

    #[test]
    fn test_context_accessors() {
        let mut env = Environment::with_working_dir("/build");
        env.set_var("CI", "true");
        let mut args = Arguments::new();
        args.set("target", "Publish");

        let context = BuildContext::new(env, args, Verbosity::Verbose, Arc::new(NullRunner));
        assert_eq!(context.environment().working_dir(), Path::new("/build"));
        assert_eq!(context.environment().var("CI"), Some("true"));
        assert_eq!(context.arguments().get("Target"), Some("Publish"));
        assert_eq!(context.verbosity(), Verbosity::Verbose);
    }

    #[test]
    fn test_from_env_working_dir() {
        let context = BuildContext::from_env(Arguments::new(), Verbosity::Normal).unwrap();
        assert!(context.environment().working_dir().is_absolute());
    }

    #[test]
    fn test_context_runner() {
        let context = BuildContext::new(
            Environment::with_working_dir("."),
            Arguments::new(),
            Verbosity::Quiet,
            Arc::new(NullRunner),
        );
        let output = context
            .runner()
            .run(&ProcessSettings::new("noop"))
            .unwrap();
        assert!(output.success());
    }
}
