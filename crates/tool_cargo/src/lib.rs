//! cargo tool aliases - building crates and reading workspace metadata.
//!
//! Wraps the `cargo` executable behind `#[method_alias]` functions so build
//! scripts call `cargoBuild(...)` instead of shelling out by hand. Argument
//! rendering is deterministic: the same settings always produce the same
//! command line.

use lathe_alias_macro::{alias_settings, method_alias};
use lathe_core::{ArgumentBuilder, BuildContext, CoreError, ProcessSettings};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

/// Errors raised by the cargo aliases.
#[derive(Debug, thiserror::Error)]
pub enum CargoError {
    /// The process could not be started or exited with a failure code.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// `cargo metadata` printed something that is not the expected JSON.
    #[error("failed to parse cargo metadata: {0}")]
    Metadata(#[from] serde_json::Error),
}

// ============================================================================
// Settings
// ============================================================================

/// Settings for `cargo build`.
///
/// Collections keep insertion order (config keys are sorted) so rendering a
/// settings value twice yields byte-identical argument lists.
#[alias_settings]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CargoBuildSettings {
    /// Path to the manifest of the crate to build. Empty builds the
    /// current directory.
    pub manifest_path: String,
    /// Binary targets to build. Empty builds the default target set.
    pub targets: Vec<String>,
    /// `--config key=value` overrides, grouped by key.
    pub config: BTreeMap<String, Vec<String>>,
    /// Build profile, for example `release`.
    pub profile: Option<String>,
    /// Target triple to compile for.
    pub target_triple: Option<String>,
    /// Toolchain override routed through rustup, for example `nightly`.
    pub toolchain: Option<String>,
    /// Parallel job count.
    pub jobs: Option<u32>,
}

impl CargoBuildSettings {
    /// Creates settings for the crate at `manifest_path`.
    pub fn new(manifest_path: impl Into<String>) -> Self {
        Self {
            manifest_path: manifest_path.into(),
            ..Self::default()
        }
    }

    /// Adds a binary target. Duplicates are kept once, in first-seen order.
    pub fn with_target(mut self, target: impl Into<String>) -> Self {
        let target = target.into();
        if !self.targets.contains(&target) {
            self.targets.push(target);
        }
        self
    }

    /// Adds a `--config` override. Repeated keys accumulate values.
    pub fn with_config(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.config.entry(key.into()).or_default().push(value.into());
        self
    }

    /// Selects the build profile.
    pub fn set_profile(mut self, profile: impl Into<String>) -> Self {
        self.profile = Some(profile.into());
        self
    }

    /// Selects the target triple to compile for.
    pub fn set_target_triple(mut self, triple: impl Into<String>) -> Self {
        self.target_triple = Some(triple.into());
        self
    }

    /// Routes the invocation through a rustup toolchain, as `+<toolchain>`.
    pub fn use_toolchain(mut self, toolchain: impl Into<String>) -> Self {
        self.toolchain = Some(toolchain.into());
        self
    }

    /// Caps the number of parallel build jobs.
    pub fn set_jobs(mut self, jobs: u32) -> Self {
        self.jobs = Some(jobs);
        self
    }
}

/// Renders `settings` into the `cargo build` argument list.
///
/// The order is fixed: toolchain, subcommand, manifest path, targets,
/// config overrides (keys sorted, values in insertion order), profile,
/// target triple, jobs.
pub fn build_arguments(settings: &CargoBuildSettings) -> ArgumentBuilder {
    let mut args = ArgumentBuilder::new();
    if let Some(toolchain) = &settings.toolchain {
        args.append(format!("+{}", toolchain));
    }
    args.append("build");
    if !settings.manifest_path.is_empty() {
        args.append_switch("--manifest-path", settings.manifest_path.as_str());
    }
    for target in &settings.targets {
        args.append_switch("--bin", target.as_str());
    }
    for (key, values) in &settings.config {
        for value in values {
            args.append_switch("--config", format!("{}={}", key, value));
        }
    }
    if let Some(profile) = &settings.profile {
        args.append_switch("--profile", profile.as_str());
    }
    if let Some(triple) = &settings.target_triple {
        args.append_switch("--target", triple.as_str());
    }
    if let Some(jobs) = settings.jobs {
        args.append_switch("--jobs", jobs.to_string());
    }
    args
}

// ============================================================================
// Runner
// ============================================================================

/// Drives the `cargo` executable through the context's process runner.
pub struct CargoRunner<'a> {
    context: &'a BuildContext,
}

impl<'a> CargoRunner<'a> {
    pub fn new(context: &'a BuildContext) -> Self {
        Self { context }
    }

    /// Runs `cargo build` with the given settings.
    pub fn build(&self, settings: &CargoBuildSettings) -> Result<(), CargoError> {
        let args = build_arguments(settings);
        debug!(args = %args.render(), "running cargo build");
        let process = ProcessSettings::new("cargo")
            .args(args)
            .working_dir(self.context.environment().working_dir());
        let output = self.context.runner().run(&process)?;
        output.ensure_success("cargo")?;
        Ok(())
    }

    /// Returns the version line `cargo --version` prints.
    pub fn version(&self) -> Result<String, CargoError> {
        let process = ProcessSettings::new("cargo")
            .arg("--version")
            .working_dir(self.context.environment().working_dir())
            .capture_output();
        let output = self.context.runner().run(&process)?;
        output.ensure_success("cargo")?;
        Ok(output.stdout.trim().to_string())
    }

    /// Runs `cargo metadata` for `manifest_path` and deserializes the JSON
    /// it prints into `T`.
    pub fn metadata<T>(&self, manifest_path: &str) -> Result<T, CargoError>
    where
        T: serde::de::DeserializeOwned,
    {
        let mut args = ArgumentBuilder::new();
        args.append("metadata");
        args.append_switch("--format-version", "1");
        args.append_switch("--manifest-path", manifest_path);
        debug!(args = %args.render(), "running cargo metadata");
        let process = ProcessSettings::new("cargo")
            .args(args)
            .working_dir(self.context.environment().working_dir())
            .capture_output();
        let output = self.context.runner().run(&process)?;
        output.ensure_success("cargo")?;
        Ok(serde_json::from_str(&output.stdout)?)
    }
}

// ============================================================================
// Aliases
// ============================================================================

/// Builds the crate at `manifest_path` with default settings.
#[method_alias]
pub fn cargo_build(context: &BuildContext, manifest_path: String) -> Result<(), CargoError> {
    CargoRunner::new(context).build(&CargoBuildSettings::new(manifest_path))
}

/// Builds a crate with explicit settings.
#[method_alias]
pub fn cargo_build_with(
    context: &BuildContext,
    settings: CargoBuildSettings,
) -> Result<(), CargoError> {
    CargoRunner::new(context).build(&settings)
}

/// Returns the version line reported by `cargo --version`.
#[method_alias]
pub fn cargo_version(context: &BuildContext) -> Result<String, CargoError> {
    CargoRunner::new(context).version()
}

/// Reads the metadata of the crate at `manifest_path` into the caller's type.
#[method_alias]
pub fn cargo_metadata<T>(context: &BuildContext, manifest_path: String) -> Result<T, CargoError>
where
    T: serde::de::DeserializeOwned,
{
    CargoRunner::new(context).metadata(&manifest_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use lathe_core::{Arguments, Environment, OutputMode, ProcessOutput, ProcessRunner, Verbosity};
    use std::path::Path;
    use std::sync::{Arc, Mutex};

    /// Records every spawn and replays canned output.
    struct FakeRunner {
        calls: Mutex<Vec<ProcessSettings>>,
        stdout: String,
        exit_code: i32,
    }

    impl FakeRunner {
        fn new() -> Arc<Self> {
            Self::with_stdout("")
        }

        fn with_stdout(stdout: &str) -> Arc<Self> {
            Arc::new(Self {
                calls: Mutex::new(Vec::new()),
                stdout: stdout.to_string(),
                exit_code: 0,
            })
        }

        fn failing(exit_code: i32) -> Arc<Self> {
            Arc::new(Self {
                calls: Mutex::new(Vec::new()),
                stdout: String::new(),
                exit_code,
            })
        }

        fn calls(&self) -> Vec<ProcessSettings> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl ProcessRunner for FakeRunner {
        fn run(&self, settings: &ProcessSettings) -> Result<ProcessOutput, CoreError> {
            self.calls.lock().unwrap().push(settings.clone());
            Ok(ProcessOutput {
                exit_code: self.exit_code,
                stdout: self.stdout.clone(),
            })
        }
    }

    fn context_over(runner: Arc<FakeRunner>) -> BuildContext {
        BuildContext::new(
            Environment::with_working_dir("/work"),
            Arguments::new(),
            Verbosity::Normal,
            runner,
        )
    }

    #[test]
    fn test_build_arguments_order() {
        let settings = CargoBuildSettings::new("crates/app/Cargo.toml")
            .with_target("app")
            .with_target("helper")
            .with_config("profile.release.lto", "true")
            .set_profile("release")
            .set_target_triple("x86_64-unknown-linux-gnu")
            .use_toolchain("nightly")
            .set_jobs(4);
        assert_eq!(
            build_arguments(&settings).into_args(),
            vec![
                "+nightly",
                "build",
                "--manifest-path",
                "crates/app/Cargo.toml",
                "--bin",
                "app",
                "--bin",
                "helper",
                "--config",
                "profile.release.lto=true",
                "--profile",
                "release",
                "--target",
                "x86_64-unknown-linux-gnu",
                "--jobs",
                "4",
            ]
        );
    }

    #[test]
    fn test_default_settings() {
        assert_eq!(
            build_arguments(&CargoBuildSettings::default()).into_args(),
            vec!["build"]
        );
    }

    #[test]
    fn test_duplicate_targets() {
        let settings = CargoBuildSettings::default()
            .with_target("app")
            .with_target("app");
        assert_eq!(settings.targets, vec!["app"]);
    }

    #[test]
    fn test_config_ordering() {
        let settings = CargoBuildSettings::default()
            .with_config("b.key", "2")
            .with_config("a.key", "1")
            .with_config("a.key", "3");
        assert_eq!(
            build_arguments(&settings).into_args(),
            vec![
                "build",
                "--config",
                "a.key=1",
                "--config",
                "a.key=3",
                "--config",
                "b.key=2",
            ]
        );
    }

    #[test]
    fn test_build_working_dir() {
        let runner = FakeRunner::new();
        let context = context_over(runner.clone());

        cargo_build(&context, "Cargo.toml".to_string()).unwrap();

        let calls = runner.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].program, "cargo");
        assert_eq!(calls[0].args, vec!["build", "--manifest-path", "Cargo.toml"]);
        assert_eq!(calls[0].working_dir.as_deref(), Some(Path::new("/work")));
        assert_eq!(calls[0].output, OutputMode::Inherit);
    }

    #[test]
    fn test_version_trimmed() {
        let runner = FakeRunner::with_stdout("cargo 1.80.0 (0c22e38 2024-06-01)\n");
        let context = context_over(runner.clone());

        let version = cargo_version(&context).unwrap();

        assert_eq!(version, "cargo 1.80.0 (0c22e38 2024-06-01)");
        assert_eq!(runner.calls()[0].output, OutputMode::Capture);
    }

    #[test]
    fn test_metadata_deserialization() {
        #[derive(Debug, Deserialize)]
        struct Meta {
            workspace_root: String,
        }

        let runner = FakeRunner::with_stdout(r#"{"workspace_root":"/work","packages":[]}"#);
        let context = context_over(runner.clone());

        let meta: Meta = cargo_metadata(&context, "Cargo.toml".to_string()).unwrap();

        assert_eq!(meta.workspace_root, "/work");
        assert_eq!(
            runner.calls()[0].args,
            vec![
                "metadata",
                "--format-version",
                "1",
                "--manifest-path",
                "Cargo.toml",
            ]
        );
    }

    #[test]
    fn test_build_failure_exit_code() {
        let runner = FakeRunner::failing(101);
        let context = context_over(runner);

        let err = cargo_build(&context, "Cargo.toml".to_string()).unwrap_err();

        assert!(matches!(
            err,
            CargoError::Core(CoreError::ToolFailed { ref program, code: 101 }) if program == "cargo"
        ));
    }

    #[test]
    fn test_alias_registration() {
        let functions = lathe_alias::collect_functions();
        for wire_name in ["cargo_build", "cargo_build_with", "cargo_version", "cargo_metadata"] {
            assert!(
                functions.iter().any(|f| f.wire_name == wire_name),
                "missing descriptor for {}",
                wire_name
            );
        }
    }

    #[test]
    fn test_metadata_alias_generic() {
        let descriptor = __cargo_metadata_alias_descriptor();
        assert_eq!(descriptor.name, "cargoMetadata");
        assert_eq!(descriptor.type_params, vec!["T"]);
        assert!(descriptor.is_context_extension);

        let alias = lathe_alias::generate_alias(&descriptor).unwrap();
        assert!(alias.starts_with("/**\n * Reads the metadata"));
        assert!(alias.ends_with(
            "export function cargoMetadata<T>(manifestPath: string): T {\n  \
             return lib.cargo_metadata<T>(getContext(), manifestPath);\n}\n"
        ));
    }

    #[test]
    fn test_settings_interface() {
        let structs = lathe_alias::collect_structs();
        let settings = structs
            .iter()
            .find(|s| s.name == "CargoBuildSettings")
            .expect("settings interface registered");
        let interface = settings.to_typescript_interface();
        assert!(interface.contains("export interface CargoBuildSettings {"));
        assert!(interface.contains("manifestPath: string;"));
        assert!(interface.contains("profile?: string;"));
        assert!(interface.contains("config: Record<string, string[]>;"));
    }
}
