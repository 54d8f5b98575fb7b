//! npm tool aliases - packing, installing and publishing packages.
//!
//! The pack / install / publish trio mirrors how release pipelines use npm:
//! `npmPack` produces a tarball and returns its filename, `npmInstall`
//! restores dependencies, `npmPublish` pushes an artifact to a registry.
//! `npmRun` forwards extra script arguments after the `--` separator.

use lathe_alias_macro::{alias_settings, method_alias};
use lathe_core::{ArgumentBuilder, BuildContext, CoreError, ProcessSettings};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Errors raised by the npm aliases.
#[derive(Debug, thiserror::Error)]
pub enum NpmError {
    /// The process could not be started or exited with a failure code.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// `npm pack` exited successfully without printing a tarball name.
    #[error("npm pack did not print a tarball name")]
    NoTarball,
}

// ============================================================================
// Settings
// ============================================================================

/// Settings for `npm pack`.
#[alias_settings]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NpmPackSettings {
    /// Directory the tarball is written to. `None` packs into the
    /// working directory.
    pub destination: Option<String>,
    /// Report the tarball contents without writing it.
    pub dry_run: bool,
}

impl NpmPackSettings {
    /// Writes the tarball into `destination` instead of the working
    /// directory.
    pub fn set_destination(mut self, destination: impl Into<String>) -> Self {
        self.destination = Some(destination.into());
        self
    }

    /// Reports what would be packed without writing the tarball.
    pub fn dry_run(mut self) -> Self {
        self.dry_run = true;
        self
    }
}

/// Settings for `npm install`.
#[alias_settings]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NpmInstallSettings {
    /// Skip development dependencies, as `--omit=dev`.
    pub production: bool,
    /// Skip the vulnerability audit after installing.
    pub no_audit: bool,
    /// Registry to resolve packages from.
    pub registry: Option<String>,
}

impl NpmInstallSettings {
    /// Installs without development dependencies.
    pub fn production(mut self) -> Self {
        self.production = true;
        self
    }

    /// Skips the post-install vulnerability audit.
    pub fn no_audit(mut self) -> Self {
        self.no_audit = true;
        self
    }

    /// Resolves packages from `registry` instead of the default.
    pub fn set_registry(mut self, registry: impl Into<String>) -> Self {
        self.registry = Some(registry.into());
        self
    }
}

/// Settings for `npm publish`.
#[alias_settings]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NpmPublishSettings {
    /// Distribution tag to publish under, for example `beta`.
    pub tag: Option<String>,
    /// Package visibility, `public` or `restricted`.
    pub access: Option<String>,
    /// Registry to publish to.
    pub registry: Option<String>,
    /// Go through the publish steps without pushing anything.
    pub dry_run: bool,
}

impl NpmPublishSettings {
    /// Publishes under the given distribution tag.
    pub fn set_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    /// Sets the package visibility.
    pub fn set_access(mut self, access: impl Into<String>) -> Self {
        self.access = Some(access.into());
        self
    }

    /// Publishes to `registry` instead of the default.
    pub fn set_registry(mut self, registry: impl Into<String>) -> Self {
        self.registry = Some(registry.into());
        self
    }

    /// Goes through the publish steps without pushing anything.
    pub fn dry_run(mut self) -> Self {
        self.dry_run = true;
        self
    }
}

// ============================================================================
// Runner
// ============================================================================

/// Drives the `npm` executable through the context's process runner.
pub struct NpmRunner<'a> {
    context: &'a BuildContext,
}

impl<'a> NpmRunner<'a> {
    pub fn new(context: &'a BuildContext) -> Self {
        Self { context }
    }

    /// Packs the package at `package_dir` and returns the tarball filename
    /// npm prints.
    pub fn pack(&self, package_dir: &str, settings: &NpmPackSettings) -> Result<String, NpmError> {
        let mut args = ArgumentBuilder::new();
        args.append("pack");
        args.append(package_dir);
        if let Some(destination) = &settings.destination {
            args.append_switch("--pack-destination", destination.as_str());
        }
        if settings.dry_run {
            args.append("--dry-run");
        }
        debug!(args = %args.render(), "running npm pack");
        let process = ProcessSettings::new("npm")
            .args(args)
            .working_dir(self.context.environment().working_dir())
            .capture_output();
        let output = self.context.runner().run(&process)?;
        output.ensure_success("npm")?;

        // npm prints the tarball filename on the last non-empty line.
        output
            .stdout
            .lines()
            .rev()
            .map(str::trim)
            .find(|line| !line.is_empty())
            .map(str::to_string)
            .ok_or(NpmError::NoTarball)
    }

    /// Installs dependencies for the package at `package_dir`.
    pub fn install(
        &self,
        package_dir: &str,
        settings: &NpmInstallSettings,
    ) -> Result<(), NpmError> {
        let mut args = ArgumentBuilder::new();
        args.append("install");
        if settings.production {
            args.append_joined("--omit", "dev");
        }
        if settings.no_audit {
            args.append("--no-audit");
        }
        if let Some(registry) = &settings.registry {
            args.append_switch("--registry", registry.as_str());
        }
        debug!(args = %args.render(), package_dir, "running npm install");
        let process = ProcessSettings::new("npm")
            .args(args)
            .working_dir(self.context.environment().working_dir().join(package_dir));
        let output = self.context.runner().run(&process)?;
        output.ensure_success("npm")?;
        Ok(())
    }

    /// Publishes a packed tarball.
    pub fn publish(&self, tarball: &str, settings: &NpmPublishSettings) -> Result<(), NpmError> {
        let mut args = ArgumentBuilder::new();
        args.append("publish");
        args.append(tarball);
        if let Some(tag) = &settings.tag {
            args.append_switch("--tag", tag.as_str());
        }
        if let Some(access) = &settings.access {
            args.append_switch("--access", access.as_str());
        }
        if let Some(registry) = &settings.registry {
            args.append_switch("--registry", registry.as_str());
        }
        if settings.dry_run {
            args.append("--dry-run");
        }
        debug!(args = %args.render(), "running npm publish");
        let process = ProcessSettings::new("npm")
            .args(args)
            .working_dir(self.context.environment().working_dir());
        let output = self.context.runner().run(&process)?;
        output.ensure_success("npm")?;
        Ok(())
    }

    /// Runs a package.json script, forwarding extra arguments after `--`.
    pub fn run_script(&self, script: &str, script_args: &[String]) -> Result<(), NpmError> {
        let mut args = ArgumentBuilder::new();
        args.append("run");
        args.append(script);
        if !script_args.is_empty() {
            args.append("--");
            for arg in script_args {
                args.append(arg.as_str());
            }
        }
        debug!(args = %args.render(), "running npm script");
        let process = ProcessSettings::new("npm")
            .args(args)
            .working_dir(self.context.environment().working_dir());
        let output = self.context.runner().run(&process)?;
        output.ensure_success("npm")?;
        Ok(())
    }
}

// ============================================================================
// Aliases
// ============================================================================

/// Packs the package at `package_dir` and returns the tarball filename.
#[method_alias]
pub fn npm_pack(context: &BuildContext, package_dir: String) -> Result<String, NpmError> {
    NpmRunner::new(context).pack(&package_dir, &NpmPackSettings::default())
}

/// Packs a package with explicit settings and returns the tarball filename.
#[method_alias]
pub fn npm_pack_with(
    context: &BuildContext,
    package_dir: String,
    settings: NpmPackSettings,
) -> Result<String, NpmError> {
    NpmRunner::new(context).pack(&package_dir, &settings)
}

/// Installs dependencies for the package at `package_dir`.
#[method_alias]
pub fn npm_install(context: &BuildContext, package_dir: String) -> Result<(), NpmError> {
    NpmRunner::new(context).install(&package_dir, &NpmInstallSettings::default())
}

/// Installs dependencies with explicit settings.
#[method_alias]
pub fn npm_install_with(
    context: &BuildContext,
    package_dir: String,
    settings: NpmInstallSettings,
) -> Result<(), NpmError> {
    NpmRunner::new(context).install(&package_dir, &settings)
}

/// Publishes a packed tarball with explicit settings.
#[method_alias]
pub fn npm_publish_with(
    context: &BuildContext,
    tarball: String,
    settings: NpmPublishSettings,
) -> Result<(), NpmError> {
    NpmRunner::new(context).publish(&tarball, &settings)
}

/// Runs a package.json script with extra arguments.
#[method_alias]
pub fn npm_run(
    context: &BuildContext,
    script: String,
    #[variadic] args: Vec<String>,
) -> Result<(), NpmError> {
    NpmRunner::new(context).run_script(&script, &args)
}
