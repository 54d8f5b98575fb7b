//! lathe - TypeScript build automation front end.
//!
//! Parses the command line, generates the tool alias prelude from the
//! descriptors the linked tool crates register, and hands the script to the
//! external `lathe-host` binary for execution.

use anyhow::{anyhow, bail, Context, Result};
use lathe_alias::SurfaceGenerator;
use lathe_core::{Arguments, Verbosity};
use std::{
    env, fs,
    path::{Path, PathBuf},
    process::Command,
};
use tracing::{debug, warn};

// Link the tool crates so their alias registrations are present.
use tool_cargo as _;
use tool_npm as _;

fn usage() {
    eprintln!("lathe [script.ts] [options] [-key=value ...]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  -verbosity=<level>   quiet, minimal, normal, verbose or diagnostic");
    eprintln!("  -prelude[=<out.ts>]  Write the generated tool prelude and exit");
    eprintln!("  -version             Print the version and exit");
    eprintln!("  -help                Show this help");
    eprintln!();
    eprintln!("The script defaults to build.ts. Remaining -key=value pairs are");
    eprintln!("passed to the build script as arguments.");
}

/// Where `-prelude` sends the generated surface.
#[derive(Debug, Clone, PartialEq, Eq)]
enum PreludeTarget {
    Stdout,
    File(PathBuf),
}

/// Parsed command line.
#[derive(Debug, Default)]
struct Options {
    script: Option<PathBuf>,
    verbosity: Verbosity,
    arguments: Arguments,
    show_help: bool,
    show_version: bool,
    prelude: Option<PreludeTarget>,
}

fn parse_options(args: &[String]) -> Result<Options> {
    let mut options = Options::default();

    for arg in args {
        if let Some(rest) = arg.strip_prefix('-') {
            let (key, value) = match rest.split_once('=') {
                Some((key, value)) => (key, Some(value)),
                None => (rest, None),
            };
            match key.to_ascii_lowercase().as_str() {
                "help" | "?" => options.show_help = true,
                "version" => options.show_version = true,
                "verbosity" | "v" => {
                    let value = value.ok_or_else(|| anyhow!("-verbosity requires a value"))?;
                    options.verbosity = value.parse()?;
                }
                "prelude" => {
                    options.prelude = Some(match value {
                        Some(path) => PreludeTarget::File(PathBuf::from(path)),
                        None => PreludeTarget::Stdout,
                    });
                }
                key => {
                    // Unknown pairs pass through to the script; a bare flag
                    // reads as true.
                    options.arguments.set(key, value.unwrap_or("true"));
                }
            }
        } else if options.script.is_none() {
            options.script = Some(PathBuf::from(arg));
        } else {
            bail!("unexpected argument: {}", arg);
        }
    }

    Ok(options)
}

fn init_tracing(verbosity: Verbosity) {
    use tracing_subscriber::EnvFilter;

    let default = match verbosity {
        Verbosity::Quiet => "error",
        Verbosity::Minimal => "warn",
        Verbosity::Normal => "info",
        Verbosity::Verbose => "debug",
        Verbosity::Diagnostic => "trace",
    };
    let filter = EnvFilter::try_from_env("LATHE_LOG").unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();
}

/// Render the full alias prelude from every registered descriptor.
///
/// Rejected descriptors are reported and skipped; they never abort the
/// pass. Name collisions among the survivors are defects and do.
fn render_prelude() -> Result<String> {
    let functions = lathe_alias::collect_functions();
    let structs = lathe_alias::collect_structs();

    let mut accepted = Vec::new();
    for descriptor in functions {
        match lathe_alias::validate(&descriptor) {
            Ok(_) => accepted.push(descriptor),
            Err(err) => warn!("skipping alias {}: {}", descriptor.name, err),
        }
    }

    let generator = SurfaceGenerator::new(&accepted, &structs);
    generator.generate().context("generating the tool prelude")
}

fn cmd_prelude(target: &PreludeTarget) -> Result<()> {
    let prelude = render_prelude()?;
    match target {
        PreludeTarget::Stdout => print!("{}", prelude),
        PreludeTarget::File(path) => {
            fs::write(path, &prelude)
                .with_context(|| format!("writing prelude to {}", path.display()))?;
            println!("Wrote prelude to {}", path.display());
        }
    }
    Ok(())
}

/// Find the lathe-host binary in standard locations.
///
/// Search order:
/// 1. Same directory as the lathe binary (for installed binaries)
/// 2. ~/.lathe/bin/ (standard install location)
/// 3. PATH (for manual installations)
fn find_lathe_host() -> Result<PathBuf> {
    #[cfg(target_os = "windows")]
    let binary_name = "lathe-host.exe";
    #[cfg(not(target_os = "windows"))]
    let binary_name = "lathe-host";

    if let Ok(exe) = env::current_exe() {
        if let Some(parent) = exe.parent() {
            let sibling = parent.join(binary_name);
            if sibling.exists() {
                return Ok(sibling);
            }
        }
    }

    if let Some(home) = dirs::home_dir() {
        let installed = home.join(".lathe").join("bin").join(binary_name);
        if installed.exists() {
            return Ok(installed);
        }
    }

    if let Ok(path) = which::which(binary_name) {
        return Ok(path);
    }

    bail!(
        "lathe-host not found!\n\n\
        Expected it next to the lathe binary, under ~/.lathe/bin, or on PATH."
    )
}

/// Write the prelude into the cache directory for the host to pick up.
fn write_prelude_cache() -> Result<PathBuf> {
    let prelude = render_prelude()?;
    let dir = dirs::cache_dir().unwrap_or_else(env::temp_dir).join("lathe");
    fs::create_dir_all(&dir).with_context(|| format!("creating {}", dir.display()))?;
    let path = dir.join("prelude.ts");
    fs::write(&path, prelude).with_context(|| format!("writing prelude to {}", path.display()))?;
    Ok(path)
}

fn cmd_run(script: &Path, options: &Options) -> Result<()> {
    if !script.exists() {
        bail!("script not found: {}", script.display());
    }

    let prelude_path = write_prelude_cache()?;
    let host = find_lathe_host()?;
    debug!(host = %host.display(), "delegating to lathe-host");

    let mut command = Command::new(&host);
    command
        .arg("--script")
        .arg(script)
        .arg("--prelude")
        .arg(&prelude_path)
        .arg("--verbosity")
        .arg(options.verbosity.as_str());
    for (key, value) in options.arguments.iter() {
        command.arg(format!("-{}={}", key, value));
    }

    let status = command.status().context("failed to run lathe-host")?;
    if !status.success() {
        bail!("lathe-host exited with error");
    }
    Ok(())
}

fn main() -> Result<()> {
    let args: Vec<String> = env::args().skip(1).collect();

    if args.is_empty() {
        usage();
        return Ok(());
    }

    let options = parse_options(&args)?;
    init_tracing(options.verbosity);

    if options.show_help {
        usage();
        return Ok(());
    }
    if options.show_version {
        println!("lathe {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }
    if let Some(target) = &options.prelude {
        return cmd_prelude(target);
    }

    let script = options
        .script
        .clone()
        .unwrap_or_else(|| PathBuf::from("build.ts"));
    cmd_run(&script, &options)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Options> {
        let args: Vec<String> = args.iter().map(|s| s.to_string()).collect();
        parse_options(&args)
    }

    #[test]
    fn test_parse_script_and_arguments() {
        let options = parse(&["build.ts", "-verbosity=verbose", "-target=Publish"]).unwrap();
        assert_eq!(options.script.as_deref(), Some(Path::new("build.ts")));
        assert_eq!(options.verbosity, Verbosity::Verbose);
        assert_eq!(options.arguments.get("target"), Some("Publish"));
        assert!(!options.show_help);
        assert!(options.prelude.is_none());
    }

    #[test]
    fn test_flag_case_insensitive() {
        let options = parse(&["-VERBOSITY=quiet", "-Help"]).unwrap();
        assert_eq!(options.verbosity, Verbosity::Quiet);
        assert!(options.show_help);
    }

    #[test]
    fn test_verbosity_abbreviation() {
        let options = parse(&["-v=d"]).unwrap();
        assert_eq!(options.verbosity, Verbosity::Diagnostic);
    }

    #[test]
    fn test_bare_flag_is_true() {
        let options = parse(&["-rebuild"]).unwrap();
        assert_eq!(options.arguments.get("rebuild"), Some("true"));
    }

    #[test]
    fn test_prelude_flag() {
        let options = parse(&["-prelude"]).unwrap();
        assert_eq!(options.prelude, Some(PreludeTarget::Stdout));

        let options = parse(&["-prelude=out.ts"]).unwrap();
        assert_eq!(
            options.prelude,
            Some(PreludeTarget::File(PathBuf::from("out.ts")))
        );
    }

    #[test]
    fn test_version_flag() {
        let options = parse(&["-version"]).unwrap();
        assert!(options.show_version);
    }

    #[test]
    fn test_verbosity_requires_value() {
        let err = parse(&["-verbosity"]).unwrap_err();
        assert!(err.to_string().contains("requires a value"));
    }

    #[test]
    fn test_invalid_verbosity() {
        let err = parse(&["-verbosity=chatty"]).unwrap_err();
        assert!(err.to_string().contains("chatty"));
    }

    #[test]
    fn test_second_script_rejected() {
        let err = parse(&["a.ts", "b.ts"]).unwrap_err();
        assert!(err.to_string().contains("unexpected argument"));
    }

    #[test]
    fn test_prelude_tool_surface() {
        let prelude = render_prelude().unwrap();
        assert!(prelude.starts_with("// Lathe build prelude"));
        assert!(prelude.contains("declare const lib: {"));
        assert!(prelude.contains("export function cargoBuild(manifestPath: string): void {"));
        assert!(prelude.contains("export function npmPack(packageDir: string): string {"));
        assert!(prelude.contains("export interface CargoBuildSettings {"));
        assert!(prelude.contains("export interface NpmPublishSettings {"));
    }
}
