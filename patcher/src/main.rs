//! External-tool manifest patcher.
//!
//! Invoked by the installer at commit time: finds the first interpreter from
//! the configured candidate list and writes its path into the external-tool
//! manifest. Outcomes map to stable exit codes (see `exit_codes`).

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use manifest_patcher::apply::{ApplyOutcome, apply_config};
use manifest_patcher::exit_codes;
use manifest_patcher::io::config::{ConfigOverrides, PatcherConfig, load_config, render_config};
use manifest_patcher::logging;
use manifest_patcher::resolve::PathResolver;

#[derive(Parser)]
#[command(
    name = "manifest-patcher",
    version,
    about = "Point an external-tool manifest at the first interpreter found on disk"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Patch the manifest with the first existing candidate (installer commit step).
    Apply(ConfigArgs),
    /// Print the first existing candidate without touching the manifest.
    Resolve(ConfigArgs),
    /// Print the effective configuration as TOML.
    Config(ConfigArgs),
}

#[derive(Args, Debug)]
struct ConfigArgs {
    /// TOML config file; must exist when given. Built-in defaults apply without it.
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Manifest to patch.
    #[arg(long, value_name = "PATH")]
    manifest: Option<PathBuf>,

    /// Candidate interpreter path; repeat in priority order. Replaces the configured list.
    #[arg(long = "candidate", value_name = "PATH")]
    candidates: Vec<PathBuf>,

    /// Top-level manifest field to rewrite.
    #[arg(long, value_name = "NAME")]
    field: Option<String>,
}

impl ConfigArgs {
    fn load(&self) -> Result<PatcherConfig> {
        let base = match &self.config {
            Some(path) => {
                if !path.is_file() {
                    bail!("config file {} not found", path.display());
                }
                load_config(path).context("load config")?
            }
            None => PatcherConfig::default(),
        };
        let overrides = ConfigOverrides {
            manifest_path: self.manifest.clone(),
            field: self.field.clone(),
            candidates: self.candidates.clone(),
        };
        overrides.apply_to(base).context("apply command-line overrides")
    }
}

fn main() {
    logging::init();
    let code = match run() {
        Ok(code) => code,
        Err(err) => {
            eprintln!("{:#}", err);
            exit_codes::FAILED
        }
    };
    std::process::exit(code);
}

fn run() -> Result<i32> {
    let cli = Cli::parse();
    match cli.command {
        Command::Apply(args) => cmd_apply(&args.load()?),
        Command::Resolve(args) => cmd_resolve(&args.load()?),
        Command::Config(args) => cmd_config(&args.load()?),
    }
}

fn cmd_apply(cfg: &PatcherConfig) -> Result<i32> {
    let outcome = apply_config(cfg).context("patch manifest")?;
    Ok(report_apply(&outcome, cfg))
}

fn report_apply(outcome: &ApplyOutcome, cfg: &PatcherConfig) -> i32 {
    match outcome {
        ApplyOutcome::Applied { manifest, value } => {
            println!(
                "apply: applied manifest={} field={} value={}",
                manifest.display(),
                cfg.field,
                value
            );
            exit_codes::OK
        }
        ApplyOutcome::SkippedNoManifest { manifest } => {
            println!(
                "apply: skipped reason=no_manifest manifest={}",
                manifest.display()
            );
            exit_codes::NO_MANIFEST
        }
        ApplyOutcome::SkippedNoCandidate => {
            println!(
                "apply: skipped reason=no_candidate candidates={}",
                cfg.candidates.len()
            );
            exit_codes::NO_CANDIDATE
        }
    }
}

fn cmd_resolve(cfg: &PatcherConfig) -> Result<i32> {
    match PathResolver::from_config(cfg).resolve() {
        Some(path) => {
            println!("{}", path.display());
            Ok(exit_codes::OK)
        }
        None => {
            eprintln!(
                "resolve: none of {} candidates exist",
                cfg.candidates.len()
            );
            Ok(exit_codes::NO_CANDIDATE)
        }
    }
}

fn cmd_config(cfg: &PatcherConfig) -> Result<i32> {
    print!("{}", render_config(cfg)?);
    Ok(exit_codes::OK)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_apply_defaults() {
        let cli = Cli::parse_from(["manifest-patcher", "apply"]);
        let Command::Apply(args) = cli.command else {
            panic!("expected apply");
        };
        assert!(args.config.is_none());
        assert!(args.candidates.is_empty());
        assert_eq!(args.load().expect("load"), PatcherConfig::default());
    }

    #[test]
    fn parse_repeated_candidates_in_order() {
        let cli = Cli::parse_from([
            "manifest-patcher",
            "resolve",
            "--candidate",
            "/a",
            "--candidate",
            "/b",
        ]);
        let Command::Resolve(args) = cli.command else {
            panic!("expected resolve");
        };
        assert_eq!(
            args.load().expect("load").candidates,
            vec![PathBuf::from("/a"), PathBuf::from("/b")]
        );
    }

    #[test]
    fn parse_manifest_and_field_overrides() {
        let cli = Cli::parse_from([
            "manifest-patcher",
            "apply",
            "--manifest",
            "/tmp/tool.json",
            "--field",
            "interpreter",
        ]);
        let Command::Apply(args) = cli.command else {
            panic!("expected apply");
        };
        let cfg = args.load().expect("load");
        assert_eq!(cfg.manifest_path, PathBuf::from("/tmp/tool.json"));
        assert_eq!(cfg.field, "interpreter");
    }

    #[test]
    fn explicit_missing_config_is_rejected() {
        let temp = tempfile::tempdir().expect("tempdir");
        let missing = temp.path().join("patcher.toml");
        let cli = Cli::parse_from([
            "manifest-patcher",
            "apply",
            "--config",
            missing.to_str().expect("utf8"),
        ]);
        let Command::Apply(args) = cli.command else {
            panic!("expected apply");
        };
        let err = args.load().unwrap_err();
        assert!(err.to_string().contains("not found"), "got {err:#}");
    }

    #[test]
    fn skip_outcomes_have_distinct_exit_codes() {
        let cfg = PatcherConfig::default();
        let no_manifest = ApplyOutcome::SkippedNoManifest {
            manifest: cfg.manifest_path.clone(),
        };
        assert_eq!(report_apply(&no_manifest, &cfg), exit_codes::NO_MANIFEST);
        assert_eq!(
            report_apply(&ApplyOutcome::SkippedNoCandidate, &cfg),
            exit_codes::NO_CANDIDATE
        );
    }
}
