//! The `mint` command-line interface.

use crate::pipeline::Orchestrator;
use anyhow::Context;
use clap::{Parser, Subcommand};
use mint_ir::{AutoDetectPolicy, FeatureSet, IrBuilder};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "mint", version, about = "Generate CLI projects from a command spec")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Generate a project for one target language
    Generate {
        /// Spec file (YAML or JSON)
        #[arg(long)]
        spec: PathBuf,
        /// Target language key (see `mint targets`)
        #[arg(long)]
        target: String,
        /// Output directory; defaults to the spec's output root
        #[arg(long)]
        out: Option<PathBuf>,
        /// Print artifact metadata as JSON instead of writing files
        #[arg(long)]
        dry_run: bool,
    },
    /// Validate a spec, reporting every violation at once
    Validate {
        /// Spec file (YAML or JSON)
        #[arg(long)]
        spec: PathBuf,
    },
    /// Show the feature set a spec would derive
    Features {
        /// Spec file (YAML or JSON)
        #[arg(long)]
        spec: PathBuf,
    },
    /// List registered target languages
    Targets,
}

pub fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Command::Generate {
            spec,
            target,
            out,
            dry_run,
        } => generate(&spec, &target, out.as_deref(), dry_run),
        Command::Validate { spec } => validate(&spec),
        Command::Features { spec } => features(&spec),
        Command::Targets => {
            for renderer in mint_render::renderers() {
                println!("{:8}  {}", renderer.target(), renderer.summary());
            }
            Ok(())
        }
    }
}

fn load(path: &Path) -> anyhow::Result<mint_config::Spec> {
    mint_config::load_spec(path).with_context(|| format!("loading spec {}", path.display()))
}

fn generate(spec_path: &Path, target: &str, out: Option<&Path>, dry_run: bool) -> anyhow::Result<()> {
    let spec = load(spec_path)?;

    if dry_run {
        let output = Orchestrator::new().build_spec(&spec, target)?;
        let listing: Vec<serde_json::Value> = output
            .artifacts
            .iter()
            .map(|a| {
                serde_json::json!({
                    "path": a.path,
                    "category": a.category,
                    "executable": a.executable,
                    "bytes": a.content.len(),
                })
            })
            .collect();
        let report = serde_json::json!({
            "target": target,
            "output_root": output.output_root,
            "features": output.features,
            "artifacts": listing,
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    // Stage in memory first; only a clean render reaches the filesystem.
    let orchestrator = Orchestrator::new();
    let out_dir = match out {
        Some(dir) => dir.to_path_buf(),
        None => PathBuf::from(
            spec.metadata
                .output_root
                .clone()
                .unwrap_or_else(|| spec.metadata.name.clone()),
        ),
    };
    let output = orchestrator.build_and_write(&spec, target, &out_dir)?;
    println!(
        "wrote {} artifacts to {}",
        output.artifacts.len(),
        out_dir.display()
    );
    Ok(())
}

fn validate(spec_path: &Path) -> anyhow::Result<()> {
    let spec = load(spec_path)?;
    let ir = IrBuilder::build(&spec).map_err(anyhow::Error::new)?;
    println!(
        "ok: {} command{}",
        ir.command_count(),
        if ir.command_count() == 1 { "" } else { "s" }
    );
    Ok(())
}

fn features(spec_path: &Path) -> anyhow::Result<()> {
    let spec = load(spec_path)?;
    let ir = IrBuilder::build(&spec).map_err(anyhow::Error::new)?;
    let policy = AutoDetectPolicy::from(&spec.features.auto);
    let features = FeatureSet::analyze(&ir, &policy);
    println!("{}", serde_json::to_string_pretty(&features)?);
    Ok(())
}
