mod batch;
mod cli;
mod config;
mod error;
mod manifest;
mod model;
mod report;

use clap::Parser;
use cli::{Cli, Commands};
use config::{Config, Credentials};
use error::Result;
use model::{ModelDownloader, ModelRegistry};
use std::io::Write;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = Config::from_env(cli.base_dir, Credentials::from_token(cli.token))?
        .with_registry(cli.registry)
        .with_progress(!cli.no_progress);

    let registry = ModelRegistry::load_or_builtin(config.registry_path.as_deref())?;
    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    match cli.command {
        Commands::Pull { only, strict } => {
            let registry = registry.filter(&only)?;

            writeln!(out, "Model downloader (core set)")?;
            writeln!(out, "Base dir: {}", config.base_dir.display())?;
            if config.credentials == Credentials::CachedLogin {
                tracing::debug!("No HF_TOKEN set, using cached login if present");
            }

            let downloader = ModelDownloader::from_config(&config)?;
            let reporter = batch::pull(registry.models(), &downloader, &mut out)?;

            if strict && reporter.has_failures() {
                return Err(error::Error::DownloadFailed(format!(
                    "{} of {} models failed",
                    reporter.failures().len(),
                    registry.models().len()
                )));
            }
        }

        Commands::Verify { only } => {
            let registry = registry.filter(&only)?;
            writeln!(out, "Base dir: {}", config.base_dir.display())?;
            batch::verify_existing(registry.models(), &config.base_dir, &mut out)?;
        }

        Commands::List => {
            writeln!(out, "Registered models:\n")?;
            for model in registry.models() {
                writeln!(out, "  {}", model.display_name)?;
                writeln!(out, "    Repository: {}", model.repo_id)?;
                writeln!(out, "    Folder: {}", config.base_dir.join(model.folder_name()).display())?;
                writeln!(out, "    Allow: {}", model.allow_patterns.join(", "))?;
                writeln!(
                    out,
                    "    Requires: ONNX={} CFG={} TOK={}",
                    model.verify.need_model_files, model.verify.need_config, model.verify.need_tokenizer
                )?;
                writeln!(out)?;
            }
        }

        Commands::Manifest => {
            let path = manifest::generate(&config.base_dir)?;
            writeln!(out, "✓ Wrote manifest: {}", path.display())?;
        }
    }

    Ok(())
}
