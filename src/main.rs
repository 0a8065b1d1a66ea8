//! sdkgen CLI entrypoint
//! Parses command-line arguments and dispatches to the generate use case.
#![deny(unsafe_code)]

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use sdkgen::application::{GenerateSdkRequest, GenerateSdkUseCase, SdkgenConfig};
use sdkgen::infrastructure::{FileModelLoader, FileSystemOutputService, GeneratorRegistry};
use tracing::{Level, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "sdkgen")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Log per-declaration decisions
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(clap::Subcommand, Debug)]
pub enum Commands {
    /// Generate SDK sources from a model document
    Generate {
        /// Model document (JSON or YAML)
        #[arg(long)]
        model: PathBuf,
        /// Target language, alias or file extension; repeatable
        #[arg(long = "target", short = 't')]
        targets: Vec<String>,
        /// API version the SDK targets (default: config, else 4.0)
        #[arg(long)]
        api_version: Option<String>,
        /// Base of the generated package name
        #[arg(long)]
        package_base: Option<String>,
        /// Directory generated files are written under
        #[arg(long)]
        output_dir: Option<PathBuf>,
        /// Configuration file (default: ./sdkgen.toml when present)
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// List the registered target languages
    Targets,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(level.into()))
        .init();

    let registry = Arc::new(GeneratorRegistry::new());
    match cli.command {
        Commands::Targets => {
            for language in registry.supported_languages() {
                println!(
                    "{:<12} aliases: {:<24} extensions: {}",
                    language,
                    language.aliases().join(", "),
                    language.file_extensions().join(", ")
                );
            }
        }
        Commands::Generate {
            model,
            targets,
            api_version,
            package_base,
            output_dir,
            config,
        } => {
            let config = SdkgenConfig::discover(config.as_deref())
                .await
                .context("Failed to read configuration")?;

            let mut options = config.generator_options();
            if let Some(api_version) = api_version {
                options.api_version = api_version;
            }
            if let Some(package_base) = package_base {
                options.package_base = package_base;
            }
            let targets = if targets.is_empty() {
                config.targets.clone()
            } else {
                targets
            };

            let request = GenerateSdkRequest {
                model_path: model.to_string_lossy().into_owned(),
                targets,
                options,
                output_dir: output_dir.unwrap_or_else(|| config.output_dir()),
            };

            let use_case = GenerateSdkUseCase::new(
                registry,
                Arc::new(FileModelLoader::new()),
                Arc::new(FileSystemOutputService::default()),
            );
            let response = use_case
                .execute(request)
                .await
                .context("SDK generation failed")?;

            for target in &response.targets {
                info!("{}: {} files", target.language, target.files.len());
            }
            info!(
                "Wrote {} files, {} unchanged, under {}",
                response.written,
                response.unchanged,
                response.output_path.display()
            );
        }
    }

    Ok(())
}
