use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;
use tracing_subscriber::EnvFilter;
use vsdkx_model::config::Config;
use vsdkx_model::credentials::{CredentialProvider, SecretStore};
use vsdkx_model::error::Result;
use vsdkx_model::naming::ModelName;
use vsdkx_model::package::Pip;
use vsdkx_model::project::ProjectLayout;
use vsdkx_model::store::S3Client;
use vsdkx_model::weights::ObjectStoreWeights;
use vsdkx_model::{AddOutcome, ModelCommands, ObjectStoreError, VsdkxError};

#[derive(Parser)]
#[command(name = "vsdkx-model")]
#[command(about = "Manage vsdkx model drivers in a project", long_about = None)]
struct Cli {
    /// Project root (defaults to the current directory)
    #[arg(long, global = true, default_value = ".")]
    project: PathBuf,

    /// Config file (defaults to ~/.config/vsdkx/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Object store secret file (defaults to ~/.config/vsdkx/secret.toml)
    #[arg(long, global = true)]
    secret: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Install a model driver and merge its default profile
    AddModel {
        /// Model name, e.g. yolo
        name: String,
        /// Weight files to download for the model
        weights: Vec<String>,
    },
    /// Uninstall a model driver and drop its configuration
    RemoveModel {
        /// Model name, e.g. yolo
        name: String,
        /// Passed through to the weight remover
        weights: Vec<String>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize logging
    let default_filter = if cli.verbose {
        "vsdkx_model=debug"
    } else {
        "vsdkx_model=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::from(e.exit_code())
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    // An invalid name must not reach pip, the secret store or the network
    let (Commands::AddModel { name, .. } | Commands::RemoveModel { name, .. }) = &cli.command;
    ModelName::parse(name)?;

    let config = Config::load(cli.config.as_deref())?;
    let layout = ProjectLayout::new(cli.project);

    let packages = Pip::from_config(&config.package_manager)?;
    let weights = ObjectStoreWeights::new(layout.clone());
    let commands = ModelCommands::new(layout, Box::new(packages), Box::new(weights))
        .with_missing_key(config.profile.missing_key);

    match cli.command {
        Commands::AddModel { name, weights } => {
            let secrets = match cli.secret {
                Some(path) => SecretStore::with_path(path),
                None => SecretStore::new()?,
            };
            let credentials = secrets.read_secret()?;
            let store = S3Client::new(
                &credentials,
                Duration::from_secs(config.object_store.timeout_secs),
            );

            match commands.add_model(&name, &weights, &store)? {
                AddOutcome::Added => Ok(()),
                AddOutcome::ProfileUnavailable(e) => Err(incomplete(
                    e,
                    "the package is installed but the project was not updated",
                )),
                AddOutcome::WeightsUnavailable(e) => {
                    Err(incomplete(e, "the model was added without its weights"))
                }
            }
        }
        Commands::RemoveModel { name, weights } => commands.remove_model(&name, &weights),
    }
}

/// Carry a caught object store failure to the exit code
fn incomplete(e: ObjectStoreError, what: &str) -> VsdkxError {
    tracing::warn!("add-model incomplete: {what}");
    VsdkxError::ObjectStore(e)
}
