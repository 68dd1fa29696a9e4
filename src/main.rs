use clap::{Parser, Subcommand};
use escli::cli::search::SearchArgs;
use escli::cli::BackendArgs;
use escli::config::{load_or_default, resolve_config_path};
use escli::search::ElasticsearchClient;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "escli")]
#[command(about = "Elasticsearch service client", version, long_about = None)]
struct Cli {
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Debug mode
    #[arg(long, global = true)]
    debug: bool,

    #[command(flatten)]
    backend: BackendArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search elasticsearch and report amplitude_id identities
    Search(SearchArgs),
    /// Display system-wide information
    Info,
    /// Shows the version information
    Version,
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    Init {
        #[arg(long)]
        stdout: bool,
    },
    Validate,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Logs go to stderr so stdout only carries command output
    let default_filter = if cli.debug { "escli=debug" } else { "escli=info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config_path = resolve_config_path(cli.config.as_deref());
    let stdout = std::io::stdout();

    match cli.command {
        Commands::Search(args) => {
            let mut config = load_or_default(config_path.as_deref())?;
            cli.backend.apply(&mut config.backend);
            escli::cli::search::run(config, args).await?;
        }
        Commands::Info => {
            let mut config = load_or_default(config_path.as_deref())?;
            cli.backend.apply(&mut config.backend);
            let client = ElasticsearchClient::new(&config.backend)?;
            escli::cli::info::info(&client, &mut stdout.lock()).await?;
        }
        Commands::Version => {
            let mut config = load_or_default(config_path.as_deref())?;
            cli.backend.apply(&mut config.backend);
            let client = ElasticsearchClient::new(&config.backend)?;
            escli::cli::info::version(&client, &mut stdout.lock()).await?;
        }
        Commands::Config { action } => match action {
            ConfigAction::Init { stdout: to_stdout } => {
                escli::cli::config::init(to_stdout, &mut stdout.lock())?;
            }
            ConfigAction::Validate => {
                escli::cli::config::validate(config_path, &mut stdout.lock())?;
            }
        },
    }

    Ok(())
}
