/// mdreader - Audio metadata reader service
use anyhow::Context;
use clap::{Parser, Subcommand};
use mdreader_server::{api, config::ServiceConfig, stdio, AppState, RequestService};
use mdreader_tags::{Assembler, ExtractionPool};
use std::{net::SocketAddr, path::PathBuf, sync::Arc};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "mdreader")]
#[command(about = "Reads audio file tags into one release per directory", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve {
        /// Configuration file path
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Answer line-delimited JSON requests on stdin
    Stdio {
        /// Configuration file path
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Print the release for one directory
    Release {
        /// Album directory
        dir: PathBuf,
        /// Configuration file path
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Pretty-print the JSON output
        #[arg(long)]
        pretty: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config_path = match &cli.command {
        Commands::Serve { config }
        | Commands::Stdio { config }
        | Commands::Release { config, .. } => config.clone(),
    };
    let config = ServiceConfig::load(config_path.as_deref())?;
    config.validate()?;

    // stdout carries responses, so logs go to stderr
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.logging.filter.as_str().into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let service = Arc::new(build_service(&config)?);

    match cli.command {
        Commands::Serve { .. } => serve(&config, service).await?,
        Commands::Stdio { .. } => {
            tokio::task::spawn_blocking(move || {
                let stdin = std::io::stdin();
                let stdout = std::io::stdout();
                stdio::run_stdio(&service, stdin.lock(), stdout.lock())
            })
            .await??;
        }
        Commands::Release { dir, pretty, .. } => {
            if !print_release(&service, dir, pretty).await? {
                std::process::exit(1);
            }
        }
    }

    Ok(())
}

fn build_service(config: &ServiceConfig) -> anyhow::Result<RequestService> {
    let pool = ExtractionPool::new(config.extraction.workers)
        .context("failed to build extraction pool")?;
    tracing::info!("Extraction pool started with {} workers", pool.workers());

    let assembler = Assembler::new(Arc::new(pool), config.extract_limits());
    Ok(RequestService::new(assembler))
}

async fn serve(config: &ServiceConfig, service: Arc<RequestService>) -> anyhow::Result<()> {
    tracing::info!("Starting mdreader");
    tracing::info!("Host: {}", config.server.host);
    tracing::info!("Port: {}", config.server.port);

    let app = api::router(AppState::new(service));

    let addr = SocketAddr::from((
        config.server.host.parse::<std::net::IpAddr>()?,
        config.server.port,
    ));

    tracing::info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Print the release or error envelope; `false` when the request failed
async fn print_release(
    service: &Arc<RequestService>,
    dir: PathBuf,
    pretty: bool,
) -> anyhow::Result<bool> {
    let service = Arc::clone(service);
    let dir = dir.to_string_lossy().into_owned();
    let (body, ok) =
        tokio::task::spawn_blocking(move || stdio::release_once(&service, &dir, pretty)).await?;
    println!("{}", body);
    Ok(ok)
}
