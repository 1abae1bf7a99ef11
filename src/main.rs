use clap::{Parser, Subcommand};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing::{info, warn};
use oxidation_search::{config::Config, routes::create_router, utils, view, AppState};

#[derive(Debug, Parser)]
#[command(name = "oxidation-search", version, about = "Search the Materials Project for oxidation states by formula")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the HTTP relay and browser search page (default)
    Serve {
        #[arg(long)]
        host: Option<String>,
        #[arg(long)]
        port: Option<u16>,
    },
    /// Interactive terminal search against a running relay
    Tui {
        #[arg(long)]
        relay_url: Option<String>,
    },
    /// Run a single search against a running relay and print the results
    Search {
        /// Formula filter, e.g. CrO3 or CrO*
        query: String,
        #[arg(long)]
        relay_url: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Config is loaded per command so a bad PORT can't block `--relay-url` clients.
    match cli.command.unwrap_or(Command::Serve { host: None, port: None }) {
        Command::Serve { host, port } => {
            utils::init_stdout();
            serve(Config::from_env()?, host, port).await
        }
        Command::Tui { relay_url } => {
            let _guard = utils::init_file(&utils::log_dir())?;
            let relay = view::RelayClient::resolve(relay_url, Config::from_env)?;
            oxidation_search::tui::run(relay).await
        }
        Command::Search { query, relay_url } => {
            utils::init_stdout();
            let relay = view::RelayClient::resolve(relay_url, Config::from_env)?;
            search_once(&relay, query).await
        }
    }
}

async fn serve(mut config: Config, host: Option<String>, port: Option<u16>) -> anyhow::Result<()> {
    if let Some(host) = host {
        config.server.host = host;
    }
    if let Some(port) = port {
        config.server.port = port;
    }
    info!("Configuration loaded: {:?}", config.server);

    if config.materials.api_key.is_none() {
        warn!("API_KEY is not set; searches will fail until it is configured");
    }

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    let app = create_router(AppState::new(config));

    info!("Server listening on {}", addr);
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .await
        .map_err(|e| anyhow::anyhow!("Server error: {}", e))?;

    Ok(())
}

async fn search_once(relay: &view::RelayClient, query: String) -> anyhow::Result<()> {
    let mut search = view::SearchView::new();
    search.set_query(query);
    search.submit(relay).await;

    if search.has_error() {
        anyhow::bail!("{}", search.error);
    }

    if search.results.is_empty() {
        println!("No results.");
        return Ok(());
    }

    println!("Results:");
    for record in &search.results {
        println!();
        for line in record.card_lines() {
            println!("{}", line);
        }
    }

    Ok(())
}
