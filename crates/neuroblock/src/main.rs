use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use neuroblock::auth::AccessTokens;
use neuroblock::config::Config;
use neuroblock::credentials::{CredentialCipher, CredentialStore};
use neuroblock::llm::{ProviderRegistry, RequestAdapter};
use neuroblock::server::{self, AppState};
use neuroblock::settings::SettingsStore;
use neuroblock::store::FileOptionStore;

#[derive(Parser, Debug)]
#[command(name = "neuroblock", version, about = "Generate WordPress blocks and pages with LLMs")]
struct Cli {
    /// Path to the YAML config file.
    #[arg(long, short, global = true, default_value = "neuroblock.yaml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the HTTP API (default).
    Serve,
    /// List configured providers and their models.
    Providers,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let config = Config::load(&cli.config)
        .await
        .with_context(|| format!("failed to load config from {}", cli.config.display()))?;

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => serve(config).await,
        Commands::Providers => providers(&config),
    }
}

async fn serve(config: Config) -> Result<()> {
    let registry = ProviderRegistry::with_endpoints(&config.endpoint_overrides())?;
    let options = Arc::new(open_store(&config.store.path).await?);
    let cipher = CredentialCipher::new(&config.site_secret()?)?;

    let access = AccessTokens::new(
        config.server.admin_token.clone(),
        config.server.editor_token.clone(),
    );
    if access.is_open() {
        warn!("No access tokens configured, API is open to anyone who can reach it");
    }

    let state = AppState {
        adapter: RequestAdapter::new(registry),
        credentials: CredentialStore::new(cipher, options.clone()),
        settings: SettingsStore::new(options, config.generation.clone()),
        access,
    };
    let app = server::build_app(state, config.server.request_timeout_seconds);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!(%addr, "NeuroBlock listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("Server stopped");
    Ok(())
}

async fn open_store(path: &Path) -> Result<FileOptionStore> {
    let store = FileOptionStore::open(path)
        .await
        .with_context(|| format!("failed to open option store at {}", path.display()))?;
    info!(path = %path.display(), "Opened option store");
    Ok(store)
}

fn providers(config: &Config) -> Result<()> {
    let registry = ProviderRegistry::with_endpoints(&config.endpoint_overrides())?;
    for provider in registry.iter() {
        println!(
            "{:<10} {:<16} {:<20} {}",
            provider.id,
            provider.display_name,
            provider.family,
            provider.models.join(", ")
        );
        println!("{:<10} {}", "", provider.endpoint);
    }
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutting down");
}
