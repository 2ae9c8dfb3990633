use clap::Parser;
use saizeriya_gacha::adapters::server;
use saizeriya_gacha::core::ConfigProvider;
use saizeriya_gacha::utils::{logger, validation::Validate};
use saizeriya_gacha::{GachaError, MenuStore, NostrSigner, Responder, ServerConfig};
use std::sync::Arc;
use tokio::signal::{self, ctrl_c};

#[tokio::main]
async fn main() {
    let config = ServerConfig::parse();

    logger::init_logger(config.verbose, config.log_json);

    tracing::info!(
        "Starting {} {}",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION")
    );
    if config.verbose {
        tracing::debug!("Menu source: {:?}, port: {}", config.menu_source, config.port());
    }

    if let Err(e) = run(config).await {
        tracing::error!(
            "❌ Server stopped: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e);
        std::process::exit(1);
    }
}

async fn run(config: ServerConfig) -> Result<(), GachaError> {
    config.validate()?;

    let signer = NostrSigner::from_secret(config.secret()?)?;
    tracing::info!("🔑 Bot identity: {}", signer.npub()?);

    let source = config.build_menu_source()?;
    let store = Arc::new(MenuStore::new());
    // No previous menu exists yet, so a failed first load is fatal.
    store.try_load(source.as_ref()).await?;

    let refresher = source
        .refreshable()
        .then(|| store.spawn_refresher(source.clone(), config.refresh_interval()));

    let responder = Responder::new(store, Arc::new(signer));

    let listener = server::bind(config.port()).await?;
    tracing::info!("Server running on {}", listener.local_addr()?);

    let served = server::serve(listener, responder, shutdown_signal()).await;

    if let Some(refresher) = refresher {
        refresher.shutdown().await;
    }
    tracing::info!("Server shut down");
    served
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
        tracing::info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
                tracing::info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                tracing::error!("Failed to install signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
