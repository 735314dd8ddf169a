//! Jenkins Notifier server binary.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;

use jenkins_notifier::config::NotifierConfig;
use jenkins_notifier::routes::{self, NotifierState, WEBHOOK_PATH};
use jenkins_notifier::services::dispatcher::{ChatWebhookDispatcher, Dispatcher, LogDispatcher};
use jenkins_notifier::services::status_store::MemoryStatusStore;

#[derive(Parser)]
#[command(name = "jenkins-notifier", about = "Jenkins build notifications for chat")]
struct Cli {
    /// Server port
    #[arg(short, long, env = "NOTIFIER_PORT", default_value = "8080")]
    port: u16,

    /// Chat-bot endpoint receiving outgoing messages
    #[arg(long, env = "NOTIFIER_CHAT_URL")]
    chat_url: Option<String>,

    /// Trace every incoming notification
    #[arg(long)]
    trace: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_default();
    if log_format == "json" {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "info".into()),
            )
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "info".into()),
            )
            .init();
    }

    let cli = Cli::parse();

    tracing::info!("Starting Jenkins Notifier...");

    let mut config = NotifierConfig::from_env();
    if let Some(chat_url) = cli.chat_url {
        config.chat_url = chat_url;
    }
    config.trace_all |= cli.trace;

    let dispatcher: Arc<dyn Dispatcher> = if config.chat_url.is_empty() {
        Arc::new(LogDispatcher)
    } else {
        tracing::info!(chat_url = %config.chat_url, "Delivering messages to chat webhook");
        Arc::new(ChatWebhookDispatcher::new(
            config.chat_url.clone(),
            config.chat_token.clone(),
            Duration::from_secs(config.dispatch_timeout_secs),
        )?)
    };

    let state = NotifierState {
        store: Arc::new(MemoryStatusStore::new()),
        dispatcher,
        config,
    };
    let app = routes::notifier_router(state);

    // Initialize metrics
    jenkins_notifier::metrics::init_metrics();

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], cli.port));
    tracing::info!(
        "Jenkins Notifier listening on {}; point Jenkins at http://<host>:{}{}?room=<room>",
        addr,
        cli.port,
        WEBHOOK_PATH
    );

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Shutdown complete");

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("Received SIGINT, shutting down..."),
        _ = terminate => tracing::info!("Received SIGTERM, shutting down..."),
    }
}
