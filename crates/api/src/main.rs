use std::future::IntoFuture;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cybersim_api::config::ServerConfig;
use cybersim_api::router::build_app_router;
use cybersim_api::state::AppState;
use cybersim_assistant::{AssistantConfig, GenerativeClient};
use cybersim_mail::{LogMailer, Mailer, SmtpConfig, SmtpMailer};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cybersim_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    // --- Database ---
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let pool = cybersim_db::create_pool(&database_url)
        .await
        .expect("Failed to connect to database");
    tracing::info!("Database connection pool created");

    cybersim_db::health_check(&pool)
        .await
        .expect("Database health check failed");
    tracing::info!("Database health check passed");

    cybersim_db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Database migrations applied");

    let granted = cybersim_api::bootstrap::grant_configured_admins(&pool, &config.admin_emails)
        .await
        .expect("Failed to grant configured admin roles");
    tracing::info!(
        configured = config.admin_emails.len(),
        granted,
        "Admin accounts checked"
    );

    // --- Mail ---
    let mailer: Arc<dyn Mailer> = match SmtpConfig::from_env() {
        Some(smtp) => Arc::new(SmtpMailer::new(&smtp).expect("Invalid SMTP configuration")),
        None => Arc::new(LogMailer::new()),
    };
    tracing::info!(kind = mailer.kind(), "Mailer configured");

    // --- Generative assistant ---
    let assistant = GenerativeClient::new(AssistantConfig::from_env())
        .expect("Failed to build generative API client");
    tracing::info!(
        configured = assistant.is_configured(),
        model = assistant.model(),
        "Assistant client created"
    );

    // --- App state + router ---
    let shutdown_timeout = Duration::from_secs(config.shutdown_timeout_secs);
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    let state = AppState::new(pool.clone(), config.clone(), mailer, assistant);
    let app = build_app_router(state, &config);

    // --- Start server ---
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    let (signal_tx, signal_rx) = tokio::sync::oneshot::channel::<()>();
    let mut server = tokio::spawn(
        axum::serve(
            listener,
            app.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(async move {
            shutdown_signal().await;
            let _ = signal_tx.send(());
        })
        .into_future(),
    );

    // Once a signal arrives, in-flight requests get `shutdown_timeout` to drain.
    tokio::select! {
        result = &mut server => {
            result.expect("Server task panicked").expect("Server error");
        }
        () = async {
            let _ = signal_rx.await;
            tokio::time::sleep(shutdown_timeout).await;
        } => {
            tracing::warn!(
                timeout_secs = shutdown_timeout.as_secs(),
                "Graceful shutdown timed out, dropping open connections"
            );
            server.abort();
        }
    }

    pool.close().await;
    tracing::info!("Graceful shutdown complete");
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
