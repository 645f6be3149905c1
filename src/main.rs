// src/main.rs

use anyhow::Context;
use axum::serve;
use pulse_status::{
    cli::{Cli, Commands},
    config::{check_config_file, ProbeConfig},
    dashboard,
    metrics::initialize_metrics,
    probe::Prober,
    reporter::PulseClient,
    resolve_config_path, run,
};
use std::path::PathBuf;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = %e, "Failed to listen for Ctrl+C");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => { info!(signal = "Ctrl+C", "Received signal. Initiating graceful shutdown...") },
        () = terminate => { info!(signal = "Terminate", "Received signal. Initiating graceful shutdown...") },
    }
}

fn init_tracing(json_logs: bool) {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(env_filter);
    if json_logs {
        registry
            .with(fmt::layer().json().with_current_span(true).with_span_list(true))
            .init();
    } else {
        registry.with(fmt::layer().pretty()).init();
    }
}

async fn serve_app(config_path: Option<PathBuf>) -> anyhow::Result<()> {
    let metrics_handle = match initialize_metrics() {
        Ok(handle) => Some(handle),
        Err(e) => {
            warn!(error = %e, "Metrics disabled");
            None
        }
    };

    let (app, config) = run(config_path, metrics_handle)
        .await
        .context("application setup failed")?;

    let addr = (config.server.host.as_str(), config.server.port);
    let listener = TcpListener::bind(addr).await.map_err(|e| {
        error!(server.host = %config.server.host, server.port = config.server.port, error = ?e, "Failed to bind to address. Exiting.");
        e
    })?;
    info!(server.address = %listener.local_addr()?, "Server listening");

    serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server run loop failed")?;

    info!("Server shut down gracefully.");
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse_args();
    init_tracing(cli.json_logs);

    match cli.command {
        None | Some(Commands::Serve) => serve_app(cli.config).await,
        Some(Commands::Watch {
            url,
            interval,
            once,
        }) => {
            dashboard::watch(&url, Duration::from_secs(interval.max(1)), once).await?;
            Ok(())
        }
        Some(Commands::Pulse {
            url,
            monitor,
            status,
            latency,
            target,
            secret,
        }) => {
            let client = PulseClient::new(&url, secret, Duration::from_secs(10))?;
            let accepted = match target {
                Some(target) => {
                    let prober = Prober::new(&ProbeConfig::default())?;
                    client.send_probed(&prober, &monitor, &target).await?
                }
                None => client.send(&monitor, status.into(), latency).await?,
            };
            println!("accepted at {}", accepted.timestamp);
            Ok(())
        }
        Some(Commands::CheckConfig { file }) => {
            let path = resolve_config_path(file.or(cli.config));
            let config = check_config_file(&path)
                .with_context(|| format!("invalid configuration in {}", path.display()))?;
            println!(
                "{} is valid: {} monitors, status mode {:?}",
                path.display(),
                config.monitors.len(),
                config.status.mode
            );
            Ok(())
        }
    }
}
