//! chatdesk HTTP server and CLI entry point.
//!
//! Binary name: `chatdesk`
//!
//! Parses CLI arguments, initializes tracing, configuration, the database
//! and services, then dispatches to the requested command.

mod cli;
mod http;
mod state;

use clap::Parser;

use chatdesk_infra::config::{load_config, resolve_data_dir};
use chatdesk_observe::tracing_setup::{TracingOptions, init_tracing, shutdown_tracing};

use cli::{Cli, Commands};
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let options = TracingOptions::from_verbosity(cli.verbose, cli.quiet)
        .json(cli.log_json)
        .otel(cli.otel);
    init_tracing(&options).map_err(|e| anyhow::anyhow!("failed to initialize tracing: {e}"))?;

    let data_dir = resolve_data_dir();
    let mut config = load_config(&data_dir).await;

    if let Commands::Serve { port, host } = &cli.command {
        if let Some(port) = port {
            config.server.port = *port;
        }
        if let Some(host) = host {
            config.server.host = host.clone();
        }
    }
    let addr = format!("{}:{}", config.server.host, config.server.port);

    let state = AppState::init(config).await?;

    match cli.command {
        Commands::Serve { .. } => {
            if !state.chat.provider().has_api_key() && !cli.quiet {
                println!(
                    "  {} DEEPSEEK_API_KEY is not set; chat requests will fail until it is.",
                    console::style("!").yellow().bold()
                );
            }

            state.purge_expired_credentials().await?;
            let listener = tokio::net::TcpListener::bind(&addr).await?;

            if !cli.quiet {
                println!(
                    "  {} chatdesk listening on {}",
                    console::style("⚡").bold(),
                    console::style(format!("http://{addr}")).cyan()
                );
                println!("  {}", console::style("Press Ctrl+C to stop").dim());
            }
            tracing::info!(%addr, "Server started");

            let db_pool = state.db_pool.clone();
            let router = http::router::build_router(state);

            axum::serve(listener, router)
                .with_graceful_shutdown(shutdown_signal())
                .await?;

            db_pool.close().await;
            if !cli.quiet {
                println!("\n  Server stopped.");
            }
        }

        Commands::Migrate => {
            // AppState::init has already applied pending migrations.
            let purged = state.purge_expired_credentials().await?;
            if !cli.quiet {
                println!(
                    "  {} Database is up to date ({})",
                    console::style("✓").green().bold(),
                    console::style(state.config.database_url()).dim()
                );
                println!(
                    "  {} Purged {} expired sessions and {} spent reset links",
                    console::style("✓").green().bold(),
                    purged.sessions,
                    purged.resets
                );
            }
            state.db_pool.close().await;
        }

        Commands::Check => {
            cli::check::check(&state, cli.json).await?;
        }
    }

    shutdown_tracing();
    Ok(())
}

/// Wait for Ctrl+C or SIGTERM for graceful shutdown.
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
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
