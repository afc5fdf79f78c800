//! voxskill CLI and HTTP skill endpoint.
//!
//! Binary name: `voxskill`
//!
//! Parses CLI arguments, initializes tracing, then either serves the skill
//! over HTTP, runs a single offline invocation, or audits the locale files.

mod cli;
mod http;
mod state;

use clap::Parser;

use cli::{Cli, Commands};
use state::AppState;
use voxskill_core::config::ConfigLoader;
use voxskill_infra::config::EnvConfigLoader;
use voxskill_observe::tracing_setup::{init_tracing, shutdown_tracing};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.log_filter(), cli.otel)
        .map_err(|e| anyhow::anyhow!("failed to initialize tracing: {e}"))?;

    let result = run(cli).await;
    shutdown_tracing();
    result
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Serve { port, host, memory } => {
            let state = AppState::init(memory).await?;

            let addr = format!("{host}:{port}");
            let listener = tokio::net::TcpListener::bind(&addr).await?;

            if !cli.quiet {
                println!(
                    "  {} voxskill listening on {}",
                    console::style("⚡").bold(),
                    console::style(format!("http://{addr}/skill")).cyan()
                );
                println!("  {}", console::style("Press Ctrl+C to stop").dim());
            }
            tracing::info!(
                %addr,
                in_memory = memory,
                languages_dir = %state.languages_dir.display(),
                "skill endpoint started"
            );

            let router = http::router::build_router(state);

            axum::serve(listener, router)
                .with_graceful_shutdown(shutdown_signal())
                .await?;

            if !cli.quiet {
                println!("\n  Server stopped.");
            }
        }

        Commands::Invoke { request, memory } => {
            let state = AppState::init(memory).await?;
            cli::invoke::invoke(&state, &request).await?;
        }

        Commands::CheckLocales { dir } => {
            let dir = match dir {
                Some(dir) => dir,
                None => EnvConfigLoader::new()
                    .require_persistence(false)
                    .load()?
                    .languages_dir,
            };
            cli::locales::check_locales(&dir, cli.quiet).await?;
        }
    }

    Ok(())
}

/// Wait for Ctrl+C or SIGTERM for graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %err, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("shutdown signal received");
}
