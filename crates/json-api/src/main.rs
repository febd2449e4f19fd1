//! Tindahan JSON API Server

use std::{process, sync::Arc};

use salvo::prelude::*;
use tracing::{error, info};

use tindahan_app::{context::AppContext, rate_limit::RateLimiters};

use crate::{config::ServerConfig, state::State};

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

mod accounts;
mod auth;
mod config;
mod extensions;
mod healthcheck;
mod observability;
mod products;
mod rate_limit;
mod reports;
mod router;
mod sales;
mod shutdown;
mod state;
#[cfg(test)]
mod test_helpers;

/// Tindahan JSON API Server entry point
#[tokio::main]
pub async fn main() {
    let config = ServerConfig::load().unwrap_or_else(|e| {
        #[expect(
            clippy::print_stderr,
            reason = "logging not initialized yet, must use eprintln for config errors"
        )]
        {
            eprintln!("Configuration error: {e}");
        }

        process::exit(1);
    });

    if let Err(init_error) = observability::init(&config) {
        #[expect(
            clippy::print_stderr,
            reason = "subscriber failed to install, stderr is the only sink left"
        )]
        {
            eprintln!("Observability error: {init_error}");
        }

        process::exit(1);
    }

    let app = match AppContext::from_database_url(&config.database.database_url).await {
        Ok(app) => app,
        Err(init_error) => {
            error!("failed to initialize app context: {init_error}");

            process::exit(1);
        }
    };

    let limiters = Arc::new(RateLimiters::new(config.rate_limit.settings()));
    let sweeper = limiters.spawn_sweeper(config.rate_limit.sweep_interval());

    let state = Arc::new(
        State::new(app, limiters, config.reports.report_timezone.clone())
            .with_trusted_proxy_headers(config.server.trust_proxy_headers),
    );

    let addr = config.socket_addr();

    info!("Starting server on {addr}");

    let listener = TcpListener::new(addr).bind().await;
    let server = Server::new(listener);
    let handle = server.handle();
    let grace = config.server.shutdown_grace();

    tokio::spawn(async move {
        if let Err(error) = shutdown::listen(handle, grace).await {
            error!("failed to listen for shutdown signal: {error}");
        }
    });

    server.serve(router::app_router(state)).await;

    sweeper.stop();

    info!("server stopped");
}
