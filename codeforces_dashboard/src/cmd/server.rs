use crate::modules::{
    handlers::{
        liveness, readiness,
        users::{filter_options, refresh_users, search_users},
    },
    store::Leaderboard,
};
use anyhow::{Context, Result};
use axum::{extract::Extension, routing, Router, Server};
use clap::Args;
use codeforces_dashboard_libs::CodeforcesClient;
use std::{env, net::SocketAddr, sync::Arc};
use tower_http::services::ServeDir;

#[derive(Debug, Args)]
pub struct ServerArgs {
    #[arg(long)]
    port: Option<u16>,
}

pub async fn run(args: ServerArgs) -> Result<()> {
    let host = env::var("CODEFORCES_HOST").unwrap_or_else(|_| {
        tracing::warn!("CODEFORCES_HOST environment variable is not set. Default value `https://codeforces.com` will be used.");
        String::from("https://codeforces.com")
    });

    let client = CodeforcesClient::new(&host).with_context(|| {
        let message = "couldn't create Codeforces API client. check the value of the CODEFORCES_HOST environment variable.";
        tracing::error!(message);
        format!("{}", message)
    })?;
    let store = Leaderboard::new(client);

    let app = create_router(store);
    let port = match args.port {
        Some(port) => port,
        None => {
            tracing::warn!("API server will be launched at default port number 8000");
            8000u16
        }
    };
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Server start at port {}", port);
    Server::bind(&addr)
        .serve(app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server exited abnormally")?;

    Ok(())
}

fn create_router(store: Leaderboard<CodeforcesClient>) -> Router {
    Router::new()
        .route("/api/users", routing::get(search_users))
        .route("/api/users/options", routing::get(filter_options))
        .route("/api/users/refresh", routing::post(refresh_users))
        .route("/api/liveness", routing::get(liveness))
        .route("/api/readiness", routing::get(readiness))
        .fallback_service(ServeDir::new("assets"))
        .layer(Extension(Arc::new(store)))
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler.");
    };

    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("SIGINT signal received, starting graceful shutdown.");
}
