use std::io;
use std::net::SocketAddr;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use node_taint::RemovalState;
use tokio::net::TcpListener;
use tokio::sync::watch;

type RemovalStatus = watch::Receiver<RemovalState>;

/// Serves the removal status until SIGINT or SIGTERM.
pub(crate) async fn serve(addr: SocketAddr, state: RemovalStatus) -> io::Result<()> {
    let listener = TcpListener::bind(addr).await?;
    if let Ok(addr) = listener.local_addr() {
        tracing::info!("Listening on http://{addr}");
    }
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
}

fn router(state: RemovalStatus) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        .route("/status", get(status))
        .with_state(state)
}

async fn healthz() -> &'static str {
    "ok"
}

async fn readyz(State(state): State<RemovalStatus>) -> Readiness {
    match *state.borrow() {
        RemovalState::Succeeded { .. } => Readiness::Ready,
        _ => Readiness::NotReady,
    }
}

async fn status(State(state): State<RemovalStatus>) -> Json<RemovalState> {
    Json(*state.borrow())
}

#[derive(Debug)]
enum Readiness {
    Ready,
    NotReady,
}

impl IntoResponse for Readiness {
    fn into_response(self) -> Response {
        match self {
            Self::Ready => (StatusCode::OK, "Ok").into_response(),
            Self::NotReady => (StatusCode::SERVICE_UNAVAILABLE, "NotReady").into_response(),
        }
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(%err, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::error!(%err, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };
    tokio::select! {
        () = ctrl_c => tracing::info!("Captured Ctrl+C signal"),
        () = terminate => tracing::info!("Captured SIGTERM signal"),
    }
}
