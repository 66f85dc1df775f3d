use clap::Parser as _;
use constcat::concat;
use node_taint::TaintRemover;
use node_taint_kubeapi::KubeApi;
use tracing_subscriber::EnvFilter;

mod cli;
mod status;

const DEFAULT_LOG_FILTER: &str = concat!(env!("CARGO_CRATE_NAME"), "=info,node_taint=info");

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let cli = cli::Cli::parse();

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt().with_env_filter(filter).init();
    tracing::info!(
        node = %cli.node_name,
        driver = %cli.driver_name,
        "Starting node-taint-remover"
    );

    let policy = cli.backoff_policy();
    tracing::debug!(?policy, total_delay = ?policy.total_delay(), "Using backoff policy");

    let kubeapi = KubeApi::new().await?;
    let handle = TaintRemover::new(kubeapi, &cli.node_name, &cli.driver_name, policy).spawn();

    // Without a status server there is nothing left to do once the removal settles.
    if let Some(addr) = cli.listen {
        status::serve(addr, handle.subscribe()).await?;
        tracing::info!(state = ?handle.state(), "Shutting down");
        handle.abort();
    } else {
        let state = handle.wait().await;
        tracing::info!(?state, "Taint removal finished");
    }

    Ok(())
}
