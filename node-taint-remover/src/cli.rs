use std::net::SocketAddr;
use std::time::Duration;

use clap::Parser;
use node_taint::BackoffPolicy;

#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
pub(crate) struct Cli {
    /// Name of the node to untaint
    #[arg(long, env = "NODE_NAME")]
    pub(crate) node_name: String,

    /// CSI driver name, the removed taint is `<driver>/agent-not-ready`
    #[arg(long, env = "CSI_DRIVER_NAME")]
    pub(crate) driver_name: String,

    /// Delay before the second attempt, as a Go duration (`500ms`, `2s`)
    #[arg(long, default_value = "500ms", value_parser = parse_duration)]
    pub(crate) initial_delay: Duration,

    /// Factor applied to the delay after every failed attempt
    #[arg(long, default_value_t = 2.0)]
    pub(crate) multiplier: f64,

    /// Attempts made before giving up
    #[arg(long, default_value_t = 10)]
    pub(crate) max_attempts: u32,

    /// Upper bound for a single delay, as a Go duration
    #[arg(long, value_parser = parse_duration)]
    pub(crate) max_delay: Option<Duration>,

    /// Serve /healthz, /readyz and /status on this address and keep running
    #[arg(long, env = "STATUS_ADDRESS")]
    pub(crate) listen: Option<SocketAddr>,
}

impl Cli {
    pub(crate) fn backoff_policy(&self) -> BackoffPolicy {
        BackoffPolicy::new(self.initial_delay, self.multiplier, self.max_attempts)
            .with_max_delay(self.max_delay)
    }
}

fn parse_duration(text: &str) -> Result<Duration, String> {
    let nanos = go_parse_duration::parse_duration(text)
        .map_err(|err| format!("invalid duration {text:?}: {err:?}"))?;
    u64::try_from(nanos)
        .map(Duration::from_nanos)
        .map_err(|_| format!("negative duration {text:?}"))
}
