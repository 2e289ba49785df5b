mod args;

use anyhow::anyhow;
use clap::Parser;
use tracing::info;

use args::Args;
use common::socket::coordinator_sock;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let args = Args::parse();
    let socket = args.socket.unwrap_or_else(coordinator_sock);

    let workload = match workload::try_named(&args.workload) {
        Some(workload) => workload,
        None => {
            return Err(anyhow!("the workload `{}` is not a known workload", args.workload).into())
        }
    };

    info!("worker starting with workload `{}`", args.workload);
    mr_worker::core::run(workload, socket, ".".into()).await?;
    Ok(())
}
