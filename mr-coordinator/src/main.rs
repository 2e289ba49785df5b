mod args;

use std::time::Duration;

use clap::Parser;
use tracing::info;

use args::Args;
use common::socket::coordinator_sock;
use mr_coordinator::make_coordinator;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let args = Args::parse();
    let socket = args.socket.unwrap_or_else(coordinator_sock);

    let handle = make_coordinator(args.files, args.n_reduce, &socket).await?;

    while !handle.done().await {
        tokio::time::sleep(Duration::from_secs(1)).await;
    }

    info!("job complete");
    Ok(())
}
