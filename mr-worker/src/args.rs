use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Name of the MapReduce application to run.
    #[arg(short, long, default_value = "wc")]
    pub workload: String,

    /// Unix socket path of the coordinator. Defaults to /var/tmp/mr-<uid>.
    #[arg(short, long)]
    pub socket: Option<PathBuf>,
}
