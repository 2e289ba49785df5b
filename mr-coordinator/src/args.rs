use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Input files; one map task is created per file.
    #[arg(required = true)]
    pub files: Vec<String>,

    /// The number of reduce partitions.
    #[arg(short, long, default_value_t = 10)]
    pub n_reduce: u32,

    /// Unix socket path to serve on. Defaults to /var/tmp/mr-<uid>.
    #[arg(short, long)]
    pub socket: Option<PathBuf>,
}
