//
// Import gRPC stubs/definitions.
//
pub use mapreduce::coordinator_client::CoordinatorClient;
pub use mapreduce::{OperationStatus, OperationType, WorkerView};
pub mod mapreduce {
    tonic::include_proto!("mapreduce");
}

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::net::UnixStream;
use tonic::transport::{Endpoint, Uri};
use tonic::Request;
use tower::service_fn;
use tracing::warn;

use common::Workload;

use crate::{map, reduce};

/// How long the worker sleeps between coordinator round trips, and before
/// retrying a failed one.
const TICK: Duration = Duration::from_secs(1);

/// The worker loop. Runs until the process is killed or a task fails
/// fatally.
///
/// Each iteration reports the worker's current view of itself and adopts
/// the coordinator's reply verbatim; the reply is authoritative, so a
/// failed round trip costs nothing but a retry. An adopted `Processing`
/// view is executed on the spot; the next iteration reports it
/// `Completed` along with the files it produced.
pub async fn run(workload: Workload, socket: PathBuf, dir: PathBuf) -> Result<()> {
    let mut view = WorkerView::default();

    loop {
        match call(&socket, view.clone()).await {
            Ok(reply) => {
                view = reply;
                if view.status() == OperationStatus::Processing {
                    execute(&mut view, &workload, &dir)?;
                }
            }
            Err(e) => warn!("coordinator call failed, retrying: {}", e),
        }
        tokio::time::sleep(TICK).await;
    }
}

/// Execute the assigned task and flip the view to `Completed`.
///
/// I/O and decode errors are fatal: the error propagates out of the loop,
/// the process exits, and the coordinator reclaims the lease by timeout.
fn execute(view: &mut WorkerView, workload: &Workload, dir: &Path) -> Result<()> {
    match view.operation_type() {
        OperationType::Map => {
            let input = view
                .file_names
                .first()
                .context("map assignment carries no input file")?;
            let produced =
                map::perform_map(&view.task_id, input, view.n_reduce, workload.map_fn, dir)?;
            view.task_completion_file_names = produced;
        }
        OperationType::Reduce => {
            reduce::perform_reduce(&view.task_id, &view.file_names, workload.reduce_fn, dir)?;
        }
    }
    view.set_status(OperationStatus::Completed);
    Ok(())
}

/// One dial, one request. The endpoint URI is never resolved; the
/// connector always opens the coordinator's Unix socket.
async fn call(socket: &Path, request: WorkerView) -> Result<WorkerView> {
    let path = socket.to_path_buf();
    let channel = Endpoint::try_from("http://[::]:50051")?
        .connect_with_connector(service_fn(move |_: Uri| UnixStream::connect(path.clone())))
        .await?;

    let mut client = CoordinatorClient::new(channel);
    let reply = client.report_and_request(Request::new(request)).await?;
    Ok(reply.into_inner())
}
