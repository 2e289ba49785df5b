//
// Import gRPC stubs/definitions.
//
pub use mapreduce::coordinator_server::{Coordinator, CoordinatorServer};
pub use mapreduce::{OperationStatus, OperationType, WorkerView};
pub mod mapreduce {
    tonic::include_proto!("mapreduce");
}

use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use tokio::net::UnixListener;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio_stream::wrappers::UnixListenerStream;
use tonic::transport::Server;
use tonic::{Request, Response, Status};
use tracing::{debug, error, info};

use crate::state::{Assignment, JobState, OpKind};

/// The coordinator's RPC service.
///
/// All job state sits behind one mutex. Every request handler and every
/// reclaim sweep takes the lock for its whole critical section, and no
/// critical section awaits anything.
#[derive(Debug)]
pub struct MRCoordinator {
    state: Arc<Mutex<JobState>>,
}

impl MRCoordinator {
    fn new(state: Arc<Mutex<JobState>>) -> Self {
        MRCoordinator { state }
    }
}

#[tonic::async_trait]
impl Coordinator for MRCoordinator {
    /// The single RPC. The worker reports its own view of itself; the
    /// reply is the authoritative next view, which the worker adopts
    /// verbatim.
    async fn report_and_request(
        &self,
        request: Request<WorkerView>,
    ) -> Result<Response<WorkerView>, Status> {
        let view = request.into_inner();
        let mut state = self.state.lock().await;

        let reply = match view.status() {
            OperationStatus::Idle => match state.assign() {
                Some(assignment) => {
                    info!(
                        "assigned {:?} task {} to worker {}",
                        assignment.op, assignment.task_id, assignment.worker_id
                    );
                    assignment_view(assignment, state.n_reduce())
                }
                None => idle_view(view.worker_id, state.n_reduce()),
            },
            OperationStatus::Completed => {
                if state.commit(view.worker_id, &view.task_completion_file_names) {
                    info!("worker {} completed its task", view.worker_id);
                } else {
                    debug!(
                        "dropping completion report from worker {} with no live lease",
                        view.worker_id
                    );
                }
                // No assignment chaining: the worker goes back to idle and
                // asks again on its next tick.
                idle_view(view.worker_id, state.n_reduce())
            }
            // Anything else is a worker that lost the plot; the idle reply
            // resynchronizes it.
            OperationStatus::Processing => idle_view(view.worker_id, state.n_reduce()),
        };

        Ok(Response::new(reply))
    }
}

fn idle_view(worker_id: i32, n_reduce: u32) -> WorkerView {
    WorkerView {
        worker_id,
        status: OperationStatus::Idle as i32,
        n_reduce,
        ..Default::default()
    }
}

fn assignment_view(assignment: Assignment, n_reduce: u32) -> WorkerView {
    let operation_type = match assignment.op {
        OpKind::Map => OperationType::Map,
        OpKind::Reduce => OperationType::Reduce,
    };
    WorkerView {
        worker_id: assignment.worker_id,
        status: OperationStatus::Processing as i32,
        operation_type: operation_type as i32,
        file_names: assignment.file_names,
        task_id: assignment.task_id,
        n_reduce,
        task_completion_file_names: Vec::new(),
    }
}

/// Handle returned by [`make_coordinator`]. The outer driver polls
/// [`CoordinatorHandle::done`], nominally once per second.
pub struct CoordinatorHandle {
    state: Arc<Mutex<JobState>>,
    server: JoinHandle<()>,
}

impl CoordinatorHandle {
    /// True once every map and reduce task has completed.
    ///
    /// Each call also ages the outstanding leases and reclaims those whose
    /// worker has gone silent, so the driver's polling doubles as the
    /// liveness sweep.
    pub async fn done(&self) -> bool {
        let mut state = self.state.lock().await;
        for worker_id in state.reclaim_expired() {
            info!("reclaimed lease of silent worker {}", worker_id);
        }
        state.done()
    }

    /// Stop serving. In-flight requests are dropped.
    pub fn shutdown(&self) {
        self.server.abort();
    }
}

/// Create the job state for `files` and start serving the RPC on the Unix
/// socket at `socket`.
///
/// One map task is created per input file. Reduce tasks appear later, as
/// committing map workers report the partition files they produced.
pub async fn make_coordinator(
    files: Vec<String>,
    n_reduce: u32,
    socket: &Path,
) -> Result<CoordinatorHandle> {
    let state = Arc::new(Mutex::new(JobState::new(files, n_reduce)));

    // A previous run may have left its socket behind.
    let _ = std::fs::remove_file(socket);
    let listener = UnixListener::bind(socket)?;
    let incoming = UnixListenerStream::new(listener);

    info!("coordinator listening on {}", socket.display());

    let service = CoordinatorServer::new(MRCoordinator::new(Arc::clone(&state)));
    let server = tokio::spawn(async move {
        if let Err(e) = Server::builder()
            .add_service(service)
            .serve_with_incoming(incoming)
            .await
        {
            error!("coordinator server exited: {}", e);
        }
    });

    Ok(CoordinatorHandle { state, server })
}
