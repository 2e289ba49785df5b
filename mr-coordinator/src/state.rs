//! The coordinator's task state machine.
//!
//! Everything the coordinator knows about a job lives in [`JobState`]: the
//! map-task table, the reduce-task table, the outstanding leases and the
//! worker-id counter. The RPC layer keeps one `JobState` behind a single
//! mutex and calls into it with the lock held, so every method here can
//! assume it has exclusive access.

pub type WorkerId = i32;

/// A lease older than this many reclaim ticks belongs to a crashed or
/// unresponsive worker.
const LEASE_TICK_LIMIT: u32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskStatus {
    /// Waiting to be handed out.
    Unprocessed,

    /// Leased to a worker.
    Processing,

    /// Finished. Terminal.
    Completed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpKind {
    Map,
    Reduce,
}

/// One unit of work: a single input file for map, a single intermediate
/// file for reduce.
#[derive(Debug)]
struct Task {
    status: TaskStatus,
    file_name: String,
}

/// An outstanding assignment.
///
/// Every file a lease names is a `Processing` task, and every `Processing`
/// task is named by exactly one lease. Leases die on commit or on reclaim,
/// never otherwise.
#[derive(Debug)]
struct Lease {
    worker_id: WorkerId,
    op: OpKind,
    file_names: Vec<String>,
    ticks: u32,
}

/// A successful assignment, ready to be copied into the RPC reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    pub worker_id: WorkerId,
    pub op: OpKind,
    pub task_id: String,
    pub file_names: Vec<String>,
}

#[derive(Debug)]
pub struct JobState {
    map_tasks: Vec<Task>,
    reduce_tasks: Vec<Task>,
    leases: Vec<Lease>,
    next_worker_id: WorkerId,
    n_reduce: u32,
}

impl JobState {
    /// One map task per input file. The reduce table starts empty and is
    /// filled in as map completions report their partition files.
    pub fn new(files: Vec<String>, n_reduce: u32) -> Self {
        let map_tasks = files
            .into_iter()
            .map(|file_name| Task {
                status: TaskStatus::Unprocessed,
                file_name,
            })
            .collect();

        Self {
            map_tasks,
            reduce_tasks: Vec::new(),
            leases: Vec::new(),
            next_worker_id: 0,
            n_reduce,
        }
    }

    pub fn n_reduce(&self) -> u32 {
        self.n_reduce
    }

    /// Hand out the next unit of work, or `None` when the caller should
    /// stay idle.
    ///
    /// Map tasks go out first, in table order. Reduce work is held back
    /// until every map task has completed; the first unprocessed reduce
    /// entry then pulls in every other entry of its partition, and the
    /// whole group goes out under one lease with the partition id as its
    /// task id.
    pub fn assign(&mut self) -> Option<Assignment> {
        if let Some(index) = self
            .map_tasks
            .iter()
            .position(|task| task.status == TaskStatus::Unprocessed)
        {
            self.map_tasks[index].status = TaskStatus::Processing;
            let file_names = vec![self.map_tasks[index].file_name.clone()];
            let worker_id = self.fresh_worker_id();
            self.leases.push(Lease {
                worker_id,
                op: OpKind::Map,
                file_names: file_names.clone(),
                ticks: 0,
            });
            return Some(Assignment {
                worker_id,
                op: OpKind::Map,
                task_id: index.to_string(),
                file_names,
            });
        }

        // Phase barrier: no reduce task starts while a map task is still
        // unfinished, even if the map is merely in flight elsewhere.
        if !self.all_completed(OpKind::Map) {
            return None;
        }

        let partition = self
            .reduce_tasks
            .iter()
            .find(|task| task.status == TaskStatus::Unprocessed)
            .map(|task| partition_id(&task.file_name).to_string())?;

        // The partition's entries were produced by different map tasks but
        // feed one output file, so they move as a single group.
        let mut file_names = Vec::new();
        for task in &mut self.reduce_tasks {
            if partition_id(&task.file_name) == partition {
                task.status = TaskStatus::Processing;
                file_names.push(task.file_name.clone());
            }
        }

        let worker_id = self.fresh_worker_id();
        self.leases.push(Lease {
            worker_id,
            op: OpKind::Reduce,
            file_names: file_names.clone(),
            ticks: 0,
        });
        Some(Assignment {
            worker_id,
            op: OpKind::Reduce,
            task_id: partition,
            file_names,
        })
    }

    /// Apply a completion report from `worker_id`.
    ///
    /// A report with no live lease is dropped: the lease was reclaimed and
    /// the work handed to someone else, so the late results are stale.
    /// Dropping the report also keeps a twice-reported map from inserting
    /// its reduce entries twice. Returns whether the report was applied.
    pub fn commit(&mut self, worker_id: WorkerId, produced: &[String]) -> bool {
        let Some(index) = self
            .leases
            .iter()
            .position(|lease| lease.worker_id == worker_id)
        else {
            return false;
        };
        let lease = self.leases.swap_remove(index);

        for file_name in &lease.file_names {
            self.transition(lease.op, file_name, TaskStatus::Processing, TaskStatus::Completed);
        }

        if lease.op == OpKind::Map {
            for file_name in produced {
                self.reduce_tasks.push(Task {
                    status: TaskStatus::Unprocessed,
                    file_name: file_name.clone(),
                });
            }
        }
        true
    }

    /// Age every lease, reclaiming those whose worker has gone silent.
    ///
    /// Reclaimed tasks revert to `Unprocessed`, so the next assignment
    /// hands the same work to another worker. Returns the worker ids whose
    /// leases were reclaimed.
    pub fn reclaim_expired(&mut self) -> Vec<WorkerId> {
        let mut reclaimed = Vec::new();
        let mut index = 0;
        while index < self.leases.len() {
            self.leases[index].ticks += 1;
            if self.leases[index].ticks > LEASE_TICK_LIMIT {
                let lease = self.leases.swap_remove(index);
                for file_name in &lease.file_names {
                    self.transition(
                        lease.op,
                        file_name,
                        TaskStatus::Processing,
                        TaskStatus::Unprocessed,
                    );
                }
                reclaimed.push(lease.worker_id);
            } else {
                index += 1;
            }
        }
        reclaimed
    }

    /// True once every map and reduce task has completed.
    pub fn done(&self) -> bool {
        self.all_completed(OpKind::Map) && self.all_completed(OpKind::Reduce)
    }

    fn all_completed(&self, op: OpKind) -> bool {
        self.table(op)
            .iter()
            .all(|task| task.status == TaskStatus::Completed)
    }

    /// Move every task named `file_name` from `from` to `to`. Tasks in any
    /// other state are left alone, which is what makes commits idempotent
    /// and keeps reclaim from touching completed work.
    fn transition(&mut self, op: OpKind, file_name: &str, from: TaskStatus, to: TaskStatus) {
        let table = match op {
            OpKind::Map => &mut self.map_tasks,
            OpKind::Reduce => &mut self.reduce_tasks,
        };
        for task in table
            .iter_mut()
            .filter(|task| task.file_name == file_name && task.status == from)
        {
            task.status = to;
        }
    }

    fn table(&self, op: OpKind) -> &Vec<Task> {
        match op {
            OpKind::Map => &self.map_tasks,
            OpKind::Reduce => &self.reduce_tasks,
        }
    }

    fn fresh_worker_id(&mut self) -> WorkerId {
        self.next_worker_id += 1;
        self.next_worker_id
    }
}

/// Intermediate names look like `mr-<map task>-<partition>`; the partition
/// id is the final dash-separated field.
fn partition_id(file_name: &str) -> &str {
    file_name.rsplit('-').next().unwrap_or(file_name)
}
