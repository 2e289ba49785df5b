//! Reduce task execution.

use std::fs::File;
use std::io::{BufReader, Write};
use std::path::Path;

use anyhow::{Context, Result};
use tempfile::NamedTempFile;
use tracing::info;

use common::{codec, KeyValue, ReduceFn};

/// Run one reduce task over every intermediate file of a partition.
///
/// All pairs are decoded into memory, sorted by key, and each maximal run
/// of equal keys is handed to the reduce function. Output lines are staged
/// in a temporary file and renamed to `mr-out-<partition>.txt` at the end;
/// the rename is atomic within `dir`, so a stale worker racing a live one
/// can only ever leave a single complete output behind.
pub fn perform_reduce(
    task_id: &str,
    inputs: &[String],
    reduce_fn: ReduceFn,
    dir: &Path,
) -> Result<()> {
    info!("starting reduce task {} over {} files", task_id, inputs.len());

    let mut pairs: Vec<KeyValue> = Vec::new();
    for file_name in inputs {
        let file =
            File::open(dir.join(file_name)).with_context(|| format!("cannot open {file_name}"))?;
        pairs.extend(codec::read_records(BufReader::new(file))?);
    }

    pairs.sort_by(|a, b| a.key.cmp(&b.key));

    let mut out = NamedTempFile::new_in(dir)?;
    let mut start = 0;
    while start < pairs.len() {
        let key = &pairs[start].key;
        let mut end = start + 1;
        while end < pairs.len() && &pairs[end].key == key {
            end += 1;
        }
        let values: Vec<String> = pairs[start..end]
            .iter()
            .map(|pair| pair.value.clone())
            .collect();
        writeln!(out, "{} {}", key, reduce_fn(key, &values))?;
        start = end;
    }

    out.persist(dir.join(format!("mr-out-{task_id}.txt")))?;
    Ok(())
}
