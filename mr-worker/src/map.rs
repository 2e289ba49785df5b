//! Map task execution.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use common::{codec, ihash, KeyValue, MapFn};

/// Run one map task: read the input file, apply the map function, and
/// write one intermediate file per reduce partition. All of them are
/// written, empty ones included, so the reduce side never has to guess
/// which exist.
///
/// Returns the produced file names. The files land in `dir`; the input is
/// opened by the path the coordinator handed out.
pub fn perform_map(
    task_id: &str,
    input: &str,
    n_reduce: u32,
    map_fn: MapFn,
    dir: &Path,
) -> Result<Vec<String>> {
    info!("starting map task {} on {}", task_id, input);

    let contents = fs::read_to_string(input).with_context(|| format!("cannot read {input}"))?;
    let pairs = map_fn(input, &contents);

    let mut buckets: Vec<Vec<KeyValue>> = vec![Vec::new(); n_reduce as usize];
    for pair in pairs {
        let bucket = (ihash(pair.key.as_bytes()) % n_reduce) as usize;
        buckets[bucket].push(pair);
    }

    let mut produced = Vec::with_capacity(buckets.len());
    for (partition, bucket) in buckets.iter().enumerate() {
        let file_name = format!("mr-{task_id}-{partition}");
        let file = File::create(dir.join(&file_name))
            .with_context(|| format!("cannot create {file_name}"))?;
        let mut writer = BufWriter::new(file);
        codec::write_records(&mut writer, bucket)?;
        writer.flush()?;
        produced.push(file_name);
    }

    Ok(produced)
}

#[cfg(test)]
mod tests {
    use std::io::BufReader;

    use super::*;

    #[test]
    fn every_partition_file_is_written_even_when_empty() {
        let dir = tempfile::tempdir().expect("tempdir");
        let input = dir.path().join("a.txt");
        fs::write(&input, "hello").expect("write input");

        let produced = perform_map(
            "0",
            input.to_str().expect("utf8 path"),
            4,
            workload::wc::map,
            dir.path(),
        )
        .expect("map");

        assert_eq!(produced, vec!["mr-0-0", "mr-0-1", "mr-0-2", "mr-0-3"]);
        let mut total = 0;
        for file_name in &produced {
            let file = File::open(dir.path().join(file_name)).expect("open partition");
            total += codec::read_records(BufReader::new(file)).expect("decode").len();
        }
        // A single word lands in exactly one of the four partitions.
        assert_eq!(total, 1);
    }

    #[test]
    fn pairs_are_partitioned_by_key_hash() {
        let dir = tempfile::tempdir().expect("tempdir");
        let input = dir.path().join("a.txt");
        fs::write(&input, "foo bar foo").expect("write input");

        let produced = perform_map(
            "7",
            input.to_str().expect("utf8 path"),
            2,
            workload::wc::map,
            dir.path(),
        )
        .expect("map");

        for (partition, file_name) in produced.iter().enumerate() {
            let file = File::open(dir.path().join(file_name)).expect("open partition");
            for record in codec::read_records(BufReader::new(file)).expect("decode") {
                assert_eq!(ihash(record.key.as_bytes()) % 2, partition as u32);
            }
        }
    }

    #[test]
    fn missing_input_file_is_an_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let result = perform_map("0", "no-such-file.txt", 1, workload::wc::map, dir.path());
        assert!(result.is_err());
    }
}
