//! Shared types for the MapReduce coordinator and its workers.
//!
//! Users specify map and reduce functions, and the coordinator distributes
//! the work to worker processes running on the same machine. All data lives
//! on the local filesystem, in the job's working directory.

use serde::{Deserialize, Serialize};

pub mod codec;
pub mod socket;

/////////////////////////////////////////////////////////////////////////////
// MapReduce application types
/////////////////////////////////////////////////////////////////////////////

/// A map function takes an input file name and its full contents.
///
/// It returns the intermediate key-value pairs emitted for that file.
pub type MapFn = fn(file_name: &str, contents: &str) -> Vec<KeyValue>;

/// A reduce function takes a key and every value emitted for that key,
/// in intermediate-file order. It returns a single output value.
pub type ReduceFn = fn(key: &str, values: &[String]) -> String;

/// A map reduce application.
#[derive(Copy, Clone)]
pub struct Workload {
    pub map_fn: MapFn,
    pub reduce_fn: ReduceFn,
}

/////////////////////////////////////////////////////////////////////////////
// Key-value pairs
/////////////////////////////////////////////////////////////////////////////

/// A single key-value pair.
#[derive(Clone, Eq, PartialEq, Hash, Debug, Serialize, Deserialize)]
pub struct KeyValue {
    /// The key.
    pub key: String,

    /// The value.
    pub value: String,
}

impl KeyValue {
    /// Construct a new key-value pair from the given key and value.
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Hashes an intermediate key. Compute a reduce bucket for a given key
/// by calculating `ihash(key) % n_reduce`.
///
/// This is 32-bit FNV-1a, masked to a non-negative value. Every worker
/// must agree on it, so the bucket of a key is stable across processes
/// and runs.
pub fn ihash(key: &[u8]) -> u32 {
    let mut hash: u32 = 0x811c9dc5;
    for &byte in key {
        hash ^= u32::from(byte);
        hash = hash.wrapping_mul(0x01000193);
    }
    hash & 0x7fffffff
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ihash_matches_fnv1a32_reference_vectors() {
        // FNV-1a 32-bit reference values, masked non-negative.
        assert_eq!(ihash(b""), 0x811c9dc5 & 0x7fffffff);
        assert_eq!(ihash(b"a"), 0xe40c292c & 0x7fffffff);
        assert_eq!(ihash(b"foobar"), 0xbf9cf968 & 0x7fffffff);
    }

    #[test]
    fn same_key_lands_in_same_bucket() {
        let n_reduce = 7;
        let a = ihash(b"hello") % n_reduce;
        let b = ihash(b"hello") % n_reduce;
        assert_eq!(a, b);
        assert!(a < n_reduce);
    }
}
