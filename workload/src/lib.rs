//! MapReduce applications.
//!
//! Each module exports a `map` and a `reduce` function with the shared
//! signatures from [`common`]. Workers resolve an application by name at
//! startup with [`try_named`].

use common::Workload;

pub mod indexer;
pub mod wc;

/// Look up a workload by name.
pub fn try_named(name: &str) -> Option<Workload> {
    match name {
        "wc" => Some(Workload {
            map_fn: wc::map,
            reduce_fn: wc::reduce,
        }),
        "indexer" => Some(Workload {
            map_fn: indexer::map,
            reduce_fn: indexer::reduce,
        }),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_names_resolve() {
        assert!(try_named("wc").is_some());
        assert!(try_named("indexer").is_some());
        assert!(try_named("no-such-workload").is_none());
    }
}
