//! A MapReduce-compatible application that builds an inverted index:
//! for each word, the number of documents it appears in and their names.

use std::collections::BTreeSet;

use common::KeyValue;

pub fn map(file_name: &str, contents: &str) -> Vec<KeyValue> {
    let words: BTreeSet<&str> = contents
        .split(|c: char| !c.is_alphabetic())
        .filter(|word| !word.is_empty())
        .collect();

    words
        .into_iter()
        .map(|word| KeyValue::new(word, file_name))
        .collect()
}

pub fn reduce(_key: &str, values: &[String]) -> String {
    let mut documents: Vec<&str> = values.iter().map(String::as_str).collect();
    documents.sort_unstable();
    documents.dedup();
    format!("{} {}", documents.len(), documents.join(","))
}
