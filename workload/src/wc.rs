//! A MapReduce-compatible application that counts the occurrences of
//! each word across the input files.

use common::KeyValue;

pub fn map(_file_name: &str, contents: &str) -> Vec<KeyValue> {
    contents
        .split(|c: char| !c.is_alphabetic())
        .filter(|word| !word.is_empty())
        .map(|word| KeyValue::new(word, "1"))
        .collect()
}

pub fn reduce(_key: &str, values: &[String]) -> String {
    values.len().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn map_splits_on_non_alphabetic_characters() {
        let pairs = map("a.txt", "hello, world! hello");
        let words: Vec<&str> = pairs.iter().map(|kv| kv.key.as_str()).collect();
        assert_eq!(words, vec!["hello", "world", "hello"]);
        assert!(pairs.iter().all(|kv| kv.value == "1"));
    }

    #[test]
    fn reduce_counts_values() {
        let ones = vec!["1".to_string(), "1".to_string(), "1".to_string()];
        assert_eq!(reduce("hello", &ones), "3");
    }
}
