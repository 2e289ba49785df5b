//! Record codec for intermediate files.
//!
//! Intermediate files hold one JSON-encoded [`KeyValue`] per line. JSON
//! escapes newlines and whitespace inside keys and values, so the stream
//! stays self-delimiting no matter what the application emits.

use std::io::{BufRead, Write};

use anyhow::{Context, Result};

use crate::KeyValue;

/// Append every record to the writer, one per line.
pub fn write_records<W: Write>(mut writer: W, records: &[KeyValue]) -> Result<()> {
    for record in records {
        serde_json::to_writer(&mut writer, record)?;
        writer.write_all(b"\n")?;
    }
    Ok(())
}

/// Decode every record from the reader, in file order.
pub fn read_records<R: BufRead>(reader: R) -> Result<Vec<KeyValue>> {
    let mut records = Vec::new();
    for line in reader.lines() {
        let line = line?;
        if line.is_empty() {
            continue;
        }
        let record: KeyValue =
            serde_json::from_str(&line).with_context(|| format!("bad record: {line}"))?;
        records.push(record);
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn awkward_strings_survive_the_record_format() {
        let records = vec![
            KeyValue::new("plain", "1"),
            KeyValue::new("with space", "a b"),
            KeyValue::new("with\nnewline", "\"quoted\""),
            KeyValue::new("", ""),
        ];

        let mut buf = Vec::new();
        write_records(&mut buf, &records).expect("encode");
        let decoded = read_records(buf.as_slice()).expect("decode");
        assert_eq!(decoded, records);
    }

    #[test]
    fn empty_file_decodes_to_no_records() {
        let decoded = read_records(&b""[..]).expect("decode");
        assert!(decoded.is_empty());
    }

    #[test]
    fn garbage_line_is_an_error() {
        assert!(read_records(&b"not json\n"[..]).is_err());
    }
}
