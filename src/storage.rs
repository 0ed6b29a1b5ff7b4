//! JSONL I/O for participant records.
//!
//! Format: one JSON object per line. Blank lines are skipped. A line that is
//! not valid JSON aborts the whole read with its 1-based line number, since
//! dropping a row would silently break a participant's trajectory.
//!
//! Rows that are valid JSON but not record-shaped (no `id`, non-object
//! `answers`, ...) are skipped and counted; collector output without ids is
//! the usual source.

use std::collections::HashSet;
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use serde::Serialize;

use crate::error::{Error, Result};
use crate::types::ParticipantRecord;

/// Parse every non-blank line as JSON.
pub fn read_jsonl(path: &Path) -> Result<Vec<serde_json::Value>> {
    let file = File::open(path).map_err(|e| Error::io(path, e))?;
    let reader = BufReader::new(file);
    let mut rows = Vec::new();
    for (idx, line) in reader.lines().enumerate() {
        let line = line.map_err(|e| Error::io(path, e))?;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        let value = serde_json::from_str(trimmed).map_err(|source| Error::MalformedLine {
            path: path.to_path_buf(),
            line: idx + 1,
            source,
        })?;
        rows.push(value);
    }
    Ok(rows)
}

/// Records read from a JSONL file plus the number of rows that were skipped.
pub struct RecordSet {
    pub records: Vec<ParticipantRecord>,
    pub skipped: usize,
}

/// Read and interpret participant records, in file order.
pub fn read_records(path: &Path) -> Result<RecordSet> {
    let rows = read_jsonl(path)?;
    let mut records = Vec::with_capacity(rows.len());
    let mut skipped = 0;
    for (idx, row) in rows.iter().enumerate() {
        match ParticipantRecord::from_value(row) {
            Ok(r) => records.push(r),
            Err(e) => {
                tracing::debug!(row = idx + 1, error = %e, "skipping non-record row");
                skipped += 1;
            }
        }
    }
    if skipped > 0 {
        tracing::warn!(
            path = %path.display(),
            skipped,
            "skipped rows that are not participant records"
        );
    }
    Ok(RecordSet { records, skipped })
}

/// First occurrence of each id, in first-seen order.
pub fn select_baselines(records: &[ParticipantRecord]) -> Vec<ParticipantRecord> {
    let mut seen = HashSet::new();
    records
        .iter()
        .filter(|r| seen.insert(r.id))
        .cloned()
        .collect()
}

fn write_rows<T: Serialize, W: Write>(writer: &mut W, rows: &[T]) -> std::io::Result<()> {
    for row in rows {
        serde_json::to_writer(&mut *writer, row)?;
        writer.write_all(b"\n")?;
    }
    writer.flush()
}

fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
        }
    }
    Ok(())
}

/// Replace `path` with `rows`, one JSON object per line.
pub fn write_jsonl<T: Serialize>(path: &Path, rows: &[T]) -> Result<()> {
    ensure_parent(path)?;
    let file = File::create(path).map_err(|e| Error::io(path, e))?;
    let mut writer = BufWriter::new(file);
    write_rows(&mut writer, rows).map_err(|e| Error::io(path, e))
}

/// Append `rows` to `path`, creating it (and parent directories) if needed.
pub fn append_jsonl<T: Serialize>(path: &Path, rows: &[T]) -> Result<()> {
    ensure_parent(path)?;
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| Error::io(path, e))?;
    let mut writer = BufWriter::new(file);
    write_rows(&mut writer, rows).map_err(|e| Error::io(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{AnswerSet, Profile};

    #[test]
    fn test_malformed_line_reports_number() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.jsonl");
        std::fs::write(&path, "{\"id\": 1, \"answers\": {}}\n\n{not json}\n").unwrap();
        match read_jsonl(&path) {
            Err(Error::MalformedLine { line, .. }) => assert_eq!(line, 3),
            other => panic!("expected MalformedLine, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_jsonl(&dir.path().join("absent.jsonl")).unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
    }

    #[test]
    fn test_read_records_skips_non_records() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mixed.jsonl");
        std::fs::write(
            &path,
            concat!(
                "{\"name\": \"Alice\", \"answers\": {\"q1\": 3}, \"questionnaire_version\": 1}\n",
                "{\"id\": 5, \"name\": \"Healthy-Lying\", \"answers\": [1, 2]}\n",
                "{\"id\": 6, \"name\": \"Healthy-Lying\", \"answers\": {\"q1\": 2}}\n",
            ),
        )
        .unwrap();
        let set = read_records(&path).unwrap();
        assert_eq!(set.skipped, 2);
        assert_eq!(set.records.len(), 1);
        assert_eq!(set.records[0].id, 6);
    }

    #[test]
    fn test_missing_answers_key_reads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("no_answers.jsonl");
        std::fs::write(
            &path,
            "{\"id\": 9, \"name\": \"Healthy-Truthful\", \"questionnaire_version\": 1}\n",
        )
        .unwrap();
        let set = read_records(&path).unwrap();
        assert_eq!(set.skipped, 0);
        assert_eq!(set.records.len(), 1);
        assert_eq!(set.records[0].id, 9);
        assert!(set.records[0].answers.is_empty());
    }

    #[test]
    fn test_select_baselines_first_wins() {
        let rec = |id, v| {
            ParticipantRecord::new(id, Profile::HealthyTruthful, [("q1", v)].into_iter().collect(), 1)
        };
        let records = vec![rec(2, 1), rec(1, 2), rec(2, 5), rec(3, 4), rec(1, 3)];
        let baselines = select_baselines(&records);
        let got: Vec<(u64, Option<i64>)> = baselines
            .iter()
            .map(|r| (r.id, r.answers.get("q1")))
            .collect();
        assert_eq!(got, vec![(2, Some(1)), (1, Some(2)), (3, Some(4))]);
    }

    #[test]
    fn test_write_then_append() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("records.jsonl");
        let first = vec![ParticipantRecord::new(1, Profile::InfectedLying, AnswerSet::new(), 1)];
        let second = vec![ParticipantRecord::new(2, Profile::InfectedLying, AnswerSet::new(), 1)];
        write_jsonl(&path, &first).unwrap();
        append_jsonl(&path, &second).unwrap();
        let ids: Vec<u64> = read_records(&path).unwrap().records.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![1, 2]);

        write_jsonl(&path, &second).unwrap();
        assert_eq!(read_records(&path).unwrap().records.len(), 1);
    }
}
