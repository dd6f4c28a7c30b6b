//! Thought journal — append-only NDJSON log of every recursion step.
//!
//! One file per calendar day (`thoughts_YYYYMMDD.ndjson`), one JSON object
//! per line: `{timestamp, input, output, mode, model}`. The journal is never
//! read back by the system; it exists for offline inspection.

use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use mirrormind_core::error::EngineError;
use mirrormind_core::mode::RecursionMode;
use mirrormind_core::thought::ThoughtRecord;

/// Append-only, day-partitioned NDJSON journal.
pub struct ThoughtJournal {
    dir: PathBuf,
}

/// The shape of one journal line.
#[derive(Serialize)]
struct JournalEntry<'a> {
    timestamp: DateTime<Utc>,
    input: &'a str,
    output: &'a str,
    mode: RecursionMode,
    model: &'a str,
}

impl ThoughtJournal {
    /// Create a journal rooted at `dir`, creating the directory if needed.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self, EngineError> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)
            .map_err(|e| EngineError::Journal(format!("Failed to create journal dir: {e}")))?;
        Ok(Self { dir })
    }

    /// The journal directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// The file today's entries land in.
    pub fn path_for_today(&self) -> PathBuf {
        self.path_for(Utc::now().date_naive())
    }

    fn path_for(&self, date: NaiveDate) -> PathBuf {
        self.dir
            .join(format!("thoughts_{}.ndjson", date.format("%Y%m%d")))
    }

    /// Append one record to today's file.
    pub fn append(&self, record: &ThoughtRecord, model: &str) -> Result<(), EngineError> {
        let entry = JournalEntry {
            timestamp: record.timestamp,
            input: &record.input,
            output: &record.output,
            mode: record.mode,
            model,
        };

        let line = serde_json::to_string(&entry)
            .map_err(|e| EngineError::Journal(format!("Failed to serialize entry: {e}")))?;

        let path = self.path_for_today();
        let mut file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| {
                EngineError::Journal(format!("Failed to open {}: {e}", path.display()))
            })?;

        writeln!(file, "{line}")
            .map_err(|e| EngineError::Journal(format!("Failed to write entry: {e}")))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_name_is_day_partitioned() {
        let tmp = tempfile::tempdir().unwrap();
        let journal = ThoughtJournal::new(tmp.path()).unwrap();
        let path = journal.path_for(NaiveDate::from_ymd_opt(2026, 8, 8).unwrap());
        assert!(path.ends_with("thoughts_20260808.ndjson"));
    }

    #[test]
    fn append_writes_one_parseable_line_per_record() {
        let tmp = tempfile::tempdir().unwrap();
        let journal = ThoughtJournal::new(tmp.path()).unwrap();

        let first = ThoughtRecord::new(1, "seed", "first thought", RecursionMode::Standard);
        let second = ThoughtRecord::new(2, "first thought", "second", RecursionMode::Standard);
        journal.append(&first, "tinyllama").unwrap();
        journal.append(&second, "tinyllama").unwrap();

        let content = std::fs::read_to_string(journal.path_for_today()).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 2);

        for line in lines {
            let value: serde_json::Value = serde_json::from_str(line).unwrap();
            for field in ["timestamp", "input", "output", "mode", "model"] {
                assert!(value.get(field).is_some(), "missing field {field}");
            }
            assert_eq!(value["model"], "tinyllama");
        }
    }

    #[test]
    fn appends_accumulate_across_journal_instances() {
        // Two requests in the same process (or a restart) share the day file.
        let tmp = tempfile::tempdir().unwrap();

        let journal = ThoughtJournal::new(tmp.path()).unwrap();
        let record = ThoughtRecord::new(1, "a", "b", RecursionMode::Poetic);
        journal.append(&record, "tinyllama").unwrap();

        let reopened = ThoughtJournal::new(tmp.path()).unwrap();
        reopened.append(&record, "tinyllama").unwrap();

        let content = std::fs::read_to_string(journal.path_for_today()).unwrap();
        assert_eq!(content.lines().count(), 2);
    }

    #[test]
    fn creates_missing_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let nested = tmp.path().join("logs").join("thoughts");
        let journal = ThoughtJournal::new(&nested).unwrap();
        assert!(journal.dir().exists());
    }
}
