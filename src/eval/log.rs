//! Append-only evaluation record log
//!
//! One self-contained JSON record per line, keyed by question_id. Records
//! are appended and never rewritten in place, keeping the audit trail
//! honest.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::errors::Result;
use crate::eval::EvaluationRecord;

/// Append-only JSONL log of evaluation records
pub struct RecordLog {
    path: PathBuf,
}

impl RecordLog {
    /// Open (or create on first append) a log at the given path
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
        }
    }

    /// Append one record as a single JSON line
    pub fn append(&self, record: &EvaluationRecord) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let line = serde_json::to_string(record)?;
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "{}", line)?;
        Ok(())
    }

    /// Read every record in append order
    pub fn read_all(&self) -> Result<Vec<EvaluationRecord>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let contents = std::fs::read_to_string(&self.path)?;
        let mut records = Vec::new();
        for line in contents.lines() {
            if line.trim().is_empty() {
                continue;
            }
            records.push(serde_json::from_str(line)?);
        }
        Ok(records)
    }

    /// Path of the underlying log file
    pub fn path(&self) -> &Path {
        &self.path
    }
}
