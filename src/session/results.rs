//! Results log
//!
//! One row per trial, fixed column order, appended as each trial
//! completes. The CSV sink flushes every row so that whatever was
//! appended before a crash is recoverable; the final `flush` syncs the
//! file and its failure is surfaced, never swallowed.

use crate::error::{Result, TaskError};
use crate::session::runner::{Correctness, TrialOutcome};
use crate::stimulus::types::{Color, TrialType};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Fixed header of the behavioural results file
pub const RESULTS_HEADER: &str = "PART_ID,Block number,Trial number,Button pressed,Reaction time,Correctness,Trial type,Stim color,Stim word,Training";

/// Marker written in place of a key when the trial timed out
pub const NO_KEY_MARKER: &str = "no_key";

/// Reaction-time sentinel written for a timeout
pub const TIMEOUT_RT_MARKER: &str = "-1.0";

/// Flattened record of one completed trial
#[derive(Clone, Debug, PartialEq)]
pub struct ResultRow {
    pub participant_id: String,
    pub block_no: usize,
    pub trial_no: usize,
    pub outcome: TrialOutcome,
    pub trial_type: TrialType,
    pub stim_color: Color,
    pub stim_word: String,
    pub is_training: bool,
}

impl ResultRow {
    /// Render the row in the fixed column order
    pub fn to_csv_line(&self) -> String {
        let button = match self.outcome.key_pressed {
            Some(key) => key.to_string(),
            None => NO_KEY_MARKER.to_string(),
        };
        let rt = match self.outcome.reaction_time {
            Some(seconds) => format!("{:.3}", seconds),
            None => TIMEOUT_RT_MARKER.to_string(),
        };
        format!(
            "{},{},{},{},{},{},{},{},{},{}",
            self.participant_id,
            self.block_no,
            self.trial_no,
            button,
            rt,
            self.outcome.correctness.code(),
            self.trial_type.name(),
            self.stim_color.name(),
            self.stim_word,
            u8::from(self.is_training),
        )
    }
}

/// Append-only destination for result rows
pub trait ResultsSink {
    /// Record one completed trial
    fn append(&mut self, row: ResultRow) -> Result<()>;
    /// Persist everything appended so far
    fn flush(&mut self) -> Result<()>;
}

/// Results file writer; header written once at creation
pub struct CsvSink {
    writer: BufWriter<File>,
    path: PathBuf,
}

impl CsvSink {
    pub fn create(path: &Path) -> Result<Self> {
        let file = File::create(path).map_err(|e| {
            TaskError::Results(format!("cannot create {}: {}", path.display(), e))
        })?;
        let mut sink = CsvSink {
            writer: BufWriter::new(file),
            path: path.to_path_buf(),
        };
        writeln!(sink.writer, "{}", RESULTS_HEADER)
            .map_err(|e| sink.write_error(e))?;
        sink.writer.flush().map_err(|e| sink.write_error(e))?;
        Ok(sink)
    }

    fn write_error(&self, e: std::io::Error) -> TaskError {
        TaskError::Results(format!("write to {} failed: {}", self.path.display(), e))
    }
}

impl ResultsSink for CsvSink {
    fn append(&mut self, row: ResultRow) -> Result<()> {
        writeln!(self.writer, "{}", row.to_csv_line()).map_err(|e| self.write_error(e))?;
        // flush per row: rows survive a crash mid-session
        self.writer.flush().map_err(|e| self.write_error(e))
    }

    fn flush(&mut self) -> Result<()> {
        self.writer.flush().map_err(|e| self.write_error(e))?;
        self.writer
            .get_ref()
            .sync_all()
            .map_err(|e| self.write_error(e))
    }
}

/// In-memory sink used by tests
#[cfg(test)]
#[derive(Default)]
pub struct MemorySink {
    pub rows: Vec<ResultRow>,
    pub flushed: bool,
}

#[cfg(test)]
impl ResultsSink for MemorySink {
    fn append(&mut self, row: ResultRow) -> Result<()> {
        self.rows.push(row);
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        self.flushed = true;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stimulus::types::ResponseKey;
    use std::fs;

    fn sample_row() -> ResultRow {
        ResultRow {
            participant_id: "01M20".into(),
            block_no: 0,
            trial_no: 1,
            outcome: TrialOutcome {
                key_pressed: Some(ResponseKey('z')),
                reaction_time: Some(0.512),
                correctness: Correctness::Correct,
            },
            trial_type: TrialType::Congruent,
            stim_color: Color::Yellow,
            stim_word: "zolty".into(),
            is_training: false,
        }
    }

    #[test]
    fn test_row_column_order() {
        let line = sample_row().to_csv_line();
        assert_eq!(line, "01M20,0,1,z,0.512,1,congruent,yellow,zolty,0");
    }

    #[test]
    fn test_timeout_row_uses_sentinels() {
        let mut row = sample_row();
        row.outcome = TrialOutcome {
            key_pressed: None,
            reaction_time: None,
            correctness: Correctness::NoResponse,
        };
        let line = row.to_csv_line();
        assert!(line.contains(",no_key,-1.0,"), "line was: {}", line);
        assert!(line.contains(",2,congruent,"));
    }

    #[test]
    fn test_csv_sink_writes_header_and_rows() {
        let path = std::env::temp_dir().join(format!("stroop_sink_{}.csv", std::process::id()));
        {
            let mut sink = CsvSink::create(&path).unwrap();
            sink.append(sample_row()).unwrap();
            sink.flush().unwrap();
        }
        let content = fs::read_to_string(&path).unwrap();
        let mut lines = content.lines();
        assert_eq!(lines.next(), Some(RESULTS_HEADER));
        assert_eq!(lines.next(), Some(sample_row().to_csv_line().as_str()));
        assert_eq!(lines.next(), None);
        fs::remove_file(&path).unwrap();
    }
}
