//! Local fallback store: a directory of saved consultation JSON files.
//!
//! Every load re-reads the whole directory. A file may hold a full
//! `ConsultationRecord` or a `SavedTreatment`; files that parse as neither
//! are logged and skipped without aborting the rest of the load.

use std::path::{Path, PathBuf};
use std::time::SystemTime;

use chrono::NaiveDateTime;
use serde::Deserialize;
use thiserror::Error;

use crate::models::{parse_timestamp, ConsultationRecord, SavedTreatment};

#[derive(Debug, Error)]
pub enum LocalStoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse {file}: {reason}")]
    Parse { file: String, reason: String },
}

#[derive(Deserialize)]
#[serde(untagged)]
enum FileContent {
    Record(ConsultationRecord),
    Treatment(SavedTreatment),
}

/// One parsed file with the metadata used to order it.
#[derive(Debug, Clone)]
pub struct StoredFile<T> {
    pub value: T,
    pub file_name: String,
    pub modified: Option<SystemTime>,
}

/// Recency key: the time written inside the file, then its modified time.
///
/// `None` sorts first, so undated files lose to dated ones.
pub type RecencyKey = (Option<NaiveDateTime>, Option<SystemTime>);

impl StoredFile<ConsultationRecord> {
    pub fn recency(&self) -> RecencyKey {
        let stamped = self.value.date.as_deref().and_then(parse_timestamp);
        (stamped, self.modified)
    }
}

impl StoredFile<SavedTreatment> {
    pub fn recency(&self) -> RecencyKey {
        let stamped = self.value.timestamp.as_deref().and_then(parse_timestamp);
        (stamped, self.modified)
    }
}

/// Result of one full directory read, in file-name order.
#[derive(Debug, Clone, Default)]
pub struct LocalSnapshot {
    pub records: Vec<StoredFile<ConsultationRecord>>,
    pub treatments: Vec<StoredFile<SavedTreatment>>,
    /// Files that failed to read or parse.
    pub skipped: usize,
}

impl LocalSnapshot {
    /// The most recent record by consultation date, then file modified time.
    ///
    /// File names embed the patient name, so name order says nothing about
    /// which visit is newest.
    pub fn latest_record(&self) -> Option<&StoredFile<ConsultationRecord>> {
        self.records.iter().max_by_key(|f| f.recency())
    }

    /// The most recent saved treatment plan, ordered the same way.
    pub fn latest_treatment(&self) -> Option<&StoredFile<SavedTreatment>> {
        self.treatments.iter().max_by_key(|f| f.recency())
    }
}

pub struct LocalConsultationStore {
    dir: PathBuf,
}

impl LocalConsultationStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Read and parse every `*.json` file in the directory.
    ///
    /// A missing directory yields an empty snapshot.
    pub fn load(&self) -> Result<LocalSnapshot, LocalStoreError> {
        let mut snapshot = LocalSnapshot::default();

        if !self.dir.exists() {
            tracing::debug!(dir = %self.dir.display(), "Fallback directory does not exist");
            return Ok(snapshot);
        }

        let mut files: Vec<PathBuf> = std::fs::read_dir(&self.dir)?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| {
                path.is_file() && path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
            })
            .collect();
        files.sort();

        for path in &files {
            let file_name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            let modified = std::fs::metadata(path).and_then(|m| m.modified()).ok();

            match read_file(path, &file_name) {
                Ok(FileContent::Record(value)) => snapshot.records.push(StoredFile {
                    value,
                    file_name,
                    modified,
                }),
                Ok(FileContent::Treatment(value)) => snapshot.treatments.push(StoredFile {
                    value,
                    file_name,
                    modified,
                }),
                Err(e) => {
                    tracing::warn!(error = %e, "Skipping unreadable consultation file");
                    snapshot.skipped += 1;
                }
            }
        }

        tracing::debug!(
            dir = %self.dir.display(),
            records = snapshot.records.len(),
            treatments = snapshot.treatments.len(),
            skipped = snapshot.skipped,
            "Loaded local consultations"
        );

        Ok(snapshot)
    }
}

fn read_file(path: &Path, file_name: &str) -> Result<FileContent, LocalStoreError> {
    let content = std::fs::read_to_string(path)?;
    let parsed: FileContent = serde_json::from_str(&content).map_err(|e| LocalStoreError::Parse {
        file: file_name.to_string(),
        reason: e.to_string(),
    })?;

    if let FileContent::Record(record) = &parsed {
        record.validate().map_err(|reason| LocalStoreError::Parse {
            file: file_name.to_string(),
            reason,
        })?;
    }
    Ok(parsed)
}
