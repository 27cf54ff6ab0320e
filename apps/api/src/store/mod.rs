//! Record store: one CSV table, one row per candidate, keyed by email.
//!
//! Every operation loads the whole table, mutates it in memory and rewrites it.
//! Operations are serialized through one async mutex and run on the blocking
//! pool. Rewrites land via a temp file renamed over the table, so a reader
//! never sees a half-written file. The mutex only covers this process: another
//! process writing the same file can still race and lose rows.
//!
//! Rows are written back cell for cell as they were read, including columns
//! this service does not know about. Only a row replaced by `overwrite` changes.

use std::collections::HashMap;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::models::candidate::{same_email, CandidateRow};

pub mod skill_column;

use skill_column::parse_skill_column;

/// Columns written for every candidate, in header order for a new table.
const CANDIDATE_COLUMNS: [&str; 15] = [
    "fullname",
    "email_id",
    "phone_number",
    "designation",
    "current_location",
    "years_of_experience",
    "current_ctc",
    "expected_ctc",
    "current_company",
    "certifications",
    "summary",
    "portfolio_url",
    "linkedin_url",
    "github_url",
    "skills",
];

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Malformed row {row} in candidate table: {reason}")]
    MalformedRow { row: usize, reason: String },

    #[error("A record with email {0} already exists")]
    DuplicateEmail(String),

    #[error("Record email '{record}' does not match key '{key}'")]
    KeyMismatch { key: String, record: String },

    #[error("Store task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Candidate columns of a row as read from disk. Numbers stay text here so a
/// cell like `5+` does not fail the load.
#[derive(Debug, Deserialize)]
struct StoredColumns {
    #[serde(default)]
    fullname: Option<String>,
    email_id: String,
    #[serde(default)]
    phone_number: Option<String>,
    #[serde(default)]
    designation: Option<String>,
    #[serde(default)]
    current_location: Option<String>,
    #[serde(default)]
    years_of_experience: Option<String>,
    #[serde(default)]
    current_ctc: Option<String>,
    #[serde(default)]
    expected_ctc: Option<String>,
    #[serde(default)]
    current_company: Option<String>,
    #[serde(default)]
    certifications: Option<String>,
    #[serde(default)]
    summary: Option<String>,
    #[serde(default)]
    portfolio_url: Option<String>,
    #[serde(default)]
    linkedin_url: Option<String>,
    #[serde(default)]
    github_url: Option<String>,
    skills: String,
}

impl StoredColumns {
    fn into_candidate(self, row: usize) -> Result<CandidateRow, StoreError> {
        let skills =
            parse_skill_column(&self.skills).map_err(|e| StoreError::MalformedRow {
                row,
                reason: e.to_string(),
            })?;
        Ok(CandidateRow {
            fullname: self.fullname,
            email_id: self.email_id,
            phone_number: self.phone_number,
            designation: self.designation,
            current_location: self.current_location,
            years_of_experience: parse_years(self.years_of_experience.as_deref()),
            current_ctc: self.current_ctc,
            expected_ctc: self.expected_ctc,
            current_company: self.current_company,
            certifications: self.certifications,
            summary: self.summary,
            portfolio_url: self.portfolio_url,
            linkedin_url: self.linkedin_url,
            github_url: self.github_url,
            skills,
        })
    }
}

/// Leading number of a years cell (`"5+"` is 5). Text with no leading number
/// reads as absent; the cell itself is kept as written.
fn parse_years(raw: Option<&str>) -> Option<f64> {
    let raw = raw?.trim();
    let end = raw
        .find(|c: char| !(c.is_ascii_digit() || c == '.'))
        .unwrap_or(raw.len());
    raw[..end].parse().ok()
}

/// A loaded row: the typed candidate plus the cell text that gets written back.
#[derive(Debug)]
struct StoredRow {
    candidate: CandidateRow,
    cells: HashMap<String, String>,
}

impl From<CandidateRow> for StoredRow {
    fn from(candidate: CandidateRow) -> Self {
        let text = |v: &Option<String>| v.clone().unwrap_or_default();
        let values = [
            text(&candidate.fullname),
            candidate.email_id.clone(),
            text(&candidate.phone_number),
            text(&candidate.designation),
            text(&candidate.current_location),
            candidate
                .years_of_experience
                .map(|y| y.to_string())
                .unwrap_or_default(),
            text(&candidate.current_ctc),
            text(&candidate.expected_ctc),
            text(&candidate.current_company),
            text(&candidate.certifications),
            text(&candidate.summary),
            text(&candidate.portfolio_url),
            text(&candidate.linkedin_url),
            text(&candidate.github_url),
            candidate.skills.to_column(),
        ];
        let cells = CANDIDATE_COLUMNS
            .iter()
            .map(|c| c.to_string())
            .zip(values)
            .collect();
        StoredRow { candidate, cells }
    }
}

/// Whole table in memory. `columns` keeps the file's header order; candidate
/// columns missing from an older file are added at the end.
#[derive(Debug)]
struct Table {
    columns: Vec<String>,
    rows: Vec<StoredRow>,
}

impl Table {
    fn empty() -> Self {
        Table {
            columns: CANDIDATE_COLUMNS.iter().map(|c| c.to_string()).collect(),
            rows: Vec::new(),
        }
    }

    fn contains(&self, email: &str) -> bool {
        self.rows
            .iter()
            .any(|r| same_email(&r.candidate.email_id, email))
    }

    fn into_candidates(self) -> Vec<CandidateRow> {
        self.rows.into_iter().map(|r| r.candidate).collect()
    }
}

pub struct RecordStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl RecordStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// True if a row with this email is persisted.
    pub async fn exists(&self, email: &str) -> Result<bool, StoreError> {
        let email = email.to_string();
        self.locked(move |path| Ok(load_table(path)?.contains(&email)))
            .await
    }

    /// Adds a new row, creating the table (with header) if needed.
    /// The duplicate check and the write happen inside one critical section;
    /// a row whose email is already present is refused.
    pub async fn append(&self, record: CandidateRow) -> Result<(), StoreError> {
        self.locked(move |path| {
            let mut table = load_table(path)?;
            if table.contains(&record.email_id) {
                debug!("Append refused, {} already stored", record.email_id);
                return Err(StoreError::DuplicateEmail(record.email_id));
            }
            info!("Appending candidate {}", record.email_id);
            table.rows.push(StoredRow::from(record));
            persist_table(path, &table)
        })
        .await
    }

    /// Removes any row with `email`, then appends `record` as the last row.
    pub async fn overwrite(&self, email: &str, record: CandidateRow) -> Result<(), StoreError> {
        if !same_email(email, &record.email_id) {
            return Err(StoreError::KeyMismatch {
                key: email.to_string(),
                record: record.email_id,
            });
        }
        let email = email.to_string();
        self.locked(move |path| {
            let mut table = load_table(path)?;
            let before = table.rows.len();
            table
                .rows
                .retain(|r| !same_email(&r.candidate.email_id, &email));
            info!(
                "Overwriting candidate {} ({} existing row(s) replaced)",
                email,
                before - table.rows.len()
            );
            table.rows.push(StoredRow::from(record));
            persist_table(path, &table)
        })
        .await
    }

    /// Full table for read-only use. A missing table is empty.
    pub async fn scan(&self) -> Result<Vec<CandidateRow>, StoreError> {
        self.locked(|path| load_table(path).map(Table::into_candidates))
            .await
    }

    /// Runs `op` on the blocking pool while holding the store lock.
    async fn locked<T, F>(&self, op: F) -> Result<T, StoreError>
    where
        F: FnOnce(&Path) -> Result<T, StoreError> + Send + 'static,
        T: Send + 'static,
    {
        let _guard = self.lock.lock().await;
        let path = self.path.clone();
        tokio::task::spawn_blocking(move || op(&path)).await?
    }
}

fn load_table(path: &Path) -> Result<Table, StoreError> {
    let file = match File::open(path) {
        Ok(f) => f,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Table::empty()),
        Err(source) => {
            return Err(StoreError::Io {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    let mut reader = csv::Reader::from_reader(file);
    let headers = reader
        .headers()
        .map_err(|e| classify_csv_error(e, 0))?
        .clone();

    let mut columns: Vec<String> = headers.iter().map(String::from).collect();
    for column in CANDIDATE_COLUMNS {
        if !columns.iter().any(|c| c == column) {
            columns.push(column.to_string());
        }
    }

    let mut rows = Vec::new();
    for (idx, result) in reader.records().enumerate() {
        let row_number = idx + 1;
        let record = result.map_err(|e| classify_csv_error(e, row_number))?;
        let candidate = record
            .deserialize::<StoredColumns>(Some(&headers))
            .map_err(|e| classify_csv_error(e, row_number))?
            .into_candidate(row_number)?;
        let cells = headers
            .iter()
            .zip(record.iter())
            .map(|(h, v)| (h.to_string(), v.to_string()))
            .collect();
        rows.push(StoredRow { candidate, cells });
    }
    debug!("Loaded {} candidate row(s) from {:?}", rows.len(), path);
    Ok(Table { columns, rows })
}

fn persist_table(path: &Path, table: &Table) -> Result<(), StoreError> {
    let io_err = |source: std::io::Error| StoreError::Io {
        path: path.to_path_buf(),
        source,
    };
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };

    let mut tmp = tempfile::NamedTempFile::new_in(&dir).map_err(io_err)?;
    {
        let mut writer = csv::Writer::from_writer(tmp.as_file_mut());
        writer.write_record(&table.columns)?;
        for row in &table.rows {
            writer.write_record(
                table
                    .columns
                    .iter()
                    .map(|c| row.cells.get(c).map(String::as_str).unwrap_or("")),
            )?;
        }
        writer.flush().map_err(io_err)?;
    }
    tmp.as_file_mut().flush().map_err(io_err)?;
    tmp.persist(path).map_err(|e| io_err(e.error))?;
    Ok(())
}

fn classify_csv_error(err: csv::Error, row: usize) -> StoreError {
    if err.is_io_error() {
        StoreError::Csv(err)
    } else {
        StoreError::MalformedRow {
            row,
            reason: err.to_string(),
        }
    }
}
