// CSV ingestion pipeline: parse → validate → normalize → aggregate errors.
//
// Heterogeneous projection CSVs (ETR, UA) come in with source-specific
// column names; everything leaving this module is a canonical
// `PlayerRecord` list plus human-readable row errors. File- and
// header-level failures abort the ingest; row-level failures are collected
// and reported alongside the surviving players.

pub mod schema;
pub mod validate;

use std::io::Read;
use std::path::Path;

use chrono::{DateTime, Utc};
use tracing::warn;

use crate::model::{DataSource, PlayerRecord, Stats};
use schema::RawRow;

/// The result of a successful ingest: surviving players plus the (possibly
/// empty) list of per-row error strings, which callers surface as
/// non-blocking warnings.
#[derive(Debug, Clone)]
pub struct Ingested {
    pub players: Vec<PlayerRecord>,
    pub errors: Vec<String>,
    pub loaded_at: DateTime<Utc>,
}

/// Top-level ingestion failures. Row-level problems never appear here; they
/// ride along in [`Ingested::errors`].
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error("invalid file: {0}")]
    InvalidFile(String),

    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("CSV parse failure: {0}")]
    Parse(#[from] csv::Error),

    #[error("missing required headers: {}", missing.join(", "))]
    MissingHeaders { missing: Vec<String> },

    #[error("no valid rows found in file ({row_errors} rows rejected)")]
    EmptyResult { row_errors: usize },
}

/// Ingest a projections CSV from disk.
///
/// Runs the file check first (extension, emptiness, 5 MB ceiling), then
/// hands off to the reader-based pipeline. Fails wholesale on file, parse,
/// or header problems; returns no partial player list in those cases.
pub fn ingest_path(path: &Path, source: DataSource) -> Result<Ingested, IngestError> {
    validate::validate_file(path)?;
    let file = std::fs::File::open(path).map_err(|e| IngestError::Io {
        path: path.display().to_string(),
        source: e,
    })?;
    ingest_reader(file, source)
}

/// Ingest a projections CSV from any reader. Skips the file-level check,
/// which only makes sense for paths on disk.
pub fn ingest_reader<R: Read>(rdr: R, source: DataSource) -> Result<Ingested, IngestError> {
    let mut reader = csv::Reader::from_reader(rdr);

    // Header names are compared case-insensitively and trimmed everywhere
    // downstream, so normalize once up front.
    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim().to_lowercase())
        .collect();

    // The parse is atomic: either the full row set materializes or the
    // ingest fails wholesale. No partial-parse state escapes.
    let records: Vec<csv::StringRecord> =
        reader.records().collect::<Result<Vec<_>, csv::Error>>()?;

    validate::validate_headers(&headers, source)?;

    let mut players = Vec::new();
    let mut errors = Vec::new();

    for (index, record) in records.iter().enumerate() {
        let row = to_raw_row(&headers, record);
        match validate::validate_row(&row, source) {
            Ok(()) => players.push(build_record(&row)),
            Err(e) => {
                // 1-based index so the message matches what a user sees in
                // their spreadsheet below the header row.
                let message = format!("Row {}: {}", index + 1, e);
                warn!("skipping projection row: {message}");
                errors.push(message);
            }
        }
    }

    if players.is_empty() {
        return Err(IngestError::EmptyResult {
            row_errors: errors.len(),
        });
    }

    Ok(Ingested {
        players,
        errors,
        loaded_at: Utc::now(),
    })
}

/// Pair each cell with its normalized header name. Rows shorter than the
/// header simply omit the trailing fields.
fn to_raw_row(headers: &[String], record: &csv::StringRecord) -> RawRow {
    headers
        .iter()
        .zip(record.iter())
        .map(|(h, v)| (h.clone(), v.to_string()))
        .collect()
}

/// Build a `PlayerRecord` from a row that already passed validation.
///
/// Ingestion is identity scaling: current minutes and stats equal the
/// baseline. Numeric fields resolve to 0 only for the optional
/// three-pointer column; required fields are guaranteed present and valid
/// here.
fn build_record(row: &RawRow) -> PlayerRecord {
    let text = |field| {
        schema::resolve_field(row, field)
            .unwrap_or_default()
            .to_string()
    };
    let number = |field| {
        schema::resolve_field(row, field)
            .and_then(|raw| raw.trim().parse::<f64>().ok())
            .unwrap_or(0.0)
    };

    let minutes = number("minutes");
    let stats = Stats {
        points: number("points"),
        rebounds: number("rebounds"),
        assists: number("assists"),
        steals: number("steals"),
        blocks: number("blocks"),
        turnovers: number("turnovers"),
        three_pointers: number("threepointers"),
    };

    PlayerRecord {
        name: text("player"),
        position: text("position"),
        team: schema::normalize_team_name(&text("team")),
        opponent: schema::normalize_team_name(&text("opponent")),
        minutes,
        stats,
        original_minutes: minutes,
        original_stats: stats,
    }
}
