// Three-tier ingestion gating: file, header, and row checks.
//
// The checks are independently callable and composed by the pipeline in
// `ingest::mod`. File and header failures abort an ingest; row failures are
// collected by the caller and never abort.

use std::path::Path;

use crate::ingest::schema::{self, RawRow};
use crate::ingest::IngestError;
use crate::model::DataSource;

/// Hard ceiling on uploaded file size.
pub const MAX_FILE_BYTES: u64 = 5 * 1024 * 1024;

/// Per-player minutes ceiling for one NBA game.
pub const MAX_PLAYER_MINUTES: f64 = 48.0;

/// Numeric fields checked by the row validator. `threepointers` is handled
/// separately because the column itself is optional.
const NUMERIC_FIELDS: &[&str] = &[
    "minutes",
    "points",
    "rebounds",
    "assists",
    "steals",
    "blocks",
    "turnovers",
];

/// A single rejected row. Non-fatal: the pipeline collects these and keeps
/// going with the remaining rows.
#[derive(Debug, thiserror::Error)]
pub enum RowError {
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    #[error("invalid numeric value for {field}: {value}")]
    InvalidNumeric { field: &'static str, value: String },

    #[error("invalid minutes value: {0} (must be <= 48)")]
    MinutesOutOfRange(f64),
}

/// File-level check: extension, emptiness, size ceiling. Rejects without
/// inspecting content.
pub fn validate_file(path: &Path) -> Result<(), IngestError> {
    let is_csv = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
    if !is_csv {
        return Err(IngestError::InvalidFile(format!(
            "{} is not a .csv file",
            path.display()
        )));
    }

    let metadata = std::fs::metadata(path).map_err(|e| IngestError::Io {
        path: path.display().to_string(),
        source: e,
    })?;

    if metadata.len() == 0 {
        return Err(IngestError::InvalidFile("file is empty".into()));
    }
    if metadata.len() > MAX_FILE_BYTES {
        return Err(IngestError::InvalidFile("file size exceeds 5MB limit".into()));
    }

    Ok(())
}

/// Header-level check: every required column for the source must be present
/// under case-insensitive, trimmed comparison. A required column counts as
/// present when its canonical name or any known alias appears. All missing
/// columns are reported at once.
pub fn validate_headers(headers: &[String], source: DataSource) -> Result<(), IngestError> {
    let normalized: Vec<String> = headers
        .iter()
        .map(|h| h.trim().to_lowercase())
        .collect();

    let missing: Vec<String> = schema::required_headers(source)
        .iter()
        .copied()
        .filter(|canonical| {
            !schema::accepted_names(*canonical)
                .iter()
                .any(|name| normalized.iter().any(|h| h == name))
        })
        .map(|c| c.to_string())
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(IngestError::MissingHeaders { missing })
    }
}

/// Row-level check: required fields present, numeric fields finite and
/// non-negative, minutes within the per-game ceiling. Zero minutes is legal.
pub fn validate_row(row: &RawRow, source: DataSource) -> Result<(), RowError> {
    for field in schema::required_headers(source).iter().copied() {
        if schema::resolve_field(row, field).is_none() {
            return Err(RowError::MissingField(field));
        }
    }

    for field in NUMERIC_FIELDS.iter().copied() {
        // Required-field check above guarantees presence.
        if let Some(raw) = schema::resolve_field(row, field) {
            parse_numeric(field, raw)?;
        }
    }

    // The three-pointer column is optional, but a present value must still
    // be a valid number.
    if let Some(raw) = schema::resolve_field(row, "threepointers") {
        parse_numeric("threepointers", raw)?;
    }

    let minutes_raw = schema::resolve_field(row, "minutes").unwrap_or_default();
    let minutes = parse_numeric("minutes", minutes_raw)?;
    if minutes > MAX_PLAYER_MINUTES {
        return Err(RowError::MinutesOutOfRange(minutes));
    }

    Ok(())
}

/// Parse one numeric cell, rejecting unparseable, non-finite, and negative
/// values.
pub fn parse_numeric(field: &'static str, raw: &str) -> Result<f64, RowError> {
    let value: f64 = raw.trim().parse().map_err(|_| RowError::InvalidNumeric {
        field,
        value: raw.to_string(),
    })?;
    if !value.is_finite() || value < 0.0 {
        return Err(RowError::InvalidNumeric {
            field,
            value: raw.to_string(),
        });
    }
    Ok(value)
}
