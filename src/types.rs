//! Core types for run-tracker

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Run ID type, assigned by the store
pub type RunId = i64;

/// A single logged running activity
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Run {
    pub id: RunId,
    /// Calendar date, conventionally `YYYY-MM-DD`
    pub date: String,
    /// Distance in kilometers
    pub distance: f64,
    /// Average pace, conventionally `MM:SS`
    pub pace: String,
    pub notes: Option<String>,
}

/// Validated field set for create and full-replace update
#[derive(Debug, Clone, PartialEq)]
pub struct NewRun {
    pub date: String,
    pub distance: f64,
    pub pace: String,
    pub notes: Option<String>,
}

impl NewRun {
    pub fn into_run(self, id: RunId) -> Run {
        Run {
            id,
            date: self.date,
            distance: self.distance,
            pace: self.pace,
            notes: self.notes,
        }
    }
}

/// Raw request body for `POST /runs` and `PUT /runs/:id`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RunPayload {
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub distance: Option<f64>,
    #[serde(default)]
    pub pace: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Date, distance, and pace are required. ")]
pub struct ValidationError;

impl RunPayload {
    /// Empty strings and a zero distance count as missing.
    pub fn validate(self) -> Result<NewRun, ValidationError> {
        let date = self.date.filter(|d| !d.is_empty()).ok_or(ValidationError)?;
        let distance = self.distance.filter(|d| *d != 0.0).ok_or(ValidationError)?;
        let pace = self.pace.filter(|p| !p.is_empty()).ok_or(ValidationError)?;

        Ok(NewRun {
            date,
            distance,
            pace,
            notes: self.notes,
        })
    }
}

/// Predicate for the filter endpoints
#[derive(Debug, Clone, PartialEq)]
pub enum RunFilter {
    /// `date = ?`
    Date(String),
    /// `distance > ?`
    DistanceGreater(f64),
    /// `distance < ?`
    DistanceLesser(f64),
    /// `pace < ?`, compared as text
    PaceFaster(String),
    /// `pace > ?`, compared as text
    PaceSlower(String),
    /// `notes LIKE '%keyword%'`
    NotesContain(String),
}

impl RunFilter {
    /// SQL predicate for this filter; the bound value comes from [`RunFilter::bind_value`].
    pub fn predicate(&self) -> &'static str {
        match self {
            RunFilter::Date(_) => "date = ?1",
            RunFilter::DistanceGreater(_) => "distance > ?1",
            RunFilter::DistanceLesser(_) => "distance < ?1",
            RunFilter::PaceFaster(_) => "pace < ?1",
            RunFilter::PaceSlower(_) => "pace > ?1",
            RunFilter::NotesContain(_) => "notes LIKE ?1",
        }
    }

    pub fn bind_value(&self) -> rusqlite::types::Value {
        use rusqlite::types::Value;

        match self {
            RunFilter::Date(date) => Value::Text(date.clone()),
            RunFilter::DistanceGreater(d) | RunFilter::DistanceLesser(d) => Value::Real(*d),
            RunFilter::PaceFaster(pace) | RunFilter::PaceSlower(pace) => Value::Text(pace.clone()),
            RunFilter::NotesContain(keyword) => Value::Text(format!("%{}%", keyword)),
        }
    }

    /// Message returned when the filter matches nothing
    pub fn not_found_message(&self) -> &'static str {
        match self {
            RunFilter::Date(_) => "No runs found for the specified date.",
            RunFilter::DistanceGreater(_) => {
                "No runs found with distance greater than the specified value."
            }
            RunFilter::DistanceLesser(_) => {
                "No runs found with distance lesser than the specified value."
            }
            RunFilter::PaceFaster(_) => "No runs found with a faster pace than the specified value.",
            RunFilter::PaceSlower(_) => "No runs found with a slower pace than the specified value.",
            RunFilter::NotesContain(_) => "No runs found with the specified keyword in notes.",
        }
    }

    /// Query-string form used by `GET /runs/filter?type=..&value=..`.
    ///
    /// `distance` maps to the lesser-than filter and `pace` to slower-than.
    /// Returns `None` for an unknown type.
    pub fn from_query(kind: &str, value: &str) -> Option<Self> {
        match kind {
            "date" => Some(RunFilter::Date(value.to_string())),
            "distance" => Some(RunFilter::DistanceLesser(parse_distance(value))),
            "pace" => Some(RunFilter::PaceSlower(value.to_string())),
            "notes" => Some(RunFilter::NotesContain(value.to_string())),
            _ => None,
        }
    }
}

/// Resolves a path id the way SQLite compares bound text against the
/// integer `id` column.
///
/// Text that reads as a decimal number is converted (surrounding ASCII
/// whitespace allowed), so `"1.0"` and `"1e0"` address row 1. Anything
/// else, or a non-integral value such as `"1.5"`, can never match a row.
pub fn parse_run_id(raw: &str) -> Option<RunId> {
    let trimmed = raw.trim_matches(|c: char| c.is_ascii_whitespace());
    if let Ok(id) = trimmed.parse::<RunId>() {
        return Some(id);
    }
    if !is_decimal_literal(trimmed) {
        return None;
    }

    let value = trimmed.parse::<f64>().ok()?;
    let in_range = value >= RunId::MIN as f64 && value < RunId::MAX as f64;
    (in_range && value.fract() == 0.0).then_some(value as RunId)
}

/// Parses a distance threshold like JavaScript `parseFloat`: the longest
/// numeric prefix counts (`"10km"` is `10.0`) and `"Infinity"` with an
/// optional sign is infinite.
///
/// Unparseable input yields NaN, which compares false against every row
/// and binds as NULL in SQLite, so the filter matches nothing.
pub fn parse_distance(raw: &str) -> f64 {
    let trimmed = raw.trim_start();

    let (negative, unsigned) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };
    if unsigned.starts_with("Infinity") {
        return if negative {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        };
    }

    trimmed
        .char_indices()
        .map(|(idx, ch)| idx + ch.len_utf8())
        .rev()
        .find_map(|end| {
            let candidate = &trimmed[..end];
            is_decimal_literal(candidate)
                .then(|| candidate.parse::<f64>().ok())
                .flatten()
        })
        .unwrap_or(f64::NAN)
}

/// Digits, sign, point and exponent only; keeps `inf`/`nan` spellings out
fn is_decimal_literal(text: &str) -> bool {
    !text.is_empty()
        && text
            .bytes()
            .all(|b| b.is_ascii_digit() || matches!(b, b'.' | b'-' | b'+' | b'e' | b'E'))
}
