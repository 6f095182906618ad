// Core data model: stat lines, player records, and projection sources.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The seven per-game statistical categories tracked for every player.
///
/// Values are fractional projections (averages), not box-score integers, and
/// are never negative once a row has passed validation. Full precision is
/// kept in memory; rounding happens only at presentation boundaries via
/// [`round_stat`].
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Stats {
    pub points: f64,
    pub rebounds: f64,
    pub assists: f64,
    pub steals: f64,
    pub blocks: f64,
    pub turnovers: f64,
    pub three_pointers: f64,
}

impl Stats {
    /// Element-wise sum. Used by the team-total folds.
    pub fn add(&self, other: &Stats) -> Stats {
        Stats {
            points: self.points + other.points,
            rebounds: self.rebounds + other.rebounds,
            assists: self.assists + other.assists,
            steals: self.steals + other.steals,
            blocks: self.blocks + other.blocks,
            turnovers: self.turnovers + other.turnovers,
            three_pointers: self.three_pointers + other.three_pointers,
        }
    }

    /// Element-wise difference (`self - other`).
    pub fn sub(&self, other: &Stats) -> Stats {
        Stats {
            points: self.points - other.points,
            rebounds: self.rebounds - other.rebounds,
            assists: self.assists - other.assists,
            steals: self.steals - other.steals,
            blocks: self.blocks - other.blocks,
            turnovers: self.turnovers - other.turnovers,
            three_pointers: self.three_pointers - other.three_pointers,
        }
    }

    /// Each category multiplied by `factor`.
    pub fn scaled(&self, factor: f64) -> Stats {
        Stats {
            points: self.points * factor,
            rebounds: self.rebounds * factor,
            assists: self.assists * factor,
            steals: self.steals * factor,
            blocks: self.blocks * factor,
            turnovers: self.turnovers * factor,
            three_pointers: self.three_pointers * factor,
        }
    }
}

/// A player's projection line with both the current (possibly adjusted)
/// values and the baseline captured at ingestion.
///
/// `minutes` and `stats` always satisfy
/// `stats == scale_stats(&original_stats, original_minutes, minutes)`;
/// they are only mutated together through
/// [`crate::scaling::apply_minutes`]. The baseline fields are never
/// modified after construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerRecord {
    /// De-facto unique key within a team.
    pub name: String,
    pub position: String,
    /// Canonical full franchise name, never an abbreviation once normalized.
    pub team: String,
    pub opponent: String,
    pub minutes: f64,
    pub stats: Stats,
    pub original_minutes: f64,
    pub original_stats: Stats,
}

impl PlayerRecord {
    /// Signed difference between current and ingested minutes.
    pub fn minutes_delta(&self) -> f64 {
        self.minutes - self.original_minutes
    }

    /// Current stats minus the ingested baseline.
    pub fn stat_deltas(&self) -> Stats {
        self.stats.sub(&self.original_stats)
    }
}

/// Which projection provider an uploaded CSV came from.
///
/// The source selects the column-alias dictionary and required-header set the
/// ingestion pipeline applies. Ingesting a file for a source replaces that
/// source's player list wholesale; lists from different sources never merge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DataSource {
    Etr,
    Ua,
}

impl DataSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            DataSource::Etr => "ETR",
            DataSource::Ua => "UA",
        }
    }
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DataSource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "ETR" => Ok(DataSource::Etr),
            "UA" => Ok(DataSource::Ua),
            other => Err(format!("unknown data source '{other}' (expected ETR or UA)")),
        }
    }
}

/// Round a stat value to one decimal place for display.
///
/// Stored values keep full precision so repeated minute edits don't compound
/// rounding error; call this only when formatting output.
pub fn round_stat(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Format a stat for display: whole numbers without a trailing ".0",
/// everything else with one decimal.
pub fn format_stat(value: f64) -> String {
    let rounded = round_stat(value);
    if rounded.fract() == 0.0 {
        format!("{rounded:.0}")
    } else {
        format!("{rounded:.1}")
    }
}
