// Column alias resolution and team name normalization.
//
// Source CSVs disagree on column names (`points` vs `pts`, `minutes` vs
// `min`) and abbreviate teams. Everything funnels through the tables here so
// the rest of the pipeline only ever sees canonical names.

use std::collections::HashMap;

use crate::model::DataSource;

/// Canonical field name plus the aliases accepted for it, tried in order.
pub struct FieldSpec {
    pub canonical: &'static str,
    pub aliases: &'static [&'static str],
}

/// Every field the pipeline understands. The canonical name is tried first,
/// then each alias; first present wins.
pub const FIELDS: &[FieldSpec] = &[
    FieldSpec { canonical: "player", aliases: &["name"] },
    FieldSpec { canonical: "position", aliases: &["pos"] },
    FieldSpec { canonical: "team", aliases: &[] },
    FieldSpec { canonical: "opponent", aliases: &["opp"] },
    FieldSpec { canonical: "minutes", aliases: &["min"] },
    FieldSpec { canonical: "points", aliases: &["pts"] },
    FieldSpec { canonical: "rebounds", aliases: &["reb"] },
    FieldSpec { canonical: "assists", aliases: &["ast"] },
    FieldSpec { canonical: "steals", aliases: &["stl"] },
    FieldSpec { canonical: "blocks", aliases: &["blk"] },
    FieldSpec { canonical: "turnovers", aliases: &["to"] },
    FieldSpec { canonical: "threepointers", aliases: &["3pm"] },
];

/// Required headers per source. `threepointers` is deliberately absent: a
/// missing column there defaults to 0 instead of rejecting the file.
pub fn required_headers(source: DataSource) -> &'static [&'static str] {
    match source {
        DataSource::Etr | DataSource::Ua => &[
            "player",
            "position",
            "team",
            "opponent",
            "minutes",
            "points",
            "rebounds",
            "assists",
            "steals",
            "blocks",
            "turnovers",
        ],
    }
}

/// One parsed CSV row, keyed by lower-cased, trimmed header name.
pub type RawRow = HashMap<String, String>;

/// All header names accepted for a canonical field, canonical first.
/// Unknown canonicals accept only themselves.
pub fn accepted_names(canonical: &'static str) -> Vec<&'static str> {
    match FIELDS.iter().find(|f| f.canonical == canonical) {
        Some(spec) => std::iter::once(spec.canonical)
            .chain(spec.aliases.iter().copied())
            .collect(),
        None => vec![canonical],
    }
}

/// Resolve a canonical field from a raw row, walking the alias list.
///
/// Returns the first non-blank value found, trimmed. Blank values are
/// treated as absent so `"player,,team"` rows fall through to the row
/// validator's missing-field check.
pub fn resolve_field<'a>(row: &'a RawRow, canonical: &str) -> Option<&'a str> {
    let spec = FIELDS.iter().find(|f| f.canonical == canonical)?;
    std::iter::once(spec.canonical)
        .chain(spec.aliases.iter().copied())
        .find_map(|key| {
            let value = row.get(key)?.trim();
            if value.is_empty() {
                None
            } else {
                Some(value)
            }
        })
}

/// Abbreviation → full franchise name, one entry per franchise. Static
/// configuration data; there is no runtime mutation path.
const TEAM_NAMES: &[(&str, &str)] = &[
    ("ATL", "Atlanta Hawks"),
    ("BOS", "Boston Celtics"),
    ("BKN", "Brooklyn Nets"),
    ("CHA", "Charlotte Hornets"),
    ("CHI", "Chicago Bulls"),
    ("CLE", "Cleveland Cavaliers"),
    ("DAL", "Dallas Mavericks"),
    ("DEN", "Denver Nuggets"),
    ("DET", "Detroit Pistons"),
    ("GSW", "Golden State Warriors"),
    ("HOU", "Houston Rockets"),
    ("IND", "Indiana Pacers"),
    ("LAC", "LA Clippers"),
    ("LAL", "Los Angeles Lakers"),
    ("MEM", "Memphis Grizzlies"),
    ("MIA", "Miami Heat"),
    ("MIL", "Milwaukee Bucks"),
    ("MIN", "Minnesota Timberwolves"),
    ("NOP", "New Orleans Pelicans"),
    ("NYK", "New York Knicks"),
    ("OKC", "Oklahoma City Thunder"),
    ("ORL", "Orlando Magic"),
    ("PHI", "Philadelphia 76ers"),
    ("PHX", "Phoenix Suns"),
    ("POR", "Portland Trail Blazers"),
    ("SAC", "Sacramento Kings"),
    ("SAS", "San Antonio Spurs"),
    ("TOR", "Toronto Raptors"),
    ("UTA", "Utah Jazz"),
    ("WAS", "Washington Wizards"),
];

/// Normalize a team name: known abbreviations map to the full franchise
/// name, anything else gets each word title-cased. Pure and total.
pub fn normalize_team_name(raw: &str) -> String {
    let upper = raw.trim().to_uppercase();
    if let Some((_, full)) = TEAM_NAMES.iter().find(|(abbr, _)| *abbr == upper) {
        return (*full).to_string();
    }
    title_case(raw.trim())
}

fn title_case(s: &str) -> String {
    s.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => {
                    first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase()
                }
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
