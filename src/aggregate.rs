// Player and team aggregation: pure folds over a player list, recomputed on
// demand. Nothing here holds state.

use std::collections::HashMap;

use crate::model::{PlayerRecord, Stats};

/// Current, ingested, and signed-difference minute totals for a player set.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MinutesSummary {
    pub current: f64,
    pub original: f64,
    pub difference: f64,
}

/// Sum current stats across players.
pub fn team_totals(players: &[PlayerRecord]) -> Stats {
    players
        .iter()
        .fold(Stats::default(), |acc, p| acc.add(&p.stats))
}

/// Sum the ingested baselines across players.
pub fn team_original_totals(players: &[PlayerRecord]) -> Stats {
    players
        .iter()
        .fold(Stats::default(), |acc, p| acc.add(&p.original_stats))
}

/// Element-wise `current - original`.
pub fn stat_differences(current: &Stats, original: &Stats) -> Stats {
    current.sub(original)
}

/// Minute totals mirroring the stat folds.
pub fn team_minutes(players: &[PlayerRecord]) -> MinutesSummary {
    let current: f64 = players.iter().map(|p| p.minutes).sum();
    let original: f64 = players.iter().map(|p| p.original_minutes).sum();
    MinutesSummary {
        current,
        original,
        difference: current - original,
    }
}

/// Current minute total for one team within a mixed player list.
pub fn team_total_minutes(players: &[PlayerRecord], team: &str) -> f64 {
    players
        .iter()
        .filter(|p| p.team == team)
        .map(|p| p.minutes)
        .sum()
}

/// Group players by canonical team name, preserving file order within each
/// team.
pub fn group_by_team(players: &[PlayerRecord]) -> HashMap<String, Vec<&PlayerRecord>> {
    let mut teams: HashMap<String, Vec<&PlayerRecord>> = HashMap::new();
    for player in players {
        teams.entry(player.team.clone()).or_default().push(player);
    }
    teams
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scaling::apply_minutes;

    fn player(name: &str, team: &str, minutes: f64, points: f64, assists: f64) -> PlayerRecord {
        let stats = Stats {
            points,
            assists,
            ..Stats::default()
        };
        PlayerRecord {
            name: name.into(),
            position: "G".into(),
            team: team.into(),
            opponent: "Miami Heat".into(),
            minutes,
            stats,
            original_minutes: minutes,
            original_stats: stats,
        }
    }

    #[test]
    fn totals_sum_every_player() {
        let players = vec![
            player("One", "Chicago Bulls", 30.0, 20.0, 5.0),
            player("Two", "Chicago Bulls", 20.0, 10.0, 2.5),
        ];
        let totals = team_totals(&players);
        assert!((totals.points - 30.0).abs() < f64::EPSILON);
        assert!((totals.assists - 7.5).abs() < f64::EPSILON);
        assert!(totals.rebounds.abs() < f64::EPSILON);
    }

    #[test]
    fn deltas_track_minute_edits() {
        let mut players = vec![
            player("One", "Chicago Bulls", 30.0, 20.0, 5.0),
            player("Two", "Chicago Bulls", 20.0, 10.0, 2.5),
        ];
        apply_minutes(&mut players[0], 15.0);

        let diffs = stat_differences(&team_totals(&players), &team_original_totals(&players));
        assert!((diffs.points - (-10.0)).abs() < 1e-9);
        assert!((diffs.assists - (-2.5)).abs() < 1e-9);

        let minutes = team_minutes(&players);
        assert!((minutes.current - 35.0).abs() < f64::EPSILON);
        assert!((minutes.original - 50.0).abs() < f64::EPSILON);
        assert!((minutes.difference - (-15.0)).abs() < f64::EPSILON);
    }

    #[test]
    fn team_total_minutes_filters_by_team() {
        let players = vec![
            player("One", "Chicago Bulls", 30.0, 20.0, 5.0),
            player("Two", "Miami Heat", 20.0, 10.0, 2.5),
        ];
        assert!((team_total_minutes(&players, "Chicago Bulls") - 30.0).abs() < f64::EPSILON);
        assert!((team_total_minutes(&players, "Utah Jazz")).abs() < f64::EPSILON);
    }

    #[test]
    fn group_by_team_preserves_order_within_team() {
        let players = vec![
            player("One", "Chicago Bulls", 30.0, 20.0, 5.0),
            player("Two", "Miami Heat", 20.0, 10.0, 2.5),
            player("Three", "Chicago Bulls", 18.0, 8.0, 1.0),
        ];
        let grouped = group_by_team(&players);
        assert_eq!(grouped.len(), 2);
        let bulls = &grouped["Chicago Bulls"];
        assert_eq!(bulls[0].name, "One");
        assert_eq!(bulls[1].name, "Three");
    }

    #[test]
    fn empty_list_yields_zero_totals() {
        let totals = team_totals(&[]);
        assert_eq!(totals, Stats::default());
        let minutes = team_minutes(&[]);
        assert!(minutes.current.abs() < f64::EPSILON);
        assert!(minutes.difference.abs() < f64::EPSILON);
    }
}
