// Minute-budget constraint validation.
//
// Two entry points share one invariant set: per-player minutes within
// [0, 48], team total equal to the 240-minute regulation budget. The bulk
// check enforces both; the single-edit check enforces the per-player range
// and treats 240 as a hard upper wall while allowing totals to sit under
// 240 mid-edit. Reaching exactly 240 is only demanded holistically.

use std::collections::HashMap;

use crate::model::PlayerRecord;

/// Regulation team budget: five on-court slots times 48 minutes.
pub const TEAM_MINUTE_LIMIT: f64 = 240.0;
pub const MIN_PLAYER_MINUTES: f64 = 0.0;
pub const MAX_PLAYER_MINUTES: f64 = 48.0;

/// Outcome of the bulk team check. Derived on demand, never stored.
#[derive(Debug, Clone)]
pub struct TeamMinutesValidation {
    /// True only when there are zero error messages: every player in range
    /// and the team total exactly 240.
    pub is_valid: bool,
    pub total_minutes: f64,
    /// Signed shortfall against the budget: `240 - total`. Positive means
    /// minutes still to hand out, negative means over budget.
    pub minutes_difference: f64,
    /// Per-player messages followed by the team-level message, if any.
    pub errors: Vec<String>,
}

/// Outcome of checking one proposed edit. Advisory only: the caller decides
/// whether to apply or discard the edit.
#[derive(Debug, Clone)]
pub struct AdjustmentCheck {
    pub is_valid: bool,
    pub error: Option<String>,
}

impl AdjustmentCheck {
    fn ok() -> Self {
        AdjustmentCheck {
            is_valid: true,
            error: None,
        }
    }

    fn rejected(reason: String) -> Self {
        AdjustmentCheck {
            is_valid: false,
            error: Some(reason),
        }
    }
}

/// Bulk check: filter to `team`, flag every player outside [0, 48], and
/// append a team-level message whenever the total differs from 240.
pub fn validate_team_minutes(players: &[PlayerRecord], team: &str) -> TeamMinutesValidation {
    let mut errors = Vec::new();
    let mut total_minutes = 0.0;

    for player in players.iter().filter(|p| p.team == team) {
        if player.minutes < MIN_PLAYER_MINUTES {
            errors.push(format!(
                "{}: minutes cannot be less than {MIN_PLAYER_MINUTES:.0}",
                player.name
            ));
        } else if player.minutes > MAX_PLAYER_MINUTES {
            errors.push(format!(
                "{}: minutes cannot exceed {MAX_PLAYER_MINUTES:.0}",
                player.name
            ));
        }
        total_minutes += player.minutes;
    }

    let minutes_difference = TEAM_MINUTE_LIMIT - total_minutes;
    if total_minutes != TEAM_MINUTE_LIMIT {
        errors.push(format!(
            "Team total: minutes must equal {TEAM_MINUTE_LIMIT:.0} (current: {total_minutes})"
        ));
    }

    TeamMinutesValidation {
        is_valid: errors.is_empty(),
        total_minutes,
        minutes_difference,
        errors,
    }
}

/// Single-edit check: reject proposals outside [0, 48] outright, then
/// reject any edit that would push the team total strictly above 240.
///
/// `team_total_minutes` is the team's current total including this player
/// at `current_minutes`. Totals that stay at or under 240 pass; incremental
/// edits are not required to land the team on exactly 240.
pub fn validate_adjustment(
    current_minutes: f64,
    proposed_minutes: f64,
    team_total_minutes: f64,
) -> AdjustmentCheck {
    if proposed_minutes < MIN_PLAYER_MINUTES {
        return AdjustmentCheck::rejected(format!(
            "minutes cannot be less than {MIN_PLAYER_MINUTES:.0}"
        ));
    }
    if proposed_minutes > MAX_PLAYER_MINUTES {
        return AdjustmentCheck::rejected(format!(
            "minutes cannot exceed {MAX_PLAYER_MINUTES:.0}"
        ));
    }

    let new_team_total = team_total_minutes - current_minutes + proposed_minutes;
    if new_team_total > TEAM_MINUTE_LIMIT {
        return AdjustmentCheck::rejected(format!(
            "adjustment would push the team to {new_team_total} minutes, \
             over the {TEAM_MINUTE_LIMIT:.0}-minute limit"
        ));
    }

    AdjustmentCheck::ok()
}

/// Greedy, best-effort redistribution toward `target_minutes` for one team.
///
/// Returns proposed new minute totals keyed by player name. Surplus minutes
/// go to the highest-minute players with headroom under 48; deficits come
/// off the highest-minute players first, never below 0. This is a starting
/// point for manual editing, not an optimizer, and it may fall short of the
/// target when the roster lacks headroom.
pub fn suggest_minute_distribution(
    players: &[PlayerRecord],
    target_minutes: f64,
    team: &str,
) -> HashMap<String, f64> {
    let mut team_players: Vec<&PlayerRecord> =
        players.iter().filter(|p| p.team == team).collect();
    let current_total: f64 = team_players.iter().map(|p| p.minutes).sum();
    let to_distribute = target_minutes - current_total;

    let mut adjustments = HashMap::new();
    if to_distribute == 0.0 {
        return adjustments;
    }

    // Highest-minute players first; they absorb changes in either direction.
    team_players.sort_by(|a, b| {
        b.minutes
            .partial_cmp(&a.minutes)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    if to_distribute > 0.0 {
        let mut remaining = to_distribute;
        for player in &team_players {
            if remaining <= 0.0 {
                break;
            }
            let headroom = MAX_PLAYER_MINUTES - player.minutes;
            if headroom > 0.0 {
                let adjustment = remaining.min(headroom);
                adjustments.insert(player.name.clone(), player.minutes + adjustment);
                remaining -= adjustment;
            }
        }
    } else {
        let mut to_reduce = -to_distribute;
        for player in &team_players {
            if to_reduce <= 0.0 {
                break;
            }
            let reducible = player.minutes - MIN_PLAYER_MINUTES;
            if reducible > 0.0 {
                let adjustment = to_reduce.min(reducible);
                adjustments.insert(player.name.clone(), player.minutes - adjustment);
                to_reduce -= adjustment;
            }
        }
    }

    adjustments
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Stats;

    fn player(name: &str, team: &str, minutes: f64) -> PlayerRecord {
        PlayerRecord {
            name: name.into(),
            position: "G".into(),
            team: team.into(),
            opponent: "Boston Celtics".into(),
            minutes,
            stats: Stats::default(),
            original_minutes: minutes,
            original_stats: Stats::default(),
        }
    }

    /// Five players summing to exactly 240.
    fn balanced_roster(team: &str) -> Vec<PlayerRecord> {
        vec![
            player("One", team, 48.0),
            player("Two", team, 48.0),
            player("Three", team, 48.0),
            player("Four", team, 48.0),
            player("Five", team, 48.0),
        ]
    }

    // -- Bulk team check --

    #[test]
    fn balanced_team_is_valid() {
        let players = balanced_roster("LA Clippers");
        let result = validate_team_minutes(&players, "LA Clippers");
        assert!(result.is_valid);
        assert!((result.total_minutes - 240.0).abs() < f64::EPSILON);
        assert!(result.minutes_difference.abs() < f64::EPSILON);
        assert!(result.errors.is_empty());
    }

    #[test]
    fn under_budget_team_reports_signed_difference() {
        let mut players = balanced_roster("LA Clippers");
        players[4].minutes = 43.0; // total 235

        let result = validate_team_minutes(&players, "LA Clippers");
        assert!(!result.is_valid);
        assert!((result.total_minutes - 235.0).abs() < f64::EPSILON);
        assert!((result.minutes_difference - 5.0).abs() < f64::EPSILON);
        assert_eq!(result.errors.len(), 1);
        assert!(result.errors[0].contains("235"));
        assert!(result.errors[0].contains("240"));
    }

    #[test]
    fn out_of_range_player_flagged_by_name() {
        let mut players = balanced_roster("LA Clippers");
        players[0].minutes = 50.0;
        players[1].minutes = 46.0; // total back to 240

        let result = validate_team_minutes(&players, "LA Clippers");
        assert!(!result.is_valid);
        assert_eq!(result.errors.len(), 1);
        assert!(result.errors[0].starts_with("One:"));
    }

    #[test]
    fn other_teams_excluded_from_bulk_check() {
        let mut players = balanced_roster("LA Clippers");
        players.push(player("Elsewhere", "Boston Celtics", 99.0));

        let result = validate_team_minutes(&players, "LA Clippers");
        assert!(result.is_valid);
    }

    #[test]
    fn valid_iff_in_range_and_exactly_240() {
        // In range but not 240
        let mut players = balanced_roster("LA Clippers");
        players[0].minutes = 40.0;
        assert!(!validate_team_minutes(&players, "LA Clippers").is_valid);

        // 240 but one player out of range
        let mut players = balanced_roster("LA Clippers");
        players[0].minutes = 50.0;
        players[1].minutes = 46.0;
        assert!(!validate_team_minutes(&players, "LA Clippers").is_valid);
    }

    // -- Single-edit check --

    #[test]
    fn proposed_minutes_outside_range_rejected() {
        assert!(!validate_adjustment(30.0, -1.0, 100.0).is_valid);
        assert!(!validate_adjustment(30.0, 48.5, 100.0).is_valid);
        // Range rejection happens regardless of team total headroom
        assert!(!validate_adjustment(30.0, 49.0, 0.0).is_valid);
    }

    #[test]
    fn overshooting_240_rejected() {
        // Rest of team sums to 210; 30 -> 36 would make 246
        let check = validate_adjustment(30.0, 36.0, 240.0);
        assert!(!check.is_valid);
        assert!(check.error.as_deref().unwrap_or("").contains("240"));

        // 30 -> 33 still lands at 243, also rejected
        assert!(!validate_adjustment(30.0, 33.0, 240.0).is_valid);
    }

    #[test]
    fn staying_at_or_under_240_accepted() {
        // 30 -> 29 lands at 239: under budget is permitted per-edit
        let check = validate_adjustment(30.0, 29.0, 240.0);
        assert!(check.is_valid);
        assert!(check.error.is_none());

        // Landing exactly on 240 is fine too
        assert!(validate_adjustment(30.0, 30.0, 240.0).is_valid);
    }

    #[test]
    fn boundary_values_accepted() {
        assert!(validate_adjustment(30.0, 0.0, 240.0).is_valid);
        assert!(validate_adjustment(30.0, 48.0, 222.0).is_valid);
    }

    // -- Greedy redistribution --

    #[test]
    fn surplus_goes_to_highest_minute_players_with_headroom() {
        let players = vec![
            player("Starter", "LA Clippers", 40.0),
            player("Sixth", "LA Clippers", 30.0),
            player("Bench", "LA Clippers", 10.0),
        ];
        // total 80, target 95 -> 15 to hand out
        let suggestions = suggest_minute_distribution(&players, 95.0, "LA Clippers");
        assert!((suggestions["Starter"] - 48.0).abs() < f64::EPSILON);
        assert!((suggestions["Sixth"] - 37.0).abs() < f64::EPSILON);
        assert!(!suggestions.contains_key("Bench"));
    }

    #[test]
    fn deficit_comes_off_highest_minute_players() {
        let players = vec![
            player("Starter", "LA Clippers", 40.0),
            player("Sixth", "LA Clippers", 30.0),
        ];
        // total 70, target 25 -> remove 45
        let suggestions = suggest_minute_distribution(&players, 25.0, "LA Clippers");
        assert!((suggestions["Starter"] - 0.0).abs() < f64::EPSILON);
        assert!((suggestions["Sixth"] - 25.0).abs() < f64::EPSILON);
    }

    #[test]
    fn already_on_target_suggests_nothing() {
        let players = balanced_roster("LA Clippers");
        let suggestions = suggest_minute_distribution(&players, 240.0, "LA Clippers");
        assert!(suggestions.is_empty());
    }

    #[test]
    fn suggestion_falls_short_without_headroom() {
        let players = balanced_roster("LA Clippers"); // everyone at 48
        let suggestions = suggest_minute_distribution(&players, 250.0, "LA Clippers");
        // Nobody has headroom; best effort is an empty suggestion set.
        assert!(suggestions.is_empty());
    }
}
