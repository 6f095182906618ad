// Proportional stat scaling on minute edits.

use crate::model::{PlayerRecord, Stats};

/// Recompute a stat line for a new minute total.
///
/// The scaling factor `new_minutes / original_minutes` applies uniformly to
/// all seven categories; there is no category-specific diminishing-returns
/// modeling. A player projected at zero minutes has no per-minute rate to
/// scale from, so `original_minutes == 0` yields an all-zero line no matter
/// what `new_minutes` is. That degenerate case is intended behavior, not a
/// divide-by-zero guard.
///
/// Pure: returns a fresh value at full precision. Round only at display
/// time via [`crate::model::round_stat`].
pub fn scale_stats(original: &Stats, original_minutes: f64, new_minutes: f64) -> Stats {
    if original_minutes == 0.0 {
        return Stats::default();
    }
    original.scaled(new_minutes / original_minutes)
}

/// Apply a new minute total to a player, rescaling stats from the ingested
/// baseline.
///
/// This is the only sanctioned way to mutate the `minutes`/`stats` pair, so
/// the record's invariant (`stats` always derived from the baseline at the
/// current minutes) holds by construction. Validation happens before this
/// call, in `minutes::validate_adjustment`.
pub fn apply_minutes(player: &mut PlayerRecord, new_minutes: f64) {
    player.stats = scale_stats(&player.original_stats, player.original_minutes, new_minutes);
    player.minutes = new_minutes;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_stats() -> Stats {
        Stats {
            points: 20.0,
            rebounds: 4.0,
            assists: 5.0,
            steals: 1.0,
            blocks: 0.5,
            turnovers: 2.0,
            three_pointers: 2.5,
        }
    }

    fn assert_stats_close(a: &Stats, b: &Stats) {
        const EPS: f64 = 1e-9;
        assert!((a.points - b.points).abs() < EPS, "points {a:?} vs {b:?}");
        assert!((a.rebounds - b.rebounds).abs() < EPS);
        assert!((a.assists - b.assists).abs() < EPS);
        assert!((a.steals - b.steals).abs() < EPS);
        assert!((a.blocks - b.blocks).abs() < EPS);
        assert!((a.turnovers - b.turnovers).abs() < EPS);
        assert!((a.three_pointers - b.three_pointers).abs() < EPS);
    }

    #[test]
    fn identity_scaling() {
        let stats = sample_stats();
        let scaled = scale_stats(&stats, 30.0, 30.0);
        assert_stats_close(&scaled, &stats);
    }

    #[test]
    fn zero_original_minutes_yields_all_zero() {
        let stats = sample_stats();
        for new_minutes in [0.0, 12.0, 48.0] {
            let scaled = scale_stats(&stats, 0.0, new_minutes);
            assert_stats_close(&scaled, &Stats::default());
        }
    }

    #[test]
    fn doubling_minutes_doubles_every_category() {
        let stats = sample_stats();
        let scaled = scale_stats(&stats, 24.0, 48.0);
        assert_stats_close(&scaled, &stats.scaled(2.0));
    }

    #[test]
    fn factor_composition_is_linear() {
        let stats = sample_stats();
        let once = scale_stats(&stats, 30.0, 10.0);
        let twice = scale_stats(&stats, 30.0, 20.0);
        assert_stats_close(&twice, &once.scaled(2.0));
    }

    #[test]
    fn scaling_down_to_zero_minutes() {
        let stats = sample_stats();
        let scaled = scale_stats(&stats, 30.0, 0.0);
        assert_stats_close(&scaled, &Stats::default());
    }

    #[test]
    fn apply_minutes_rescales_from_baseline_not_current() {
        let mut player = PlayerRecord {
            name: "A. Player".into(),
            position: "G".into(),
            team: "LA Clippers".into(),
            opponent: "Boston Celtics".into(),
            minutes: 30.0,
            stats: sample_stats(),
            original_minutes: 30.0,
            original_stats: sample_stats(),
        };

        apply_minutes(&mut player, 15.0);
        assert!((player.minutes - 15.0).abs() < f64::EPSILON);
        assert_stats_close(&player.stats, &sample_stats().scaled(0.5));

        // A second edit scales from the ingested baseline, so no rounding or
        // drift compounds across repeated adjustments.
        apply_minutes(&mut player, 30.0);
        assert_stats_close(&player.stats, &sample_stats());
        assert!((player.original_minutes - 30.0).abs() < f64::EPSILON);
    }
}
