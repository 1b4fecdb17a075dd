//! Helpers for deterministic regression tests.

use arena_core::{run_combat, Build, CombatConfig, CombatError, Creature, Side};

pub const DEFAULT_SEED: u64 = 42;

/// Aggregate verdicts for a seeded batch of games.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchupSummary {
    pub wins_a: u64,
    pub wins_b: u64,
    pub draws: u64,
    pub games: u64,
    pub total_ticks: u64,
}

/// Runs `games` matches between two builds with seeds
/// `base_seed, base_seed + 1, ...` and tallies the outcomes.
pub fn run_matchup(
    build_a: &Build,
    build_b: &Build,
    games: u64,
    base_seed: u64,
) -> Result<MatchupSummary, CombatError> {
    let config = CombatConfig::default();
    let mut summary = MatchupSummary {
        wins_a: 0,
        wins_b: 0,
        draws: 0,
        games,
        total_ticks: 0,
    };
    for game in 0..games {
        let match_seed = base_seed + game;
        let creature_a = Creature::from_build(build_a, Side::A, match_seed);
        let creature_b = Creature::from_build(build_b, Side::B, match_seed);
        let result = run_combat(creature_a, creature_b, match_seed, &config)?;
        summary.total_ticks += u64::from(result.ticks);
        match result.winner {
            Some(Side::A) => summary.wins_a += 1,
            Some(Side::B) => summary.wins_b += 1,
            None => summary.draws += 1,
        }
    }
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matchup_is_deterministic() {
        let build_a: Build = "bear 3 14 2 1".parse().unwrap();
        let build_b: Build = "buffalo 8 6 4 2".parse().unwrap();
        let first = run_matchup(&build_a, &build_b, 10, DEFAULT_SEED).unwrap();
        let second = run_matchup(&build_a, &build_b, 10, DEFAULT_SEED).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.games, 10);
        assert_eq!(first.wins_a + first.wins_b + first.draws, 10);
    }
}
