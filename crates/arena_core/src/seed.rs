//! Deterministic seed derivation.
//!
//! Every random event in a match is derived from the 64-bit match seed
//! through these functions; no other randomness source is permitted.
//! The chain runs `match seed -> tick seed -> hit/proc seed -> uniform
//! draw`, hashing the packed big-endian encoding of the inputs with
//! SHA-256 so that any conforming implementation reproduces the exact
//! same values.

use sha2::{Digest, Sha256};

/// Derives the per-tick seed from the match seed and tick index.
pub fn derive_tick_seed(match_seed: u64, tick: u32) -> u32 {
    let mut hasher = Sha256::new();
    hasher.update(match_seed.to_be_bytes());
    hasher.update(tick.to_be_bytes());
    first_u32(&hasher.finalize())
}

/// Derives the seed for a single attack resolution.
pub fn derive_hit_seed(match_seed: u64, tick: u32, attack_index: u32) -> u32 {
    let mut hasher = Sha256::new();
    hasher.update(match_seed.to_be_bytes());
    hasher.update(tick.to_be_bytes());
    hasher.update(attack_index.to_be_bytes());
    first_u32(&hasher.finalize())
}

/// Derives the seed for one ability-proc roll.
///
/// Packs `(match_seed: u64, tick: u32, creature_index: u8,
/// ability_index: u8)` big-endian, mirroring the wire contract shared
/// with other implementations.
pub fn derive_proc_seed(match_seed: u64, tick: u32, creature_index: u8, ability_index: u8) -> u32 {
    let mut hasher = Sha256::new();
    hasher.update(match_seed.to_be_bytes());
    hasher.update(tick.to_be_bytes());
    hasher.update([creature_index, ability_index]);
    first_u32(&hasher.finalize())
}

/// Produces a uniform float in `[min, max)` from a 32-bit seed.
///
/// The seed is hashed and the first 8 digest bytes are normalized by
/// 2^64. Callers that offset seeds (`seed + 7`, `seed + 31337`, ...)
/// must use wrapping arithmetic so the value stays in u32 range.
pub fn seeded_random(seed: u32, min: f64, max: f64) -> f64 {
    let digest = Sha256::digest(seed.to_be_bytes());
    let mut raw = [0u8; 8];
    raw.copy_from_slice(&digest[..8]);
    let normalized = u64::from_be_bytes(raw) as f64 / 18_446_744_073_709_551_616.0;
    min + normalized * (max - min)
}

/// Returns true with the given probability, deterministically.
pub fn seeded_bool(seed: u32, probability: f64) -> bool {
    seeded_random(seed, 0.0, 1.0) < probability
}

fn first_u32(digest: &[u8]) -> u32 {
    let mut raw = [0u8; 4];
    raw.copy_from_slice(&digest[..4]);
    u32::from_be_bytes(raw)
}

#[cfg(test)]
mod tests {
    use super::*;

    // Baselines produced by the reference implementation; they pin the
    // cross-language portability contract.
    #[test]
    fn tick_seed_baselines() {
        assert_eq!(derive_tick_seed(42, 1), 3_881_995_588);
        assert_eq!(derive_tick_seed(42, 60), 2_579_208_781);
        assert_eq!(derive_tick_seed(0, 1), 874_762_210);
        assert_eq!(derive_tick_seed(1 << 63, 7), 1_090_684_747);
    }

    #[test]
    fn hit_seed_baselines() {
        assert_eq!(derive_hit_seed(42, 1, 1), 2_525_531_024);
        assert_eq!(derive_hit_seed(42, 3, 17), 1_397_473_943);
    }

    #[test]
    fn proc_seed_baselines() {
        assert_eq!(derive_proc_seed(42, 1, 0, 0), 3_248_761_589);
        assert_eq!(derive_proc_seed(42, 1, 0, 1), 1_184_842_552);
        assert_eq!(derive_proc_seed(42, 5, 1, 1), 3_089_960_195);
    }

    #[test]
    fn uniform_baselines() {
        assert_eq!(seeded_random(12345, 0.0, 1.0), 0.41825812815762936);
        assert_eq!(seeded_random(0, 0.0, 1.0), 0.8720608707559776);
        assert_eq!(seeded_random(u32::MAX, 0.0, 1.0), 0.6780559485202658);
        assert_eq!(seeded_random(777, -0.05, 0.05), -0.036566083024516124);
        assert_eq!(seeded_random(999, 0.0, 0.49), 0.04842444638021723);
    }

    #[test]
    fn uniform_stays_in_range() {
        for seed in 0..500 {
            let v = seeded_random(seed, 0.0, 1.0);
            assert!((0.0..1.0).contains(&v), "seed {seed} escaped range: {v}");
        }
    }

    #[test]
    fn bool_matches_threshold() {
        for seed in 0..100 {
            let v = seeded_random(seed, 0.0, 1.0);
            assert_eq!(seeded_bool(seed, 0.5), v < 0.5);
        }
        assert!(!seeded_bool(42, 0.0));
        assert!(seeded_bool(42, 1.0));
    }
}
