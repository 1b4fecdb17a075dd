//! Builds, stat blocks, and live creature state.

use std::str::FromStr;

use serde::Serialize;
use thiserror::Error;

use crate::event::Side;
use crate::grid::{Grid, Position, Size};
use crate::species::{Ability, AbilityKind, Passive, Species};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum BuildError {
    #[error("all stats must be at least 1, got {name}={value}")]
    StatBelowMinimum { name: &'static str, value: i32 },
    #[error("stats must sum to 20, got {0}")]
    StatSumMismatch(i32),
    #[error("unknown species '{0}'")]
    UnknownSpecies(String),
    #[error("build must be '<species> <vitality> <attack> <speed> <willpower>', got '{0}'")]
    Malformed(String),
}

/// The four-way stat allocation. Every instance goes through
/// [`StatBlock::new`]; there is no deserialization path around the
/// validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StatBlock {
    vitality: i32,
    attack: i32,
    speed: i32,
    willpower: i32,
}

impl StatBlock {
    pub fn new(vitality: i32, attack: i32, speed: i32, willpower: i32) -> Result<Self, BuildError> {
        for (name, value) in [
            ("vitality", vitality),
            ("attack", attack),
            ("speed", speed),
            ("willpower", willpower),
        ] {
            if value < 1 {
                return Err(BuildError::StatBelowMinimum { name, value });
            }
        }
        let total = vitality + attack + speed + willpower;
        if total != 20 {
            return Err(BuildError::StatSumMismatch(total));
        }
        Ok(Self {
            vitality,
            attack,
            speed,
            willpower,
        })
    }

    pub fn vitality(&self) -> i32 {
        self.vitality
    }

    pub fn attack(&self) -> i32 {
        self.attack
    }

    pub fn speed(&self) -> i32 {
        self.speed
    }

    pub fn willpower(&self) -> i32 {
        self.willpower
    }
}

/// A species choice plus a stat allocation; the unit of evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Build {
    pub species: Species,
    pub stats: StatBlock,
}

impl Build {
    pub fn new(
        species: Species,
        vitality: i32,
        attack: i32,
        speed: i32,
        willpower: i32,
    ) -> Result<Self, BuildError> {
        Ok(Self {
            species,
            stats: StatBlock::new(vitality, attack, speed, willpower)?,
        })
    }
}

impl FromStr for Build {
    type Err = BuildError;

    /// Parses `"<species> <vitality> <attack> <speed> <willpower>"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split_whitespace().collect();
        if parts.len() != 5 {
            return Err(BuildError::Malformed(s.to_string()));
        }
        let species = Species::parse(&parts[0].to_lowercase())
            .ok_or_else(|| BuildError::UnknownSpecies(parts[0].to_string()))?;
        let mut stats = [0i32; 4];
        for (slot, raw) in stats.iter_mut().zip(&parts[1..]) {
            *slot = raw
                .parse()
                .map_err(|_| BuildError::Malformed(s.to_string()))?;
        }
        Build::new(species, stats[0], stats[1], stats[2], stats[3])
    }
}

/// A live buff or debuff instance attached to a creature.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AbilityBuff {
    pub kind: AbilityKind,
    pub remaining_ticks: u32,
    pub source_side: Side,
    /// Copies made through Mimic apply multiplicative effects at 75%
    /// of the nominal magnitude.
    pub mimic_copy: bool,
}

impl AbilityBuff {
    pub fn new(kind: AbilityKind, remaining_ticks: u32, source_side: Side) -> Self {
        Self {
            kind,
            remaining_ticks,
            source_side,
            mimic_copy: false,
        }
    }
}

/// A live damage- or heal-over-time instance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActiveEffect {
    pub name: &'static str,
    pub remaining_ticks: u32,
    pub damage_per_tick: i32,
    pub heal_per_tick: i32,
}

/// Full mutable combat state for one side. Constructed fresh from a
/// build for each match and owned exclusively by that match.
#[derive(Debug, Clone)]
pub struct Creature {
    pub species: Species,
    pub stats: StatBlock,
    pub passive: Passive,
    pub current_hp: i32,
    pub max_hp: i32,
    pub base_dmg: i32,
    pub armor_flat: i32,
    pub size: Size,
    pub position: Position,
    pub dodge_chance: f64,
    pub resist_chance: f64,
    pub movement_range: i32,
    pub abilities: Vec<Ability>,
    pub active_buffs: Vec<AbilityBuff>,
    pub active_effects: Vec<ActiveEffect>,
    pub second_wind_available: bool,
    pub second_wind_triggered: bool,
    pub charge_used: bool,
    pub first_hit_taken: bool,
    pub has_rend: bool,
    pub has_execute: bool,
    pub has_regeneration: bool,
    pub iron_will_used: bool,
    pub last_stand_used: bool,
    pub last_ability_procced: Option<AbilityKind>,
    pub skip_next_attack: bool,
    pub fury_triggered: bool,
    pub fury_active_ticks: u32,
}

impl Creature {
    /// Derives full combat state from a build for one side of a match.
    pub fn from_build(build: &Build, side: Side, match_seed: u64) -> Creature {
        let stats = build.stats;
        let size = size_for(stats.vitality(), stats.attack());
        let max_hp = max_hp_for(stats.vitality());
        let position = Grid::new().starting_position(side, size, match_seed);
        Creature {
            species: build.species,
            stats,
            passive: build.species.passive(),
            current_hp: max_hp,
            max_hp,
            base_dmg: base_damage_for(stats.attack()),
            armor_flat: 0,
            size,
            position,
            dodge_chance: dodge_for(stats.speed()),
            resist_chance: resist_for(stats.willpower()),
            movement_range: movement_range_for(stats.speed()),
            abilities: build.species.abilities().to_vec(),
            active_buffs: Vec::new(),
            active_effects: Vec::new(),
            second_wind_available: false,
            second_wind_triggered: false,
            charge_used: false,
            first_hit_taken: false,
            has_rend: false,
            has_execute: false,
            has_regeneration: false,
            iron_will_used: false,
            last_stand_used: false,
            last_ability_procced: None,
            skip_next_attack: false,
            fury_triggered: false,
            fury_active_ticks: 0,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.current_hp > 0
    }

    pub fn hp_fraction(&self) -> f64 {
        self.current_hp as f64 / self.max_hp as f64
    }
}

fn max_hp_for(vitality: i32) -> i32 {
    50 + 10 * vitality
}

fn base_damage_for(attack: i32) -> i32 {
    (2.0 + 0.85 * attack as f64).floor() as i32
}

fn dodge_for(speed: i32) -> f64 {
    (0.025 * (speed - 1) as f64).min(0.30).max(0.0)
}

fn resist_for(willpower: i32) -> f64 {
    (willpower as f64 * 0.033).min(0.60)
}

fn size_for(vitality: i32, attack: i32) -> Size {
    match vitality + attack {
        ..=10 => Size::new(1, 1),
        11..=12 => Size::new(2, 1),
        13..=17 => Size::new(2, 2),
        _ => Size::new(3, 2),
    }
}

fn movement_range_for(speed: i32) -> i32 {
    match speed {
        ..=3 => 1,
        4..=6 => 2,
        _ => 3,
    }
}
