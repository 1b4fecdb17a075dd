//! The authoritative combat tick loop.
//!
//! Each tick runs a fixed pipeline: initiative, per-side turns
//! (movement + one attack), buff decay, ability procs, fury
//! bookkeeping, damage over time, ring damage, second wind, and
//! regeneration, followed by the terminal check. Every step is a pure
//! function of accumulated state and the seed chain.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::abilities::{
    apply_ability_attack_mods, apply_ability_defense, check_fury_trigger, get_effective_dodge,
    has_ignore_dodge_buff, roll_ability_procs, tick_ability_buffs, tick_fury,
};
use crate::config::CombatConfig;
use crate::creature::{ActiveEffect, Creature};
use crate::event::{CombatEvent, Side, TickLog};
use crate::grid::{Grid, GridError};
use crate::seed::{derive_hit_seed, derive_tick_seed, seeded_random};
use crate::species::{AbilityKind, Passive};

#[derive(Debug, Error)]
pub enum CombatError {
    /// A creature could not be placed or moved; the caller handed the
    /// engine an inconsistent starting state.
    #[error("grid invariant violation: {0}")]
    Grid(#[from] GridError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EndCondition {
    Death,
    Timeout,
}

/// Final verdict plus the complete ordered event log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombatResult {
    pub winner: Option<Side>,
    pub ticks: u32,
    pub end_condition: EndCondition,
    pub seed: u64,
    pub log: Vec<TickLog>,
    pub final_hp_a: i32,
    pub final_hp_b: i32,
}

/// Per-tick turn-order score: speed plus seeded jitter in [0, 0.49).
pub fn calculate_initiative(speed: i32, tick_seed: u32, creature_index: u32) -> f64 {
    let seed = tick_seed.wrapping_add(creature_index.wrapping_mul(7919));
    speed as f64 + seeded_random(seed, 0.0, 0.49)
}

/// One attack's damage: dodge roll, armor mitigation, then jitter.
pub fn calculate_physical_damage(
    attacker: &Creature,
    defender: &Creature,
    hit_seed: u32,
    dodge_seed: u32,
    ability_mod: f64,
    ignore_dodge: bool,
    effective_dodge: f64,
) -> i32 {
    let raw = (attacker.base_dmg as f64 * ability_mod).floor() as i32;

    if !ignore_dodge && effective_dodge > 0.0 {
        let dodge_roll = seeded_random(dodge_seed, 0.0, 1.0);
        if dodge_roll < effective_dodge {
            return 0;
        }
    }

    let effective_armor = defender.armor_flat.min(((raw as f64) * 0.5).floor() as i32);
    let after_armor = (raw - effective_armor).max(1);

    let eps = seeded_random(hit_seed.wrapping_add(1), -0.05, 0.05);
    let final_damage = (after_armor as f64 * (1.0 + eps)).floor() as i32;

    final_damage.max(1)
}

/// Runs one full match to its verdict.
///
/// The engine owns both creature records for the duration of the match
/// and mutates them directly; callers construct fresh creatures per
/// match and must not reuse them.
pub fn run_combat(
    creature_a: Creature,
    creature_b: Creature,
    match_seed: u64,
    config: &CombatConfig,
) -> Result<CombatResult, CombatError> {
    let mut grid = Grid::new();
    let mut a = creature_a;
    let mut b = creature_b;
    if a.abilities.is_empty() {
        a.abilities = a.species.abilities().to_vec();
    }
    if b.abilities.is_empty() {
        b.abilities = b.species.abilities().to_vec();
    }
    grid.place(Side::A, a.position, a.size)?;
    grid.place(Side::B, b.position, b.size)?;

    debug!(
        target: "arena_core.engine",
        seed = match_seed,
        species_a = a.species.name(),
        species_b = b.species.name(),
        "match started"
    );

    let mut log: Vec<TickLog> = Vec::new();
    let mut attack_index: u32 = 0;

    for tick in 1..=config.max_ticks {
        let tick_seed = derive_tick_seed(match_seed, tick);
        let hp_a_start = a.current_hp;
        let hp_b_start = b.current_hp;
        let mut events: Vec<CombatEvent> = Vec::new();

        let init_a = calculate_initiative(a.stats.speed(), tick_seed, 0);
        let init_b = calculate_initiative(b.stats.speed(), tick_seed, 1);
        let turn_order = if init_a >= init_b {
            [Side::A, Side::B]
        } else {
            [Side::B, Side::A]
        };

        for side in turn_order {
            let (attacker, defender) = match side {
                Side::A => (&mut a, &mut b),
                Side::B => (&mut b, &mut a),
            };
            if attacker.current_hp <= 0 {
                continue;
            }

            if attacker.skip_next_attack {
                attacker.skip_next_attack = false;
                events.push(CombatEvent::SkipAttack { side });
                continue;
            }

            // Close distance before attacking.
            if !Grid::footprints_adjacent(
                attacker.position,
                attacker.size,
                defender.position,
                defender.size,
            ) {
                let target = grid.path_toward(
                    side,
                    attacker.position,
                    attacker.size,
                    attacker.movement_range,
                    defender.position,
                );
                if target != attacker.position {
                    grid.move_creature(
                        side,
                        attacker.position,
                        attacker.size,
                        target,
                        attacker.movement_range,
                    )?;
                    attacker.position = target;
                    events.push(CombatEvent::Move {
                        side,
                        to: (target.row, target.col),
                    });
                }
            }

            if Grid::footprints_adjacent(
                attacker.position,
                attacker.size,
                defender.position,
                defender.size,
            ) && defender.current_hp > 0
            {
                attack_index += 1;
                let hit_seed = derive_hit_seed(match_seed, tick, attack_index);
                let dodge_seed = hit_seed.wrapping_add(31337);

                let mut atk_mod = apply_attack_passives(attacker, defender, 1.0);
                atk_mod = apply_ability_attack_mods(attacker, atk_mod, hit_seed);

                let ignore_dodge = has_ignore_dodge_buff(attacker);
                let effective_dodge = get_effective_dodge(defender);

                let mut damage = calculate_physical_damage(
                    attacker,
                    defender,
                    hit_seed,
                    dodge_seed,
                    atk_mod,
                    ignore_dodge,
                    effective_dodge,
                );
                if damage > 0 {
                    damage = apply_defense_passives(defender, damage);
                }
                if damage > 0 {
                    damage = apply_ability_defense(defender, damage);
                }
                if attacker.has_rend && damage > 0 {
                    defender.active_effects.push(ActiveEffect {
                        name: "bleed",
                        remaining_ticks: 3,
                        damage_per_tick: 2,
                        heal_per_tick: 0,
                    });
                }

                defender.current_hp -= damage;
                events.push(CombatEvent::Attack {
                    side,
                    damage,
                    dodged: damage == 0,
                    hp_remaining: defender.current_hp,
                });
            }
        }

        // Buffs age after attacks and before the new proc rolls.
        tick_ability_buffs(&mut a);
        tick_ability_buffs(&mut b);

        for side in turn_order {
            let (creature, opponent) = match side {
                Side::A => (&mut a, &mut b),
                Side::B => (&mut b, &mut a),
            };
            if creature.current_hp > 0 {
                roll_ability_procs(
                    creature,
                    opponent,
                    match_seed,
                    tick,
                    side.index(),
                    side,
                    &mut events,
                );
            }
        }

        check_fury_trigger(&mut a);
        check_fury_trigger(&mut b);
        tick_fury(&mut a);
        tick_fury(&mut b);

        process_dot(&mut a, Side::A, &mut events);
        process_dot(&mut b, Side::B, &mut events);

        apply_ring_damage(&mut a, Side::A, tick, config, &mut events);
        apply_ring_damage(&mut b, Side::B, tick, config, &mut events);

        try_second_wind(&mut a, Side::A, &mut events);
        try_second_wind(&mut b, Side::B, &mut events);

        apply_regeneration(&mut a, Side::A, &mut events);
        apply_regeneration(&mut b, Side::B, &mut events);

        log.push(TickLog { tick, events });

        if a.current_hp <= 0 || b.current_hp <= 0 {
            let winner = resolve_death(&a, &b, hp_a_start, hp_b_start);
            debug!(
                target: "arena_core.engine",
                seed = match_seed,
                tick,
                winner = winner.map(|side| side.index()),
                "match ended by death"
            );
            return Ok(CombatResult {
                winner,
                ticks: tick,
                end_condition: EndCondition::Death,
                seed: match_seed,
                log,
                final_hp_a: a.current_hp,
                final_hp_b: b.current_hp,
            });
        }
    }

    let winner = resolve_timeout(&a, &b);
    debug!(
        target: "arena_core.engine",
        seed = match_seed,
        winner = winner.map(|side| side.index()),
        "match ended by timeout"
    );
    Ok(CombatResult {
        winner,
        ticks: config.max_ticks,
        end_condition: EndCondition::Timeout,
        seed: match_seed,
        log,
        final_hp_a: a.current_hp,
        final_hp_b: b.current_hp,
    })
}

/// Passive attack multipliers, applied before ability buffs.
///
/// Fury Protocol and an active Berserker Rage buff never stack: the
/// larger of the two wins.
fn apply_attack_passives(attacker: &mut Creature, defender: &Creature, mut atk_mod: f64) -> f64 {
    let mut fury_or_rage: f64 = 1.0;
    if attacker.passive == Passive::FuryProtocol && attacker.fury_active_ticks > 0 {
        fury_or_rage = 1.5;
    }
    for buff in &attacker.active_buffs {
        if buff.kind == AbilityKind::BerserkerRage {
            let scale = if buff.mimic_copy { 0.75 } else { 1.0 };
            fury_or_rage = fury_or_rage.max(1.0 + 0.60 * scale);
        }
    }
    if fury_or_rage > 1.0 {
        atk_mod *= fury_or_rage;
    }

    if attacker.passive == Passive::Charge && !attacker.charge_used {
        atk_mod *= 1.5;
        attacker.charge_used = true;
    }

    if attacker.passive == Passive::AmbushWiring
        && !attacker.charge_used
        && attacker.stats.speed() > defender.stats.speed()
    {
        atk_mod *= 2.0;
        attacker.charge_used = true;
    }

    if attacker.has_execute && (defender.current_hp as f64) < defender.max_hp as f64 * 0.25 {
        atk_mod *= 2.0;
    }

    atk_mod
}

/// Passive mitigation, applied before ability-granted blocks.
fn apply_defense_passives(defender: &mut Creature, mut damage: i32) -> i32 {
    if defender.passive == Passive::ThickHide && !defender.first_hit_taken {
        damage = (damage / 2).max(1);
        defender.first_hit_taken = true;
    }
    damage
}

fn process_dot(creature: &mut Creature, side: Side, events: &mut Vec<CombatEvent>) {
    if creature.active_effects.is_empty() {
        return;
    }
    let mut total = 0;
    creature.active_effects.retain_mut(|effect| {
        if effect.damage_per_tick > 0 {
            total += effect.damage_per_tick;
        }
        effect.remaining_ticks -= 1;
        effect.remaining_ticks > 0
    });
    if total > 0 {
        creature.current_hp -= total;
        events.push(CombatEvent::Dot {
            side,
            damage: total,
            hp_remaining: creature.current_hp,
        });
    }
}

fn apply_ring_damage(
    creature: &mut Creature,
    side: Side,
    tick: u32,
    config: &CombatConfig,
    events: &mut Vec<CombatEvent>,
) {
    if tick < config.ring_start_tick || !is_in_ring(creature, tick, config) {
        return;
    }
    let damage = ((creature.max_hp as f64 * 0.02).floor() as i32).max(1);
    creature.current_hp -= damage;
    events.push(CombatEvent::RingDamage {
        side,
        damage,
        hp_remaining: creature.current_hp,
    });
}

/// True when any footprint cell sits outside the shrinking safe zone.
fn is_in_ring(creature: &Creature, tick: u32, config: &CombatConfig) -> bool {
    if tick < config.ring_start_tick {
        return false;
    }
    let offset = tick - config.ring_start_tick;
    let (safe_min, safe_max) = if offset <= 4 { (1, 6) } else { (2, 5) };
    Grid::occupied_cells(creature.position, creature.size)
        .iter()
        .any(|cell| {
            cell.row < safe_min || cell.row > safe_max || cell.col < safe_min || cell.col > safe_max
        })
}

fn try_second_wind(creature: &mut Creature, side: Side, events: &mut Vec<CombatEvent>) {
    if creature.second_wind_available
        && !creature.second_wind_triggered
        && creature.current_hp > 0
        && (creature.current_hp as f64) < creature.max_hp as f64 * 0.3
    {
        let heal = (creature.max_hp as f64 * 0.25).floor() as i32;
        creature.current_hp = (creature.current_hp + heal).min(creature.max_hp);
        creature.second_wind_triggered = true;
        events.push(CombatEvent::SecondWind {
            side,
            heal,
            hp_remaining: creature.current_hp,
        });
    }
}

/// Passive regeneration hook. The healing rate is fixed at zero, so
/// this never fires; the pipeline slot and event exist for species
/// that may gain a rate later.
fn apply_regeneration(creature: &mut Creature, side: Side, events: &mut Vec<CombatEvent>) {
    if !creature.has_regeneration || creature.current_hp <= 0 {
        return;
    }
    let heal = 0;
    let new_hp = (creature.current_hp + heal).min(creature.max_hp);
    if new_hp != creature.current_hp {
        creature.current_hp = new_hp;
        events.push(CombatEvent::Regeneration {
            side,
            heal,
            hp_remaining: new_hp,
        });
    }
}

fn resolve_death(a: &Creature, b: &Creature, hp_a_start: i32, hp_b_start: i32) -> Option<Side> {
    if a.current_hp <= 0 && b.current_hp <= 0 {
        // Simultaneous deaths compare HP share going into the tick.
        let pct_a = hp_a_start as f64 / a.max_hp as f64;
        let pct_b = hp_b_start as f64 / b.max_hp as f64;
        if pct_a > pct_b {
            return Some(Side::A);
        }
        if pct_b > pct_a {
            return Some(Side::B);
        }
        return None;
    }
    if a.current_hp <= 0 {
        Some(Side::B)
    } else {
        Some(Side::A)
    }
}

fn resolve_timeout(a: &Creature, b: &Creature) -> Option<Side> {
    let pct_a = a.hp_fraction();
    let pct_b = b.hp_fraction();
    if pct_a > pct_b {
        Some(Side::A)
    } else if pct_b > pct_a {
        Some(Side::B)
    } else {
        None
    }
}
