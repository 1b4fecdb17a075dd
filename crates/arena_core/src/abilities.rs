//! Ability procs, buff effects, and the query surface used by damage
//! resolution.

use crate::creature::{AbilityBuff, ActiveEffect, Creature};
use crate::event::{CombatEvent, Side};
use crate::seed::{derive_proc_seed, seeded_bool, seeded_random};
use crate::species::{ability_definition, Ability, AbilityKind};

/// Kinds Mimic refuses to copy.
pub const MIMIC_BLOCKED: [AbilityKind; 3] = [
    AbilityKind::IronWill,
    AbilityKind::LastStand,
    AbilityKind::Mimic,
];

const VENOM_MAX_STACKS: usize = 3;

pub fn can_mimic(kind: AbilityKind) -> bool {
    !MIMIC_BLOCKED.contains(&kind)
}

/// Rolls proc checks for every ability slot of one creature.
///
/// Slot order is fixed. A successful roll runs the opponent's resist
/// check, then the Trick reflection check, then applies the effect.
/// The last kind applied this tick is recorded for Mimic.
pub fn roll_ability_procs(
    creature: &mut Creature,
    opponent: &mut Creature,
    match_seed: u64,
    tick: u32,
    creature_index: u8,
    side: Side,
    events: &mut Vec<CombatEvent>,
) {
    let mut last_procced = None;
    for ability_index in 0..creature.abilities.len() {
        let ability = creature.abilities[ability_index];

        if ability.single_charge {
            if ability.kind == AbilityKind::IronWill && creature.iron_will_used {
                continue;
            }
            if ability.kind == AbilityKind::LastStand && creature.last_stand_used {
                continue;
            }
        }

        // Last Stand is a desperation ability: HP must be under 15%.
        if ability.kind == AbilityKind::LastStand
            && creature.current_hp as f64 >= creature.max_hp as f64 * 0.15
        {
            continue;
        }

        let proc_seed = derive_proc_seed(match_seed, tick, creature_index, ability_index as u8);
        let proc_chance = ability.proc_chance + creature.stats.willpower() as f64 * 0.0008;
        if !seeded_bool(proc_seed, proc_chance) {
            continue;
        }

        let resist_seed = proc_seed.wrapping_add(7);
        let resist_chance = (opponent.stats.willpower() as f64 * 0.033).min(0.60);
        if seeded_bool(resist_seed, resist_chance) {
            events.push(CombatEvent::AbilityResisted {
                side,
                ability: ability.kind,
            });
            continue;
        }

        // An active Trick buff on the opponent eats the proc instead.
        if let Some(index) = opponent
            .active_buffs
            .iter()
            .position(|buff| buff.kind == AbilityKind::Trick)
        {
            opponent.active_buffs.remove(index);
            events.push(CombatEvent::TrickReflected {
                side,
                ability: ability.kind,
            });
            continue;
        }

        apply_ability_effect(creature, opponent, &ability, side);
        events.push(CombatEvent::AbilityProc {
            side,
            ability: ability.kind,
            duration: ability.duration,
        });
        last_procced = Some(ability.kind);
    }

    if let Some(kind) = last_procced {
        creature.last_ability_procced = Some(kind);
    }
}

/// Applies one successful proc's effect.
fn apply_ability_effect(
    creature: &mut Creature,
    opponent: &mut Creature,
    ability: &Ability,
    side: Side,
) {
    if ability.single_charge {
        match ability.kind {
            AbilityKind::IronWill => creature.iron_will_used = true,
            AbilityKind::LastStand => creature.last_stand_used = true,
            _ => {}
        }
    }

    match ability.kind {
        // Timed self-buffs.
        AbilityKind::BerserkerRage
        | AbilityKind::ThickHide
        | AbilityKind::PackHowl
        | AbilityKind::KeenEye
        | AbilityKind::Evasion => {
            creature
                .active_buffs
                .push(AbilityBuff::new(ability.kind, ability.duration, side));
        }

        // Next-hit buffs, live for one tick.
        AbilityKind::Pounce
        | AbilityKind::ChaosStrike
        | AbilityKind::Gore
        | AbilityKind::Stampede
        | AbilityKind::LastStand
        | AbilityKind::Dive => {
            creature
                .active_buffs
                .push(AbilityBuff::new(ability.kind, 1, side));
            if matches!(ability.kind, AbilityKind::Stampede | AbilityKind::Pounce) {
                opponent.skip_next_attack = true;
            }
        }

        AbilityKind::Coil | AbilityKind::Trick | AbilityKind::Exoskeleton => {
            creature
                .active_buffs
                .push(AbilityBuff::new(ability.kind, 1, side));
        }

        AbilityKind::IronWill => {
            let heal = (creature.max_hp as f64 * 0.12).floor() as i32;
            creature.current_hp = (creature.current_hp + heal).min(creature.max_hp);
        }

        AbilityKind::Hamstring => {
            opponent
                .active_buffs
                .push(AbilityBuff::new(ability.kind, ability.duration, side));
        }

        AbilityKind::Rend => {
            let damage = ((creature.max_hp as f64 * 0.05).floor() as i32).max(1);
            opponent.active_effects.push(ActiveEffect {
                name: "ability_rend",
                remaining_ticks: 3,
                damage_per_tick: damage,
                heal_per_tick: 0,
            });
        }

        AbilityKind::Venom => {
            let stacks = opponent
                .active_effects
                .iter()
                .filter(|effect| effect.name == "ability_venom")
                .count();
            if stacks < VENOM_MAX_STACKS {
                let damage = ((opponent.max_hp as f64 * 0.03).floor() as i32).max(1);
                opponent.active_effects.push(ActiveEffect {
                    name: "ability_venom",
                    remaining_ticks: 3,
                    damage_per_tick: damage,
                    heal_per_tick: 0,
                });
            }
        }

        AbilityKind::Sting => {
            opponent.skip_next_attack = true;
        }

        AbilityKind::Mimic => {
            apply_mimic(creature, opponent, side);
        }

        // Remaining kinds carry no mechanical effect; the proc is
        // still logged and recorded for Mimic.
        _ => {}
    }
}

/// Copies the opponent's last procced ability as a reduced-strength
/// buff on the caster.
fn apply_mimic(creature: &mut Creature, opponent: &Creature, side: Side) {
    let Some(target) = opponent.last_ability_procced else {
        return;
    };
    if !can_mimic(target) {
        return;
    }
    let Some(original) = ability_definition(target) else {
        return;
    };
    creature.active_buffs.push(AbilityBuff {
        kind: target,
        remaining_ticks: original.duration.max(1),
        source_side: side,
        mimic_copy: true,
    });
}

/// Folds active ability buffs into an attack multiplier.
///
/// Chaos Strike replaces the multiplier outright; everything else
/// compounds. Mimic copies scale toward 1.0 at 75% strength.
pub fn apply_ability_attack_mods(attacker: &Creature, mut atk_mod: f64, hit_seed: u32) -> f64 {
    for buff in &attacker.active_buffs {
        let scale = if buff.mimic_copy { 0.75 } else { 1.0 };
        match buff.kind {
            AbilityKind::PackHowl => atk_mod *= 1.0 + 0.30 * scale,
            AbilityKind::Pounce => atk_mod *= 1.0 + 0.70 * scale,
            AbilityKind::Stampede => atk_mod *= 1.0 + 0.50 * scale,
            AbilityKind::LastStand => {
                if (attacker.current_hp as f64) < attacker.max_hp as f64 * 0.15 {
                    atk_mod *= 1.0 + 1.0 * scale;
                }
            }
            AbilityKind::Gore => atk_mod *= 0.60,
            AbilityKind::ChaosStrike => {
                let mut chaos = chaos_strike_mod(hit_seed.wrapping_add(777));
                if buff.mimic_copy {
                    chaos = 1.0 + (chaos - 1.0) * 0.75;
                }
                atk_mod = chaos;
            }
            AbilityKind::Dive => atk_mod *= 1.0 + 1.0 * scale,
            _ => {}
        }
    }
    atk_mod
}

pub fn chaos_strike_mod(seed: u32) -> f64 {
    seeded_random(seed, 0.8, 2.2)
}

/// True when any active buff lets attacks bypass dodge.
pub fn has_ignore_dodge_buff(creature: &Creature) -> bool {
    creature.active_buffs.iter().any(|buff| {
        matches!(
            buff.kind,
            AbilityKind::Pounce | AbilityKind::Gore | AbilityKind::Dive
        )
    })
}

/// Effective dodge probability under current buffs and debuffs.
///
/// Coil is a guaranteed-dodge override. Additive bonuses apply before
/// the multiplicative Berserker Rage and Hamstring penalties.
pub fn get_effective_dodge(creature: &Creature) -> f64 {
    if creature
        .active_buffs
        .iter()
        .any(|buff| buff.kind == AbilityKind::Coil)
    {
        return 1.0;
    }

    let mut dodge = creature.dodge_chance;

    for buff in &creature.active_buffs {
        let scale = if buff.mimic_copy { 0.75 } else { 1.0 };
        match buff.kind {
            AbilityKind::KeenEye => dodge += 0.20 * scale,
            AbilityKind::Evasion => dodge += 0.50 * scale,
            _ => {}
        }
    }
    for buff in &creature.active_buffs {
        if buff.kind == AbilityKind::BerserkerRage {
            let scale = if buff.mimic_copy { 0.75 } else { 1.0 };
            dodge *= 1.0 - 0.40 * scale;
        }
    }
    for buff in &creature.active_buffs {
        if buff.kind == AbilityKind::Hamstring {
            let scale = if buff.mimic_copy { 0.75 } else { 1.0 };
            dodge *= 1.0 - 0.55 * scale;
            dodge -= 0.10 * scale;
        }
    }

    dodge.max(0.0).min(1.0)
}

/// Consumable defensive buffs: Thick Hide blocks a hit outright,
/// Exoskeleton absorbs up to 15% of max HP.
pub fn apply_ability_defense(defender: &mut Creature, damage: i32) -> i32 {
    if defender
        .active_buffs
        .iter()
        .any(|buff| buff.kind == AbilityKind::ThickHide)
    {
        defender
            .active_buffs
            .retain(|buff| buff.kind != AbilityKind::ThickHide);
        return 0;
    }

    if defender
        .active_buffs
        .iter()
        .any(|buff| buff.kind == AbilityKind::Exoskeleton)
    {
        defender
            .active_buffs
            .retain(|buff| buff.kind != AbilityKind::Exoskeleton);
        let block = (defender.max_hp as f64 * 0.15).floor() as i32;
        return (damage - block).max(0);
    }

    damage
}

/// Arms the Fury Protocol window once HP drops under half.
pub fn check_fury_trigger(creature: &mut Creature) {
    if creature.passive != crate::species::Passive::FuryProtocol {
        return;
    }
    if creature.fury_triggered {
        return;
    }
    if creature.current_hp as f64 >= creature.max_hp as f64 * 0.5 {
        return;
    }
    creature.fury_triggered = true;
    creature.fury_active_ticks = 3;
}

pub fn tick_fury(creature: &mut Creature) {
    if creature.fury_active_ticks > 0 {
        creature.fury_active_ticks -= 1;
    }
}

/// Ages every buff by one tick and drops the expired ones.
pub fn tick_ability_buffs(creature: &mut Creature) {
    creature.active_buffs.retain_mut(|buff| {
        buff.remaining_ticks -= 1;
        buff.remaining_ticks > 0
    });
}
