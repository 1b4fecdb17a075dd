//! Match event schema.
//!
//! One tagged variant per event type. The tag strings and field names
//! are a compatibility surface consumed by log printers and external
//! tooling; they must not change shape.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::species::AbilityKind;

/// Identifies one of the two combatants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    A,
    B,
}

impl Side {
    /// Stable creature index used by the proc seed chain.
    pub fn index(self) -> u8 {
        match self {
            Side::A => 0,
            Side::B => 1,
        }
    }

    pub fn opponent(self) -> Side {
        match self {
            Side::A => Side::B,
            Side::B => Side::A,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::A => write!(f, "a"),
            Side::B => write!(f, "b"),
        }
    }
}

/// A single combat event within a tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CombatEvent {
    Move {
        side: Side,
        to: (i32, i32),
    },
    Attack {
        side: Side,
        damage: i32,
        dodged: bool,
        hp_remaining: i32,
    },
    SkipAttack {
        side: Side,
    },
    AbilityProc {
        side: Side,
        ability: AbilityKind,
        duration: u32,
    },
    AbilityResisted {
        side: Side,
        ability: AbilityKind,
    },
    TrickReflected {
        side: Side,
        ability: AbilityKind,
    },
    Dot {
        side: Side,
        damage: i32,
        hp_remaining: i32,
    },
    RingDamage {
        side: Side,
        damage: i32,
        hp_remaining: i32,
    },
    SecondWind {
        side: Side,
        heal: i32,
        hp_remaining: i32,
    },
    Regeneration {
        side: Side,
        heal: i32,
        hp_remaining: i32,
    },
}

/// All events recorded during one tick, in resolution order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TickLog {
    pub tick: u32,
    pub events: Vec<CombatEvent>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attack_event_wire_format() {
        let event = CombatEvent::Attack {
            side: Side::B,
            damage: 7,
            dodged: false,
            hp_remaining: 73,
        };
        assert_eq!(
            serde_json::to_string(&event).unwrap(),
            r#"{"type":"attack","side":"b","damage":7,"dodged":false,"hp_remaining":73}"#
        );
    }

    #[test]
    fn move_event_serializes_position_as_pair() {
        let event = CombatEvent::Move {
            side: Side::B,
            to: (4, 2),
        };
        assert_eq!(
            serde_json::to_string(&event).unwrap(),
            r#"{"type":"move","side":"b","to":[4,2]}"#
        );
    }

    #[test]
    fn ability_events_use_legacy_kind_names() {
        let proc = CombatEvent::AbilityProc {
            side: Side::A,
            ability: AbilityKind::ThickHide,
            duration: 1,
        };
        assert_eq!(
            serde_json::to_string(&proc).unwrap(),
            r#"{"type":"ability_proc","side":"a","ability":"thick_hide_ability","duration":1}"#
        );

        let resisted = CombatEvent::AbilityResisted {
            side: Side::A,
            ability: AbilityKind::Rend,
        };
        assert_eq!(
            serde_json::to_string(&resisted).unwrap(),
            r#"{"type":"ability_resisted","side":"a","ability":"rend_ability"}"#
        );
    }

    #[test]
    fn events_round_trip() {
        let events = vec![
            CombatEvent::SkipAttack { side: Side::A },
            CombatEvent::RingDamage {
                side: Side::B,
                damage: 2,
                hp_remaining: 54,
            },
            CombatEvent::SecondWind {
                side: Side::A,
                heal: 20,
                hp_remaining: 43,
            },
            CombatEvent::Dot {
                side: Side::B,
                damage: 4,
                hp_remaining: 11,
            },
        ];
        let json = serde_json::to_string(&events).unwrap();
        let back: Vec<CombatEvent> = serde_json::from_str(&json).unwrap();
        assert_eq!(events, back);
    }
}
