pub mod abilities;
pub mod config;
pub mod creature;
pub mod engine;
pub mod event;
pub mod grid;
pub mod seed;
pub mod species;

pub use config::CombatConfig;
pub use creature::{AbilityBuff, ActiveEffect, Build, BuildError, Creature, StatBlock};
pub use engine::{run_combat, CombatError, CombatResult, EndCondition};
pub use event::{CombatEvent, Side, TickLog};
pub use grid::{Grid, GridError, Position, Size};
pub use species::{Ability, AbilityKind, Passive, Species};
