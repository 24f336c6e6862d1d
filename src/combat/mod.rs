//! Combat: attack definitions, dice, expected-damage estimates and resolution

pub mod attack;
pub mod dice;
pub mod estimate;
pub mod resolution;

pub use attack::{Attack, Damage, DamageType};
pub use estimate::{best_attack, MAX_RISK};
pub use resolution::{
    exchange_blows, perform_attack, perform_best_attack, resolve_attack, AttackOutcome, DamageRoll, HitKind,
};
