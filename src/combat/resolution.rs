//! Attack resolution
//!
//! A d100 decides whether an attack connects: 95 and up always hits, below
//! 5 always misses, anything between hits when `roll + attack_bonus` reaches
//! the defender's evasion. Each damage term then rolls its die, adds its bonus
//! and is reduced by the defender's resistance.
//!
//! Outcomes keep every roll so a combat log can be replayed exactly.

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::combat::attack::{Attack, DamageType};
use crate::combat::dice;
use crate::combat::estimate::best_attack;
use crate::core::error::Result;
use crate::core::types::ActorId;
use crate::entity::actor_class::ActorClass;
use crate::simulation::events::SimulationEvent;
use crate::world::state::World;

/// Rolls at or above this always hit
pub const CRITICAL_ROLL: u32 = 95;
/// Rolls below this always miss
pub const FUMBLE_BELOW: u32 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HitKind {
    Critical,
    Hit,
    Miss,
}

impl HitKind {
    pub fn connects(&self) -> bool {
        !matches!(self, HitKind::Miss)
    }
}

/// One rolled damage term
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DamageRoll {
    pub damage_type: DamageType,
    pub sides: u32,
    pub rolled: u32,
    pub bonus: i32,
    /// Defender resistance applied, already clamped
    pub resistance: f32,
    pub dealt: f32,
}

impl DamageRoll {
    fn new(damage_type: DamageType, sides: u32, rolled: u32, bonus: i32, resistance: f32) -> Self {
        let mut term = Self {
            damage_type,
            sides,
            rolled,
            bonus,
            resistance,
            dealt: 0.0,
        };
        term.dealt = term.replay();
        term
    }

    /// Recompute the dealt damage from the recorded roll
    pub fn replay(&self) -> f32 {
        let base = (self.rolled as i64 + self.bonus as i64).max(0) as f32;
        base * (1.0 - self.resistance)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttackOutcome {
    pub attack: String,
    pub roll: u32,
    pub kind: HitKind,
    pub terms: Vec<DamageRoll>,
    pub total: f32,
}

impl AttackOutcome {
    /// Total damage recomputed from the logged rolls
    pub fn replay_total(&self) -> f32 {
        self.terms.iter().map(|t| t.replay()).sum()
    }
}

/// Classify a d100 roll against a defender's evasion
pub fn classify_roll(roll: u32, attack_bonus: i32, evasion: i32) -> HitKind {
    if roll >= CRITICAL_ROLL {
        HitKind::Critical
    } else if roll < FUMBLE_BELOW {
        HitKind::Miss
    } else if roll as i32 + attack_bonus >= evasion {
        HitKind::Hit
    } else {
        HitKind::Miss
    }
}

/// Roll one attack against a defender class
///
/// Misses draw only the to-hit roll.
pub fn resolve_attack<R: Rng + ?Sized>(attack: &Attack, defender: &ActorClass, rng: &mut R) -> AttackOutcome {
    let roll = dice::d100(rng);
    let kind = classify_roll(roll, attack.attack_bonus, defender.evasion);

    let mut terms = Vec::new();
    if kind.connects() {
        for damage in &attack.damage {
            let rolled = dice::roll(rng, damage.dice);
            terms.push(DamageRoll::new(
                damage.damage_type,
                damage.dice,
                rolled,
                damage.bonus,
                defender.resistance(damage.damage_type),
            ));
        }
    }
    let total = terms.iter().map(|t| t.dealt).sum();

    AttackOutcome {
        attack: attack.name.clone(),
        roll,
        kind,
        terms,
        total,
    }
}

/// Resolve `attack` against `target` and apply the damage
///
/// `attacker` is `None` for terrain and food hazards.
pub fn perform_attack<R: Rng + ?Sized>(
    world: &mut World,
    attacker: Option<ActorId>,
    target: ActorId,
    attack: &Attack,
    rng: &mut R,
) -> Result<SimulationEvent> {
    let target_actor = world.actor(target)?;
    let outcome = resolve_attack(attack, world.class_of(target_actor), rng);
    let tick = world.current_tick;

    let victim = world.actor_mut(target)?;
    let killed = victim.take_damage(outcome.total);
    let hitpoints_after = victim.hitpoints;

    debug!(
        ?attacker,
        ?target,
        attack = %outcome.attack,
        roll = outcome.roll,
        kind = ?outcome.kind,
        damage = outcome.total,
        hitpoints_after,
        "attack resolved"
    );

    Ok(SimulationEvent::Attack {
        tick,
        attacker,
        target,
        outcome,
        hitpoints_after,
        killed,
    })
}

/// Strike with the attacker's best attack against this target, if it has any
pub fn perform_best_attack<R: Rng + ?Sized>(
    world: &mut World,
    attacker: ActorId,
    target: ActorId,
    rng: &mut R,
) -> Result<Option<SimulationEvent>> {
    let attacker_class = world.class_of(world.actor(attacker)?);
    let target_class = world.class_of(world.actor(target)?);
    let Some(attack) = best_attack(attacker_class, target_class).cloned() else {
        return Ok(None);
    };
    perform_attack(world, Some(attacker), target, &attack, rng).map(Some)
}

/// One round of melee: the attacker strikes and the defender hits back
///
/// The exchange is simultaneous, so a defender felled by the first blow still
/// retaliates. A defender already dead before the round does nothing.
pub fn exchange_blows<R: Rng + ?Sized>(
    world: &mut World,
    attacker: ActorId,
    defender: ActorId,
    rng: &mut R,
) -> Result<Vec<SimulationEvent>> {
    let mut events = Vec::new();
    if !world.actor(defender)?.is_alive() {
        return Ok(events);
    }
    events.extend(perform_best_attack(world, attacker, defender, rng)?);
    events.extend(perform_best_attack(world, defender, attacker, rng)?);
    Ok(events)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::SimulationConfig;
    use crate::core::types::TilePos;
    use crate::world::terrain::TerrainProfile;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_roll_95_always_hits() {
        assert_eq!(classify_roll(95, -1000, 1000), HitKind::Critical);
        assert_eq!(classify_roll(100, 0, 500), HitKind::Critical);
    }

    #[test]
    fn test_roll_4_always_misses() {
        assert_eq!(classify_roll(4, 1000, 0), HitKind::Miss);
        assert_eq!(classify_roll(1, 1000, -50), HitKind::Miss);
    }

    #[test]
    fn test_mid_rolls_compare_against_evasion() {
        assert_eq!(classify_roll(5, 0, 5), HitKind::Hit);
        assert_eq!(classify_roll(40, 10, 50), HitKind::Hit);
        assert_eq!(classify_roll(39, 10, 50), HitKind::Miss);
        assert_eq!(classify_roll(94, 0, 95), HitKind::Miss);
    }

    #[test]
    fn test_resolve_records_replayable_terms() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let mut defender = ActorClass::new("target");
        defender.evasion = 0;
        defender.resistances.insert(DamageType::Fire, 0.5);
        let attack = Attack::new("flame claw", 0, DamageType::Slashing, 6, 1).with_damage(DamageType::Fire, 4, 0);

        for _ in 0..50 {
            let outcome = resolve_attack(&attack, &defender, &mut rng);
            if outcome.kind.connects() {
                assert_eq!(outcome.terms.len(), 2);
                assert!((1..=6).contains(&outcome.terms[0].rolled));
                assert_eq!(outcome.terms[1].resistance, 0.5);
            } else {
                assert!(outcome.terms.is_empty());
                assert_eq!(outcome.total, 0.0);
            }
            assert!((outcome.total - outcome.replay_total()).abs() < 1e-5);
        }
    }

    #[test]
    fn test_full_resistance_blocks_damage() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut golem = ActorClass::new("golem");
        golem.evasion = 0;
        golem.resistances.insert(DamageType::Crushing, 3.0);
        let punch = Attack::new("punch", 50, DamageType::Crushing, 8, 4);
        for _ in 0..20 {
            assert_eq!(resolve_attack(&punch, &golem, &mut rng).total, 0.0);
        }
    }

    fn duel_world() -> (World, ActorId, ActorId) {
        let mut world = World::new(3, 1, TerrainProfile::open("arena"), SimulationConfig::default()).unwrap();
        let mut brawler = ActorClass::new("brawler");
        brawler.max_hitpoints = 20.0;
        brawler.evasion = 0;
        brawler.attacks.push(Attack::new("jab", 0, DamageType::Crushing, 4, 0));
        brawler.attacks.push(Attack::new("haymaker", 0, DamageType::Crushing, 10, 2));
        let class = world.add_actor_class(brawler).unwrap();
        let a = world.spawn_actor(class, TilePos::new(0, 0)).unwrap();
        let b = world.spawn_actor(class, TilePos::new(1, 0)).unwrap();
        (world, a, b)
    }

    #[test]
    fn test_perform_best_attack_uses_strongest() {
        let (mut world, a, b) = duel_world();
        let mut rng = ChaCha8Rng::seed_from_u64(8);
        let event = perform_best_attack(&mut world, a, b, &mut rng).unwrap().unwrap();
        match event {
            SimulationEvent::Attack {
                attacker,
                target,
                outcome,
                hitpoints_after,
                ..
            } => {
                assert_eq!(attacker, Some(a));
                assert_eq!(target, b);
                assert_eq!(outcome.attack, "haymaker");
                assert!((hitpoints_after - (20.0 - outcome.total).max(0.0)).abs() < 1e-5);
            }
            other => panic!("unexpected event {other:?}"),
        }
    }

    #[test]
    fn test_exchange_is_mutual_until_death() {
        let (mut world, a, b) = duel_world();
        let mut rng = ChaCha8Rng::seed_from_u64(21);

        let events = exchange_blows(&mut world, a, b, &mut rng).unwrap();
        assert_eq!(events.len(), 2);

        world.actor_mut(b).unwrap().hitpoints = 0.0;
        let events = exchange_blows(&mut world, a, b, &mut rng).unwrap();
        assert!(events.is_empty());
    }
}
