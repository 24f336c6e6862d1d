//! Expected damage and risk estimates
//!
//! These are averages, not rolls: they drive memory valuation and
//! risk-aware movement, never actual combat. Everything here depends only on
//! class profiles, so results are memoized on the class being asked.

use crate::combat::attack::Attack;
use crate::entity::actor_class::{memoized, ActorClass};
use crate::world::resource::ResourceClass;

/// Risk assigned when the opponent can't be hurt at all
pub const MAX_RISK: f32 = 10.0;

/// Every d100 roll of 95+ hits and every roll below 5 misses
pub const MIN_HIT_CHANCE: f32 = 0.05;
pub const MAX_HIT_CHANCE: f32 = 0.95;

impl ActorClass {
    /// Chance that `attack` lands on this class
    pub fn hit_chance(&self, attack: &Attack) -> f32 {
        let reach = 100.0 + attack.attack_bonus as f32;
        if reach <= 0.0 {
            return MIN_HIT_CHANCE;
        }
        (1.0 - self.evasion as f32 / reach).clamp(MIN_HIT_CHANCE, MAX_HIT_CHANCE)
    }

    /// Average damage `attack` deals to this class, hit chance included
    pub fn attack_expected_damage(&self, attack: &Attack) -> f32 {
        memoized(&self.caches.attack_damage, attack, || {
            let hit = self.hit_chance(attack);
            attack
                .damage
                .iter()
                .map(|d| hit * d.average().max(0.0) * (1.0 - self.resistance(d.damage_type)))
                .sum()
        })
    }

    /// Best expected damage `other` can deal to this class
    pub fn expected_damage_from(&self, other: &ActorClass) -> f32 {
        memoized(&self.caches.class_damage, &other.id, || {
            other
                .attacks
                .iter()
                .map(|a| self.attack_expected_damage(a))
                .fold(0.0, f32::max)
        })
    }

    /// Hits needed to kill `other` relative to hits needed to be killed by it
    ///
    /// 0 when `other` can't hurt us, `MAX_RISK` when we can't hurt it.
    pub fn class_risk(&self, other: &ActorClass) -> f32 {
        memoized(&self.caches.class_risk, &other.id, || {
            let taken = self.expected_damage_from(other);
            if taken <= 0.0 {
                return 0.0;
            }
            let dealt = other.expected_damage_from(self);
            if dealt <= 0.0 || self.max_hitpoints <= 0.0 {
                return MAX_RISK;
            }
            let hits_to_kill = other.max_hitpoints / dealt;
            let hits_to_die = self.max_hitpoints / taken;
            hits_to_kill / hits_to_die
        })
    }

    /// Summed hazard damage as a fraction of max hitpoints
    pub fn hazard_risk(&self, hazards: &[Attack]) -> f32 {
        if hazards.is_empty() || self.max_hitpoints <= 0.0 {
            return 0.0;
        }
        let total: f32 = hazards.iter().map(|h| self.attack_expected_damage(h)).sum();
        total / self.max_hitpoints
    }

    pub fn resource_risk(&self, resource: &ResourceClass) -> f32 {
        memoized(&self.caches.resource_risk, &resource.id, || self.hazard_risk(&resource.hazards))
    }
}

/// Attack from `attacker`'s list with the highest expected damage on `defender`
///
/// Ties keep the earlier attack.
pub fn best_attack<'a>(attacker: &'a ActorClass, defender: &ActorClass) -> Option<&'a Attack> {
    let mut best: Option<(&Attack, f32)> = None;
    for attack in &attacker.attacks {
        let expected = defender.attack_expected_damage(attack);
        match best {
            Some((_, best_damage)) if expected <= best_damage => {}
            _ => best = Some((attack, expected)),
        }
    }
    best.map(|(attack, _)| attack)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::attack::DamageType;
    use crate::core::types::{ActorClassId, ResourceClassId};

    fn fighter(id: u32, hp: f32, evasion: i32, attacks: Vec<Attack>) -> ActorClass {
        let mut class = ActorClass::new(format!("fighter{id}"));
        class.id = ActorClassId(id);
        class.max_hitpoints = hp;
        class.evasion = evasion;
        class.attacks = attacks;
        class
    }

    #[test]
    fn test_hit_chance_clamped() {
        let nimble = fighter(0, 10.0, 200, vec![]);
        let clumsy = fighter(1, 10.0, 0, vec![]);
        let poke = Attack::new("poke", 0, DamageType::Piercing, 4, 0);
        assert_eq!(nimble.hit_chance(&poke), MIN_HIT_CHANCE);
        assert_eq!(clumsy.hit_chance(&poke), MAX_HIT_CHANCE);

        let hopeless = Attack::new("hopeless", -150, DamageType::Piercing, 4, 0);
        assert_eq!(clumsy.hit_chance(&hopeless), MIN_HIT_CHANCE);
    }

    #[test]
    fn test_expected_damage_formula() {
        // hit = 1 - 50/100 = 0.5; average d6 = 3.5; half resisted
        let mut target = fighter(0, 10.0, 50, vec![]);
        target.resistances.insert(DamageType::Slashing, 0.5);
        let claw = Attack::new("claw", 0, DamageType::Slashing, 6, 0);
        assert!((target.attack_expected_damage(&claw) - 0.875).abs() < 1e-6);
    }

    #[test]
    fn test_expected_damage_from_picks_best() {
        let weak = Attack::new("nibble", 0, DamageType::Piercing, 2, 0);
        let strong = Attack::new("maul", 0, DamageType::Crushing, 10, 2);
        let bear = fighter(1, 30.0, 20, vec![weak.clone(), strong.clone()]);
        let deer = fighter(0, 15.0, 20, vec![]);
        let expected = deer.attack_expected_damage(&strong);
        assert_eq!(deer.expected_damage_from(&bear), expected);
        assert_eq!(best_attack(&bear, &deer), Some(&strong));
    }

    #[test]
    fn test_best_attack_first_of_ties() {
        let a = Attack::new("left claw", 0, DamageType::Slashing, 6, 0);
        let b = Attack::new("right claw", 0, DamageType::Slashing, 6, 0);
        let cat = fighter(1, 10.0, 10, vec![a.clone(), b]);
        let mouse = fighter(0, 2.0, 10, vec![]);
        assert_eq!(best_attack(&cat, &mouse).map(|x| x.name.as_str()), Some("left claw"));
        assert!(best_attack(&mouse, &cat).is_none());
    }

    #[test]
    fn test_class_risk_edges() {
        let bite = Attack::new("bite", 0, DamageType::Piercing, 6, 0);
        let harmless = fighter(0, 10.0, 10, vec![]);
        let biter = fighter(1, 10.0, 10, vec![bite]);

        // A harmless opponent poses no risk
        assert_eq!(biter.class_risk(&harmless), 0.0);
        // An opponent we can't hurt is maximal risk
        assert_eq!(harmless.class_risk(&biter), MAX_RISK);
    }

    #[test]
    fn test_symmetric_risk_is_one() {
        let bite = Attack::new("bite", 0, DamageType::Piercing, 6, 0);
        let a = fighter(0, 20.0, 10, vec![bite.clone()]);
        let b = fighter(1, 20.0, 10, vec![bite]);
        assert!((a.class_risk(&b) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_class_risk_against_own_class() {
        let bite = Attack::new("bite", 0, DamageType::Piercing, 6, 0);
        let wolf = fighter(0, 20.0, 10, vec![bite]);
        assert!((wolf.class_risk(&wolf) - 1.0).abs() < 1e-6);
        // Cached value is reused
        assert!((wolf.class_risk(&wolf) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_stronger_opponent_is_riskier() {
        let bite = Attack::new("bite", 0, DamageType::Piercing, 6, 0);
        let big_bite = Attack::new("big bite", 0, DamageType::Piercing, 12, 4);
        let fox = fighter(0, 10.0, 10, vec![bite]);
        let bear = fighter(1, 40.0, 10, vec![big_bite]);
        assert!(fox.class_risk(&bear) > 1.0);
        assert!(bear.class_risk(&fox) < 1.0);
    }

    #[test]
    fn test_resource_risk() {
        let eater = fighter(0, 10.0, 0, vec![]);
        let mut berries = ResourceClass::new("nightshade", 20.0);
        berries.id = ResourceClassId(1);
        assert_eq!(eater.resource_risk(&berries), 0.0);

        let mut thorny = ResourceClass::new("bramble", 20.0);
        thorny.id = ResourceClassId(2);
        thorny.hazards.push(Attack::new("thorns", 0, DamageType::Piercing, 3, 0));
        // hit 0.95 × average 2
        assert!((eater.resource_risk(&thorny) - 0.19).abs() < 1e-5);
    }
}
