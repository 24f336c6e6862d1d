//! Dice rolls on the simulation RNG

use rand::Rng;

/// Roll one die with `sides` faces, uniform in `1..=sides`
///
/// A zero-sided die always rolls 0.
pub fn roll<R: Rng + ?Sized>(rng: &mut R, sides: u32) -> u32 {
    if sides == 0 {
        return 0;
    }
    rng.gen_range(1..=sides)
}

/// Percentile roll used for to-hit checks
pub fn d100<R: Rng + ?Sized>(rng: &mut R) -> u32 {
    roll(rng, 100)
}
