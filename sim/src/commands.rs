//! Turning kick, pass and shot intents into launch velocities.

use crate::constants::{
    KICK_LIFT_FACTOR, KICK_MIN_LIFT, PASS_POWER_MAX, PASS_POWER_MIN, PASS_REFERENCE_DISTANCE,
    SHOT_MAX_JITTER,
};
use crate::vec3::{add, normalize, scale, vec3, Vec3};
use rand::Rng;

/// A resolved kick: unit direction, requested power and launch velocity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Kick {
    pub direction: Vec3,
    pub power: f64,
    pub velocity: Vec3,
}

/// Direction times power, plus an upward bias so every kick arcs.
/// None for a zero-length direction or a non-finite/negative power.
pub fn kick_velocity(direction: Vec3, power: f64) -> Option<Kick> {
    if !direction.is_finite() || !power.is_finite() || power < 0.0 {
        return None;
    }
    let direction = normalize(direction);
    if direction == Vec3::ZERO {
        return None;
    }
    let mut velocity = scale(direction, power);
    velocity.z += KICK_MIN_LIFT.max(power * KICK_LIFT_FACTOR);
    Some(Kick {
        direction,
        power,
        velocity,
    })
}

/// Pass weight: power scaled by distance, kept within the pass range.
pub fn pass_power(power: f64, distance: f64) -> f64 {
    (power * (distance / PASS_REFERENCE_DISTANCE)).clamp(PASS_POWER_MIN, PASS_POWER_MAX)
}

/// Jitter radius for a shot. Harder shots are less accurate.
pub fn shot_accuracy(power: f64, max_speed: f64) -> f64 {
    if max_speed <= 0.0 || !power.is_finite() {
        return 0.0;
    }
    (power / max_speed).clamp(0.0, 1.0) * SHOT_MAX_JITTER
}

/// Offset both horizontal axes by up to `accuracy` and renormalize.
/// Zero accuracy leaves the direction alone and draws nothing.
pub fn jitter_direction(direction: Vec3, accuracy: f64, rng: &mut impl Rng) -> Vec3 {
    if accuracy <= 0.0 {
        return direction;
    }
    let offset = vec3(
        rng.gen_range(-accuracy..=accuracy),
        rng.gen_range(-accuracy..=accuracy),
        0.0,
    );
    normalize(add(direction, offset))
}
