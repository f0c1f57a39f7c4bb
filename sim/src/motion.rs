//! Ball velocity rules: ground friction, bounce response, speed clamp and
//! the airborne/rolling classification.

use crate::constants::{
    AIRBORNE_VERTICAL_SPEED, BOUNCE_DAMPING_MAX, BOUNCE_DAMPING_MIN, FRICTION_EPSILON,
    FRICTION_GRAVITY, ROLLING_SPEED,
};
use crate::vec3::{add, clamp_length, dot, horizontal, length, length_2d, normalize, reflect, scale, vec3, Vec3};

/// Decelerate the horizontal part of `velocity` by rolling friction.
/// Snaps to zero instead of reversing direction or leaving a crawl at or
/// below the friction epsilon. Vertical is untouched.
pub fn ground_friction(velocity: Vec3, rolling_friction: f64, dt: f64) -> Vec3 {
    let flat = horizontal(velocity);
    if length(flat) <= FRICTION_EPSILON {
        return velocity;
    }

    let decel = scale(normalize(flat), -rolling_friction * FRICTION_GRAVITY);
    let mut slowed = add(flat, scale(decel, dt));
    if dot(flat, slowed) < 0.0 || length(slowed) <= FRICTION_EPSILON {
        slowed = Vec3::ZERO;
    }
    vec3(slowed.x, slowed.y, velocity.z)
}

/// Reflect `velocity` about the unit surface normal and damp the result.
pub fn bounce(velocity: Vec3, normal: Vec3, bounce_damping: f64) -> Vec3 {
    let damping = bounce_damping.clamp(BOUNCE_DAMPING_MIN, BOUNCE_DAMPING_MAX);
    scale(reflect(velocity, normal), damping)
}

pub fn clamp_speed(velocity: Vec3, max_speed: f64) -> Vec3 {
    clamp_length(velocity, max_speed)
}

/// Returns (in_air, rolling).
pub fn classify(velocity: Vec3, grounded: bool) -> (bool, bool) {
    let in_air = velocity.z.abs() > AIRBORNE_VERTICAL_SPEED || !grounded;
    let rolling = !in_air && length_2d(velocity) > ROLLING_SPEED;
    (in_air, rolling)
}

/// Polled motion classification plus the per-frame accumulators.
#[derive(Debug, Clone, Default)]
pub struct MotionState {
    pub in_air: bool,
    pub rolling: bool,
    pub time_in_air: f64,
    pub time_on_ground: f64,
    pub previous_velocity: Vec3,
}

impl MotionState {
    /// Friction while on the ground and moving, then the speed clamp.
    pub fn integrate(&self, velocity: Vec3, rolling_friction: f64, max_speed: f64, dt: f64) -> Vec3 {
        let mut v = velocity;
        if !self.in_air && length(v) > FRICTION_EPSILON {
            v = ground_friction(v, rolling_friction, dt);
        }
        clamp_speed(v, max_speed)
    }

    /// Reclassify. Returns the new flags only when either one changed.
    pub fn poll(&mut self, velocity: Vec3, grounded: bool) -> Option<(bool, bool)> {
        let (in_air, rolling) = classify(velocity, grounded);
        if in_air == self.in_air && rolling == self.rolling {
            return None;
        }
        self.in_air = in_air;
        self.rolling = rolling;
        Some((in_air, rolling))
    }

    pub fn accumulate(&mut self, dt: f64, velocity: Vec3) {
        if self.in_air {
            self.time_in_air += dt;
            self.time_on_ground = 0.0;
        } else {
            self.time_on_ground += dt;
            self.time_in_air = 0.0;
        }
        self.previous_velocity = velocity;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;

    const DT: f64 = 1.0 / 60.0;

    #[test]
    fn friction_slows_horizontal_only() {
        let v = ground_friction(vec3(500.0, 0.0, -30.0), 0.1, DT);
        assert!((v.x - (500.0 - 98.1 * DT)).abs() < 1e-9);
        assert_eq!(v.y, 0.0);
        assert_eq!(v.z, -30.0);
    }

    #[test]
    fn friction_snaps_to_zero_instead_of_reversing() {
        let v = ground_friction(vec3(1.0, 0.5, 0.0), 0.1, DT);
        assert_eq!(v, Vec3::ZERO);
    }

    #[test]
    fn friction_ignores_nearly_stopped_ball() {
        let v = vec3(0.05, 0.0, 0.0);
        assert_eq!(ground_friction(v, 0.1, DT), v);
    }

    #[test]
    fn friction_is_monotone_and_terminates() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        for _ in 0..50 {
            let friction = rng.gen_range(0.01..2.0);
            let mut v = vec3(rng.gen_range(-3000.0..3000.0), rng.gen_range(-3000.0..3000.0), 0.0);
            let mut steps = 0;
            while v != Vec3::ZERO {
                let next = ground_friction(v, friction, DT);
                assert!(length(next) <= length(v));
                // never flips direction
                assert!(dot(next, v) >= 0.0);
                v = next;
                steps += 1;
                assert!(steps < 100_000, "friction did not settle");
            }
        }
    }

    #[test]
    fn slow_roll_comes_to_exact_rest() {
        // 1.635..=1.735 cm/s is one step away from a sub-epsilon crawl
        let mut speeds: Vec<f64> = (0..=40).map(|i| 1.6 + i as f64 * 0.005).collect();
        let mut rng = ChaCha8Rng::seed_from_u64(19);
        speeds.extend((0..200).map(|_| rng.gen_range(0.11..20.0)));

        for speed in speeds {
            let mut v = vec3(speed, 0.0, 0.0);
            for _ in 0..60 {
                v = ground_friction(v, 0.1, DT);
            }
            assert_eq!(v, Vec3::ZERO, "start speed {} never stopped", speed);

            let state = MotionState::default();
            let mut w = vec3(0.0, -speed, 0.0);
            for _ in 0..60 {
                w = state.integrate(w, 0.1, 3000.0, DT);
            }
            assert_eq!(w, Vec3::ZERO, "integrated speed {} never stopped", speed);
        }
    }

    #[test]
    fn bounce_reflects_off_floor() {
        let v = bounce(vec3(100.0, 0.0, -200.0), Vec3::UP, 0.5);
        assert_eq!(v, vec3(50.0, 0.0, 100.0));
    }

    #[test]
    fn bounce_damping_is_clamped() {
        let low = bounce(vec3(0.0, 0.0, -100.0), Vec3::UP, 0.0);
        assert!((low.z - 10.0).abs() < 1e-9);
        let high = bounce(vec3(0.0, 0.0, -100.0), Vec3::UP, 3.0);
        assert!((high.z - 100.0).abs() < 1e-9);
    }

    #[test]
    fn bounce_never_gains_speed_and_leaves_surface() {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        for _ in 0..200 {
            let n = normalize(vec3(
                rng.gen_range(-1.0..1.0),
                rng.gen_range(-1.0..1.0),
                rng.gen_range(-1.0..1.0),
            ));
            if n == Vec3::ZERO {
                continue;
            }
            let mut v = vec3(
                rng.gen_range(-2000.0..2000.0),
                rng.gen_range(-2000.0..2000.0),
                rng.gen_range(-2000.0..2000.0),
            );
            // incoming means moving into the surface
            if dot(v, n) > 0.0 {
                v = scale(v, -1.0);
            }
            let damping = rng.gen_range(0.01..=1.0);
            let out = bounce(v, n, damping);
            assert!(length(out) <= length(v) + 1e-9);
            assert!(dot(out, n) >= -1e-9);
        }
    }

    #[test]
    fn clamp_speed_caps_magnitude() {
        let v = clamp_speed(vec3(3000.0, 4000.0, 0.0), 3000.0);
        assert!((length(v) - 3000.0).abs() < 1e-9);
    }

    #[test]
    fn integrate_skips_friction_in_air() {
        let state = MotionState {
            in_air: true,
            ..Default::default()
        };
        let v = vec3(500.0, 0.0, 200.0);
        assert_eq!(state.integrate(v, 0.1, 3000.0, DT), v);
    }

    #[test]
    fn integrate_clamps_any_velocity() {
        let state = MotionState::default();
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        for _ in 0..100 {
            let v = vec3(
                rng.gen_range(-1e5..1e5),
                rng.gen_range(-1e5..1e5),
                rng.gen_range(-1e5..1e5),
            );
            let out = state.integrate(v, 0.1, 3000.0, DT);
            assert!(length(out) <= 3000.0 + 1e-6);
        }
    }

    #[test]
    fn classify_rules() {
        assert_eq!(classify(vec3(0.0, 0.0, 0.0), true), (false, false));
        assert_eq!(classify(vec3(50.0, 0.0, 0.0), true), (false, true));
        assert_eq!(classify(vec3(50.0, 0.0, 11.0), true), (true, false));
        assert_eq!(classify(vec3(0.0, 0.0, 0.0), false), (true, false));
    }

    #[test]
    fn poll_is_edge_triggered() {
        let mut state = MotionState::default();
        assert_eq!(state.poll(vec3(0.0, 0.0, 300.0), false), Some((true, false)));
        assert_eq!(state.poll(vec3(0.0, 0.0, 250.0), false), None);
        assert_eq!(state.poll(vec3(400.0, 0.0, 0.0), true), Some((false, true)));
        assert_eq!(state.poll(vec3(390.0, 0.0, 0.0), true), None);
        assert_eq!(state.poll(Vec3::ZERO, true), Some((false, false)));
    }

    #[test]
    fn accumulators_reset_on_opposite_state() {
        let mut state = MotionState::default();
        state.accumulate(0.5, Vec3::ZERO);
        assert_eq!(state.time_on_ground, 0.5);

        state.in_air = true;
        state.accumulate(0.25, vec3(0.0, 0.0, 100.0));
        assert_eq!(state.time_in_air, 0.25);
        assert_eq!(state.time_on_ground, 0.0);
        assert_eq!(state.previous_velocity, vec3(0.0, 0.0, 100.0));
    }
}
