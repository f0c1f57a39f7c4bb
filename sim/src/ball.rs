use crate::events::BallEvent;
use crate::motion::{bounce, ground_friction, MotionState};
use crate::physics::BallBody;
use crate::player::{BallId, PlayerId};
use crate::possession::PossessionState;
use crate::vec3::{length, Vec3};
use football_shared::config::BallConfig;

/// The match ball: movement integrator plus motion and possession state.
pub struct Ball<B: BallBody> {
    pub id: BallId,
    config: BallConfig,
    body: B,
    motion: MotionState,
    possession: PossessionState,
    last_kick_direction: Vec3,
    last_kick_power: f64,
}

impl<B: BallBody> Ball<B> {
    pub fn new(id: BallId, config: BallConfig, body: B) -> Self {
        Self {
            id,
            config,
            body,
            motion: MotionState::default(),
            possession: PossessionState::new(),
            last_kick_direction: Vec3::ZERO,
            last_kick_power: 0.0,
        }
    }

    pub fn config(&self) -> &BallConfig {
        &self.config
    }

    pub fn body(&self) -> &B {
        &self.body
    }

    pub fn body_mut(&mut self) -> &mut B {
        &mut self.body
    }

    pub fn position(&self) -> Vec3 {
        self.body.position()
    }

    pub fn velocity(&self) -> Vec3 {
        self.body.velocity()
    }

    pub fn speed(&self) -> f64 {
        length(self.body.velocity())
    }

    pub fn owner(&self) -> Option<PlayerId> {
        self.possession.owner()
    }

    pub fn possession(&self) -> &PossessionState {
        &self.possession
    }

    pub fn can_be_picked_up(&self) -> bool {
        self.possession
            .can_be_picked_up(self.speed(), self.config.pickup_speed_limit)
    }

    pub fn is_in_air(&self) -> bool {
        self.motion.in_air
    }

    pub fn is_rolling(&self) -> bool {
        self.motion.rolling
    }

    pub fn time_in_air(&self) -> f64 {
        self.motion.time_in_air
    }

    pub fn time_on_ground(&self) -> f64 {
        self.motion.time_on_ground
    }

    pub fn previous_velocity(&self) -> Vec3 {
        self.motion.previous_velocity
    }

    pub fn last_kick_direction(&self) -> Vec3 {
        self.last_kick_direction
    }

    pub fn last_kick_power(&self) -> f64 {
        self.last_kick_power
    }

    /// Per-frame friction and speed clamp. Does nothing while owned.
    pub fn integrate(&mut self, dt: f64) {
        if self.possession.is_possessed() {
            return;
        }
        let v = self.motion.integrate(
            self.body.velocity(),
            self.config.rolling_friction,
            self.config.max_speed,
            dt,
        );
        self.body.set_velocity(v);
    }

    pub fn apply_ground_friction(&mut self, dt: f64) {
        let v = ground_friction(self.body.velocity(), self.config.rolling_friction, dt);
        self.body.set_velocity(v);
    }

    /// Bounce response for one discrete contact.
    pub fn handle_bounce(&mut self, normal: Vec3) {
        let v = bounce(self.body.velocity(), normal, self.config.bounce_damping);
        self.body.set_velocity(v);
    }

    /// Reclassify airborne/rolling; yields an event only on a change.
    pub fn update_airborne_state(&mut self) -> Option<BallEvent> {
        let (in_air, rolling) = self
            .motion
            .poll(self.body.velocity(), self.body.is_grounded())?;
        tracing::debug!("Ball state changed - in air: {}, rolling: {}", in_air, rolling);
        Some(BallEvent::StateChanged { in_air, rolling })
    }

    pub fn stop(&mut self) {
        self.body.stop();
    }

    /// Frame bookkeeping: air/ground timers, previous velocity, kick cooldown.
    pub fn end_frame(&mut self, dt: f64) {
        let v = self.body.velocity();
        self.motion.accumulate(dt, v);
        if self.possession.tick_cooldown(dt) {
            tracing::debug!("Ball {} accepts owners again", self.id);
        }
    }

    pub(crate) fn possession_mut(&mut self) -> &mut PossessionState {
        &mut self.possession
    }

    pub(crate) fn launch(&mut self, velocity: Vec3, direction: Vec3, power: f64) {
        self.body.set_simulating(true);
        self.body.set_velocity(velocity);
        self.last_kick_direction = direction;
        self.last_kick_power = power;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::ProjectileBody;
    use crate::vec3::vec3;
    use football_shared::config::PitchConfig;

    const DT: f64 = 1.0 / 60.0;

    fn ball_at(pos: Vec3) -> Ball<ProjectileBody> {
        let config = BallConfig::default();
        let body = ProjectileBody::new(pos, config.radius, config.gravity, &PitchConfig::default());
        Ball::new(1, config, body)
    }

    #[test]
    fn pickup_gate_follows_speed() {
        let mut ball = ball_at(vec3(0.0, 0.0, 22.0));
        ball.body_mut().set_velocity(vec3(250.0, 0.0, 0.0));
        assert!(!ball.can_be_picked_up());
        ball.body_mut().set_velocity(vec3(150.0, 0.0, 0.0));
        assert!(ball.can_be_picked_up());
    }

    #[test]
    fn integrate_applies_friction_on_ground() {
        let mut ball = ball_at(vec3(0.0, 0.0, 22.0));
        ball.body_mut().set_velocity(vec3(500.0, 0.0, 0.0));
        ball.integrate(DT);
        assert!(ball.velocity().x < 500.0);
    }

    #[test]
    fn integrate_clamps_to_max_speed() {
        let mut ball = ball_at(vec3(0.0, 0.0, 22.0));
        ball.body_mut().set_velocity(vec3(0.0, 9000.0, 0.0));
        ball.integrate(DT);
        assert!(ball.speed() <= ball.config().max_speed + 1e-9);
    }

    #[test]
    fn integrate_is_noop_while_owned() {
        let mut ball = ball_at(vec3(0.0, 0.0, 22.0));
        ball.body_mut().set_velocity(vec3(9000.0, 0.0, 0.0));
        ball.possession_mut().set_owner(Some(2));
        ball.integrate(DT);
        assert_eq!(ball.velocity(), vec3(9000.0, 0.0, 0.0));
    }

    #[test]
    fn bounce_uses_configured_damping() {
        let mut ball = ball_at(vec3(0.0, 0.0, 22.0));
        ball.body_mut().set_velocity(vec3(0.0, 0.0, -500.0));
        ball.handle_bounce(Vec3::UP);
        assert!((ball.velocity().z - 300.0).abs() < 1e-9);
    }

    #[test]
    fn airborne_state_change_produces_event() {
        let mut ball = ball_at(vec3(0.0, 0.0, 300.0));
        assert_eq!(
            ball.update_airborne_state(),
            Some(BallEvent::StateChanged {
                in_air: true,
                rolling: false
            })
        );
        assert!(ball.is_in_air());
        assert_eq!(ball.update_airborne_state(), None);
    }

    #[test]
    fn end_frame_tracks_time_on_ground() {
        let mut ball = ball_at(vec3(0.0, 0.0, 22.0));
        ball.end_frame(0.5);
        ball.end_frame(0.5);
        assert_eq!(ball.time_on_ground(), 1.0);
        assert_eq!(ball.time_in_air(), 0.0);
    }
}
