use crate::vec3::{add, length, normalize, scale, vec3, Vec3};

pub type PlayerId = u32;
pub type BallId = u32;

/// A player on the pitch. Position is at ground level.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    pub id: PlayerId,
    pub position: Vec3,
    /// Unit facing direction in the XY plane
    pub forward: Vec3,
    /// Only written by the possession transition in `MatchState`
    possessed_ball: Option<BallId>,
}

impl Player {
    pub fn new(id: PlayerId, position: Vec3, forward: Vec3) -> Self {
        let forward = normalize(vec3(forward.x, forward.y, 0.0));
        Self {
            id,
            position,
            forward: if forward == Vec3::ZERO {
                vec3(1.0, 0.0, 0.0)
            } else {
                forward
            },
            possessed_ball: None,
        }
    }

    pub fn possessed_ball(&self) -> Option<BallId> {
        self.possessed_ball
    }

    pub fn has_ball(&self) -> bool {
        self.possessed_ball.is_some()
    }

    pub(crate) fn set_possessed_ball(&mut self, ball: Option<BallId>) {
        self.possessed_ball = ball;
    }

    /// Move with world-relative axes (forward = +X, strafe = +Y).
    /// The stick is clamped to unit length and the player turns to face
    /// where they are going.
    pub fn apply_movement(&mut self, forward_axis: f64, strafe_axis: f64, speed: f64, dt: f64) {
        if !forward_axis.is_finite() || !strafe_axis.is_finite() {
            return;
        }
        let mut stick = vec3(forward_axis, strafe_axis, 0.0);
        let len = length(stick);
        if len < 1e-6 {
            return;
        }
        if len > 1.0 {
            stick = scale(stick, 1.0 / len);
        }
        self.position = add(self.position, scale(stick, speed * dt));
        self.forward = normalize(stick);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_player_has_no_ball() {
        let p = Player::new(1, Vec3::ZERO, vec3(1.0, 0.0, 0.0));
        assert!(!p.has_ball());
        assert_eq!(p.possessed_ball(), None);
    }

    #[test]
    fn zero_facing_defaults_to_positive_x() {
        let p = Player::new(1, Vec3::ZERO, Vec3::ZERO);
        assert_eq!(p.forward, vec3(1.0, 0.0, 0.0));
    }

    #[test]
    fn facing_is_flattened_and_normalized() {
        let p = Player::new(1, Vec3::ZERO, vec3(0.0, 2.0, 5.0));
        assert_eq!(p.forward, vec3(0.0, 1.0, 0.0));
    }

    #[test]
    fn movement_turns_player_to_face_motion() {
        let mut p = Player::new(1, Vec3::ZERO, vec3(1.0, 0.0, 0.0));
        p.apply_movement(0.0, 1.0, 600.0, 0.5);
        assert_eq!(p.position, vec3(0.0, 300.0, 0.0));
        assert_eq!(p.forward, vec3(0.0, 1.0, 0.0));
    }

    #[test]
    fn diagonal_stick_is_clamped() {
        let mut p = Player::new(1, Vec3::ZERO, vec3(1.0, 0.0, 0.0));
        p.apply_movement(1.0, 1.0, 100.0, 1.0);
        assert!((length(p.position) - 100.0).abs() < 1e-9);
    }

    #[test]
    fn idle_stick_keeps_facing() {
        let mut p = Player::new(1, Vec3::ZERO, vec3(0.0, -1.0, 0.0));
        p.apply_movement(0.0, 0.0, 600.0, 0.1);
        assert_eq!(p.position, Vec3::ZERO);
        assert_eq!(p.forward, vec3(0.0, -1.0, 0.0));
    }
}
