//! Sweep queries against the ball and the players.

use std::collections::BTreeMap;

use crate::player::{Player, PlayerId};
use crate::vec3::{dot, sub, Vec3};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SweepTarget {
    Ball,
    Player(PlayerId),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SweepHit {
    pub target: SweepTarget,
    /// Fraction of the path travelled before the hit, 0..=1
    pub time: f64,
}

pub trait SceneQuery {
    /// Nearest blocking entity along `start -> end` for a sphere of
    /// `radius`. `ignore` excludes the querying player.
    fn sweep_sphere(&self, start: Vec3, end: Vec3, radius: f64, ignore: Option<PlayerId>) -> Option<SweepHit>;
}

/// Earliest fraction of `start -> end` at which a sphere of radius
/// `radius` around the moving point touches `center`.
pub fn sweep_against_sphere(start: Vec3, end: Vec3, center: Vec3, radius: f64) -> Option<f64> {
    let d = sub(end, start);
    let f = sub(start, center);
    let c = dot(f, f) - radius * radius;
    if c <= 0.0 {
        // already touching
        return Some(0.0);
    }
    let a = dot(d, d);
    if a < 1e-12 {
        return None;
    }
    let b = 2.0 * dot(f, d);
    let disc = b * b - 4.0 * a * c;
    if disc < 0.0 {
        return None;
    }
    let t = (-b - disc.sqrt()) / (2.0 * a);
    if (0.0..=1.0).contains(&t) {
        Some(t)
    } else {
        None
    }
}

/// Scene view over one frame's ball and players.
pub struct PitchScene<'a> {
    pub ball_position: Vec3,
    pub ball_radius: f64,
    pub players: &'a BTreeMap<PlayerId, Player>,
    pub player_radius: f64,
    pub player_height: f64,
}

impl SceneQuery for PitchScene<'_> {
    fn sweep_sphere(&self, start: Vec3, end: Vec3, radius: f64, ignore: Option<PlayerId>) -> Option<SweepHit> {
        let mut best = sweep_against_sphere(start, end, self.ball_position, radius + self.ball_radius)
            .map(|time| SweepHit {
                target: SweepTarget::Ball,
                time,
            });

        for (id, player) in self.players {
            if Some(*id) == ignore {
                continue;
            }
            // players block as a sphere at mid height
            let mut center = player.position;
            center.z += self.player_height * 0.5;
            let reach = radius + self.player_radius.max(self.player_height * 0.5);
            if let Some(time) = sweep_against_sphere(start, end, center, reach) {
                if best.map_or(true, |b| time < b.time) {
                    best = Some(SweepHit {
                        target: SweepTarget::Player(*id),
                        time,
                    });
                }
            }
        }
        best
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vec3::vec3;

    #[test]
    fn sweep_hits_sphere_in_path() {
        let t = sweep_against_sphere(Vec3::ZERO, vec3(200.0, 0.0, 0.0), vec3(100.0, 0.0, 0.0), 50.0);
        assert!((t.unwrap() - 0.25).abs() < 1e-9);
    }

    #[test]
    fn sweep_misses_sphere_to_the_side() {
        let t = sweep_against_sphere(Vec3::ZERO, vec3(200.0, 0.0, 0.0), vec3(100.0, 80.0, 0.0), 50.0);
        assert!(t.is_none());
    }

    #[test]
    fn sweep_stops_at_path_end() {
        let t = sweep_against_sphere(Vec3::ZERO, vec3(200.0, 0.0, 0.0), vec3(400.0, 0.0, 0.0), 50.0);
        assert!(t.is_none());
    }

    #[test]
    fn overlapping_start_hits_immediately() {
        let t = sweep_against_sphere(Vec3::ZERO, vec3(200.0, 0.0, 0.0), vec3(10.0, 0.0, 0.0), 50.0);
        assert_eq!(t, Some(0.0));
    }

    #[test]
    fn scene_prefers_nearest_blocker() {
        let mut players = BTreeMap::new();
        players.insert(1, Player::new(1, Vec3::ZERO, vec3(1.0, 0.0, 0.0)));
        players.insert(2, Player::new(2, vec3(400.0, 0.0, 0.0), vec3(-1.0, 0.0, 0.0)));
        let scene = PitchScene {
            ball_position: vec3(150.0, 0.0, 22.0),
            ball_radius: 22.0,
            players: &players,
            player_radius: 42.0,
            player_height: 180.0,
        };

        let hit = scene
            .sweep_sphere(vec3(0.0, 0.0, 22.0), vec3(600.0, 0.0, 22.0), 50.0, Some(1))
            .unwrap();
        assert_eq!(hit.target, SweepTarget::Ball);
    }

    #[test]
    fn scene_reports_player_standing_in_front_of_ball() {
        let mut players = BTreeMap::new();
        players.insert(1, Player::new(1, Vec3::ZERO, vec3(1.0, 0.0, 0.0)));
        players.insert(2, Player::new(2, vec3(150.0, 0.0, 0.0), vec3(-1.0, 0.0, 0.0)));
        let scene = PitchScene {
            ball_position: vec3(400.0, 0.0, 22.0),
            ball_radius: 22.0,
            players: &players,
            player_radius: 42.0,
            player_height: 180.0,
        };

        let hit = scene
            .sweep_sphere(vec3(0.0, 0.0, 22.0), vec3(600.0, 0.0, 22.0), 50.0, Some(1))
            .unwrap();
        assert_eq!(hit.target, SweepTarget::Player(2));
    }
}
