//! Movement integrator for the ball.
//!
//! The core only talks to `BallBody`. `ProjectileBody` is the integrator
//! used by the headless match: gravity, a flat pitch and four boundary
//! walls. It reports contacts but never changes velocity because of them;
//! the bounce response belongs to the ball.

use crate::constants::{GROUND_REST_SPEED, GROUND_TOLERANCE};
use crate::player::PlayerId;
use crate::vec3::{add, scale, vec3, Vec3};
use football_shared::config::PitchConfig;

/// A discrete contact. `other` is set when the ball touched a player.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    pub normal: Vec3,
    pub other: Option<PlayerId>,
}

impl Contact {
    pub fn surface(normal: Vec3) -> Self {
        Self {
            normal,
            other: None,
        }
    }
}

pub trait BallBody {
    fn position(&self) -> Vec3;
    fn set_position(&mut self, position: Vec3);
    fn velocity(&self) -> Vec3;
    fn set_velocity(&mut self, velocity: Vec3);
    fn is_grounded(&self) -> bool;
    /// Suspend or resume integration. A suspended body keeps still.
    fn set_simulating(&mut self, simulating: bool);
    fn is_simulating(&self) -> bool;
    /// Advance one frame and return the contacts that started during it.
    fn step(&mut self, dt: f64) -> Vec<Contact>;

    fn stop(&mut self) {
        self.set_velocity(Vec3::ZERO);
    }
}

#[derive(Debug, Clone)]
pub struct ProjectileBody {
    position: Vec3,
    velocity: Vec3,
    radius: f64,
    gravity: f64,
    half_length: f64,
    half_width: f64,
    grounded: bool,
    simulating: bool,
}

impl ProjectileBody {
    pub fn new(position: Vec3, radius: f64, gravity: f64, pitch: &PitchConfig) -> Self {
        let mut body = Self {
            position,
            velocity: Vec3::ZERO,
            radius,
            gravity,
            half_length: pitch.half_length,
            half_width: pitch.half_width,
            grounded: false,
            simulating: true,
        };
        body.grounded = body.touches_ground();
        body
    }

    fn touches_ground(&self) -> bool {
        self.position.z <= self.radius + GROUND_TOLERANCE
    }

    fn resolve_walls(&mut self, contacts: &mut Vec<Contact>) {
        let max_x = self.half_length - self.radius;
        let max_y = self.half_width - self.radius;

        if self.position.x > max_x {
            self.position.x = max_x;
            if self.velocity.x > 0.0 {
                contacts.push(Contact::surface(vec3(-1.0, 0.0, 0.0)));
            }
        } else if self.position.x < -max_x {
            self.position.x = -max_x;
            if self.velocity.x < 0.0 {
                contacts.push(Contact::surface(vec3(1.0, 0.0, 0.0)));
            }
        }

        if self.position.y > max_y {
            self.position.y = max_y;
            if self.velocity.y > 0.0 {
                contacts.push(Contact::surface(vec3(0.0, -1.0, 0.0)));
            }
        } else if self.position.y < -max_y {
            self.position.y = -max_y;
            if self.velocity.y < 0.0 {
                contacts.push(Contact::surface(vec3(0.0, 1.0, 0.0)));
            }
        }
    }
}

impl BallBody for ProjectileBody {
    fn position(&self) -> Vec3 {
        self.position
    }

    fn set_position(&mut self, position: Vec3) {
        self.position = position;
        self.grounded = self.touches_ground();
    }

    fn velocity(&self) -> Vec3 {
        self.velocity
    }

    fn set_velocity(&mut self, velocity: Vec3) {
        self.velocity = velocity;
    }

    fn is_grounded(&self) -> bool {
        self.grounded
    }

    fn set_simulating(&mut self, simulating: bool) {
        self.simulating = simulating;
    }

    fn is_simulating(&self) -> bool {
        self.simulating
    }

    fn step(&mut self, dt: f64) -> Vec<Contact> {
        let mut contacts = Vec::new();
        if !self.simulating || !dt.is_finite() || dt <= 0.0 {
            return contacts;
        }

        // Resting balls don't accelerate into the turf
        if !self.grounded || self.velocity.z > 0.0 {
            self.velocity.z -= self.gravity * dt;
        }
        self.position = add(self.position, scale(self.velocity, dt));

        if self.position.z <= self.radius {
            self.position.z = self.radius;
            if self.velocity.z < -GROUND_REST_SPEED {
                self.grounded = false;
                contacts.push(Contact::surface(Vec3::UP));
            } else {
                self.velocity.z = 0.0;
                self.grounded = true;
            }
        } else {
            self.grounded = self.touches_ground() && self.velocity.z <= 0.0;
        }

        self.resolve_walls(&mut contacts);
        contacts
    }
}
