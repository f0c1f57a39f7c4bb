//! Possession bookkeeping on the ball side and the proximity rules.
//!
//! The state here is only changed through `MatchState`, which keeps the
//! player's back reference in step with it.

use crate::player::PlayerId;
use crate::vec3::{add, distance, scale, vec3, Vec3};

#[derive(Debug, Clone)]
pub struct PossessionState {
    owner: Option<PlayerId>,
    can_be_possessed: bool,
    /// Seconds left before a kicked ball accepts owners again
    pickup_cooldown: f64,
}

impl PossessionState {
    pub fn new() -> Self {
        Self {
            owner: None,
            can_be_possessed: true,
            pickup_cooldown: 0.0,
        }
    }

    pub fn owner(&self) -> Option<PlayerId> {
        self.owner
    }

    pub fn is_possessed(&self) -> bool {
        self.owner.is_some()
    }

    pub fn can_be_possessed(&self) -> bool {
        self.can_be_possessed
    }

    /// Pickup gate: enabled, unowned and slower than the limit.
    pub fn can_be_picked_up(&self, speed: f64, speed_limit: f64) -> bool {
        self.can_be_possessed && self.owner.is_none() && speed < speed_limit
    }

    /// A free ball with pickup disabled is a kick still being processed.
    pub fn kick_in_flight(&self) -> bool {
        self.owner.is_none() && !self.can_be_possessed
    }

    pub(crate) fn set_owner(&mut self, owner: Option<PlayerId>) {
        self.owner = owner;
        self.can_be_possessed = owner.is_none();
        self.pickup_cooldown = 0.0;
    }

    pub(crate) fn block_pickup_for(&mut self, seconds: f64) {
        if self.owner.is_some() {
            return;
        }
        self.can_be_possessed = false;
        self.pickup_cooldown = seconds.max(0.0);
    }

    /// Count down a kick cooldown. Returns true on the frame pickup re-opens.
    pub(crate) fn tick_cooldown(&mut self, dt: f64) -> bool {
        if !self.kick_in_flight() {
            return false;
        }
        self.pickup_cooldown -= dt;
        if self.pickup_cooldown <= 0.0 {
            self.pickup_cooldown = 0.0;
            self.can_be_possessed = true;
            return true;
        }
        false
    }
}

impl Default for PossessionState {
    fn default() -> Self {
        Self::new()
    }
}

/// Nearest candidate within `radius` of the ball. Ties go to the first
/// candidate enumerated.
pub fn find_nearest_eligible_player<I>(ball_pos: Vec3, candidates: I, radius: f64) -> Option<PlayerId>
where
    I: IntoIterator<Item = (PlayerId, Vec3)>,
{
    let mut best: Option<(PlayerId, f64)> = None;
    for (id, pos) in candidates {
        let d = distance(ball_pos, pos);
        if d > radius {
            continue;
        }
        match best {
            Some((_, best_d)) if d >= best_d => {}
            _ => best = Some((id, d)),
        }
    }
    best.map(|(id, _)| id)
}

/// Where a carried ball sits relative to its owner.
pub fn carry_position(owner_pos: Vec3, owner_forward: Vec3, forward_offset: f64, height_offset: f64) -> Vec3 {
    add(
        add(owner_pos, scale(owner_forward, forward_offset)),
        vec3(0.0, 0.0, height_offset),
    )
}
