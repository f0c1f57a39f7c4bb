use crate::ball::Ball;
use crate::commands::{jitter_direction, kick_velocity, pass_power, shot_accuracy};
use crate::config::SimConfig;
use crate::events::{BallEvent, EventBus, SubscriptionId};
use crate::input::{InputAction, InputState, PlayerInput};
use crate::physics::{BallBody, Contact, ProjectileBody};
use crate::player::{BallId, Player, PlayerId};
use crate::possession::{carry_position, find_nearest_eligible_player};
use crate::protocol::{ball_wire, player_wire};
use crate::scene::{PitchScene, SceneQuery, SweepTarget};
use crate::scheduler::{Scheduler, TimerHandle};
use crate::vec3::{add, distance, dot, horizontal, length, normalize, scale, sub, vec3, Vec3};
use football_shared::config::{PitchConfig, PlayerConfig};
use football_shared::protocol::{SnapshotMsg, PROTOCOL_VERSION};
use rand_chacha::ChaCha8Rng;
use std::collections::{BTreeMap, BTreeSet};

const MATCH_BALL_ID: BallId = 1;

/// Periodic ball jobs, run before the frame's physics step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BallTask {
    StatePoll,
    PossessionScan,
}

/// Central match state: the ball, the players and the possession relation
/// between them.
pub struct MatchState<B: BallBody = ProjectileBody> {
    ball: Ball<B>,
    players: BTreeMap<PlayerId, Player>,
    inputs: BTreeMap<PlayerId, InputState>,
    /// Players the ball is currently in contact with
    touching: BTreeSet<PlayerId>,
    scheduler: Scheduler<BallTask>,
    timers: Vec<TimerHandle>,
    events: EventBus,
    player_config: PlayerConfig,
    pitch: PitchConfig,
    rng: ChaCha8Rng,
    next_player_id: PlayerId,
    elapsed: f64,
    tick_count: u64,
    destroyed: bool,
}

impl MatchState<ProjectileBody> {
    /// Match with the ball resting on the kickoff spot.
    pub fn new(config: &SimConfig) -> Self {
        let body = ProjectileBody::new(
            vec3(0.0, 0.0, config.ball.radius),
            config.ball.radius,
            config.ball.gravity,
            &config.pitch,
        );
        Self::with_body(config, body)
    }
}

impl<B: BallBody> MatchState<B> {
    pub fn with_body(config: &SimConfig, body: B) -> Self {
        use rand::SeedableRng;
        let rng = ChaCha8Rng::seed_from_u64(config.rng_seed);

        let mut scheduler = Scheduler::new();
        let timers: Vec<TimerHandle> = [
            (config.ball.state_poll_interval, BallTask::StatePoll),
            (config.ball.possession_scan_interval, BallTask::PossessionScan),
        ]
        .into_iter()
        .filter_map(|(period, task)| {
            let handle = scheduler.set_timer(period, task);
            if handle.is_none() {
                tracing::warn!("Invalid period {} for {:?}, task disabled", period, task);
            }
            handle
        })
        .collect();

        Self {
            ball: Ball::new(MATCH_BALL_ID, config.ball.clone(), body),
            players: BTreeMap::new(),
            inputs: BTreeMap::new(),
            touching: BTreeSet::new(),
            scheduler,
            timers,
            events: EventBus::new(),
            player_config: config.player.clone(),
            pitch: config.pitch.clone(),
            rng,
            next_player_id: 1,
            elapsed: 0.0,
            tick_count: 0,
            destroyed: false,
        }
    }

    pub fn ball(&self) -> &Ball<B> {
        &self.ball
    }

    pub fn ball_mut(&mut self) -> &mut Ball<B> {
        &mut self.ball
    }

    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.get(&id)
    }

    /// Players in ascending id order
    pub fn players(&self) -> impl Iterator<Item = &Player> {
        self.players.values()
    }

    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    pub fn player_config(&self) -> &PlayerConfig {
        &self.player_config
    }

    pub fn pitch(&self) -> &PitchConfig {
        &self.pitch
    }

    pub fn events_mut(&mut self) -> &mut EventBus {
        &mut self.events
    }

    pub fn subscribe<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: FnMut(&BallEvent) + Send + 'static,
    {
        self.events.subscribe(listener)
    }

    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    pub fn timers_active(&self) -> bool {
        self.timers.iter().any(|h| self.scheduler.is_active(*h))
    }

    // === Players ===

    pub fn add_player(&mut self, position: Vec3, forward: Vec3) -> PlayerId {
        let id = self.next_player_id;
        self.next_player_id += 1;
        self.players.insert(id, Player::new(id, position, forward));
        self.inputs.insert(id, InputState::default());
        tracing::info!("Player {} joined", id);
        id
    }

    /// Remove a player. An owner leaving drops the ball first.
    pub fn remove_player(&mut self, id: PlayerId) -> bool {
        if !self.players.contains_key(&id) {
            return false;
        }
        if self.ball.owner() == Some(id) {
            tracing::info!("Owner {} left, releasing ball", id);
            self.release_ball();
        }
        self.players.remove(&id);
        self.inputs.remove(&id);
        self.touching.remove(&id);
        tracing::info!("Player {} left", id);
        true
    }

    /// Teleport a player, e.g. to a kickoff formation.
    pub fn place_player(&mut self, id: PlayerId, position: Vec3, forward: Vec3) -> bool {
        let Some(player) = self.players.get_mut(&id) else {
            return false;
        };
        let held = player.possessed_ball();
        *player = Player::new(id, position, forward);
        player.set_possessed_ball(held);
        self.carry_ball();
        true
    }

    /// Feed one frame of controller input. Button presses act immediately;
    /// the stick is applied on the next tick.
    pub fn apply_input(&mut self, id: PlayerId, input: PlayerInput) -> bool {
        let Some(state) = self.inputs.get_mut(&id) else {
            tracing::debug!("Input for unknown player {} ignored", id);
            return false;
        };
        for action in state.update(input) {
            match action {
                InputAction::AttemptPossession => {
                    self.attempt_possession(id);
                }
                InputAction::Kick => {
                    self.player_kick(id);
                }
            }
        }
        true
    }

    // === Possession ===

    /// The only place either side of the possession relation is written.
    pub fn set_possessing_player(&mut self, new_owner: Option<PlayerId>) -> bool {
        if self.destroyed {
            return false;
        }
        let current = self.ball.owner();
        if new_owner == current {
            return false;
        }
        if let Some(id) = new_owner {
            if !self.players.contains_key(&id) {
                tracing::warn!("Possession by unknown player {} ignored", id);
                return false;
            }
        }

        if let Some(old) = current {
            if let Some(player) = self.players.get_mut(&old) {
                player.set_possessed_ball(None);
            }
        }
        if let Some(id) = new_owner {
            if let Some(player) = self.players.get_mut(&id) {
                player.set_possessed_ball(Some(self.ball.id));
            }
        }
        self.ball.possession_mut().set_owner(new_owner);
        self.ball.stop();
        self.ball.body_mut().set_simulating(new_owner.is_none());
        self.touching.clear();
        self.carry_ball();

        match new_owner {
            Some(id) => tracing::info!("Player {} took possession", id),
            None => tracing::info!("Ball released"),
        }
        self.events
            .emit(BallEvent::PossessionChanged { owner: new_owner });
        true
    }

    pub fn release_ball(&mut self) -> bool {
        self.set_possessing_player(None)
    }

    /// Take the ball if the pickup gate allows it.
    pub fn try_pickup(&mut self, id: PlayerId) -> bool {
        if !self.ball.can_be_picked_up() {
            return false;
        }
        self.set_possessing_player(Some(id))
    }

    /// Manual grab: sweep ahead of the player and take the ball if it is
    /// the first thing in the way.
    pub fn attempt_possession(&mut self, id: PlayerId) -> bool {
        let Some(player) = self.players.get(&id) else {
            return false;
        };
        let mut start = player.position;
        start.z += self.ball.config().radius;
        let end = add(
            start,
            scale(player.forward, self.player_config.possession_sweep_distance),
        );

        let scene = PitchScene {
            ball_position: self.ball.position(),
            ball_radius: self.ball.config().radius,
            players: &self.players,
            player_radius: self.player_config.radius,
            player_height: self.player_config.height,
        };
        let hit = scene.sweep_sphere(
            start,
            end,
            self.player_config.possession_sweep_radius,
            Some(id),
        );

        match hit {
            Some(h) if h.target == SweepTarget::Ball => self.try_pickup(id),
            Some(h) => {
                tracing::debug!("Player {} grab blocked by {:?}", id, h.target);
                false
            }
            None => false,
        }
    }

    /// Proximity scan: hand a free, slow ball to the nearest player in range.
    pub fn check_for_nearby_players(&mut self) -> bool {
        if !self.ball.can_be_picked_up() {
            return false;
        }
        let nearest = find_nearest_eligible_player(
            self.ball.position(),
            self.players.values().map(|p| (p.id, p.position)),
            self.ball.config().possession_radius,
        );
        match nearest {
            Some(id) => self.try_pickup(id),
            None => false,
        }
    }

    /// Both sides of the possession relation agree and at most one player
    /// holds the ball.
    pub fn check_possession_invariant(&self) -> bool {
        let holders: Vec<PlayerId> = self
            .players
            .values()
            .filter(|p| p.possessed_ball() == Some(self.ball.id))
            .map(|p| p.id)
            .collect();
        match self.ball.owner() {
            None => holders.is_empty(),
            Some(owner) => holders == vec![owner],
        }
    }

    // === Commands ===

    /// Launch the ball along `direction` with an upward bias. Ignored while
    /// a previous kick is still in flight.
    pub fn kick_ball(&mut self, direction: Vec3, power: f64) -> bool {
        if self.destroyed {
            return false;
        }
        if self.ball.possession().kick_in_flight() {
            tracing::debug!("Kick ignored: previous kick still in flight");
            return false;
        }
        let Some(kick) = kick_velocity(direction, power) else {
            tracing::debug!("Kick ignored: direction {:?} power {}", direction, power);
            return false;
        };

        if self.ball.owner().is_some() {
            self.release_ball();
        }
        self.ball.launch(kick.velocity, kick.direction, kick.power);
        let cooldown = self.ball.config().kick_pickup_cooldown;
        self.ball.possession_mut().block_pickup_for(cooldown);

        tracing::info!("Ball kicked with power: {}", kick.power);
        self.events.emit(BallEvent::Kicked {
            direction: kick.direction,
            power: kick.power,
        });
        true
    }

    /// Raw kick: the force becomes the ball velocity, no lift added.
    pub fn kick_with_force(&mut self, force: Vec3) -> bool {
        if self.destroyed {
            return false;
        }
        if self.ball.possession().kick_in_flight() {
            tracing::debug!("Kick ignored: previous kick still in flight");
            return false;
        }
        let direction = normalize(force);
        if !force.is_finite() || direction == Vec3::ZERO {
            tracing::debug!("Kick ignored: force {:?}", force);
            return false;
        }
        let power = length(force);

        if self.ball.owner().is_some() {
            self.release_ball();
        }
        self.ball.launch(force, direction, power);
        let cooldown = self.ball.config().kick_pickup_cooldown;
        self.ball.possession_mut().block_pickup_for(cooldown);

        tracing::info!("Ball struck with force: {}", power);
        self.events.emit(BallEvent::Kicked { direction, power });
        true
    }

    /// Pass to a teammate; power is weighted by distance.
    pub fn pass_ball(&mut self, target: PlayerId, power: f64) -> bool {
        let Some(target_pos) = self.players.get(&target).map(|p| p.position) else {
            tracing::debug!("Pass ignored: no player {}", target);
            return false;
        };
        let ball_pos = self.ball.position();
        let direction = normalize(sub(target_pos, ball_pos));
        let adjusted = pass_power(power, distance(ball_pos, target_pos));
        self.kick_ball(direction, adjusted)
    }

    /// Shoot at a point. Harder shots get more random spread.
    pub fn shoot_ball(&mut self, target: Vec3, power: f64) -> bool {
        if self.ball.possession().kick_in_flight() {
            tracing::debug!("Shot ignored: previous kick still in flight");
            return false;
        }
        let direction = normalize(sub(target, self.ball.position()));
        if direction == Vec3::ZERO {
            tracing::debug!("Shot ignored: target {:?} is the ball position", target);
            return false;
        }
        let accuracy = shot_accuracy(power, self.ball.config().max_speed);
        let direction = jitter_direction(direction, accuracy, &mut self.rng);
        self.kick_ball(direction, power)
    }

    pub fn stop_ball(&mut self) {
        self.ball.stop();
    }

    /// Teleport the ball, stop it and make it free (kickoff, out of play).
    pub fn reset_ball_position(&mut self, position: Vec3) -> bool {
        if self.destroyed || !position.is_finite() {
            return false;
        }
        self.ball.body_mut().set_position(position);
        self.ball.stop();
        if self.ball.owner().is_some() {
            self.release_ball();
        } else {
            self.ball.possession_mut().set_owner(None);
            self.ball.body_mut().set_simulating(true);
        }
        self.touching.clear();
        tracing::info!("Ball reset to {:?}", position);
        true
    }

    /// Kick the possessed ball where the player is facing.
    fn player_kick(&mut self, id: PlayerId) -> bool {
        if self.ball.owner() != Some(id) {
            tracing::debug!("Player {} kicked without the ball", id);
            return false;
        }
        let Some(forward) = self.players.get(&id).map(|p| p.forward) else {
            return false;
        };
        self.kick_ball(forward, self.player_config.kick_power)
    }

    // === Contacts ===

    /// One discrete contact: bounce, and try a pickup if it was a player.
    pub fn handle_contact(&mut self, contact: Contact) {
        self.ball.handle_bounce(contact.normal);
        if let Some(id) = contact.other {
            if self.ball.owner().is_none() {
                self.try_pickup(id);
            }
        }
    }

    pub fn handle_overlap(&mut self, id: PlayerId) -> bool {
        if self.ball.owner().is_some() {
            return false;
        }
        self.try_pickup(id)
    }

    fn detect_player_contacts(&mut self) {
        let ball_pos = self.ball.position();
        let ball_radius = self.ball.config().radius;
        let reach = self.player_config.radius + ball_radius;

        let mut now_touching = BTreeSet::new();
        let mut started = Vec::new();
        for (id, player) in &self.players {
            let offset = horizontal(sub(ball_pos, player.position));
            if length(offset) >= reach || ball_pos.z - ball_radius > self.player_config.height {
                continue;
            }
            now_touching.insert(*id);
            if !self.touching.contains(id) {
                let normal = match normalize(offset) {
                    n if n == Vec3::ZERO => player.forward,
                    n => n,
                };
                started.push((*id, normal));
            }
        }
        self.touching = now_touching;

        for (id, normal) in started {
            if self.ball.owner().is_some() {
                break;
            }
            if dot(self.ball.velocity(), normal) < 0.0 {
                self.handle_contact(Contact {
                    normal,
                    other: Some(id),
                });
            } else {
                self.handle_overlap(id);
            }
        }
    }

    // === Frame ===

    pub fn update_ball_state(&mut self) {
        if let Some(event) = self.ball.update_airborne_state() {
            self.events.emit(event);
        }
    }

    /// Advance one frame. Periodic tasks run first, then player movement,
    /// the ball physics step and finally the carry reposition.
    pub fn tick(&mut self, dt: f64) {
        if self.destroyed || !dt.is_finite() || dt <= 0.0 {
            return;
        }

        for task in self.scheduler.advance(dt) {
            match task {
                BallTask::StatePoll => self.update_ball_state(),
                BallTask::PossessionScan => {
                    self.check_for_nearby_players();
                }
            }
        }

        self.move_players(dt);

        if self.ball.owner().is_none() {
            let contacts = self.ball.body_mut().step(dt);
            for contact in contacts {
                self.handle_contact(contact);
            }
            self.detect_player_contacts();
            self.ball.integrate(dt);
        }

        self.carry_ball();
        self.ball.end_frame(dt);

        self.elapsed += dt;
        self.tick_count += 1;
    }

    fn move_players(&mut self, dt: f64) {
        let speed = self.player_config.move_speed;
        let max_x = self.pitch.half_length;
        let max_y = self.pitch.half_width;
        for (id, player) in self.players.iter_mut() {
            if let Some(input) = self.inputs.get(id) {
                player.apply_movement(input.forward, input.strafe, speed, dt);
                player.position.x = player.position.x.clamp(-max_x, max_x);
                player.position.y = player.position.y.clamp(-max_y, max_y);
            }
        }
    }

    fn carry_ball(&mut self) {
        let Some(owner) = self.ball.owner() else {
            return;
        };
        let Some(player) = self.players.get(&owner) else {
            return;
        };
        let forward_offset = self.ball.config().carry_forward_offset;
        let height_offset = self.ball.config().carry_height_offset;
        let pos = carry_position(player.position, player.forward, forward_offset, height_offset);
        self.ball.body_mut().set_position(pos);
    }

    /// Teardown: cancel the ball's timers and drop every listener.
    pub fn destroy(&mut self) {
        if self.destroyed {
            return;
        }
        for handle in self.timers.drain(..) {
            self.scheduler.cancel(handle);
        }
        self.events.clear();
        self.destroyed = true;
        tracing::info!("Ball {} destroyed", self.ball.id);
    }

    pub fn get_snapshot(&self) -> SnapshotMsg {
        SnapshotMsg {
            protocol_version: PROTOCOL_VERSION,
            tick: self.tick_count,
            ball: ball_wire(&self.ball),
            players: self.players.values().map(player_wire).collect(),
        }
    }
}
