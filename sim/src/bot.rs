//! Bot players that stand in for humans during a match.
//!
//! Bots are lightweight state machines that:
//! - Chase a free ball and press the grab button once in reach
//! - Dribble toward the goal they attack while holding the ball
//! - Shoot, or pass to the nearest other bot, after a personality-dependent hold time

use crate::input::PlayerInput;
use crate::physics::BallBody;
use crate::player::{Player, PlayerId};
use crate::state::MatchState;
use crate::vec3::{distance, horizontal, length, normalize, sub, vec3, Vec3};
use rand::Rng;

/// Height a bot aims its shots at, roughly mid goal
const SHOT_AIM_HEIGHT: f64 = 80.0;
/// Horizontal spread of a bot's aim point around the goal centre
const SHOT_AIM_SPREAD: f64 = 300.0;
/// Bots stop closing in once this near the ball
const ARRIVE_DISTANCE: f64 = 5.0;

/// Bot personality affects hold time and shot selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BotPersonality {
    /// Shoots early and often (0.3-0.8s hold)
    Striker,
    /// Holds longer and prefers passing (1.0-2.5s hold)
    Playmaker,
    /// Unpredictable timing and power (0.2-4.0s hold)
    Chaotic,
}

impl BotPersonality {
    /// Hold range for this personality (min, max) in seconds
    fn hold_range(&self) -> (f64, f64) {
        match self {
            BotPersonality::Striker => (0.3, 0.8),
            BotPersonality::Playmaker => (1.0, 2.5),
            BotPersonality::Chaotic => (0.2, 4.0),
        }
    }

    fn random_hold(&self, rng: &mut impl Rng) -> f64 {
        let (min, max) = self.hold_range();
        min + rng.gen::<f64>() * (max - min)
    }

    /// Probability of shooting instead of passing when a receiver exists
    fn shot_chance(&self) -> f64 {
        match self {
            BotPersonality::Striker => 0.8,
            BotPersonality::Playmaker => 0.25,
            BotPersonality::Chaotic => 0.5,
        }
    }

    /// Kick power modification factor for this personality
    fn power_factor(&self, rng: &mut impl Rng) -> f64 {
        match self {
            BotPersonality::Striker => 0.9 + rng.gen::<f64>() * 0.2, // 0.9-1.1
            BotPersonality::Playmaker => 0.8 + rng.gen::<f64>() * 0.2, // 0.8-1.0
            BotPersonality::Chaotic => 0.5 + rng.gen::<f64>() * 1.0, // 0.5-1.5
        }
    }

    pub fn random(rng: &mut impl Rng) -> Self {
        match rng.gen_range(0..3) {
            0 => BotPersonality::Striker,
            1 => BotPersonality::Playmaker,
            _ => BotPersonality::Chaotic,
        }
    }
}

/// What a bot wants to do this frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BotDecision {
    /// Controller input, fed through `MatchState::apply_input`
    Move(PlayerInput),
    Shoot { target: Vec3, power: f64 },
    Pass { target: PlayerId, power: f64 },
}

/// A bot player that automatically plays the game
#[derive(Debug)]
pub struct BotPlayer {
    /// The player ID (same as in MatchState players)
    pub player_id: PlayerId,
    pub personality: BotPersonality,
    /// +1.0 attacks the +X goal, -1.0 the -X goal
    pub attack_sign: f64,
    /// Seconds left before releasing the held ball
    hold_time: Option<f64>,
    possess_held: bool,
}

impl BotPlayer {
    pub fn new(player_id: PlayerId, personality: BotPersonality, attack_sign: f64) -> Self {
        Self {
            player_id,
            personality,
            attack_sign: if attack_sign < 0.0 { -1.0 } else { 1.0 },
            hold_time: None,
            possess_held: false,
        }
    }

    pub fn is_holding(&self) -> bool {
        self.hold_time.is_some()
    }

    /// Tick the bot against the current match state.
    pub fn tick<B: BallBody>(
        &mut self,
        dt: f64,
        state: &MatchState<B>,
        receivers: &[PlayerId],
        rng: &mut impl Rng,
    ) -> BotDecision {
        let Some(me) = state.player(self.player_id) else {
            return BotDecision::Move(PlayerInput::default());
        };
        let ball = state.ball();

        if ball.owner() == Some(self.player_id) {
            return self.play_with_ball(dt, state, me, receivers, rng);
        }
        self.hold_time = None;

        let mut input = self.steer_toward(me.position, ball.position());
        if self.personality == BotPersonality::Chaotic {
            input.forward += rng.gen_range(-0.3..0.3);
            input.strafe += rng.gen_range(-0.3..0.3);
        }

        // toggle so every other frame is a fresh press
        let reach = state.player_config().possession_sweep_distance;
        if ball.owner().is_none() && distance(me.position, ball.position()) <= reach {
            self.possess_held = !self.possess_held;
            input.possess = self.possess_held;
        } else {
            self.possess_held = false;
        }
        BotDecision::Move(input)
    }

    fn play_with_ball<B: BallBody>(
        &mut self,
        dt: f64,
        state: &MatchState<B>,
        me: &Player,
        receivers: &[PlayerId],
        rng: &mut impl Rng,
    ) -> BotDecision {
        let personality = self.personality;
        let remaining = self.hold_time.get_or_insert_with(|| personality.random_hold(rng));
        *remaining -= dt;
        if *remaining > 0.0 {
            let goal = self.goal_center(state);
            return BotDecision::Move(self.steer_toward(me.position, goal));
        }
        self.hold_time = None;

        let power = (state.player_config().kick_power * personality.power_factor(rng))
            .min(state.ball().config().max_speed);

        let candidates: Vec<PlayerId> = receivers
            .iter()
            .copied()
            .filter(|id| *id != self.player_id && state.player(*id).is_some())
            .collect();
        if candidates.is_empty() || rng.gen::<f64>() < personality.shot_chance() {
            let mut target = self.goal_center(state);
            target.y = rng.gen_range(-SHOT_AIM_SPREAD..SHOT_AIM_SPREAD);
            target.z = SHOT_AIM_HEIGHT;
            tracing::debug!("Bot {} shoots at {:?}", self.player_id, target);
            return BotDecision::Shoot { target, power };
        }

        let nearest = candidates
            .iter()
            .filter_map(|id| state.player(*id).map(|p| (*id, distance(me.position, p.position))))
            .min_by(|a, b| a.1.total_cmp(&b.1));
        let Some((target, _)) = nearest else {
            return BotDecision::Move(PlayerInput::default());
        };
        tracing::debug!("Bot {} passes to {}", self.player_id, target);
        BotDecision::Pass { target, power }
    }

    fn goal_center<B: BallBody>(&self, state: &MatchState<B>) -> Vec3 {
        vec3(self.attack_sign * state.pitch().half_length, 0.0, 0.0)
    }

    fn steer_toward(&self, from: Vec3, to: Vec3) -> PlayerInput {
        let offset = horizontal(sub(to, from));
        if length(offset) <= ARRIVE_DISTANCE {
            return PlayerInput::default();
        }
        let dir = normalize(offset);
        PlayerInput {
            forward: dir.x,
            strafe: dir.y,
            ..Default::default()
        }
    }
}

/// Manages all bot players
#[derive(Debug)]
pub struct BotManager {
    /// List of bot players (public for testing)
    pub bots: Vec<BotPlayer>,
}

impl BotManager {
    pub fn new() -> Self {
        Self { bots: Vec::new() }
    }

    /// Add a bot for the given player. It attacks the end its player faces.
    pub fn add_bot(&mut self, player: &Player, rng: &mut impl Rng) {
        let personality = BotPersonality::random(rng);
        let attack_sign = player.forward.x;
        tracing::info!(
            "Bot {} created with {:?} personality",
            player.id,
            personality
        );
        self.bots
            .push(BotPlayer::new(player.id, personality, attack_sign));
    }

    /// Returns whether `player_id` was driven by a bot.
    pub fn remove_bot(&mut self, player_id: PlayerId) -> bool {
        let before = self.bots.len();
        self.bots.retain(|b| b.player_id != player_id);
        self.bots.len() != before
    }

    /// Tick all bots. Returns one decision per bot.
    pub fn tick<B: BallBody>(
        &mut self,
        dt: f64,
        state: &MatchState<B>,
        rng: &mut impl Rng,
    ) -> Vec<(PlayerId, BotDecision)> {
        let ids: Vec<PlayerId> = self.bots.iter().map(|b| b.player_id).collect();

        let mut results = Vec::with_capacity(self.bots.len());
        for bot in &mut self.bots {
            let decision = bot.tick(dt, state, &ids, rng);
            results.push((bot.player_id, decision));
        }
        results
    }
}

impl Default for BotManager {
    fn default() -> Self {
        Self::new()
    }
}
