use crate::bot::{BotDecision, BotManager};
use crate::config::SimConfig;
use crate::input::PlayerInput;
use crate::player::PlayerId;
use crate::protocol::event_msg;
use crate::state::MatchState;
use crate::vec3::{vec3, Vec3};
use football_shared::protocol::{MatchMsg, SnapshotMsg};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::time::Duration;
use tokio::sync::{broadcast, mpsc, oneshot};

/// Distance between bots lined up on the same side at kickoff
const KICKOFF_SPACING: f64 = 400.0;

/// Commands from controllers to the game loop
pub enum GameCommand {
    PlayerJoin {
        position: Vec3,
        forward: Vec3,
        response: oneshot::Sender<PlayerId>,
    },
    PlayerLeave {
        id: PlayerId,
    },
    Input {
        id: PlayerId,
        input: PlayerInput,
    },
    Kick {
        direction: Vec3,
        power: f64,
    },
    Pass {
        target: PlayerId,
        power: f64,
    },
    Shoot {
        target: Vec3,
        power: f64,
    },
    ResetBall {
        position: Vec3,
    },
    Snapshot {
        response: oneshot::Sender<SnapshotMsg>,
    },
    Shutdown,
}

/// Broadcasts from game loop to all observers
#[derive(Debug, Clone)]
pub enum GameBroadcast {
    Match(MatchMsg),
    Ended { tick: u64 },
}

/// Kickoff spot for the `index`-th bot. Even indices line up in the -X
/// half facing +X, odd ones mirror them.
fn kickoff_spot(index: usize) -> (Vec3, Vec3) {
    let side = if index % 2 == 0 { -1.0 } else { 1.0 };
    let rank = (index / 2) as f64;
    let lane = if (index / 2) % 2 == 0 { rank } else { -rank };
    let y = lane * KICKOFF_SPACING * 0.5;
    (
        vec3(side * (KICKOFF_SPACING + rank * KICKOFF_SPACING), y, 0.0),
        vec3(-side, 0.0, 0.0),
    )
}

/// Run the main game loop. Owns all match state.
pub async fn run_game_loop(
    mut cmd_rx: mpsc::Receiver<GameCommand>,
    broadcast_tx: broadcast::Sender<GameBroadcast>,
    config: SimConfig,
) {
    let mut state = MatchState::new(&config);
    let mut bot_rng = ChaCha8Rng::seed_from_u64(config.rng_seed.wrapping_add(1));
    let mut bots = BotManager::new();

    let events_tx = broadcast_tx.clone();
    state.subscribe(move |event| {
        let _ = events_tx.send(GameBroadcast::Match(event_msg(event)));
    });

    for index in 0..config.bot_count {
        let (position, forward) = kickoff_spot(index);
        let id = state.add_player(position, forward);
        if let Some(player) = state.player(id) {
            bots.add_bot(player, &mut bot_rng);
        }
    }

    let dt = config.tick_dt();
    let snapshot_every_n = (config.tick_rate_hz / config.snapshot_rate_hz).max(1) as u64;

    let mut tick_interval = tokio::time::interval(Duration::from_secs_f64(dt));
    tick_interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    tracing::info!(
        "Match started: {} Hz, {} bots, seed {}",
        config.tick_rate_hz,
        config.bot_count,
        config.rng_seed
    );

    loop {
        tokio::select! {
            _ = tick_interval.tick() => {
                for (id, decision) in bots.tick(dt, &state, &mut bot_rng) {
                    match decision {
                        BotDecision::Move(input) => {
                            state.apply_input(id, input);
                        }
                        BotDecision::Shoot { target, power } => {
                            state.shoot_ball(target, power);
                        }
                        BotDecision::Pass { target, power } => {
                            state.pass_ball(target, power);
                        }
                    }
                }

                state.tick(dt);

                if state.tick_count() % snapshot_every_n == 0 {
                    let _ = broadcast_tx.send(GameBroadcast::Match(MatchMsg::Snapshot(
                        state.get_snapshot(),
                    )));
                }

                if let Some(limit) = config.match_duration_secs {
                    if state.elapsed() >= limit {
                        tracing::info!("Match time up after {:.2}s", state.elapsed());
                        break;
                    }
                }
            }

            cmd = cmd_rx.recv() => {
                match cmd {
                    Some(GameCommand::Shutdown) | None => break,
                    Some(cmd) => handle_command(&mut state, &mut bots, cmd),
                }
            }
        }
    }

    let tick = state.tick_count();
    state.destroy();
    let _ = broadcast_tx.send(GameBroadcast::Ended { tick });
    tracing::info!("Game loop ended");
}

fn handle_command(state: &mut MatchState, bots: &mut BotManager, cmd: GameCommand) {
    match cmd {
        GameCommand::PlayerJoin {
            position,
            forward,
            response,
        } => {
            let id = state.add_player(position, forward);
            let _ = response.send(id);
        }
        GameCommand::PlayerLeave { id } => {
            if bots.remove_bot(id) {
                tracing::info!("Bot {} removed", id);
            }
            state.remove_player(id);
        }
        GameCommand::Input { id, input } => {
            state.apply_input(id, input);
        }
        GameCommand::Kick { direction, power } => {
            state.kick_ball(direction, power);
        }
        GameCommand::Pass { target, power } => {
            state.pass_ball(target, power);
        }
        GameCommand::Shoot { target, power } => {
            state.shoot_ball(target, power);
        }
        GameCommand::ResetBall { position } => {
            state.reset_ball_position(position);
        }
        GameCommand::Snapshot { response } => {
            let _ = response.send(state.get_snapshot());
        }
        GameCommand::Shutdown => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kickoff_spots_face_the_far_end() {
        for index in 0..6 {
            let (pos, forward) = kickoff_spot(index);
            if index % 2 == 0 {
                assert!(pos.x < 0.0);
                assert_eq!(forward, vec3(1.0, 0.0, 0.0));
            } else {
                assert!(pos.x > 0.0);
                assert_eq!(forward, vec3(-1.0, 0.0, 0.0));
            }
        }
    }

    #[test]
    fn kickoff_spots_are_distinct() {
        let spots: Vec<Vec3> = (0..8).map(|i| kickoff_spot(i).0).collect();
        for (i, a) in spots.iter().enumerate() {
            for b in &spots[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }
}
