//! Conversions from simulation state to the shared wire messages.

use crate::ball::Ball;
use crate::events::BallEvent;
use crate::physics::BallBody;
use crate::player::Player;
use football_shared::protocol::{
    round2, round_array, BallKickedMsg, BallStateMsg, BallWire, MatchMsg, PlayerWire,
    PossessionChangedMsg,
};

pub use football_shared::protocol::{SnapshotMsg, PROTOCOL_VERSION};

pub fn event_msg(event: &BallEvent) -> MatchMsg {
    match event {
        BallEvent::PossessionChanged { owner } => {
            MatchMsg::PossessionChanged(PossessionChangedMsg { owner_id: *owner })
        }
        BallEvent::Kicked { direction, power } => MatchMsg::BallKicked(BallKickedMsg {
            direction: round_array(direction.to_array()),
            power: round2(*power),
        }),
        BallEvent::StateChanged { in_air, rolling } => MatchMsg::BallState(BallStateMsg {
            in_air: *in_air,
            rolling: *rolling,
        }),
    }
}

pub fn ball_wire<B: BallBody>(ball: &Ball<B>) -> BallWire {
    BallWire {
        pos: round_array(ball.position().to_array()),
        vel: round_array(ball.velocity().to_array()),
        owner_id: ball.owner(),
        in_air: ball.is_in_air(),
        rolling: ball.is_rolling(),
    }
}

pub fn player_wire(player: &Player) -> PlayerWire {
    PlayerWire {
        id: player.id,
        pos: round_array(player.position.to_array()),
        has_ball: player.has_ball(),
    }
}
