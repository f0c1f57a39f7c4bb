use serde::{Deserialize, Serialize};

/// Protocol version - increment when making breaking changes.
pub const PROTOCOL_VERSION: u32 = 1;

/// Messages published to match observers (UI, audio, stats, AI).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum MatchMsg {
    #[serde(rename = "possession_changed")]
    PossessionChanged(PossessionChangedMsg),
    #[serde(rename = "ball_kicked")]
    BallKicked(BallKickedMsg),
    #[serde(rename = "ball_state")]
    BallState(BallStateMsg),
    #[serde(rename = "snapshot")]
    Snapshot(SnapshotMsg),
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PossessionChangedMsg {
    /// None when the ball became free
    pub owner_id: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BallKickedMsg {
    pub direction: [f64; 3],
    pub power: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BallStateMsg {
    pub in_air: bool,
    pub rolling: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotMsg {
    pub protocol_version: u32,
    pub tick: u64,
    pub ball: BallWire,
    pub players: Vec<PlayerWire>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BallWire {
    pub pos: [f64; 3],
    pub vel: [f64; 3],
    pub owner_id: Option<u32>,
    pub in_air: bool,
    pub rolling: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PlayerWire {
    pub id: u32,
    pub pos: [f64; 3],
    #[serde(default)]
    pub has_ball: bool,
}

// === Conversion helpers ===

/// Round to 2 decimal places (sub-millimetre, keeps snapshots compact)
#[inline]
pub fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

#[inline]
pub fn round_array(v: [f64; 3]) -> [f64; 3] {
    [round2(v[0]), round2(v[1]), round2(v[2])]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn possession_changed_uses_type_tag() {
        let msg = MatchMsg::PossessionChanged(PossessionChangedMsg { owner_id: Some(7) });
        let json = serde_json::to_string(&msg).unwrap();
        assert!(json.contains("\"type\":\"possession_changed\""));
        assert!(json.contains("\"ownerId\":7"));
    }

    #[test]
    fn released_ball_serializes_null_owner() {
        let msg = MatchMsg::PossessionChanged(PossessionChangedMsg { owner_id: None });
        let json = serde_json::to_string(&msg).unwrap();
        assert!(json.contains("\"ownerId\":null"));
    }

    #[test]
    fn snapshot_roundtrip() {
        let msg = MatchMsg::Snapshot(SnapshotMsg {
            protocol_version: PROTOCOL_VERSION,
            tick: 120,
            ball: BallWire {
                pos: [10.0, -4.5, 22.0],
                vel: [0.0, 0.0, 0.0],
                owner_id: Some(3),
                in_air: false,
                rolling: false,
            },
            players: vec![PlayerWire {
                id: 3,
                pos: [-90.0, -4.5, 0.0],
                has_ball: true,
            }],
        });
        let json = serde_json::to_string(&msg).unwrap();
        assert!(json.contains("\"type\":\"snapshot\""));
        assert!(json.contains("\"protocolVersion\":1"));
        let parsed: MatchMsg = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, msg);
    }

    #[test]
    fn player_wire_has_ball_defaults_false() {
        let p: PlayerWire = serde_json::from_str(r#"{"id":1,"pos":[0.0,0.0,0.0]}"#).unwrap();
        assert!(!p.has_ball);
    }

    #[test]
    fn round2_rounds() {
        assert_eq!(round2(1.23456), 1.23);
        assert_eq!(round2(-1.239), -1.24);
    }
}
