pub use football_shared::config::{BallConfig, PitchConfig, PlayerConfig};

/// Simulation configuration
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SimConfig {
    pub tick_rate_hz: u32,
    pub snapshot_rate_hz: u32,
    pub rng_seed: u64,
    pub bot_count: usize,
    /// Stop the match loop after this long. None runs until shutdown.
    pub match_duration_secs: Option<f64>,
    pub ball: BallConfig,
    pub player: PlayerConfig,
    pub pitch: PitchConfig,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            tick_rate_hz: 60,
            snapshot_rate_hz: 10,
            rng_seed: 42,
            bot_count: 4,
            match_duration_secs: None,
            ball: BallConfig::default(),
            player: PlayerConfig::default(),
            pitch: PitchConfig::default(),
        }
    }
}

impl SimConfig {
    /// Read a JSON config file. Missing fields keep their defaults.
    pub fn from_json_file(path: &str) -> Result<Self, String> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| format!("cannot read config {}: {}", path, e))?;
        serde_json::from_str(&text).map_err(|e| format!("invalid config {}: {}", path, e))
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.tick_rate_hz == 0 {
            return Err("tick_rate_hz must be > 0".to_string());
        }
        if self.snapshot_rate_hz == 0 || self.snapshot_rate_hz > self.tick_rate_hz {
            return Err("snapshot_rate_hz must be within 1..=tick_rate_hz".to_string());
        }
        if let Some(secs) = self.match_duration_secs {
            if !secs.is_finite() || secs <= 0.0 {
                return Err("match_duration_secs must be finite and > 0".to_string());
            }
        }
        self.ball.validate()?;
        self.player.validate()?;
        self.pitch.validate()?;
        Ok(())
    }

    pub fn tick_dt(&self) -> f64 {
        1.0 / self.tick_rate_hz as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(SimConfig::default().validate().is_ok());
    }

    #[test]
    fn snapshot_faster_than_tick_invalid() {
        let config = SimConfig {
            tick_rate_hz: 30,
            snapshot_rate_hz: 60,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn nested_ball_config_is_checked() {
        let mut config = SimConfig::default();
        config.ball.max_speed = -1.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config: SimConfig =
            serde_json::from_str(r#"{"botCount": 0, "ball": {"possessionRadius": 90.0}}"#).unwrap();
        assert_eq!(config.bot_count, 0);
        assert_eq!(config.ball.possession_radius, 90.0);
        assert_eq!(config.ball.max_speed, 3000.0);
        assert_eq!(config.tick_rate_hz, 60);
    }
}
