/// Ball tuning. Distances in centimetres, speeds in cm/s, times in seconds.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct BallConfig {
    pub radius: f64,
    pub mass: f64,
    /// Fraction of speed kept after a bounce
    pub bounce_damping: f64,
    pub rolling_friction: f64,
    pub max_speed: f64,
    pub possession_radius: f64,
    /// Ball must be slower than this to be picked up
    pub pickup_speed_limit: f64,
    pub carry_forward_offset: f64,
    /// Height of the carried ball's centre above the owner's position.
    /// Player positions sit on the ground, so the default is one radius and
    /// the ball rolls at the owner's feet rather than floating at hip height.
    pub carry_height_offset: f64,
    pub state_poll_interval: f64,
    pub possession_scan_interval: f64,
    /// How long a kicked ball refuses new owners
    pub kick_pickup_cooldown: f64,
    pub gravity: f64,
}

impl Default for BallConfig {
    fn default() -> Self {
        Self {
            radius: 22.0,
            mass: 0.45,
            bounce_damping: 0.6,
            rolling_friction: 0.1,
            max_speed: 3000.0,
            possession_radius: 150.0,
            pickup_speed_limit: 200.0,
            carry_forward_offset: 100.0,
            carry_height_offset: 22.0,
            state_poll_interval: 0.1,
            possession_scan_interval: 0.2,
            kick_pickup_cooldown: 0.3,
            gravity: 981.0,
        }
    }
}

impl BallConfig {
    pub fn validate(&self) -> Result<(), String> {
        if !self.radius.is_finite() || self.radius <= 0.0 {
            return Err("radius must be finite and > 0".to_string());
        }
        if !self.mass.is_finite() || self.mass <= 0.0 {
            return Err("mass must be finite and > 0".to_string());
        }
        if !self.bounce_damping.is_finite() || !(0.0..=1.0).contains(&self.bounce_damping) {
            return Err("bounce_damping must be within [0, 1]".to_string());
        }
        if !self.rolling_friction.is_finite() || self.rolling_friction < 0.0 {
            return Err("rolling_friction must be finite and >= 0".to_string());
        }
        if !self.max_speed.is_finite() || self.max_speed <= 0.0 {
            return Err("max_speed must be finite and > 0".to_string());
        }
        if !self.possession_radius.is_finite() || self.possession_radius < 0.0 {
            return Err("possession_radius must be finite and >= 0".to_string());
        }
        if !self.pickup_speed_limit.is_finite() || self.pickup_speed_limit < 0.0 {
            return Err("pickup_speed_limit must be finite and >= 0".to_string());
        }
        if !self.carry_forward_offset.is_finite() || !self.carry_height_offset.is_finite() {
            return Err("carry offsets must be finite".to_string());
        }
        if !self.state_poll_interval.is_finite() || self.state_poll_interval <= 0.0 {
            return Err("state_poll_interval must be finite and > 0".to_string());
        }
        if !self.possession_scan_interval.is_finite() || self.possession_scan_interval <= 0.0 {
            return Err("possession_scan_interval must be finite and > 0".to_string());
        }
        if !self.kick_pickup_cooldown.is_finite() || self.kick_pickup_cooldown < 0.0 {
            return Err("kick_pickup_cooldown must be finite and >= 0".to_string());
        }
        if !self.gravity.is_finite() || self.gravity < 0.0 {
            return Err("gravity must be finite and >= 0".to_string());
        }
        Ok(())
    }
}

/// Player body and control tuning
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct PlayerConfig {
    pub radius: f64,
    pub height: f64,
    pub move_speed: f64,
    /// Power used when the kick button is pressed
    pub kick_power: f64,
    pub possession_sweep_distance: f64,
    pub possession_sweep_radius: f64,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            radius: 42.0,
            height: 180.0,
            move_speed: 600.0,
            kick_power: 1500.0,
            possession_sweep_distance: 200.0,
            possession_sweep_radius: 50.0,
        }
    }
}

impl PlayerConfig {
    pub fn validate(&self) -> Result<(), String> {
        if !self.radius.is_finite() || self.radius <= 0.0 {
            return Err("player radius must be finite and > 0".to_string());
        }
        if !self.height.is_finite() || self.height <= 0.0 {
            return Err("player height must be finite and > 0".to_string());
        }
        if !self.move_speed.is_finite() || self.move_speed < 0.0 {
            return Err("move_speed must be finite and >= 0".to_string());
        }
        if !self.kick_power.is_finite() || self.kick_power < 0.0 {
            return Err("kick_power must be finite and >= 0".to_string());
        }
        if !self.possession_sweep_distance.is_finite() || self.possession_sweep_distance < 0.0 {
            return Err("possession_sweep_distance must be finite and >= 0".to_string());
        }
        if !self.possession_sweep_radius.is_finite() || self.possession_sweep_radius < 0.0 {
            return Err("possession_sweep_radius must be finite and >= 0".to_string());
        }
        Ok(())
    }
}

/// Playing area, centred on the kickoff spot
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct PitchConfig {
    pub half_length: f64,
    pub half_width: f64,
}

impl Default for PitchConfig {
    fn default() -> Self {
        Self {
            half_length: 5250.0, // 105 m pitch
            half_width: 3400.0,  // 68 m pitch
        }
    }
}

impl PitchConfig {
    pub fn validate(&self) -> Result<(), String> {
        if !self.half_length.is_finite() || self.half_length <= 0.0 {
            return Err("half_length must be finite and > 0".to_string());
        }
        if !self.half_width.is_finite() || self.half_width <= 0.0 {
            return Err("half_width must be finite and > 0".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_configs_are_valid() {
        assert!(BallConfig::default().validate().is_ok());
        assert!(PlayerConfig::default().validate().is_ok());
        assert!(PitchConfig::default().validate().is_ok());
    }

    #[test]
    fn default_carry_keeps_ball_on_the_ground() {
        let config = BallConfig::default();
        assert_eq!(config.carry_height_offset, config.radius);
    }

    #[test]
    fn bounce_damping_above_one_invalid() {
        let config = BallConfig {
            bounce_damping: 1.5,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn zero_poll_interval_invalid() {
        let config = BallConfig {
            state_poll_interval: 0.0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn nan_max_speed_invalid() {
        let config = BallConfig {
            max_speed: f64::NAN,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let config: BallConfig = serde_json::from_str(r#"{"maxSpeed": 2500.0}"#).unwrap();
        assert_eq!(config.max_speed, 2500.0);
        assert_eq!(config.possession_radius, 150.0);
    }
}
