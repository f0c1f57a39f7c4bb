/// One frame of controller input for a player.
#[derive(Debug, Clone, Copy, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerInput {
    /// -1..1, world +X
    pub forward: f64,
    /// -1..1, world +Y
    pub strafe: f64,
    pub kick: bool,
    pub possess: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputAction {
    Kick,
    AttemptPossession,
}

/// Turns held buttons into one action per press.
#[derive(Debug, Clone, Copy, Default)]
pub struct InputState {
    pub forward: f64,
    pub strafe: f64,
    kick_was_pressed: bool,
    possess_was_pressed: bool,
}

impl InputState {
    pub fn update(&mut self, input: PlayerInput) -> Vec<InputAction> {
        self.forward = if input.forward.is_finite() {
            input.forward.clamp(-1.0, 1.0)
        } else {
            0.0
        };
        self.strafe = if input.strafe.is_finite() {
            input.strafe.clamp(-1.0, 1.0)
        } else {
            0.0
        };

        let mut actions = Vec::new();
        if input.possess && !self.possess_was_pressed {
            actions.push(InputAction::AttemptPossession);
        }
        if input.kick && !self.kick_was_pressed {
            actions.push(InputAction::Kick);
        }
        self.kick_was_pressed = input.kick;
        self.possess_was_pressed = input.possess;
        actions
    }
}
