/// Deceleration scale for rolling friction (cm/s², one g).
pub const FRICTION_GRAVITY: f64 = 981.0;

/// Below this speed the ball is considered stopped for friction purposes.
pub const FRICTION_EPSILON: f64 = 0.1;

/// Vertical speed above which the ball counts as airborne.
pub const AIRBORNE_VERTICAL_SPEED: f64 = 10.0;

/// Horizontal speed above which a grounded ball counts as rolling.
pub const ROLLING_SPEED: f64 = 10.0;

pub const BOUNCE_DAMPING_MIN: f64 = 0.1;
pub const BOUNCE_DAMPING_MAX: f64 = 1.0;

/// Every kick gets at least this much lift.
pub const KICK_MIN_LIFT: f64 = 100.0;
pub const KICK_LIFT_FACTOR: f64 = 0.3;

/// Pass distance at which the requested power is used as-is.
pub const PASS_REFERENCE_DISTANCE: f64 = 500.0;
pub const PASS_POWER_MIN: f64 = 300.0;
pub const PASS_POWER_MAX: f64 = 1200.0;

/// Jitter radius of a full-power shot.
pub const SHOT_MAX_JITTER: f64 = 0.2;

/// Landing slower than this settles the ball instead of bouncing it.
pub const GROUND_REST_SPEED: f64 = 50.0;

/// Tolerance when deciding whether the ball sits on the ground.
pub const GROUND_TOLERANCE: f64 = 0.5;
