//! Football ball simulation library.
//!
//! Ball physics, the possession protocol between ball and players, and the
//! kick/pass/shoot commands, plus the match loop that drives them.

pub use football_shared::vec3;

pub mod ball;
pub mod bot;
pub mod commands;
pub mod config;
pub mod constants;
pub mod events;
pub mod game_loop;
pub mod input;
pub mod motion;
pub mod physics;
pub mod player;
pub mod possession;
pub mod protocol;
pub mod scene;
pub mod scheduler;
pub mod state;
