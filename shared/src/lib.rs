//! Types shared by the simulation core and its observers.

pub mod config;
pub mod protocol;
pub mod vec3;
