//! Clepsydra - liquid countdown simulation core
//!
//! An animated water surface that represents countdown progress: a droplet
//! stream fills a reservoir as time elapses, ripples propagate over a 1-D
//! wave-equation heightfield, and a whirlpool drains everything on
//! completion.
//!
//! This crate is framework-agnostic - it handles simulation only. The
//! embedding application owns timer bookkeeping, scheduling and drawing:
//! it calls [`Simulation::update`] once per display frame and reads
//! [`Simulation::snapshot`] to paint pixels.

pub mod config;
pub mod droplet;
pub mod emitter;
pub mod physics;
pub mod reservoir;
pub mod simulation;
pub mod wave;
pub mod whirlpool;

pub use config::SimConfig;
pub use droplet::{Droplet, Droplets};
pub use emitter::DropletEmitter;
pub use reservoir::Reservoir;
pub use simulation::{ParamError, Simulation, Snapshot};
pub use wave::SurfaceWaveField;
pub use whirlpool::WhirlpoolDrain;
