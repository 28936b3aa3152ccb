//! Simulation configuration.
//!
//! Everything an embedder may want to tune lives here. The struct is
//! serde-derived so a host application can load it from RON/JSON; the core
//! itself never touches a file.

use serde::{Deserialize, Serialize};

use crate::physics;

/// Tunable parameters for a [`crate::Simulation`].
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SimConfig {
    /// Scene width in pixels.
    pub width: f32,
    /// Scene height in pixels.
    pub height: f32,

    /// Fixed droplet spawn rate. Bounds droplet count and per-frame cost
    /// regardless of the requested volume rate; per-droplet volume scales
    /// instead.
    pub drops_per_second: f32,

    /// Hard cap on simultaneously active droplets. Spawns beyond the cap
    /// are skipped (backpressure, not an error).
    pub max_droplets: usize,

    /// Time window for the completion drain, seconds. The drain rate is
    /// derived from the reservoir volume at activation so the reservoir
    /// empties in exactly this long.
    pub drain_duration: f32,

    /// Wave equation stiffness, 1/s². See [`physics::WAVE_STIFFNESS`].
    pub wave_stiffness: f32,
    /// Wave velocity damping rate, 1/s.
    pub wave_damping: f32,

    /// Seed for the internal RNG. Two simulations with the same config and
    /// the same dt sequence evolve identically.
    pub seed: u64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
            drops_per_second: 40.0,
            max_droplets: 256,
            drain_duration: 2.2,
            wave_stiffness: physics::WAVE_STIFFNESS,
            wave_damping: physics::WAVE_DAMPING,
            seed: 0x5EED,
        }
    }
}

impl SimConfig {
    /// Convenience constructor for the common case of sizing only.
    pub fn with_size(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }
}
