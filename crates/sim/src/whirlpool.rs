//! Completion-phase whirlpool drain.
//!
//! A small state machine: Idle until `start` is called, then Draining
//! until the reservoir is empty and no droplets remain in flight (the
//! composition root makes that final check, since this module does not
//! see the droplet list).
//!
//! While draining, each tick withdraws `drain_rate * dt` from the
//! reservoir and injects a continuous Gaussian-weighted sink impulse into
//! the heightfield near the center, producing the persistent draw-down
//! that reads as a vortex.

use glam::Vec2;

use crate::physics::{
    SINK_IMPULSE_SCALE, WHIRLPOOL_INITIAL_STRENGTH, WHIRLPOOL_RAMP, WHIRLPOOL_STRENGTH_CAP,
};
use crate::reservoir::Reservoir;
use crate::wave::SurfaceWaveField;

/// Whirlpool drain state.
pub struct WhirlpoolDrain {
    active: bool,
    center: Vec2,
    /// Visual/sink intensity, ramps from the seed value to the cap.
    strength: f32,
    /// Volume withdrawn per second; fixed at activation.
    drain_rate: f32,
    /// Target wall time for a full drain, seconds.
    drain_duration: f32,
}

impl WhirlpoolDrain {
    pub fn new(drain_duration: f32) -> Self {
        Self {
            active: false,
            center: Vec2::ZERO,
            strength: 0.0,
            drain_rate: 0.0,
            drain_duration: drain_duration.max(0.1),
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn center(&self) -> Vec2 {
        self.center
    }

    pub fn strength(&self) -> f32 {
        self.strength
    }

    pub fn drain_rate(&self) -> f32 {
        self.drain_rate
    }

    /// Activate: center at bottom-center of the scene, seed strength, and
    /// fix the drain rate so `current_volume` empties in `drain_duration`.
    /// A no-op if already draining.
    pub fn start(&mut self, current_volume: f32, width: f32, height: f32) {
        if self.active {
            return;
        }
        self.active = true;
        self.center = Vec2::new(width * 0.5, height);
        self.strength = WHIRLPOOL_INITIAL_STRENGTH;
        self.drain_rate = current_volume.max(0.0) / self.drain_duration;
    }

    /// One draining tick: withdraw volume, ramp strength, sink the surface.
    pub fn tick(&mut self, dt: f32, reservoir: &mut Reservoir, wave: &mut SurfaceWaveField) {
        if !self.active {
            return;
        }
        let _ = reservoir.withdraw(self.drain_rate * dt);
        self.strength = (self.strength + WHIRLPOOL_RAMP * dt).min(WHIRLPOOL_STRENGTH_CAP);
        // Continuous sink: scaled by dt so the draw-down is frame-rate
        // independent. Negative strength pulls the surface down.
        wave.inject_impulse(self.center.x, -SINK_IMPULSE_SCALE * self.strength * dt);
    }

    /// Return to Idle. Called by the composition root once the reservoir
    /// is empty and no droplets remain.
    pub fn finish(&mut self) {
        self.active = false;
        self.strength = 0.0;
        self.drain_rate = 0.0;
    }

    /// Keep the center attached to bottom-center across a resize.
    pub fn rescale(&mut self, width_ratio: f32, new_height: f32) {
        if self.active && width_ratio.is_finite() && width_ratio > 0.0 {
            self.center.x *= width_ratio;
            self.center.y = new_height;
        }
    }
}
