//! Composition root for the countdown water simulation.
//!
//! Owns the heightfield, reservoir, emitter, droplets and whirlpool, and
//! advances them in a fixed order each `update(dt)`:
//!
//! 1. Emit droplets (suppressed while the whirlpool drains)
//! 2. Integrate droplets, resolving surface impacts
//! 3. Whirlpool withdrawal + sink impulse (if draining)
//! 4. Advance the wave field one timestep
//!
//! The simulation is a pure state transition of `(state, dt)`: no clocks,
//! no I/O, no drawing. Randomness comes from a seeded RNG and animation
//! phase accumulates from `dt`, so identical dt sequences replay
//! identically.

use std::fmt;

use glam::Vec2;
use log::{debug, warn};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::config::SimConfig;
use crate::droplet::{Droplet, Droplets};
use crate::emitter::DropletEmitter;
use crate::physics::MAX_DT;
use crate::reservoir::Reservoir;
use crate::wave::SurfaceWaveField;
use crate::whirlpool::WhirlpoolDrain;

/// Rejected control-operation input. Malformed-but-in-range values are
/// handled internally and never surface as errors; only genuinely invalid
/// calls land here.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ParamError {
    /// `set_target` called with a negative or non-finite height.
    InvalidTargetHeight,
    /// `set_emission_rate` called with a negative or non-finite rate.
    InvalidEmissionRate,
    /// `resize` called with non-positive or non-finite dimensions.
    InvalidDimensions,
}

impl fmt::Display for ParamError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidTargetHeight => write!(f, "target height must be finite and >= 0"),
            Self::InvalidEmissionRate => write!(f, "emission rate must be finite and >= 0"),
            Self::InvalidDimensions => write!(f, "scene dimensions must be finite and > 0"),
        }
    }
}

impl std::error::Error for ParamError {}

/// Read-only view of the state a renderer needs, borrowed from the
/// simulation after an `update`.
pub struct Snapshot<'a> {
    /// Current water height, px.
    pub fill_height: f32,
    /// Flat waterline in y-down scene coordinates (`scene_height - fill`).
    pub base_surface_y: f32,
    /// Ordered ripple offsets across the scene width (positive = crest).
    pub offsets: &'a [f32],
    /// Active falling droplets.
    pub droplets: &'a [Droplet],
    /// Current inflow x position.
    pub stream_x: f32,
    pub whirlpool_active: bool,
    pub whirlpool_center: Vec2,
    pub whirlpool_strength: f32,
    /// Accumulated animation phase, seconds of simulated time.
    pub phase: f32,
}

/// The countdown water simulation.
pub struct Simulation {
    pub wave: SurfaceWaveField,
    pub reservoir: Reservoir,
    pub emitter: DropletEmitter,
    pub droplets: Droplets,
    pub whirlpool: WhirlpoolDrain,

    config: SimConfig,
    width: f32,
    height: f32,
    /// Animation phase accumulated from dt. The only "clock" in the core.
    phase: f32,
    rng: ChaCha8Rng,
    frame: u64,
}

impl Simulation {
    pub fn new(config: SimConfig) -> Self {
        let width = sane_dimension(config.width, 800.0);
        let height = sane_dimension(config.height, 600.0);
        let samples = SurfaceWaveField::samples_for_width(width);
        Self {
            wave: SurfaceWaveField::new(width, samples, config.wave_stiffness, config.wave_damping),
            reservoir: Reservoir::new(width),
            emitter: DropletEmitter::new(config.drops_per_second, width),
            droplets: Droplets::new(),
            whirlpool: WhirlpoolDrain::new(config.drain_duration),
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            config,
            width,
            height,
            phase: 0.0,
            frame: 0,
        }
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    pub fn phase(&self) -> f32 {
        self.phase
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Set the fill target height in pixels.
    pub fn set_target(&mut self, height_px: f32) -> Result<(), ParamError> {
        if !height_px.is_finite() || height_px < 0.0 {
            return Err(ParamError::InvalidTargetHeight);
        }
        self.reservoir.set_target(height_px, self.width);
        Ok(())
    }

    /// Set the inflow rate in volume (px²) per second. Typically
    /// `target_volume / total_duration_seconds`.
    pub fn set_emission_rate(&mut self, volume_per_second: f32) -> Result<(), ParamError> {
        if !volume_per_second.is_finite() || volume_per_second < 0.0 {
            return Err(ParamError::InvalidEmissionRate);
        }
        self.emitter.set_emission_rate(volume_per_second);
        Ok(())
    }

    /// Begin the completion drain. Emission stops, the whirlpool spins up,
    /// and the reservoir empties over the configured drain duration.
    /// A no-op if already draining.
    pub fn start_draining(&mut self) {
        if self.whirlpool.is_active() {
            return;
        }
        debug!(
            "drain started: volume {} over {} s",
            self.reservoir.volume(),
            self.config.drain_duration
        );
        self.reservoir.set_draining(true);
        self.whirlpool
            .start(self.reservoir.volume(), self.width, self.height);
    }

    /// Advance one frame. `dt` is in seconds; values above the stability
    /// ceiling are clamped, non-finite or non-positive values are ignored.
    pub fn update(&mut self, dt: f32) {
        if !dt.is_finite() || dt <= 0.0 {
            return;
        }
        if dt > MAX_DT {
            warn!("clamping oversized timestep {dt} to {MAX_DT}");
        }
        let dt = dt.min(MAX_DT);

        self.frame += 1;
        self.phase += dt;

        // Inflow and drain are mutually exclusive in time.
        if !self.whirlpool.is_active() {
            self.emitter.tick(
                dt,
                self.phase,
                self.width,
                self.config.max_droplets,
                &mut self.droplets,
                &mut self.rng,
            );
        }

        let base_surface_y = self.height - self.reservoir.height();
        self.droplets.step(
            dt,
            self.width,
            self.height,
            base_surface_y,
            &mut self.wave,
            &mut self.reservoir,
        );

        if self.whirlpool.is_active() {
            self.whirlpool.tick(dt, &mut self.reservoir, &mut self.wave);
            if self.reservoir.volume() == 0.0 && self.droplets.is_empty() {
                debug!("drain complete after frame {}", self.frame);
                self.whirlpool.finish();
                self.reservoir.set_draining(false);
            }
        }

        self.wave.step(dt);
    }

    /// Clear all state back to empty/idle. The RNG is reseeded so a reset
    /// simulation replays identically for the same dt sequence.
    pub fn reset(&mut self) {
        self.reservoir.reset();
        self.droplets.clear();
        self.wave.still();
        self.whirlpool.finish();
        self.emitter.reset(self.width);
        self.rng = ChaCha8Rng::seed_from_u64(self.config.seed);
        self.phase = 0.0;
        self.frame = 0;
    }

    /// Viewport change. Rescales the wave field, droplet x positions and
    /// the target volume; preserves wave shape and the target height.
    pub fn resize(&mut self, width: f32, height: f32) -> Result<(), ParamError> {
        if !width.is_finite() || !height.is_finite() || width <= 0.0 || height <= 0.0 {
            return Err(ParamError::InvalidDimensions);
        }
        let ratio = width / self.width;
        self.width = width;
        self.height = height;

        self.wave
            .resize(width, SurfaceWaveField::samples_for_width(width));
        self.droplets.rescale_x(ratio, width);
        self.reservoir.set_width(width);
        self.whirlpool.rescale(ratio, height);
        Ok(())
    }

    /// Read-only render snapshot. Sample after each `update`.
    pub fn snapshot(&self) -> Snapshot<'_> {
        let fill_height = self.reservoir.height();
        Snapshot {
            fill_height,
            base_surface_y: self.height - fill_height,
            offsets: self.wave.offsets(),
            droplets: &self.droplets.list,
            stream_x: self.emitter.stream_x(),
            whirlpool_active: self.whirlpool.is_active(),
            whirlpool_center: self.whirlpool.center(),
            whirlpool_strength: self.whirlpool.strength(),
            phase: self.phase,
        }
    }

    // ------------------------------------------------------------------
    // Diagnostics - used by tests and the example binaries.
    // ------------------------------------------------------------------

    /// Total conserved volume currently accounted for: reservoir plus
    /// droplets in flight.
    pub fn total_volume(&self) -> f32 {
        self.reservoir.volume() + self.droplets.total_volume()
    }

    /// Reservoir volume normalized against the target volume.
    pub fn fill_fraction(&self) -> f32 {
        self.reservoir.fill_fraction()
    }

    pub fn droplet_count(&self) -> usize {
        self.droplets.len()
    }

    /// Largest droplet speed, px/s. CFL-style sanity probe.
    pub fn max_droplet_speed(&self) -> f32 {
        self.droplets.max_speed()
    }
}

fn sane_dimension(value: f32, fallback: f32) -> f32 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        fallback
    }
}
