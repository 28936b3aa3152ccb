//! Droplet emission from the wobbling inflow stream.
//!
//! Emission is decoupled from frame rate with a fractional accumulator:
//! each tick banks `drops_per_second * dt` and spawns the whole part. The
//! spawn rate is fixed; the requested volume rate scales per-droplet volume
//! instead, which keeps droplet count and per-frame cost bounded.

use glam::Vec2;
use rand::Rng;

use crate::droplet::{Droplet, Droplets};
use crate::physics::{
    SPAWN_JITTER, STREAM_WOBBLE_FREQ, STREAM_WOBBLE_FREQ_SLOW, STREAM_WOBBLE_SPAN,
};

/// Per-droplet volume randomisation range. Mean is exactly 1.0 so the
/// expected emitted volume stays `rate * elapsed`.
const VOLUME_FACTOR_MIN: f32 = 0.65;
const VOLUME_FACTOR_MAX: f32 = 1.35;

/// Initial downward speed range for spawned droplets, px/s.
const SPAWN_SPEED_BASE: f32 = 40.0;
const SPAWN_SPEED_SPREAD: f32 = 40.0;

/// Horizontal spawn velocity spread, px/s.
const SPAWN_VX_SPREAD: f32 = 30.0;

/// Spawns droplets at a fixed rate with volumes that sum to the requested
/// inflow rate in expectation.
pub struct DropletEmitter {
    /// Target inflow, px²/s.
    volume_per_second: f32,
    /// Fixed droplet spawn rate, 1/s.
    drops_per_second: f32,
    /// Banked fractional droplets.
    spawn_accumulator: f32,
    /// Current wobbling x position of the visual inflow.
    stream_x: f32,
}

impl DropletEmitter {
    pub fn new(drops_per_second: f32, width: f32) -> Self {
        Self {
            volume_per_second: 0.0,
            drops_per_second: drops_per_second.max(0.0),
            spawn_accumulator: 0.0,
            stream_x: width * 0.5,
        }
    }

    /// Set the target inflow rate, px²/s.
    pub fn set_emission_rate(&mut self, volume_per_second: f32) {
        self.volume_per_second = volume_per_second.max(0.0);
    }

    pub fn emission_rate(&self) -> f32 {
        self.volume_per_second
    }

    /// Current inflow x position (for rendering the pour stream).
    pub fn stream_x(&self) -> f32 {
        self.stream_x
    }

    /// Expected volume of a single droplet.
    pub fn mean_drop_volume(&self) -> f32 {
        if self.drops_per_second <= 0.0 {
            return 0.0;
        }
        self.volume_per_second / self.drops_per_second
    }

    /// Spawn this tick's droplets into `droplets`.
    ///
    /// `phase` is the simulation's accumulated animation phase (seconds of
    /// simulated time); the stream wobble derives from it so replays with
    /// identical dt sequences are deterministic. Spawns beyond
    /// `max_droplets` are skipped.
    pub fn tick<R: Rng>(
        &mut self,
        dt: f32,
        phase: f32,
        width: f32,
        max_droplets: usize,
        droplets: &mut Droplets,
        rng: &mut R,
    ) {
        // Two incommensurate sine terms give an organic drift.
        let span = width * STREAM_WOBBLE_SPAN;
        self.stream_x = width * 0.5
            + span
                * (0.7 * (phase * STREAM_WOBBLE_FREQ).sin()
                    + 0.3 * (phase * STREAM_WOBBLE_FREQ_SLOW).sin());

        if self.volume_per_second <= 0.0 || self.drops_per_second <= 0.0 || width <= 0.0 {
            return;
        }

        self.spawn_accumulator += self.drops_per_second * dt;
        let count = self.spawn_accumulator.floor();
        self.spawn_accumulator -= count;

        let mean = self.mean_drop_volume();
        for _ in 0..count as usize {
            if droplets.len() >= max_droplets {
                // Backpressure: skip the remaining spawns this tick.
                break;
            }
            let volume = mean * rng.gen_range(VOLUME_FACTOR_MIN..VOLUME_FACTOR_MAX);
            let droplet = Droplet::new(
                Vec2::new(
                    (self.stream_x + (rng.gen::<f32>() - 0.5) * SPAWN_JITTER).clamp(0.0, width),
                    -(rng.gen::<f32>() * 12.0),
                ),
                Vec2::new(
                    (rng.gen::<f32>() - 0.5) * SPAWN_VX_SPREAD,
                    SPAWN_SPEED_BASE + rng.gen::<f32>() * SPAWN_SPEED_SPREAD,
                ),
                volume,
            );
            droplets.push(droplet);
        }
    }

    /// Drop banked fractional spawns and re-center the stream.
    pub fn reset(&mut self, width: f32) {
        self.spawn_accumulator = 0.0;
        self.stream_x = width * 0.5;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn rng() -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(1234)
    }

    #[test]
    fn fractional_accumulator_matches_rate() {
        let mut e = DropletEmitter::new(40.0, 500.0);
        e.set_emission_rate(1000.0);
        let mut drops = Droplets::new();
        let mut r = rng();

        // 120 ticks of 1/60 s = 2 s → expect 80 droplets exactly.
        for i in 0..120 {
            let phase = i as f32 / 60.0;
            e.tick(1.0 / 60.0, phase, 500.0, usize::MAX, &mut drops, &mut r);
        }
        assert_eq!(drops.len(), 80);
    }

    #[test]
    fn expected_volume_tracks_rate() {
        let mut e = DropletEmitter::new(40.0, 500.0);
        e.set_emission_rate(2500.0);
        let mut drops = Droplets::new();
        let mut r = rng();

        let seconds = 10.0;
        let dt = 1.0 / 60.0;
        let steps = (seconds / dt) as usize;
        for i in 0..steps {
            e.tick(dt, i as f32 * dt, 500.0, usize::MAX, &mut drops, &mut r);
        }

        let expected = 2500.0 * seconds;
        let emitted = drops.total_volume();
        let err = (emitted - expected).abs() / expected;
        assert!(err < 0.03, "emitted {emitted}, expected {expected}");
    }

    #[test]
    fn cap_is_never_exceeded() {
        let mut e = DropletEmitter::new(5000.0, 500.0);
        e.set_emission_rate(1000.0);
        let mut drops = Droplets::new();
        let mut r = rng();

        for i in 0..60 {
            e.tick(1.0 / 60.0, i as f32 / 60.0, 500.0, 32, &mut drops, &mut r);
            assert!(drops.len() <= 32);
        }
        assert_eq!(drops.len(), 32);
    }

    #[test]
    fn zero_rate_spawns_nothing() {
        let mut e = DropletEmitter::new(40.0, 500.0);
        let mut drops = Droplets::new();
        let mut r = rng();
        for i in 0..60 {
            e.tick(1.0 / 60.0, i as f32 / 60.0, 500.0, usize::MAX, &mut drops, &mut r);
        }
        assert!(drops.is_empty());
    }

    #[test]
    fn stream_wobbles_within_span() {
        let mut e = DropletEmitter::new(40.0, 500.0);
        e.set_emission_rate(100.0);
        let mut drops = Droplets::new();
        let mut r = rng();

        let mut min_x = f32::MAX;
        let mut max_x = f32::MIN;
        for i in 0..600 {
            let phase = i as f32 / 60.0;
            e.tick(1.0 / 60.0, phase, 500.0, usize::MAX, &mut drops, &mut r);
            min_x = min_x.min(e.stream_x());
            max_x = max_x.max(e.stream_x());
        }

        let span = 500.0 * STREAM_WOBBLE_SPAN;
        assert!(max_x <= 250.0 + span + 1e-3);
        assert!(min_x >= 250.0 - span - 1e-3);
        assert!(max_x - min_x > span * 0.5, "stream barely moved");
    }
}
