//! 1-D surface wave heightfield.
//!
//! The visible water surface is a row of height offsets evolved by an
//! explicit discretisation of the wave equation `∂²h/∂t² = c²·∂²h/∂x²`.
//! Droplet impacts and the whirlpool sink perturb it through localized
//! velocity impulses; the renderer samples it to draw the ripple line.
//!
//! Offsets are positive-up: a crest has positive `h`, and the surface line
//! at scene coordinate x sits at `base_surface_y - sample(x)` in y-down
//! screen space. A restoring spring anchors the offsets to the flat
//! waterline, so impulses of either sign leave only transient ripples.

use crate::physics::{MIN_WAVE_SAMPLES, PIXELS_PER_SAMPLE, WAVE_RESTORE};

/// Gaussian impulse footprint half-width, in samples.
const IMPULSE_RADIUS: i32 = 3;

/// Gaussian sigma for impulse weighting, in samples.
const IMPULSE_SIGMA: f32 = 1.3;

/// Discretised wave field over the scene width.
///
/// Invariant: `h.len() == v.len()` at all times after any mutation.
/// Boundary samples (0 and N-1) are pinned: the Laplacian never updates
/// them and impulses never target them, so no energy enters at the edges.
pub struct SurfaceWaveField {
    /// Height offsets, px (positive = crest).
    h: Vec<f32>,
    /// Vertical velocities, px/s.
    v: Vec<f32>,
    /// Scene width covered by the samples, px.
    width: f32,
    /// Stiffness `c²/dx²`, 1/s².
    stiffness: f32,
    /// Exponential velocity damping rate, 1/s.
    damping: f32,
    /// Scratch buffer for the smoothing blur (avoids per-frame allocation).
    scratch: Vec<f32>,
}

impl SurfaceWaveField {
    pub fn new(width: f32, samples: usize, stiffness: f32, damping: f32) -> Self {
        let n = samples.max(MIN_WAVE_SAMPLES);
        Self {
            h: vec![0.0; n],
            v: vec![0.0; n],
            width: width.max(1.0),
            stiffness,
            damping,
            scratch: vec![0.0; n],
        }
    }

    /// Sample count appropriate for a scene width.
    pub fn samples_for_width(width: f32) -> usize {
        if !width.is_finite() || width <= 0.0 {
            return MIN_WAVE_SAMPLES;
        }
        ((width / PIXELS_PER_SAMPLE).ceil() as usize).max(MIN_WAVE_SAMPLES)
    }

    pub fn len(&self) -> usize {
        self.h.len()
    }

    pub fn is_empty(&self) -> bool {
        self.h.is_empty()
    }

    /// The ordered height offsets, for drawing the ripple line.
    pub fn offsets(&self) -> &[f32] {
        &self.h
    }

    /// Largest absolute offset. Diagnostic/test helper.
    pub fn max_offset(&self) -> f32 {
        self.h.iter().fold(0.0f32, |m, &x| m.max(x.abs()))
    }

    /// Advance the field by one explicit timestep.
    ///
    /// `dt` must already be clamped by the caller (see `physics::MAX_DT`);
    /// the scheme is only stable for bounded timesteps.
    pub fn step(&mut self, dt: f32) {
        let n = self.h.len();
        if n < 3 {
            return;
        }

        // Velocity from curvature plus a restoring spring toward the flat
        // waterline (interior samples only, edges are pinned). The spring
        // keeps the field mean anchored at zero: the Laplacian and the blur
        // preserve the mean, so without it the net-negative impact impulses
        // would sink the whole surface instead of rippling it.
        for i in 1..n - 1 {
            let lap = self.h[i - 1] + self.h[i + 1] - 2.0 * self.h[i];
            self.v[i] += (self.stiffness * lap - WAVE_RESTORE * self.h[i]) * dt;
        }

        // Exponential damping, then position update.
        let decay = (-self.damping * dt).exp();
        for i in 1..n - 1 {
            self.v[i] *= decay;
            self.h[i] += self.v[i] * dt;
        }

        // Single-pass smoothing blur suppresses high-frequency numerical
        // noise. Weighted average with neighbors, edges untouched.
        self.scratch.copy_from_slice(&self.h);
        for i in 1..n - 1 {
            self.h[i] =
                0.25 * self.scratch[i - 1] + 0.5 * self.scratch[i] + 0.25 * self.scratch[i + 1];
        }
    }

    /// Add a Gaussian-weighted velocity bump centered at scene coordinate x.
    ///
    /// Positive strength lifts the surface, negative pulls it down (impacts
    /// and the whirlpool sink both use negative strengths).
    pub fn inject_impulse(&mut self, x: f32, strength: f32) {
        let n = self.h.len();
        if n < 3 || self.width <= 0.0 || !x.is_finite() || !strength.is_finite() {
            return;
        }

        let center = (x.clamp(0.0, self.width) / self.width * (n - 1) as f32).round() as i32;
        for off in -IMPULSE_RADIUS..=IMPULSE_RADIUS {
            let i = center + off;
            if i <= 0 || i >= (n - 1) as i32 {
                continue;
            }
            let w = (-(off * off) as f32 / (2.0 * IMPULSE_SIGMA * IMPULSE_SIGMA)).exp();
            self.v[i as usize] += strength * w;
        }
    }

    /// Linearly interpolated height offset at an arbitrary scene x.
    ///
    /// Degenerate geometry (empty field, zero width, non-finite x) yields
    /// 0.0 rather than propagating NaN into callers.
    pub fn sample(&self, x: f32) -> f32 {
        let n = self.h.len();
        if n == 0 || self.width <= 0.0 || !x.is_finite() {
            return 0.0;
        }
        if n == 1 {
            return self.h[0];
        }

        let t = x.clamp(0.0, self.width) / self.width * (n - 1) as f32;
        let i = (t.floor() as usize).min(n - 2);
        let frac = t - i as f32;
        self.h[i] * (1.0 - frac) + self.h[i + 1] * frac
    }

    /// Resample the field onto a new width and sample count, preserving the
    /// overall wave shape via linear interpolation.
    pub fn resize(&mut self, new_width: f32, new_samples: usize) {
        if new_width.is_finite() && new_width > 0.0 {
            self.width = new_width;
        }
        let new_n = new_samples.max(MIN_WAVE_SAMPLES);
        if new_n == self.h.len() {
            return;
        }
        self.h = resample(&self.h, new_n);
        self.v = resample(&self.v, new_n);
        self.scratch = vec![0.0; new_n];
    }

    /// Flatten the field (zero heights and velocities).
    pub fn still(&mut self) {
        self.h.fill(0.0);
        self.v.fill(0.0);
    }

    #[cfg(test)]
    pub(crate) fn set_offsets(&mut self, values: &[f32]) {
        assert_eq!(values.len(), self.h.len());
        self.h.copy_from_slice(values);
    }
}

/// Resample a sequence onto `new_n` positions by linear interpolation over
/// the normalized index fraction.
fn resample(src: &[f32], new_n: usize) -> Vec<f32> {
    let old_n = src.len();
    if old_n == 0 {
        return vec![0.0; new_n];
    }
    if old_n == 1 || new_n == 1 {
        return vec![src[0]; new_n];
    }
    (0..new_n)
        .map(|j| {
            let t = j as f32 / (new_n - 1) as f32 * (old_n - 1) as f32;
            let i = (t.floor() as usize).min(old_n - 2);
            let frac = t - i as f32;
            src[i] * (1.0 - frac) + src[i + 1] * frac
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::{MAX_DT, WAVE_DAMPING, WAVE_STIFFNESS};

    fn field(width: f32, n: usize) -> SurfaceWaveField {
        SurfaceWaveField::new(width, n, WAVE_STIFFNESS, WAVE_DAMPING)
    }

    #[test]
    fn lengths_match_after_mutations() {
        let mut f = field(500.0, 128);
        f.inject_impulse(250.0, -10.0);
        f.step(1.0 / 60.0);
        f.resize(1000.0, 256);
        assert_eq!(f.offsets().len(), 256);
        f.resize(200.0, 10); // below minimum, must clamp up
        assert_eq!(f.len(), MIN_WAVE_SAMPLES);
    }

    #[test]
    fn sample_interpolates_between_neighbors() {
        let mut f = field(100.0, 101); // dx = 1 px
        let mut h = vec![0.0; 101];
        h[50] = 4.0;
        h[51] = 8.0;
        f.set_offsets(&h);
        let mid = f.sample(50.5);
        assert!((mid - 6.0).abs() < 1e-4, "got {mid}");
    }

    #[test]
    fn sample_guards_degenerate_input() {
        let f = field(500.0, 128);
        assert_eq!(f.sample(f32::NAN), 0.0);
        assert_eq!(f.sample(f32::INFINITY), 0.0);
        // Out of range clamps rather than extrapolating.
        assert_eq!(f.sample(-50.0), 0.0);
        assert_eq!(f.sample(5000.0), 0.0);
    }

    #[test]
    fn impulse_is_local_and_skips_boundaries() {
        let mut f = field(500.0, 128);
        f.inject_impulse(0.0, -50.0);
        f.inject_impulse(500.0, -50.0);
        // Edge samples are pinned: one step later they are still flat.
        f.step(MAX_DT);
        assert_eq!(f.offsets()[0], 0.0);
        assert_eq!(f.offsets()[127], 0.0);
    }

    #[test]
    fn impulse_ripples_then_decays() {
        let mut f = field(500.0, 128);
        f.inject_impulse(250.0, -40.0);
        f.step(1.0 / 60.0);
        let early = f.max_offset();
        assert!(early > 0.0);

        // A few seconds of damping flattens the surface back out.
        for _ in 0..600 {
            f.step(1.0 / 60.0);
        }
        assert!(f.max_offset() < early * 0.05, "field did not calm down");
    }

    #[test]
    fn sustained_impacts_do_not_sink_the_surface() {
        let mut f = field(500.0, 128);
        let mean = |f: &SurfaceWaveField| f.offsets().iter().sum::<f32>() / f.len() as f32;

        // A minute of steady downward impacts, like a fill stream. The
        // restoring spring must hold the mean near the flat waterline
        // instead of letting the whole surface recede.
        for i in 0..3600 {
            if i % 2 == 0 {
                f.inject_impulse(100.0 + (i % 300) as f32, -40.0);
            }
            f.step(1.0 / 60.0);
        }
        let under_load = mean(&f);
        assert!(
            under_load.abs() < 5.0,
            "surface drifted to mean {under_load} under sustained impacts"
        );

        // Impacts stop; the surface settles back flat.
        for _ in 0..600 {
            f.step(1.0 / 60.0);
        }
        let settled = mean(&f);
        assert!(settled.abs() < 0.5, "surface never recovered, mean {settled}");
    }

    #[test]
    fn step_stays_finite_at_max_dt() {
        let mut f = field(500.0, 128);
        f.inject_impulse(250.0, -MAX_DT.recip()); // large kick
        for _ in 0..400 {
            f.step(MAX_DT);
        }
        assert!(f.offsets().iter().all(|h| h.is_finite()));
        assert!(f.max_offset() < 1e4);
    }

    #[test]
    fn resize_round_trip_preserves_shape() {
        let n0 = 128;
        let mut f = field(500.0, n0);
        let shape: Vec<f32> = (0..n0)
            .map(|i| (i as f32 / (n0 - 1) as f32 * std::f32::consts::TAU).sin() * 5.0)
            .collect();
        f.set_offsets(&shape);

        f.resize(500.0, 200);
        f.resize(500.0, n0);

        for (a, b) in f.offsets().iter().zip(shape.iter()) {
            assert!((a - b).abs() < 0.25, "shape drifted: {a} vs {b}");
        }
    }

    #[test]
    fn still_flattens_everything() {
        let mut f = field(500.0, 128);
        f.inject_impulse(100.0, -30.0);
        f.step(MAX_DT);
        f.still();
        assert_eq!(f.max_offset(), 0.0);
    }
}
