//! Conserved water volume and derived fill height.
//!
//! The reservoir is the single source of truth for how much water exists.
//! Droplet impacts add volume, the whirlpool withdraws it; nothing mutates
//! `volume` directly from outside this module.

/// Conserved-volume accumulator.
///
/// Volume is in px² (1-D scene: volume = width × height). Invariant:
/// `0 ≤ volume ≤ target_volume()` whenever draining mode is off.
#[derive(Clone, Debug)]
pub struct Reservoir {
    volume: f32,
    target_height: f32,
    width: f32,
    /// While true, `add_volume` skips the target clamp. Engaged for the
    /// whirlpool phase, where the target ceiling is irrelevant.
    draining: bool,
}

impl Reservoir {
    pub fn new(width: f32) -> Self {
        Self {
            volume: 0.0,
            target_height: 0.0,
            width: width.max(0.0),
            draining: false,
        }
    }

    /// Set the fill target. `target_volume` becomes `width * height`.
    pub fn set_target(&mut self, height: f32, width: f32) {
        debug_assert!(height >= 0.0 && width >= 0.0);
        self.target_height = height.max(0.0);
        self.width = width.max(0.0);
        if !self.draining {
            self.volume = self.volume.min(self.target_volume());
        }
    }

    /// Change scene width only, keeping the target height. Used on resize.
    pub fn set_width(&mut self, width: f32) {
        self.set_target(self.target_height, width);
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }

    pub fn target_height(&self) -> f32 {
        self.target_height
    }

    pub fn target_volume(&self) -> f32 {
        self.width * self.target_height
    }

    /// Fill fraction in [0, 1]; 0 when no target is set.
    pub fn fill_fraction(&self) -> f32 {
        let target = self.target_volume();
        if target <= 0.0 {
            return 0.0;
        }
        (self.volume / target).min(1.0)
    }

    /// Derived water height: `min(target_height, volume / width)`.
    /// Zero width yields zero height (no division by zero).
    pub fn height(&self) -> f32 {
        if self.width <= 0.0 {
            return 0.0;
        }
        (self.volume / self.width).min(self.target_height)
    }

    /// Add volume, clamped to the target unless draining mode is engaged.
    pub fn add_volume(&mut self, v: f32) {
        if !v.is_finite() || v <= 0.0 {
            return;
        }
        self.volume += v;
        if !self.draining {
            self.volume = self.volume.min(self.target_volume());
        }
    }

    /// Remove up to `amount`, flooring at zero.
    /// Returns the amount actually removed.
    pub fn withdraw(&mut self, amount: f32) -> f32 {
        if !amount.is_finite() || amount <= 0.0 {
            return 0.0;
        }
        let removed = self.volume.min(amount);
        self.volume -= removed;
        removed
    }

    /// Engage or release draining mode (target clamp bypass).
    pub fn set_draining(&mut self, draining: bool) {
        self.draining = draining;
        if !draining {
            self.volume = self.volume.min(self.target_volume());
        }
    }

    pub fn is_draining(&self) -> bool {
        self.draining
    }

    /// Empty the reservoir and leave draining mode.
    pub fn reset(&mut self) {
        self.volume = 0.0;
        self.draining = false;
    }
}
