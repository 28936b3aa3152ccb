//! Falling droplets and their physics step.
//!
//! Each droplet carries a conserved volume contribution. On surface impact
//! the full volume transfers into the [`Reservoir`] and a velocity impulse
//! proportional to impact momentum dents the [`SurfaceWaveField`]. The
//! radius is cosmetic only and is never conserved.

use glam::Vec2;
use log::debug;

use crate::physics::{
    AIR_DRAG, GRAVITY, IMPACT_IMPULSE_SCALE, KILL_MARGIN, MAX_DROPLET_RADIUS, MAX_IMPACT_IMPULSE,
    MIN_DROPLET_RADIUS, WALL_RESTITUTION,
};
use crate::reservoir::Reservoir;
use crate::wave::SurfaceWaveField;

/// Visual radius for a droplet volume: the radius of a disc of that area,
/// clamped to a drawable range. Monotonic in volume, purely cosmetic.
pub fn radius_for_volume(volume: f32) -> f32 {
    (volume.max(0.0) / std::f32::consts::PI)
        .sqrt()
        .clamp(MIN_DROPLET_RADIUS, MAX_DROPLET_RADIUS)
}

/// A transient falling droplet.
#[derive(Clone, Copy, Debug)]
pub struct Droplet {
    /// Position in scene coordinates (y grows downward).
    pub position: Vec2,
    /// Velocity, px/s.
    pub velocity: Vec2,
    /// Cosmetic radius, px.
    pub radius: f32,
    /// Conserved volume contribution, px².
    pub volume: f32,
}

impl Droplet {
    pub fn new(position: Vec2, velocity: Vec2, volume: f32) -> Self {
        Self {
            position,
            velocity,
            radius: radius_for_volume(volume),
            volume,
        }
    }
}

/// The active droplet list. Exclusive owner of every in-flight droplet.
pub struct Droplets {
    pub list: Vec<Droplet>,
}

impl Droplets {
    pub fn new() -> Self {
        Self { list: Vec::new() }
    }

    pub fn len(&self) -> usize {
        self.list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Droplet> {
        self.list.iter()
    }

    pub fn clear(&mut self) {
        self.list.clear();
    }

    pub fn push(&mut self, droplet: Droplet) {
        self.list.push(droplet);
    }

    /// Sum of in-flight volume. Diagnostic/conservation helper.
    pub fn total_volume(&self) -> f32 {
        self.list.iter().map(|d| d.volume).sum()
    }

    /// Largest droplet speed, px/s. Diagnostic helper.
    pub fn max_speed(&self) -> f32 {
        self.list
            .iter()
            .map(|d| d.velocity.length())
            .fold(0.0f32, f32::max)
    }

    /// Rescale x positions proportionally after a viewport resize so
    /// droplets don't appear to teleport.
    pub fn rescale_x(&mut self, ratio: f32, new_width: f32) {
        if !ratio.is_finite() || ratio <= 0.0 {
            return;
        }
        for d in &mut self.list {
            d.position.x = (d.position.x * ratio).clamp(0.0, new_width);
        }
    }

    /// Advance every droplet by one timestep and resolve surface impacts.
    ///
    /// `base_surface_y` is the flat waterline in y-down scene coordinates;
    /// the dynamic surface at x is `base_surface_y - wave.sample(x)`.
    /// Impacting droplets transfer their volume into the reservoir and are
    /// removed in place (read/write compaction, no allocation).
    pub fn step(
        &mut self,
        dt: f32,
        width: f32,
        height: f32,
        base_surface_y: f32,
        wave: &mut SurfaceWaveField,
        reservoir: &mut Reservoir,
    ) {
        let drag = (-AIR_DRAG * dt).exp();
        let mut write = 0;

        for read in 0..self.list.len() {
            let mut d = self.list[read];

            d.velocity.y += GRAVITY * dt;
            d.velocity *= drag;
            d.position += d.velocity * dt;

            // Degenerate state guard: a non-finite droplet is dropped
            // rather than poisoning the field and reservoir.
            if !d.position.is_finite() || !d.velocity.is_finite() {
                debug!("discarding non-finite droplet (volume {})", d.volume);
                continue;
            }

            // Side walls reflect with energy loss.
            if d.position.x < d.radius {
                d.position.x = d.radius;
                d.velocity.x = -d.velocity.x * WALL_RESTITUTION;
            } else if d.position.x > width - d.radius {
                d.position.x = width - d.radius;
                d.velocity.x = -d.velocity.x * WALL_RESTITUTION;
            }
            d.position.x = d.position.x.clamp(0.0, width);

            // Surface impact: compare the droplet's lower edge against the
            // rippled surface.
            let surface_y = base_surface_y - wave.sample(d.position.x);
            if d.position.y + d.radius >= surface_y {
                reservoir.add_volume(d.volume);
                let strength = (d.velocity.length() * d.volume * IMPACT_IMPULSE_SCALE)
                    .min(MAX_IMPACT_IMPULSE);
                wave.inject_impulse(d.position.x, -strength);
                continue;
            }

            // Escape hatch: far past the bottom with no impact registered
            // (surface in an inconsistent state). Volume is lost; must be
            // rare under normal parameters.
            if d.position.y - d.radius > height + KILL_MARGIN {
                debug!(
                    "droplet escaped below scene (y {}, volume {})",
                    d.position.y, d.volume
                );
                continue;
            }

            self.list[write] = d;
            write += 1;
        }

        self.list.truncate(write);
    }
}

impl Default for Droplets {
    fn default() -> Self {
        Self::new()
    }
}
