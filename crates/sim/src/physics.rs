//! Unified physics constants for the countdown water simulation.
//!
//! All simulation modules should use these constants instead of defining
//! their own. This prevents drift between subsystems and makes tuning easier.
//! Spatial units are scene pixels, time is seconds.

/// Simulation gravity in pixels/s².
///
/// Used by:
/// - Droplet free fall (`Droplets::step`)
pub const GRAVITY: f32 = 900.0;

/// Air drag rate for falling droplets, applied as `v *= exp(-AIR_DRAG * dt)`.
///
/// Small on purpose: droplets should read as a fast stream, not mist.
pub const AIR_DRAG: f32 = 0.25;

/// Energy retained when a droplet reflects off a side wall.
pub const WALL_RESTITUTION: f32 = 0.55;

/// Droplets falling this far below the scene bottom without registering an
/// impact are discarded. Defensive path only; their volume is lost.
pub const KILL_MARGIN: f32 = 160.0;

/// Wave stiffness `c²/dx²` in 1/s² for the surface heightfield.
///
/// Expressed per-sample rather than per-pixel so the explicit integrator's
/// stability bound does not move when the field is resampled on resize.
/// Must satisfy `sqrt(WAVE_STIFFNESS) * MAX_DT < 1`.
pub const WAVE_STIFFNESS: f32 = 140.0;

/// Exponential velocity damping rate for the heightfield, in 1/s.
pub const WAVE_DAMPING: f32 = 1.1;

/// Restoring spring rate pulling heightfield offsets back to the flat
/// waterline, in 1/s².
///
/// The Laplacian and the smoothing blur both preserve the field's mean, so
/// without this term the net-negative impact and sink impulses would
/// displace the whole surface permanently instead of raising transient
/// ripples. Counts toward the stability bound together with the stiffness.
pub const WAVE_RESTORE: f32 = 30.0;

/// Minimum heightfield sample count. Resize never goes below this.
pub const MIN_WAVE_SAMPLES: usize = 96;

/// Scene pixels per heightfield sample above the minimum count.
pub const PIXELS_PER_SAMPLE: f32 = 4.0;

/// Converts droplet impact momentum (speed × volume) into a heightfield
/// velocity impulse.
pub const IMPACT_IMPULSE_SCALE: f32 = 0.002;

/// Upper bound on a single impact impulse, so one oversized droplet cannot
/// destabilise the field.
pub const MAX_IMPACT_IMPULSE: f32 = 60.0;

/// Largest timestep the integrators will accept, in seconds.
///
/// Anything bigger (a backgrounded tab, a debugger pause) is clamped before
/// it reaches the wave solver or the droplet integrator. This is a stability
/// requirement, not a tuning knob.
pub const MAX_DT: f32 = 0.05;

/// Whirlpool sink impulse per second at full strength.
pub const SINK_IMPULSE_SCALE: f32 = 90.0;

/// Whirlpool strength ramp rate, in 1/s.
pub const WHIRLPOOL_RAMP: f32 = 1.4;

/// Whirlpool strength cap.
pub const WHIRLPOOL_STRENGTH_CAP: f32 = 1.0;

/// Whirlpool strength at the moment draining starts.
pub const WHIRLPOOL_INITIAL_STRENGTH: f32 = 0.2;

/// Horizontal wobble span of the inflow stream, as a fraction of scene width.
pub const STREAM_WOBBLE_SPAN: f32 = 0.06;

/// Primary and secondary wobble frequencies in rad/s of accumulated phase.
pub const STREAM_WOBBLE_FREQ: f32 = 2.1;
pub const STREAM_WOBBLE_FREQ_SLOW: f32 = 0.7;

/// Horizontal jitter applied to each spawn around the stream position, px.
pub const SPAWN_JITTER: f32 = 8.0;

/// Bounds on the cosmetic droplet radius, px.
pub const MIN_DROPLET_RADIUS: f32 = 1.5;
pub const MAX_DROPLET_RADIUS: f32 = 9.0;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wave_scheme_is_stable_at_max_dt() {
        // Explicit scheme stability: sqrt(k) * dt must stay below 1.
        assert!(WAVE_STIFFNESS.sqrt() * MAX_DT < 1.0);
        // The restoring spring stacks on the stiffest Laplacian mode
        // (eigenvalue 4k); the combined frequency must stay under 2/dt.
        assert!((4.0 * WAVE_STIFFNESS + WAVE_RESTORE).sqrt() * MAX_DT < 2.0);
    }
}
