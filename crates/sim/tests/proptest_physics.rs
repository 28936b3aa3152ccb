//! Property-based tests for droplet and heightfield behavior.
//!
//! Small case counts keep the suite fast while still sweeping the input
//! space far wider than hand-picked scenarios would.

use clepsydra_sim::droplet::{Droplet, Droplets};
use clepsydra_sim::physics::{WAVE_DAMPING, WAVE_STIFFNESS};
use clepsydra_sim::reservoir::Reservoir;
use clepsydra_sim::wave::SurfaceWaveField;
use glam::Vec2;
use proptest::prelude::*;

const DT: f32 = 1.0 / 60.0;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// A droplet driven at either side wall never leaves [0, width].
    #[test]
    fn droplet_never_exits_x_bounds(
        x0 in 0.0f32..500.0,
        y0 in -20.0f32..200.0,
        vx in -2_000.0f32..2_000.0,
        vy in -500.0f32..500.0,
        volume in 5.0f32..500.0,
    ) {
        let width = 500.0;
        let height = 600.0;
        let mut wave = SurfaceWaveField::new(width, 128, WAVE_STIFFNESS, WAVE_DAMPING);
        let mut reservoir = Reservoir::new(width);
        reservoir.set_target(300.0, width);

        let mut drops = Droplets::new();
        drops.push(Droplet::new(Vec2::new(x0, y0), Vec2::new(vx, vy), volume));

        for _ in 0..120 {
            drops.step(DT, width, height, height, &mut wave, &mut reservoir);
            for d in drops.iter() {
                prop_assert!(d.position.x >= 0.0 && d.position.x <= width,
                    "droplet escaped to x = {}", d.position.x);
            }
            if drops.is_empty() {
                break;
            }
        }
    }

    /// Resampling the field N → N' → N preserves its low-frequency shape.
    #[test]
    fn resize_round_trip_preserves_samples(
        impulse_x in 50.0f32..450.0,
        strength in -60.0f32..-5.0,
        intermediate in 100usize..400,
    ) {
        let width = 500.0;
        let n0 = 128;
        let mut field = SurfaceWaveField::new(width, n0, WAVE_STIFFNESS, WAVE_DAMPING);

        // Build a smooth wave shape: a few impulses, then some settling.
        field.inject_impulse(impulse_x, strength);
        field.inject_impulse(width - impulse_x, strength * 0.5);
        for _ in 0..30 {
            field.step(DT);
        }

        let probes: Vec<f32> = (0..20).map(|i| i as f32 * width / 19.0).collect();
        let before: Vec<f32> = probes.iter().map(|&x| field.sample(x)).collect();
        let amplitude = field.max_offset();

        field.resize(width, intermediate);
        field.resize(width, n0);

        let tolerance = 0.15 * amplitude + 0.05;
        for (&x, &expected) in probes.iter().zip(before.iter()) {
            let got = field.sample(x);
            prop_assert!((got - expected).abs() <= tolerance,
                "shape drifted at x {}: {} vs {}", x, got, expected);
        }
    }

    /// Reservoir arithmetic never goes negative or above target outside
    /// draining mode, for arbitrary add/withdraw sequences.
    #[test]
    fn reservoir_stays_in_range(ops in prop::collection::vec((any::<bool>(), 0.0f32..5_000.0), 1..64)) {
        let mut r = Reservoir::new(500.0);
        r.set_target(300.0, 500.0);
        for (add, amount) in ops {
            if add {
                r.add_volume(amount);
            } else {
                r.withdraw(amount);
            }
            prop_assert!(r.volume() >= 0.0);
            prop_assert!(r.volume() <= r.target_volume());
        }
    }
}
