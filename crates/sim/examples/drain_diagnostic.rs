//! Drain-phase diagnostic: fills the reservoir, triggers the whirlpool and
//! prints the drain curve and state transitions.
//!
//! Run with: cargo run -p clepsydra-sim --example drain_diagnostic --release

use clepsydra_sim::{SimConfig, Simulation};

fn main() {
    let mut sim = Simulation::new(SimConfig::with_size(500.0, 600.0));
    sim.set_target(300.0).unwrap();
    sim.reservoir.add_volume(150_000.0);

    println!(
        "=== Drain diagnostic: volume {:.0}, window {:.1} s ===",
        sim.reservoir.volume(),
        sim.config().drain_duration
    );
    sim.start_draining();
    println!(
        "drain rate fixed at {:.0} volume/s",
        sim.whirlpool.drain_rate()
    );
    println!("  t(s) |    volume | strength | active");
    println!("-------|-----------|----------|-------");

    let dt = 1.0 / 60.0;
    let report_every = (0.2 / dt) as usize;
    let mut completed_at = None;

    for step in 1..=(4.0 / dt) as usize {
        sim.update(dt);
        let t = step as f32 * dt;
        if completed_at.is_none() && !sim.whirlpool.is_active() {
            completed_at = Some(t);
        }
        if step % report_every == 0 {
            println!(
                "{:6.2} | {:9.0} | {:8.2} | {}",
                t,
                sim.reservoir.volume(),
                sim.whirlpool.strength(),
                sim.whirlpool.is_active(),
            );
        }
    }

    match completed_at {
        Some(t) => println!("\ndrain completed at t = {t:.2} s"),
        None => println!("\ndrain DID NOT complete within 4 s"),
    }
}
