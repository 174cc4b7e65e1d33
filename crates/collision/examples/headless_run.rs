//! Headless comparison of the two detection strategies
//!
//! Runs the same seeded arena once with the all-pairs detector and once with
//! the quadtree detector, then prints how many pairs each examined and how
//! many contacts each resolved.
//!
//! Run with: cargo run --package collision --example headless_run
//! Pass a JSON config path as the first argument to override the defaults;
//! set RUST_LOG=debug for per-run summaries.

use std::time::Instant;

use collision::config::SimulationConfig;
use collision::simulation::Simulation;

const STEPS: usize = 600;

fn main() -> collision::Result<()> {
    env_logger::init();

    let base = match std::env::args().nth(1) {
        Some(path) => {
            let json = std::fs::read_to_string(&path).map_err(|e| {
                collision::Error::InvalidConfig(format!("cannot read {path}: {e}"))
            })?;
            SimulationConfig::from_json_str(&json)?
        }
        None => SimulationConfig {
            particle_count: 50,
            min_radius: 20.0,
            max_radius: 20.0,
            ..SimulationConfig::default()
        },
    };

    println!("Headless collision run\n");
    println!("{}", "=".repeat(60));
    println!(
        "  Arena: {}x{}, particles: {}, radius: {}-{}",
        base.arena_width, base.arena_height, base.particle_count, base.min_radius, base.max_radius
    );
    println!(
        "  Quadtree capacity: {}, query margin: {}, pair policy: {:?}",
        base.capacity, base.query_margin, base.pair_policy
    );
    println!("  Steps: {STEPS}, seed: {}", base.seed);
    println!("{}", "=".repeat(60));

    for strategy in ["brute", "quadtree"] {
        let config = base.clone().with_strategy(strategy);
        let mut sim = Simulation::from_config(&config)?;
        let initial_energy = sim.state().total_kinetic_energy();

        let start = Instant::now();
        let stats = sim.run(STEPS);
        let elapsed = start.elapsed();

        let state = sim.state();
        println!("\n{}:", sim.detector_name());
        println!("  Candidate pairs: {}", stats.candidate_pairs);
        println!("  Contacts resolved: {}", stats.contacts);
        println!("  Overlaps remaining: {}", state.overlapping_pairs());
        println!(
            "  Kinetic energy: {:.6} -> {:.6}",
            initial_energy,
            state.total_kinetic_energy()
        );
        println!("  Wall time: {:.2?}", elapsed);
    }

    println!("\n{}", "=".repeat(60));
    Ok(())
}
