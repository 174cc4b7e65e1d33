//! Integration tests for the headless simulation driver.
//!
//! These run both detection strategies through many frames of motion and
//! collisions and compare what they conserve.

use approx::assert_relative_eq;
use nalgebra::{Point2, Vector2};

use collision::collisions::{
    BruteForceDetector, CollisionDetector, PairPolicy, QuadTreeDetector,
};
use collision::config::SimulationConfig;
use collision::simulation::Simulation;
use collision::state::SimulationState;

fn crowded_config(strategy: &str) -> SimulationConfig {
    SimulationConfig {
        particle_count: 50,
        min_radius: 20.0,
        max_radius: 20.0,
        capacity: 4,
        query_margin: 3.0,
        pair_policy: PairPolicy::Ordered,
        ..SimulationConfig::default()
    }
    .with_strategy(strategy)
}

fn all_finite(state: &SimulationState) -> bool {
    state.particles.iter().all(|p| {
        p.position.x.is_finite()
            && p.position.y.is_finite()
            && p.velocity.x.is_finite()
            && p.velocity.y.is_finite()
    })
}

#[test]
fn crowded_arena_both_strategies() {
    let mut brute = Simulation::from_config(&crowded_config("brute")).unwrap();
    let mut tree = Simulation::from_config(&crowded_config("quadtree")).unwrap();

    // Same seed, same starting layout
    assert_eq!(brute.state().particles, tree.state().particles);
    let initial_energy = brute.state().total_kinetic_energy();

    let brute_stats = brute.run(100);
    let tree_stats = tree.run(100);

    println!("brute:    {brute_stats:?}");
    println!("quadtree: {tree_stats:?}");

    assert_eq!(brute.state().step, 100);
    assert_eq!(tree.state().step, 100);
    assert_eq!(brute_stats.candidate_pairs, 100 * 50 * 49 / 2);
    assert!(tree_stats.candidate_pairs < brute_stats.candidate_pairs / 10);
    assert!(brute_stats.contacts > 0);
    assert!(tree_stats.contacts > 0);

    for sim in [&brute, &tree] {
        assert!(all_finite(sim.state()));
        assert_eq!(sim.state().particle_count(), 50);
        // Walls and elastic contacts both preserve kinetic energy
        assert_relative_eq!(
            sim.state().total_kinetic_energy(),
            initial_energy,
            max_relative = 1e-9
        );
    }
}

/// Sum of position differences between two particle sets
fn position_divergence(a: &SimulationState, b: &SimulationState) -> f64 {
    a.particles
        .iter()
        .zip(&b.particles)
        .map(|(pa, pb)| (pa.position - pb.position).norm())
        .sum()
}

/// Totals from running brute force and a quadtree side by side
struct Comparison {
    brute_contacts: usize,
    tree_contacts: usize,
    cumulative_divergence: f64,
    tree_state: SimulationState,
}

/// Runs both strategies in lockstep from `start` for `steps` steps
fn compare(start: SimulationState, config: &SimulationConfig, steps: usize) -> Comparison {
    let detector = QuadTreeDetector::from_config(config);
    let mut brute = Simulation::with_state(start.clone(), Box::new(BruteForceDetector));
    let mut tree = Simulation::with_state(start, Box::new(detector));

    let mut comparison = Comparison {
        brute_contacts: 0,
        tree_contacts: 0,
        cumulative_divergence: 0.0,
        tree_state: SimulationState::new(config.arena_width, config.arena_height),
    };
    for _ in 0..steps {
        comparison.brute_contacts += brute.step().contacts;
        comparison.tree_contacts += tree.step().contacts;
        comparison.cumulative_divergence += position_divergence(brute.state(), tree.state());
    }
    comparison.tree_state = tree.into_state();
    comparison
}

#[test]
fn crowded_arena_ordered_quadtree_tracks_brute_force() {
    for seed in [42, 1, 7] {
        let config = crowded_config("quadtree").with_seed(seed);
        let start = Simulation::from_config(&config).unwrap().into_state();

        let result = compare(start, &config, 100);

        println!(
            "seed {seed}: contacts brute {}, quadtree {}, divergence {}",
            result.brute_contacts, result.tree_contacts, result.cumulative_divergence
        );
        assert!(result.brute_contacts > 0);
        assert_eq!(result.brute_contacts, result.tree_contacts, "seed {seed}");
        assert!(
            result.cumulative_divergence < 1e-6,
            "seed {seed} diverged by {}",
            result.cumulative_divergence
        );
    }
}

#[test]
fn settled_arena_ordered_quadtree_tracks_brute_force() {
    // Separate the spawn overlaps first so every later overlap comes from
    // one frame of motion
    let config = crowded_config("quadtree");
    let mut settled = Simulation::from_config(&config).unwrap().into_state();
    for _ in 0..200 {
        if settled.overlapping_pairs() == 0 {
            break;
        }
        BruteForceDetector.detect_and_resolve(&mut settled.particles);
    }

    let result = compare(settled, &config, 100);

    assert!(result.brute_contacts > 0);
    assert_eq!(result.brute_contacts, result.tree_contacts);
    assert!(result.cumulative_divergence < 1e-6);
}

#[test]
fn crowded_arena_repeated_quadtree_diverges() {
    // Resolving a pair from both ends can undo its bounce, so the repeated
    // policy drifts away from brute force while still conserving energy
    let config = SimulationConfig {
        pair_policy: PairPolicy::Repeated,
        ..crowded_config("quadtree")
    };
    let start = Simulation::from_config(&config).unwrap().into_state();
    let initial_energy = start.total_kinetic_energy();

    let result = compare(start, &config, 100);

    println!(
        "repeated: contacts brute {}, quadtree {}, divergence {}",
        result.brute_contacts, result.tree_contacts, result.cumulative_divergence
    );
    assert!(result.tree_contacts > result.brute_contacts);
    assert!(result.cumulative_divergence > 1.0);
    assert!(all_finite(&result.tree_state));
    assert_relative_eq!(
        result.tree_state.total_kinetic_energy(),
        initial_energy,
        max_relative = 1e-9
    );
}

#[test]
fn isolated_pairs_match_across_strategies() {
    let mut state = SimulationState::new(800.0, 600.0);
    let pairs = [
        ([100.0, 100.0], [150.0, 100.0]),
        ([400.0, 200.0], [400.0, 260.0]),
        ([650.0, 450.0], [700.0, 500.0]),
    ];
    for (a, b) in pairs {
        let pa = Point2::new(a[0], a[1]);
        let pb = Point2::new(b[0], b[1]);
        let towards = (pb - pa).normalize() * 2.0;
        state.add_particle(pa, 20.0, towards).unwrap();
        state.add_particle(pb, 20.0, -towards).unwrap();
    }

    let mut brute = Simulation::with_state(state.clone(), Box::new(BruteForceDetector));
    let mut tree = Simulation::with_state(
        state,
        Box::new(QuadTreeDetector::new(800.0, 600.0).with_capacity(1)),
    );

    for _ in 0..40 {
        let b = brute.step();
        let t = tree.step();
        assert_eq!(b.contacts, t.contacts, "step {}", brute.state().step);
    }

    for (pb, pt) in brute.state().particles.iter().zip(&tree.state().particles) {
        assert_relative_eq!(pb.position.x, pt.position.x, epsilon = 1e-9);
        assert_relative_eq!(pb.position.y, pt.position.y, epsilon = 1e-9);
        assert_relative_eq!(pb.velocity.x, pt.velocity.x, epsilon = 1e-9);
        assert_relative_eq!(pb.velocity.y, pt.velocity.y, epsilon = 1e-9);
    }

    // Each pair bounced exactly once and is now receding
    assert_eq!(brute.state().overlapping_pairs(), 0);
    let p = &brute.state().particles;
    assert!(p[0].velocity.x < 0.0);
    assert!(p[1].velocity.x > 0.0);
}

#[test]
fn json_config_drives_simulation() {
    let json = r#"{
        "arena_width": 640.0,
        "arena_height": 480.0,
        "particle_count": 25,
        "min_radius": 10.0,
        "max_radius": 30.0,
        "strategy": "quadtree",
        "pair_policy": "repeated",
        "seed": 3
    }"#;
    let config = SimulationConfig::from_json_str(json).unwrap();
    let mut sim = Simulation::from_config(&config).unwrap();

    assert_eq!(sim.detector_name(), "quadtree");
    assert_eq!(sim.state().bounds().half_width, 320.0);
    assert_eq!(sim.state().bounds().half_height, 240.0);

    let initial_energy = sim.state().total_kinetic_energy();
    sim.run(50);

    let state = sim.into_state();
    assert_eq!(state.step, 50);
    assert!(all_finite(&state));
    assert_relative_eq!(state.total_kinetic_energy(), initial_energy, max_relative = 1e-9);
}

#[test]
fn invalid_config_is_rejected() {
    let config = SimulationConfig {
        min_radius: 40.0,
        max_radius: 10.0,
        ..SimulationConfig::default()
    };
    assert!(Simulation::from_config(&config).is_err());
}

#[test]
fn state_mut_allows_manual_setup() {
    let config = SimulationConfig {
        particle_count: 0,
        ..SimulationConfig::default()
    };
    let mut sim = Simulation::from_config(&config).unwrap();

    sim.state_mut()
        .add_particle(Point2::new(100.0, 300.0), 20.0, Vector2::new(1.0, 0.0))
        .unwrap();
    sim.state_mut()
        .add_particle(Point2::new(135.0, 300.0), 20.0, Vector2::new(-1.0, 0.0))
        .unwrap();

    let stats = sim.step();
    assert_eq!(stats.contacts, 1);
    assert_eq!(stats.candidate_pairs, 1);
}
