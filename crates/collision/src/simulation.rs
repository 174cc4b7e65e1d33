//! Headless simulation driver
//!
//! Couples a `SimulationState` with wall-bounce motion and a collision
//! detector. One `step` moves every particle, then detects and resolves
//! collisions, mirroring one frame of an interactive loop without drawing.

use rand::SeedableRng;
use rand_chacha::ChaChaRng;

use crate::collisions::{CollisionDetector, DetectionStats};
use crate::config::SimulationConfig;
use crate::error::Result;
use crate::integrator::{Integrator, WallBounce};
use crate::spawn::spawn_particles;
use crate::state::SimulationState;

/// Particle state together with the motion step and detection strategy
pub struct Simulation {
    state: SimulationState,
    integrator: WallBounce,
    detector: Box<dyn CollisionDetector>,
}

impl Simulation {
    /// Builds a seeded random simulation from a validated config
    ///
    /// # Errors
    ///
    /// `Error::InvalidConfig` if the config fails validation
    ///
    /// # Examples
    ///
    /// ```
    /// use collision::config::SimulationConfig;
    /// use collision::simulation::Simulation;
    ///
    /// let config = SimulationConfig::default().with_strategy("quadtree");
    /// let mut sim = Simulation::from_config(&config).unwrap();
    /// assert_eq!(sim.detector_name(), "quadtree");
    ///
    /// sim.run(10);
    /// assert_eq!(sim.state().step, 10);
    /// assert_eq!(sim.state().particle_count(), 30);
    /// ```
    pub fn from_config(config: &SimulationConfig) -> Result<Self> {
        config.validate()?;

        let mut rng = ChaChaRng::seed_from_u64(config.seed);
        let particles = spawn_particles(&mut rng, config);
        let state =
            SimulationState::with_particles(config.arena_width, config.arena_height, particles)?;
        let detector = config.detector_kind().build(config);

        log::info!(
            "simulation: {} particles in {}x{} arena, {} detector, seed {}",
            state.particle_count(),
            config.arena_width,
            config.arena_height,
            detector.name(),
            config.seed
        );

        Ok(Self::with_state(state, detector))
    }

    /// Wraps an existing state with the given detector
    pub fn with_state(state: SimulationState, detector: Box<dyn CollisionDetector>) -> Self {
        Self {
            state,
            integrator: WallBounce,
            detector,
        }
    }

    /// Moves every particle, then detects and resolves collisions
    pub fn step(&mut self) -> DetectionStats {
        self.integrator.step(&mut self.state);
        let stats = self.detector.detect_and_resolve(&mut self.state.particles);

        log::trace!(
            "step {}: {} candidate pairs, {} contacts",
            self.state.step,
            stats.candidate_pairs,
            stats.contacts
        );

        stats
    }

    /// Runs `n_steps` steps and returns the summed detection counters
    pub fn run(&mut self, n_steps: usize) -> DetectionStats {
        let mut total = DetectionStats::default();
        for _ in 0..n_steps {
            total += self.step();
        }
        log::debug!(
            "ran {} steps with {}: {} candidate pairs, {} contacts",
            n_steps,
            self.detector.name(),
            total.candidate_pairs,
            total.contacts
        );
        total
    }

    pub fn state(&self) -> &SimulationState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut SimulationState {
        &mut self.state
    }

    pub fn detector_name(&self) -> &'static str {
        self.detector.name()
    }

    /// Consumes the simulation, returning its state
    pub fn into_state(self) -> SimulationState {
        self.state
    }
}
