use nalgebra::{Point2, Vector2};

use crate::error::{Error, Result};
use crate::particle::Particle;
use crate::quadtree::BoundaryRegion;

/// Particles in a rectangular arena at a given step
///
/// The arena spans `[0, width] × [0, height]`. The particle count is fixed
/// once a run starts; indices into `particles` identify particles.
#[derive(Debug, Clone)]
pub struct SimulationState {
    /// Number of steps taken so far
    pub step: u64,
    pub width: f64,
    pub height: f64,
    pub particles: Vec<Particle>,
}

impl SimulationState {
    /// Creates an empty arena
    ///
    /// # Examples
    ///
    /// ```
    /// use collision::state::SimulationState;
    ///
    /// let state = SimulationState::new(800.0, 600.0);
    /// assert_eq!(state.particle_count(), 0);
    /// assert_eq!(state.step, 0);
    /// ```
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            step: 0,
            width,
            height,
            particles: Vec::new(),
        }
    }

    /// Creates an arena holding `particles`, checking each radius
    pub fn with_particles(width: f64, height: f64, particles: Vec<Particle>) -> Result<Self> {
        let mut state = Self::new(width, height);
        for particle in particles {
            state.push(particle)?;
        }
        Ok(state)
    }

    /// Adds a particle and returns its index
    ///
    /// # Errors
    ///
    /// `Error::InvalidParticle` if the radius is not positive and finite
    ///
    /// # Examples
    ///
    /// ```
    /// use collision::state::SimulationState;
    /// use nalgebra::{Point2, Vector2};
    ///
    /// let mut state = SimulationState::new(800.0, 600.0);
    /// let index = state
    ///     .add_particle(Point2::new(100.0, 100.0), 20.0, Vector2::new(1.0, 0.0))
    ///     .unwrap();
    /// assert_eq!(index, 0);
    ///
    /// assert!(state.add_particle(Point2::new(1.0, 1.0), 0.0, Vector2::zeros()).is_err());
    /// ```
    pub fn add_particle(
        &mut self,
        position: Point2<f64>,
        radius: f64,
        velocity: Vector2<f64>,
    ) -> Result<usize> {
        self.push(Particle {
            position,
            velocity,
            radius,
        })
    }

    fn push(&mut self, particle: Particle) -> Result<usize> {
        if !(particle.radius.is_finite() && particle.radius > 0.0) {
            return Err(Error::InvalidParticle(format!(
                "radius must be positive and finite, got {}",
                particle.radius
            )));
        }
        self.particles.push(particle);
        Ok(self.particles.len() - 1)
    }

    pub fn particle_count(&self) -> usize {
        self.particles.len()
    }

    /// The arena as a boundary region
    pub fn bounds(&self) -> BoundaryRegion {
        BoundaryRegion::from_arena(self.width, self.height)
    }

    /// Returns the total momentum of all particles
    pub fn total_momentum(&self) -> Vector2<f64> {
        self.particles
            .iter()
            .map(|p| p.momentum())
            .fold(Vector2::zeros(), |acc, p| acc + p)
    }

    /// Returns the total kinetic energy of all particles
    ///
    /// Conserved by collisions; wall bounces keep speed too.
    pub fn total_kinetic_energy(&self) -> f64 {
        self.particles.iter().map(|p| p.kinetic_energy()).sum()
    }

    /// Counts pairs whose circles currently overlap
    pub fn overlapping_pairs(&self) -> usize {
        let n = self.particles.len();
        (0..n)
            .flat_map(|i| ((i + 1)..n).map(move |j| (i, j)))
            .filter(|&(i, j)| self.particles[i].overlaps(&self.particles[j]))
            .count()
    }
}
