use nalgebra::{Point2, Vector2};

/// A circular point mass moving inside the arena.
///
/// Coordinates follow screen conventions: `x` grows to the right and `y`
/// grows downward. Velocity is the displacement applied once per step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    pub position: Point2<f64>,  // centre of the circle
    pub velocity: Vector2<f64>, // displacement per step
    pub radius: f64,            // also the mass
}

impl Particle {
    /// Creates a particle from raw coordinates.
    ///
    /// The radius must be positive; `SimulationState::add_particle` checks
    /// this for particles entering a simulation.
    ///
    /// # Examples
    ///
    /// ```
    /// use collision::particle::Particle;
    ///
    /// let p = Particle::new([100.0, 100.0], 20.0, [1.0, 0.0]);
    /// assert_eq!(p.mass(), 20.0);
    /// ```
    pub fn new(position: [f64; 2], radius: f64, velocity: [f64; 2]) -> Self {
        Particle {
            position: Point2::new(position[0], position[1]),
            velocity: Vector2::new(velocity[0], velocity[1]),
            radius,
        }
    }

    /// Mass is the radius; it is never stored separately.
    #[inline]
    pub fn mass(&self) -> f64 {
        self.radius
    }

    pub fn momentum(&self) -> Vector2<f64> {
        self.velocity * self.mass()
    }

    pub fn kinetic_energy(&self) -> f64 {
        0.5 * self.mass() * self.velocity.magnitude_squared()
    }

    pub fn distance_to(&self, other: &Particle) -> f64 {
        (self.position - other.position).magnitude()
    }

    /// True when the two circles overlap (touching does not count).
    pub fn overlaps(&self, other: &Particle) -> bool {
        self.distance_to(other) < self.radius + other.radius
    }
}
