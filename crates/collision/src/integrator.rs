//! Particle motion between collision passes
//!
//! Each step moves every particle by its velocity and keeps it inside the
//! arena walls. Collisions between particles are handled separately by a
//! `CollisionDetector`.

use crate::particle::Particle;
use crate::state::SimulationState;

/// Advances particle positions by one step
pub trait Integrator: Send + Sync {
    /// Advance every particle by one step (modified in place)
    fn step(&self, state: &mut SimulationState);

    /// Advance by multiple steps, returning the final step count
    fn integrate(&self, state: &mut SimulationState, n_steps: usize) -> u64 {
        for _ in 0..n_steps {
            self.step(state);
        }
        state.step
    }
}

/// Straight-line motion with reflecting walls
///
/// After moving, a particle that crosses a wall is placed back touching it
/// and the velocity component normal to that wall is reversed. Speed is
/// preserved.
///
/// # Examples
///
/// ```
/// use collision::integrator::{Integrator, WallBounce};
/// use collision::state::SimulationState;
/// use nalgebra::{Point2, Vector2};
///
/// let mut state = SimulationState::new(800.0, 600.0);
/// state
///     .add_particle(Point2::new(22.0, 300.0), 20.0, Vector2::new(-3.0, 1.0))
///     .unwrap();
///
/// WallBounce.step(&mut state);
///
/// let p = &state.particles[0];
/// assert_eq!(p.position, Point2::new(20.0, 301.0));
/// assert_eq!(p.velocity, Vector2::new(3.0, 1.0));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct WallBounce;

impl WallBounce {
    /// Moves one particle and reflects it off the walls of a `width × height` arena
    pub fn advance(particle: &mut Particle, width: f64, height: f64) {
        particle.position += particle.velocity;

        let r = particle.radius;
        let pos = particle.position;

        if pos.x - r < 0.0 {
            particle.position.x = r;
            particle.velocity.x = -particle.velocity.x;
        } else if pos.x + r > width {
            particle.position.x = width - r;
            particle.velocity.x = -particle.velocity.x;
        }

        if pos.y - r < 0.0 {
            particle.position.y = r;
            particle.velocity.y = -particle.velocity.y;
        } else if pos.y + r > height {
            particle.position.y = height - r;
            particle.velocity.y = -particle.velocity.y;
        }
    }
}

impl Integrator for WallBounce {
    fn step(&self, state: &mut SimulationState) {
        let (width, height) = (state.width, state.height);
        state
            .particles
            .iter_mut()
            .for_each(|particle| Self::advance(particle, width, height));
        state.step += 1;
    }
}
