//! Random initial layouts
//!
//! Particles are placed fully inside the arena with whole-number velocity
//! components, never zero, so every particle starts moving on both axes.
//! Overlaps between freshly spawned particles are allowed; the first
//! detection pass pushes them apart.

use rand::Rng;

use crate::config::SimulationConfig;
use crate::particle::Particle;

/// Generates `config.particle_count` particles from `rng`
///
/// The config is assumed valid (see `SimulationConfig::validate`).
///
/// # Examples
///
/// ```
/// use collision::config::SimulationConfig;
/// use collision::spawn::spawn_particles;
/// use rand::SeedableRng;
/// use rand_chacha::ChaChaRng;
///
/// let config = SimulationConfig::default();
/// let mut rng = ChaChaRng::seed_from_u64(config.seed);
/// let particles = spawn_particles(&mut rng, &config);
///
/// assert_eq!(particles.len(), config.particle_count);
/// assert!(particles.iter().all(|p| p.radius >= 20.0 && p.radius < 50.0));
/// ```
pub fn spawn_particles<R: Rng>(rng: &mut R, config: &SimulationConfig) -> Vec<Particle> {
    (0..config.particle_count)
        .map(|_| {
            let radius = sample_radius(rng, config.min_radius, config.max_radius);
            let x = rng.random_range(radius..=config.arena_width - radius);
            let y = rng.random_range(radius..=config.arena_height - radius);
            let vx = sample_velocity(rng, config.min_velocity, config.max_velocity);
            let vy = sample_velocity(rng, config.min_velocity, config.max_velocity);
            Particle::new([x, y], radius, [vx, vy])
        })
        .collect()
}

fn sample_radius<R: Rng>(rng: &mut R, min: f64, max: f64) -> f64 {
    if min < max {
        rng.random_range(min..max)
    } else {
        min
    }
}

/// Uniform whole-number component in `[min, max]`, with zero replaced by one
fn sample_velocity<R: Rng>(rng: &mut R, min: f64, max: f64) -> f64 {
    let v = rng.random_range(min.ceil() as i64..=max.floor() as i64);
    if v == 0 { 1.0 } else { v as f64 }
}
