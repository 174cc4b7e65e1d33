//! Elastic collision resolution between two circular particles
//!
//! A resolved pair conserves:
//! - Total momentum (mass is the radius)
//! - Total kinetic energy
//!
//! Overlap is removed by pushing both particles apart along the contact
//! normal by half the penetration depth each, independent of mass.

use nalgebra::Vector2;

use crate::particle::Particle;

/// Contact normal used when two centres coincide exactly.
pub const FALLBACK_NORMAL: Vector2<f64> = Vector2::new(1.0, 0.0);

/// Resolve a collision between two particles in place
///
/// Does nothing when the circles do not overlap. Otherwise:
///
/// 1. Both particles move apart along the unit normal `(p1 - p2) / |p1 - p2|`
///    by half the overlap each, leaving them exactly touching.
/// 2. Velocities are split into normal and tangential components. Tangential
///    components are kept (no friction); normal components follow the 1-D
///    elastic formula for unequal masses.
///
/// Coincident centres use [`FALLBACK_NORMAL`] so no NaN reaches the
/// particle state.
///
/// # Returns
///
/// `true` if the particles overlapped and were corrected
///
/// # Examples
///
/// ```
/// use collision::collisions::resolve_collision;
/// use collision::particle::Particle;
///
/// let mut a = Particle::new([100.0, 100.0], 20.0, [1.0, 0.0]);
/// let mut b = Particle::new([130.0, 100.0], 20.0, [-1.0, 0.0]);
///
/// assert!(resolve_collision(&mut a, &mut b));
///
/// // Equal masses swap velocities in a head-on collision
/// assert!((a.velocity.x + 1.0).abs() < 1e-12);
/// assert!((b.velocity.x - 1.0).abs() < 1e-12);
///
/// // And end up exactly touching
/// assert!((a.distance_to(&b) - 40.0).abs() < 1e-12);
/// ```
pub fn resolve_collision(p1: &mut Particle, p2: &mut Particle) -> bool {
    let delta = p1.position - p2.position;
    let distance = delta.magnitude();
    let combined_radius = p1.radius + p2.radius;

    if distance >= combined_radius {
        return false;
    }

    let normal = if distance > 0.0 {
        delta / distance
    } else {
        FALLBACK_NORMAL
    };
    let tangent = Vector2::new(-normal.y, normal.x);

    // Even split of the positional correction
    let overlap = 0.5 * (combined_radius - distance);
    let correction = normal * overlap;
    p1.position += correction;
    p2.position -= correction;

    let v1_tan = p1.velocity.dot(&tangent);
    let v2_tan = p2.velocity.dot(&tangent);
    let v1_n = p1.velocity.dot(&normal);
    let v2_n = p2.velocity.dot(&normal);

    let (m1, m2) = (p1.mass(), p2.mass());
    let total_mass = m1 + m2;
    let v1_n_after = (v1_n * (m1 - m2) + 2.0 * m2 * v2_n) / total_mass;
    let v2_n_after = (v2_n * (m2 - m1) + 2.0 * m1 * v1_n) / total_mass;

    p1.velocity = tangent * v1_tan + normal * v1_n_after;
    p2.velocity = tangent * v2_tan + normal * v2_n_after;

    true
}

/// Resolve the pair `(i, j)` of a particle slice in place
///
/// Borrows both elements mutably through a split of the slice.
///
/// # Panics
///
/// Panics if `i == j` or either index is out of bounds.
///
/// # Examples
///
/// ```
/// use collision::collisions::resolve_pair;
/// use collision::particle::Particle;
///
/// let mut particles = vec![
///     Particle::new([0.0, 0.0], 1.0, [1.0, 0.0]),
///     Particle::new([1.5, 0.0], 1.0, [0.0, 0.0]),
/// ];
///
/// assert!(resolve_pair(&mut particles, 1, 0));
/// assert!(!particles[0].overlaps(&particles[1]));
/// ```
pub fn resolve_pair(particles: &mut [Particle], i: usize, j: usize) -> bool {
    assert_ne!(i, j, "cannot resolve a particle against itself");
    if i < j {
        let (head, tail) = particles.split_at_mut(j);
        resolve_collision(&mut head[i], &mut tail[0])
    } else {
        let (head, tail) = particles.split_at_mut(i);
        resolve_collision(&mut tail[0], &mut head[j])
    }
}
