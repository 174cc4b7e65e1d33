//! Collision detection strategies
//!
//! Provides two implementations of [`CollisionDetector`]:
//! - BruteForceDetector: O(N²), checks every pair
//! - QuadTreeDetector: expected O(N log N) using a quadtree rebuilt per call
//!
//! Both resolve contacts as they find them, so later pairs see the state left
//! by earlier ones and the visiting order is part of the result.

use serde::{Deserialize, Serialize};

use crate::collisions::resolution::resolve_pair;
use crate::config::SimulationConfig;
use crate::particle::Particle;
use crate::quadtree::{BoundaryRegion, DEFAULT_CAPACITY, DEFAULT_MAX_DEPTH, QuadTree};

/// Default half extent of the quadtree query box, in multiples of the radius.
pub const DEFAULT_QUERY_MARGIN: f64 = 3.0;

/// Counters from one `detect_and_resolve` call
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DetectionStats {
    /// Number of pairs handed to the resolver
    pub candidate_pairs: usize,
    /// Number of pairs that overlapped and were corrected
    pub contacts: usize,
}

impl std::ops::AddAssign for DetectionStats {
    fn add_assign(&mut self, other: Self) {
        self.candidate_pairs += other.candidate_pairs;
        self.contacts += other.contacts;
    }
}

/// Collision detector trait
///
/// Implementations find overlapping pairs and resolve them in place. They
/// keep no reference to the particles after returning.
pub trait CollisionDetector: Send + Sync {
    /// Detect and resolve every collision among `particles`
    ///
    /// The slice must not be reallocated during the call; detectors address
    /// particles by index.
    fn detect_and_resolve(&self, particles: &mut [Particle]) -> DetectionStats;

    /// Short strategy name, as used in configuration
    fn name(&self) -> &'static str;
}

/// Brute-force O(N²) collision detector
///
/// Visits every pair `(i, j)` with `i < j` in ascending order. Simple and
/// exact; serves as the reference for the tree detector.
///
/// # Examples
///
/// ```
/// use collision::collisions::{BruteForceDetector, CollisionDetector};
/// use collision::particle::Particle;
///
/// let mut particles = vec![
///     Particle::new([100.0, 100.0], 20.0, [1.0, 0.0]),
///     Particle::new([130.0, 100.0], 20.0, [-1.0, 0.0]),
///     Particle::new([500.0, 400.0], 20.0, [0.0, 1.0]),
/// ];
///
/// let stats = BruteForceDetector.detect_and_resolve(&mut particles);
/// assert_eq!(stats.candidate_pairs, 3);
/// assert_eq!(stats.contacts, 1);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct BruteForceDetector;

impl CollisionDetector for BruteForceDetector {
    fn detect_and_resolve(&self, particles: &mut [Particle]) -> DetectionStats {
        let n = particles.len();
        let mut stats = DetectionStats::default();

        for i in 0..n {
            for j in (i + 1)..n {
                stats.candidate_pairs += 1;
                if resolve_pair(particles, i, j) {
                    stats.contacts += 1;
                }
            }
        }

        stats
    }

    fn name(&self) -> &'static str {
        "brute"
    }
}

/// How the quadtree detector treats a pair found from both of its ends
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PairPolicy {
    /// Resolve a pair only from its lower index, once per call
    #[default]
    Ordered,
    /// Resolve a pair from both ends
    ///
    /// The first visit pushes the pair apart to touching, but rounding often
    /// leaves the distance a hair under the combined radius. The second visit
    /// then runs the elastic exchange again, which for equal masses swaps the
    /// normal velocities back and cancels the bounce.
    Repeated,
}

/// Quadtree-based collision detector
///
/// Each call builds a fresh tree over the arena, then queries a square of
/// half extent `query_margin * radius` around every particle and resolves it
/// against the candidates returned.
///
/// The margin is a heuristic: a small particle can miss a much larger
/// neighbour whose radius exceeds the margin. `BruteForceDetector` is the
/// ground truth.
///
/// The tree is built once per call, so candidates are filtered by their
/// positions at the start of the call while each query box is centred on the
/// querying particle's current position. Particles lying outside the arena
/// when the call starts are not indexed.
///
/// # Examples
///
/// ```
/// use collision::collisions::{CollisionDetector, QuadTreeDetector};
/// use collision::particle::Particle;
///
/// let mut particles = vec![
///     Particle::new([100.0, 100.0], 20.0, [1.0, 0.0]),
///     Particle::new([130.0, 100.0], 20.0, [-1.0, 0.0]),
///     Particle::new([500.0, 400.0], 20.0, [0.0, 1.0]),
/// ];
///
/// let detector = QuadTreeDetector::new(800.0, 600.0);
/// let stats = detector.detect_and_resolve(&mut particles);
/// assert_eq!(stats.contacts, 1);
/// assert!(stats.candidate_pairs < 3);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct QuadTreeDetector {
    boundary: BoundaryRegion,
    capacity: usize,
    max_depth: usize,
    query_margin: f64,
    pair_policy: PairPolicy,
}

impl QuadTreeDetector {
    /// Creates a detector for an arena of the given size with default tuning
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            boundary: BoundaryRegion::from_arena(width, height),
            capacity: DEFAULT_CAPACITY,
            max_depth: DEFAULT_MAX_DEPTH,
            query_margin: DEFAULT_QUERY_MARGIN,
            pair_policy: PairPolicy::default(),
        }
    }

    /// Creates a detector from the tunables of a simulation config
    pub fn from_config(config: &SimulationConfig) -> Self {
        Self::new(config.arena_width, config.arena_height)
            .with_capacity(config.capacity)
            .with_max_depth(config.max_depth)
            .with_query_margin(config.query_margin)
            .with_pair_policy(config.pair_policy)
    }

    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_query_margin(mut self, query_margin: f64) -> Self {
        self.query_margin = query_margin;
        self
    }

    pub fn with_pair_policy(mut self, pair_policy: PairPolicy) -> Self {
        self.pair_policy = pair_policy;
        self
    }

    pub fn boundary(&self) -> &BoundaryRegion {
        &self.boundary
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn query_margin(&self) -> f64 {
        self.query_margin
    }

    pub fn pair_policy(&self) -> PairPolicy {
        self.pair_policy
    }
}

impl CollisionDetector for QuadTreeDetector {
    fn detect_and_resolve(&self, particles: &mut [Particle]) -> DetectionStats {
        let mut stats = DetectionStats::default();
        if particles.len() < 2 {
            return stats;
        }

        let tree = QuadTree::build(particles, self.boundary, self.capacity, self.max_depth);
        let mut candidates = Vec::new();

        for i in 0..particles.len() {
            let particle = &particles[i];
            let range = BoundaryRegion::square(
                particle.position,
                self.query_margin * particle.radius,
            );

            candidates.clear();
            tree.query(&range, &mut candidates);
            // Ascending order keeps the result independent of tree layout
            candidates.sort_unstable();

            for &j in &candidates {
                let skip = match self.pair_policy {
                    PairPolicy::Ordered => j <= i,
                    PairPolicy::Repeated => j == i,
                };
                if skip {
                    continue;
                }

                stats.candidate_pairs += 1;
                if resolve_pair(particles, i, j) {
                    stats.contacts += 1;
                }
            }
        }

        log::trace!(
            "quadtree pass: {} nodes, depth {}, {} candidate pairs, {} contacts",
            tree.node_count(),
            tree.depth(),
            stats.candidate_pairs,
            stats.contacts
        );

        stats
    }

    fn name(&self) -> &'static str {
        "quadtree"
    }
}

/// Detection strategy selected by configuration
///
/// # Examples
///
/// ```
/// use collision::collisions::DetectorKind;
///
/// assert_eq!(DetectorKind::parse("quadtree"), DetectorKind::QuadTree);
/// assert_eq!(DetectorKind::parse("brute"), DetectorKind::BruteForce);
/// // Unknown names fall back to brute force
/// assert_eq!(DetectorKind::parse("spatial-hash"), DetectorKind::BruteForce);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DetectorKind {
    #[default]
    BruteForce,
    QuadTree,
}

impl DetectorKind {
    /// Parses a strategy name; empty or unknown names select brute force
    pub fn parse(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "quadtree" => DetectorKind::QuadTree,
            "brute" | "" => DetectorKind::BruteForce,
            other => {
                log::warn!("unknown collision strategy {other:?}, using brute force");
                DetectorKind::BruteForce
            }
        }
    }

    /// Builds the detector for this strategy
    pub fn build(self, config: &SimulationConfig) -> Box<dyn CollisionDetector> {
        match self {
            DetectorKind::BruteForce => Box::new(BruteForceDetector),
            DetectorKind::QuadTree => Box::new(QuadTreeDetector::from_config(config)),
        }
    }
}
