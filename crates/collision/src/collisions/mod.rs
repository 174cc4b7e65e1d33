//! Collision detection and resolution for circular particles
//!
//! This module provides pluggable detection strategies that share a single
//! elastic resolution routine.

pub mod detection;
pub mod resolution;


pub use detection::{
    BruteForceDetector, CollisionDetector, DEFAULT_QUERY_MARGIN, DetectionStats, DetectorKind,
    PairPolicy, QuadTreeDetector,
};
pub use resolution::{FALLBACK_NORMAL, resolve_collision, resolve_pair};
