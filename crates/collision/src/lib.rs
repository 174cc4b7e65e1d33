//! Collision detection and resolution for circular particles bouncing in a
//! bounded arena.
//!
//! Two interchangeable strategies implement [`collisions::CollisionDetector`]:
//! an all-pairs scan and a quadtree neighbourhood scan. Both hand overlapping
//! pairs to the same elastic resolver.

pub mod collisions;
pub mod config;
pub mod error;
pub mod integrator;
pub mod particle;
pub mod quadtree;
pub mod simulation;
pub mod spawn;
pub mod state;


pub use error::{Error, Result};
