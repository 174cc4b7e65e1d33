//! Simulation configuration
//!
//! Every field is optional when deserializing; missing fields take the
//! defaults below (an 800×600 arena with 30 particles of radius 20 to 50).
//!
//! ```json
//! {
//!   "arena_width": 800.0,
//!   "arena_height": 600.0,
//!   "particle_count": 50,
//!   "min_radius": 20.0,
//!   "max_radius": 20.0,
//!   "strategy": "quadtree",
//!   "capacity": 4,
//!   "query_margin": 3.0,
//!   "pair_policy": "ordered",
//!   "seed": 7
//! }
//! ```

use serde::{Deserialize, Serialize};

use crate::collisions::{DEFAULT_QUERY_MARGIN, DetectorKind, PairPolicy};
use crate::error::{Error, Result};
use crate::quadtree::{DEFAULT_CAPACITY, DEFAULT_MAX_DEPTH};

/// Arena size, initial particle distribution and detector tuning
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Arena width; also the quadtree root width
    #[serde(default = "default_arena_width")]
    pub arena_width: f64,
    /// Arena height; also the quadtree root height
    #[serde(default = "default_arena_height")]
    pub arena_height: f64,
    #[serde(default = "default_particle_count")]
    pub particle_count: usize,
    #[serde(default = "default_min_radius")]
    pub min_radius: f64,
    #[serde(default = "default_max_radius")]
    pub max_radius: f64,
    /// Lower bound of each initial velocity component
    #[serde(default = "default_min_velocity")]
    pub min_velocity: f64,
    /// Upper bound of each initial velocity component
    #[serde(default = "default_max_velocity")]
    pub max_velocity: f64,
    /// "brute" or "quadtree"; anything else means brute
    #[serde(default = "default_strategy")]
    pub strategy: String,
    /// Entries per quadtree node before it subdivides
    #[serde(default = "default_capacity")]
    pub capacity: usize,
    /// Depth at which quadtree nodes stop subdividing
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,
    /// Query half extent in multiples of the particle radius
    #[serde(default = "default_query_margin")]
    pub query_margin: f64,
    #[serde(default)]
    pub pair_policy: PairPolicy,
    /// Seed for the initial particle layout
    #[serde(default = "default_seed")]
    pub seed: u64,
}

fn default_arena_width() -> f64 {
    800.0
}

fn default_arena_height() -> f64 {
    600.0
}

fn default_particle_count() -> usize {
    30
}

fn default_min_radius() -> f64 {
    20.0
}

fn default_max_radius() -> f64 {
    50.0
}

fn default_min_velocity() -> f64 {
    -3.0
}

fn default_max_velocity() -> f64 {
    3.0
}

fn default_strategy() -> String {
    "brute".to_string()
}

fn default_capacity() -> usize {
    DEFAULT_CAPACITY
}

fn default_max_depth() -> usize {
    DEFAULT_MAX_DEPTH
}

fn default_query_margin() -> f64 {
    DEFAULT_QUERY_MARGIN
}

fn default_seed() -> u64 {
    42
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            arena_width: default_arena_width(),
            arena_height: default_arena_height(),
            particle_count: default_particle_count(),
            min_radius: default_min_radius(),
            max_radius: default_max_radius(),
            min_velocity: default_min_velocity(),
            max_velocity: default_max_velocity(),
            strategy: default_strategy(),
            capacity: default_capacity(),
            max_depth: default_max_depth(),
            query_margin: default_query_margin(),
            pair_policy: PairPolicy::default(),
            seed: default_seed(),
        }
    }
}

impl SimulationConfig {
    /// Parses a JSON configuration and validates it
    ///
    /// # Examples
    ///
    /// ```
    /// use collision::collisions::DetectorKind;
    /// use collision::config::SimulationConfig;
    ///
    /// let config = SimulationConfig::from_json_str(r#"{ "strategy": "quadtree" }"#).unwrap();
    /// assert_eq!(config.detector_kind(), DetectorKind::QuadTree);
    /// assert_eq!(config.arena_width, 800.0);
    /// ```
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: SimulationConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn with_strategy(mut self, strategy: &str) -> Self {
        self.strategy = strategy.to_string();
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Detection strategy named by `strategy`
    pub fn detector_kind(&self) -> DetectorKind {
        DetectorKind::parse(&self.strategy)
    }

    /// Checks that every value can produce a well-formed simulation
    pub fn validate(&self) -> Result<()> {
        let positive = |name: &str, value: f64| {
            if value.is_finite() && value > 0.0 {
                Ok(())
            } else {
                Err(Error::InvalidConfig(format!(
                    "{name} must be positive and finite, got {value}"
                )))
            }
        };

        positive("arena_width", self.arena_width)?;
        positive("arena_height", self.arena_height)?;
        positive("min_radius", self.min_radius)?;
        positive("max_radius", self.max_radius)?;
        positive("query_margin", self.query_margin)?;

        if self.min_radius > self.max_radius {
            return Err(Error::InvalidConfig(format!(
                "min_radius {} exceeds max_radius {}",
                self.min_radius, self.max_radius
            )));
        }

        let diameter = 2.0 * self.max_radius;
        if diameter > self.arena_width || diameter > self.arena_height {
            return Err(Error::InvalidConfig(format!(
                "particles of radius {} do not fit in a {}x{} arena",
                self.max_radius, self.arena_width, self.arena_height
            )));
        }

        if !(self.min_velocity.is_finite() && self.max_velocity.is_finite())
            || self.min_velocity > self.max_velocity
        {
            return Err(Error::InvalidConfig(format!(
                "velocity range [{}, {}] is empty",
                self.min_velocity, self.max_velocity
            )));
        }

        if self.min_velocity.ceil() > self.max_velocity.floor() {
            return Err(Error::InvalidConfig(format!(
                "velocity range [{}, {}] holds no whole number",
                self.min_velocity, self.max_velocity
            )));
        }

        if self.capacity == 0 {
            return Err(Error::InvalidConfig(
                "capacity must be at least 1".to_string(),
            ));
        }

        Ok(())
    }
}
