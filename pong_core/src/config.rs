//! Runtime configuration for the simulation.

/// Which collision and scoring rules the resolver applies
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum CollisionPolicy {
    /// Contact bands, clamp-on-reflect and center/edge speed modulation
    #[default]
    Refined,
    /// Plain sign flips: no clamping at the walls, no speed modulation
    Basic,
}

/// Simulation configuration
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Config {
    pub policy: CollisionPolicy,
    /// Largest `elapsed_seconds` a single step will integrate
    pub max_elapsed: f32,
    /// Seed for the default serve source; `None` seeds from OS entropy
    pub seed: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            policy: CollisionPolicy::Refined,
            max_elapsed: 1.0,
            seed: None,
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_policy(mut self, policy: CollisionPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_max_elapsed(mut self, max_elapsed: f32) -> Self {
        self.max_elapsed = max_elapsed;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Map a raw frame delta to the time a step may integrate.
    ///
    /// Negative and non-finite deltas become 0; large ones are cut to `max_elapsed`.
    pub fn clamp_elapsed(&self, elapsed_seconds: f32) -> f32 {
        if !elapsed_seconds.is_finite() || elapsed_seconds <= 0.0 {
            if elapsed_seconds != 0.0 {
                log::warn!("Ignoring invalid frame delta {elapsed_seconds}");
            }
            return 0.0;
        }

        let limit = self.max_elapsed.max(0.0);
        if elapsed_seconds > limit {
            log::warn!("Frame delta {elapsed_seconds:.3}s clamped to {limit:.3}s");
            limit
        } else {
            elapsed_seconds
        }
    }
}
