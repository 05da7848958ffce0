//! Serve velocity sources.
//!
//! Serving is the only random part of the simulation. Everything else is a
//! pure function of state, inputs and elapsed time.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::field::SERVE_SPEED_RANGE;
use crate::types::Vec2;

/// Supplies the ball velocity for each serve
pub trait ServeSource {
    fn serve_velocity(&mut self) -> Vec2;
}

/// Uniform random serve over `[-SERVE_SPEED_RANGE, SERVE_SPEED_RANGE]` per axis
pub struct RandomServe(StdRng);

impl RandomServe {
    pub fn from_entropy() -> Self {
        Self(StdRng::from_entropy())
    }

    pub fn seeded(seed: u64) -> Self {
        Self(StdRng::seed_from_u64(seed))
    }

    /// Seeded when a seed is given, entropy otherwise
    pub fn new(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self::seeded(seed),
            None => Self::from_entropy(),
        }
    }
}

impl ServeSource for RandomServe {
    fn serve_velocity(&mut self) -> Vec2 {
        let x = self.0.gen_range(-SERVE_SPEED_RANGE..=SERVE_SPEED_RANGE);
        let y = self.0.gen_range(-SERVE_SPEED_RANGE..=SERVE_SPEED_RANGE);
        Vec2::new(x, y)
    }
}

/// Always serves with the same velocity
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct FixedServe(pub Vec2);

impl ServeSource for FixedServe {
    fn serve_velocity(&mut self) -> Vec2 {
        self.0
    }
}

impl<S: ServeSource + ?Sized> ServeSource for &mut S {
    fn serve_velocity(&mut self) -> Vec2 {
        (**self).serve_velocity()
    }
}
