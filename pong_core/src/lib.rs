//! Pong core simulation - frame-driven two-player pong
//!
//! The host calls [`Game::step`] once per rendered frame with the wall-clock
//! delta and the current [`Inputs`], then draws the returned [`Snapshot`] and
//! drains the returned [`Event`]s.

pub mod config;
pub mod field;
pub mod game;
pub mod input;
pub mod physics;
pub mod rules;
pub mod serve;
pub mod types;

pub use config::{CollisionPolicy, Config};
pub use game::{simulate, Game};
pub use input::{Control, Controls};
pub use serve::{FixedServe, RandomServe, ServeSource};
pub use types::*;
