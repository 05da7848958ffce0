//! Core types for the Pong simulation.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::field::WIN_SCORE;

/// 2D vector in normalized field units
#[derive(Debug, Copy, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub fn new(x: f32, y: f32) -> Self {
        Vec2 { x, y }
    }

    pub fn zero() -> Self {
        Vec2 { x: 0.0, y: 0.0 }
    }
}

/// Player (and paddle) identity. Player one defends the left goal line.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Player {
    One,
    Two,
}

impl Player {
    /// Get the opposing player
    pub fn opposite(self) -> Player {
        match self {
            Player::One => Player::Two,
            Player::Two => Player::One,
        }
    }

    pub(crate) fn index(self) -> usize {
        match self {
            Player::One => 0,
            Player::Two => 1,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Player::One => "Player One",
            Player::Two => "Player Two",
        }
    }
}

/// Match phase
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum MatchPhase {
    /// No ball in play, waiting for a serve
    #[default]
    Idle,
    /// Ball moving
    InPlay,
    /// Match over, terminal until reset
    Won(Player),
}

/// Paddle state
#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct PaddleState {
    /// Center y position
    pub position_y: f32,
    /// Signed vertical speed, zero when no key is held
    pub velocity_y: f32,
}

impl PaddleState {
    pub fn new(position_y: f32) -> Self {
        PaddleState {
            position_y,
            velocity_y: 0.0,
        }
    }
}

/// Ball state
#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct BallState {
    pub position: Vec2,
    pub velocity: Vec2,
    pub in_play: bool,
}

impl BallState {
    /// Take the ball out of play and park it at the center spot.
    pub fn clear(&mut self) {
        self.position = Vec2::zero();
        self.in_play = false;
    }
}

/// Points per player
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub struct ScoreState {
    pub player_one: u8,
    pub player_two: u8,
}

impl ScoreState {
    pub fn get(&self, player: Player) -> u8 {
        match player {
            Player::One => self.player_one,
            Player::Two => self.player_two,
        }
    }

    /// Award one point and return the new tally.
    pub fn award(&mut self, player: Player) -> u8 {
        let total = match player {
            Player::One => &mut self.player_one,
            Player::Two => &mut self.player_two,
        };
        *total += 1;
        debug_assert!(*total <= WIN_SCORE, "score past WIN_SCORE: {}", *total);
        *total
    }

    /// The player who has reached `WIN_SCORE`, if any
    pub fn winner(&self) -> Option<Player> {
        if self.player_one >= WIN_SCORE {
            Some(Player::One)
        } else if self.player_two >= WIN_SCORE {
            Some(Player::Two)
        } else {
            None
        }
    }
}

/// Complete simulation state, owned by the orchestrator
#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct SimulationState {
    pub phase: MatchPhase,
    pub paddles: [PaddleState; 2],
    pub ball: BallState,
    pub score: ScoreState,
}

impl SimulationState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn paddle(&self, player: Player) -> &PaddleState {
        &self.paddles[player.index()]
    }

    /// Read-only view for presentation layers
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            paddle_one_y: self.paddles[0].position_y,
            paddle_two_y: self.paddles[1].position_y,
            ball_position: self.ball.position,
            ball_in_play: self.ball.in_play,
            score_one: self.score.player_one,
            score_two: self.score.player_two,
            phase: self.phase,
        }
    }
}

/// Control signals for one step
#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct Inputs {
    /// One of `+PADDLE_SPEED`, `-PADDLE_SPEED`, or 0
    pub paddle_one_velocity: f32,
    pub paddle_two_velocity: f32,
    /// Pulse: true for exactly one step
    pub serve_requested: bool,
    /// Pulse: true for exactly one step
    pub reset_requested: bool,
}

impl Inputs {
    pub fn new(paddle_one_velocity: f32, paddle_two_velocity: f32) -> Self {
        Inputs {
            paddle_one_velocity,
            paddle_two_velocity,
            ..Default::default()
        }
    }

    pub fn idle() -> Self {
        Self::default()
    }

    pub fn serve() -> Self {
        Inputs {
            serve_requested: true,
            ..Default::default()
        }
    }

    pub fn reset() -> Self {
        Inputs {
            reset_requested: true,
            ..Default::default()
        }
    }
}

/// View data for rendering (normalized coordinates)
#[derive(Debug, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Snapshot {
    pub paddle_one_y: f32,
    pub paddle_two_y: f32,
    pub ball_position: Vec2,
    pub ball_in_play: bool,
    pub score_one: u8,
    pub score_two: u8,
    pub phase: MatchPhase,
}

/// Events emitted by a step, drained by the caller
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Event {
    ScoreChanged { player: Player, new_total: u8 },
    MatchWon { winner: Player },
    WinCleared,
}
