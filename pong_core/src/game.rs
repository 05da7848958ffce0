//! Simulation step orchestration and match ownership.

use crate::config::Config;
use crate::field::{BORDER, WIN_SCORE};
use crate::physics::Physics;
use crate::rules::MatchRules;
use crate::serve::{RandomServe, ServeSource};
use crate::types::*;

/// Advance `state` by one frame.
///
/// Runs the motion integrator, then the collision/scoring resolver, then the
/// match state machine. Apart from `serve`, the result depends only on the
/// arguments.
pub fn simulate<S: ServeSource>(
    mut state: SimulationState,
    elapsed_seconds: f32,
    inputs: &Inputs,
    config: &Config,
    serve: &mut S,
) -> (SimulationState, Vec<Event>) {
    let elapsed = config.clamp_elapsed(elapsed_seconds);
    let mut events = Vec::new();

    Physics::integrate(&mut state, inputs, elapsed);
    let point = Physics::resolve(&mut state, config.policy, &mut events);
    MatchRules::advance(&mut state, inputs, point, serve, &mut events);

    check_invariants(&state);
    (state, events)
}

fn check_invariants(state: &SimulationState) {
    debug_assert!(
        state
            .paddles
            .iter()
            .all(|p| (-BORDER..=BORDER).contains(&p.position_y)),
        "paddle off the field: {:?}",
        state.paddles
    );
    debug_assert_eq!(
        state.ball.in_play,
        state.phase == MatchPhase::InPlay,
        "ball/phase mismatch in {:?}",
        state.phase
    );
    debug_assert!(
        state.ball.in_play || state.ball.position == Vec2::zero(),
        "idle ball away from center: {:?}",
        state.ball.position
    );
    debug_assert!(
        state.score.player_one <= WIN_SCORE && state.score.player_two <= WIN_SCORE,
        "score past WIN_SCORE: {:?}",
        state.score
    );
}

/// A match: simulation state, configuration and serve source
pub struct Game<S: ServeSource = RandomServe> {
    pub config: Config,
    state: SimulationState,
    serve: S,
}

impl Game<RandomServe> {
    /// Create a new match, serving from `config.seed` or OS entropy
    pub fn new(config: Config) -> Self {
        Self::with_serve(config, RandomServe::new(config.seed))
    }
}

impl<S: ServeSource> Game<S> {
    /// Create a new match with a custom serve source
    pub fn with_serve(config: Config, serve: S) -> Self {
        Game {
            config,
            state: SimulationState::new(),
            serve,
        }
    }

    /// Step the simulation forward by `elapsed_seconds` of wall-clock time
    pub fn step(&mut self, elapsed_seconds: f32, inputs: &Inputs) -> (Snapshot, Vec<Event>) {
        let (next, events) = simulate(
            self.state,
            elapsed_seconds,
            inputs,
            &self.config,
            &mut self.serve,
        );
        self.state = next;
        (self.state.snapshot(), events)
    }

    /// Read-only view for rendering
    pub fn snapshot(&self) -> Snapshot {
        self.state.snapshot()
    }

    pub fn state(&self) -> &SimulationState {
        &self.state
    }

    /// Replace the owned state, e.g. to resume from a saved frame
    pub fn restore(&mut self, state: SimulationState) {
        self.state = state;
    }

    /// Reset the match outside the regular step flow
    pub fn reset_match(&mut self) -> Vec<Event> {
        let mut events = Vec::new();
        MatchRules::reset(&mut self.state, &mut events);
        events
    }

    /// Get the winner (if the match is over)
    pub fn winner(&self) -> Option<Player> {
        match self.state.phase {
            MatchPhase::Won(winner) => Some(winner),
            _ => None,
        }
    }

    /// Check if a ball is in play
    pub fn is_active(&self) -> bool {
        matches!(self.state.phase, MatchPhase::InPlay)
    }

    /// Get a human-readable status string
    pub fn status_string(&self) -> &'static str {
        match self.state.phase {
            MatchPhase::Idle => "Press serve to launch the ball",
            MatchPhase::InPlay => "Playing",
            MatchPhase::Won(Player::One) => "Player One wins!",
            MatchPhase::Won(Player::Two) => "Player Two wins!",
        }
    }
}
