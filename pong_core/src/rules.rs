//! Match state machine: serve, point, win and reset transitions.

use crate::field::WIN_SCORE;
use crate::serve::ServeSource;
use crate::types::*;

/// Phase transitions for a match
pub struct MatchRules;

impl MatchRules {
    /// Evaluate this step's transitions, after physics has run.
    ///
    /// `point` is the scorer reported by the resolver, if any. A reset
    /// supersedes everything else in the same step.
    pub fn advance<S: ServeSource>(
        state: &mut SimulationState,
        inputs: &Inputs,
        point: Option<Player>,
        serve: &mut S,
        events: &mut Vec<Event>,
    ) {
        if inputs.reset_requested {
            Self::reset(state, events);
            return;
        }

        if let Some(scorer) = point {
            Self::handle_point(state, scorer, events);
        }

        if inputs.serve_requested {
            Self::serve(state, serve);
        }
    }

    /// Back to a fresh match: `Idle`, zero scores, centered paddles, no ball.
    pub fn reset(state: &mut SimulationState, events: &mut Vec<Event>) {
        *state = SimulationState::new();

        events.push(Event::ScoreChanged {
            player: Player::One,
            new_total: 0,
        });
        events.push(Event::ScoreChanged {
            player: Player::Two,
            new_total: 0,
        });
        events.push(Event::WinCleared);

        log::info!("Match reset");
    }

    /// Launch the ball. Ignored unless the match is `Idle` with no winner.
    ///
    /// Returns true when the ball was served.
    pub fn serve<S: ServeSource>(state: &mut SimulationState, serve: &mut S) -> bool {
        if state.phase != MatchPhase::Idle || state.score.winner().is_some() {
            return false;
        }

        state.ball.position = Vec2::zero();
        state.ball.velocity = serve.serve_velocity();
        state.ball.in_play = true;
        state.phase = MatchPhase::InPlay;

        log::debug!(
            "Serve ({:.2}, {:.2})",
            state.ball.velocity.x,
            state.ball.velocity.y
        );
        true
    }

    /// A point ends the rally; reaching `WIN_SCORE` ends the match.
    pub fn handle_point(state: &mut SimulationState, scorer: Player, events: &mut Vec<Event>) {
        if state.phase != MatchPhase::InPlay {
            return;
        }

        state.phase = MatchPhase::Idle;

        if state.score.get(scorer) == WIN_SCORE {
            state.phase = MatchPhase::Won(scorer);
            events.push(Event::MatchWon { winner: scorer });
            log::info!(
                "{} wins {}-{}",
                scorer.label(),
                state.score.player_one,
                state.score.player_two
            );
        }
    }
}
