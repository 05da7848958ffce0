//! Motion integration and collision/scoring resolution.

use crate::config::CollisionPolicy;
use crate::field::{self, *};
use crate::types::*;

/// Physics calculations for one simulation step
pub struct Physics;

impl Physics {
    /// Advance a paddle by its current velocity and keep it on the field
    pub fn update_paddle(paddle: &mut PaddleState, velocity_y: f32, elapsed: f32) {
        paddle.velocity_y = velocity_y;
        paddle.position_y = field::clamp_paddle_y(paddle.position_y + velocity_y * elapsed);
    }

    /// Advance the ball by its velocity. A ball out of play does not move.
    pub fn update_ball(ball: &mut BallState, elapsed: f32) {
        if !ball.in_play {
            return;
        }

        ball.position.x += ball.velocity.x * elapsed;
        ball.position.y += ball.velocity.y * elapsed;
    }

    /// Motion integrator: both paddles, then the ball.
    pub fn integrate(state: &mut SimulationState, inputs: &Inputs, elapsed: f32) {
        Self::update_paddle(&mut state.paddles[0], inputs.paddle_one_velocity, elapsed);
        Self::update_paddle(&mut state.paddles[1], inputs.paddle_two_velocity, elapsed);
        Self::update_ball(&mut state.ball, elapsed);
    }

    /// Collision and scoring resolver, run on the post-integration ball.
    ///
    /// Returns the player who scored, if the ball left the field. The score is
    /// already updated and a `ScoreChanged` event pushed in that case.
    pub fn resolve(
        state: &mut SimulationState,
        policy: CollisionPolicy,
        events: &mut Vec<Event>,
    ) -> Option<Player> {
        if !state.ball.in_play {
            return None;
        }

        if let Some(scorer) = Self::check_scoring(&state.ball) {
            let new_total = state.score.award(scorer);
            state.ball.clear();

            log::debug!(
                "P1 ({}) X ({}) P2",
                state.score.player_one,
                state.score.player_two
            );
            events.push(Event::ScoreChanged {
                player: scorer,
                new_total,
            });
            return Some(scorer);
        }

        Self::reflect_vertical(&mut state.ball, policy);

        for player in [Player::One, Player::Two] {
            let paddle = *state.paddle(player);
            Self::check_paddle_collision(&mut state.ball, &paddle, player, policy);
        }

        None
    }

    /// Check if the ball is past a goal line (scoring condition)
    pub fn check_scoring(ball: &BallState) -> Option<Player> {
        let x = ball.position.x;
        if x < -FIELD_EDGE || x > FIELD_EDGE {
            // The point goes to whoever defends the other goal line
            let defender = if x < 0.0 { Player::One } else { Player::Two };
            Some(defender.opposite())
        } else {
            None
        }
    }

    /// Bounce the ball off the floor or ceiling. Returns true on a bounce.
    pub fn reflect_vertical(ball: &mut BallState, policy: CollisionPolicy) -> bool {
        let y = ball.position.y;
        if (-FIELD_EDGE..=FIELD_EDGE).contains(&y) {
            return false;
        }

        if policy == CollisionPolicy::Refined {
            ball.position.y = FIELD_EDGE.copysign(y);
        }
        ball.velocity.y = -ball.velocity.y;
        true
    }

    /// Check for a paddle hit and rebound the ball. Returns true on contact.
    pub fn check_paddle_collision(
        ball: &mut BallState,
        paddle: &PaddleState,
        side: Player,
        policy: CollisionPolicy,
    ) -> bool {
        let diff = (ball.position.y - paddle.position_y).abs();
        if diff >= CONTACT_LIMIT {
            return false;
        }

        // Player one's paddle sits at -BORDER; mirror so both sides test the same band.
        let facing = match side {
            Player::One => -1.0,
            Player::Two => 1.0,
        };
        let depth = ball.position.x * facing;

        match policy {
            CollisionPolicy::Basic => {
                if depth > CONTACT_LINE {
                    ball.velocity.x = -ball.velocity.x;
                    return true;
                }
                false
            }
            CollisionPolicy::Refined => {
                if depth <= CONTACT_LINE || depth >= BORDER {
                    return false;
                }

                ball.position.x = CONTACT_LINE * facing;
                let sweet_spot = match side {
                    Player::One => LEFT_SWEET_SPOT,
                    Player::Two => RIGHT_SWEET_SPOT,
                };
                let approach = ball.velocity.x * facing;
                ball.velocity.x = Self::rebound_speed(approach, diff, sweet_spot) * facing;
                true
            }
        }
    }

    /// Rebound speed for a ball approaching a paddle at `approach` (positive
    /// means towards the paddle). Returns the new velocity along the same
    /// axis, negative meaning away from the paddle.
    ///
    /// Center hits (within `sweet_spot * CONTACT_LIMIT`) pull the rebound up
    /// towards `REBOUND_SPEED_CAP`, edge hits slow it down.
    pub fn rebound_speed(approach: f32, diff: f32, sweet_spot: f32) -> f32 {
        if approach >= REBOUND_SPEED_CAP {
            return -approach;
        }

        let sign = if diff < sweet_spot * CONTACT_LIMIT {
            1.0
        } else {
            -1.0
        };
        -(approach + sign * (REBOUND_SPEED_CAP - approach) * 0.5)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ball_at(x: f32, y: f32, vx: f32, vy: f32) -> BallState {
        BallState {
            position: Vec2::new(x, y),
            velocity: Vec2::new(vx, vy),
            in_play: true,
        }
    }

    fn state_with_ball(ball: BallState) -> SimulationState {
        SimulationState {
            phase: MatchPhase::InPlay,
            ball,
            ..SimulationState::new()
        }
    }

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-5
    }

    #[test]
    fn test_paddle_movement() {
        let mut paddle = PaddleState::new(0.0);

        Physics::update_paddle(&mut paddle, PADDLE_SPEED, 0.1);
        assert!(close(paddle.position_y, 0.2));
        assert_eq!(paddle.velocity_y, PADDLE_SPEED);

        Physics::update_paddle(&mut paddle, -PADDLE_SPEED, 0.05);
        assert!(close(paddle.position_y, 0.1));

        Physics::update_paddle(&mut paddle, 0.0, 0.5);
        assert!(close(paddle.position_y, 0.1));
        assert_eq!(paddle.velocity_y, 0.0);
    }

    #[test]
    fn test_paddle_bounds() {
        let mut paddle = PaddleState::new(0.8);
        Physics::update_paddle(&mut paddle, PADDLE_SPEED, 1.0);
        assert_eq!(paddle.position_y, BORDER);

        Physics::update_paddle(&mut paddle, -PADDLE_SPEED, 5.0);
        assert_eq!(paddle.position_y, -BORDER);
    }

    #[test]
    fn test_zero_elapsed_is_noop() {
        let mut state = state_with_ball(ball_at(0.3, -0.2, 1.0, 1.0));
        state.paddles[0].position_y = 0.5;
        let before = state;

        Physics::integrate(&mut state, &Inputs::new(PADDLE_SPEED, -PADDLE_SPEED), 0.0);

        assert_eq!(state.ball.position, before.ball.position);
        assert_eq!(state.paddles[0].position_y, 0.5);
        assert_eq!(state.paddles[1].position_y, 0.0);
    }

    #[test]
    fn test_ball_out_of_play_does_not_move() {
        let mut ball = BallState {
            velocity: Vec2::new(1.0, 1.0),
            ..Default::default()
        };
        Physics::update_ball(&mut ball, 0.5);
        assert_eq!(ball.position, Vec2::zero());
    }

    #[test]
    fn test_scoring_detection() {
        assert_eq!(
            Physics::check_scoring(&ball_at(-1.01, 0.0, 0.0, 0.0)),
            Some(Player::Two)
        );
        assert_eq!(
            Physics::check_scoring(&ball_at(1.01, 0.0, 0.0, 0.0)),
            Some(Player::One)
        );
        assert_eq!(Physics::check_scoring(&ball_at(1.0, 0.0, 0.0, 0.0)), None);
        assert_eq!(Physics::check_scoring(&ball_at(0.0, 0.0, 0.0, 0.0)), None);
    }

    #[test]
    fn test_resolve_scoring_clears_ball_and_emits() {
        let mut state = state_with_ball(ball_at(1.2, 0.4, 2.0, 0.3));
        let mut events = Vec::new();

        let scorer = Physics::resolve(&mut state, CollisionPolicy::Refined, &mut events);

        assert_eq!(scorer, Some(Player::One));
        assert_eq!(state.score.player_one, 1);
        assert_eq!(state.score.player_two, 0);
        assert!(!state.ball.in_play);
        assert_eq!(state.ball.position, Vec2::zero());
        assert_eq!(
            events,
            vec![Event::ScoreChanged {
                player: Player::One,
                new_total: 1
            }]
        );
    }

    #[test]
    fn test_resolve_ignores_ball_out_of_play() {
        let mut state = SimulationState::new();
        state.ball.position = Vec2::new(5.0, 5.0);
        let mut events = Vec::new();

        assert_eq!(
            Physics::resolve(&mut state, CollisionPolicy::Refined, &mut events),
            None
        );
        assert!(events.is_empty());
        assert_eq!(state.score, ScoreState::default());
    }

    #[test]
    fn test_resolve_uses_each_sides_own_paddle() {
        // Only player two's paddle lines up with the ball
        let mut state = state_with_ball(ball_at(0.88, 0.36, 1.0, 0.2));
        state.paddles[0].position_y = -0.5;
        state.paddles[1].position_y = 0.3;
        let mut events = Vec::new();

        assert_eq!(
            Physics::resolve(&mut state, CollisionPolicy::Refined, &mut events),
            None
        );
        assert!(close(state.ball.position.x, 0.85));
        assert!(close(state.ball.velocity.x, -1.5));

        // Same ball on the left goes past player one's misplaced paddle
        let mut state = state_with_ball(ball_at(-0.88, 0.36, -1.0, 0.2));
        state.paddles[0].position_y = -0.5;
        state.paddles[1].position_y = 0.3;

        Physics::resolve(&mut state, CollisionPolicy::Refined, &mut events);
        assert_eq!(state.ball.velocity.x, -1.0);
        assert!(events.is_empty());
    }

    #[test]
    fn test_refined_wall_reflection_clamps() {
        let mut ball = ball_at(0.0, 1.05, 0.5, 1.0);
        assert!(Physics::reflect_vertical(&mut ball, CollisionPolicy::Refined));
        assert_eq!(ball.position.y, 1.0);
        assert_eq!(ball.velocity.y, -1.0);

        let mut ball = ball_at(0.0, -1.2, 0.5, -0.7);
        assert!(Physics::reflect_vertical(&mut ball, CollisionPolicy::Refined));
        assert_eq!(ball.position.y, -1.0);
        assert_eq!(ball.velocity.y, 0.7);

        let mut ball = ball_at(0.0, 0.99, 0.5, 1.0);
        assert!(!Physics::reflect_vertical(&mut ball, CollisionPolicy::Refined));
        assert_eq!(ball.velocity.y, 1.0);
    }

    #[test]
    fn test_basic_wall_reflection_does_not_clamp() {
        let mut ball = ball_at(0.0, 1.05, 0.5, 1.0);
        assert!(Physics::reflect_vertical(&mut ball, CollisionPolicy::Basic));
        assert_eq!(ball.position.y, 1.05);
        assert_eq!(ball.velocity.y, -1.0);
    }

    #[test]
    fn test_left_paddle_rebound_scenario() {
        // Ball at x=-0.85 heading left into a centered paddle one.
        let mut state = state_with_ball(ball_at(-0.85, 0.0, -1.0, 0.0));
        let mut events = Vec::new();

        Physics::integrate(&mut state, &Inputs::idle(), 0.02);
        assert!(state.ball.position.x < -CONTACT_LINE);
        Physics::resolve(&mut state, CollisionPolicy::Refined, &mut events);

        assert!(state.ball.velocity.x > 0.0);
        assert!(close(state.ball.position.x, -0.85));
        // center hit speeds the rebound up: -(-1 - (1)*0.5) = 1.5
        assert!(close(state.ball.velocity.x, 1.5));
        assert!(events.is_empty());
    }

    #[test]
    fn test_left_paddle_edge_hit_slows_rebound() {
        let mut ball = ball_at(-0.87, 0.07, -1.0, 0.0);
        let paddle = PaddleState::new(0.0);

        assert!(Physics::check_paddle_collision(
            &mut ball,
            &paddle,
            Player::One,
            CollisionPolicy::Refined
        ));
        assert!(close(ball.velocity.x, 0.5));
    }

    #[test]
    fn test_left_paddle_fast_ball_just_flips() {
        let mut ball = ball_at(-0.87, 0.0, -2.5, 0.0);
        let paddle = PaddleState::new(0.0);

        assert!(Physics::check_paddle_collision(
            &mut ball,
            &paddle,
            Player::One,
            CollisionPolicy::Refined
        ));
        assert_eq!(ball.velocity.x, 2.5);
    }

    #[test]
    fn test_right_paddle_rebound() {
        // diff 0.06 is inside the right paddle's wider sweet spot (0.075)
        let mut ball = ball_at(0.88, 0.36, 1.0, 0.2);
        let paddle = PaddleState::new(0.3);

        assert!(Physics::check_paddle_collision(
            &mut ball,
            &paddle,
            Player::Two,
            CollisionPolicy::Refined
        ));
        assert!(close(ball.position.x, 0.85));
        assert!(close(ball.velocity.x, -1.5));
        assert_eq!(ball.velocity.y, 0.2);

        let mut ball = ball_at(0.88, 0.39, 1.0, 0.0);
        assert!(Physics::check_paddle_collision(
            &mut ball,
            &paddle,
            Player::Two,
            CollisionPolicy::Refined
        ));
        assert!(close(ball.velocity.x, -0.5));
    }

    #[test]
    fn test_paddle_miss() {
        let paddle = PaddleState::new(0.5);

        // Too far vertically
        let mut ball = ball_at(-0.87, 0.0, -1.0, 0.0);
        assert!(!Physics::check_paddle_collision(
            &mut ball,
            &paddle,
            Player::One,
            CollisionPolicy::Refined
        ));
        assert_eq!(ball.velocity.x, -1.0);

        // Behind the paddle: refined band ends at the border
        let paddle = PaddleState::new(0.0);
        let mut ball = ball_at(-0.95, 0.0, -1.0, 0.0);
        assert!(!Physics::check_paddle_collision(
            &mut ball,
            &paddle,
            Player::One,
            CollisionPolicy::Refined
        ));
        assert_eq!(ball.position.x, -0.95);

        // Middle of the field
        let mut ball = ball_at(0.5, 0.0, 1.0, 0.0);
        assert!(!Physics::check_paddle_collision(
            &mut ball,
            &paddle,
            Player::Two,
            CollisionPolicy::Refined
        ));
    }

    #[test]
    fn test_basic_paddle_contact_flips_without_clamp() {
        let paddle = PaddleState::new(0.0);

        let mut ball = ball_at(-0.95, 0.05, -1.0, 0.0);
        assert!(Physics::check_paddle_collision(
            &mut ball,
            &paddle,
            Player::One,
            CollisionPolicy::Basic
        ));
        assert_eq!(ball.velocity.x, 1.0);
        assert_eq!(ball.position.x, -0.95);

        let mut ball = ball_at(0.87, -0.05, 1.3, 0.0);
        assert!(Physics::check_paddle_collision(
            &mut ball,
            &paddle,
            Player::Two,
            CollisionPolicy::Basic
        ));
        assert_eq!(ball.velocity.x, -1.3);
    }

    #[test]
    fn test_rebound_speed() {
        assert!(close(Physics::rebound_speed(1.0, 0.0, LEFT_SWEET_SPOT), -1.5));
        assert!(close(Physics::rebound_speed(1.0, 0.09, LEFT_SWEET_SPOT), -0.5));
        assert!(close(Physics::rebound_speed(2.0, 0.0, LEFT_SWEET_SPOT), -2.0));
        assert!(close(Physics::rebound_speed(3.0, 0.0, LEFT_SWEET_SPOT), -3.0));
        // A stationary ball is kicked away at half the cap
        assert!(close(Physics::rebound_speed(0.0, 0.0, RIGHT_SWEET_SPOT), -1.0));
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        fn paddle_velocity() -> impl Strategy<Value = f32> {
            prop_oneof![Just(-PADDLE_SPEED), Just(0.0), Just(PADDLE_SPEED)]
        }

        proptest! {
            /// Property: paddles never leave [-BORDER, BORDER]
            #[test]
            fn prop_paddle_stays_on_field(
                start in -BORDER..=BORDER,
                velocity in paddle_velocity(),
                elapsed in 0.0f32..10.0f32,
            ) {
                let mut paddle = PaddleState::new(start);
                Physics::update_paddle(&mut paddle, velocity, elapsed);
                prop_assert!(paddle.position_y >= -BORDER && paddle.position_y <= BORDER);
            }

            /// Property: after refined resolution the ball is vertically on the field
            /// and a bounce flips the vertical velocity exactly once
            #[test]
            fn prop_refined_reflection_bounds(
                x in -0.8f32..0.8f32,
                y in -1.0f32..=1.0f32,
                vx in -1.5f32..1.5f32,
                vy in -3.0f32..3.0f32,
                elapsed in 0.0f32..0.5f32,
            ) {
                let mut state = state_with_ball(ball_at(x, y, vx, vy));
                let mut events = Vec::new();
                Physics::integrate(&mut state, &Inputs::idle(), elapsed);
                let moved_y = state.ball.position.y;
                let scored = Physics::resolve(&mut state, CollisionPolicy::Refined, &mut events);

                prop_assert!(state.ball.position.y >= -FIELD_EDGE);
                prop_assert!(state.ball.position.y <= FIELD_EDGE);
                if scored.is_none() {
                    let bounced = !(-FIELD_EDGE..=FIELD_EDGE).contains(&moved_y);
                    if bounced {
                        prop_assert_eq!(state.ball.velocity.y, -vy);
                    } else {
                        prop_assert_eq!(state.ball.velocity.y, vy);
                    }
                }
            }

            /// Property: exiting left always scores for player two, right for player one
            #[test]
            fn prop_scoring_attribution(
                overshoot in 0.001f32..5.0f32,
                y in -1.0f32..=1.0f32,
                left in any::<bool>(),
            ) {
                let x = if left { -FIELD_EDGE - overshoot } else { FIELD_EDGE + overshoot };
                let mut state = state_with_ball(ball_at(x, y, 0.0, 0.0));
                state.score = ScoreState { player_one: 4, player_two: 6 };
                let mut events = Vec::new();

                let scorer = Physics::resolve(&mut state, CollisionPolicy::Refined, &mut events);

                if left {
                    prop_assert_eq!(scorer, Some(Player::Two));
                    prop_assert_eq!(state.score, ScoreState { player_one: 4, player_two: 7 });
                } else {
                    prop_assert_eq!(scorer, Some(Player::One));
                    prop_assert_eq!(state.score, ScoreState { player_one: 5, player_two: 6 });
                }
                prop_assert!(!state.ball.in_play);
                prop_assert_eq!(state.ball.position, Vec2::zero());
                prop_assert_eq!(events.len(), 1);
            }
        }
    }
}
