//! Fixed play-field geometry.
//!
//! The field is a normalized square: x runs from -1 (player one's goal line)
//! to +1 (player two's goal line), y from -1 (floor) to +1 (ceiling).

/// Paddle x-offset from the center line, and the paddle's vertical travel limit.
pub const BORDER: f32 = 0.9;

/// Ball positions beyond this magnitude are out of the field.
pub const FIELD_EDGE: f32 = 1.0;

/// Width of the contact band just inside each paddle.
pub const CONTACT_BAND: f32 = 0.05;

/// Maximum vertical distance between ball and paddle center that still counts as a hit.
pub const CONTACT_LIMIT: f32 = 0.1;

/// Fraction of `CONTACT_LIMIT` that counts as a center hit on the left paddle.
pub const LEFT_SWEET_SPOT: f32 = 0.5;

/// Fraction of `CONTACT_LIMIT` that counts as a center hit on the right paddle.
pub const RIGHT_SWEET_SPOT: f32 = 0.75;

/// Paddle speed while a direction key is held (units/second).
pub const PADDLE_SPEED: f32 = 2.0;

/// Horizontal rebound speed the refined contact rule converges towards.
pub const REBOUND_SPEED_CAP: f32 = 2.0;

/// Serve velocity components are sampled from `[-SERVE_SPEED_RANGE, SERVE_SPEED_RANGE]`.
pub const SERVE_SPEED_RANGE: f32 = 1.5;

/// Points needed to win a match.
pub const WIN_SCORE: u8 = 10;

/// Inner edge of the contact band (where a rebounding ball is placed).
pub const CONTACT_LINE: f32 = BORDER - CONTACT_BAND;

/// Clamp a paddle center to its legal travel range.
pub fn clamp_paddle_y(y: f32) -> f32 {
    y.clamp(-BORDER, BORDER)
}
