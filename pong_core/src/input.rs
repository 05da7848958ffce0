//! Device-agnostic input layer.
//!
//! Front ends translate their key events into [`Control`] presses and
//! releases; [`Controls::take_inputs`] turns the held keys into the
//! per-step [`Inputs`].

use crate::field::PADDLE_SPEED;
use crate::types::Inputs;

/// Logical game controls
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Control {
    PlayerOneUp,
    PlayerOneDown,
    PlayerTwoUp,
    PlayerTwoDown,
    Serve,
    Reset,
}

/// Held direction keys for one paddle
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
struct PaddleKeys {
    up_held: bool,
    down_held: bool,
}

impl PaddleKeys {
    fn velocity(&self) -> f32 {
        match (self.up_held, self.down_held) {
            (true, false) => PADDLE_SPEED,
            (false, true) => -PADDLE_SPEED,
            _ => 0.0,
        }
    }
}

/// Key state for both players plus pending serve/reset pulses
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Controls {
    player_one: PaddleKeys,
    player_two: PaddleKeys,
    serve_pending: bool,
    reset_pending: bool,
}

impl Controls {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn press(&mut self, control: Control) {
        self.set(control, true);
    }

    pub fn release(&mut self, control: Control) {
        self.set(control, false);
    }

    fn set(&mut self, control: Control, pressed: bool) {
        match control {
            Control::PlayerOneUp => self.player_one.up_held = pressed,
            Control::PlayerOneDown => self.player_one.down_held = pressed,
            Control::PlayerTwoUp => self.player_two.up_held = pressed,
            Control::PlayerTwoDown => self.player_two.down_held = pressed,
            // Pulses fire on press only
            Control::Serve => self.serve_pending |= pressed,
            Control::Reset => self.reset_pending |= pressed,
        }
    }

    /// Inputs for the next step. Serve and reset pulses are consumed.
    pub fn take_inputs(&mut self) -> Inputs {
        let inputs = self.peek_inputs();
        self.serve_pending = false;
        self.reset_pending = false;
        inputs
    }

    /// Inputs for the next step, without consuming pulses
    pub fn peek_inputs(&self) -> Inputs {
        Inputs {
            paddle_one_velocity: self.player_one.velocity(),
            paddle_two_velocity: self.player_two.velocity(),
            serve_requested: self.serve_pending,
            reset_requested: self.reset_pending,
        }
    }

    /// Release every key and drop pending pulses
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}
