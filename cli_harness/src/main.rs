//! CLI harness for playing pong_core with two local players.

use color_eyre::eyre::{bail, eyre, WrapErr};
use color_eyre::Result;
use crossterm::{
    cursor::{Hide, MoveTo, Show},
    event::{
        poll, read, Event as TermEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers,
        KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{
        disable_raw_mode, enable_raw_mode, supports_keyboard_enhancement, Clear, ClearType,
        EnterAlternateScreen, LeaveAlternateScreen,
    },
};
use pong_core::field::{BORDER, CONTACT_LIMIT};
use pong_core::*;
use std::io::{stdout, Stdout, Write};
use std::time::{Duration, Instant};

const FIELD_WIDTH: usize = 60;
const FIELD_HEIGHT: usize = 21;

/// Frame deltas above this are treated as a stall
const MAX_FRAME_DELTA: f32 = 0.1;

/// How long a tap holds a paddle key when the terminal never reports releases
const TAP_HOLD: Duration = Duration::from_millis(150);

const USAGE: &str = "\
usage: cli_harness [--basic] [--seed <u64>] [--max-dt <seconds>]

  --basic           plain sign-flip collisions instead of the refined rules
  --seed <u64>      reproducible serve directions
  --max-dt <secs>   largest frame delta integrated in one step (default 0.1)";

/// Keyboard capability detection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum KeyboardMode {
    Enhanced, // Supports KeyEventKind::Release
    Tap,      // Fallback: presses hold for TAP_HOLD
}

fn detect_keyboard_capabilities() -> KeyboardMode {
    match supports_keyboard_enhancement() {
        Ok(true) => KeyboardMode::Enhanced,
        Ok(false) | Err(_) => KeyboardMode::Tap,
    }
}

fn map_keycode_to_control(code: KeyCode) -> Option<Control> {
    match code {
        KeyCode::Char('w') | KeyCode::Char('W') => Some(Control::PlayerOneUp),
        KeyCode::Char('s') | KeyCode::Char('S') => Some(Control::PlayerOneDown),
        KeyCode::Up => Some(Control::PlayerTwoUp),
        KeyCode::Down => Some(Control::PlayerTwoDown),
        KeyCode::Char(' ') => Some(Control::Serve),
        KeyCode::Char('r') | KeyCode::Char('R') => Some(Control::Reset),
        _ => None,
    }
}

fn opposite_direction(control: Control) -> Option<Control> {
    match control {
        Control::PlayerOneUp => Some(Control::PlayerOneDown),
        Control::PlayerOneDown => Some(Control::PlayerOneUp),
        Control::PlayerTwoUp => Some(Control::PlayerTwoDown),
        Control::PlayerTwoDown => Some(Control::PlayerTwoUp),
        Control::Serve | Control::Reset => None,
    }
}

/// Input layer: terminal keys to pong_core controls
struct InputSystem {
    mode: KeyboardMode,
    controls: Controls,
    /// Tap mode only: when each held direction auto-releases
    tap_deadlines: Vec<(Control, Instant)>,
}

impl InputSystem {
    fn new(mode: KeyboardMode) -> Self {
        Self {
            mode,
            controls: Controls::new(),
            tap_deadlines: Vec::new(),
        }
    }

    fn mode_description(&self) -> &'static str {
        match self.mode {
            KeyboardMode::Enhanced => "Enhanced (Hold keys)",
            KeyboardMode::Tap => "Tap (Key repeat holds)",
        }
    }

    fn handle_key_event(&mut self, event: KeyEvent, now: Instant) {
        let Some(control) = map_keycode_to_control(event.code) else {
            return;
        };

        match (self.mode, event.kind) {
            (_, KeyEventKind::Press | KeyEventKind::Repeat) => {
                self.controls.press(control);
                if self.mode == KeyboardMode::Tap {
                    self.hold_for_tap(control, now);
                }
            }
            (KeyboardMode::Enhanced, KeyEventKind::Release) => self.controls.release(control),
            (KeyboardMode::Tap, KeyEventKind::Release) => {}
        }
    }

    fn hold_for_tap(&mut self, control: Control, now: Instant) {
        let Some(opposite) = opposite_direction(control) else {
            return;
        };

        self.controls.release(opposite);
        self.tap_deadlines
            .retain(|(held, _)| *held != control && *held != opposite);
        self.tap_deadlines.push((control, now + TAP_HOLD));
    }

    /// Release tap-held keys whose window ran out
    fn expire_taps(&mut self, now: Instant) {
        let controls = &mut self.controls;
        self.tap_deadlines.retain(|(control, deadline)| {
            if *deadline <= now {
                controls.release(*control);
                false
            } else {
                true
            }
        });
    }

    fn take_inputs(&mut self) -> Inputs {
        self.controls.take_inputs()
    }
}

/// Normalized field coordinates to terminal cells (y up on the field, down on screen)
fn field_to_cell(x: f32, y: f32) -> (usize, usize) {
    let col = ((x.clamp(-1.0, 1.0) + 1.0) / 2.0 * (FIELD_WIDTH - 1) as f32).round() as usize;
    let row = ((1.0 - y.clamp(-1.0, 1.0)) / 2.0 * (FIELD_HEIGHT - 1) as f32).round() as usize;
    (col, row)
}

/// Rows covered by a paddle centered at `y`, drawn as wide as its hit zone
fn paddle_rows(y: f32) -> (usize, usize) {
    let (_, top) = field_to_cell(0.0, y + CONTACT_LIMIT);
    let (_, bottom) = field_to_cell(0.0, y - CONTACT_LIMIT);
    (top, bottom)
}

/// Parse command-line flags. `Ok(None)` means usage was printed.
fn parse_args(args: impl IntoIterator<Item = String>) -> Result<Option<Config>> {
    let mut config = Config::default().with_max_elapsed(MAX_FRAME_DELTA);
    let mut args = args.into_iter();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--basic" => config = config.with_policy(CollisionPolicy::Basic),
            "--seed" => {
                let value = args.next().ok_or_else(|| eyre!("--seed needs a value"))?;
                let seed = value
                    .parse()
                    .wrap_err_with(|| format!("invalid seed {value:?}"))?;
                config = config.with_seed(seed);
            }
            "--max-dt" => {
                let value = args.next().ok_or_else(|| eyre!("--max-dt needs a value"))?;
                let max_dt: f32 = value
                    .parse()
                    .wrap_err_with(|| format!("invalid --max-dt {value:?}"))?;
                if !(max_dt.is_finite() && max_dt > 0.0) {
                    bail!("--max-dt must be a positive number of seconds, got {value}");
                }
                config = config.with_max_elapsed(max_dt);
            }
            "-h" | "--help" => {
                println!("{USAGE}");
                return Ok(None);
            }
            other => bail!("unknown argument {other:?}\n\n{USAGE}"),
        }
    }

    Ok(Some(config))
}

/// Combine the session result with the terminal cleanup results.
/// A session error wins; otherwise the first failed cleanup step is reported.
fn settle<const N: usize>(
    session: Result<()>,
    cleanup: [(std::io::Result<()>, &'static str); N],
) -> Result<()> {
    let mut first_failure: Option<color_eyre::Report> = None;
    for (outcome, context) in cleanup {
        if let Err(e) = outcome {
            log::error!("{context}: {e}");
            if first_failure.is_none() {
                first_failure = Some(color_eyre::Report::new(e).wrap_err(context));
            }
        }
    }
    session?;
    match first_failure {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

/// CLI application state
struct CliApp {
    game: Game,
    running: bool,
    last_frame: Instant,
    input_system: InputSystem,
    show_help: bool,
    message: Option<String>,
}

impl CliApp {
    fn new(config: Config) -> Self {
        let input_system = InputSystem::new(detect_keyboard_capabilities());
        log::info!("Input mode: {}", input_system.mode_description());
        log::info!("Collision policy: {:?}", config.policy);

        Self {
            game: Game::new(config),
            running: true,
            last_frame: Instant::now(),
            input_system,
            show_help: true,
            message: None,
        }
    }

    fn run(&mut self) -> Result<()> {
        enable_raw_mode().wrap_err("failed to enable raw mode")?;

        let mut stdout = stdout();
        let enhanced = self.input_system.mode == KeyboardMode::Enhanced;

        let result = self
            .enter_screen(&mut stdout, enhanced)
            .and_then(|()| self.game_loop(&mut stdout));

        // Every cleanup step runs even if an earlier one failed
        let pop = if enhanced {
            queue!(stdout, PopKeyboardEnhancementFlags)
        } else {
            Ok(())
        };
        let leave = execute!(stdout, LeaveAlternateScreen, Show);
        let raw = disable_raw_mode();

        settle(
            result,
            [
                (pop, "failed to restore keyboard flags"),
                (leave, "failed to leave alternate screen"),
                (raw, "failed to disable raw mode"),
            ],
        )
    }

    fn enter_screen(&self, stdout: &mut Stdout, enhanced: bool) -> Result<()> {
        if enhanced {
            queue!(
                stdout,
                PushKeyboardEnhancementFlags(
                    KeyboardEnhancementFlags::REPORT_EVENT_TYPES
                        | KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES
                )
            )?;
        }

        execute!(stdout, EnterAlternateScreen, Hide, Clear(ClearType::All))?;
        Ok(())
    }

    fn game_loop(&mut self, stdout: &mut Stdout) -> Result<()> {
        let frame_time = Duration::from_millis(1000 / 60);
        self.last_frame = Instant::now();

        while self.running {
            let frame_start = Instant::now();
            self.handle_input()?;
            self.update();
            self.render(stdout)?;

            std::thread::sleep(frame_time.saturating_sub(frame_start.elapsed()));
        }

        Ok(())
    }

    fn handle_input(&mut self) -> Result<()> {
        let now = Instant::now();

        while poll(Duration::from_millis(0)).wrap_err("failed to poll terminal events")? {
            let TermEvent::Key(event) = read().wrap_err("failed to read terminal event")? else {
                continue;
            };

            if event.kind == KeyEventKind::Press {
                match event.code {
                    KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                        self.running = false;
                    }
                    KeyCode::Char('c') if event.modifiers.contains(KeyModifiers::CONTROL) => {
                        self.running = false;
                    }
                    KeyCode::Char('h') | KeyCode::Char('H') => {
                        self.show_help = !self.show_help;
                    }
                    _ => {}
                }
            }

            self.input_system.handle_key_event(event, now);
        }

        self.input_system.expire_taps(now);
        Ok(())
    }

    fn update(&mut self) {
        let now = Instant::now();
        let elapsed = now.duration_since(self.last_frame).as_secs_f32();
        self.last_frame = now;

        let inputs = self.input_system.take_inputs();
        let (_, events) = self.game.step(elapsed, &inputs);

        for event in events {
            match event {
                Event::ScoreChanged { player, new_total } if new_total > 0 => {
                    self.message = Some(format!("{} scores! ({new_total})", player.label()));
                }
                Event::ScoreChanged { .. } => {}
                Event::MatchWon { winner } => {
                    self.message = Some(format!("{} wins! Press R for a rematch", winner.label()));
                }
                Event::WinCleared => {
                    self.message = None;
                }
            }
        }

        if inputs.serve_requested && self.game.is_active() {
            self.message = None;
        }
    }

    fn render(&self, stdout: &mut Stdout) -> Result<()> {
        let snapshot = self.game.snapshot();
        let mut row = 0;

        queue!(stdout, Clear(ClearType::All))?;

        queue!(
            stdout,
            MoveTo(0, row),
            SetForegroundColor(Color::Cyan),
            Print("PONG"),
            ResetColor
        )?;
        row += 1;

        queue!(
            stdout,
            MoveTo(0, row),
            SetForegroundColor(Color::Yellow),
            Print(format!(
                "Player One {}  -  {} Player Two",
                snapshot.score_one, snapshot.score_two
            )),
            ResetColor
        )?;
        row += 1;

        queue!(
            stdout,
            MoveTo(0, row),
            Print(format!("Status: {}", self.game.status_string()))
        )?;
        row += 1;

        row = self.render_field(stdout, &snapshot, row)?;

        if let Some(message) = &self.message {
            queue!(
                stdout,
                MoveTo(0, row),
                SetForegroundColor(Color::Magenta),
                Print(message),
                ResetColor
            )?;
        }
        row += 1;

        if self.show_help {
            self.render_help(stdout, &snapshot, row)?;
        }

        stdout.flush()?;
        Ok(())
    }

    fn render_field(&self, stdout: &mut Stdout, snapshot: &Snapshot, mut row: u16) -> Result<u16> {
        let ball = snapshot
            .ball_in_play
            .then(|| field_to_cell(snapshot.ball_position.x, snapshot.ball_position.y));
        let (left_col, _) = field_to_cell(-BORDER, 0.0);
        let (right_col, _) = field_to_cell(BORDER, 0.0);
        let left_rows = paddle_rows(snapshot.paddle_one_y);
        let right_rows = paddle_rows(snapshot.paddle_two_y);

        queue!(
            stdout,
            MoveTo(0, row),
            Print(format!("┌{}┐", "─".repeat(FIELD_WIDTH)))
        )?;
        row += 1;

        for y in 0..FIELD_HEIGHT {
            queue!(stdout, MoveTo(0, row), Print("│"))?;

            for x in 0..FIELD_WIDTH {
                let (glyph, color) = if ball == Some((x, y)) {
                    ('●', Color::Red)
                } else if x == left_col && (left_rows.0..=left_rows.1).contains(&y) {
                    ('█', Color::Blue)
                } else if x == right_col && (right_rows.0..=right_rows.1).contains(&y) {
                    ('█', Color::Green)
                } else if x == FIELD_WIDTH / 2 {
                    ('┊', Color::DarkGrey)
                } else {
                    (' ', Color::White)
                };

                queue!(stdout, SetForegroundColor(color), Print(glyph), ResetColor)?;
            }

            queue!(stdout, Print("│"))?;
            row += 1;
        }

        queue!(
            stdout,
            MoveTo(0, row),
            Print(format!("└{}┘", "─".repeat(FIELD_WIDTH)))
        )?;
        row += 1;

        Ok(row)
    }

    fn render_help(&self, stdout: &mut Stdout, snapshot: &Snapshot, mut row: u16) -> Result<()> {
        let ball = self.game.state().ball;
        let lines = [
            "--- CONTROLS ---".to_string(),
            "Player One (Blue):  W/S to move up/down".to_string(),
            "Player Two (Green): ↑/↓ to move up/down".to_string(),
            "SPACE: Serve  |  R: Reset  |  H: Toggle help  |  Q/Esc: Quit".to_string(),
            format!(
                "Input Mode: {} | Policy: {:?}",
                self.input_system.mode_description(),
                self.game.config.policy
            ),
            format!(
                "Phase: {:?} | Ball: ({:.2}, {:.2}) vel ({:.2}, {:.2}) | Paddles: {:.2} / {:.2}",
                snapshot.phase,
                snapshot.ball_position.x,
                snapshot.ball_position.y,
                ball.velocity.x,
                ball.velocity.y,
                snapshot.paddle_one_y,
                snapshot.paddle_two_y
            ),
        ];

        row += 1;
        for line in lines {
            queue!(
                stdout,
                MoveTo(0, row),
                SetForegroundColor(Color::DarkGrey),
                Print(line),
                ResetColor
            )?;
            row += 1;
        }

        Ok(())
    }
}

fn main() -> Result<()> {
    color_eyre::install()?;
    env_logger::init();

    let Some(config) = parse_args(std::env::args().skip(1))? else {
        return Ok(());
    };

    // Restore the terminal on Ctrl+C even if raw mode swallowed it as a key
    ctrlc::set_handler(move || {
        let _ = disable_raw_mode();
        let _ = execute!(stdout(), LeaveAlternateScreen, Show);
        std::process::exit(0);
    })
    .wrap_err("failed to set Ctrl-C handler")?;

    let mut app = CliApp::new(config);
    app.run()
}
