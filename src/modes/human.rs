use anyhow::{Context, Result};
use crossterm::{
    event::{Event, EventStream, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use log::info;
use rand::SeedableRng;
use rand::rngs::StdRng;
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::{Stderr, stderr};
use std::time::Duration;
use tokio::time::{MissedTickBehavior, interval};

use crate::game::GameConfig;
use crate::input::{InputHandler, KeyAction};
use crate::metrics::PlayStats;
use crate::render::Renderer;
use crate::session::{Session, SessionHandle};

/// Redraw step, about one display refresh at 60 Hz
const FRAME_INTERVAL: Duration = Duration::from_millis(16);

/// Keyboard play in the terminal
///
/// Owns the running [`Session`] and replaces it on restart. Game state is
/// never touched here; turns are forwarded and frames are read back.
pub struct HumanMode {
    config: GameConfig,
    seed: Option<u64>,
    session: SessionHandle,
    stats: PlayStats,
    renderer: Renderer,
    input_handler: InputHandler,
    should_quit: bool,
}

impl HumanMode {
    /// Start the first game; must be called inside a tokio runtime
    ///
    /// With a seed, game `n` of this run uses `seed + n` for food placement,
    /// where `n` counts every start including restarts mid-game.
    pub fn new(config: GameConfig, seed: Option<u64>) -> Self {
        let mut stats = PlayStats::new();
        let session = Self::start_session(&config, seed, stats.start_game());

        Self {
            config,
            seed,
            session,
            stats,
            renderer: Renderer::new(),
            input_handler: InputHandler::new(),
            should_quit: false,
        }
    }

    fn start_session(config: &GameConfig, seed: Option<u64>, game: u32) -> SessionHandle {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(game as u64)),
            None => StdRng::from_entropy(),
        };
        Session::spawn(config, rng)
    }

    pub async fn run(&mut self) -> Result<()> {
        // Setup terminal
        enable_raw_mode().context("Failed to enable raw mode")?;
        let mut stderr = stderr();
        execute!(stderr, EnterAlternateScreen).context("Failed to enter alternate screen")?;
        let backend = CrosstermBackend::new(stderr);
        let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;
        terminal.hide_cursor().context("Failed to hide cursor")?;
        terminal.clear().context("Failed to clear terminal")?;

        // Run game loop with cleanup
        let result = self.run_game_loop(&mut terminal).await;

        self.session.abort();
        self.cleanup_terminal(&mut terminal)?;

        result
    }

    async fn run_game_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        let mut event_stream = EventStream::new();

        // Ticks are paced by the session; this only decides how often to redraw
        let mut redraw_timer = interval(FRAME_INTERVAL);
        redraw_timer.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                maybe_event = event_stream.next() => {
                    if let Some(Ok(event)) = maybe_event {
                        self.handle_event(event);
                    }
                }

                _ = redraw_timer.tick() => {
                    let snapshot = self.session.snapshot();
                    self.stats.observe(&snapshot);
                    terminal.draw(|frame| {
                        self.renderer.render(frame, &snapshot, &self.stats);
                    }).context("Failed to draw frame")?;
                }

                _ = tokio::signal::ctrl_c() => {
                    self.should_quit = true;
                }
            }

            if self.should_quit {
                break;
            }
        }

        Ok(())
    }

    fn handle_event(&mut self, event: Event) {
        let Event::Key(key) = event else {
            return;
        };
        // Only process key press events, not release
        if key.kind != KeyEventKind::Press {
            return;
        }

        match self.input_handler.handle_key_event(key) {
            KeyAction::Turn(orientation) => {
                // Rejected once the game is over, the session has detached
                self.session.turn(orientation);
            }
            KeyAction::Restart => self.restart(),
            KeyAction::Quit => self.should_quit = true,
            KeyAction::None => {}
        }
    }

    fn restart(&mut self) {
        self.session.abort();
        let game = self.stats.start_game();
        self.session = Self::start_session(&self.config, self.seed, game);
        info!("Restarted, game {}", game + 1);
    }

    fn cleanup_terminal(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        disable_raw_mode().context("Failed to disable raw mode")?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)
            .context("Failed to leave alternate screen")?;
        terminal.show_cursor().context("Failed to show cursor")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Orientation, Status};
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    #[tokio::test]
    async fn test_game_initialization() {
        let mode = HumanMode::new(GameConfig::default(), Some(1));
        let snapshot = mode.session.snapshot();
        assert_eq!(snapshot.status, Status::Running);
        assert_eq!(snapshot.level, 1);
        assert_eq!(snapshot.length, 10);
        mode.session.abort();
    }

    #[tokio::test]
    async fn test_quit_key() {
        let mut mode = HumanMode::new(GameConfig::default(), Some(1));
        mode.handle_event(key(KeyCode::Char('q')));
        assert!(mode.should_quit);
        mode.session.abort();
    }

    #[tokio::test(start_paused = true)]
    async fn test_restart_after_game_over() {
        let config = GameConfig {
            columns: 10,
            rows: 10,
            grid_size: 10,
            ..GameConfig::default()
        };
        let mut mode = HumanMode::new(config, Some(5));
        mode.session.closed().await;

        let snapshot = mode.session.snapshot();
        assert!(!snapshot.status.is_running());
        mode.stats.observe(&snapshot);
        mode.stats.observe(&snapshot);
        assert_eq!(mode.stats.games_finished(), 1);

        mode.handle_event(key(KeyCode::Char('r')));
        assert!(!mode.stats.current_game_ended());
        assert_eq!(mode.stats.games_started(), 2);
        assert_eq!(mode.session.snapshot().status, Status::Running);
        assert!(mode.session.turn(Orientation::Down));
        mode.session.abort();
    }

    #[tokio::test(start_paused = true)]
    async fn test_restart_mid_game_uses_next_seed() {
        let mut mode = HumanMode::new(GameConfig::default(), Some(40));
        assert_eq!(mode.stats.games_started(), 1);

        mode.handle_event(key(KeyCode::Char('r')));
        mode.handle_event(key(KeyCode::Char('r')));
        assert_eq!(mode.stats.games_started(), 3);
        assert_eq!(mode.stats.games_finished(), 0);

        // Game index 2 runs on seed 40 + 2
        let expected = Session::spawn(&mode.config, StdRng::seed_from_u64(42));
        let mut ours = mode.session.subscribe();
        let mut theirs = expected.subscribe();
        ours.changed().await.unwrap();
        theirs.changed().await.unwrap();
        let food = ours.borrow().food;
        assert!(food.is_some());
        assert_eq!(food, theirs.borrow().food);
        expected.abort();
        mode.session.abort();
    }
}
