use std::time::Duration;

use tokio::time::Instant;

use crate::game::Status;
use crate::session::Snapshot;

/// Format a duration as `mm:ss`; minutes keep counting past the hour
pub fn format_clock(duration: Duration) -> String {
    let secs = duration.as_secs();
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

/// The game currently on screen
#[derive(Debug, Clone)]
struct CurrentGame {
    started: Instant,
    level: u32,
    level_started: Instant,
    /// Set once the first terminal snapshot was seen
    ended: Option<Instant>,
}

impl CurrentGame {
    fn new(now: Instant) -> Self {
        Self {
            started: now,
            level: 0,
            level_started: now,
            ended: None,
        }
    }

    fn clock_end(&self) -> Instant {
        self.ended.unwrap_or_else(Instant::now)
    }
}

/// Tally over every game played in one terminal session
///
/// Fed from the snapshots the front end already reads for drawing, so it never
/// touches the playground itself.
#[derive(Debug, Clone, Default)]
pub struct PlayStats {
    games_started: u32,
    games_finished: u32,
    wins: u32,
    best_level: u32,
    longest_snake: usize,
    current: Option<CurrentGame>,
}

impl PlayStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new game and return its index, counting from zero
    ///
    /// Every start counts, including restarts of a game still in progress.
    pub fn start_game(&mut self) -> u32 {
        let index = self.games_started;
        self.games_started = self.games_started.saturating_add(1);
        self.current = Some(CurrentGame::new(Instant::now()));
        index
    }

    /// Fold one frame of the current game into the tally
    pub fn observe(&mut self, snapshot: &Snapshot) {
        let Some(game) = self.current.as_mut() else {
            return;
        };
        if game.ended.is_some() {
            return;
        }

        let now = Instant::now();
        if snapshot.level != game.level {
            game.level = snapshot.level;
            game.level_started = now;
        }
        self.best_level = self.best_level.max(snapshot.level);
        self.longest_snake = self.longest_snake.max(snapshot.length);

        if !snapshot.status.is_running() {
            game.ended = Some(now);
            self.games_finished = self.games_finished.saturating_add(1);
            if snapshot.status == Status::Cleared {
                self.wins = self.wins.saturating_add(1);
            }
        }
    }

    /// Time spent in the current game; stops when it ends
    pub fn play_time(&self) -> Duration {
        self.current
            .as_ref()
            .map(|game| game.clock_end().duration_since(game.started))
            .unwrap_or_default()
    }

    /// Time spent on the current level
    pub fn level_time(&self) -> Duration {
        self.current
            .as_ref()
            .map(|game| game.clock_end().duration_since(game.level_started))
            .unwrap_or_default()
    }

    pub fn games_started(&self) -> u32 {
        self.games_started
    }

    /// Games that reached game over or a cleared playground
    pub fn games_finished(&self) -> u32 {
        self.games_finished
    }

    pub fn wins(&self) -> u32 {
        self.wins
    }

    pub fn best_level(&self) -> u32 {
        self.best_level
    }

    pub fn longest_snake(&self) -> usize {
        self.longest_snake
    }

    /// Whether the current game's end was already counted
    pub fn current_game_ended(&self) -> bool {
        self.current.as_ref().is_some_and(|game| game.ended.is_some())
    }
}
