use std::time::Duration;

use anyhow::{Context, Result};
use log::{debug, info};
use rand::Rng;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

use super::snapshot::Snapshot;
use crate::game::{GameConfig, Orientation, PixelCanvas, Playground, Status, TickOutcome};

/// Messages from the front end to the running game
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Turn(Orientation),
    Shutdown,
}

/// One playthrough, running on its own task
///
/// The task owns the playground; every mutation happens there. Turns arrive
/// as commands between ticks and each tick publishes a [`Snapshot`].
pub struct Session;

impl Session {
    /// Build a playground for `config` and start ticking it
    pub fn spawn<R>(config: &GameConfig, rng: R) -> SessionHandle
    where
        R: Rng + Send + 'static,
    {
        let canvas = PixelCanvas::new(config.width(), config.height());
        let playground = Playground::new(config, canvas, rng);
        Self::spawn_playground(playground, config.instant_tick_after_eating)
    }

    /// Start ticking an already built playground
    pub fn spawn_playground<R>(
        playground: Playground<PixelCanvas, R>,
        instant_tick_after_eating: bool,
    ) -> SessionHandle
    where
        R: Rng + Send + 'static,
    {
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let (snapshot_tx, snapshot_rx) = watch::channel(Snapshot::capture(&playground, 0));

        info!(
            "Session started at level {} ({:?} per tick)",
            playground.level(),
            playground.interval()
        );

        let task = tokio::spawn(run(
            playground,
            command_rx,
            snapshot_tx,
            instant_tick_after_eating,
        ));

        SessionHandle {
            commands: command_tx,
            snapshots: snapshot_rx,
            task,
        }
    }
}

/// Front-end side of a running [`Session`]
///
/// Dropping the handle closes the command channel, which ends the session.
pub struct SessionHandle {
    commands: mpsc::UnboundedSender<Command>,
    snapshots: watch::Receiver<Snapshot>,
    task: JoinHandle<Status>,
}

impl SessionHandle {
    /// Ask the snake to turn before an upcoming tick
    ///
    /// Returns false once the session has stopped accepting input.
    pub fn turn(&self, orientation: Orientation) -> bool {
        self.commands.send(Command::Turn(orientation)).is_ok()
    }

    /// The most recently published frame
    pub fn snapshot(&self) -> Snapshot {
        self.snapshots.borrow().clone()
    }

    /// A receiver that wakes on every published frame
    pub fn subscribe(&self) -> watch::Receiver<Snapshot> {
        self.snapshots.clone()
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Resolves once the session no longer accepts input
    pub async fn closed(&self) {
        self.commands.closed().await
    }

    /// Wait for the game to end on its own
    pub async fn wait(self) -> Result<Status> {
        self.task.await.context("Session task failed")
    }

    /// Stop the session and return the status it ended in
    pub async fn shutdown(self) -> Result<Status> {
        // The task may already be gone; joining still yields its status
        let _ = self.commands.send(Command::Shutdown);
        self.wait().await
    }

    /// Cancel the session without waiting for it
    pub fn abort(&self) {
        self.task.abort();
    }
}

async fn run<R: Rng>(
    mut playground: Playground<PixelCanvas, R>,
    mut commands: mpsc::UnboundedReceiver<Command>,
    snapshots: watch::Sender<Snapshot>,
    instant_tick_after_eating: bool,
) -> Status {
    let mut delay = playground.interval();
    let mut ticks = 0u64;

    loop {
        let pacing = tokio::time::sleep(delay);
        tokio::pin!(pacing);

        loop {
            tokio::select! {
                _ = &mut pacing => break,
                command = commands.recv() => match command {
                    Some(Command::Turn(orientation)) => {
                        if !playground.set_orientation(orientation) {
                            debug!("Turn {:?} ignored", orientation);
                        }
                    }
                    Some(Command::Shutdown) | None => {
                        info!("Session stopped after {} ticks at level {}", ticks, playground.level());
                        return playground.status();
                    }
                },
            }
        }

        let outcome = playground.tick();
        ticks += 1;
        snapshots.send_replace(Snapshot::capture(&playground, ticks));

        if outcome.is_terminal() {
            info!(
                "Session ended after {} ticks: {:?}, level {}, length {}",
                ticks,
                playground.status(),
                playground.level(),
                playground.snake().len()
            );
            return playground.status();
        }

        delay = next_delay(outcome, playground.interval(), instant_tick_after_eating);
    }
}

fn next_delay(outcome: TickOutcome, interval: Duration, instant_tick_after_eating: bool) -> Duration {
    if outcome == TickOutcome::Ate && instant_tick_after_eating {
        Duration::ZERO
    } else {
        interval
    }
}
