use std::time::Duration;

use async_trait::async_trait;
use tokio::{
    sync::broadcast,
    time::{self, Instant, Interval, MissedTickBehavior},
};

use crate::{
    game::events::PuzzleEvent,
    models::{Grid, Level, PlacedWord, Position},
};

/// Source of the pacing ticks a reveal sequence waits on between letters.
#[async_trait]
pub trait Ticker: Send {
    async fn tick(&mut self);
}

/// Hands control back to the tokio scheduler once per tick.
#[derive(Debug, Default)]
pub struct YieldTicker;

#[async_trait]
impl Ticker for YieldTicker {
    async fn tick(&mut self) {
        tokio::task::yield_now().await;
    }
}

/// Fixed frame-rate ticks, so the UI has time to animate each letter.
#[derive(Debug)]
pub struct IntervalTicker {
    interval: Interval,
}

impl IntervalTicker {
    pub fn new(period: Duration) -> Self {
        // First tick lands one period out; a plain `interval` would fire immediately
        let mut interval = time::interval_at(Instant::now() + period, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        Self { interval }
    }
}

#[async_trait]
impl Ticker for IntervalTicker {
    async fn tick(&mut self) {
        self.interval.tick().await;
    }
}

/// How a session paces the reveal sequences it starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevealPacing {
    Yield,
    Interval(Duration),
}

impl RevealPacing {
    /// Zero milliseconds means cooperative yielding with no wall-clock delay.
    pub fn from_millis(millis: u64) -> Self {
        if millis == 0 {
            RevealPacing::Yield
        } else {
            RevealPacing::Interval(Duration::from_millis(millis))
        }
    }

    pub fn ticker(&self) -> Box<dyn Ticker> {
        match *self {
            RevealPacing::Yield => Box::new(YieldTicker),
            RevealPacing::Interval(period) => Box::new(IntervalTicker::new(period)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevealState {
    Idle,
    Stepping(usize),
    Done,
}

/// Outcome of a single sequence step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevealStep {
    Revealed {
        index: usize,
        position: Position,
        letter: char,
        newly_revealed: bool,
    },
    /// The step landed on a missing or inactive cell and changed nothing.
    Skipped { index: usize, position: Option<Position> },
}

/// Walks one matched word cell by cell, flipping each to revealed.
#[derive(Debug)]
pub struct RevealSequence {
    id: u64,
    placed: PlacedWord,
    len: usize,
    state: RevealState,
}

impl RevealSequence {
    pub fn new(id: u64, placed: PlacedWord) -> Self {
        let len = placed.letter_count();
        Self {
            id,
            placed,
            len,
            state: RevealState::Idle,
        }
    }

    pub fn state(&self) -> RevealState {
        self.state
    }

    /// Advance to the next letter and reveal it. Returns `None` once the sequence is done.
    pub fn step(&mut self, grid: &Grid) -> Option<RevealStep> {
        let index = match self.state {
            RevealState::Idle => 0,
            RevealState::Stepping(i) => i + 1,
            RevealState::Done => return None,
        };
        if index >= self.len {
            self.state = RevealState::Done;
            return None;
        }
        self.state = RevealState::Stepping(index);

        let position = self.placed.cell_at(index);
        let target = position.and_then(|pos| {
            let cell = grid.active(pos)?;
            Some((pos, cell, cell.letter()?))
        });
        let step = match target {
            Some((position, cell, letter)) => RevealStep::Revealed {
                index,
                position,
                letter,
                newly_revealed: cell.reveal(),
            },
            None => RevealStep::Skipped { index, position },
        };
        Some(step)
    }

    /// Drive the sequence to completion, waiting one tick after every step.
    ///
    /// Dropping the returned future part-way leaves the already revealed cells revealed,
    /// which is a valid state.
    pub async fn run<T>(
        mut self,
        level: &Level,
        ticker: &mut T,
        events: &broadcast::Sender<PuzzleEvent>,
    ) where
        T: Ticker + ?Sized,
    {
        tracing::debug!("Reveal {} started for `{}`", self.id, self.placed.word);

        while let Some(step) = self.step(level.grid()) {
            match step {
                RevealStep::Revealed {
                    index,
                    position,
                    letter,
                    newly_revealed,
                } => {
                    tracing::debug!(
                        "Reveal {}: letter {} '{}' at {}",
                        self.id,
                        index,
                        letter,
                        position
                    );
                    // No subscribers is fine, the grid state is what matters
                    let _ = events.send(PuzzleEvent::LetterRevealed {
                        reveal_id: self.id,
                        word: self.placed.word.clone(),
                        index,
                        position,
                        letter,
                        newly_revealed,
                    });
                }
                RevealStep::Skipped { index, position } => {
                    tracing::warn!(
                        "Reveal {}: skipping letter {} of `{}`, no active cell at {:?}",
                        self.id,
                        index,
                        self.placed.word,
                        position
                    );
                }
            }
            ticker.tick().await;
        }

        tracing::debug!("Reveal {} finished for `{}`", self.id, self.placed.word);
        let _ = events.send(PuzzleEvent::WordRevealed {
            reveal_id: self.id,
            word: self.placed.word,
            anchor: self.placed.anchor,
            direction: self.placed.direction,
        });
    }
}
