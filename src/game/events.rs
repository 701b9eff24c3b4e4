use serde::{Deserialize, Serialize};

use crate::models::{Direction, LevelSnapshot, Position};

/// Signals a puzzle session emits to its presentation-side subscribers.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PuzzleEvent {
    /// The level finished parsing. Sent once per session.
    GridReady { level: LevelSnapshot },
    /// One step of a reveal sequence uncovered a letter.
    LetterRevealed {
        reveal_id: u64,
        word: String,
        index: usize,
        position: Position,
        letter: char,
        /// `false` when the cell had already been uncovered by an earlier reveal
        newly_revealed: bool,
    },
    /// A reveal sequence walked its whole word.
    WordRevealed {
        reveal_id: u64,
        word: String,
        anchor: Position,
        direction: Direction,
    },
}
