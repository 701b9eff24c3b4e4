use serde::{Deserialize, Serialize};

use crate::{
    game::PuzzleEvent,
    models::{Direction, LevelSnapshot, PlacedWord, Position},
};

/// Messages sent from client to server
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    SubmitWord { word: String },
}

/// Messages sent from server to client
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    SessionStarted {
        session_id: String,
        level: String,
    },
    GridReady {
        level: LevelSnapshot,
    },
    WordMatched {
        word: String,
        anchor: Position,
        direction: Direction,
    },
    NoMatch {
        word: String,
    },
    LetterRevealed {
        reveal_id: u64,
        word: String,
        index: usize,
        position: Position,
        letter: char,
        newly_revealed: bool,
    },
    WordRevealed {
        reveal_id: u64,
        word: String,
        anchor: Position,
        direction: Direction,
    },
    Error {
        message: String,
    },
}

impl ServerMessage {
    pub fn matched(placed: PlacedWord) -> Self {
        ServerMessage::WordMatched {
            word: placed.word,
            anchor: placed.anchor,
            direction: placed.direction,
        }
    }
}

impl From<PuzzleEvent> for ServerMessage {
    fn from(event: PuzzleEvent) -> Self {
        match event {
            PuzzleEvent::GridReady { level } => ServerMessage::GridReady { level },
            PuzzleEvent::LetterRevealed {
                reveal_id,
                word,
                index,
                position,
                letter,
                newly_revealed,
            } => ServerMessage::LetterRevealed {
                reveal_id,
                word,
                index,
                position,
                letter,
                newly_revealed,
            },
            PuzzleEvent::WordRevealed {
                reveal_id,
                word,
                anchor,
                direction,
            } => ServerMessage::WordRevealed {
                reveal_id,
                word,
                anchor,
                direction,
            },
        }
    }
}
