// Word search engine: level parsing, word matching and letter reveal sequencing

pub mod error;
pub mod events;
pub mod matcher;
pub mod parser;
pub mod reveal;
pub mod session;
pub mod validator;

pub use error::{FormatError, InconsistentWordError, LevelError};
pub use events::PuzzleEvent;
pub use matcher::WordMatcher;
pub use parser::{parse, LevelParser};
pub use reveal::{RevealPacing, RevealSequence, Ticker};
pub use session::{PuzzleSession, SessionBuilder, SessionSettings};
pub use validator::WordValidator;
