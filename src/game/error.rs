use thiserror::Error;

use crate::models::Position;

/// Why a single record line could not be read.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormatError {
    #[error("line {line}: `{kind}` record expects {expected} fields, found {found}: {text:?}")]
    FieldCount {
        line: usize,
        kind: &'static str,
        expected: usize,
        found: usize,
        text: String,
    },
    #[error("line {line}: `{token}` is not a valid integer")]
    InvalidInteger { line: usize, token: String },
    #[error("line {line}: anchor `{token}` must be written as <col>,<row>")]
    InvalidAnchor { line: usize, token: String },
    #[error("line {line}: letter `{token}` must be exactly one character")]
    InvalidLetter { line: usize, token: String },
    #[error("line {line}: word must not be empty")]
    EmptyWord { line: usize },
}

/// A declared word whose path does not spell it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error(
    "word `{word}` (line {line}) does not match the grid at letter {index} ({}): \
     expected {expected:?}, found {found:?}",
    describe_cell(.cell)
)]
pub struct InconsistentWordError {
    pub word: String,
    pub line: usize,
    /// Index of the first letter that disagrees with the grid.
    pub index: usize,
    /// Cell of that letter, `None` when the path runs past the coordinate range.
    pub cell: Option<Position>,
    pub expected: char,
    /// Letter actually stored there, `None` for a missing or inactive cell.
    pub found: Option<char>,
}

fn describe_cell(cell: &Option<Position>) -> String {
    match cell {
        Some(position) => position.to_string(),
        None => "outside the coordinate range".to_string(),
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LevelError {
    #[error(transparent)]
    Format(#[from] FormatError),
    #[error("line {line}: word `{word}` has direction {token:?}, expected `right` or `down`")]
    InvalidDirection {
        line: usize,
        word: String,
        token: Option<String>,
    },
    #[error(transparent)]
    InconsistentWord(#[from] InconsistentWordError),
}

pub type Result<T> = std::result::Result<T, LevelError>;
