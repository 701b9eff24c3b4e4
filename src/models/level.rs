use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

/// Grid coordinate. Rows grow upwards, so `down` walks towards negative rows.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Hash, Eq, PartialEq, PartialOrd, Ord)]
pub struct Position {
    pub col: i32,
    pub row: i32,
}

impl Position {
    pub const fn new(col: i32, row: i32) -> Self {
        Self { col, row }
    }

    /// Position `steps` cells away from `self` along `direction`.
    ///
    /// Returns `None` for `Direction::None`, which has no step, and when the target
    /// lies outside the `i32` coordinate range.
    pub fn advance(self, direction: Direction, steps: usize) -> Option<Self> {
        let (dx, dy) = direction.step()?;
        let steps = i32::try_from(steps).ok()?;
        Some(Self {
            col: self.col.checked_add(dx.checked_mul(steps)?)?,
            row: self.row.checked_add(dy.checked_mul(steps)?)?,
        })
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.col, self.row)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    #[default]
    None,
    Right,
    Down,
}

impl Direction {
    /// Map a level-file direction token. Anything unrecognised is `None`.
    pub fn from_token(token: Option<&str>) -> Self {
        match token {
            Some("right") => Direction::Right,
            Some("down") => Direction::Down,
            _ => Direction::None,
        }
    }

    /// Unit `(col, row)` step for this direction.
    pub const fn step(self) -> Option<(i32, i32)> {
        match self {
            Direction::Right => Some((1, 0)),
            Direction::Down => Some((0, -1)),
            Direction::None => None,
        }
    }
}

/// A single grid cell. Inactive cells are holes and never carry a letter.
#[derive(Debug)]
pub struct Cell {
    letter: Option<char>,
    revealed: AtomicBool,
}

impl Cell {
    pub fn inactive() -> Self {
        Self {
            letter: None,
            revealed: AtomicBool::new(false),
        }
    }

    pub fn with_letter(letter: char) -> Self {
        Self {
            letter: Some(letter),
            revealed: AtomicBool::new(false),
        }
    }

    pub fn is_active(&self) -> bool {
        self.letter.is_some()
    }

    pub fn letter(&self) -> Option<char> {
        self.letter
    }

    pub fn is_revealed(&self) -> bool {
        self.revealed.load(Ordering::Acquire)
    }

    /// Flip the cell to revealed. Returns `true` only for the first flip.
    pub(crate) fn reveal(&self) -> bool {
        !self.revealed.swap(true, Ordering::AcqRel)
    }
}

/// Sparse cell storage keyed by coordinate.
#[derive(Debug, Default)]
pub struct Grid {
    cells: HashMap<Position, Cell>,
}

impl Grid {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a cell, replacing whatever was at `position` before.
    pub fn insert(&mut self, position: Position, cell: Cell) -> Option<Cell> {
        self.cells.insert(position, cell)
    }

    pub fn get(&self, position: Position) -> Option<&Cell> {
        self.cells.get(&position)
    }

    /// The cell at `position` if it exists and takes part in the puzzle.
    pub fn active(&self, position: Position) -> Option<&Cell> {
        self.get(position).filter(|cell| cell.is_active())
    }

    pub fn iter(&self) -> impl Iterator<Item = (Position, &Cell)> {
        self.cells.iter().map(|(pos, cell)| (*pos, cell))
    }

    pub fn active_count(&self) -> usize {
        self.cells.values().filter(|cell| cell.is_active()).count()
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// A word's declared location in the grid.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlacedWord {
    pub word: String,
    pub anchor: Position,
    pub direction: Direction,
}

impl PlacedWord {
    /// Number of letters, and so the number of cells on the path.
    pub fn letter_count(&self) -> usize {
        self.word.chars().count()
    }

    /// Cell of the `index`-th letter.
    pub fn cell_at(&self, index: usize) -> Option<Position> {
        self.anchor.advance(self.direction, index)
    }

    /// Cells covered by the word, first letter first.
    pub fn path(&self) -> impl Iterator<Item = Position> + '_ {
        (0..self.letter_count()).filter_map(move |i| self.cell_at(i))
    }
}

/// A parsed puzzle: the grid plus the words hidden in it, in file order.
#[derive(Debug, Default)]
pub struct Level {
    columns: i32,
    rows: i32,
    grid: Grid,
    words: Vec<PlacedWord>,
}

impl Level {
    pub fn new(columns: i32, rows: i32, grid: Grid, words: Vec<PlacedWord>) -> Self {
        Self {
            columns,
            rows,
            grid,
            words,
        }
    }

    /// Declared `(columns, rows)`. Layout hint only; lookups are not bounded by it.
    pub fn dimensions(&self) -> (i32, i32) {
        (self.columns, self.rows)
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn words(&self) -> &[PlacedWord] {
        &self.words
    }

    /// Letters currently stored along the word's path. Missing or inactive cells end the read.
    pub fn read_word(&self, placed: &PlacedWord) -> String {
        placed
            .path()
            .map_while(|pos| self.grid.active(pos).and_then(Cell::letter))
            .collect()
    }

    pub fn is_word_revealed(&self, placed: &PlacedWord) -> bool {
        placed
            .path()
            .all(|pos| self.grid.get(pos).is_some_and(Cell::is_revealed))
    }

    /// Serializable view handed to the grid-ready signal consumers.
    pub fn snapshot(&self) -> LevelSnapshot {
        let mut cells: Vec<CellSnapshot> = self
            .grid
            .iter()
            .map(|(position, cell)| CellSnapshot {
                position,
                active: cell.is_active(),
                letter: cell.letter(),
                revealed: cell.is_revealed(),
            })
            .collect();
        cells.sort_by_key(|cell| (cell.position.row, cell.position.col));

        LevelSnapshot {
            columns: self.columns,
            rows: self.rows,
            cells,
            word_lengths: self.words.iter().map(PlacedWord::letter_count).collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CellSnapshot {
    pub position: Position,
    pub active: bool,
    pub letter: Option<char>,
    pub revealed: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LevelSnapshot {
    pub columns: i32,
    pub rows: i32,
    pub cells: Vec<CellSnapshot>,
    /// Lengths of the hidden words, in file order. The words themselves stay server-side.
    pub word_lengths: Vec<usize>,
}
