pub mod level;

pub use level::{
    // Grid model
    Cell, Direction, Grid, Position,
    // Parsed puzzle
    Level, PlacedWord,
    // Views handed to presentation
    CellSnapshot, LevelSnapshot,
};
