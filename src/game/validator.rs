use crate::{
    game::error::InconsistentWordError,
    models::{Grid, PlacedWord},
};

pub struct WordValidator;

impl WordValidator {
    /// Check that the letters along a placed word's path spell the word.
    ///
    /// Fails on the first letter whose cell is missing, inactive, holds a different
    /// letter, or lies outside the coordinate range.
    pub fn check_placement(
        grid: &Grid,
        line: usize,
        placed: &PlacedWord,
    ) -> Result<(), InconsistentWordError> {
        for (index, expected) in placed.word.chars().enumerate() {
            let cell = placed.cell_at(index);
            let found = cell.and_then(|pos| grid.active(pos)).and_then(|c| c.letter());
            if found != Some(expected) {
                return Err(InconsistentWordError {
                    word: placed.word.clone(),
                    line,
                    index,
                    cell,
                    expected,
                    found,
                });
            }
        }

        Ok(())
    }
}
