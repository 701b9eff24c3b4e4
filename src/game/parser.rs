use crate::{
    game::{
        error::{FormatError, LevelError, Result},
        validator::WordValidator,
    },
    models::{Cell, Direction, Grid, Level, PlacedWord, Position},
};

/// Record keywords of the level text format
pub const DIMENSION_RECORD: &str = "DIM";
pub const EMPTY_TILE_RECORD: &str = "EMPTY";
pub const FULL_TILE_RECORD: &str = "FULL";
pub const WORD_RECORD: &str = "WORD";

/// Uppercase a single letter, keeping it as-is when uppercasing would expand it.
pub fn normalize_letter(letter: char) -> char {
    let mut upper = letter.to_uppercase();
    match (upper.next(), upper.next()) {
        (Some(single), None) => single,
        _ => letter,
    }
}

/// Case policy shared by level words and player submissions.
pub fn normalize_word(word: &str) -> String {
    word.chars().map(normalize_letter).collect()
}

/// Builds a `Level` from the line-oriented level text.
///
/// ```text
/// DIM <columns> <rows>
/// EMPTY <col> <row>
/// FULL <col> <row> <letter>
/// WORD <word> <col>,<row> <right|down>
/// ```
#[derive(Debug, Clone, Copy)]
pub struct LevelParser {
    strict_directions: bool,
}

impl Default for LevelParser {
    fn default() -> Self {
        Self {
            strict_directions: true,
        }
    }
}

/// Parse with the default (strict) parser.
pub fn parse(text: &str) -> Result<Level> {
    LevelParser::default().parse(text)
}

impl LevelParser {
    /// With `strict_directions` off, a word without a `right`/`down` direction is
    /// dropped with a warning instead of failing the load.
    pub fn new(strict_directions: bool) -> Self {
        Self { strict_directions }
    }

    pub fn parse(&self, text: &str) -> Result<Level> {
        let mut columns = 0;
        let mut rows = 0;
        let mut seen_dimensions = false;
        let mut grid = Grid::new();
        let mut words: Vec<(usize, PlacedWord)> = Vec::new();

        for (index, raw) in text.lines().enumerate() {
            let line = index + 1;
            let record = raw.strip_suffix('\r').unwrap_or(raw);
            if record.is_empty() {
                continue;
            }

            let parts: Vec<&str> = record.split(' ').collect();
            match parts[0] {
                DIMENSION_RECORD => {
                    expect_fields(line, DIMENSION_RECORD, &parts, 3)?;
                    if seen_dimensions {
                        tracing::warn!(
                            "line {}: repeated dimension record overrides the earlier one",
                            line
                        );
                    }
                    columns = parse_int(line, parts[1])?;
                    rows = parse_int(line, parts[2])?;
                    seen_dimensions = true;
                }
                EMPTY_TILE_RECORD => {
                    expect_fields(line, EMPTY_TILE_RECORD, &parts, 3)?;
                    let position = parse_position(line, parts[1], parts[2])?;
                    grid.insert(position, Cell::inactive());
                }
                FULL_TILE_RECORD => {
                    expect_fields(line, FULL_TILE_RECORD, &parts, 4)?;
                    let position = parse_position(line, parts[1], parts[2])?;
                    let letter = parse_letter(line, parts[3])?;
                    grid.insert(position, Cell::with_letter(letter));
                }
                WORD_RECORD => {
                    if let Some(placed) = self.parse_word(line, record, &parts)? {
                        words.push((line, placed));
                    }
                }
                other => {
                    tracing::warn!("line {}: skipping unknown record `{}`", line, other);
                }
            }
        }

        if !seen_dimensions {
            tracing::warn!("Level has no dimension record, defaulting to 0x0");
        }
        if grid.is_empty() {
            tracing::warn!("Level has no tiles");
        }

        for (line, placed) in &words {
            WordValidator::check_placement(&grid, *line, placed)?;
        }

        let words: Vec<PlacedWord> = words.into_iter().map(|(_, placed)| placed).collect();
        tracing::info!(
            "Parsed level: {}x{}, {} cells ({} active), {} words",
            columns,
            rows,
            grid.len(),
            grid.active_count(),
            words.len()
        );

        Ok(Level::new(columns, rows, grid, words))
    }

    /// `WORD <word> <col>,<row> [direction]`. The direction may be missing, which
    /// parses but yields `Direction::None`.
    fn parse_word(
        &self,
        line: usize,
        record: &str,
        parts: &[&str],
    ) -> Result<Option<PlacedWord>> {
        if parts.len() != 3 && parts.len() != 4 {
            return Err(field_count(line, WORD_RECORD, record, 4, parts.len()).into());
        }

        let word = normalize_word(parts[1]);
        if word.is_empty() {
            return Err(FormatError::EmptyWord { line }.into());
        }
        let anchor = parse_anchor(line, parts[2])?;
        let token = parts.get(3).copied();
        let direction = Direction::from_token(token);

        if direction == Direction::None {
            if self.strict_directions {
                return Err(LevelError::InvalidDirection {
                    line,
                    word,
                    token: token.map(str::to_string),
                });
            }
            tracing::warn!(
                "line {}: dropping word `{}` with direction {:?}",
                line,
                word,
                token
            );
            return Ok(None);
        }

        Ok(Some(PlacedWord {
            word,
            anchor,
            direction,
        }))
    }
}

fn field_count(
    line: usize,
    kind: &'static str,
    text: &str,
    expected: usize,
    found: usize,
) -> FormatError {
    FormatError::FieldCount {
        line,
        kind,
        expected,
        found,
        text: text.to_string(),
    }
}

fn expect_fields(line: usize, kind: &'static str, parts: &[&str], expected: usize) -> Result<()> {
    if parts.len() == expected {
        Ok(())
    } else {
        Err(field_count(line, kind, &parts.join(" "), expected, parts.len()).into())
    }
}

fn parse_int(line: usize, token: &str) -> std::result::Result<i32, FormatError> {
    token.parse().map_err(|_| FormatError::InvalidInteger {
        line,
        token: token.to_string(),
    })
}

fn parse_position(
    line: usize,
    col: &str,
    row: &str,
) -> std::result::Result<Position, FormatError> {
    Ok(Position::new(parse_int(line, col)?, parse_int(line, row)?))
}

fn parse_anchor(line: usize, token: &str) -> std::result::Result<Position, FormatError> {
    let (col, row) = token.split_once(',').ok_or_else(|| FormatError::InvalidAnchor {
        line,
        token: token.to_string(),
    })?;
    parse_position(line, col, row)
}

fn parse_letter(line: usize, token: &str) -> std::result::Result<char, FormatError> {
    let mut chars = token.chars();
    match (chars.next(), chars.next()) {
        (Some(letter), None) => Ok(normalize_letter(letter)),
        _ => Err(FormatError::InvalidLetter {
            line,
            token: token.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::error::InconsistentWordError;

    const CAT_LEVEL: &str = "DIM 3 1\nFULL 0 0 C\nFULL 1 0 A\nFULL 2 0 T\nWORD CAT 0,0 right\n";

    #[test]
    fn test_parse_cat_level() {
        let level = parse(CAT_LEVEL).unwrap();

        assert_eq!(level.dimensions(), (3, 1));
        assert_eq!(level.grid().active_count(), 3);
        assert_eq!(level.words().len(), 1);

        let word = &level.words()[0];
        assert_eq!(word.word, "CAT");
        assert_eq!(word.anchor, Position::new(0, 0));
        assert_eq!(word.direction, Direction::Right);
    }

    #[test]
    fn test_words_read_back_along_their_paths() {
        let text = "DIM 3 3\n\
                    FULL 0 2 S\nFULL 1 2 U\nFULL 2 2 N\n\
                    FULL 0 1 E\nFULL 0 0 A\n\
                    EMPTY 1 1\nEMPTY 2 0\n\
                    WORD SUN 0,2 right\n\
                    WORD SEA 0,2 down\n";
        let level = parse(text).unwrap();

        for placed in level.words() {
            assert_eq!(
                level.read_word(placed),
                placed.word,
                "Letters along the path should spell {}",
                placed.word
            );
        }
    }

    #[test]
    fn test_new_cells_start_hidden() {
        let level = parse(CAT_LEVEL).unwrap();
        for placed in level.words() {
            for pos in placed.path() {
                assert!(!level.grid().get(pos).unwrap().is_revealed());
            }
        }
    }

    #[test]
    fn test_last_write_wins() {
        let text = "DIM 1 1\nFULL 0 0 A\nFULL 0 0 B\n";
        let level = parse(text).unwrap();
        assert_eq!(level.grid().get(Position::new(0, 0)).unwrap().letter(), Some('B'));
    }

    #[test]
    fn test_empty_tile_overwrites_letter() {
        let text = "FULL 0 0 A\nEMPTY 0 0\n";
        let level = parse(text).unwrap();
        let cell = level.grid().get(Position::new(0, 0)).unwrap();
        assert!(!cell.is_active());
        assert_eq!(cell.letter(), None);
    }

    #[test]
    fn test_missing_dimensions_default_to_zero() {
        let level = parse("FULL 0 0 A\n").unwrap();
        assert_eq!(level.dimensions(), (0, 0));
    }

    #[test]
    fn test_letters_and_words_are_uppercased() {
        let text = "FULL 0 0 c\nFULL 1 0 a\nFULL 2 0 t\nWORD cat 0,0 right\n";
        let level = parse(text).unwrap();
        assert_eq!(level.words()[0].word, "CAT");
        assert_eq!(level.grid().get(Position::new(0, 0)).unwrap().letter(), Some('C'));
    }

    #[test]
    fn test_crlf_and_blank_lines() {
        let text = "DIM 1 1\r\n\r\nFULL 0 0 A\r\nWORD A 0,0 down\r\n";
        let level = parse(text).unwrap();
        assert_eq!(level.words().len(), 1);
    }

    #[test]
    fn test_unknown_records_are_skipped() {
        let text = "DIM 1 1\nNOTE this level is tiny\nFULL 0 0 A\n";
        let level = parse(text).unwrap();
        assert_eq!(level.grid().len(), 1);
    }

    #[test]
    fn test_wrong_field_count_is_format_error() {
        let err = parse("DIM 3\n").unwrap_err();
        assert!(matches!(
            err,
            LevelError::Format(FormatError::FieldCount { line: 1, expected: 3, found: 2, .. })
        ));

        let err = parse("FULL 0 0\n").unwrap_err();
        assert!(matches!(err, LevelError::Format(FormatError::FieldCount { .. })));

        let err = parse("DIM 1 1\nEMPTY 0\n").unwrap_err();
        assert!(matches!(
            err,
            LevelError::Format(FormatError::FieldCount {
                line: 2,
                kind: EMPTY_TILE_RECORD,
                expected: 3,
                found: 2,
                ..
            })
        ));
    }

    #[test]
    fn test_word_with_extra_token_is_format_error() {
        let err = parse("FULL 0 0 A\nWORD A 0,0 right again\n").unwrap_err();
        assert_eq!(
            err,
            LevelError::Format(FormatError::FieldCount {
                line: 2,
                kind: WORD_RECORD,
                expected: 4,
                found: 5,
                text: "WORD A 0,0 right again".to_string(),
            })
        );
    }

    #[test]
    fn test_empty_word_is_format_error() {
        // The doubled space leaves an empty word token
        let err = parse("WORD  0,0 right\n").unwrap_err();
        assert_eq!(err, LevelError::Format(FormatError::EmptyWord { line: 1 }));
    }

    #[test]
    fn test_double_space_breaks_tokenization() {
        // Tokens are split on single spaces, so a doubled space adds an empty field
        let err = parse("DIM  3 1\n").unwrap_err();
        assert!(matches!(err, LevelError::Format(FormatError::FieldCount { .. })));
    }

    #[test]
    fn test_non_integer_is_format_error() {
        let err = parse("DIM 1 1\nFULL x 0 A\n").unwrap_err();
        assert_eq!(
            err,
            LevelError::Format(FormatError::InvalidInteger {
                line: 2,
                token: "x".to_string()
            })
        );
    }

    #[test]
    fn test_bad_anchor_is_format_error() {
        let err = parse("FULL 0 0 A\nWORD A 0;0 right\n").unwrap_err();
        assert!(matches!(
            err,
            LevelError::Format(FormatError::InvalidAnchor { line: 2, .. })
        ));

        let err = parse("FULL 0 0 A\nWORD A 0,zero right\n").unwrap_err();
        assert!(matches!(err, LevelError::Format(FormatError::InvalidInteger { .. })));
    }

    #[test]
    fn test_multi_char_letter_is_format_error() {
        let err = parse("FULL 0 0 AB\n").unwrap_err();
        assert!(matches!(err, LevelError::Format(FormatError::InvalidLetter { .. })));
    }

    #[test]
    fn test_missing_direction_is_rejected() {
        let err = parse("FULL 0 0 A\nWORD A 0,0\n").unwrap_err();
        assert_eq!(
            err,
            LevelError::InvalidDirection {
                line: 2,
                word: "A".to_string(),
                token: None
            }
        );
    }

    #[test]
    fn test_unknown_direction_is_rejected() {
        let err = parse("FULL 0 0 A\nWORD A 0,0 up\n").unwrap_err();
        assert!(matches!(
            err,
            LevelError::InvalidDirection { token: Some(ref t), .. } if t == "up"
        ));
    }

    #[test]
    fn test_lenient_parser_drops_undirected_words() {
        let text = "FULL 0 0 A\nWORD A 0,0 diagonal\nWORD A 0,0 right\n";
        let level = LevelParser::new(false).parse(text).unwrap();
        assert_eq!(level.words().len(), 1);
        assert_eq!(level.words()[0].direction, Direction::Right);
    }

    #[test]
    fn test_word_without_tiles_is_inconsistent() {
        let err = parse("WORD DOG 0,0 right").unwrap_err();
        match err {
            LevelError::InconsistentWord(inner) => {
                assert_eq!(inner.word, "DOG");
                assert_eq!(inner.index, 0);
                assert_eq!(inner.cell, Some(Position::new(0, 0)));
                assert_eq!(inner.expected, 'D');
                assert_eq!(inner.found, None);
            }
            other => panic!("Expected an inconsistent word error, got {other:?}"),
        }
    }

    #[test]
    fn test_duplicate_words_are_kept_in_order() {
        let text = "FULL 0 0 S\nFULL 1 0 U\nFULL 2 0 N\n\
                    FULL 5 5 S\nFULL 6 5 U\nFULL 7 5 N\n\
                    WORD SUN 0,0 right\nWORD SUN 5,5 right\n";
        let level = parse(text).unwrap();
        let anchors: Vec<Position> = level.words().iter().map(|w| w.anchor).collect();
        assert_eq!(anchors, vec![Position::new(0, 0), Position::new(5, 5)]);
    }

    #[test]
    fn test_word_running_past_max_column_is_inconsistent() {
        // A single cell at the edge of the coordinate range cannot hold three letters
        let err = parse("FULL 2147483647 0 A\nWORD AAA 2147483647,0 right\n").unwrap_err();
        match err {
            LevelError::InconsistentWord(inner) => {
                assert_eq!(inner.line, 2);
                assert_eq!(inner.index, 1);
                assert_eq!(inner.cell, None);
                assert_eq!(inner.expected, 'A');
            }
            other => panic!("Expected an inconsistent word error, got {other:?}"),
        }
    }

    #[test]
    fn test_word_running_past_min_row_is_inconsistent() {
        let err = parse("FULL 0 -2147483648 Z\nWORD ZZ 0,-2147483648 down\n").unwrap_err();
        assert!(matches!(
            err,
            LevelError::InconsistentWord(InconsistentWordError {
                index: 1,
                cell: None,
                ..
            })
        ));
    }
}
