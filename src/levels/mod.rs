use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use tokio::fs;

use crate::game::LevelParser;

/// File extension of level texts in the levels directory.
pub const LEVEL_EXTENSION: &str = "txt";

/// Level texts available to sessions, keyed by file stem.
pub struct LevelLibrary {
    levels: BTreeMap<String, String>,
}

impl LevelLibrary {
    /// Load every `*.txt` level from a directory.
    ///
    /// Files that cannot be read or do not parse are logged and left out, so one broken
    /// level does not take the server down.
    pub async fn load<P: AsRef<Path>>(dir: P, parser: LevelParser) -> Result<Self> {
        let dir = dir.as_ref();
        let mut entries = fs::read_dir(dir)
            .await
            .with_context(|| format!("Failed to read levels directory {}", dir.display()))?;

        let mut levels = BTreeMap::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .with_context(|| format!("Failed to list levels in {}", dir.display()))?
        {
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(LEVEL_EXTENSION) {
                continue;
            }
            let Some(name) = path.file_stem().and_then(|stem| stem.to_str()) else {
                tracing::warn!("Skipping level with non UTF-8 name: {}", path.display());
                continue;
            };

            let text = match fs::read_to_string(&path).await {
                Ok(text) => text,
                Err(e) => {
                    tracing::warn!("Skipping unreadable level {}: {}", path.display(), e);
                    continue;
                }
            };

            match parser.parse(&text) {
                Ok(level) => {
                    tracing::debug!("Level `{}` has {} words", name, level.words().len());
                    levels.insert(name.to_string(), text);
                }
                Err(e) => {
                    tracing::warn!("Skipping level `{}`: {}", name, e);
                }
            }
        }

        tracing::info!("Loaded {} levels from {}", levels.len(), dir.display());

        Ok(Self { levels })
    }

    /// Create an empty library (for testing)
    pub fn empty() -> Self {
        Self {
            levels: BTreeMap::new(),
        }
    }

    /// Raw text of the named level, parsed afresh by each session
    pub fn get(&self, name: &str) -> Option<&str> {
        self.levels.get(name).map(String::as_str)
    }

    /// Level names in sorted order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.levels.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_empty_library() {
        let library = LevelLibrary::empty();
        assert!(library.is_empty());
        assert!(library.get("intro").is_none());
    }

    const CAT_LEVEL: &str = "DIM 3 1\nFULL 0 0 C\nFULL 1 0 A\nFULL 2 0 T\nWORD CAT 0,0 right\n";

    async fn level_dir() -> std::path::PathBuf {
        let dir = std::env::temp_dir().join(format!("word-search-levels-{}", Uuid::new_v4()));
        fs::create_dir_all(&dir).await.unwrap();
        fs::write(dir.join("cat.txt"), CAT_LEVEL).await.unwrap();
        dir
    }

    #[tokio::test]
    async fn test_load_skips_broken_levels() {
        let dir = level_dir().await;
        fs::write(dir.join("broken.txt"), "WORD DOG 0,0 right\n").await.unwrap();
        fs::write(dir.join("notes.md"), "not a level").await.unwrap();

        let library = LevelLibrary::load(&dir, LevelParser::default()).await.unwrap();

        assert_eq!(library.len(), 1);
        assert_eq!(library.names().collect::<Vec<_>>(), vec!["cat"]);
        assert!(library.get("cat").unwrap().contains("WORD CAT"));
        assert!(library.get("broken").is_none());

        fs::remove_dir_all(&dir).await.unwrap();
    }

    #[tokio::test]
    async fn test_load_skips_undecodable_levels() {
        let dir = level_dir().await;
        // Not valid UTF-8
        fs::write(dir.join("zz_bad.txt"), [0xff, 0xfe, 0x00]).await.unwrap();

        let library = LevelLibrary::load(&dir, LevelParser::default()).await.unwrap();

        assert_eq!(library.names().collect::<Vec<_>>(), vec!["cat"]);
        assert!(library.get("zz_bad").is_none());

        fs::remove_dir_all(&dir).await.unwrap();
    }

    #[test]
    fn test_bundled_intro_level_is_valid() {
        let level = LevelParser::default()
            .parse(include_str!("../../levels/intro.txt"))
            .unwrap();
        assert_eq!(level.words().len(), 3);
        for placed in level.words() {
            assert_eq!(level.read_word(placed), placed.word);
        }
    }

    #[tokio::test]
    async fn test_missing_directory_is_an_error() {
        let dir = std::env::temp_dir().join(format!("word-search-missing-{}", Uuid::new_v4()));
        assert!(LevelLibrary::load(&dir, LevelParser::default()).await.is_err());
    }
}
