//! Phrase pool configuration and validation.

use std::path::Path;

use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::MAX_MESSAGE_LENGTH;

/// Errors that can occur while loading or validating phrases.
#[derive(Debug, Error)]
pub enum PhraseError {
    #[error("Phrase at index {index} exceeds maximum length: {length} > {max_length}")]
    TooLong {
        index: usize,
        length: usize,
        max_length: usize,
    },

    #[error("Phrase at index {index} is empty")]
    Empty { index: usize },

    #[error("No phrases configured")]
    NoPhrases,

    #[error("Failed to read phrase file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse phrase file: {0}")]
    ParseError(#[from] serde_json::Error),
}

/// Ordered pool of canned reply phrases.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PhrasePool {
    /// Phrases to choose replies from.
    pub phrases: Vec<String>,
}

impl PhrasePool {
    /// Creates a pool from the given phrases.
    #[must_use]
    pub fn new(phrases: Vec<String>) -> Self {
        Self { phrases }
    }

    /// The phrases the bot ships with.
    #[must_use]
    pub fn builtin() -> Self {
        Self::new(
            [
                "is this a game to you?",
                "you're not somebody.",
                "don't you have work to do?",
                "i didn't know this was more important than patient care?",
                "why are you still here? i will CHEW your MEAT",
                "sasuga exam failer.",
                "tell me what you've learned in the past three hours",
                "damn so if i give you the test right now it's just gonna be flying colors right?",
            ]
            .into_iter()
            .map(str::to_owned)
            .collect(),
        )
    }

    /// Loads phrases from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, PhraseError> {
        let content = std::fs::read_to_string(path)?;
        let pool: Self = serde_json::from_str(&content)?;
        Ok(pool)
    }

    /// Saves phrases to a JSON file.
    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<(), PhraseError> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Validates the pool, returning the first error encountered.
    pub fn validate(&self) -> Result<(), PhraseError> {
        if self.phrases.is_empty() {
            return Err(PhraseError::NoPhrases);
        }

        self.phrases
            .iter()
            .enumerate()
            .try_for_each(|(index, phrase)| validate_phrase(index, phrase))
    }

    /// Returns one validation result per phrase.
    #[must_use]
    pub fn validate_all(&self) -> Vec<Result<(), PhraseError>> {
        if self.phrases.is_empty() {
            return vec![Err(PhraseError::NoPhrases)];
        }

        self.phrases
            .iter()
            .enumerate()
            .map(|(index, phrase)| validate_phrase(index, phrase))
            .collect()
    }

    /// Picks one phrase uniformly at random.
    ///
    /// Returns `None` only when the pool is empty.
    pub fn pick<R: Rng>(&self, rng: &mut R) -> Option<&str> {
        if self.phrases.is_empty() {
            return None;
        }
        let index = rng.random_range(0..self.phrases.len());
        self.phrases.get(index).map(String::as_str)
    }

    /// Gets a phrase by its index.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&str> {
        self.phrases.get(index).map(String::as_str)
    }

    /// Returns the number of phrases.
    #[must_use]
    pub fn len(&self) -> usize {
        self.phrases.len()
    }

    /// Checks if there are no phrases.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.phrases.is_empty()
    }

    /// Checks if the pool contains the given phrase.
    #[must_use]
    pub fn contains(&self, phrase: &str) -> bool {
        self.phrases.iter().any(|p| p == phrase)
    }
}

impl Default for PhrasePool {
    fn default() -> Self {
        Self::builtin()
    }
}

fn validate_phrase(index: usize, phrase: &str) -> Result<(), PhraseError> {
    if phrase.trim().is_empty() {
        return Err(PhraseError::Empty { index });
    }

    let length = phrase.chars().count();
    if length > MAX_MESSAGE_LENGTH {
        return Err(PhraseError::TooLong {
            index,
            length,
            max_length: MAX_MESSAGE_LENGTH,
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;

    #[test]
    fn test_builtin_is_valid() {
        let pool = PhrasePool::builtin();
        assert_eq!(pool.len(), 8);
        assert!(pool.validate().is_ok());
    }

    #[test]
    fn test_validation_no_phrases() {
        let pool = PhrasePool::new(vec![]);
        assert!(matches!(pool.validate(), Err(PhraseError::NoPhrases)));
        assert_eq!(pool.validate_all().len(), 1);
    }

    #[test]
    fn test_validation_blank_phrase() {
        let pool = PhrasePool::new(vec!["hello".to_owned(), "   ".to_owned()]);
        assert!(matches!(pool.validate(), Err(PhraseError::Empty { index: 1 })));
    }

    #[test]
    fn test_validation_too_long() {
        let pool = PhrasePool::new(vec!["a".repeat(MAX_MESSAGE_LENGTH + 1)]);
        assert!(matches!(pool.validate(), Err(PhraseError::TooLong { .. })));
    }

    #[test]
    fn test_validate_all_reports_each_phrase() {
        let pool = PhrasePool::new(vec![
            "ok".to_owned(),
            String::new(),
            "also ok".to_owned(),
        ]);
        let results = pool.validate_all();
        assert_eq!(results.len(), 3);
        assert!(results[0].is_ok());
        assert!(results[1].is_err());
        assert!(results[2].is_ok());
    }

    #[test]
    fn test_pick_single_phrase() {
        let pool = PhrasePool::new(vec!["only one".to_owned()]);
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..20 {
            assert_eq!(pool.pick(&mut rng), Some("only one"));
        }
    }

    #[test]
    fn test_pick_reaches_every_phrase() {
        let pool = PhrasePool::builtin();
        let mut rng = StdRng::seed_from_u64(42);
        let seen: HashSet<&str> = (0..1000).filter_map(|_| pool.pick(&mut rng)).collect();
        assert_eq!(seen.len(), pool.len());
    }

    #[test]
    fn test_pick_empty_pool() {
        let pool = PhrasePool::new(vec![]);
        let mut rng = StdRng::seed_from_u64(3);
        assert_eq!(pool.pick(&mut rng), None);
    }

    #[test]
    fn test_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("phrases.json");

        let pool = PhrasePool::new(vec!["first".to_owned(), "second".to_owned()]);
        pool.save_to_file(&path).unwrap();

        let loaded = PhrasePool::load_from_file(&path).unwrap();
        assert_eq!(loaded, pool);
    }

    #[test]
    fn test_load_invalid_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("phrases.json");
        std::fs::write(&path, "{ not json").unwrap();

        assert!(matches!(
            PhrasePool::load_from_file(&path),
            Err(PhraseError::ParseError(_))
        ));
    }
}
