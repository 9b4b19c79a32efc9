//! Secret word datasets

use std::collections::BTreeMap;
use std::path::Path;

use rand::seq::SliceRandom;
use rand::RngCore;
use tracing::info;

/// Dataset compiled into the binary, used when no file is configured
const BUILTIN_DATASET: &str = include_str!("../../data/standard.json");

/// A category and the word players must hint at
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecretWord {
    pub category: String,
    pub secret: String,
}

/// Anything that can hand out a random secret word
pub trait WordSource: Send + Sync {
    /// `None` when the source has nothing to offer
    fn random_word(&self, rng: &mut dyn RngCore) -> Option<SecretWord>;
}

/// Word bank loading errors
#[derive(Debug, thiserror::Error)]
pub enum WordBankError {
    #[error("Failed to read word list: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse word list: {0}")]
    Parse(#[from] serde_json::Error),
}

/// In-memory category -> words table
#[derive(Debug, Clone, Default)]
pub struct WordBank {
    categories: BTreeMap<String, Vec<String>>,
}

impl WordBank {
    /// Parse a JSON object mapping category names to word arrays.
    /// Blank words and empty categories are dropped.
    pub fn from_json(json: &str) -> Result<Self, WordBankError> {
        let raw: BTreeMap<String, Vec<String>> = serde_json::from_str(json)?;

        let categories = raw
            .into_iter()
            .filter_map(|(category, words)| {
                let category = category.trim().to_string();
                let words: Vec<String> = words
                    .into_iter()
                    .map(|w| w.trim().to_string())
                    .filter(|w| !w.is_empty())
                    .collect();
                (!category.is_empty() && !words.is_empty()).then_some((category, words))
            })
            .collect();

        Ok(Self { categories })
    }

    /// Load a word list from disk
    pub fn load(path: &Path) -> Result<Self, WordBankError> {
        let json = std::fs::read_to_string(path)?;
        let bank = Self::from_json(&json)?;
        info!(
            path = %path.display(),
            categories = bank.category_count(),
            words = bank.word_count(),
            "Loaded word list"
        );
        Ok(bank)
    }

    /// The dataset shipped with the server
    pub fn builtin() -> Result<Self, WordBankError> {
        Self::from_json(BUILTIN_DATASET)
    }

    pub fn category_count(&self) -> usize {
        self.categories.len()
    }

    pub fn word_count(&self) -> usize {
        self.categories.values().map(Vec::len).sum()
    }
}

impl WordSource for WordBank {
    fn random_word(&self, rng: &mut dyn RngCore) -> Option<SecretWord> {
        let names: Vec<&String> = self.categories.keys().collect();
        let category = *names.choose(rng)?;
        let secret = self.categories.get(category)?.choose(rng)?;
        Some(SecretWord {
            category: category.clone(),
            secret: secret.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn builtin_dataset_parses() {
        let bank = WordBank::builtin().unwrap();
        assert!(bank.category_count() > 0);
        assert!(bank.word_count() >= bank.category_count());
    }

    #[test]
    fn random_word_comes_from_its_category() {
        let bank = WordBank::from_json(r#"{"Fruit": ["Mango", "Kiwi"], "Pets": ["Cat"]}"#).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        for _ in 0..100 {
            let word = bank.random_word(&mut rng).unwrap();
            match word.category.as_str() {
                "Fruit" => assert!(["Mango", "Kiwi"].contains(&word.secret.as_str())),
                "Pets" => assert_eq!(word.secret, "Cat"),
                other => panic!("unexpected category {other}"),
            }
        }
    }

    #[test]
    fn blank_entries_and_empty_categories_are_dropped() {
        let bank = WordBank::from_json(r#"{"Empty": [], "Blank": ["  "], " Fruit ": [" Fig "]}"#)
            .unwrap();
        assert_eq!(bank.category_count(), 1);
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let word = bank.random_word(&mut rng).unwrap();
        assert_eq!(
            word,
            SecretWord {
                category: "Fruit".into(),
                secret: "Fig".into()
            }
        );
    }

    #[test]
    fn empty_bank_yields_nothing() {
        let bank = WordBank::default();
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        assert!(bank.random_word(&mut rng).is_none());
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(matches!(
            WordBank::from_json("[1, 2, 3]"),
            Err(WordBankError::Parse(_))
        ));
    }
}
