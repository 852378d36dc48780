// src/generators/pool.rs
use std::collections::HashSet;
use std::fmt;
use serde::{Serialize, Deserialize};

use super::GeneratorError;

pub const UPPERCASE: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ";
pub const LOWERCASE: &str = "abcdefghijklmnopqrstuvwxyz";
pub const DIGITS: &str = "0123456789";
pub const SYMBOLS: &str = "!\"#$%&'()*+,-./:;<=>?@[\\]^_`{|}~";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Uppercase,
    Lowercase,
    Digits,
    Symbols,
}

impl Category {
    /// Fixed category order used when building the allowed set.
    pub const ALL: [Category; 4] = [
        Category::Uppercase,
        Category::Lowercase,
        Category::Digits,
        Category::Symbols,
    ];
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Category::Uppercase => write!(f, "uppercase"),
            Category::Lowercase => write!(f, "lowercase"),
            Category::Digits => write!(f, "digits"),
            Category::Symbols => write!(f, "symbols"),
        }
    }
}

/// Characters available to the generator, split into disjoint categories.
///
/// Pools are plain values: build one, hand it to a generator, and it stays
/// read-only from then on. Two generators can run side by side with
/// different pools.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CharacterPool {
    uppercase: Vec<char>,
    lowercase: Vec<char>,
    digits: Vec<char>,
    symbols: Vec<char>,
}

impl Default for CharacterPool {
    fn default() -> Self {
        Self {
            uppercase: UPPERCASE.chars().collect(),
            lowercase: LOWERCASE.chars().collect(),
            digits: DIGITS.chars().collect(),
            symbols: SYMBOLS.chars().collect(),
        }
    }
}

impl CharacterPool {
    /// Build a custom pool. Every category must be non-empty and no
    /// character may belong to more than one category.
    pub fn new(uppercase: &str, lowercase: &str, digits: &str, symbols: &str) -> Result<Self, GeneratorError> {
        let pool = Self {
            uppercase: uppercase.chars().collect(),
            lowercase: lowercase.chars().collect(),
            digits: digits.chars().collect(),
            symbols: symbols.chars().collect(),
        };

        let mut seen = HashSet::new();
        for category in Category::ALL {
            let chars = pool.get(category);
            if chars.is_empty() {
                return Err(GeneratorError::InvalidPool(format!("category '{}' has no characters", category)));
            }
            for c in chars {
                if !seen.insert(*c) {
                    return Err(GeneratorError::InvalidPool(format!(
                        "character '{}' appears more than once (last seen in '{}')",
                        c, category
                    )));
                }
            }
        }

        Ok(pool)
    }

    pub fn get(&self, category: Category) -> &[char] {
        match category {
            Category::Uppercase => &self.uppercase,
            Category::Lowercase => &self.lowercase,
            Category::Digits => &self.digits,
            Category::Symbols => &self.symbols,
        }
    }

    /// Category of `c`, if it belongs to this pool at all.
    pub fn category_of(&self, c: char) -> Option<Category> {
        Category::ALL.into_iter().find(|cat| self.get(*cat).contains(&c))
    }

    pub fn len(&self) -> usize {
        Category::ALL.iter().map(|cat| self.get(*cat).len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
