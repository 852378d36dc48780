// src/generators/password.rs
use rand::rngs::OsRng;
use rand::seq::SliceRandom;
use serde::{Serialize, Deserialize};

use super::pool::{Category, CharacterPool};
use super::{GeneratorError, Result};

// Password generation policy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratorPolicy {
    pub min_length: usize,
    pub max_length: usize,
    pub require_upper: bool,
    pub require_lower: bool,
    pub require_digit: bool,
    pub require_symbol: bool,
}

impl Default for GeneratorPolicy {
    fn default() -> Self {
        Self {
            min_length: 15,
            max_length: 32,
            require_upper: true,
            require_lower: true,
            require_digit: true,
            require_symbol: true,
        }
    }
}

impl GeneratorPolicy {
    pub fn requires(&self, category: Category) -> bool {
        match category {
            Category::Uppercase => self.require_upper,
            Category::Lowercase => self.require_lower,
            Category::Digits => self.require_digit,
            Category::Symbols => self.require_symbol,
        }
    }

    pub fn enabled_categories(&self) -> impl Iterator<Item = Category> + '_ {
        Category::ALL.into_iter().filter(move |c| self.requires(*c))
    }

    pub fn validate(&self) -> Result<()> {
        if self.min_length == 0 {
            return Err(GeneratorError::InvalidPolicy("min_length must be greater than zero".into()));
        }
        if self.min_length > self.max_length {
            return Err(GeneratorError::InvalidPolicy(format!(
                "min_length ({}) must not exceed max_length ({})",
                self.min_length, self.max_length
            )));
        }
        Ok(())
    }
}

/// Partial policy change. Unset fields keep their current value.
#[derive(Debug, Clone, Default)]
pub struct PolicyUpdate {
    pub min_length: Option<usize>,
    pub max_length: Option<usize>,
    pub require_upper: Option<bool>,
    pub require_lower: Option<bool>,
    pub require_digit: Option<bool>,
    pub require_symbol: Option<bool>,
}

impl PolicyUpdate {
    fn apply_to(&self, policy: &GeneratorPolicy) -> GeneratorPolicy {
        GeneratorPolicy {
            min_length: self.min_length.unwrap_or(policy.min_length),
            max_length: self.max_length.unwrap_or(policy.max_length),
            require_upper: self.require_upper.unwrap_or(policy.require_upper),
            require_lower: self.require_lower.unwrap_or(policy.require_lower),
            require_digit: self.require_digit.unwrap_or(policy.require_digit),
            require_symbol: self.require_symbol.unwrap_or(policy.require_symbol),
        }
    }
}

/// Random password generator backed by the operating system CSPRNG.
///
/// The generator only holds read-only configuration, so a shared reference
/// can be used from several threads at once.
#[derive(Debug, Clone)]
pub struct PasswordGenerator {
    policy: GeneratorPolicy,
    pool: CharacterPool,
    allowed: Vec<char>,
}

impl Default for PasswordGenerator {
    fn default() -> Self {
        let policy = GeneratorPolicy::default();
        let pool = CharacterPool::default();
        let allowed = build_allowed(&policy, &pool);
        Self { policy, pool, allowed }
    }
}

impl PasswordGenerator {
    pub fn new(policy: GeneratorPolicy, pool: CharacterPool) -> Result<Self> {
        policy.validate()?;
        let allowed = build_allowed(&policy, &pool);
        if allowed.is_empty() {
            return Err(GeneratorError::EmptyPool);
        }
        Ok(Self { policy, pool, allowed })
    }

    pub fn with_policy(policy: GeneratorPolicy) -> Result<Self> {
        Self::new(policy, CharacterPool::default())
    }

    pub fn policy(&self) -> &GeneratorPolicy {
        &self.policy
    }

    pub fn pool(&self) -> &CharacterPool {
        &self.pool
    }

    pub fn allowed_characters(&self) -> &[char] {
        &self.allowed
    }

    /// Replace policy fields and rebuild the allowed set in one step.
    ///
    /// Invalid bounds are rejected and leave the generator untouched. An
    /// empty allowed set is accepted here; `generate` reports it.
    pub fn set_policy(&mut self, update: PolicyUpdate) -> Result<()> {
        let policy = update.apply_to(&self.policy);
        policy.validate()?;

        let allowed = build_allowed(&policy, &self.pool);
        if allowed.is_empty() {
            log::warn!("Generator policy now enables no character categories");
        }

        self.policy = policy;
        self.allowed = allowed;
        Ok(())
    }

    pub fn validate_length(&self, length: usize) -> Result<()> {
        if length < self.policy.min_length || length > self.policy.max_length {
            return Err(GeneratorError::LengthOutOfRange {
                length,
                min: self.policy.min_length,
                max: self.policy.max_length,
            });
        }
        Ok(())
    }

    /// One character from each enabled category, drawn from that category's
    /// own pool.
    pub fn required_characters(&self) -> Vec<char> {
        let mut rng = OsRng;
        self.policy
            .enabled_categories()
            .filter_map(|category| self.pool.get(category).choose(&mut rng).copied())
            .collect()
    }

    pub fn generate(&self, length: usize) -> Result<String> {
        self.validate_length(length)?;

        if self.allowed.is_empty() {
            return Err(GeneratorError::EmptyPool);
        }

        let required = self.policy.enabled_categories().count();
        if length < required {
            return Err(GeneratorError::LengthBelowRequired { length, required });
        }

        let mut rng = OsRng;
        let mut chars = self.required_characters();
        let fill = length - chars.len();
        chars.extend((0..fill).filter_map(|_| self.allowed.choose(&mut rng).copied()));

        chars.shuffle(&mut rng);
        Ok(chars.into_iter().collect())
    }

    pub fn generate_many(&self, length: usize, count: usize) -> Result<Vec<String>> {
        if count == 0 {
            return Err(GeneratorError::InvalidCount);
        }
        (0..count).map(|_| self.generate(length)).collect()
    }

    // Upper bound assuming uniform draws from the whole allowed set
    pub fn estimate_entropy_bits(&self, password: &str) -> f64 {
        let pool_size = self.allowed.len().max(1) as f64;
        password.chars().count() as f64 * pool_size.log2()
    }

    pub fn explain_policy(&self) -> String {
        let flags: Vec<&str> = self
            .policy
            .enabled_categories()
            .map(|c| match c {
                Category::Uppercase => "upper",
                Category::Lowercase => "lower",
                Category::Digits => "digit",
                Category::Symbols => "symbol",
            })
            .collect();

        format!(
            "Length: {}-{}, Required: {}",
            self.policy.min_length,
            self.policy.max_length,
            if flags.is_empty() { "none".to_string() } else { flags.join(", ") }
        )
    }
}

fn build_allowed(policy: &GeneratorPolicy, pool: &CharacterPool) -> Vec<char> {
    policy
        .enabled_categories()
        .flat_map(|category| pool.get(category).iter().copied())
        .collect()
}
