// src/strength.rs
use std::fmt;
use std::str::FromStr;
use serde::{Serialize, Deserialize};

pub const DEFAULT_MIN_LENGTH: usize = 8;

/// Substrings that mark a password as predictable, matched case-insensitively.
pub const COMMON_PATTERNS: [&str; 4] = ["1234", "password", "abcd", "qwerty"];

/// Heuristic strength classification, ordered weakest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum StrengthLabel {
    #[serde(rename = "Very Weak")]
    VeryWeak,
    Weak,
    Medium,
    Strong,
}

impl StrengthLabel {
    pub fn from_score(score: u8) -> Self {
        match score {
            0 => StrengthLabel::VeryWeak,
            1 => StrengthLabel::Weak,
            2 => StrengthLabel::Medium,
            _ => StrengthLabel::Strong,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StrengthLabel::VeryWeak => "Very Weak",
            StrengthLabel::Weak => "Weak",
            StrengthLabel::Medium => "Medium",
            StrengthLabel::Strong => "Strong",
        }
    }
}

impl fmt::Display for StrengthLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StrengthLabel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace(['_', '-'], " ");
        match normalized.as_str() {
            "very weak" | "veryweak" => Ok(StrengthLabel::VeryWeak),
            "weak" => Ok(StrengthLabel::Weak),
            "medium" => Ok(StrengthLabel::Medium),
            "strong" => Ok(StrengthLabel::Strong),
            _ => Err(format!(
                "Unknown strength label '{}'. Expected one of: Very Weak, Weak, Medium, Strong",
                s
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StrengthReport {
    pub length_ok: bool,
    pub variety_count: u8,
    pub contains_common_pattern: bool,
    pub score: u8,
    pub label: StrengthLabel,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Evaluation {
    pub password: String,
    pub strength: StrengthLabel,
    pub details: StrengthReport,
}

/// Stateless password scorer. Every method is a pure function of its input
/// and never fails, empty strings included.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StrengthChecker {
    min_length: usize,
}

impl Default for StrengthChecker {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_LENGTH)
    }
}

impl StrengthChecker {
    pub fn new(min_length: usize) -> Self {
        Self { min_length }
    }

    pub fn min_length(&self) -> usize {
        self.min_length
    }

    pub fn check_length(&self, password: &str) -> bool {
        password.chars().count() >= self.min_length
    }

    // Uppercase, lowercase, digit, symbol: one point each if present
    pub fn check_character_variety(&self, password: &str) -> u8 {
        let has_upper = password.chars().any(char::is_uppercase);
        let has_lower = password.chars().any(char::is_lowercase);
        let has_digit = password.chars().any(char::is_numeric);
        let has_symbol = password.chars().any(|c| !c.is_alphanumeric());

        [has_upper, has_lower, has_digit, has_symbol]
            .iter()
            .filter(|present| **present)
            .count() as u8
    }

    pub fn contains_common_pattern(&self, password: &str) -> bool {
        let lowered = password.to_lowercase();
        COMMON_PATTERNS.iter().any(|pattern| lowered.contains(pattern))
    }

    pub fn calculate_strength_score(&self, password: &str) -> u8 {
        // Nothing to score; the pattern bonus does not apply
        if password.is_empty() {
            return 0;
        }

        let mut score = 0;

        if self.check_length(password) {
            score += 1;
        }
        if self.check_character_variety(password) >= 3 {
            score += 1;
        }
        if !self.contains_common_pattern(password) {
            score += 1;
        }

        score
    }

    pub fn get_strength_label(&self, password: &str) -> StrengthLabel {
        StrengthLabel::from_score(self.calculate_strength_score(password))
    }

    pub fn get_detailed_report(&self, password: &str) -> StrengthReport {
        let score = self.calculate_strength_score(password);
        StrengthReport {
            length_ok: self.check_length(password),
            variety_count: self.check_character_variety(password),
            contains_common_pattern: self.contains_common_pattern(password),
            score,
            label: StrengthLabel::from_score(score),
        }
    }

    pub fn evaluate(&self, password: &str) -> Evaluation {
        let details = self.get_detailed_report(password);
        Evaluation {
            password: password.to_string(),
            strength: details.label,
            details,
        }
    }

    pub fn meets_min_strength(&self, password: &str, threshold: StrengthLabel) -> bool {
        self.get_strength_label(password) >= threshold
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn length_check_uses_min_length() {
        let checker = StrengthChecker::default();
        assert!(checker.check_length("abc12345"));
        assert!(!checker.check_length("aB3!"));
        assert!(StrengthChecker::new(4).check_length("aB3!"));
    }

    #[test]
    fn length_counts_characters_not_bytes() {
        let checker = StrengthChecker::new(4);
        assert!(!checker.check_length("ééé"));
        assert!(checker.check_length("éééé"));
    }

    #[test]
    fn character_variety_counts_categories() {
        let checker = StrengthChecker::default();
        assert_eq!(checker.check_character_variety("abcD123"), 3);
        assert_eq!(checker.check_character_variety("ABC123!!"), 3);
        assert_eq!(checker.check_character_variety("A7f!k2Lp"), 4);
        assert_eq!(checker.check_character_variety("lowercase"), 1);
        assert_eq!(checker.check_character_variety("with space"), 2);
    }

    #[test]
    fn common_patterns_match_case_insensitively() {
        let checker = StrengthChecker::default();
        assert!(checker.contains_common_pattern("password"));
        assert!(checker.contains_common_pattern("MyPassWord!9"));
        assert!(checker.contains_common_pattern("xxQWERTYxx"));
        assert!(checker.contains_common_pattern("a1234b"));
        assert!(!checker.contains_common_pattern("UniqPW!23"));
        assert!(!checker.contains_common_pattern("abc-d"));
    }

    #[test]
    fn score_and_label() {
        let checker = StrengthChecker::default();
        assert_eq!(checker.calculate_strength_score("A7f!k2Lp"), 3);
        assert_eq!(checker.get_strength_label("A7f!k2Lp"), StrengthLabel::Strong);

        assert_eq!(checker.calculate_strength_score("1234"), 0);
        assert_eq!(checker.get_strength_label("1234"), StrengthLabel::VeryWeak);

        // Long enough, no pattern, low variety
        assert_eq!(checker.get_strength_label("zxcvbnmlkj"), StrengthLabel::Medium);
        // Only pattern-free
        assert_eq!(checker.get_strength_label("zx"), StrengthLabel::Weak);
    }

    #[test]
    fn empty_password_is_very_weak() {
        let checker = StrengthChecker::default();
        let report = checker.get_detailed_report("");
        assert_eq!(
            report,
            StrengthReport {
                length_ok: false,
                variety_count: 0,
                contains_common_pattern: false,
                score: 0,
                label: StrengthLabel::VeryWeak,
            }
        );
    }

    #[test]
    fn detailed_report_bundles_checks() {
        let checker = StrengthChecker::default();
        let report = checker.get_detailed_report("Password1!");
        assert!(report.length_ok);
        assert_eq!(report.variety_count, 4);
        assert!(report.contains_common_pattern);
        assert_eq!(report.score, 2);
        assert_eq!(report.label, StrengthLabel::Medium);
    }

    #[test]
    fn evaluate_wraps_report() {
        let checker = StrengthChecker::default();
        let evaluation = checker.evaluate("A7f!k2Lp");
        assert_eq!(evaluation.password, "A7f!k2Lp");
        assert_eq!(evaluation.strength, StrengthLabel::Strong);
        assert_eq!(evaluation.details, checker.get_detailed_report("A7f!k2Lp"));
    }

    #[test]
    fn checks_are_idempotent() {
        let checker = StrengthChecker::default();
        for password in ["", "1234", "A7f!k2Lp", "qwertyQWERTY", "ÄÖÜ äöü 123"] {
            assert_eq!(checker.evaluate(password), checker.evaluate(password));
        }
    }

    #[test]
    fn min_strength_threshold() {
        let checker = StrengthChecker::default();
        assert!(checker.meets_min_strength("A7f!k2Lp", StrengthLabel::Strong));
        assert!(checker.meets_min_strength("zxcvbnmlkj", StrengthLabel::Medium));
        assert!(!checker.meets_min_strength("zxcvbnmlkj", StrengthLabel::Strong));
        assert!(checker.meets_min_strength("1234", StrengthLabel::VeryWeak));
    }

    #[test]
    fn labels_are_ordered_and_parse() {
        assert!(StrengthLabel::VeryWeak < StrengthLabel::Weak);
        assert!(StrengthLabel::Medium < StrengthLabel::Strong);
        assert_eq!("very weak".parse::<StrengthLabel>(), Ok(StrengthLabel::VeryWeak));
        assert_eq!("VERY_WEAK".parse::<StrengthLabel>(), Ok(StrengthLabel::VeryWeak));
        assert_eq!(" Medium ".parse::<StrengthLabel>(), Ok(StrengthLabel::Medium));
        assert!("Very Strong".parse::<StrengthLabel>().is_err());
        assert_eq!(StrengthLabel::VeryWeak.to_string(), "Very Weak");
    }

    #[test]
    fn report_serializes_with_display_labels() {
        let checker = StrengthChecker::default();
        let json = serde_json::to_value(checker.get_detailed_report("1234")).unwrap();
        assert_eq!(json["label"], "Very Weak");
        assert_eq!(json["score"], 0);
    }
}
