//! Provider cost control
//!
//! Text is shortened before it reaches the provider, which charges per
//! character. Longer messages lose proportionally more.

use std::borrow::Cow;

use voice_relay_config::constants::{truncation, COST_PER_CHAR};
use voice_relay_config::TruncationConfig;

/// Shortening policy: `clamp(floor(len * factor), min_chars, max_chars)`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextBudget {
    pub factor: f64,
    pub min_chars: usize,
    pub max_chars: usize,
}

impl Default for TextBudget {
    fn default() -> Self {
        Self {
            factor: truncation::FACTOR,
            min_chars: truncation::MIN_CHARS,
            max_chars: truncation::MAX_CHARS,
        }
    }
}

impl From<&TruncationConfig> for TextBudget {
    fn from(config: &TruncationConfig) -> Self {
        Self {
            factor: config.factor,
            min_chars: config.min_chars,
            max_chars: config.max_chars,
        }
    }
}

impl TextBudget {
    /// Characters kept for a text of `len` characters
    pub fn max_length(&self, len: usize) -> usize {
        let scaled = (len as f64 * self.factor).floor() as usize;
        scaled.max(self.min_chars).min(self.max_chars)
    }

    /// Cut `text` to its budget, appending an ellipsis when anything was cut
    pub fn shorten<'a>(&self, text: &'a str) -> Cow<'a, str> {
        let len = text.chars().count();
        let max = self.max_length(len);
        if len <= max {
            return Cow::Borrowed(text);
        }

        let mut shortened: String = text.chars().take(max).collect();
        shortened.push_str(truncation::ELLIPSIS);
        Cow::Owned(shortened)
    }
}

/// Approximate provider credits for `text`, for logging only
pub fn estimate_cost(text: &str) -> u64 {
    (text.chars().count() as f64 * COST_PER_CHAR).ceil() as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_estimate_cost() {
        assert_eq!(estimate_cost("hello"), 6);
        assert_eq!(estimate_cost(""), 0);
        assert_eq!(estimate_cost("a"), 2);
    }

    #[test]
    fn test_max_length_clamps() {
        let budget = TextBudget::default();
        assert_eq!(budget.max_length(200), 100);
        assert_eq!(budget.max_length(100), 70);
        assert_eq!(budget.max_length(20), 30);
        assert_eq!(budget.max_length(0), 30);
        assert_eq!(budget.max_length(1000), 100);
    }

    #[test]
    fn test_long_message_cut_to_100_plus_ellipsis() {
        let budget = TextBudget::default();
        let text = "abcdefghij".repeat(20);
        let shortened = budget.shorten(&text);
        assert_eq!(shortened.chars().count(), 103);
        assert!(shortened.ends_with("..."));
        assert_eq!(&shortened[..100], &text[..100]);
    }

    #[test]
    fn test_short_message_untouched() {
        let budget = TextBudget::default();
        let text = "Build finished";
        assert!(matches!(budget.shorten(text), Cow::Borrowed("Build finished")));

        // 30 characters is the floor, so a 30 character message survives
        let text = "x".repeat(30);
        assert_eq!(budget.shorten(&text), text.as_str());
    }

    #[test]
    fn test_mid_length_message() {
        let budget = TextBudget::default();
        let text = "y".repeat(50);
        let shortened = budget.shorten(&text);
        assert_eq!(shortened, format!("{}...", "y".repeat(35)));
    }

    #[test]
    fn test_shorten_respects_char_boundaries() {
        let budget = TextBudget {
            factor: 0.5,
            min_chars: 3,
            max_chars: 3,
        };
        assert_eq!(budget.shorten("ééééé"), "ééé...");

        let budget = TextBudget { min_chars: 2, ..budget };
        assert_eq!(budget.max_length(5), 2);
        assert_eq!(budget.shorten("ééééé"), "éé...");
    }

    #[test]
    fn test_from_config() {
        let config = TruncationConfig {
            factor: 0.5,
            min_chars: 10,
            max_chars: 20,
        };
        let budget = TextBudget::from(&config);
        assert_eq!(budget.max_length(100), 20);
        assert_eq!(budget.max_length(30), 15);
    }
}
