//! Table-driven pattern matching shared by the heuristics and the
//! free-text response parsers.
//!
//! Every rule is a `{pattern, weight, category}` entry. A table compiles its
//! rules into one case-insensitive `RegexSet`, so matching a text against the
//! whole table is a single pass.

use regex::{RegexSet, RegexSetBuilder};

/// What a pattern indicates when it matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PatternCategory {
    /// Known spam or fraud phrase.
    SpamPhrase,
    /// Pressure to act quickly.
    Urgency,
    /// Money or reward wording.
    Money,
    /// Call to action.
    Action,
    /// Malware vocabulary.
    MalwareKeyword,
    /// Generic suspicious wording in a URL.
    SuspiciousTerm,
    /// Top-level domain with a poor reputation.
    RiskyTld,
    /// Host shaped like brand impersonation.
    SuspiciousDomain,
    /// Provider prose signalling high risk.
    HighRiskPhrase,
    /// Provider prose signalling medium risk.
    MediumRiskPhrase,
    /// Provider prose signalling low risk.
    LowRiskPhrase,
}

/// A single weighted pattern.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PatternRule {
    pub pattern: &'static str,
    pub weight: f64,
    pub category: PatternCategory,
    /// Literal substring (escaped before compiling) or raw regex.
    pub literal: bool,
}

impl PatternRule {
    /// A case-insensitive substring rule.
    pub const fn phrase(pattern: &'static str, weight: f64, category: PatternCategory) -> Self {
        Self {
            pattern,
            weight,
            category,
            literal: true,
        }
    }

    /// A case-insensitive regex rule.
    pub const fn regex(pattern: &'static str, weight: f64, category: PatternCategory) -> Self {
        Self {
            pattern,
            weight,
            category,
            literal: false,
        }
    }
}

/// Builds phrase rules sharing one weight and category.
pub fn phrases(
    patterns: &[&'static str],
    weight: f64,
    category: PatternCategory,
) -> Vec<PatternRule> {
    patterns
        .iter()
        .map(|&p| PatternRule::phrase(p, weight, category))
        .collect()
}

/// A compiled table of pattern rules.
#[derive(Debug, Clone)]
pub struct PatternTable {
    rules: Vec<PatternRule>,
    set: RegexSet,
}

impl PatternTable {
    /// Compiles the given rules.
    pub fn new(rules: Vec<PatternRule>) -> Result<Self, regex::Error> {
        let sources: Vec<String> = rules
            .iter()
            .map(|r| {
                if r.literal {
                    regex::escape(r.pattern)
                } else {
                    r.pattern.to_string()
                }
            })
            .collect();

        let set = RegexSetBuilder::new(&sources)
            .case_insensitive(true)
            .build()?;

        Ok(Self { rules, set })
    }

    /// Returns the rules in this table.
    pub fn rules(&self) -> &[PatternRule] {
        &self.rules
    }

    /// Returns every rule that matches `text`, in table order.
    pub fn matches(&self, text: &str) -> Vec<&PatternRule> {
        self.set
            .matches(text)
            .into_iter()
            .map(|i| &self.rules[i])
            .collect()
    }

    /// Returns the matching rules of one category.
    pub fn matches_in(&self, text: &str, category: PatternCategory) -> Vec<&PatternRule> {
        self.matches(text)
            .into_iter()
            .filter(|r| r.category == category)
            .collect()
    }

    /// Returns true if any rule of `category` matches.
    pub fn any_in(&self, text: &str, category: PatternCategory) -> bool {
        !self.matches_in(text, category).is_empty()
    }

    /// Sum of the weights of all matching rules.
    pub fn score(&self, text: &str) -> f64 {
        self.matches(text).iter().map(|r| r.weight).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> PatternTable {
        let mut rules = phrases(&["click here", "100% free"], 1.0, PatternCategory::SpamPhrase);
        rules.push(PatternRule::phrase("urgent", 0.5, PatternCategory::Urgency));
        rules.push(PatternRule::regex(r"\.tk$", 2.0, PatternCategory::RiskyTld));
        PatternTable::new(rules).unwrap()
    }

    #[test]
    fn matches_case_insensitively() {
        let t = table();
        let matched = t.matches("URGENT: Click Here");
        assert_eq!(matched.len(), 2);
        assert_eq!(matched[0].pattern, "click here");
        assert_eq!(matched[1].pattern, "urgent");
    }

    #[test]
    fn literal_patterns_are_escaped() {
        let t = table();
        assert!(t.any_in("now 100% free", PatternCategory::SpamPhrase));
        assert!(!t.any_in("now 1000 free", PatternCategory::SpamPhrase));
    }

    #[test]
    fn regex_patterns_are_not_escaped() {
        let t = table();
        assert!(t.any_in("evil.tk", PatternCategory::RiskyTld));
        assert!(!t.any_in("evil.tk.com", PatternCategory::RiskyTld));
    }

    #[test]
    fn score_sums_weights_once_per_rule() {
        let t = table();
        assert_eq!(t.score("click here click here urgent"), 1.5);
        assert_eq!(t.score("nothing to see"), 0.0);
    }

    #[test]
    fn invalid_regex_is_rejected() {
        let rules = vec![PatternRule::regex("(", 1.0, PatternCategory::SuspiciousDomain)];
        assert!(PatternTable::new(rules).is_err());
    }
}
