//! Local heuristic scorers (terminal tier of every fallback chain).
//!
//! Each scorer is pure: no network access, no clock, no randomness. They only
//! look at the artifact itself, so they cannot fail for well-formed input.
//!
//! Scoring tables and verdict thresholds are kept apart so thresholds can be
//! exercised directly at their boundaries.

use std::net::Ipv4Addr;

use serde_json::json;

use super::patterns::{phrases, PatternCategory, PatternRule, PatternTable};
use super::risk::{
    file_extension, ArtifactKind, ClassificationRequest, ClassificationResult, RiskLevel,
};

/// Terminal scorer of a fallback chain.
pub trait Heuristic: Send + Sync {
    /// Scores the request locally.
    fn score(&self, request: &ClassificationRequest) -> ClassificationResult;

    /// Returns the name of this scorer for logging.
    fn name(&self) -> &'static str;
}

// === Text ===

const SPAM_PHRASES: &[&str] = &[
    "free money",
    "click here",
    "congratulations",
    "you have won",
    "claim now",
    "urgent",
    "limited time",
    "act now",
    "call immediately",
    "guaranteed",
    "make money fast",
    "no risk",
    "100% free",
    "credit card",
    "social security",
    "winner",
    "prize",
    "lottery",
    "inheritance",
    "verify account",
    "suspended",
    "bank account",
    "wire transfer",
    "bitcoin",
    "cryptocurrency",
    "investment opportunity",
    "get rich quick",
    "work from home",
    "earn money online",
    "cash prize",
    "tax refund",
    "irs",
    "government grant",
    "loan approved",
    "debt consolidation",
];

const URGENCY_WORDS: &[&str] = &["urgent", "immediate", "expires", "limited time", "hurry", "act now"];
const MONEY_WORDS: &[&str] = &["money", "cash", "prize", "reward", "payment", "refund", "loan"];
const ACTION_WORDS: &[&str] = &["click", "call", "verify", "confirm", "update", "download"];

/// Per-match weights in tenths of a point. Summed as integers so a composite
/// lands exactly on the thresholds below.
const SPAM_PHRASE_TENTHS: usize = 10;
const URGENCY_TENTHS: usize = 5;
const MONEY_TENTHS: usize = 3;
const ACTION_TENTHS: usize = 2;

/// Composite score at or above which text is `High` risk.
pub const TEXT_HIGH_THRESHOLD: f64 = 3.0;
/// Composite score at or above which text is `Low` risk.
pub const TEXT_LOW_THRESHOLD: f64 = 1.5;

/// Default spam/fraud scoring table.
pub fn text_rules() -> Vec<PatternRule> {
    let weight = |tenths: usize| tenths as f64 / 10.0;
    let mut rules = phrases(SPAM_PHRASES, weight(SPAM_PHRASE_TENTHS), PatternCategory::SpamPhrase);
    rules.extend(phrases(URGENCY_WORDS, weight(URGENCY_TENTHS), PatternCategory::Urgency));
    rules.extend(phrases(MONEY_WORDS, weight(MONEY_TENTHS), PatternCategory::Money));
    rules.extend(phrases(ACTION_WORDS, weight(ACTION_TENTHS), PatternCategory::Action));
    rules
}

/// `patterns + 0.5 * urgency + 0.3 * money + 0.2 * action`, computed exactly.
pub fn composite_score(patterns: usize, urgency: usize, money: usize, action: usize) -> f64 {
    let tenths = patterns * SPAM_PHRASE_TENTHS
        + urgency * URGENCY_TENTHS
        + money * MONEY_TENTHS
        + action * ACTION_TENTHS;
    tenths as f64 / 10.0
}

/// Breakdown of a text scoring pass.
#[derive(Debug, Clone, PartialEq)]
pub struct TextAssessment {
    pub patterns: Vec<&'static str>,
    pub urgency_words: Vec<&'static str>,
    pub money_words: Vec<&'static str>,
    pub action_words: Vec<&'static str>,
    pub composite_score: f64,
}

/// Keyword-weighted spam/fraud scorer for free text.
pub struct TextHeuristic {
    table: PatternTable,
}

impl TextHeuristic {
    /// Creates a scorer with the default table.
    pub fn new() -> Self {
        Self::with_rules(text_rules()).expect("built-in text patterns are valid")
    }

    /// Creates a scorer with a custom table.
    pub fn with_rules(rules: Vec<PatternRule>) -> Result<Self, regex::Error> {
        Ok(Self {
            table: PatternTable::new(rules)?,
        })
    }

    /// Computes the matched words and composite score.
    pub fn assess(&self, text: &str) -> TextAssessment {
        let matched = self.table.matches(text);
        let of = |category: PatternCategory| -> Vec<&'static str> {
            matched
                .iter()
                .filter(|r| r.category == category)
                .map(|r| r.pattern)
                .collect()
        };

        let patterns = of(PatternCategory::SpamPhrase);
        let urgency_words = of(PatternCategory::Urgency);
        let money_words = of(PatternCategory::Money);
        let action_words = of(PatternCategory::Action);
        let composite_score = composite_score(
            patterns.len(),
            urgency_words.len(),
            money_words.len(),
            action_words.len(),
        );

        TextAssessment {
            patterns,
            urgency_words,
            money_words,
            action_words,
            composite_score,
        }
    }

    /// Maps a composite score onto a risk level and confidence.
    pub fn verdict(composite_score: f64) -> (RiskLevel, f32) {
        if composite_score >= TEXT_HIGH_THRESHOLD {
            (
                RiskLevel::High,
                (0.80 + 0.05 * composite_score).min(0.95) as f32,
            )
        } else if composite_score >= TEXT_LOW_THRESHOLD {
            (
                RiskLevel::Low,
                (0.60 + 0.10 * composite_score).min(0.85) as f32,
            )
        } else {
            (
                ArtifactKind::Text.safe_floor(),
                (0.95 - 0.10 * composite_score).max(0.90) as f32,
            )
        }
    }

    /// Scores free text.
    pub fn score_text(&self, text: &str) -> ClassificationResult {
        let assessment = self.assess(text);
        let (risk, confidence) = Self::verdict(assessment.composite_score);
        let composite = format!("{:.2}", assessment.composite_score);

        let detail = match risk {
            RiskLevel::High | RiskLevel::Medium | RiskLevel::Low => json!({
                "fallback": true,
                "reason": if risk == RiskLevel::High {
                    "High spam indicators detected"
                } else {
                    "Some spam indicators detected"
                },
                "patterns": assessment.patterns,
                "urgencyWords": assessment.urgency_words,
                "moneyWords": assessment.money_words,
                "actionWords": assessment.action_words,
                "compositeScore": composite,
            }),
            RiskLevel::None => json!({
                "fallback": true,
                "reason": "minimal spam indicators detected",
                "patterns": [],
                "compositeScore": composite,
            }),
        };

        ClassificationResult::heuristic(risk, confidence, detail)
    }
}

impl Default for TextHeuristic {
    fn default() -> Self {
        Self::new()
    }
}

impl Heuristic for TextHeuristic {
    fn score(&self, request: &ClassificationRequest) -> ClassificationResult {
        self.score_text(request.label())
    }

    fn name(&self) -> &'static str {
        "text-heuristic"
    }
}

// === URL ===

/// Shortener domains, matched against the host including subdomains.
const URL_SHORTENERS: &[&str] = &[
    "bit.ly",
    "tinyurl.com",
    "goo.gl",
    "t.co",
    "ow.ly",
    "is.gd",
    "buff.ly",
    "cutt.ly",
];

const URL_MALWARE_KEYWORDS: &[&str] = &["malware", "virus", "trojan", "ransomware", "spyware", "keylogger"];

const URL_SUSPICIOUS_TERMS: &[&str] = &[
    "phishing",
    "scam",
    "hack",
    "free-money",
    "click-here",
    "suspicious",
    "malicious",
];

/// Host suffixes with a poor reputation. Matched against the host only, so
/// `page.html` does not count as `.ml`.
const URL_RISKY_TLDS: &[&str] = &[
    r"\.tk$", r"\.ml$", r"\.ga$", r"\.cf$", r"\.gq$", r"\.xyz$", r"\.top$", r"\.zip$", r"\.click$",
];

const URL_SUSPICIOUS_DOMAINS: &[&str] = &[
    r"(paypal|apple|amazon|microsoft|google|netflix|facebook|bank)[a-z0-9]*[-.](secure|login|verify|account|update|support)",
    r"(secure|login|verify|account|update)[-.][a-z0-9.-]*(paypal|apple|amazon|netflix|facebook)",
    r"(^|\.)xn--",
    r"([a-z0-9]+-){3,}[a-z0-9]+\.",
    r"\d{1,3}-\d{1,3}-\d{1,3}-\d{1,3}",
];

/// Points per suspicious substring or risky TLD.
const URL_SUBSTRING_POINTS: u32 = 2;
/// Points per suspicious domain pattern.
const URL_DOMAIN_POINTS: u32 = 3;
/// Points for a bare IPv4 host.
const URL_IP_HOST_POINTS: u32 = 4;
/// Points for a deep, traversing, or percent-encoded path.
const URL_PATH_POINTS: u32 = 2;
/// Paths with more segments than this are suspicious.
const URL_MAX_PATH_SEGMENTS: usize = 6;

/// Score at or above which a URL is `High` risk.
pub const URL_HIGH_THRESHOLD: u32 = 5;
/// Score at or above which a URL is `Medium` risk.
pub const URL_MEDIUM_THRESHOLD: u32 = 2;

/// Host and path of a URL, split without any normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlParts {
    pub host: String,
    pub path: String,
}

/// Splits a raw URL into host and path.
///
/// `url::Url` would resolve `..` and re-encode the path, which hides exactly
/// what the path rule looks for, so this works on the raw string.
pub fn split_url(raw: &str) -> UrlParts {
    let raw = raw.trim();
    let rest = match raw.find("://") {
        Some(i) => &raw[i + 3..],
        None => raw.strip_prefix("//").unwrap_or(raw),
    };

    let authority_end = rest.find(['/', '?', '#']).unwrap_or(rest.len());
    let authority = &rest[..authority_end];
    let after = &rest[authority_end..];
    let path = if after.starts_with('/') {
        let end = after.find(['?', '#']).unwrap_or(after.len());
        &after[..end]
    } else {
        ""
    };

    let host_port = authority.rsplit('@').next().unwrap_or(authority);
    let host = if let Some(stripped) = host_port.strip_prefix('[') {
        stripped.split(']').next().unwrap_or(stripped)
    } else {
        host_port.split(':').next().unwrap_or(host_port)
    };

    UrlParts {
        host: host.to_ascii_lowercase(),
        path: path.to_string(),
    }
}

/// True if `host` is `domain` or one of its subdomains.
fn is_within_domain(host: &str, domain: &str) -> bool {
    host.strip_suffix(domain)
        .is_some_and(|rest| rest.is_empty() || rest.ends_with('.'))
}

/// Pattern-and-structure scorer for URLs.
pub struct UrlHeuristic {
    substrings: PatternTable,
    host_rules: PatternTable,
}

impl UrlHeuristic {
    /// Creates a scorer with the default tables.
    pub fn new() -> Self {
        let mut substrings = phrases(URL_MALWARE_KEYWORDS, 2.0, PatternCategory::MalwareKeyword);
        substrings.extend(phrases(URL_SUSPICIOUS_TERMS, 2.0, PatternCategory::SuspiciousTerm));

        let mut host_rules: Vec<PatternRule> = URL_RISKY_TLDS
            .iter()
            .map(|&p| PatternRule::regex(p, 2.0, PatternCategory::RiskyTld))
            .collect();
        host_rules.extend(
            URL_SUSPICIOUS_DOMAINS
                .iter()
                .map(|&p| PatternRule::regex(p, 3.0, PatternCategory::SuspiciousDomain)),
        );

        Self {
            substrings: PatternTable::new(substrings).expect("built-in url patterns are valid"),
            host_rules: PatternTable::new(host_rules).expect("built-in host patterns are valid"),
        }
    }

    /// Computes the raw score and the indicators that contributed to it.
    pub fn assess(&self, url: &str) -> (u32, Vec<String>) {
        let mut score = 0;
        let mut indicators = Vec::new();
        let parts = split_url(url);

        for shortener in URL_SHORTENERS
            .iter()
            .filter(|s| is_within_domain(&parts.host, s))
        {
            score += URL_SUBSTRING_POINTS;
            indicators.push(format!("suspicious pattern: {shortener}"));
        }

        for rule in self.substrings.matches(url) {
            score += URL_SUBSTRING_POINTS;
            indicators.push(format!("suspicious pattern: {}", rule.pattern));
        }

        for rule in self.host_rules.matches(&parts.host) {
            match rule.category {
                PatternCategory::RiskyTld => {
                    score += URL_SUBSTRING_POINTS;
                    indicators.push(format!("risky top-level domain: {}", parts.host));
                }
                _ => {
                    score += URL_DOMAIN_POINTS;
                    indicators.push(format!("suspicious domain: {}", parts.host));
                }
            }
        }

        if parts.host.parse::<Ipv4Addr>().is_ok() {
            score += URL_IP_HOST_POINTS;
            indicators.push("host is an IP address".to_string());
        }

        let segments = parts.path.split('/').filter(|s| !s.is_empty()).count();
        if segments > URL_MAX_PATH_SEGMENTS || parts.path.contains("..") || parts.path.contains('%') {
            score += URL_PATH_POINTS;
            indicators.push("unusual path structure".to_string());
        }

        (score, indicators)
    }

    /// Maps a URL score onto a risk level and confidence.
    pub fn verdict(score: u32) -> (RiskLevel, f32) {
        if score >= URL_HIGH_THRESHOLD {
            (RiskLevel::High, 0.85)
        } else if score >= URL_MEDIUM_THRESHOLD {
            (RiskLevel::Medium, 0.75)
        } else {
            (ArtifactKind::Url.safe_floor(), 0.70)
        }
    }

    /// Scores a URL.
    pub fn score_url(&self, url: &str) -> ClassificationResult {
        let (score, indicators) = self.assess(url);
        let (risk, confidence) = Self::verdict(score);
        let reason = if indicators.is_empty() {
            "no suspicious patterns"
        } else {
            "suspicious pattern detected"
        };

        ClassificationResult::heuristic(
            risk,
            confidence,
            json!({
                "fallback": true,
                "reason": reason,
                "score": score,
                "indicators": indicators,
            }),
        )
    }
}

impl Default for UrlHeuristic {
    fn default() -> Self {
        Self::new()
    }
}

impl Heuristic for UrlHeuristic {
    fn score(&self, request: &ClassificationRequest) -> ClassificationResult {
        self.score_url(request.label())
    }

    fn name(&self) -> &'static str {
        "url-heuristic"
    }
}

// === File ===

const EXECUTABLE_EXTENSIONS: &[&str] = &["exe", "bat", "cmd", "scr", "pif", "com", "jar"];
const ARCHIVE_EXTENSIONS: &[&str] = &["zip", "rar", "7z", "gz", "tar"];

/// Files larger than this are `Medium` risk.
pub const LARGE_FILE_BYTES: u64 = 50 * 1024 * 1024;

/// Metadata-only scorer for uploaded files. Never reads the content.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileHeuristic;

impl FileHeuristic {
    pub fn new() -> Self {
        Self
    }

    /// Scores a file by extension and size.
    pub fn score_file(&self, name: &str, size_bytes: u64) -> ClassificationResult {
        let ext = file_extension(name);
        let file_type = ext.as_deref().map(|e| format!(".{e}")).unwrap_or_default();
        let ext = ext.as_deref().unwrap_or_default();

        let (risk, confidence, reason) = if EXECUTABLE_EXTENSIONS.contains(&ext) {
            (
                RiskLevel::High,
                0.85,
                format!("Potentially dangerous file type: {file_type}"),
            )
        } else if ARCHIVE_EXTENSIONS.contains(&ext) {
            (
                RiskLevel::Medium,
                0.70,
                format!("Archive file requiring caution: {file_type}"),
            )
        } else if size_bytes > LARGE_FILE_BYTES {
            (
                RiskLevel::Medium,
                0.65,
                "Large file size may indicate risk".to_string(),
            )
        } else {
            (
                ArtifactKind::File.safe_floor(),
                0.80,
                "File appears safe based on basic analysis".to_string(),
            )
        };

        ClassificationResult::heuristic(
            risk,
            confidence,
            json!({
                "analysis": "fallback",
                "reason": reason,
                "fileType": file_type,
                "size": size_bytes,
            }),
        )
    }
}

impl Heuristic for FileHeuristic {
    fn score(&self, request: &ClassificationRequest) -> ClassificationResult {
        match request {
            ClassificationRequest::File {
                name, size_bytes, ..
            } => self.score_file(name, *size_bytes),
            other => self.score_file(other.label(), 0),
        }
    }

    fn name(&self) -> &'static str {
        "file-heuristic"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // === Text Tests ===

    #[test]
    fn spam_scenario_is_high_risk() {
        let h = TextHeuristic::new();
        let text = "URGENT: You have won a prize! Click here to claim now, call immediately.";
        let assessment = h.assess(text);

        for p in ["urgent", "you have won", "click here", "claim now", "call immediately"] {
            assert!(assessment.patterns.contains(&p), "missing pattern {p}");
        }
        assert!(assessment.urgency_words.contains(&"urgent"));
        assert!(assessment.urgency_words.contains(&"immediate"));
        assert!(assessment.composite_score >= 3.0);

        let result = h.score_text(text);
        assert_eq!(result.risk, RiskLevel::High);
        assert!((0.80..=0.95).contains(&result.confidence));
        assert!(result.is_heuristic());
    }

    #[test]
    fn threshold_boundary_at_three() {
        assert_eq!(TextHeuristic::verdict(2.99).0, RiskLevel::Low);
        assert_eq!(TextHeuristic::verdict(3.00).0, RiskLevel::High);
    }

    #[test]
    fn threshold_boundary_at_one_and_a_half() {
        assert_eq!(TextHeuristic::verdict(1.49).0, RiskLevel::None);
        assert_eq!(TextHeuristic::verdict(1.5).0, RiskLevel::Low);
    }

    #[test]
    fn verdict_confidences() {
        let (_, c) = TextHeuristic::verdict(3.0);
        assert!((c - 0.95).abs() < 1e-6);
        let (_, c) = TextHeuristic::verdict(10.0);
        assert!((c - 0.95).abs() < 1e-6);
        let (_, c) = TextHeuristic::verdict(2.0);
        assert!((c - 0.80).abs() < 1e-6);
        let (_, c) = TextHeuristic::verdict(0.0);
        assert!((c - 0.95).abs() < 1e-6);
        let (_, c) = TextHeuristic::verdict(1.0);
        assert!((c - 0.90).abs() < 1e-6);
    }

    #[test]
    fn exact_three_from_table_is_high() {
        // two phrases that are also urgency words: 1 + 1 + 0.5 + 0.5
        let h = TextHeuristic::new();
        let assessment = h.assess("urgent, act now");
        assert_eq!(assessment.composite_score, 3.0);
        assert_eq!(h.score_text("urgent, act now").risk, RiskLevel::High);
    }

    #[test]
    fn composite_hits_thresholds_exactly() {
        let h = TextHeuristic::new();
        let cases: &[(&str, f64, RiskLevel)] = &[
            ("urgent money cash reward payment refund", 3.0, RiskLevel::High),
            ("money cash reward click call verify", 1.5, RiskLevel::Low),
            ("hurry: confirm, update, download, click, call", 1.5, RiskLevel::Low),
            ("money cash reward click call", 1.3, RiskLevel::None),
            ("winner lottery urgent", 3.5, RiskLevel::High),
        ];

        for &(text, expected, risk) in cases {
            let assessment = h.assess(text);
            assert_eq!(assessment.composite_score, expected, "score for {text:?}");
            assert_eq!(h.score_text(text).risk, risk, "risk for {text:?}");
        }
    }

    #[test]
    fn composite_formula_is_exact_at_boundaries() {
        assert_eq!(composite_score(1, 1, 5, 0), 3.0);
        assert_eq!(composite_score(0, 0, 3, 3), 1.5);
        assert_eq!(composite_score(0, 1, 0, 5), 1.5);
        assert_eq!(composite_score(0, 0, 10, 0), 3.0);
    }

    #[test]
    fn composite_score_is_monotonic() {
        let h = TextHeuristic::new();
        let mut text = String::from("hello there");
        let mut last = h.assess(&text).composite_score;
        for addition in ["lottery", "winner", "wire transfer", "bitcoin", "click"] {
            text.push(' ');
            text.push_str(addition);
            let next = h.assess(&text).composite_score;
            assert!(next >= last);
            last = next;
        }
    }

    #[test]
    fn benign_text_has_no_risk() {
        let result = TextHeuristic::new().score_text("See you at lunch tomorrow?");
        assert_eq!(result.risk, RiskLevel::None);
        assert!(result.confidence >= 0.90);
        assert_eq!(result.detail["patterns"], json!([]));
    }

    #[test]
    fn text_detail_lists_matches() {
        let result = TextHeuristic::new().score_text("Claim now your cash prize via wire transfer");
        assert_eq!(result.risk, RiskLevel::High);
        let patterns = result.detail["patterns"].as_array().unwrap();
        assert!(patterns.contains(&json!("claim now")));
        assert!(patterns.contains(&json!("cash prize")));
        assert_eq!(result.detail["fallback"], json!(true));
    }

    // === URL Tests ===

    #[test]
    fn ip_url_with_deep_path_is_high() {
        let h = UrlHeuristic::new();
        let url = "http://192.168.1.1/some/very/long/path/a/b/c/d";
        assert_eq!(h.assess(url).0, 6);

        let result = h.score_url(url);
        assert_eq!(result.risk, RiskLevel::High);
        assert_eq!(result.confidence, 0.85);
    }

    #[test]
    fn shortener_is_medium() {
        let result = UrlHeuristic::new().score_url("https://bit.ly/3xYz");
        assert_eq!(result.risk, RiskLevel::Medium);
        assert_eq!(result.confidence, 0.75);
    }

    #[test]
    fn shorteners_match_the_host_only() {
        let h = UrlHeuristic::new();
        assert_eq!(h.assess("https://t.co/abc").0, 2);
        assert_eq!(h.assess("https://www.bit.ly/x").0, 2);
        assert_eq!(h.assess("https://comcast.co/x").0, 0);
        assert_eq!(h.assess("https://example.com/bit.ly").0, 0);
        assert_eq!(h.score_url("https://comcast.co/x").risk, RiskLevel::Low);
    }

    #[test]
    fn plain_url_is_low() {
        let result = UrlHeuristic::new().score_url("https://www.rust-lang.org/learn");
        assert_eq!(result.risk, RiskLevel::Low);
        assert_eq!(result.confidence, 0.70);
        assert_eq!(result.detail["reason"], json!("no suspicious patterns"));
    }

    #[test]
    fn html_page_is_not_a_risky_tld() {
        let (score, _) = UrlHeuristic::new().assess("https://example.com/index.html");
        assert_eq!(score, 0);
    }

    #[test]
    fn risky_tld_and_brand_impersonation() {
        let h = UrlHeuristic::new();
        let (score, indicators) = h.assess("http://paypal-secure.example.tk/login");
        assert_eq!(score, 5);
        assert_eq!(indicators.len(), 2);
        assert_eq!(h.score_url("http://paypal-secure.example.tk/login").risk, RiskLevel::High);
    }

    #[test]
    fn traversal_and_percent_count_once() {
        let (score, _) = UrlHeuristic::new().assess("http://example.com/a/../b%2e");
        assert_eq!(score, 2);
    }

    #[test]
    fn url_without_scheme_still_scores() {
        let (score, _) = UrlHeuristic::new().assess("10.0.0.1/admin");
        assert_eq!(score, 4);
    }

    #[test]
    fn split_url_strips_userinfo_and_port() {
        let parts = split_url("https://user:pw@Example.COM:8443/a/b?q=1#frag");
        assert_eq!(parts.host, "example.com");
        assert_eq!(parts.path, "/a/b");

        let parts = split_url("http://[::1]:8080/");
        assert_eq!(parts.host, "::1");
    }

    #[test]
    fn url_scoring_is_deterministic() {
        let h = UrlHeuristic::new();
        let url = "http://free-money.xyz/claim";
        assert_eq!(h.score_url(url), h.score_url(url));
    }

    // === File Tests ===

    #[test]
    fn executable_is_high() {
        let result = FileHeuristic::new().score_file("invoice.exe", 1024);
        assert_eq!(result.risk, RiskLevel::High);
        assert_eq!(result.confidence, 0.85);
        assert_eq!(result.detail["fileType"], json!(".exe"));
    }

    #[test]
    fn archive_is_medium() {
        let result = FileHeuristic::new().score_file("photos.ZIP", 1024);
        assert_eq!(result.risk, RiskLevel::Medium);
        assert_eq!(result.confidence, 0.70);
    }

    #[test]
    fn large_file_is_medium() {
        let result = FileHeuristic::new().score_file("video.mp4", LARGE_FILE_BYTES + 1);
        assert_eq!(result.risk, RiskLevel::Medium);
        assert_eq!(result.confidence, 0.65);

        let result = FileHeuristic::new().score_file("video.mp4", LARGE_FILE_BYTES);
        assert_eq!(result.risk, RiskLevel::Low);
    }

    #[test]
    fn ordinary_file_is_low() {
        let result = FileHeuristic::new().score_file("report.pdf", 2048);
        assert_eq!(result.risk, RiskLevel::Low);
        assert_eq!(result.confidence, 0.80);
    }

    #[test]
    fn file_heuristic_reads_request_metadata() {
        let request = ClassificationRequest::file(
            "setup.bat",
            "application/octet-stream",
            12,
            vec![0xff; 12],
        );
        let result = FileHeuristic::new().score(&request);
        assert_eq!(result.risk, RiskLevel::High);
        assert_eq!(result.detail["size"], json!(12));
    }
}
