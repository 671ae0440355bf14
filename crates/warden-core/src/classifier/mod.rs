//! Risk classification for text, URLs, and files.
//!
//! Each artifact kind has a [`FallbackChain`] of external providers ending in
//! a local heuristic. [`Classifier`] owns one chain per kind and is the entry
//! point callers use.

mod chain;
mod facade;
mod heuristic;
pub mod patterns;
mod provider;
mod risk;

pub use chain::{AttemptOutcome, ChainTrace, FallbackChain, ProviderAttempt};
pub use facade::Classifier;
pub use heuristic::{
    split_url, FileHeuristic, Heuristic, TextAssessment, TextHeuristic, UrlHeuristic, UrlParts,
    LARGE_FILE_BYTES, TEXT_HIGH_THRESHOLD, TEXT_LOW_THRESHOLD, URL_HIGH_THRESHOLD,
    URL_MEDIUM_THRESHOLD,
};
pub use provider::ClassificationProvider;
pub use risk::{
    clamp_confidence, ArtifactKind, ClassificationRequest, ClassificationResult, ResultSource,
    RiskLevel,
};
