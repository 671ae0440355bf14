//! Warden Core - Risk classification for text, URLs, and files.
//!
//! Every artifact goes through a tiered fallback chain: external providers are
//! tried in priority order and a local heuristic answers when they all fail.
//!
//! ## Example
//!
//! ```no_run
//! use warden_core::{Classifier, WardenConfig};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let classifier = Classifier::from_config(&WardenConfig::from_env()?)?;
//! let result = classifier.classify_url("http://192.168.1.1/login").await?;
//! println!("{} ({:.2})", result.risk, result.confidence);
//! # Ok(())
//! # }
//! ```

pub mod classifier;
pub mod config;
pub mod error;
pub mod providers;

pub use classifier::{
    ArtifactKind, ClassificationRequest, ClassificationResult, Classifier, FallbackChain,
    ResultSource, RiskLevel,
};
pub use config::{ConfigError, ProviderEndpoint, WardenConfig};
pub use error::{ClassifyError, ProviderError, ProviderErrorKind};
