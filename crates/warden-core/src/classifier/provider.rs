//! The provider seam of the pipeline.

use async_trait::async_trait;

use super::risk::{ClassificationRequest, ClassificationResult};
use crate::error::ProviderError;

/// An external classification service for one or more artifact kinds.
///
/// Implementations wrap exactly one remote call, hold only static
/// configuration, and never fall back to local scoring themselves. Falling
/// back is the chain's job.
#[async_trait]
pub trait ClassificationProvider: Send + Sync {
    /// Returns the name of this provider for logging and result attribution.
    fn name(&self) -> &'static str;

    /// Returns true if this provider can classify the request.
    ///
    /// Requests that are not accepted are skipped by the chain without
    /// counting as a failure.
    fn accepts(&self, request: &ClassificationRequest) -> bool;

    /// Classifies the request.
    async fn classify(
        &self,
        request: &ClassificationRequest,
    ) -> Result<ClassificationResult, ProviderError>;
}
