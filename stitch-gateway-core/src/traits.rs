use crate::prelude::graphql::*;
use async_trait::async_trait;

/// The async execution entry point of one backend service.
///
/// The goal of this trait is to hide the transport used to reach a service:
/// implementations may speak HTTP, run in process, or replay canned fixtures
/// in tests. The returned future is the "pending result" of the call; a
/// transport level failure is an `Err`, while field level errors travel
/// inside the [`Response`].
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ServiceExecution: Send + Sync {
    /// Execute one transformed query against this service.
    #[must_use = "futures do nothing unless polled"]
    async fn execute(
        &self,
        parameters: ServiceExecutionParameters,
    ) -> Result<Response, FetchError>;
}
