//! Test fixtures for exercising the stitching pipeline without real
//! backends.

use crate::prelude::graphql::*;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// A canned backend: maps expected query documents to fixed responses.
///
/// Matching is on the printed query document, so a test that registers a
/// response for a specific document also asserts that the transformed query
/// sent to the service looks exactly like that. Unmatched requests fall back
/// to the default response when one is set, and fail the call otherwise so
/// the mismatch is visible in the test output.
#[derive(Debug, Default)]
pub struct MockBackendService {
    responses: HashMap<String, Response>,
    default_response: Option<Response>,
    calls: AtomicUsize,
    received: Mutex<Vec<ServiceExecutionParameters>>,
}

impl MockBackendService {
    pub fn new() -> MockBackendService {
        MockBackendService::default()
    }

    /// Register the response for one exact query document.
    pub fn with_response(mut self, query: impl Into<String>, response: Response) -> Self {
        self.responses.insert(query.into(), response);
        self
    }

    /// Respond to any unmatched request with `response`.
    pub fn with_default_response(mut self, response: Response) -> Self {
        self.default_response = Some(response);
        self
    }

    /// How many times this service was called.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Every query document this service received, in call order.
    pub fn requests(&self) -> Vec<String> {
        self.received()
            .iter()
            .map(|parameters| parameters.query_string())
            .collect()
    }

    /// Every set of execution parameters this service received, in call
    /// order.
    pub fn received(&self) -> Vec<ServiceExecutionParameters> {
        self.received
            .lock()
            .expect("request log mutex poisoned")
            .clone()
    }
}

#[async_trait]
impl ServiceExecution for MockBackendService {
    async fn execute(
        &self,
        parameters: ServiceExecutionParameters,
    ) -> Result<Response, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let query = parameters.query_string();
        self.received
            .lock()
            .expect("request log mutex poisoned")
            .push(parameters);
        if let Some(response) = self.responses.get(&query) {
            return Ok(response.clone());
        }
        if let Some(response) = &self.default_response {
            return Ok(response.clone());
        }
        Err(FetchError::SubrequestHttpError {
            service: "mock".to_string(),
            reason: format!("no canned response for query: {}", query),
        })
    }
}
