//! Scripted AI analyzer for tests and local runs.
//!
//! Responses are consumed in order; once the queue is empty every call
//! returns a canned analysis. Calls are recorded for verification.
//!
//! # Example
//!
//! ```ignore
//! let analyzer = MockAnalyzer::new()
//!     .with_response("Cut dining out by 20%")
//!     .with_error(AiError::RateLimited);
//! ```

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use crate::ports::{AiAnalyzer, AiError, AnalysisRequest, AnalysisResponse};

const MOCK_MODEL: &str = "mock-analyzer-1";

/// Mock AI analyzer.
#[derive(Debug, Clone, Default)]
pub struct MockAnalyzer {
    responses: Arc<Mutex<VecDeque<Result<String, AiError>>>>,
    calls: Arc<Mutex<Vec<AnalysisRequest>>>,
}

impl MockAnalyzer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a successful analysis.
    pub fn with_response(self, content: impl Into<String>) -> Self {
        self.push(Ok(content.into()));
        self
    }

    /// Queues a provider failure.
    pub fn with_error(self, error: AiError) -> Self {
        self.push(Err(error));
        self
    }

    /// Number of calls made so far.
    pub fn call_count(&self) -> usize {
        self.calls.lock().map(|c| c.len()).unwrap_or(0)
    }

    /// Requests received so far.
    pub fn calls(&self) -> Vec<AnalysisRequest> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    fn push(&self, response: Result<String, AiError>) {
        if let Ok(mut queue) = self.responses.lock() {
            queue.push_back(response);
        }
    }

    fn next_response(&self) -> Option<Result<String, AiError>> {
        self.responses.lock().ok().and_then(|mut q| q.pop_front())
    }
}

#[async_trait]
impl AiAnalyzer for MockAnalyzer {
    async fn analyze(&self, request: AnalysisRequest) -> Result<AnalysisResponse, AiError> {
        let kind = request.kind;
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(request);
        }

        let content = match self.next_response() {
            Some(response) => response?,
            None => format!("Mock {:?} analysis", kind),
        };

        Ok(AnalysisResponse {
            content,
            model: MOCK_MODEL.to_string(),
        })
    }
}
