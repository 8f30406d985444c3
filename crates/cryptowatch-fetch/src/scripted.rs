//! In-memory HTTP backend that replays scripted responses.

use std::cell::RefCell;
use std::collections::VecDeque;

use cryptowatch_types::{ApiError, Result};
use serde_json::{Value, json};

use crate::client::{HttpBackend, RawResponse};

/// A request observed by [`ScriptedBackend`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRequest {
    /// Requested URL, without query string.
    pub url: String,
    /// Query parameters in the order they were given.
    pub params: Vec<(String, String)>,
}

/// HTTP backend that answers requests from a queue of canned responses.
///
/// Responses are returned in push order regardless of the URL requested;
/// every request is recorded for later inspection.
#[derive(Debug, Default)]
pub struct ScriptedBackend {
    responses: RefCell<VecDeque<RawResponse>>,
    requests: RefCell<Vec<RecordedRequest>>,
}

impl ScriptedBackend {
    /// Creates a backend with no scripted responses.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a raw response.
    pub fn push(&self, status: u16, body: impl Into<String>) {
        self.responses
            .borrow_mut()
            .push_back(RawResponse::new(status, body));
    }

    /// Queues a `200` response wrapping `result` in a standard envelope.
    pub fn push_result(&self, result: Value) {
        let body = json!({
            "result": result,
            "allowance": {"cost": 0.001, "remaining": 9.999},
        });
        self.push(200, body.to_string());
    }

    /// Returns the requests observed so far.
    #[must_use]
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.borrow().clone()
    }

    /// Returns the number of responses not yet consumed.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.responses.borrow().len()
    }
}

impl HttpBackend for ScriptedBackend {
    fn send(&self, url: &str, params: &[(&str, String)]) -> Result<RawResponse> {
        self.requests.borrow_mut().push(RecordedRequest {
            url: url.to_string(),
            params: params
                .iter()
                .map(|(key, value)| ((*key).to_string(), value.clone()))
                .collect(),
        });
        self.responses
            .borrow_mut()
            .pop_front()
            .ok_or_else(|| ApiError::Http(format!("no scripted response for {url}")))
    }
}
