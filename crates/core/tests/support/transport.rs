//! In-memory transport for exercising the CRUD layer without HTTP
//!
//! Responses are scripted per call and every request is recorded, so tests
//! can assert both what was sent and how the hook reacted.

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use hmis_core::{ApiRequest, HttpTransport};
use hmis_domain::{HmisError, Result as DomainResult};
use parking_lot::Mutex;
use serde_json::Value;
use tokio::sync::Notify;

/// Mock `HttpTransport` answering from a queue.
///
/// An exhausted queue answers JSON `null`.
#[derive(Default)]
pub struct MockTransport {
    responses: Mutex<VecDeque<Scripted>>,
    requests: Mutex<Vec<ApiRequest>>,
}

struct Scripted {
    response: DomainResult<Value>,
    gate: Option<Arc<Notify>>,
}

impl MockTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Queue a successful response
    pub fn respond(&self, body: Value) -> &Self {
        self.push(Ok(body), None)
    }

    /// Queue a failure
    pub fn fail(&self, error: HmisError) -> &Self {
        self.push(Err(error), None)
    }

    /// Queue a response that is held back until `gate` is notified
    pub fn respond_after(&self, gate: Arc<Notify>, response: DomainResult<Value>) -> &Self {
        self.push(response, Some(gate))
    }

    fn push(&self, response: DomainResult<Value>, gate: Option<Arc<Notify>>) -> &Self {
        self.responses.lock().push_back(Scripted { response, gate });
        self
    }

    /// Every request received so far
    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().len()
    }
}

#[async_trait]
impl HttpTransport for MockTransport {
    async fn execute(&self, request: ApiRequest) -> DomainResult<Value> {
        self.requests.lock().push(request);
        let next = self.responses.lock().pop_front();
        match next {
            Some(Scripted { response, gate }) => {
                if let Some(gate) = gate {
                    gate.notified().await;
                }
                response
            }
            None => Ok(Value::Null),
        }
    }
}
