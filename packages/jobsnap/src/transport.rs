//! Delivery of a captured record to the downstream service.
//!
//! One POST per record, no retry. The remote side's success body is treated
//! as an opaque confirmation payload: it only has to be valid JSON.

use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, info, warn};
use url::Url;

use crate::error::TransportError;
use crate::record::JobRecord;

/// Sub-path on the endpoint that accepts records.
const PROCESS_PATH: &str = "process-job";

/// Default endpoint base URL.
pub const DEFAULT_ENDPOINT: &str = "http://localhost:5000";

/// Opaque success payload returned by the remote service.
#[derive(Debug, Clone, PartialEq)]
pub struct Confirmation(serde_json::Value);

impl Confirmation {
    pub fn into_inner(self) -> serde_json::Value {
        self.0
    }

    pub fn as_json(&self) -> &serde_json::Value {
        &self.0
    }
}

/// Sends a record downstream. Seam for swapping the HTTP client out in tests.
#[async_trait]
pub trait RecordTransport: Send + Sync {
    async fn send(&self, record: &JobRecord) -> Result<Confirmation, TransportError>;
}

/// HTTP transport posting records to `{endpoint}/process-job` as JSON.
pub struct HttpTransport {
    client: reqwest::Client,
    target: Url,
}

impl HttpTransport {
    pub fn new(endpoint: &Url, timeout: Duration) -> Result<Self, TransportError> {
        let target = process_url(endpoint)?;
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| TransportError::Network(Box::new(e)))?;

        Ok(Self { client, target })
    }

    pub fn target(&self) -> &Url {
        &self.target
    }
}

/// Append the fixed sub-path to the endpoint base.
///
/// Plain string concatenation rather than `Url::join`: joining would replace
/// the last path segment of a base like `http://host/api`.
fn process_url(endpoint: &Url) -> Result<Url, TransportError> {
    let base = endpoint.as_str().trim_end_matches('/');
    format!("{base}/{PROCESS_PATH}")
        .parse()
        .map_err(|e: url::ParseError| TransportError::Network(Box::new(e)))
}

#[async_trait]
impl RecordTransport for HttpTransport {
    async fn send(&self, record: &JobRecord) -> Result<Confirmation, TransportError> {
        debug!(target = %self.target, source = %record.source_url, "sending record");

        let response = self
            .client
            .post(self.target.clone())
            .json(record)
            .send()
            .await
            .map_err(|e| {
                warn!(target = %self.target, error = %e, "record delivery failed");
                TransportError::Network(Box::new(e))
            })?;

        let status = response.status();
        if !status.is_success() {
            warn!(target = %self.target, status = %status, "server rejected record");
            return Err(TransportError::Server {
                status: status.as_u16(),
            });
        }

        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| TransportError::Network(Box::new(e)))?;

        info!(target = %self.target, status = %status, "record delivered");
        Ok(Confirmation(body))
    }
}

/// Scripted transport for tests.
#[derive(Clone)]
pub struct MockTransport {
    outcome: MockOutcome,
    sent: std::sync::Arc<std::sync::RwLock<Vec<JobRecord>>>,
}

#[derive(Clone)]
enum MockOutcome {
    Ok(serde_json::Value),
    ServerStatus(u16),
    NetworkDown,
}

impl MockTransport {
    pub fn succeeding() -> Self {
        Self::with_outcome(MockOutcome::Ok(serde_json::json!({ "status": "ok" })))
    }

    pub fn server_error(status: u16) -> Self {
        Self::with_outcome(MockOutcome::ServerStatus(status))
    }

    pub fn network_down() -> Self {
        Self::with_outcome(MockOutcome::NetworkDown)
    }

    fn with_outcome(outcome: MockOutcome) -> Self {
        Self {
            outcome,
            sent: Default::default(),
        }
    }

    /// Records handed to `send` so far.
    pub fn sent(&self) -> Vec<JobRecord> {
        self.sent.read().unwrap().clone()
    }
}

#[async_trait]
impl RecordTransport for MockTransport {
    async fn send(&self, record: &JobRecord) -> Result<Confirmation, TransportError> {
        self.sent.write().unwrap().push(record.clone());
        match &self.outcome {
            MockOutcome::Ok(body) => Ok(Confirmation(body.clone())),
            MockOutcome::ServerStatus(status) => Err(TransportError::Server { status: *status }),
            MockOutcome::NetworkDown => {
                Err(TransportError::Network("connection refused".into()))
            }
        }
    }
}
