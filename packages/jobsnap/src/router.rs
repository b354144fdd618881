//! Process-wide relay between independent execution contexts.
//!
//! Three contexts exist in a running session: a long-lived background
//! context, a per-document context, and the transient control surface. Any of
//! them may register a handler for inbound typed requests and send a typed
//! request to another named context, optionally awaiting the response.
//!
//! Semantics are deliberately modest: at most one handler per context per
//! request kind, best-effort in-process delivery, no ordering guarantee
//! across distinct senders, nothing survives a restart. An unhandled request
//! kind is a no-op, not an error.

use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;
use tracing::debug;

use crate::record::JobRecord;

/// Named execution contexts a message can be addressed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContextName {
    Background,
    Document,
    Popup,
}

/// The recognized request types. Anything else simply has no variant here,
/// which is how unknown types get rejected by construction.
#[derive(Debug, Clone)]
pub enum Request {
    /// Ask the active document context for a fresh extraction.
    ExtractActiveDocument,
    /// Hand an already-extracted record to the background context.
    ProcessRecord(JobRecord),
}

impl Request {
    pub fn kind(&self) -> RequestKind {
        match self {
            Request::ExtractActiveDocument => RequestKind::ExtractActiveDocument,
            Request::ProcessRecord(_) => RequestKind::ProcessRecord,
        }
    }
}

/// Discriminant used for handler registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequestKind {
    ExtractActiveDocument,
    ProcessRecord,
}

/// Typed responses.
#[derive(Debug, Clone, PartialEq)]
pub enum Response {
    Record(JobRecord),
    Ack(AckStatus),
}

/// Acknowledgement token for a processed record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AckStatus {
    Processing,
}

/// A context's handler for one request kind.
#[async_trait]
pub trait RequestHandler: Send + Sync {
    async fn handle(&self, request: Request) -> Response;
}

/// Passive message relay. Cheap to clone; clones share the registry.
#[derive(Clone, Default)]
pub struct MessageRouter {
    handlers: Arc<DashMap<(ContextName, RequestKind), Arc<dyn RequestHandler>>>,
}

impl MessageRouter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler` for `kind` messages addressed to `context`,
    /// replacing any previous handler for that pair.
    pub fn register(
        &self,
        context: ContextName,
        kind: RequestKind,
        handler: Arc<dyn RequestHandler>,
    ) {
        debug!(?context, ?kind, "handler registered");
        self.handlers.insert((context, kind), handler);
    }

    /// Remove a context's handler for `kind`, if any.
    pub fn unregister(&self, context: ContextName, kind: RequestKind) {
        self.handlers.remove(&(context, kind));
    }

    /// Send `request` to `to` and await the response.
    ///
    /// Returns `None` when the target context has no handler for the request
    /// kind; the message is dropped silently.
    pub async fn send(&self, to: ContextName, request: Request) -> Option<Response> {
        let handler = self
            .handlers
            .get(&(to, request.kind()))
            .map(|entry| entry.value().clone());

        match handler {
            Some(handler) => Some(handler.handle(request).await),
            None => {
                debug!(?to, kind = ?request.kind(), "no handler, message dropped");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use url::Url;

    fn record(title: &str) -> JobRecord {
        JobRecord {
            title: title.to_string(),
            company: String::new(),
            location: String::new(),
            description: String::new(),
            source_url: Url::parse("https://www.linkedin.com/jobs/view/1").unwrap(),
            extracted_at: Utc::now(),
        }
    }

    struct CannedExtractor(JobRecord);

    #[async_trait]
    impl RequestHandler for CannedExtractor {
        async fn handle(&self, _request: Request) -> Response {
            Response::Record(self.0.clone())
        }
    }

    struct Acknowledger;

    #[async_trait]
    impl RequestHandler for Acknowledger {
        async fn handle(&self, request: Request) -> Response {
            match request {
                Request::ProcessRecord(_) => Response::Ack(AckStatus::Processing),
                other => panic!("unexpected request: {other:?}"),
            }
        }
    }

    #[tokio::test]
    async fn test_request_response_round_trip() {
        let router = MessageRouter::new();
        router.register(
            ContextName::Document,
            RequestKind::ExtractActiveDocument,
            Arc::new(CannedExtractor(record("Backend Engineer"))),
        );

        let response = router
            .send(ContextName::Document, Request::ExtractActiveDocument)
            .await;

        match response {
            Some(Response::Record(r)) => assert_eq!(r.title, "Backend Engineer"),
            other => panic!("unexpected response: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_process_record_acknowledged() {
        let router = MessageRouter::new();
        router.register(
            ContextName::Background,
            RequestKind::ProcessRecord,
            Arc::new(Acknowledger),
        );

        let response = router
            .send(
                ContextName::Background,
                Request::ProcessRecord(record("SRE")),
            )
            .await;

        assert_eq!(response, Some(Response::Ack(AckStatus::Processing)));
    }

    #[tokio::test]
    async fn test_unhandled_kind_is_noop() {
        let router = MessageRouter::new();
        router.register(
            ContextName::Background,
            RequestKind::ProcessRecord,
            Arc::new(Acknowledger),
        );

        // Background never registered an extraction handler.
        let response = router
            .send(ContextName::Background, Request::ExtractActiveDocument)
            .await;
        assert!(response.is_none());

        // Wrong target context is equally a no-op.
        let response = router
            .send(ContextName::Popup, Request::ProcessRecord(record("x")))
            .await;
        assert!(response.is_none());
    }

    #[tokio::test]
    async fn test_registration_replaces_previous_handler() {
        let router = MessageRouter::new();
        router.register(
            ContextName::Document,
            RequestKind::ExtractActiveDocument,
            Arc::new(CannedExtractor(record("old"))),
        );
        router.register(
            ContextName::Document,
            RequestKind::ExtractActiveDocument,
            Arc::new(CannedExtractor(record("new"))),
        );

        let response = router
            .send(ContextName::Document, Request::ExtractActiveDocument)
            .await;
        match response {
            Some(Response::Record(r)) => assert_eq!(r.title, "new"),
            other => panic!("unexpected response: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_unregister() {
        let router = MessageRouter::new();
        router.register(
            ContextName::Document,
            RequestKind::ExtractActiveDocument,
            Arc::new(CannedExtractor(record("x"))),
        );
        router.unregister(ContextName::Document, RequestKind::ExtractActiveDocument);

        let response = router
            .send(ContextName::Document, Request::ExtractActiveDocument)
            .await;
        assert!(response.is_none());
    }
}
