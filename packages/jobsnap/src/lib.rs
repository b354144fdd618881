//! jobsnap: resilient capture of job-posting data.
//!
//! Three-stage pipeline: acquire the document, extract fields through ordered
//! selector-chain fallbacks, deliver the record over HTTP. The extractor is a
//! pure function of the page; the controller owns the user-facing status
//! state machine; the router lets independent contexts exchange typed
//! request/response messages.

pub mod config;
pub mod controller;
pub mod error;
pub mod extractor;
pub mod fetch;
pub mod invoker;
pub mod record;
pub mod router;
pub mod selectors;
pub mod transport;

// Re-exports for clean API
pub use config::{RunConfig, Settings};
pub use controller::{Controller, RunStatus};
pub use error::{ExtractError, RunError, TransportError};
pub use extractor::{extract, JobPage};
pub use fetch::{HttpPageFetcher, MockPageFetcher, PageFetcher};
pub use invoker::{is_job_posting_url, ExtractionInvoker};
pub use record::JobRecord;
pub use router::{AckStatus, ContextName, MessageRouter, Request, RequestHandler, RequestKind, Response};
pub use transport::{Confirmation, HttpTransport, MockTransport, RecordTransport, DEFAULT_ENDPOINT};
