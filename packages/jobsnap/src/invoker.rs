//! Bridges the control surface and the document context.
//!
//! The invoker causes field extraction to run against a specific target
//! document and marshals the record back, turning every way that can go
//! wrong into the extraction-stage error taxonomy.

use tracing::{debug, info};
use url::Url;

use crate::error::ExtractError;
use crate::extractor::{self, JobPage};
use crate::fetch::PageFetcher;
use crate::record::JobRecord;

/// Path prefix denoting a job-posting page on the target site.
const JOB_PATH_PREFIX: &str = "/jobs";

/// True when the address denotes a job-posting page.
pub fn is_job_posting_url(url: &Url) -> bool {
    let host = url.host_str().unwrap_or("");
    let on_site = host == "linkedin.com" || host.ends_with(".linkedin.com");
    on_site && url.path().starts_with(JOB_PATH_PREFIX)
}

/// Runs the field extractor inside a target document's context.
pub struct ExtractionInvoker<F> {
    fetcher: F,
}

impl<F: PageFetcher> ExtractionInvoker<F> {
    pub fn new(fetcher: F) -> Self {
        Self { fetcher }
    }

    /// Extract a record from the document at `url`.
    ///
    /// Preconditions and faults:
    /// - address not a job posting → `NotEligible`, nothing is fetched
    /// - document unreachable → `ContextUnavailable`
    /// - document reachable but empty → `NoResult`
    pub async fn invoke(&self, url: &Url) -> Result<JobRecord, ExtractError> {
        if !is_job_posting_url(url) {
            return Err(ExtractError::NotEligible {
                url: url.to_string(),
            });
        }

        let html = self.fetcher.fetch(url).await?;
        if html.trim().is_empty() {
            debug!(url = %url, "document context yielded no content");
            return Err(ExtractError::NoResult);
        }

        let page = JobPage::parse(url.clone(), &html);
        let record = extractor::extract(&page);

        info!(
            url = %url,
            title = %record.title,
            company = %record.company,
            unresolved = record.is_unresolved(),
            "extraction completed"
        );
        Ok(record)
    }
}
