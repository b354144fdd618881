//! Field extraction over a parsed job-posting page.
//!
//! Pure function of document state: the page handle carries everything the
//! extractor reads (parsed DOM plus the page address), so it can be tested
//! without a live document. Extraction never fails; a field whose whole
//! selector chain misses degrades to the empty string.

use chrono::Utc;
use scraper::{Html, Selector};
use tracing::debug;
use url::Url;

use crate::record::JobRecord;
use crate::selectors::{self, SelectorChain};

/// A rendered job-posting page: parsed DOM plus the address it was fetched
/// from. This is the document-context handle the extractor operates on.
pub struct JobPage {
    url: Url,
    document: Html,
}

impl JobPage {
    /// Parse raw HTML into a page handle.
    pub fn parse(url: Url, html: &str) -> Self {
        Self {
            url,
            document: Html::parse_document(html),
        }
    }

    pub fn url(&self) -> &Url {
        &self.url
    }
}

/// Produce a best-effort record from the page.
///
/// Each field is resolved independently through its selector chain; the
/// description additionally falls back to the main-content containers when
/// its own chain is exhausted. `source_url` and `extracted_at` participate in
/// no fallback logic and are always populated.
pub fn extract(page: &JobPage) -> JobRecord {
    let title = resolve_field(&page.document, selectors::TITLE);
    let company = resolve_field(&page.document, selectors::COMPANY);
    let location = resolve_field(&page.document, selectors::LOCATION);

    let mut description = resolve_field(&page.document, selectors::DESCRIPTION);
    if description.is_empty() {
        description = resolve_field(&page.document, selectors::MAIN_CONTENT);
    }

    JobRecord {
        title,
        company,
        location,
        description,
        source_url: page.url.clone(),
        extracted_at: Utc::now(),
    }
}

/// Walk a chain in declared order; first hypothesis whose first matching
/// element has non-empty trimmed text wins.
fn resolve_field(document: &Html, chain: SelectorChain) -> String {
    for hypothesis in chain.hypotheses {
        let selector = match Selector::parse(hypothesis) {
            Ok(s) => s,
            Err(_) => continue,
        };

        if let Some(element) = document.select(&selector).next() {
            let text = element.text().collect::<String>().trim().to_string();
            if !text.is_empty() {
                debug!(
                    field = chain.field,
                    selector = hypothesis,
                    "selector hypothesis matched"
                );
                return text;
            }
        }
    }

    debug!(field = chain.field, "no selector hypothesis matched");
    String::new()
}
