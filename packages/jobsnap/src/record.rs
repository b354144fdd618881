use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use url::Url;

/// A captured job posting.
///
/// The shape is fixed: the four textual fields degrade to the empty string
/// when the page markup yields nothing, never to `None`. Downstream consumers
/// rely on all fields being present in the wire form.
///
/// Wire form is a flat JSON object with exactly these names:
/// `title, company, location, description, url, extractedAt`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobRecord {
    pub title: String,
    pub company: String,
    pub location: String,
    pub description: String,
    /// Address of the page the record was extracted from.
    #[serde(rename = "url")]
    pub source_url: Url,
    /// Wall-clock time of extraction.
    #[serde(rename = "extractedAt")]
    pub extracted_at: DateTime<Utc>,
}

impl JobRecord {
    /// True when every selector chain came up empty.
    ///
    /// `source_url` and `extracted_at` are always populated, so this is the
    /// only notion of "empty" a record has.
    pub fn is_unresolved(&self) -> bool {
        self.title.is_empty()
            && self.company.is_empty()
            && self.location.is_empty()
            && self.description.is_empty()
    }
}
