use serde::{Deserialize, Serialize};

/// Contact details for a candidate property
///
/// Every field is always present; the normalizer maps missing or invalid
/// values to empty strings so downstream consumers never see nulls.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContactInfo {
    pub phone: String,
    pub email: String,
    /// Absolute URL (`https://` is prepended when the scheme is missing)
    pub website: String,
}

/// A candidate rural-tourism listing extracted from a web page
///
/// This is a staging record: it lives in memory for the duration of one
/// extraction call and only becomes a persisted listing if an operator
/// imports it through a separate write path.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtractedProperty {
    pub name: String,
    pub description: String,
    pub location: String,
    /// Kept as the model's original text ("R$ 250/noite", "sob consulta",
    /// ranges). Numeric parsing is the importer's job, not ours.
    pub price: String,
    pub activities: Vec<String>,
    pub amenities: Vec<String>,
    pub hours: String,
    pub contact: ContactInfo,
    /// Absolute URL, same normalization as `contact.website`
    pub image: String,
}

/// Result shape handed to the orchestrator's caller
///
/// `scrape_url` never fails: either `success` with the record list or a
/// human-readable `error` message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScrapeOutcome {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<Vec<ExtractedProperty>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ScrapeOutcome {
    pub fn ok(properties: Vec<ExtractedProperty>) -> Self {
        Self {
            success: true,
            properties: Some(properties),
            error: None,
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            properties: None,
            error: Some(message.into()),
        }
    }
}
