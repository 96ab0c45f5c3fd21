use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Opaque identifier assigned by the remote store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(String);

impl DocumentId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DocumentId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DocumentStatus {
    Pending,
    Signed,
    Rejected,
}

impl DocumentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentStatus::Pending => "Pending",
            DocumentStatus::Signed => "Signed",
            DocumentStatus::Rejected => "Rejected",
        }
    }
}

impl fmt::Display for DocumentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A document as cached from the remote store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    #[serde(rename = "_id", alias = "id")]
    pub id: DocumentId,
    pub filename: String,
    pub filepath: String,
    pub status: DocumentStatus,
}

impl Document {
    /// Location handed to the PDF viewer: `filepath` resolved against the
    /// server base URL with exactly one separating slash.
    pub fn file_url(&self, server_base_url: &str) -> String {
        format!(
            "{}/{}",
            server_base_url.trim_end_matches('/'),
            self.filepath.trim_start_matches('/')
        )
    }
}

/// Status selection applied to the document list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Only(DocumentStatus),
}

impl StatusFilter {
    pub const ALL: [StatusFilter; 4] = [
        StatusFilter::All,
        StatusFilter::Only(DocumentStatus::Pending),
        StatusFilter::Only(DocumentStatus::Signed),
        StatusFilter::Only(DocumentStatus::Rejected),
    ];

    pub fn matches(&self, document: &Document) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Only(status) => document.status == *status,
        }
    }
}

impl fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusFilter::All => f.write_str("All"),
            StatusFilter::Only(status) => status.fmt(f),
        }
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown status filter: {0}")]
pub struct UnknownStatusFilter(pub String);

impl FromStr for StatusFilter {
    type Err = UnknownStatusFilter;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "All" => Ok(StatusFilter::All),
            "Pending" => Ok(StatusFilter::Only(DocumentStatus::Pending)),
            "Signed" => Ok(StatusFilter::Only(DocumentStatus::Signed)),
            "Rejected" => Ok(StatusFilter::Only(DocumentStatus::Rejected)),
            other => Err(UnknownStatusFilter(other.to_string())),
        }
    }
}

impl Serialize for StatusFilter {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for StatusFilter {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Subsequence of `documents` matching `filter`, order preserved.
pub fn filter_documents(documents: &[Document], filter: StatusFilter) -> Vec<Document> {
    documents
        .iter()
        .filter(|doc| filter.matches(doc))
        .cloned()
        .collect()
}
