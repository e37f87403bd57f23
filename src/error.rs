// ⚠️ Error taxonomy for chart requests
// Every variant names the selection that failed so the UI can show it as-is

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum GrowthError {
    /// Catalog has no dataset for this (indicator, score type, gender, age range)
    #[error("no reference dataset for indicator='{indicator}', type='{score_type}', gender='{gender}', range='{age_range}'")]
    NotFound {
        indicator: String,
        score_type: String,
        gender: String,
        age_range: String,
    },

    /// Byte retrieval failed (network, HTTP status, file IO)
    #[error("failed to fetch reference data '{identifier}': {message}")]
    Fetch { identifier: String, message: String },

    /// Expected column missing after normalization, or undecodable table
    #[error("malformed reference table '{identifier}': {message}")]
    MalformedTable { identifier: String, message: String },

    /// Empty or unusable reference table reached chart assembly
    #[error("no reference data for '{indicator}': {reason}")]
    NoReferenceData { indicator: String, reason: String },
}

impl GrowthError {
    pub fn fetch(identifier: &str, message: impl Into<String>) -> Self {
        GrowthError::Fetch {
            identifier: identifier.to_string(),
            message: message.into(),
        }
    }

    pub fn malformed(identifier: &str, message: impl Into<String>) -> Self {
        GrowthError::MalformedTable {
            identifier: identifier.to_string(),
            message: message.into(),
        }
    }

    /// Short machine-friendly kind, used by the CLI JSON output
    pub fn kind(&self) -> &'static str {
        match self {
            GrowthError::NotFound { .. } => "not_found",
            GrowthError::Fetch { .. } => "fetch",
            GrowthError::MalformedTable { .. } => "malformed_table",
            GrowthError::NoReferenceData { .. } => "no_reference_data",
        }
    }
}

pub type GrowthResult<T> = std::result::Result<T, GrowthError>;
