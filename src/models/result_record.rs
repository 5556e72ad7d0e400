use super::facility::FacilityRecord;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Outcome tag carried by every result row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResultStatus {
    /// The resolver answered; the new address fields may still be empty
    Success,
    /// The resolver failed; `error_message` explains why
    Error,
}

impl ResultStatus {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }
}

impl fmt::Display for ResultStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success => write!(f, "success"),
            Self::Error => write!(f, "error"),
        }
    }
}

impl std::str::FromStr for ResultStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "success" => Ok(Self::Success),
            "error" => Ok(Self::Error),
            _ => Err(format!("Invalid result status: {s}")),
        }
    }
}

/// Current address as reported by a resolver. Empty strings mean "nothing new
/// found" and are not a failure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedAddress {
    pub postal_code: String,
    pub city: String,
    pub street_address: String,
}

impl ResolvedAddress {
    pub fn new(
        postal_code: impl Into<String>,
        city: impl Into<String>,
        street_address: impl Into<String>,
    ) -> Self {
        Self {
            postal_code: postal_code.into(),
            city: city.into(),
            street_address: street_address.into(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.postal_code.is_empty() && self.city.is_empty() && self.street_address.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ResolutionDetail {
    Resolved(ResolvedAddress),
    Failed { error_message: String },
}

/// One row of pipeline output, keyed by the facility id
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultRecord {
    pub id: String,
    pub facility_name: String,
    pub old_postal_code: String,
    pub old_city: String,
    pub old_address: String,
    pub detail: ResolutionDetail,
}

impl ResultRecord {
    pub fn resolved(record: &FacilityRecord, address: ResolvedAddress) -> Self {
        Self::with_detail(record, ResolutionDetail::Resolved(address))
    }

    pub fn failed(record: &FacilityRecord, error_message: impl Into<String>) -> Self {
        Self::with_detail(
            record,
            ResolutionDetail::Failed {
                error_message: error_message.into(),
            },
        )
    }

    fn with_detail(record: &FacilityRecord, detail: ResolutionDetail) -> Self {
        Self {
            id: record.id.clone(),
            facility_name: record.facility_name.clone(),
            old_postal_code: record.postal_code.clone(),
            old_city: record.city.clone(),
            old_address: record.street_address.clone(),
            detail,
        }
    }

    pub fn status(&self) -> ResultStatus {
        match self.detail {
            ResolutionDetail::Resolved(_) => ResultStatus::Success,
            ResolutionDetail::Failed { .. } => ResultStatus::Error,
        }
    }

    pub fn new_address(&self) -> Option<&ResolvedAddress> {
        match &self.detail {
            ResolutionDetail::Resolved(address) => Some(address),
            ResolutionDetail::Failed { .. } => None,
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match &self.detail {
            ResolutionDetail::Resolved(_) => None,
            ResolutionDetail::Failed { error_message } => Some(error_message),
        }
    }
}
