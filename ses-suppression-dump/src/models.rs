use serde::{Deserialize, Serialize};
use std::{fmt::Display, str::FromStr};

/// Why an address ended up on the suppression list.
#[derive(Deserialize, Serialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SuppressionReason {
    Bounce,
    Complaint,
}

impl SuppressionReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Bounce => "BOUNCE",
            Self::Complaint => "COMPLAINT",
        }
    }
}

impl Display for SuppressionReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.as_str().to_ascii_lowercase())
    }
}

impl FromStr for SuppressionReason {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "BOUNCE" => Ok(Self::Bounce),
            "COMPLAINT" => Ok(Self::Complaint),
            other => Err(format!(
                "unknown suppression reason `{other}` (expected bounce or complaint)"
            )),
        }
    }
}

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct SuppressedDestinationSummary {
    pub email_address: String,
    #[serde(default)]
    pub reason: Option<SuppressionReason>,
    /// Seconds since the Unix epoch, possibly fractional.
    #[serde(default)]
    pub last_update_time: Option<f64>,
}

/// One page of `ListSuppressedDestinations` output.
#[derive(Deserialize, Serialize, Clone, Debug, Default, PartialEq)]
pub struct SuppressionPage {
    #[serde(rename = "SuppressedDestinationSummaries", default)]
    pub entries: Vec<SuppressedDestinationSummary>,
    #[serde(rename = "NextToken", default)]
    pub next_token: Option<String>,
}

/// Parameters of a single `ListSuppressedDestinations` call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ListSuppressedDestinations {
    pub reasons: Vec<SuppressionReason>,
    pub next_token: Option<String>,
    pub page_size: Option<u32>,
}

impl Default for ListSuppressedDestinations {
    fn default() -> Self {
        Self {
            reasons: vec![SuppressionReason::Bounce, SuppressionReason::Complaint],
            next_token: None,
            page_size: None,
        }
    }
}

/// Error payload returned by SES for non-2xx responses.
///
/// `code` and `status` are filled from the response head, not the body.
#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
pub struct SesError {
    #[serde(skip)]
    pub code: String,
    #[serde(skip)]
    pub status: u16,
    #[serde(default, alias = "Message")]
    pub message: Option<String>,
    #[serde(default, rename = "__type")]
    pub type_hint: Option<String>,
}

impl SesError {
    pub fn is_throttling(&self) -> bool {
        matches!(
            self.code.as_str(),
            "TooManyRequestsException" | "ThrottlingException"
        )
    }
}

impl Display for SesError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(
            format!(
                "{} ({}): {}",
                self.code,
                self.status,
                self.message.clone().unwrap_or_default()
            )
            .as_str(),
        )
    }
}
