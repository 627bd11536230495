use crate::models::SesError;
use aws_credential_types::provider::error::CredentialsError;
use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("{0}")]
    Config(#[from] ConfigError),
    #[error("{0}")]
    FetchPage(#[from] FetchPageError),
    #[error("Failed to write output: {0}")]
    Output(#[from] std::io::Error),
}

#[derive(Debug, thiserror::Error)]
pub enum FetchPageError {
    #[error("Request error: {0}")]
    Request(#[from] reqwest::Error),
    #[error("SES error: {0}")]
    Ses(SesError),
    #[error("Malformed response: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("Cannot load AWS credentials: {0}")]
    Credentials(#[from] CredentialsError),
    #[error("Cannot sign request: {0}")]
    Signing(#[source] Box<dyn std::error::Error + Send + Sync>),
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("No AWS credentials provider configured")]
    MissingCredentials,
    #[error("No region configured (pass --region, set AWS_REGION or set one in the AWS profile)")]
    MissingRegion,
    #[error("Invalid endpoint URL `{0}`")]
    InvalidEndpoint(String),
    #[error("Calls per period must be at least 1")]
    ZeroCallsPerPeriod,
    #[error("Rate limit period {0:?} is too long (at most one year)")]
    PeriodTooLong(Duration),
    #[error("Cannot build HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),
}
