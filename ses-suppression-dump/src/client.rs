use crate::{
    config::{default_endpoint, load_sdk_config, Credentials},
    error::{ConfigError, FetchPageError},
    models::{ListSuppressedDestinations, SesError, SuppressionPage},
};
use aws_config::SdkConfig;
use aws_credential_types::provider::{ProvideCredentials, SharedCredentialsProvider};
use aws_sigv4::{
    http_request::{sign, SignableBody, SignableRequest, SigningSettings},
    sign::v4,
};
use reqwest::Url;
use std::{
    future::Future,
    sync::{Arc, Mutex},
    time::{Duration, SystemTime},
};

const LIST_SUPPRESSED_DESTINATIONS_PATH: &str = "/v2/email/suppression/addresses";
const SIGNING_SERVICE: &str = "ses";
const ERROR_TYPE_HEADER: &str = "x-amzn-errortype";
// Temporary credentials closer than this to expiry are fetched again.
const CREDENTIALS_REFRESH_MARGIN: Duration = Duration::from_secs(5 * 60);

/// The remote listing operation the reader pages through.
pub trait SuppressionApi {
    fn list_suppressed_destinations(
        &self,
        request: &ListSuppressedDestinations,
    ) -> impl Future<Output = Result<SuppressionPage, FetchPageError>>;
}

impl<T: SuppressionApi + ?Sized> SuppressionApi for &T {
    fn list_suppressed_destinations(
        &self,
        request: &ListSuppressedDestinations,
    ) -> impl Future<Output = Result<SuppressionPage, FetchPageError>> {
        (**self).list_suppressed_destinations(request)
    }
}

/// A minimal SES v2 client, limited to `ListSuppressedDestinations`.
#[derive(Clone, Debug)]
pub struct Client {
    endpoint: Url,
    region: String,
    credentials: SharedCredentialsProvider,
    cached: Arc<Mutex<Option<Credentials>>>,
    http: reqwest::Client,
}

impl Client {
    /// Creates a client talking to `endpoint` and signing for `region`.
    ///
    /// ## Example
    ///
    /// ```no_run
    /// use ses_suppression_dump::{config::Credentials, Client};
    ///
    /// let client = Client::new(
    ///     "https://email.eu-west-1.amazonaws.com",
    ///     "eu-west-1",
    ///     Credentials::from_keys("AKID", "secret", None),
    /// )
    /// .unwrap();
    /// ```
    pub fn new<S, P>(endpoint: &str, region: S, credentials: P) -> Result<Self, ConfigError>
    where
        S: Into<String>,
        P: ProvideCredentials + 'static,
    {
        Self::with_provider(
            endpoint,
            region.into(),
            SharedCredentialsProvider::new(credentials),
        )
    }

    /// Takes region, credentials and endpoint override from a loaded AWS configuration.
    ///
    /// Without an explicit endpoint, the configured `endpoint_url` is used,
    /// then the regional SES endpoint.
    pub fn from_sdk_config(
        config: &SdkConfig,
        endpoint: Option<String>,
    ) -> Result<Self, ConfigError> {
        let region = config
            .region()
            .ok_or(ConfigError::MissingRegion)?
            .as_ref()
            .to_string();
        let credentials = config
            .credentials_provider()
            .ok_or(ConfigError::MissingCredentials)?;
        let endpoint = endpoint
            .or_else(|| config.endpoint_url().map(str::to_string))
            .unwrap_or_else(|| default_endpoint(&region));
        Self::with_provider(&endpoint, region, credentials)
    }

    /// Resolves region and credentials through the default AWS provider chain.
    pub async fn from_env(
        region: Option<String>,
        endpoint: Option<String>,
    ) -> Result<Self, ConfigError> {
        Self::from_sdk_config(&load_sdk_config(region).await, endpoint)
    }

    fn with_provider(
        endpoint: &str,
        region: String,
        credentials: SharedCredentialsProvider,
    ) -> Result<Self, ConfigError> {
        let endpoint = Url::parse(endpoint)
            .ok()
            .filter(|url| matches!(url.scheme(), "http" | "https") && url.has_host())
            .ok_or_else(|| ConfigError::InvalidEndpoint(endpoint.to_string()))?;
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(ConfigError::HttpClient)?;

        Ok(Self {
            endpoint,
            region,
            credentials,
            cached: Arc::default(),
            http,
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    pub fn region(&self) -> &str {
        &self.region
    }

    fn request_url(&self, request: &ListSuppressedDestinations) -> Url {
        let mut params: Vec<(&str, String)> = request
            .reasons
            .iter()
            .map(|reason| ("Reason", reason.as_str().to_string()))
            .collect();
        if let Some(token) = &request.next_token {
            params.push(("NextToken", token.clone()));
        }
        if let Some(page_size) = request.page_size {
            params.push(("PageSize", page_size.to_string()));
        }

        let mut url = self.endpoint.clone();
        url.set_path(LIST_SUPPRESSED_DESTINATIONS_PATH);
        url.set_query(None);
        if !params.is_empty() {
            url.query_pairs_mut().extend_pairs(params);
        }
        url
    }

    async fn credentials(&self) -> Result<Credentials, FetchPageError> {
        let cached = self.cached.lock().ok().and_then(|cached| cached.clone());
        if let Some(credentials) = cached.filter(still_fresh) {
            return Ok(credentials);
        }

        let credentials = self.credentials.provide_credentials().await?;
        tracing::debug!(
            expires = credentials.expiry().is_some(),
            "Loaded AWS credentials"
        );
        if let Ok(mut cached) = self.cached.lock() {
            *cached = Some(credentials.clone());
        }
        Ok(credentials)
    }

    /// Returns the SigV4 headers (`authorization`, `x-amz-date` and the
    /// optional `x-amz-security-token`) for a bodiless GET of `url`.
    fn signed_headers(
        &self,
        url: &Url,
        credentials: Credentials,
        time: SystemTime,
    ) -> Result<Vec<(String, String)>, FetchPageError> {
        let identity = credentials.into();
        let params = v4::SigningParams::builder()
            .identity(&identity)
            .region(&self.region)
            .name(SIGNING_SERVICE)
            .time(time)
            .settings(SigningSettings::default())
            .build()
            .map_err(|e| FetchPageError::Signing(e.into()))?
            .into();
        let request = SignableRequest::new(
            "GET",
            url.as_str(),
            std::iter::empty(),
            SignableBody::Bytes(&[]),
        )
        .map_err(|e| FetchPageError::Signing(e.into()))?;
        let (instructions, _signature) = sign(request, &params)
            .map_err(|e| FetchPageError::Signing(e.into()))?
            .into_parts();

        Ok(instructions
            .headers()
            .map(|(name, value)| (name.to_string(), value.to_string()))
            .collect())
    }
}

fn still_fresh(credentials: &Credentials) -> bool {
    credentials
        .expiry()
        .map_or(true, |expiry| expiry > SystemTime::now() + CREDENTIALS_REFRESH_MARGIN)
}

impl SuppressionApi for Client {
    async fn list_suppressed_destinations(
        &self,
        request: &ListSuppressedDestinations,
    ) -> Result<SuppressionPage, FetchPageError> {
        let url = self.request_url(request);
        let headers = self.signed_headers(&url, self.credentials().await?, SystemTime::now())?;

        tracing::debug!(
            url = %url,
            has_next_token = request.next_token.is_some(),
            "Requesting suppressed destinations"
        );

        let mut req = self.http.get(url);
        for (name, value) in headers {
            req = req.header(name, value);
        }
        let resp = req.send().await?;

        let status = resp.status();
        if !status.is_success() {
            let error_type = resp
                .headers()
                .get(ERROR_TYPE_HEADER)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string);
            let body = resp.bytes().await?;
            return Err(FetchPageError::Ses(ses_error(
                status.as_u16(),
                error_type.as_deref(),
                &body,
            )));
        }

        let body = resp.bytes().await?;
        let page: SuppressionPage = serde_json::from_slice(&body)?;
        tracing::debug!(
            entries = page.entries.len(),
            has_next_token = page.next_token.is_some(),
            "Received suppressed destinations page"
        );
        Ok(page)
    }
}

fn ses_error(status: u16, error_type: Option<&str>, body: &[u8]) -> SesError {
    let mut error = serde_json::from_slice::<SesError>(body).unwrap_or_else(|_| SesError {
        message: Some(String::from_utf8_lossy(body).trim().to_string()).filter(|m| !m.is_empty()),
        ..Default::default()
    });

    // "UnrecognizedClientException:http://internal.amazon.com/..." in the header,
    // "com.amazonaws.ses#NotFoundException" in the body.
    let from_header = error_type
        .and_then(|t| t.split(':').next())
        .filter(|t| !t.is_empty());
    let from_body = error
        .type_hint
        .as_deref()
        .and_then(|t| t.rsplit('#').next())
        .filter(|t| !t.is_empty());
    error.code = from_header.or(from_body).unwrap_or("Unknown").to_string();
    error.status = status;
    error
}
