//! Region and credential resolution through the standard AWS provider chains.

use aws_config::{BehaviorVersion, Region, SdkConfig};

pub use aws_credential_types::Credentials;

/// Loads the shared AWS configuration the same way the AWS CLI does.
///
/// Credentials and region come from the environment, the `~/.aws/config` and
/// `~/.aws/credentials` profiles (honouring `AWS_PROFILE`), SSO and web
/// identity, then container and instance metadata. An explicit `region`
/// overrides the chain.
pub async fn load_sdk_config(region: Option<String>) -> SdkConfig {
    let mut loader = aws_config::defaults(BehaviorVersion::latest());
    if let Some(region) = region.filter(|r| !r.is_empty()) {
        loader = loader.region(Region::new(region));
    }
    loader.load().await
}

pub fn default_endpoint(region: &str) -> String {
    format!("https://email.{region}.amazonaws.com")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn explicit_region_overrides_the_chain() {
        let config = load_sdk_config(Some("ap-south-1".to_string())).await;
        assert_eq!(config.region().map(|r| r.as_ref()), Some("ap-south-1"));
    }

    #[test]
    fn debug_output_hides_secrets() {
        let creds = Credentials::from_keys("AKID", "very-secret", Some("tok".to_string()));
        let printed = format!("{creds:?}");
        assert!(printed.contains("AKID"));
        assert!(!printed.contains("very-secret"));
        assert!(!printed.contains("tok\""));
    }

    #[test]
    fn default_endpoint_is_regional() {
        assert_eq!(
            default_endpoint("us-west-2"),
            "https://email.us-west-2.amazonaws.com"
        );
    }
}
