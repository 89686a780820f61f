//! Credential and region resolution.
//!
//! OneShot never interprets credentials itself: everything is delegated to
//! the SDK's default provider chain (environment, shared config/credentials
//! files, instance roles). The CLI only narrows the chain with an explicit
//! region or named profile when asked to.

use aws_config::{BehaviorVersion, Region, SdkConfig};

/// Loads the shared SDK configuration.
///
/// `region` and `profile` override the provider chain's own resolution when
/// present; otherwise the chain decides (env vars, profile files, IMDS).
pub async fn load_sdk_config(region: Option<String>, profile: Option<String>) -> SdkConfig {
    let mut loader = aws_config::defaults(BehaviorVersion::latest());
    if let Some(region) = region {
        loader = loader.region(Region::new(region));
    }
    if let Some(profile) = profile {
        loader = loader.profile_name(profile);
    }
    loader.load().await
}

/// Returns the region the chain resolved to, if any.
///
/// Used for building console log links; a configuration without a region
/// simply produces no link.
pub fn resolved_region(config: &SdkConfig) -> Option<String> {
    config.region().map(|r| r.as_ref().to_string())
}
