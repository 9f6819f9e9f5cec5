use std::time::Duration;

use aws_config::{timeout::TimeoutConfig, BehaviorVersion, Region, SdkConfig};
use tracing::debug;

/// Loads the shared SDK configuration from the default provider chain,
/// optionally pinned to a named profile and/or region.
pub async fn load_sdk_config(profile: Option<&str>, region: Option<&str>) -> SdkConfig {
    // Raise the default connect timeout, which can trigger on slow
    // connections. There is no retry on top of the SDK's own.
    let timeout_config = TimeoutConfig::builder()
        .connect_timeout(Duration::from_secs(30))
        .operation_attempt_timeout(Duration::from_secs(300))
        .build();

    let mut loader = aws_config::defaults(BehaviorVersion::latest()).timeout_config(timeout_config);
    if let Some(profile) = profile {
        loader = loader.profile_name(profile);
    }
    if let Some(region) = region {
        loader = loader.region(Region::new(region.to_string()));
    }
    let config = loader.load().await;
    debug!(
        profile = profile.unwrap_or("<default>"),
        region = config.region().map(|r| r.as_ref()).unwrap_or("<unset>"),
        "loaded AWS configuration"
    );
    config
}
