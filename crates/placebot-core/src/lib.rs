pub mod config;
pub mod retry;

pub use config::{AdminConfig, Config, OriginConfig, ProviderConfig, StorageConfig};
pub use retry::{with_retry, RetryConfig};

use anyhow::Result;

/// Initialize the core application
pub fn init() -> Result<()> {
    // Initialize tracing/logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    tracing::info!("Placebot core initialized");
    Ok(())
}
