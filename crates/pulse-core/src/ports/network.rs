//! Connectivity port.

use async_trait::async_trait;

/// Reports whether the device currently has internet access.
#[async_trait]
pub trait NetworkMonitor: Send + Sync {
    async fn is_available(&self) -> bool;
}
