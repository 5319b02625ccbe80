//! Connectivity check by probing a URL with `HEAD`.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use pulse_core::ports::NetworkMonitor;

#[derive(Debug, Clone)]
pub struct HttpProbeConfig {
    pub url: String,
    pub timeout: Duration,
}

impl HttpProbeConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            timeout: Duration::from_millis(2000),
        }
    }
}

/// Reports the network as available when the probe URL answers at all.
///
/// Any HTTP status counts as reachable; only transport failures and timeouts
/// mean offline.
pub struct HttpProbeMonitor {
    client: Client,
    url: String,
}

impl HttpProbeMonitor {
    pub fn new(config: HttpProbeConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            client,
            url: config.url,
        })
    }
}

#[async_trait]
impl NetworkMonitor for HttpProbeMonitor {
    async fn is_available(&self) -> bool {
        match self.client.head(&self.url).send().await {
            Ok(_) => true,
            Err(e) => {
                tracing::debug!(url = %self.url, error = %e, "Connectivity probe failed");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unreachable_probe_reports_offline() {
        let monitor = HttpProbeMonitor::new(HttpProbeConfig {
            url: "http://127.0.0.1:9/".to_string(),
            timeout: Duration::from_millis(500),
        })
        .unwrap();

        assert!(!monitor.is_available().await);
    }
}
