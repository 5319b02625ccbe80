use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;

use pulse_core::ports::NetworkMonitor;

/// Network monitor reporting a settable flag.
///
/// Used when no probe URL is configured, and by tests to simulate going
/// offline.
pub struct StaticNetworkMonitor {
    available: AtomicBool,
}

impl StaticNetworkMonitor {
    pub fn new(available: bool) -> Self {
        Self {
            available: AtomicBool::new(available),
        }
    }

    pub fn set_available(&self, available: bool) {
        tracing::debug!(available, "Network availability changed");
        self.available.store(available, Ordering::Relaxed);
    }
}

impl Default for StaticNetworkMonitor {
    fn default() -> Self {
        Self::new(true)
    }
}

#[async_trait]
impl NetworkMonitor for StaticNetworkMonitor {
    async fn is_available(&self) -> bool {
        self.available.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_flag_toggles() {
        let monitor = StaticNetworkMonitor::default();
        assert!(monitor.is_available().await);

        monitor.set_available(false);
        assert!(!monitor.is_available().await);
    }
}
