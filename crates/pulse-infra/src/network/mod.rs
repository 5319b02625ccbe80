//! Connectivity monitors.

mod memory;

pub use memory::StaticNetworkMonitor;

#[cfg(feature = "http")]
mod http;
#[cfg(feature = "http")]
pub use self::http::{HttpProbeConfig, HttpProbeMonitor};
