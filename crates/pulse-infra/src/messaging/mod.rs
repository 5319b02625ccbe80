//! Push-topic messaging implementations.

mod memory;

pub use memory::InMemoryTopicMessaging;
