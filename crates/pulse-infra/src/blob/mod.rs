//! Blob store implementations and the local image upload helper.

mod memory;

pub use memory::InMemoryBlobStore;

#[cfg(feature = "http")]
mod http;
#[cfg(feature = "http")]
pub use self::http::{HttpBlobConfig, HttpBlobStore};

use chrono::Utc;
use uuid::Uuid;

use pulse_core::ports::BlobStore;

/// Folder every uploaded image lands in.
pub const IMAGES_PREFIX: &str = "images";

/// Read a local image and upload it, returning its remote URL.
///
/// Any failure (unreadable file, rejected upload) is logged and reported as
/// `None`; the caller decides whether the post survives without its photo.
pub async fn upload_local_image(blobs: &dyn BlobStore, local_ref: &str) -> Option<String> {
    let path = local_ref.strip_prefix("file://").unwrap_or(local_ref);

    let bytes = match tokio::fs::read(path).await {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::error!(path = %path, error = %e, "Failed to read local image");
            return None;
        }
    };

    let target = format!(
        "{IMAGES_PREFIX}/{}-{}.jpg",
        Utc::now().timestamp_millis(),
        Uuid::new_v4()
    );
    match blobs.put(&target, bytes).await {
        Ok(url) => {
            tracing::debug!(target = %target, url = %url, "Image uploaded");
            Some(url)
        }
        Err(e) => {
            tracing::error!(target = %target, error = %e, "Image upload failed");
            None
        }
    }
}
