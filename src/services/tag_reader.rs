// Optional short-range tag scanning (NFC readers on kiosk deployments)
// Capability is abstracted behind a trait; absence is silently tolerated

use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::{db::DieselPool, services::profile::ProfileService, utils::validate_profile_id};

/// A source of scanned tag payloads. Payloads are text interpreted as
/// profile ids.
#[async_trait]
pub trait TagReader: Send + Sync {
    fn is_available(&self) -> bool;

    /// Wait for the next scan; `None` means the reader is gone for good
    async fn next_scan(&self) -> Option<String>;
}

/// Stand-in used when no scanner hardware is present
pub struct NoopTagReader;

#[async_trait]
impl TagReader for NoopTagReader {
    fn is_available(&self) -> bool {
        false
    }

    async fn next_scan(&self) -> Option<String> {
        None
    }
}

/// Pick the tag reader for this deployment. No hardware integration is
/// compiled in currently, so this always yields the no-op reader; swapping
/// in a real one only touches this function.
pub fn detect_tag_reader() -> Arc<dyn TagReader> {
    Arc::new(NoopTagReader)
}

/// Resolve scans to profiles in the background. Does nothing when no
/// reader is available.
pub fn spawn_tag_listener(reader: Arc<dyn TagReader>, diesel_pool: DieselPool) {
    if !reader.is_available() {
        debug!("No tag reader detected; scan-to-profile flow disabled");
        return;
    }

    tokio::spawn(async move {
        let service = ProfileService::from_pool(diesel_pool);

        while let Some(payload) = reader.next_scan().await {
            let id = payload.trim().to_string();
            if let Err(e) = validate_profile_id(&id) {
                warn!("Ignoring scanned payload: {}", e);
                continue;
            }

            match service.fetch_by_id(&id).await {
                Ok(Some(profile)) => {
                    info!(profile_id = %id, pet = %profile.name, "Tag scan resolved to profile")
                },
                Ok(None) => info!(profile_id = %id, "Tag scan for unprovisioned id"),
                Err(e) => warn!(profile_id = %id, "Tag scan lookup failed: {}", e),
            }
        }

        debug!("Tag reader stream ended");
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn noop_reader_is_unavailable_and_silent() {
        let reader = NoopTagReader;
        assert!(!reader.is_available());
        assert_eq!(reader.next_scan().await, None);
    }
}
