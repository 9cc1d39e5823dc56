// Hosted object storage client for pet images
// Uploads land under a generated unique path and come back as a public URL

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use reqwest::{header, Client};
use std::time::Duration;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::{app_config::StorageConfig, utils::service_error::ServiceError};

/// Folder inside the bucket where profile photos live
const IMAGE_FOLDER: &str = "pet-images";

const UPLOAD_TIMEOUT_SECS: u64 = 15;

pub struct StorageService {
    client: Client,
    endpoint: String,
    api_key: String,
    bucket: String,
    enabled: bool,
}

impl StorageService {
    pub fn new(config: &StorageConfig) -> Result<Self, ServiceError> {
        let enabled = config.is_configured();
        if !enabled {
            warn!("Storage service starting in disabled mode; uploads will be rejected");
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(UPLOAD_TIMEOUT_SECS))
            .build()
            .map_err(|e| ServiceError::StorageError(format!("HTTP client setup failed: {}", e)))?;

        Ok(Self {
            client,
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            bucket: config.bucket.clone(),
            enabled,
        })
    }

    pub fn is_available(&self) -> bool {
        self.enabled
    }

    /// Upload one image and return its public URL. The object path is a
    /// fresh UUID so uploads never collide or overwrite each other.
    #[instrument(skip(self, data))]
    pub async fn upload_image(
        &self,
        data: &[u8],
        content_type: &str,
    ) -> Result<String, ServiceError> {
        if !self.enabled {
            return Err(ServiceError::StorageUnavailable);
        }
        if data.is_empty() {
            return Err(ServiceError::ValidationError("Empty image payload".to_string()));
        }

        let object_path = format!(
            "{}/{}.{}",
            IMAGE_FOLDER,
            Uuid::new_v4(),
            extension_for(content_type)
        );
        let upload_url = format!(
            "{}/storage/v1/object/{}/{}",
            self.endpoint, self.bucket, object_path
        );

        let response = self
            .client
            .post(&upload_url)
            .bearer_auth(&self.api_key)
            .header(header::CONTENT_TYPE, content_type)
            .body(data.to_vec())
            .send()
            .await
            .map_err(|e| ServiceError::StorageError(e.to_string()))?;

        if !response.status().is_success() {
            return Err(ServiceError::StorageError(format!(
                "Upload failed with status {}",
                response.status()
            )));
        }

        let public_url = self.public_url(&object_path);
        info!(path = %object_path, "Image uploaded");
        Ok(public_url)
    }

    pub fn public_url(&self, object_path: &str) -> String {
        format!(
            "{}/storage/v1/object/public/{}/{}",
            self.endpoint, self.bucket, object_path
        )
    }
}

/// Map a MIME type to the object-path extension
fn extension_for(content_type: &str) -> &'static str {
    match content_type {
        "image/png" => "png",
        "image/jpeg" | "image/jpg" => "jpg",
        "image/gif" => "gif",
        "image/webp" => "webp",
        _ => "bin",
    }
}

/// Decode the edit form's image payload: either a `data:` URL as produced
/// by a FileReader, or a bare base64 string with a separate content type.
/// Returns the raw bytes plus the effective MIME type.
pub fn decode_image_payload(
    data: &str,
    content_type: Option<&str>,
) -> Result<(Vec<u8>, String), ServiceError> {
    let (encoded, mime) = match data.strip_prefix("data:") {
        Some(rest) => {
            let (head, body) = rest.split_once(";base64,").ok_or_else(|| {
                ServiceError::ValidationError("Malformed data URL".to_string())
            })?;
            (body, head.to_string())
        },
        None => (
            data,
            content_type.unwrap_or("application/octet-stream").to_string(),
        ),
    };

    let bytes = BASE64
        .decode(encoded.trim())
        .map_err(|e| ServiceError::ValidationError(format!("Invalid base64 image data: {}", e)))?;

    Ok((bytes, mime))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_data_url_payload() {
        // "hi" base64-encoded
        let (bytes, mime) = decode_image_payload("data:image/png;base64,aGk=", None).unwrap();
        assert_eq!(bytes, b"hi");
        assert_eq!(mime, "image/png");
    }

    #[test]
    fn decodes_bare_base64_with_explicit_type() {
        let (bytes, mime) = decode_image_payload("aGk=", Some("image/jpeg")).unwrap();
        assert_eq!(bytes, b"hi");
        assert_eq!(mime, "image/jpeg");
    }

    #[test]
    fn rejects_garbage_base64() {
        assert!(decode_image_payload("not base64!!!", None).is_err());
    }

    #[test]
    fn rejects_data_url_without_base64_marker() {
        assert!(decode_image_payload("data:image/png,rawdata", None).is_err());
    }

    #[test]
    fn disabled_storage_rejects_uploads() {
        let config = StorageConfig {
            endpoint: String::new(),
            api_key: String::new(),
            bucket: "pet-images".to_string(),
        };
        let service = StorageService::new(&config).unwrap();
        assert!(!service.is_available());

        let result = tokio::runtime::Runtime::new()
            .unwrap()
            .block_on(service.upload_image(b"bytes", "image/png"));
        assert!(matches!(result, Err(ServiceError::StorageUnavailable)));
    }

    #[test]
    fn public_url_shape() {
        let config = StorageConfig {
            endpoint: "https://store.example.com/".to_string(),
            api_key: "anon".to_string(),
            bucket: "pet-images".to_string(),
        };
        let service = StorageService::new(&config).unwrap();
        assert_eq!(
            service.public_url("pet-images/abc.png"),
            "https://store.example.com/storage/v1/object/public/pet-images/pet-images/abc.png"
        );
    }

    #[test]
    fn extension_mapping() {
        assert_eq!(extension_for("image/png"), "png");
        assert_eq!(extension_for("image/jpeg"), "jpg");
        assert_eq!(extension_for("text/plain"), "bin");
    }
}
