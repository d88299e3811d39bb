use crate::{errors::ApiError, Result};
use reqwest::Client;
use tracing::{error, info};

/// Uploads files to one bucket of the hosted object storage (`/storage/v1`)
#[derive(Clone)]
pub struct StorageClient {
    http: Client,
    base_url: String,
    api_key: String,
    bucket: String,
}

impl StorageClient {
    pub fn new(backend_url: &str, api_key: &str, bucket: &str) -> Self {
        StorageClient {
            http: Client::new(),
            base_url: format!("{}/storage/v1", backend_url.trim_end_matches('/')),
            api_key: api_key.to_string(),
            bucket: bucket.to_string(),
        }
    }

    /// Public URL of an object in the bucket
    pub fn public_url(&self, path: &str) -> String {
        format!(
            "{}/object/public/{}/{}",
            self.base_url,
            self.bucket,
            path.trim_start_matches('/')
        )
    }

    /// Stores `bytes` at `path`, returning the object's public URL
    pub async fn upload(&self, path: &str, bytes: Vec<u8>, content_type: &str) -> Result<String> {
        let path = path.trim_start_matches('/');
        let url = format!("{}/object/{}/{}", self.base_url, self.bucket, path);

        info!("Uploading {} bytes to {}/{}", bytes.len(), self.bucket, path);
        let response = self
            .http
            .post(url)
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .header("x-upsert", "false")
            .body(bytes)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            error!("Upload of {} failed with {}: {}", path, status, body);
            return Err(ApiError::Custom(format!("Upload failed ({status})")));
        }

        Ok(self.public_url(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    #[test]
    fn test_public_url() {
        let client = StorageClient::new("https://backend.example.com/", "key", "media");
        assert_eq!(
            client.public_url("/agents/a.jpg"),
            "https://backend.example.com/storage/v1/object/public/media/agents/a.jpg"
        );
    }

    #[tokio::test]
    async fn test_upload_returns_public_url() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/storage/v1/object/media/agents/a.jpg")
                    .header("apikey", "key")
                    .header("content-type", "image/jpeg")
                    .body("jpeg-bytes");
                then.status(200).json_body(serde_json::json!({"Key": "media/agents/a.jpg"}));
            })
            .await;

        let client = StorageClient::new(&server.base_url(), "key", "media");
        let url = client
            .upload("agents/a.jpg", b"jpeg-bytes".to_vec(), "image/jpeg")
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(url, client.public_url("agents/a.jpg"));
    }

    #[tokio::test]
    async fn test_upload_failure() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST);
                then.status(413).body("Payload too large");
            })
            .await;

        let client = StorageClient::new(&server.base_url(), "key", "media");
        let result = client.upload("big.mov", vec![0; 16], "video/quicktime").await;
        assert!(matches!(result, Err(ApiError::Custom(_))));
    }
}
