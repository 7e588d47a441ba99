//! HTTP client for a running Slimify server.
//!
//! Wraps the media proxy (`/api/upload`, `/api/delete`) and the per-user history
//! endpoints. The base URL comes from `SLIMIFY_API_URL` or `API_URL`.

use anyhow::{Context, Result};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use reqwest::{Client, RequestBuilder, Response};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use slimify_core::models::{CompressionRecord, UserExport, UserStats};
use std::path::{Component, Path};
use std::time::Duration;
use uuid::Uuid;

pub const DEFAULT_API_URL: &str = "http://localhost:4000";

/// Session header the server scopes history routes by.
pub const USER_ID_HEADER: &str = "X-User-Id";

#[derive(Debug, Serialize)]
struct UploadBody<'a> {
    file: String,
    #[serde(rename = "userId")]
    user_id: &'a str,
    #[serde(rename = "fileName")]
    file_name: &'a str,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UploadResponse {
    pub success: bool,
    pub url: String,
    pub public_id: String,
    pub size: u64,
    pub format: String,
}

#[derive(Debug, Serialize)]
struct DeleteBody<'a> {
    public_id: &'a str,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DeleteResponse {
    pub success: bool,
    pub message: String,
}

#[derive(Clone, Debug)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Create client from environment: SLIMIFY_API_URL (or API_URL).
    pub fn from_env() -> Result<Self> {
        let base_url = std::env::var("SLIMIFY_API_URL")
            .or_else(|_| std::env::var("API_URL"))
            .unwrap_or_else(|_| DEFAULT_API_URL.to_string());
        Self::new(base_url)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn build_url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// GET request with optional query parameters. Deserializes JSON response.
    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T> {
        self.get_with_session(path, query, None).await
    }

    /// GET on behalf of `user_id`, sent as the `X-User-Id` session header.
    pub async fn get_as<T: DeserializeOwned>(
        &self,
        user_id: &str,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T> {
        self.get_with_session(path, query, Some(user_id)).await
    }

    async fn get_with_session<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
        user_id: Option<&str>,
    ) -> Result<T> {
        let mut request = apply_session(self.client.get(self.build_url(path)), user_id);
        if !query.is_empty() {
            request = request.query(query);
        }

        let response = request.send().await.context("Failed to send request")?;
        read_json(response).await
    }

    /// POST JSON body and deserialize response.
    pub async fn post_json<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let response = self
            .client
            .post(self.build_url(path))
            .json(body)
            .send()
            .await
            .context("Failed to send request")?;
        read_json(response).await
    }

    /// DELETE with a JSON body and deserialize response.
    pub async fn delete_json<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let response = self
            .client
            .delete(self.build_url(path))
            .json(body)
            .send()
            .await
            .context("Failed to send request")?;
        read_json(response).await
    }

    /// DELETE on behalf of `user_id`. Returns Ok(()) on success.
    pub async fn delete_as(&self, user_id: &str, path: &str) -> Result<()> {
        let response = apply_session(self.client.delete(self.build_url(path)), Some(user_id))
            .send()
            .await
            .context("Failed to send request")?;
        ensure_success(response).await?;
        Ok(())
    }

    /// Publish a local file to the media host under `user_id`.
    pub async fn upload_file(&self, file_path: &Path, user_id: &str) -> Result<UploadResponse> {
        if file_path.components().any(|c| c == Component::ParentDir) {
            return Err(anyhow::anyhow!("Invalid input: {}", file_path.display()));
        }

        let data = tokio::fs::read(file_path)
            .await
            .with_context(|| format!("Failed to read file: {}", file_path.display()))?;
        let file_name = file_path
            .file_name()
            .and_then(|n| n.to_str())
            .context("File path has no usable file name")?;

        let body = UploadBody {
            file: STANDARD.encode(&data),
            user_id,
            file_name,
        };
        self.post_json("/api/upload", &body).await
    }

    pub async fn delete_file(&self, public_id: &str) -> Result<DeleteResponse> {
        self.delete_json("/api/delete", &DeleteBody { public_id })
            .await
    }

    /// Most recent compressions of a user, newest first.
    pub async fn list_compressions(
        &self,
        user_id: &str,
        limit: Option<i64>,
    ) -> Result<Vec<CompressionRecord>> {
        let mut query = Vec::new();
        if let Some(limit) = limit {
            query.push(("limit", limit.to_string()));
        }
        self.get_as(user_id, &user_path(user_id, "compressions"), &query)
            .await
    }

    pub async fn delete_compression(&self, user_id: &str, record_id: Uuid) -> Result<()> {
        let path = format!("{}/{}", user_path(user_id, "compressions"), record_id);
        self.delete_as(user_id, &path).await
    }

    pub async fn user_stats(&self, user_id: &str) -> Result<UserStats> {
        self.get_as(user_id, &user_path(user_id, "stats"), &[])
            .await
    }

    pub async fn export_user_data(&self, user_id: &str) -> Result<UserExport> {
        self.get_as(user_id, &user_path(user_id, "export"), &[])
            .await
    }
}

fn apply_session(request: RequestBuilder, user_id: Option<&str>) -> RequestBuilder {
    match user_id {
        Some(user_id) => request.header(USER_ID_HEADER, user_id),
        None => request,
    }
}

fn user_path(user_id: &str, resource: &str) -> String {
    format!("/api/users/{}/{}", urlencoding::encode(user_id), resource)
}

async fn ensure_success(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let error_text = response
        .text()
        .await
        .unwrap_or_else(|_| "Unknown error".to_string());
    Err(anyhow::anyhow!(
        "API request failed with status {}: {}",
        status,
        error_text
    ))
}

async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T> {
    ensure_success(response)
        .await?
        .json()
        .await
        .context("Failed to parse response as JSON")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_slash_is_trimmed() {
        let client = ApiClient::new("http://localhost:4000/").unwrap();
        assert_eq!(client.base_url(), "http://localhost:4000");
        assert_eq!(
            client.build_url("/api/upload"),
            "http://localhost:4000/api/upload"
        );
    }

    #[test]
    fn user_ids_are_escaped_in_paths() {
        assert_eq!(
            user_path("user 1/x", "stats"),
            "/api/users/user%201%2Fx/stats"
        );
    }

    #[test]
    fn session_header_is_attached_when_given() {
        let client = Client::new();
        let request = apply_session(client.get("http://localhost:4000/x"), Some("u1"))
            .build()
            .unwrap();
        assert_eq!(request.headers()[USER_ID_HEADER], "u1");

        let request = apply_session(client.get("http://localhost:4000/x"), None)
            .build()
            .unwrap();
        assert!(request.headers().get(USER_ID_HEADER).is_none());
    }

    #[test]
    fn upload_body_uses_camel_case_keys() {
        let body = UploadBody {
            file: "AAAA".to_string(),
            user_id: "u1",
            file_name: "a.pdf",
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["userId"], "u1");
        assert_eq!(json["fileName"], "a.pdf");
        assert_eq!(json["file"], "AAAA");
    }

    #[tokio::test]
    async fn upload_refuses_parent_dir_paths() {
        let client = ApiClient::new(DEFAULT_API_URL).unwrap();
        let err = client
            .upload_file(Path::new("../secret.pdf"), "u1")
            .await
            .unwrap_err();
        assert!(err.to_string().contains("Invalid input"));
    }
}
