use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::{de::DeserializeOwned, Serialize};

use crate::{
    api::DataApi,
    config::ApiConfig,
    error::{Result, StoreError},
    types::{ApiResponse, FlatEntry, PutOptions, TypedEntry},
};

/// HTTP-backed data API
///
/// Talks to the REST endpoints under `{base_url}/api/data`:
/// - `GET /list` and `GET /v2/list` for listings
/// - `GET|PUT|DELETE /file` for content
/// - `POST /move` for renames
#[derive(Clone)]
pub struct HttpDataApi {
    client: Client,
    root: String,
    token: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct MoveRequest<'a> {
    old_path: &'a str,
    new_path: &'a str,
}

impl HttpDataApi {
    pub fn new(config: ApiConfig) -> Result<Self> {
        config.validate()?;

        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            client,
            root: config.api_root(),
            token: config.token,
        })
    }

    /// Build an endpoint URL below the API root
    fn url(&self, endpoint: &str) -> String {
        format!("{}/{}", self.root, endpoint.trim_start_matches('/'))
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// Read a raw response, keeping status and reason for the caller
    async fn into_api_response(response: Response) -> Result<ApiResponse> {
        let status = response.status();
        let body = response.bytes().await?;
        Ok(ApiResponse {
            status: status.as_u16(),
            status_text: status_text(status),
            body,
        })
    }

    async fn list<T: DeserializeOwned>(&self, endpoint: &str, key: &str, path: &str) -> Result<T> {
        let request = self.client.get(self.url(endpoint)).query(&[(key, path)]);
        let response = self.authorize(request).send().await?;

        match response.status() {
            StatusCode::OK => {
                let body = response.bytes().await?;
                Ok(serde_json::from_slice(&body)?)
            }
            status => Err(StoreError::unexpected_status(
                "list",
                path,
                status.as_u16(),
                &status_text(status),
            )),
        }
    }
}

fn status_text(status: StatusCode) -> String {
    status.canonical_reason().unwrap_or_default().to_string()
}

#[async_trait]
impl DataApi for HttpDataApi {
    async fn list_flat(&self, directory: &str) -> Result<Vec<FlatEntry>> {
        self.list("list", "directory", directory).await
    }

    async fn list_typed(&self, path: &str) -> Result<Vec<TypedEntry>> {
        self.list("v2/list", "path", path).await
    }

    async fn get(&self, path: &str) -> Result<ApiResponse> {
        let request = self.client.get(self.url("file")).query(&[("path", path)]);
        let response = self.authorize(request).send().await?;
        Self::into_api_response(response).await
    }

    async fn put(&self, path: &str, content: &str, options: PutOptions) -> Result<ApiResponse> {
        let request = self
            .client
            .put(self.url("file"))
            .query(&[
                ("path", path),
                ("overwrite", bool_param(options.overwrite)),
                ("fullInfo", bool_param(options.full_info)),
            ])
            .body(content.to_string());
        let response = self.authorize(request).send().await?;
        Self::into_api_response(response).await
    }

    async fn delete(&self, path: &str) -> Result<ApiResponse> {
        let request = self.client.delete(self.url("file")).query(&[("path", path)]);
        let response = self.authorize(request).send().await?;
        Self::into_api_response(response).await
    }

    async fn move_file(&self, old_path: &str, new_path: &str) -> Result<ApiResponse> {
        let request = self.client.post(self.url("move")).json(&MoveRequest { old_path, new_path });
        let response = self.authorize(request).send().await?;
        Self::into_api_response(response).await
    }

    fn identifier(&self) -> String {
        format!("http:{}", self.root)
    }
}

fn bool_param(value: bool) -> &'static str {
    if value {
        "true"
    } else {
        "false"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_joining() {
        let api = HttpDataApi::new(ApiConfig::new("https://files.example.org/")).unwrap();

        assert_eq!(api.url("file"), "https://files.example.org/api/data/file");
        assert_eq!(api.url("/v2/list"), "https://files.example.org/api/data/v2/list");
    }

    #[test]
    fn test_new_rejects_invalid_url() {
        assert!(matches!(
            HttpDataApi::new(ApiConfig::new("files.example.org")),
            Err(StoreError::InvalidConfig { .. })
        ));
    }

    #[test]
    fn test_identifier() {
        let api = HttpDataApi::new(ApiConfig::new("http://localhost:3000")).unwrap();
        assert_eq!(api.identifier(), "http:http://localhost:3000/api/data");
    }
}
