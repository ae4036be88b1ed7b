use reqwest::{
    Client,
    header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE},
    Method,
};
use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, error, warn};

use shared_config::AppConfig;
use shared_models::auth::User;

use crate::error::BackendError;

/// HTTP+JSON client for the scheduling backend. Cheap to clone; clones
/// share the underlying connection pool.
#[derive(Debug, Clone)]
pub struct BackendClient {
    client: Client,
    base_url: String,
}

impl BackendClient {
    pub fn new(config: &AppConfig) -> Self {
        let client = Client::builder()
            .timeout(config.request_timeout())
            .build()
            .unwrap_or_else(|e| {
                warn!("Falling back to default HTTP client: {}", e);
                Client::new()
            });

        Self {
            client,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
        }
    }

    fn get_headers(&self, auth_token: Option<&str>) -> HeaderMap {
        let mut headers = HeaderMap::new();

        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        if let Some(token) = auth_token {
            match HeaderValue::from_str(&format!("Bearer {}", token)) {
                Ok(value) => {
                    headers.insert(AUTHORIZATION, value);
                }
                Err(_) => warn!("Dropping malformed bearer token"),
            }
        }

        headers
    }

    pub async fn request<T, B>(
        &self,
        method: Method,
        path: &str,
        auth_token: Option<&str>,
        body: Option<&B>,
    ) -> Result<T, BackendError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.request_with_query(method, path, &[], auth_token, body).await
    }

    pub async fn request_with_query<T, B>(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        auth_token: Option<&str>,
        body: Option<&B>,
    ) -> Result<T, BackendError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let url = format!("{}{}", self.base_url, path);
        debug!("Making {} request to {}", method, url);

        let mut req = self.client.request(method, &url)
            .headers(self.get_headers(auth_token));

        if !query.is_empty() {
            req = req.query(query);
        }

        if let Some(body_data) = body {
            req = req.json(body_data);
        }

        let response = req.send().await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            error!("API error ({}): {}", status, error_text);
            return Err(BackendError::from_status(status, error_text));
        }

        let bytes = response.bytes().await?;
        // 204 and friends carry no body
        let payload: &[u8] = if bytes.is_empty() { b"null" } else { &bytes };
        let data = serde_json::from_slice::<T>(payload)?;
        Ok(data)
    }

    pub async fn get<T>(&self, path: &str, auth_token: Option<&str>) -> Result<T, BackendError>
    where
        T: DeserializeOwned,
    {
        self.request::<T, ()>(Method::GET, path, auth_token, None).await
    }

    pub async fn post<T, B>(&self, path: &str, auth_token: Option<&str>, body: &B) -> Result<T, BackendError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.request(Method::POST, path, auth_token, Some(body)).await
    }

    /// Resolves a bearer token to the backend user it belongs to.
    pub async fn current_user(&self, auth_token: &str) -> Result<User, BackendError> {
        self.get("/auth/me", Some(auth_token)).await
    }

    pub fn get_base_url(&self) -> &str {
        &self.base_url
    }
}
