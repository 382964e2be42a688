use std::sync::{Arc, PoisonError, RwLock};

use reqwest::header::{HeaderValue, AUTHORIZATION};
use reqwest::{multipart, Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use uuid::Uuid;

use crate::config::Config;
use crate::error::{ClientError, ClientResult};

const REQUEST_ID_HEADER: &str = "x-request-id";

/// HTTP client for the ProjectMarket backend.
///
/// Every request carries the current bearer token (when one is set) and a
/// fresh `x-request-id`. Non-success responses are turned into
/// [`ClientError`] carrying the backend's `detail` message. Clones share the
/// same token slot.
#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
    token: Arc<RwLock<Option<String>>>,
}

impl ApiClient {
    pub fn new(config: &Config) -> ClientResult<Self> {
        let http = Client::builder().timeout(config.http_timeout).build()?;

        Ok(Self {
            http,
            base_url: config.api_url.clone(),
            token: Arc::new(RwLock::new(None)),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Replace the bearer token used for subsequent requests
    pub fn set_token(&self, token: Option<String>) {
        // The slot holds a plain value, so a writer that panicked left nothing half-done
        let mut slot = self.token.write().unwrap_or_else(PoisonError::into_inner);
        *slot = token;
    }

    pub fn token(&self) -> Option<String> {
        self.token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    // ============ Typed helpers ============

    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        let response = self.execute(Method::GET, path, |req| req).await?;
        decode_json(response).await
    }

    pub async fn get_json_query<T, Q>(&self, path: &str, query: &Q) -> ClientResult<T>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        let response = self
            .execute(Method::GET, path, |req| req.query(query))
            .await?;
        decode_json(response).await
    }

    pub async fn post_json<T, B>(&self, path: &str, body: &B) -> ClientResult<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let response = self
            .execute(Method::POST, path, |req| req.json(body))
            .await?;
        decode_json(response).await
    }

    /// POST without a body
    pub async fn post_empty<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        let response = self.execute(Method::POST, path, |req| req).await?;
        decode_json(response).await
    }

    /// POST with parameters in the query string and no body
    pub async fn post_query<T, Q>(&self, path: &str, query: &Q) -> ClientResult<T>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        let response = self
            .execute(Method::POST, path, |req| req.query(query))
            .await?;
        decode_json(response).await
    }

    pub async fn patch_json<T, B>(&self, path: &str, body: &B) -> ClientResult<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let response = self
            .execute(Method::PATCH, path, |req| req.json(body))
            .await?;
        decode_json(response).await
    }

    pub async fn delete_json<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        let response = self.execute(Method::DELETE, path, |req| req).await?;
        decode_json(response).await
    }

    pub async fn post_multipart<T: DeserializeOwned>(
        &self,
        path: &str,
        form: multipart::Form,
    ) -> ClientResult<T> {
        let response = self
            .execute(Method::POST, path, |req| req.multipart(form))
            .await?;
        decode_json(response).await
    }

    /// GET a raw byte stream (file downloads)
    pub async fn get_bytes(&self, path: &str) -> ClientResult<Vec<u8>> {
        let response = self.execute(Method::GET, path, |req| req).await?;
        Ok(response.bytes().await?.to_vec())
    }

    // ============ Transport ============

    async fn execute<F>(&self, method: Method, path: &str, build: F) -> ClientResult<Response>
    where
        F: FnOnce(RequestBuilder) -> RequestBuilder,
    {
        let request_id = Uuid::new_v4();
        let url = format!("{}{}", self.base_url, path);

        let mut request = self
            .http
            .request(method.clone(), &url)
            .header(REQUEST_ID_HEADER, request_id.to_string());

        if let Some(token) = self.token() {
            let value = HeaderValue::from_str(&format!("Bearer {}", token))
                .map_err(|_| ClientError::Validation("Stored token is not a valid header".to_string()))?;
            request = request.header(AUTHORIZATION, value);
        }

        tracing::debug!(%method, path, %request_id, "Sending request");

        let response = build(request).send().await.map_err(|e| {
            tracing::warn!(%method, path, %request_id, error = %e, "Request failed to send");
            ClientError::from(e)
        })?;

        let status = response.status();
        if status.is_success() {
            tracing::debug!(%method, path, %request_id, status = status.as_u16(), "Request succeeded");
            return Ok(response);
        }

        let body = response.bytes().await.unwrap_or_default();
        let error = ClientError::from_response(status, &body);
        tracing::warn!(
            %method,
            path,
            %request_id,
            status = status.as_u16(),
            detail = %error,
            "Request rejected by backend"
        );
        Err(error)
    }
}

async fn decode_json<T: DeserializeOwned>(response: Response) -> ClientResult<T> {
    let bytes = response.bytes().await?;
    Ok(serde_json::from_slice(&bytes)?)
}
