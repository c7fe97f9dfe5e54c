use std::time::{SystemTime, UNIX_EPOCH};

use async_trait::async_trait;
use http::header::{HeaderMap, AUTHORIZATION, CONTENT_TYPE};
use http::StatusCode;
use reqwest::Client as ReqwestClient;
use url::Url;

use crate::TransportError;

/// A fully buffered HTTP response.
#[derive(Debug, Clone)]
pub struct TransportResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl TransportResponse {
    /// The `content-type` header, or `""` when missing or not valid ASCII.
    pub fn content_type(&self) -> &str {
        self.headers
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
    }
}

/// Issues a signed `GET` and reads the whole response body.
///
/// Implementations decide about connections, TLS, redirects and timeouts.
/// A non-2xx status is not an error at this level; the body is still
/// returned so the vendor error payload can be interpreted.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn get(&self, url: Url, authorization: String)
        -> Result<TransportResponse, TransportError>;
}

#[async_trait]
impl Transport for ReqwestClient {
    async fn get(
        &self,
        url: Url,
        authorization: String,
    ) -> Result<TransportResponse, TransportError> {
        let response = ReqwestClient::get(self, url)
            .header(AUTHORIZATION, authorization)
            .send()
            .await?;
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.bytes().await?.to_vec();
        Ok(TransportResponse {
            status,
            headers,
            body,
        })
    }
}

/// Produces a fresh, unique `oauth_nonce` per call.
pub trait NonceSource: Send + Sync {
    fn nonce(&self) -> String;
}

/// Random (v4) UUIDs.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidNonce;

impl NonceSource for UuidNonce {
    fn nonce(&self) -> String {
        uuid::Uuid::new_v4().to_string()
    }
}

impl<F> NonceSource for F
where
    F: Fn() -> String + Send + Sync,
{
    fn nonce(&self) -> String {
        self()
    }
}

/// Seconds since the Unix epoch.
pub fn unix_timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
}
