//! Injected HTTP client capability. The poller only sees this trait, so
//! tests drive it with a scripted fake instead of a live server.

use async_trait::async_trait;

use crate::error::{AppError, PollError, Result};

/// A completed HTTP exchange: status plus raw body. Status classification
/// and body decoding are the poller's concern, not the client's.
#[derive(Debug, Clone)]
pub struct FetchResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl FetchResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[async_trait]
pub trait HttpClient: Send + Sync {
    /// Issue one GET request. `Err` means the request could not complete at
    /// all (DNS/connection failure); a non-2xx response is still `Ok`.
    async fn get(&self, url: &str) -> std::result::Result<FetchResponse, PollError>;
}

/// Production client backed by reqwest. No per-request timeout here; the
/// poller imposes its own so a hung request cannot stall a cycle forever.
pub struct ReqwestClient {
    inner: reqwest::Client,
}

impl ReqwestClient {
    pub fn new() -> Result<Self> {
        let inner = reqwest::Client::builder()
            .build()
            .map_err(|e| AppError::Client(e.to_string()))?;
        Ok(Self { inner })
    }
}

#[async_trait]
impl HttpClient for ReqwestClient {
    async fn get(&self, url: &str) -> std::result::Result<FetchResponse, PollError> {
        let response = self
            .inner
            .get(url)
            .send()
            .await
            .map_err(|e| PollError::Network(e.to_string()))?;

        let status = response.status().as_u16();
        let body = response
            .bytes()
            .await
            .map_err(|e| PollError::Network(e.to_string()))?
            .to_vec();

        Ok(FetchResponse { status, body })
    }
}
