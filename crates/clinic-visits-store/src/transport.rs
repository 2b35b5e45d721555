//! HTTP transport seam.
//!
//! [`ReqwestTransport`] is the real wire. [`MockTransport`] replays scripted
//! responses and records every call for assertions.

use std::collections::VecDeque;
use std::future::Future;
use std::sync::Mutex;
use std::time::Duration;

use crate::error::{StoreError, StoreResult};

/// Status and body of a completed HTTP exchange.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpReply {
    pub status: u16,
    pub body: String,
}

impl HttpReply {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Minimal HTTP surface the store client needs.
///
/// Implementations report only wire-level failures as errors; any completed
/// exchange is an `Ok`, whatever its status. Deadlines are applied by the
/// caller.
pub trait Transport: Send + Sync {
    /// GET `url` with `query` appended as query parameters.
    fn get(
        &self,
        url: &str,
        query: &[(String, String)],
    ) -> impl Future<Output = StoreResult<HttpReply>> + Send;

    /// POST `form` to `url` as `application/x-www-form-urlencoded`.
    fn post_form(
        &self,
        url: &str,
        form: &[(String, String)],
    ) -> impl Future<Output = StoreResult<HttpReply>> + Send;
}

/// Transport backed by a shared `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new() -> StoreResult<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("clinic-visits/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| StoreError::Network(e.to_string()))?;
        Ok(Self { client })
    }

    async fn read(response: reqwest::Response) -> StoreResult<HttpReply> {
        let status = response.status().as_u16();
        let body = response.text().await.map_err(wire_error)?;
        Ok(HttpReply { status, body })
    }
}

fn wire_error(err: reqwest::Error) -> StoreError {
    if err.is_connect() {
        StoreError::Network(format!("cannot connect: {}", err))
    } else {
        StoreError::Network(err.to_string())
    }
}

impl Transport for ReqwestTransport {
    async fn get(&self, url: &str, query: &[(String, String)]) -> StoreResult<HttpReply> {
        let response = self
            .client
            .get(url)
            .query(query)
            .send()
            .await
            .map_err(wire_error)?;
        Self::read(response).await
    }

    async fn post_form(&self, url: &str, form: &[(String, String)]) -> StoreResult<HttpReply> {
        let response = self
            .client
            .post(url)
            .form(form)
            .send()
            .await
            .map_err(wire_error)?;
        Self::read(response).await
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

/// A call observed by [`MockTransport`].
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub method: Method,
    pub url: String,
    pub params: Vec<(String, String)>,
}

impl RecordedCall {
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// One scripted outcome for [`MockTransport`].
#[derive(Debug, Clone)]
pub struct MockResponse {
    delay: Option<Duration>,
    outcome: Result<HttpReply, String>,
}

impl MockResponse {
    /// 200 with the given body.
    pub fn ok(body: impl Into<String>) -> Self {
        Self::status(200, body)
    }

    pub fn status(status: u16, body: impl Into<String>) -> Self {
        Self {
            delay: None,
            outcome: Ok(HttpReply {
                status,
                body: body.into(),
            }),
        }
    }

    /// The request fails before any response arrives.
    pub fn network_error(message: impl Into<String>) -> Self {
        Self {
            delay: None,
            outcome: Err(message.into()),
        }
    }

    /// Respond only after `delay` has elapsed.
    pub fn after(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }
}

/// Mock transport for testing: pops one scripted response per call.
///
/// Calls beyond the script fail with a network error.
#[derive(Debug, Default)]
pub struct MockTransport {
    script: Mutex<VecDeque<MockResponse>>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_responses(responses: impl IntoIterator<Item = MockResponse>) -> Self {
        Self {
            script: Mutex::new(responses.into_iter().collect()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn push(&self, response: MockResponse) {
        self.script
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push_back(response);
    }

    /// Every call made so far, in order.
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    fn next(&self, method: Method, url: &str, params: &[(String, String)]) -> MockResponse {
        self.calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(RecordedCall {
                method,
                url: url.to_string(),
                params: params.to_vec(),
            });
        self.script
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .pop_front()
            .unwrap_or_else(|| MockResponse::network_error("no scripted response"))
    }

    async fn respond(&self, response: MockResponse) -> StoreResult<HttpReply> {
        if let Some(delay) = response.delay {
            tokio::time::sleep(delay).await;
        }
        response.outcome.map_err(StoreError::Network)
    }
}

impl Transport for MockTransport {
    async fn get(&self, url: &str, query: &[(String, String)]) -> StoreResult<HttpReply> {
        let response = self.next(Method::Get, url, query);
        self.respond(response).await
    }

    async fn post_form(&self, url: &str, form: &[(String, String)]) -> StoreResult<HttpReply> {
        let response = self.next(Method::Post, url, form);
        self.respond(response).await
    }
}
