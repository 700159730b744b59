//! Forwarding of `/api/` requests to the backend.
//!
//! A front end serving pages on its own origin passes API calls through
//! unchanged: same method, path, query, headers and body. The backend's
//! status, headers and body come back as-is.

use reqwest::{Method, StatusCode};

use wikinote_config::normalize_url;

use crate::client::ApiClient;
use crate::error::{ClientError, ClientResult};

pub const API_PREFIX: &str = "/api/";

/// Headers describing the hop to this server rather than the request itself.
const HOP_HEADERS: &[&str] = &["host", "connection", "content-length", "transfer-encoding"];

/// Backend URL for a front-end request path, or `None` if it isn't an API path.
pub fn backend_url(base_url: &str, path: &str, query: Option<&str>) -> Option<String> {
    if !path.starts_with(API_PREFIX) {
        return None;
    }
    let mut url = format!("{}{path}", normalize_url(base_url));
    if let Some(query) = query.map(|q| q.trim_start_matches('?')).filter(|q| !q.is_empty()) {
        url.push('?');
        url.push_str(query);
    }
    Some(url)
}

/// Whether a request with this method carries a body worth forwarding.
pub fn forwards_body(method: &Method) -> bool {
    *method != Method::GET && *method != Method::HEAD
}

#[derive(Debug, Clone)]
pub struct ProxyRequest {
    pub method: Method,
    pub path: String,
    pub query: Option<String>,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl ProxyRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: None,
            headers: Vec::new(),
            body: Vec::new(),
        }
    }

    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn with_body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = body.into();
        self
    }
}

#[derive(Debug, Clone)]
pub struct ProxyResponse {
    pub status: StatusCode,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl ProxyResponse {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

impl ApiClient {
    /// Replays `request` against the backend.
    ///
    /// Returns `Ok(None)` for paths outside `/api/`, which the caller serves
    /// itself. Any backend status, error statuses included, is returned as a
    /// response rather than an error.
    pub fn forward(&self, request: &ProxyRequest) -> ClientResult<Option<ProxyResponse>> {
        const OP: &str = "proxy request";
        let Some(url) = backend_url(self.base_url(), &request.path, request.query.as_deref())
        else {
            return Ok(None);
        };
        log::debug!("proxying {} {} -> {url}", request.method, request.path);

        let mut builder = self.http().request(request.method.clone(), &url);
        for (name, value) in &request.headers {
            if HOP_HEADERS.iter().any(|h| name.eq_ignore_ascii_case(h)) {
                continue;
            }
            builder = builder.header(name.as_str(), value.as_str());
        }
        if forwards_body(&request.method) {
            builder = builder.body(request.body.clone());
        }

        let response = builder
            .send()
            .map_err(|source| ClientError::Transport {
                operation: OP,
                source,
            })?;
        let status = response.status();
        let headers = response
            .headers()
            .iter()
            .map(|(name, value)| {
                (
                    name.as_str().to_string(),
                    String::from_utf8_lossy(value.as_bytes()).into_owned(),
                )
            })
            .collect();
        let body = response
            .bytes()
            .map_err(|source| ClientError::Transport {
                operation: OP,
                source,
            })?
            .to_vec();

        Ok(Some(ProxyResponse {
            status,
            headers,
            body,
        }))
    }
}
