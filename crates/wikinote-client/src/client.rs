//! Blocking client for the wiki backend.
//!
//! One method per backend endpoint. Every non-2xx answer becomes a
//! [`ClientError`] naming the failed operation, except a 404 from the
//! by-name lookup, which is the ordinary "no such page" result.

use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::{StatusCode, Url};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use wikinote_config::{Config, normalize_url};
use wikinote_engine::{CreatePageRequest, Page, PageId, UpdatePageRequest};

use crate::error::{ClientError, ClientResult};

/// Error payload the backend sends with a rejected request.
#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: &str) -> ClientResult<Self> {
        let base_url = normalize_url(base_url);
        let parsed = Url::parse(&base_url).map_err(|e| ClientError::InvalidUrl {
            url: base_url.clone(),
            reason: e.to_string(),
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ClientError::InvalidUrl {
                url: base_url,
                reason: format!("unsupported scheme {:?}", parsed.scheme()),
            });
        }

        Ok(Self {
            http: Client::new(),
            base_url,
        })
    }

    pub fn from_config(config: &Config) -> ClientResult<Self> {
        Self::new(&config.api_url)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub(crate) fn http(&self) -> &Client {
        &self.http
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// `GET /api/pages`
    pub fn list_pages(&self) -> ClientResult<Vec<Page>> {
        const OP: &str = "fetch pages";
        let response = send(OP, self.http.get(self.url("/api/pages")))?;
        let body = success_body(OP, response)?;
        decode_page_list(OP, &body)
    }

    /// `GET /api/page/{id}`
    pub fn get_page(&self, id: PageId) -> ClientResult<Page> {
        const OP: &str = "fetch page";
        let response = send(OP, self.http.get(self.url(&format!("/api/page/{id}"))))?;
        let body = success_body(OP, response)?;
        decode(OP, &body)
    }

    /// `GET /api/page/by-name/{name}`; `Ok(None)` when the backend answers 404.
    pub fn get_page_by_name(&self, name: &str) -> ClientResult<Option<Page>> {
        const OP: &str = "fetch page";
        let path = format!("/api/page/by-name/{}", urlencoding::encode(name));
        let response = send(OP, self.http.get(self.url(&path)))?;
        if response.status() == StatusCode::NOT_FOUND {
            log::debug!("no page named {name:?}");
            return Ok(None);
        }
        let body = success_body(OP, response)?;
        decode(OP, &body).map(Some)
    }

    /// `POST /api/page`
    pub fn create_page(&self, request: &CreatePageRequest) -> ClientResult<Page> {
        const OP: &str = "create page";
        let response = send(OP, self.http.post(self.url("/api/page")).json(request))?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(rejection(OP, status, &body));
        }
        let body = read_text(OP, response)?;
        decode(OP, &body)
    }

    /// `PATCH /api/page/{id}`
    pub fn update_page(&self, id: PageId, request: &UpdatePageRequest) -> ClientResult<Page> {
        const OP: &str = "update page";
        let url = self.url(&format!("/api/page/{id}"));
        let response = send(OP, self.http.patch(url).json(request))?;
        let body = success_body(OP, response)?;
        decode(OP, &body)
    }

    /// `DELETE /api/page/{id}`
    pub fn delete_page(&self, id: PageId) -> ClientResult<()> {
        const OP: &str = "delete page";
        let response = send(OP, self.http.delete(self.url(&format!("/api/page/{id}"))))?;
        success_body(OP, response).map(|_| ())
    }

    /// `GET /api/page/{id}/backlinks`; a `null` body is an empty list.
    pub fn get_backlinks(&self, id: PageId) -> ClientResult<Vec<Page>> {
        const OP: &str = "fetch backlinks";
        let url = self.url(&format!("/api/page/{id}/backlinks"));
        let response = send(OP, self.http.get(url))?;
        let body = success_body(OP, response)?;
        decode_page_list(OP, &body)
    }
}

fn send(operation: &'static str, request: RequestBuilder) -> ClientResult<Response> {
    let response = request
        .send()
        .map_err(|source| ClientError::Transport { operation, source })?;
    log::debug!("{operation}: {} {}", response.status(), response.url());
    Ok(response)
}

fn read_text(operation: &'static str, response: Response) -> ClientResult<String> {
    response
        .text()
        .map_err(|source| ClientError::Transport { operation, source })
}

fn success_body(operation: &'static str, response: Response) -> ClientResult<String> {
    let status = response.status();
    if !status.is_success() {
        return Err(ClientError::Status { operation, status });
    }
    read_text(operation, response)
}

fn rejection(operation: &'static str, status: StatusCode, body: &str) -> ClientError {
    match serde_json::from_str::<ErrorBody>(body) {
        Ok(ErrorBody { error }) if !error.is_empty() => ClientError::Rejected {
            operation,
            status,
            message: error,
        },
        _ => ClientError::Status { operation, status },
    }
}

pub(crate) fn decode<T: DeserializeOwned>(operation: &'static str, body: &str) -> ClientResult<T> {
    serde_json::from_str(body).map_err(|source| ClientError::Decode { operation, source })
}

/// Decodes a page array, treating `null`, an empty body or any non-array
/// value as no pages.
pub(crate) fn decode_page_list(operation: &'static str, body: &str) -> ClientResult<Vec<Page>> {
    if body.trim().is_empty() {
        return Ok(Vec::new());
    }
    match decode::<Value>(operation, body)? {
        value @ Value::Array(_) => serde_json::from_value(value)
            .map_err(|source| ClientError::Decode { operation, source }),
        other => {
            log::warn!("{operation}: expected a page list, got {other}; treating as empty");
            Ok(Vec::new())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const PAGE_JSON: &str = r#"{"id":1,"name":"Home","content":"","created_at":"2024-01-01T00:00:00Z","updated_at":"2024-01-01T00:00:00Z"}"#;

    #[test]
    fn null_page_list_is_empty() {
        assert!(decode_page_list("fetch backlinks", "null").unwrap().is_empty());
        assert!(decode_page_list("fetch backlinks", "").unwrap().is_empty());
        assert!(decode_page_list("fetch backlinks", "{}").unwrap().is_empty());
    }

    #[test]
    fn page_list_decodes_array() {
        let pages = decode_page_list("fetch pages", &format!("[{PAGE_JSON}]")).unwrap();
        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0].name, "Home");
    }

    #[test]
    fn malformed_array_is_a_decode_error() {
        let err = decode_page_list("fetch pages", r#"[{"id":"x"}]"#).unwrap_err();
        assert!(matches!(err, ClientError::Decode { operation: "fetch pages", .. }));
    }

    #[test]
    fn rejection_carries_backend_message() {
        let err = rejection(
            "create page",
            StatusCode::CONFLICT,
            r#"{"error":"Page with this name already exists"}"#,
        );

        assert_eq!(
            err.to_string(),
            "Failed to create page: Page with this name already exists"
        );
        assert_eq!(err.status(), Some(StatusCode::CONFLICT));
    }

    #[test]
    fn rejection_without_message_is_generic() {
        let err = rejection("create page", StatusCode::BAD_GATEWAY, "<html>oops</html>");
        assert!(matches!(err, ClientError::Status { .. }));
        assert_eq!(err.to_string(), "Failed to create page: HTTP 502 Bad Gateway");
    }

    #[test]
    fn base_url_is_normalized() {
        let client = ApiClient::new("http://localhost:8080/").unwrap();
        assert_eq!(client.base_url(), "http://localhost:8080");
        assert_eq!(client.url("/api/pages"), "http://localhost:8080/api/pages");
    }

    #[test]
    fn rejects_unusable_base_urls() {
        assert!(matches!(
            ApiClient::new("not a url"),
            Err(ClientError::InvalidUrl { .. })
        ));
        assert!(matches!(
            ApiClient::new("ftp://wiki"),
            Err(ClientError::InvalidUrl { .. })
        ));
    }
}
