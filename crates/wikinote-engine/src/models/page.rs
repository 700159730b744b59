use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Backend-assigned page identifier.
///
/// Opaque to the client apart from ordering, which is used to break ties
/// between pages that share a name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PageId(pub i64);

impl fmt::Display for PageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl From<i64> for PageId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl std::str::FromStr for PageId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(Self)
    }
}

/// A wiki page as served by the backend.
///
/// The client only ever holds read-through copies; the backend owns the record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    pub id: PageId,
    pub name: String,
    #[serde(default)]
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Page {
    /// Create a page stamped with the current time
    pub fn new(id: i64, name: impl Into<String>, content: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: PageId(id),
            name: name.into(),
            content: content.into(),
            created_at: now,
            updated_at: now,
        }
    }
}

/// Body of `POST /api/page`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatePageRequest {
    pub name: String,
    pub content: String,
}

impl CreatePageRequest {
    pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }
}

/// Body of `PATCH /api/page/{id}`. Absent fields are left untouched by the backend.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdatePageRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

impl UpdatePageRequest {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.content.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn deserializes_backend_page() {
        let json = r#"{
            "id": 7,
            "name": "Home",
            "content": "Welcome to [[Start]]",
            "created_at": "2024-03-01T10:00:00.123456Z",
            "updated_at": "2024-03-02T11:30:00+01:00"
        }"#;

        let page: Page = serde_json::from_str(json).unwrap();

        assert_eq!(page.id, PageId(7));
        assert_eq!(page.name, "Home");
        assert_eq!(page.content, "Welcome to [[Start]]");
        assert_eq!(page.updated_at.to_rfc3339(), "2024-03-02T10:30:00+00:00");
    }

    #[test]
    fn update_request_omits_absent_fields() {
        let req = UpdatePageRequest {
            name: None,
            content: Some("new body".to_string()),
        };

        let json = serde_json::to_string(&req).unwrap();

        assert_eq!(json, r#"{"content":"new body"}"#);
        assert!(!req.is_empty());
        assert!(UpdatePageRequest::default().is_empty());
    }

    #[test]
    fn page_id_parses_from_route_params() {
        assert_eq!(" 42".parse::<PageId>().unwrap(), PageId(42));
        assert!("abc".parse::<PageId>().is_err());
        assert_eq!(PageId(42).to_string(), "42");
    }
}
