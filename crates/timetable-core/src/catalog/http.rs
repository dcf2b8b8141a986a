//! HTTP client for the course catalog service.
//!
//! Routes under the configured base URL:
//! - `GET courses` - the full catalog
//! - `GET courses/search?query=..` - free-text search
//! - `GET courses/<subject>` - offerings of one subject
//!
//! Every route answers `{"message": "...", "courses": [...]}`.

use reqwest::Client;
use serde::Deserialize;
use url::Url;

use super::ingest::{ingest_values, IngestReport};
use crate::error::CatalogError;

#[derive(Debug, Deserialize)]
struct CoursesPayload {
    #[serde(default)]
    message: Option<String>,
    courses: Vec<serde_json::Value>,
}

pub struct HttpCatalog {
    base: Url,
    client: Client,
}

impl HttpCatalog {
    /// # Errors
    /// Returns [`CatalogError::InvalidUrl`] if `base_url` is not an absolute
    /// http(s) URL.
    pub fn new(base_url: &str) -> Result<Self, CatalogError> {
        let mut base = Url::parse(base_url).map_err(|e| CatalogError::InvalidUrl {
            url: base_url.to_string(),
            message: e.to_string(),
        })?;
        if base.scheme() != "http" && base.scheme() != "https" {
            return Err(CatalogError::InvalidUrl {
                url: base_url.to_string(),
                message: "scheme must be http or https".to_string(),
            });
        }
        // `join` replaces the last path segment unless the base ends in '/'
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        Ok(Self {
            base,
            client: Client::new(),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    fn endpoint(&self, path: &str) -> Result<Url, CatalogError> {
        self.base.join(path).map_err(|e| CatalogError::InvalidUrl {
            url: format!("{}{path}", self.base),
            message: e.to_string(),
        })
    }

    async fn get_courses(&self, url: Url) -> Result<IngestReport, CatalogError> {
        tracing::debug!(%url, "requesting catalog");
        let resp = self.client.get(url.clone()).send().await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(CatalogError::Server {
                status: status.as_u16(),
                body,
            });
        }

        let text = resp.text().await?;
        let payload: CoursesPayload =
            serde_json::from_str(&text).map_err(|e| CatalogError::Decode(e.to_string()))?;
        if let Some(message) = payload.message.as_deref() {
            tracing::debug!(%url, server_message = message, "catalog server message");
        }

        let report = ingest_values(payload.courses);
        tracing::info!(
            %url,
            accepted = report.accepted.len(),
            rejected = report.rejected.len(),
            "catalog response ingested"
        );
        Ok(report)
    }

    /// Fetch and validate the full catalog.
    ///
    /// # Errors
    /// [`CatalogError::Network`] on transport failure, [`CatalogError::Server`]
    /// on a non-2xx status, [`CatalogError::Decode`] if the body is not a
    /// catalog payload. Individual bad records are reported, not raised.
    pub async fn fetch_catalog(&self) -> Result<IngestReport, CatalogError> {
        let url = self.endpoint("courses")?;
        self.get_courses(url).await
    }

    /// Server-side search over course name, staff and id.
    ///
    /// # Errors
    /// Same as [`HttpCatalog::fetch_catalog`].
    pub async fn search(&self, query: &str) -> Result<IngestReport, CatalogError> {
        let mut url = self.endpoint("courses/search")?;
        url.query_pairs_mut().append_pair("query", query);
        self.get_courses(url).await
    }

    /// Offerings of one subject.
    ///
    /// # Errors
    /// Same as [`HttpCatalog::fetch_catalog`].
    pub async fn by_subject(&self, course_name: &str) -> Result<IngestReport, CatalogError> {
        let mut url = self.endpoint("courses/")?;
        url.path_segments_mut()
            .map_err(|()| CatalogError::InvalidUrl {
                url: self.base.to_string(),
                message: "base URL cannot carry a path".to_string(),
            })?
            .pop_if_empty()
            .push(course_name);
        self.get_courses(url).await
    }
}
