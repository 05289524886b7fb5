//! Client for the Oryx configurator's GraphQL API

use std::path::{Path, PathBuf};

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::error::FetchError;

pub const ORYX_ENDPOINT: &str = "https://oryx.zsa.io/graphql";
pub const DEFAULT_GEOMETRY: &str = "ergodox-ez";
/// Oryx resolves this to the newest revision of a layout
pub const LATEST_REVISION: &str = "latest";

const GET_LAYOUT_QUERY: &str = r#"query getLayout($hashId: String!, $revisionId: String!, $geometry: String) {
  Layout(hashId: $hashId, geometry: $geometry, revisionId: $revisionId) {
    ...LayoutData
    __typename
  }
}

fragment LayoutData on Layout {
  title
  revision {
    ...RevisionData
    __typename
  }
  lastRevisionCompiled
  isLatestRevision
  __typename
}

fragment RevisionData on Revision {
  createdAt
  hashId
  model
  title
  zipUrl
  qmkVersion
  qmkUptodate
  __typename
}
"#;

#[derive(Debug, Serialize)]
struct GraphQlRequest<'a> {
    query: &'a str,
    variables: LayoutVariables<'a>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct LayoutVariables<'a> {
    hash_id: &'a str,
    revision_id: &'a str,
    geometry: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
struct GraphQlResponse<T> {
    data: Option<T>,
    #[serde(default)]
    errors: Vec<GraphQlError>,
}

#[derive(Debug, Deserialize)]
struct GraphQlError {
    message: String,
}

#[derive(Debug, Deserialize)]
struct LayoutData {
    #[serde(rename = "Layout")]
    layout: Option<Layout>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Layout {
    pub title: Option<String>,
    pub revision: Option<Revision>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Revision {
    pub hash_id: String,
    pub zip_url: Option<String>,
    pub qmk_version: Option<String>,
}

impl Layout {
    /// Url of the revision's source archive
    pub fn zip_url(&self) -> Option<&str> {
        self.revision.as_ref().and_then(|r| r.zip_url.as_deref())
    }
}

pub struct OryxClient {
    http: reqwest::Client,
    endpoint: String,
}

impl OryxClient {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: endpoint.into(),
        }
    }

    /// Latest revision of the layout `hash_id`
    pub async fn layout(&self, hash_id: &str, geometry: &str) -> Result<Layout, FetchError> {
        let request = GraphQlRequest {
            query: GET_LAYOUT_QUERY,
            variables: LayoutVariables {
                hash_id,
                revision_id: LATEST_REVISION,
                geometry: Some(geometry),
            },
        };
        debug!("Querying layout {} ({}) from {}", hash_id, geometry, self.endpoint);

        let response: GraphQlResponse<LayoutData> = self
            .http
            .post(&self.endpoint)
            .json(&request)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|source| http_error(&self.endpoint, source))?
            .json()
            .await
            .map_err(|source| http_error(&self.endpoint, source))?;

        layout_from_response(response, hash_id)
    }

    /// Download `url` into `directory`, keeping the url's file name
    pub async fn download(&self, url: &str, directory: &Path) -> Result<PathBuf, FetchError> {
        let path = directory.join(crate::sync::zip_basename(url)?);
        info!("Downloading {} to {}", url, path.display());

        let bytes = self
            .http
            .get(url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|source| http_error(url, source))?
            .bytes()
            .await
            .map_err(|source| http_error(url, source))?;
        tokio::fs::write(&path, &bytes).await.map_err(FetchError::io(&path))?;
        Ok(path)
    }
}

fn http_error(url: &str, source: reqwest::Error) -> FetchError {
    FetchError::Http {
        url: url.to_string(),
        source,
    }
}

fn layout_from_response(response: GraphQlResponse<LayoutData>, hash_id: &str) -> Result<Layout, FetchError> {
    if !response.errors.is_empty() {
        let messages: Vec<&str> = response.errors.iter().map(|e| e.message.as_str()).collect();
        return Err(FetchError::GraphQl(messages.join("; ")));
    }
    response
        .data
        .and_then(|d| d.layout)
        .ok_or_else(|| FetchError::LayoutNotFound(hash_id.to_string()))
}
