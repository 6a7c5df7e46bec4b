//! Project records and where they come from

use crate::{Result, TenderError};
use async_trait::async_trait;
use log::debug;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::path::PathBuf;

pub const PROJECT_NAME_PLACEHOLDER: &str = "[Project Name]";
pub const SITE_PLACEHOLDER: &str = "[Site Address]";
pub const CLIENT_PLACEHOLDER: &str = "[Client Name]";

/// Record identifier as sent by the console, numeric or text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    Number(i64),
    Text(String),
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordId::Number(n) => write!(f, "{n}"),
            RecordId::Text(s) => f.write_str(s),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ClientRef {
    pub company_name: Option<String>,
}

/// One project as stored by the console
///
/// Every field may be missing; the accessors substitute placeholders.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ProjectRecord {
    pub id: Option<RecordId>,
    pub project_name: Option<String>,
    pub site_location: Option<String>,
    pub client: Option<ClientRef>,
    pub rates: Option<Vec<Value>>,
    pub materials: Option<Vec<Value>>,
}

fn or_placeholder<'a>(value: Option<&'a str>, placeholder: &'a str) -> &'a str {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => v,
        _ => placeholder,
    }
}

impl ProjectRecord {
    pub fn project_name(&self) -> &str {
        or_placeholder(self.project_name.as_deref(), PROJECT_NAME_PLACEHOLDER)
    }

    pub fn site_location(&self) -> &str {
        or_placeholder(self.site_location.as_deref(), SITE_PLACEHOLDER)
    }

    pub fn client_name(&self) -> &str {
        or_placeholder(
            self.client.as_ref().and_then(|c| c.company_name.as_deref()),
            CLIENT_PLACEHOLDER,
        )
    }
}

/// Resolves project ids to records
#[async_trait]
pub trait ProjectSource: Send + Sync {
    /// Fetch a record; `Ok(None)` when the id is unknown
    async fn fetch(&self, project_id: &str) -> Result<Option<ProjectRecord>>;
}

/// Fetches records from the console API with `GET {base_url}/projects/{id}`
#[derive(Debug, Clone)]
pub struct HttpProjectSource {
    client: reqwest::Client,
    base_url: String,
}

impl HttpProjectSource {
    pub fn new(base_url: &str) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(client: reqwest::Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn project_url(&self, project_id: &str) -> String {
        format!("{}/projects/{}", self.base_url, project_id)
    }
}

#[async_trait]
impl ProjectSource for HttpProjectSource {
    async fn fetch(&self, project_id: &str) -> Result<Option<ProjectRecord>> {
        let url = self.project_url(project_id);
        debug!("GET {url}");

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(TenderError::Source(format!("GET {url} returned {status}")));
        }

        // a null body also means the record does not exist
        Ok(response.json::<Option<ProjectRecord>>().await?)
    }
}

/// Reads records from `{dir}/{id}.json`
#[derive(Debug, Clone)]
pub struct DirProjectSource {
    dir: PathBuf,
}

impl DirProjectSource {
    pub fn new<P: Into<PathBuf>>(dir: P) -> Self {
        Self { dir: dir.into() }
    }
}

#[async_trait]
impl ProjectSource for DirProjectSource {
    async fn fetch(&self, project_id: &str) -> Result<Option<ProjectRecord>> {
        if project_id.is_empty()
            || project_id.contains(['/', '\\'])
            || project_id.contains("..")
        {
            return Err(TenderError::Source(format!(
                "invalid project id {project_id:?}"
            )));
        }

        let path = self.dir.join(format!("{project_id}.json"));
        let json = match tokio::fs::read_to_string(&path).await {
            Ok(json) => json,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        Ok(serde_json::from_str::<Option<ProjectRecord>>(&json)?)
    }
}
