//! Request parameter types for the file API.

use std::str::FromStr;

use serde::Serialize;

use crate::FilesError;

/// Largest page size the listing endpoint accepts.
pub const MAX_LIST_LIMIT: u32 = 100;

/// Related data to embed in a file listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Include {
    #[default]
    Owner,
    UploadKey,
    Shares,
    Activity,
}

impl Include {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Owner => "owner",
            Self::UploadKey => "uploadKey",
            Self::Shares => "shares",
            Self::Activity => "activity",
        }
    }
}

impl FromStr for Include {
    type Err = FilesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "owner" => Ok(Self::Owner),
            "uploadKey" => Ok(Self::UploadKey),
            "shares" => Ok(Self::Shares),
            "activity" => Ok(Self::Activity),
            other => Err(FilesError::InvalidParameter(format!("include: {other}"))),
        }
    }
}

/// How multiple search terms combine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchJoin {
    Or,
    #[default]
    And,
}

impl SearchJoin {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Or => "or",
            Self::And => "and",
        }
    }
}

impl FromStr for SearchJoin {
    type Err = FilesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "or" => Ok(Self::Or),
            "and" => Ok(Self::And),
            other => Err(FilesError::InvalidParameter(format!("searchJoin: {other}"))),
        }
    }
}

/// File listing filters. Unset fields use the server-side defaults the SDK
/// has always sent: `include=owner`, `limit=100`, `searchJoin=and`.
#[derive(Debug, Clone, Default)]
pub struct ListQuery {
    pub include: Option<Include>,
    pub search: Option<String>,
    pub limit: Option<u32>,
    pub search_join: Option<SearchJoin>,
}

impl ListQuery {
    pub fn include(mut self, include: Include) -> Self {
        self.include = Some(include);
        self
    }

    pub fn search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn search_join(mut self, join: SearchJoin) -> Self {
        self.search_join = Some(join);
        self
    }

    /// Resolves defaults and checks `1 <= limit <= 100`.
    pub(crate) fn to_params(&self) -> Result<Vec<(String, String)>, FilesError> {
        let limit = self.limit.unwrap_or(MAX_LIST_LIMIT);
        if !(1..=MAX_LIST_LIMIT).contains(&limit) {
            return Err(FilesError::InvalidParameter(format!("limit: {limit}")));
        }

        let mut params = vec![
            (
                "include".to_string(),
                self.include.unwrap_or_default().as_str().to_string(),
            ),
            ("limit".to_string(), limit.to_string()),
            (
                "searchJoin".to_string(),
                self.search_join.unwrap_or_default().as_str().to_string(),
            ),
        ];
        if let Some(search) = &self.search {
            params.push(("search".to_string(), search.clone()));
        }
        Ok(params)
    }
}

/// Metadata changes for a file. Unset fields are left untouched.
#[derive(Debug, Clone, Default, Serialize)]
pub struct FileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visibility: Option<String>,
}

/// Credentials and byte range for a raw download.
#[derive(Debug, Clone)]
pub struct RawDownload {
    /// `Range` header value, e.g. `bytes=0-1023`.
    pub range: String,
    pub token: String,
    pub dl_token: String,
    pub dl_expiry: String,
}
