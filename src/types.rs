use bytes::Bytes;
use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::error::Result;

/// Entry of a typed (v2) listing; paths are already qualified
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypedEntry {
    pub path: String,
    #[serde(rename = "type")]
    pub entry_type: EntryType,
    /// Directories usually omit size and modified
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modified: Option<i64>,
}

/// Type of a typed listing entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryType {
    File,
    Directory,
}

/// Entry of a flat (legacy) listing; `path` is relative to the listed directory
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlatEntry {
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modified: Option<i64>,
}

/// Full file metadata returned by store and move calls
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileMetadata {
    pub modified: i64,
    pub size: i64,
}

/// Body of a store or move response
///
/// Older backends answer with a bare identifier string; when full info is
/// requested the body is a metadata object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StoreResponse {
    Metadata(FileMetadata),
    Identifier(String),
}

impl StoreResponse {
    pub fn metadata(&self) -> Option<FileMetadata> {
        match self {
            StoreResponse::Metadata(meta) => Some(*meta),
            StoreResponse::Identifier(_) => None,
        }
    }
}

/// Options for a store (put) call
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PutOptions {
    /// Whether an existing file at the path may be replaced
    pub overwrite: bool,
    /// Ask the backend for a `FileMetadata` body instead of an identifier
    pub full_info: bool,
}

/// Raw response of a content call, status checks are left to the caller
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: u16,
    pub status_text: String,
    pub body: Bytes,
}

impl ApiResponse {
    pub fn new(status: u16, status_text: impl Into<String>, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            status_text: status_text.into(),
            body: body.into(),
        }
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        Ok(serde_json::from_slice(&self.body)?)
    }
}
