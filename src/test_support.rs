use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::{
    api::DataApi,
    error::{Result, StoreError},
    types::{ApiResponse, FileMetadata, FlatEntry, PutOptions, StoreResponse, TypedEntry},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    ListFlat(String),
    ListTyped(String),
    Get(String),
    Put { path: String, overwrite: bool },
    Delete(String),
    Move(String, String),
}

#[derive(Default)]
struct State {
    files: HashMap<String, (String, i64)>,
    typed: Vec<TypedEntry>,
    flat: Vec<FlatEntry>,
    calls: Vec<Call>,
    clock: i64,
    identifier_only: bool,
    move_metadata: Option<FileMetadata>,
    fail_listing: bool,
}

/// In-memory data API that records every call
#[derive(Default)]
pub struct MockApi {
    state: Mutex<State>,
}

impl MockApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_file(&self, path: &str, content: &str, modified: i64) {
        let mut state = self.state.lock().unwrap();
        state
            .files
            .insert(path.to_string(), (content.to_string(), modified));
    }

    pub fn stored(&self, path: &str) -> Option<String> {
        let state = self.state.lock().unwrap();
        state.files.get(path).map(|(content, _)| content.clone())
    }

    pub fn set_typed_listing(&self, entries: Vec<TypedEntry>) {
        self.state.lock().unwrap().typed = entries;
    }

    pub fn set_flat_listing(&self, entries: Vec<FlatEntry>) {
        self.state.lock().unwrap().flat = entries;
    }

    pub fn fail_listing(&self) {
        self.state.lock().unwrap().fail_listing = true;
    }

    pub fn respond_with_identifier(&self) {
        self.state.lock().unwrap().identifier_only = true;
    }

    pub fn set_move_metadata(&self, meta: FileMetadata) {
        self.state.lock().unwrap().move_metadata = Some(meta);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.state.lock().unwrap().calls.clear();
    }

    fn record(&self, call: Call) {
        self.state.lock().unwrap().calls.push(call);
    }
}

fn not_found() -> ApiResponse {
    ApiResponse::new(404, "Not Found", "")
}

fn metadata_response(body: &StoreResponse) -> ApiResponse {
    let json = serde_json::to_vec(body).unwrap();
    ApiResponse::new(200, "OK", json)
}

#[async_trait]
impl DataApi for MockApi {
    async fn list_flat(&self, directory: &str) -> Result<Vec<FlatEntry>> {
        self.record(Call::ListFlat(directory.to_string()));
        let state = self.state.lock().unwrap();
        if state.fail_listing {
            return Err(StoreError::unexpected_status("list", directory, 500, "Internal Server Error"));
        }
        Ok(state.flat.clone())
    }

    async fn list_typed(&self, path: &str) -> Result<Vec<TypedEntry>> {
        self.record(Call::ListTyped(path.to_string()));
        let state = self.state.lock().unwrap();
        if state.fail_listing {
            return Err(StoreError::unexpected_status("list", path, 500, "Internal Server Error"));
        }
        Ok(state.typed.clone())
    }

    async fn get(&self, path: &str) -> Result<ApiResponse> {
        self.record(Call::Get(path.to_string()));
        let state = self.state.lock().unwrap();
        Ok(match state.files.get(path) {
            Some((content, _)) => ApiResponse::new(200, "OK", content.clone()),
            None => not_found(),
        })
    }

    async fn put(&self, path: &str, content: &str, options: PutOptions) -> Result<ApiResponse> {
        self.record(Call::Put {
            path: path.to_string(),
            overwrite: options.overwrite,
        });
        let mut state = self.state.lock().unwrap();
        if !options.overwrite && state.files.contains_key(path) {
            return Ok(ApiResponse::new(409, "Conflict", ""));
        }

        state.clock += 1;
        let modified = 1000 + state.clock;
        state
            .files
            .insert(path.to_string(), (content.to_string(), modified));

        let body = if state.identifier_only || !options.full_info {
            StoreResponse::Identifier(path.to_string())
        } else {
            StoreResponse::Metadata(FileMetadata {
                modified,
                size: content.len() as i64,
            })
        };
        Ok(metadata_response(&body))
    }

    async fn delete(&self, path: &str) -> Result<ApiResponse> {
        self.record(Call::Delete(path.to_string()));
        let mut state = self.state.lock().unwrap();
        Ok(match state.files.remove(path) {
            Some(_) => ApiResponse::new(204, "No Content", ""),
            None => not_found(),
        })
    }

    async fn move_file(&self, old_path: &str, new_path: &str) -> Result<ApiResponse> {
        self.record(Call::Move(old_path.to_string(), new_path.to_string()));
        let mut state = self.state.lock().unwrap();
        let Some((content, modified)) = state.files.remove(old_path) else {
            return Ok(not_found());
        };

        let meta = state.move_metadata.unwrap_or(FileMetadata {
            modified,
            size: content.len() as i64,
        });
        state.files.insert(new_path.to_string(), (content, modified));
        Ok(metadata_response(&StoreResponse::Metadata(meta)))
    }

    fn identifier(&self) -> String {
        "mock".to_string()
    }
}
