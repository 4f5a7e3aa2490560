pub mod api;
pub mod collection;
pub mod config;
pub mod entity;
pub mod error;
pub mod http;
pub mod path;
pub mod sync;
pub mod tree;
pub mod types;

#[cfg(test)]
mod test_support;

pub use api::DataApi;
pub use collection::{exclude_temporary, Exclusion, FileCollection};
pub use config::ApiConfig;
pub use entity::{Loaded, RemoteFile, SavedAs, TEMPORARY_SIZE};
pub use error::{Result, StoreError};
pub use http::HttpDataApi;
pub use path::PathParts;
pub use sync::{ListedItem, SyncReport};
pub use tree::{build_tree, NodeKind, TreeNode};
pub use types::{
    ApiResponse, EntryType, FileMetadata, FlatEntry, PutOptions, StoreResponse, TypedEntry,
};
