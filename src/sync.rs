use std::collections::{BTreeSet, HashMap, HashSet};
use std::future::Future;
use std::sync::Arc;

use tracing::{debug, info};

use crate::{
    api::DataApi,
    entity::RemoteFile,
    error::Result,
    path,
    types::{EntryType, FlatEntry, TypedEntry},
};

/// Listing entry reduced to what reconciliation needs
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListedItem {
    File {
        path: String,
        last_modified: i64,
        size: i64,
    },
    Directory(String),
}

impl ListedItem {
    /// Map a typed entry, whose path is already qualified
    pub fn from_typed(entry: TypedEntry) -> Self {
        match entry.entry_type {
            EntryType::Directory => ListedItem::Directory(entry.path),
            EntryType::File => ListedItem::File {
                path: entry.path,
                last_modified: entry.modified.unwrap_or_default(),
                size: entry.size.unwrap_or_default(),
            },
        }
    }

    /// Map a flat entry, qualifying its path with the listed directory
    pub fn from_flat(directory: &str, entry: FlatEntry) -> Self {
        ListedItem::File {
            path: path::join(directory, &entry.path),
            last_modified: entry.modified.unwrap_or_default(),
            size: entry.size.unwrap_or_default(),
        }
    }
}

/// What a reconciliation changed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncReport {
    pub added: usize,
    pub updated: usize,
    pub removed: usize,
    /// Empty directories reported by the listing
    pub directories: usize,
}

/// Tracked directory set and the part of it a listing is authoritative for
pub(crate) struct DirectoryScope<'a> {
    pub set: &'a mut BTreeSet<String>,
    pub scope: &'a str,
}

/// Reconcile `files` against the listing produced by `fetch`
///
/// Nothing is touched until the listing has arrived, so a failed fetch leaves
/// the collection as it was. Files accepted by `exclude` are neither updated
/// nor removed.
pub(crate) async fn reconcile<E, Fut, M>(
    api: &Arc<dyn DataApi>,
    files: &mut HashMap<String, RemoteFile>,
    fetch: Fut,
    to_item: M,
    exclude: &(dyn Fn(&RemoteFile) -> bool + Send + Sync),
    directories: Option<DirectoryScope<'_>>,
) -> Result<SyncReport>
where
    Fut: Future<Output = Result<Vec<E>>>,
    M: Fn(E) -> ListedItem,
{
    let entries = fetch.await?;

    let mut report = SyncReport::default();
    let mut listed_files = HashSet::new();
    let mut listed_dirs = Vec::new();

    for item in entries.into_iter().map(to_item) {
        match item {
            ListedItem::Directory(dir) => listed_dirs.push(dir),
            ListedItem::File {
                path,
                last_modified,
                size,
            } => {
                match files.get_mut(&path) {
                    None => {
                        let file =
                            RemoteFile::from_listing(Arc::clone(api), path.clone(), last_modified, size);
                        files.insert(path.clone(), file);
                        report.added += 1;
                    }
                    Some(file) => {
                        if exclude(file) {
                            debug!(path = %path, "excluded from sync update");
                        } else {
                            file.refresh_from_listing(last_modified, size);
                            report.updated += 1;
                        }
                    }
                }
                listed_files.insert(path);
            }
        }
    }

    let before = files.len();
    files.retain(|path, file| exclude(file) || listed_files.contains(path));
    report.removed = before - files.len();

    report.directories = listed_dirs.len();
    if let Some(DirectoryScope { set, scope }) = directories {
        set.retain(|dir| !path::is_within(dir, scope));
        set.extend(listed_dirs);
    }

    info!(
        added = report.added,
        updated = report.updated,
        removed = report.removed,
        directories = report.directories,
        "sync complete"
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_typed_mapping() {
        let file = TypedEntry {
            path: "dir/file1.txt".to_string(),
            entry_type: EntryType::File,
            size: Some(100),
            modified: Some(123),
        };
        assert_eq!(
            ListedItem::from_typed(file),
            ListedItem::File {
                path: "dir/file1.txt".to_string(),
                last_modified: 123,
                size: 100
            }
        );

        let dir = TypedEntry {
            path: "dir/subdir".to_string(),
            entry_type: EntryType::Directory,
            size: None,
            modified: None,
        };
        assert_eq!(
            ListedItem::from_typed(dir),
            ListedItem::Directory("dir/subdir".to_string())
        );
    }

    #[test]
    fn test_flat_mapping_prefixes_directory() {
        let entry = FlatEntry {
            path: "notes.md".to_string(),
            size: Some(5),
            modified: None,
        };
        assert_eq!(
            ListedItem::from_flat("journal", entry),
            ListedItem::File {
                path: "journal/notes.md".to_string(),
                last_modified: 0,
                size: 5
            }
        );
    }
}
