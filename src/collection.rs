use std::collections::hash_map::Entry;
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use crate::{
    api::DataApi,
    entity::{RemoteFile, SavedAs},
    error::{Result, StoreError},
    sync::{reconcile, DirectoryScope, ListedItem, SyncReport},
    tree::{build_tree, TreeNode},
};

/// Predicate protecting files from being updated or removed by a sync
pub type Exclusion = Box<dyn Fn(&RemoteFile) -> bool + Send + Sync>;

/// Exclusion that keeps unsaved (temporary) files out of reconciliation
pub fn exclude_temporary(file: &RemoteFile) -> bool {
    file.is_temporary()
}

/// In-memory mirror of the remote store, keyed by path
///
/// Besides the files it tracks directories that a listing reported but that
/// hold no files, so empty folders still show up in [`tree`](Self::tree).
/// Views are computed from the current state on every call.
///
/// Rename, save-as and delete through the collection keep the map keyed by
/// each file's current path. Calling those operations on a file obtained
/// from [`get_mut`](Self::get_mut) works too, but the old key then remains
/// until the next sync.
pub struct FileCollection {
    api: Arc<dyn DataApi>,
    files: HashMap<String, RemoteFile>,
    directories: BTreeSet<String>,
    exclude: Exclusion,
}

impl FileCollection {
    /// Create an empty collection that excludes nothing from sync
    pub fn new(api: Arc<dyn DataApi>) -> Self {
        Self {
            api,
            files: HashMap::new(),
            directories: BTreeSet::new(),
            exclude: Box::new(|_| false),
        }
    }

    pub fn with_exclusion<F>(mut self, exclude: F) -> Self
    where
        F: Fn(&RemoteFile) -> bool + Send + Sync + 'static,
    {
        self.exclude = Box::new(exclude);
        self
    }

    pub fn api(&self) -> &Arc<dyn DataApi> {
        &self.api
    }

    pub fn get(&self, path: &str) -> Option<&RemoteFile> {
        self.files.get(path)
    }

    pub fn get_mut(&mut self, path: &str) -> Option<&mut RemoteFile> {
        self.files.get_mut(path)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.files.contains_key(path)
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Insert a file under its key, replacing any file already there
    pub fn insert(&mut self, file: RemoteFile) -> &mut RemoteFile {
        match self.files.entry(file.key().to_string()) {
            Entry::Occupied(mut slot) => {
                slot.insert(file);
                slot.into_mut()
            }
            Entry::Vacant(slot) => slot.insert(file),
        }
    }

    pub fn remove(&mut self, path: &str) -> Option<RemoteFile> {
        self.files.remove(path)
    }

    /// Add a file that is not yet written to the remote store
    pub fn create_temporary(
        &mut self,
        path: impl Into<String>,
        content: impl Into<String>,
    ) -> &mut RemoteFile {
        let file = RemoteFile::create_temporary(Arc::clone(&self.api), path, content);
        self.insert(file)
    }

    /// Rename a file and re-key it under its new path
    ///
    /// Fails without touching anything when another file is tracked at
    /// `new_path`.
    pub async fn rename(&mut self, path: &str, new_path: &str) -> Result<&mut RemoteFile> {
        self.ensure_free(path, new_path)?;
        let mut file = self.take(path)?;
        let renamed = file.rename(new_path).await.map(|_| ());
        let file = self.insert(file);
        renamed.map(|_| file)
    }

    /// Save a file under a new path and track the result
    ///
    /// A persisted original stays in the collection next to the new file.
    pub async fn save_as(&mut self, path: &str, new_path: &str) -> Result<&mut RemoteFile> {
        self.ensure_free(path, new_path)?;
        let mut file = self.take(path)?;
        let saved = file.save_as(new_path).await.map(|saved| match saved {
            SavedAs::Moved(_) => None,
            SavedAs::Copied(copy) => Some(copy),
        });

        match saved {
            Ok(Some(copy)) => {
                self.insert(file);
                Ok(self.insert(copy))
            }
            Ok(None) => Ok(self.insert(file)),
            Err(err) => {
                self.insert(file);
                Err(err)
            }
        }
    }

    /// Delete a file remotely and drop it from the collection
    pub async fn delete(&mut self, path: &str) -> Result<RemoteFile> {
        let file = self.files.get(path).ok_or_else(|| missing(path))?;
        file.delete().await?;
        self.files.remove(path).ok_or_else(|| missing(path))
    }

    fn ensure_free(&self, path: &str, new_path: &str) -> Result<()> {
        if path != new_path && self.files.contains_key(new_path) {
            return Err(StoreError::PathTaken {
                path: new_path.to_string(),
            });
        }
        Ok(())
    }

    fn take(&mut self, path: &str) -> Result<RemoteFile> {
        self.files.remove(path).ok_or_else(|| missing(path))
    }

    /// Reconcile with the typed listing of `directory`
    ///
    /// Files are added, refreshed (dropping their cached content) or removed
    /// to match the listing. Tracked empty directories at or below
    /// `directory` are replaced by the ones the listing reports.
    pub async fn sync(&mut self, directory: &str) -> Result<SyncReport> {
        let scope = DirectoryScope {
            set: &mut self.directories,
            scope: directory,
        };
        reconcile(
            &self.api,
            &mut self.files,
            self.api.list_typed(directory),
            ListedItem::from_typed,
            &*self.exclude,
            Some(scope),
        )
        .await
    }

    /// Reconcile with the flat listing of `directory`, without directory tracking
    pub async fn sync_flat(&mut self, directory: &str) -> Result<SyncReport> {
        reconcile(
            &self.api,
            &mut self.files,
            self.api.list_flat(directory),
            |entry| ListedItem::from_flat(directory, entry),
            &*self.exclude,
            None,
        )
        .await
    }

    pub fn files(&self) -> impl Iterator<Item = &RemoteFile> {
        self.files.values()
    }

    pub fn modified(&self) -> impl Iterator<Item = &RemoteFile> {
        self.files().filter(|file| file.is_modified())
    }

    pub fn loaded(&self) -> impl Iterator<Item = &RemoteFile> {
        self.files().filter(|file| file.is_loaded())
    }

    /// Tracked directories that hold no files
    pub fn directories(&self) -> impl Iterator<Item = &str> {
        self.directories.iter().map(String::as_str)
    }

    pub fn tree(&self) -> Vec<TreeNode> {
        build_tree(self.directories(), self.files().map(RemoteFile::path))
    }
}

fn missing(path: &str) -> StoreError {
    StoreError::NotInCollection {
        path: path.to_string(),
    }
}
