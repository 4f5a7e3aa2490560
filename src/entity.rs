use std::fmt;
use std::ops::{Deref, DerefMut};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use tracing::{debug, warn};

use crate::{
    api::DataApi,
    error::{Result, StoreError},
    path::PathParts,
    types::{ApiResponse, FileMetadata, PutOptions, StoreResponse},
};

/// Size sentinel of a file that was never written to the remote store
pub const TEMPORARY_SIZE: i64 = -1;

const STATUS_OK: u16 = 200;
const STATUS_NO_CONTENT: u16 = 204;

/// One file of the remote store together with its cached content
///
/// A file is either temporary (created locally, `size == -1`) or persisted.
/// Content is absent until [`load`](Self::load) fetches it; a loaded file is
/// modified whenever its content differs from the last synced snapshot.
pub struct RemoteFile {
    api: Arc<dyn DataApi>,
    path: String,
    parts: PathParts,
    last_modified: i64,
    size: i64,
    content: Option<String>,
    original_content: Option<String>,
    is_loading: bool,
}

impl RemoteFile {
    /// Create a file that only exists locally until its first save
    pub fn create_temporary(
        api: Arc<dyn DataApi>,
        path: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        let mut file = Self::new(api, path.into(), now_millis(), TEMPORARY_SIZE);
        file.content = Some(content.into());
        file
    }

    /// Materialize a persisted file from a listing entry
    pub fn from_listing(
        api: Arc<dyn DataApi>,
        path: impl Into<String>,
        last_modified: i64,
        size: i64,
    ) -> Self {
        Self::new(api, path.into(), last_modified, size)
    }

    fn new(api: Arc<dyn DataApi>, path: String, last_modified: i64, size: i64) -> Self {
        let parts = PathParts::split(&path);
        Self {
            api,
            path,
            parts,
            last_modified,
            size,
            content: None,
            original_content: None,
            is_loading: false,
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Identity within a [`FileCollection`](crate::collection::FileCollection)
    pub fn key(&self) -> &str {
        &self.path
    }

    pub fn directory(&self) -> &str {
        &self.parts.directory
    }

    pub fn full_filename(&self) -> &str {
        &self.parts.full_filename
    }

    pub fn filename(&self) -> &str {
        &self.parts.filename
    }

    pub fn suffix(&self) -> Option<&str> {
        self.parts.suffix.as_deref()
    }

    pub fn last_modified(&self) -> i64 {
        self.last_modified
    }

    pub fn size(&self) -> i64 {
        self.size
    }

    pub fn content(&self) -> Option<&str> {
        self.content.as_deref()
    }

    pub fn original_content(&self) -> Option<&str> {
        self.original_content.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn is_temporary(&self) -> bool {
        self.size == TEMPORARY_SIZE
    }

    pub fn is_persisted(&self) -> bool {
        !self.is_temporary()
    }

    pub fn is_loaded(&self) -> bool {
        self.content.is_some()
    }

    pub fn is_modified(&self) -> bool {
        self.content != self.original_content
    }

    /// Replace the cached content with a local edit
    pub fn set_content(&mut self, content: impl Into<String>) {
        self.content = Some(content.into());
    }

    /// Fetch the content from the remote store
    ///
    /// Temporary files and already loaded files are returned as they are
    /// unless `force` is set.
    pub async fn load(&mut self, force: bool) -> Result<Loaded<'_>> {
        if self.is_temporary() || (self.is_loaded() && !force) {
            debug!(path = %self.path, "load skipped");
            return Ok(Loaded(self));
        }

        self.is_loading = true;
        let fetched = self.fetch_content().await;
        self.is_loading = false;

        let text = fetched?;
        self.original_content = Some(text.clone());
        self.content = Some(text);
        Ok(Loaded(self))
    }

    async fn fetch_content(&self) -> Result<String> {
        let response = self.api.get(&self.path).await?;
        debug!(path = %self.path, status = response.status, "load");
        if response.status != STATUS_OK {
            return Err(self.failure("load", &response));
        }
        Ok(response.text())
    }

    /// Drop the cached content
    pub fn unload(&mut self) {
        self.content = None;
        self.original_content = None;
        self.is_loading = false;
    }

    /// Write the content to the remote store
    ///
    /// Persisted files overwrite their remote counterpart; temporary files
    /// must not clobber an existing path. Unmodified persisted files are
    /// skipped unless `force` is set.
    pub async fn save(&mut self, force: bool) -> Result<&mut Self> {
        if self.is_persisted() && !self.is_modified() && !force {
            debug!(path = %self.path, "save skipped, not modified");
            return Ok(self);
        }

        let overwrite = self.is_persisted();
        let sent = self.content.clone();
        let options = PutOptions {
            overwrite,
            full_info: true,
        };

        let response = self
            .api
            .put(&self.path, sent.as_deref().unwrap_or_default(), options)
            .await?;
        debug!(path = %self.path, overwrite, status = response.status, "store");
        if response.status != STATUS_OK {
            return Err(self.failure("store", &response));
        }

        if let Some(meta) = metadata_of(&response) {
            self.apply_metadata(meta);
        }
        self.original_content = sent;
        Ok(self)
    }

    /// Store the content under `new_path` without overwriting anything there
    ///
    /// A temporary file is moved to the new path and saved in place. A
    /// persisted file keeps its path and a new file is saved instead; its
    /// content is loaded first when it is not cached.
    pub async fn save_as(&mut self, new_path: &str) -> Result<SavedAs<'_>> {
        if self.is_temporary() {
            self.set_path(new_path);
            self.save(false).await?;
            return Ok(SavedAs::Moved(self));
        }

        self.load(false).await?;

        let mut copy = Self::new(
            Arc::clone(&self.api),
            new_path.to_string(),
            now_millis(),
            TEMPORARY_SIZE,
        );
        copy.content = self.content.clone();
        copy.save(false).await?;
        Ok(SavedAs::Copied(copy))
    }

    /// Delete the remote file; temporary files have nothing to delete
    pub async fn delete(&self) -> Result<()> {
        if self.is_temporary() {
            return Ok(());
        }

        let response = self.api.delete(&self.path).await?;
        debug!(path = %self.path, status = response.status, "delete");
        if response.status != STATUS_NO_CONTENT {
            return Err(self.failure("delete", &response));
        }
        Ok(())
    }

    /// Move the file to `new_path`, remotely first when it is persisted
    pub async fn rename(&mut self, new_path: &str) -> Result<&mut Self> {
        if self.is_temporary() {
            self.set_path(new_path);
            return Ok(self);
        }

        let response = self.api.move_file(&self.path, new_path).await?;
        debug!(from = %self.path, to = new_path, status = response.status, "move");
        if response.status != STATUS_OK {
            return Err(self.failure("move", &response));
        }

        self.set_path(new_path);
        if let Some(meta) = metadata_of(&response) {
            self.apply_metadata(meta);
        }
        Ok(self)
    }

    /// Take over metadata reported by a listing and invalidate the cache
    pub(crate) fn refresh_from_listing(&mut self, last_modified: i64, size: i64) {
        self.last_modified = last_modified;
        self.size = size;
        self.unload();
    }

    fn set_path(&mut self, path: &str) {
        self.path = path.to_string();
        self.parts = PathParts::split(path);
    }

    fn apply_metadata(&mut self, meta: FileMetadata) {
        self.last_modified = meta.modified;
        self.size = meta.size;
    }

    fn failure(&self, operation: &'static str, response: &ApiResponse) -> StoreError {
        warn!(path = %self.path, status = response.status, "{} failed", operation);
        StoreError::unexpected_status(operation, &self.path, response.status, &response.status_text)
    }
}

impl fmt::Debug for RemoteFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RemoteFile")
            .field("api", &self.api.identifier())
            .field("path", &self.path)
            .field("last_modified", &self.last_modified)
            .field("size", &self.size)
            .field("is_loaded", &self.is_loaded())
            .field("is_modified", &self.is_modified())
            .field("is_loading", &self.is_loading)
            .finish()
    }
}

/// Legacy backends answer with an identifier string, which carries no metadata
fn metadata_of(response: &ApiResponse) -> Option<FileMetadata> {
    response
        .json::<StoreResponse>()
        .ok()
        .and_then(|body| body.metadata())
}

fn now_millis() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as i64)
        .unwrap_or_default()
}

/// A file whose content is guaranteed to be present
#[derive(Debug)]
pub struct Loaded<'a>(&'a mut RemoteFile);

impl Loaded<'_> {
    /// Loaded content; a temporary file whose content was unloaded reads as empty
    pub fn content(&self) -> &str {
        self.0.content.as_deref().unwrap_or_default()
    }
}

impl Deref for Loaded<'_> {
    type Target = RemoteFile;

    fn deref(&self) -> &RemoteFile {
        self.0
    }
}

impl DerefMut for Loaded<'_> {
    fn deref_mut(&mut self) -> &mut RemoteFile {
        self.0
    }
}

/// Outcome of [`RemoteFile::save_as`]
#[derive(Debug)]
pub enum SavedAs<'a> {
    /// The temporary file itself now lives at the new path
    Moved(&'a mut RemoteFile),
    /// A new file was stored at the new path, the original is untouched
    Copied(RemoteFile),
}

impl SavedAs<'_> {
    /// The file now stored at the new path
    pub fn file(&self) -> &RemoteFile {
        match self {
            SavedAs::Moved(file) => file,
            SavedAs::Copied(file) => file,
        }
    }
}
