// File: src/store.rs
// Purpose: Page persistence, one `<title>.txt` file per page

use crate::page::Page;
use crate::title::Title;
use async_trait::async_trait;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::debug;

/// Owner read/write only.
pub const PAGE_FILE_MODE: u32 = 0o600;

/// Why a page could not be loaded.
///
/// Handlers treat both variants as "no such page"; the split exists so that
/// permission and I/O problems are at least visible in logs and tests.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("page {0} not found")]
    NotFound(Title),

    #[error("failed to read page {title}: {source}")]
    Io {
        title: Title,
        #[source]
        source: io::Error,
    },
}

impl LoadError {
    /// The page has never been saved, as opposed to being unreadable.
    pub fn is_not_found(&self) -> bool {
        matches!(self, LoadError::NotFound(_))
    }
}

#[derive(Debug, Error)]
#[error("failed to write page {title}: {source}")]
pub struct StoreError {
    pub title: Title,
    #[source]
    pub source: io::Error,
}

/// Storage backend for wiki pages
#[async_trait]
pub trait PageStore: Send + Sync {
    /// Read the full body stored for `title`.
    async fn load(&self, title: &Title) -> Result<Page, LoadError>;

    /// Create or replace the stored body for `page.title`.
    async fn save(&self, page: &Page) -> Result<(), StoreError>;

    /// Get storage backend name
    fn name(&self) -> &'static str;
}

/// Filesystem page store
///
/// Every page lives in `<root>/<title>.txt` holding the raw body bytes.
/// Writes are not coordinated between requests: concurrent saves of the
/// same title race and the last one to write wins.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the backing file for `title`.
    pub fn page_path(&self, title: &Title) -> PathBuf {
        self.root.join(title.file_name())
    }
}

#[async_trait]
impl PageStore for FileStore {
    async fn load(&self, title: &Title) -> Result<Page, LoadError> {
        let path = self.page_path(title);

        match fs::read(&path).await {
            Ok(body) => Ok(Page::new(title.clone(), body)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!("No page file at {:?}", path);
                Err(LoadError::NotFound(title.clone()))
            }
            Err(source) => {
                debug!("Failed to read {:?}: {}", path, source);
                Err(LoadError::Io {
                    title: title.clone(),
                    source,
                })
            }
        }
    }

    async fn save(&self, page: &Page) -> Result<(), StoreError> {
        let path = self.page_path(&page.title);
        let wrap = |source: io::Error| StoreError {
            title: page.title.clone(),
            source,
        };

        let mut options = fs::OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        options.mode(PAGE_FILE_MODE);

        let mut file = options.open(&path).await.map_err(wrap)?;
        file.write_all(&page.body).await.map_err(wrap)?;
        file.flush().await.map_err(wrap)?;

        debug!("Wrote {} bytes to {:?}", page.body.len(), path);
        Ok(())
    }

    fn name(&self) -> &'static str {
        "filesystem"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn title(raw: &str) -> Title {
        Title::parse(raw).unwrap()
    }

    #[tokio::test]
    async fn test_save_then_load() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileStore::new(temp_dir.path());

        let page = Page::new(title("Test"), "hello");
        store.save(&page).await.unwrap();

        let loaded = store.load(&title("Test")).await.unwrap();
        assert_eq!(loaded, page);
        assert!(temp_dir.path().join("Test.txt").exists());
    }

    #[tokio::test]
    async fn test_binary_body_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileStore::new(temp_dir.path());

        let body: Vec<u8> = (0u8..=255).collect();
        store.save(&Page::new(title("Bytes"), body.clone())).await.unwrap();

        let loaded = store.load(&title("Bytes")).await.unwrap();
        assert_eq!(loaded.body, body);
    }

    #[tokio::test]
    async fn test_save_truncates_existing() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileStore::new(temp_dir.path());

        store.save(&Page::new(title("Test"), "a much longer body")).await.unwrap();
        store.save(&Page::new(title("Test"), "short")).await.unwrap();

        let loaded = store.load(&title("Test")).await.unwrap();
        assert_eq!(loaded.body_text(), "short");
    }

    #[tokio::test]
    async fn test_empty_body_is_a_page() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileStore::new(temp_dir.path());

        store.save(&Page::empty(title("Blank"))).await.unwrap();

        let loaded = store.load(&title("Blank")).await.unwrap();
        assert!(loaded.body.is_empty());
    }

    #[tokio::test]
    async fn test_load_missing_is_not_found() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileStore::new(temp_dir.path());

        let err = store.load(&title("Missing")).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_load_directory_is_io_error() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::create_dir(temp_dir.path().join("Dir.txt")).unwrap();
        let store = FileStore::new(temp_dir.path());

        let err = store.load(&title("Dir")).await.unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
    }

    #[tokio::test]
    async fn test_save_into_missing_root_fails() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileStore::new(temp_dir.path().join("does-not-exist"));

        let err = store.save(&Page::new(title("Test"), "x")).await.unwrap_err();
        assert_eq!(err.title, title("Test"));
        assert!(err.to_string().starts_with("failed to write page Test"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_saved_file_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let temp_dir = TempDir::new().unwrap();
        let store = FileStore::new(temp_dir.path());
        store.save(&Page::new(title("Secret"), "x")).await.unwrap();

        let mode = std::fs::metadata(temp_dir.path().join("Secret.txt"))
            .unwrap()
            .permissions()
            .mode();
        assert_eq!(mode & 0o777, PAGE_FILE_MODE);
    }
}
