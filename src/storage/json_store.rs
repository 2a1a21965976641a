//! JSON list files
//!
//! Each store holds one collection as a pretty-printed JSON array. Reads
//! tolerate a missing file; writes replace the whole file through a sibling
//! temp file so a crash mid-write never leaves half a document behind.

use std::ffi::OsString;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use serde::{de::DeserializeOwned, Serialize};
use tokio::fs;
use tracing::debug;

use crate::utils::errors::Result;

#[derive(Debug, Clone)]
pub struct JsonListStore<T> {
    path: PathBuf,
    _items: PhantomData<fn() -> T>,
}

impl<T> JsonListStore<T>
where
    T: Serialize + DeserializeOwned,
{
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            _items: PhantomData,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the list, or an empty one when the file does not exist yet
    pub async fn load_or_empty(&self) -> Result<Vec<T>> {
        let content = match fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "Store file not found, starting empty");
                return Ok(Vec::new());
            }
            Err(e) => return Err(e.into()),
        };

        if content.trim().is_empty() {
            return Ok(Vec::new());
        }

        let items: Vec<T> = serde_json::from_str(&content)?;
        debug!(path = %self.path.display(), count = items.len(), "Store loaded");
        Ok(items)
    }

    /// Replace the file with `items`
    pub async fn save(&self, items: &[T]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await?;
            }
        }

        let content = serde_json::to_string_pretty(items)?;
        let temp_path = self.temp_path();
        fs::write(&temp_path, content).await?;
        fs::rename(&temp_path, &self.path).await?;

        debug!(path = %self.path.display(), count = items.len(), "Store saved");
        Ok(())
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|name| name.to_os_string())
            .unwrap_or_else(|| OsString::from("store"));
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}
