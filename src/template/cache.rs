//! Parsed-template cache with modification-time invalidation

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};
use std::time::SystemTime;

use super::parser::{parse, Node};
use super::TemplateError;

struct CacheEntry {
    mtime: SystemTime,
    nodes: Arc<Vec<Node>>,
}

/// Caches parsed node trees keyed by template path.
///
/// An entry is served as long as the source file's modification time is
/// unchanged; a touched file is re-read and re-parsed on the next load.
/// Concurrent first-time loads of the same path may parse twice; the
/// entries are identical, so last write wins harmlessly.
#[derive(Default)]
pub struct TemplateCache {
    entries: RwLock<HashMap<PathBuf, CacheEntry>>,
}

impl TemplateCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a template file through the cache.
    ///
    /// A missing file is `TemplateNotFound`; the caller decides whether
    /// that is fatal (templates) or renders as empty (partials).
    pub async fn load(&self, path: &Path) -> Result<Arc<Vec<Node>>, TemplateError> {
        let metadata = tokio::fs::metadata(path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                TemplateError::TemplateNotFound(path.display().to_string())
            } else {
                TemplateError::Io(e)
            }
        })?;
        let mtime = metadata.modified()?;

        {
            let entries = self.entries.read().expect("template cache poisoned");
            if let Some(entry) = entries.get(path) {
                if entry.mtime == mtime {
                    return Ok(entry.nodes.clone());
                }
            }
        }

        let source = tokio::fs::read_to_string(path).await?;
        let nodes = Arc::new(parse(&source)?);

        let mut entries = self.entries.write().expect("template cache poisoned");
        entries.insert(
            path.to_path_buf(),
            CacheEntry {
                mtime,
                nodes: nodes.clone(),
            },
        );

        Ok(nodes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[tokio::test]
    async fn test_load_caches_parse() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("base.html");
        fs::write(&path, "<h1>{{title}}</h1>").unwrap();

        let cache = TemplateCache::new();
        let first = cache.load(&path).await.unwrap();
        let second = cache.load(&path).await.unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[tokio::test]
    async fn test_load_invalidates_on_mtime_change() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("base.html");
        fs::write(&path, "one").unwrap();

        let cache = TemplateCache::new();
        let first = cache.load(&path).await.unwrap();

        fs::write(&path, "two").unwrap();
        // Ensure the mtime actually moves on coarse-grained filesystems
        let later = SystemTime::now() + std::time::Duration::from_secs(2);
        let file = fs::OpenOptions::new().write(true).open(&path).unwrap();
        file.set_modified(later).unwrap();

        let second = cache.load(&path).await.unwrap();
        assert!(!Arc::ptr_eq(&first, &second));
        assert_eq!(*second, vec![Node::Text("two".to_string())]);
    }

    #[tokio::test]
    async fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let cache = TemplateCache::new();
        let err = cache.load(&dir.path().join("nope.html")).await.unwrap_err();
        assert!(matches!(err, TemplateError::TemplateNotFound(_)));
    }
}
