//! Read-only static file store.
//!
//! # Responsibilities
//! - Resolve a normalized request path under the document root
//! - Read file bytes and pick a Content-Type from the extension
//! - Report a miss as None, never as an error
//!
//! # Design Decisions
//! - Paths reach the store already normalized; traversal was rejected
//!   upstream, so a simple join cannot escape the root
//! - Directories are misses, not errors
//! - Whole-file reads; assets behind this router are small and the OS
//!   page cache does the heavy lifting

use std::path::{Path, PathBuf};

/// A static asset ready to serve.
#[derive(Debug, Clone)]
pub struct StaticAsset {
    /// File contents.
    pub bytes: Vec<u8>,

    /// Content-Type derived from the file extension.
    pub content_type: &'static str,
}

/// File store rooted at the configured document root.
#[derive(Debug, Clone)]
pub struct StaticStore {
    root: PathBuf,
}

impl StaticStore {
    /// Create a store over the given document root.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The configured document root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Look up a normalized path. `Ok(None)` on miss or directory.
    pub async fn get(&self, path: &str) -> Result<Option<StaticAsset>, std::io::Error> {
        let relative = path.trim_start_matches('/');
        let full = self.root.join(relative);

        let meta = match tokio::fs::metadata(&full).await {
            Ok(meta) => meta,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e),
        };
        if !meta.is_file() {
            return Ok(None);
        }

        let bytes = tokio::fs::read(&full).await?;
        Ok(Some(StaticAsset {
            bytes,
            content_type: content_type_for(path),
        }))
    }
}

/// Content-Type from the path extension.
fn content_type_for(path: &str) -> &'static str {
    let ext = path.rsplit('.').next().unwrap_or("");
    match ext {
        "css" => "text/css",
        "js" => "application/javascript",
        "html" | "htm" => "text/html",
        "json" => "application/json",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "svg" => "image/svg+xml",
        "ico" => "image/x-icon",
        "webp" => "image/webp",
        "woff" => "font/woff",
        "woff2" => "font/woff2",
        "ttf" => "font/ttf",
        "txt" => "text/plain",
        "csv" => "text/csv",
        "pdf" => "application/pdf",
        _ => "application/octet-stream",
    }
}
