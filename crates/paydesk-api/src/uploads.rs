//! On-disk storage for review screenshots.
//!
//! A thin collaborator: accepts upload bytes, returns a stable filename that
//! the review record references and `/uploads` serves statically.

use std::path::{Path, PathBuf};

use anyhow::Result;
use chrono::Utc;
use tokio::fs;
use tracing::info;

pub struct Storage {
    dir: PathBuf,
}

impl Storage {
    pub async fn new(dir: PathBuf) -> Result<Self> {
        fs::create_dir_all(&dir).await?;
        info!("Upload storage directory: {}", dir.display());
        Ok(Self { dir })
    }

    /// Save upload bytes under `{unix_millis}-{sanitized original name}` and
    /// return that filename.
    pub async fn save(&self, original_name: &str, data: &[u8]) -> Result<String> {
        let filename = format!(
            "{}-{}",
            Utc::now().timestamp_millis(),
            sanitize(original_name)
        );
        fs::write(self.dir.join(&filename), data).await?;
        info!(%filename, size = data.len(), "stored upload");
        Ok(filename)
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

/// Strip path separators and anything else surprising from a client-supplied
/// filename.
fn sanitize(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect();
    if cleaned.trim_matches(&['.', '_'][..]).is_empty() {
        "upload".into()
    } else {
        cleaned
    }
}
