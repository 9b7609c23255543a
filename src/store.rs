use crate::error::Result;
use crate::results::Listing;
use std::path::{Path, PathBuf};

/// Rewrites the whole result set to one JSON file
///
/// Each save serializes every listing gathered so far and replaces the file,
/// so the file always holds the last fully scraped page's data. The new
/// contents go to a sibling temporary file first and are renamed into place.
#[derive(Debug, Clone)]
pub struct JsonStore {
    path: PathBuf,
    pretty: bool,
}

impl JsonStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            pretty: false,
        }
    }

    pub fn pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Serialize `listings` as a JSON array and overwrite the output file.
    ///
    /// Returns the number of bytes written.
    pub async fn save(&self, listings: &[Listing]) -> Result<usize> {
        let encoded = if self.pretty {
            serde_json::to_vec_pretty(listings)?
        } else {
            serde_json::to_vec(listings)?
        };

        let tmp_path = self.tmp_path();
        if let Err(e) = self.replace_with(&tmp_path, &encoded).await {
            if let Err(cleanup) = tokio::fs::remove_file(&tmp_path).await {
                if cleanup.kind() != std::io::ErrorKind::NotFound {
                    ::log::warn!("Failed to remove {}: {}", tmp_path.display(), cleanup);
                }
            }
            return Err(e);
        }

        ::log::debug!(
            "Wrote {} listings ({} bytes) to {}",
            listings.len(),
            encoded.len(),
            self.path.display()
        );
        Ok(encoded.len())
    }

    async fn replace_with(&self, tmp_path: &Path, encoded: &[u8]) -> Result<()> {
        tokio::fs::write(tmp_path, encoded).await?;
        tokio::fs::rename(tmp_path, &self.path).await?;
        Ok(())
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}
