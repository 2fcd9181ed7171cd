//! Picture uploads written to a local directory and served back under a public prefix.

use std::path::{Path, PathBuf};

use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::ServiceError;

const IMAGE_EXTENSIONS: [&str; 6] = ["png", "jpg", "jpeg", "gif", "webp", "bmp"];

#[derive(Debug, Clone)]
pub struct UploadStore {
    dir: PathBuf,
    public_prefix: String,
    max_bytes: usize,
}

impl UploadStore {
    pub fn new(dir: impl Into<PathBuf>, public_prefix: &str, max_bytes: usize) -> Self {
        Self {
            dir: dir.into(),
            public_prefix: public_prefix.trim_end_matches('/').to_string(),
            max_bytes,
        }
    }

    pub fn dir(&self) -> &Path { &self.dir }

    pub fn max_bytes(&self) -> usize { self.max_bytes }

    /// Remove a picture saved by [`UploadStore::save_picture`] that ended up unused.
    pub async fn discard(&self, public_path: &str) {
        let Some(name) = public_path
            .strip_prefix(&self.public_prefix)
            .and_then(|rest| rest.strip_prefix('/'))
        else {
            return;
        };
        if name.is_empty() || name.contains(['/', '\\']) || name.starts_with('.') {
            return;
        }
        match tokio::fs::remove_file(self.dir.join(name)).await {
            Ok(()) => info!(file = %name, "picture_discarded"),
            Err(e) => warn!(file = %name, error = %e, "picture discard failed"),
        }
    }

    /// Save an uploaded picture and return its public path.
    ///
    /// An empty `original_name` means the form carried no file and yields `Ok(None)`.
    pub async fn save_picture(&self, original_name: &str, bytes: &[u8]) -> Result<Option<String>, ServiceError> {
        if original_name.trim().is_empty() {
            return Ok(None);
        }
        let ext = image_extension(original_name)
            .ok_or_else(|| ServiceError::Validation(format!("unsupported picture type: {original_name}")))?;
        if bytes.is_empty() {
            return Err(ServiceError::Validation("picture is empty".into()));
        }
        if bytes.len() > self.max_bytes {
            return Err(ServiceError::Validation(format!("picture larger than {} bytes", self.max_bytes)));
        }

        let file_name = format!("{}.{ext}", Uuid::new_v4().simple());
        tokio::fs::create_dir_all(&self.dir).await?;
        tokio::fs::write(self.dir.join(&file_name), bytes).await?;
        info!(file = %file_name, size = bytes.len(), "picture_saved");
        Ok(Some(format!("{}/{file_name}", self.public_prefix)))
    }
}

/// Lower-cased extension of `name` when it is a known image type.
fn image_extension(name: &str) -> Option<String> {
    let ext = Path::new(name).extension()?.to_str()?.to_ascii_lowercase();
    IMAGE_EXTENSIONS.contains(&ext.as_str()).then_some(ext)
}
