use std::path::{Path, PathBuf};

use tokio::fs;

use crate::{config::ImageConfig, error::Result, utils::extractors::UploadedFile};

/// Extension given to copies of the default image.
pub const DEFAULT_IMAGE_EXTENSION: &str = ".jpg";

/// Keeps product images on disk in step with their rows.
///
/// Every image is stored as `{web_root}/{image_folder}/{product_id}{ext}` and
/// recorded on the row as the web path `/{image_folder}/{product_id}{ext}`.
#[derive(Debug, Clone)]
pub struct ImageStore {
    config: ImageConfig,
}

impl ImageStore {
    pub fn new(config: ImageConfig) -> Self {
        Self { config }
    }

    pub fn folder(&self) -> String {
        self.config.image_folder.trim_matches('/').to_string()
    }

    /// Directory holding the images on disk.
    pub fn folder_path(&self) -> PathBuf {
        self.config.web_root.join(self.folder())
    }

    pub fn default_image_path(&self) -> PathBuf {
        self.folder_path().join(&self.config.default_image)
    }

    pub fn file_path(&self, product_id: i32, extension: &str) -> PathBuf {
        self.folder_path()
            .join(format!("{}{}", product_id, extension))
    }

    pub fn web_path(&self, product_id: i32, extension: &str) -> String {
        format!("/{}/{}{}", self.folder(), product_id, extension)
    }

    pub async fn ensure_folder(&self) -> Result<()> {
        fs::create_dir_all(self.folder_path()).await?;
        Ok(())
    }

    /// Writes an uploaded file under the product's name, keeping the upload's extension.
    pub async fn save_upload(&self, product_id: i32, upload: &UploadedFile) -> Result<String> {
        let extension = extension_of(&upload.file_name);
        fs::write(self.file_path(product_id, &extension), &upload.bytes).await?;

        tracing::debug!(
            "Stored upload '{}' for product {}",
            upload.file_name,
            product_id
        );

        Ok(self.web_path(product_id, &extension))
    }

    /// Copies the placeholder image for a product created without an upload.
    pub async fn copy_default(&self, product_id: i32) -> Result<String> {
        fs::copy(
            self.default_image_path(),
            self.file_path(product_id, DEFAULT_IMAGE_EXTENSION),
        )
        .await?;

        Ok(self.web_path(product_id, DEFAULT_IMAGE_EXTENSION))
    }

    /// Swaps the product's stored image for a new upload. The old file is found
    /// from the extension of `current`, the path recorded on the row.
    pub async fn replace(
        &self,
        product_id: i32,
        current: Option<&str>,
        upload: &UploadedFile,
    ) -> Result<String> {
        if let Some(current) = current {
            let old = self.file_path(product_id, &extension_of(current));
            if remove_if_exists(&old).await? {
                tracing::debug!("Removed previous image {}", old.display());
            }
        }

        self.save_upload(product_id, upload).await
    }

    /// Deletes the product's stored image. Returns `false` when there was nothing to delete.
    pub async fn remove(&self, product_id: i32, current: Option<&str>) -> Result<bool> {
        match current {
            Some(current) => {
                remove_if_exists(&self.file_path(product_id, &extension_of(current))).await
            }
            None => Ok(false),
        }
    }
}

/// Extension of a file name including the leading dot, or an empty string.
///
/// Only alphanumeric extensions are kept since the result becomes part of a path.
pub fn extension_of(file_name: &str) -> String {
    let name = file_name.rsplit(['/', '\\']).next().unwrap_or(file_name);

    Path::new(name)
        .extension()
        .and_then(|ext| ext.to_str())
        .filter(|ext| !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()))
        .map(|ext| format!(".{}", ext))
        .unwrap_or_default()
}

async fn remove_if_exists(path: &Path) -> Result<bool> {
    if !fs::try_exists(path).await? {
        return Ok(false);
    }

    fs::remove_file(path).await?;
    Ok(true)
}
