//! On-disk storage for uploaded KYC documents
//!
//! Files live under `<uploads_dir>/kyc/<uuid>.<ext>`. The stored name never
//! contains client input other than the lower-cased extension.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use std::path::{Path, PathBuf};
use thiserror::Error;
use uuid::Uuid;

/// Accepted upload extensions
pub const ALLOWED_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "pdf"];

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Unsupported file type; allowed: jpg, jpeg, png, pdf")]
    UnsupportedExtension,

    #[error("File content is not valid base64")]
    InvalidEncoding,

    #[error("File is empty")]
    Empty,

    #[error("File is {size} bytes; the limit is {max} bytes")]
    TooLarge { size: usize, max: usize },

    #[error("Invalid file name")]
    InvalidFileName,

    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Decoded upload ready to be written
#[derive(Debug)]
pub struct PreparedUpload {
    pub original_name: String,
    pub extension: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

/// Result of writing an upload
#[derive(Debug, Clone)]
pub struct StoredFile {
    pub filename: String,
    pub size_bytes: i64,
}

#[derive(Debug, Clone)]
pub struct DocumentStorage {
    dir: PathBuf,
    max_bytes: usize,
}

impl DocumentStorage {
    pub fn new(uploads_dir: impl AsRef<Path>, max_bytes: usize) -> Self {
        Self {
            dir: uploads_dir.as_ref().join("kyc"),
            max_bytes,
        }
    }

    pub fn from_config(config: &shared::StorageConfig) -> Self {
        Self::new(&config.uploads_dir, config.max_upload_bytes)
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Create the storage directory if missing
    pub async fn ensure_dir(&self) -> Result<(), StorageError> {
        tokio::fs::create_dir_all(&self.dir).await?;
        Ok(())
    }

    /// Check the file name and decode the content
    ///
    /// `content` may carry a `data:<mime>;base64,` prefix as produced by
    /// browser `FileReader.readAsDataURL`.
    pub fn prepare(&self, file_name: &str, content: &str) -> Result<PreparedUpload, StorageError> {
        let extension = allowed_extension(file_name).ok_or(StorageError::UnsupportedExtension)?;

        let payload = match content.split_once(";base64,") {
            Some((prefix, data)) if prefix.starts_with("data:") => data,
            _ => content,
        };
        let compact: String = payload.chars().filter(|c| !c.is_ascii_whitespace()).collect();

        // Reject before decoding when the encoded length already implies too many bytes
        if compact.len() / 4 * 3 > self.max_bytes + 2 {
            return Err(StorageError::TooLarge {
                size: compact.len() / 4 * 3,
                max: self.max_bytes,
            });
        }

        let bytes = STANDARD
            .decode(compact.as_bytes())
            .map_err(|_| StorageError::InvalidEncoding)?;

        if bytes.is_empty() {
            return Err(StorageError::Empty);
        }
        if bytes.len() > self.max_bytes {
            return Err(StorageError::TooLarge {
                size: bytes.len(),
                max: self.max_bytes,
            });
        }

        let mime_type = mime_guess::from_ext(&extension)
            .first_or_octet_stream()
            .essence_str()
            .to_string();

        Ok(PreparedUpload {
            original_name: base_name(file_name),
            extension,
            mime_type,
            bytes,
        })
    }

    /// Write the upload under a fresh random name
    pub async fn save(&self, upload: &PreparedUpload) -> Result<StoredFile, StorageError> {
        self.ensure_dir().await?;

        let filename = format!("{}.{}", Uuid::new_v4(), upload.extension);
        tokio::fs::write(self.dir.join(&filename), &upload.bytes).await?;

        Ok(StoredFile {
            filename,
            size_bytes: upload.bytes.len() as i64,
        })
    }

    /// Remove a stored file; failures are logged and otherwise ignored
    pub async fn remove(&self, filename: &str) {
        let path = match self.resolve(filename) {
            Ok(path) => path,
            Err(_) => return,
        };
        if let Err(e) = tokio::fs::remove_file(&path).await {
            if e.kind() != std::io::ErrorKind::NotFound {
                tracing::warn!(filename = %filename, error = %e, "Failed to remove stored document");
            }
        }
    }

    /// Path of a stored file, refusing anything but a plain file name
    pub fn resolve(&self, filename: &str) -> Result<PathBuf, StorageError> {
        let plain = !filename.is_empty()
            && !filename.contains(['/', '\\', '\0'])
            && !filename.contains("..")
            && !filename.starts_with('.');
        if !plain {
            return Err(StorageError::InvalidFileName);
        }
        Ok(self.dir.join(filename))
    }

    /// Read a stored file with its guessed content type
    ///
    /// Returns `Ok(None)` when the file does not exist.
    pub async fn read(&self, filename: &str) -> Result<Option<(Vec<u8>, String)>, StorageError> {
        let path = self.resolve(filename)?;
        match tokio::fs::read(&path).await {
            Ok(bytes) => {
                let mime = mime_guess::from_path(&path)
                    .first_or_octet_stream()
                    .essence_str()
                    .to_string();
                Ok(Some((bytes, mime)))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

/// Lower-cased extension when it is on the allow list
fn allowed_extension(file_name: &str) -> Option<String> {
    let ext = Path::new(file_name)
        .extension()?
        .to_str()?
        .to_ascii_lowercase();
    ALLOWED_EXTENSIONS.contains(&ext.as_str()).then_some(ext)
}

/// Client file name without any directory part
fn base_name(file_name: &str) -> String {
    file_name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(file_name)
        .chars()
        .take(255)
        .collect()
}
