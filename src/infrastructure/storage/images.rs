use std::path::{Path, PathBuf};

use actix_multipart::form::tempfile::TempFile;
use chrono::Utc;
use infer::Infer;
use once_cell::sync::Lazy;
use rand::{distributions::Alphanumeric, Rng};
use regex::Regex;
use tokio::fs;

use crate::errors::UploadError;

/// Content types accepted for project/blog images, matched against the
/// sniffed magic bytes rather than the client-supplied header.
const ALLOWED_MIME_TYPES: [&str; 4] = ["image/png", "image/jpeg", "image/gif", "image/webp"];

static UNSAFE_CHARS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^A-Za-z0-9._-]+").expect("valid regex"));

/// Writes validated uploads into a fixed directory and hands back the
/// generated filename to record on the owning row.
#[derive(Clone)]
pub struct ImageStore {
    dir: PathBuf,
    max_bytes: usize,
}

impl ImageStore {
    pub fn new(dir: impl Into<PathBuf>, max_bytes: usize) -> Self {
        ImageStore {
            dir: dir.into(),
            max_bytes,
        }
    }

    pub async fn ensure_dir(&self) -> std::io::Result<()> {
        fs::create_dir_all(&self.dir).await
    }

    /// Validates and persists one uploaded file. Returns the generated
    /// filename, `<epoch-millis>-<sanitized-original>`, with a random
    /// infix when that name is already taken.
    pub async fn save(&self, upload: &TempFile) -> Result<String, UploadError> {
        let original = upload
            .file_name
            .as_deref()
            .ok_or(UploadError::MissingFilename)?;

        if upload.size == 0 {
            return Err(UploadError::EmptyFile);
        }
        if upload.size > self.max_bytes {
            return Err(UploadError::FileTooLarge);
        }

        match Infer::new().get_from_path(upload.file.path()) {
            Ok(Some(kind)) if ALLOWED_MIME_TYPES.contains(&kind.mime_type()) => {}
            Ok(Some(kind)) => return Err(UploadError::UnsupportedType(kind.mime_type().to_string())),
            Ok(None) => return Err(UploadError::UnsupportedType("unknown".to_string())),
            Err(e) => return Err(UploadError::IoError(e)),
        }

        let mut name = generate_filename(original, Utc::now().timestamp_millis());
        let mut dest = self.dir.join(&name);
        if fs::try_exists(&dest).await? {
            name = format!("{}-{}", random_suffix(), name);
            dest = self.dir.join(&name);
        }

        fs::copy(upload.file.path(), &dest).await?;

        tracing::debug!(filename = %name, size = upload.size, "Stored uploaded image");
        Ok(name)
    }
}

/// Strips any directory components and squashes everything outside
/// `[A-Za-z0-9._-]` so the result is safe as a bare filename.
pub fn sanitize_filename(original: &str) -> String {
    let base = Path::new(original)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("");

    let cleaned = UNSAFE_CHARS.replace_all(base, "-");
    let cleaned = cleaned.trim_matches('-');

    if cleaned.is_empty() {
        "upload".to_string()
    } else {
        cleaned.to_string()
    }
}

pub fn generate_filename(original: &str, epoch_millis: i64) -> String {
    format!("{}-{}", epoch_millis, sanitize_filename(original))
}

fn random_suffix() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(8)
        .map(|b| (b as char).to_ascii_lowercase())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const PNG_MAGIC: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

    fn png_upload(name: Option<&str>) -> TempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(&PNG_MAGIC).unwrap();
        file.write_all(&[0u8; 64]).unwrap();
        file.flush().unwrap();
        let size = 8 + 64;
        TempFile {
            file,
            content_type: None,
            file_name: name.map(str::to_string),
            size,
        }
    }

    #[test]
    fn sanitize_strips_directories_and_odd_characters() {
        assert_eq!(sanitize_filename("../../etc/passwd"), "passwd");
        assert_eq!(sanitize_filename("my photo (1).png"), "my-photo-1-.png");
        assert_eq!(sanitize_filename("///"), "upload");
    }

    #[test]
    fn generated_name_is_timestamp_prefixed() {
        let name = generate_filename("cover.png", 1700000000000);
        assert_eq!(name, "1700000000000-cover.png");
    }

    #[actix_rt::test]
    async fn save_writes_file_and_returns_generated_name() {
        let dir = tempfile::tempdir().unwrap();
        let store = ImageStore::new(dir.path(), 1024 * 1024);
        store.ensure_dir().await.unwrap();

        let upload = png_upload(Some("cover.png"));
        let name = store.save(&upload).await.unwrap();

        assert_ne!(name, "cover.png");
        assert!(name.ends_with("-cover.png"));
        assert!(dir.path().join(&name).exists());
    }

    #[actix_rt::test]
    async fn save_rejects_unknown_content() {
        let dir = tempfile::tempdir().unwrap();
        let store = ImageStore::new(dir.path(), 1024 * 1024);
        store.ensure_dir().await.unwrap();

        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"just some text, not an image").unwrap();
        file.flush().unwrap();
        let upload = TempFile {
            file,
            content_type: None,
            file_name: Some("notes.txt".to_string()),
            size: 28,
        };

        assert!(matches!(
            store.save(&upload).await,
            Err(UploadError::UnsupportedType(_))
        ));
    }

    #[actix_rt::test]
    async fn save_rejects_oversized_upload() {
        let dir = tempfile::tempdir().unwrap();
        let store = ImageStore::new(dir.path(), 16);
        store.ensure_dir().await.unwrap();

        let upload = png_upload(Some("cover.png"));
        assert!(matches!(store.save(&upload).await, Err(UploadError::FileTooLarge)));
    }

    #[actix_rt::test]
    async fn save_without_filename_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let store = ImageStore::new(dir.path(), 1024 * 1024);
        store.ensure_dir().await.unwrap();

        let upload = png_upload(None);
        assert!(matches!(store.save(&upload).await, Err(UploadError::MissingFilename)));
    }
}
