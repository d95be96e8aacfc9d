//! Reads local files into encoded images.

use crate::error::{EditorError, Result};
use crate::image::encoded::{encode_bytes, EncodedImage};
use crate::image::format::{ImageFormat, OCTET_STREAM};
use std::path::Path;

/// Reads a file and encodes it as a data-URL image labelled with its file name.
///
/// The MIME type comes from the extension, then from the file's magic bytes,
/// and falls back to `application/octet-stream`. Files outside
/// [`ImageFormat::ACCEPT`] are still encoded; the filter is only a hint.
pub async fn encode_file(path: impl AsRef<Path>) -> Result<EncodedImage> {
    let path = path.as_ref();
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|source| EditorError::Read {
            path: path.to_path_buf(),
            source,
        })?;

    let format = path
        .extension()
        .and_then(|e| e.to_str())
        .and_then(ImageFormat::from_extension)
        .or_else(|| ImageFormat::from_magic_bytes(&bytes));

    let mime_type = match format {
        Some(format) => format.mime_type(),
        None => {
            tracing::warn!(
                path = %path.display(),
                accept = ImageFormat::ACCEPT,
                "file is not a recognized image type"
            );
            OCTET_STREAM
        }
    };

    let label = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    tracing::debug!(path = %path.display(), mime_type, size = bytes.len(), "encoded image file");
    Ok(encode_bytes(&bytes, mime_type, label))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FailureKind;

    #[tokio::test]
    async fn test_encode_file_uses_extension_and_name() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cat.png");
        std::fs::write(&path, b"not really a png").unwrap();

        let image = encode_file(&path).await.unwrap();
        assert_eq!(image.alt, "cat.png");
        assert_eq!(image.mime_type(), "image/png");
        assert_eq!(image.to_bytes().unwrap(), b"not really a png");
    }

    #[tokio::test]
    async fn test_encode_file_sniffs_magic_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("photo");
        std::fs::write(&path, [0xFF, 0xD8, 0xFF, 0xE0, 1, 2, 3]).unwrap();

        let image = encode_file(&path).await.unwrap();
        assert_eq!(image.mime_type(), "image/jpeg");
    }

    #[tokio::test]
    async fn test_encode_file_falls_back_to_octet_stream() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, b"hello").unwrap();

        let image = encode_file(&path).await.unwrap();
        assert!(image.src.starts_with("data:application/octet-stream;base64,"));
    }

    #[tokio::test]
    async fn test_missing_file_is_read_failure() {
        let dir = tempfile::tempdir().unwrap();
        let err = encode_file(dir.path().join("missing.png")).await.unwrap_err();
        assert_eq!(err.kind(), FailureKind::Read);
    }
}
