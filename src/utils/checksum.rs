//! Artifact checksums.

use crate::error::{ErrorExt, ProcessingError};
use sha2::{Digest, Sha256};
use std::path::Path;
use tokio::io::AsyncReadExt;

/// Hex-encoded SHA-256 of a file, read in 8 KiB chunks.
pub async fn calculate_sha256(path: &Path) -> Result<String, ProcessingError> {
    let mut file = tokio::fs::File::open(path)
        .await
        .fs_context("opening artifact", path)?;
    let mut hasher = Sha256::new();
    let mut buffer = vec![0u8; 8192];

    loop {
        let n = file
            .read(&mut buffer)
            .await
            .fs_context("reading artifact", path)?;
        if n == 0 {
            break;
        }
        hasher.update(&buffer[..n]);
    }

    Ok(format!("{:x}", hasher.finalize()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_known_digest() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hello.txt");
        std::fs::write(&path, b"hello").unwrap();

        let digest = calculate_sha256(&path).await.unwrap();
        assert_eq!(
            digest,
            "2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824"
        );
    }

    #[tokio::test]
    async fn test_missing_file_names_path() {
        let err = calculate_sha256(Path::new("/nonexistent/artifact.snap"))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("/nonexistent/artifact.snap"));
    }
}
