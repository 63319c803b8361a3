//! File system utilities for staging.
//!
//! Every failure carries the operation and path through
//! [`ErrorExt::fs_context`], so a failed target reports which file broke it.

use crate::error::{ErrorExt, ProcessingError};
use std::path::Path;
use tokio::fs;

type Result<T> = std::result::Result<T, ProcessingError>;

/// Creates all of the directories of the specified path, erasing it first if specified.
pub async fn create_dir_all(path: &Path, erase: bool) -> Result<()> {
    if erase {
        remove_dir_all(path).await?;
    }
    fs::create_dir_all(path)
        .await
        .fs_context("creating directory", path)
}

/// Removes the directory and its contents if it exists.
pub async fn remove_dir_all(path: &Path) -> Result<()> {
    if path.exists() {
        fs::remove_dir_all(path)
            .await
            .fs_context("removing directory", path)
    } else {
        Ok(())
    }
}

/// Copies a regular file from one path to another, creating any parent
/// directories of the destination path as necessary.
///
/// Fails if the source path is a directory or doesn't exist.
pub async fn copy_file(from: &Path, to: &Path) -> Result<()> {
    if !from.exists() {
        crate::bail!("{} does not exist", from.display());
    }
    if !from.is_file() {
        crate::bail!("{} is not a file", from.display());
    }
    if let Some(dest_dir) = to.parent() {
        fs::create_dir_all(dest_dir)
            .await
            .fs_context("creating directory", dest_dir)?;
    }
    fs::copy(from, to).await.fs_context("copying file", from)?;
    Ok(())
}

/// Recursively copies a directory from one path to another, creating any
/// parent directories of the destination path as necessary.
///
/// Fails if the source path is not a directory or doesn't exist. Existing
/// files at the destination are overwritten.
pub async fn copy_dir(from: &Path, to: &Path) -> Result<()> {
    if !from.exists() {
        crate::bail!("{} does not exist", from.display());
    }
    if !from.is_dir() {
        crate::bail!("{} is not a directory", from.display());
    }
    fs::create_dir_all(to)
        .await
        .fs_context("creating directory", to)?;

    for entry in walkdir::WalkDir::new(from) {
        let entry = entry?;
        debug_assert!(entry.path().starts_with(from));
        let rel_path = entry.path().strip_prefix(from)?;
        let dest_path = to.join(rel_path);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&dest_path)
                .await
                .fs_context("creating directory", &dest_path)?;
        } else {
            fs::copy(entry.path(), &dest_path)
                .await
                .fs_context("copying file", entry.path())?;
        }
    }

    Ok(())
}

/// Renames a file in place.
pub async fn move_file(from: &Path, to: &Path) -> Result<()> {
    fs::rename(from, to).await.fs_context("renaming file", from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_copy_dir_is_recursive() {
        let tmp = tempfile::tempdir().unwrap();
        let src = tmp.path().join("src");
        std::fs::create_dir_all(src.join("nested")).unwrap();
        std::fs::write(src.join("a.txt"), "a").unwrap();
        std::fs::write(src.join("nested/b.txt"), "b").unwrap();

        let dst = tmp.path().join("out/dst");
        copy_dir(&src, &dst).await.unwrap();

        assert_eq!(std::fs::read_to_string(dst.join("a.txt")).unwrap(), "a");
        assert_eq!(
            std::fs::read_to_string(dst.join("nested/b.txt")).unwrap(),
            "b"
        );
    }

    #[tokio::test]
    async fn test_copy_dir_missing_source() {
        let tmp = tempfile::tempdir().unwrap();
        let err = copy_dir(&tmp.path().join("nope"), &tmp.path().join("dst"))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("does not exist"));
    }

    #[tokio::test]
    async fn test_create_dir_all_erases() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("stage");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("stale"), "x").unwrap();

        create_dir_all(&dir, true).await.unwrap();
        assert!(dir.exists());
        assert!(!dir.join("stale").exists());
    }
}
