//! Write-then-rename file replacement.

use std::fs;
use std::io::{self, Write};
use std::path::Path;
use tempfile::NamedTempFile;

/// Replace `path` with `contents` without ever exposing a partial file.
///
/// The temp file is created next to the destination so the final rename
/// stays on one filesystem.
pub(crate) fn write_atomically(path: &Path, contents: &[u8]) -> io::Result<()> {
    write_atomically_with_hook(path, contents, |_| Ok(()))
}

/// Like [`write_atomically`], running `pre_rename` on the synced temp file
/// just before it replaces `path`. An error from the hook aborts the write
/// and removes the temp file.
pub(crate) fn write_atomically_with_hook<F>(path: &Path, contents: &[u8], pre_rename: F) -> io::Result<()>
where
    F: FnOnce(&Path) -> io::Result<()>,
{
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(dir)?;

    let mut temp = NamedTempFile::new_in(dir)?;
    temp.write_all(contents)?;
    temp.flush()?;
    temp.as_file().sync_all()?;

    let temp_path = temp.into_temp_path();
    pre_rename(&temp_path)?;
    temp_path.persist(path).map_err(|e| e.error)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/deeper/out.json");

        write_atomically(&path, b"[]").unwrap();

        assert_eq!(fs::read(&path).unwrap(), b"[]");
    }

    #[test]
    fn test_write_replaces_existing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.json");
        fs::write(&path, b"old contents that are longer").unwrap();

        write_atomically(&path, b"new").unwrap();

        assert_eq!(fs::read(&path).unwrap(), b"new");
    }

    #[test]
    fn test_failed_write_leaves_no_temp_files() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("taken");
        fs::create_dir(&target).unwrap();
        fs::write(target.join("keep"), b"x").unwrap();

        assert!(write_atomically(&target, b"[]").is_err());

        let entries: Vec<_> = fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(entries.len(), 1);
        assert!(target.join("keep").exists());
    }

    #[test]
    fn test_hook_failure_leaves_original_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.json");
        fs::write(&path, b"[\"kept\"]\n").unwrap();

        let result = write_atomically_with_hook(&path, b"[\"replaced\"]\n", |temp| {
            assert!(temp.exists());
            Err(io::Error::other("interrupted before rename"))
        });

        assert!(result.is_err());
        assert_eq!(fs::read(&path).unwrap(), b"[\"kept\"]\n");
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }
}
