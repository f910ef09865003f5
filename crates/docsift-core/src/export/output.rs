//! Output directory management and atomic artifact publication.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use tempfile::NamedTempFile;
use tracing::{debug, info};

use crate::error::ExportError;

/// Upper bound on collision suffixes tried for one artifact name.
const MAX_NAME_ATTEMPTS: u32 = 1000;

/// Directory that receives rendered artifacts.
///
/// Artifacts are written to a temporary file inside the directory and then
/// moved into place without replacing an existing file, so readers never see
/// a partially written artifact and two exports never share a path.
#[derive(Debug, Clone)]
pub struct OutputDirectory {
    root: PathBuf,
}

impl OutputDirectory {
    /// Use `root` as the destination, creating it if absent.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, ExportError> {
        let dir = Self { root: root.into() };
        dir.ensure()?;
        Ok(dir)
    }

    pub fn path(&self) -> &Path {
        &self.root
    }

    /// Create the directory if it does not exist.
    pub fn ensure(&self) -> Result<(), ExportError> {
        if !self.root.is_dir() {
            std::fs::create_dir_all(&self.root).map_err(|source| ExportError::Directory {
                path: self.root.clone(),
                source,
            })?;
            info!("Created export directory: {}", self.root.display());
        }
        Ok(())
    }

    /// Write `contents` under a unique name derived from `base_name`, the
    /// timestamp and `extension`, returning the absolute path.
    pub fn publish(
        &self,
        base_name: &str,
        extension: &str,
        contents: &[u8],
        timestamp: DateTime<Utc>,
    ) -> Result<PathBuf, ExportError> {
        self.ensure()?;

        let root = self.root.canonicalize().map_err(|source| ExportError::Directory {
            path: self.root.clone(),
            source,
        })?;

        let mut staged = NamedTempFile::new_in(&root).map_err(|source| ExportError::Directory {
            path: root.clone(),
            source,
        })?;
        staged
            .write_all(contents)
            .and_then(|_| staged.as_file().sync_all())
            .map_err(|source| ExportError::Write {
                path: staged.path().to_path_buf(),
                source,
            })?;

        let stem = format!("{}_{}", base_name, timestamp.format("%Y%m%d%H%M%S%3f"));

        for attempt in 0..MAX_NAME_ATTEMPTS {
            let file_name = if attempt == 0 {
                format!("{}.{}", stem, extension)
            } else {
                format!("{}_{}.{}", stem, attempt, extension)
            };
            let target = root.join(file_name);

            match staged.persist_noclobber(&target) {
                Ok(_) => {
                    debug!("Published {} bytes to {}", contents.len(), target.display());
                    return Ok(target);
                }
                Err(err) if err.error.kind() == io::ErrorKind::AlreadyExists => {
                    staged = err.file;
                }
                Err(err) => {
                    return Err(ExportError::Write {
                        path: target,
                        source: err.error,
                    });
                }
            }
        }

        Err(ExportError::Write {
            path: root.join(format!("{}.{}", stem, extension)),
            source: io::Error::new(
                io::ErrorKind::AlreadyExists,
                "no free artifact name left for this timestamp",
            ),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn fixed_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 6, 7, 8, 9).unwrap()
    }

    #[test]
    fn test_open_creates_missing_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let nested = tmp.path().join("a").join("b");

        let dir = OutputDirectory::open(&nested).unwrap();
        assert!(nested.is_dir());
        assert_eq!(dir.path(), nested.as_path());
    }

    #[test]
    fn test_publish_writes_named_artifact() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = OutputDirectory::open(tmp.path()).unwrap();

        let path = dir.publish("invoice", "txt", b"hello", fixed_time()).unwrap();

        assert!(path.is_absolute());
        assert_eq!(
            path.file_name().unwrap().to_str().unwrap(),
            "invoice_20240506070809000.txt"
        );
        assert_eq!(std::fs::read(&path).unwrap(), b"hello");
    }

    #[test]
    fn test_same_name_never_overwrites() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = OutputDirectory::open(tmp.path()).unwrap();

        let first = dir.publish("doc", "csv", b"one", fixed_time()).unwrap();
        let second = dir.publish("doc", "csv", b"two", fixed_time()).unwrap();

        assert_ne!(first, second);
        assert_eq!(std::fs::read(&first).unwrap(), b"one");
        assert_eq!(std::fs::read(&second).unwrap(), b"two");
        assert!(second.to_str().unwrap().ends_with("_1.csv"));
    }

    #[test]
    fn test_no_temporary_files_left_behind() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = OutputDirectory::open(tmp.path()).unwrap();
        dir.publish("doc", "txt", b"x", fixed_time()).unwrap();

        let entries: Vec<_> = std::fs::read_dir(tmp.path()).unwrap().collect();
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn test_failed_publish_leaves_nothing_behind() {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path().join("out");
        let dir = OutputDirectory::open(&root).unwrap();

        std::fs::remove_dir(&root).unwrap();
        std::fs::write(&root, b"").unwrap();

        let err = dir.publish("doc", "txt", b"x", fixed_time()).unwrap_err();
        assert!(matches!(err, ExportError::Directory { .. }));

        let entries: Vec<_> = std::fs::read_dir(tmp.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(entries, vec![std::ffi::OsString::from("out")]);
    }

    #[test]
    fn test_directory_error_when_root_is_a_file() {
        let tmp = tempfile::tempdir().unwrap();
        let file = tmp.path().join("taken");
        std::fs::write(&file, b"").unwrap();

        let err = OutputDirectory::open(&file).unwrap_err();
        assert!(matches!(err, ExportError::Directory { .. }));
    }
}
