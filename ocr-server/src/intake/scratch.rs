use std::fs;
use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;
use uuid::Uuid;

use crate::error::{Result, ServerError};

/// A per-request copy of an upload on disk. The file is removed when this is
/// dropped, whether the request succeeded or not.
#[derive(Debug)]
pub struct ScratchFile {
    file: NamedTempFile,
}

impl ScratchFile {
    pub fn create(dir: &Path, request_id: Uuid, bytes: &[u8]) -> Result<Self> {
        fs::create_dir_all(dir).map_err(|e| {
            ServerError::Internal(format!(
                "cannot create scratch directory {}: {e}",
                dir.display()
            ))
        })?;

        let prefix = format!("upload-{request_id}-");
        let mut file = tempfile::Builder::new()
            .prefix(&prefix)
            .suffix(".img")
            .tempfile_in(dir)?;
        file.write_all(bytes)?;
        file.flush()?;

        Ok(Self { file })
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scratch_file_holds_bytes_and_is_removed_on_drop() {
        let dir = tempfile::tempdir().unwrap();
        let id = Uuid::new_v4();

        let scratch = ScratchFile::create(dir.path(), id, b"payload").unwrap();
        let path = scratch.path().to_path_buf();
        assert_eq!(fs::read(&path).unwrap(), b"payload");
        assert!(path
            .file_name()
            .unwrap()
            .to_string_lossy()
            .contains(&id.to_string()));

        drop(scratch);
        assert!(!path.exists());
    }

    #[test]
    fn concurrent_requests_get_distinct_paths() {
        let dir = tempfile::tempdir().unwrap();
        let a = ScratchFile::create(dir.path(), Uuid::new_v4(), b"a").unwrap();
        let b = ScratchFile::create(dir.path(), Uuid::new_v4(), b"b").unwrap();

        assert_ne!(a.path(), b.path());
        assert_eq!(fs::read(a.path()).unwrap(), b"a");
        assert_eq!(fs::read(b.path()).unwrap(), b"b");
    }

    #[test]
    fn scratch_directory_is_created_on_demand() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("scratch").join("deeper");
        let scratch = ScratchFile::create(&nested, Uuid::new_v4(), b"x").unwrap();
        assert!(scratch.path().starts_with(&nested));
    }
}
