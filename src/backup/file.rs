use std::{
    fs, io,
    path::{Path, PathBuf},
};

use super::{BackupHandle, PermissionState};
use crate::utils::paths::{ensure_dir, write_atomic};

/// Backup target on the local filesystem.
#[derive(Debug, Clone)]
pub struct FileBackupHandle {
    path: PathBuf,
}

impl FileBackupHandle {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn parent(&self) -> Option<&Path> {
        self.path
            .parent()
            .filter(|parent| !parent.as_os_str().is_empty())
    }
}

fn is_read_only(path: &Path) -> Option<bool> {
    fs::metadata(path)
        .ok()
        .map(|meta| meta.permissions().readonly())
}

impl BackupHandle for FileBackupHandle {
    fn query_permission(&self) -> PermissionState {
        if let Some(read_only) = is_read_only(&self.path) {
            return if read_only {
                PermissionState::Denied
            } else {
                PermissionState::Granted
            };
        }
        match self.parent().map(is_read_only) {
            None => PermissionState::Granted,
            Some(Some(true)) => PermissionState::Denied,
            Some(Some(false)) => PermissionState::Granted,
            // Missing directory: creating it on request may still succeed.
            Some(None) => PermissionState::Prompt,
        }
    }

    fn request_permission(&mut self) -> PermissionState {
        match self.query_permission() {
            PermissionState::Prompt => match self.parent().map(ensure_dir) {
                Some(Err(_)) => PermissionState::Denied,
                _ => self.query_permission(),
            },
            decided => decided,
        }
    }

    fn write(&mut self, contents: &str) -> io::Result<()> {
        write_atomic(&self.path, contents)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writable_target_is_granted_and_written() {
        let dir = tempfile::tempdir().unwrap();
        let mut handle = FileBackupHandle::new(dir.path().join("backup.json"));
        assert_eq!(handle.query_permission(), PermissionState::Granted);

        handle.write("[]").unwrap();
        assert_eq!(fs::read_to_string(handle.path()).unwrap(), "[]");
    }

    #[test]
    fn missing_directory_is_created_on_request() {
        let dir = tempfile::tempdir().unwrap();
        let mut handle = FileBackupHandle::new(dir.path().join("nested").join("backup.json"));
        assert_eq!(handle.query_permission(), PermissionState::Prompt);
        assert_eq!(handle.request_permission(), PermissionState::Granted);
        assert!(dir.path().join("nested").is_dir());
    }
}
