// Staging Manager
//
// Private working copies for families that must not run on the original file.
// The staging directory is removed when the area is closed or dropped,
// whichever comes first.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::domain::InputFile;

/// One uniquely named directory per task invocation
#[derive(Debug)]
pub struct StagingArea {
    root: PathBuf,
    removed: bool,
}

impl StagingArea {
    /// Create `<parent>/<token>`; fails if it already exists
    pub fn create(parent: &Path, token: &str) -> io::Result<Self> {
        let root = parent.join(token);
        fs::create_dir(&root)?;
        debug!(path = %root.display(), "Created staging directory");
        Ok(Self { root, removed: false })
    }

    pub fn path(&self) -> &Path {
        &self.root
    }

    /// Copy `file` into the area under its display name
    pub fn stage(&self, file: &InputFile) -> io::Result<PathBuf> {
        let name = Path::new(&file.display_name).file_name().ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("display name '{}' has no file name", file.display_name),
            )
        })?;
        let target = self.root.join(name);
        fs::copy(&file.path, &target)?;
        Ok(target)
    }

    /// Remove the directory tree now and report failures
    pub fn close(mut self) -> io::Result<()> {
        self.remove()
    }

    fn remove(&mut self) -> io::Result<()> {
        if self.removed {
            return Ok(());
        }
        self.removed = true;
        match fs::remove_dir_all(&self.root) {
            Ok(()) => {
                debug!(path = %self.root.display(), "Removed staging directory");
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e),
        }
    }
}

impl Drop for StagingArea {
    fn drop(&mut self) {
        if let Err(e) = self.remove() {
            warn!(path = %self.root.display(), error = %e, "Failed to remove staging directory");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(dir: &Path, name: &str, content: &str) -> InputFile {
        let path = dir.join(format!("src-{}", name));
        fs::write(&path, content).unwrap();
        InputFile::new(name, path)
    }

    #[test]
    fn test_stage_copies_under_display_name() {
        let tmp = tempfile::tempdir().unwrap();
        let file = input(tmp.path(), "fake_firefox.sqlite", "data");

        let area = StagingArea::create(tmp.path(), "token").unwrap();
        let staged = area.stage(&file).unwrap();

        assert_eq!(staged, tmp.path().join("token").join("fake_firefox.sqlite"));
        assert_eq!(fs::read_to_string(&staged).unwrap(), "data");
        assert!(file.path.exists(), "original must be untouched");
    }

    #[test]
    fn test_close_removes_tree() {
        let tmp = tempfile::tempdir().unwrap();
        let file = input(tmp.path(), "000005.ldb", "x");

        let area = StagingArea::create(tmp.path(), "token").unwrap();
        area.stage(&file).unwrap();
        let root = area.path().to_path_buf();
        area.close().unwrap();

        assert!(!root.exists());
    }

    #[test]
    fn test_drop_removes_tree() {
        let tmp = tempfile::tempdir().unwrap();
        let root;
        {
            let area = StagingArea::create(tmp.path(), "token").unwrap();
            root = area.path().to_path_buf();
            fs::write(root.join("leftover"), "x").unwrap();
        }
        assert!(!root.exists());
    }

    #[test]
    fn test_display_name_cannot_escape() {
        let tmp = tempfile::tempdir().unwrap();
        let mut file = input(tmp.path(), "a.sqlite", "x");
        file.display_name = "../../a.sqlite".to_string();

        let area = StagingArea::create(tmp.path(), "token").unwrap();
        let staged = area.stage(&file).unwrap();
        assert_eq!(staged, area.path().join("a.sqlite"));
    }

    #[test]
    fn test_missing_source_is_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        let file = InputFile::new("gone.sqlite", tmp.path().join("gone.sqlite"));

        let area = StagingArea::create(tmp.path(), "token").unwrap();
        assert!(area.stage(&file).is_err());
    }

    #[test]
    fn test_token_collision_fails() {
        let tmp = tempfile::tempdir().unwrap();
        let _first = StagingArea::create(tmp.path(), "same").unwrap();
        assert!(StagingArea::create(tmp.path(), "same").is_err());
    }
}
