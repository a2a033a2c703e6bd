//! Filesystem infrastructure: implements `ProjectFs` on the local disk.

use std::io;
use std::path::Path;

use crate::application::ports::ProjectFs;

/// Production filesystem implementation of `ProjectFs`.
pub struct LocalProjectFs;

impl ProjectFs for LocalProjectFs {
    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn create_dir(&self, path: &Path, mode: Option<u32>) -> io::Result<()> {
        let mut builder = std::fs::DirBuilder::new();
        #[cfg(unix)]
        {
            use std::os::unix::fs::DirBuilderExt;
            if let Some(mode) = mode {
                builder.mode(mode);
            }
        }
        #[cfg(not(unix))]
        let _ = mode;
        builder.create(path)
    }

    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        std::fs::create_dir_all(path)
    }

    fn copy_file(&self, from: &Path, to: &Path) -> io::Result<()> {
        std::fs::copy(from, to).map(|_| ())
    }

    fn remove_dir_all(&self, path: &Path) -> io::Result<()> {
        std::fs::remove_dir_all(path)
    }
}
