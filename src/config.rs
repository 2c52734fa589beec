use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::options::{FileSize, FileUnit};

pub const APPLICATION_NAME: &str = "shrinkray";

/// Ceiling applied when a request names no file-size option of its own.
pub const DEFAULT_FILE_SIZE: FileSize = FileSize::new(50.0, FileUnit::Kb);

/// On-disk layout of the cache, derived from a home directory at startup.
///
/// Built once and passed explicitly into the components that touch disk;
/// nothing in the crate reads the environment after construction.
#[derive(Debug, Clone)]
pub struct Paths {
    pub cache_root: PathBuf,
    pub originals: PathBuf,
}

impl Paths {
    pub fn new(home: &Path) -> Self {
        let cache_root = home.join(".cache").join(APPLICATION_NAME);
        let originals = cache_root.join("orig");
        Self {
            cache_root,
            originals,
        }
    }

    /// Create the cache directories if absent.
    pub fn ensure_directories(&self) -> io::Result<()> {
        fs::create_dir_all(&self.cache_root)?;
        fs::create_dir_all(&self.originals)?;
        Ok(())
    }

    /// Where the untransformed bytes for `fingerprint` live. Files are named
    /// by fingerprint alone, with no extension.
    pub fn original_path(&self, fingerprint: &str) -> PathBuf {
        self.originals.join(fingerprint)
    }
}
