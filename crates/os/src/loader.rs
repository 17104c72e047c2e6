use std::fs;
use std::path::{Path, PathBuf};

use kernel::{ProgramImage, ProgramLoader};
use log::{debug, warn};
use types::{Address, HypoError, MemoryLayout, Result};
use vm::Memory;

/// Loads programs in the absolute text format from files.
///
/// Program names are resolved against `root` unless they are absolute paths.
#[derive(Clone, Debug)]
pub struct FileLoader {
    root: PathBuf,
}

impl FileLoader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn resolve(&self, program: &str) -> PathBuf {
        let path = Path::new(program);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }

    pub fn read_image(&self, program: &str) -> Result<ProgramImage> {
        let path = self.resolve(program);
        let text = fs::read_to_string(&path).map_err(|e| {
            warn!("cannot open {}: {}", path.display(), e);
            HypoError::FileOpen
        })?;
        debug!("read {} ({} bytes)", path.display(), text.len());
        ProgramImage::parse(&text)
    }
}

impl Default for FileLoader {
    fn default() -> Self {
        Self::new(".")
    }
}

impl ProgramLoader for FileLoader {
    fn load(
        &mut self,
        program: &str,
        memory: &mut Memory,
        layout: &MemoryLayout,
    ) -> Result<Address> {
        self.read_image(program)?.load_into(memory, layout)
    }
}
