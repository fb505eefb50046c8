use std::fs;
use std::path::{Path, PathBuf};

use rstest::fixture;
use tempfile::TempDir;

pub struct Workspace {
    pub dir: TempDir,
}

impl Workspace {
    pub fn root(&self, name: &str) -> PathBuf {
        let path = self.dir.path().join(name);
        fs::create_dir_all(&path).expect("Failed to create root");
        path
    }

    pub fn write(&self, rel: &str, content: &str) -> PathBuf {
        let path = self.dir.path().join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent dir");
        }
        fs::write(&path, content).expect("Failed to write file");
        path
    }
}

#[fixture]
pub fn workspace() -> Workspace {
    Workspace {
        dir: TempDir::new().expect("Failed to create temp dir"),
    }
}

/// Files and directories under `root`, walked without any filter.
#[allow(dead_code)]
pub fn count_entries(root: &Path) -> usize {
    fs::read_dir(root)
        .expect("Failed to read dir")
        .map(|e| e.expect("Failed to read entry").path())
        .map(|p| if p.is_dir() { 1 + count_entries(&p) } else { 1 })
        .sum()
}
