use anyhow::{Context, Result};
use grindguard_core::Store;
use std::fs;
use std::path::PathBuf;

pub fn grindguard_home() -> Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME is not set")?;
    Ok(PathBuf::from(home).join(".grindguard"))
}

pub fn ensure_grindguard_home() -> Result<PathBuf> {
    let dir = grindguard_home()?;
    fs::create_dir_all(&dir).with_context(|| format!("create {}", dir.display()))?;
    Ok(dir)
}

/// One JSON file per key under ~/.grindguard. The core engines only see the
/// `Store` trait, so everything above this stays testable with `MemoryStore`.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn open() -> Result<Self> {
        Ok(Self {
            dir: ensure_grindguard_home()?,
        })
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl Store for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key);
        if !path.exists() {
            return Ok(None);
        }
        let s = fs::read_to_string(&path).with_context(|| format!("read {}", path.display()))?;
        Ok(Some(s))
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let path = self.path_for(key);
        fs::write(&path, value).with_context(|| format!("write {}", path.display()))
    }

    fn remove(&self, key: &str) -> Result<()> {
        let path = self.path_for(key);
        if path.exists() {
            fs::remove_file(&path).with_context(|| format!("remove {}", path.display()))?;
        }
        Ok(())
    }
}
