//! Persistence gateway for the load-order list.
//!
//! The store is the durable source of truth. The manager rebuilds its
//! in-memory list with `load_all` and keeps it in sync with per-record
//! `upsert`/`delete` calls, never bulk rewrites.

use crate::core::path::ensure_dir;
use crate::core::{ModError, ModResult};
use crate::package::Mod;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub trait ModStore: Send {
    /// Every persisted record, sorted by `order`
    fn load_all(&self) -> ModResult<Vec<Mod>>;

    /// Insert the record, or replace the one with the same internal name
    fn upsert(&mut self, record: &Mod) -> ModResult<()>;

    /// Remove the record with the same internal name, if any
    fn delete(&mut self, record: &Mod) -> ModResult<()>;
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct ModListFile {
    #[serde(default)]
    mods: Vec<Mod>,
}

/// Store backed by a single YAML file (`mods.yaml`)
#[derive(Debug, Clone)]
pub struct YamlModStore {
    path: PathBuf,
}

impl YamlModStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> ModResult<ModListFile> {
        if !self.path.exists() {
            return Ok(ModListFile::default());
        }

        let content = fs::read_to_string(&self.path).map_err(|e| ModError::io(&self.path, e))?;
        serde_yaml::from_str(&content).map_err(|e| {
            ModError::Store(format!("Failed to parse {}: {}", self.path.display(), e))
        })
    }

    fn write(&self, file: &ModListFile) -> ModResult<()> {
        if let Some(parent) = self.path.parent() {
            ensure_dir(parent)?;
        }

        let content = serde_yaml::to_string(file)?;

        // Write then rename so a crash never leaves a half-written list
        let tmp = self.path.with_extension("yaml.tmp");
        fs::write(&tmp, content).map_err(|e| ModError::io(&tmp, e))?;
        fs::rename(&tmp, &self.path).map_err(|e| ModError::io(&self.path, e))?;
        Ok(())
    }
}

impl ModStore for YamlModStore {
    fn load_all(&self) -> ModResult<Vec<Mod>> {
        let mut mods = self.read()?.mods;
        mods.sort_by_key(|m| m.order);
        Ok(mods)
    }

    fn upsert(&mut self, record: &Mod) -> ModResult<()> {
        let mut file = self.read()?;
        match file
            .mods
            .iter_mut()
            .find(|m| m.internal_name == record.internal_name)
        {
            Some(existing) => *existing = record.clone(),
            None => file.mods.push(record.clone()),
        }
        file.mods.sort_by_key(|m| m.order);
        self.write(&file)
    }

    fn delete(&mut self, record: &Mod) -> ModResult<()> {
        let mut file = self.read()?;
        let before = file.mods.len();
        file.mods.retain(|m| m.internal_name != record.internal_name);
        if file.mods.len() == before {
            return Ok(());
        }
        self.write(&file)
    }
}

/// In-process store, for embedding and tests
#[derive(Debug, Clone, Default)]
pub struct MemoryModStore {
    records: Vec<Mod>,
}

impl MemoryModStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_records(records: Vec<Mod>) -> Self {
        Self { records }
    }
}

impl ModStore for MemoryModStore {
    fn load_all(&self) -> ModResult<Vec<Mod>> {
        let mut mods = self.records.clone();
        mods.sort_by_key(|m| m.order);
        Ok(mods)
    }

    fn upsert(&mut self, record: &Mod) -> ModResult<()> {
        match self
            .records
            .iter_mut()
            .find(|m| m.internal_name == record.internal_name)
        {
            Some(existing) => *existing = record.clone(),
            None => self.records.push(record.clone()),
        }
        Ok(())
    }

    fn delete(&mut self, record: &Mod) -> ModResult<()> {
        self.records.retain(|m| m.internal_name != record.internal_name);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_yaml_store_missing_file_is_empty() {
        let temp = TempDir::new().unwrap();
        let store = YamlModStore::new(temp.path().join("mods.yaml"));
        assert!(store.load_all().unwrap().is_empty());
    }

    #[test]
    fn test_yaml_store_upsert_delete_roundtrip() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("data").join("mods.yaml");
        let mut store = YamlModStore::new(path.clone());

        store.upsert(&Mod::new("b", "/m/b.zip", 1)).unwrap();
        store.upsert(&Mod::new("a", "/m/a.zip", 0)).unwrap();

        let mut hidden = Mod::new("b", "/m/b.zip", 1);
        hidden.hidden = true;
        store.upsert(&hidden).unwrap();

        // A fresh handle sees the same data
        let reopened = YamlModStore::new(path);
        let mods = reopened.load_all().unwrap();
        assert_eq!(mods.len(), 2);
        assert_eq!(mods[0].internal_name, "a");
        assert!(mods[1].hidden);

        store.delete(&Mod::new("a", "/m/a.zip", 0)).unwrap();
        let mods = reopened.load_all().unwrap();
        assert_eq!(mods.len(), 1);
        assert_eq!(mods[0].internal_name, "b");
        assert!(!temp.path().join("data").join("mods.yaml.tmp").exists());
    }

    #[test]
    fn test_yaml_store_corrupt_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("mods.yaml");
        fs::write(&path, "mods: [this is: not valid").unwrap();

        let err = YamlModStore::new(path).load_all().unwrap_err();
        assert!(matches!(err, ModError::Store(_)));
    }

    #[test]
    fn test_memory_store_sorted_by_order() {
        let mut store = MemoryModStore::new();
        store.upsert(&Mod::new("late", "/m/late.zip", 2)).unwrap();
        store.upsert(&Mod::new("early", "/m/early.zip", 0)).unwrap();
        store.upsert(&Mod::new("mid", "/m/mid.zip", 1)).unwrap();

        let names: Vec<_> = store
            .load_all()
            .unwrap()
            .into_iter()
            .map(|m| m.internal_name)
            .collect();
        assert_eq!(names, ["early", "mid", "late"]);
    }
}
