//! The load-order manager.
//!
//! `ModList` is the single owner of the ordered mod records and the lock
//! flag. Every mutation goes through it, and every mutation is written to
//! the store one record at a time before the call returns. Other components
//! get read-only views or subscribe to [`ModListEvent`]s.

use super::events::{EventBus, ModListEvent};
use super::ListPolicy;
use crate::config::Config;
use crate::core::path::mod_list_file;
use crate::core::{ModError, ModResult};
use crate::package::{ArchiveModLoader, Mod, ModInstaller, ModLoader};
use crate::store::{ModStore, YamlModStore};
use crate::tasks::{self, CancelToken};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::broadcast;

/// Outcome of a batch add
#[derive(Debug, Default)]
pub struct AddReport {
    /// Internal names of the accepted mods, in list order
    pub added: Vec<String>,
    pub rejected: Vec<(PathBuf, ModError)>,
}

pub struct ModList {
    mods: Vec<Mod>,
    locked: bool,
    store: Box<dyn ModStore>,
    loader: Arc<dyn ModLoader>,
    installer: Option<ModInstaller>,
    policy: ListPolicy,
    events: EventBus,
}

impl ModList {
    /// Load the list from `store`.
    ///
    /// Orders are normalised to list position; records whose stored order
    /// was off are written back.
    pub fn open(
        store: Box<dyn ModStore>,
        loader: Arc<dyn ModLoader>,
        policy: ListPolicy,
    ) -> ModResult<Self> {
        let mods = store.load_all()?;
        let mut list = Self {
            mods,
            locked: false,
            store,
            loader,
            installer: None,
            policy,
            events: EventBus::new(),
        };

        let renumbered = list.renumber()?;
        tracing::debug!(mods = list.mods.len(), renumbered, "Mod list created");

        Ok(list)
    }

    /// Build the list the application uses: YAML store in the data
    /// directory, archive loader, and an installer when a game directory is
    /// configured.
    pub fn from_config(config: &Config) -> ModResult<Self> {
        let store = YamlModStore::new(mod_list_file(&config.get_data_dir()?));
        tracing::debug!(path = %store.path().display(), "Opening mod list");
        let signatures = config.signature_table()?;
        let loader = ArchiveModLoader::new(signatures.clone());

        let mut list = Self::open(Box::new(store), Arc::new(loader), config.list_policy())?;
        if let Some(game_dir) = config.get_game_dir() {
            list = list.with_installer(ModInstaller::new(game_dir, signatures));
        }

        Ok(list)
    }

    pub fn with_installer(mut self, installer: ModInstaller) -> Self {
        self.installer = Some(installer);
        self
    }

    pub fn mods(&self) -> &[Mod] {
        &self.mods
    }

    pub fn installed_mods(&self) -> impl Iterator<Item = &Mod> {
        self.mods.iter().filter(|m| m.installed)
    }

    pub fn len(&self) -> usize {
        self.mods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mods.is_empty()
    }

    /// Position of the named mod. Every by-name lookup goes through here.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.mods.iter().position(|m| m.internal_name == name)
    }

    pub fn get_mod_by_name(&self, name: &str) -> Option<&Mod> {
        self.index_of(name).map(|idx| &self.mods[idx])
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ModListEvent> {
        self.events.subscribe()
    }

    /// Whether a dropped file looks like something [`add_mod`](Self::add_mod) could accept
    pub fn is_supported(&self, path: &Path) -> bool {
        self.loader.supports(path)
    }

    /// Load the package at `path` and append it to the end of the list.
    ///
    /// A rejected package leaves the list untouched; the reason is returned
    /// so batch callers can log it and carry on.
    pub fn add_mod(&mut self, path: &Path) -> ModResult<&Mod> {
        self.check_membership_lock("add mods")?;

        let candidate = self.loader.load(path, self.mods.len()).map_err(|e| {
            tracing::warn!(path = %path.display(), error = %e, "Rejected mod");
            e
        })?;

        let idx = self.accept(candidate)?;
        Ok(&self.mods[idx])
    }

    /// Add many packages, e.g. a drag-and-drop of several files.
    ///
    /// Loading runs on the blocking pool; accepted records are then applied
    /// one by one in input order. Once `cancel` fires no further work is
    /// started or applied.
    pub async fn add_mods(
        &mut self,
        paths: Vec<PathBuf>,
        cancel: &CancelToken,
    ) -> ModResult<AddReport> {
        self.check_membership_lock("add mods")?;

        let loaded =
            tasks::load_candidates(Arc::clone(&self.loader), paths, self.mods.len(), cancel).await;

        let mut report = AddReport::default();
        for (path, result) in loaded {
            let accepted = match result {
                Ok(_) if cancel.is_cancelled() => Err(ModError::Cancelled(format!(
                    "{} was not added",
                    path.display()
                ))),
                Ok(candidate) => self
                    .accept(candidate)
                    .map(|idx| self.mods[idx].internal_name.clone()),
                Err(e) => Err(e),
            };

            match accepted {
                Ok(name) => report.added.push(name),
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "Rejected mod");
                    report.rejected.push((path, e));
                }
            }
        }

        tracing::info!(
            added = report.added.len(),
            rejected = report.rejected.len(),
            "Batch add finished"
        );
        Ok(report)
    }

    /// Remove a mod from the list and the store. Unknown names are ignored.
    pub fn delete_mod(&mut self, name: &str) -> ModResult<()> {
        self.check_membership_lock("delete mods")?;

        let Some(idx) = self.index_of(name) else {
            tracing::debug!(name, "Mod not found, nothing to delete");
            return Ok(());
        };

        self.store.delete(&self.mods[idx])?;
        let removed = self.mods.remove(idx);
        tracing::info!(name = %removed.internal_name, "Deleted mod");
        self.events.publish(ModListEvent::Removed {
            name: removed.internal_name,
        });

        if self.renumber()? > 0 {
            self.events.publish(ModListEvent::Reordered);
        }

        Ok(())
    }

    /// Verify the package, copy its payload into the game directory and
    /// mark it installed. Unknown or already installed mods are ignored.
    pub fn install_mod(&mut self, name: &str) -> ModResult<()> {
        let Some(idx) = self.index_of(name) else {
            tracing::debug!(name, "Mod not found, nothing to install");
            return Ok(());
        };
        if self.mods[idx].installed {
            tracing::debug!(name, "Mod already installed");
            return Ok(());
        }

        let installer = self.installer.as_ref().ok_or_else(|| {
            ModError::Config("game_dir is not set; cannot install mods".to_string())
        })?;

        let installation = installer.install(&self.mods[idx])?;

        let mut updated = self.mods[idx].clone();
        updated.installed = true;
        if let Err(e) = self.store.upsert(&updated) {
            // Take the payload back out so disk matches the stored state
            if let Err(undo) = installer.rollback(&installation) {
                tracing::error!(name, error = %undo, "Could not undo install");
            }
            return Err(e);
        }

        self.mods[idx] = updated;
        self.events.publish(ModListEvent::Updated {
            name: name.to_string(),
        });
        Ok(())
    }

    /// Remove the mod's payload from the game directory and mark it not
    /// installed. Unknown or not installed mods are ignored.
    pub fn uninstall_mod(&mut self, name: &str) -> ModResult<()> {
        let Some(idx) = self.index_of(name) else {
            tracing::debug!(name, "Mod not found, nothing to uninstall");
            return Ok(());
        };
        if !self.mods[idx].installed {
            tracing::debug!(name, "Mod not installed");
            return Ok(());
        }

        let installer = self.installer.as_ref().ok_or_else(|| {
            ModError::Config("game_dir is not set; cannot uninstall mods".to_string())
        })?;

        installer.uninstall(&self.mods[idx])?;

        let mut updated = self.mods[idx].clone();
        updated.installed = false;
        if let Err(e) = self.store.upsert(&updated) {
            if let Err(undo) = installer.install(&self.mods[idx]) {
                tracing::error!(name, error = %undo, "Could not undo uninstall");
            }
            return Err(e);
        }

        self.mods[idx] = updated;
        self.events.publish(ModListEvent::Updated {
            name: name.to_string(),
        });
        Ok(())
    }

    pub fn hide_mod(&mut self, name: &str) -> ModResult<()> {
        self.set_hidden(name, true)
    }

    pub fn unhide_mod(&mut self, name: &str) -> ModResult<()> {
        self.set_hidden(name, false)
    }

    fn set_hidden(&mut self, name: &str, hidden: bool) -> ModResult<()> {
        let Some(idx) = self.index_of(name) else {
            tracing::debug!(name, "Mod not found");
            return Ok(());
        };
        if self.mods[idx].hidden == hidden {
            return Ok(());
        }

        if self.policy.persist_hidden {
            let mut updated = self.mods[idx].clone();
            updated.hidden = hidden;
            self.store.upsert(&updated)?;
            self.mods[idx] = updated;
        } else {
            self.mods[idx].hidden = hidden;
        }

        tracing::debug!(name, hidden, "Changed mod visibility");
        self.events.publish(ModListEvent::Updated {
            name: name.to_string(),
        });
        Ok(())
    }

    /// Move a mod `amount` places toward the front (positive) or the back
    /// (negative) of the load order, clipped at either end.
    ///
    /// Ignored while the list is locked or when the mod is unknown. When a
    /// store write fails the remaining writes are skipped and the error
    /// says how many records were saved.
    pub fn move_mod(&mut self, name: &str, amount: i64) -> ModResult<()> {
        if self.locked {
            tracing::debug!(name, "Mod list locked; cannot move mod");
            return Ok(());
        }

        let Some(idx) = self.index_of(name) else {
            tracing::debug!(name, "Mod not found, nothing to move");
            return Ok(());
        };

        let distance = usize::try_from(amount.unsigned_abs()).unwrap_or(usize::MAX);
        if amount > 0 {
            let lo = idx.saturating_sub(distance);
            if lo == idx {
                return Ok(());
            }
            self.mods[lo..=idx].rotate_right(1);
        } else {
            let hi = idx.saturating_add(distance).min(self.mods.len() - 1);
            if hi == idx {
                return Ok(());
            }
            self.mods[idx..=hi].rotate_left(1);
        }

        let result = self.renumber();
        for m in &self.mods {
            tracing::debug!(order = m.order, name = %m.internal_name, "Rotation result");
        }
        self.events.publish(ModListEvent::Reordered);

        result.map(|_| ())
    }

    pub fn lock_list(&mut self) {
        self.set_locked(true);
    }

    pub fn unlock_list(&mut self) {
        self.set_locked(false);
    }

    /// Set the session lock. Only reordering is gated unless the policy
    /// says otherwise.
    pub fn set_locked(&mut self, locked: bool) {
        if self.locked == locked {
            return;
        }
        self.locked = locked;
        tracing::debug!(locked, "Mod list lock changed");
        self.events.publish(ModListEvent::Relocked { locked });
    }

    /// Reload the list from the store, dropping unsaved in-memory state
    pub fn refresh_mods(&mut self) -> ModResult<()> {
        let fresh = self.store.load_all()?;

        if !self.policy.refresh_replaces_list {
            tracing::debug!(fetched = fresh.len(), "Refresh result discarded");
            return Ok(());
        }

        self.mods = fresh;
        let result = self.renumber();
        self.events.publish(ModListEvent::Reordered);
        result.map(|_| ())
    }

    fn check_membership_lock(&self, action: &str) -> ModResult<()> {
        if self.locked && self.policy.lock_gates_membership {
            tracing::debug!(action, "Mod list locked");
            return Err(ModError::Locked(format!(
                "cannot {} while the list is locked",
                action
            )));
        }
        Ok(())
    }

    /// Append a loaded record: uniqueness checks, then store, then memory.
    fn accept(&mut self, mut record: Mod) -> ModResult<usize> {
        if self.index_of(&record.internal_name).is_some() {
            return Err(ModError::Duplicate(format!(
                "a mod named '{}' is already in the list",
                record.internal_name
            )));
        }

        if let Some(sum) = record.checksum {
            if let Some(existing) = self.mods.iter().find(|m| m.checksum == Some(sum)) {
                return Err(ModError::Duplicate(format!(
                    "'{}' has the same content as '{}'",
                    record.internal_name, existing.internal_name
                )));
            }
        }

        record.order = self.mods.len();
        self.store.upsert(&record)?;

        tracing::info!(name = %record.internal_name, order = record.order, "Added mod");
        self.events.publish(ModListEvent::Added {
            name: record.internal_name.clone(),
        });
        self.mods.push(record);

        Ok(self.mods.len() - 1)
    }

    /// Set every `order` to its index and persist the records that changed.
    /// Returns how many were written.
    fn renumber(&mut self) -> ModResult<usize> {
        let changed: Vec<usize> = self
            .mods
            .iter()
            .enumerate()
            .filter(|(idx, m)| m.order != *idx)
            .map(|(idx, _)| idx)
            .collect();

        for &idx in &changed {
            self.mods[idx].order = idx;
        }

        let total = changed.len();
        for (written, &idx) in changed.iter().enumerate() {
            if let Err(e) = self.store.upsert(&self.mods[idx]) {
                tracing::error!(
                    name = %self.mods[idx].internal_name,
                    written,
                    total,
                    error = %e,
                    "Persisting load order failed"
                );
                return Err(ModError::PartialWrite {
                    written,
                    total,
                    source: Box::new(e),
                });
            }
        }

        Ok(total)
    }
}
