//! Handle table mapping script-visible integers to open stores.

use std::collections::BTreeMap;

use pawn_ini_amx::Cell;
use pawn_ini_store::Store;
use tracing::{debug, info, warn};

use crate::config::RegistryConfig;
use crate::error::{PluginError, Result};

/// A script-visible reference to an open store.
///
/// Issued handles are positive and increase by one per successful open.
/// A closed handle is never issued again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Handle(Cell);

impl Handle {
    pub fn cell(self) -> Cell {
        self.0
    }
}

impl From<Cell> for Handle {
    fn from(cell: Cell) -> Self {
        Handle(cell)
    }
}

/// Owns every open [`Store`], keyed by [`Handle`].
///
/// Each registry is independent: the plugin keeps one for the whole
/// server, tests build as many as they like.
#[derive(Debug)]
pub struct Registry {
    config: RegistryConfig,
    stores: BTreeMap<Handle, Store>,
    next: Cell,
}

impl Registry {
    pub fn new(config: RegistryConfig) -> Self {
        Self {
            config,
            stores: BTreeMap::new(),
            next: 1,
        }
    }

    /// Open `path` and hand out a new handle for it.
    ///
    /// Fails without issuing a handle when the path is empty, the limit of
    /// live handles is reached, or the store could not be opened.
    pub fn acquire(&mut self, path: &str) -> Result<Handle> {
        if path.is_empty() {
            return Err(PluginError::EmptyPath);
        }
        if self.stores.len() >= self.config.max_open {
            return Err(PluginError::TooManyOpen {
                limit: self.config.max_open,
            });
        }
        let following = self
            .next
            .checked_add(1)
            .ok_or(PluginError::HandlesExhausted)?;

        let store = Store::open_with(path, self.config.store);
        if !store.is_valid() {
            return Err(PluginError::OpenFailed {
                path: path.to_string(),
            });
        }

        let handle = Handle(self.next);
        self.next = following;
        self.stores.insert(handle, store);
        info!(handle = handle.cell(), path, "opened INI file");
        Ok(handle)
    }

    /// Close `handle`, flushing its store if it has unsaved changes.
    ///
    /// A failed flush is logged; the handle is released regardless.
    pub fn release(&mut self, handle: Handle) -> Result<()> {
        let store = self
            .stores
            .remove(&handle)
            .ok_or(PluginError::InvalidHandle(handle.cell()))?;

        let path = store.path().display().to_string();
        match store.close() {
            Ok(()) => debug!(handle = handle.cell(), %path, "closed INI file"),
            Err(error) => warn!(
                handle = handle.cell(),
                %path,
                %error,
                "closed INI file but the final flush failed, changes lost"
            ),
        }
        Ok(())
    }

    /// Borrow the store behind `handle` for the current call.
    pub fn get(&self, handle: Handle) -> Result<&Store> {
        self.stores
            .get(&handle)
            .ok_or(PluginError::InvalidHandle(handle.cell()))
    }

    pub fn get_mut(&mut self, handle: Handle) -> Result<&mut Store> {
        self.stores
            .get_mut(&handle)
            .ok_or(PluginError::InvalidHandle(handle.cell()))
    }

    /// Release every live handle in ascending order. Returns how many were released.
    pub fn close_all(&mut self) -> usize {
        let handles: Vec<Handle> = self.stores.keys().copied().collect();
        let mut closed = 0;
        for handle in handles {
            match self.release(handle) {
                Ok(()) => closed += 1,
                Err(error) => warn!(handle = handle.cell(), %error, "failed to release handle"),
            }
        }
        closed
    }

    pub fn len(&self) -> usize {
        self.stores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stores.is_empty()
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new(RegistryConfig::default())
    }
}
