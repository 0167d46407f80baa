//! A single INI file held in memory.

use std::fs::{self, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use tracing::{debug, warn};

use crate::error::{Result, StoreError};
use crate::grammar::{self, Sections};

/// Options controlling how a [`Store`] opens and closes its file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreOptions {
    /// Create an empty file when the path does not exist.
    pub create_missing: bool,
    /// Save pending changes when the store is closed or dropped.
    pub flush_on_close: bool,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            create_missing: true,
            flush_on_close: true,
        }
    }
}

/// One opened INI file.
///
/// Every value is kept as text; numeric reads and writes convert at the
/// edge. Failures never escape as errors from the plain methods: reads fall
/// back to the caller's default and writes return `false`. The `try_*`
/// methods expose the underlying [`StoreError`] for callers that want it.
#[derive(Debug)]
pub struct Store {
    path: PathBuf,
    sections: Sections,
    valid: bool,
    dirty: bool,
    options: StoreOptions,
}

impl Store {
    /// Open `path` with default options.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self::open_with(path, StoreOptions::default())
    }

    /// Open `path`, parsing it if present or creating it if allowed.
    ///
    /// The result is always a `Store`; check [`Store::is_valid`] to learn
    /// whether the file could be read or created.
    pub fn open_with(path: impl Into<PathBuf>, options: StoreOptions) -> Self {
        let path = path.into();
        let (sections, valid) = match load(&path, options) {
            Ok(sections) => (sections, true),
            Err(error) => {
                debug!(path = %path.display(), %error, "store failed to open");
                (Sections::new(), false)
            }
        };

        Self {
            path,
            sections,
            valid,
            dirty: false,
            options,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// Whether memory differs from what was last loaded or saved.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn sections(&self) -> &Sections {
        &self.sections
    }

    /// Look up the raw text stored under `section`/`key`.
    pub fn get(&self, section: &str, key: &str) -> Option<&str> {
        if !self.valid {
            return None;
        }
        self.sections
            .get(section.trim_ascii())?
            .get(key.trim_ascii())
            .map(String::as_str)
    }

    pub fn read_string(&self, section: &str, key: &str, default: &str) -> String {
        self.get(section, key).unwrap_or(default).to_string()
    }

    /// Read a base-10 integer. Missing keys and non-numeric text yield `default`.
    pub fn read_int(&self, section: &str, key: &str, default: i64) -> i64 {
        self.read_parsed(section, key).unwrap_or(default)
    }

    /// Read a decimal float. Missing keys, non-numeric text and numbers too
    /// large for an `f32` yield `default`.
    ///
    /// Text that spells out `inf` or `nan` reads as that value.
    pub fn read_float(&self, section: &str, key: &str, default: f32) -> f32 {
        let Some(text) = self.get(section, key) else {
            return default;
        };
        match text.parse::<f32>() {
            Ok(value) if value.is_finite() || spells_non_finite(text) => value,
            _ => default,
        }
    }

    fn read_parsed<T: FromStr>(&self, section: &str, key: &str) -> Option<T> {
        self.get(section, key)?.parse().ok()
    }

    /// Insert or overwrite a value, creating the section if needed.
    pub fn try_write(&mut self, section: &str, key: &str, value: &str) -> Result<()> {
        self.ensure_valid()?;
        let section = grammar::normalize_section(section)?;
        let key = grammar::normalize_key(key)?;
        let value = grammar::normalize_value(value)?;

        self.sections
            .entry(section.to_string())
            .or_default()
            .insert(key.to_string(), value.to_string());
        self.dirty = true;
        Ok(())
    }

    pub fn write_string(&mut self, section: &str, key: &str, value: &str) -> bool {
        let result = self.try_write(section, key, value);
        settle(&self.path, "write", result)
    }

    pub fn write_int(&mut self, section: &str, key: &str, value: i64) -> bool {
        self.write_string(section, key, &value.to_string())
    }

    pub fn write_float(&mut self, section: &str, key: &str, value: f32) -> bool {
        self.write_string(section, key, &value.to_string())
    }

    /// Remove one key. Returns whether it existed. An emptied section stays.
    pub fn delete_key(&mut self, section: &str, key: &str) -> bool {
        if !self.valid {
            return false;
        }
        let removed = self
            .sections
            .get_mut(section.trim_ascii())
            .and_then(|entries| entries.remove(key.trim_ascii()))
            .is_some();
        self.dirty |= removed;
        removed
    }

    /// Remove a section with all of its keys. Returns whether it existed.
    pub fn delete_section(&mut self, section: &str) -> bool {
        if !self.valid {
            return false;
        }
        let removed = self.sections.remove(section.trim_ascii()).is_some();
        self.dirty |= removed;
        removed
    }

    pub fn section_exists(&self, section: &str) -> bool {
        self.valid && self.sections.contains_key(section.trim_ascii())
    }

    pub fn key_exists(&self, section: &str, key: &str) -> bool {
        self.get(section, key).is_some()
    }

    /// Overwrite the backing file with the current contents.
    ///
    /// `dirty` is cleared only when the write succeeds.
    pub fn try_save(&mut self) -> Result<()> {
        self.ensure_valid()?;
        fs::write(&self.path, grammar::encode(&grammar::serialize(&self.sections)))
            .map_err(|error| StoreError::io(&self.path, error))?;
        self.dirty = false;
        Ok(())
    }

    pub fn save(&mut self) -> bool {
        let result = self.try_save();
        settle(&self.path, "save", result)
    }

    /// Close the store, flushing pending changes if configured to.
    ///
    /// Unlike dropping, this reports whether the final flush succeeded.
    pub fn close(mut self) -> Result<()> {
        let result = if self.dirty && self.options.flush_on_close {
            self.try_save()
        } else {
            Ok(())
        };
        // Drop must not retry a flush that already failed.
        self.dirty = false;
        result
    }

    fn ensure_valid(&self) -> Result<()> {
        if self.valid {
            Ok(())
        } else {
            Err(StoreError::Invalid {
                path: self.path.clone(),
            })
        }
    }
}

impl Drop for Store {
    fn drop(&mut self) {
        if self.dirty && self.options.flush_on_close {
            if let Err(error) = self.try_save() {
                warn!(path = %self.path.display(), %error, "flush on drop failed, changes lost");
            }
        }
    }
}

fn load(path: &Path, options: StoreOptions) -> Result<Sections> {
    match fs::read(path) {
        Ok(bytes) => Ok(grammar::parse(&grammar::decode(&bytes))),
        Err(error) if error.kind() == io::ErrorKind::NotFound && options.create_missing => {
            OpenOptions::new()
                .append(true)
                .create(true)
                .open(path)
                .map_err(|error| StoreError::io(path, error))?;
            Ok(Sections::new())
        }
        Err(error) => Err(StoreError::io(path, error)),
    }
}

fn spells_non_finite(text: &str) -> bool {
    text.trim_start_matches(['+', '-'])
        .starts_with(|c: char| c.is_ascii_alphabetic())
}

fn settle(path: &Path, op: &str, result: Result<()>) -> bool {
    match result {
        Ok(()) => true,
        Err(error) => {
            debug!(path = %path.display(), op, %error, "store operation rejected");
            false
        }
    }
}
