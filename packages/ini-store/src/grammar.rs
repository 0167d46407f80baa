//! INI text grammar.
//!
//! Parsing is tolerant: anything that is not a comment, a section header or a
//! `key=value` line under an open section is dropped without error. The
//! serializer emits the subset of the grammar the parser accepts, so any map
//! built through [`normalize_section`], [`normalize_key`] and
//! [`normalize_value`] survives a serialize/parse round trip unchanged.
//!
//! Files are read and written one byte per `char` (Latin-1), matching how
//! scripts pass text: bytes `0x80..=0xFF` keep their value whatever code page
//! the server uses.

use std::collections::BTreeMap;

use crate::error::{Result, StoreError};

/// Keys and their values inside one section.
pub type Entries = BTreeMap<String, String>;

/// Section name to entries. Sorted by name, which fixes serialization order.
pub type Sections = BTreeMap<String, Entries>;

/// Parse INI text into a section map. Never fails.
pub fn parse(text: &str) -> Sections {
    let mut sections = Sections::new();
    let mut current: Option<String> = None;

    for line in text.lines() {
        let line = line.trim_ascii();

        if line.is_empty() || line.starts_with(';') || line.starts_with('#') {
            continue;
        }

        if line.len() >= 2 && line.starts_with('[') && line.ends_with(']') {
            let name = line[1..line.len() - 1].trim_ascii();
            // `[]` closes the current section: following keys have nowhere to go.
            current = (!name.is_empty()).then(|| name.to_string());
            continue;
        }

        let Some((key, value)) = line.split_once('=') else {
            continue;
        };
        let key = key.trim_ascii();
        if key.is_empty() {
            continue;
        }

        if let Some(section) = &current {
            sections
                .entry(section.clone())
                .or_default()
                .insert(key.to_string(), value.trim_ascii().to_string());
        }
    }

    sections
}

/// Serialize a section map to INI text.
///
/// Each section becomes a `[name]` header, one `key=value` line per entry and
/// a trailing blank line.
pub fn serialize(sections: &Sections) -> String {
    let mut out = String::new();
    for (name, entries) in sections {
        out.push('[');
        out.push_str(name);
        out.push_str("]\n");
        for (key, value) in entries {
            out.push_str(key);
            out.push('=');
            out.push_str(value);
            out.push('\n');
        }
        out.push('\n');
    }
    out
}

/// Decode file bytes, one `char` per byte.
pub fn decode(bytes: &[u8]) -> String {
    bytes.iter().copied().map(char::from).collect()
}

/// Encode text for a file, one byte per `char`.
///
/// Text built through the `normalize_*` checks only holds `U+0000..=U+00FF`;
/// anything wider is written as `?`.
pub fn encode(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| u8::try_from(c).unwrap_or(b'?'))
        .collect()
}

fn has_line_break(text: &str) -> bool {
    text.contains(['\r', '\n'])
}

fn has_wide_char(text: &str) -> bool {
    text.chars().any(|c| u8::try_from(c).is_err())
}

fn is_unrepresentable(text: &str) -> bool {
    has_line_break(text) || has_wide_char(text)
}

/// Trim a section name and check that it can be written as a header.
pub fn normalize_section(name: &str) -> Result<&str> {
    let name = name.trim_ascii();
    if name.is_empty() {
        return Err(StoreError::EmptyName);
    }
    if is_unrepresentable(name) {
        return Err(StoreError::unrepresentable("section", name));
    }
    Ok(name)
}

/// Trim a key and check that it reads back as the same key.
pub fn normalize_key(key: &str) -> Result<&str> {
    let key = key.trim_ascii();
    if key.is_empty() {
        return Err(StoreError::EmptyName);
    }
    if is_unrepresentable(key) || key.contains('=') || key.starts_with([';', '#', '[']) {
        return Err(StoreError::unrepresentable("key", key));
    }
    Ok(key)
}

/// Trim a value and check it fits on a single line of single-byte chars.
pub fn normalize_value(value: &str) -> Result<&str> {
    let value = value.trim_ascii();
    if is_unrepresentable(value) {
        return Err(StoreError::unrepresentable("value", value));
    }
    Ok(value)
}
