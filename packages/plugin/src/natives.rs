//! The `INI_*` natives.
//!
//! Every native decodes its arguments, resolves the handle, runs one store
//! operation and encodes the result. Any failure is logged and the script
//! receives `0`; nothing is reported through other channels.
//!
//! | native | arguments | returns |
//! |---|---|---|
//! | `INI_Open` | `path[]` | handle, or 0 |
//! | `INI_Close` | `handle` | 1 / 0 |
//! | `INI_ReadString` | `handle, section[], key[], dest[], maxlen` | 1 / 0 |
//! | `INI_ReadInt` | `handle, section[], key[], default` | value |
//! | `INI_ReadFloat` | `handle, section[], key[], Float:default` | `Float:` value |
//! | `INI_WriteString` | `handle, section[], key[], value[]` | 1 / 0 |
//! | `INI_WriteInt` | `handle, section[], key[], value` | 1 / 0 |
//! | `INI_WriteFloat` | `handle, section[], key[], Float:value` | 1 / 0 |
//! | `INI_DeleteKey` | `handle, section[], key[]` | 1 / 0 |
//! | `INI_DeleteSection` | `handle, section[]` | 1 / 0 |
//! | `INI_SectionExists` | `handle, section[]` | 1 / 0 |
//! | `INI_KeyExists` | `handle, section[], key[]` | 1 / 0 |

use pawn_ini_amx::{
    bool_to_cell, cell_to_float, float_to_cell, get_string, set_string, AmxMemory, Cell, Params,
};
use tracing::error;

use crate::error::Result;
use crate::registry::{Handle, Registry};

/// Signature shared by all natives.
pub type NativeFn = fn(&mut Registry, &mut dyn AmxMemory, Params<'_>) -> Cell;

/// Natives by the name scripts declare them under, in registration order.
pub const NATIVES: [(&str, NativeFn); 12] = [
    ("INI_Open", ini_open),
    ("INI_Close", ini_close),
    ("INI_ReadString", ini_read_string),
    ("INI_ReadInt", ini_read_int),
    ("INI_ReadFloat", ini_read_float),
    ("INI_WriteString", ini_write_string),
    ("INI_WriteInt", ini_write_int),
    ("INI_WriteFloat", ini_write_float),
    ("INI_DeleteKey", ini_delete_key),
    ("INI_DeleteSection", ini_delete_section),
    ("INI_SectionExists", ini_section_exists),
    ("INI_KeyExists", ini_key_exists),
];

/// Find a native by name.
pub fn lookup(name: &str) -> Option<NativeFn> {
    NATIVES
        .iter()
        .find(|(native, _)| *native == name)
        .map(|&(_, func)| func)
}

fn settle(native: &'static str, result: Result<Cell>) -> Cell {
    result.unwrap_or_else(|error| {
        error!(native, %error, "native call failed");
        0
    })
}

fn string_arg(amx: &dyn AmxMemory, params: Params<'_>, index: usize) -> Result<String> {
    Ok(get_string(amx, params.arg(index)?))
}

fn handle_arg(params: Params<'_>) -> Result<Handle> {
    Ok(Handle::from(params.arg(1)?))
}

pub fn ini_open(registry: &mut Registry, amx: &mut dyn AmxMemory, params: Params<'_>) -> Cell {
    settle("INI_Open", open(registry, amx, params))
}

fn open(registry: &mut Registry, amx: &mut dyn AmxMemory, params: Params<'_>) -> Result<Cell> {
    params.require(1)?;
    let path = string_arg(amx, params, 1)?;
    Ok(registry.acquire(&path)?.cell())
}

pub fn ini_close(registry: &mut Registry, amx: &mut dyn AmxMemory, params: Params<'_>) -> Cell {
    settle("INI_Close", close(registry, amx, params))
}

fn close(registry: &mut Registry, _amx: &mut dyn AmxMemory, params: Params<'_>) -> Result<Cell> {
    params.require(1)?;
    registry.release(handle_arg(params)?)?;
    Ok(1)
}

pub fn ini_read_string(
    registry: &mut Registry,
    amx: &mut dyn AmxMemory,
    params: Params<'_>,
) -> Cell {
    settle("INI_ReadString", read_string(registry, amx, params))
}

fn read_string(
    registry: &mut Registry,
    amx: &mut dyn AmxMemory,
    params: Params<'_>,
) -> Result<Cell> {
    params.require(5)?;
    let store = registry.get(handle_arg(params)?)?;
    let section = string_arg(amx, params, 2)?;
    let key = string_arg(amx, params, 3)?;
    let value = store.read_string(&section, &key, "");
    set_string(amx, params.arg(4)?, &value, params.arg(5)?)?;
    Ok(1)
}

pub fn ini_read_int(registry: &mut Registry, amx: &mut dyn AmxMemory, params: Params<'_>) -> Cell {
    settle("INI_ReadInt", read_int(registry, amx, params))
}

fn read_int(registry: &mut Registry, amx: &mut dyn AmxMemory, params: Params<'_>) -> Result<Cell> {
    params.require(4)?;
    let store = registry.get(handle_arg(params)?)?;
    let section = string_arg(amx, params, 2)?;
    let key = string_arg(amx, params, 3)?;
    let default = params.arg(4)?;
    let value = store.read_int(&section, &key, default as i64);
    Ok(Cell::try_from(value).unwrap_or(default))
}

pub fn ini_read_float(
    registry: &mut Registry,
    amx: &mut dyn AmxMemory,
    params: Params<'_>,
) -> Cell {
    settle("INI_ReadFloat", read_float(registry, amx, params))
}

fn read_float(
    registry: &mut Registry,
    amx: &mut dyn AmxMemory,
    params: Params<'_>,
) -> Result<Cell> {
    params.require(4)?;
    let store = registry.get(handle_arg(params)?)?;
    let section = string_arg(amx, params, 2)?;
    let key = string_arg(amx, params, 3)?;
    let default = cell_to_float(params.arg(4)?);
    Ok(float_to_cell(store.read_float(&section, &key, default)))
}

pub fn ini_write_string(
    registry: &mut Registry,
    amx: &mut dyn AmxMemory,
    params: Params<'_>,
) -> Cell {
    settle("INI_WriteString", write_string(registry, amx, params))
}

fn write_string(
    registry: &mut Registry,
    amx: &mut dyn AmxMemory,
    params: Params<'_>,
) -> Result<Cell> {
    params.require(4)?;
    let store = registry.get_mut(handle_arg(params)?)?;
    let section = string_arg(amx, params, 2)?;
    let key = string_arg(amx, params, 3)?;
    let value = string_arg(amx, params, 4)?;
    Ok(bool_to_cell(store.write_string(&section, &key, &value)))
}

pub fn ini_write_int(registry: &mut Registry, amx: &mut dyn AmxMemory, params: Params<'_>) -> Cell {
    settle("INI_WriteInt", write_int(registry, amx, params))
}

fn write_int(registry: &mut Registry, amx: &mut dyn AmxMemory, params: Params<'_>) -> Result<Cell> {
    params.require(4)?;
    let store = registry.get_mut(handle_arg(params)?)?;
    let section = string_arg(amx, params, 2)?;
    let key = string_arg(amx, params, 3)?;
    let value = params.arg(4)? as i64;
    Ok(bool_to_cell(store.write_int(&section, &key, value)))
}

pub fn ini_write_float(
    registry: &mut Registry,
    amx: &mut dyn AmxMemory,
    params: Params<'_>,
) -> Cell {
    settle("INI_WriteFloat", write_float(registry, amx, params))
}

fn write_float(
    registry: &mut Registry,
    amx: &mut dyn AmxMemory,
    params: Params<'_>,
) -> Result<Cell> {
    params.require(4)?;
    let store = registry.get_mut(handle_arg(params)?)?;
    let section = string_arg(amx, params, 2)?;
    let key = string_arg(amx, params, 3)?;
    let value = cell_to_float(params.arg(4)?);
    Ok(bool_to_cell(store.write_float(&section, &key, value)))
}

pub fn ini_delete_key(
    registry: &mut Registry,
    amx: &mut dyn AmxMemory,
    params: Params<'_>,
) -> Cell {
    settle("INI_DeleteKey", delete_key(registry, amx, params))
}

fn delete_key(
    registry: &mut Registry,
    amx: &mut dyn AmxMemory,
    params: Params<'_>,
) -> Result<Cell> {
    params.require(3)?;
    let store = registry.get_mut(handle_arg(params)?)?;
    let section = string_arg(amx, params, 2)?;
    let key = string_arg(amx, params, 3)?;
    Ok(bool_to_cell(store.delete_key(&section, &key)))
}

pub fn ini_delete_section(
    registry: &mut Registry,
    amx: &mut dyn AmxMemory,
    params: Params<'_>,
) -> Cell {
    settle("INI_DeleteSection", delete_section(registry, amx, params))
}

fn delete_section(
    registry: &mut Registry,
    amx: &mut dyn AmxMemory,
    params: Params<'_>,
) -> Result<Cell> {
    params.require(2)?;
    let store = registry.get_mut(handle_arg(params)?)?;
    let section = string_arg(amx, params, 2)?;
    Ok(bool_to_cell(store.delete_section(&section)))
}

pub fn ini_section_exists(
    registry: &mut Registry,
    amx: &mut dyn AmxMemory,
    params: Params<'_>,
) -> Cell {
    settle("INI_SectionExists", section_exists(registry, amx, params))
}

fn section_exists(
    registry: &mut Registry,
    amx: &mut dyn AmxMemory,
    params: Params<'_>,
) -> Result<Cell> {
    params.require(2)?;
    let store = registry.get(handle_arg(params)?)?;
    let section = string_arg(amx, params, 2)?;
    Ok(bool_to_cell(store.section_exists(&section)))
}

pub fn ini_key_exists(
    registry: &mut Registry,
    amx: &mut dyn AmxMemory,
    params: Params<'_>,
) -> Cell {
    settle("INI_KeyExists", key_exists(registry, amx, params))
}

fn key_exists(
    registry: &mut Registry,
    amx: &mut dyn AmxMemory,
    params: Params<'_>,
) -> Result<Cell> {
    params.require(3)?;
    let store = registry.get(handle_arg(params)?)?;
    let section = string_arg(amx, params, 2)?;
    let key = string_arg(amx, params, 3)?;
    Ok(bool_to_cell(store.key_exists(&section, &key)))
}
