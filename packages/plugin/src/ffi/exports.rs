//! Symbols the server looks up when it loads the plugin.
//!
//! The registry lives in a process-wide slot between `Load` and `Unload`.
//! Every native shim locks it for the length of one call, so natives never
//! observe each other half way through.

use std::ffi::{c_char, c_int, c_void, CString};
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use lazy_static::lazy_static;
use pawn_ini_amx::{Cell, Params};
use tracing::{debug, error, info, warn};

use super::raw_amx::{params_frame, register_natives, RawAmx};
use super::sdk::{
    Amx, AmxNative, LogPrintf, AMX_ERR_NONE, PLUGIN_DATA_LOGPRINTF, SUPPORTS_AMX_NATIVES,
    SUPPORTS_VERSION,
};
use crate::config::PluginConfig;
use crate::log::{self, LogSink};
use crate::natives::{NativeFn, NATIVES};
use crate::registry::Registry;

lazy_static! {
    static ref STATE: Mutex<Option<Registry>> = Mutex::new(None);
}

fn state() -> MutexGuard<'static, Option<Registry>> {
    // A panic inside a native leaves the registry itself consistent.
    STATE.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Install `registry`, closing whatever a previous load left behind.
fn start(registry: Registry) {
    let previous = state().replace(registry);
    if let Some(mut previous) = previous {
        previous.close_all();
    }
}

/// Drop the registry, closing every handle. Returns how many were open.
fn stop() -> usize {
    let registry = state().take();
    registry.map_or(0, |mut registry| registry.close_all())
}

/// Run one native against the live registry.
///
/// Returns 0 when the plugin is not loaded, the machine is unusable, or the
/// native panics.
fn dispatch(native: NativeFn, amx: *mut Amx, params: *const Cell) -> Cell {
    let call = || -> Option<Cell> {
        let mut memory = unsafe { RawAmx::new(amx) }?;
        let frame = unsafe { params_frame(params) };
        let mut state = state();
        let registry = state.as_mut()?;
        Some(native(registry, &mut memory, Params::new(frame)))
    };
    match panic::catch_unwind(AssertUnwindSafe(call)) {
        Ok(result) => result.unwrap_or(0),
        Err(_) => {
            error!("native call panicked");
            0
        }
    }
}

extern "system" fn shim<const N: usize>(amx: *mut Amx, params: *const Cell) -> Cell {
    dispatch(NATIVES[N].1, amx, params)
}

macro_rules! host_natives {
    ($($n:literal)*) => {
        [$((NATIVES[$n].0, shim::<$n> as AmxNative)),*]
    };
}

/// The native table with the calling convention the machine expects.
const HOST_NATIVES: [(&str, AmxNative); NATIVES.len()] =
    host_natives!(0 1 2 3 4 5 6 7 8 9 10 11);

/// Forwards log lines to the server's `logprintf`.
struct LogPrintfSink {
    logprintf: LogPrintf,
}

impl LogSink for LogPrintfSink {
    fn log(&self, line: &str) {
        let Ok(text) = CString::new(line.replace('\0', " ")) else {
            return;
        };
        let format = b"%s\0".as_ptr() as *const c_char;
        unsafe { (self.logprintf)(format, text.as_ptr()) };
    }
}

#[no_mangle]
#[allow(non_snake_case)]
pub extern "system" fn Supports() -> u32 {
    SUPPORTS_VERSION | SUPPORTS_AMX_NATIVES
}

/// # Safety
///
/// `data` must be the plugin data table the server passes to `Load`.
#[no_mangle]
#[allow(non_snake_case)]
pub unsafe extern "system" fn Load(data: *const *const c_void) -> bool {
    if data.is_null() {
        return false;
    }
    let logprintf = *data.add(PLUGIN_DATA_LOGPRINTF);
    if logprintf.is_null() {
        return false;
    }
    let logprintf = std::mem::transmute::<*const c_void, LogPrintf>(logprintf);

    let (config, rejected) = PluginConfig::from_env();
    let installed = log::install(Arc::new(LogPrintfSink { logprintf }), &config.log_filter);
    if !installed {
        debug!("logging was already set up by an earlier load");
    }
    for error in rejected {
        warn!(%error, "ignoring setting");
    }

    let max_open = config.registry.max_open;
    start(Registry::new(config.registry));
    info!(max_open, "plugin loaded");
    true
}

#[no_mangle]
#[allow(non_snake_case)]
pub extern "system" fn Unload() {
    let closed = stop();
    info!(closed, "plugin unloaded");
}

/// # Safety
///
/// `amx` must be a machine the server has just loaded.
#[no_mangle]
#[allow(non_snake_case)]
pub unsafe extern "system" fn AmxLoad(amx: *mut Amx) -> c_int {
    let bound = register_natives(amx, &HOST_NATIVES);
    debug!(bound, "registered natives");
    AMX_ERR_NONE
}

#[no_mangle]
#[allow(non_snake_case)]
pub extern "system" fn AmxUnload(_amx: *mut Amx) -> c_int {
    AMX_ERR_NONE
}

#[cfg(test)]
mod tests {
    use super::*;
    use pawn_ini_amx::{AmxMemory, CellHeap, CELL_SIZE};
    use tempfile::TempDir;

    fn call(native: &str, heap: &mut CellHeap, args: &[Cell]) -> Cell {
        let (_, func) = HOST_NATIVES
            .iter()
            .find(|(name, _)| *name == native)
            .unwrap();
        let frame = Params::frame(args);
        let mut cells = heap.cells().to_vec();
        let mut amx: Amx = unsafe { std::mem::zeroed() };
        amx.data = cells.as_mut_ptr() as *mut u8;
        amx.stp = (cells.len() * CELL_SIZE) as Cell;
        let result = func(&mut amx, frame.as_ptr());
        for (i, cell) in cells.into_iter().enumerate() {
            heap.write_cell((i * CELL_SIZE) as Cell, cell).unwrap();
        }
        result
    }

    #[test]
    fn host_table_matches_natives() {
        let host: Vec<&str> = HOST_NATIVES.iter().map(|(name, _)| *name).collect();
        let natives: Vec<&str> = NATIVES.iter().map(|(name, _)| *name).collect();
        assert_eq!(host, natives);
    }

    #[test]
    fn supports_natives() {
        assert_eq!(Supports(), 0x0200 | 0x10000);
        assert_eq!(AmxUnload(std::ptr::null_mut()), AMX_ERR_NONE);
    }

    // The only test touching the process-wide slot.
    #[test]
    fn lifecycle() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("cfg.ini").to_string_lossy().into_owned();
        let mut heap = CellHeap::new();
        let path = heap.alloc_string(&path);

        assert_eq!(call("INI_Open", &mut heap, &[path]), 0);

        start(Registry::default());
        let handle = call("INI_Open", &mut heap, &[path]);
        assert_eq!(handle, 1);
        let section = heap.alloc_string("core");
        let key = heap.alloc_string("level");
        assert_eq!(call("INI_WriteInt", &mut heap, &[handle, section, key, 5]), 1);
        assert_eq!(call("INI_ReadInt", &mut heap, &[handle, section, key, 0]), 5);
        assert_eq!(
            dispatch(NATIVES[0].1, std::ptr::null_mut(), std::ptr::null()),
            0
        );

        assert_eq!(stop(), 1);
        assert_eq!(stop(), 0);
        assert_eq!(
            std::fs::read_to_string(dir.path().join("cfg.ini")).unwrap(),
            "[core]\nlevel=5\n\n"
        );
        assert_eq!(call("INI_Close", &mut heap, &[handle]), 0);
    }
}
