//! Types and constants of the server's plugin interface.

use std::ffi::{c_char, c_int, c_long, c_void};

use pawn_ini_amx::Cell;

/// Plugin interface version this plugin is built against.
pub const SUPPORTS_VERSION: u32 = 0x0200;
/// The plugin registers natives with loaded scripts.
pub const SUPPORTS_AMX_NATIVES: u32 = 0x10000;

/// Index of the logging function in the table passed to `Load`.
pub const PLUGIN_DATA_LOGPRINTF: usize = 0x00;

pub const AMX_ERR_NONE: c_int = 0;
pub const AMX_USERNUM: usize = 4;

/// Server-provided printf-style logger.
pub type LogPrintf = unsafe extern "C" fn(format: *const c_char, ...);

/// Entry point of a native as the abstract machine calls it.
pub type AmxNative = extern "system" fn(amx: *mut Amx, params: *const Cell) -> Cell;

/// State of one loaded script.
#[repr(C, packed)]
#[derive(Debug, Clone, Copy)]
pub struct Amx {
    pub base: *mut u8,
    pub data: *mut u8,
    pub callback: *mut c_void,
    pub debug: *mut c_void,
    pub cip: Cell,
    pub frm: Cell,
    pub hea: Cell,
    pub hlw: Cell,
    pub stk: Cell,
    pub stp: Cell,
    pub flags: c_int,
    pub usertags: [c_long; AMX_USERNUM],
    pub userdata: [*mut c_void; AMX_USERNUM],
    pub error: c_int,
    pub paramcount: c_int,
    pub pri: Cell,
    pub alt: Cell,
    pub reset_stk: Cell,
    pub reset_hea: Cell,
    pub sysreq_d: Cell,
}

/// Header at the start of a compiled script image.
///
/// Offsets are relative to [`Amx::base`].
#[repr(C)]
#[derive(Debug, Clone, Copy, Default)]
pub struct AmxHeader {
    pub size: i32,
    pub magic: u16,
    pub file_version: u8,
    pub amx_version: u8,
    pub flags: i16,
    pub defsize: i16,
    pub cod: i32,
    pub dat: i32,
    pub hea: i32,
    pub stp: i32,
    pub cip: i32,
    pub publics: i32,
    pub natives: i32,
    pub libraries: i32,
    pub pubvars: i32,
    pub tags: i32,
    pub nametable: i32,
}
