//! # pawn-ini
//!
//! A SA-MP server plugin giving Pawn scripts handle-based access to INI
//! files.
//!
//! Scripts open a file with `INI_Open`, read and write typed values through
//! the returned handle, and release it with `INI_Close`, which writes any
//! changes back to disk. Files that do not exist yet are created on open.
//!
//! The crate is split the way the calls flow:
//!
//! - [`ffi`]: exported plugin symbols and raw access to the abstract machine
//! - [`natives`]: the `INI_*` natives, written against [`AmxMemory`]
//! - [`registry`]: the handle table owning every open [`Store`]
//! - [`log`]: routing `tracing` output into the server log
//!
//! The natives never touch raw pointers, so they can be driven from tests
//! with a [`CellHeap`](pawn_ini_amx::CellHeap):
//!
//! ```
//! use pawn_ini::{natives, Registry};
//! use pawn_ini_amx::{CellHeap, Params};
//!
//! let mut registry = Registry::default();
//! let mut heap = CellHeap::new();
//! let frame = Params::frame(&[1]);
//! // Handle 1 was never issued.
//! assert_eq!(natives::ini_close(&mut registry, &mut heap, Params::new(&frame)), 0);
//! ```
//!
//! [`AmxMemory`]: pawn_ini_amx::AmxMemory
//! [`Store`]: pawn_ini_store::Store

pub mod config;
pub mod error;
pub mod ffi;
pub mod log;
pub mod natives;
pub mod registry;

pub use config::{PluginConfig, RegistryConfig};
pub use error::{PluginError, Result};
pub use log::LogSink;
pub use natives::{NativeFn, NATIVES};
pub use registry::{Handle, Registry};
