//! # pawn-ini-amx
//!
//! Marshalling between the Pawn abstract machine and native Rust types.
//!
//! Natives receive cells: integers as-is, floats as raw `f32` bits, and
//! strings as byte addresses into the script's data segment. This crate
//! turns those into `i64`, `f32` and `String` and back, against any
//! [`AmxMemory`]. It does no raw pointer work itself; the plugin supplies an
//! `AmxMemory` over the live machine and tests use [`CellHeap`].

pub mod cell;
pub mod error;
pub mod memory;
pub mod params;
pub mod string;

pub use cell::{bool_to_cell, cell_to_float, float_to_cell, Cell, UCell, CELL_SIZE};
pub use error::{AmxError, Result};
pub use memory::{cell_index, AmxMemory, CellHeap};
pub use params::Params;
pub use string::{char_to_byte, get_string, set_string};
