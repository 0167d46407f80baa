//! Glue between the server's plugin interface and the registry.

pub mod exports;
pub mod raw_amx;
pub mod sdk;

pub use raw_amx::{params_frame, register_natives, RawAmx};
