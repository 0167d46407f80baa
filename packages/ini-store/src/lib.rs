//! # pawn-ini-store
//!
//! Section/key/value configuration files kept in memory.
//!
//! ```text
//! [SectionName]
//! key=value
//! key2=value2
//! ```
//!
//! Lines starting with `;` or `#` are comments. Anything the grammar does
//! not recognise is skipped, so loading never fails on content; only I/O can
//! make a [`Store`] invalid.
//!
//! ## Example
//!
//! ```rust,no_run
//! use pawn_ini_store::Store;
//!
//! let mut store = Store::open("server.ini");
//! if store.is_valid() {
//!     store.write_int("core", "level", 5);
//!     assert_eq!(store.read_int("core", "level", 0), 5);
//!     store.save();
//! }
//! ```

pub mod error;
pub mod grammar;
pub mod store;

pub use error::{Result, StoreError};
pub use grammar::{decode, encode, parse, serialize, Entries, Sections};
pub use store::{Store, StoreOptions};
