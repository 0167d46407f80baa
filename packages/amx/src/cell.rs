//! The abstract machine word.
//!
//! A cell is as wide as a pointer on the host: 32 bits on 32-bit targets,
//! 64 bits on 64-bit targets. Integers pass through unchanged. Floats travel
//! as the raw bits of an `f32` in the low half of the cell, so the two
//! conversions here are bit casts, not numeric casts.

#[cfg(target_pointer_width = "64")]
pub type Cell = i64;
#[cfg(target_pointer_width = "64")]
pub type UCell = u64;

#[cfg(not(target_pointer_width = "64"))]
pub type Cell = i32;
#[cfg(not(target_pointer_width = "64"))]
pub type UCell = u32;

/// Size of one cell in bytes. Abstract machine addresses count bytes.
pub const CELL_SIZE: usize = std::mem::size_of::<Cell>();

/// Reinterpret the low 32 bits of a cell as an `f32`.
#[allow(clippy::unnecessary_cast)]
pub fn cell_to_float(cell: Cell) -> f32 {
    f32::from_bits(cell as UCell as u32)
}

/// Store the bits of an `f32` in a cell, upper bits zero.
#[allow(clippy::unnecessary_cast)]
pub fn float_to_cell(value: f32) -> Cell {
    value.to_bits() as UCell as Cell
}

/// Truth value as the abstract machine sees it.
pub fn bool_to_cell(value: bool) -> Cell {
    Cell::from(value)
}
