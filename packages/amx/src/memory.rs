//! Access to the abstract machine's data segment.

use crate::cell::{Cell, CELL_SIZE};
use crate::error::{AmxError, Result};
use crate::string;

/// Cell-granular view of an abstract machine's data segment.
///
/// Addresses are byte offsets from the start of the data segment, as Pawn
/// passes them to natives. Implementations reject addresses that are
/// negative, unaligned or past the end of the segment.
pub trait AmxMemory {
    fn read_cell(&self, addr: Cell) -> Result<Cell>;

    fn write_cell(&mut self, addr: Cell, value: Cell) -> Result<()>;
}

impl<T: AmxMemory + ?Sized> AmxMemory for &mut T {
    fn read_cell(&self, addr: Cell) -> Result<Cell> {
        (**self).read_cell(addr)
    }

    fn write_cell(&mut self, addr: Cell, value: Cell) -> Result<()> {
        (**self).write_cell(addr, value)
    }
}

/// Convert a byte address to a cell index, checking alignment and sign.
pub fn cell_index(addr: Cell) -> Result<usize> {
    let offset = usize::try_from(addr).map_err(|_| AmxError::BadAddress(addr))?;
    if offset % CELL_SIZE != 0 {
        return Err(AmxError::BadAddress(addr));
    }
    Ok(offset / CELL_SIZE)
}

/// A heap-backed data segment.
///
/// Stands in for a running abstract machine wherever natives need memory to
/// read arguments from and write results to, chiefly in tests.
#[derive(Debug, Clone, Default)]
pub struct CellHeap {
    cells: Vec<Cell>,
}

impl CellHeap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserve `count` zeroed cells and return the address of the first.
    pub fn alloc(&mut self, count: usize) -> Cell {
        let addr = (self.cells.len() * CELL_SIZE) as Cell;
        self.cells.resize(self.cells.len() + count, 0);
        addr
    }

    /// Copy `text` in as an unpacked, zero-terminated string, one char per cell.
    pub fn alloc_string(&mut self, text: &str) -> Cell {
        let len = text.chars().count();
        let addr = self.alloc(len + 1);
        let start = self.cells.len() - len - 1;
        for (slot, c) in self.cells[start..].iter_mut().zip(text.chars()) {
            *slot = Cell::from(string::char_to_byte(c));
        }
        addr
    }

    /// Read back a zero-terminated string at `addr`.
    pub fn read_string(&self, addr: Cell) -> String {
        string::get_string(self, addr)
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }
}

impl AmxMemory for CellHeap {
    fn read_cell(&self, addr: Cell) -> Result<Cell> {
        let index = cell_index(addr)?;
        self.cells
            .get(index)
            .copied()
            .ok_or(AmxError::BadAddress(addr))
    }

    fn write_cell(&mut self, addr: Cell, value: Cell) -> Result<()> {
        let index = cell_index(addr)?;
        let slot = self
            .cells
            .get_mut(index)
            .ok_or(AmxError::BadAddress(addr))?;
        *slot = value;
        Ok(())
    }
}
