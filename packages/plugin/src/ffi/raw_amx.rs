//! Raw pointer access to a live abstract machine.
//!
//! Everything unsafe about talking to the server lives here. The rest of the
//! plugin sees the machine only through [`AmxMemory`].

use std::ffi::CStr;
use std::mem::size_of;
use std::ptr;

use pawn_ini_amx::{cell_index, AmxError, AmxMemory, Cell, Result, UCell, CELL_SIZE};

use super::sdk::{Amx, AmxHeader, AmxNative};

/// Offset of `nameofs` inside a native table entry.
const NAMEOFS_OFFSET: usize = size_of::<UCell>();

/// Data segment of a running script.
///
/// Addresses are checked against the top of the stack, the end of the
/// region the machine owns.
#[derive(Debug)]
pub struct RawAmx {
    data: *mut u8,
    limit: Cell,
}

impl RawAmx {
    /// View the data segment of `amx`.
    ///
    /// Returns `None` for a null machine or one without an image.
    ///
    /// # Safety
    ///
    /// `amx` must be null or point to a machine that stays alive, and is not
    /// otherwise accessed, for as long as the returned value is used.
    pub unsafe fn new(amx: *mut Amx) -> Option<Self> {
        if amx.is_null() {
            return None;
        }
        let machine = ptr::read_unaligned(amx);
        let data = if !machine.data.is_null() {
            machine.data
        } else if !machine.base.is_null() {
            let header = ptr::read_unaligned(machine.base as *const AmxHeader);
            machine.base.offset(header.dat as isize)
        } else {
            return None;
        };
        Some(Self {
            data,
            limit: machine.stp,
        })
    }

    fn offset(&self, addr: Cell) -> Result<usize> {
        let index = cell_index(addr)?;
        let end = addr.checked_add(CELL_SIZE as Cell);
        match end {
            Some(end) if end <= self.limit => Ok(index * CELL_SIZE),
            _ => Err(AmxError::BadAddress(addr)),
        }
    }
}

impl AmxMemory for RawAmx {
    fn read_cell(&self, addr: Cell) -> Result<Cell> {
        let offset = self.offset(addr)?;
        // In bounds of the segment per `offset`.
        Ok(unsafe { ptr::read_unaligned(self.data.add(offset) as *const Cell) })
    }

    fn write_cell(&mut self, addr: Cell, value: Cell) -> Result<()> {
        let offset = self.offset(addr)?;
        unsafe { ptr::write_unaligned(self.data.add(offset) as *mut Cell, value) };
        Ok(())
    }
}

/// Borrow the argument frame of a native call, header included.
///
/// # Safety
///
/// `params` must be null or point to a frame whose header counts the
/// argument bytes that follow it, valid for `'a`.
pub unsafe fn params_frame<'a>(params: *const Cell) -> &'a [Cell] {
    if params.is_null() {
        return &[];
    }
    let args = usize::try_from(*params).unwrap_or(0) / CELL_SIZE;
    std::slice::from_raw_parts(params, args + 1)
}

/// Bind `natives` to the matching entries of the script's native table.
///
/// Names the script does not declare are skipped. Returns how many entries
/// were bound.
///
/// # Safety
///
/// `amx` must be null or point to a loaded machine whose `base` holds a
/// complete script image.
pub unsafe fn register_natives(amx: *mut Amx, natives: &[(&str, AmxNative)]) -> usize {
    if amx.is_null() {
        return 0;
    }
    let base = ptr::read_unaligned(amx).base;
    if base.is_null() {
        return 0;
    }
    let header = ptr::read_unaligned(base as *const AmxHeader);
    let stride = usize::try_from(header.defsize).unwrap_or(0);
    if stride < NAMEOFS_OFFSET + size_of::<u32>() || header.libraries < header.natives {
        return 0;
    }
    let table = (header.libraries - header.natives) as usize;

    let mut bound = 0;
    for slot in 0..table / stride {
        let entry = base.add(header.natives as usize + slot * stride);
        let nameofs = ptr::read_unaligned(entry.add(NAMEOFS_OFFSET) as *const u32);
        let name = CStr::from_ptr(base.add(nameofs as usize) as *const _);
        let found = natives
            .iter()
            .find(|(native, _)| native.as_bytes() == name.to_bytes());
        if let Some(&(_, func)) = found {
            ptr::write_unaligned(entry as *mut UCell, func as usize as UCell);
            bound += 1;
        }
    }
    bound
}
