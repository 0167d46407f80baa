//! Unpacked Pawn strings: one byte per cell, zero terminated.

use crate::cell::{Cell, CELL_SIZE};
use crate::error::{AmxError, Result};
use crate::memory::AmxMemory;

const STEP: Cell = CELL_SIZE as Cell;

/// Read the string starting at `addr`.
///
/// Only the low byte of each cell is kept, and each byte becomes the `char`
/// with the same value, so bytes `0x80..=0xFF` come back unchanged through
/// [`set_string`]. An address outside the data segment reads as the empty
/// string, and a string running off the end of the segment is cut where the
/// segment ends.
pub fn get_string<M: AmxMemory + ?Sized>(memory: &M, addr: Cell) -> String {
    let mut text = String::new();
    let mut cursor = addr;
    while let Ok(cell) = memory.read_cell(cursor) {
        if cell == 0 {
            break;
        }
        text.push(char::from(cell as u8));
        match cursor.checked_add(STEP) {
            Some(next) => cursor = next,
            None => break,
        }
    }
    text
}

/// The byte a `char` occupies in a cell. Only `U+0000..=U+00FF` map to
/// themselves; anything wider is written as `?`.
pub fn char_to_byte(c: char) -> u8 {
    u8::try_from(c).unwrap_or(b'?')
}

/// Write `text` to `addr` in a buffer of `capacity` cells.
///
/// Each `char` takes one cell (see [`char_to_byte`]). At most
/// `capacity - 1` chars are written, followed by a terminator; longer text is
/// cut silently. A capacity of zero or less writes nothing. Both ends of the
/// destination are checked before anything is written, so a buffer that runs
/// off the segment is left untouched. Returns the number of chars written,
/// not counting the terminator.
pub fn set_string<M: AmxMemory + ?Sized>(
    memory: &mut M,
    addr: Cell,
    text: &str,
    capacity: Cell,
) -> Result<usize> {
    let Ok(capacity) = usize::try_from(capacity) else {
        return Ok(0);
    };
    if capacity == 0 {
        return Ok(0);
    }

    let len = text.chars().take(capacity - 1).count();
    let terminator = Cell::try_from(len)
        .ok()
        .and_then(|len| len.checked_mul(STEP))
        .and_then(|span| addr.checked_add(span))
        .ok_or(AmxError::BadAddress(addr))?;
    memory.read_cell(addr)?;
    memory.read_cell(terminator)?;

    let mut cursor = addr;
    for c in text.chars().take(len) {
        memory.write_cell(cursor, Cell::from(char_to_byte(c)))?;
        cursor += STEP;
    }
    memory.write_cell(cursor, 0)?;
    Ok(len)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::CellHeap;

    #[test]
    fn get_string_reads_until_terminator() {
        let mut heap = CellHeap::new();
        let addr = heap.alloc_string("config.ini");
        heap.alloc_string("next");
        assert_eq!(get_string(&heap, addr), "config.ini");
    }

    #[test]
    fn get_string_bad_address_is_empty() {
        let heap = CellHeap::new();
        assert_eq!(get_string(&heap, 0), "");
        assert_eq!(get_string(&heap, -4), "");
    }

    #[test]
    fn get_string_empty() {
        let mut heap = CellHeap::new();
        let addr = heap.alloc_string("");
        assert_eq!(get_string(&heap, addr), "");
    }

    #[test]
    fn get_string_unterminated_stops_at_segment_end() {
        let mut heap = CellHeap::new();
        let addr = heap.alloc(2);
        heap.write_cell(addr, Cell::from(b'o')).unwrap();
        heap.write_cell(addr + STEP, Cell::from(b'k')).unwrap();
        assert_eq!(get_string(&heap, addr), "ok");
    }

    #[test]
    fn get_string_keeps_low_byte() {
        let mut heap = CellHeap::new();
        let addr = heap.alloc(2);
        heap.write_cell(addr, 0x100 | Cell::from(b'A')).unwrap();
        assert_eq!(get_string(&heap, addr), "A");
    }

    #[test]
    fn high_bytes_are_one_char_each() {
        let mut heap = CellHeap::new();
        let addr = heap.alloc(4);
        for (i, byte) in [0x63, 0xE9, 0xFF].into_iter().enumerate() {
            heap.write_cell(addr + i as Cell * STEP, byte).unwrap();
        }
        assert_eq!(get_string(&heap, addr), "c\u{e9}\u{ff}");
    }

    #[test]
    fn every_byte_survives_a_round_trip() {
        let text: String = (1..=0xFFu8).map(char::from).collect();
        let mut heap = CellHeap::new();
        let addr = heap.alloc(256);
        assert_eq!(set_string(&mut heap, addr, &text, 256), Ok(255));
        for (i, byte) in (1..=0xFFu8).enumerate() {
            assert_eq!(heap.read_cell(addr + i as Cell * STEP), Ok(Cell::from(byte)));
        }
        assert_eq!(get_string(&heap, addr), text);
    }

    #[test]
    fn wide_chars_become_question_marks() {
        let mut heap = CellHeap::new();
        let addr = heap.alloc(4);
        assert_eq!(set_string(&mut heap, addr, "a\u{20ac}", 4), Ok(2));
        assert_eq!(get_string(&heap, addr), "a?");
    }

    #[test]
    fn set_string_fits() {
        let mut heap = CellHeap::new();
        let addr = heap.alloc(8);
        assert_eq!(set_string(&mut heap, addr, "value", 8), Ok(5));
        assert_eq!(get_string(&heap, addr), "value");
    }

    #[test]
    fn set_string_truncates_to_capacity_minus_one() {
        let mut heap = CellHeap::new();
        let addr = heap.alloc(4);
        let guard = heap.alloc_string("G");
        assert_eq!(set_string(&mut heap, addr, "truncate me", 4), Ok(3));
        assert_eq!(get_string(&heap, addr), "tru");
        assert_eq!(get_string(&heap, guard), "G");
    }

    #[test]
    fn set_string_zero_capacity_writes_nothing() {
        let mut heap = CellHeap::new();
        let addr = heap.alloc_string("keep");
        assert_eq!(set_string(&mut heap, addr, "x", 0), Ok(0));
        assert_eq!(set_string(&mut heap, addr, "x", -1), Ok(0));
        assert_eq!(get_string(&heap, addr), "keep");
    }

    #[test]
    fn set_string_capacity_one_writes_terminator() {
        let mut heap = CellHeap::new();
        let addr = heap.alloc_string("keep");
        assert_eq!(set_string(&mut heap, addr, "x", 1), Ok(0));
        assert_eq!(get_string(&heap, addr), "");
    }

    #[test]
    fn set_string_past_segment_writes_nothing() {
        let mut heap = CellHeap::new();
        let addr = heap.alloc_string("k");
        assert_eq!(
            set_string(&mut heap, addr, "long", 8),
            Err(AmxError::BadAddress(addr + 4 * STEP))
        );
        assert_eq!(heap.cells(), [Cell::from(b'k'), 0]);
    }

    #[test]
    fn set_string_bad_start_writes_nothing() {
        let mut heap = CellHeap::new();
        heap.alloc(4);
        assert_eq!(
            set_string(&mut heap, -STEP, "ab", 8),
            Err(AmxError::BadAddress(-STEP))
        );
        assert_eq!(heap.cells(), [0, 0, 0, 0]);
    }
}
