//! Native call argument frames.

use crate::cell::{Cell, CELL_SIZE};
use crate::error::{AmxError, Result};

/// Arguments of one native call.
///
/// Mirrors the abstract machine's `params` array: slot 0 holds the size of
/// the argument list in bytes and arguments follow from slot 1, so
/// `arg(1)` is the first argument.
#[derive(Debug, Clone, Copy)]
pub struct Params<'a> {
    cells: &'a [Cell],
}

impl<'a> Params<'a> {
    /// Wrap a raw frame, header cell included.
    pub fn new(cells: &'a [Cell]) -> Self {
        Self { cells }
    }

    /// Build a frame (header plus arguments) from bare arguments.
    pub fn frame(args: &[Cell]) -> Vec<Cell> {
        let mut cells = Vec::with_capacity(args.len() + 1);
        cells.push((args.len() * CELL_SIZE) as Cell);
        cells.extend_from_slice(args);
        cells
    }

    /// Number of arguments, as declared by the header and bounded by the frame.
    pub fn count(&self) -> usize {
        let Some((&header, args)) = self.cells.split_first() else {
            return 0;
        };
        let declared = usize::try_from(header).unwrap_or(0) / CELL_SIZE;
        declared.min(args.len())
    }

    /// The argument at 1-based `index`.
    pub fn arg(&self, index: usize) -> Result<Cell> {
        let count = self.count();
        if index == 0 || index > count {
            return Err(AmxError::MissingArgument { index, count });
        }
        Ok(self.cells[index])
    }

    /// Check that at least `arity` arguments were passed.
    pub fn require(&self, arity: usize) -> Result<()> {
        let count = self.count();
        if count < arity {
            return Err(AmxError::MissingArgument {
                index: count + 1,
                count,
            });
        }
        Ok(())
    }
}
