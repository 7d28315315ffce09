//! Reusable scratch buffer for the prefix-grouped collection decoder
//! (spec.md S5/S9).
//!
//! The source pools a per-thread offset-length array to avoid a fresh
//! allocation on every variable-length group decoded. This implementation
//! expresses the same "scoped acquisition, guaranteed release, cleared
//! before reuse" contract as an RAII guard rather than manual
//! acquire/release calls, since that is the idiomatic way to express it
//! in Rust and the teacher has no precedent to follow here.

use std::cell::RefCell;

thread_local! {
    static OFFSET_SCRATCH: RefCell<Vec<u32>> = const { RefCell::new(Vec::new()) };
}

/// A borrowed, cleared `Vec<u32>` scoped to a single decode call.
///
/// Dropping the guard clears the buffer and returns it to the thread-local
/// pool, so the next borrow on this thread never observes a previous
/// call's leftover offsets.
pub struct ScratchOffsets {
    buf: Vec<u32>,
}

impl ScratchOffsets {
    pub fn acquire() -> Self {
        let buf = OFFSET_SCRATCH.with(|cell| std::mem::take(&mut *cell.borrow_mut()));
        ScratchOffsets { buf }
    }

    pub fn as_vec(&mut self) -> &mut Vec<u32> {
        &mut self.buf
    }
}

impl Drop for ScratchOffsets {
    fn drop(&mut self) {
        self.buf.clear();
        let taken = std::mem::take(&mut self.buf);
        OFFSET_SCRATCH.with(|cell| *cell.borrow_mut() = taken);
    }
}
