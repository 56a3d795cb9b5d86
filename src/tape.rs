//! Capability-typed positional tape device.
//!
//! A [`Tape`] is a bounded linear array of `i32` cells laid out over a byte
//! stream, with a single head that moves one cell at a time. Random access
//! is possible only through [`Tape::seek`], which charges a rewind latency
//! proportional to the distance travelled. The capability set of the tape
//! (readable, writable, bidirectional) is the capability set of its stream
//! type, fixed at compile time.

use std::mem;
use std::thread;
use std::time::Duration;

use crate::config::DelayConfig;
use crate::error::TapeError;
use crate::stream::{ReadStream, Stream, WriteStream};

/// Size in bytes of one tape cell.
pub const CELL_SIZE: usize = mem::size_of::<i32>();

/// Sleeps for `nanos` nanoseconds; zero never enters the scheduler.
fn pause(nanos: u64) {
    if nanos > 0 {
        thread::sleep(Duration::from_nanos(nanos));
    }
}

/// Positional cursor over `size` cells of a byte stream.
///
/// The head position satisfies `0 <= pos <= size`; `pos == size` is *end*
/// and no cell may be read or written there. The last cell touched at the
/// current position is cached, so repeated [`Tape::get`] calls at one
/// position cost a single stream read. Any head movement invalidates the
/// cache.
pub struct Tape<S> {
    stream: S,
    size: usize,
    pos: usize,
    stream_offset: u64,
    buffer: i32,
    consistent: bool,
    delays: DelayConfig,
}

impl<S: Stream> Tape<S> {
    /// Whether cells can be read from this tape type.
    pub const READABLE: bool = S::READABLE;
    /// Whether cells can be written to this tape type.
    pub const WRITABLE: bool = S::WRITABLE;
    /// Whether this tape type is both readable and writable.
    pub const BIDIRECTIONAL: bool = S::READABLE && S::WRITABLE;

    /// Creates a tape of `size` cells over `stream`, head at the begin,
    /// cells starting at byte 0, no emulated latency.
    pub fn new(stream: S, size: usize) -> Result<Self, TapeError> {
        Tape::with_layout(stream, size, 0, 0, DelayConfig::default())
    }

    /// Creates a tape of `size` cells with the given latency table.
    pub fn with_delays(stream: S, size: usize, delays: DelayConfig) -> Result<Self, TapeError> {
        Tape::with_layout(stream, size, 0, 0, delays)
    }

    /// Creates a tape with full control over the layout: head at `pos`,
    /// cell 0 at byte `stream_offset` of the stream.
    ///
    /// A write-capable stream is extended with zero bytes until it holds
    /// the whole cell window `[stream_offset, stream_offset + size * 4)`.
    ///
    /// # Panics
    ///
    /// Panics if `pos > size`.
    pub fn with_layout(
        mut stream: S,
        size: usize,
        pos: usize,
        stream_offset: u64,
        delays: DelayConfig,
    ) -> Result<Self, TapeError> {
        assert!(pos <= size, "tape head {} outside the [0, {}] window", pos, size);

        if S::WRITABLE {
            stream.extend_with_zeros_to(stream_offset + size as u64 * CELL_SIZE as u64)?;
        }

        Ok(Tape {
            stream,
            size,
            pos,
            stream_offset,
            buffer: 0,
            consistent: false,
            delays,
        })
    }

    /// Number of cells on the tape.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Current head position, in `[0, size]`.
    pub fn pos(&self) -> usize {
        self.pos
    }

    /// Whether the head is at cell 0.
    pub fn is_begin(&self) -> bool {
        self.pos == 0
    }

    /// Whether the head is past the last cell.
    pub fn is_end(&self) -> bool {
        self.pos == self.size
    }

    /// Moves the head one cell forward.
    ///
    /// # Panics
    ///
    /// Panics if the head is at the end.
    pub fn next(&mut self) {
        assert!(self.pos < self.size, "tape head moved past the end");
        self.pos += 1;
        self.consistent = false;
        pause(self.delays.next_delay);
    }

    /// Moves the head one cell backward.
    ///
    /// # Panics
    ///
    /// Panics if the head is at the begin.
    pub fn prev(&mut self) {
        assert!(self.pos > 0, "tape head moved before the begin");
        self.pos -= 1;
        self.consistent = false;
        pause(self.delays.next_delay);
    }

    /// Moves the head by `diff` cells, charging the rewind latency
    /// `rewind_delay + rewind_step_delay * |diff|` (saturating).
    ///
    /// # Panics
    ///
    /// Panics if the target position leaves the `[0, size]` window.
    pub fn seek(&mut self, diff: isize) {
        assert!(self.diff_in_window(diff), "tape seek by {} leaves the head window", diff);

        if diff >= 0 {
            self.pos += diff as usize;
        } else {
            self.pos -= diff.unsigned_abs();
        }
        if diff != 0 {
            self.consistent = false;
        }

        let travel = self
            .delays
            .rewind_step_delay
            .saturating_mul(diff.unsigned_abs() as u64);
        pause(self.delays.rewind_delay.saturating_add(travel));
    }

    /// Hands the backing stream back, repositioning its cursors at the
    /// byte offset of cell 0. The tape ceases to exist.
    pub fn release(mut self) -> Result<S, TapeError> {
        self.stream.seek_to(self.stream_offset)?;
        Ok(self.stream)
    }

    fn diff_in_window(&self, diff: isize) -> bool {
        if diff >= 0 {
            diff as usize <= self.size - self.pos
        } else {
            diff.unsigned_abs() <= self.pos
        }
    }

    fn cell_offset(&self) -> u64 {
        self.stream_offset + self.pos as u64 * CELL_SIZE as u64
    }
}

impl<S: ReadStream> Tape<S> {
    /// Reads the cell under the head.
    ///
    /// The first read at a position goes to the stream; repeated reads are
    /// served from the cell cache. A read that lands past the end of the
    /// backing stream observes 0. Charges `read_delay`.
    ///
    /// # Panics
    ///
    /// Panics if the head is at the end.
    pub fn get(&mut self) -> Result<i32, TapeError> {
        assert!(self.pos < self.size, "tape read at the end");

        if !self.consistent {
            let mut cell = [0u8; CELL_SIZE];
            let count = self.stream.read_at(self.cell_offset(), &mut cell)?;
            self.buffer = if count < CELL_SIZE {
                0
            } else {
                i32::from_ne_bytes(cell)
            };
            self.consistent = true;
        }

        pause(self.delays.read_delay);
        Ok(self.buffer)
    }
}

impl<S: WriteStream> Tape<S> {
    /// Writes `value` into the cell under the head and refreshes the cell
    /// cache. Charges `write_delay`.
    ///
    /// # Panics
    ///
    /// Panics if the head is at the end.
    pub fn set(&mut self, value: i32) -> Result<(), TapeError> {
        assert!(self.pos < self.size, "tape write at the end");

        self.stream.write_at(self.cell_offset(), &value.to_ne_bytes())?;
        self.buffer = value;
        self.consistent = true;

        pause(self.delays.write_delay);
        Ok(())
    }

    /// Flushes the backing stream.
    pub fn flush(&mut self) -> Result<(), TapeError> {
        self.stream.flush()
    }
}
