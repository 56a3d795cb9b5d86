//! `tape-sort` is an external-memory sort over emulated magnetic-tape devices.
//!
//! A tape is a bounded linear array of `i32` cells behind a single head that moves one cell
//! at a time; random access is possible only by paying a rewind cost proportional to the
//! distance travelled. Sorting such a medium with a bounded amount of RAM is the classic
//! external-sorting setting: the data lives on slow storage and only a caller-chosen chunk
//! of it may be held in memory at once. For more information see
//! [External Sorting](https://en.wikipedia.org/wiki/External_sorting).
//!
//! # Overview
//!
//! `tape-sort` supports the following features:
//!
//! * **Capability-typed tapes:**
//!   a [`Tape`] over a read-only stream cannot be written and vice versa; the compiler
//!   rejects the misuse, and the sort engine statically requires bidirectional scratch tapes.
//! * **Pluggable byte streams:**
//!   tapes run over anything implementing the [`stream`] port traits — a growable in-memory
//!   buffer and a regular file are provided.
//! * **Latency emulation:**
//!   every head operation can be charged a configurable nanosecond delay ([`DelayConfig`]),
//!   modelling the mechanics of a real tape drive.
//! * **Bounded memory:**
//!   [`sort_external`] keeps at most `chunk_size` cells in RAM and spreads the rest over
//!   three scratch tapes, partitioning around uniformly sampled pivots.
//!
//! # Example
//!
//! ```no_run
//! use tape_sort::{sort_external, FileStream, ReadOnly, Tape, WriteOnly};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let input = ReadOnly::new(FileStream::open("input.bin")?);
//!     let output = WriteOnly::new(FileStream::create("output.bin")?);
//!
//!     let mut input = Tape::new(input, 1 << 20)?;
//!     let mut output = Tape::new(output, 1 << 20)?;
//!     let mut tmp1 = Tape::new(FileStream::open_rw("t1.bin")?, 1 << 20)?;
//!     let mut tmp2 = Tape::new(FileStream::open_rw("t2.bin")?, 1 << 20)?;
//!     let mut tmp3 = Tape::new(FileStream::open_rw("t3.bin")?, 1 << 20)?;
//!
//!     sort_external(&mut input, &mut output, &mut tmp1, &mut tmp2, &mut tmp3, 1 << 16)?;
//!     output.flush()?;
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod guard;
pub mod sort;
pub mod stream;
pub mod tape;

pub use config::{ConfigError, DelayConfig};
pub use error::TapeError;
pub use guard::{scratch_path, FileGuard};
pub use sort::{
    peek, put, sort, sort_by, sort_external, sort_external_by, split, tape_to_vec, vec_to_tape,
    SubarrayInfo,
};
pub use stream::{FileStream, MemStream, ReadOnly, ReadStream, Stream, WriteOnly, WriteStream};
pub use tape::{Tape, CELL_SIZE};
