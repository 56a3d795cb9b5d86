//! Tape sorter.
//!
//! Two entry points are provided. [`sort`] streams the whole input into RAM,
//! sorts it there and writes it out — it needs as much memory as the input
//! occupies. [`sort_external`] keeps at most `chunk_size` cells in RAM and
//! spreads the rest over three bidirectional scratch tapes, partitioning
//! recursively around a pivot drawn uniformly from the current range. The
//! ordering is defined by a comparator and the sort is not stable.

use std::cmp::Ordering;

use log;
use rand::Rng;

use crate::error::TapeError;
use crate::stream::{ReadStream, WriteStream};
use crate::tape::Tape;

/// Online statistic over a streamed subarray: its cardinality, whether all
/// of its elements compare equal, and a uniformly distributed sample.
pub struct SubarrayInfo<F> {
    compare: F,
    equal: bool,
    element: i32,
    size: usize,
}

impl<F> SubarrayInfo<F>
where
    F: Fn(i32, i32) -> Ordering + Copy,
{
    /// Creates an empty statistic: zero elements, vacuously equal.
    pub fn new(compare: F) -> Self {
        SubarrayInfo {
            compare,
            equal: true,
            element: 0,
            size: 0,
        }
    }

    /// A uniformly distributed element of the subarray.
    pub fn element(&self) -> i32 {
        self.element
    }

    /// Whether all elements of the subarray compare equal.
    pub fn equal(&self) -> bool {
        self.equal
    }

    /// Number of elements folded in so far.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Folds one more element into the statistic.
    ///
    /// On the `i`-th call the sample is replaced with probability `1 / i`,
    /// so each of the first `i` values survives as the sample with
    /// probability `(1/j) * (1 - 1/(j+1)) * ... * (1 - 1/i) = 1/i` — the
    /// classic single-slot reservoir.
    pub fn update(&mut self, value: i32) {
        self.equal = self.equal
            && (self.size == 0 || (self.compare)(self.element, value) == Ordering::Equal);

        if rand::thread_rng().gen_range(0..=self.size) == 0 {
            self.element = value;
        }
        self.size += 1;
    }
}

/// Moves the head one cell back and reads it. The head ends on the cell
/// just read.
pub fn peek<S: ReadStream>(tape: &mut Tape<S>) -> Result<i32, TapeError> {
    tape.prev();
    tape.get()
}

/// Writes `value` under the head and moves one cell forward.
pub fn put<S: WriteStream>(tape: &mut Tape<S>, value: i32) -> Result<(), TapeError> {
    tape.set(value)?;
    tape.next();
    Ok(())
}

/// [`put`]s the elements of `values` in order, so the leftmost element of
/// the slice becomes the leftmost cell written. The head ends past the last
/// element put.
pub fn vec_to_tape<S: WriteStream>(values: &[i32], tape: &mut Tape<S>) -> Result<(), TapeError> {
    for &value in values {
        put(tape, value)?;
    }
    Ok(())
}

/// [`peek`]s up to `len` elements off the tape, stopping early at the
/// begin. Because the head walks backward, the returned vector holds the
/// tape's left-to-right order reversed. The head ends on the leftmost
/// element peeked.
pub fn tape_to_vec<S: ReadStream>(tape: &mut Tape<S>, len: usize) -> Result<Vec<i32>, TapeError> {
    let mut values = Vec::with_capacity(len);
    while !tape.is_begin() && values.len() < len {
        values.push(peek(tape)?);
    }
    Ok(values)
}

/// [`peek`]s exactly `len` elements off `source` and [`put`]s each on
/// `left` if it compares strictly less than `key`, on `right` otherwise.
/// Ordering among the distributed elements is not preserved.
///
/// Afterwards `source`'s head is on the leftmost element peeked, the
/// destination heads are past the last elements put, and the returned
/// statistics describe the two partitions (their sizes sum to `len`).
pub fn split<S, L, R, F>(
    source: &mut Tape<S>,
    left: &mut Tape<L>,
    right: &mut Tape<R>,
    compare: F,
    key: i32,
    len: usize,
) -> Result<(SubarrayInfo<F>, SubarrayInfo<F>), TapeError>
where
    S: ReadStream,
    L: WriteStream,
    R: WriteStream,
    F: Fn(i32, i32) -> Ordering + Copy,
{
    let mut left_info = SubarrayInfo::new(compare);
    let mut right_info = SubarrayInfo::new(compare);

    for _ in 0..len {
        let value = peek(source)?;
        if compare(value, key) == Ordering::Less {
            put(left, value)?;
            left_info.update(value);
        } else {
            put(right, value)?;
            right_info.update(value);
        }
    }

    Ok((left_info, right_info))
}

/// Sorts `input` into `output` in RAM with the natural `i32` order.
///
/// See [`sort_by`].
pub fn sort<I, O>(input: &mut Tape<I>, output: &mut Tape<O>) -> Result<(), TapeError>
where
    I: ReadStream,
    O: WriteStream,
{
    sort_by(input, output, |a, b| a.cmp(&b))
}

/// Sorts `input` into `output` in RAM using a custom comparator.
///
/// The whole input is read into a buffer, so as much memory is used as the
/// input data occupies. Afterwards `input`'s head is back at its original
/// position and `output`'s head is past the last element written.
pub fn sort_by<I, O, F>(
    input: &mut Tape<I>,
    output: &mut Tape<O>,
    compare: F,
) -> Result<(), TapeError>
where
    I: ReadStream,
    O: WriteStream,
    F: Fn(i32, i32) -> Ordering + Copy,
{
    let mut values = Vec::new();
    while !input.is_end() {
        let value = input.get()?;
        input.next();
        values.push(value);
    }
    input.seek(-(values.len() as isize));

    values.sort_unstable_by(|a, b| compare(*a, *b));
    vec_to_tape(&values, output)
}

/// Sorts `input` into `output` with the natural `i32` order, keeping at
/// most `chunk_size` cells in RAM.
///
/// See [`sort_external_by`].
pub fn sort_external<I, O, T>(
    input: &mut Tape<I>,
    output: &mut Tape<O>,
    tmp1: &mut Tape<T>,
    tmp2: &mut Tape<T>,
    tmp3: &mut Tape<T>,
    chunk_size: usize,
) -> Result<(), TapeError>
where
    I: ReadStream,
    O: WriteStream,
    T: ReadStream + WriteStream,
{
    sort_external_by(input, output, tmp1, tmp2, tmp3, chunk_size, |a, b| a.cmp(&b))
}

/// Sorts `input` into `output` using a custom comparator, keeping at most
/// `chunk_size` cells in RAM and spilling everything else over the three
/// scratch tapes.
///
/// Each scratch tape must have at least as much room after its head as the
/// input holds; that room may be overwritten. The data before each scratch
/// head and the head positions themselves are restored by the time the
/// call returns. `input`'s head ends back at its original position and
/// `output`'s head ends past the last element written.
///
/// A `chunk_size` of 0 partitions every non-uniform range; a `chunk_size`
/// of `input.size()` or more sorts in a single in-RAM pass.
pub fn sort_external_by<I, O, T, F>(
    input: &mut Tape<I>,
    output: &mut Tape<O>,
    tmp1: &mut Tape<T>,
    tmp2: &mut Tape<T>,
    tmp3: &mut Tape<T>,
    chunk_size: usize,
    compare: F,
) -> Result<(), TapeError>
where
    I: ReadStream,
    O: WriteStream,
    T: ReadStream + WriteStream,
    F: Fn(i32, i32) -> Ordering + Copy,
{
    let mut info = SubarrayInfo::new(compare);

    while !input.is_end() {
        let value = input.get()?;
        input.next();
        put(tmp1, value)?;
        info.update(value);
    }
    input.seek(-(info.size() as isize));

    log::debug!("ingestion done ({} cells), sorting", info.size());
    sort_impl(output, tmp1, tmp2, tmp3, &info, chunk_size, compare)
}

/// Emits the `info.size()` elements behind `current`'s head onto `output`
/// in sorted order.
///
/// Uniform ranges are streamed straight through (reversal is harmless when
/// everything compares equal), ranges that fit the chunk are sorted in RAM,
/// and everything else is partitioned around the range's reservoir sample.
/// Each recursive call rotates the scratch roles: the just-filled partition
/// becomes `current`, and the caller's `current` — its head now at the left
/// end of the consumed range — is reused as scratch.
fn sort_impl<O, T, F>(
    output: &mut Tape<O>,
    current: &mut Tape<T>,
    tmp1: &mut Tape<T>,
    tmp2: &mut Tape<T>,
    info: &SubarrayInfo<F>,
    chunk_size: usize,
    compare: F,
) -> Result<(), TapeError>
where
    O: WriteStream,
    T: ReadStream + WriteStream,
    F: Fn(i32, i32) -> Ordering + Copy,
{
    if info.size() == 0 {
        return Ok(());
    }

    if info.equal() {
        for _ in 0..info.size() {
            let value = peek(current)?;
            put(output, value)?;
        }
        return Ok(());
    }

    if info.size() <= chunk_size {
        let mut values = tape_to_vec(current, info.size())?;
        values.sort_unstable_by(|a, b| compare(*a, *b));
        vec_to_tape(&values, output)?;
        return Ok(());
    }

    let (left_info, right_info) =
        split(current, tmp1, tmp2, compare, info.element(), info.size())?;
    sort_impl(output, tmp1, current, tmp2, &left_info, chunk_size, compare)?;
    sort_impl(output, tmp2, current, tmp1, &right_info, chunk_size, compare)
}
