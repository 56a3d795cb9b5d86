use std::cmp::Ordering;

use env_logger;
use log;
use rand::Rng;

use tape_sort::{sort_external_by, MemStream, Tape};

/// Orders values by their population count, ties left unspecified.
fn by_bit_count(a: i32, b: i32) -> Ordering {
    a.count_ones().cmp(&b.count_ones())
}

fn main() {
    env_logger::Builder::new().filter_level(log::LevelFilter::Debug).init();

    let mut rng = rand::thread_rng();
    let data: Vec<i32> = (0..200).map(|_| rng.gen()).collect();

    let mut input = Tape::new(MemStream::new(), data.len()).unwrap();
    tape_sort::vec_to_tape(&data, &mut input).unwrap();
    input.seek(-(data.len() as isize));

    let mut output = Tape::new(MemStream::new(), data.len()).unwrap();
    let mut tmp1 = Tape::new(MemStream::new(), data.len()).unwrap();
    let mut tmp2 = Tape::new(MemStream::new(), data.len()).unwrap();
    let mut tmp3 = Tape::new(MemStream::new(), data.len()).unwrap();

    sort_external_by(
        &mut input,
        &mut output,
        &mut tmp1,
        &mut tmp2,
        &mut tmp3,
        16,
        by_bit_count,
    )
    .unwrap();

    let mut sorted = tape_sort::tape_to_vec(&mut output, data.len()).unwrap();
    sorted.reverse();

    for value in sorted.iter().take(10) {
        println!("{:>11}  ({} bits set)", value, value.count_ones());
    }
}
