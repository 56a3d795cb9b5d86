use std::time::Instant;

use env_logger;
use log;

use tape_sort::{sort_external, DelayConfig, MemStream, Tape};

fn main() {
    env_logger::Builder::new().filter_level(log::LevelFilter::Debug).init();

    let delays = DelayConfig {
        read_delay: 20_000,
        write_delay: 30_000,
        rewind_step_delay: 500,
        rewind_delay: 100_000,
        next_delay: 5_000,
    };

    let data: Vec<i32> = (0..500).rev().collect();

    let mut input = Tape::with_delays(MemStream::new(), data.len(), delays).unwrap();
    tape_sort::vec_to_tape(&data, &mut input).unwrap();
    input.seek(-(data.len() as isize));

    let mut output = Tape::with_delays(MemStream::new(), data.len(), delays).unwrap();
    let mut tmp1 = Tape::with_delays(MemStream::new(), data.len(), delays).unwrap();
    let mut tmp2 = Tape::with_delays(MemStream::new(), data.len(), delays).unwrap();
    let mut tmp3 = Tape::with_delays(MemStream::new(), data.len(), delays).unwrap();

    let start = Instant::now();
    sort_external(&mut input, &mut output, &mut tmp1, &mut tmp2, &mut tmp3, 32).unwrap();
    println!("sorted {} cells in {:?} of emulated tape time", data.len(), start.elapsed());
}
