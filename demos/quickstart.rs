use env_logger;
use log;
use rand::Rng;

use tape_sort::{sort_external, MemStream, Tape};

fn main() {
    env_logger::Builder::new().filter_level(log::LevelFilter::Debug).init();

    let mut rng = rand::thread_rng();
    let data: Vec<i32> = (0..1000).map(|_| rng.gen_range(-500..500)).collect();

    // load the data onto an in-memory tape and rewind to the begin
    let mut input = Tape::new(MemStream::new(), data.len()).unwrap();
    tape_sort::vec_to_tape(&data, &mut input).unwrap();
    input.seek(-(data.len() as isize));

    let mut output = Tape::new(MemStream::new(), data.len()).unwrap();
    let mut tmp1 = Tape::new(MemStream::new(), data.len()).unwrap();
    let mut tmp2 = Tape::new(MemStream::new(), data.len()).unwrap();
    let mut tmp3 = Tape::new(MemStream::new(), data.len()).unwrap();

    // keep at most 64 cells in RAM at a time
    sort_external(&mut input, &mut output, &mut tmp1, &mut tmp2, &mut tmp3, 64).unwrap();

    let mut sorted = tape_sort::tape_to_vec(&mut output, data.len()).unwrap();
    sorted.reverse();

    assert!(sorted.windows(2).all(|w| w[0] <= w[1]));
    println!("first ten cells: {:?}", &sorted[..10]);
}
