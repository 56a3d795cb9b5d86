use std::fs;
use std::path::Path;
use std::process;

use env_logger;
use log;

use tape_sort::{
    scratch_path, sort, sort_external, DelayConfig, FileGuard, FileStream, ReadOnly, Tape,
    WriteOnly, CELL_SIZE,
};

const CONFIG_PATH: &str = "config.txt";

fn main() {
    init_logger();
    process::exit(run());
}

// All failure paths return instead of exiting so that live FileGuards
// still delete their scratch files.
fn run() -> i32 {
    let matches = match build_arg_parser().try_get_matches() {
        Ok(matches) => matches,
        Err(err) => {
            eprint!("{}", err);
            return 1;
        }
    };

    let input_path = matches.value_of("input").expect("value is required");
    let output_path = matches.value_of("output").expect("value is required");

    let tape_size = match matches.value_of("tape_size") {
        Some(arg) => match parse_cells(arg, "input tape size") {
            Some(cells) => cells,
            None => return 1,
        },
        None => match tape_size_from_file(input_path) {
            Some(cells) => cells,
            None => return 1,
        },
    };

    let memory_limit = match matches.value_of("memory_limit") {
        Some(arg) => match parse_cells(arg, "memory limit") {
            Some(bytes) => bytes,
            None => return 1,
        },
        None => 0,
    };

    let delays = match DelayConfig::load(Path::new(CONFIG_PATH)) {
        Ok(delays) => delays,
        Err(err) => {
            log::error!("{}", err);
            return 1;
        }
    };

    let chunk_size = memory_limit / CELL_SIZE;

    let input_stream = match FileStream::open(input_path) {
        Ok(stream) => stream,
        Err(err) => {
            log::error!("error opening the input file: {}", err);
            return 1;
        }
    };
    let output_stream = match FileStream::create(output_path) {
        Ok(stream) => stream,
        Err(err) => {
            log::error!("error opening the output file: {}", err);
            return 1;
        }
    };

    let mut input = match Tape::with_delays(ReadOnly::new(input_stream), tape_size, delays) {
        Ok(tape) => tape,
        Err(err) => {
            log::error!("error preparing the input tape: {}", err);
            return 1;
        }
    };
    let mut output = match Tape::with_delays(WriteOnly::new(output_stream), tape_size, delays) {
        Ok(tape) => tape,
        Err(err) => {
            log::error!("error preparing the output tape: {}", err);
            return 1;
        }
    };

    let sorted = if tape_size <= chunk_size {
        sort(&mut input, &mut output)
    } else {
        let (_guard1, mut tmp1) = match scratch_tape(tape_size, delays) {
            Some(scratch) => scratch,
            None => return 1,
        };
        let (_guard2, mut tmp2) = match scratch_tape(tape_size, delays) {
            Some(scratch) => scratch,
            None => return 1,
        };
        let (_guard3, mut tmp3) = match scratch_tape(tape_size, delays) {
            Some(scratch) => scratch,
            None => return 1,
        };

        sort_external(
            &mut input, &mut output, &mut tmp1, &mut tmp2, &mut tmp3, chunk_size,
        )
    };

    if let Err(err) = sorted {
        log::error!("i/o error occurred while working with the tapes: {}", err);
        return 1;
    }

    if let Err(err) = output.flush() {
        log::error!("data flushing error: {}", err);
        return 1;
    }

    0
}

fn parse_cells(arg: &str, name: &str) -> Option<usize> {
    match arg.parse::<usize>() {
        Ok(value) => Some(value),
        Err(err) => {
            log::error!("invalid {}. non-negative integer expected: {}", name, err);
            None
        }
    }
}

fn tape_size_from_file(path: &str) -> Option<usize> {
    let metadata = match fs::metadata(path) {
        Ok(metadata) => metadata,
        Err(err) => {
            log::error!("error opening the input file: {}", err);
            return None;
        }
    };

    if metadata.len() % CELL_SIZE as u64 != 0 {
        println!("input data can't be split by integers. the tail will be discarded");
    }
    Some((metadata.len() / CELL_SIZE as u64) as usize)
}

fn scratch_tape(tape_size: usize, delays: DelayConfig) -> Option<(FileGuard, Tape<FileStream>)> {
    let guard = match FileGuard::new(scratch_path()) {
        Ok(guard) => guard,
        Err(err) => {
            log::error!("error creating temporary file: {}", err);
            return None;
        }
    };

    let stream = match FileStream::open_rw(guard.path()) {
        Ok(stream) => stream,
        Err(err) => {
            log::error!("error opening temporary file: {}", err);
            return None;
        }
    };

    match Tape::with_delays(stream, tape_size, delays) {
        Ok(tape) => Some((guard, tape)),
        Err(err) => {
            log::error!("error preparing temporary tape: {}", err);
            None
        }
    }
}

fn build_arg_parser() -> clap::App<'static> {
    clap::App::new("tape-sort")
        .about("external sorter for tape devices")
        .arg(
            clap::Arg::new("input")
                .help("file with the integers to sort")
                .required(true)
                .index(1),
        )
        .arg(
            clap::Arg::new("output")
                .help("result file, created or truncated")
                .required(true)
                .index(2),
        )
        .arg(
            clap::Arg::new("tape_size")
                .help("number of cells on the input tape (default: input file size / 4)")
                .index(3)
                .allow_hyphen_values(true),
        )
        .arg(
            clap::Arg::new("memory_limit")
                .help("byte budget for the in-memory base case (default: 0)")
                .index(4)
                .allow_hyphen_values(true),
        )
}

fn init_logger() {
    env_logger::Builder::from_default_env()
        .format_timestamp_millis()
        .init();
}
