//! yamlet command-line tool for checking and inspecting yamlet documents.
//!
//! Usage: yamlet [OPTIONS] [FILE|DIR]
//!
//! Options:
//!   --check                Check if input is valid (exit 0 if valid, 1 if invalid)
//!   --stream               Read the input as a stream of documents separated by "-"
//!   -p, --pretty           Print parsed trees across multiple lines
//!   -h, --help             Print help
//!   -V, --version          Print version

use libyamlet::{folder, parse_with_filename, Documents, ParseContext, ParseError, Value};
use log::{debug, info};
use std::fs;
use std::io::{self, BufReader, Read};
use std::path::Path;
use std::process;

/// What to do with each parsed document.
#[derive(Debug, Clone, Copy)]
struct Options {
    check_only: bool,
    stream: bool,
    pretty: bool,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args: Vec<String> = std::env::args().collect();

    let mut options = Options {
        check_only: false,
        stream: false,
        pretty: false,
    };
    let mut input_path: Option<&str> = None;

    for arg in &args[1..] {
        match arg.as_str() {
            "-h" | "--help" => {
                print_help();
                return;
            }
            "-V" | "--version" => {
                println!("yamlet {}", env!("CARGO_PKG_VERSION"));
                return;
            }
            "--check" => {
                options.check_only = true;
            }
            "--stream" => {
                options.stream = true;
            }
            "-p" | "--pretty" => {
                options.pretty = true;
            }
            // Reading stdin is already the default
            "-" => {}
            arg if arg.starts_with('-') => {
                eprintln!("Error: Unknown option: {}", arg);
                process::exit(1);
            }
            _ => {
                if input_path.is_some() {
                    eprintln!("Error: Multiple input paths not supported");
                    process::exit(1);
                }
                input_path = Some(arg.as_str());
            }
        }
    }

    debug!("options: {:?}", options);

    // Check if input is a directory
    if let Some(path) = input_path {
        if Path::new(path).is_dir() {
            process::exit(process_directory(path, options));
        }
    }

    let exit_code = match input_path {
        Some(path) => process_file(Path::new(path), options),
        None => process_stdin(options),
    };
    process::exit(exit_code);
}

/// Process every yamlet file of a directory, continuing past bad files.
fn process_directory(dir_path: &str, options: Options) -> i32 {
    let files = match folder::list(dir_path) {
        Ok(files) => files,
        Err(e) => {
            eprintln!("Error reading directory {}: {}", dir_path, e);
            return 1;
        }
    };

    info!("checking {} files in {}", files.len(), dir_path);

    let mut had_errors = false;
    for path in &files {
        if process_file(path, options) != 0 {
            had_errors = true;
        }
    }

    if had_errors {
        1
    } else {
        0
    }
}

fn process_file(path: &Path, options: Options) -> i32 {
    let label = path.display().to_string();

    if options.stream {
        return match fs::File::open(path) {
            Ok(file) => process_stream(BufReader::new(file), Some(&label), options),
            Err(e) => {
                eprintln!("Error reading {}: {}", label, e);
                1
            }
        };
    }

    let input = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            eprintln!("Error reading {}: {}", label, e);
            return 1;
        }
    };

    let filename = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| label.clone());
    let result = parse_with_filename(&input, Some(&filename));
    report(result, Some(&label), options)
}

fn process_stdin(options: Options) -> i32 {
    if options.stream {
        let stdin = io::stdin();
        return process_stream(stdin.lock(), None, options);
    }

    let mut input = String::new();
    if let Err(e) = io::stdin().read_to_string(&mut input) {
        eprintln!("Error reading stdin: {}", e);
        return 1;
    }
    report(parse_with_filename(&input, None), None, options)
}

/// Process documents one at a time, stopping at the first bad one.
fn process_stream<R: io::BufRead>(reader: R, label: Option<&str>, options: Options) -> i32 {
    let mut count = 0;
    for document in Documents::with_context(reader, ParseContext::new(label)) {
        if report(document, label, options) != 0 {
            return 1;
        }
        count += 1;
    }
    debug!("{} documents", count);
    if options.check_only {
        if let Some(label) = label {
            println!("{}: {} documents ok", label, count);
        }
    }
    0
}

/// Print one parse result and return its exit code.
fn report(result: Result<Value, ParseError>, label: Option<&str>, options: Options) -> i32 {
    match result {
        Ok(value) => {
            if options.check_only {
                if !options.stream {
                    if let Some(label) = label {
                        println!("{}: ok", label);
                    }
                }
            } else if options.pretty {
                println!("{:#?}", value);
            } else {
                println!("{:?}", value);
            }
            0
        }
        Err(e) => {
            match label {
                Some(label) => eprintln!("{}: {}", label, e),
                None => eprintln!("Parse error: {}", e),
            }
            1
        }
    }
}

fn print_help() {
    println!(
        "yamlet - yamlet command-line tool

USAGE:
    yamlet [OPTIONS] [FILE|DIR]

ARGS:
    [FILE|DIR]    Input file or directory (reads from stdin if not provided)
                  When a directory is given, processes all .{ext} files in it
                  in file-name order

OPTIONS:
    --check                Check if input is valid (exit 0 if valid, 1 if invalid)

    --stream               Read each input as a stream of documents separated
                           by a bare \"-\" line

    -p, --pretty           Print parsed trees across multiple lines

    -h, --help             Print help

    -V, --version          Print version

ENVIRONMENT:
    RUST_LOG               Log filter (default: warn)

EXAMPLES:
    # Print the parsed tree of a file
    yamlet config.yaml

    # Validate all yamlet files in a directory
    yamlet --check ./configs/

    # Validate a multi-document file
    yamlet --check --stream records.yaml
",
        ext = folder::EXTENSION
    );
}
