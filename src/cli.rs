//! Command-line front end: read a file or stdin, repair, write the result.

use crate::{repair, Options};
use std::env;
use std::fs;
use std::io::{self, Read, Write};

fn print_help(program: &str) {
    eprintln!(
        "Usage: {prog} [OPTIONS] [INPUT]\n\
         \n\
         INPUT: optional input file. When omitted, reads from stdin.\n\
         \n\
         Options:\n\
           -i, --inline          Replace INPUT with the repaired JSON\n\
           -o, --output FILE     Write output to FILE (default stdout)\n\
               --ensure-ascii    Escape non-ASCII as \\uXXXX\n\
               --indent N        Pretty-print with N spaces per level\n\
               --strict          Fail on the first repair instead of applying it\n\
           -h, --help            Show this help\n",
        prog = program
    );
}

struct CliMode {
    input: Option<String>,
    output: Option<String>,
    inline: bool,
}

fn parse_args() -> (Options, CliMode) {
    let mut args: Vec<String> = env::args().collect();
    let program = args
        .first()
        .cloned()
        .unwrap_or_else(|| "jsonmend".to_string());
    args.remove(0);

    let mut opts = Options::default();
    let mut input: Option<String> = None;
    let mut output: Option<String> = None;
    let mut inline = false;

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "-h" | "--help" => {
                print_help(&program);
                std::process::exit(0);
            }
            "-i" | "--inline" => {
                inline = true;
            }
            "-o" | "--output" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("Error: Missing FILE for --output");
                    std::process::exit(2);
                }
                output = Some(args[i].clone());
            }
            "--ensure-ascii" | "--ensure_ascii" => {
                opts.ensure_ascii = true;
            }
            "--indent" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("Error: Missing N for --indent");
                    std::process::exit(2);
                }
                match args[i].parse::<usize>() {
                    Ok(n) => opts.indent = Some(n),
                    Err(_) => {
                        eprintln!("Error: Invalid indent: {}", args[i]);
                        std::process::exit(2);
                    }
                }
            }
            "--strict" => {
                opts.strict = true;
            }
            s if s.starts_with('-') => {
                eprintln!("Error: Unknown option: {}", s);
                std::process::exit(2);
            }
            path => {
                input = Some(path.to_string());
            }
        }
        i += 1;
    }

    if inline && input.is_none() {
        eprintln!("Error: Inline mode requires a filename");
        std::process::exit(2);
    }
    if inline && output.is_some() {
        eprintln!("Error: You cannot pass both --inline and --output");
        std::process::exit(2);
    }

    (
        opts,
        CliMode {
            input,
            output,
            inline,
        },
    )
}

/// Run the CLI. Exit code 0 on success (including successful repair),
/// 1 when strict mode raises or on an I/O failure, 2 on usage errors.
pub fn run() -> i32 {
    let (opts, mode) = parse_args();

    let content = match &mode.input {
        Some(path) => match fs::read_to_string(path) {
            Ok(content) => content,
            Err(err) => {
                eprintln!("Error: {}: {}", path, err);
                return 1;
            }
        },
        None => {
            let mut buf = String::new();
            if let Err(err) = io::stdin().read_to_string(&mut buf) {
                eprintln!("Error: {}", err);
                return 1;
            }
            buf
        }
    };

    let repaired = match repair(&content, &opts) {
        Ok(text) => text,
        Err(err) => {
            eprintln!("Error: {}", err);
            return 1;
        }
    };

    if mode.inline {
        // validated in parse_args: inline always has an input path
        let path = match &mode.input {
            Some(path) => path,
            None => return 2,
        };
        if let Err(err) = fs::write(path, &repaired) {
            eprintln!("Error: {}: {}", path, err);
            return 1;
        }
    } else if let Some(path) = &mode.output {
        if let Err(err) = fs::write(path, &repaired) {
            eprintln!("Error: {}: {}", path, err);
            return 1;
        }
    } else {
        let stdout = io::stdout();
        let mut handle = stdout.lock();
        if writeln!(handle, "{}", repaired).is_err() {
            return 1;
        }
    }
    0
}
