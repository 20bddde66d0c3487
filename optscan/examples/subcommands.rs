//! Nested command lines: permutation is disabled at the top level so a
//! subcommand's own arguments stay where they are, then the unscanned tail
//! seeds a fresh scanner whose element 0 is the subcommand name.
use std::time::Duration;

use optscan::{Error, Scanner};

const USAGE: &str = "subcommands [-h] <echo|sleep> [OPTION]...";

fn execute() -> Result<(), Error> {
    let mut argv: Vec<String> = std::env::args().collect();
    let mut scanner = Scanner::new(&mut argv);
    scanner.set_permute(false);

    while let Some(opt) = scanner.next_opt("h")? {
        match opt {
            'h' => {
                println!("usage: {}", USAGE);
                return Ok(());
            }
            _ => unreachable!(),
        }
    }

    let tail = scanner.into_remaining();
    match tail.first().map(String::as_str) {
        Some("echo") => cmd_echo(tail),
        Some("sleep") => cmd_sleep(tail),
        Some(other) => {
            eprintln!("invalid subcommand: {}", other);
            eprintln!("usage: {}", USAGE);
            std::process::exit(1);
        }
        None => {
            eprintln!("missing subcommand");
            eprintln!("usage: {}", USAGE);
            std::process::exit(1);
        }
    }
}

fn cmd_echo(argv: &mut [String]) -> Result<(), Error> {
    let mut scanner = Scanner::new(argv);
    scanner.set_permute(false);
    let mut newline = true;

    while let Some(opt) = scanner.next_opt("hn")? {
        match opt {
            'h' => {
                println!("usage: echo [-hn] [ARG]...");
                return Ok(());
            }
            'n' => newline = false,
            _ => unreachable!(),
        }
    }

    let mut sep = "";
    while let Some(arg) = scanner.next_arg() {
        print!("{}{}", sep, arg);
        sep = " ";
    }
    if newline {
        println!();
    }

    Ok(())
}

fn cmd_sleep(argv: &mut [String]) -> Result<(), Error> {
    let mut scanner = Scanner::new(argv);

    while let Some(opt) = scanner.next_opt("h")? {
        match opt {
            'h' => {
                println!("usage: sleep [-h] [SECONDS]...");
                return Ok(());
            }
            _ => unreachable!(),
        }
    }

    while let Some(arg) = scanner.next_arg() {
        let seconds = arg.parse().unwrap_or(0);
        std::thread::sleep(Duration::from_secs(seconds));
    }

    Ok(())
}

fn main() {
    if let Err(err) = execute() {
        eprintln!("error: {}", err);
        eprintln!("usage: {}", USAGE);
        std::process::exit(1);
    }
}
