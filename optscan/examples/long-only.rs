//! Long option matching behind a single dash, in the style of find(1).
//! `-color red`, `-color=red` and `-c red` all hit the same descriptor;
//! unmatched single dash tokens still cluster as short options.
use optscan::{Error, LongOpt, Scanner};

const USAGE: &str = "long-only [-amend] [-color COLOR] [-verbose] [ARG]...";

const LONGOPTS: &[LongOpt] = &[
    LongOpt::flag("amend", 'a'),
    LongOpt::required("color", 'c'),
    LongOpt::flag("verbose", 'v'),
];

fn execute() -> Result<(), Error> {
    let mut argv: Vec<String> = std::env::args().collect();
    let mut scanner = Scanner::new(&mut argv);

    while let Some(opt) = scanner.next_long_only(LONGOPTS)? {
        match opt {
            'a' => println!("amend"),
            'c' => println!("color = {}", scanner.current_arg().unwrap_or("")),
            'v' => println!("verbose"),
            _ => unreachable!(),
        }
    }

    while let Some(arg) = scanner.next_arg() {
        println!("argument: {}", arg);
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
