//! Long options resolved through a descriptor table, including an option
//! that has no real short form and is told apart by its table index.
use optscan::{Error, LongOpt, Scanner};

const USAGE: &str = "long [--amend] [--brief] [--color COLOR] [--delay[=DELAY]] \
                     [--erase WHAT] [ARG]...";

const LONGOPTS: &[LongOpt] = &[
    LongOpt::flag("amend", 'a'),
    LongOpt::flag("brief", 'b'),
    LongOpt::required("color", 'c'),
    LongOpt::optional("delay", 'd'),
    LongOpt::required("erase", '\u{100}'),
];

fn execute() -> Result<(), Error> {
    let mut argv: Vec<String> = std::env::args().collect();
    let mut scanner = Scanner::new(&mut argv);

    while let Some(opt) = scanner.next_long(LONGOPTS)? {
        let name = scanner
            .match_index()
            .map(|index| LONGOPTS[index].name)
            .unwrap_or("?");
        match opt {
            'a' => println!("{}", name),
            'b' => println!("{}", name),
            'c' => println!("{} = {}", name, scanner.current_arg().unwrap_or("")),
            'd' => println!("{} = {}", name, scanner.current_arg().unwrap_or("1")),
            '\u{100}' => println!("{} = {}", name, scanner.current_arg().unwrap_or("")),
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
