//! Classic short option scanning: clustering, attached arguments and an
//! optional argument that only counts when it is glued to the option.
use optscan::{Error, Scanner};

const USAGE: &str = "short [-a] [-b] [-c COLOR] [-d[DELAY]] [ARG]...";

fn execute() -> Result<(), Error> {
    let mut argv: Vec<String> = std::env::args().collect();
    let mut scanner = Scanner::new(&mut argv);
    let mut amend = false;
    let mut brief = false;
    let mut color = String::from("white");
    let mut delay = 0;

    while let Some(opt) = scanner.next_opt("abc:d::")? {
        match opt {
            'a' => amend = true,
            'b' => brief = true,
            'c' => color = scanner.current_arg().unwrap_or("").to_string(),
            'd' => delay = scanner.current_arg().and_then(|v| v.parse().ok()).unwrap_or(1),
            _ => unreachable!(),
        }
    }

    println!("amend = {}", amend);
    println!("brief = {}", brief);
    println!("color = {}", color);
    println!("delay = {}", delay);
    while let Some(arg) = scanner.next_arg() {
        println!("{}", arg);
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
