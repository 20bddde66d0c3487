use optscan::{Error, ErrorKind, LongOpt, Scanner};

fn argv_of(args: &[&str]) -> Vec<String> {
    std::iter::once("prog")
        .chain(args.iter().copied())
        .map(String::from)
        .collect()
}

#[test]
fn test_invalid_short_option() {
    let mut argv = argv_of(&["-x"]);
    let mut scanner = Scanner::new(&mut argv);

    let err = scanner.next_opt("ab").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidOption);
    assert_eq!(err.offender(), "x");
    assert_eq!(err.to_string(), "invalid option -- 'x'");
    assert_eq!(scanner.current_opt(), Some('x'));
    assert_eq!(scanner.last_error(), Some(&err));
}

#[test]
fn test_invalid_option_mid_cluster() {
    let mut argv = argv_of(&["-ax", "-b"]);
    let mut scanner = Scanner::new(&mut argv);

    assert_eq!(scanner.next_opt("ab").unwrap(), Some('a'));
    let err = scanner.next_opt("ab").unwrap_err();
    assert_eq!(err.to_string(), "invalid option -- 'x'");
    // the rest of the token is abandoned, scanning continues cleanly
    assert_eq!(scanner.next_opt("ab").unwrap(), Some('b'));
    assert_eq!(scanner.next_opt("ab").unwrap(), None);
}

#[test]
fn test_missing_short_argument() {
    let mut argv = argv_of(&["-d"]);
    let mut scanner = Scanner::new(&mut argv);

    let err = scanner.next_opt("d:").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MissingArgument);
    assert_eq!(err.to_string(), "option requires an argument -- 'd'");
    assert_eq!(scanner.current_arg(), None);
}

#[test]
fn test_missing_long_argument() {
    const OPTS: &[LongOpt] = &[LongOpt::required("delay", 'd')];
    let mut argv = argv_of(&["--delay"]);
    let mut scanner = Scanner::new(&mut argv);

    let err = scanner.next_long(OPTS).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MissingArgument);
    assert_eq!(err.to_string(), "option requires an argument -- 'delay'");
}

#[test]
fn test_unexpected_argument() {
    const OPTS: &[LongOpt] = &[LongOpt::flag("amend", 'a')];
    let mut argv = argv_of(&["--amend=yes"]);
    let mut scanner = Scanner::new(&mut argv);

    let err = scanner.next_long(OPTS).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnexpectedArgument);
    assert_eq!(err.to_string(), "option takes no arguments -- 'amend'");
}

#[test]
fn test_ambiguous_abbreviation() {
    const OPTS: &[LongOpt] = &[
        LongOpt::required("delay", 'd'),
        LongOpt::flag("delete", 'D'),
    ];
    let mut argv = argv_of(&["--del"]);
    let mut scanner = Scanner::new(&mut argv);

    let err = scanner.next_long(OPTS).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::AmbiguousAbbreviation);
    assert_eq!(err.to_string(), "option is ambiguous -- 'delete'");
}

#[test]
fn test_ambiguity_names_last_candidate() {
    const OPTS: &[LongOpt] = &[
        LongOpt::required("delay", 'd'),
        LongOpt::flag("delete", 'D'),
        LongOpt::flag("del", 'l'),
    ];
    let mut argv = argv_of(&["--de"]);
    let mut scanner = Scanner::new(&mut argv);

    // no exact name matches "de", so all three prefix hits are ambiguous
    let err = scanner.next_long(OPTS).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::AmbiguousAbbreviation);
    assert_eq!(err.to_string(), "option is ambiguous -- 'del'");
}

#[test]
fn test_invalid_long_option_offender_excludes_value() {
    const OPTS: &[LongOpt] = &[LongOpt::flag("amend", 'a')];
    let mut argv = argv_of(&["--foo=bar"]);
    let mut scanner = Scanner::new(&mut argv);

    let err = scanner.next_long(OPTS).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidOption);
    assert_eq!(err.offender(), "foo");
    assert_eq!(err.to_string(), "invalid option -- 'foo'");
}

#[test]
fn test_empty_long_name_is_invalid() {
    const OPTS: &[LongOpt] = &[LongOpt::flag("amend", 'a')];
    let mut argv = argv_of(&["--=yes"]);
    let mut scanner = Scanner::new(&mut argv);

    let err = scanner.next_long(OPTS).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidOption);
    assert_eq!(err.offender(), "");
}

#[test]
fn test_message_is_bounded() {
    const OPTS: &[LongOpt] = &[LongOpt::flag("amend", 'a')];
    let name = "x".repeat(60);
    let mut argv = argv_of(&[&format!("--{}", name)]);
    let mut scanner = Scanner::new(&mut argv);

    let err = scanner.next_long(OPTS).unwrap_err();
    // the rendered message is capped at 64 bytes, the offender is not
    assert_eq!(err.offender(), name);
    let msg = err.to_string();
    assert_eq!(msg.len(), 64);
    assert_eq!(msg, format!("invalid option -- '{}'", "x".repeat(44)));
}

#[test]
fn test_truncation_respects_char_boundaries() {
    const OPTS: &[LongOpt] = &[LongOpt::flag("amend", 'a')];
    let name = "好".repeat(20);
    let mut argv = argv_of(&[&format!("--{}", name)]);
    let mut scanner = Scanner::new(&mut argv);

    let err = scanner.next_long(OPTS).unwrap_err();
    let msg = err.to_string();
    // 44 bytes of budget round down to 14 whole characters
    assert_eq!(msg, format!("invalid option -- '{}'", "好".repeat(14)));
    assert!(msg.len() <= 64);
}

#[test]
fn test_scanning_continues_past_errors() {
    let mut argv = argv_of(&["-x", "-a", "foo"]);
    let mut scanner = Scanner::new(&mut argv);

    assert!(scanner.next_opt("a").is_err());
    assert!(scanner.last_error().is_some());
    // the next call clears the stored error and keeps going
    assert_eq!(scanner.next_opt("a").unwrap(), Some('a'));
    assert_eq!(scanner.last_error(), None);
    assert_eq!(scanner.next_opt("a").unwrap(), None);
    assert_eq!(scanner.next_arg(), Some("foo"));
}

#[test]
fn test_collecting_several_errors() -> Result<(), Error> {
    let mut argv = argv_of(&["-x", "-y", "-a"]);
    let mut scanner = Scanner::new(&mut argv);
    let mut kinds = Vec::new();
    let mut hits = Vec::new();

    loop {
        match scanner.next_opt("a") {
            Ok(Some(opt)) => hits.push(opt),
            Ok(None) => break,
            Err(err) => kinds.push((err.kind(), scanner.current_opt())),
        }
    }
    assert_eq!(hits, ['a']);
    assert_eq!(
        kinds,
        [
            (ErrorKind::InvalidOption, Some('x')),
            (ErrorKind::InvalidOption, Some('y')),
        ]
    );

    Ok(())
}
