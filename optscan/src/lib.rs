//! This crate implements a reentrant, getopt style command line option
//! scanner.  All state lives in a record you create and own, so independent
//! and nested parse sessions (for example one per subcommand) work without
//! any globals.
//!
//! # Example
//!
//! Scanning happens via the [`Scanner`] type:
//!
//! ```
//! use optscan::{Error, Scanner};
//!
//! fn main() -> Result<(), Error> {
//!     let mut argv: Vec<String> = std::env::args().collect();
//!     let mut scanner = Scanner::new(&mut argv);
//!
//!     while let Some(opt) = scanner.next_opt("ac:d::")? {
//!         match opt {
//!             'a' => println!("amend"),
//!             'c' => println!("color {}", scanner.current_arg().unwrap_or("default")),
//!             'd' => println!("delay {}", scanner.current_arg().unwrap_or("0")),
//!             _ => unreachable!(),
//!         }
//!     }
//!
//!     while let Some(arg) = scanner.next_arg() {
//!         println!("argument {}", arg);
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! Here is what's happening:
//!
//! * [`Scanner::new`] borrows the argument vector for the whole session.
//!   Element 0 is the program name and is never scanned.
//! * [`Scanner::next_opt`] pulls one short option at a time, resolving its
//!   argument according to the option string (`"ac:d::"` accepts `-a`, `-c`
//!   with a required argument and `-d` with an optional one).  `Ok(None)`
//!   means the end of the options was reached.
//! * [`Scanner::current_arg`] hands back the argument captured by the most
//!   recent call as a plain string slice.
//! * [`Scanner::next_arg`] steps through what is left once option scanning
//!   is done.
//!
//! Long options work the same way through a descriptor table:
//!
//! ```
//! use optscan::{Error, LongOpt, Scanner};
//!
//! const OPTS: &[LongOpt] = &[
//!     LongOpt::flag("amend", 'a'),
//!     LongOpt::required("color", 'c'),
//!     LongOpt::optional("delay", 'd'),
//! ];
//!
//! fn main() -> Result<(), Error> {
//!     let mut argv: Vec<String> = std::env::args().collect();
//!     let mut scanner = Scanner::new(&mut argv);
//!     while let Some(opt) = scanner.next_long(OPTS)? {
//!         println!("got {} (descriptor {:?})", opt, scanner.match_index());
//!     }
//!     Ok(())
//! }
//! ```
//!
//! # Behavior
//!
//! The option string and the scanning rules follow classic getopt:
//!
//! * `x` accepts `-x`.  Short options cluster, so `-ab` is `-a -b` and the
//!   scanner steps through such a token one character per call.
//! * `x:` requires an argument.  It is taken from the rest of the token
//!   (`-xvalue`) or, when the token ends right after the option, from the
//!   following token (`-x value`).
//! * `x::` takes an optional argument.  It must be attached (`-xvalue`);
//!   the following token is never consumed for it.
//! * `--` ends option scanning and is itself consumed.  A lone `-` is a
//!   positional argument, not an option.
//! * Non-option tokens met while scanning are moved behind the options
//!   (permutation), so once scanning finishes the positionals sit at the
//!   back of the vector in their original relative order.  Disable this
//!   with [`Scanner::set_permute`] to stop at the first positional instead.
//!
//! Long options are matched with GNU style abbreviation: any unambiguous
//! prefix of a descriptor name is accepted, and an exact name always beats
//! prefix matches against other names.  An abbreviation matching more than
//! one descriptor is reported as ambiguous.  Arguments come attached as
//! `--name=value` or, for descriptors with a required argument, from the
//! following token.  Optional long option arguments must use the `=` form.
//!
//! # Errors
//!
//! Scan errors are recoverable.  The failed call leaves the cursor behind
//! the offending token, so you can keep scanning and collect several
//! diagnostics in one pass.  The rendered message has the fixed shape
//! `<reason> -- '<offender>'` and never grows past 64 bytes; the most
//! recent one is also kept on the scanner, see [`Scanner::last_error`].
//!
//! # Subcommands
//!
//! The scanner is made for nested command lines.  Disable permutation so
//! the subcommand's own arguments stay untouched, scan the global options,
//! then pull the subcommand name with [`Scanner::next_arg`] and either keep
//! scanning with a different option string, or split the tail off with
//! [`Scanner::into_remaining`] and seed a fresh [`Scanner`] with it.  See
//! the `subcommands` example.
//!
//! # Limitations
//!
//! Arguments are `String`s, so the vector must be valid unicode.  Option
//! arguments are handed back as raw slices; converting and validating them
//! is the caller's business.
use std::fmt;

use thiserror::Error as ThisError;

/// Upper bound in bytes for a rendered diagnostic message.
const MSG_LIMIT: usize = 64;

/// Represents a failed scan step.
///
/// An error carries its [`kind`](Self::kind) and the offending option
/// character or long option name.  Rendering it produces the fixed
/// `<reason> -- '<offender>'` shape, with the offender truncated so the
/// whole message stays within 64 bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Error {
    kind: ErrorKind,
    offender: Box<str>,
}

impl Error {
    fn new(kind: ErrorKind, offender: impl fmt::Display) -> Error {
        Error {
            kind,
            offender: offender.to_string().into(),
        }
    }

    /// Returns the error kind.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Returns the offending option character or long option name.
    ///
    /// Unlike the rendered message this is never truncated.
    pub fn offender(&self) -> &str {
        &self.offender
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = self.kind.to_string();
        // the surrounding " -- '" and "'" cost six bytes of the budget
        let budget = MSG_LIMIT.saturating_sub(reason.len() + 6);
        write!(f, "{} -- '{}'", reason, truncated(&self.offender, budget))
    }
}

impl std::error::Error for Error {}

/// Represents the kind of a scan error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ThisError)]
#[non_exhaustive]
pub enum ErrorKind {
    /// The option appears in neither the option string nor the table.
    #[error("invalid option")]
    InvalidOption,
    /// The option requires an argument but none could be taken.
    #[error("option requires an argument")]
    MissingArgument,
    /// A value was attached to a long option that takes none.
    #[error("option takes no arguments")]
    UnexpectedArgument,
    /// A long option abbreviation matches more than one name.
    #[error("option is ambiguous")]
    AmbiguousAbbreviation,
}

/// Represents how a long option treats its argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    /// The option never takes an argument.
    None,
    /// The option requires an argument, attached or as the next token.
    Required,
    /// The option takes an argument only in the attached `=value` form.
    Optional,
}

/// Describes one long option.
///
/// Tables are plain slices of descriptors.  The `code` is what a scan
/// returns on a match; for options without a real short form pick any
/// spare character, also beyond the printable range (for example
/// `'\u{100}'`), and tell such matches apart with
/// [`Scanner::match_index`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LongOpt<'s> {
    /// The full option name, without the leading dashes.
    pub name: &'s str,
    /// The short code returned when this descriptor matches.
    pub code: char,
    /// Argument handling for this descriptor.
    pub arity: Arity,
}

impl<'s> LongOpt<'s> {
    /// Creates a descriptor that takes no argument.
    pub const fn flag(name: &'s str, code: char) -> LongOpt<'s> {
        LongOpt {
            name,
            code,
            arity: Arity::None,
        }
    }

    /// Creates a descriptor that requires an argument.
    pub const fn required(name: &'s str, code: char) -> LongOpt<'s> {
        LongOpt {
            name,
            code,
            arity: Arity::Required,
        }
    }

    /// Creates a descriptor that takes an optional attached argument.
    pub const fn optional(name: &'s str, code: char) -> LongOpt<'s> {
        LongOpt {
            name,
            code,
            arity: Arity::Optional,
        }
    }
}

/// Location of a captured option argument inside the vector.
#[derive(Debug, Clone, Copy)]
struct Span {
    index: usize,
    offset: usize,
}

/// A low-level scanner for getopt style command lines.
///
/// The scanner borrows the argument vector and steps through it one
/// option at a time, keeping every piece of state in the record itself.
/// Several scanners can live side by side or nested inside each other;
/// nothing is global.  For basic instructions consult the crate
/// documentation.
pub struct Scanner<'a> {
    argv: &'a mut [String],
    cursor: usize,
    cluster_offset: usize,
    permute: bool,
    current_opt: Option<char>,
    arg_span: Option<Span>,
    match_index: Option<usize>,
    last_error: Option<Error>,
}

impl fmt::Debug for Scanner<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scanner")
            .field("index", &self.cursor)
            .field("permute", &self.permute)
            .field("remaining", &self.remaining())
            .finish()
    }
}

impl<'a> Scanner<'a> {
    /// Creates a scanner for the given argument vector.
    ///
    /// The element at index 0 is the program name and is never scanned.
    /// The vector is borrowed mutably for the whole session because
    /// permutation reorders it in place.
    pub fn new(argv: &'a mut [String]) -> Scanner<'a> {
        Scanner {
            argv,
            cursor: 1,
            cluster_offset: 0,
            permute: true,
            current_opt: None,
            arg_span: None,
            match_index: None,
            last_error: None,
        }
    }

    /// Restarts scanning from the front of the vector.
    ///
    /// All captured results are dropped and permutation is enabled again.
    /// The vector keeps its current order, so restarting after a permuting
    /// session sees the options first.
    pub fn reset(&mut self) {
        self.cursor = 1;
        self.cluster_offset = 0;
        self.permute = true;
        self.current_opt = None;
        self.arg_span = None;
        self.match_index = None;
        self.last_error = None;
    }

    /// Returns whether permutation is enabled.
    pub fn permute(&self) -> bool {
        self.permute
    }

    /// Enables or disables permutation.  It is enabled by default.
    ///
    /// While enabled, scanning moves non option tokens behind the options,
    /// visibly reordering the borrowed vector.  Disabled, scanning stops
    /// at the first positional, which is the classic way to keep a
    /// subcommand's own arguments untouched.
    pub fn set_permute(&mut self, permute: bool) {
        self.permute = permute;
    }

    /// Scans the next short option.
    ///
    /// Every character in `optstring` is an accepted option.  A character
    /// followed by one colon requires an argument, with two colons it
    /// takes an optional attached argument.  `Ok(Some(code))` is a match;
    /// `Ok(None)` means the end of the options was reached, either because
    /// the vector is exhausted, because `--` was consumed, or because a
    /// positional was hit while permutation is off.
    ///
    /// Clustered tokens like `-abc` yield one option per call without
    /// moving to the next token until the cluster is used up.  A failed
    /// call still moves the cursor past the offending token, so scanning
    /// can simply continue afterwards.
    pub fn next_opt(&mut self, optstring: &str) -> Result<Option<char>, Error> {
        self.current_opt = None;
        self.arg_span = None;
        self.match_index = None;
        self.last_error = None;
        let start = self.cursor;
        let mut skipped = 0;
        let result = loop {
            let Some(token) = self.argv.get(self.cursor) else {
                break Ok(None);
            };
            if is_dashdash(token) {
                self.cursor += 1;
                break Ok(None);
            }
            if !is_short(token) {
                if !self.permute {
                    break Ok(None);
                }
                self.cursor += 1;
                skipped += 1;
                continue;
            }
            let rest = &token[1 + self.cluster_offset..];
            let Some(opt) = rest.chars().next() else {
                // exhausted cluster, step to the next token
                self.cluster_offset = 0;
                self.cursor += 1;
                continue;
            };
            let followed = &rest[opt.len_utf8()..];
            let attached_at = token.len() - followed.len();
            self.current_opt = Some(opt);
            break match arity_of(optstring, opt) {
                None => {
                    // the whole token is abandoned, not just the character
                    self.cluster_offset = 0;
                    self.cursor += 1;
                    Err(self.report(Error::new(ErrorKind::InvalidOption, opt)))
                }
                Some(Arity::None) => {
                    if followed.is_empty() {
                        self.cluster_offset = 0;
                        self.cursor += 1;
                    } else {
                        self.cluster_offset += opt.len_utf8();
                    }
                    Ok(Some(opt))
                }
                Some(Arity::Required) => {
                    self.cluster_offset = 0;
                    self.cursor += 1;
                    if !followed.is_empty() {
                        self.arg_span = Some(Span {
                            index: self.cursor - 1,
                            offset: attached_at,
                        });
                        Ok(Some(opt))
                    } else if self.cursor < self.argv.len() {
                        self.arg_span = Some(Span {
                            index: self.cursor,
                            offset: 0,
                        });
                        self.cursor += 1;
                        Ok(Some(opt))
                    } else {
                        Err(self.report(Error::new(ErrorKind::MissingArgument, opt)))
                    }
                }
                Some(Arity::Optional) => {
                    self.cluster_offset = 0;
                    self.cursor += 1;
                    if !followed.is_empty() {
                        self.arg_span = Some(Span {
                            index: self.cursor - 1,
                            offset: attached_at,
                        });
                    }
                    Ok(Some(opt))
                }
            };
        };
        if skipped > 0 {
            self.permute_skipped(start, skipped);
        }
        result
    }

    /// Scans the next long option.
    ///
    /// `--name` tokens are resolved against the descriptor table.  Any
    /// unambiguous prefix of a name is accepted and an exact name always
    /// wins over prefix matches against other names.  Tokens in short form
    /// are handed to [`next_opt`](Self::next_opt) with an option string
    /// built from the table codes, so clustered short options keep working
    /// for long option callers.  Everything else behaves like
    /// [`next_opt`](Self::next_opt).
    ///
    /// After a match, [`match_index`](Self::match_index) reports which
    /// descriptor was hit.
    pub fn next_long(&mut self, longopts: &[LongOpt<'_>]) -> Result<Option<char>, Error> {
        self.next_long_impl(longopts, false)
    }

    /// Scans the next long option, treating single dash tokens as long.
    ///
    /// This works like [`next_long`](Self::next_long), except that a token
    /// such as `-color` is first matched against the table the way
    /// `--color` would be.  Short option clustering is used only when the
    /// token matches no descriptor name, or when it is a single character
    /// that is a known short code.
    pub fn next_long_only(&mut self, longopts: &[LongOpt<'_>]) -> Result<Option<char>, Error> {
        self.next_long_impl(longopts, true)
    }

    fn next_long_impl(
        &mut self,
        longopts: &[LongOpt<'_>],
        long_only: bool,
    ) -> Result<Option<char>, Error> {
        self.current_opt = None;
        self.arg_span = None;
        self.match_index = None;
        self.last_error = None;
        let start = self.cursor;
        let mut skipped = 0;
        let result = loop {
            let Some(token) = self.argv.get(self.cursor) else {
                break Ok(None);
            };
            if is_dashdash(token) {
                self.cursor += 1;
                break Ok(None);
            }
            if is_short(token) {
                if long_only && self.cluster_offset == 0 && leads_long(token, longopts) {
                    break self.take_long(longopts, 1);
                }
                break self.long_fallback(longopts);
            }
            if !is_long(token) {
                if !self.permute {
                    break Ok(None);
                }
                self.cursor += 1;
                skipped += 1;
                continue;
            }
            break self.take_long(longopts, 2);
        };
        if skipped > 0 {
            self.permute_skipped(start, skipped);
        }
        result
    }

    /// Consumes the long form token under the cursor.  `dashes` is the
    /// length of the dash prefix to strip, 2 for `--name` and 1 in long
    /// only mode.
    fn take_long(&mut self, longopts: &[LongOpt<'_>], dashes: usize) -> Result<Option<char>, Error> {
        let taken = self.cursor;
        self.cursor += 1;
        let (name, value_at) = split_eq(&self.argv[taken][dashes..]);
        let (index, desc) = match probe_long(longopts, name) {
            Lookup::Found(i) => (i, longopts[i]),
            Lookup::Ambiguous(i) => {
                let err = Error::new(ErrorKind::AmbiguousAbbreviation, longopts[i].name);
                return Err(self.report(err));
            }
            Lookup::Unknown => {
                let err = Error::new(ErrorKind::InvalidOption, name);
                return Err(self.report(err));
            }
        };
        self.match_index = Some(index);
        self.current_opt = Some(desc.code);
        match (value_at, desc.arity) {
            (Some(_), Arity::None) => {
                Err(self.report(Error::new(ErrorKind::UnexpectedArgument, desc.name)))
            }
            (Some(at), _) => {
                self.arg_span = Some(Span {
                    index: taken,
                    offset: dashes + at,
                });
                Ok(Some(desc.code))
            }
            (None, Arity::Required) => {
                if self.cursor < self.argv.len() {
                    self.arg_span = Some(Span {
                        index: self.cursor,
                        offset: 0,
                    });
                    self.cursor += 1;
                    Ok(Some(desc.code))
                } else {
                    Err(self.report(Error::new(ErrorKind::MissingArgument, desc.name)))
                }
            }
            (None, _) => Ok(Some(desc.code)),
        }
    }

    /// Scans a short form token on behalf of a long option caller.  The
    /// option string is synthesized from the table, one code per
    /// descriptor with the colons its arity dictates.
    fn long_fallback(&mut self, longopts: &[LongOpt<'_>]) -> Result<Option<char>, Error> {
        let mut optstring = String::with_capacity(longopts.len() * 3);
        for desc in longopts {
            optstring.push(desc.code);
            match desc.arity {
                Arity::None => {}
                Arity::Required => optstring.push(':'),
                Arity::Optional => optstring.push_str("::"),
            }
        }
        let result = self.next_opt(&optstring);
        self.match_index = self
            .current_opt
            .and_then(|code| longopts.iter().position(|desc| desc.code == code));
        result
    }

    /// Moves the run of `count` skipped positionals starting at `start`
    /// behind the options consumed after them.  One stable rotation keeps
    /// the relative order on both sides; afterwards the cursor sits just
    /// before the moved positionals again.
    fn permute_skipped(&mut self, start: usize, count: usize) {
        let end = self.cursor;
        self.argv[start..end].rotate_left(count);
        self.cursor -= count;
        if let Some(span) = self.arg_span.as_mut() {
            // captured argument slots shift left with the rotation
            if span.index >= start + count && span.index < end {
                span.index -= count;
            }
        }
    }

    fn report(&mut self, err: Error) -> Error {
        self.last_error = Some(err.clone());
        err
    }

    /// Returns the next remaining argument and steps over it.
    ///
    /// This does not care whether the argument looks like an option, which
    /// makes it the way to drain positionals once scanning is done, and
    /// the way to pull a subcommand name out of the middle of a command
    /// line.  A half consumed short option cluster is abandoned.
    pub fn next_arg(&mut self) -> Option<&str> {
        self.cluster_offset = 0;
        let arg = self.argv.get(self.cursor)?;
        self.cursor += 1;
        Some(arg.as_str())
    }

    /// Returns the argument captured by the most recent scan call.
    ///
    /// For `-cred` or `--color=red` this is `"red"`.  The slice points
    /// straight into the argument vector; nothing is copied.
    pub fn current_arg(&self) -> Option<&str> {
        let span = self.arg_span?;
        Some(&self.argv[span.index][span.offset..])
    }

    /// Returns the short code of the most recently matched option.
    ///
    /// After an invalid short option error this holds the offending
    /// character.
    pub fn current_opt(&self) -> Option<char> {
        self.current_opt
    }

    /// Returns the table index of the most recent long option match.
    ///
    /// This is how callers tell descriptors apart that share a short code
    /// or have none.  Matches through the short fallback report the first
    /// descriptor with the matching code.
    pub fn match_index(&self) -> Option<usize> {
        self.match_index
    }

    /// Returns the error recorded by the most recent scan call, if any.
    ///
    /// Every scan call starts out by clearing this again.
    pub fn last_error(&self) -> Option<&Error> {
        self.last_error.as_ref()
    }

    /// Returns the index of the next argument to be examined.
    ///
    /// Once scanning has returned `Ok(None)` this is where the
    /// positionals start.
    pub fn index(&self) -> usize {
        self.cursor
    }

    /// Returns the not yet scanned tail of the vector.
    pub fn remaining(&self) -> &[String] {
        &self.argv[self.cursor.min(self.argv.len())..]
    }

    /// Consumes the scanner and releases the not yet scanned tail.
    ///
    /// The tail is borrowed for the original lifetime again, so it can
    /// seed a fresh [`Scanner`] for a subcommand: its first element,
    /// usually the subcommand name, takes the place of the program name.
    pub fn into_remaining(self) -> &'a mut [String] {
        let Scanner { argv, cursor, .. } = self;
        let at = cursor.min(argv.len());
        &mut argv[at..]
    }
}

fn is_dashdash(arg: &str) -> bool {
    arg == "--"
}

/// A token of the shape `-x...` where `x` is not a dash.
fn is_short(arg: &str) -> bool {
    let bytes = arg.as_bytes();
    bytes.len() >= 2 && bytes[0] == b'-' && bytes[1] != b'-'
}

/// A token of the shape `--x...`, so neither `--` itself nor a short one.
fn is_long(arg: &str) -> bool {
    let bytes = arg.as_bytes();
    bytes.len() >= 3 && bytes[0] == b'-' && bytes[1] == b'-'
}

/// Looks up a short option in the option string and returns its arity.
/// `:` never names an option, it only marks arities.
fn arity_of(optstring: &str, opt: char) -> Option<Arity> {
    if opt == ':' {
        return None;
    }
    let mut chars = optstring.chars();
    while let Some(ch) = chars.next() {
        if ch == opt {
            let marker = chars.as_str();
            return Some(if marker.starts_with("::") {
                Arity::Optional
            } else if marker.starts_with(':') {
                Arity::Required
            } else {
                Arity::None
            });
        }
    }
    None
}

/// Splits a long option body into the name and the byte position of the
/// value behind the first `=`, if any.
fn split_eq(body: &str) -> (&str, Option<usize>) {
    match body.find('=') {
        Some(at) => (&body[..at], Some(at + 1)),
        None => (body, None),
    }
}

/// Decides whether a single dash token should be tried against the long
/// option table first.  A single character that is a known short code
/// stays short; everything else goes long if any descriptor name matches.
fn leads_long(token: &str, longopts: &[LongOpt<'_>]) -> bool {
    let body = &token[1..];
    let mut chars = body.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    if chars.next().is_none() && longopts.iter().any(|desc| desc.code == first) {
        return false;
    }
    let (name, _) = split_eq(body);
    !matches!(probe_long(longopts, name), Lookup::Unknown)
}

enum Lookup {
    Found(usize),
    Ambiguous(usize),
    Unknown,
}

/// Resolves a possibly abbreviated name against the descriptor table.
///
/// An exact match wins no matter where it sits in the table, so the whole
/// table is scanned before prefix matches count.  Otherwise the name may
/// be a prefix of exactly one descriptor name; several prefix matches are
/// reported as ambiguous with the index of the last candidate tried.  The
/// empty name matches nothing.
fn probe_long(longopts: &[LongOpt<'_>], name: &str) -> Lookup {
    if name.is_empty() {
        return Lookup::Unknown;
    }
    let mut found = None;
    let mut conflict = None;
    for (i, desc) in longopts.iter().enumerate() {
        if desc.name == name {
            return Lookup::Found(i);
        }
        if desc.name.starts_with(name) {
            if found.is_none() {
                found = Some(i);
            } else {
                conflict = Some(i);
            }
        }
    }
    match (found, conflict) {
        (Some(_), Some(i)) => Lookup::Ambiguous(i),
        (Some(i), None) => Lookup::Found(i),
        _ => Lookup::Unknown,
    }
}

/// Cuts a string down to at most `max` bytes on a character boundary.
fn truncated(s: &str, max: usize) -> &str {
    if s.len() <= max {
        return s;
    }
    let mut end = max;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}
