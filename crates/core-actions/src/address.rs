//! Leading address/range parsing.
//!
//! Grammar, tried in order: `,` or `%` (whole buffer), `<int>`, `<int>,`,
//! `<int>,<int>`, or nothing (default to the current line, zero characters
//! consumed — that zero is how the dispatcher learns no address was given).
//!
//! Parsing has a deliberate side effect: a successfully parsed address moves
//! `current_line` to the end of the range, exactly as the command language
//! requires ("5" alone means "go to line 5 and print it").

use core_state::Session;

/// A resolved address prefix. `start`/`end` are 1-based line numbers;
/// `consumed` is the byte length of the parsed prefix (0 = no address given).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RangeSpec {
    pub start: usize,
    pub end: usize,
    pub consumed: usize,
}

/// Scan one integer at the start of `s`. Returns `(value, bytes_consumed)`;
/// a consumed length of zero means no number was present. A leading sign is
/// accepted, but negative values clamp to zero and so fail the `start >= 1`
/// validation downstream.
pub(crate) fn scan_line_number(s: &str) -> (usize, usize) {
    let bytes = s.as_bytes();
    let mut i = 0;
    let mut negative = false;
    if i < bytes.len() && (bytes[i] == b'-' || bytes[i] == b'+') {
        negative = bytes[i] == b'-';
        i += 1;
    }
    let digits_start = i;
    while i < bytes.len() && bytes[i].is_ascii_digit() {
        i += 1;
    }
    if i == digits_start {
        return (0, 0);
    }
    let value = if negative {
        0
    } else {
        s[digits_start..i].parse().unwrap_or(usize::MAX)
    };
    (value, i)
}

/// Parse a leading range, updating `current_line` per the grammar above.
pub fn parse_range(session: &mut Session, command: &str) -> RangeSpec {
    let mut start = session.current_line;
    let mut end = start;

    if command.starts_with(',') || command.starts_with('%') {
        start = 1;
        end = session.last_line();
        session.current_line = end;
        return RangeSpec {
            start,
            end,
            consumed: 1,
        };
    }

    let (value, scanned) = scan_line_number(command);
    if scanned == 0 {
        return RangeSpec {
            start,
            end,
            consumed: 0,
        };
    }
    start = value;
    end = value;
    session.current_line = value;
    let mut consumed = scanned;

    if command[consumed..].starts_with(',') {
        consumed += 1;
        let (second, scanned) = scan_line_number(&command[consumed..]);
        if scanned > 0 {
            end = second;
            session.current_line = second;
            consumed += scanned;
        }
    }

    RangeSpec {
        start,
        end,
        consumed,
    }
}

/// Byte length of any address prefix, without resolving it against a session.
/// Used to classify `g`/`v` lines before dispatching them.
pub fn address_prefix_len(command: &str) -> usize {
    if command.starts_with(',') || command.starts_with('%') {
        return 1;
    }
    let (_, first) = scan_line_number(command);
    if first == 0 {
        return 0;
    }
    let mut consumed = first;
    if command[consumed..].starts_with(',') {
        consumed += 1;
        consumed += scan_line_number(&command[consumed..]).1;
    }
    consumed
}
