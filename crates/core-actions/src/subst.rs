//! The substitution engine behind `s/pattern/repl/[g]`.
//!
//! The pattern compiles once per command. Each line in the range is matched
//! from its current offset; on a match the replacement is expanded (`&` is
//! the whole match, `\1`..`\9` are capture groups, `\x` is a literal `x`, a
//! lone trailing `\` is a literal backslash) and spliced in place. Without
//! the `g` flag one substitution per line is made; with it, matching resumes
//! just past each inserted replacement (non-overlapping) until the line is
//! exhausted. All offsets are byte offsets on UTF-8 boundaries.

use core_state::{EdError, Session};
use regex::{Captures, Regex};
use tracing::trace;

/// Parsed `s` command parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubstParams {
    pub pattern: String,
    pub repl: String,
    pub is_global: bool,
}

/// Index of the first unescaped `/` in `s`, if any. A backslash escapes the
/// character after it, so `\/` stays inside the pattern or replacement.
pub(crate) fn find_unescaped_slash(s: &str) -> Option<usize> {
    let mut escaped = false;
    for (i, c) in s.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' => escaped = true,
            '/' => return Some(i),
            _ => {}
        }
    }
    None
}

/// Split `"/pattern/repl/[g]"` into its parts. The closing delimiter around
/// the replacement may be omitted (the replacement then runs to the end of
/// the command); anything after a present closing `/` other than a single
/// `g` is a suffix error.
pub fn parse_params(args: &str) -> Result<SubstParams, EdError> {
    let rest = args.strip_prefix('/').ok_or(EdError::RegexNoSlash)?;

    let pattern_end = find_unescaped_slash(rest).ok_or(EdError::RegexUnterminated)?;
    let pattern = &rest[..pattern_end];
    let after_pattern = &rest[pattern_end + 1..];

    let (repl, flags) = match find_unescaped_slash(after_pattern) {
        Some(i) => (&after_pattern[..i], Some(&after_pattern[i + 1..])),
        None => (after_pattern, None),
    };
    let is_global = match flags {
        None | Some("") => false,
        Some("g") => true,
        Some(_) => return Err(EdError::BadCommandSuffix),
    };

    Ok(SubstParams {
        pattern: pattern.to_string(),
        repl: repl.to_string(),
        is_global,
    })
}

/// Expand a replacement template against one set of captures. A group that
/// did not participate in the match expands to the empty string.
fn expand_replacement(repl: &str, caps: &Captures<'_>) -> String {
    let mut out = String::with_capacity(repl.len());
    let mut chars = repl.chars();
    while let Some(c) = chars.next() {
        match c {
            '&' => out.push_str(caps.get(0).map_or("", |m| m.as_str())),
            '\\' => match chars.next() {
                None => out.push('\\'),
                Some(d @ '1'..='9') => {
                    let group = (d as u8 - b'0') as usize;
                    out.push_str(caps.get(group).map_or("", |m| m.as_str()));
                }
                Some(other) => out.push(other),
            },
            other => out.push(other),
        }
    }
    out
}

/// Substitute once on `line_num` starting at byte `offset`. Returns the
/// offset just past the inserted replacement, or `None` if nothing matched.
/// An empty match additionally steps over one character so repeated global
/// application always makes progress.
fn substitute_on_line(
    session: &mut Session,
    re: &Regex,
    line_num: usize,
    offset: usize,
    repl: &str,
) -> Option<usize> {
    let text = session.buffer.text(line_num - 1)?.to_string();
    if offset > text.len() {
        return None;
    }
    let caps = re.captures_at(&text, offset)?;
    let m = caps.get(0)?;

    let expansion = expand_replacement(repl, &caps);
    let mut updated = String::with_capacity(text.len() - m.len() + expansion.len());
    updated.push_str(&text[..m.start()]);
    updated.push_str(&expansion);
    updated.push_str(&text[m.end()..]);

    let mut next = m.start() + expansion.len();
    if m.is_empty() {
        next += updated[next..].chars().next().map_or(1, char::len_utf8);
    }
    session.buffer.set_text(line_num - 1, updated);
    Some(next)
}

/// Apply a substitution to every line in `[start, end]`. Reports
/// [`EdError::NoMatch`] when no line in the range matched at all.
pub fn substitute_on_lines(
    session: &mut Session,
    params: &SubstParams,
    start: usize,
    end: usize,
) -> Result<(), EdError> {
    let re =
        Regex::new(&params.pattern).map_err(|e| EdError::RegexCompile(e.to_string()))?;
    trace!(
        target: "command.dispatch",
        pattern = %params.pattern,
        start,
        end,
        global = params.is_global,
        "substitute"
    );

    let mut matched_any = false;
    for line_num in start..=end {
        let mut next = substitute_on_line(session, &re, line_num, 0, &params.repl);
        if next.is_some() {
            matched_any = true;
        }
        if params.is_global {
            while let Some(offset) = next {
                next = substitute_on_line(session, &re, line_num, offset, &params.repl);
            }
        }
    }

    if matched_any {
        Ok(())
    } else {
        Err(EdError::NoMatch)
    }
}
