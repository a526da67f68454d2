//! The line-oriented `key=value` properties text format.
//!
//! Reader and writer are symmetric: everything the reader treats specially
//! (`#`/`!` comments, `=`/`:`/whitespace separators, backslash escapes,
//! trailing-backslash continuation) is escaped on the way out, so a written
//! file parses back to the exact same pairs.

use std::io::Write;

use crate::error::PropfillError;

/// Parse properties text into `(key, value)` pairs in file order.
/// Duplicate keys are preserved here; callers decide the merge policy.
/// Returns `Err` on a malformed escape sequence.
pub fn parse(content: &str) -> Result<Vec<(String, String)>, PropfillError> {
    let mut pairs = Vec::new();
    let mut lines = content.lines();

    while let Some(line) = lines.next() {
        let trimmed = line.trim_start();
        if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with('!') {
            continue;
        }

        // Assemble the logical line: a trailing unescaped backslash folds in
        // the next line with its leading whitespace stripped.
        let mut logical = trimmed.to_string();
        while ends_with_continuation(&logical) {
            logical.pop();
            match lines.next() {
                Some(next) => logical.push_str(next.trim_start()),
                None => break,
            }
        }

        pairs.push(split_pair(&logical)?);
    }

    Ok(pairs)
}

/// Write a comment header and `key=value` lines to `w`.
/// Pairs are written in the order given.
pub fn write<W: Write>(
    w: &mut W,
    pairs: &[(String, String)],
    comments: &str,
) -> std::io::Result<()> {
    if !comments.is_empty() {
        for line in comments.lines() {
            writeln!(w, "# {}", line)?;
        }
    }
    for (key, value) in pairs {
        writeln!(w, "{}={}", escape(key, true), escape(value, false))?;
    }
    Ok(())
}

/// True if the line ends with an odd number of backslashes, i.e. the final
/// backslash escapes the line terminator rather than a preceding character.
fn ends_with_continuation(line: &str) -> bool {
    let trailing = line.chars().rev().take_while(|&c| c == '\\').count();
    trailing % 2 == 1
}

/// Split a logical line into key and value.
/// The key ends at the first unescaped `=`, `:` or whitespace; whitespace
/// around the separator is skipped; at most one `=`/`:` is consumed.
fn split_pair(line: &str) -> Result<(String, String), PropfillError> {
    let mut sep = None;
    let mut escaped = false;
    for (i, c) in line.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' => escaped = true,
            '=' | ':' => {
                sep = Some(i);
                break;
            }
            c if c.is_whitespace() => {
                sep = Some(i);
                break;
            }
            _ => {}
        }
    }

    let (raw_key, rest) = match sep {
        None => (line, ""),
        Some(i) => (&line[..i], &line[i..]),
    };

    let mut raw_value = rest.trim_start();
    if let Some(first) = raw_value.chars().next() {
        if first == '=' || first == ':' {
            raw_value = raw_value[first.len_utf8()..].trim_start();
        }
    }

    Ok((unescape(raw_key)?, unescape(raw_value)?))
}

fn unescape(s: &str) -> Result<String, PropfillError> {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('t') => out.push('\t'),
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('f') => out.push('\u{000C}'),
            Some('u') => {
                let mut code = 0u32;
                for _ in 0..4 {
                    let digit = chars
                        .next()
                        .and_then(|d| d.to_digit(16))
                        .ok_or_else(|| {
                            PropfillError::Parse(format!(
                                "invalid \\u escape in {:?}: expected 4 hex digits",
                                s
                            ))
                        })?;
                    code = code * 16 + digit;
                }
                let decoded = char::from_u32(code).ok_or_else(|| {
                    PropfillError::Parse(format!("\\u{:04X} is not a valid character", code))
                })?;
                out.push(decoded);
            }
            // Any other escaped character stands for itself (\=, \:, \#, \!, \\, \ ).
            Some(other) => out.push(other),
            // A dangling trailing backslash (no continuation line followed).
            None => {}
        }
    }
    Ok(out)
}

fn escape(s: &str, escape_all_spaces: bool) -> String {
    let mut out = String::with_capacity(s.len());
    let mut leading = true;
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\t' => out.push_str("\\t"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\u{000C}' => out.push_str("\\f"),
            '=' | ':' | '#' | '!' => {
                out.push('\\');
                out.push(c);
            }
            ' ' if escape_all_spaces || leading => out.push_str("\\ "),
            c if (c as u32) < 0x20 => out.push_str(&format!("\\u{:04X}", c as u32)),
            c => out.push(c),
        }
        if c != ' ' {
            leading = false;
        }
    }
    out
}
