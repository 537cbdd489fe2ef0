//! Limits normalization for large operators.

use std::borrow::Cow;

/// Operators that get `\limits` forced by default.
pub const DEFAULT_LIMIT_OPERATORS: &[&str] = &["sum", "int", "prod", "bigcup", "bigcap"];

/// Insert `\limits` after each listed operator not already followed by
/// `\limits` or `\nolimits`.
///
/// Matches whole command names only: `\sum` matches, `\summary` does not.
/// Operator names are given without the backslash. Returns the input
/// unchanged (borrowed) when nothing needs inserting.
#[must_use]
pub fn force_limits<'a, S: AsRef<str>>(source: &'a str, operators: &[S]) -> Cow<'a, str> {
    let bytes = source.as_bytes();
    let mut out: Option<String> = None;
    let mut copied = 0;
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] != b'\\' {
            i += 1;
            continue;
        }

        let name_start = i + 1;
        let name_end = command_end(bytes, name_start);
        if name_end == name_start {
            // `\` followed by a non-letter: skip both so `\\sum` stays literal
            i = name_start + 1;
            continue;
        }

        let name = &source[name_start..name_end];
        i = name_end;

        if !operators.iter().any(|op| op.as_ref() == name) || has_limit_control(source, name_end) {
            continue;
        }

        let buf = out.get_or_insert_with(|| String::with_capacity(source.len() + 16));
        buf.push_str(&source[copied..name_end]);
        buf.push_str("\\limits");
        copied = name_end;
    }

    match out {
        Some(mut buf) => {
            buf.push_str(&source[copied..]);
            Cow::Owned(buf)
        }
        None => Cow::Borrowed(source),
    }
}

fn command_end(bytes: &[u8], start: usize) -> usize {
    let mut end = start;
    while end < bytes.len() && bytes[end].is_ascii_alphabetic() {
        end += 1;
    }
    end
}

/// True when `\limits` or `\nolimits` follows at `pos`, ignoring whitespace.
fn has_limit_control(source: &str, pos: usize) -> bool {
    let rest = source[pos..].trim_start();
    let Some(rest) = rest.strip_prefix('\\') else {
        return false;
    };
    let end = command_end(rest.as_bytes(), 0);
    matches!(&rest[..end], "limits" | "nolimits")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn force(source: &str) -> String {
        force_limits(source, DEFAULT_LIMIT_OPERATORS).into_owned()
    }

    #[test]
    fn test_inserts_after_operator() {
        assert_eq!(force(r"\sum_{i=1}^{n} i"), r"\sum\limits_{i=1}^{n} i");
    }

    #[test]
    fn test_all_default_operators() {
        assert_eq!(
            force(r"\int \prod \bigcup \bigcap"),
            r"\int\limits \prod\limits \bigcup\limits \bigcap\limits"
        );
    }

    #[test]
    fn test_existing_control_kept() {
        assert_eq!(force(r"\sum\limits_1"), r"\sum\limits_1");
        assert_eq!(force(r"\int \nolimits_0^1"), r"\int \nolimits_0^1");
    }

    #[test]
    fn test_whole_names_only() {
        assert_eq!(force(r"\summary + \integer"), r"\summary + \integer");
    }

    #[test]
    fn test_borrows_when_unchanged() {
        assert!(matches!(
            force_limits(r"x^2", DEFAULT_LIMIT_OPERATORS),
            Cow::Borrowed(_)
        ));
    }

    #[test]
    fn test_custom_operators() {
        let ops = ["lim"];
        assert_eq!(force_limits(r"\lim_{x} \sum", &ops), r"\lim\limits_{x} \sum");
    }

    #[test]
    fn test_idempotent() {
        let once = force(r"\sum_a \int_b");
        assert_eq!(force(&once), once);
    }
}
