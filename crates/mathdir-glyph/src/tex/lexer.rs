//! Tokenizer for the LaTeX subset.

/// Token kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TokenKind<'a> {
    /// `\name` or `\<symbol>`; the name excludes the backslash.
    Command(&'a str),
    /// Any other character.
    Char(char),
    /// `{`
    OpenBrace,
    /// `}`
    CloseBrace,
    /// `^`
    Caret,
    /// `_`
    Underscore,
    /// Run of whitespace.
    Space,
}

/// Token with its byte span in the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Token<'a> {
    pub(crate) kind: TokenKind<'a>,
    pub(crate) offset: usize,
    pub(crate) len: usize,
}

impl Token<'_> {
    pub(crate) fn end(&self) -> usize {
        self.offset + self.len
    }

    /// Human-readable description for error messages.
    pub(crate) fn describe(&self) -> String {
        match self.kind {
            TokenKind::Command(name) => format!("'\\{name}'"),
            TokenKind::Char(c) => format!("'{c}'"),
            TokenKind::OpenBrace => "'{'".to_owned(),
            TokenKind::CloseBrace => "'}'".to_owned(),
            TokenKind::Caret => "'^'".to_owned(),
            TokenKind::Underscore => "'_'".to_owned(),
            TokenKind::Space => "whitespace".to_owned(),
        }
    }
}

/// Split `source` into tokens.
///
/// Never fails: a trailing lone backslash becomes `Char('\\')` and is
/// rejected by the parser.
pub(crate) fn tokenize(source: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    let mut chars = source.char_indices().peekable();

    while let Some((offset, c)) = chars.next() {
        let kind = match c {
            '\\' => match chars.peek().copied() {
                Some((start, next)) if next.is_ascii_alphabetic() => {
                    let mut end = start;
                    while let Some(&(i, ch)) = chars.peek() {
                        if !ch.is_ascii_alphabetic() {
                            break;
                        }
                        end = i + ch.len_utf8();
                        chars.next();
                    }
                    TokenKind::Command(&source[start..end])
                }
                Some((start, next)) => {
                    chars.next();
                    TokenKind::Command(&source[start..start + next.len_utf8()])
                }
                None => TokenKind::Char('\\'),
            },
            '{' => TokenKind::OpenBrace,
            '}' => TokenKind::CloseBrace,
            '^' => TokenKind::Caret,
            '_' => TokenKind::Underscore,
            c if c.is_whitespace() => {
                while chars.peek().is_some_and(|&(_, ch)| ch.is_whitespace()) {
                    chars.next();
                }
                TokenKind::Space
            }
            c => TokenKind::Char(c),
        };

        let end = chars.peek().map_or(source.len(), |&(i, _)| i);
        tokens.push(Token {
            kind,
            offset,
            len: end - offset,
        });
    }

    tokens
}
