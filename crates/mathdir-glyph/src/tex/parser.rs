//! Recursive descent parser producing glyph nodes.

use super::lexer::{Token, TokenKind, tokenize};
use super::symbols;
use crate::source::RenderError;
use crate::tree::{GlyphKind, GlyphNode};

/// What terminates the list being parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Until {
    /// End of input.
    End,
    /// Matching `}` of the brace at `open`.
    Brace { open: usize },
    /// `]` closing a root index opened at `open`.
    Bracket { open: usize },
    /// `\right` matching the `\left` at `open`.
    Right { open: usize },
}

/// Deepest group nesting accepted before parsing gives up.
pub(crate) const MAX_DEPTH: usize = 256;

/// Parsed atom before scripts are attached.
enum Atom {
    Node(GlyphNode),
    /// `mop` leaf; may be followed by `\limits` / `\nolimits`.
    Operator(GlyphNode),
}

/// Parse `source` into the children of a root group.
pub(crate) fn parse(source: &str) -> Result<Vec<GlyphNode>, RenderError> {
    let mut parser = Parser {
        source,
        tokens: tokenize(source),
        pos: 0,
        depth: 0,
    };
    parser.parse_list(Until::End)
}

struct Parser<'a> {
    source: &'a str,
    tokens: Vec<Token<'a>>,
    pos: usize,
    depth: usize,
}

impl<'a> Parser<'a> {
    fn peek(&self) -> Option<Token<'a>> {
        self.tokens.get(self.pos).copied()
    }

    fn peek_at(&self, ahead: usize) -> Option<Token<'a>> {
        self.tokens.get(self.pos + ahead).copied()
    }

    fn bump(&mut self) -> Option<Token<'a>> {
        let token = self.peek()?;
        self.pos += 1;
        Some(token)
    }

    fn skip_spaces(&mut self) {
        while self.peek().is_some_and(|t| t.kind == TokenKind::Space) {
            self.pos += 1;
        }
    }

    /// Run `parse` one nesting level deeper.
    fn nested<T>(
        &mut self,
        parse: impl FnOnce(&mut Self) -> Result<T, RenderError>,
    ) -> Result<T, RenderError> {
        if self.depth >= MAX_DEPTH {
            let offset = self.peek().map_or(self.source.len(), |t| t.offset);
            return Err(RenderError::TooDeep { offset });
        }
        self.depth += 1;
        let result = parse(self);
        self.depth -= 1;
        result
    }

    fn parse_list(&mut self, until: Until) -> Result<Vec<GlyphNode>, RenderError> {
        self.nested(|parser| parser.parse_list_inner(until))
    }

    fn parse_list_inner(&mut self, until: Until) -> Result<Vec<GlyphNode>, RenderError> {
        let mut nodes = Vec::new();

        loop {
            self.skip_spaces();
            let Some(token) = self.peek() else {
                return match until {
                    Until::End => Ok(nodes),
                    Until::Brace { open } | Until::Bracket { open } => {
                        Err(RenderError::UnbalancedGroup { offset: open })
                    }
                    Until::Right { open } => Err(RenderError::MissingArgument {
                        command: "right".to_owned(),
                        offset: open,
                    }),
                };
            };

            match token.kind {
                TokenKind::CloseBrace => {
                    if matches!(until, Until::Brace { .. }) {
                        self.pos += 1;
                        return Ok(nodes);
                    }
                    return Err(RenderError::UnbalancedGroup {
                        offset: token.offset,
                    });
                }
                TokenKind::Char(']') if matches!(until, Until::Bracket { .. }) => {
                    self.pos += 1;
                    return Ok(nodes);
                }
                TokenKind::Command("right") => {
                    if matches!(until, Until::Right { .. }) {
                        return Ok(nodes);
                    }
                    return Err(RenderError::UnexpectedToken {
                        found: token.describe(),
                        offset: token.offset,
                    });
                }
                TokenKind::Caret | TokenKind::Underscore => {
                    // Script without a base attaches to an empty group
                    let node = self.attach_scripts(Atom::Node(GlyphNode::group(Vec::new())))?;
                    nodes.push(node);
                }
                _ => {
                    if let Some(atom) = self.parse_atom(true)? {
                        nodes.push(self.attach_scripts(atom)?);
                    }
                }
            }
        }
    }

    /// Parse one atom. Returns `None` for commands that produce no glyph.
    fn parse_atom(&mut self, number_run: bool) -> Result<Option<Atom>, RenderError> {
        let Some(token) = self.bump() else {
            return Ok(None);
        };

        let node = match token.kind {
            TokenKind::Char('\\') => {
                return Err(RenderError::UnexpectedToken {
                    found: token.describe(),
                    offset: token.offset,
                });
            }
            TokenKind::Char(c) if c.is_ascii_digit() => {
                let mut text = String::from(c);
                if number_run {
                    self.extend_number(&mut text);
                }
                GlyphNode::leaf(text, "mnum")
            }
            TokenKind::Char(c) => {
                GlyphNode::leaf(symbols::char_glyph(c).to_string(), symbols::char_class(c))
            }
            TokenKind::OpenBrace => {
                let children = self.parse_list(Until::Brace {
                    open: token.offset,
                })?;
                GlyphNode::group(children).with_class("mord")
            }
            TokenKind::CloseBrace => {
                return Err(RenderError::UnbalancedGroup {
                    offset: token.offset,
                });
            }
            TokenKind::Caret | TokenKind::Underscore => {
                return Err(RenderError::UnexpectedToken {
                    found: token.describe(),
                    offset: token.offset,
                });
            }
            TokenKind::Space => return Ok(None),
            TokenKind::Command(name) => return self.parse_command(name, token),
        };

        Ok(Some(Atom::Node(node)))
    }

    /// Continue a digit run, accepting a decimal point between digits.
    fn extend_number(&mut self, text: &mut String) {
        loop {
            match (self.peek().map(|t| t.kind), self.peek_at(1).map(|t| t.kind)) {
                (Some(TokenKind::Char(d)), _) if d.is_ascii_digit() => {
                    text.push(d);
                    self.pos += 1;
                }
                (Some(TokenKind::Char('.')), Some(TokenKind::Char(d))) if d.is_ascii_digit() => {
                    text.push('.');
                    text.push(d);
                    self.pos += 2;
                }
                _ => break,
            }
        }
    }

    fn parse_command(&mut self, name: &'a str, token: Token<'a>) -> Result<Option<Atom>, RenderError> {
        let node = match name {
            "frac" | "dfrac" | "tfrac" => {
                let numerator = self.parse_argument(name, token)?.with_class("frac-num");
                let denominator = self.parse_argument(name, token)?.with_class("frac-den");
                GlyphNode::new(GlyphKind::Fraction).with_children(vec![numerator, denominator])
            }
            "sqrt" => self.parse_radical(token)?,
            "left" => self.parse_left_right(token)?,
            "right" | "limits" | "nolimits" => {
                return Err(RenderError::UnexpectedToken {
                    found: token.describe(),
                    offset: token.offset,
                });
            }
            "text" | "textrm" | "mbox" => GlyphNode::leaf(self.parse_raw_text(name, token)?, "mtext"),
            "mathrm" => GlyphNode::leaf(self.parse_raw_text(name, token)?, "mord"),
            "operatorname" => {
                let text = self.parse_raw_text(name, token)?;
                return Ok(Some(Atom::Operator(GlyphNode::leaf(text, "mop"))));
            }
            _ => {
                if let Some(glyph) = symbols::operator(name) {
                    return Ok(Some(Atom::Operator(GlyphNode::leaf(glyph, "mop"))));
                }
                if let Some((glyph, class)) = symbols::symbol(name) {
                    GlyphNode::leaf(glyph, class)
                } else if let Some(space) = symbols::spacing(name) {
                    if space.is_empty() {
                        return Ok(None);
                    }
                    GlyphNode::leaf(space, "mspace")
                } else if symbols::is_style_command(name) {
                    return Ok(None);
                } else {
                    return Err(RenderError::UnknownCommand {
                        name: name.to_owned(),
                        offset: token.offset,
                    });
                }
            }
        };

        Ok(Some(Atom::Node(node)))
    }

    /// Parse a required argument as a group: `{...}` or a single atom.
    fn parse_argument(&mut self, command: &str, token: Token<'a>) -> Result<GlyphNode, RenderError> {
        self.nested(|parser| parser.parse_argument_inner(command, token))
    }

    fn parse_argument_inner(&mut self, command: &str, token: Token<'a>) -> Result<GlyphNode, RenderError> {
        self.skip_spaces();
        let missing = |offset| RenderError::MissingArgument {
            command: command.to_owned(),
            offset,
        };

        let Some(next) = self.peek() else {
            return Err(missing(self.source.len()));
        };

        match next.kind {
            TokenKind::OpenBrace => {
                self.pos += 1;
                let children = self.parse_list(Until::Brace { open: next.offset })?;
                Ok(GlyphNode::group(children))
            }
            TokenKind::CloseBrace | TokenKind::Caret | TokenKind::Underscore => {
                Err(missing(next.offset))
            }
            _ => match self.parse_atom(false)? {
                Some(Atom::Node(node) | Atom::Operator(node)) => Ok(GlyphNode::group(vec![node])),
                None => Err(missing(token.end())),
            },
        }
    }

    /// `\sqrt{body}` or `\sqrt[index]{body}`.
    fn parse_radical(&mut self, token: Token<'a>) -> Result<GlyphNode, RenderError> {
        self.skip_spaces();
        let mut children = Vec::with_capacity(2);

        if let Some(open) = self.peek().filter(|t| t.kind == TokenKind::Char('[')) {
            self.pos += 1;
            let index = self.parse_list(Until::Bracket { open: open.offset })?;
            children.push(GlyphNode::group(index).with_class("root-index"));
        }

        children.push(self.parse_argument("sqrt", token)?.with_class("sqrt-body"));
        Ok(GlyphNode::new(GlyphKind::Radical).with_children(children))
    }

    /// `\left<delim> ... \right<delim>`.
    fn parse_left_right(&mut self, token: Token<'a>) -> Result<GlyphNode, RenderError> {
        let mut children = Vec::new();
        children.extend(self.parse_delimiter("left", token, "mopen")?);

        let body = self.parse_list(Until::Right {
            open: token.offset,
        })?;
        children.extend(body);

        // parse_list only returns Ok for Until::Right when \right is next
        let right = self.bump().ok_or(RenderError::MissingArgument {
            command: "right".to_owned(),
            offset: self.source.len(),
        })?;
        children.extend(self.parse_delimiter("right", right, "mclose")?);

        Ok(GlyphNode::group(children).with_class("minner"))
    }

    /// Delimiter after `\left` / `\right`; `.` means none.
    fn parse_delimiter(
        &mut self,
        command: &str,
        token: Token<'a>,
        class: &str,
    ) -> Result<Option<GlyphNode>, RenderError> {
        self.skip_spaces();
        let missing = RenderError::MissingArgument {
            command: command.to_owned(),
            offset: token.end(),
        };
        let Some(next) = self.bump() else {
            return Err(missing);
        };

        match next.kind {
            TokenKind::Char('.') => Ok(None),
            TokenKind::Char(c) => Ok(Some(GlyphNode::leaf(c.to_string(), class))),
            TokenKind::Command(name) => match symbols::symbol(name) {
                Some((glyph, _)) => Ok(Some(GlyphNode::leaf(glyph, class))),
                None => Err(RenderError::UnknownCommand {
                    name: name.to_owned(),
                    offset: next.offset,
                }),
            },
            _ => Err(missing),
        }
    }

    /// Raw text inside `{...}`, braces balanced, no math parsing.
    fn parse_raw_text(&mut self, command: &str, token: Token<'a>) -> Result<String, RenderError> {
        self.skip_spaces();
        let open = match self.peek() {
            Some(t) if t.kind == TokenKind::OpenBrace => t,
            other => {
                return Err(RenderError::MissingArgument {
                    command: command.to_owned(),
                    offset: other.map_or(token.end(), |t| t.offset),
                });
            }
        };
        self.pos += 1;

        let mut depth = 1usize;
        while let Some(t) = self.bump() {
            match t.kind {
                TokenKind::OpenBrace => depth += 1,
                TokenKind::CloseBrace => {
                    depth -= 1;
                    if depth == 0 {
                        return Ok(self.source[open.end()..t.offset].to_owned());
                    }
                }
                _ => {}
            }
        }

        Err(RenderError::UnbalancedGroup {
            offset: open.offset,
        })
    }

    /// Attach `^` / `_` scripts following an atom.
    fn attach_scripts(&mut self, atom: Atom) -> Result<GlyphNode, RenderError> {
        let (base, limits) = match atom {
            Atom::Node(node) => (node, false),
            Atom::Operator(node) => {
                let limits = self.parse_limit_controls();
                (node, limits)
            }
        };

        let mut sup: Option<GlyphNode> = None;
        let mut sub: Option<GlyphNode> = None;

        loop {
            self.skip_spaces();
            let Some(token) = self.peek() else { break };
            let (slot, class) = match token.kind {
                TokenKind::Caret => (&mut sup, "sup"),
                TokenKind::Underscore => (&mut sub, "sub"),
                _ => break,
            };
            if slot.is_some() {
                return Err(RenderError::UnexpectedToken {
                    found: format!("double {class}script {}", token.describe()),
                    offset: token.offset,
                });
            }
            self.pos += 1;
            let command = if class == "sup" { "^" } else { "_" };
            *slot = Some(self.parse_argument(command, token)?.with_class(class));
        }

        if limits && (sup.is_some() || sub.is_some()) {
            let mut children = vec![base];
            children.extend(sub);
            children.extend(sup);
            return Ok(GlyphNode::new(GlyphKind::OperatorLimits).with_children(children));
        }

        let script = match (sub, sup) {
            (Some(sub), Some(sup)) => GlyphNode::group(vec![sub, sup]).with_class("msupsub-scripts"),
            (Some(script), None) | (None, Some(script)) => script,
            (None, None) => return Ok(base),
        };

        Ok(GlyphNode::new(GlyphKind::SupSub).with_children(vec![base, script]))
    }

    /// Consume `\limits` / `\nolimits`; the last one wins.
    fn parse_limit_controls(&mut self) -> bool {
        let mut limits = false;
        loop {
            self.skip_spaces();
            match self.peek().map(|t| t.kind) {
                Some(TokenKind::Command("limits")) => limits = true,
                Some(TokenKind::Command("nolimits")) => limits = false,
                _ => return limits,
            }
            self.pos += 1;
        }
    }
}
