//! Locating equation units in saved markup.
//!
//! Unit elements are `<span>` elements carrying the unit class. Tags are
//! found with a quote-aware scan, so attribute values may contain `>`; a
//! unit's extent is found by balancing nested `<span>` tags, and its
//! attributes are decoded with `quick-xml`. Legacy `$$…$$` delimiters in
//! text between tags are also picked up.

use std::borrow::Cow;
use std::collections::HashMap;
use std::sync::LazyLock;

use mathdir_glyph::Direction;
use mathdir_unit::{UNIT_CLASS, UnitId, UnitValue, VALUE_ATTR, deserialize};
use quick_xml::events::Event;
use quick_xml::reader::Reader;
use regex::Regex;

use crate::error::DocumentError;

/// Legacy inline delimiters.
static INLINE_DELIMITED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\$([^<>]+?)\$\$").expect("invalid delimiter regex"));

/// Scanned piece of a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Piece {
    /// Markup outside any unit.
    Markup(String),
    /// Unit element with its stored value and previous id, if any.
    Unit { id: Option<UnitId>, value: UnitValue },
    /// Legacy `$$…$$` source; direction comes from configuration.
    Inline(String),
}

/// Tag, comment or declaration found in markup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Tag {
    start: usize,
    end: usize,
    span: bool,
    closing: bool,
    self_closing: bool,
}

/// Every tag in `markup`, in document order.
///
/// A `<` not followed by a tag name is text. A tag with no closing `>`
/// runs to the end of the input.
fn tags(markup: &str) -> Vec<Tag> {
    let mut tags = Vec::new();
    let mut cursor = 0;

    while let Some(offset) = markup[cursor..].find('<') {
        let start = cursor + offset;
        let rest = &markup[start + 1..];

        if rest.starts_with("!--") {
            let end = rest.find("-->").map_or(markup.len(), |p| start + 1 + p + 3);
            tags.push(Tag {
                start,
                end,
                span: false,
                closing: false,
                self_closing: false,
            });
            cursor = end;
            continue;
        }

        let closing = rest.starts_with('/');
        let name_start = start + 1 + usize::from(closing);
        let tail = &markup[name_start..];
        let name = &tail[..tail.find(|c: char| !c.is_ascii_alphanumeric()).unwrap_or(tail.len())];
        let declaration = !closing && rest.starts_with(['!', '?']);
        if !declaration && !name.starts_with(|c: char| c.is_ascii_alphabetic()) {
            cursor = start + 1;
            continue;
        }

        let end = tag_end(markup, name_start + name.len()).unwrap_or(markup.len());
        let body = &markup[start..end];
        tags.push(Tag {
            start,
            end,
            span: name.eq_ignore_ascii_case("span"),
            closing,
            self_closing: body.strip_suffix('>').unwrap_or(body).trim_end().ends_with('/'),
        });
        cursor = end;
    }

    tags
}

/// Offset just past the `>` ending a tag; quoted attribute values are skipped.
fn tag_end(markup: &str, from: usize) -> Option<usize> {
    let mut quote = None;
    let mut after_eq = false;

    for (offset, c) in markup[from..].char_indices() {
        if let Some(open) = quote {
            if c == open {
                quote = None;
            }
            continue;
        }
        match c {
            '>' => return Some(from + offset + 1),
            '=' => after_eq = true,
            '"' | '\'' if after_eq => {
                quote = Some(c);
                after_eq = false;
            }
            c if c.is_whitespace() => {}
            _ => after_eq = false,
        }
    }
    None
}

/// Split `html` into markup and unit pieces.
pub(crate) fn scan(html: &str) -> Vec<Piece> {
    let spans: Vec<Tag> = tags(html).into_iter().filter(|tag| tag.span).collect();

    let mut pieces = Vec::new();
    let mut cursor = 0;
    let mut i = 0;

    while i < spans.len() {
        let tag = spans[i];
        i += 1;
        if tag.closing || tag.self_closing || tag.start < cursor {
            continue;
        }

        let open_tag = &html[tag.start..tag.end];
        let attrs = match decode_attrs(open_tag) {
            Ok(attrs) => attrs,
            Err(e) => {
                if open_tag.contains(UNIT_CLASS) {
                    tracing::warn!(offset = tag.start, error = %e, "Failed to decode unit attributes");
                }
                continue;
            }
        };
        if !has_unit_class(&attrs) {
            continue;
        }

        push_markup(&mut pieces, &html[cursor..tag.start]);

        match matching_close(&spans, i - 1) {
            Some(close) => {
                let inner = &html[tag.end..spans[close].start];
                pieces.push(read_unit(&attrs, inner));
                cursor = spans[close].end;
                i = close + 1;
            }
            None => {
                tracing::warn!(offset = tag.start, "Unit element is never closed");
                pieces.push(read_unit(&attrs, ""));
                cursor = tag.end;
            }
        }
    }

    push_markup(&mut pieces, &html[cursor..]);
    pieces
}

/// Index of the tag closing the element opened at `open`.
fn matching_close(tags: &[Tag], open: usize) -> Option<usize> {
    let mut depth = 0usize;
    for (index, tag) in tags.iter().enumerate().skip(open) {
        if tag.self_closing {
            continue;
        }
        if tag.closing {
            depth = depth.saturating_sub(1);
            if depth == 0 {
                return Some(index);
            }
        } else {
            depth += 1;
        }
    }
    None
}

/// Append markup, splitting legacy inline units out of its text.
fn push_markup(pieces: &mut Vec<Piece>, markup: &str) {
    let mut text_start = 0;
    for tag in tags(markup) {
        push_text_run(pieces, &markup[text_start..tag.start]);
        push_text(pieces, &markup[tag.start..tag.end]);
        text_start = tag.end;
    }
    push_text_run(pieces, &markup[text_start..]);
}

/// Append text between two tags.
fn push_text_run(pieces: &mut Vec<Piece>, text: &str) {
    let mut last = 0;
    for caps in INLINE_DELIMITED.captures_iter(text) {
        let (Some(whole), Some(body)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        let source = body.as_str().trim();
        if source.is_empty() {
            continue;
        }
        push_text(pieces, &text[last..whole.start()]);
        pieces.push(Piece::Inline(unescape(source).into_owned()));
        last = whole.end();
    }
    push_text(pieces, &text[last..]);
}

fn push_text(pieces: &mut Vec<Piece>, text: &str) {
    if text.is_empty() {
        return;
    }
    if let Some(Piece::Markup(previous)) = pieces.last_mut() {
        previous.push_str(text);
    } else {
        pieces.push(Piece::Markup(text.to_owned()));
    }
}

/// Value of a unit element: stored value, legacy attributes, or raw text.
fn read_unit(attrs: &HashMap<String, String>, inner: &str) -> Piece {
    let id = attrs.get("data-unit-id").and_then(|raw| raw.parse().ok());

    if let Some(stored) = attrs.get(VALUE_ATTR) {
        return Piece::Unit {
            id,
            value: deserialize(stored),
        };
    }

    if let Some(latex) = attrs.get("data-latex") {
        let direction = match attrs.get("data-rtl") {
            Some(flag) => Direction::from_rtl_flag(flag.trim() != "false"),
            None => Direction::Rtl,
        };
        return Piece::Unit {
            id,
            value: UnitValue::new(latex.as_str(), direction),
        };
    }

    let raw = strip_tags(inner);
    let raw = unescape(raw.trim()).into_owned();
    tracing::warn!(source = %raw, "Unit element has no stored value, using its text");
    Piece::Unit {
        id,
        value: deserialize(&raw),
    }
}

fn strip_tags(markup: &str) -> String {
    let mut text = String::with_capacity(markup.len());
    let mut last = 0;
    for tag in tags(markup) {
        text.push_str(&markup[last..tag.start]);
        last = tag.end;
    }
    text.push_str(&markup[last..]);
    text
}

fn has_unit_class(attrs: &HashMap<String, String>) -> bool {
    attrs
        .get("class")
        .is_some_and(|class| class.split_whitespace().any(|c| c == UNIT_CLASS))
}

/// Decode attributes of a single opening tag.
fn decode_attrs(tag: &str) -> Result<HashMap<String, String>, DocumentError> {
    let mut reader = Reader::from_str(tag);
    reader.config_mut().trim_text(false);

    let e = match reader.read_event()? {
        Event::Start(e) | Event::Empty(e) => e,
        other => {
            return Err(DocumentError::MalformedElement(format!(
                "expected an opening tag, found {other:?}"
            )));
        }
    };

    let mut attrs = HashMap::new();
    for attr in e.html_attributes().flatten() {
        let key = reader.decoder().decode(attr.key.as_ref()).map_or_else(
            |_| String::from_utf8_lossy(attr.key.as_ref()).into_owned(),
            Cow::into_owned,
        );
        let value = attr.unescape_value().map_or_else(
            |_| String::from_utf8_lossy(&attr.value).into_owned(),
            Cow::into_owned,
        );
        attrs.insert(key.to_ascii_lowercase(), value);
    }
    Ok(attrs)
}

fn unescape(text: &str) -> Cow<'_, str> {
    quick_xml::escape::unescape(text).unwrap_or(Cow::Borrowed(text))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn unit(source: &str, direction: Direction) -> Piece {
        Piece::Unit {
            id: None,
            value: UnitValue::new(source, direction),
        }
    }

    #[test]
    fn test_plain_markup() {
        assert_eq!(
            scan("<p>Hello <span>world</span></p>"),
            vec![Piece::Markup("<p>Hello <span>world</span></p>".to_owned())]
        );
    }

    #[test]
    fn test_stored_value() {
        let html = r#"<p>A <span class="math-equation" data-equation="x^2"><span class="mord">x</span></span> B</p>"#;
        assert_eq!(
            scan(html),
            vec![
                Piece::Markup("<p>A ".to_owned()),
                unit("x^2", Direction::Rtl),
                Piece::Markup(" B</p>".to_owned()),
            ]
        );
    }

    #[test]
    fn test_tagged_stored_value_with_entities() {
        let html = r#"<span class="math-equation math-ltr" data-equation="{&quot;latex&quot;:&quot;a&lt;b&quot;,&quot;rtl&quot;:false}"></span>"#;
        assert_eq!(scan(html), vec![unit("a<b", Direction::Ltr)]);
    }

    #[test]
    fn test_legacy_attributes() {
        let html = r#"<span class="math-equation" data-latex="\sqrt{x}" data-rtl="false" contenteditable="false">√x</span>"#;
        assert_eq!(scan(html), vec![unit(r"\sqrt{x}", Direction::Ltr)]);

        let html = r#"<span class="math-equation" data-latex="y_1">y</span>"#;
        assert_eq!(scan(html), vec![unit("y_1", Direction::Rtl)]);
    }

    #[test]
    fn test_nested_spans_balanced() {
        let html = r#"<span class="math-equation" data-equation="a"><span><span>a</span></span><span/></span><span>tail</span>"#;
        assert_eq!(
            scan(html),
            vec![unit("a", Direction::Rtl), Piece::Markup("<span>tail</span>".to_owned())]
        );
    }

    #[test]
    fn test_missing_value_uses_text() {
        let html = r#"<span class="math-equation"><b>x</b> + 1</span>"#;
        assert_eq!(scan(html), vec![unit("x + 1", Direction::Rtl)]);
    }

    #[test]
    fn test_unclosed_unit() {
        let html = r#"before <span class="math-equation" data-equation="z"> after"#;
        assert_eq!(
            scan(html),
            vec![
                Piece::Markup("before ".to_owned()),
                unit("z", Direction::Rtl),
                Piece::Markup(" after".to_owned()),
            ]
        );
    }

    #[test]
    fn test_inline_delimiters() {
        assert_eq!(
            scan("<p>Solve $$x^2 = 4$$ now</p>"),
            vec![
                Piece::Markup("<p>Solve ".to_owned()),
                Piece::Inline("x^2 = 4".to_owned()),
                Piece::Markup(" now</p>".to_owned()),
            ]
        );
    }

    #[test]
    fn test_inline_delimiters_do_not_cross_tags() {
        let html = "<p>$$a</p><p>b$$</p>";
        assert_eq!(scan(html), vec![Piece::Markup(html.to_owned())]);
    }

    #[test]
    fn test_inline_delimiters_in_attributes_ignored() {
        let html = r#"<p><a title="cost $$5$$ each" href="x">link</a></p>"#;
        assert_eq!(scan(html), vec![Piece::Markup(html.to_owned())]);

        let html = "<!-- $$draft$$ --><p>$$y$$</p>";
        assert_eq!(
            scan(html),
            vec![
                Piece::Markup("<!-- $$draft$$ --><p>".to_owned()),
                Piece::Inline("y".to_owned()),
                Piece::Markup("</p>".to_owned()),
            ]
        );
    }

    #[test]
    fn test_raw_angle_bracket_in_attribute() {
        let html = r#"<p><span class="math-equation" data-latex="x>2" data-rtl="false">x>2</span> and <span title='a>b'>t</span></p>"#;
        assert_eq!(
            scan(html),
            vec![
                Piece::Markup("<p>".to_owned()),
                unit("x>2", Direction::Ltr),
                Piece::Markup(" and <span title='a>b'>t</span></p>".to_owned()),
            ]
        );
    }

    #[test]
    fn test_tags() {
        let html = r#"a < b <span title="1>0"><br/></SPAN><!-- <span> -->"#;
        let found: Vec<(&str, bool, bool, bool)> = tags(html)
            .iter()
            .map(|t| (&html[t.start..t.end], t.span, t.closing, t.self_closing))
            .collect();
        assert_eq!(
            found,
            vec![
                (r#"<span title="1>0">"#, true, false, false),
                ("<br/>", false, false, true),
                ("</SPAN>", true, true, false),
                ("<!-- <span> -->", false, false, false),
            ]
        );
    }

    #[test]
    fn test_unit_id_restored() {
        let id = UnitId::new();
        let html = format!(r#"<span class="math-equation" data-unit-id="{id}" data-equation="q"></span>"#);
        assert_eq!(
            scan(&html),
            vec![Piece::Unit {
                id: Some(id),
                value: UnitValue::new("q", Direction::Rtl),
            }]
        );
    }

    #[test]
    fn test_valueless_attribute_tolerated() {
        let html = r#"<span class="math-equation" hidden data-equation="k"></span>"#;
        assert_eq!(scan(html), vec![unit("k", Direction::Rtl)]);
    }
}
