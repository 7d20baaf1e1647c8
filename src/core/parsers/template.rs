//! Component template parser.
//!
//! A component file mixes up to two `<script>` elements with markup containing
//! `{...}` expression tags. This parser splits the file into its sections and
//! hands every JavaScript/TypeScript fragment to swc:
//!
//! - the instance `<script>` and the module `<script context="module">` are
//!   parsed as modules,
//! - every markup expression (text tags, attribute values, block openers,
//!   `@html`/`@render`/`@const` tags) is parsed as a standalone expression.
//!
//! All fragments are parsed against one `SourceFile` covering the whole file,
//! so spans map back to real line/column positions of the component.

use std::{ops::Range, sync::Arc};

use anyhow::{Result, anyhow, bail};
use swc_common::{BytePos, FileName, Globals, SourceFile, SourceMap};
use swc_ecma_ast::{Expr, Module};
use swc_ecma_parser::{Parser, StringInput, Syntax, TsSyntax};

/// Parsed component: two optional script modules plus markup expressions.
pub struct ParsedTemplate {
    /// Path used for diagnostics.
    pub file_path: String,
    /// Instance-level `<script>`.
    pub instance: Option<Module>,
    /// `<script context="module">` (or `<script module>`).
    pub module: Option<Module>,
    /// Markup expressions in document order.
    pub markup: Vec<Box<Expr>>,
    pub source_map: Arc<SourceMap>,
}

impl ParsedTemplate {
    /// Both script sections, instance first.
    pub fn scripts(&self) -> impl Iterator<Item = &Module> {
        self.instance.iter().chain(self.module.iter())
    }
}

/// Byte ranges of every section of a component file.
#[derive(Debug, Default, PartialEq, Eq)]
struct Sections {
    instance: Option<Range<usize>>,
    module: Option<Range<usize>>,
    markup: Vec<Range<usize>>,
}

/// Parse a component file into its script modules and markup expressions.
///
/// Accepts a shared SourceMap so files can be parsed on separate threads.
pub fn parse_template(
    code: String,
    file_path: &str,
    source_map: Arc<SourceMap>,
) -> Result<ParsedTemplate> {
    use swc_common::GLOBALS;

    GLOBALS.set(&Globals::new(), || {
        let source_file = source_map.new_source_file(FileName::Real(file_path.into()).into(), code);
        let sections = split_sections(&source_file.src)?;

        let instance = sections
            .instance
            .map(|range| parse_module_range(&source_file, range))
            .transpose()?;
        let module = sections
            .module
            .map(|range| parse_module_range(&source_file, range))
            .transpose()?;
        let markup = sections
            .markup
            .into_iter()
            .map(|range| parse_expr_range(&source_file, range))
            .collect::<Result<Vec<_>>>()?;

        Ok(ParsedTemplate {
            file_path: file_path.to_string(),
            instance,
            module,
            markup,
            source_map: source_map.clone(),
        })
    })
}

fn syntax() -> Syntax {
    Syntax::Typescript(TsSyntax::default())
}

fn string_input<'a>(source_file: &'a SourceFile, range: &Range<usize>) -> StringInput<'a> {
    let src: &str = &source_file.src;
    StringInput::new(
        &src[range.clone()],
        source_file.start_pos + BytePos(range.start as u32),
        source_file.start_pos + BytePos(range.end as u32),
    )
}

fn parse_module_range(source_file: &SourceFile, range: Range<usize>) -> Result<Module> {
    let mut parser = Parser::new(syntax(), string_input(source_file, &range), None);
    parser.parse_module().map_err(|e| {
        let (line, col) = line_col(&source_file.src, range.start);
        anyhow!("Failed to parse <script> starting at L{}:{}: {:?}", line, col, e)
    })
}

fn parse_expr_range(source_file: &SourceFile, range: Range<usize>) -> Result<Box<Expr>> {
    let mut parser = Parser::new(syntax(), string_input(source_file, &range), None);
    parser.parse_expr().map_err(|e| {
        let (line, col) = line_col(&source_file.src, range.start);
        anyhow!("Failed to parse expression at L{}:{}: {:?}", line, col, e)
    })
}

/// 1-based line and 0-based column of a byte offset.
pub fn line_col(src: &str, offset: usize) -> (usize, usize) {
    let before = &src.as_bytes()[..offset.min(src.len())];
    let line = before.iter().filter(|&&b| b == b'\n').count() + 1;
    let line_start = before
        .iter()
        .rposition(|&b| b == b'\n')
        .map_or(0, |i| i + 1);
    let col = String::from_utf8_lossy(&before[line_start..]).chars().count();
    (line, col)
}

fn split_sections(src: &str) -> Result<Sections> {
    let bytes = src.as_bytes();
    let mut sections = Sections::default();
    let mut pos = 0;

    while pos < bytes.len() {
        pos = match bytes[pos] {
            b'<' if src[pos..].starts_with("<!--") => src[pos..]
                .find("-->")
                .map_or(bytes.len(), |end| pos + end + 3),
            b'<' if is_tag_named(src, pos + 1, "script") => sections.read_script(src, pos)?,
            b'<' if is_tag_named(src, pos + 1, "style") => skip_raw_element(src, pos, "style")?,
            b'<' if bytes.get(pos + 1) == Some(&b'/') => src[pos..]
                .find('>')
                .map_or(bytes.len(), |end| pos + end + 1),
            b'<' if bytes.get(pos + 1).is_some_and(u8::is_ascii_alphabetic) => {
                sections.read_tag(src, pos)?
            }
            b'{' => sections.read_tag_expression(src, pos)?,
            _ => pos + 1,
        };
    }

    Ok(sections)
}

impl Sections {
    fn read_script(&mut self, src: &str, start: usize) -> Result<usize> {
        let tag_end = find_tag_end(src, start)
            .ok_or_else(|| unclosed(src, start, "<script> tag"))?;
        let attrs = &src[start + "<script".len()..tag_end];
        let is_module = is_module_script(attrs);

        let (content, next) = if attrs.trim_end().ends_with('/') {
            (tag_end + 1..tag_end + 1, tag_end + 1)
        } else {
            let content_start = tag_end + 1;
            let close = find_ignore_case(src, content_start, "</script")
                .ok_or_else(|| unclosed(src, start, "<script> element"))?;
            let close_end = src[close..]
                .find('>')
                .map(|i| close + i + 1)
                .ok_or_else(|| unclosed(src, close, "</script> tag"))?;
            (content_start..close, close_end)
        };

        let slot = if is_module {
            &mut self.module
        } else {
            &mut self.instance
        };
        if slot.is_some() {
            let (line, col) = line_col(src, start);
            bail!(
                "A component can only have one {} <script> element (second one at L{}:{})",
                if is_module { "module-level" } else { "instance-level" },
                line,
                col
            );
        }
        *slot = Some(content);

        Ok(next)
    }

    /// Scan an opening tag's attributes for expression values.
    fn read_tag(&mut self, src: &str, start: usize) -> Result<usize> {
        let bytes = src.as_bytes();
        let mut pos = start + 1;

        while pos < bytes.len() && !is_tag_delimiter(bytes[pos]) {
            pos += 1;
        }

        loop {
            while pos < bytes.len() && bytes[pos].is_ascii_whitespace() {
                pos += 1;
            }
            let Some(&byte) = bytes.get(pos) else {
                return Err(unclosed(src, start, "tag"));
            };

            match byte {
                b'>' => return Ok(pos + 1),
                b'/' => pos += 1,
                b'{' => {
                    // `{name}` shorthand or `{...spread}`
                    let end = find_closing_brace(bytes, pos)
                        .ok_or_else(|| unclosed(src, pos, "expression tag"))?;
                    let inner = trim_range(src, pos + 1..end);
                    let inner = if src[inner.clone()].starts_with("...") {
                        inner.start + 3..inner.end
                    } else {
                        inner
                    };
                    self.push_markup(inner);
                    pos = end + 1;
                }
                _ => {
                    while pos < bytes.len() && !is_tag_delimiter(bytes[pos]) && bytes[pos] != b'='
                    {
                        pos += 1;
                    }
                    while pos < bytes.len() && bytes[pos].is_ascii_whitespace() {
                        pos += 1;
                    }
                    if bytes.get(pos) == Some(&b'=') {
                        pos = self.read_attribute_value(src, pos + 1)?;
                    }
                }
            }
        }
    }

    fn read_attribute_value(&mut self, src: &str, mut pos: usize) -> Result<usize> {
        let bytes = src.as_bytes();
        while pos < bytes.len() && bytes[pos].is_ascii_whitespace() {
            pos += 1;
        }

        match bytes.get(pos) {
            Some(&quote @ (b'"' | b'\'')) => {
                let start = pos;
                pos += 1;
                while pos < bytes.len() {
                    match bytes[pos] {
                        b if b == quote => return Ok(pos + 1),
                        b'{' => {
                            let end = find_closing_brace(bytes, pos)
                                .ok_or_else(|| unclosed(src, pos, "expression tag"))?;
                            self.push_markup(trim_range(src, pos + 1..end));
                            pos = end + 1;
                        }
                        _ => pos += 1,
                    }
                }
                Err(unclosed(src, start, "attribute value"))
            }
            Some(b'{') => {
                let end = find_closing_brace(bytes, pos)
                    .ok_or_else(|| unclosed(src, pos, "expression tag"))?;
                self.push_markup(trim_range(src, pos + 1..end));
                Ok(end + 1)
            }
            _ => {
                while pos < bytes.len() && !bytes[pos].is_ascii_whitespace() && bytes[pos] != b'>'
                {
                    pos += 1;
                }
                Ok(pos)
            }
        }
    }

    /// Handle a `{...}` tag in text content.
    fn read_tag_expression(&mut self, src: &str, open: usize) -> Result<usize> {
        let end = find_closing_brace(src.as_bytes(), open)
            .ok_or_else(|| unclosed(src, open, "expression tag"))?;
        if let Some(range) = tag_expression(src, trim_range(src, open + 1..end)) {
            self.push_markup(range);
        }
        Ok(end + 1)
    }

    fn push_markup(&mut self, range: Range<usize>) {
        if !range.is_empty() {
            self.markup.push(range);
        }
    }
}

/// The expression carried by a text-position tag, if any.
///
/// `{expr}`, `{#if expr}`, `{:else if expr}`, `{#each expr as item}`,
/// `{#await expr then v}`, `{#key expr}`, `{@html expr}`, `{@render expr}`
/// and `{@const name = expr}` carry one. Closers, `{:else}`, `{:then v}`,
/// `{:catch e}`, `{#snippet ...}` and `{@debug ...}` carry none.
fn tag_expression(src: &str, inner: Range<usize>) -> Option<Range<usize>> {
    let bytes = src.as_bytes();
    let sigil = *bytes.get(inner.start)?;
    let inner_end = inner.end;

    let keyword_range = |from: usize| {
        let mut end = from;
        while end < inner_end && bytes[end].is_ascii_alphabetic() {
            end += 1;
        }
        (&src[from..end], end..inner_end)
    };

    let range = match sigil {
        b'#' => match keyword_range(inner.start + 1) {
            ("if" | "key", rest) => rest,
            ("each", rest) => until_word(src, rest, &["as"]),
            ("await", rest) => until_word(src, rest, &["then", "catch"]),
            _ => return None,
        },
        b':' => match keyword_range(inner.start + 1) {
            ("else", rest) => {
                let rest = trim_range(src, rest);
                match keyword_range(rest.start) {
                    ("if", rest) => rest,
                    _ => return None,
                }
            }
            _ => return None,
        },
        b'/' if bytes.get(inner.start + 1).is_some_and(u8::is_ascii_alphabetic) => return None,
        b'@' => match keyword_range(inner.start + 1) {
            ("html" | "render", rest) => rest,
            ("const", rest) => find_top_level_assign(bytes, rest.clone())
                .map_or(rest.clone(), |eq| eq + 1..rest.end),
            _ => return None,
        },
        _ => inner,
    };

    let range = trim_range(src, range);
    (!range.is_empty()).then_some(range)
}

/// Cut `range` at the first top-level occurrence of any of `words`.
fn until_word(src: &str, range: Range<usize>, words: &[&str]) -> Range<usize> {
    let bytes = src.as_bytes();
    let mut depth = 0usize;
    let mut pos = range.start;

    while pos < range.end {
        match bytes[pos] {
            b'(' | b'[' | b'{' => depth += 1,
            b')' | b']' | b'}' => depth = depth.saturating_sub(1),
            quote @ (b'"' | b'\'') => match skip_string(bytes, pos, quote) {
                Some(end) => pos = end,
                None => break,
            },
            b'`' => match skip_template(bytes, pos) {
                Some(end) => pos = end,
                None => break,
            },
            b if depth == 0 && b.is_ascii_whitespace() => {
                let after = pos + 1;
                for word in words {
                    let word_end = after + word.len();
                    if src.get(after..word_end) == Some(*word)
                        && (word_end >= range.end || bytes[word_end].is_ascii_whitespace())
                    {
                        return range.start..pos;
                    }
                }
            }
            _ => {}
        }
        pos += 1;
    }

    range
}

/// Offset of the first top-level `=` that is an assignment.
fn find_top_level_assign(bytes: &[u8], range: Range<usize>) -> Option<usize> {
    let mut depth = 0usize;
    let mut pos = range.start;

    while pos < range.end {
        match bytes[pos] {
            b'(' | b'[' | b'{' => depth += 1,
            b')' | b']' | b'}' => depth = depth.saturating_sub(1),
            quote @ (b'"' | b'\'') => pos = skip_string(bytes, pos, quote)?,
            b'`' => pos = skip_template(bytes, pos)?,
            b'=' if depth == 0 => {
                let prev = pos.checked_sub(1).map(|i| bytes[i]);
                let next = bytes.get(pos + 1).copied();
                if !matches!(prev, Some(b'=' | b'!' | b'<' | b'>'))
                    && !matches!(next, Some(b'=' | b'>'))
                {
                    return Some(pos);
                }
            }
            _ => {}
        }
        pos += 1;
    }

    None
}

/// Index of the `}` matching the `{` at `open`.
fn find_closing_brace(bytes: &[u8], open: usize) -> Option<usize> {
    let mut depth = 0usize;
    let mut pos = open;

    while pos < bytes.len() {
        match bytes[pos] {
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(pos);
                }
            }
            quote @ (b'"' | b'\'') => pos = skip_string(bytes, pos, quote)?,
            b'`' => pos = skip_template(bytes, pos)?,
            b'/' if bytes.get(pos + 1) == Some(&b'*') => {
                pos = find_bytes(bytes, pos + 2, b"*/")? + 1;
            }
            _ => {}
        }
        pos += 1;
    }

    None
}

/// Index of the closing quote of a string literal starting at `start`.
fn skip_string(bytes: &[u8], start: usize, quote: u8) -> Option<usize> {
    let mut pos = start + 1;
    while pos < bytes.len() {
        match bytes[pos] {
            b'\\' => pos += 1,
            b if b == quote => return Some(pos),
            _ => {}
        }
        pos += 1;
    }
    None
}

/// Index of the closing backtick of a template literal starting at `start`.
fn skip_template(bytes: &[u8], start: usize) -> Option<usize> {
    let mut pos = start + 1;
    while pos < bytes.len() {
        match bytes[pos] {
            b'\\' => pos += 1,
            b'`' => return Some(pos),
            b'$' if bytes.get(pos + 1) == Some(&b'{') => pos = find_closing_brace(bytes, pos + 1)?,
            _ => {}
        }
        pos += 1;
    }
    None
}

fn find_bytes(bytes: &[u8], from: usize, needle: &[u8]) -> Option<usize> {
    bytes
        .get(from..)?
        .windows(needle.len())
        .position(|window| window == needle)
        .map(|i| from + i)
}

fn find_ignore_case(src: &str, from: usize, needle: &str) -> Option<usize> {
    src[from..]
        .to_ascii_lowercase()
        .find(needle)
        .map(|i| from + i)
}

/// End (`>`) of an opening tag, skipping quoted attribute values.
fn find_tag_end(src: &str, start: usize) -> Option<usize> {
    let bytes = src.as_bytes();
    let mut pos = start + 1;
    while pos < bytes.len() {
        match bytes[pos] {
            b'>' => return Some(pos),
            quote @ (b'"' | b'\'') => pos = skip_string(bytes, pos, quote)?,
            _ => {}
        }
        pos += 1;
    }
    None
}

fn skip_raw_element(src: &str, start: usize, name: &str) -> Result<usize> {
    let closing = format!("</{}", name);
    let close = find_ignore_case(src, start, &closing)
        .ok_or_else(|| unclosed(src, start, &format!("<{}> element", name)))?;
    Ok(src[close..].find('>').map_or(src.len(), |i| close + i + 1))
}

fn is_tag_named(src: &str, at: usize, name: &str) -> bool {
    let end = at + name.len();
    src.get(at..end)
        .is_some_and(|candidate| candidate.eq_ignore_ascii_case(name))
        && src
            .as_bytes()
            .get(end)
            .is_some_and(|&b| b.is_ascii_whitespace() || b == b'>' || b == b'/')
}

fn is_tag_delimiter(byte: u8) -> bool {
    byte.is_ascii_whitespace() || matches!(byte, b'>' | b'/' | b'{')
}

/// `context="module"` in any quoting, or a bare `module` attribute.
fn is_module_script(attrs: &str) -> bool {
    attrs.split_ascii_whitespace().any(|attr| {
        let attr = attr.trim_end_matches('/');
        attr == "module"
            || attr
                .strip_prefix("context=")
                .is_some_and(|value| value.trim_matches(|c| c == '"' || c == '\'') == "module")
    })
}

fn trim_range(src: &str, range: Range<usize>) -> Range<usize> {
    let text = &src[range.clone()];
    let start = range.start + (text.len() - text.trim_start().len());
    let end = range.end - (text.len() - text.trim_end().len());
    start..end.max(start)
}

fn unclosed(src: &str, offset: usize, what: &str) -> anyhow::Error {
    let (line, col) = line_col(src, offset);
    anyhow!("Unclosed {} at L{}:{}", what, line, col)
}

/// Parse a single expression outside of any template; used by unit tests.
#[cfg(test)]
pub(crate) fn parse_expression_for_test(code: &str) -> Box<Expr> {
    let source_map = SourceMap::default();
    let source_file =
        source_map.new_source_file(FileName::Real("test.ts".into()).into(), code.to_string());
    parse_expr_range(&source_file, 0..code.len()).unwrap()
}
