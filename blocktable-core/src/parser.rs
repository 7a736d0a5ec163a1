use tracing::warn;

use crate::entry::{BlockEntry, Category};
use crate::{BlockTableError, Result};

/// A record inside a category array that is not a `{ text, value }` pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MalformedEntry {
    pub category: Category,
    /// Byte offset of the record in the source document.
    pub offset: usize,
    pub raw: String,
    pub reason: String,
}

/// One `const NAME = [ ... ];` declaration located in a document.
#[derive(Debug, Clone)]
pub struct CategorySpan {
    pub category: Category,
    /// Byte range of the whole declaration, `const` through `;`.
    pub start: usize,
    pub end: usize,
    pub entries: Vec<BlockEntry>,
    pub malformed: Vec<MalformedEntry>,
}

/// A source document split into category spans and the opaque text
/// around them.
#[derive(Debug, Clone)]
pub struct BlockDocument {
    pub(crate) source: String,
    pub(crate) spans: Vec<CategorySpan>,
}

impl BlockDocument {
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Located spans in document order.
    pub fn spans(&self) -> &[CategorySpan] {
        &self.spans
    }

    pub fn span(&self, category: Category) -> Option<&CategorySpan> {
        self.spans.iter().find(|s| s.category == category)
    }

    pub fn contains(&self, category: Category) -> bool {
        self.span(category).is_some()
    }

    pub fn entries(&self, category: Category) -> Option<&[BlockEntry]> {
        self.span(category).map(|s| s.entries.as_slice())
    }

    /// Fails on the first required category that has no declaration.
    pub fn require(&self, categories: &[Category], origin: &str) -> Result<()> {
        for category in categories {
            if !self.contains(*category) {
                return Err(BlockTableError::CategoryNotFound {
                    category: *category,
                    origin: origin.to_string(),
                });
            }
        }
        Ok(())
    }

    pub fn malformed(&self) -> impl Iterator<Item = &MalformedEntry> {
        self.spans.iter().flat_map(|s| s.malformed.iter())
    }

    pub fn total_entries(&self) -> usize {
        self.spans.iter().map(|s| s.entries.len()).sum()
    }
}

/// Locate and parse every category declaration in `source`.
///
/// Missing categories are not an error here; callers decide which ones
/// they need through [`BlockDocument::require`]. A declaration whose
/// array never closes is fatal.
pub fn parse_document(source: &str) -> Result<BlockDocument> {
    let mut spans: Vec<CategorySpan> = Vec::new();
    let mut search_from = 0usize;

    while let Some(anchor) = find_anchor(source, search_from) {
        search_from = anchor.body_start;

        if spans.iter().any(|s| s.category == anchor.category) {
            warn!(
                category = %anchor.category,
                offset = anchor.start,
                "ignoring repeated category declaration"
            );
            let mut skip = Cursor::new(source, anchor.body_start);
            if parse_array_body(&mut skip, anchor.category).is_ok() {
                search_from = skip.pos;
            }
            continue;
        }

        let mut cursor = Cursor::new(source, anchor.body_start);
        let (entries, malformed) = parse_array_body(&mut cursor, anchor.category)?;
        let end = cursor.pos;
        search_from = end;

        for issue in &malformed {
            warn!(
                category = %issue.category,
                offset = issue.offset,
                raw = %issue.raw,
                "malformed entry: {}",
                issue.reason
            );
        }

        spans.push(CategorySpan {
            category: anchor.category,
            start: anchor.start,
            end,
            entries,
            malformed,
        });
    }

    Ok(BlockDocument {
        source: source.to_string(),
        spans,
    })
}

/// Parse a bare list of records, e.g. the inside of one array literal.
pub fn parse_entries(
    category: Category,
    body: &str,
) -> Result<(Vec<BlockEntry>, Vec<MalformedEntry>)> {
    let wrapped = format!("{body}]");
    let mut cursor = Cursor::new(&wrapped, 0);
    parse_array_body(&mut cursor, category)
}

struct Anchor {
    category: Category,
    start: usize,
    body_start: usize,
}

fn is_ident_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b == b'$'
}

/// Next category declaration at or after `from`. Only `const` keywords in
/// code position count: comments and string or template literals are
/// skipped whole.
fn find_anchor(source: &str, from: usize) -> Option<Anchor> {
    let mut cursor = Cursor::new(source, from);

    loop {
        cursor.skip_trivia();
        let b = cursor.peek()?;
        match b {
            b'\'' | b'"' | b'`' => {
                let open = cursor.pos;
                if cursor.skip_string(b).is_none() {
                    // Stray quote: resume on the next line.
                    cursor.pos = open + 1;
                    cursor.skip_line();
                }
            }
            _ if is_ident_byte(b) => {
                let start = cursor.pos;
                if cursor.read_identifier() != "const" {
                    continue;
                }
                if let Some(anchor) = declaration_at(source, start, cursor.pos) {
                    return Some(anchor);
                }
            }
            _ => cursor.pos += 1,
        }
    }
}

/// `const` at `start` followed by `NAME = [` for a known category.
fn declaration_at(source: &str, start: usize, after_keyword: usize) -> Option<Anchor> {
    let mut cursor = Cursor::new(source, after_keyword);
    if !cursor.skip_whitespace() {
        return None;
    }
    let category = Category::from_constant_name(cursor.read_identifier())?;
    cursor.skip_whitespace();
    if !cursor.eat(b'=') {
        return None;
    }
    cursor.skip_whitespace();
    if !cursor.eat(b'[') {
        return None;
    }
    Some(Anchor {
        category,
        start,
        body_start: cursor.pos,
    })
}

fn parse_array_body(
    cursor: &mut Cursor<'_>,
    category: Category,
) -> Result<(Vec<BlockEntry>, Vec<MalformedEntry>)> {
    let mut entries = Vec::new();
    let mut malformed = Vec::new();
    let unterminated = || BlockTableError::UnterminatedArray { category };

    loop {
        cursor.skip_trivia();
        let Some(b) = cursor.peek() else {
            return Err(unterminated());
        };

        match b {
            b',' => cursor.pos += 1,
            b']' => {
                cursor.pos += 1;
                let after_bracket = cursor.pos;
                cursor.skip_whitespace();
                if !cursor.eat(b';') {
                    cursor.pos = after_bracket;
                }
                return Ok((entries, malformed));
            }
            b'{' => {
                let offset = cursor.pos;
                let raw = cursor.read_balanced().ok_or_else(unterminated)?;
                match parse_record(raw) {
                    Ok(entry) => entries.push(entry),
                    Err(reason) => malformed.push(MalformedEntry {
                        category,
                        offset,
                        raw: raw.to_string(),
                        reason,
                    }),
                }
            }
            _ => {
                let offset = cursor.pos;
                let raw = cursor.read_stray().ok_or_else(unterminated)?;
                malformed.push(MalformedEntry {
                    category,
                    offset,
                    raw: raw.to_string(),
                    reason: "expected an object record".to_string(),
                });
            }
        }
    }
}

/// Parse the text of a single `{ ... }` record.
fn parse_record(raw: &str) -> std::result::Result<BlockEntry, String> {
    let inner = &raw[1..raw.len() - 1];
    let mut cursor = Cursor::new(inner, 0);
    let mut text: Option<String> = None;
    let mut value: Option<String> = None;

    loop {
        cursor.skip_trivia();
        if cursor.at_end() {
            break;
        }

        let key = match cursor.peek() {
            Some(q @ (b'\'' | b'"')) => cursor
                .read_string(q)
                .map_err(|reason| format!("key: {reason}"))?,
            _ => {
                let ident = cursor.read_identifier();
                if ident.is_empty() {
                    return Err(format!("unexpected character at offset {}", cursor.pos));
                }
                ident.to_string()
            }
        };

        cursor.skip_trivia();
        if !cursor.eat(b':') {
            return Err(format!("missing ':' after '{key}'"));
        }
        cursor.skip_trivia();

        let field = match cursor.peek() {
            Some(q @ (b'\'' | b'"')) => cursor
                .read_string(q)
                .map_err(|reason| format!("'{key}': {reason}"))?,
            _ => return Err(format!("'{key}' is not a string literal")),
        };

        let slot = match key.as_str() {
            "text" => &mut text,
            "value" => &mut value,
            other => return Err(format!("unexpected field '{other}'")),
        };
        if slot.is_some() {
            return Err(format!("repeated field '{key}'"));
        }
        *slot = Some(field);

        cursor.skip_trivia();
        if !cursor.at_end() && !cursor.eat(b',') {
            return Err("expected ',' between fields".to_string());
        }
    }

    match (text, value) {
        (Some(text), Some(value)) if !value.is_empty() => Ok(BlockEntry { text, value }),
        (Some(_), Some(_)) => Err("empty identifier".to_string()),
        (None, _) => Err("missing 'text' field".to_string()),
        (_, None) => Err("missing 'value' field".to_string()),
    }
}

fn hex_value(digits: &str) -> Option<u32> {
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    u32::from_str_radix(digits, 16).ok()
}

/// Decode the body of a JavaScript string literal. Escapes that would
/// need guessing (legacy octal, bad hex, lone surrogates) are errors.
fn unescape(raw: &str) -> std::result::Result<String, String> {
    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;

    while let Some(i) = rest.find('\\') {
        out.push_str(&rest[..i]);
        rest = &rest[i + 1..];
        let Some(c) = rest.chars().next() else {
            return Err("dangling backslash".to_string());
        };
        rest = &rest[c.len_utf8()..];

        match c {
            'n' => out.push('\n'),
            't' => out.push('\t'),
            'r' => out.push('\r'),
            'b' => out.push('\u{8}'),
            'f' => out.push('\u{c}'),
            'v' => out.push('\u{b}'),
            '0' if !rest.starts_with(|d: char| d.is_ascii_digit()) => out.push('\0'),
            '0'..='9' => return Err(format!("octal escape '\\{c}'")),
            'x' => {
                let code = rest.get(..2).and_then(hex_value).ok_or("bad '\\x' escape")?;
                rest = &rest[2..];
                out.push(char::from_u32(code).ok_or("bad '\\x' escape")?);
            }
            'u' => {
                let code = read_unicode_escape(&mut rest)?;
                let ch = if (0xD800..0xDC00).contains(&code) {
                    // High surrogate: a low one must follow.
                    let mut tail = rest.strip_prefix("\\u").ok_or("lone surrogate")?;
                    let low = read_unicode_escape(&mut tail)?;
                    if !(0xDC00..0xE000).contains(&low) {
                        return Err("lone surrogate".to_string());
                    }
                    rest = tail;
                    char::from_u32(0x10000 + ((code - 0xD800) << 10) + (low - 0xDC00))
                } else {
                    char::from_u32(code)
                };
                out.push(ch.ok_or("lone surrogate")?);
            }
            // Line continuation.
            '\n' | '\u{2028}' | '\u{2029}' => {}
            '\r' => rest = rest.strip_prefix('\n').unwrap_or(rest),
            other => out.push(other),
        }
    }
    out.push_str(rest);
    Ok(out)
}

/// Code point of `XXXX` or `{X...}` at the front of `rest`, consumed.
fn read_unicode_escape(rest: &mut &str) -> std::result::Result<u32, String> {
    let bad = || "bad '\\u' escape".to_string();
    if let Some(braced) = rest.strip_prefix('{') {
        let close = braced.find('}').ok_or_else(bad)?;
        let code = hex_value(&braced[..close]).filter(|c| *c <= 0x10FFFF).ok_or_else(bad)?;
        *rest = &braced[close + 1..];
        Ok(code)
    } else {
        let code = rest.get(..4).and_then(hex_value).ok_or_else(bad)?;
        *rest = &rest[4..];
        Ok(code)
    }
}

/// Byte cursor over UTF-8 text. Only ASCII delimiters are inspected, so
/// every position it stops at is a char boundary.
struct Cursor<'a> {
    src: &'a str,
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(src: &'a str, pos: usize) -> Self {
        Self {
            src,
            bytes: src.as_bytes(),
            pos,
        }
    }

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn at_end(&self) -> bool {
        self.pos >= self.bytes.len()
    }

    fn eat(&mut self, b: u8) -> bool {
        if self.peek() == Some(b) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    /// Returns true if at least one whitespace byte was skipped.
    fn skip_whitespace(&mut self) -> bool {
        let start = self.pos;
        while matches!(self.peek(), Some(b) if b.is_ascii_whitespace()) {
            self.pos += 1;
        }
        self.pos > start
    }

    /// Whitespace and comments.
    fn skip_trivia(&mut self) {
        loop {
            self.skip_whitespace();
            let rest = &self.bytes[self.pos.min(self.bytes.len())..];
            if rest.starts_with(b"//") {
                while let Some(b) = self.peek() {
                    if b == b'\n' {
                        break;
                    }
                    self.pos += 1;
                }
            } else if rest.starts_with(b"/*") {
                match self.src[self.pos + 2..].find("*/") {
                    Some(rel) => self.pos += 2 + rel + 2,
                    None => self.pos = self.bytes.len(),
                }
            } else {
                return;
            }
        }
    }

    /// Move past the next newline, or to the end.
    fn skip_line(&mut self) {
        match self.src.get(self.pos..).and_then(|rest| rest.find('\n')) {
            Some(rel) => self.pos += rel + 1,
            None => self.pos = self.bytes.len(),
        }
    }

    fn read_identifier(&mut self) -> &'a str {
        let start = self.pos;
        while matches!(self.peek(), Some(b) if is_ident_byte(b)) {
            self.pos += 1;
        }
        &self.src[start..self.pos]
    }

    /// Read a quoted literal starting at the opening quote and return its
    /// decoded contents.
    fn read_string(&mut self, quote: u8) -> std::result::Result<String, String> {
        let (start, end) = self.skip_string(quote).ok_or("unterminated string")?;
        unescape(&self.src[start..end])
    }

    /// Advance past a quoted literal; returns the raw content range.
    /// Template literals may span lines, other strings may not.
    fn skip_string(&mut self, quote: u8) -> Option<(usize, usize)> {
        debug_assert_eq!(self.peek(), Some(quote));
        self.pos += 1;
        let content_start = self.pos;
        while let Some(b) = self.peek() {
            match b {
                b'\\' if self.bytes.get(self.pos + 1..self.pos + 3) == Some(&b"\r\n"[..]) => {
                    self.pos += 3
                }
                b'\\' => self.pos += 2,
                b'\n' if quote != b'`' => return None,
                _ if b == quote => {
                    let content_end = self.pos;
                    self.pos += 1;
                    return Some((content_start, content_end));
                }
                _ => self.pos += 1,
            }
        }
        None
    }

    /// Read a brace-balanced `{ ... }` group, quote- and comment-aware.
    fn read_balanced(&mut self) -> Option<&'a str> {
        let start = self.pos;
        let mut depth = 0usize;
        while let Some(b) = self.peek() {
            match b {
                b'\'' | b'"' | b'`' => {
                    self.skip_string(b)?;
                    continue;
                }
                b'/' if matches!(self.bytes.get(self.pos + 1), Some(b'/' | b'*')) => {
                    self.skip_trivia();
                    continue;
                }
                b'{' => depth += 1,
                b'}' => {
                    depth -= 1;
                    if depth == 0 {
                        self.pos += 1;
                        return Some(&self.src[start..self.pos]);
                    }
                }
                _ => {}
            }
            self.pos += 1;
        }
        None
    }

    /// Read an unexpected token up to the next record separator.
    fn read_stray(&mut self) -> Option<&'a str> {
        let start = self.pos;
        while let Some(b) = self.peek() {
            match b {
                b'\'' | b'"' | b'`' => {
                    self.skip_string(b)?;
                }
                b',' | b'{' | b']' => return Some(self.src[start..self.pos].trim_end()),
                _ => self.pos += 1,
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOC: &str = concat!(
        "// header\nconst LIGHTING_BLOCKS = [{\n  text: 'Torch',\n  value: 'torch'\n}, {\n",
        "  text: 'Jack o\\'Lantern',\n  value: 'jack_o_lantern'\n}];\nconst keep = 1;\n",
    );

    #[test]
    fn parses_entries_and_span() {
        let doc = parse_document(DOC).unwrap();
        let span = doc.span(Category::Lighting).unwrap();
        assert_eq!(
            span.entries,
            vec![
                BlockEntry::new("Torch", "torch"),
                BlockEntry::new("Jack o'Lantern", "jack_o_lantern"),
            ]
        );
        assert!(span.malformed.is_empty());
        assert!(DOC[span.start..].starts_with("const LIGHTING_BLOCKS"));
        assert!(DOC[..span.end].ends_with("}];"));
    }

    #[test]
    fn missing_category_is_reported_by_require() {
        let doc = parse_document(DOC).unwrap();
        let err = doc
            .require(&[Category::Lighting, Category::Ore], "index.js")
            .unwrap_err();
        assert!(matches!(
            err,
            BlockTableError::CategoryNotFound { category: Category::Ore, .. }
        ));
    }

    #[test]
    fn accepts_compact_and_commented_layouts() {
        let src = concat!(
            "const ORE_BLOCKS = [\n  // ores\n  {text: \"Iron Ore\", value: 'iron_ore'},\n",
            "  /* gold */ {value: 'gold_ore', text: 'Gold ] Ore',},\n    ];",
        );
        let doc = parse_document(src).unwrap();
        let entries = doc.entries(Category::Ore).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1], BlockEntry::new("Gold ] Ore", "gold_ore"));
        assert_eq!(doc.span(Category::Ore).unwrap().end, src.len());
    }

    #[test]
    fn malformed_records_do_not_stop_the_parse() {
        let src = concat!(
            "const NATURE_BLOCKS = [{ text: 'Dirt', value: 'dirt' }, { text: 'Oops' }, stray, ",
            "{ text: 'Sand', value: 'sand', extra: 'x' }, { text: 'Mud', value: 'mud' }];",
        );
        let doc = parse_document(src).unwrap();
        let span = doc.span(Category::Nature).unwrap();
        assert_eq!(
            span.entries.iter().map(|e| e.value.as_str()).collect::<Vec<_>>(),
            vec!["dirt", "mud"]
        );
        assert_eq!(span.malformed.len(), 3);
        assert_eq!(span.malformed[0].raw, "{ text: 'Oops' }");
        assert_eq!(span.malformed[1].raw, "stray");
        assert!(span.malformed[2].reason.contains("extra"));
    }

    #[test]
    fn unterminated_array_is_fatal() {
        let src = "const SPECIAL_BLOCKS = [{ text: 'Air', value: 'air' },";
        let err = parse_document(src).unwrap_err();
        assert!(matches!(
            err,
            BlockTableError::UnterminatedArray { category: Category::Special }
        ));
    }

    #[test]
    fn ignores_lookalike_constants() {
        let src =
            "const BUILDING_BLOCKS_EXTRA = [1];\nmyconst ORE_BLOCKS = [];\nconst ORE_BLOCKS = [];";
        let doc = parse_document(src).unwrap();
        assert_eq!(doc.spans().len(), 1);
        assert!(doc.entries(Category::Ore).unwrap().is_empty());
        assert!(!doc.contains(Category::Building));
    }

    #[test]
    fn decodes_simple_escapes() {
        assert_eq!(unescape(r"a\'b\\c\nd").unwrap(), "a'b\\c\nd");
        assert_eq!(unescape(r"\/\]\q").unwrap(), "/]q");
        assert_eq!(unescape(r"nul\0end").unwrap(), "nul\0end");
        assert!(unescape("trailing\\").is_err());
    }

    #[test]
    fn decodes_unicode_and_hex_escapes() {
        assert_eq!(unescape(r"Caf\u00e9").unwrap(), "Café");
        assert_eq!(unescape(r"\u{1F332} tree").unwrap(), "\u{1F332} tree");
        assert_eq!(unescape(r"\uD83C\uDF32").unwrap(), "\u{1F332}");
        assert_eq!(unescape(r"\x41\x62").unwrap(), "Ab");
    }

    #[test]
    fn line_continuation_joins_lines() {
        assert_eq!(unescape("Oak \\\nSign").unwrap(), "Oak Sign");
        assert_eq!(unescape("Oak \\\r\nSign").unwrap(), "Oak Sign");
    }

    #[test]
    fn rejects_escapes_it_cannot_decode() {
        let bad = [
            r"\xZZ", r"\x4", r"\u00e", r"\u{}", r"\u{110000}", r"\uD83C", r"\uDF32", r"\12", r"\01",
        ];
        for raw in bad {
            assert!(unescape(raw).is_err(), "{raw} should be rejected");
        }
    }

    #[test]
    fn undecodable_escape_makes_the_record_malformed() {
        let src = concat!(
            "const ORE_BLOCKS = [{ text: 'Bad \\xZZ', value: 'bad' }, ",
            "{ text: 'Caf\\u00e9', value: 'cafe' }];",
        );
        let doc = parse_document(src).unwrap();
        let span = doc.span(Category::Ore).unwrap();
        assert_eq!(span.entries, vec![BlockEntry::new("Café", "cafe")]);
        assert_eq!(span.malformed.len(), 1);
        assert!(span.malformed[0].reason.contains("\\x"));
    }

    #[test]
    fn continued_label_spans_lines() {
        let src = "const ORE_BLOCKS = [{ text: 'Iron \\\r\nOre', value: 'iron_ore' }];";
        let doc = parse_document(src).unwrap();
        assert_eq!(doc.entries(Category::Ore).unwrap(), &[BlockEntry::new("Iron Ore", "iron_ore")]);
    }

    #[test]
    fn anchors_inside_comments_are_ignored() {
        let src = concat!(
            "// old: const ORE_BLOCKS = [\n",
            "const ORE_BLOCKS = [{ text: 'Iron Ore', value: 'iron_ore' }];\nfoo();\n",
        );
        let doc = parse_document(src).unwrap();
        let span = doc.span(Category::Ore).unwrap();
        assert_eq!(span.start, 29);
        assert!(span.malformed.is_empty());
        assert_eq!(span.entries, vec![BlockEntry::new("Iron Ore", "iron_ore")]);

        let block = "/* const ORE_BLOCKS = [ {text: 'x', value: 'x'} ]; */\nconst ORE_BLOCKS = [];";
        let doc = parse_document(block).unwrap();
        let start = doc.span(Category::Ore).unwrap().start;
        assert!(block[start..].starts_with("const ORE_BLOCKS = [];"));
        assert!(doc.entries(Category::Ore).unwrap().is_empty());
    }

    #[test]
    fn anchors_inside_strings_are_ignored() {
        let src = concat!(
            "const help = 'write const ORE_BLOCKS = [ here';\n",
            "const tpl = `\n  const LIGHTING_BLOCKS = [\n`;\n",
            "log(\"const SPECIAL_BLOCKS = [\");\n",
            "const ORE_BLOCKS = [{ text: 'Iron Ore', value: 'iron_ore' }];\n",
        );
        let doc = parse_document(src).unwrap();
        assert_eq!(doc.spans().len(), 1);
        let span = doc.span(Category::Ore).unwrap();
        assert!(src[span.start..].starts_with("const ORE_BLOCKS = [{"));
        assert!(!doc.contains(Category::Lighting));
        assert!(!doc.contains(Category::Special));
    }

    #[test]
    fn stray_quote_does_not_hide_later_declarations() {
        let src = "let ratio = 5' // typo\nconst ORE_BLOCKS = [];";
        let doc = parse_document(src).unwrap();
        assert!(doc.contains(Category::Ore));
    }

    #[test]
    fn repeated_declaration_body_is_skipped() {
        let src = concat!(
            "const ORE_BLOCKS = [];\n",
            "const ORE_BLOCKS = [{ text: 'const LIGHTING_BLOCKS = [', value: 'x' }];\n",
        );
        let doc = parse_document(src).unwrap();
        assert_eq!(doc.spans().len(), 1);
        assert!(doc.entries(Category::Ore).unwrap().is_empty());
    }

    #[test]
    fn parse_entries_reads_bare_body() {
        let (entries, malformed) =
            parse_entries(Category::Decoration, "{ text: 'Oak Sign', value: 'oak_sign' }").unwrap();
        assert_eq!(entries, vec![BlockEntry::new("Oak Sign", "oak_sign")]);
        assert!(malformed.is_empty());
    }
}
