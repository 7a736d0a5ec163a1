use crate::entry::{BlockEntry, Category};
use crate::parser::BlockDocument;
use crate::snapshot::Snapshot;

/// Escape a field for a single-quoted JavaScript string literal.
pub fn escape_literal(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() || c == '\u{2028}' || c == '\u{2029}' => {
                out.push_str(&format!("\\u{:04x}", c as u32))
            }
            _ => out.push(c),
        }
    }
    out
}

fn render_record(out: &mut String, entry: &BlockEntry) {
    out.push_str("{\n  text: '");
    out.push_str(&escape_literal(&entry.text));
    out.push_str("',\n  value: '");
    out.push_str(&escape_literal(&entry.value));
    out.push_str("'\n}");
}

/// Render a full `const NAME = [ ... ];` declaration.
///
/// Layout, one record shown:
///
/// ```text
/// const ORE_BLOCKS = [{
///   text: 'Iron Ore',
///   value: 'iron_ore'
/// }, {
///   ...
/// }];
/// ```
pub fn render_category(category: Category, entries: &[BlockEntry]) -> String {
    render_category_keeping(category, entries, &[])
}

/// Like [`render_category`], with `kept` records copied verbatim after
/// the entries, one per line.
pub fn render_category_keeping(
    category: Category,
    entries: &[BlockEntry],
    kept: &[&str],
) -> String {
    let mut out = String::with_capacity(32 + entries.len() * 48);
    out.push_str("const ");
    out.push_str(category.constant_name());
    out.push_str(" = [");
    for (i, entry) in entries.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        render_record(&mut out, entry);
    }
    for (i, raw) in kept.iter().enumerate() {
        if i > 0 || !entries.is_empty() {
            out.push(',');
        }
        out.push('\n');
        out.push_str(raw);
    }
    if !kept.is_empty() {
        out.push('\n');
    }
    out.push_str("];");
    out
}

impl BlockDocument {
    /// Document text with every span that `snapshot` has entries for
    /// replaced by a fresh rendering. Bytes outside those spans are
    /// copied unchanged. Malformed records in replaced spans are lost.
    pub fn render_with(&self, snapshot: &Snapshot) -> String {
        self.render_spans(snapshot, false)
    }

    /// Like [`BlockDocument::render_with`], but each replaced span keeps
    /// its malformed records verbatim after the rendered entries.
    pub fn render_keeping_malformed(&self, snapshot: &Snapshot) -> String {
        self.render_spans(snapshot, true)
    }

    fn render_spans(&self, snapshot: &Snapshot, keep_malformed: bool) -> String {
        let mut out = String::with_capacity(self.source.len());
        let mut cursor = 0usize;

        for span in &self.spans {
            let Some(entries) = snapshot.get(span.category) else {
                continue;
            };
            let kept: Vec<&str> = if keep_malformed {
                span.malformed.iter().map(|m| m.raw.as_str()).collect()
            } else {
                Vec::new()
            };
            out.push_str(&self.source[cursor..span.start]);
            out.push_str(&render_category_keeping(span.category, entries, &kept));
            cursor = span.end;
        }
        out.push_str(&self.source[cursor..]);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{parse_document, parse_entries};

    #[test]
    fn renders_expected_layout() {
        let rendered = render_category(
            Category::Ore,
            &[
                BlockEntry::new("Iron Ore", "iron_ore"),
                BlockEntry::new("Gold Ore", "gold_ore"),
            ],
        );
        assert_eq!(
            rendered,
            concat!(
                "const ORE_BLOCKS = [{\n  text: 'Iron Ore',\n  value: 'iron_ore'\n}, ",
                "{\n  text: 'Gold Ore',\n  value: 'gold_ore'\n}];",
            )
        );
        assert_eq!(render_category(Category::Special, &[]), "const SPECIAL_BLOCKS = [];");
    }

    #[test]
    fn parse_of_render_returns_entries() {
        let entries = vec![
            BlockEntry::new("Jack o'Lantern", "jack_o_lantern"),
            BlockEntry::new("Back\\slash", "odd_block"),
            BlockEntry::new("ダークオークの看板", "dark_oak_sign"),
            BlockEntry::new("Line\nbreak\tand \"quotes\"", "multi"),
            BlockEntry::new("Café \u{1F332}", "cafe"),
            BlockEntry::new("nul\0bell\u{7}sep\u{2028}", "controls"),
        ];
        let rendered = render_category(Category::Decoration, &entries);
        let doc = parse_document(&rendered).unwrap();
        assert_eq!(doc.entries(Category::Decoration).unwrap(), entries.as_slice());
        assert_eq!(doc.span(Category::Decoration).unwrap().end, rendered.len());
    }

    #[test]
    fn kept_records_follow_entries_and_survive_a_reparse() {
        let src = "const ORE_BLOCKS = [{text: 'Gold Ore', value: 'gold_ore'}, \
                   { text: 'Oops' }, stray // note\n, {text:'Iron Ore',value:'iron_ore'}];";
        let doc = parse_document(src).unwrap();
        let snapshot = Snapshot::from_document(&doc);
        let once = doc.render_keeping_malformed(&snapshot);
        assert!(once.ends_with(concat!(
            "}, {\n  text: 'Iron Ore',\n  value: 'iron_ore'\n},\n",
            "{ text: 'Oops' },\nstray // note\n];",
        )));

        let reparsed = parse_document(&once).unwrap();
        assert_eq!(reparsed.entries(Category::Ore).unwrap(), snapshot.get(Category::Ore).unwrap());
        assert_eq!(reparsed.malformed().count(), 2);
        assert_eq!(reparsed.render_keeping_malformed(&snapshot), once);
        assert!(!doc.render_with(&snapshot).contains("Oops"));
    }

    #[test]
    fn control_characters_render_as_unicode_escapes() {
        assert_eq!(escape_literal("a\0b\u{2028}"), "a\\u0000b\\u2028");
        assert_eq!(escape_literal("Café"), "Café");
    }

    #[test]
    fn render_with_preserves_surrounding_text() {
        let src = concat!(
            "/* top */\nconst ORE_BLOCKS = [{text: 'B', value: 'b'}, {text: 'A', value: 'a'}];\n",
            "function keep() { return ORE_BLOCKS; }\n",
        );
        let doc = parse_document(src).unwrap();
        let mut snapshot = Snapshot::default();
        let (entries, _) = parse_entries(Category::Ore, "{text: 'A', value: 'a'}").unwrap();
        snapshot.set(Category::Ore, entries);

        let out = doc.render_with(&snapshot);
        assert!(out.starts_with("/* top */\nconst ORE_BLOCKS = [{\n  text: 'A'"));
        assert!(out.ends_with("}];\nfunction keep() { return ORE_BLOCKS; }\n"));
    }

    #[test]
    fn render_with_leaves_unsnapshotted_spans() {
        let src = "const ORE_BLOCKS = [ {text:'A',value:'a'} ];\nconst SPECIAL_BLOCKS = [];";
        let doc = parse_document(src).unwrap();
        let mut snapshot = Snapshot::default();
        snapshot.set(Category::Special, vec![BlockEntry::new("Air", "air")]);
        let out = doc.render_with(&snapshot);
        assert!(out.starts_with("const ORE_BLOCKS = [ {text:'A',value:'a'} ];\n"));
        assert!(out.contains("value: 'air'"));
    }
}
