//! The mapping table and its on-disk literal artifact.
//!
//! The artifact is a plain text file holding a `MESSAGES = { ... }` block of
//! quoted `key: value` pairs, one per line. Keys are the exact trimmed text
//! of original commit messages (embedded newlines included); values are the
//! rewritten messages. The format is intentionally dumb: a dedicated
//! escape-aware literal decoder, never an expression evaluator.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, warn};

use crate::conventional::{ClassifyOptions, RuleSet};

/// Opening marker of the table block inside the artifact.
pub const TABLE_MARKER: &str = "MESSAGES = {";

static TABLE_OPEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"MESSAGES\s*=\s*\{").unwrap());

/// Insertion-ordered mapping from original message text to rewritten text.
///
/// Duplicate inserts keep the first position and take the last value, the
/// same resolution the artifact format promises for duplicate keys.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MappingTable {
    entries: Vec<(String, String)>,
    index: HashMap<String, usize>,
}

impl MappingTable {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Looks up the rewritten text for an exact key.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.index.get(key).map(|&i| self.entries[i].1.as_str())
    }

    /// Whether an exact key is present.
    pub fn contains_key(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    /// Inserts a pair. An existing key keeps its position and takes the new
    /// value.
    pub fn insert(&mut self, key: String, value: String) {
        if let Some(&i) = self.index.get(&key) {
            self.entries[i].1 = value;
        } else {
            self.index.insert(key.clone(), self.entries.len());
            self.entries.push((key, value));
        }
    }

    /// Iterates entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Parses a table artifact.
    ///
    /// A blob with no table block yields an empty table. Malformed pairs are
    /// skipped with a warning; they never abort the parse. Duplicate keys
    /// resolve to the last occurrence in file order.
    pub fn parse(blob: &str) -> Self {
        let mut table = Self::new();

        let Some(open) = TABLE_OPEN.find(blob) else {
            debug!("no table block found in artifact");
            return table;
        };

        let mut scanner = Scanner::new(&blob[open.end()..]);
        loop {
            scanner.skip_separators();
            match scanner.peek() {
                None | Some('}') => break,
                _ => {}
            }

            let pair_start = scanner.pos;
            match scanner.read_pair() {
                Ok((key, value)) => table.insert(key, value),
                Err(reason) => {
                    warn!(offset = pair_start, %reason, "skipping malformed table pair");
                    scanner.recover();
                }
            }
        }

        table
    }

    /// Serializes the table back into the artifact format, one pair per
    /// line, insertion order preserved. `parse` of the output yields an
    /// equal table.
    pub fn render(&self) -> String {
        let mut out = String::new();
        out.push_str(TABLE_MARKER);
        out.push('\n');
        for (key, value) in self.iter() {
            out.push_str("    ");
            encode_literal(key, &mut out);
            out.push_str(": ");
            encode_literal(value, &mut out);
            out.push_str(",\n");
        }
        out.push_str("}\n");
        out
    }
}

/// Writes a double-quoted, escaped literal.
fn encode_literal(text: &str, out: &mut String) {
    out.push('"');
    for c in text.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c => out.push(c),
        }
    }
    out.push('"');
}

/// Character scanner over the inside of a table block.
struct Scanner<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Scanner<'a> {
    fn new(src: &'a str) -> Self {
        Self { src, pos: 0 }
    }

    fn peek(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn skip_separators(&mut self) {
        while matches!(self.peek(), Some(c) if c.is_whitespace() || c == ',') {
            self.bump();
        }
    }

    /// Reads one `"key": "value"` pair.
    fn read_pair(&mut self) -> Result<(String, String), &'static str> {
        let key = self.read_literal()?;
        self.skip_separators();
        if self.bump() != Some(':') {
            return Err("missing ':' between key and value");
        }
        self.skip_separators();
        let value = self.read_literal()?;
        Ok((key, value))
    }

    /// Reads one quoted literal, decoding escapes into bytes and then
    /// requiring the result to be valid UTF-8. Accepts an optional `b`
    /// prefix and `\xNN` byte escapes so artifacts written by earlier
    /// byte-literal emitters still parse.
    fn read_literal(&mut self) -> Result<String, &'static str> {
        if self.peek() == Some('b') {
            self.bump();
        }
        let quote = match self.bump() {
            Some(q @ ('\'' | '"')) => q,
            _ => return Err("expected opening quote"),
        };

        let mut bytes = Vec::new();
        loop {
            match self.bump() {
                None => return Err("unterminated literal"),
                Some(c) if c == quote => break,
                Some('\\') => match self.bump() {
                    Some('\\') => bytes.push(b'\\'),
                    Some('\'') => bytes.push(b'\''),
                    Some('"') => bytes.push(b'"'),
                    Some('n') => bytes.push(b'\n'),
                    Some('r') => bytes.push(b'\r'),
                    Some('t') => bytes.push(b'\t'),
                    Some('0') => bytes.push(0),
                    Some('x') => {
                        let hi = self.bump().and_then(|c| c.to_digit(16));
                        let lo = self.bump().and_then(|c| c.to_digit(16));
                        match (hi, lo) {
                            (Some(hi), Some(lo)) => bytes.push((hi * 16 + lo) as u8),
                            _ => return Err("invalid \\x escape"),
                        }
                    }
                    _ => return Err("unknown escape sequence"),
                },
                Some(c) => {
                    let mut buf = [0u8; 4];
                    bytes.extend_from_slice(c.encode_utf8(&mut buf).as_bytes());
                }
            }
        }

        String::from_utf8(bytes).map_err(|_| "literal is not valid UTF-8")
    }

    /// Advances past the current (malformed) pair: to the next line, or to
    /// the closing brace if none remains.
    fn recover(&mut self) {
        while let Some(c) = self.peek() {
            if c == '\n' || c == '}' {
                return;
            }
            self.bump();
        }
    }
}

/// Counters describing what a reconcile pass did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileStats {
    /// Entries copied unchanged from the prior table.
    pub inherited: usize,
    /// Entries freshly produced by the classifier.
    pub generated: usize,
    /// Prior entries whose keys no longer appear in history.
    pub orphaned: usize,
}

/// Merges a prior table with freshly classified entries for the history.
///
/// History order drives insertion order. A key already present in
/// `existing` is copied verbatim, so manual corrections survive regardless
/// of what the classifier would produce today. Keys in `existing` that the
/// history no longer contains are dropped unless `retain_orphans` is set,
/// in which case they are appended after all history entries in their
/// original relative order.
pub fn reconcile(
    existing: &MappingTable,
    history: &[String],
    rules: &RuleSet,
    opts: ClassifyOptions,
    retain_orphans: bool,
) -> (MappingTable, ReconcileStats) {
    let mut table = MappingTable::new();
    let mut stats = ReconcileStats::default();

    for message in history {
        let key = message.trim();
        if key.is_empty() || table.contains_key(key) {
            continue;
        }
        if let Some(value) = existing.get(key) {
            stats.inherited += 1;
            table.insert(key.to_string(), value.to_string());
        } else {
            stats.generated += 1;
            let rewritten = crate::conventional::rewrite_message(key, rules, opts);
            table.insert(key.to_string(), rewritten);
        }
    }

    for (key, value) in existing.iter() {
        if !table.contains_key(key) {
            stats.orphaned += 1;
            if retain_orphans {
                table.insert(key.to_string(), value.to_string());
            }
        }
    }

    (table, stats)
}
