//! Pattern based coloring for the response area.
//!
//! Each category is an independent regex pass over one block of text. Passes
//! run in a fixed order and a later pass overwrites the color an earlier one
//! assigned to the same characters. There is no awareness of strings or
//! comments, and operators are matched one character at a time.

use std::ops::Range;
use std::sync::OnceLock;

use egui::text::{LayoutJob, TextFormat};
use egui::{Color32, FontId};
use regex::Regex;

pub const KEYWORDS: &[&str] = &[
    "and", "as", "assert", "break", "class", "continue", "def", "del", "elif",
    "else", "except", "False", "finally", "for", "from", "global", "if",
    "import", "in", "is", "lambda", "None", "nonlocal", "not", "or", "pass",
    "raise", "return", "True", "try", "while", "with", "yield",
];

pub const BUILTINS: &[&str] = &[
    "abs", "all", "any", "bin", "bool", "bytearray", "bytes", "callable", "chr",
    "classmethod", "compile", "complex", "delattr", "dict", "dir", "divmod",
    "enumerate", "eval", "filter", "float", "format", "frozenset", "getattr",
    "globals", "hasattr", "hash", "help", "hex", "id", "input", "int",
    "isinstance", "issubclass", "iter", "len", "list", "locals", "map", "max",
    "memoryview", "min", "next", "object", "oct", "open", "ord", "pow",
    "property", "range", "repr", "reversed", "round", "set", "setattr", "slice",
    "sorted", "staticmethod", "str", "sum", "super", "tuple", "type", "vars",
    "zip",
];

// leading '-' keeps it literal inside a character class
pub const OPERATOR_CHARS: &str = "-+*/%=<>!&|^~";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HighlightCategory {
    Keyword,
    Builtin,
    Operator,
    Parenthesis,
    CurlyBrace,
    SquareBracket,
}

impl HighlightCategory {
    pub fn color(self) -> Color32 {
        match self {
            HighlightCategory::Keyword
            | HighlightCategory::Builtin
            | HighlightCategory::Operator => Color32::from_rgb(0x66, 0xd9, 0xef),
            HighlightCategory::Parenthesis => Color32::from_rgb(0xff, 0xff, 0x00),
            HighlightCategory::CurlyBrace => Color32::from_rgb(0xff, 0x00, 0x00),
            HighlightCategory::SquareBracket => Color32::from_rgb(0xff, 0xa5, 0x00),
        }
    }

    fn from_bracket(c: char) -> Option<Self> {
        match c {
            '(' | ')' => Some(HighlightCategory::Parenthesis),
            '{' | '}' => Some(HighlightCategory::CurlyBrace),
            '[' | ']' => Some(HighlightCategory::SquareBracket),
            _ => None,
        }
    }
}

/// A colored range over a block; `start` and `len` are byte offsets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HighlightSpan {
    pub start: usize,
    pub len: usize,
    pub category: HighlightCategory,
}

impl HighlightSpan {
    pub fn range(&self) -> Range<usize> {
        self.start..self.start + self.len
    }
}

// One classification pass. Every match gets the same category unless the
// pass classifies by the matched text (brackets).
struct Pass {
    re: Regex,
    category: Option<HighlightCategory>,
}

impl Pass {
    fn scan(&self, block: &str, spans: &mut Vec<HighlightSpan>) {
        for m in self.re.find_iter(block) {
            let category = match self.category {
                Some(category) => category,
                None => match m.as_str().chars().next()
                        .and_then(HighlightCategory::from_bracket) {
                    Some(category) => category,
                    None => continue,
                },
            };
            spans.push(HighlightSpan {
                start: m.start(),
                len: m.len(),
                category,
            });
        }
    }
}

fn word_pattern(words: &[&str]) -> String {
    format!(r"\b(?:{})\b", words.join("|"))
}

pub struct Highlighter {
    passes: Vec<Pass>,
}

impl Default for Highlighter {
    fn default() -> Self {
        Self::new()
    }
}

impl Highlighter {
    pub fn new() -> Self {
        // patterns are built from the constant tables above
        let passes = vec![
            Pass {
                re: Regex::new(&word_pattern(KEYWORDS)).unwrap(),
                category: Some(HighlightCategory::Keyword),
            },
            Pass {
                re: Regex::new(&word_pattern(BUILTINS)).unwrap(),
                category: Some(HighlightCategory::Builtin),
            },
            Pass {
                re: Regex::new(&format!("[{}]", OPERATOR_CHARS)).unwrap(),
                category: Some(HighlightCategory::Operator),
            },
            Pass {
                re: Regex::new(r"[(){}\[\]]").unwrap(),
                category: None,
            },
        ];
        Self { passes }
    }

    /// Shared instance, compiled on first use.
    pub fn global() -> &'static Highlighter {
        static HIGHLIGHTER: OnceLock<Highlighter> = OnceLock::new();
        HIGHLIGHTER.get_or_init(Highlighter::new)
    }

    /// Spans for a single block, in pass order.
    pub fn highlight_block(&self, block: &str) -> Vec<HighlightSpan> {
        let mut spans = Vec::new();
        for pass in &self.passes {
            pass.scan(block, &mut spans);
        }
        spans
    }

    /// Highlights every line of `text` independently and returns the spans
    /// shifted to offsets in `text`.
    pub fn highlight(&self, text: &str) -> Vec<HighlightSpan> {
        let mut spans = Vec::new();
        let mut offset = 0;
        for line in text.split('\n') {
            spans.extend(self.highlight_block(line).into_iter().map(|span| {
                HighlightSpan { start: span.start + offset, ..span }
            }));
            offset += line.len() + 1;
        }
        spans
    }

    /// Builds the galley description for the response area.
    pub fn layout_job(&self, text: &str, font_id: FontId,
            default_color: Color32) -> LayoutJob {
        let mut job = LayoutJob::default();
        for (range, category) in resolve(text, &self.highlight(text)) {
            let color = category.map_or(default_color, HighlightCategory::color);
            job.append(&text[range], 0.0, TextFormat::simple(font_id.clone(), color));
        }
        job
    }
}

/// Flattens `spans` into consecutive, non-overlapping runs covering all of
/// `text`. Spans are applied in order, so the last one touching a byte
/// decides its category.
pub fn resolve(text: &str, spans: &[HighlightSpan])
        -> Vec<(Range<usize>, Option<HighlightCategory>)> {
    let mut painted: Vec<Option<HighlightCategory>> = vec![None; text.len()];
    for span in spans {
        let range = span.range();
        if range.end > text.len() {
            continue;
        }
        for slot in &mut painted[range] {
            *slot = Some(span.category);
        }
    }

    let mut runs = Vec::new();
    let mut start = 0;
    for i in 1..=painted.len() {
        if i == painted.len() || painted[i] != painted[start] {
            runs.push((start..i, painted[start]));
            start = i;
        }
    }
    runs
}
