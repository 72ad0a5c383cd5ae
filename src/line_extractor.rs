/*!
 * Extraction of bilingual verse lines from the heorot.dk HTML edition.
 *
 * The edition lays the poem out as tables marked `c15`; each row holds the
 * Old English and Modern English text in `span.c7` columns, interleaved with
 * footnote `div`s. Extraction walks those rows in document order and produces
 * a dense, 1-based sequence of [`LineRecord`]s preceded by a sentinel line 0.
 */

use std::fmt::Write;

use log::debug;
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Node, Selector};
use scraper::node::Element;
use serde::{Deserialize, Serialize};

use crate::text_normalizer::normalize_text;

// @const: Tables holding the bilingual text
static TABLE_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("table.c15").expect("table selector is valid")
});

// @const: Rows of a bilingual table
static ROW_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("tr").expect("row selector is valid")
});

// @const: Language columns within a row
static COLUMN_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("span.c7").expect("column selector is valid")
});

/// The only `div` class list that wraps verse text rather than a footnote.
/// The source misplaces a line near 1066 inside such a div.
const INLINE_CORRECTION_CLASS: &str = "c35";

/// One line of the poem in both languages
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineRecord {
    /// Line number; 0 is the sentinel
    #[serde(rename = "line")]
    pub number: u32,

    /// Old English text
    #[serde(rename = "OE")]
    pub original_text: String,

    /// Modern English text
    #[serde(rename = "ME")]
    pub modern_text: String,
}

impl LineRecord {
    pub fn new(number: u32, original_text: impl Into<String>, modern_text: impl Into<String>) -> Self {
        Self {
            number,
            original_text: original_text.into(),
            modern_text: modern_text.into(),
        }
    }

    /// The placeholder record that precedes line 1
    pub fn sentinel() -> Self {
        Self::new(0, "", "")
    }

    /// Whether both text fields are empty after trimming
    pub fn is_blank(&self) -> bool {
        self.original_text.trim().is_empty() && self.modern_text.trim().is_empty()
    }
}

/// Counters collected while extracting
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractionStats {
    /// Number of `table.c15` elements found
    pub tables: usize,
    /// Rows inspected across all tables
    pub rows_seen: usize,
    /// Rows dropped as repeats of the previous accepted row
    pub duplicates_skipped: usize,
    /// Line numbers built from rows with more than two columns
    pub long_rows: Vec<u32>,
}

/// Result of extracting a document
#[derive(Debug, Clone)]
pub struct Extraction {
    pub lines: Vec<LineRecord>,
    pub stats: ExtractionStats,
}

/// Extract the canonical line sequence from an HTML document
pub fn extract_lines(html: &str) -> Vec<LineRecord> {
    extract(html).lines
}

/// Extract the canonical line sequence along with extraction counters.
///
/// Rows that don't have at least two language columns are skipped. Rows with
/// more than two columns use the first as Old English and the last as Modern
/// English, and their line numbers are listed in [`ExtractionStats::long_rows`].
pub fn extract(html: &str) -> Extraction {
    let document = Html::parse_document(html);
    let mut lines = vec![LineRecord::sentinel()];
    let mut stats = ExtractionStats::default();
    let mut current_line: u32 = 0;

    for table in document.select(&TABLE_SELECTOR) {
        stats.tables += 1;
        let mut last_original: Option<String> = None;

        for row in table.select(&ROW_SELECTOR) {
            stats.rows_seen += 1;

            let columns: Vec<ElementRef> = row
                .select(&COLUMN_SELECTOR)
                .filter(|column| !inside_footnote(*column, row))
                .collect();

            if columns.len() < 2 {
                continue;
            }

            if columns.len() > 2 {
                debug!("long row found: line={} cols={}", current_line + 1, columns.len());
            }

            let original = columns[0];
            let modern = columns[columns.len() - 1];

            let fingerprint = column_fingerprint(original);
            if last_original.as_deref() == Some(fingerprint.as_str()) {
                stats.duplicates_skipped += 1;
                continue;
            }
            last_original = Some(fingerprint);

            current_line += 1;
            if columns.len() > 2 {
                stats.long_rows.push(current_line);
            }

            lines.push(LineRecord::new(
                current_line,
                normalize_text(&column_text(original)),
                normalize_text(&column_text(modern)),
            ));
        }
    }

    Extraction { lines, stats }
}

/// Footnote divs are everything except the inline-correction wrapper
fn is_footnote(element: &Element) -> bool {
    if element.name() != "div" {
        return false;
    }
    let classes: Vec<&str> = element
        .attr("class")
        .map(|class| class.split_whitespace().collect())
        .unwrap_or_default();
    classes != [INLINE_CORRECTION_CLASS]
}

/// Whether `column` sits inside a footnote div of `row`
fn inside_footnote(column: ElementRef, row: ElementRef) -> bool {
    column
        .ancestors()
        .take_while(|node| node.id() != row.id())
        .filter_map(|node| node.value().as_element())
        .any(is_footnote)
}

/// Concatenated text of a column with footnotes removed and links unwrapped.
/// Internal whitespace is preserved for the normalizer.
fn column_text(column: ElementRef) -> String {
    let mut text = String::new();
    push_text(column, &mut text);
    text
}

fn push_text(element: ElementRef, out: &mut String) {
    for child in element.children() {
        match child.value() {
            Node::Text(text) => out.push_str(text),
            Node::Element(inner) if !is_footnote(inner) => {
                if let Some(child_element) = ElementRef::wrap(child) {
                    push_text(child_element, out);
                }
            }
            _ => {}
        }
    }
}

/// Structural identity of a column: element names, attributes and text,
/// footnotes excluded. Two consecutive rows with equal fingerprints are the
/// duplicate-row artifact of the source.
fn column_fingerprint(column: ElementRef) -> String {
    let mut out = String::new();
    push_fingerprint(column, &mut out);
    out
}

fn push_fingerprint(element: ElementRef, out: &mut String) {
    let value = element.value();
    let _ = write!(out, "<{}", value.name());
    for (name, attr) in value.attrs() {
        let _ = write!(out, " {}={:?}", name, attr);
    }
    out.push('>');

    for child in element.children() {
        match child.value() {
            Node::Text(text) => {
                let _ = write!(out, "{:?}", &**text);
            }
            Node::Element(inner) if !is_footnote(inner) => {
                if let Some(child_element) = ElementRef::wrap(child) {
                    push_fingerprint(child_element, out);
                }
            }
            _ => {}
        }
    }

    let _ = write!(out, "</{}>", value.name());
}
