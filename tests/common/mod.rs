/*!
 * Common test utilities for the voxbeowulf test suite
 */

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use anyhow::Result;
use tempfile::TempDir;

use voxbeowulf::app_config::Config;
use voxbeowulf::line_extractor::LineRecord;
use voxbeowulf::numbering::MAX_LINE;

/// Opening line of the poem in both languages
pub const OPENING_OE: &str = "Hwæt! We Gardena in geardagum";
pub const OPENING_ME: &str = "Listen! We have heard of the glory";

/// Line whose row appears twice in a row in [`poem_html`]
pub const DUPLICATED_LINE: u32 = 10;

/// Line whose Old English column carries a footnote in [`poem_html`]
pub const FOOTNOTE_LINE: u32 = 5;

/// Rows per `table.c15` in [`poem_html`]
const ROWS_PER_TABLE: u32 = 250;

/// Creates a temporary directory for test files
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Creates a test file with the given content in the specified directory
pub fn create_test_file(dir: &Path, filename: &str, content: &str) -> Result<PathBuf> {
    let file_path = dir.join(filename);
    fs::write(&file_path, content)?;
    Ok(file_path)
}

/// Route library logs through env_logger while tests run
pub fn init_test_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// One bilingual row as the source edition marks it up
pub fn row_html(original: &str, modern: &str) -> String {
    format!(
        "<tr><td class=\"c4\"><span class=\"c7\">{}</span></td><td class=\"c4\"><span class=\"c7\">{}</span></td></tr>",
        original, modern
    )
}

/// A document with one bilingual table holding `rows`
pub fn document_html<I: IntoIterator<Item = String>>(rows: I) -> String {
    let rows: String = rows.into_iter().collect();
    format!(
        "<html><head><title>Beowulf</title></head><body><p>Prose intro</p><table class=\"c15\">{}</table></body></html>",
        rows
    )
}

/// Texts of line `n` of the synthetic poem
pub fn poem_line(n: u32) -> (String, String) {
    match n {
        1 => (OPENING_OE.to_string(), OPENING_ME.to_string()),
        2229 => (String::new(), String::new()),
        _ => (format!("oe line {}", n), format!("me line {}", n)),
    }
}

/// The canonical sequence of the synthetic poem, sentinel included
pub fn canonical_sequence() -> Vec<LineRecord> {
    std::iter::once(LineRecord::sentinel())
        .chain((1..=MAX_LINE).map(|n| {
            let (original, modern) = poem_line(n);
            LineRecord::new(n, original, modern)
        }))
        .collect()
}

/// Full-length synthetic source page.
///
/// Lines are spread across several `table.c15` elements. Line
/// [`FOOTNOTE_LINE`] carries a footnote, and the row of [`DUPLICATED_LINE`]
/// is repeated right after itself with a different translation.
pub fn poem_html() -> String {
    let mut body = String::from("<html><body><h1>Beowulf</h1>");
    for n in 1..=MAX_LINE {
        if n % ROWS_PER_TABLE == 1 {
            if n > 1 {
                body.push_str("</table>");
            }
            body.push_str("<table class=\"c15\">");
        }
        let (original, modern) = poem_line(n);
        if n == FOOTNOTE_LINE {
            body.push_str(&row_html(&format!("{}<div class=\"c3\">[5] a footnote</div>", original), &modern));
        } else {
            body.push_str(&row_html(&original, &modern));
        }
        if n == DUPLICATED_LINE {
            body.push_str(&row_html(&original, "a repeated translation"));
        }
    }
    body.push_str("</table></body></html>");
    body
}

/// Configuration that keeps every path inside `dir`
pub fn config_in(dir: &Path) -> Config {
    let mut config = Config::default();
    config.source.url = "http://127.0.0.1:9/beowulf-rede-text.html".to_string();
    config.source.cache_file = path_string(dir.join("fitts").join("maintext.html"));
    config.output.data_dir = path_string(dir.join("fitts"));
    config.output.subtitle_file_template = path_string(dir.join("subtitles").join("fitt_{fitt_id}.ass"));
    config.output.blank_template = path_string(dir.join("blank.ass"));
    config
}

/// Helper to get the absolute path to a test resource
pub fn test_resource_path(relative_path: &str) -> PathBuf {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("resources");
    path.push(relative_path);
    path
}

fn path_string(path: PathBuf) -> String {
    path.to_string_lossy().into_owned()
}
