/*!
 * Projection of the canonical line sequence into its output formats.
 *
 * - Record list: pretty-printed JSON array of `{"line", "OE", "ME"}`
 * - Table: CSV with a `line,OE,ME` header
 * - Captions: one ASS track per fitt, one fixed-width time window per line
 */

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use log::{info, warn};
use serde::Serialize;
use serde_json::Value;

use crate::file_utils::FileManager;
use crate::fitt_segmenter::get_fitt;
use crate::line_extractor::LineRecord;
use crate::numbering::{self, FittBoundary};
use crate::subtitle_processor::{SubtitleEvent, SubtitleTrack};

/// Caption style for each cue kind, keyed by the name stored on the event
pub const ORIGINAL_STYLE: (&str, &str) = ("original_style", "Old English");
pub const MODERN_STYLE: (&str, &str) = ("modern_style", "Modern English");
pub const BIG_NUMBER_STYLE: (&str, &str) = ("big_number_style", "Big Numbers");
pub const ALL_NUMBER_STYLE: (&str, &str) = ("all_number_style", "All Numbers");
pub const FITT_HEADING_STYLE: (&str, &str) = ("fitt_heading_style", "Fitt Headings");

/// Placeholder substituted in the caption file template
pub const FITT_ID_PLACEHOLDER: &str = "{fitt_id}";

/// Write the record list as 4-space indented JSON, non-ASCII kept literal
pub fn write_json<P: AsRef<Path>>(path: P, lines: &[LineRecord]) -> Result<()> {
    let path = path.as_ref();
    let file = create_output(path)?;
    let mut writer = BufWriter::new(file);
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut writer, formatter);
    lines
        .serialize(&mut serializer)
        .with_context(|| format!("Failed to write JSON: {}", path.display()))?;
    writer.flush().with_context(|| format!("Failed to flush JSON: {}", path.display()))
}

/// Read a persisted record list back into typed records
pub fn load_json<P: AsRef<Path>>(path: P) -> Result<Vec<LineRecord>> {
    let path = path.as_ref();
    let content = FileManager::read_to_string(path)?;
    serde_json::from_str(&content).with_context(|| format!("Failed to parse JSON: {}", path.display()))
}

/// Read a persisted record list as untyped JSON objects, so that records with
/// missing fields can still be inspected
pub fn load_json_values<P: AsRef<Path>>(path: P) -> Result<Vec<Value>> {
    let path = path.as_ref();
    let content = FileManager::read_to_string(path)?;
    let value: Value =
        serde_json::from_str(&content).with_context(|| format!("Failed to parse JSON: {}", path.display()))?;
    match value {
        Value::Array(records) => Ok(records),
        other => Err(anyhow!("Expected a JSON array in {}, found {}", path.display(), json_kind(&other))),
    }
}

/// Write the table export: header row then one row per record.
/// Records end with CRLF, matching the reference export.
pub fn write_csv<P: AsRef<Path>>(path: P, lines: &[LineRecord]) -> Result<()> {
    let path = path.as_ref();
    let file = create_output(path)?;
    let mut writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::CRLF)
        .from_writer(file);
    for line in lines {
        writer
            .serialize(line)
            .with_context(|| format!("Failed to write CSV row {}: {}", line.number, path.display()))?;
    }
    writer.flush().with_context(|| format!("Failed to flush CSV: {}", path.display()))?;
    Ok(())
}

/// Path of the caption file for a fitt
pub fn caption_path(template: &str, fitt_id: usize) -> PathBuf {
    PathBuf::from(template.replace(FITT_ID_PLACEHOLDER, &fitt_id.to_string()))
}

/// Build the caption track of one fitt.
///
/// Each record gets the window `[k*W, (k+1)*W)` where `k` is its position in
/// the fitt and `W` is `seconds_per_line`. All cues of a record share its
/// window: OE, ME, the line number, the big-number marker when the line has
/// one, and the fitt heading on the fitt's first line.
///
/// Fails when a window end does not fit in a millisecond count.
pub fn build_fitt_track(
    fitt_id: usize,
    boundary: &FittBoundary,
    fitt_lines: &[LineRecord],
    seconds_per_line: u64,
    blank: &SubtitleTrack,
) -> Result<SubtitleTrack> {
    let mut track = blank.clone();
    track.events.clear();
    track.set_info("Fitt", fitt_id.to_string());
    if let (Some(first), Some(last)) = (fitt_lines.first(), fitt_lines.last()) {
        track.set_info("First Line", first.number.to_string());
        track.set_info("Last Line", last.number.to_string());
    }

    let window_ms = seconds_per_line
        .checked_mul(1_000)
        .ok_or_else(|| anyhow!("Caption window of {} seconds is too wide", seconds_per_line))?;
    let mut start_ms: u64 = 0;

    for line in fitt_lines {
        let end_ms = start_ms
            .checked_add(window_ms)
            .ok_or_else(|| anyhow!("Caption timing overflows at line {} of fitt {}", line.number, fitt_id))?;
        let cue = |(name, style): (&str, &str), text: &str| SubtitleEvent::new(start_ms, end_ms, style, name, text);

        track.events.push(cue(ORIGINAL_STYLE, &line.original_text));
        track.events.push(cue(MODERN_STYLE, &line.modern_text));
        track.events.push(cue(ALL_NUMBER_STYLE, &line.number.to_string()));
        if let Some(marker) = numbering::line_number_marker(line.number) {
            track.events.push(cue(BIG_NUMBER_STYLE, marker));
        }
        if line.number == boundary.start_line {
            track.events.push(cue(FITT_HEADING_STYLE, boundary.heading));
        }

        start_ms = end_ms;
    }

    Ok(track)
}

/// Write one caption file per fitt, skipping the reserved fitt and any fitt
/// the sequence has no lines for. Returns the written paths.
pub fn write_fitt_tracks(
    lines: &[LineRecord],
    file_template: &str,
    seconds_per_line: u64,
    blank: &SubtitleTrack,
) -> Result<Vec<PathBuf>> {
    let progress = ProgressBar::new(numbering::MAX_FITT as u64);
    progress.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:30.cyan/blue}] {pos}/{len} fitts {msg}")
            .map_err(|e| anyhow!("Invalid progress template: {}", e))?
            .progress_chars("#>-"),
    );

    let mut written = Vec::new();
    for (fitt_id, boundary) in numbering::fitts() {
        progress.set_message(boundary.heading);
        let fitt_lines = get_fitt(fitt_id, lines)?;
        if fitt_lines.is_empty() {
            warn!("Fitt {} has no lines in this text, skipping caption file", fitt_id);
            progress.inc(1);
            continue;
        }

        info!(
            "Writing .ass file for fitt: fitt_id={} bounds={}..={}",
            fitt_id, boundary.start_line, boundary.end_line
        );
        let track = build_fitt_track(fitt_id, boundary, fitt_lines, seconds_per_line, blank)?;
        let path = caption_path(file_template, fitt_id);
        track.write_to_ass(&path)?;
        written.push(path);
        progress.inc(1);
    }
    progress.finish_and_clear();

    Ok(written)
}

fn create_output(path: &Path) -> Result<File> {
    if let Some(parent) = path.parent() {
        FileManager::ensure_dir(parent)?;
    }
    File::create(path).with_context(|| format!("Failed to create output file: {}", path.display()))
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
