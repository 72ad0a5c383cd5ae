/*!
 * Tests for the JSON, CSV and caption exports
 */

use anyhow::Result;
use serde_json::Value;
use voxbeowulf::exporter::{
    build_fitt_track, caption_path, load_json, load_json_values, write_csv, write_fitt_tracks, write_json,
};
use voxbeowulf::file_utils::FileManager;
use voxbeowulf::line_extractor::LineRecord;
use voxbeowulf::numbering::{self, FittBoundary, MAX_FITT};
use voxbeowulf::subtitle_processor::{SubtitleEvent, SubtitleTrack};
use crate::common;

fn short_sequence() -> Vec<LineRecord> {
    vec![
        LineRecord::sentinel(),
        LineRecord::new(1, common::OPENING_OE, common::OPENING_ME),
        LineRecord::new(2, "þeodcyninga, þrym gefrunon,", "of the folk-kings of the spear-Danes,"),
        LineRecord::new(3, "hu ða æþelingas ellen fremedon.", "how those noble lords did lofty deeds."),
    ]
}

/// Test JSON layout: array of line/OE/ME objects, 4-space indent, literal UTF-8
#[test]
fn test_write_json_withRecords_shouldWritePrettyUtf8() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("fitts").join("maintext.json");

    write_json(&path, &short_sequence())?;

    let content = FileManager::read_to_string(&path)?;
    assert!(content.starts_with("[\n    {\n        \"line\": 0,\n        \"OE\": \"\",\n        \"ME\": \"\"\n    },"));
    assert!(content.contains("Hwæt! We Gardena"));
    assert!(!content.contains("\\u00e6"));

    let values: Vec<Value> = serde_json::from_str(&content)?;
    assert_eq!(values.len(), 4);
    assert_eq!(values[2]["line"], 2);
    assert_eq!(values[3]["OE"], "hu ða æþelingas ellen fremedon.");

    Ok(())
}

/// Test that the typed and untyped loaders read back what was written
#[test]
fn test_load_json_withWrittenFile_shouldReturnSameRecords() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("maintext.json");
    let lines = short_sequence();

    write_json(&path, &lines)?;

    assert_eq!(load_json(&path)?, lines);
    assert_eq!(load_json_values(&path)?.len(), lines.len());

    Ok(())
}

/// Test that a JSON document which is not an array is rejected
#[test]
fn test_load_json_values_withObject_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(temp_dir.path(), "maintext.json", r#"{"line": 0}"#)?;

    let error = load_json_values(&path).unwrap_err();
    assert!(error.to_string().contains("an object"));

    Ok(())
}

/// Test CSV layout: header, sentinel row, quoting, CRLF terminators
#[test]
fn test_write_csv_withRecords_shouldWriteHeaderAndRows() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("maintext.csv");

    write_csv(&path, &short_sequence())?;

    let content = FileManager::read_to_string(&path)?;
    let rows: Vec<&str> = content.split("\r\n").collect();
    assert_eq!(rows[0], "line,OE,ME");
    assert_eq!(rows[1], "0,,");
    assert_eq!(rows[2], "1,Hwæt! We Gardena in geardagum,Listen! We have heard of the glory");
    assert_eq!(rows[3], "2,\"þeodcyninga, þrym gefrunon,\",\"of the folk-kings of the spear-Danes,\"");
    assert_eq!(rows.len(), 6);
    assert_eq!(rows[5], "");

    Ok(())
}

/// Test caption windows for a three-line fitt: [0,4), [4,8), [8,12)
#[test]
fn test_build_fitt_track_withThreeLines_shouldUseFixedWindows() -> Result<()> {
    let lines = short_sequence();
    let boundary = FittBoundary { start_line: 1, end_line: 3, heading: "Prologue" };

    let track = build_fitt_track(0, &boundary, &lines[1..], 4, &SubtitleTrack::blank())?;

    let windows: Vec<(u64, u64)> = track
        .events
        .iter()
        .filter(|e| e.style == "Old English")
        .map(|e| (e.start_time_ms, e.end_time_ms))
        .collect();
    assert_eq!(windows, vec![(0, 4_000), (4_000, 8_000), (8_000, 12_000)]);

    assert_eq!(track.info("Fitt"), Some("0"));
    assert_eq!(track.info("First Line"), Some("1"));
    assert_eq!(track.info("Last Line"), Some("3"));

    Ok(())
}

/// Test cue order within a line: OE, ME, number, then heading on the first line
#[test]
fn test_build_fitt_track_withFirstLine_shouldOrderCues() -> Result<()> {
    let lines = short_sequence();
    let boundary = FittBoundary { start_line: 1, end_line: 3, heading: "Prologue" };

    let track = build_fitt_track(0, &boundary, &lines[1..2], 4, &SubtitleTrack::blank())?;

    let cues: Vec<(&str, &str, &str)> = track
        .events
        .iter()
        .map(|e| (e.style.as_str(), e.name.as_str(), e.text.as_str()))
        .collect();
    assert_eq!(
        cues,
        vec![
            ("Old English", "original_style", common::OPENING_OE),
            ("Modern English", "modern_style", common::OPENING_ME),
            ("All Numbers", "all_number_style", "1"),
            ("Fitt Headings", "fitt_heading_style", "Prologue"),
        ]
    );

    Ok(())
}

/// Test that a marked line gets its big-number cue
#[test]
fn test_build_fitt_track_withMarkedLine_shouldAddBigNumber() -> Result<()> {
    let lines = common::canonical_sequence();
    let boundary = numbering::FITT_BOUNDARIES[0];

    let track = build_fitt_track(0, &boundary, &lines[1..=52], 4, &SubtitleTrack::blank())?;

    let big_numbers: Vec<(&str, u64)> = track
        .events
        .iter()
        .filter(|e| e.style == "Big Numbers")
        .map(|e| (e.text.as_str(), e.start_time_ms))
        .collect();
    assert_eq!(big_numbers, vec![("10", 36_000), ("20", 76_000), ("30", 116_000), ("40", 156_000), ("50", 196_000)]);
    assert_eq!(track.events.iter().filter(|e| e.style == "Fitt Headings").count(), 1);

    Ok(())
}

/// Test that the template's events never leak into a fitt track
#[test]
fn test_build_fitt_track_withTemplateEvents_shouldStartEmpty() -> Result<()> {
    let mut blank = SubtitleTrack::blank();
    blank.events.push(SubtitleEvent::new(0, 1_000, "Old English", "", "stale"));
    let lines = short_sequence();
    let boundary = FittBoundary { start_line: 1, end_line: 3, heading: "Prologue" };

    let track = build_fitt_track(0, &boundary, &lines[1..], 4, &blank)?;

    assert!(track.events.iter().all(|e| e.text != "stale"));

    Ok(())
}

/// Test that an oversized caption window is an error rather than an overflow
#[test]
fn test_build_fitt_track_withOversizedWindow_shouldFail() {
    let lines = short_sequence();
    let boundary = FittBoundary { start_line: 1, end_line: 3, heading: "Prologue" };

    let too_wide = build_fitt_track(0, &boundary, &lines[1..], u64::MAX / 100, &SubtitleTrack::blank());
    assert!(too_wide.is_err());

    // The window itself fits, but the third line's end does not
    let too_long = build_fitt_track(0, &boundary, &lines[1..], u64::MAX / 2_500, &SubtitleTrack::blank());
    assert!(too_long.is_err());
}

/// Test caption file naming
#[test]
fn test_caption_path_withTemplate_shouldSubstituteFittId() {
    assert_eq!(
        caption_path("data/subtitles/fitt_{fitt_id}.ass", 17),
        std::path::PathBuf::from("data/subtitles/fitt_17.ass")
    );
}

/// Test that every fitt but the reserved one gets a file for the full poem
#[test]
fn test_write_fitt_tracks_withFullPoem_shouldSkipReservedFitt() -> Result<()> {
    common::init_test_logging();
    let temp_dir = common::create_temp_dir()?;
    let template = temp_dir.path().join("subtitles").join("fitt_{fitt_id}.ass");
    let template = template.to_string_lossy();

    let written = write_fitt_tracks(&common::canonical_sequence(), &template, 4, &SubtitleTrack::blank())?;

    assert_eq!(written.len(), MAX_FITT);
    assert!(!temp_dir.path().join("subtitles").join("fitt_24.ass").exists());
    assert!(temp_dir.path().join("subtitles").join("fitt_43.ass").exists());

    let merged_a = FileManager::read_to_string(caption_path(&template, 29))?;
    let merged_b = FileManager::read_to_string(caption_path(&template, 30))?;
    assert!(merged_a.contains("Fitt: 29"));
    assert!(merged_b.contains("Fitt: 30"));
    assert_eq!(merged_a.lines().filter(|l| l.starts_with("Dialogue:")).count(),
               merged_b.lines().filter(|l| l.starts_with("Dialogue:")).count());

    Ok(())
}

/// Test that fitts missing from a short document are skipped
#[test]
fn test_write_fitt_tracks_withShortDocument_shouldSkipEmptyFitts() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let template = temp_dir.path().join("fitt_{fitt_id}.ass");

    let written = write_fitt_tracks(&short_sequence(), &template.to_string_lossy(), 4, &SubtitleTrack::blank())?;

    assert_eq!(written, vec![temp_dir.path().join("fitt_0.ass")]);

    Ok(())
}
