/*!
 * End-to-end tests: cached page to exports, exports back through validation
 */

use anyhow::Result;
use voxbeowulf::app_controller::Controller;
use voxbeowulf::exporter::load_json;
use voxbeowulf::file_utils::FileManager;
use voxbeowulf::numbering::{EXPECTED_LINE_COUNT, MAX_FITT};
use voxbeowulf::validation::Check;
use crate::common;

/// Test the whole pipeline on a full-length cached page
#[tokio::test]
async fn test_run_withCachedPoem_shouldWriteAllExports() -> Result<()> {
    common::init_test_logging();
    let temp_dir = common::create_temp_dir()?;
    let config = common::config_in(temp_dir.path());
    FileManager::write_to_file(&config.source.cache_file, &common::poem_html())?;

    let controller = Controller::with_config(config)?;
    let summary = controller.run().await?;

    assert_eq!(summary.line_count, EXPECTED_LINE_COUNT);
    assert_eq!(summary.duplicates_skipped, 1);
    assert!(summary.long_rows.is_empty());
    assert_eq!(summary.caption_paths.len(), MAX_FITT);

    assert_eq!(load_json(&summary.json_path)?, common::canonical_sequence());

    let csv = FileManager::read_to_string(&summary.csv_path)?;
    assert_eq!(csv.split("\r\n").filter(|row| !row.is_empty()).count(), EXPECTED_LINE_COUNT + 1);

    let report = controller.validate_file(&summary.json_path)?;
    assert!(report.all_passed(), "{}", report);

    Ok(())
}

/// Test that a short page exports what it has and fails the length checks
#[tokio::test]
async fn test_run_withSamplePage_shouldExportAndReportShortText() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let config = common::config_in(temp_dir.path());
    let sample = FileManager::read_to_string(common::test_resource_path("sample_text.html"))?;
    FileManager::write_to_file(&config.source.cache_file, &sample)?;

    let controller = Controller::with_config(config)?;
    let summary = controller.run().await?;

    assert_eq!(summary.line_count, 11);
    assert_eq!(summary.long_rows, vec![8]);
    assert_eq!(summary.caption_paths.len(), 1);

    let captions = FileManager::read_to_string(&summary.caption_paths[0])?;
    assert!(captions.contains("Last Line: 10"));
    assert!(captions.contains("Dialogue: 0,0:00:36.00,0:00:40.00,Big Numbers,big_number_style,0,0,0,,10"));

    let report = controller.validate_file(&summary.json_path)?;
    let failed: Vec<Check> = report.failures().map(|o| o.check).collect();
    assert!(failed.contains(&Check::TotalLineCount));
    assert!(failed.contains(&Check::StructuralGapsEmpty));
    assert!(!failed.contains(&Check::FamousOpeningLine));
    assert!(!failed.contains(&Check::TextFieldsNormalized));

    Ok(())
}

/// Test that a caption template on disk supplies the track header
#[tokio::test]
async fn test_run_withBlankTemplate_shouldUseTemplateStyles() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let config = common::config_in(temp_dir.path());
    let template = FileManager::read_to_string(common::test_resource_path("blank.ass"))?;
    FileManager::write_to_file(&config.output.blank_template, &template)?;
    let rows = (1..=3).map(|n| {
        let (original, modern) = common::poem_line(n);
        common::row_html(&original, &modern)
    });
    FileManager::write_to_file(&config.source.cache_file, &common::document_html(rows))?;

    let controller = Controller::with_config(config)?;
    let summary = controller.run().await?;

    let captions = FileManager::read_to_string(&summary.caption_paths[0])?;
    assert!(captions.contains("Title: Beowulf"));
    assert!(captions.contains("Style: Old English,Junicode,48"));
    assert!(!captions.contains("placeholder"));
    assert!(captions.contains("Dialogue: 0,0:00:08.00,0:00:12.00,Modern English,modern_style,0,0,0,,me line 3"));

    Ok(())
}
