use anyhow::{Context, Result};
use log::{info, warn};
use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::app_config::Config;
use crate::errors::AppError;
use crate::exporter;
use crate::fetcher;
use crate::file_utils::FileManager;
use crate::line_extractor::{self, LineRecord};
use crate::subtitle_processor::SubtitleTrack;
use crate::validation::{ValidationContext, ValidationReport, ValidationSuite};

// @module: Application controller for the fetch, extract and export pipeline

/// What a pipeline run produced
#[derive(Debug, Clone)]
pub struct RunSummary {
    /// Records in the canonical sequence, sentinel included
    pub line_count: usize,
    /// Rows dropped as consecutive duplicates
    pub duplicates_skipped: usize,
    /// Line numbers whose rows had more than two columns
    pub long_rows: Vec<u32>,
    /// Record list export
    pub json_path: PathBuf,
    /// Table export
    pub csv_path: PathBuf,
    /// Caption files, one per fitt that has lines
    pub caption_paths: Vec<PathBuf>,
}

/// Main application controller
pub struct Controller {
    // @field: App configuration
    config: Config,
}

impl Controller {
    /// Create a new controller for test purposes with default configuration
    pub fn new_for_test() -> Result<Self> {
        Self::with_config(Config::default())
    }

    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Path of the record list export
    pub fn json_path(&self) -> PathBuf {
        FileManager::generate_output_path(&self.config.output.data_dir, &self.config.output.file_stem, "json")
    }

    /// Path of the table export
    pub fn csv_path(&self) -> PathBuf {
        FileManager::generate_output_path(&self.config.output.data_dir, &self.config.output.file_stem, "csv")
    }

    /// Run the whole pipeline: obtain the document, extract the canonical
    /// sequence, then write the record list, the table and the captions.
    /// A fetch failure aborts before anything is written.
    pub async fn run(&self) -> Result<RunSummary, AppError> {
        let start_time = Instant::now();

        let html = fetcher::fetch_and_store(&self.config.source.url, &self.config.source.cache_file).await?;
        let extraction = line_extractor::extract(&html);
        let lines = extraction.lines;

        info!(
            "parsed the file: filestem={} url={} linecount={}",
            self.config.output.file_stem,
            self.config.source.url,
            lines.len()
        );
        if !extraction.stats.long_rows.is_empty() {
            warn!(
                "{} rows had more than two columns, first and last were used",
                extraction.stats.long_rows.len()
            );
        }

        let (json_path, csv_path, caption_paths) = self.export(&lines)?;

        info!("Pipeline finished in {:.2?}", start_time.elapsed());

        Ok(RunSummary {
            line_count: lines.len(),
            duplicates_skipped: extraction.stats.duplicates_skipped,
            long_rows: extraction.stats.long_rows,
            json_path,
            csv_path,
            caption_paths,
        })
    }

    /// Write every export of an already extracted sequence
    pub fn export(&self, lines: &[LineRecord]) -> Result<(PathBuf, PathBuf, Vec<PathBuf>)> {
        FileManager::ensure_dir(&self.config.output.data_dir)?;

        let json_path = self.json_path();
        exporter::write_json(&json_path, lines)?;
        info!("Wrote record list: {}", json_path.display());

        let csv_path = self.csv_path();
        exporter::write_csv(&csv_path, lines)?;
        info!("Wrote table: {}", csv_path.display());

        let blank = SubtitleTrack::load_template(&self.config.output.blank_template)
            .with_context(|| format!("Failed to load caption template: {}", self.config.output.blank_template))?;
        let caption_paths = exporter::write_fitt_tracks(
            lines,
            &self.config.output.subtitle_file_template,
            self.config.captions.seconds_per_line,
            &blank,
        )?;
        info!("Wrote {} caption files", caption_paths.len());

        Ok((json_path, csv_path, caption_paths))
    }

    /// Run the validation suite over a persisted record list
    pub fn validate_file<P: AsRef<Path>>(&self, path: P) -> Result<ValidationReport> {
        let path = path.as_ref();
        let values = exporter::load_json_values(path)?;
        info!("Validating {} records from {}", values.len(), path.display());

        let suite = ValidationSuite::new(ValidationContext::from_values(&values));
        let report = suite.run_all();
        info!("{}", report.summary());
        Ok(report)
    }
}
