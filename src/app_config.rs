use anyhow::{anyhow, Context, Result};
use log::{LevelFilter, warn};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::exporter::FITT_ID_PLACEHOLDER;

/// Widest caption window per line. The longest fitt then still ends within
/// the single-digit hours of an ASS timestamp.
pub const MAX_SECONDS_PER_LINE: u64 = 60;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct Config {
    /// Where the source document comes from
    #[serde(default)]
    pub source: SourceConfig,

    /// Where exports are written
    #[serde(default)]
    pub output: OutputConfig,

    /// Caption timing
    #[serde(default)]
    pub captions: CaptionConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Source document configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SourceConfig {
    // @field: Page holding the parallel text
    #[serde(default = "default_source_url")]
    pub url: String,

    // @field: Local copy of the page; present means no fetch
    #[serde(default = "default_cache_file")]
    pub cache_file: String,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            url: default_source_url(),
            cache_file: default_cache_file(),
        }
    }
}

/// Export configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct OutputConfig {
    // @field: Directory for the record list and table exports
    #[serde(default = "default_data_dir")]
    pub data_dir: String,

    // @field: File stem shared by the record list and table exports
    #[serde(default = "default_file_stem")]
    pub file_stem: String,

    // @field: Caption file path, `{fitt_id}` substituted per fitt
    #[serde(default = "default_subtitle_file_template")]
    pub subtitle_file_template: String,

    // @field: Blank caption container, built-in styles when absent
    #[serde(default = "default_blank_template")]
    pub blank_template: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            file_stem: default_file_stem(),
            subtitle_file_template: default_subtitle_file_template(),
            blank_template: default_blank_template(),
        }
    }
}

/// Caption timing configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct CaptionConfig {
    // @field: Width of each line's time window
    #[serde(default = "default_seconds_per_line")]
    pub seconds_per_line: u64,
}

impl Default for CaptionConfig {
    fn default() -> Self {
        Self {
            seconds_per_line: default_seconds_per_line(),
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

fn default_source_url() -> String {
    "https://heorot.dk/beowulf-rede-text.html".to_string()
}

fn default_cache_file() -> String {
    "data/fitts/maintext.html".to_string()
}

fn default_data_dir() -> String {
    "data/fitts".to_string()
}

fn default_file_stem() -> String {
    "maintext".to_string()
}

fn default_subtitle_file_template() -> String {
    "data/subtitles/fitt_{fitt_id}.ass".to_string()
}

fn default_blank_template() -> String {
    "data/blank.ass".to_string()
}

fn default_seconds_per_line() -> u64 {
    4
}

impl Config {
    /// Check the configuration for values the pipeline cannot work with
    pub fn validate(&self) -> Result<()> {
        url::Url::parse(&self.source.url)
            .with_context(|| format!("Invalid source URL: {}", self.source.url))?;

        if self.source.cache_file.trim().is_empty() {
            return Err(anyhow!("Source cache file path must not be empty"));
        }

        if self.output.file_stem.trim().is_empty() {
            return Err(anyhow!("Output file stem must not be empty"));
        }

        if !self.output.subtitle_file_template.contains(FITT_ID_PLACEHOLDER) {
            return Err(anyhow!(
                "Subtitle file template must contain {}: {}",
                FITT_ID_PLACEHOLDER,
                self.output.subtitle_file_template
            ));
        }

        if self.captions.seconds_per_line == 0 {
            return Err(anyhow!("Caption seconds per line must be greater than zero"));
        }

        if self.captions.seconds_per_line > MAX_SECONDS_PER_LINE {
            return Err(anyhow!(
                "Caption seconds per line must be at most {}: {}",
                MAX_SECONDS_PER_LINE,
                self.captions.seconds_per_line
            ));
        }

        Ok(())
    }

    /// Load the configuration at `path`, writing out defaults when it does not exist
    pub fn load_or_create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            let file = File::open(path)
                .with_context(|| format!("Failed to open config file: {}", path.display()))?;
            let reader = BufReader::new(file);
            return serde_json::from_reader(reader)
                .with_context(|| format!("Failed to parse config file: {}", path.display()));
        }

        warn!("Config file not found at '{}', creating default config.", path.display());
        let config = Config::default();
        config.save(path)?;
        Ok(config)
    }

    /// Write the configuration as pretty JSON
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let config_json = serde_json::to_string_pretty(self)
            .context("Failed to serialize config to JSON")?;
        crate::file_utils::FileManager::write_to_file(path, &config_json)
            .with_context(|| format!("Failed to write config to file: {}", path.display()))
    }
}
