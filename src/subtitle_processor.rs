use std::fmt;
use std::fs;
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use log::{debug, warn};
use once_cell::sync::Lazy;
use regex::Regex;

// @module: Advanced SubStation Alpha (ASS) subtitle tracks

// @const: ASS timestamp regex (H:MM:SS.cc)
static TIMESTAMP_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d+):(\d{2}):(\d{2})\.(\d{2})$").expect("timestamp pattern is valid")
});

/// Field order written in the `[V4+ Styles]` section
pub const STYLE_FORMAT: &str = "Name, Fontname, Fontsize, PrimaryColour, SecondaryColour, OutlineColour, \
BackColour, Bold, Italic, Underline, StrikeOut, ScaleX, ScaleY, Spacing, Angle, BorderStyle, Outline, \
Shadow, Alignment, MarginL, MarginR, MarginV, Encoding";

/// Field order written in the `[Events]` section
pub const EVENT_FORMAT: &str = "Layer, Start, End, Style, Name, MarginL, MarginR, MarginV, Effect, Text";

// @struct: Named ASS style, one field per `Format:` column
#[derive(Debug, Clone, PartialEq)]
pub struct SubtitleStyle {
    pub name: String,
    pub fontname: String,
    pub fontsize: f32,
    pub primary_colour: String,
    pub secondary_colour: String,
    pub outline_colour: String,
    pub back_colour: String,
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    pub strike_out: bool,
    /// Horizontal and vertical scale in percent
    pub scale_x: f32,
    pub scale_y: f32,
    pub spacing: f32,
    pub angle: f32,
    /// 1 for outline and drop shadow, 3 for an opaque box
    pub border_style: u8,
    pub outline: f32,
    pub shadow: f32,
    /// Numpad-style screen position (1-9)
    pub alignment: u8,
    pub margin_l: u32,
    pub margin_r: u32,
    pub margin_v: u32,
    pub encoding: i32,
}

impl SubtitleStyle {
    pub fn new(name: &str, fontsize: f32, alignment: u8, bold: bool) -> Self {
        SubtitleStyle {
            name: name.to_string(),
            fontname: "Arial".to_string(),
            fontsize,
            primary_colour: "&H00FFFFFF".to_string(),
            secondary_colour: "&H000000FF".to_string(),
            outline_colour: "&H00000000".to_string(),
            back_colour: "&H00000000".to_string(),
            bold,
            italic: false,
            underline: false,
            strike_out: false,
            scale_x: 100.0,
            scale_y: 100.0,
            spacing: 0.0,
            angle: 0.0,
            border_style: 1,
            outline: 2.0,
            shadow: 2.0,
            alignment,
            margin_l: 10,
            margin_r: 10,
            margin_v: 10,
            encoding: 1,
        }
    }

    /// Build a style from a `Style:` line given the section's `Format:` fields.
    /// Fields the format doesn't list keep their defaults.
    fn from_fields(format: &[String], values: &[&str]) -> Result<Self> {
        if format.len() != values.len() {
            return Err(anyhow!("Style has {} values but format lists {} fields", values.len(), format.len()));
        }
        let mut style = SubtitleStyle::new("Default", 20.0, 2, false);
        for (field, value) in format.iter().zip(values) {
            let value = value.trim();
            let invalid = || format!("Invalid {} in style: {}", field, value);
            match field.as_str() {
                "Name" => style.name = value.to_string(),
                "Fontname" => style.fontname = value.to_string(),
                "Fontsize" => style.fontsize = value.parse().with_context(invalid)?,
                "PrimaryColour" => style.primary_colour = value.to_string(),
                "SecondaryColour" => style.secondary_colour = value.to_string(),
                "OutlineColour" => style.outline_colour = value.to_string(),
                "BackColour" => style.back_colour = value.to_string(),
                "Bold" => style.bold = value != "0",
                "Italic" => style.italic = value != "0",
                "Underline" => style.underline = value != "0",
                "StrikeOut" => style.strike_out = value != "0",
                "ScaleX" => style.scale_x = value.parse().with_context(invalid)?,
                "ScaleY" => style.scale_y = value.parse().with_context(invalid)?,
                "Spacing" => style.spacing = value.parse().with_context(invalid)?,
                "Angle" => style.angle = value.parse().with_context(invalid)?,
                "BorderStyle" => style.border_style = value.parse().with_context(invalid)?,
                "Outline" => style.outline = value.parse().with_context(invalid)?,
                "Shadow" => style.shadow = value.parse().with_context(invalid)?,
                "Alignment" => style.alignment = value.parse().with_context(invalid)?,
                "MarginL" => style.margin_l = value.parse().with_context(invalid)?,
                "MarginR" => style.margin_r = value.parse().with_context(invalid)?,
                "MarginV" => style.margin_v = value.parse().with_context(invalid)?,
                "Encoding" => style.encoding = value.parse().with_context(invalid)?,
                _ => debug!("Ignoring style field {}", field),
            }
        }
        Ok(style)
    }
}

impl fmt::Display for SubtitleStyle {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        // ASS booleans are -1 for true
        let flag = |value: bool| if value { -1 } else { 0 };
        write!(
            f,
            "Style: {},{},{},{},{},{},{},{},{},{},{},{},{},{},{},{},{},{},{},{},{},{},{}",
            self.name,
            self.fontname,
            self.fontsize,
            self.primary_colour,
            self.secondary_colour,
            self.outline_colour,
            self.back_colour,
            flag(self.bold),
            flag(self.italic),
            flag(self.underline),
            flag(self.strike_out),
            self.scale_x,
            self.scale_y,
            self.spacing,
            self.angle,
            self.border_style,
            self.outline,
            self.shadow,
            self.alignment,
            self.margin_l,
            self.margin_r,
            self.margin_v,
            self.encoding,
        )
    }
}

// @struct: Single dialogue event
#[derive(Debug, Clone, PartialEq)]
pub struct SubtitleEvent {
    // @field: Start time in ms
    pub start_time_ms: u64,

    // @field: End time in ms
    pub end_time_ms: u64,

    // @field: Style name
    pub style: String,

    // @field: Event name (actor field)
    pub name: String,

    // @field: Event text
    pub text: String,
}

impl SubtitleEvent {
    pub fn new(start_time_ms: u64, end_time_ms: u64, style: &str, name: &str, text: impl Into<String>) -> Self {
        SubtitleEvent {
            start_time_ms,
            end_time_ms,
            style: style.to_string(),
            name: name.to_string(),
            text: text.into(),
        }
    }

    /// Parse an ASS timestamp (H:MM:SS.cc) to milliseconds
    pub fn parse_timestamp(timestamp: &str) -> Result<u64> {
        let caps = TIMESTAMP_REGEX
            .captures(timestamp.trim())
            .ok_or_else(|| anyhow!("Invalid timestamp format: {}", timestamp))?;

        let hours: u64 = caps[1].parse().context("Failed to parse hours")?;
        let minutes: u64 = caps[2].parse().context("Failed to parse minutes")?;
        let seconds: u64 = caps[3].parse().context("Failed to parse seconds")?;
        let centis: u64 = caps[4].parse().context("Failed to parse centiseconds")?;

        if minutes >= 60 || seconds >= 60 {
            return Err(anyhow!("Invalid time components in timestamp: {}", timestamp));
        }

        Ok(hours * 3_600_000 + minutes * 60_000 + seconds * 1_000 + centis * 10)
    }

    /// Format milliseconds as an ASS timestamp, rounded to centiseconds
    pub fn format_timestamp(ms: u64) -> String {
        let centis = (ms + 5) / 10;
        let hours = centis / 360_000;
        let minutes = (centis % 360_000) / 6_000;
        let seconds = (centis % 6_000) / 100;
        let centis = centis % 100;

        format!("{}:{:02}:{:02}.{:02}", hours, minutes, seconds, centis)
    }
}

impl fmt::Display for SubtitleEvent {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "Dialogue: 0,{},{},{},{},0,0,0,,{}",
            Self::format_timestamp(self.start_time_ms),
            Self::format_timestamp(self.end_time_ms),
            self.style,
            self.name,
            self.text.replace('\n', "\\N"),
        )
    }
}

/// An ASS subtitle track: script info, styles and events
#[derive(Debug, Clone, Default)]
pub struct SubtitleTrack {
    /// `[Script Info]` key/values in insertion order
    pub info: Vec<(String, String)>,

    /// Named styles
    pub styles: Vec<SubtitleStyle>,

    /// Dialogue events
    pub events: Vec<SubtitleEvent>,
}

impl SubtitleTrack {
    /// An empty track with the built-in caption styles
    pub fn blank() -> Self {
        let mut track = SubtitleTrack::default();
        track.set_info("ScriptType", "v4.00+");
        track.set_info("WrapStyle", "0");
        track.set_info("ScaledBorderAndShadow", "yes");
        track.set_info("PlayResX", "1920");
        track.set_info("PlayResY", "1080");
        track.styles = vec![
            SubtitleStyle::new("Old English", 64.0, 8, false),
            SubtitleStyle::new("Modern English", 52.0, 2, false),
            SubtitleStyle::new("Big Numbers", 120.0, 9, true),
            SubtitleStyle::new("All Numbers", 36.0, 3, false),
            SubtitleStyle::new("Fitt Headings", 80.0, 5, true),
        ];
        track
    }

    /// Load a blank container from an ASS template, dropping its events.
    /// Falls back to [`SubtitleTrack::blank`] when the template doesn't exist.
    pub fn load_template<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            debug!("No subtitle template at {}, using built-in styles", path.display());
            return Ok(Self::blank());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read subtitle template: {}", path.display()))?;
        let mut track = Self::parse_ass_string(&content)
            .with_context(|| format!("Failed to parse subtitle template: {}", path.display()))?;
        track.events.clear();
        Ok(track)
    }

    /// Parse the script info and styles of an ASS document. Events are not
    /// read back; templates only contribute their header.
    pub fn parse_ass_string(content: &str) -> Result<Self> {
        let mut track = SubtitleTrack::default();
        let mut section = String::new();
        let mut style_format: Vec<String> = Vec::new();

        for (line_no, line) in content.lines().enumerate() {
            let trimmed = line.trim().trim_start_matches('\u{feff}');
            if trimmed.is_empty() || trimmed.starts_with(';') {
                continue;
            }

            if trimmed.starts_with('[') && trimmed.ends_with(']') {
                section = trimmed.to_string();
                continue;
            }

            let Some((key, value)) = trimmed.split_once(':') else {
                warn!("Ignoring malformed ASS line {}: {}", line_no + 1, trimmed);
                continue;
            };
            let value = value.trim();

            match section.as_str() {
                "[Script Info]" => track.set_info(key.trim(), value),
                "[V4+ Styles]" | "[V4 Styles]" => match key.trim() {
                    "Format" => {
                        style_format = value.split(',').map(|f| f.trim().to_string()).collect();
                    }
                    "Style" => {
                        if style_format.is_empty() {
                            return Err(anyhow!("Style before Format at line {}", line_no + 1));
                        }
                        let values: Vec<&str> = value.split(',').collect();
                        track.styles.push(SubtitleStyle::from_fields(&style_format, &values)?);
                    }
                    _ => {}
                },
                _ => {}
            }
        }

        if !track.info.iter().any(|(key, _)| key == "ScriptType") {
            return Err(anyhow!("Missing ScriptType in [Script Info]"));
        }

        Ok(track)
    }

    /// Set a `[Script Info]` field, replacing an existing value
    pub fn set_info(&mut self, key: &str, value: impl Into<String>) {
        let value = value.into();
        match self.info.iter_mut().find(|(existing, _)| existing == key) {
            Some(entry) => entry.1 = value,
            None => self.info.push((key.to_string(), value)),
        }
    }

    /// Value of a `[Script Info]` field
    pub fn info(&self, key: &str) -> Option<&str> {
        self.info
            .iter()
            .find(|(existing, _)| existing == key)
            .map(|(_, value)| value.as_str())
    }

    /// Whether a style with this name is defined
    pub fn has_style(&self, name: &str) -> bool {
        self.styles.iter().any(|style| style.name == name)
    }

    /// Write the track to an ASS file
    pub fn write_to_ass<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }
        fs::write(path, self.to_string())
            .with_context(|| format!("Failed to write subtitle file: {}", path.display()))
    }
}

impl fmt::Display for SubtitleTrack {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "[Script Info]")?;
        writeln!(f, "; Script generated by voxbeowulf")?;
        for (key, value) in &self.info {
            writeln!(f, "{}: {}", key, value)?;
        }
        writeln!(f)?;

        writeln!(f, "[V4+ Styles]")?;
        writeln!(f, "Format: {}", STYLE_FORMAT)?;
        for style in &self.styles {
            writeln!(f, "{}", style)?;
        }
        writeln!(f)?;

        writeln!(f, "[Events]")?;
        writeln!(f, "Format: {}", EVENT_FORMAT)?;
        for event in &self.events {
            writeln!(f, "{}", event)?;
        }
        Ok(())
    }
}
