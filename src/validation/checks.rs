/*!
 * The fixed battery of invariant checks over a canonical sequence.
 *
 * Each check either holds for the whole sequence or yields issues naming the
 * offending line(s). Checks that stop at the first offender say so.
 */

use std::collections::BTreeSet;
use std::fmt;

use crate::numbering::{self, EXPECTED_LINE_COUNT, OPENING_TOKEN, STRUCTURAL_GAPS};
use crate::text_normalizer::normalize_text;

use super::context::ValidationContext;

/// How many uncovered lines a coverage failure lists
const COVERAGE_SAMPLE: usize = 10;

/// Which text column an issue refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    Original,
    Modern,
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Column::Original => write!(f, "OE"),
            Column::Modern => write!(f, "ME"),
        }
    }
}

/// Types of validation issues
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationIssue {
    /// Record at a position carries the wrong line number
    WrongLineNumber { position: usize, expected: usize, actual: u32 },
    /// Sequence length differs from the expected total
    WrongLineCount { expected: usize, actual: usize },
    /// Persisted record lacks fields
    MissingFields { position: usize, fields: Vec<&'static str> },
    /// Sequence has no record at a required line
    MissingLine { line: u32 },
    /// Text that should be empty is not
    UnexpectedText { line: u32, column: Column, text: String },
    /// Text that should be present is empty
    EmptyText { line: u32, column: Column },
    /// Opening line lacks its known token
    MissingOpeningToken { token: &'static str, text: String },
    /// Fitt boundary outside `0..=N` or inverted
    InvalidFittBoundary { fitt: usize, start: u32, end: u32, max_line: u32 },
    /// Lines no fitt covers
    UncoveredLines { count: usize, sample: Vec<u32> },
    /// Text differs from its normalized form
    NotNormalized { line: u32, column: Column, text: String },
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationIssue::WrongLineNumber { position, expected, actual } => {
                write!(f, "Line {}: expected {}, got {}", position, expected, actual)
            }
            ValidationIssue::WrongLineCount { expected, actual } => {
                write!(f, "Expected {} lines, got {}", expected, actual)
            }
            ValidationIssue::MissingFields { position, fields } => {
                write!(f, "Line {} missing fields: {}", position, fields.join(", "))
            }
            ValidationIssue::MissingLine { line } => write!(f, "Line {} is missing", line),
            ValidationIssue::UnexpectedText { line, column, text } => {
                write!(f, "Line {} {} should be empty, found {:?}", line, column, text)
            }
            ValidationIssue::EmptyText { line, column } => write!(f, "Line {} has empty {} text", line, column),
            ValidationIssue::MissingOpeningToken { token, text } => {
                write!(f, "Line 1 should contain {:?}, found {:?}", token, text)
            }
            ValidationIssue::InvalidFittBoundary { fitt, start, end, max_line } => {
                write!(f, "Fitt {} range {}..={} invalid for lines 0..={}", fitt, start, end, max_line)
            }
            ValidationIssue::UncoveredLines { count, sample } => {
                write!(f, "{} lines not covered by fitts: {:?}", count, sample)?;
                if *count > sample.len() {
                    write!(f, "...")?;
                }
                Ok(())
            }
            ValidationIssue::NotNormalized { line, column, text } => {
                write!(f, "Line {} {} is not normalized: {:?}", line, column, text)
            }
        }
    }
}

/// The invariant checks, in batch order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Check {
    LineNumberingSequential,
    TotalLineCount,
    FittBoundariesValid,
    RequiredFieldsPresent,
    LineZeroEmpty,
    FamousOpeningLine,
    NoEmptyTextOutsideGaps,
    StructuralGapsEmpty,
    FittCoverageComplete,
    TextFieldsNormalized,
}

impl Check {
    /// Every check, in the order a batch runs them
    pub const ALL: [Check; 10] = [
        Check::LineNumberingSequential,
        Check::TotalLineCount,
        Check::FittBoundariesValid,
        Check::RequiredFieldsPresent,
        Check::LineZeroEmpty,
        Check::FamousOpeningLine,
        Check::NoEmptyTextOutsideGaps,
        Check::StructuralGapsEmpty,
        Check::FittCoverageComplete,
        Check::TextFieldsNormalized,
    ];

    /// Stable snake_case identifier
    pub fn name(&self) -> &'static str {
        match self {
            Check::LineNumberingSequential => "line_numbering_sequential",
            Check::TotalLineCount => "total_line_count",
            Check::FittBoundariesValid => "fitt_boundaries_valid",
            Check::RequiredFieldsPresent => "required_fields_present",
            Check::LineZeroEmpty => "line_zero_empty",
            Check::FamousOpeningLine => "famous_opening_line",
            Check::NoEmptyTextOutsideGaps => "no_empty_text_outside_gaps",
            Check::StructuralGapsEmpty => "structural_gaps_empty",
            Check::FittCoverageComplete => "fitt_coverage_complete",
            Check::TextFieldsNormalized => "text_fields_normalized",
        }
    }

    /// Look a check up by its identifier
    pub fn from_name(name: &str) -> Option<Check> {
        Check::ALL.into_iter().find(|check| check.name() == name)
    }

    /// Run the check. An empty result means it holds.
    pub fn run(&self, context: &ValidationContext) -> Vec<ValidationIssue> {
        match self {
            Check::LineNumberingSequential => line_numbering_sequential(context),
            Check::TotalLineCount => total_line_count(context),
            Check::FittBoundariesValid => fitt_boundaries_valid(context),
            Check::RequiredFieldsPresent => required_fields_present(context),
            Check::LineZeroEmpty => line_zero_empty(context),
            Check::FamousOpeningLine => famous_opening_line(context),
            Check::NoEmptyTextOutsideGaps => no_empty_text_outside_gaps(context),
            Check::StructuralGapsEmpty => structural_gaps_empty(context),
            Check::FittCoverageComplete => fitt_coverage_complete(context),
            Check::TextFieldsNormalized => text_fields_normalized(context),
        }
    }
}

impl fmt::Display for Check {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

// Stops at the first offender.
fn line_numbering_sequential(context: &ValidationContext) -> Vec<ValidationIssue> {
    context
        .records
        .iter()
        .enumerate()
        .find(|(position, record)| record.number as usize != *position)
        .map(|(position, record)| ValidationIssue::WrongLineNumber {
            position,
            expected: position,
            actual: record.number,
        })
        .into_iter()
        .collect()
}

fn total_line_count(context: &ValidationContext) -> Vec<ValidationIssue> {
    let actual = context.records.len();
    if actual == EXPECTED_LINE_COUNT {
        return Vec::new();
    }
    vec![ValidationIssue::WrongLineCount { expected: EXPECTED_LINE_COUNT, actual }]
}

// Stops at the first offending fitt.
fn fitt_boundaries_valid(context: &ValidationContext) -> Vec<ValidationIssue> {
    let max_line = context.max_line();
    numbering::fitts()
        .find(|(_, b)| b.start_line > max_line || b.end_line > max_line || b.start_line > b.end_line)
        .map(|(fitt, b)| ValidationIssue::InvalidFittBoundary {
            fitt,
            start: b.start_line,
            end: b.end_line,
            max_line,
        })
        .into_iter()
        .collect()
}

// Reports every incomplete record.
fn required_fields_present(context: &ValidationContext) -> Vec<ValidationIssue> {
    context
        .schema_gaps
        .iter()
        .map(|gap| ValidationIssue::MissingFields {
            position: gap.index,
            fields: gap.missing.clone(),
        })
        .collect()
}

fn line_zero_empty(context: &ValidationContext) -> Vec<ValidationIssue> {
    let Some(record) = context.record(0) else {
        return vec![ValidationIssue::MissingLine { line: 0 }];
    };
    let mut issues = Vec::new();
    if record.number != 0 {
        issues.push(ValidationIssue::WrongLineNumber { position: 0, expected: 0, actual: record.number });
    }
    issues.extend(expect_empty(0, Column::Original, &record.original_text));
    issues.extend(expect_empty(0, Column::Modern, &record.modern_text));
    issues
}

fn famous_opening_line(context: &ValidationContext) -> Vec<ValidationIssue> {
    let Some(record) = context.record(1) else {
        return vec![ValidationIssue::MissingLine { line: 1 }];
    };
    let mut issues = Vec::new();
    if record.number != 1 {
        issues.push(ValidationIssue::WrongLineNumber { position: 1, expected: 1, actual: record.number });
    }
    if !record.original_text.contains(OPENING_TOKEN) {
        issues.push(ValidationIssue::MissingOpeningToken {
            token: OPENING_TOKEN,
            text: record.original_text.clone(),
        });
    }
    if record.modern_text.trim().is_empty() {
        issues.push(ValidationIssue::EmptyText { line: 1, column: Column::Modern });
    }
    issues
}

// Reports every offending line.
fn no_empty_text_outside_gaps(context: &ValidationContext) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();
    for record in context.records.iter().skip(1) {
        if numbering::is_structural_gap(record.number) {
            continue;
        }
        if record.original_text.trim().is_empty() {
            issues.push(ValidationIssue::EmptyText { line: record.number, column: Column::Original });
        }
        if record.modern_text.trim().is_empty() {
            issues.push(ValidationIssue::EmptyText { line: record.number, column: Column::Modern });
        }
    }
    issues
}

fn structural_gaps_empty(context: &ValidationContext) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();
    for &line in STRUCTURAL_GAPS {
        match context.record(line) {
            None => issues.push(ValidationIssue::MissingLine { line }),
            Some(record) => {
                if record.number != line {
                    issues.push(ValidationIssue::WrongLineNumber {
                        position: line as usize,
                        expected: line as usize,
                        actual: record.number,
                    });
                }
                issues.extend(expect_empty(line, Column::Original, &record.original_text));
                issues.extend(expect_empty(line, Column::Modern, &record.modern_text));
            }
        }
    }
    issues
}

fn fitt_coverage_complete(context: &ValidationContext) -> Vec<ValidationIssue> {
    let covered: BTreeSet<u32> = numbering::fitts()
        .flat_map(|(_, b)| b.start_line..=b.end_line)
        .collect();
    let missing: Vec<u32> = (1..=context.max_line()).filter(|line| !covered.contains(line)).collect();
    if missing.is_empty() {
        return Vec::new();
    }
    vec![ValidationIssue::UncoveredLines {
        count: missing.len(),
        sample: missing.into_iter().take(COVERAGE_SAMPLE).collect(),
    }]
}

// Reports every offending field.
fn text_fields_normalized(context: &ValidationContext) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();
    for record in &context.records {
        for (column, text) in [(Column::Original, &record.original_text), (Column::Modern, &record.modern_text)] {
            if normalize_text(text) != *text {
                issues.push(ValidationIssue::NotNormalized {
                    line: record.number,
                    column,
                    text: text.clone(),
                });
            }
        }
    }
    issues
}

fn expect_empty(line: u32, column: Column, text: &str) -> Option<ValidationIssue> {
    (!text.is_empty()).then(|| ValidationIssue::UnexpectedText {
        line,
        column,
        text: text.to_string(),
    })
}
