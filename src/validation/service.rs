/*!
 * Validation suite that runs the invariant checks and collects a report.
 *
 * Checks never mutate the data and never stop one another: a batch run
 * always evaluates every check, whatever the earlier ones found.
 */

use std::fmt;

use log::{debug, error, info};

use crate::line_extractor::LineRecord;

use super::checks::{Check, ValidationIssue};
use super::context::ValidationContext;

/// Result of running one check
#[derive(Debug, Clone)]
pub struct CheckOutcome {
    /// The check that ran
    pub check: Check,
    /// Issues found; empty when the check holds
    pub issues: Vec<ValidationIssue>,
}

impl CheckOutcome {
    pub fn passed(&self) -> bool {
        self.issues.is_empty()
    }
}

impl fmt::Display for CheckOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.passed() {
            return write!(f, "✓ {}", self.check.name());
        }
        write!(f, "✗ {}: {} issue(s)", self.check.name(), self.issues.len())?;
        for issue in &self.issues {
            write!(f, "\n    {}", issue)?;
        }
        Ok(())
    }
}

/// Complete validation report for a canonical sequence
#[derive(Debug, Clone)]
pub struct ValidationReport {
    /// Number of records validated
    pub total_lines: usize,
    /// One outcome per check, in run order
    pub outcomes: Vec<CheckOutcome>,
}

impl ValidationReport {
    /// Whether every check held
    pub fn all_passed(&self) -> bool {
        self.outcomes.iter().all(CheckOutcome::passed)
    }

    /// Outcomes of the checks that failed
    pub fn failures(&self) -> impl Iterator<Item = &CheckOutcome> {
        self.outcomes.iter().filter(|o| !o.passed())
    }

    /// Outcome of a given check, if it ran
    pub fn outcome(&self, check: Check) -> Option<&CheckOutcome> {
        self.outcomes.iter().find(|o| o.check == check)
    }

    /// Get a summary string
    pub fn summary(&self) -> String {
        let failed = self.failures().count();
        format!(
            "Validation: {}/{} checks passed over {} lines",
            self.outcomes.len() - failed,
            self.outcomes.len(),
            self.total_lines
        )
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for outcome in &self.outcomes {
            writeln!(f, "{}", outcome)?;
        }
        write!(f, "{}", self.summary())
    }
}

/// Runs checks against one validation context
pub struct ValidationSuite {
    context: ValidationContext,
}

impl ValidationSuite {
    pub fn new(context: ValidationContext) -> Self {
        Self { context }
    }

    /// Suite over an in-memory sequence
    pub fn for_records(records: Vec<LineRecord>) -> Self {
        Self::new(ValidationContext::from_records(records))
    }

    pub fn context(&self) -> &ValidationContext {
        &self.context
    }

    /// Run a single check
    pub fn run_one(&self, check: Check) -> CheckOutcome {
        let issues = check.run(&self.context);
        debug!("Check {} produced {} issue(s)", check.name(), issues.len());
        CheckOutcome { check, issues }
    }

    /// Run every check in order and collect the outcomes
    pub fn run_all(&self) -> ValidationReport {
        let outcomes: Vec<CheckOutcome> = Check::ALL.into_iter().map(|check| self.run_one(check)).collect();

        for outcome in &outcomes {
            if outcome.passed() {
                info!("Check passed: {}", outcome.check.name());
            } else {
                error!(
                    "Check failed: {} ({} issue(s))",
                    outcome.check.name(),
                    outcome.issues.len()
                );
            }
        }

        ValidationReport {
            total_lines: self.context.records.len(),
            outcomes,
        }
    }
}
