/*!
 * Validation of a canonical line sequence.
 *
 * Every check receives an explicit [`ValidationContext`] and reports issues
 * naming the offending lines instead of aborting.
 *
 * # Architecture
 *
 * - `context`: Records under test plus schema findings from the persisted form
 * - `checks`: The invariant checks and their issue types
 * - `service`: Runs checks singly or as a batch and builds the report
 */

pub mod checks;
pub mod context;
pub mod service;

// Re-export main types
pub use checks::{Check, Column, ValidationIssue};
pub use context::{SchemaGap, ValidationContext, REQUIRED_FIELDS};
pub use service::{CheckOutcome, ValidationReport, ValidationSuite};
