/*!
 * Input handed to every validation check.
 *
 * A context is built once from the persisted record list (or an in-memory
 * sequence) and passed by reference into each check, so checks share no state.
 */

use serde_json::Value;

use crate::line_extractor::LineRecord;

/// Field names every persisted record must carry
pub const REQUIRED_FIELDS: [&str; 3] = ["line", "OE", "ME"];

/// Record whose persisted form lacks required fields
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaGap {
    /// Position of the record in the persisted array
    pub index: usize,
    /// Fields that were missing or of the wrong type
    pub missing: Vec<&'static str>,
}

/// Canonical sequence under validation
#[derive(Debug, Clone)]
pub struct ValidationContext {
    /// Records in persisted order
    pub records: Vec<LineRecord>,
    /// Schema problems found while reading persisted records
    pub schema_gaps: Vec<SchemaGap>,
}

impl ValidationContext {
    /// Context over an in-memory sequence; typed records are complete by construction
    pub fn from_records(records: Vec<LineRecord>) -> Self {
        Self {
            records,
            schema_gaps: Vec::new(),
        }
    }

    /// Context over untyped persisted records.
    ///
    /// Missing or mistyped fields are recorded as [`SchemaGap`]s and replaced
    /// by defaults (number = array position, empty texts), so that every other
    /// check can still run over the whole sequence.
    pub fn from_values(values: &[Value]) -> Self {
        let mut records = Vec::with_capacity(values.len());
        let mut schema_gaps = Vec::new();

        for (index, value) in values.iter().enumerate() {
            let number = value
                .get("line")
                .and_then(Value::as_u64)
                .and_then(|n| u32::try_from(n).ok());
            let original = value.get("OE").and_then(Value::as_str);
            let modern = value.get("ME").and_then(Value::as_str);

            let missing: Vec<&'static str> = REQUIRED_FIELDS
                .iter()
                .zip([number.is_some(), original.is_some(), modern.is_some()])
                .filter(|(_, present)| !present)
                .map(|(field, _)| *field)
                .collect();
            if !missing.is_empty() {
                schema_gaps.push(SchemaGap { index, missing });
            }

            records.push(LineRecord::new(
                number.unwrap_or(index as u32),
                original.unwrap_or_default(),
                modern.unwrap_or_default(),
            ));
        }

        Self { records, schema_gaps }
    }

    /// Highest line number, i.e. N for a sequence `0..=N`
    pub fn max_line(&self) -> u32 {
        self.records.len().saturating_sub(1) as u32
    }

    /// Record stored for `line`, looked up by position
    pub fn record(&self, line: u32) -> Option<&LineRecord> {
        self.records.get(line as usize)
    }
}
