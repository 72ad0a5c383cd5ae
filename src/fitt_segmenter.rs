use crate::errors::FittError;
use crate::line_extractor::LineRecord;
use crate::numbering::{FittBoundary, FITT_BOUNDARIES, MAX_FITT, RESERVED_FITT};

// @module: Mapping of the flat line sequence onto fitts

/// Look up the boundary of a fitt, rejecting the reserved and out-of-range indices
pub fn fitt_boundary(fitt_id: usize) -> Result<&'static FittBoundary, FittError> {
    if fitt_id == RESERVED_FITT {
        return Err(FittError::Reserved(fitt_id));
    }
    FITT_BOUNDARIES
        .get(fitt_id)
        .ok_or(FittError::OutOfRange { index: fitt_id, max: MAX_FITT })
}

/// Records of one fitt, `start_line..=end_line` of the numbering table.
///
/// `lines` is expected to be the canonical sequence with the sentinel at index
/// 0. A sequence shorter than the fitt yields only the records it has.
pub fn get_fitt(fitt_id: usize, lines: &[LineRecord]) -> Result<&[LineRecord], FittError> {
    let boundary = fitt_boundary(fitt_id)?;
    Ok(slice_inclusive(lines, boundary.start_line, boundary.end_line))
}

/// Records for an inclusive line range, clamped to `1..=N`
pub fn get_lines(start: u32, end: u32, lines: &[LineRecord]) -> &[LineRecord] {
    slice_inclusive(lines, start.max(1), end)
}

fn slice_inclusive(lines: &[LineRecord], start: u32, end: u32) -> &[LineRecord] {
    let start = (start as usize).min(lines.len());
    let end = (end as usize).saturating_add(1).min(lines.len());
    if start >= end {
        return &[];
    }
    &lines[start..end]
}
