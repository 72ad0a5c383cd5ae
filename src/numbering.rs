/*!
 * Static numbering reference data for the poem.
 *
 * Fitt boundaries follow the manuscript's section numerals. The manuscript
 * has no fitt XXIV, so index 24 is a reserved placeholder, and the section
 * numbered XXIX/XXX is a single stretch of text shared by indices 29 and 30.
 */

use std::collections::BTreeMap;

use once_cell::sync::Lazy;

/// Index of the fitt that does not exist in the manuscript
pub const RESERVED_FITT: usize = 24;

/// Highest fitt index
pub const MAX_FITT: usize = 43;

/// Last verse line of the poem
pub const MAX_LINE: u32 = 3182;

/// Number of records in a complete canonical sequence (sentinel included)
pub const EXPECTED_LINE_COUNT: usize = MAX_LINE as usize + 1;

/// Line numbers that have no surviving manuscript text
pub const STRUCTURAL_GAPS: &[u32] = &[2229];

/// Token the first verse line must contain
pub const OPENING_TOKEN: &str = "Hwæt!";

/// Every n-th line carries a big-number marker
const MARKER_INTERVAL: u32 = 10;

/// Inclusive line range and display heading of one fitt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FittBoundary {
    pub start_line: u32,
    pub end_line: u32,
    pub heading: &'static str,
}

impl FittBoundary {
    const fn new(start_line: u32, end_line: u32, heading: &'static str) -> Self {
        Self { start_line, end_line, heading }
    }
}

/// Fitt boundaries indexed by fitt number. Entry [`RESERVED_FITT`] is a
/// placeholder and must be skipped; see [`fitts`].
pub const FITT_BOUNDARIES: [FittBoundary; MAX_FITT + 1] = [
    FittBoundary::new(1, 52, "Prologue"),
    FittBoundary::new(53, 114, "Fitt I"),
    FittBoundary::new(115, 188, "Fitt II"),
    FittBoundary::new(189, 257, "Fitt III"),
    FittBoundary::new(258, 319, "Fitt IV"),
    FittBoundary::new(320, 370, "Fitt V"),
    FittBoundary::new(371, 455, "Fitt VI"),
    FittBoundary::new(456, 498, "Fitt VII"),
    FittBoundary::new(499, 558, "Fitt VIII"),
    FittBoundary::new(559, 661, "Fitt IX"),
    FittBoundary::new(662, 709, "Fitt X"),
    FittBoundary::new(710, 790, "Fitt XI"),
    FittBoundary::new(791, 836, "Fitt XII"),
    FittBoundary::new(837, 924, "Fitt XIII"),
    FittBoundary::new(925, 990, "Fitt XIV"),
    FittBoundary::new(991, 1049, "Fitt XV"),
    FittBoundary::new(1050, 1124, "Fitt XVI"),
    FittBoundary::new(1125, 1191, "Fitt XVII"),
    FittBoundary::new(1192, 1250, "Fitt XVIII"),
    FittBoundary::new(1251, 1320, "Fitt XIX"),
    FittBoundary::new(1321, 1382, "Fitt XX"),
    FittBoundary::new(1383, 1472, "Fitt XXI"),
    FittBoundary::new(1473, 1556, "Fitt XXII"),
    FittBoundary::new(1557, 1739, "Fitt XXIII"),
    // no fitt XXIV in the manuscript
    FittBoundary::new(0, 0, ""),
    FittBoundary::new(1740, 1816, "Fitt XXV"),
    FittBoundary::new(1817, 1887, "Fitt XXVI"),
    FittBoundary::new(1888, 1962, "Fitt XXVII"),
    FittBoundary::new(1963, 2038, "Fitt XXVIII"),
    FittBoundary::new(2039, 2143, "Fitt XXIX/XXX"),
    FittBoundary::new(2039, 2143, "Fitt XXIX/XXX"),
    FittBoundary::new(2144, 2220, "Fitt XXXI"),
    FittBoundary::new(2221, 2311, "Fitt XXXII"),
    FittBoundary::new(2312, 2390, "Fitt XXXIII"),
    FittBoundary::new(2391, 2459, "Fitt XXXIV"),
    FittBoundary::new(2460, 2601, "Fitt XXXV"),
    FittBoundary::new(2602, 2693, "Fitt XXXVI"),
    FittBoundary::new(2694, 2751, "Fitt XXXVII"),
    FittBoundary::new(2752, 2820, "Fitt XXXVIII"),
    FittBoundary::new(2821, 2891, "Fitt XXXIX"),
    FittBoundary::new(2892, 2945, "Fitt XL"),
    FittBoundary::new(2946, 3057, "Fitt XLI"),
    FittBoundary::new(3058, 3136, "Fitt XLII"),
    FittBoundary::new(3137, 3182, "Fitt XLIII"),
];

static LINE_NUMBER_MARKERS: Lazy<BTreeMap<u32, String>> = Lazy::new(|| {
    (MARKER_INTERVAL..=MAX_LINE)
        .step_by(MARKER_INTERVAL as usize)
        .map(|line| (line, line.to_string()))
        .collect()
});

/// Iterate over every real fitt as `(index, boundary)`, skipping the reserved one
pub fn fitts() -> impl Iterator<Item = (usize, &'static FittBoundary)> {
    FITT_BOUNDARIES
        .iter()
        .enumerate()
        .filter(|(index, _)| *index != RESERVED_FITT)
}

/// Big-number label shown for `line`, if it has one
pub fn line_number_marker(line: u32) -> Option<&'static str> {
    LINE_NUMBER_MARKERS.get(&line).map(String::as_str)
}

/// Whether `line` is a declared structural gap
pub fn is_structural_gap(line: u32) -> bool {
    STRUCTURAL_GAPS.contains(&line)
}
