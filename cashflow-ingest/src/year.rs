//! Statement-year inference for layouts whose rows carry only MM/DD.

use regex::Regex;

/// Years accepted from file names are `20YY`, i.e. [2000, 2100).
const FILENAME_PATTERNS: [&str; 3] = [
    // 2026-02-07, 2026_02_07, 2026.02.07
    r"(?:^|\D)(20\d{2})[-_.]\d{2}[-_.]\d{2}(?:\D|$)",
    // 2026-02, 2026_02
    r"(?:^|\D)(20\d{2})[-_.]\d{2}(?:\D|$)",
    // bare 2026
    r"(?:^|\D)(20\d{2})(?:\D|$)",
];

/// Where the year for a document came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum YearSource {
    Filename,
    Header,
    Fallback,
}

/// Compiled date-token patterns for file names and statement headers.
#[derive(Debug)]
pub struct YearPatterns {
    filename: Vec<Regex>,
    header_short_date: Regex,
    header_year: Regex,
}

impl YearPatterns {
    pub fn new() -> Result<Self, regex::Error> {
        Ok(Self {
            filename: FILENAME_PATTERNS
                .iter()
                .map(|p| Regex::new(p))
                .collect::<Result<_, _>>()?,
            header_short_date: Regex::new(r"\b(\d{2})/(\d{2})/(\d{2})\b")?,
            header_year: Regex::new(r"\b(\d{4})\b")?,
        })
    }

    /// First year found in a file name, most specific pattern first.
    pub fn from_filename(&self, name: &str) -> Option<i32> {
        self.filename
            .iter()
            .find_map(|re| re.captures(name))
            .and_then(|caps| caps[1].parse().ok())
    }

    /// Year from header text: an `MM/DD/YY` token (YY < 70 is 20YY), else
    /// the first bare 4-digit year in [2000, 2100].
    pub fn from_header(&self, header: &str) -> Option<i32> {
        if let Some(caps) = self.header_short_date.captures(header) {
            let yy: i32 = caps[3].parse().ok()?;
            return Some(if yy < 70 { 2000 + yy } else { 1900 + yy });
        }

        self.header_year
            .captures_iter(header)
            .filter_map(|caps| caps[1].parse::<i32>().ok())
            .find(|y| (2000..=2100).contains(y))
    }
}

/// Pick the document year from the two candidate sources.
///
/// The header year only overrides the file-name year when they are within one
/// year of each other (statement cycles straddling New Year).
pub fn resolve_year(
    from_filename: Option<i32>,
    from_header: Option<i32>,
    fallback: i32,
) -> (i32, YearSource) {
    match (from_filename, from_header) {
        (Some(file), Some(head)) if (head - file).abs() <= 1 => (head, YearSource::Header),
        (Some(file), _) => (file, YearSource::Filename),
        (None, Some(head)) => (head, YearSource::Header),
        (None, None) => (fallback, YearSource::Fallback),
    }
}
