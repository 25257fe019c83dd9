//! Marker scanner: text in, marker occurrences out.
//!
//! Every line is classified independently against the configured
//! [`MarkerSet`], so the scan is a pure function of the text and the prefixes.

use crate::types::{Marker, MarkerSet, TextSource};

/// Scan a line-addressable source for conflict markers, in line order.
pub fn scan<T: TextSource + ?Sized>(source: &T, markers: &MarkerSet) -> Vec<Marker> {
    (0..source.line_count())
        .filter_map(|line| {
            let text = source.line_at(line);
            markers.classify(text).map(|kind| Marker {
                line,
                kind,
                raw_text: text.to_string(),
            })
        })
        .collect()
}

/// Scan a whole string, splitting on `\n` (a trailing `\r` is kept on the line).
pub fn scan_str(text: &str, markers: &MarkerSet) -> Vec<Marker> {
    let lines: Vec<&str> = text.split('\n').collect();
    scan(lines.as_slice(), markers)
}
