//! Fuzzy station-name matching against the reference tables.
//!
//! Two names match when they are equal case-insensitively or when either
//! contains the other as a substring. This tolerates the naming variants
//! between data sources ("14 St-Union Sq" vs "14 St-Union Square"), at the
//! price of ambiguity for short names: "14 St" also matches "14 St-8 Av".
//! First match in table insertion order wins, which keeps the output
//! deterministic even when a short name matches several table entries.

use crate::reference::{BoroughTable, ComplexTable, TransferComplex};

/// Borough name returned when no borough list matches a station.
pub const UNKNOWN_BOROUGH: &str = "Unknown";

/// Case-insensitive equality-or-substring test, in both directions.
pub fn names_match(a: &str, b: &str) -> bool {
    if a.is_empty() || b.is_empty() {
        return false;
    }
    let a = a.to_lowercase();
    let b = b.to_lowercase();
    a.contains(&b) || b.contains(&a)
}

/// Classifies a station into a borough, testing boroughs in table insertion
/// order. Returns [`UNKNOWN_BOROUGH`] when nothing matches.
pub fn classify_borough<'t>(station_name: &str, boroughs: &'t BoroughTable) -> &'t str {
    for (borough, stations) in boroughs.iter() {
        if stations.iter().any(|s| names_match(station_name, s)) {
            return borough;
        }
    }
    UNKNOWN_BOROUGH
}

/// Finds the first transfer complex (table insertion order) with a member
/// station name matching the given station.
pub fn find_complex<'t>(
    station_name: &str,
    complexes: &'t ComplexTable,
) -> Option<&'t TransferComplex> {
    complexes.iter().find(|complex| {
        complex
            .station_names
            .iter()
            .any(|member| names_match(station_name, member))
    })
}
