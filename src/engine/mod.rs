//! Stop consolidation and borough/line classification.
//!
//! Pure, synchronous transformations over already-fetched inputs: fuzzy
//! station-name matching against the static reference tables, per-station
//! line-usage counting, and merging of same-complex stops into consolidated
//! display rows.

pub mod colors;
pub mod consolidate;
pub mod matching;
pub mod usage;
