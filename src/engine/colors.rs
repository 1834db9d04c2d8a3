//! Display colors for NYC subway line identifiers.
//!
//! Trunk colors follow the MTA palette; express variants share their local
//! line's color. Unknown identifiers take the shuttle gray.

/// Neutral color used for unrecognized line identifiers.
pub const DEFAULT_COLOR: &str = "#808183";

/// Maps a line identifier to its display color. Deterministic, no state.
pub fn color_for(line: &str) -> &'static str {
    match line.to_uppercase().as_str() {
        // Broadway-Seventh Av (red)
        "1" | "2" | "3" => "#EE352E",
        // Lexington Av (green)
        "4" | "5" | "5X" | "6" | "6X" => "#00933C",
        // Flushing (purple)
        "7" | "7X" => "#B933AD",
        // Eighth Av (blue)
        "A" | "C" | "E" => "#0039A6",
        // Sixth Av (orange)
        "B" | "D" | "F" | "FX" | "M" => "#FF6319",
        // Crosstown (light green)
        "G" => "#6CBE45",
        // Nassau St (brown)
        "J" | "Z" => "#996633",
        // Canarsie (light gray)
        "L" => "#A7A9AC",
        // Broadway (yellow)
        "N" | "Q" | "R" | "W" => "#FCCC0A",
        // Shuttles (dark gray)
        "S" | "FS" | "GS" | "H" => "#808183",
        // Staten Island Railway
        "SI" | "SIR" => "#0039A6",
        // Second Av (turquoise)
        "T" => "#00ADD0",
        _ => DEFAULT_COLOR,
    }
}
