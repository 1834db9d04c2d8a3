//! Static reference tables: transfer complexes and borough station lists.
//!
//! Both tables are loaded once at startup and are read-only afterwards.
//! Matching iterates entries in the insertion order of the source JSON
//! (first match wins), so decoding preserves object key order.
//!
//! A load failure is never fatal: every consumer treats "no match" as the
//! default, so a missing or unparseable file degrades to an empty table.

use anyhow::{Context, Result};
use serde_json::Value;
use std::fs;
use std::path::Path;
use tracing::{info, warn};

/// A group of station names that represent one physical interchange, with
/// the set of lines serving it.
#[derive(Debug, Clone)]
pub struct TransferComplex {
    pub id: String,
    pub name: String,
    pub lines: Vec<String>,
    pub station_names: Vec<String>,
}

/// Ordered table of transfer complexes, shaped on disk as
/// `{ complexId: { complex_name, lines: [..], station_names: [..] } }`.
#[derive(Debug, Clone, Default)]
pub struct ComplexTable {
    complexes: Vec<TransferComplex>,
}

impl ComplexTable {
    /// Loads the table from a JSON file, degrading to an empty table on any
    /// failure. Called once per process.
    pub fn load(path: &Path) -> Self {
        match Self::try_load(path) {
            Ok(table) => {
                info!(
                    path = %path.display(),
                    complexes = table.complexes.len(),
                    "Transfer complex table loaded"
                );
                table
            }
            Err(e) => {
                warn!(
                    path = %path.display(),
                    error = %e,
                    "Transfer complex table unavailable, no stops will be consolidated"
                );
                Self::default()
            }
        }
    }

    fn try_load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        Self::from_json(&contents)
    }

    /// Parses the table from a JSON string, preserving object key order.
    pub fn from_json(contents: &str) -> Result<Self> {
        let root: Value = serde_json::from_str(contents).context("parsing complex table JSON")?;
        let map = root
            .as_object()
            .context("complex table root must be a JSON object")?;

        let complexes = map
            .iter()
            .filter_map(|(id, entry)| {
                let name = entry["complex_name"].as_str()?.to_string();
                let lines = string_list(&entry["lines"]);
                let station_names = string_list(&entry["station_names"]);
                Some(TransferComplex {
                    id: id.clone(),
                    name,
                    lines,
                    station_names,
                })
            })
            .collect();

        Ok(Self { complexes })
    }

    /// Complexes in table insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &TransferComplex> {
        self.complexes.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.complexes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.complexes.len()
    }
}

/// Ordered table of borough station-name lists, shaped on disk as
/// `{ boroughName: [station names...] }`.
#[derive(Debug, Clone, Default)]
pub struct BoroughTable {
    boroughs: Vec<(String, Vec<String>)>,
}

impl BoroughTable {
    /// Loads the table from a JSON file, degrading to an empty table on any
    /// failure (every station then classifies as "Unknown").
    pub fn load(path: &Path) -> Self {
        match Self::try_load(path) {
            Ok(table) => {
                info!(
                    path = %path.display(),
                    boroughs = table.boroughs.len(),
                    "Borough table loaded"
                );
                table
            }
            Err(e) => {
                warn!(
                    path = %path.display(),
                    error = %e,
                    "Borough table unavailable, stations will classify as Unknown"
                );
                Self::default()
            }
        }
    }

    fn try_load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        Self::from_json(&contents)
    }

    pub fn from_json(contents: &str) -> Result<Self> {
        let root: Value = serde_json::from_str(contents).context("parsing borough table JSON")?;
        let map = root
            .as_object()
            .context("borough table root must be a JSON object")?;

        let boroughs = map
            .iter()
            .map(|(name, stations)| (name.clone(), string_list(stations)))
            .collect();

        Ok(Self { boroughs })
    }

    /// Boroughs in table insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.boroughs
            .iter()
            .map(|(name, stations)| (name.as_str(), stations.as_slice()))
    }

    /// Borough names in table order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.boroughs.iter().map(|(name, _)| name.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.boroughs.is_empty()
    }
}

fn string_list(value: &Value) -> Vec<String> {
    value
        .as_array()
        .map(|items| {
            items
                .iter()
                .filter_map(|v| v.as_str().map(String::from))
                .collect()
        })
        .unwrap_or_default()
}
