//! Reference table loading from CSV.
//!
//! # CSV Structure
//!
//! ```text
//! attribute,label,category,value,aliases
//! geography,Zip/Area Code,10001,21102,
//! gender,Gender,Female,0.5,F|Woman
//! ```
//!
//! - `label` is optional; the attribute name is used when it is absent or blank.
//! - `aliases` is optional: `|`-separated spellings that resolve to the
//!   row's category (e.g. `F` for `Female`).
//! - `value` is either a population count or a proportion. When an
//!   attribute's values sum to more than 1 they are treated as counts and
//!   normalized by their total; otherwise they are used as proportions.

use std::collections::BTreeMap;
use std::io::Cursor;
use std::path::Path;

use serde::Deserialize;

use reweigh_model::ReferenceDistribution;

use crate::error::{ReferenceError, Result};
use crate::provider::ReferenceCatalog;

/// Values summing above this are treated as counts rather than proportions.
const PROPORTION_TOTAL_LIMIT: f64 = 1.0 + 1e-9;

/// Separator between spellings in the `aliases` column.
const ALIAS_SEPARATOR: char = '|';

/// Load a reference source from a CSV file on disk.
pub fn load_reference_csv(path: &Path, label: &str) -> Result<ReferenceCatalog> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            ReferenceError::FileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            ReferenceError::FileRead {
                path: path.to_path_buf(),
                source: e,
            }
        }
    })?;
    load_catalog_from_str(&content, &path.display().to_string(), label)
}

/// Load a reference source from CSV text.
///
/// `origin` names the content in error messages (a file name or path).
pub fn load_catalog_from_str(content: &str, origin: &str, label: &str) -> Result<ReferenceCatalog> {
    let cursor = Cursor::new(content.trim_start_matches('\u{feff}').as_bytes());
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(cursor);

    let mut grouped: BTreeMap<String, GroupedTable> = BTreeMap::new();
    for result in reader.deserialize::<ReferenceCsvRow>() {
        let row = result.map_err(|source| ReferenceError::CsvParse {
            origin: origin.to_string(),
            source,
        })?;
        if row.attribute.is_empty() || row.category.is_empty() {
            continue;
        }
        let value = row
            .value
            .parse::<f64>()
            .map_err(|_| ReferenceError::InvalidValue {
                origin: origin.to_string(),
                attribute: row.attribute.clone(),
                category: row.category.clone(),
                value: row.value.clone(),
            })?;

        let key = row.attribute.to_ascii_lowercase();
        let table = grouped.entry(key).or_insert_with(|| GroupedTable {
            attribute: row.attribute.clone(),
            label: None,
            values: BTreeMap::new(),
            aliases: Vec::new(),
        });
        if table.label.is_none()
            && let Some(label) = row.label.filter(|label| !label.is_empty())
        {
            table.label = Some(label);
        }
        if table.values.insert(row.category.clone(), value).is_some() {
            tracing::warn!(
                origin = %origin,
                attribute = %row.attribute,
                category = %row.category,
                "duplicate reference category; keeping the last value"
            );
        }
        if let Some(aliases) = &row.aliases {
            table.aliases.extend(
                aliases
                    .split(ALIAS_SEPARATOR)
                    .map(str::trim)
                    .filter(|alias| !alias.is_empty())
                    .map(|alias| (alias.to_string(), row.category.clone())),
            );
        }
    }

    if grouped.is_empty() {
        return Err(ReferenceError::EmptySource {
            origin: origin.to_string(),
        });
    }

    let mut catalog = ReferenceCatalog::new(label);
    for table in grouped.into_values() {
        catalog.insert(table.into_distribution(origin)?);
    }
    Ok(catalog)
}

/// Rows collected for one attribute before validation.
struct GroupedTable {
    attribute: String,
    label: Option<String>,
    values: BTreeMap<String, f64>,
    aliases: Vec<(String, String)>,
}

impl GroupedTable {
    fn into_distribution(self, origin: &str) -> Result<ReferenceDistribution> {
        let label = self.label.unwrap_or_else(|| self.attribute.clone());
        let total: f64 = self.values.values().sum();
        let built = if total > PROPORTION_TOTAL_LIMIT {
            ReferenceDistribution::from_counts(self.attribute, label, self.values)
        } else {
            ReferenceDistribution::from_proportions(self.attribute, label, self.values)
        };
        built
            .and_then(|distribution| distribution.with_aliases(self.aliases))
            .map_err(|source| ReferenceError::Distribution {
                origin: origin.to_string(),
                source,
            })
    }
}

/// Row from reference CSV files.
#[derive(Debug, Deserialize)]
struct ReferenceCsvRow {
    attribute: String,
    #[serde(default)]
    label: Option<String>,
    category: String,
    value: String,
    #[serde(default)]
    aliases: Option<String>,
}
