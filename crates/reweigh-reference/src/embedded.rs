//! Reference data embedded at compile time.
//!
//! Built-in sources are compiled into the binary with `include_str!()` so the
//! default evaluation needs no runtime file lookup.

use crate::error::{ReferenceError, Result};
use crate::loader::load_catalog_from_str;
use crate::provider::ReferenceCatalog;

/// US Census demo table: population by zip code plus gender parity.
pub const US_CENSUS: &str = include_str!("../data/us_census.csv");

/// A reference source shipped with the crate.
#[derive(Debug, Clone, Copy)]
pub struct BuiltinSource {
    /// Display label.
    pub label: &'static str,
    /// Alternative spellings accepted on the command line.
    pub aliases: &'static [&'static str],
    /// File name used in error messages.
    pub filename: &'static str,
    pub content: &'static str,
}

/// All built-in sources, default first.
pub const BUILTIN_SOURCES: &[BuiltinSource] = &[BuiltinSource {
    label: "US Census",
    aliases: &["us-census", "us_census", "census"],
    filename: "us_census.csv",
    content: US_CENSUS,
}];

/// Label of the source used when none is requested.
pub const DEFAULT_SOURCE: &str = "US Census";

impl BuiltinSource {
    fn matches(&self, label: &str) -> bool {
        let wanted = label.trim();
        self.label.eq_ignore_ascii_case(wanted)
            || self
                .aliases
                .iter()
                .any(|alias| alias.eq_ignore_ascii_case(wanted))
    }

    /// Parse the embedded table into a catalog.
    pub fn load(&self) -> Result<ReferenceCatalog> {
        load_catalog_from_str(self.content, self.filename, self.label)
    }
}

/// Find a built-in source by label or alias, ignoring case.
pub fn find_builtin(label: &str) -> Option<&'static BuiltinSource> {
    BUILTIN_SOURCES.iter().find(|source| source.matches(label))
}

/// Resolve and load a built-in source.
pub fn builtin_source(label: &str) -> Result<ReferenceCatalog> {
    let Some(source) = find_builtin(label) else {
        let available = BUILTIN_SOURCES
            .iter()
            .map(|source| source.label)
            .collect::<Vec<_>>()
            .join(", ");
        return Err(ReferenceError::UnknownSource {
            label: label.to_string(),
            available,
        });
    };
    source.load()
}
