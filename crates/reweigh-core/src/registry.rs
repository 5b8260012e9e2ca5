//! Registry of attributes the engine knows how to detect and correct.
//!
//! Each entry carries the name keywords and optional value shape used by the
//! detector. Detection, comparison, and weighting iterate the registry
//! uniformly, so a new attribute (e.g. an age bracket) is one more entry.

use serde::{Deserialize, Serialize};

/// How configured keywords are matched against column names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NameMatch {
    /// Column name contains the keyword (case-insensitive).
    #[default]
    Contains,
    /// Column name equals the keyword (case-insensitive, trimmed).
    Exact,
}

impl NameMatch {
    pub fn matches(self, column: &str, keyword: &str) -> bool {
        let column = column.trim().to_lowercase();
        let keyword = keyword.trim().to_lowercase();
        if keyword.is_empty() {
            return false;
        }
        match self {
            NameMatch::Contains => column.contains(&keyword),
            NameMatch::Exact => column == keyword,
        }
    }
}

/// Predicate over a category value used when no column name matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueShape {
    /// Exactly this many ASCII digits (e.g. 5 for US zip codes).
    Digits(usize),
}

impl ValueShape {
    pub fn matches(self, value: &str) -> bool {
        match self {
            ValueShape::Digits(len) => {
                let trimmed = value.trim();
                trimmed.len() == len && trimmed.bytes().all(|b| b.is_ascii_digit())
            }
        }
    }

    pub fn describe(self) -> String {
        match self {
            ValueShape::Digits(len) => format!("{len} ASCII digits"),
        }
    }
}

fn default_imbalance_threshold() -> f64 {
    5.0
}

/// Detection and reporting settings for one semantic attribute.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AttributeSpec {
    /// Attribute name; also the key used to query the reference provider.
    pub name: String,
    /// Display label; the name is used when blank.
    #[serde(default)]
    pub label: String,
    /// Column name keywords.
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub name_match: NameMatch,
    #[serde(default)]
    pub value_shape: Option<ValueShape>,
    /// Deviation in percentage points above which the report flags an imbalance.
    #[serde(default = "default_imbalance_threshold")]
    pub imbalance_threshold_pct: f64,
}

impl AttributeSpec {
    pub fn new(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            keywords: Vec::new(),
            name_match: NameMatch::default(),
            value_shape: None,
            imbalance_threshold_pct: default_imbalance_threshold(),
        }
    }

    #[must_use]
    pub fn with_keywords<I, S>(mut self, keywords: I, name_match: NameMatch) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.keywords = keywords.into_iter().map(Into::into).collect();
        self.name_match = name_match;
        self
    }

    #[must_use]
    pub fn with_value_shape(mut self, shape: ValueShape) -> Self {
        self.value_shape = Some(shape);
        self
    }

    #[must_use]
    pub fn with_imbalance_threshold(mut self, threshold_pct: f64) -> Self {
        self.imbalance_threshold_pct = threshold_pct;
        self
    }

    pub fn display_label(&self) -> &str {
        if self.label.trim().is_empty() {
            &self.name
        } else {
            &self.label
        }
    }

    /// First configured keyword matching `column`, if any.
    pub fn matching_keyword(&self, column: &str) -> Option<&str> {
        self.keywords
            .iter()
            .find(|keyword| self.name_match.matches(column, keyword))
            .map(String::as_str)
    }

    /// Zip or area code columns; falls back to 5-digit values.
    pub fn geography() -> Self {
        Self::new("geography", "Zip/Area Code")
            .with_keywords(["zip", "area"], NameMatch::Contains)
            .with_value_shape(ValueShape::Digits(5))
            .with_imbalance_threshold(1.0)
    }

    /// Gender or sex columns, matched by exact name only.
    pub fn gender() -> Self {
        Self::new("gender", "Gender")
            .with_keywords(["gender", "sex"], NameMatch::Exact)
            .with_imbalance_threshold(5.0)
    }
}

/// Ordered attribute registry; order decides binding priority and report order.
#[derive(Debug, Clone, PartialEq)]
pub struct AttributeRegistry {
    specs: Vec<AttributeSpec>,
}

impl Default for AttributeRegistry {
    fn default() -> Self {
        Self::new(vec![AttributeSpec::geography(), AttributeSpec::gender()])
    }
}

impl AttributeRegistry {
    pub fn new(specs: Vec<AttributeSpec>) -> Self {
        Self { specs }
    }

    pub fn empty() -> Self {
        Self { specs: Vec::new() }
    }

    /// Append an entry, replacing any existing entry with the same name.
    pub fn register(&mut self, spec: AttributeSpec) {
        if let Some(existing) = self
            .specs
            .iter_mut()
            .find(|existing| existing.name.eq_ignore_ascii_case(&spec.name))
        {
            *existing = spec;
        } else {
            self.specs.push(spec);
        }
    }

    #[must_use]
    pub fn with(mut self, spec: AttributeSpec) -> Self {
        self.register(spec);
        self
    }

    pub fn get(&self, name: &str) -> Option<&AttributeSpec> {
        self.specs
            .iter()
            .find(|spec| spec.name.eq_ignore_ascii_case(name))
    }

    pub fn iter(&self) -> impl Iterator<Item = &AttributeSpec> {
        self.specs.iter()
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_match_modes() {
        assert!(NameMatch::Contains.matches("Home_ZIP", "zip"));
        assert!(NameMatch::Contains.matches("AreaCode", "area"));
        assert!(!NameMatch::Exact.matches("gender_code", "gender"));
        assert!(NameMatch::Exact.matches(" Gender ", "gender"));
        assert!(!NameMatch::Contains.matches("anything", ""));
    }

    #[test]
    fn digit_shape() {
        let shape = ValueShape::Digits(5);
        assert!(shape.matches("02134"));
        assert!(shape.matches(" 10001 "));
        assert!(!shape.matches("1000"));
        assert!(!shape.matches("1000a"));
        assert!(!shape.matches("１２３４５"));
    }

    #[test]
    fn default_registry_order() {
        let registry = AttributeRegistry::default();
        let names: Vec<&str> = registry.iter().map(|spec| spec.name.as_str()).collect();
        assert_eq!(names, vec!["geography", "gender"]);
        assert_eq!(
            registry.get("GENDER").unwrap().matching_keyword("Sex"),
            Some("sex")
        );
    }

    #[test]
    fn register_replaces_by_name() {
        let mut registry = AttributeRegistry::default();
        registry.register(AttributeSpec::new("gender", "Sex").with_imbalance_threshold(2.0));
        registry.register(AttributeSpec::new("age_band", "Age Band"));
        assert_eq!(registry.len(), 3);
        assert_eq!(registry.get("gender").unwrap().label, "Sex");
    }
}
