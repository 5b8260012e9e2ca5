use serde::{Deserialize, Serialize};

/// How a column was matched to an attribute.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BindingMethod {
    /// The column name contained (or equalled) a configured keyword.
    ColumnName { keyword: String },
    /// Enough of the column's values matched the attribute's value shape.
    ValueShape { match_ratio: f64 },
}

/// A dataset column bound to a semantic attribute.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttributeBinding {
    pub attribute: String,
    pub column: String,
    pub method: BindingMethod,
}

impl AttributeBinding {
    pub fn by_name(
        attribute: impl Into<String>,
        column: impl Into<String>,
        keyword: impl Into<String>,
    ) -> Self {
        Self {
            attribute: attribute.into(),
            column: column.into(),
            method: BindingMethod::ColumnName {
                keyword: keyword.into(),
            },
        }
    }

    pub fn by_shape(attribute: impl Into<String>, column: impl Into<String>, ratio: f64) -> Self {
        Self {
            attribute: attribute.into(),
            column: column.into(),
            method: BindingMethod::ValueShape { match_ratio: ratio },
        }
    }
}
