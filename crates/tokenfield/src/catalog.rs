//! Filter catalog: which filter types exist and how they are used.
//!
//! A catalog maps filter type ids to their label, operators and static value
//! options, in declaration order. An operator may carry its own value options. A filter group picks one type, one operator
//! of that type and one or more values.
//!
//! ```
//! use tokenfield::FilterCatalog;
//!
//! let catalog = FilterCatalog::from_toml_str(
//!     r#"
//!     [author]
//!     label = "Author"
//!     options = ["ann", "bob"]
//!
//!     [author.operators.is]
//!     label = "is"
//!     select_multiple = false
//!
//!     [author.operators.any_of]
//!     label = "is any of"
//!     select_multiple = true
//!     "#,
//! )
//! .unwrap();
//!
//! assert_eq!(catalog.allows_multiple("author", "any_of"), Some(true));
//! ```

use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::config::TermConfig;
use crate::error::{ConfigError, ConfigResult};
use crate::logging::targets;

/// Source format of a catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogFormat {
    Json,
    Toml,
}

/// One operator of a filter type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperatorDefinition {
    #[serde(default)]
    pub label: String,
    /// Whether the value term holds several values. Must be given.
    #[serde(default, alias = "selectMultiple")]
    pub select_multiple: Option<bool>,
    /// Values offered with this operator instead of the type's options.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<Value>>,
}

/// One filter type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterDefinition {
    #[serde(default)]
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default)]
    pub operators: Option<IndexMap<String, OperatorDefinition>>,
    /// Values offered to the value term.
    #[serde(default)]
    pub options: Vec<Value>,
}

impl FilterDefinition {
    fn validate(&self, id: &str) -> ConfigResult<()> {
        let Some(operators) = &self.operators else {
            return Err(ConfigError::MissingOperators { filter: id.to_string() });
        };
        for (operator_id, operator) in operators {
            if operator.label.is_empty() {
                return Err(ConfigError::invalid_operator(id, operator_id, "label is empty"));
            }
            if operator.select_multiple.is_none() {
                return Err(ConfigError::invalid_operator(
                    id,
                    operator_id,
                    "select_multiple must be a boolean",
                ));
            }
        }
        Ok(())
    }

    fn operator(&self, id: &str) -> Option<&OperatorDefinition> {
        self.operators.as_ref()?.get(id)
    }
}

/// The set of valid filters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FilterCatalog {
    filters: IndexMap<String, FilterDefinition>,
}

impl FilterCatalog {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a filter type using builder pattern.
    pub fn with_filter(mut self, id: impl Into<String>, filter: FilterDefinition) -> Self {
        self.filters.insert(id.into(), filter);
        self
    }

    /// Parse and validate a JSON catalog.
    pub fn from_json_str(source: &str) -> ConfigResult<Self> {
        let catalog: Self = serde_json::from_str(source)?;
        catalog.validate()?;
        Ok(catalog)
    }

    /// Parse and validate a TOML catalog.
    pub fn from_toml_str(source: &str) -> ConfigResult<Self> {
        let catalog: Self = toml::from_str(source)?;
        catalog.validate()?;
        Ok(catalog)
    }

    /// Read and validate a catalog file; the extension picks the format.
    pub fn from_path(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|e| ConfigError::io(path, e))?;
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Self::from_json_str(&source),
            Some("toml") => Self::from_toml_str(&source),
            _ => Err(ConfigError::UnsupportedFormat {
                path: path.to_path_buf(),
            }),
        }
    }

    /// Parse a catalog, dropping invalid filter types with a warning instead
    /// of failing.
    pub fn load_lenient(source: &str, format: CatalogFormat) -> ConfigResult<Self> {
        let mut catalog: Self = match format {
            CatalogFormat::Json => serde_json::from_str(source)?,
            CatalogFormat::Toml => toml::from_str(source)?,
        };
        catalog.filters.retain(|id, filter| match filter.validate(id) {
            Ok(()) => true,
            Err(error) => {
                tracing::warn!(target: targets::CATALOG, %error, "skipping invalid filter");
                false
            }
        });
        Ok(catalog)
    }

    /// Check every filter type.
    pub fn validate(&self) -> ConfigResult<()> {
        self.filters
            .iter()
            .try_for_each(|(id, filter)| filter.validate(id))
    }

    pub fn len(&self) -> usize {
        self.filters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    /// The filter type `id`.
    pub fn filter(&self, id: &str) -> Option<&FilterDefinition> {
        self.filters.get(id)
    }

    /// Options for the type term, in declaration order.
    pub fn type_options(&self) -> Vec<Value> {
        self.filters
            .iter()
            .map(|(id, filter)| json!({ "value": id, "label": filter.label, "icon": filter.icon }))
            .collect()
    }

    /// Options for the operator term of type `filter`.
    pub fn operator_options(&self, filter: &str) -> Option<Vec<Value>> {
        let operators = self.filters.get(filter)?.operators.as_ref()?;
        Some(
            operators
                .iter()
                .map(|(id, op)| {
                    json!({ "value": id, "label": op.label, "select_multiple": op.select_multiple })
                })
                .collect(),
        )
    }

    /// Options for the value term of type `filter`.
    pub fn value_options(&self, filter: &str) -> Option<&[Value]> {
        self.filters.get(filter).map(|f| f.options.as_slice())
    }

    /// Options for the value term of type `filter` used with `operator`.
    ///
    /// An operator with its own option list overrides the type's options.
    pub fn value_options_for(&self, filter: &str, operator: &str) -> Option<&[Value]> {
        let definition = self.filters.get(filter)?;
        match definition.operator(operator)?.options.as_deref() {
            Some(options) => Some(options),
            None => Some(definition.options.as_slice()),
        }
    }

    /// Whether `operator` of `filter` takes several values.
    pub fn allows_multiple(&self, filter: &str, operator: &str) -> Option<bool> {
        self.filters.get(filter)?.operator(operator)?.select_multiple
    }

    /// Configuration of the operator term, derived from `base`.
    pub fn operator_term_config(&self, base: &TermConfig) -> TermConfig {
        base.clone()
            .with_multiple(false)
            .with_disallow_empty(true)
            .with_emit_value(true)
            .with_map_options(true)
    }

    /// Configuration of the value term for `filter` and `operator`, derived
    /// from `base`.
    pub fn value_term_config(
        &self,
        filter: &str,
        operator: &str,
        base: &TermConfig,
    ) -> Option<TermConfig> {
        let multiple = self.allows_multiple(filter, operator)?;
        Some(base.clone().with_multiple(multiple).with_disallow_empty(true))
    }
}

/// One `(type, operator, values)` filter group.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterGroup {
    pub filter_type: Option<String>,
    pub operator: Option<String>,
    pub values: Option<Value>,
}

impl FilterGroup {
    /// Create an empty group.
    pub fn new() -> Self {
        Self::default()
    }

    /// All three parts are chosen.
    pub fn is_finished(&self) -> bool {
        self.filter_type.is_some() && self.operator.is_some() && self.values.is_some()
    }

    /// Choose the type. A different type forgets operator and values.
    pub fn set_type(&mut self, filter_type: impl Into<String>) {
        let filter_type = filter_type.into();
        if self.filter_type.as_deref() != Some(filter_type.as_str()) {
            self.filter_type = Some(filter_type);
            self.operator = None;
            self.values = None;
        }
    }

    /// Choose the operator. A different operator forgets the values.
    pub fn set_operator(&mut self, operator: impl Into<String>) {
        let operator = operator.into();
        if self.operator.as_deref() != Some(operator.as_str()) {
            self.operator = Some(operator);
            self.values = None;
        }
    }

    /// Choose the values.
    pub fn set_values(&mut self, values: Value) {
        self.values = (!values.is_null()).then_some(values);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CATALOG: &str = r#"{
        "author": {
            "label": "Author",
            "icon": "person",
            "operators": {
                "is": { "label": "is", "selectMultiple": false },
                "in": { "label": "is one of", "selectMultiple": true }
            },
            "options": ["ann", "bob", "cy"]
        },
        "status": {
            "label": "Status",
            "operators": { "is": { "label": "is", "select_multiple": false } },
            "options": [{ "value": "open", "label": "Open" }]
        }
    }"#;

    #[test]
    fn test_parse_preserves_order() {
        let catalog = FilterCatalog::from_json_str(CATALOG).unwrap();
        let types = catalog.type_options();
        assert_eq!(types[0]["value"], json!("author"));
        assert_eq!(types[1]["value"], json!("status"));
        assert_eq!(types[0]["icon"], json!("person"));

        let operators = catalog.operator_options("author").unwrap();
        assert_eq!(operators[1]["label"], json!("is one of"));
    }

    #[test]
    fn test_queries() {
        let catalog = FilterCatalog::from_json_str(CATALOG).unwrap();
        assert_eq!(catalog.allows_multiple("author", "in"), Some(true));
        assert_eq!(catalog.allows_multiple("author", "nope"), None);
        assert_eq!(catalog.value_options("author").map(<[Value]>::len), Some(3));
        assert!(catalog.value_options("missing").is_none());
    }

    #[test]
    fn test_operator_options_override_type_options() {
        let catalog = FilterCatalog::from_toml_str(
            r#"
            [created]
            label = "Created"
            options = ["today", "this week"]

            [created.operators.on]
            label = "on"
            select_multiple = false

            [created.operators.before]
            label = "before"
            select_multiple = false
            options = ["last year"]
            "#,
        )
        .unwrap();

        assert_eq!(
            catalog.value_options_for("created", "before"),
            Some(&[json!("last year")][..])
        );
        assert_eq!(catalog.value_options_for("created", "on").map(<[Value]>::len), Some(2));
        assert!(catalog.value_options_for("created", "after").is_none());
    }

    #[test]
    fn test_value_term_config() {
        let catalog = FilterCatalog::from_json_str(CATALOG).unwrap();
        let base = TermConfig::default().with_label("Value");

        let config = catalog.value_term_config("author", "in", &base).unwrap();
        assert!(config.multiple && config.disallow_empty);
        assert_eq!(config.label.as_deref(), Some("Value"));

        let config = catalog.value_term_config("author", "is", &base).unwrap();
        assert!(!config.multiple);

        let operator = catalog.operator_term_config(&base);
        assert!(!operator.multiple && operator.emit_value);
    }

    #[test]
    fn test_missing_operators() {
        let err = FilterCatalog::from_json_str(r#"{ "x": { "label": "X" } }"#).unwrap_err();
        assert!(matches!(err, ConfigError::MissingOperators { filter } if filter == "x"));
    }

    #[test]
    fn test_invalid_operator() {
        let err = FilterCatalog::from_json_str(
            r#"{ "x": { "label": "X", "operators": { "is": { "label": "" , "selectMultiple": true } } } }"#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidOperator { operator, .. } if operator == "is"));

        let err = FilterCatalog::from_json_str(
            r#"{ "x": { "label": "X", "operators": { "is": { "label": "is" } } } }"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("select_multiple"));
    }

    #[test]
    fn test_lenient_drops_invalid() {
        let catalog = FilterCatalog::load_lenient(
            r#"{
                "bad": { "label": "Bad" },
                "good": { "label": "Good", "operators": { "is": { "label": "is", "selectMultiple": false } } }
            }"#,
            CatalogFormat::Json,
        )
        .unwrap();
        assert_eq!(catalog.len(), 1);
        assert!(catalog.filter("good").is_some());
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(
            FilterCatalog::from_json_str("{"),
            Err(ConfigError::Json(_))
        ));
        assert!(matches!(
            FilterCatalog::load_lenient("[x", CatalogFormat::Toml),
            Err(ConfigError::Toml(_))
        ));
    }

    #[test]
    fn test_unsupported_path() {
        let err = FilterCatalog::from_path("/definitely/missing/catalog.yaml").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn test_group_lifecycle() {
        let mut group = FilterGroup::new();
        group.set_type("author");
        group.set_operator("in");
        assert!(!group.is_finished());
        group.set_values(json!(["ann"]));
        assert!(group.is_finished());

        // Same operator keeps the values; a new one drops them.
        group.set_operator("in");
        assert!(group.is_finished());
        group.set_operator("is");
        assert!(group.values.is_none());

        group.set_values(json!("bob"));
        group.set_type("status");
        assert_eq!(group, FilterGroup { filter_type: Some("status".into()), ..FilterGroup::default() });
    }
}
