//! Option accessors.
//!
//! Options are opaque JSON values owned by the caller. A term only ever reads
//! three things from them: the identity value, the display label and the
//! disabled flag. Each is read through an [`OptionAccessor`], which is either
//! the name of a field or an arbitrary function.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Function form of an accessor.
pub type AccessorFn = Arc<dyn Fn(&Value) -> Value + Send + Sync>;

/// How to read one property out of an option.
#[derive(Clone, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum OptionAccessor {
    /// Read the named field of a JSON object; anything else is returned as-is.
    Field(String),
    /// Compute the property with a function.
    Func(AccessorFn),
}

impl OptionAccessor {
    /// Accessor reading the named field.
    pub fn field(name: impl Into<String>) -> Self {
        Self::Field(name.into())
    }

    /// Accessor computing the property with `f`.
    pub fn func<F>(f: F) -> Self
    where
        F: Fn(&Value) -> Value + Send + Sync + 'static,
    {
        Self::Func(Arc::new(f))
    }

    /// Read the property from `option`.
    pub fn extract(&self, option: &Value) -> Value {
        match self {
            Self::Field(name) => match option {
                Value::Object(map) => map.get(name).cloned().unwrap_or_else(|| option.clone()),
                _ => option.clone(),
            },
            Self::Func(f) => f(option),
        }
    }
}

impl From<String> for OptionAccessor {
    fn from(name: String) -> Self {
        Self::Field(name)
    }
}

impl From<&str> for OptionAccessor {
    fn from(name: &str) -> Self {
        Self::Field(name.to_string())
    }
}

impl From<OptionAccessor> for String {
    fn from(accessor: OptionAccessor) -> Self {
        match accessor {
            OptionAccessor::Field(name) => name,
            // Functions cannot be persisted. An empty field name reads back as
            // "the option itself".
            OptionAccessor::Func(_) => String::new(),
        }
    }
}

impl fmt::Debug for OptionAccessor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Field(name) => f.debug_tuple("Field").field(name).finish(),
            Self::Func(_) => f.write_str("Func(..)"),
        }
    }
}

/// The three accessors a term reads options through.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OptionAccessors {
    /// Identity of an option, compared by deep equality.
    pub value: OptionAccessor,
    /// Display text.
    pub label: OptionAccessor,
    /// Disabled flag; only a literal `true` disables.
    pub disable: OptionAccessor,
}

impl Default for OptionAccessors {
    fn default() -> Self {
        Self {
            value: OptionAccessor::field("value"),
            label: OptionAccessor::field("label"),
            disable: OptionAccessor::field("disable"),
        }
    }
}

impl OptionAccessors {
    /// Identity value of `option`.
    pub fn value_of(&self, option: &Value) -> Value {
        self.value.extract(option)
    }

    /// Display label of `option`.
    pub fn label_of(&self, option: &Value) -> String {
        display_text(&self.label.extract(option))
    }

    /// Whether `option` is disabled.
    pub fn is_disabled(&self, option: &Value) -> bool {
        matches!(self.disable.extract(option), Value::Bool(true))
    }
}

/// Whether `option` should be rendered as markup.
pub fn needs_html(option: &Value, options_html: bool) -> bool {
    options_html || option.get("html").and_then(Value::as_bool) == Some(true)
}

/// Text shown for a JSON value.
pub fn display_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
