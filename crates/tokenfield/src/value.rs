//! Value model.
//!
//! A term is given a raw external value (a scalar for single-select, an
//! ordered list for multi-select, `null` when absent) and a list of options.
//! The selection is never stored independently: it is recomputed from the raw
//! value, the current options and a short-lived cache every time either input
//! changes.

use std::fmt;
use std::ops::Deref;
use std::sync::Arc;

use serde_json::Value;

use crate::accessor::OptionAccessors;
use crate::logging::targets;

/// A shared handle to an option.
///
/// Cloning is cheap and clones compare identical under [`TermOption::same_as`],
/// which lets callers tell a reused option object from a freshly built one.
#[derive(Clone, PartialEq)]
pub struct TermOption(Arc<Value>);

impl TermOption {
    /// Wrap an option value.
    pub fn new(value: Value) -> Self {
        Self(Arc::new(value))
    }

    /// The underlying option value.
    pub fn value(&self) -> &Value {
        &self.0
    }

    /// Whether both handles point at the same option object.
    pub fn same_as(&self, other: &TermOption) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Deref for TermOption {
    type Target = Value;

    fn deref(&self) -> &Value {
        &self.0
    }
}

impl From<Value> for TermOption {
    fn from(value: Value) -> Self {
        Self::new(value)
    }
}

impl fmt::Debug for TermOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&*self.0, f)
    }
}

/// Split a raw value into its elements.
///
/// `null` is empty. Single-select wraps the scalar; multi-select takes the
/// array's elements and wraps anything that is not an array.
pub fn raw_elements(raw: &Value, multiple: bool) -> Vec<Value> {
    match raw {
        Value::Null => Vec::new(),
        Value::Array(items) if multiple => items.clone(),
        other => vec![other.clone()],
    }
}

/// Resolve a raw value into the selected options.
///
/// With `map_options`, each element is looked up by value in `options`, then in
/// `cache`, and finally used as a degenerate option of its own. Without it the
/// raw elements are the options.
pub fn resolve(
    raw: &Value,
    options: &[TermOption],
    cache: &[TermOption],
    multiple: bool,
    map_options: bool,
    accessors: &OptionAccessors,
) -> Vec<TermOption> {
    raw_elements(raw, multiple)
        .into_iter()
        .map(|element| {
            if !map_options {
                return TermOption::new(element);
            }
            let matches = |opt: &&TermOption| accessors.value_of(opt) == element;
            options
                .iter()
                .find(matches)
                .or_else(|| cache.iter().find(matches))
                .cloned()
                .unwrap_or_else(|| TermOption::new(element))
        })
        .collect()
}

/// The raw value, the options and the selection derived from them.
#[derive(Debug, Clone)]
pub struct ValueModel {
    multiple: bool,
    map_options: bool,
    accessors: OptionAccessors,
    raw: Value,
    options: Vec<TermOption>,
    selection: Vec<TermOption>,
    cache: Vec<TermOption>,
}

impl ValueModel {
    /// Create an empty model.
    pub fn new(multiple: bool, map_options: bool, accessors: OptionAccessors) -> Self {
        Self {
            multiple,
            map_options,
            accessors,
            raw: Value::Null,
            options: Vec::new(),
            selection: Vec::new(),
            cache: Vec::new(),
        }
    }

    /// Whether the model holds a list.
    pub fn is_multiple(&self) -> bool {
        self.multiple
    }

    /// The accessors options are read through.
    pub fn accessors(&self) -> &OptionAccessors {
        &self.accessors
    }

    /// The raw external value.
    pub fn raw(&self) -> &Value {
        &self.raw
    }

    /// The raw value split into elements.
    pub fn raw_list(&self) -> Vec<Value> {
        raw_elements(&self.raw, self.multiple)
    }

    /// Replace the raw value and recompute the selection.
    pub fn set_raw(&mut self, raw: Value) {
        self.raw = raw;
        self.recompute();
    }

    /// The current option list.
    pub fn options(&self) -> &[TermOption] {
        &self.options
    }

    /// Replace the option list and recompute the selection.
    pub fn set_options(&mut self, options: Vec<Value>) {
        self.options = options.into_iter().map(TermOption::new).collect();
        self.recompute();
    }

    /// The option at `index` in the option list.
    pub fn option(&self, index: usize) -> Option<&TermOption> {
        self.options.get(index)
    }

    /// The selected options, in external order.
    pub fn selection(&self) -> &[TermOption] {
        &self.selection
    }

    /// Options resolved by the previous recomputation.
    pub fn cache(&self) -> &[TermOption] {
        &self.cache
    }

    /// Whether nothing is selected.
    pub fn is_empty(&self) -> bool {
        self.selection.is_empty()
    }

    /// Number of selected options.
    pub fn len(&self) -> usize {
        self.selection.len()
    }

    /// Identity values of the selected options.
    pub fn selected_values(&self) -> Vec<Value> {
        self.selection
            .iter()
            .map(|opt| self.accessors.value_of(opt))
            .collect()
    }

    /// Labels of the selected options.
    pub fn labels(&self) -> Vec<String> {
        self.selection
            .iter()
            .map(|opt| self.accessors.label_of(opt))
            .collect()
    }

    /// Position in the selection of the option whose value equals `value`.
    pub fn position_of(&self, value: &Value) -> Option<usize> {
        self.selection
            .iter()
            .position(|opt| self.accessors.value_of(opt) == *value)
    }

    /// Whether `option` is currently selected.
    pub fn is_selected(&self, option: &Value) -> bool {
        self.position_of(&self.accessors.value_of(option)).is_some()
    }

    /// Index in the option list of the option whose value equals `value`.
    pub fn find_option(&self, value: &Value) -> Option<usize> {
        self.options
            .iter()
            .position(|opt| self.accessors.value_of(opt) == *value)
    }

    fn recompute(&mut self) {
        self.selection = resolve(
            &self.raw,
            &self.options,
            &self.cache,
            self.multiple,
            self.map_options,
            &self.accessors,
        );
        self.cache = self.selection.clone();
        tracing::trace!(
            target: targets::TERM,
            selected = self.selection.len(),
            options = self.options.len(),
            "selection recomputed"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn options() -> Vec<Value> {
        vec![
            json!({ "value": "a", "label": "Alpha" }),
            json!({ "value": "b", "label": "Beta" }),
            json!({ "value": "c", "label": "Gamma" }),
        ]
    }

    #[test]
    fn test_absent_value_is_empty() {
        let mut model = ValueModel::new(false, true, OptionAccessors::default());
        model.set_options(options());
        assert!(model.is_empty());

        model.set_raw(Value::Null);
        assert!(model.is_empty());
    }

    #[test]
    fn test_single_select_wraps_scalar() {
        let mut model = ValueModel::new(false, true, OptionAccessors::default());
        model.set_options(options());
        model.set_raw(json!("b"));

        assert_eq!(model.len(), 1);
        assert_eq!(model.labels(), vec!["Beta"]);
        assert!(model.selection()[0].same_as(&model.options()[1]));
    }

    #[test]
    fn test_multi_select_preserves_order() {
        let mut model = ValueModel::new(true, true, OptionAccessors::default());
        model.set_options(options());
        model.set_raw(json!(["c", "a"]));

        assert_eq!(model.labels(), vec!["Gamma", "Alpha"]);
        assert_eq!(model.selected_values(), vec![json!("c"), json!("a")]);
        assert_eq!(model.position_of(&json!("a")), Some(1));
    }

    #[test]
    fn test_resolution_is_idempotent() {
        let mut model = ValueModel::new(true, true, OptionAccessors::default());
        model.set_options(options());
        model.set_raw(json!(["a", "c"]));
        let first = model.selection().to_vec();

        model.set_raw(json!(["a", "c"]));
        let second = model.selection();

        assert!(first.iter().zip(second).all(|(a, b)| a.same_as(b)));
    }

    #[test]
    fn test_cache_keeps_evicted_options() {
        let mut model = ValueModel::new(false, true, OptionAccessors::default());
        model.set_options(options());
        model.set_raw(json!("b"));
        let resolved = model.selection()[0].clone();

        // An async refresh replaced the option list.
        model.set_options(vec![json!({ "value": "z", "label": "Zeta" })]);

        assert_eq!(model.labels(), vec!["Beta"]);
        assert!(model.selection()[0].same_as(&resolved));
    }

    #[test]
    fn test_unknown_value_is_degenerate_option() {
        let mut model = ValueModel::new(false, true, OptionAccessors::default());
        model.set_options(options());
        model.set_raw(json!("unknown"));

        assert_eq!(model.labels(), vec!["unknown"]);
        assert_eq!(model.selected_values(), vec![json!("unknown")]);
    }

    #[test]
    fn test_without_map_options_raw_elements_are_options() {
        let mut model = ValueModel::new(true, false, OptionAccessors::default());
        model.set_options(options());
        model.set_raw(json!([{ "value": "q", "label": "Queued" }]));

        assert_eq!(model.labels(), vec!["Queued"]);
        assert!(model.is_selected(&json!({ "value": "q" })));
        assert_eq!(model.find_option(&json!("q")), None);
    }

    #[test]
    fn test_multi_select_wraps_non_array() {
        assert_eq!(raw_elements(&json!("a"), true), vec![json!("a")]);
        assert_eq!(raw_elements(&json!(["a"]), false), vec![json!(["a"])]);
    }
}
