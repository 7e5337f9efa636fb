//! Term configuration.
//!
//! Every prop a term accepts lives in [`TermConfig`]. It deserializes from
//! JSON or TOML with every field optional; durations are whole milliseconds.
//!
//! ```
//! use tokenfield::TermConfig;
//!
//! let config = TermConfig::from_toml_str(
//!     r#"
//!     multiple = true
//!     max_values = 3
//!     input_debounce_ms = 500
//!     "#,
//! )
//! .unwrap();
//! assert!(config.multiple);
//! assert_eq!(config.input_debounce().as_millis(), 500);
//! ```

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::accessor::OptionAccessors;
use crate::error::ConfigResult;

/// Item height of a dense option row, in pixels.
pub const DENSE_ITEM_SIZE: f32 = 24.0;
/// Item height of a regular option row, in pixels.
pub const ITEM_SIZE: f32 = 48.0;

/// Configuration of a single term.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TermConfig {
    /// Hold an ordered list of values instead of a scalar.
    pub multiple: bool,
    /// Resolve raw values back to option objects.
    pub map_options: bool,
    /// Emit option values instead of whole option objects.
    pub emit_value: bool,
    /// Always show the input while nothing is selected.
    pub disallow_empty: bool,
    /// Upper bound on the number of selected values.
    pub max_values: Option<usize>,
    /// Whether the user may change the selection at all.
    pub editable: bool,
    pub readonly: bool,
    pub disable: bool,
    /// Accessible label of the input.
    pub label: Option<String>,
    /// How options expose value, label and disabled flag.
    pub accessors: OptionAccessors,
    /// Render every option label as markup.
    pub options_html: bool,
    /// Use dense option rows.
    pub options_dense: bool,
    /// Option row height override, in pixels.
    pub item_size: Option<f32>,
    /// Height of the menu viewport, in pixels.
    pub viewport_px: f32,
    /// Delay between the last keystroke and the filter request.
    pub input_debounce_ms: u64,
    /// Delay before an unanswered filter request hides the menu.
    pub filter_safety_ms: u64,
    /// Delay before losing focus closes the menu.
    pub blur_delay_ms: u64,
}

impl Default for TermConfig {
    fn default() -> Self {
        Self {
            multiple: false,
            map_options: false,
            emit_value: false,
            disallow_empty: false,
            max_values: None,
            editable: true,
            readonly: false,
            disable: false,
            label: None,
            accessors: OptionAccessors::default(),
            options_html: false,
            options_dense: false,
            item_size: None,
            viewport_px: 240.0,
            input_debounce_ms: 250,
            filter_safety_ms: 10,
            blur_delay_ms: 0,
        }
    }
}

impl TermConfig {
    /// Create the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a configuration from JSON.
    pub fn from_json_str(source: &str) -> ConfigResult<Self> {
        Ok(serde_json::from_str(source)?)
    }

    /// Parse a configuration from TOML.
    pub fn from_toml_str(source: &str) -> ConfigResult<Self> {
        Ok(toml::from_str(source)?)
    }

    /// Input debounce as a duration.
    pub fn input_debounce(&self) -> Duration {
        Duration::from_millis(self.input_debounce_ms)
    }

    /// Filter safety delay as a duration.
    pub fn filter_safety(&self) -> Duration {
        Duration::from_millis(self.filter_safety_ms)
    }

    /// Blur delay as a duration.
    pub fn blur_delay(&self) -> Duration {
        Duration::from_millis(self.blur_delay_ms)
    }

    /// Effective option row height.
    pub fn effective_item_size(&self) -> f32 {
        match self.item_size {
            Some(size) => size,
            None if self.options_dense => DENSE_ITEM_SIZE,
            None => ITEM_SIZE,
        }
    }

    /// Whether the selection may currently be changed.
    pub fn is_editable(&self) -> bool {
        self.editable && !self.readonly && !self.disable
    }

    // =========================================================================
    // Builder
    // =========================================================================

    /// Set multi-select mode using builder pattern.
    pub fn with_multiple(mut self, multiple: bool) -> Self {
        self.multiple = multiple;
        self
    }

    /// Set option mapping using builder pattern.
    pub fn with_map_options(mut self, map_options: bool) -> Self {
        self.map_options = map_options;
        self
    }

    /// Set value emission using builder pattern.
    pub fn with_emit_value(mut self, emit_value: bool) -> Self {
        self.emit_value = emit_value;
        self
    }

    /// Set the empty-selection policy using builder pattern.
    pub fn with_disallow_empty(mut self, disallow_empty: bool) -> Self {
        self.disallow_empty = disallow_empty;
        self
    }

    /// Set the selection bound using builder pattern.
    pub fn with_max_values(mut self, max_values: usize) -> Self {
        self.max_values = Some(max_values);
        self
    }

    /// Set editability using builder pattern.
    pub fn with_editable(mut self, editable: bool) -> Self {
        self.editable = editable;
        self
    }

    /// Set the accessible label using builder pattern.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Set the option accessors using builder pattern.
    pub fn with_accessors(mut self, accessors: OptionAccessors) -> Self {
        self.accessors = accessors;
        self
    }

    /// Set dense option rows using builder pattern.
    pub fn with_options_dense(mut self, dense: bool) -> Self {
        self.options_dense = dense;
        self
    }

    /// Set markup rendering using builder pattern.
    pub fn with_options_html(mut self, html: bool) -> Self {
        self.options_html = html;
        self
    }

    /// Set the input debounce using builder pattern.
    pub fn with_input_debounce(mut self, debounce: Duration) -> Self {
        self.input_debounce_ms = debounce.as_millis() as u64;
        self
    }

    /// Set the blur delay using builder pattern.
    pub fn with_blur_delay(mut self, delay: Duration) -> Self {
        self.blur_delay_ms = delay.as_millis() as u64;
        self
    }

    /// Set the menu viewport height using builder pattern.
    pub fn with_viewport(mut self, px: f32) -> Self {
        self.viewport_px = px;
        self
    }
}
