//! Selection mutation and the input text.

use serde_json::Value;

use super::{FilterTerm, SelectionEvent, TermTick, TermTimer};
use crate::accessor::display_text;
use crate::logging::targets;
use crate::segments::JOINER;

/// Which option property autofilled text is matched against.
#[derive(Debug, Clone, Copy)]
enum AutofillField {
    Value,
    Label,
}

impl FilterTerm {
    // =========================================================================
    // Toggle / remove
    // =========================================================================

    /// Select `option`, or deselect it if a multi-value term already holds it.
    pub fn toggle_option(&mut self, option: &Value) {
        self.toggle(option, false);
    }

    /// What goes into the raw value for `option`.
    fn emitted(&self, option: &Value) -> Value {
        if self.config.emit_value {
            self.config.accessors.value_of(option)
        } else {
            option.clone()
        }
    }

    pub(super) fn toggle(&mut self, option: &Value, enter_pressed: bool) {
        let accessors = &self.config.accessors;
        if !self.is_editable() || accessors.is_disabled(option) {
            return;
        }
        let option_value = accessors.value_of(option);

        if !self.config.multiple {
            let label = accessors.label_of(option);
            self.update_input_value(label, true, true);
            if enter_pressed {
                self.did_close_with_enter = true;
            }
            self.close_menu(true);

            let unchanged = self
                .model
                .selection()
                .first()
                .is_some_and(|current| self.config.accessors.value_of(current) == option_value);
            if !unchanged {
                let raw = self.emitted(option);
                self.emit_value(raw);
            }
            return;
        }

        let value = self.emitted(option);
        if self.model.is_empty() {
            self.added.emit(SelectionEvent {
                index: 0,
                value: value.clone(),
            });
            self.emit_value(Value::Array(vec![value]));
            self.ticks.post(TermTick::RefocusInput);
            return;
        }

        let mut list = self.model.raw_list();
        if let Some(index) = self.model.position_of(&option_value) {
            let slot = self.buffer.slot_of_value(index);
            self.buffer.record_remove(slot);
            let value = list.remove(index);
            self.removed.emit(SelectionEvent { index, value });
        } else {
            if let Some(max) = self.config.max_values
                && list.len() >= max
            {
                tracing::debug!(target: targets::TERM, max, "selection is full");
                return;
            }

            let (slot, _) = self.buffer.segments_in_input();
            let index = self
                .buffer
                .slot_to_value(slot, list.len())
                .insertion_index()
                .min(list.len());
            self.buffer.record_insert(slot);
            self.added.emit(SelectionEvent {
                index,
                value: value.clone(),
            });
            list.insert(index, value);
        }

        self.emit_value(Value::Array(list));
        self.ticks.post(TermTick::RefocusInput);
    }

    /// Remove the inclusive run of segments `start..=end`.
    ///
    /// A single-value term is cleared. In a multi-value term one
    /// [`removed`](FilterTerm::removed) event fires per value, highest index
    /// first, and an interior run leaves a hole that the next insertion at
    /// that caret position fills.
    pub fn remove_range(&mut self, start: usize, end: usize) {
        if end < start || !self.is_editable() {
            return;
        }
        if !self.config.multiple {
            self.emit_value(Value::Null);
            return;
        }

        let mut list = self.model.raw_list();
        let removed = self.buffer.remove_slots(start, end, list.len());
        if !removed.value_indices.is_empty() {
            for &index in removed.value_indices.iter().rev() {
                let value = list.remove(index);
                self.removed.emit(SelectionEvent { index, value });
            }
            self.emit_value(Value::Array(list));
        }

        // While editing, only the removed run leaves the text.
        if self.menu_open {
            let (text, caret) = self
                .buffer
                .without_segments(start, end, removed.hole.is_some());
            self.set_input_value(&text);
            self.buffer.set_caret(caret, caret);
        } else {
            let text = self.buffer.render(&self.model.labels());
            self.set_input_value(&text);
            let caret = self.buffer.caret_at_segment(start);
            self.buffer.set_caret(caret, caret);
        }
    }

    /// Remove the selected value at `index` and focus the input.
    pub fn remove_at_index(&mut self, index: usize) {
        if index >= self.model.len() {
            return;
        }
        let slot = self.buffer.slot_of_value(index);
        self.remove_range(slot, slot);
        self.focus_input();
    }

    pub(super) fn backspace(&mut self) {
        if self.config.multiple {
            if self.model.raw().is_array() {
                let (start, end) = self.buffer.segments_in_input();
                self.remove_range(start, end);
            }
        } else if !self.model.raw().is_null() {
            self.emit_value(Value::Null);
        }
    }

    // =========================================================================
    // Input text
    // =========================================================================

    /// The user typed: `text` is the whole new input, caret at its end.
    pub fn input(&mut self, text: impl Into<String>) {
        let text = text.into();
        let end = text.chars().count();
        self.input_with_caret(text, (end, end));
    }

    /// The user typed, leaving the caret at `caret`.
    pub fn input_with_caret(&mut self, text: impl Into<String>, caret: (usize, usize)) {
        self.timers.cancel(TermTimer::InputDebounce);
        if !self.is_editable() {
            return;
        }

        let text = text.into();
        self.set_input_value(&text);
        self.buffer.set_caret(caret.0, caret.1);
        self.user_input = true;
        self.default_input = text;

        if !self.menu_open {
            self.focus_input();
        }
        if self.has_filter() {
            let delay = self.config.input_debounce();
            self.start_timer(TermTimer::InputDebounce, delay);
        }
    }

    /// Move the caret.
    pub fn set_caret(&mut self, start: usize, end: usize) {
        self.buffer.set_caret(start, end);
    }

    pub(super) fn set_input_value(&mut self, text: &str) {
        if self.buffer.text() != text {
            self.buffer.set_text(text);
            self.input_value_changed.emit(text.to_string());
        }
    }

    pub(super) fn update_input_value(&mut self, text: String, no_filter: bool, internal: bool) {
        self.user_input = !internal;
        self.set_input_value(&text);
        if no_filter || !internal {
            self.default_input = text;
        }
        if !no_filter {
            let query = self.segment_query();
            self.filter(query, false, None);
        }
    }

    /// Rewrite the input from the selection.
    pub(super) fn reset_input_value(&mut self) {
        let text = if self.model.is_empty() {
            String::new()
        } else if self.config.multiple {
            self.buffer.render(&self.model.labels())
        } else {
            self.model.labels().into_iter().next().unwrap_or_default()
        };
        self.update_input_value(text, true, true);
    }

    /// Text sent to the filter: the caret's segment, or the whole input.
    pub(super) fn segment_query(&self) -> String {
        if self.config.multiple {
            self.buffer.current_segment_text()
        } else {
            self.buffer.text().to_string()
        }
    }

    // =========================================================================
    // Autofill
    // =========================================================================

    /// The browser (or another agent) filled `text` into the input.
    ///
    /// Matches options by value, then by label, ignoring case. Without a match
    /// the text is validated through a filter request that keeps the menu
    /// closed, and matched once more when the answer arrives.
    pub fn autofill(&mut self, text: &str) {
        self.timers.cancel(TermTimer::InputDebounce);
        self.reset_input_value();
        if text.is_empty() {
            return;
        }
        self.fill_autofill(text, false);
    }

    pub(super) fn fill_autofill(&mut self, text: &str, after_filter: bool) {
        if self.autofill_match(text, AutofillField::Value) {
            return;
        }
        if self.autofill_match(text, AutofillField::Label) || after_filter {
            return;
        }

        let query = if self.config.multiple {
            let (segment, _) = self.buffer.segments_in_input();
            text.split(JOINER).nth(segment).unwrap_or_default().to_string()
        } else {
            text.to_string()
        };
        self.filter(query, true, Some(text.to_string()));
    }

    fn autofill_match(&mut self, text: &str, field: AutofillField) -> bool {
        let needle = text.to_lowercase();
        let accessors = &self.config.accessors;
        let found = self
            .model
            .options()
            .iter()
            .find(|option| {
                let candidate = match field {
                    AutofillField::Value => display_text(&accessors.value_of(option)),
                    AutofillField::Label => accessors.label_of(option),
                };
                candidate.to_lowercase() == needle
            })
            .cloned();

        let Some(option) = found else {
            return false;
        };
        tracing::debug!(target: targets::TERM, ?field, "autofill matched an option");
        if self.model.is_selected(&option) {
            self.close_menu(true);
        } else {
            self.toggle(&option, false);
        }
        true
    }
}
