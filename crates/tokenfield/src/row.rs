//! A row of sibling terms.
//!
//! A filter group shows its type, operator and value terms side by side.
//! The row owns them in order, shares one [`PopupTracker`] between them and
//! moves focus across term boundaries when the caret runs off either end of
//! an input.

use std::time::Duration;

use crate::keys::{Key, KeyEvent};
use crate::logging::targets;
use crate::popup::PopupTracker;
use crate::term::FilterTerm;

/// Ordered terms of one filter group.
#[derive(Debug, Default)]
pub struct TermRow {
    terms: Vec<FilterTerm>,
    popups: PopupTracker,
}

impl TermRow {
    /// Create an empty row with its own tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Share `tracker` with other rows using builder pattern.
    pub fn with_tracker(mut self, tracker: PopupTracker) -> Self {
        self.popups = tracker;
        self
    }

    /// Append `term`, returning its index.
    pub fn push(&mut self, term: FilterTerm) -> usize {
        self.popups.attach(&term);
        self.terms.push(term);
        self.terms.len() - 1
    }

    pub fn term(&self, index: usize) -> Option<&FilterTerm> {
        self.terms.get(index)
    }

    pub fn term_mut(&mut self, index: usize) -> Option<&mut FilterTerm> {
        self.terms.get_mut(index)
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// The tracker counting this row's open popups.
    pub fn popups(&self) -> &PopupTracker {
        &self.popups
    }

    /// Whether any term of the row has its menu open.
    pub fn has_popup_open(&self) -> bool {
        self.popups.has_popup_open()
    }

    /// Focus the term at `index`.
    pub fn focus(&mut self, index: usize) {
        if let Some(term) = self.terms.get_mut(index) {
            tracing::debug!(target: targets::ROW, index, "focusing term");
            term.focus();
        }
    }

    /// Release the term at `index`.
    pub fn blur(&mut self, index: usize) {
        if let Some(term) = self.terms.get_mut(index) {
            term.blur();
        }
    }

    /// Move focus from the term at `index` to the next one, as after a
    /// single-value pick.
    pub fn advance(&mut self, index: usize) {
        if index + 1 < self.terms.len() {
            self.blur(index);
            self.focus(index + 1);
        }
    }

    /// Forward a key press to the term at `index`, then hand focus to a
    /// neighbour if the caret sits at the edge the arrow points past.
    pub fn handle_key_down(&mut self, index: usize, event: &KeyEvent) {
        let Some(term) = self.terms.get_mut(index) else {
            return;
        };
        term.handle_key_down(event);
        if event.should_ignore() || event.modifiers.any() {
            return;
        }

        let (caret, _) = term.caret();
        let at_end = caret == term.input_text().chars().count();
        let target = match event.key {
            Key::ArrowLeft if caret == 0 => index.checked_sub(1),
            Key::ArrowRight if at_end => Some(index + 1).filter(|&next| next < self.terms.len()),
            _ => None,
        };
        if let Some(target) = target {
            tracing::trace!(target: targets::ROW, from = index, to = target, "caret left the term");
            self.blur(index);
            self.focus(target);
        }
    }

    /// Forward a key release to the term at `index`.
    pub fn handle_key_up(&mut self, index: usize, event: &KeyEvent) {
        if let Some(term) = self.terms.get_mut(index) {
            term.handle_key_up(event);
        }
    }

    /// Tick every term. Returns the time until the earliest pending timer.
    pub fn tick(&mut self) -> Option<Duration> {
        self.terms.iter_mut().filter_map(FilterTerm::tick).min()
    }
}
