//! Menu lifecycle, option highlight and focus.

use super::{FilterTerm, FocusTarget, TermTimer};
use crate::logging::targets;
use crate::virtual_scroll::VirtualScroll;

/// Wrap `value` into `[min, max]`.
fn normalize_to_interval(value: i32, min: i32, max: i32) -> i32 {
    if max <= min {
        return min;
    }
    let size = max - min + 1;
    let index = min + (value - min) % size;
    if index < min { index + size } else { index }
}

impl FilterTerm {
    // =========================================================================
    // Open / close
    // =========================================================================

    /// Open the menu, starting a new editing session unless the menu was only
    /// hidden while a filter request was pending.
    pub(super) fn open_menu(&mut self) {
        if self.menu_open {
            return;
        }
        self.menu_open = true;
        if !std::mem::take(&mut self.menu_suspended) {
            self.buffer.clear_holes();
        }
        if !self.user_input {
            self.reset_input_value();
        }
        self.timers.cancel(TermTimer::BlurDebounce);

        tracing::debug!(target: targets::TERM, id = %self.input_id, "menu opened");
        self.popup_shown.emit(());
        if self.is_editable() {
            self.focused.emit(());
        }
        self.update_menu(true);
    }

    /// Hide the menu without touching the input or the filter request.
    pub(super) fn hide_menu(&mut self) {
        if !self.menu_open {
            return;
        }
        self.menu_open = false;
        tracing::debug!(target: targets::TERM, id = %self.input_id, "menu closed");
        self.popup_hidden.emit(());
        self.update_menu(false);
    }

    /// Close the menu, clear the input and abandon any filter request.
    ///
    /// With `keep_focus` focus moves to the selection chip.
    pub fn close_menu(&mut self, keep_focus: bool) {
        self.option_index = -1;
        if self.menu_open {
            self.hide_menu();
            self.set_input_value("");
            if keep_focus {
                self.focus = FocusTarget::Selection;
            }
        }
        self.user_input = false;
        self.menu_suspended = false;

        self.timers.cancel(TermTimer::FilterSafety);
        if self.filter.abort() {
            tracing::debug!(target: targets::FILTER, "filter request abandoned");
            self.filter_aborted.emit(());
        }
    }

    /// Focus the input and open the menu, requesting options if a filter is
    /// attached.
    pub fn show_menu(&mut self) {
        if !self.is_editable() {
            return;
        }
        self.focus_input();
        if self.has_filter() {
            let query = self.segment_query();
            self.filter(query, false, None);
        }
    }

    /// Focus the term. Same as [`FilterTerm::show_menu`].
    pub fn focus(&mut self) {
        self.show_menu();
    }

    /// Release the term. Same as `close_menu(false)`.
    pub fn blur(&mut self) {
        self.close_menu(false);
    }

    pub(super) fn focus_input(&mut self) {
        self.open_menu();
        self.focus = FocusTarget::Input;
    }

    /// Point the highlight at the first selected option and re-window.
    pub(super) fn update_menu(&mut self, show: bool) {
        let mut index = -1;
        if show {
            if let Some(first) = self.model.selection().first() {
                let value = self.config.accessors.value_of(first);
                index = self.model.find_option(&value).map_or(-1, |i| i as i32);
            }
            self.window.reset((index >= 0).then_some(index as usize));
        }
        self.set_option_index(index);
    }

    // =========================================================================
    // Highlight
    // =========================================================================

    fn option_count(&self) -> i32 {
        self.model.options().len() as i32
    }

    fn is_option_disabled(&self, index: i32) -> bool {
        usize::try_from(index)
            .ok()
            .and_then(|i| self.model.option(i))
            .is_some_and(|option| self.config.accessors.is_disabled(option))
    }

    pub(super) fn set_option_index(&mut self, index: i32) {
        self.option_index = if index > -1 && index < self.option_count() {
            index
        } else {
            -1
        };
    }

    /// Move the highlight by `offset`, cycling through "no highlight" and
    /// skipping disabled options.
    ///
    /// If only disabled options lie ahead the highlight stays put. Single-value
    /// terms mirror the highlighted label into the input unless
    /// `skip_input_value` is set.
    pub(super) fn move_option_selection(&mut self, offset: i32, skip_input_value: bool) {
        if !self.menu_open {
            return;
        }
        let start = self.option_index;
        let max = self.option_count() - 1;
        let mut index = start;
        let mut skipped = false;
        loop {
            index = normalize_to_interval(index + offset, -1, max);
            if index == -1 || index == start || !self.is_option_disabled(index) {
                break;
            }
            skipped = true;
        }
        if index == -1 && skipped {
            index = start;
        }

        if index != start {
            self.set_option_index(index);
            if self.option_index >= 0 {
                self.window.scroll_to(self.option_index as usize);
            }
            if !skip_input_value {
                let text = usize::try_from(self.option_index)
                    .ok()
                    .and_then(|i| self.model.option(i))
                    .map(|option| self.config.accessors.label_of(option))
                    .unwrap_or_else(|| self.default_input.clone());
                self.set_input_value(&text);
            }
        }
        // The page keys may leave the start index out of range.
        self.set_option_index(self.option_index);
    }

    /// Jump a page, then settle on the nearest enabled option back toward the
    /// start.
    pub(super) fn move_option_page(&mut self, down: bool) {
        if !self.menu_open {
            return;
        }
        let page = i32::try_from(self.window.page_size()).unwrap_or(i32::MAX);
        let jump = if down { page } else { -page };
        self.option_index = self
            .option_index
            .saturating_add(jump)
            .clamp(-1, self.option_count());
        self.move_option_selection(if down { -1 } else { 1 }, self.config.multiple);
    }

    // =========================================================================
    // Pointer and focus
    // =========================================================================

    /// The selection chip was clicked.
    pub fn click_selection(&mut self) {
        // The click that follows an Enter commit must not reopen the menu.
        if self.did_close_with_enter {
            self.did_close_with_enter = false;
            return;
        }
        self.show_menu();
    }

    /// The option at `index` was clicked.
    pub fn click_option(&mut self, index: usize) {
        if let Some(option) = self.model.option(index).cloned() {
            self.toggle(&option, false);
        }
    }

    /// The pointer moved over the option at `index`.
    pub fn hover_option(&mut self, index: usize) {
        if self.menu_open && !self.is_option_disabled(index as i32) {
            self.set_option_index(index as i32);
        }
    }

    /// The menu viewport scrolled to `offset_px`.
    pub fn scroll_menu(&mut self, offset_px: f32) {
        self.window.on_scroll(offset_px);
    }

    /// The menu viewport was resized to `px`.
    pub fn resize_menu(&mut self, px: f32) {
        self.window.set_viewport(px);
    }

    /// The input received focus.
    pub fn focus_in(&mut self) {
        self.timers.cancel(TermTimer::BlurDebounce);
        self.focus = FocusTarget::Input;
        if !self.menu_open {
            self.show_menu();
        }
    }

    /// Focus left the input. The menu closes after the blur delay unless focus
    /// comes back first.
    pub fn focus_out(&mut self) {
        let delay = self.config.blur_delay();
        self.start_timer(TermTimer::BlurDebounce, delay);
    }
}

#[cfg(test)]
mod tests {
    use super::normalize_to_interval;

    #[test]
    fn test_normalize_to_interval() {
        assert_eq!(normalize_to_interval(3, -1, 2), -1);
        assert_eq!(normalize_to_interval(-2, -1, 2), 2);
        assert_eq!(normalize_to_interval(1, -1, 2), 1);
        assert_eq!(normalize_to_interval(0, -1, -1), -1);
    }
}
