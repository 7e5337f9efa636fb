//! Keyboard handling.
//!
//! Every key event is re-emitted unchanged on the matching signal before the
//! term interprets it, so a container can implement focus hand-off between
//! sibling terms.

use super::FilterTerm;
use crate::keys::{Key, KeyEvent};
use crate::logging::targets;

impl FilterTerm {
    /// Handle a key press.
    pub fn handle_key_down(&mut self, event: &KeyEvent) {
        self.key_down.emit(event.clone());
        if event.should_ignore() {
            return;
        }
        tracing::trace!(target: targets::KEYS, key = ?event.key, "key down");

        let tab_should_select =
            !event.modifiers.shift && !self.config.multiple && self.option_index > -1;

        match event.key {
            // Handled on key up.
            Key::Escape => return,
            Key::Tab if !tab_should_select => {
                self.close_menu(true);
                return;
            }
            _ => {}
        }

        if !event.on_input || !self.is_editable() {
            return;
        }

        match event.key {
            Key::ArrowDown if !self.filter.is_loading() && !self.menu_open => {
                self.show_menu();
                return;
            }
            Key::Backspace => {
                self.backspace();
                return;
            }
            Key::Home | Key::End if self.buffer.is_empty() && self.menu_open => {
                self.option_index = -1;
                let offset = if event.key == Key::Home { 1 } else { -1 };
                self.move_option_selection(offset, self.config.multiple);
            }
            Key::PageUp | Key::PageDown => {
                self.move_option_page(event.key == Key::PageDown);
            }
            Key::ArrowUp | Key::ArrowDown => {
                let offset = if event.key == Key::ArrowUp { -1 } else { 1 };
                self.move_option_selection(offset, self.config.multiple);
            }
            _ => {}
        }

        let commits = event.key == Key::Enter || (event.key == Key::Tab && tab_should_select);
        if !commits {
            return;
        }
        let highlighted = usize::try_from(self.option_index)
            .ok()
            .and_then(|i| self.model.option(i))
            .cloned();
        if let Some(option) = highlighted {
            self.toggle(&option, true);
        }
    }

    /// Handle a key release.
    pub fn handle_key_up(&mut self, event: &KeyEvent) {
        self.key_up.emit(event.clone());
        if event.key == Key::Escape && self.menu_open {
            self.close_menu(true);
            self.reset_input_value();
        }
    }

    /// Handle a character key press. Only passed through.
    pub fn handle_key_press(&mut self, event: &KeyEvent) {
        self.key_press.emit(event.clone());
    }
}
