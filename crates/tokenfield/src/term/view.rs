//! Render output.
//!
//! [`FilterTerm::render`] describes what a term shows without drawing
//! anything: the selection chip, the input with its ARIA attributes, and the
//! windowed menu. Chip, input and item primitives belong to the host.

use super::{FilterTerm, TermMode};
use crate::accessor::needs_html;
use crate::segments::JOINER;
use crate::virtual_scroll::VirtualScroll;

/// Everything a term shows.
#[derive(Debug, Clone, PartialEq)]
pub struct TermView {
    pub mode: TermMode,
    /// Present while collapsed.
    pub selection: Option<SelectionView>,
    /// Present while editing.
    pub input: Option<InputView>,
    /// Present while the menu is open.
    pub menu: Option<MenuView>,
}

/// The chip showing the current selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionView {
    pub id: String,
    pub labels: Vec<String>,
    /// Labels joined the way the input shows them.
    pub text: String,
    pub disabled: bool,
}

/// ARIA attributes of the combobox input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComboboxAria {
    pub role: &'static str,
    pub label: Option<String>,
    pub readonly: bool,
    pub autocomplete: &'static str,
    pub expanded: bool,
    /// Id of the listbox.
    pub controls: String,
    /// Id of the highlighted option.
    pub active_descendant: Option<String>,
}

/// The text input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputView {
    pub id: String,
    pub text: String,
    pub caret: (usize, usize),
    pub aria: ComboboxAria,
    pub disabled: bool,
    pub readonly: bool,
    /// Show the loading indicator.
    pub loading: bool,
}

/// The dropdown menu.
#[derive(Debug, Clone, PartialEq)]
pub struct MenuView {
    pub listbox_id: String,
    pub multiselectable: bool,
    pub content: MenuContent,
}

/// Body of the dropdown menu.
#[derive(Debug, Clone, PartialEq)]
pub enum MenuContent {
    /// There is nothing to pick from.
    NoOptions,
    /// The rendered slice of the option list.
    Options {
        items: Vec<OptionView>,
        /// Space standing in for the options before the slice, in pixels.
        padding_before: f32,
        /// Space standing in for the options after the slice, in pixels.
        padding_after: f32,
    },
}

/// One rendered option.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionView {
    /// Index in the full option list.
    pub index: usize,
    pub id: String,
    pub label: String,
    pub html: bool,
    pub selected: bool,
    pub focused: bool,
    pub disabled: bool,
}

impl FilterTerm {
    /// Describe what the term currently shows.
    pub fn render(&self) -> TermView {
        let shows_input = self.shows_input();
        TermView {
            mode: self.mode(),
            selection: (!shows_input).then(|| self.selection_view()),
            input: shows_input.then(|| self.input_view()),
            menu: (self.menu_open && self.is_editable()).then(|| self.menu_view()),
        }
    }

    fn listbox_id(&self) -> String {
        format!("{}_lb", self.input_id)
    }

    fn option_id(&self, index: usize) -> String {
        format!("{}_{}", self.input_id, index)
    }

    fn selection_view(&self) -> SelectionView {
        let labels = self.model.labels();
        SelectionView {
            id: self.selection_id.clone(),
            text: labels.join(JOINER.to_string().as_str()),
            labels,
            disabled: !self.is_editable(),
        }
    }

    fn input_view(&self) -> InputView {
        let active_descendant = usize::try_from(self.option_index)
            .ok()
            .map(|index| self.option_id(index));
        InputView {
            id: self.input_id.clone(),
            text: self.buffer.text().to_string(),
            caret: self.buffer.caret(),
            aria: ComboboxAria {
                role: "combobox",
                label: self.config.label.clone(),
                readonly: self.config.readonly,
                autocomplete: "list",
                expanded: self.menu_open,
                controls: self.listbox_id(),
                active_descendant,
            },
            disabled: self.config.disable,
            readonly: self.config.readonly,
            loading: self.filter.shows_indicator(),
        }
    }

    fn menu_view(&self) -> MenuView {
        let content = if self.model.options().is_empty() {
            MenuContent::NoOptions
        } else {
            let range = self.window.slice_range();
            let (padding_before, padding_after) = self.window.padding();
            let accessors = &self.config.accessors;
            let items = self
                .model
                .options()
                .iter()
                .enumerate()
                .skip(range.start)
                .take(range.len())
                .map(|(index, option)| {
                    let disabled = accessors.is_disabled(option);
                    OptionView {
                        index,
                        id: self.option_id(index),
                        label: accessors.label_of(option),
                        html: needs_html(option, self.config.options_html),
                        selected: !disabled && self.model.is_selected(option),
                        focused: !disabled && self.option_index == index as i32,
                        disabled,
                    }
                })
                .collect();
            MenuContent::Options {
                items,
                padding_before,
                padding_after,
            }
        };

        MenuView {
            listbox_id: self.listbox_id(),
            multiselectable: self.config.multiple,
            content,
        }
    }
}
