//! The filter term: one single- or multi-value combobox.
//!
//! A term reconciles four things: a free-text input, the chip showing the
//! current selection, a windowed dropdown menu and the async filter round
//! trip. It has two modes. While *collapsed* the selection chip is shown; while
//! *editing* the input and the menu are.
//!
//! Terms are driven from the outside: the host forwards input, key, focus and
//! pointer events, then calls [`FilterTerm::tick`] to run deferred work and
//! expired timers. All notifications go out through public [`Signal`]s.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use parking_lot::Mutex;
//! use serde_json::json;
//! use tokenfield::{FilterTerm, TermConfig};
//!
//! let mut term = FilterTerm::new(TermConfig::new().with_multiple(true));
//! term.set_options(vec![json!("red"), json!("green"), json!("blue")]);
//!
//! let values = Arc::new(Mutex::new(Vec::new()));
//! let sink = values.clone();
//! term.value_changed.connect(move |value| sink.lock().push(value.clone()));
//!
//! term.show_menu();
//! term.click_option(1);
//! assert_eq!(values.lock().last(), Some(&json!(["green"])));
//! ```

mod filtering;
mod keyboard;
mod menu;
mod selection;
mod view;

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use serde_json::Value;
use tokenfield_core::{Clock, CoreError, Signal, SystemClock, TickQueue, TimerQueue};

use crate::config::TermConfig;
use crate::filter::{AfterFilterFn, FilterPhase, FilterRequest, FilterState};
use crate::keys::KeyEvent;
use crate::logging::targets;
use crate::segments::SegmentBuffer;
use crate::value::{TermOption, ValueModel};
use crate::virtual_scroll::{FixedSizeWindow, VirtualScroll};

pub use view::{ComboboxAria, InputView, MenuContent, MenuView, OptionView, SelectionView, TermView};

/// Rounds of deferred work a single [`FilterTerm::tick`] runs before giving up.
const TICK_LIMIT: usize = 16;

static NEXT_UID: AtomicU64 = AtomicU64::new(1);

fn next_uid() -> String {
    format!("f_{}", NEXT_UID.fetch_add(1, Ordering::Relaxed))
}

/// Visible mode of a term.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TermMode {
    /// Menu closed, selection chip shown.
    Collapsed,
    /// Input shown, because the menu is open or the selection may not stay
    /// empty.
    Editing,
}

/// Element of the term that holds keyboard focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FocusTarget {
    #[default]
    None,
    Input,
    Selection,
}

/// A structural change to the selection.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionEvent {
    /// Position in the selection.
    pub index: usize,
    /// The value added or removed.
    pub value: Value,
}

/// One-shot timers a term runs, at most one per purpose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TermTimer {
    /// Last keystroke to filter request.
    InputDebounce,
    /// Hide the menu if a filter request goes unanswered.
    FilterSafety,
    /// Focus left the input; close unless it comes back.
    BlurDebounce,
}

/// Work deferred to the next tick.
pub(crate) enum TermTick {
    /// Focus the input and rewrite it from the selection.
    RefocusInput,
    /// Finish applying an accepted filter answer.
    FilterSettled {
        keep_closed: bool,
        close_menu: bool,
        after: Option<AfterFilterFn>,
        autofill: Option<String>,
    },
    /// Run a collaborator's post-filter callback.
    AfterFilter(AfterFilterFn),
    /// Retry matching autofilled text once options have refreshed.
    AutofillRetry(String),
}

impl fmt::Debug for TermTick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RefocusInput => f.write_str("RefocusInput"),
            Self::FilterSettled {
                keep_closed,
                close_menu,
                ..
            } => f
                .debug_struct("FilterSettled")
                .field("keep_closed", keep_closed)
                .field("close_menu", close_menu)
                .finish_non_exhaustive(),
            Self::AfterFilter(_) => f.write_str("AfterFilter(..)"),
            Self::AutofillRetry(text) => f.debug_tuple("AutofillRetry").field(text).finish(),
        }
    }
}

/// A single tokenized filter term.
pub struct FilterTerm {
    config: TermConfig,
    clock: Arc<dyn Clock>,
    model: ValueModel,
    buffer: SegmentBuffer,
    filter: FilterState,
    window: Box<dyn VirtualScroll>,
    timers: TimerQueue<TermTimer>,
    ticks: TickQueue<TermTick>,

    menu_open: bool,
    /// The menu was hidden while waiting for a filter answer; reopening
    /// continues the same editing session.
    menu_suspended: bool,
    /// Highlighted option, -1 for none.
    option_index: i32,
    focus: FocusTarget,
    did_close_with_enter: bool,
    /// The input text was typed rather than written by the term.
    user_input: bool,
    /// Text restored when arrow navigation returns to no highlight.
    default_input: String,

    input_id: String,
    selection_id: String,

    // Signals
    /// Emitted with the new raw value after every user change.
    pub value_changed: Signal<Value>,
    /// Emitted when a value is inserted into a multi-value selection.
    pub added: Signal<SelectionEvent>,
    /// Emitted once per value removed from a multi-value selection.
    pub removed: Signal<SelectionEvent>,
    /// Emitted whenever the input text changes.
    pub input_value_changed: Signal<String>,
    /// Emitted when the option list should be refreshed.
    pub filter_requested: Signal<FilterRequest>,
    /// Emitted when a loading filter request is abandoned or fails.
    pub filter_aborted: Signal<()>,
    pub popup_shown: Signal<()>,
    pub popup_hidden: Signal<()>,
    /// Emitted when an editable term opens its menu.
    pub focused: Signal<()>,
    /// Emitted when focus left the term while its menu was open.
    pub blurred: Signal<()>,
    pub key_down: Signal<KeyEvent>,
    pub key_up: Signal<KeyEvent>,
    pub key_press: Signal<KeyEvent>,
}

impl FilterTerm {
    /// Create a term reading time from the system clock.
    pub fn new(config: TermConfig) -> Self {
        let window = FixedSizeWindow::new(config.effective_item_size(), config.viewport_px);
        let model = ValueModel::new(config.multiple, config.map_options, config.accessors.clone());

        Self {
            config,
            clock: Arc::new(SystemClock),
            model,
            buffer: SegmentBuffer::new(),
            filter: FilterState::new(),
            window: Box::new(window),
            timers: TimerQueue::new(),
            ticks: TickQueue::new(),
            menu_open: false,
            menu_suspended: false,
            option_index: -1,
            focus: FocusTarget::None,
            did_close_with_enter: false,
            user_input: false,
            default_input: String::new(),
            input_id: next_uid(),
            selection_id: next_uid(),
            value_changed: Signal::new(),
            added: Signal::new(),
            removed: Signal::new(),
            input_value_changed: Signal::new(),
            filter_requested: Signal::new(),
            filter_aborted: Signal::new(),
            popup_shown: Signal::new(),
            popup_hidden: Signal::new(),
            focused: Signal::new(),
            blurred: Signal::new(),
            key_down: Signal::new(),
            key_up: Signal::new(),
            key_press: Signal::new(),
        }
    }

    /// Read time from `clock` using builder pattern.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Replace the windowing collaborator using builder pattern.
    pub fn with_window(mut self, mut window: Box<dyn VirtualScroll>) -> Self {
        window.set_length(self.model.options().len());
        self.window = window;
        self
    }

    /// Set the initial value using builder pattern.
    pub fn with_value(mut self, raw: Value) -> Self {
        self.set_value(raw);
        self
    }

    /// Set the initial options using builder pattern.
    pub fn with_options(mut self, options: Vec<Value>) -> Self {
        self.set_options(options);
        self
    }

    // =========================================================================
    // State
    // =========================================================================

    pub fn config(&self) -> &TermConfig {
        &self.config
    }

    /// The raw value.
    pub fn value(&self) -> &Value {
        self.model.raw()
    }

    /// Replace the raw value from outside.
    pub fn set_value(&mut self, raw: Value) {
        self.model.set_raw(raw);
    }

    /// The selected options.
    pub fn selection(&self) -> &[TermOption] {
        self.model.selection()
    }

    /// Labels of the selected options.
    pub fn selected_labels(&self) -> Vec<String> {
        self.model.labels()
    }

    pub fn options(&self) -> &[TermOption] {
        self.model.options()
    }

    /// Replace the option list.
    pub fn set_options(&mut self, options: Vec<Value>) {
        self.model.set_options(options);
        let len = self.model.options().len();
        self.window.set_length(len);
        if self.option_index >= len as i32 {
            self.option_index = -1;
        }
    }

    /// Current input text.
    pub fn input_text(&self) -> &str {
        self.buffer.text()
    }

    /// Caret selection in the input, in chars.
    pub fn caret(&self) -> (usize, usize) {
        self.buffer.caret()
    }

    /// Hole slots left in the multi-value input.
    pub fn holes(&self) -> &[usize] {
        self.buffer.holes()
    }

    /// Highlighted option, -1 for none.
    pub fn option_index(&self) -> i32 {
        self.option_index
    }

    pub fn is_menu_open(&self) -> bool {
        self.menu_open
    }

    /// A filter request is in flight or settling.
    pub fn is_loading(&self) -> bool {
        self.filter.is_loading()
    }

    pub fn filter_phase(&self) -> FilterPhase {
        self.filter.phase()
    }

    pub fn focus_target(&self) -> FocusTarget {
        self.focus
    }

    /// Whether the user may change the selection.
    pub fn is_editable(&self) -> bool {
        self.config.is_editable()
    }

    /// Disable or enable the term. Disabling closes the menu.
    pub fn set_disabled(&mut self, disabled: bool) {
        self.config.disable = disabled;
        self.close_if_locked();
    }

    /// Make the term read-only or writable. Read-only closes the menu.
    pub fn set_readonly(&mut self, readonly: bool) {
        self.config.readonly = readonly;
        self.close_if_locked();
    }

    fn close_if_locked(&mut self) {
        if !self.is_editable() && self.menu_open {
            self.close_menu(false);
        }
    }

    /// The input is shown instead of the selection chip.
    pub fn shows_input(&self) -> bool {
        self.menu_open || (self.config.disallow_empty && self.model.is_empty())
    }

    pub fn mode(&self) -> TermMode {
        if self.shows_input() {
            TermMode::Editing
        } else {
            TermMode::Collapsed
        }
    }

    /// A collaborator listens for filter requests.
    fn has_filter(&self) -> bool {
        self.filter_requested.is_connected()
    }

    fn now(&self) -> Instant {
        self.clock.now()
    }

    fn start_timer(&mut self, timer: TermTimer, delay: Duration) {
        let now = self.now();
        self.timers.start(timer, now, delay);
    }

    /// Replace the raw value after a user change and announce it.
    fn emit_value(&mut self, raw: Value) {
        tracing::debug!(target: targets::TERM, value = %raw, "value changed");
        self.model.set_raw(raw.clone());
        self.value_changed.emit(raw);
    }

    // =========================================================================
    // Deferred work
    // =========================================================================

    /// Whether deferred work or timers are pending.
    pub fn has_pending_work(&self) -> bool {
        self.ticks.has_pending() || self.timers.pending_count() > 0
    }

    /// Run deferred work and every timer that is due.
    ///
    /// Returns the time until the next pending timer.
    pub fn tick(&mut self) -> Option<Duration> {
        let mut rounds = 0;
        loop {
            for item in self.ticks.drain() {
                self.run_tick(item);
            }

            let now = self.now();
            for timer in self.timers.take_expired(now) {
                self.fire_timer(timer);
            }

            let due_now = self.timers.time_until_next(now).is_some_and(|d| d.is_zero());
            if !self.ticks.has_pending() && !due_now {
                break;
            }

            rounds += 1;
            if rounds >= TICK_LIMIT {
                let error = CoreError::TickOverflow { limit: TICK_LIMIT };
                tracing::warn!(target: targets::TERM, %error, "leaving deferred work for the next tick");
                break;
            }
        }

        let now = self.now();
        self.timers.time_until_next(now)
    }

    fn run_tick(&mut self, item: TermTick) {
        tracing::trace!(target: targets::TERM, ?item, "running deferred work");
        match item {
            TermTick::RefocusInput => {
                self.focus_input();
                self.reset_input_value();
            }
            TermTick::FilterSettled {
                keep_closed,
                close_menu,
                after,
                autofill,
            } => self.settle_filter(keep_closed, close_menu, after, autofill),
            TermTick::AfterFilter(after) => after(self),
            TermTick::AutofillRetry(text) => self.fill_autofill(&text, true),
        }
    }

    fn fire_timer(&mut self, timer: TermTimer) {
        tracing::trace!(target: targets::TERM, ?timer, "term timer fired");
        match timer {
            TermTimer::InputDebounce => {
                let query = self.segment_query();
                self.filter(query, false, None);
            }
            TermTimer::FilterSafety => {
                if self.menu_open {
                    tracing::debug!(target: targets::FILTER, "no filter answer yet, hiding menu");
                    self.hide_menu();
                    self.menu_suspended = true;
                }
            }
            TermTimer::BlurDebounce => {
                let was_open = self.menu_open;
                self.close_menu(false);
                self.focus = FocusTarget::None;
                if was_open {
                    self.blurred.emit(());
                }
            }
        }
    }
}

impl fmt::Debug for FilterTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilterTerm")
            .field("input_id", &self.input_id)
            .field("value", self.model.raw())
            .field("input", &self.buffer.text())
            .field("menu_open", &self.menu_open)
            .field("option_index", &self.option_index)
            .field("focus", &self.focus)
            .field("filter", &self.filter.phase())
            .finish_non_exhaustive()
    }
}
