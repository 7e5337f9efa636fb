//! Popup coordination across the terms of a row.
//!
//! Each term announces its menu opening and closing. The tracker counts open
//! popups so the surrounding field can look focused while any of them is
//! open, without terms knowing about their siblings.

use std::sync::Arc;

use parking_lot::Mutex;
use tokenfield_core::{ConnectionId, Signal};

use crate::logging::targets;
use crate::term::FilterTerm;

struct PopupInner {
    open: Mutex<usize>,
    changed: Signal<bool>,
}

/// Shared count of open popups. Clones share the count.
#[derive(Clone)]
pub struct PopupTracker {
    inner: Arc<PopupInner>,
}

impl PopupTracker {
    /// Create a tracker with nothing open.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(PopupInner {
                open: Mutex::new(0),
                changed: Signal::new(),
            }),
        }
    }

    /// Count `term`'s popup. Returns the connections made on its signals.
    pub fn attach(&self, term: &FilterTerm) -> [ConnectionId; 2] {
        let shown = self.clone();
        let hidden = self.clone();
        [
            term.popup_shown.connect(move |_| shown.popup_shown()),
            term.popup_hidden.connect(move |_| hidden.popup_hidden()),
        ]
    }

    /// A popup opened.
    pub fn popup_shown(&self) {
        let opened = {
            let mut open = self.inner.open.lock();
            *open += 1;
            *open == 1
        };
        if opened {
            tracing::debug!(target: targets::POPUP, "first popup opened");
            self.inner.changed.emit(true);
        }
    }

    /// A popup closed.
    pub fn popup_hidden(&self) {
        let closed = {
            let mut open = self.inner.open.lock();
            if *open == 0 {
                tracing::warn!(target: targets::POPUP, "popup hidden while none was open");
                return;
            }
            *open -= 1;
            *open == 0
        };
        if closed {
            tracing::debug!(target: targets::POPUP, "last popup closed");
            self.inner.changed.emit(false);
        }
    }

    /// Number of open popups.
    pub fn open_count(&self) -> usize {
        *self.inner.open.lock()
    }

    /// Whether any popup is open.
    pub fn has_popup_open(&self) -> bool {
        self.open_count() > 0
    }

    /// Emitted with the new state when the first popup opens or the last one
    /// closes.
    pub fn changed(&self) -> &Signal<bool> {
        &self.inner.changed
    }
}

impl Default for PopupTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for PopupTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PopupTracker")
            .field("open", &self.open_count())
            .finish()
    }
}
