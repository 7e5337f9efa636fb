//! Async filter protocol.
//!
//! When the input text changes, a term asks its collaborator for a fresh
//! option list by emitting a [`FilterRequest`]. The collaborator answers later
//! with [`FilterTerm::resolve_filter`] or [`FilterTerm::reject_filter`], quoting
//! the request's [`FilterTicket`].
//!
//! Only the most recent request is live. Issuing a new one replaces the ticket,
//! so an answer to a superseded request is dropped no matter when it arrives.
//! The underlying I/O is not stopped; its result is ignored.
//!
//! [`FilterTerm::resolve_filter`]: crate::FilterTerm::resolve_filter
//! [`FilterTerm::reject_filter`]: crate::FilterTerm::reject_filter

use std::fmt;

use serde_json::Value;

use crate::logging::targets;
use crate::term::FilterTerm;

/// Identifies one filter request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FilterTicket(u64);

impl FilterTicket {
    /// Raw ticket number.
    pub fn as_u64(self) -> u64 {
        self.0
    }
}

/// Emitted when a term wants its option list refreshed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterRequest {
    /// Ticket to quote in the answer.
    pub ticket: FilterTicket,
    /// Text of the segment under the caret.
    pub query: String,
    /// The request validates typed text without opening the menu.
    pub keep_closed: bool,
}

/// Callback run once the term has applied a filter answer.
pub type AfterFilterFn = Box<dyn FnOnce(&mut FilterTerm) + Send>;

/// A collaborator's answer to a [`FilterRequest`].
#[derive(Default)]
pub struct FilterUpdate {
    /// Replacement option list; `None` keeps the current one.
    pub options: Option<Vec<Value>>,
    /// Close the menu instead of refreshing it.
    pub close_menu: bool,
    /// Run after the menu has been refreshed.
    pub after: Option<AfterFilterFn>,
}

impl FilterUpdate {
    /// An answer carrying a new option list.
    pub fn with_options(options: Vec<Value>) -> Self {
        Self {
            options: Some(options),
            ..Self::default()
        }
    }

    /// Ask the term to close its menu.
    pub fn closing(mut self) -> Self {
        self.close_menu = true;
        self
    }

    /// Attach a callback run after the update is applied.
    pub fn then<F>(mut self, after: F) -> Self
    where
        F: FnOnce(&mut FilterTerm) + Send + 'static,
    {
        self.after = Some(Box::new(after));
        self
    }
}

impl fmt::Debug for FilterUpdate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilterUpdate")
            .field("options", &self.options.as_ref().map(Vec::len))
            .field("close_menu", &self.close_menu)
            .field("after", &self.after.is_some())
            .finish()
    }
}

/// Phase of the filter round trip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FilterPhase {
    #[default]
    Idle,
    Requesting,
    Resolved,
    Aborted,
}

/// The live request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingFilter {
    pub ticket: FilterTicket,
    pub keep_closed: bool,
    /// Autofill text to match again once the answer is applied.
    pub autofill: Option<String>,
}

/// Ticket bookkeeping and loading flags of one term.
#[derive(Debug, Default)]
pub struct FilterState {
    last_ticket: u64,
    pending: Option<PendingFilter>,
    phase: FilterPhase,
    loading: bool,
    indicator: bool,
}

impl FilterState {
    /// Create an idle state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current phase.
    pub fn phase(&self) -> FilterPhase {
        self.phase
    }

    /// A request is in flight or its answer has not settled yet.
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// The loading indicator is shown.
    pub fn shows_indicator(&self) -> bool {
        self.indicator
    }

    /// The live request, if any.
    pub fn pending(&self) -> Option<&PendingFilter> {
        self.pending.as_ref()
    }

    /// Whether `ticket` belongs to the live request.
    pub fn is_live(&self, ticket: FilterTicket) -> bool {
        self.pending.as_ref().is_some_and(|p| p.ticket == ticket)
    }

    /// Start a new request, replacing any live one.
    ///
    /// Returns the new ticket and whether a previous request was still
    /// loading.
    pub fn begin(&mut self, keep_closed: bool, autofill: Option<String>) -> (FilterTicket, bool) {
        let was_loading = self.loading;
        self.loading = true;
        self.indicator = true;

        self.last_ticket += 1;
        let ticket = FilterTicket(self.last_ticket);
        if let Some(previous) = self.pending.replace(PendingFilter {
            ticket,
            keep_closed,
            autofill,
        }) {
            tracing::debug!(
                target: targets::FILTER,
                superseded = previous.ticket.as_u64(),
                ticket = ticket.as_u64(),
                "filter request superseded"
            );
        }
        self.phase = FilterPhase::Requesting;
        (ticket, was_loading)
    }

    /// Take the live request if `ticket` matches it.
    ///
    /// The loading flag stays set until [`FilterState::settle`]; the indicator
    /// is hidden right away.
    pub fn accept(&mut self, ticket: FilterTicket) -> Option<PendingFilter> {
        if !self.is_live(ticket) {
            tracing::debug!(
                target: targets::FILTER,
                ticket = ticket.as_u64(),
                "stale filter answer dropped"
            );
            return None;
        }
        self.indicator = false;
        self.phase = FilterPhase::Resolved;
        self.pending.take()
    }

    /// The accepted answer has been applied.
    pub fn settle(&mut self) {
        self.loading = false;
    }

    /// Forget the live request.
    ///
    /// Returns `true` if a request was still loading.
    pub fn abort(&mut self) -> bool {
        let was_loading = self.loading;
        self.pending = None;
        self.loading = false;
        self.indicator = false;
        if was_loading {
            self.phase = FilterPhase::Aborted;
        }
        was_loading
    }
}
