//! Term side of the async filter protocol.

use super::{FilterTerm, FocusTarget, TermTick, TermTimer};
use crate::filter::{AfterFilterFn, FilterRequest, FilterTicket, FilterUpdate};
use crate::logging::targets;

impl FilterTerm {
    /// Ask the collaborator for options matching `query`.
    ///
    /// Does nothing without a collaborator, or while the menu is closed unless
    /// `keep_closed` is set.
    pub(super) fn filter(&mut self, query: String, keep_closed: bool, autofill: Option<String>) {
        if !self.has_filter() || (!keep_closed && !self.menu_open) {
            return;
        }

        // A single-value input still showing the selected label searches for
        // everything.
        let shows_selected_label = !query.is_empty()
            && !self.config.multiple
            && !self.user_input
            && self.model.labels().first() == Some(&query);
        let query = if shows_selected_label { String::new() } else { query };

        let delay = self.config.filter_safety();
        self.start_timer(TermTimer::FilterSafety, delay);

        let (ticket, was_loading) = self.filter.begin(keep_closed, autofill);
        if was_loading {
            self.filter_aborted.emit(());
        }

        tracing::debug!(
            target: targets::FILTER,
            ticket = ticket.as_u64(),
            %query,
            keep_closed,
            "filter requested"
        );
        self.filter_requested.emit(FilterRequest {
            ticket,
            query,
            keep_closed,
        });
    }

    /// Answer the filter request identified by `ticket`.
    ///
    /// Returns `false` if the answer was ignored because a newer request
    /// superseded it or the term stopped editing.
    pub fn resolve_filter(&mut self, ticket: FilterTicket, update: FilterUpdate) -> bool {
        let Some(pending) = self.filter.pending().filter(|p| p.ticket == ticket) else {
            tracing::debug!(
                target: targets::FILTER,
                ticket = ticket.as_u64(),
                "stale filter answer dropped"
            );
            return false;
        };
        if !(pending.keep_closed || self.menu_open || self.focus == FocusTarget::Input) {
            tracing::debug!(
                target: targets::FILTER,
                ticket = ticket.as_u64(),
                "filter answer arrived after editing ended"
            );
            return false;
        }
        let Some(pending) = self.filter.accept(ticket) else {
            return false;
        };

        self.timers.cancel(TermTimer::FilterSafety);
        if let Some(options) = update.options {
            self.set_options(options);
        }
        tracing::debug!(target: targets::FILTER, ticket = ticket.as_u64(), "filter resolved");

        self.ticks.post(TermTick::FilterSettled {
            keep_closed: pending.keep_closed,
            close_menu: update.close_menu,
            after: update.after,
            autofill: pending.autofill,
        });
        true
    }

    /// Report that the filter request identified by `ticket` failed.
    ///
    /// A live failure clears the loading state and closes the menu, which
    /// looks to listeners exactly like an abandoned request.
    pub fn reject_filter(&mut self, ticket: FilterTicket) -> bool {
        if !self.filter.is_live(ticket) {
            tracing::debug!(
                target: targets::FILTER,
                ticket = ticket.as_u64(),
                "stale filter failure dropped"
            );
            return false;
        }
        tracing::debug!(target: targets::FILTER, ticket = ticket.as_u64(), "filter rejected");
        self.close_menu(false);
        true
    }

    pub(super) fn settle_filter(
        &mut self,
        keep_closed: bool,
        close_menu: bool,
        after: Option<AfterFilterFn>,
        autofill: Option<String>,
    ) {
        self.filter.settle();

        if self.is_editable() {
            if keep_closed || close_menu {
                if self.menu_open {
                    self.close_menu(true);
                }
            } else if self.menu_open {
                self.update_menu(true);
            } else {
                self.open_menu();
            }
        }

        if let Some(after) = after {
            self.ticks.post(TermTick::AfterFilter(after));
        }
        if let Some(text) = autofill {
            self.ticks.post(TermTick::AutofillRetry(text));
        }
    }
}
