//! Tracing targets for the widget crate.
//!
//! See [`tokenfield_core::logging`] for how to install a subscriber.

/// Target names for log filtering.
pub mod targets {
    /// Term state machine target.
    pub const TERM: &str = "tokenfield::term";
    /// Async filter protocol target.
    pub const FILTER: &str = "tokenfield::filter";
    /// Keyboard handling target.
    pub const KEYS: &str = "tokenfield::keys";
    /// Popup coordination target.
    pub const POPUP: &str = "tokenfield::popup";
    /// Filter catalog (configuration) target.
    pub const CATALOG: &str = "tokenfield::catalog";
    /// Term row target.
    pub const ROW: &str = "tokenfield::row";
}
