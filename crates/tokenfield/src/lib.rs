//! Tokenfield - a tokenized filter combobox engine.
//!
//! A [`FilterTerm`] is one combobox holding a single value or an ordered list
//! of values. Multi-value terms edit their whole selection inside one input,
//! split into segments by [`JOINER`], so each edit applies to the segment under
//! the caret. Options come from an asynchronous filter round trip identified by
//! [`FilterTicket`]s; stale answers are dropped.
//!
//! Terms draw nothing themselves. The host forwards input, key, focus and
//! pointer events, calls [`FilterTerm::tick`] to run deferred work and timers,
//! and renders the [`TermView`] returned by [`FilterTerm::render`].
//!
//! Several terms form a [`TermRow`] (type, operator, value), whose choices a
//! [`FilterCatalog`] describes.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use parking_lot::Mutex;
//! use serde_json::json;
//! use tokenfield::{FilterTerm, FilterUpdate, TermConfig};
//!
//! let mut term = FilterTerm::new(TermConfig::new().with_emit_value(true));
//!
//! let requests = Arc::new(Mutex::new(Vec::new()));
//! let sink = requests.clone();
//! term.filter_requested.connect(move |request| sink.lock().push(request.clone()));
//!
//! term.show_menu();
//! let request = requests.lock()[0].clone();
//! term.resolve_filter(
//!     request.ticket,
//!     FilterUpdate::with_options(vec![
//!         json!({ "value": 1, "label": "One" }),
//!         json!({ "value": 2, "label": "Two" }),
//!     ]),
//! );
//! term.tick();
//!
//! term.click_option(1);
//! assert_eq!(term.value(), &json!(2));
//! ```

pub mod accessor;
pub mod catalog;
pub mod config;
pub mod error;
pub mod filter;
pub mod keys;
pub mod logging;
pub mod popup;
pub mod row;
pub mod segments;
pub mod term;
pub mod value;
pub mod virtual_scroll;

pub use accessor::{OptionAccessor, OptionAccessors};
pub use catalog::{CatalogFormat, FilterCatalog, FilterDefinition, FilterGroup, OperatorDefinition};
pub use config::TermConfig;
pub use error::{ConfigError, ConfigResult};
pub use filter::{FilterPhase, FilterRequest, FilterTicket, FilterUpdate};
pub use keys::{Key, KeyEvent, KeyboardModifiers};
pub use popup::PopupTracker;
pub use row::TermRow;
pub use segments::{JOINER, SegmentBuffer, SlotTarget};
pub use term::{
    ComboboxAria, FilterTerm, FocusTarget, InputView, MenuContent, MenuView, OptionView,
    SelectionEvent, SelectionView, TermMode, TermTimer, TermView,
};
pub use value::{TermOption, ValueModel};
pub use virtual_scroll::{FixedSizeWindow, VirtualScroll};

pub use tokenfield_core::{Clock, ConnectionId, ManualClock, Signal, SystemClock};
