//! Core plumbing for tokenfield.
//!
//! This crate provides the building blocks the widget crate is made of:
//!
//! - **Signals**: Type-safe notifications with connect/disconnect
//! - **Timers**: One-shot timers keyed by purpose, at most one per purpose
//! - **Tick queue**: Deferred work that runs after the current update commits
//! - **Clocks**: Injectable time sources, including a manual clock for tests
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//! use tokenfield_core::{Clock, ManualClock, Signal, TimerQueue};
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
//! enum Purpose {
//!     Debounce,
//! }
//!
//! let clock = ManualClock::new();
//! let fired = Signal::<Purpose>::new();
//! fired.connect(|purpose| println!("{purpose:?} fired"));
//!
//! let mut timers = TimerQueue::new();
//! timers.start(Purpose::Debounce, clock.now(), Duration::from_millis(250));
//!
//! clock.advance(Duration::from_millis(250));
//! for purpose in timers.take_expired(clock.now()) {
//!     fired.emit(purpose);
//! }
//! ```

mod clock;
mod error;
pub mod logging;
pub mod signal;
mod tick;
mod timer;

pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{CoreError, Result};
pub use signal::{ConnectionGuard, ConnectionId, Signal};
pub use tick::{TickId, TickQueue};
pub use timer::{TimerId, TimerQueue};
