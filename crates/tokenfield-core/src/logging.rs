//! Tracing integration.
//!
//! tokenfield instruments itself with the `tracing` crate. Install any
//! subscriber in the application to see the output:
//!
//! ```ignore
//! tracing_subscriber::fmt()
//!     .with_env_filter("tokenfield=debug,tokenfield_core=warn")
//!     .init();
//! ```

/// Target names for log filtering.
///
/// Use these with `tracing` directives to filter logs by subsystem.
pub mod targets {
    /// Core crate target.
    pub const CORE: &str = "tokenfield_core";
    /// Signal/slot system target.
    pub const SIGNAL: &str = "tokenfield_core::signal";
    /// Timer system target.
    pub const TIMER: &str = "tokenfield_core::timer";
    /// Next-tick queue target.
    pub const TICK: &str = "tokenfield_core::tick";
}
