//! Pager effect types.
//!
//! Effects are returned by the reducer and executed by the runtime, which
//! keeps `update` free of I/O.

/// Effects returned by the reducer for the runtime to execute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PagerEffect {
    /// Leave the pager. Nothing is rendered after this.
    Quit,
}
