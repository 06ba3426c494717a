//! Strip computation algorithms.
//!
//! - **Strips**: integer-programming triangle strips over the dual graph
//! - **Progress**: stage reporting for long solves

pub mod strips;

mod progress;

pub use progress::{Progress, Stage};
