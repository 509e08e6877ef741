//! Input/output helpers.
//!
//! - panel JSON exports (`export`)

pub mod export;

pub use export::*;
