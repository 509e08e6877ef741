//! `wayne-dash` library crate.
//!
//! The binary is a thin wrapper around this library so that:
//!
//! - reshaping and scheduling logic is testable without spawning processes
//! - the same panel loaders back both the TUI and the one-shot commands

pub mod app;
pub mod cli;
pub mod data;
pub mod domain;
pub mod error;
pub mod io;
pub mod report;
pub mod reshape;
pub mod tui;
