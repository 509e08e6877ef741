//! Domain types used throughout the dashboard.
//!
//! This module defines:
//!
//! - API payloads (`DateValuePoint`, `RawDivisionQuarter`, `Summary`, ...)
//! - normalized chart inputs (`ChartData`, `Dataset`, `ScatterChart`)
//! - colors and palettes (`Rgb`, `Palette`)
//! - user state (`YearSelection`) and panel identities (`PanelKind`)

pub mod types;

pub use types::*;
