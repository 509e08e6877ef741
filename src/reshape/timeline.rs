//! Align several date/value series onto one shared date axis.
//!
//! The axis is the sorted union of every date seen in any series. Dates are
//! compared as strings, which orders ISO-8601 dates (`2024-01`, `2024-01-15`)
//! and year-quarter labels correctly as long as every series uses the same
//! format.

use std::collections::{BTreeSet, HashMap};

use crate::domain::DateValuePoint;

/// A borrowed, labeled list of points to align.
#[derive(Debug, Clone, Copy)]
pub struct NamedPoints<'a> {
    pub label: &'a str,
    pub points: &'a [DateValuePoint],
}

impl<'a> NamedPoints<'a> {
    pub fn new(label: &'a str, points: &'a [DateValuePoint]) -> Self {
        Self { label, points }
    }
}

/// Output of [`align`]: one axis and, per input series, one value per axis date.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AlignedSeries {
    pub axis: Vec<String>,
    pub series: Vec<(String, Vec<Option<f64>>)>,
}

/// Merge `inputs` onto their common date axis.
///
/// A date missing from a series (or present with a `null` value) becomes
/// `None`. If a series repeats a date, the first occurrence wins.
pub fn align(inputs: &[NamedPoints<'_>]) -> AlignedSeries {
    let axis: Vec<String> = inputs
        .iter()
        .flat_map(|s| s.points.iter().map(|p| p.date.as_str()))
        .collect::<BTreeSet<&str>>()
        .into_iter()
        .map(str::to_string)
        .collect();

    let series = inputs
        .iter()
        .map(|input| {
            let mut by_date: HashMap<&str, Option<f64>> = HashMap::with_capacity(input.points.len());
            for p in input.points {
                by_date.entry(p.date.as_str()).or_insert(p.value);
            }
            let values = axis
                .iter()
                .map(|date| by_date.get(date.as_str()).copied().flatten())
                .collect();
            (input.label.to_string(), values)
        })
        .collect();

    AlignedSeries { axis, series }
}
