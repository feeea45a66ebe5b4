//! Clock-in/clock-out behaviour: retry counts and punch methods.

use super::rates::percentage;
use crate::models::time_entry::TimeEntry;
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MethodUsage {
    pub method: String,
    pub count: usize,
    #[serde(with = "rust_decimal::serde::float")]
    pub percentage: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClockBehavior {
    /// tries → number of entries
    pub clock_in_tries: BTreeMap<i64, usize>,
    pub clock_out_tries: BTreeMap<i64, usize>,
    /// Most used first.
    pub clock_in_methods: Vec<MethodUsage>,
    pub clock_out_methods: Vec<MethodUsage>,
}

fn usage(counts: HashMap<&str, usize>, total: usize) -> Vec<MethodUsage> {
    let mut out: Vec<MethodUsage> = counts
        .into_iter()
        .map(|(method, count)| MethodUsage {
            method: method.to_string(),
            count,
            percentage: percentage(count, total),
        })
        .collect();

    out.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.method.cmp(&b.method)));
    out
}

pub fn clock_behavior(entries: &[TimeEntry]) -> ClockBehavior {
    let mut in_tries = BTreeMap::new();
    let mut out_tries = BTreeMap::new();
    let mut in_methods: HashMap<&str, usize> = HashMap::new();
    let mut out_methods: HashMap<&str, usize> = HashMap::new();

    for e in entries {
        *in_tries.entry(e.clock_in_tries).or_insert(0) += 1;
        *out_tries.entry(e.clock_out_tries).or_insert(0) += 1;
        *in_methods.entry(e.clock_in_method.as_str()).or_insert(0) += 1;
        *out_methods.entry(e.clock_out_method.as_str()).or_insert(0) += 1;
    }

    ClockBehavior {
        clock_in_tries: in_tries,
        clock_out_tries: out_tries,
        clock_in_methods: usage(in_methods, entries.len()),
        clock_out_methods: usage(out_methods, entries.len()),
    }
}
