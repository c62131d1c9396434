use std::collections::BTreeMap;

use indexmap::{IndexMap, IndexSet};
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

/// Running totals of one stack at one x.
///
/// Positive and negative values stack away from the threshold separately.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct StackTotals {
    pub positive: f64,
    pub negative: f64,
}

impl StackTotals {
    #[must_use]
    pub fn total_for(self, negative: bool) -> f64 {
        if negative { self.negative } else { self.positive }
    }
}

/// Per-redraw stack totals and column slots shared by cartesian series.
///
/// Rebuilt from scratch on every redraw, in series order, so a series'
/// bottoms only depend on the series registered before it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StackRegistry {
    stacks: IndexMap<String, BTreeMap<OrderedFloat<f64>, StackTotals>>,
    columns: IndexSet<String>,
}

impl StackRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserves (or reuses) a column slot; stacked series share their
    /// stack's slot.
    pub fn register_column(&mut self, column_key: &str) -> usize {
        match self.columns.get_index_of(column_key) {
            Some(index) => index,
            None => self.columns.insert_full(column_key.to_owned()).0,
        }
    }

    #[must_use]
    pub fn column_index(&self, column_key: &str) -> Option<usize> {
        self.columns.get_index_of(column_key)
    }

    #[must_use]
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Adds `value` to the stack at `x`, returning the offset it starts from.
    pub fn push(&mut self, stack_key: &str, x: f64, value: f64) -> f64 {
        let totals = self
            .stacks
            .entry(stack_key.to_owned())
            .or_default()
            .entry(OrderedFloat(x))
            .or_default();
        if value < 0.0 {
            let bottom = totals.negative;
            totals.negative += value;
            bottom
        } else {
            let bottom = totals.positive;
            totals.positive += value;
            bottom
        }
    }

    #[must_use]
    pub fn totals(&self, stack_key: &str, x: f64) -> Option<StackTotals> {
        self.stacks.get(stack_key)?.get(&OrderedFloat(x)).copied()
    }

    /// Lowest negative and highest positive total of a stack.
    #[must_use]
    pub fn extremes(&self, stack_key: &str) -> Option<(f64, f64)> {
        let stack = self.stacks.get(stack_key)?;
        stack.values().fold(None, |acc, totals| {
            let (low, high) = acc.unwrap_or((0.0, 0.0));
            Some((low.min(totals.negative), high.max(totals.positive)))
        })
    }

    pub fn clear(&mut self) {
        self.stacks.clear();
        self.columns.clear();
    }
}
