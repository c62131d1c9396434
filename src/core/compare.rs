use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ChartError, ChartResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CompareMode {
    #[default]
    None,
    /// Absolute difference to the baseline.
    Value,
    /// Relative change to the baseline in percent.
    Percent,
}

/// Stock comparison settings for one series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct CompareOptions {
    #[serde(default, rename = "compare")]
    pub mode: CompareMode,
    /// Take the baseline from the first sample instead of the first
    /// visible one.
    #[serde(default)]
    pub compare_start: bool,
    /// `0` reports percent changes around zero, `100` indexes to 100.
    #[serde(default)]
    pub compare_base: f64,
}

impl CompareOptions {
    #[must_use]
    pub fn new(mode: CompareMode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_compare_start(mut self, compare_start: bool) -> Self {
        self.compare_start = compare_start;
        self
    }

    #[must_use]
    pub fn with_compare_base(mut self, compare_base: f64) -> Self {
        self.compare_base = compare_base;
        self
    }

    pub fn validate(self) -> ChartResult<Self> {
        if self.compare_base != 0.0 && self.compare_base != 100.0 {
            return Err(ChartError::InvalidConfig(format!(
                "compare base must be 0 or 100, got {}",
                self.compare_base
            )));
        }
        Ok(self)
    }
}

/// Baseline for comparison: the first finite non-zero value at or after
/// `visible_min` (any position when `compare_start`).
#[must_use]
pub fn resolve_compare_value(
    xs: &[f64],
    ys: &[Option<f64>],
    visible_min: Option<f64>,
    compare_start: bool,
) -> Option<f64> {
    xs.iter()
        .zip(ys)
        .find(|(x, y)| {
            let in_range = compare_start || visible_min.is_none_or(|min| **x >= min);
            in_range && y.is_some_and(|value| value.is_finite() && value != 0.0)
        })
        .and_then(|(_, y)| *y)
}

/// Remaps `value` against `compare_value`.
///
/// Null stays null. A present value without a baseline maps to `0`.
#[must_use]
pub fn modify_value(
    value: Option<f64>,
    compare_value: Option<f64>,
    options: CompareOptions,
) -> Option<f64> {
    let value = value?;
    let Some(base) = compare_value else {
        return Some(0.0);
    };
    Some(match options.mode {
        CompareMode::None => value,
        CompareMode::Value => value - base,
        CompareMode::Percent => {
            let offset = if options.compare_base == 100.0 { 0.0 } else { 100.0 };
            100.0 * (value / base) - offset
        }
    })
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct ResolvedFor {
    visible_min: Option<f64>,
    data_version: u64,
}

/// Baseline bookkeeping for one compared series.
#[derive(Debug, Clone, PartialEq)]
pub struct ComparisonState {
    options: CompareOptions,
    compare_value: Option<f64>,
    resolved_for: Option<ResolvedFor>,
}

impl ComparisonState {
    #[must_use]
    pub fn new(options: CompareOptions) -> Self {
        Self {
            options,
            compare_value: None,
            resolved_for: None,
        }
    }

    #[must_use]
    pub fn options(&self) -> CompareOptions {
        self.options
    }

    #[must_use]
    pub fn compare_value(&self) -> Option<f64> {
        self.compare_value
    }

    /// Re-resolves the baseline when the visible minimum or the data changed.
    ///
    /// Returns `true` when the baseline value changed.
    pub fn refresh(
        &mut self,
        xs: &[f64],
        ys: &[Option<f64>],
        visible_min: Option<f64>,
        data_version: u64,
    ) -> bool {
        let key = ResolvedFor {
            visible_min,
            data_version,
        };
        if self.resolved_for == Some(key) {
            return false;
        }
        self.resolved_for = Some(key);

        let resolved = resolve_compare_value(xs, ys, visible_min, self.options.compare_start);
        let changed = resolved != self.compare_value;
        if changed {
            debug!(
                previous = ?self.compare_value,
                baseline = ?resolved,
                ?visible_min,
                "comparison baseline changed"
            );
        }
        self.compare_value = resolved;
        changed
    }

    #[must_use]
    pub fn modify(&self, value: Option<f64>) -> Option<f64> {
        modify_value(value, self.compare_value, self.options)
    }
}

/// Value pipeline strategy injected into cartesian series.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ValueStrategy {
    #[default]
    Standard,
    Compare(ComparisonState),
}

impl ValueStrategy {
    #[must_use]
    pub fn from_options(options: Option<CompareOptions>) -> Self {
        match options {
            Some(options) if options.mode != CompareMode::None => {
                Self::Compare(ComparisonState::new(options))
            }
            _ => Self::Standard,
        }
    }

    /// See [`ComparisonState::refresh`]; standard values never change.
    pub fn refresh(
        &mut self,
        xs: &[f64],
        ys: &[Option<f64>],
        visible_min: Option<f64>,
        data_version: u64,
    ) -> bool {
        match self {
            Self::Standard => false,
            Self::Compare(state) => state.refresh(xs, ys, visible_min, data_version),
        }
    }

    #[must_use]
    pub fn modify(&self, value: Option<f64>) -> Option<f64> {
        match self {
            Self::Standard => value,
            Self::Compare(state) => state.modify(value),
        }
    }

    #[must_use]
    pub fn compare_value(&self) -> Option<f64> {
        match self {
            Self::Standard => None,
            Self::Compare(state) => state.compare_value(),
        }
    }
}
