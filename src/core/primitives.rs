use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

use crate::error::{ChartError, ChartResult};

pub fn decimal_to_f64(value: Decimal, field_name: &str) -> ChartResult<f64> {
    value.to_f64().ok_or_else(|| {
        ChartError::InvalidData(format!("{field_name} cannot be represented as f64"))
    })
}

/// Epoch milliseconds, the x unit of datetime axes.
#[must_use]
pub fn datetime_to_unix_millis(time: DateTime<Utc>) -> f64 {
    time.timestamp_millis() as f64
}

/// Converts a `(time, value)` sample; `None` values are gaps.
pub fn sample_to_xy(time: DateTime<Utc>, value: Option<Decimal>) -> ChartResult<(f64, Option<f64>)> {
    let y = value.map(|v| decimal_to_f64(v, "value")).transpose()?;
    Ok((datetime_to_unix_millis(time), y))
}
