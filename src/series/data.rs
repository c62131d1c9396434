use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::core::sample_to_xy;
use crate::error::{ChartError, ChartResult};

/// One cartesian sample; `y == None` is a gap.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct XyPoint {
    pub x: f64,
    pub y: Option<f64>,
}

impl XyPoint {
    #[must_use]
    pub const fn new(x: f64, y: Option<f64>) -> Self {
        Self { x, y }
    }

    /// Datetime sample; x becomes epoch milliseconds.
    pub fn from_sample(time: DateTime<Utc>, value: Option<Decimal>) -> ChartResult<Self> {
        let (x, y) = sample_to_xy(time, value)?;
        Ok(Self { x, y })
    }
}

/// Reads cartesian data in its JSON forms: `y`, `null`, `[x, y]` or
/// `{ "x": .., "y": .. }`. Bare values take their position as x.
pub fn parse_xy_data(values: &[Value]) -> ChartResult<Vec<XyPoint>> {
    let mut points = Vec::with_capacity(values.len());
    for (i, value) in values.iter().enumerate() {
        let position = i as f64;
        let point = match value {
            Value::Null => XyPoint::new(position, None),
            Value::Number(_) => XyPoint::new(position, number(value, i)?),
            Value::Array(items) => match items.as_slice() {
                [y] => XyPoint::new(position, number(y, i)?),
                [x, y] => XyPoint::new(required_x(x, i)?, number(y, i)?),
                _ => {
                    return Err(ChartError::InvalidData(format!(
                        "data point {i} must be [x, y]"
                    )));
                }
            },
            Value::Object(map) => {
                let x = match map.get("x") {
                    Some(x) => required_x(x, i)?,
                    None => position,
                };
                let y = map.get("y").map(|y| number(y, i)).transpose()?.flatten();
                XyPoint::new(x, y)
            }
            _ => {
                return Err(ChartError::InvalidData(format!(
                    "data point {i} has an unsupported shape"
                )));
            }
        };
        points.push(point);
    }
    Ok(points)
}

fn number(value: &Value, index: usize) -> ChartResult<Option<f64>> {
    match value {
        Value::Null => Ok(None),
        Value::Number(n) => Ok(n.as_f64()),
        _ => Err(ChartError::InvalidData(format!(
            "data point {index} must hold a number or null"
        ))),
    }
}

fn required_x(value: &Value, index: usize) -> ChartResult<f64> {
    number(value, index)?.ok_or_else(|| {
        ChartError::InvalidData(format!("data point {index} must have a numeric x"))
    })
}

/// Reads the optional `data` array of a series definition.
pub(crate) fn definition_data(definition: &Value) -> ChartResult<Vec<Value>> {
    match definition.get("data") {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::Array(items)) => Ok(items.clone()),
        Some(_) => Err(ChartError::InvalidData(
            "series `data` must be an array".to_owned(),
        )),
    }
}

/// Smallest positive distance between consecutive sorted xs.
pub(crate) fn closest_point_range(points: &[XyPoint]) -> Option<f64> {
    let mut xs: Vec<f64> = points.iter().map(|p| p.x).filter(|x| x.is_finite()).collect();
    xs.sort_by(f64::total_cmp);
    xs.windows(2)
        .map(|pair| pair[1] - pair[0])
        .filter(|delta| *delta > 0.0)
        .reduce(f64::min)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn reads_every_point_form() {
        let values = [json!(3), json!(null), json!([10, 4]), json!({"x": 12, "y": null})];
        let points = parse_xy_data(&values).expect("parse");
        assert_eq!(
            points,
            vec![
                XyPoint::new(0.0, Some(3.0)),
                XyPoint::new(1.0, None),
                XyPoint::new(10.0, Some(4.0)),
                XyPoint::new(12.0, None),
            ]
        );
    }

    #[test]
    fn rejects_string_values() {
        assert!(parse_xy_data(&[json!("a")]).is_err());
        assert!(parse_xy_data(&[json!([null, 1])]).is_err());
    }

    #[test]
    fn closest_range_skips_duplicates() {
        let points = [
            XyPoint::new(4.0, None),
            XyPoint::new(0.0, None),
            XyPoint::new(4.0, None),
            XyPoint::new(1.0, None),
        ];
        assert_eq!(closest_point_range(&points), Some(1.0));
    }
}
