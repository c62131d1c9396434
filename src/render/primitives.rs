use serde::{Deserialize, Serialize};

use crate::core::{GroupTransform, ShapeArgs, ShapeType};
use crate::error::{ChartError, ChartResult};

/// RGBA color in normalized 0..=1 channel values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub red: f64,
    pub green: f64,
    pub blue: f64,
    pub alpha: f64,
}

impl Color {
    #[must_use]
    pub const fn rgba(red: f64, green: f64, blue: f64, alpha: f64) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    #[must_use]
    pub const fn rgb(red: f64, green: f64, blue: f64) -> Self {
        Self::rgba(red, green, blue, 1.0)
    }

    /// Linear blend towards `other`; `t` is clamped to `[0, 1]`.
    #[must_use]
    pub fn lerp(self, other: Self, t: f64) -> Self {
        let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.0 };
        let mix = |a: f64, b: f64| a + (b - a) * t;
        Self::rgba(
            mix(self.red, other.red),
            mix(self.green, other.green),
            mix(self.blue, other.blue),
            mix(self.alpha, other.alpha),
        )
    }

    pub fn validate(self) -> ChartResult<()> {
        for (channel, value) in [
            ("red", self.red),
            ("green", self.green),
            ("blue", self.blue),
            ("alpha", self.alpha),
        ] {
            if !value.is_finite() || !(0.0..=1.0).contains(&value) {
                return Err(ChartError::InvalidData(format!(
                    "color channel `{channel}` must be finite and in [0, 1]"
                )));
            }
        }
        Ok(())
    }
}

/// Presentation attributes of one drawn entity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointAttribs {
    /// `None` draws an unfilled outline (line series).
    pub fill: Option<Color>,
    pub stroke: Color,
    pub stroke_width: f64,
}

impl PointAttribs {
    pub fn validate(self) -> ChartResult<()> {
        if let Some(fill) = self.fill {
            fill.validate()?;
        }
        if !self.stroke_width.is_finite() || self.stroke_width < 0.0 {
            return Err(ChartError::InvalidData(
                "stroke width must be finite and >= 0".to_owned(),
            ));
        }
        self.stroke.validate()
    }
}

/// Shape request for one entity, in the coordinates of the last full
/// translate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrawInstruction {
    /// Entity index inside its series.
    pub index: usize,
    pub shape_type: ShapeType,
    pub shape_args: ShapeArgs,
    pub attribs: PointAttribs,
}

impl DrawInstruction {
    pub fn validate(&self) -> ChartResult<()> {
        let args = &self.shape_args;
        if !args.d.iter().all(|segment| segment.is_finite()) {
            return Err(ChartError::InvalidData(format!(
                "shape {} has non-finite path coordinates",
                self.index
            )));
        }
        if ![args.x, args.y, args.width, args.height]
            .iter()
            .all(|value| value.is_finite())
        {
            return Err(ChartError::InvalidData(format!(
                "shape {} has a non-finite rect",
                self.index
            )));
        }
        self.attribs.validate()
    }
}

/// Series-group attributes: translate, scale and the compensated stroke.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GroupAttributes {
    pub translate_x: f64,
    pub translate_y: f64,
    pub scale_x: f64,
    pub scale_y: f64,
    pub stroke_width: f64,
}

impl GroupAttributes {
    #[must_use]
    pub fn new(transform: GroupTransform, stroke_width: f64) -> Self {
        Self {
            translate_x: transform.translate_x,
            translate_y: transform.translate_y,
            scale_x: transform.scale_x,
            scale_y: transform.scale_y,
            stroke_width,
        }
    }

    #[must_use]
    pub fn transform(self) -> GroupTransform {
        GroupTransform {
            translate_x: self.translate_x,
            translate_y: self.translate_y,
            scale_x: self.scale_x,
            scale_y: self.scale_y,
        }
    }

    pub fn validate(self) -> ChartResult<()> {
        if !self.transform().is_finite() {
            return Err(ChartError::InvalidData(
                "group transform must be finite".to_owned(),
            ));
        }
        if !self.stroke_width.is_finite() || self.stroke_width < 0.0 {
            return Err(ChartError::InvalidData(
                "group stroke width must be finite and >= 0".to_owned(),
            ));
        }
        Ok(())
    }
}

impl Default for GroupAttributes {
    fn default() -> Self {
        Self::new(GroupTransform::identity(), 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::Color;

    #[test]
    fn lerp_clamps_and_blends() {
        let black = Color::rgb(0.0, 0.0, 0.0);
        let white = Color::rgb(1.0, 1.0, 1.0);
        assert_eq!(black.lerp(white, 0.5), Color::rgb(0.5, 0.5, 0.5));
        assert_eq!(black.lerp(white, 4.0), white);
        assert_eq!(black.lerp(white, f64::NAN), black);
    }
}
