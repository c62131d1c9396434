use serde::{Deserialize, Serialize};

use crate::core::AxisPair;

/// Scales inside this band on both axes are treated as "unchanged".
pub const SCALE_SNAP_MIN: f64 = 0.99;
pub const SCALE_SNAP_MAX: f64 = 1.01;

/// Axis state captured at the last full translate (`baseTrans`).
///
/// `origin_*` is the data value that mapped to pixel `0` at capture time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TransformSnapshot {
    pub origin_x: f64,
    pub origin_y: f64,
    pub trans_a_x: f64,
    pub trans_a_y: f64,
}

impl TransformSnapshot {
    #[must_use]
    pub fn capture(axes: &AxisPair) -> Self {
        let x = &axes.x;
        let y = &axes.y;
        Self {
            origin_x: x.min().unwrap_or(0.0) - x.min_pixel_padding() / x.trans_a(),
            origin_y: y.min().unwrap_or(0.0) - y.min_pixel_padding() / y.trans_a(),
            trans_a_x: x.trans_a(),
            trans_a_y: y.trans_a(),
        }
    }
}

/// Translate-then-scale attribute set applied to a whole series group.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GroupTransform {
    pub translate_x: f64,
    pub translate_y: f64,
    pub scale_x: f64,
    pub scale_y: f64,
}

impl Default for GroupTransform {
    fn default() -> Self {
        Self::identity()
    }
}

impl GroupTransform {
    #[must_use]
    pub const fn identity() -> Self {
        Self {
            translate_x: 0.0,
            translate_y: 0.0,
            scale_x: 1.0,
            scale_y: 1.0,
        }
    }

    #[must_use]
    pub fn is_identity(self) -> bool {
        self == Self::identity()
    }

    /// Where a pixel drawn at the last full translate ends up on screen.
    #[must_use]
    pub fn apply(self, x: f64, y: f64) -> (f64, f64) {
        (
            x * self.scale_x + self.translate_x,
            y * self.scale_y + self.translate_y,
        )
    }

    #[must_use]
    pub fn is_finite(self) -> bool {
        self.translate_x.is_finite()
            && self.translate_y.is_finite()
            && self.scale_x.is_finite()
            && self.scale_y.is_finite()
    }
}

/// Group-level delta from `snapshot` to the current axis state.
///
/// Scale is the ratio of current to captured `trans_a`; translate is the
/// current pixel of the captured origin. Near-unit scales snap to exactly
/// `1.0` with whole-pixel translation so float drift cannot jitter a view
/// that did not really change.
#[must_use]
pub fn fast_group_transform(snapshot: TransformSnapshot, axes: &AxisPair) -> GroupTransform {
    let mut transform = GroupTransform {
        translate_x: axes.x.linear_to_pixels(snapshot.origin_x),
        translate_y: axes.y.linear_to_pixels(snapshot.origin_y),
        scale_x: axes.x.trans_a() / snapshot.trans_a_x,
        scale_y: axes.y.trans_a() / snapshot.trans_a_y,
    };

    let snaps = |scale: f64| (SCALE_SNAP_MIN..=SCALE_SNAP_MAX).contains(&scale);
    if snaps(transform.scale_x) && snaps(transform.scale_y) {
        transform.scale_x = 1.0;
        transform.scale_y = 1.0;
        transform.translate_x = transform.translate_x.round();
        transform.translate_y = transform.translate_y.round();
    }
    transform
}

/// Group stroke width that stays visually constant under `transform`.
#[must_use]
pub fn scaled_stroke_width(border_width: f64, transform: GroupTransform) -> f64 {
    if transform.scale_x.is_finite() && transform.scale_x > 0.0 {
        border_width / transform.scale_x
    } else {
        border_width
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransformMode {
    /// Every entity path is re-translated.
    Full,
    /// Only the group transform changes.
    Fast,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FullTransformReason {
    NoSnapshot,
    DataDirty,
    IncrementalUpdatesDisabled,
    Resizing,
    NoHardwareTransforms,
}

/// Inputs of the per-redraw full/fast decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedrawCriteria {
    pub has_snapshot: bool,
    pub data_dirty: bool,
    pub incremental_updates_allowed: bool,
    pub resizing: bool,
    pub hardware_transforms: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransformDecision {
    pub mode: TransformMode,
    pub reason: Option<FullTransformReason>,
}

impl RedrawCriteria {
    #[must_use]
    pub fn resolve(self) -> TransformDecision {
        let reason = if !self.has_snapshot {
            Some(FullTransformReason::NoSnapshot)
        } else if self.data_dirty {
            Some(FullTransformReason::DataDirty)
        } else if !self.incremental_updates_allowed {
            Some(FullTransformReason::IncrementalUpdatesDisabled)
        } else if self.resizing {
            Some(FullTransformReason::Resizing)
        } else if !self.hardware_transforms {
            Some(FullTransformReason::NoHardwareTransforms)
        } else {
            None
        };

        TransformDecision {
            mode: if reason.is_some() {
                TransformMode::Full
            } else {
                TransformMode::Fast
            },
            reason,
        }
    }
}
