//! Pen sample types.

use serde::{Deserialize, Serialize};

/// Position of a dot within its stroke's pen motion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DotType {
    /// First sample of a stroke.
    PenDown,
    /// Any sample between the first and the last.
    PenMove,
    /// Last sample of a stroke.
    PenUp,
    /// Pen near the surface without contact.
    PenHover,
}

/// A single pen sample.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dot {
    /// Stroke this dot belongs to.
    pub stroke_id: i32,

    /// Dot role within the stroke.
    #[serde(rename = "type")]
    pub dot_type: DotType,

    /// Horizontal position.
    pub x: f32,

    /// Vertical position.
    pub y: f32,

    /// Pen pressure, scaled from a normalized value by [`FORCE_SCALE`](crate::FORCE_SCALE).
    pub force: i32,

    /// Horizontal tilt, zero when the device does not report it.
    #[serde(default)]
    pub tilt_x: i32,

    /// Vertical tilt, zero when the device does not report it.
    #[serde(default)]
    pub tilt_y: i32,

    /// Absolute device time.
    pub timestamp: i64,

    /// Zero-based index within the stroke.
    pub sequence: u32,
}

impl Dot {
    /// Returns `true` if this dot opens its stroke.
    pub fn is_pen_down(&self) -> bool {
        self.dot_type == DotType::PenDown
    }

    /// Returns `true` if this dot closes its stroke.
    pub fn is_pen_up(&self) -> bool {
        self.dot_type == DotType::PenUp
    }
}

/// Reassigns stroke id, dot types and sequence numbers over a finished stroke.
///
/// Every dot becomes `PenMove`, then the first becomes `PenDown` and the
/// last `PenUp`. With a single dot the last assignment wins and the dot is
/// `PenUp`.
pub(crate) fn finalize_dots(dots: &mut [Dot], stroke_id: i32) {
    for (index, dot) in dots.iter_mut().enumerate() {
        dot.stroke_id = stroke_id;
        dot.dot_type = DotType::PenMove;
        dot.sequence = index as u32;
    }
    if let Some(first) = dots.first_mut() {
        first.dot_type = DotType::PenDown;
    }
    if let Some(last) = dots.last_mut() {
        last.dot_type = DotType::PenUp;
    }
}
