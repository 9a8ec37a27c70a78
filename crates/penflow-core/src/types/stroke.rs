//! Stroke model and derived views.

use serde::{Deserialize, Serialize};

use crate::codec;
use crate::error::{Error, Result};
use crate::types::dot::{Dot, finalize_dots};

/// Pointer type reported to the recognition service.
const POINTER_TYPE_PEN: &str = "PEN";

/// Location and ownership of a stroke.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StrokeIdentity {
    /// Section code of the paper.
    pub section_id: i32,
    /// Owner code of the paper.
    pub owner_id: i32,
    /// Note (book) code.
    pub note_id: i32,
    /// Page number within the note.
    pub page_id: i32,
}

impl StrokeIdentity {
    /// Creates a new identity.
    pub fn new(section_id: i32, owner_id: i32, note_id: i32, page_id: i32) -> Self {
        Self {
            section_id,
            owner_id,
            note_id,
            page_id,
        }
    }
}

/// One pen-down-to-pen-up motion.
///
/// A stroke always holds at least one dot, its first dot is `PenDown`, its
/// last is `PenUp` and `start_time`/`end_time` mirror the first and last
/// dot timestamps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stroke {
    id: i32,
    identity: StrokeIdentity,
    start_time: i64,
    end_time: i64,
    dots: Vec<Dot>,
}

impl Stroke {
    /// Decodes a binary dot payload into a new stroke.
    ///
    /// `base_time` seeds the running clock the per-dot deltas accumulate on.
    pub fn build(id: i32, identity: StrokeIdentity, base_time: i64, encoded: &[u8]) -> Result<Self> {
        let dots = codec::decode(encoded, base_time, id)?;
        Ok(Self::from_finalized(id, identity, dots))
    }

    /// Same as [`Stroke::build`] for a base64 encoded payload.
    pub fn build_base64(
        id: i32,
        identity: StrokeIdentity,
        base_time: i64,
        encoded: &str,
    ) -> Result<Self> {
        let dots = codec::decode_base64(encoded, base_time, id)?;
        Ok(Self::from_finalized(id, identity, dots))
    }

    /// Wraps dots that were already decoded, e.g. after an analyzer pass.
    ///
    /// Dot stroke ids, types and sequence numbers are reassigned.
    pub fn rewrap(id: i32, identity: StrokeIdentity, mut dots: Vec<Dot>) -> Result<Self> {
        if dots.is_empty() {
            return Err(Error::EmptyStroke { stroke_id: id });
        }
        finalize_dots(&mut dots, id);
        Ok(Self::from_finalized(id, identity, dots))
    }

    fn from_finalized(id: i32, identity: StrokeIdentity, dots: Vec<Dot>) -> Self {
        let start_time = dots.first().map_or(0, |d| d.timestamp);
        let end_time = dots.last().map_or(start_time, |d| d.timestamp);
        Self {
            id,
            identity,
            start_time,
            end_time,
            dots,
        }
    }

    /// Stroke id.
    pub fn id(&self) -> i32 {
        self.id
    }

    /// Location and ownership identity.
    pub fn identity(&self) -> StrokeIdentity {
        self.identity
    }

    /// Timestamp of the first dot.
    pub fn start_time(&self) -> i64 {
        self.start_time
    }

    /// Timestamp of the last dot.
    pub fn end_time(&self) -> i64 {
        self.end_time
    }

    /// Number of dots.
    pub fn dot_count(&self) -> usize {
        self.dots.len()
    }

    /// The ordered dots.
    pub fn dots(&self) -> &[Dot] {
        &self.dots
    }

    /// Consumes the stroke, returning its dots.
    pub fn into_dots(self) -> Vec<Dot> {
        self.dots
    }

    /// Builds the recognition service payload for this stroke.
    ///
    /// Coordinates are multiplied by `scale`, timestamps are left as is.
    pub fn to_recognition(&self, scale: f32) -> RecognitionStroke {
        RecognitionStroke::from_points(
            self.id,
            self.dots.iter().map(|d| (d.x, d.y, d.timestamp)),
            scale,
        )
    }
}

/// Groups a flat dot stream into `(stroke_id, dots)` runs.
///
/// Only consecutive dots are grouped: the stream is expected to be
/// clustered by stroke id already, as analyzer output preserves the
/// submission order.
pub fn group_by_stroke<I>(dots: I) -> Vec<(i32, Vec<Dot>)>
where
    I: IntoIterator<Item = Dot>,
{
    let mut groups: Vec<(i32, Vec<Dot>)> = Vec::new();
    for dot in dots {
        match groups.last_mut() {
            Some((stroke_id, run)) if *stroke_id == dot.stroke_id => run.push(dot),
            _ => groups.push((dot.stroke_id, vec![dot])),
        }
    }
    groups
}

/// A stroke in the shape the recognition service accepts.
///
/// The pressure channel `p` carries the stroke id for every point; the
/// service echoes it back in each item's `F` array, which is how stroke ids
/// are recovered from a classification result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecognitionStroke {
    /// Stroke id.
    pub id: i32,
    /// Scaled x coordinates.
    pub x: Vec<f32>,
    /// Scaled y coordinates.
    pub y: Vec<f32>,
    /// Unscaled timestamps.
    pub t: Vec<i64>,
    /// Stroke id repeated per point.
    pub p: Vec<i32>,
    /// Always `PEN`.
    pub pointer_type: String,
    /// Always zero.
    pub pointer_id: i32,
}

impl RecognitionStroke {
    /// Builds a payload stroke from `(x, y, t)` points.
    pub fn from_points<I>(id: i32, points: I, scale: f32) -> Self
    where
        I: IntoIterator<Item = (f32, f32, i64)>,
    {
        let mut stroke = Self {
            id,
            x: Vec::new(),
            y: Vec::new(),
            t: Vec::new(),
            p: Vec::new(),
            pointer_type: POINTER_TYPE_PEN.to_string(),
            pointer_id: 0,
        };
        for (x, y, t) in points {
            stroke.x.push(x * scale);
            stroke.y.push(y * scale);
            stroke.t.push(t);
            stroke.p.push(id);
        }
        stroke
    }

    /// Number of points.
    pub fn len(&self) -> usize {
        self.t.len()
    }

    /// Returns `true` if the stroke has no points.
    pub fn is_empty(&self) -> bool {
        self.t.is_empty()
    }
}
