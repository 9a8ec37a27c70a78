//! Analyzer output model and the views derived from it.

use std::collections::{BTreeMap, BTreeSet};

use penflow_core::{Dot, DotType, RecognitionStroke, Stroke, StrokeIdentity};
use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle in page coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoundingBox {
    /// Left edge.
    pub left: f32,
    /// Top edge.
    pub top: f32,
    /// Width.
    pub width: f32,
    /// Height.
    pub height: f32,
}

/// A spatially coherent group of strokes found by the analyzer.
///
/// Field names follow the engine's block record.
#[allow(missing_docs)]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Block {
    pub section_id: i32,
    pub owner_id: i32,
    pub note_id: i32,
    pub page_id: i32,
    pub id: i32,
    pub processed: bool,
    pub start_time: i64,
    pub end_time: i64,
    pub rect: BoundingBox,
    pub font_rect: BoundingBox,
    pub transformed_rect: BoundingBox,
    pub transformed_font_rect: BoundingBox,
    pub block_group_rect: BoundingBox,
    pub angle_degree: f64,
    pub angle_radian: f64,
    pub page_angle_degree: f64,
    pub page_angle_radian: f64,
    pub rotate_center_x: f32,
    pub rotate_center_y: f32,
    pub stroke_idx_start: i32,
    pub stroke_idx_end: i32,
    pub stroke_count: i32,
    pub group_number: i32,
    pub shape_possibility: f32,
    pub block_type_memo: String,
    pub block_slope: f64,
    pub block_intercept: f32,
}

/// A dot as emitted by the analyzer, tagged with its block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzerDot {
    /// Block the dot was assigned to.
    pub block_id: i32,
    /// Stroke the dot belongs to.
    pub stroke_id: i32,
    /// Dot role as reported by the engine.
    #[serde(rename = "type")]
    pub dot_type: DotType,
    /// Corrected horizontal position.
    pub x: f32,
    /// Corrected vertical position.
    pub y: f32,
    /// Scaled pressure.
    pub force: i32,
    /// Device time, possibly signed.
    pub timestamp: i64,
}

/// A block together with the sorted ids of the strokes it holds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockSummary {
    /// The block itself.
    #[serde(flatten)]
    pub block: Block,
    /// Ids of the strokes in the block, ascending.
    pub stroke_ids: Vec<i32>,
}

/// Result of one analyzer pass.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzerResult {
    /// Corrected dots, in the order strokes were submitted.
    pub dots: Vec<AnalyzerDot>,
    /// Blocks found on the page.
    pub blocks: Vec<Block>,
}

impl AnalyzerResult {
    /// Page rotation estimate carried by the first block, if any.
    pub fn page_radian(&self) -> Option<f64> {
        self.blocks.first().map(|b| b.page_angle_radian)
    }

    /// Resolves, per block, the sorted set of stroke ids its dots belong to.
    ///
    /// Blocks without dots get an empty list.
    pub fn blocks_with_stroke_ids(&self) -> Vec<BlockSummary> {
        let mut by_block: BTreeMap<i32, BTreeSet<i32>> = BTreeMap::new();
        for dot in &self.dots {
            by_block
                .entry(dot.block_id)
                .or_default()
                .insert(dot.stroke_id);
        }

        self.blocks
            .iter()
            .map(|block| BlockSummary {
                block: block.clone(),
                stroke_ids: by_block
                    .get(&block.id)
                    .map(|ids| ids.iter().copied().collect())
                    .unwrap_or_default(),
            })
            .collect()
    }

    /// Rebuilds corrected strokes from the flat dot array.
    ///
    /// Each stroke carries `identity`, keeps its original id and gets
    /// freshly assigned dot types. Timestamps are taken by magnitude.
    pub fn to_strokes(&self, identity: StrokeIdentity) -> penflow_core::Result<Vec<Stroke>> {
        let dots = self.dots.iter().map(|d| Dot {
            stroke_id: d.stroke_id,
            dot_type: DotType::PenMove,
            x: d.x,
            y: d.y,
            force: d.force,
            tilt_x: 0,
            tilt_y: 0,
            timestamp: d.timestamp.abs(),
            sequence: 0,
        });

        penflow_core::types::group_by_stroke(dots)
            .into_iter()
            .map(|(stroke_id, run)| Stroke::rewrap(stroke_id, identity, run))
            .collect()
    }

    /// Builds the recognition payload straight from the corrected dots.
    pub fn to_recognition_strokes(&self, scale: f32) -> Vec<RecognitionStroke> {
        let mut runs: Vec<(i32, Vec<(f32, f32, i64)>)> = Vec::new();
        for dot in &self.dots {
            let point = (dot.x, dot.y, dot.timestamp.abs());
            match runs.last_mut() {
                Some((id, points)) if *id == dot.stroke_id => points.push(point),
                _ => runs.push((dot.stroke_id, vec![point])),
            }
        }
        runs.into_iter()
            .map(|(id, points)| RecognitionStroke::from_points(id, points, scale))
            .collect()
    }

    /// Number of distinct strokes in the corrected dot stream.
    pub fn stroke_count(&self) -> usize {
        self.dots
            .iter()
            .map(|d| d.stroke_id)
            .collect::<BTreeSet<_>>()
            .len()
    }
}
