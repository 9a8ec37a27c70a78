//! In-process stand-in for the native engine.
//!
//! [`MockAnalyzerEngine`] echoes dot geometry unchanged, groups strokes into
//! fixed-size blocks and records every call in a shared [`EngineCallLog`],
//! which stays readable after the engine is handed to a
//! [`StrokeAnalyzer`](crate::StrokeAnalyzer).

use std::sync::{Arc, Mutex};

use penflow_core::Stroke;

use crate::engine::{AnalyzerEngine, EngineParams};
use crate::error::{Error, Result};
use crate::result::{AnalyzerDot, AnalyzerResult, Block, BoundingBox};

/// One recorded engine call.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineCall {
    /// `initialize` with its parameters.
    Initialize(EngineParams),
    /// `analyze_to_blocks` with the ids of the strokes it received.
    Analyze {
        /// Stroke ids in submission order.
        stroke_ids: Vec<i32>,
        /// Page angle passed in.
        page_radian: f64,
        /// Pass flag.
        angle_elimination: bool,
    },
    /// `finalize` with its release flag.
    Finalize {
        /// Whether everything was released.
        release_all: bool,
    },
}

/// Shared record of the calls made on a [`MockAnalyzerEngine`].
#[derive(Debug, Clone, Default)]
pub struct EngineCallLog {
    calls: Arc<Mutex<Vec<EngineCall>>>,
}

impl EngineCallLog {
    fn push(&self, call: EngineCall) {
        self.calls
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(call);
    }

    /// All calls so far, in order.
    pub fn calls(&self) -> Vec<EngineCall> {
        self.calls
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Only the analysis calls.
    pub fn analyze_calls(&self) -> Vec<EngineCall> {
        self.calls()
            .into_iter()
            .filter(|c| matches!(c, EngineCall::Analyze { .. }))
            .collect()
    }

    /// Number of `initialize` calls.
    pub fn initialize_count(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, EngineCall::Initialize(_)))
            .count()
    }

    /// Number of `finalize` calls with the given flag.
    pub fn finalize_count(&self, release_all: bool) -> usize {
        self.calls()
            .iter()
            .filter(|c| **c == EngineCall::Finalize { release_all })
            .count()
    }
}

/// Scriptable analyzer engine.
#[derive(Debug, Clone)]
pub struct MockAnalyzerEngine {
    page_radian: f64,
    strokes_per_block: usize,
    fail_initialize: bool,
    fail_analyze: bool,
    log: EngineCallLog,
}

impl Default for MockAnalyzerEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl MockAnalyzerEngine {
    /// Creates an engine that puts every stroke in one block.
    pub fn new() -> Self {
        Self {
            page_radian: 0.0,
            strokes_per_block: usize::MAX,
            fail_initialize: false,
            fail_analyze: false,
            log: EngineCallLog::default(),
        }
    }

    /// Page angle reported by the angle elimination pass.
    pub fn with_page_radian(mut self, page_radian: f64) -> Self {
        self.page_radian = page_radian;
        self
    }

    /// Splits strokes into blocks of `n` consecutive strokes.
    pub fn with_strokes_per_block(mut self, n: usize) -> Self {
        self.strokes_per_block = n.max(1);
        self
    }

    /// Makes `initialize` return `false`.
    pub fn failing_initialize(mut self) -> Self {
        self.fail_initialize = true;
        self
    }

    /// Makes every analysis pass fail.
    pub fn failing_analyze(mut self) -> Self {
        self.fail_analyze = true;
        self
    }

    /// Handle on the call log.
    pub fn log(&self) -> EngineCallLog {
        self.log.clone()
    }

    fn block_for(&self, id: i32, strokes: &[Stroke], page_radian: f64) -> Block {
        let identity = strokes.first().map(Stroke::identity).unwrap_or_default();
        let dots = strokes.iter().flat_map(Stroke::dots);
        let (mut min_x, mut min_y) = (f32::MAX, f32::MAX);
        let (mut max_x, mut max_y) = (f32::MIN, f32::MIN);
        for dot in dots {
            min_x = min_x.min(dot.x);
            min_y = min_y.min(dot.y);
            max_x = max_x.max(dot.x);
            max_y = max_y.max(dot.y);
        }
        let rect = BoundingBox {
            left: min_x,
            top: min_y,
            width: max_x - min_x,
            height: max_y - min_y,
        };

        Block {
            section_id: identity.section_id,
            owner_id: identity.owner_id,
            note_id: identity.note_id,
            page_id: identity.page_id,
            id,
            start_time: strokes.first().map_or(0, Stroke::start_time),
            end_time: strokes.last().map_or(0, Stroke::end_time),
            rect,
            transformed_rect: rect,
            page_angle_radian: page_radian,
            page_angle_degree: page_radian.to_degrees(),
            stroke_idx_start: strokes.first().map_or(0, Stroke::id),
            stroke_idx_end: strokes.last().map_or(0, Stroke::id),
            stroke_count: strokes.len() as i32,
            block_type_memo: "TEXT".to_string(),
            ..Block::default()
        }
    }
}

impl AnalyzerEngine for MockAnalyzerEngine {
    fn initialize(&mut self, params: &EngineParams) -> bool {
        self.log.push(EngineCall::Initialize(*params));
        !self.fail_initialize
    }

    fn analyze_to_blocks(
        &mut self,
        strokes: &[Stroke],
        page_radian: f64,
        angle_elimination: bool,
    ) -> Result<AnalyzerResult> {
        self.log.push(EngineCall::Analyze {
            stroke_ids: strokes.iter().map(Stroke::id).collect(),
            page_radian,
            angle_elimination,
        });
        if self.fail_analyze {
            return Err(Error::engine("scripted analysis failure"));
        }

        let reported = if angle_elimination {
            self.page_radian
        } else {
            page_radian
        };

        let mut result = AnalyzerResult::default();
        for (index, chunk) in strokes.chunks(self.strokes_per_block).enumerate() {
            let block_id = index as i32;
            result.blocks.push(self.block_for(block_id, chunk, reported));
            for stroke in chunk {
                result.dots.extend(stroke.dots().iter().map(|d| AnalyzerDot {
                    block_id,
                    stroke_id: stroke.id(),
                    dot_type: d.dot_type,
                    x: d.x,
                    y: d.y,
                    force: d.force,
                    timestamp: d.timestamp,
                }));
            }
        }
        Ok(result)
    }

    fn finalize(&mut self, release_all: bool) {
        self.log.push(EngineCall::Finalize { release_all });
    }
}
