//! Native engine call contract.

use penflow_core::Stroke;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::result::AnalyzerResult;

/// Parameters an engine is initialized with for one page.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineParams {
    /// Paper width in millimetres.
    pub paper_width: f32,
    /// Paper height in millimetres.
    pub paper_height: f32,
    /// Sampling steps used when sizing blocks.
    pub block_size_sampling_steps: i32,
    /// Engine variant selector.
    pub kind_of_engine: i32,
}

impl Default for EngineParams {
    fn default() -> Self {
        Self {
            paper_width: 210.0,
            paper_height: 297.0,
            block_size_sampling_steps: 3,
            kind_of_engine: 0,
        }
    }
}

/// The geometry-correction engine, consumed as an opaque service.
///
/// Implementations are not assumed to be thread-safe: one handle serves one
/// page at a time, bracketed by [`initialize`](AnalyzerEngine::initialize)
/// and a full [`finalize`](AnalyzerEngine::finalize).
pub trait AnalyzerEngine: Send {
    /// Prepares the engine for a page. Returns `false` if the engine
    /// refused to start.
    fn initialize(&mut self, params: &EngineParams) -> bool;

    /// Runs one analysis pass over `strokes`.
    ///
    /// With `angle_elimination` set the engine estimates page skew instead
    /// of applying `page_radian`.
    fn analyze_to_blocks(
        &mut self,
        strokes: &[Stroke],
        page_radian: f64,
        angle_elimination: bool,
    ) -> Result<AnalyzerResult>;

    /// Releases engine state. `release_all` frees everything allocated
    /// since [`initialize`](AnalyzerEngine::initialize).
    fn finalize(&mut self, release_all: bool);
}
