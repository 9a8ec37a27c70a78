//! Scoped per-page access to an analyzer engine.
//!
//! [`StrokeAnalyzer`] owns the engine handle. Each page opens an
//! [`AnalyzerSession`], which holds the handle exclusively until it is
//! closed or dropped, so passes from different pages never interleave.

use std::sync::Arc;

use penflow_core::Stroke;
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::engine::{AnalyzerEngine, EngineParams};
use crate::error::{Error, Result};
use crate::result::AnalyzerResult;

type SharedEngine = Arc<Mutex<Box<dyn AnalyzerEngine>>>;

/// Shared entry point to one analyzer engine.
#[derive(Clone)]
pub struct StrokeAnalyzer {
    engine: SharedEngine,
}

impl StrokeAnalyzer {
    /// Wraps an engine.
    pub fn new(engine: impl AnalyzerEngine + 'static) -> Self {
        Self::from_boxed(Box::new(engine))
    }

    /// Wraps an already boxed engine.
    pub fn from_boxed(engine: Box<dyn AnalyzerEngine>) -> Self {
        Self {
            engine: Arc::new(Mutex::new(engine)),
        }
    }

    /// Waits for exclusive access to the engine and initializes it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EngineInitialization`] if the engine refuses the
    /// parameters. Nothing needs releasing in that case.
    pub async fn open(&self, params: EngineParams) -> Result<AnalyzerSession> {
        let mut guard = Arc::clone(&self.engine).lock_owned().await;
        if !guard.initialize(&params) {
            tracing::warn!(?params, "Analyzer engine refused to initialize");
            return Err(Error::initialization(format!(
                "engine rejected paper {}x{} (engine kind {})",
                params.paper_width, params.paper_height, params.kind_of_engine
            )));
        }
        tracing::debug!(?params, "Analyzer session opened");
        Ok(AnalyzerSession {
            engine: guard,
            params,
            closed: false,
        })
    }
}

impl std::fmt::Debug for StrokeAnalyzer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StrokeAnalyzer").finish_non_exhaustive()
    }
}

/// Exclusive, initialized access to the engine for one page.
///
/// Intermediate state is released with [`release_intermediate`] between
/// passes. Full release happens exactly once, in [`close`] or on drop.
///
/// [`release_intermediate`]: AnalyzerSession::release_intermediate
/// [`close`]: AnalyzerSession::close
pub struct AnalyzerSession {
    engine: OwnedMutexGuard<Box<dyn AnalyzerEngine>>,
    params: EngineParams,
    closed: bool,
}

impl AnalyzerSession {
    /// Parameters the session was opened with.
    pub fn params(&self) -> EngineParams {
        self.params
    }

    /// First pass: estimates the page rotation.
    ///
    /// Returns `None` without calling the engine when there are no strokes.
    pub fn angle_elimination(&mut self, strokes: &[Stroke]) -> Result<Option<AnalyzerResult>> {
        self.run(strokes, 0.0, true)
    }

    /// Second pass: groups strokes into blocks, correcting by `page_radian`.
    ///
    /// Returns `None` without calling the engine when there are no strokes.
    pub fn analyze(
        &mut self,
        strokes: &[Stroke],
        page_radian: f64,
    ) -> Result<Option<AnalyzerResult>> {
        self.run(strokes, page_radian, false)
    }

    fn run(
        &mut self,
        strokes: &[Stroke],
        page_radian: f64,
        angle_elimination: bool,
    ) -> Result<Option<AnalyzerResult>> {
        if strokes.is_empty() {
            return Ok(None);
        }
        let result = self
            .engine
            .analyze_to_blocks(strokes, page_radian, angle_elimination)?;
        tracing::debug!(
            strokes = strokes.len(),
            blocks = result.blocks.len(),
            page_radian,
            angle_elimination,
            "Analyzer pass finished"
        );
        Ok(Some(result))
    }

    /// Frees per-pass engine state, keeping the session usable.
    pub fn release_intermediate(&mut self) {
        self.engine.finalize(false);
    }

    /// Fully releases the engine and gives up exclusive access.
    pub fn close(mut self) {
        self.release_all();
    }

    fn release_all(&mut self) {
        if !self.closed {
            self.closed = true;
            self.engine.finalize(true);
            tracing::debug!("Analyzer session closed");
        }
    }
}

impl Drop for AnalyzerSession {
    fn drop(&mut self) {
        if !self.closed {
            tracing::debug!("Analyzer session dropped without close, releasing engine");
        }
        self.release_all();
    }
}

impl std::fmt::Debug for AnalyzerSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnalyzerSession")
            .field("params", &self.params)
            .field("closed", &self.closed)
            .finish_non_exhaustive()
    }
}
