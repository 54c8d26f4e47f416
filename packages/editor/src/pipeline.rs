//! # Editing Pipeline
//!
//! Coordinates one edit end to end:
//!
//! ```text
//! checkpoint → mutate → post-effects → paginate → sync element → reindex
//! ```
//!
//! Caret moves skip the checkpoint, and skip pagination unless a smart
//! default retagged the line. The autocomplete reindex is debounced and runs
//! from [`Pipeline::tick`].

use crate::caret::Caret;
use crate::metrics::OverflowOracle;
use crate::mutations::Mutation;
use crate::pagination::PaginationReport;
use crate::post_effects::PostEffectEngine;
use crate::session::EditorSession;
use crate::undo_stack::{Checkpoint, InputKind, UndoStack};
use crate::EditorError;
use serde::Serialize;
use slugline_parser::ElementKind;
use tracing::{debug, instrument};

/// Manages the full edit → paginate pipeline for one session
#[derive(Debug)]
pub struct Pipeline<O: OverflowOracle> {
    session: EditorSession,
    oracle: O,
    effects: PostEffectEngine,
    history: UndoStack,
}

/// Result of pipeline execution
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineResult {
    /// Document version after the edit
    pub version: u64,

    pub pagination: PaginationReport,
    pub status: Option<String>,
    pub active_kind: ElementKind,
    pub caret: Option<Caret>,
}

impl<O: OverflowOracle> Pipeline<O> {
    /// Create a pipeline and lay out the document once
    pub fn new(session: EditorSession, oracle: O) -> Self {
        let mut pipeline = Self {
            session,
            oracle,
            effects: PostEffectEngine::new(),
            history: UndoStack::new(),
        };
        pipeline.session.paginate(&pipeline.oracle);
        pipeline.session.sync_active_kind();
        pipeline
    }

    pub fn with_effects(mut self, effects: PostEffectEngine) -> Self {
        self.effects = effects;
        self
    }

    pub fn with_history(mut self, history: UndoStack) -> Self {
        self.history = history;
        self
    }

    /// Apply one mutation at host time `now_ms`
    #[instrument(skip_all, fields(mutation = mutation.label()))]
    pub fn apply(&mut self, mutation: Mutation, now_ms: u64) -> Result<PipelineResult, EditorError> {
        mutation.validate(&self.session)?;

        if let Some(input) = mutation.input_kind() {
            let checkpoint = self.session.checkpoint(mutation.label());
            self.history.record(checkpoint, input, mutation.data(), now_ms);
        }

        let outcome = self.effects.apply_with_effects(&mutation, &mut self.session)?;

        let content_changed = mutation.is_content_mutation() || outcome.changed;
        let pagination = if content_changed {
            self.session.paginate(&self.oracle)
        } else {
            PaginationReport::default()
        };
        self.session.sync_active_kind();

        if content_changed {
            self.session.document.version += 1;
            self.session.schedule_reindex(now_ms);
        }

        Ok(self.result(pagination, outcome.status))
    }

    /// Apply several mutations as one undo step
    pub fn apply_batch(
        &mut self,
        mutations: Vec<Mutation>,
        now_ms: u64,
    ) -> Result<Vec<PipelineResult>, EditorError> {
        let checkpoint = self.session.checkpoint("Batch");
        self.history.begin_batch(checkpoint, InputKind::Paste, now_ms);
        let results = mutations
            .into_iter()
            .map(|mutation| self.apply(mutation, now_ms))
            .collect();
        self.history.end_batch();
        results
    }

    /// Restore the previous checkpoint. `None` when there is nothing to undo.
    pub fn undo(&mut self, now_ms: u64) -> Option<PipelineResult> {
        let current = self.session.checkpoint("Undo");
        let previous = self.history.undo(current)?;
        debug!(label = %previous.label, "undo");
        Some(self.restored(previous, now_ms))
    }

    pub fn redo(&mut self, now_ms: u64) -> Option<PipelineResult> {
        let current = self.session.checkpoint("Redo");
        let next = self.history.redo(current)?;
        debug!(label = %next.label, "redo");
        Some(self.restored(next, now_ms))
    }

    fn restored(&mut self, checkpoint: Checkpoint, now_ms: u64) -> PipelineResult {
        self.session.restore(checkpoint);
        let pagination = self.session.paginate(&self.oracle);
        self.session.sync_active_kind();
        self.session.document.version += 1;
        self.session.schedule_reindex(now_ms);
        self.result(pagination, None)
    }

    /// Run debounced work that is due. Returns true when the index was rebuilt.
    pub fn tick(&mut self, now_ms: u64) -> bool {
        self.session.tick(now_ms)
    }

    /// Full re-layout, e.g. after the overflow oracle's metrics changed
    pub fn repaginate(&mut self) -> PaginationReport {
        self.session.paginate(&self.oracle)
    }

    pub fn set_oracle(&mut self, oracle: O) {
        self.oracle = oracle;
    }

    fn result(&self, pagination: PaginationReport, status: Option<String>) -> PipelineResult {
        PipelineResult {
            version: self.session.document.version,
            pagination,
            status,
            active_kind: self.session.active_kind,
            caret: self.session.caret(),
        }
    }

    pub fn session(&self) -> &EditorSession {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut EditorSession {
        &mut self.session
    }

    pub fn history(&self) -> &UndoStack {
        &self.history
    }

    pub fn oracle(&self) -> &O {
        &self.oracle
    }

    pub fn into_session(self) -> EditorSession {
        self.session
    }
}
