//! # Slugline Editor
//!
//! Live pagination and element-formatting engine for screenplays.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ parser: plain text / script JSON → pages    │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ editor: session + mutations                 │
//! │  - Caret by line identity                   │
//! │  - Element state model (Enter, Tab, parens) │
//! │  - Dual dialogue pairing                    │
//! │  - Snapshot undo/redo                       │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ pagination: overflow oracle → page moves    │
//! │  - Orphan rules, (CONT'D) continuations     │
//! │  - Page number labels                       │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ print layout / stats / autocomplete         │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Core Principles
//!
//! 1. **Pages are the source of truth**: every line lives on exactly one page
//! 2. **Identity over paths**: carets and undo snapshots address lines by id
//! 3. **Measurement is injected**: the host decides when a page overflows
//! 4. **Time is injected**: debounce and undo coalescing take host
//!    milliseconds, so the engine runs unchanged under wasm
//!
//! ## Usage
//!
//! ```rust,ignore
//! use slugline_editor::{Document, EditorSession, LineBudget, Mutation, Pipeline, Settings};
//!
//! let doc = Document::load("pilot.slug")?;
//! let session = EditorSession::new("main", doc, Settings::default());
//! let mut pipeline = Pipeline::new(session, LineBudget::default());
//!
//! pipeline.apply(Mutation::InsertText { text: "INT. DINER - NIGHT".into() }, now_ms)?;
//! pipeline.apply(Mutation::Enter, now_ms)?;
//! pipeline.tick(now_ms + 300);
//!
//! pipeline.session_mut().document.save()?;
//! ```

pub mod autocomplete;
pub mod caret;
pub mod debounce;
pub mod dual_dialogue;
pub mod elements;
pub mod metrics;
pub mod pagination;
pub mod print;
pub mod settings;
pub mod stats;

mod document;
mod errors;
mod mutations;
mod pipeline;
mod post_effects;
mod session;
mod undo_stack;

pub use autocomplete::AutocompleteIndex;
pub use caret::{Caret, ResolvedCaret, Selection};
pub use document::{Document, DocumentStorage, SCRIPT_EXTENSION};
pub use dual_dialogue::{toggle_dual_dialogue, DualToggle};
pub use errors::EditorError;
pub use metrics::{LineBudget, OverflowOracle, DEFAULT_LINES_PER_PAGE};
pub use mutations::{Mutation, MutationError, MutationResult};
pub use pagination::{paginate, PaginationReport};
pub use pipeline::{Pipeline, PipelineResult};
pub use post_effects::{AutoUppercaseCurrentLine, ClearStaleDualGroups, PostEffect, PostEffectEngine};
pub use print::{PrintLayout, PrintPage};
pub use session::EditorSession;
pub use settings::Settings;
pub use stats::DocumentStats;
pub use undo_stack::{Checkpoint, InputKind, UndoStack};

// Re-export common types for convenience
pub use slugline_parser::Document as ASTDocument;
pub use slugline_parser::{ElementKind, Line, LineId, LinePos, Page, TitlePage};
