//! # Post-Effect System
//!
//! Follow-up fixes that keep the script consistent after a mutation.
//!
//! - Upper-case kinds are re-cased as they are typed
//! - Re-classifying a line out of dialogue drops dual groups that no longer
//!   hold a cue on each side
//!
//! Effects run in registration order, after the mutation and before
//! pagination.

use crate::caret::Caret;
use crate::dual_dialogue::clear_stale_groups;
use crate::elements::apply_casing;
use crate::mutations::{Mutation, MutationError, MutationResult};
use crate::session::EditorSession;
use tracing::debug;

/// Post-effect triggered by a mutation
pub trait PostEffect: std::fmt::Debug {
    /// Apply the effect; returns the number of lines changed
    fn apply(&self, mutation: &Mutation, session: &mut EditorSession) -> usize;

    fn name(&self) -> &'static str;
}

/// Upper-case the caret's line when its kind calls for it
#[derive(Debug)]
pub struct AutoUppercaseCurrentLine;

impl PostEffect for AutoUppercaseCurrentLine {
    fn apply(&self, mutation: &Mutation, session: &mut EditorSession) -> usize {
        if !mutation.is_content_mutation() || !session.settings().auto_uppercase_lines {
            return 0;
        }
        let Some(caret) = session.resolve_caret() else {
            return 0;
        };

        let settings = session.settings().clone();
        let Some(line) = session.document.ast_mut().line_mut(caret.pos) else {
            return 0;
        };
        if !apply_casing(line, &settings) {
            return 0;
        }
        let len = line.char_len();
        session.set_caret(Caret::new(caret.line, caret.offset.min(len)));
        1
    }

    fn name(&self) -> &'static str {
        "auto-uppercase"
    }
}

/// Clear dual groups left without a cue on both sides
#[derive(Debug)]
pub struct ClearStaleDualGroups;

impl PostEffect for ClearStaleDualGroups {
    fn apply(&self, mutation: &Mutation, session: &mut EditorSession) -> usize {
        if !matches!(mutation, Mutation::SetElement { .. } | Mutation::CycleElement) {
            return 0;
        }
        let Some(caret) = session.resolve_caret() else {
            return 0;
        };
        clear_stale_groups(session.document.ast_mut(), caret.pos.page)
    }

    fn name(&self) -> &'static str {
        "clear-stale-dual-groups"
    }
}

/// Post-effect engine that applies all registered effects
#[derive(Debug)]
pub struct PostEffectEngine {
    effects: Vec<Box<dyn PostEffect>>,
}

impl Default for PostEffectEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl PostEffectEngine {
    /// Create engine with default effects
    pub fn new() -> Self {
        Self {
            effects: vec![Box::new(AutoUppercaseCurrentLine), Box::new(ClearStaleDualGroups)],
        }
    }

    pub fn empty() -> Self {
        Self { effects: Vec::new() }
    }

    pub fn register(&mut self, effect: Box<dyn PostEffect>) {
        self.effects.push(effect);
    }

    /// Run every effect, returning the number of lines they changed
    pub fn run(&self, mutation: &Mutation, session: &mut EditorSession) -> usize {
        self.effects
            .iter()
            .map(|effect| {
                let changed = effect.apply(mutation, session);
                if changed > 0 {
                    debug!(effect = effect.name(), changed, "post-effect applied");
                }
                changed
            })
            .sum()
    }

    /// Apply a mutation with all its post-effects
    pub fn apply_with_effects(
        &self,
        mutation: &Mutation,
        session: &mut EditorSession,
    ) -> Result<MutationResult, MutationError> {
        let mut result = mutation.apply(session)?;
        if self.run(mutation, session) > 0 {
            result.changed = true;
        }
        Ok(result)
    }
}
