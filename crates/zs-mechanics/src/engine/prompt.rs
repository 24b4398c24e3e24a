//! The level prompt: how the engine asks an operator for a level.
//!
//! Applying an incremental condition without a level blocks on a
//! [`LevelPrompt`]. Implementations decide where the answer comes from: a
//! terminal, a UI dialog, or a script in tests.

use std::collections::VecDeque;

use zs_core::ConditionDefinition;

/// One answer from a level prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptReply {
    /// A number. The engine keeps asking while it is below 1.
    Level(i64),
    /// Input that was not a number. The engine asks again.
    Invalid,
    /// The operator gave up. The condition being prompted for is not applied.
    Cancelled,
}

impl PromptReply {
    /// Interpret a line of operator input.
    pub fn parse(input: &str) -> Self {
        match input.trim().parse::<i64>() {
            Ok(level) => Self::Level(level),
            Err(_) => Self::Invalid,
        }
    }
}

/// Source of levels for incremental conditions applied without one.
pub trait LevelPrompt {
    /// Ask for the level of `definition`. Called repeatedly until the reply
    /// is a level of at least 1 or [`PromptReply::Cancelled`].
    fn request_level(&mut self, definition: &ConditionDefinition) -> PromptReply;
}

impl<F> LevelPrompt for F
where
    F: FnMut(&ConditionDefinition) -> PromptReply,
{
    fn request_level(&mut self, definition: &ConditionDefinition) -> PromptReply {
        self(definition)
    }
}

/// A prompt that cancels every request.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoPrompt;

impl LevelPrompt for NoPrompt {
    fn request_level(&mut self, _definition: &ConditionDefinition) -> PromptReply {
        PromptReply::Cancelled
    }
}

/// A prompt that plays back queued replies, then cancels.
#[derive(Debug, Clone, Default)]
pub struct ScriptedPrompt {
    replies: VecDeque<PromptReply>,
    asked: Vec<String>,
}

impl ScriptedPrompt {
    /// Queue the given replies.
    pub fn new(replies: impl IntoIterator<Item = PromptReply>) -> Self {
        Self {
            replies: replies.into_iter().collect(),
            asked: Vec::new(),
        }
    }

    /// Queue plain levels.
    pub fn levels(levels: impl IntoIterator<Item = i64>) -> Self {
        Self::new(levels.into_iter().map(PromptReply::Level))
    }

    /// Reference ids that were asked about, in order, one entry per request.
    pub fn asked(&self) -> &[String] {
        &self.asked
    }
}

impl LevelPrompt for ScriptedPrompt {
    fn request_level(&mut self, definition: &ConditionDefinition) -> PromptReply {
        self.asked.push(definition.reference_id.clone());
        self.replies.pop_front().unwrap_or(PromptReply::Cancelled)
    }
}
