//! Scripted sequences.
//!
//! A [`Cutscene`] is an immutable step program plus the zeroed locals block
//! each run starts from. [`CutsceneVm`] executes it cooperatively: blocking
//! steps (dialog, show item, delay) are polled once per tick until their
//! collaborator reports completion. Programs are assembled by
//! [`CutsceneBuilder`] or loaded from content files.

pub mod builder;
pub mod vm;

pub use builder::CutsceneBuilder;
pub use vm::{CutsceneHost, CutsceneStatus, CutsceneVm};

use crate::env::UpdateLayers;
use crate::error::{ErrorSeverity, GameError};
use crate::expression::{Expression, ExpressionError, VariableBlock, VariableRef};
use crate::types::ItemType;

/// Message template plus the number of values it substitutes.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TemplatedString {
    pub template: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub nargs: u16,
}

impl TemplatedString {
    pub fn new(template: impl Into<String>, nargs: u16) -> Self {
        Self {
            template: template.into(),
            nargs,
        }
    }

    /// Replaces each `{}` in order with the next argument. Placeholders
    /// without a matching argument are kept verbatim.
    pub fn render(&self, args: &[i32]) -> String {
        let mut out = String::with_capacity(self.template.len());
        let mut args = args.iter();
        let mut rest = self.template.as_str();

        while let Some(pos) = rest.find("{}") {
            out.push_str(&rest[..pos]);
            match args.next() {
                Some(value) => out.push_str(&value.to_string()),
                None => out.push_str("{}"),
            }
            rest = &rest[pos + 2..];
        }
        out.push_str(rest);
        out
    }
}

impl From<&str> for TemplatedString {
    fn from(template: &str) -> Self {
        Self::new(template, 0)
    }
}

/// One instruction of a cutscene program.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CutsceneStep {
    /// Shows a message, consuming `nargs` values from the argument stack.
    /// Blocks until the dialog is dismissed.
    Dialog { message: TemplatedString },
    /// Starts or stops the item display. Blocks until its animation ends.
    ShowItem { item: ItemType, should_show: bool },
    /// Toggles gameplay pause for the given layers.
    Pause {
        should_pause: bool,
        should_change_game_mode: bool,
        layers: UpdateLayers,
    },
    /// Evaluates an expression and pushes its value on the argument stack.
    Expression { expression: Expression },
    /// Jumps by `offset` when `condition` evaluates to 0.
    JumpIfNot { condition: Expression, offset: i32 },
    Jump { offset: i32 },
    SetLocal {
        var: VariableRef,
        expression: Expression,
    },
    SetGlobal {
        var: VariableRef,
        expression: Expression,
    },
    /// Waits for `duration` seconds of simulated time.
    Delay { duration: f32 },
}

impl CutsceneStep {
    /// Highest local word touched plus one.
    fn local_words(&self) -> usize {
        match self {
            Self::Expression { expression } => expression.local_words(),
            Self::JumpIfNot { condition, .. } => condition.local_words(),
            Self::SetLocal { var, expression } => {
                (var.word_offset as usize + 1).max(expression.local_words())
            }
            Self::SetGlobal { expression, .. } => expression.local_words(),
            _ => 0,
        }
    }

    fn jump_offset(&self) -> Option<i32> {
        match self {
            Self::Jump { offset } | Self::JumpIfNot { offset, .. } => Some(*offset),
            _ => None,
        }
    }
}

/// Immutable cutscene program.
#[derive(Clone, Debug, PartialEq)]
pub struct Cutscene {
    steps: Box<[CutsceneStep]>,
    locals: VariableBlock,
}

impl Cutscene {
    /// Creates a cutscene whose locals block covers every local it touches.
    pub fn new(steps: Vec<CutsceneStep>) -> Self {
        let words = steps.iter().map(CutsceneStep::local_words).max().unwrap_or(0);
        Self {
            steps: steps.into_boxed_slice(),
            locals: VariableBlock::new(words),
        }
    }

    pub fn steps(&self) -> &[CutsceneStep] {
        &self.steps
    }

    pub fn step_count(&self) -> usize {
        self.steps.len()
    }

    pub fn step(&self, index: usize) -> Option<&CutsceneStep> {
        self.steps.get(index)
    }

    /// Zeroed locals every run starts from.
    pub fn locals(&self) -> &VariableBlock {
        &self.locals
    }

    /// Resolves a relative jump from `index`.
    ///
    /// # Errors
    ///
    /// Returns `CutsceneError::JumpOutOfRange` unless the target is a step of
    /// this cutscene.
    pub fn jump_target(&self, index: usize, offset: i32) -> Result<usize, CutsceneError> {
        let target = index as i64 + i64::from(offset);
        if target < 0 || target >= self.steps.len() as i64 {
            return Err(CutsceneError::JumpOutOfRange {
                index,
                target,
                step_count: self.steps.len(),
            });
        }
        Ok(target as usize)
    }

    /// Checks every jump statically so malformed content is rejected at load.
    ///
    /// # Errors
    ///
    /// Returns the first `CutsceneError::JumpOutOfRange` found.
    pub fn validate(&self) -> Result<(), CutsceneError> {
        for (index, step) in self.steps.iter().enumerate() {
            if let Some(offset) = step.jump_offset() {
                self.jump_target(index, offset)?;
            }
        }
        Ok(())
    }
}

// ============================================================================
// Errors
// ============================================================================

/// Authoring errors in cutscene programs.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum CutsceneError {
    #[error("jump at step {index} targets {target}, outside 0..{step_count}")]
    JumpOutOfRange {
        index: usize,
        target: i64,
        step_count: usize,
    },

    #[error("cutscene builder is full ({capacity} steps)")]
    BuilderFull { capacity: usize },

    #[error("dialog at step {index} needs {needed} arguments, {available} available")]
    ArgumentStackUnderflow {
        index: usize,
        needed: usize,
        available: usize,
    },

    #[error("expression at step {index} failed: {source}")]
    Expression {
        index: usize,
        #[source]
        source: ExpressionError,
    },
}

impl GameError for CutsceneError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Fatal
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::JumpOutOfRange { .. } => "CUTSCENE_JUMP_OUT_OF_RANGE",
            Self::BuilderFull { .. } => "CUTSCENE_BUILDER_FULL",
            Self::ArgumentStackUnderflow { .. } => "CUTSCENE_ARGUMENT_UNDERFLOW",
            Self::Expression { .. } => "CUTSCENE_EXPRESSION",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expression::DataType;

    #[test]
    fn locals_cover_every_local_reference() {
        let cutscene = Cutscene::new(vec![
            CutsceneStep::SetLocal {
                var: VariableRef::new(DataType::Int32, 2),
                expression: Expression::constant(1),
            },
            CutsceneStep::JumpIfNot {
                condition: Expression::builder()
                    .load_local(VariableRef::new(DataType::Int8, 5))
                    .build(),
                offset: -1,
            },
        ]);
        assert_eq!(cutscene.locals().word_count(), 6);
    }

    #[test]
    fn validate_rejects_jumps_past_the_end() {
        let cutscene = Cutscene::new(vec![
            CutsceneStep::Delay { duration: 1.0 },
            CutsceneStep::Jump { offset: 1 },
        ]);
        assert_eq!(
            cutscene.validate(),
            Err(CutsceneError::JumpOutOfRange {
                index: 1,
                target: 2,
                step_count: 2,
            })
        );
        assert_eq!(cutscene.jump_target(1, -1), Ok(0));
    }

    #[test]
    fn templates_substitute_in_order() {
        let message = TemplatedString::new("{} of {} runes", 2);
        assert_eq!(message.render(&[3, 7]), "3 of 7 runes");
        assert_eq!(message.render(&[3]), "3 of {} runes");
    }
}
