//! Bounded builder for procedurally assembled cutscenes.

use arrayvec::ArrayVec;

use crate::config::SpellConfig;
use crate::cutscene::{Cutscene, CutsceneError, CutsceneStep, TemplatedString};
use crate::env::UpdateLayers;
use crate::expression::{Expression, VariableRef};
use crate::types::ItemType;

type Steps = ArrayVec<CutsceneStep, { SpellConfig::MAX_BUILDER_STEP_COUNT }>;

/// Append-only step buffer.
///
/// Appending past [`SpellConfig::MAX_BUILDER_STEP_COUNT`] steps fails with
/// `CutsceneError::BuilderFull`.
///
/// ```
/// use spellcast_core::cutscene::CutsceneBuilder;
/// use spellcast_core::env::UpdateLayers;
///
/// let mut builder = CutsceneBuilder::new();
/// builder
///     .pause(true, false, UpdateLayers::WORLD)?
///     .delay(1.0)?
///     .dialog("You found a rune")?
///     .pause(false, false, UpdateLayers::WORLD)?;
/// assert_eq!(builder.finish().step_count(), 4);
/// # Ok::<(), spellcast_core::cutscene::CutsceneError>(())
/// ```
#[derive(Clone, Debug, Default)]
pub struct CutsceneBuilder {
    steps: Steps,
}

impl CutsceneBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Discards every appended step.
    pub fn init(&mut self) {
        self.steps.clear();
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn push(&mut self, step: CutsceneStep) -> Result<&mut Self, CutsceneError> {
        self.steps
            .try_push(step)
            .map_err(|_| CutsceneError::BuilderFull {
                capacity: SpellConfig::MAX_BUILDER_STEP_COUNT,
            })?;
        Ok(self)
    }

    pub fn pause(
        &mut self,
        should_pause: bool,
        should_change_game_mode: bool,
        layers: UpdateLayers,
    ) -> Result<&mut Self, CutsceneError> {
        self.push(CutsceneStep::Pause {
            should_pause,
            should_change_game_mode,
            layers,
        })
    }

    pub fn dialog(&mut self, message: impl Into<String>) -> Result<&mut Self, CutsceneError> {
        self.push(CutsceneStep::Dialog {
            message: TemplatedString::new(message, 0),
        })
    }

    /// Dialog that consumes `nargs` values pushed by earlier expressions.
    pub fn dialog_with_args(
        &mut self,
        message: impl Into<String>,
        nargs: u16,
    ) -> Result<&mut Self, CutsceneError> {
        self.push(CutsceneStep::Dialog {
            message: TemplatedString::new(message, nargs),
        })
    }

    pub fn show_item(
        &mut self,
        item: ItemType,
        should_show: bool,
    ) -> Result<&mut Self, CutsceneError> {
        self.push(CutsceneStep::ShowItem { item, should_show })
    }

    pub fn delay(&mut self, duration: f32) -> Result<&mut Self, CutsceneError> {
        self.push(CutsceneStep::Delay { duration })
    }

    pub fn expression(&mut self, expression: Expression) -> Result<&mut Self, CutsceneError> {
        self.push(CutsceneStep::Expression { expression })
    }

    pub fn jump(&mut self, offset: i32) -> Result<&mut Self, CutsceneError> {
        self.push(CutsceneStep::Jump { offset })
    }

    pub fn jump_if_not(
        &mut self,
        condition: Expression,
        offset: i32,
    ) -> Result<&mut Self, CutsceneError> {
        self.push(CutsceneStep::JumpIfNot { condition, offset })
    }

    pub fn set_local(
        &mut self,
        var: VariableRef,
        expression: Expression,
    ) -> Result<&mut Self, CutsceneError> {
        self.push(CutsceneStep::SetLocal { var, expression })
    }

    pub fn set_global(
        &mut self,
        var: VariableRef,
        expression: Expression,
    ) -> Result<&mut Self, CutsceneError> {
        self.push(CutsceneStep::SetGlobal { var, expression })
    }

    /// Copies the appended steps into a new cutscene. The builder is left
    /// untouched.
    pub fn finish(&self) -> Cutscene {
        Cutscene::new(self.steps.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expression::DataType;

    #[test]
    fn finish_keeps_steps_in_order() {
        let opened = VariableRef::new(DataType::Bool, 3);
        let mut builder = CutsceneBuilder::new();
        builder
            .pause(true, true, UpdateLayers::WORLD | UpdateLayers::PLAYER)
            .unwrap()
            .show_item(ItemType(4), true)
            .unwrap()
            .set_local(opened, Expression::constant(1))
            .unwrap()
            .delay(0.5)
            .unwrap()
            .dialog("done")
            .unwrap();

        let cutscene = builder.finish();

        assert_eq!(cutscene.step_count(), 5);
        assert_eq!(cutscene.steps(), builder.steps.as_slice());
        assert_eq!(
            cutscene.step(1),
            Some(&CutsceneStep::ShowItem {
                item: ItemType(4),
                should_show: true,
            })
        );
        assert_eq!(cutscene.locals().word_count(), 4);
        assert_eq!(builder.len(), 5);
    }

    #[test]
    fn overflow_is_reported() {
        let mut builder = CutsceneBuilder::new();
        for _ in 0..SpellConfig::MAX_BUILDER_STEP_COUNT {
            builder.delay(0.1).unwrap();
        }

        let err = builder.delay(0.1).unwrap_err();

        assert_eq!(
            err,
            CutsceneError::BuilderFull {
                capacity: SpellConfig::MAX_BUILDER_STEP_COUNT,
            }
        );
        builder.init();
        assert!(builder.is_empty());
    }
}
