//! Cooperative cutscene interpreter.

use std::sync::Arc;

use arrayvec::ArrayVec;

use crate::config::SpellConfig;
use crate::cutscene::{Cutscene, CutsceneError, CutsceneStep, TemplatedString};
use crate::env::UpdateLayers;
use crate::expression::{Expression, VariableBlock, evaluate};
use crate::types::ItemType;

/// Collaborators a running cutscene drives.
pub trait CutsceneHost {
    fn show_dialog(&mut self, message: &TemplatedString, args: &[i32]);

    /// Polled every tick while a dialog is open.
    fn dialog_finished(&mut self) -> bool;

    fn show_item_start(&mut self, item: ItemType, should_show: bool);

    /// Advances the item display; true once its animation has finished.
    fn show_item_update(&mut self, dt: f32) -> bool;

    fn set_pause(&mut self, should_pause: bool, should_change_game_mode: bool, layers: UpdateLayers);
}

/// Result of driving a VM for one tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CutsceneStatus {
    /// Waiting on a blocking step.
    Blocked,
    /// Step budget for this tick ran out.
    Running,
    Finished,
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum Blocking {
    Dialog,
    ShowItem,
    Delay { remaining: f32 },
}

/// Play cursor over one cutscene.
#[derive(Clone, Debug)]
pub struct CutsceneVm {
    cutscene: Arc<Cutscene>,
    ip: usize,
    locals: VariableBlock,
    args: ArrayVec<i32, { SpellConfig::MAX_CUTSCENE_ARGS }>,
    blocking: Option<Blocking>,
}

impl CutsceneVm {
    pub fn new(cutscene: Arc<Cutscene>) -> Self {
        let locals = cutscene.locals().clone();
        Self {
            cutscene,
            ip: 0,
            locals,
            args: ArrayVec::new(),
            blocking: None,
        }
    }

    pub fn cutscene(&self) -> &Arc<Cutscene> {
        &self.cutscene
    }

    /// Index of the step that runs next, or is currently blocking.
    pub fn ip(&self) -> usize {
        self.ip
    }

    pub fn locals(&self) -> &VariableBlock {
        &self.locals
    }

    pub fn is_blocked(&self) -> bool {
        self.blocking.is_some()
    }

    pub fn is_finished(&self) -> bool {
        self.blocking.is_none() && self.ip >= self.cutscene.step_count()
    }

    /// Runs steps until one blocks, the program ends, or `max_steps` steps
    /// have executed.
    ///
    /// # Errors
    ///
    /// Returns the first authoring error hit; the VM must not be driven again.
    pub fn update(
        &mut self,
        host: &mut dyn CutsceneHost,
        globals: &mut VariableBlock,
        dt: f32,
        max_steps: usize,
    ) -> Result<CutsceneStatus, CutsceneError> {
        if let Some(blocking) = self.blocking.as_mut() {
            if !poll(blocking, host, dt) {
                return Ok(CutsceneStatus::Blocked);
            }
            self.blocking = None;
            self.ip += 1;
        }

        for _ in 0..max_steps {
            if self.is_finished() {
                return Ok(CutsceneStatus::Finished);
            }
            self.advance(host, globals)?;
            if self.blocking.is_some() {
                return Ok(CutsceneStatus::Blocked);
            }
        }

        if self.is_finished() {
            Ok(CutsceneStatus::Finished)
        } else {
            Ok(CutsceneStatus::Running)
        }
    }

    /// Executes the step at the cursor. Blocking steps are started and leave
    /// the cursor in place until polled to completion by `update`.
    ///
    /// # Errors
    ///
    /// Propagates expression failures, out-of-range jumps and dialogs that
    /// need more arguments than were pushed.
    pub fn advance(
        &mut self,
        host: &mut dyn CutsceneHost,
        globals: &mut VariableBlock,
    ) -> Result<(), CutsceneError> {
        let index = self.ip;
        let cutscene = Arc::clone(&self.cutscene);
        let Some(step) = cutscene.step(index) else {
            return Ok(());
        };

        let mut next = index + 1;
        match step {
            CutsceneStep::Dialog { message } => {
                let needed = message.nargs as usize;
                let available = self.args.len();
                if needed > available {
                    return Err(CutsceneError::ArgumentStackUnderflow {
                        index,
                        needed,
                        available,
                    });
                }
                let start = available - needed;
                host.show_dialog(message, &self.args[start..]);
                self.args.truncate(start);
                self.blocking = Some(Blocking::Dialog);
                return Ok(());
            }
            CutsceneStep::ShowItem { item, should_show } => {
                host.show_item_start(*item, *should_show);
                self.blocking = Some(Blocking::ShowItem);
                return Ok(());
            }
            CutsceneStep::Delay { duration } => {
                self.blocking = Some(Blocking::Delay {
                    remaining: *duration,
                });
                return Ok(());
            }
            CutsceneStep::Pause {
                should_pause,
                should_change_game_mode,
                layers,
            } => host.set_pause(*should_pause, *should_change_game_mode, *layers),
            CutsceneStep::Expression { expression } => {
                let value = self.evaluate(expression, globals, index)?;
                // Values no dialog consumed age out oldest first.
                if self.args.is_full() {
                    self.args.remove(0);
                }
                self.args.push(value);
            }
            CutsceneStep::JumpIfNot { condition, offset } => {
                if self.evaluate(condition, globals, index)? == 0 {
                    next = cutscene.jump_target(index, *offset)?;
                }
            }
            CutsceneStep::Jump { offset } => {
                next = cutscene.jump_target(index, *offset)?;
            }
            CutsceneStep::SetLocal { var, expression } => {
                let value = self.evaluate(expression, globals, index)?;
                self.locals
                    .write(*var, value)
                    .map_err(|source| CutsceneError::Expression { index, source })?;
            }
            CutsceneStep::SetGlobal { var, expression } => {
                let value = self.evaluate(expression, globals, index)?;
                globals
                    .write(*var, value)
                    .map_err(|source| CutsceneError::Expression { index, source })?;
            }
        }

        self.ip = next;
        Ok(())
    }

    fn evaluate(
        &self,
        expression: &Expression,
        globals: &VariableBlock,
        index: usize,
    ) -> Result<i32, CutsceneError> {
        evaluate(expression, &self.locals, globals)
            .map_err(|source| CutsceneError::Expression { index, source })
    }
}

fn poll(blocking: &mut Blocking, host: &mut dyn CutsceneHost, dt: f32) -> bool {
    match blocking {
        Blocking::Dialog => host.dialog_finished(),
        Blocking::ShowItem => host.show_item_update(dt),
        Blocking::Delay { remaining } => {
            *remaining -= dt;
            *remaining <= 0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expression::{DataType, ExprOp, VariableRef};

    #[derive(Default)]
    struct RecordingHost {
        dialogs: Vec<String>,
        dialog_open: bool,
        items: Vec<(ItemType, bool)>,
        pauses: Vec<bool>,
    }

    impl CutsceneHost for RecordingHost {
        fn show_dialog(&mut self, message: &TemplatedString, args: &[i32]) {
            self.dialogs.push(message.render(args));
            self.dialog_open = true;
        }

        fn dialog_finished(&mut self) -> bool {
            !self.dialog_open
        }

        fn show_item_start(&mut self, item: ItemType, should_show: bool) {
            self.items.push((item, should_show));
        }

        fn show_item_update(&mut self, _dt: f32) -> bool {
            true
        }

        fn set_pause(&mut self, should_pause: bool, _: bool, _: UpdateLayers) {
            self.pauses.push(should_pause);
        }
    }

    fn dialog(text: &str) -> CutsceneStep {
        CutsceneStep::Dialog {
            message: TemplatedString::from(text),
        }
    }

    #[test]
    fn false_guard_jumps_by_offset() {
        let cutscene = Arc::new(Cutscene::new(vec![
            CutsceneStep::JumpIfNot {
                condition: Expression::constant(0),
                offset: 3,
            },
            dialog("one"),
            dialog("two"),
            dialog("three"),
            dialog("four"),
        ]));
        let mut vm = CutsceneVm::new(cutscene);
        let mut host = RecordingHost::default();
        let mut globals = VariableBlock::new(0);

        vm.advance(&mut host, &mut globals).unwrap();

        assert_eq!(vm.ip(), 3);
    }

    #[test]
    fn true_guard_falls_through() {
        let cutscene = Arc::new(Cutscene::new(vec![
            CutsceneStep::JumpIfNot {
                condition: Expression::constant(1),
                offset: 2,
            },
            dialog("shown"),
        ]));
        let mut vm = CutsceneVm::new(cutscene);
        let mut globals = VariableBlock::new(0);

        vm.advance(&mut RecordingHost::default(), &mut globals).unwrap();

        assert_eq!(vm.ip(), 1);
    }

    #[test]
    fn dialog_blocks_until_dismissed() {
        let cutscene = Arc::new(Cutscene::new(vec![dialog("hello"), dialog("bye")]));
        let mut vm = CutsceneVm::new(cutscene);
        let mut host = RecordingHost::default();
        let mut globals = VariableBlock::new(0);

        let status = vm.update(&mut host, &mut globals, 0.1, 32).unwrap();
        assert_eq!(status, CutsceneStatus::Blocked);
        assert_eq!(vm.update(&mut host, &mut globals, 0.1, 32), Ok(CutsceneStatus::Blocked));
        assert_eq!(host.dialogs, vec!["hello"]);

        host.dialog_open = false;
        vm.update(&mut host, &mut globals, 0.1, 32).unwrap();
        assert_eq!(host.dialogs, vec!["hello", "bye"]);

        host.dialog_open = false;
        assert_eq!(
            vm.update(&mut host, &mut globals, 0.1, 32),
            Ok(CutsceneStatus::Finished)
        );
    }

    #[test]
    fn delay_waits_for_simulated_time() {
        let cutscene = Arc::new(Cutscene::new(vec![
            CutsceneStep::Delay { duration: 0.25 },
            CutsceneStep::Pause {
                should_pause: false,
                should_change_game_mode: true,
                layers: UpdateLayers::WORLD,
            },
        ]));
        let mut vm = CutsceneVm::new(cutscene);
        let mut host = RecordingHost::default();
        let mut globals = VariableBlock::new(0);

        let statuses: Vec<_> = (0..4)
            .map(|_| vm.update(&mut host, &mut globals, 0.1, 32).unwrap())
            .collect();

        assert_eq!(
            statuses,
            vec![
                CutsceneStatus::Blocked,
                CutsceneStatus::Blocked,
                CutsceneStatus::Blocked,
                CutsceneStatus::Finished,
            ]
        );
        assert_eq!(host.pauses, vec![false]);
    }

    #[test]
    fn expressions_feed_dialog_arguments() {
        let counter = VariableRef::new(DataType::Int16, 0);
        let cutscene = Arc::new(Cutscene::new(vec![
            CutsceneStep::SetGlobal {
                var: counter,
                expression: Expression::builder()
                    .load_global(counter)
                    .literal(1)
                    .op(ExprOp::Add)
                    .build(),
            },
            CutsceneStep::Expression {
                expression: Expression::builder().load_global(counter).build(),
            },
            CutsceneStep::Dialog {
                message: TemplatedString::new("visit {}", 1),
            },
        ]));
        let mut vm = CutsceneVm::new(cutscene);
        let mut host = RecordingHost::default();
        let mut globals = VariableBlock::new(1);
        globals.write(counter, 4).unwrap();

        vm.update(&mut host, &mut globals, 0.1, 32).unwrap();

        assert_eq!(host.dialogs, vec!["visit 5"]);
        assert_eq!(globals.read(counter), Ok(5));
    }

    #[test]
    fn loops_respect_the_step_budget() {
        let flag = VariableRef::new(DataType::Bool, 0);
        let cutscene = Arc::new(Cutscene::new(vec![
            CutsceneStep::SetLocal {
                var: flag,
                expression: Expression::constant(1),
            },
            CutsceneStep::Jump { offset: -1 },
        ]));
        let mut vm = CutsceneVm::new(cutscene);
        let mut globals = VariableBlock::new(0);

        let status = vm
            .update(&mut RecordingHost::default(), &mut globals, 0.1, 8)
            .unwrap();

        assert_eq!(status, CutsceneStatus::Running);
        assert_eq!(vm.locals().read(flag), Ok(1));
    }

    #[test]
    fn unconsumed_expressions_never_overflow() {
        let count = VariableRef::new(DataType::Int32, 0);
        // Loops twelve times, each pass pushing a value no dialog reads.
        let cutscene = Arc::new(Cutscene::new(vec![
            CutsceneStep::SetLocal {
                var: count,
                expression: Expression::builder()
                    .load_local(count)
                    .literal(1)
                    .op(ExprOp::Add)
                    .build(),
            },
            CutsceneStep::Expression {
                expression: Expression::builder().load_local(count).build(),
            },
            CutsceneStep::JumpIfNot {
                condition: Expression::builder()
                    .load_local(count)
                    .literal(12)
                    .op(ExprOp::Eq)
                    .build(),
                offset: -2,
            },
            CutsceneStep::Dialog {
                message: TemplatedString::new("{} then {}", 2),
            },
        ]));
        let mut vm = CutsceneVm::new(cutscene);
        let mut host = RecordingHost::default();
        let mut globals = VariableBlock::new(0);

        let status = vm.update(&mut host, &mut globals, 0.1, 64).unwrap();

        assert_eq!(status, CutsceneStatus::Blocked);
        assert_eq!(host.dialogs, vec!["11 then 12"]);
        host.dialog_open = false;
        assert_eq!(
            vm.update(&mut host, &mut globals, 0.1, 64),
            Ok(CutsceneStatus::Finished)
        );
    }

    #[test]
    fn dialog_without_arguments_is_an_error() {
        let cutscene = Arc::new(Cutscene::new(vec![CutsceneStep::Dialog {
            message: TemplatedString::new("{}", 1),
        }]));
        let mut vm = CutsceneVm::new(cutscene);
        let mut globals = VariableBlock::new(0);

        let err = vm
            .update(&mut RecordingHost::default(), &mut globals, 0.1, 8)
            .unwrap_err();

        assert_eq!(
            err,
            CutsceneError::ArgumentStackUnderflow {
                index: 0,
                needed: 1,
                available: 0,
            }
        );
    }

    #[test]
    fn jump_outside_program_is_fatal() {
        let cutscene = Arc::new(Cutscene::new(vec![CutsceneStep::Jump { offset: 5 }]));
        let mut vm = CutsceneVm::new(cutscene);
        let mut globals = VariableBlock::new(0);

        let err = vm
            .update(&mut RecordingHost::default(), &mut globals, 0.1, 8)
            .unwrap_err();

        assert!(matches!(err, CutsceneError::JumpOutOfRange { target: 5, .. }));
    }
}
