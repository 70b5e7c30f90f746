//! Cutscene runner: owns the play cursor and the queue behind it.
//!
//! One cutscene plays at a time; others wait in arrival order. The running
//! cutscene drives the [`Stage`] and the active update layers through
//! [`CutsceneHost`]. When it ends, its [`FinishPolicy`] decides what happens
//! to it.

use std::collections::VecDeque;
use std::fmt;
use std::sync::Arc;

use tracing::{debug, error, info};

use spellcast_core::{
    Cutscene, CutsceneError, CutsceneHost, CutsceneStatus, CutsceneVm, GameError, ItemType,
    TemplatedString, UpdateLayers, VariableBlock,
};

use super::stage::Stage;
use crate::events::{CutsceneEvent, Event};

/// How a cutscene left the runner.
#[derive(Clone, Debug, PartialEq)]
pub enum CutsceneOutcome {
    Finished,
    Aborted(CutsceneError),
    Cancelled,
}

pub type FinishCallback = Box<dyn FnOnce(&str, &CutsceneOutcome) + Send>;

/// What the runner does with a cutscene once it stops playing.
pub enum FinishPolicy {
    /// Drop the program.
    FreeOnFinish,
    /// Hand the outcome to the callback.
    Callback(FinishCallback),
}

impl FinishPolicy {
    pub fn callback(f: impl FnOnce(&str, &CutsceneOutcome) + Send + 'static) -> Self {
        Self::Callback(Box::new(f))
    }
}

impl fmt::Debug for FinishPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FreeOnFinish => f.write_str("FreeOnFinish"),
            Self::Callback(_) => f.write_str("Callback(..)"),
        }
    }
}

#[derive(Debug)]
struct Playing {
    name: String,
    vm: CutsceneVm,
    policy: FinishPolicy,
}

#[derive(Debug, Default)]
pub struct CutsceneRunner {
    current: Option<Playing>,
    queue: VecDeque<Playing>,
    /// Layers to restore when a cutscene that switched game mode ends.
    saved_layers: Option<UpdateLayers>,
}

impl CutsceneRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues `cutscene`; it starts on the first tick nothing else is playing.
    pub fn play(&mut self, name: impl Into<String>, cutscene: Arc<Cutscene>, policy: FinishPolicy) {
        let name = name.into();
        debug!(cutscene = %name, steps = cutscene.step_count(), "cutscene queued");
        self.queue.push_back(Playing {
            name,
            vm: CutsceneVm::new(cutscene),
            policy,
        });
    }

    pub fn is_playing(&self) -> bool {
        self.current.is_some()
    }

    pub fn current(&self) -> Option<&str> {
        self.current.as_ref().map(|playing| playing.name.as_str())
    }

    /// Step index of the running cutscene.
    pub fn current_ip(&self) -> Option<usize> {
        self.current.as_ref().map(|playing| playing.vm.ip())
    }

    pub fn queued(&self) -> usize {
        self.queue.len()
    }

    /// Drives the running cutscene for one tick, starting the next queued one
    /// first when idle.
    pub fn update(
        &mut self,
        stage: &mut Stage,
        globals: &mut VariableBlock,
        layers: &mut UpdateLayers,
        dt: f32,
        max_steps: usize,
        outbox: &mut Vec<Event>,
    ) {
        if self.current.is_none() {
            let Some(next) = self.queue.pop_front() else {
                return;
            };
            info!(cutscene = %next.name, "cutscene started");
            outbox.push(Event::Cutscene(CutsceneEvent::Started {
                name: next.name.clone(),
            }));
            self.current = Some(next);
        }

        let Some(playing) = self.current.as_mut() else {
            return;
        };
        let mut host = RunnerHost {
            name: &playing.name,
            stage,
            layers,
            saved_layers: &mut self.saved_layers,
            outbox,
        };
        let result = playing.vm.update(&mut host, globals, dt, max_steps);

        match result {
            Ok(CutsceneStatus::Finished) => {
                self.end(CutsceneOutcome::Finished, stage, layers, outbox);
            }
            Ok(CutsceneStatus::Blocked | CutsceneStatus::Running) => {}
            Err(err) => {
                error!(
                    cutscene = %playing.name,
                    ip = playing.vm.ip(),
                    code = err.error_code(),
                    error = %err,
                    "cutscene aborted"
                );
                self.end(CutsceneOutcome::Aborted(err), stage, layers, outbox);
            }
        }
    }

    /// Abandons the running cutscene and everything queued behind it.
    pub fn cancel_all(
        &mut self,
        stage: &mut Stage,
        layers: &mut UpdateLayers,
        outbox: &mut Vec<Event>,
    ) {
        if self.current.is_some() {
            self.end(CutsceneOutcome::Cancelled, stage, layers, outbox);
        }
        for playing in self.queue.drain(..) {
            finish(playing, &CutsceneOutcome::Cancelled);
        }
    }

    fn end(
        &mut self,
        outcome: CutsceneOutcome,
        stage: &mut Stage,
        layers: &mut UpdateLayers,
        outbox: &mut Vec<Event>,
    ) {
        let Some(playing) = self.current.take() else {
            return;
        };
        if let Some(saved) = self.saved_layers.take() {
            *layers = saved;
        }

        match &outcome {
            CutsceneOutcome::Finished => {
                info!(cutscene = %playing.name, "cutscene finished");
                outbox.push(Event::Cutscene(CutsceneEvent::Finished {
                    name: playing.name.clone(),
                }));
            }
            CutsceneOutcome::Aborted(err) => {
                stage.clear();
                outbox.push(Event::Cutscene(CutsceneEvent::Aborted {
                    name: playing.name.clone(),
                    code: err.error_code().to_string(),
                }));
            }
            CutsceneOutcome::Cancelled => {
                stage.clear();
                info!(cutscene = %playing.name, "cutscene cancelled");
            }
        }
        finish(playing, &outcome);
    }
}

fn finish(playing: Playing, outcome: &CutsceneOutcome) {
    match playing.policy {
        FinishPolicy::FreeOnFinish => {
            debug!(cutscene = %playing.name, "cutscene freed");
        }
        FinishPolicy::Callback(callback) => callback(&playing.name, outcome),
    }
}

/// Routes VM requests to the stage and the layer mask.
struct RunnerHost<'a> {
    name: &'a str,
    stage: &'a mut Stage,
    layers: &'a mut UpdateLayers,
    saved_layers: &'a mut Option<UpdateLayers>,
    outbox: &'a mut Vec<Event>,
}

impl CutsceneHost for RunnerHost<'_> {
    fn show_dialog(&mut self, message: &TemplatedString, args: &[i32]) {
        let text = message.render(args);
        debug!(cutscene = self.name, text = %text, "dialog opened");
        self.outbox.push(Event::Cutscene(CutsceneEvent::Dialog {
            name: self.name.to_string(),
            text: text.clone(),
        }));
        self.stage.open_dialog(text);
    }

    fn dialog_finished(&mut self) -> bool {
        self.stage.poll_dialog()
    }

    fn show_item_start(&mut self, item: ItemType, should_show: bool) {
        self.outbox.push(Event::Cutscene(CutsceneEvent::ItemShown { item, should_show }));
        self.stage.start_item(item, should_show);
    }

    fn show_item_update(&mut self, dt: f32) -> bool {
        self.stage.poll_item(dt)
    }

    fn set_pause(&mut self, should_pause: bool, should_change_game_mode: bool, layers: UpdateLayers) {
        // The runner itself must keep running.
        let layers = layers - UpdateLayers::CUTSCENE;

        if should_change_game_mode {
            if should_pause {
                self.saved_layers.get_or_insert(*self.layers);
                *self.layers = UpdateLayers::CUTSCENE;
            } else if let Some(saved) = self.saved_layers.take() {
                *self.layers = saved;
            } else {
                self.layers.insert(layers);
            }
        } else if should_pause {
            self.layers.remove(layers);
        } else {
            self.layers.insert(layers);
        }
        debug!(
            cutscene = self.name,
            should_pause,
            layers = ?*self.layers,
            "update layers changed"
        );
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use spellcast_core::{CutsceneBuilder, CutsceneStep, Expression};

    use super::*;

    const PLAYING: UpdateLayers = UpdateLayers::WORLD
        .union(UpdateLayers::PLAYER)
        .union(UpdateLayers::CUTSCENE);

    struct Harness {
        runner: CutsceneRunner,
        stage: Stage,
        globals: VariableBlock,
        layers: UpdateLayers,
        outbox: Vec<Event>,
    }

    impl Harness {
        fn new() -> Self {
            Self {
                runner: CutsceneRunner::new(),
                stage: Stage::new(0.1, false),
                globals: VariableBlock::new(4),
                layers: PLAYING,
                outbox: Vec::new(),
            }
        }

        fn tick(&mut self) {
            self.runner.update(
                &mut self.stage,
                &mut self.globals,
                &mut self.layers,
                0.1,
                32,
                &mut self.outbox,
            );
        }
    }

    #[test]
    fn game_mode_pause_switches_to_cutscene_layer_and_back() {
        let mut builder = CutsceneBuilder::new();
        builder
            .pause(true, true, UpdateLayers::WORLD)
            .unwrap()
            .dialog("stop right there")
            .unwrap()
            .pause(false, true, UpdateLayers::WORLD)
            .unwrap();
        let mut harness = Harness::new();
        harness
            .runner
            .play("intro", Arc::new(builder.finish()), FinishPolicy::FreeOnFinish);

        harness.tick();
        assert_eq!(harness.layers, UpdateLayers::CUTSCENE);
        assert_eq!(harness.stage.dialog(), Some("stop right there"));

        harness.stage.dismiss_dialog();
        harness.tick();
        assert_eq!(harness.layers, PLAYING);
        assert!(!harness.runner.is_playing());
        assert_eq!(
            harness.outbox.last(),
            Some(&Event::Cutscene(CutsceneEvent::Finished {
                name: "intro".into()
            }))
        );
    }

    #[test]
    fn queued_cutscenes_play_in_order() {
        let mut harness = Harness::new();
        let delay = Arc::new(Cutscene::new(vec![CutsceneStep::Delay { duration: 0.05 }]));
        harness
            .runner
            .play("first", Arc::clone(&delay), FinishPolicy::FreeOnFinish);
        harness
            .runner
            .play("second", delay, FinishPolicy::FreeOnFinish);

        harness.tick();
        assert_eq!(harness.runner.current(), Some("first"));
        assert_eq!(harness.runner.queued(), 1);

        harness.tick();
        harness.tick();
        assert_eq!(harness.runner.current(), Some("second"));
    }

    #[test]
    fn authoring_errors_abort_and_restore_layers() {
        let outcome = Arc::new(Mutex::new(None));
        let seen = Arc::clone(&outcome);
        let cutscene = Cutscene::new(vec![
            CutsceneStep::Pause {
                should_pause: true,
                should_change_game_mode: true,
                layers: UpdateLayers::WORLD,
            },
            CutsceneStep::Expression {
                expression: Expression::constant(1),
            },
            CutsceneStep::Dialog {
                message: TemplatedString::new("{} {}", 2),
            },
        ]);
        let mut harness = Harness::new();
        harness.runner.play(
            "broken",
            Arc::new(cutscene),
            FinishPolicy::callback(move |name, outcome| {
                *seen.lock().unwrap() = Some((name.to_string(), outcome.clone()));
            }),
        );

        harness.tick();

        assert!(!harness.runner.is_playing());
        assert_eq!(harness.layers, PLAYING);
        let (name, outcome) = outcome.lock().unwrap().take().unwrap();
        assert_eq!(name, "broken");
        assert!(matches!(
            outcome,
            CutsceneOutcome::Aborted(CutsceneError::ArgumentStackUnderflow { .. })
        ));
    }

    #[test]
    fn cancel_all_notifies_queued_callbacks() {
        let cancelled = Arc::new(Mutex::new(Vec::new()));
        let mut harness = Harness::new();
        for name in ["a", "b"] {
            let cancelled = Arc::clone(&cancelled);
            harness.runner.play(
                name,
                Arc::new(Cutscene::new(vec![CutsceneStep::Delay { duration: 1.0 }])),
                FinishPolicy::callback(move |name, outcome| {
                    assert_eq!(outcome, &CutsceneOutcome::Cancelled);
                    cancelled.lock().unwrap().push(name.to_string());
                }),
            );
        }
        harness.tick();

        harness
            .runner
            .cancel_all(&mut harness.stage, &mut harness.layers, &mut harness.outbox);

        assert_eq!(*cancelled.lock().unwrap(), vec!["a", "b"]);
        assert!(!harness.runner.is_playing());
        assert_eq!(harness.runner.queued(), 0);
    }
}
