use crate::spell::{
    DataSourceHandle, SpellContext, SpellDataSourcePool, SpellEventListener, SpellEventOptions,
    SpellEventType,
};

/// Parks the rest of the spell until its button is pressed again.
///
/// The executor registers a recast as pending for its button. The next cast
/// on that button hands its source to [`Recast::trigger`] instead of starting
/// a new spell, and the recast chains that source into its primary symbol.
#[derive(Clone, Debug, PartialEq)]
pub struct Recast {
    source: DataSourceHandle,
    options: SpellEventOptions,
    timer: f32,
    triggered_by: Option<DataSourceHandle>,
}

impl Recast {
    pub(super) fn init(source: DataSourceHandle, options: SpellEventOptions) -> Self {
        Self {
            source,
            options,
            timer: 0.0,
            triggered_by: None,
        }
    }

    /// Takes over a reference to `source` from the recasting caller.
    pub fn trigger(&mut self, source: DataSourceHandle, sources: &mut SpellDataSourcePool) {
        if let Some(previous) = self.triggered_by.replace(source) {
            sources.release(previous);
        }
    }

    pub fn is_triggered(&self) -> bool {
        self.triggered_by.is_some()
    }

    pub(super) fn update(&mut self, listener: &mut SpellEventListener, ctx: &mut SpellContext<'_>) {
        if let Some(source) = self.triggered_by.take() {
            if self.options.has_primary_event {
                listener.add_owned(SpellEventType::Primary, source, ctx.data_sources);
            } else {
                ctx.data_sources.release(source);
            }
            listener.destroy();
            return;
        }

        self.timer += ctx.dt;
        if self.timer >= ctx.tuning.recast.timeout {
            listener.destroy();
        }
    }

    pub(super) fn destroy(self, ctx: &mut SpellContext<'_>) {
        if let Some(source) = self.triggered_by {
            ctx.data_sources.release(source);
        }
        ctx.data_sources.release(self.source);
    }
}
