//! Headless spellcast driver.
//!
//! Boots the runtime against the shipped content, spawns a target, casts a
//! spell at it and plays a cutscene while dismissing its dialogs, then logs
//! the final session status.
//!
//! ```bash
//! SPELLCAST_TICK_HZ=0 SPELLCAST_DEMO_SPELL=bolt cargo run -p spellcast
//! ```
mod config;

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use glam::Vec3;
use spellcast_core::{CastState, ElementType, EntityId, ItemType, SpellDataSource};
use spellcast_runtime::{
    CutsceneEvent, Event, Runtime, RuntimeConfig, RuntimeHandle, SpellEvent, Topic,
};
use tokio::task::JoinHandle;
use tracing::{info, warn};

use config::DemoConfig;

const SHIPPED_CONTENT: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/../game/content/data");

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut config = RuntimeConfig::from_env();
    config
        .content_dir
        .get_or_insert_with(|| PathBuf::from(SHIPPED_CONTENT));
    let demo = DemoConfig::from_env();

    let runtime = Runtime::builder()
        .config(config.clone())
        .build()
        .await
        .context("failed to start runtime")?;
    let handle = runtime.handle();
    let listener = spawn_listener(handle.clone());

    let target = handle.spawn(Vec3::new(0.0, 0.0, 4.0), 0.5, Some(5.0)).await?;
    info!(?target, "spawned target");

    let source = SpellDataSource {
        position: Vec3::ZERO,
        direction: Vec3::Z,
        target: Some(EntityId::PLAYER),
        cast_state: CastState::Instant,
        element: ElementType::None,
    };
    match handle.cast(0, demo.spell.as_str(), source).await {
        Ok(slot) => info!(spell = %demo.spell, ?slot, "cast"),
        Err(err) => warn!(spell = %demo.spell, error = %err, "cast rejected"),
    }

    if let Some(name) = &demo.cutscene {
        handle
            .play_cutscene(name.as_str())
            .await
            .with_context(|| format!("failed to play cutscene '{name}'"))?;
    }
    if let Some(item) = demo.reveal_item {
        let unlocked = handle
            .reveal_item(ItemType(item), format!("You found item {item}"))
            .await?;
        info!(item, unlocked, "reveal queued");
    }

    run_ticks(&handle, &config, demo.ticks).await?;

    let status = handle.query_status().await?;
    info!(
        tick = status.tick,
        mana = status.mana,
        active_slots = status.active_slots,
        live_data_sources = status.live_data_sources,
        cutscene = ?status.cutscene,
        "final status"
    );

    runtime.shutdown().await?;
    listener.abort();
    Ok(())
}

/// Steps the session `ticks` times, either directly or by waiting out the
/// worker's own clock.
async fn run_ticks(handle: &RuntimeHandle, config: &RuntimeConfig, ticks: u32) -> Result<()> {
    match config.tick_period() {
        Some(period) => tokio::time::sleep(period * ticks).await,
        None => {
            for _ in 0..ticks {
                handle.advance(1).await?;
                // Let the listener react to dialogs between ticks.
                tokio::time::sleep(Duration::from_millis(1)).await;
            }
        }
    }
    Ok(())
}

/// Logs spell and cutscene events and dismisses every dialog a cutscene opens.
fn spawn_listener(handle: RuntimeHandle) -> JoinHandle<()> {
    let mut spells = handle.subscribe(Topic::Spell);
    let mut cutscenes = handle.subscribe(Topic::Cutscene);

    tokio::spawn(async move {
        loop {
            let event = tokio::select! {
                event = spells.recv() => event,
                event = cutscenes.recv() => event,
            };
            let event = match event {
                Ok(event) => event,
                Err(tokio::sync::broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!(skipped, "listener lagged behind the event bus");
                    continue;
                }
                Err(tokio::sync::broadcast::error::RecvError::Closed) => break,
            };

            match event {
                Event::Spell(SpellEvent::Activity {
                    tick,
                    destroyed,
                    chained,
                    ..
                }) if !destroyed.is_empty() || !chained.is_empty() => {
                    info!(tick, ?destroyed, ?chained, "spell activity");
                }
                Event::Cutscene(CutsceneEvent::Dialog { name, text }) => {
                    info!(cutscene = %name, "{text}");
                    if let Err(err) = handle.dismiss_dialog().await {
                        warn!(error = %err, "failed to dismiss dialog");
                        break;
                    }
                }
                Event::Cutscene(event) => info!(?event, "cutscene"),
                _ => {}
            }
        }
    })
}
