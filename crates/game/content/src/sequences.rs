//! Prebuilt cutscene sequences assembled with [`CutsceneBuilder`].

use spellcast_core::{Cutscene, CutsceneBuilder, CutsceneError, ItemType, UpdateLayers};

/// Seconds the world stays paused before the item is presented.
const REVEAL_DELAY: f32 = 1.0;

/// Pauses the world, presents `item` with a message, then resumes.
///
/// Used by chests and pickups that unlock an inventory item.
pub fn item_reveal(item: ItemType, message: &str) -> Result<Cutscene, CutsceneError> {
    let mut builder = CutsceneBuilder::new();
    builder
        .pause(true, false, UpdateLayers::WORLD)?
        .delay(REVEAL_DELAY)?
        .show_item(item, true)?
        .dialog(message)?
        .show_item(item, false)?
        .pause(false, false, UpdateLayers::WORLD)?;
    Ok(builder.finish())
}

#[cfg(test)]
mod tests {
    use spellcast_core::CutsceneStep;

    use super::*;

    #[test]
    fn reveal_shows_then_hides_the_item() {
        let cutscene = item_reveal(ItemType(2), "You found the fire rune").unwrap();
        let steps = cutscene.steps();

        assert_eq!(steps.len(), 6);
        assert!(matches!(steps[0], CutsceneStep::Pause { should_pause: true, .. }));
        assert_eq!(
            steps[2],
            CutsceneStep::ShowItem {
                item: ItemType(2),
                should_show: true,
            }
        );
        assert!(matches!(steps[5], CutsceneStep::Pause { should_pause: false, .. }));
    }
}
