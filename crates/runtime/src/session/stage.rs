//! Headless presentation of dialogs and item displays.

use spellcast_core::ItemType;

#[derive(Clone, Copy, Debug, PartialEq)]
struct ItemDisplay {
    item: ItemType,
    should_show: bool,
    remaining: f32,
}

/// What a cutscene currently shows, and whether the player has dismissed it.
#[derive(Clone, Debug, PartialEq)]
pub struct Stage {
    dialog: Option<String>,
    dismissed: bool,
    item: Option<ItemDisplay>,
    shown_item: Option<ItemType>,
    item_display_duration: f32,
    auto_dismiss_dialogs: bool,
}

impl Stage {
    pub fn new(item_display_duration: f32, auto_dismiss_dialogs: bool) -> Self {
        Self {
            dialog: None,
            dismissed: false,
            item: None,
            shown_item: None,
            item_display_duration,
            auto_dismiss_dialogs,
        }
    }

    pub fn dialog(&self) -> Option<&str> {
        self.dialog.as_deref()
    }

    /// Item left on display by the last finished show-item animation.
    pub fn shown_item(&self) -> Option<ItemType> {
        self.shown_item
    }

    /// Marks the open dialog as dismissed. Returns false when none is open.
    pub fn dismiss_dialog(&mut self) -> bool {
        if self.dialog.is_none() {
            return false;
        }
        self.dismissed = true;
        true
    }

    pub(crate) fn open_dialog(&mut self, text: String) {
        self.dialog = Some(text);
        self.dismissed = self.auto_dismiss_dialogs;
    }

    /// Closes the dialog once dismissed.
    pub(crate) fn poll_dialog(&mut self) -> bool {
        if !self.dismissed {
            return false;
        }
        self.dialog = None;
        self.dismissed = false;
        true
    }

    pub(crate) fn start_item(&mut self, item: ItemType, should_show: bool) {
        self.item = Some(ItemDisplay {
            item,
            should_show,
            remaining: self.item_display_duration,
        });
    }

    /// Advances the item animation; true once it has finished.
    pub(crate) fn poll_item(&mut self, dt: f32) -> bool {
        let Some(display) = self.item.as_mut() else {
            return true;
        };
        display.remaining -= dt;
        if display.remaining > 0.0 {
            return false;
        }

        self.shown_item = display.should_show.then_some(display.item);
        self.item = None;
        true
    }

    /// Drops anything left on screen by an abandoned cutscene.
    pub(crate) fn clear(&mut self) {
        self.dialog = None;
        self.dismissed = false;
        self.item = None;
    }
}
