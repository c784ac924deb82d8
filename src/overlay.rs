//! Single-slot dialog register.
//!
//! Holds at most one dialog. `show` replaces whatever is there without
//! queuing (last write wins; the replaced dialog's dismiss handler never
//! runs). `dismiss` hides the slot and then hands the pre-dismissal snapshot
//! to the dialog's own handler.
//!
//! Handlers always run outside the internal lock, so they may call back into
//! the overlay.

use parking_lot::RwLock;

use crate::types::dialog::DialogDescriptor;

/// Session-wide dialog register.
#[derive(Debug, Default)]
pub struct DialogOverlay {
    current: RwLock<DialogDescriptor>,
}

impl DialogOverlay {
    /// Create an empty overlay.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the current dialog unconditionally.
    pub fn show(&self, descriptor: DialogDescriptor) {
        let mut current = self.current.write();
        if current.visible {
            tracing::debug!("Replacing visible dialog without dismissal");
        }
        *current = descriptor;
    }

    /// Dismiss the current dialog.
    ///
    /// Returns `false` when nothing was visible.
    pub fn dismiss(&self) -> bool {
        let snapshot = {
            let mut current = self.current.write();
            if !current.visible {
                return false;
            }
            std::mem::replace(&mut *current, DialogDescriptor::hidden())
        };

        if let Some(handler) = snapshot.on_dismiss.clone() {
            handler(&snapshot);
        }
        true
    }

    /// Activate the button at `index` of the visible dialog.
    ///
    /// Returns `false` when no dialog is visible or the index is out of range.
    pub fn activate(&self, index: usize) -> bool {
        let handler = {
            let current = self.current.read();
            if !current.visible {
                return false;
            }
            match current.buttons.get(index) {
                Some(button) => button.on_activate.clone(),
                None => return false,
            }
        };

        if let Some(handler) = handler {
            handler(self);
        }
        true
    }

    /// Descriptor for the rendering boundary.
    pub fn current(&self) -> DialogDescriptor {
        self.current.read().clone()
    }

    /// Whether a dialog is visible.
    pub fn is_visible(&self) -> bool {
        self.current.read().visible
    }
}
