use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DropdownCloseReason {
    OutsideClick,
    Escape,
    Toggle,
    ItemSelected,
}

/// Open/closed state of the notification list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DropdownState {
    open: bool,
}

impl DropdownState {
    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Returns `true` if the state changed.
    pub fn open(&mut self) -> bool {
        !std::mem::replace(&mut self.open, true)
    }

    /// Returns `true` if the state changed.
    pub fn close(&mut self) -> bool {
        std::mem::replace(&mut self.open, false)
    }
}
