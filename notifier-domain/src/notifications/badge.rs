use serde::{Deserialize, Serialize};

/// Counts above this are shown as "99+".
pub const BADGE_OVERFLOW_THRESHOLD: u32 = 99;

/// What the unread badge on the bell displays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BadgeState {
    Hidden,
    Count(u32),
    Overflow,
}

impl BadgeState {
    pub fn from_count(count: u32) -> Self {
        match count {
            0 => BadgeState::Hidden,
            n if n > BADGE_OVERFLOW_THRESHOLD => BadgeState::Overflow,
            n => BadgeState::Count(n),
        }
    }

    pub fn label(&self) -> Option<String> {
        match self {
            BadgeState::Hidden => None,
            BadgeState::Count(n) => Some(n.to_string()),
            BadgeState::Overflow => Some(format!("{}+", BADGE_OVERFLOW_THRESHOLD)),
        }
    }

    pub fn is_visible(&self) -> bool {
        !matches!(self, BadgeState::Hidden)
    }
}

impl Default for BadgeState {
    fn default() -> Self {
        BadgeState::Hidden
    }
}
