//! Text substitution for user-facing labels.
//!
//! Only English ships today: [`FallbackTranslator`] returns the caller's default
//! text, or the key itself when no default is given.

/// Label keys used by notification renderers, with their English defaults.
pub mod keys {
    pub const TITLE: (&str, &str) = ("notifications.title", "Notifications");
    pub const EMPTY: (&str, &str) = ("notifications.empty", "No notifications yet");
    pub const MARK_ALL_READ: (&str, &str) = ("notifications.mark_all_read", "Mark all read");
    pub const VIEW_ALL: (&str, &str) = ("notifications.view_all", "View all notifications");
}

pub trait Translator: Send + Sync {
    fn t(&self, key: &str, default: &str) -> String;

    /// Convenience for the `(key, default)` pairs in [`keys`].
    fn label(&self, entry: (&str, &str)) -> String {
        self.t(entry.0, entry.1)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct FallbackTranslator;

impl Translator for FallbackTranslator {
    fn t(&self, key: &str, default: &str) -> String {
        if default.is_empty() {
            key.to_string()
        } else {
            default.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_wins_over_key() {
        assert_eq!(FallbackTranslator.t("notifications.empty", "No notifications yet"), "No notifications yet");
    }

    #[test]
    fn empty_default_returns_key() {
        assert_eq!(FallbackTranslator.t("notifications.unknown", ""), "notifications.unknown");
    }

    #[test]
    fn label_uses_key_table() {
        let translator = FallbackTranslator;
        assert_eq!(translator.label(keys::MARK_ALL_READ), "Mark all read");
    }
}
