use merge_logging::merge_warn;
use merger_core::{Msg, Theme};
use merger_engine::{HistoryStore, ThemeStore};

const THEME_DARK: &str = "dark";
const THEME_LIGHT: &str = "light";

pub(crate) fn theme_value(theme: Theme) -> &'static str {
    match theme {
        Theme::Dark => THEME_DARK,
        Theme::Light => THEME_LIGHT,
    }
}

fn theme_from_value(value: &str) -> Option<Theme> {
    match value {
        THEME_DARK => Some(Theme::Dark),
        THEME_LIGHT => Some(Theme::Light),
        _ => None,
    }
}

/// Messages to replay at startup from persisted state: the theme flag and
/// the name-only history snapshot, in that order.
pub(crate) fn startup_messages(history: &HistoryStore, theme: &ThemeStore) -> Vec<Msg> {
    let mut messages = Vec::new();

    if let Some(value) = theme.load() {
        match theme_from_value(&value) {
            Some(theme) => messages.push(Msg::ThemeLoaded(theme)),
            None => merge_warn!("Ignoring unknown persisted theme {:?}", value),
        }
    }

    let names = history.load();
    if !names.is_empty() {
        messages.push(Msg::HistoryRestored(names));
    }

    messages
}
