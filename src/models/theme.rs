use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::models::storage::{StorageManager, THEME_KEY};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    /// Only the exact persisted spellings are accepted
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "light" => Some(Theme::Light),
            "dark" => Some(Theme::Dark),
            _ => None,
        }
    }

    pub fn toggled(&self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            Theme::Light => "☀",
            Theme::Dark => "☾",
        }
    }
}

/// Terminal stand-in for the OS colour-scheme preference.
///
/// An explicit override wins. Otherwise `COLORFGBG` ("fg;bg") is consulted,
/// where backgrounds 0-6 and 8 are the dark palette entries. Without either
/// signal the preference is light.
pub fn system_prefers_dark(system_override: Option<Theme>) -> bool {
    if let Some(theme) = system_override {
        return theme == Theme::Dark;
    }

    std::env::var("COLORFGBG")
        .ok()
        .as_deref()
        .and_then(background_from_colorfgbg)
        .is_some_and(background_is_dark)
}

fn background_is_dark(bg: u8) -> bool {
    matches!(bg, 0..=6 | 8)
}

fn background_from_colorfgbg(value: &str) -> Option<u8> {
    value.rsplit(';').next()?.trim().parse().ok()
}

/// Current theme plus write-through persistence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThemeState {
    theme: Theme,
}

impl ThemeState {
    /// Persisted choice first, then the system preference. The resolved
    /// theme is written back so later starts see the same value.
    pub fn resolve(storage: &mut StorageManager, system_prefers_dark: bool) -> Self {
        let stored = storage.get(THEME_KEY);
        let theme = stored
            .as_deref()
            .and_then(Theme::parse)
            .unwrap_or(if system_prefers_dark {
                Theme::Dark
            } else {
                Theme::Light
            });

        if stored.as_deref() != Some(theme.as_str()) {
            if let Err(e) = storage.set(THEME_KEY, theme.as_str()) {
                log::warn!("Failed to persist theme: {:#}", e);
            }
        }

        Self { theme }
    }

    pub fn current(&self) -> Theme {
        self.theme
    }

    pub fn set(&mut self, storage: &mut StorageManager, theme: Theme) -> Result<()> {
        self.theme = theme;
        storage.set(THEME_KEY, theme.as_str())
    }

    pub fn toggle(&mut self, storage: &mut StorageManager) -> Result<Theme> {
        let next = self.theme.toggled();
        self.set(storage, next)?;
        Ok(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn persisted_choice_wins() {
        let mut storage = StorageManager::in_memory();
        storage.set(THEME_KEY, "light").unwrap();
        assert_eq!(ThemeState::resolve(&mut storage, true).current(), Theme::Light);
    }

    #[test]
    fn invalid_persisted_value_falls_back_to_system() {
        let mut storage = StorageManager::in_memory();
        storage.set(THEME_KEY, "Dark").unwrap();
        assert_eq!(ThemeState::resolve(&mut storage, false).current(), Theme::Light);

        storage.set(THEME_KEY, "Dark").unwrap();
        assert_eq!(ThemeState::resolve(&mut storage, true).current(), Theme::Dark);
    }

    #[test]
    fn resolved_theme_is_persisted() {
        let mut storage = StorageManager::in_memory();
        ThemeState::resolve(&mut storage, true);
        assert_eq!(storage.get(THEME_KEY).as_deref(), Some("dark"));

        // The stored value now wins over a changed system preference
        assert_eq!(ThemeState::resolve(&mut storage, false).current(), Theme::Dark);
    }

    #[test]
    fn toggle_is_a_two_cycle_and_writes_through() {
        let mut storage = StorageManager::in_memory();
        for start in [Theme::Light, Theme::Dark] {
            let mut state = ThemeState::resolve(&mut storage, false);
            state.set(&mut storage, start).unwrap();

            state.toggle(&mut storage).unwrap();
            assert_eq!(state.current(), start.toggled());
            assert_eq!(storage.get(THEME_KEY).as_deref(), Some(start.toggled().as_str()));

            state.toggle(&mut storage).unwrap();
            assert_eq!(state.current(), start);
            assert_eq!(storage.get(THEME_KEY).as_deref(), Some(start.as_str()));
        }
    }

    #[test]
    fn colorfgbg_background_parsing() {
        assert_eq!(background_from_colorfgbg("15;0"), Some(0));
        assert_eq!(background_from_colorfgbg("0;default;15"), Some(15));
        assert_eq!(background_from_colorfgbg("garbage"), None);
    }

    #[test]
    fn dark_backgrounds_are_the_low_palette_entries() {
        for bg in [0, 1, 4, 6, 8] {
            assert!(background_is_dark(bg), "{bg}");
        }
        for bg in [7, 9, 12, 14, 15] {
            assert!(!background_is_dark(bg), "{bg}");
        }
    }

    #[test]
    fn override_decides_system_preference() {
        assert!(system_prefers_dark(Some(Theme::Dark)));
        assert!(!system_prefers_dark(Some(Theme::Light)));
    }
}
