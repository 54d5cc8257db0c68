//! Light/dark theme preference and the palettes both renderers draw with

use std::fmt;
use std::str::FromStr;

use crate::error::{AppError, ValidationError};
use crate::storage::{KeyValueStore, THEME_KEY};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Theme {
    Light,
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn palette(self) -> Palette {
        match self {
            Theme::Light => Palette {
                background: "#ffffff",
                text: "#111827",
                muted: "#e5e7eb",
                pass: "#10b981",
                fail: "#ef4444",
                tooltip: "#ffffff",
            },
            Theme::Dark => Palette {
                background: "#0b1020",
                text: "#e5e7eb",
                muted: "#374151",
                pass: "#10b981",
                fail: "#ef4444",
                tooltip: "#1f2937",
            },
        }
    }

    /// Guess the terminal's preference from `COLORFGBG` ("fg;bg")
    pub fn from_terminal_hint(colorfgbg: Option<&str>) -> Self {
        let background = colorfgbg
            .and_then(|value| value.rsplit(';').next())
            .and_then(|bg| bg.trim().parse::<u8>().ok());
        match background {
            // 0-6 and 8 are the dark ANSI backgrounds
            Some(bg) if bg <= 6 || bg == 8 => Theme::Dark,
            Some(_) => Theme::Light,
            None => Theme::Dark,
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            other => Err(ValidationError::InvalidTheme(other.to_string())),
        }
    }
}

/// Hex colors used by the SVG serializer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub background: &'static str,
    pub text: &'static str,
    pub muted: &'static str,
    pub pass: &'static str,
    pub fail: &'static str,
    pub tooltip: &'static str,
}

/// Current theme backed by the durable store
pub struct ThemeState<S: KeyValueStore> {
    store: S,
    theme: Theme,
}

impl<S: KeyValueStore> ThemeState<S> {
    /// Saved preference, else `system_default`
    pub fn load(store: S, system_default: Theme) -> Self {
        let saved = store
            .get(THEME_KEY)
            .ok()
            .flatten()
            .and_then(|value| value.parse::<Theme>().ok());
        ThemeState {
            store,
            theme: saved.unwrap_or(system_default),
        }
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn set(&mut self, theme: Theme) -> Result<(), AppError> {
        self.theme = theme;
        self.store.set(THEME_KEY, theme.as_str())?;
        tracing::debug!(theme = %theme, "Theme saved");
        Ok(())
    }

    pub fn toggle(&mut self) -> Result<Theme, AppError> {
        let next = self.theme.toggled();
        self.set(next)?;
        Ok(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    #[test]
    fn test_default_comes_from_system_when_unset() {
        let store = MemoryStore::new();
        assert_eq!(ThemeState::load(&store, Theme::Light).theme(), Theme::Light);
        assert_eq!(ThemeState::load(&store, Theme::Dark).theme(), Theme::Dark);
    }

    #[test]
    fn test_toggle_persists() {
        let store = MemoryStore::new();
        let mut state = ThemeState::load(&store, Theme::Light);
        assert_eq!(state.toggle().unwrap(), Theme::Dark);
        assert_eq!(store.get(THEME_KEY).unwrap().as_deref(), Some("dark"));

        let reloaded = ThemeState::load(&store, Theme::Light);
        assert_eq!(reloaded.theme(), Theme::Dark);
    }

    #[test]
    fn test_invalid_saved_value_falls_back() {
        let store = MemoryStore::new();
        store.set(THEME_KEY, "sepia").unwrap();
        assert_eq!(ThemeState::load(&store, Theme::Light).theme(), Theme::Light);
    }

    #[test]
    fn test_terminal_hint() {
        assert_eq!(Theme::from_terminal_hint(Some("15;0")), Theme::Dark);
        assert_eq!(Theme::from_terminal_hint(Some("0;15")), Theme::Light);
        assert_eq!(Theme::from_terminal_hint(Some("0;default;7")), Theme::Light);
        assert_eq!(Theme::from_terminal_hint(None), Theme::Dark);
    }

    #[test]
    fn test_parse() {
        assert_eq!(" Dark ".parse::<Theme>().unwrap(), Theme::Dark);
        assert!("blue".parse::<Theme>().is_err());
    }
}
