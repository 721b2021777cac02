// Light/dark theme preference.
// Stored preference wins, then the system preference, then light.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::cache::{Store, THEME_KEY};
use crate::error::{FolioError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
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

    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    /// Icon for the toggle button: the theme it would switch to.
    pub fn icon(&self) -> &'static str {
        match self {
            Theme::Dark => "fas fa-sun",
            Theme::Light => "fas fa-moon",
        }
    }

    pub fn resolve(stored: Option<Theme>, system_prefers_dark: Option<bool>) -> Self {
        match (stored, system_prefers_dark) {
            (Some(theme), _) => theme,
            (None, Some(true)) => Theme::Dark,
            _ => Theme::Light,
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = FolioError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            other => Err(FolioError::Other(format!("unknown theme: {}", other))),
        }
    }
}

/// Theme preference persisted in the local store.
pub struct ThemePreference<'a> {
    store: &'a Store,
}

impl<'a> ThemePreference<'a> {
    pub fn new(store: &'a Store) -> Self {
        Self { store }
    }

    /// The stored theme, if any. An unreadable value counts as unset.
    pub fn stored(&self) -> Option<Theme> {
        match self.store.get::<Theme>(THEME_KEY) {
            Ok(theme) => theme,
            Err(e) => {
                tracing::warn!(error = %e, "ignoring unreadable theme preference");
                None
            }
        }
    }

    pub fn current(&self, system_prefers_dark: Option<bool>) -> Theme {
        Theme::resolve(self.stored(), system_prefers_dark)
    }

    pub fn set(&self, theme: Theme) -> Result<()> {
        self.store.set(THEME_KEY, &theme)
    }

    /// Flip the effective theme and persist the result.
    pub fn toggle(&self, system_prefers_dark: Option<bool>) -> Result<Theme> {
        let next = self.current(system_prefers_dark).toggled();
        self.set(next)?;
        Ok(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_resolve_order() {
        assert_eq!(Theme::resolve(Some(Theme::Light), Some(true)), Theme::Light);
        assert_eq!(Theme::resolve(None, Some(true)), Theme::Dark);
        assert_eq!(Theme::resolve(None, Some(false)), Theme::Light);
        assert_eq!(Theme::resolve(None, None), Theme::Light);
    }

    #[test]
    fn test_parse_and_icon() {
        assert_eq!("Dark".parse::<Theme>().unwrap(), Theme::Dark);
        assert!("sepia".parse::<Theme>().is_err());
        assert_eq!(Theme::Dark.icon(), "fas fa-sun");
        assert_eq!(Theme::Light.icon(), "fas fa-moon");
    }

    #[test]
    fn test_toggle_persists() {
        let temp_dir = TempDir::new().unwrap();
        let store = Store::new(temp_dir.path());
        let pref = ThemePreference::new(&store);

        assert_eq!(pref.stored(), None);
        assert_eq!(pref.toggle(Some(true)).unwrap(), Theme::Light);
        assert_eq!(pref.stored(), Some(Theme::Light));
        assert_eq!(pref.toggle(None).unwrap(), Theme::Dark);

        let raw: Option<String> = store.get(THEME_KEY).unwrap();
        assert_eq!(raw.as_deref(), Some("dark"));
    }
}
