use crate::config::StorageKeys;

pub const LIGHT_THEME_CLASS: &str = "light-theme";
pub const NATIVE_CURSOR_CLASS: &str = "native-cursor";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Theme {
    Dark,
    Light,
}

impl Theme {
    /// Dark is the default and is stored as an absent key.
    pub fn stored_value(self) -> Option<&'static str> {
        match self {
            Self::Dark => None,
            Self::Light => Some("light"),
        }
    }

    /// Only an explicit `"light"` opts out of the dark default.
    pub fn from_stored(value: Option<&str>) -> Self {
        match value {
            Some("light") => Self::Light,
            _ => Self::Dark,
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Self::Dark => Self::Light,
            Self::Light => Self::Dark,
        }
    }

    pub fn body_class_present(self) -> bool {
        matches!(self, Self::Light)
    }

    pub fn icon_display(self) -> IconDisplay {
        match self {
            Self::Dark => IconDisplay {
                sun: "block",
                moon: "none",
            },
            Self::Light => IconDisplay {
                sun: "none",
                moon: "block",
            },
        }
    }
}

/// CSS `display` values for the two theme icons.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct IconDisplay {
    pub sun: &'static str,
    pub moon: &'static str,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CursorStyle {
    Custom,
    Native,
}

impl CursorStyle {
    /// The custom cursor is the default and is stored as an absent key.
    pub fn stored_value(self) -> Option<&'static str> {
        match self {
            Self::Custom => None,
            Self::Native => Some("true"),
        }
    }

    pub fn from_stored(value: Option<&str>) -> Self {
        match value {
            Some("true") => Self::Native,
            _ => Self::Custom,
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Self::Custom => Self::Native,
            Self::Native => Self::Custom,
        }
    }

    pub fn body_class_present(self) -> bool {
        matches!(self, Self::Native)
    }
}

pub trait PreferenceStore {
    fn read(&self, key: &str) -> Option<String>;
    fn write(&self, key: &str, value: &str);
    fn remove(&self, key: &str);
}

pub struct Preferences<S> {
    store: S,
    keys: StorageKeys,
}

impl<S: PreferenceStore> Preferences<S> {
    pub fn new(store: S, keys: StorageKeys) -> Self {
        Self { store, keys }
    }

    pub fn theme(&self) -> Theme {
        Theme::from_stored(self.store.read(&self.keys.theme).as_deref())
    }

    pub fn set_theme(&self, theme: Theme) {
        self.persist(&self.keys.theme, theme.stored_value());
    }

    pub fn cursor_style(&self) -> CursorStyle {
        CursorStyle::from_stored(self.store.read(&self.keys.native_cursor).as_deref())
    }

    pub fn set_cursor_style(&self, style: CursorStyle) {
        self.persist(&self.keys.native_cursor, style.stored_value());
    }

    fn persist(&self, key: &str, value: Option<&str>) {
        match value {
            Some(value) => self.store.write(key, value),
            None => self.store.remove(key),
        }
    }
}
