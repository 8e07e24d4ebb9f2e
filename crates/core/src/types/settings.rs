//! Site-wide display settings.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

/// Accent color used when the document carries no settings.
pub const DEFAULT_ACCENT_COLOR: &str = "#f0d0d3";

/// How the site picks its accent color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccentMode {
    /// Derived from the hero entry's thumbnail.
    Hero,
    /// Fixed color from [`GlobalSettings::custom_color`].
    #[default]
    Custom,
}

impl fmt::Display for AccentMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Hero => write!(f, "hero"),
            Self::Custom => write!(f, "custom"),
        }
    }
}

impl FromStr for AccentMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "hero" => Ok(Self::Hero),
            "custom" => Ok(Self::Custom),
            other => Err(format!("unknown accent mode '{other}' (expected hero or custom)")),
        }
    }
}

/// The "global" singleton of the document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GlobalSettings {
    pub accent_mode: AccentMode,
    pub custom_color: String,
}

impl Default for GlobalSettings {
    fn default() -> Self {
        Self {
            accent_mode: AccentMode::Custom,
            custom_color: DEFAULT_ACCENT_COLOR.to_string(),
        }
    }
}

impl GlobalSettings {
    /// Resolve the accent color the site should use.
    ///
    /// `hero_color` is the color extracted from the hero thumbnail, when one
    /// has been computed. Falls back to the custom color otherwise.
    #[must_use]
    pub fn main_accent<'a>(&'a self, hero_color: Option<&'a str>) -> &'a str {
        match (self.accent_mode, hero_color) {
            (AccentMode::Hero, Some(color)) => color,
            _ => &self.custom_color,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = GlobalSettings::default();
        assert_eq!(settings.accent_mode, AccentMode::Custom);
        assert_eq!(settings.custom_color, DEFAULT_ACCENT_COLOR);
    }

    #[test]
    fn test_main_accent_prefers_hero_only_in_hero_mode() {
        let mut settings = GlobalSettings {
            accent_mode: AccentMode::Hero,
            custom_color: "#112233".to_string(),
        };
        assert_eq!(settings.main_accent(Some("#abcdef")), "#abcdef");
        assert_eq!(settings.main_accent(None), "#112233");

        settings.accent_mode = AccentMode::Custom;
        assert_eq!(settings.main_accent(Some("#abcdef")), "#112233");
    }

    #[test]
    fn test_settings_wire_shape() {
        let json = r##"{ "accentMode": "hero", "customColor": "#000000" }"##;
        let settings: GlobalSettings = serde_json::from_str(json).expect("deserialize");
        assert_eq!(settings.accent_mode, AccentMode::Hero);

        let value = serde_json::to_value(&settings).expect("serialize");
        assert_eq!(value["accentMode"], "hero");
        assert_eq!(value["customColor"], "#000000");
    }

    #[test]
    fn test_accent_mode_parse() {
        assert_eq!("HERO".parse::<AccentMode>(), Ok(AccentMode::Hero));
        assert_eq!("custom".parse::<AccentMode>(), Ok(AccentMode::Custom));
        assert!("neon".parse::<AccentMode>().is_err());
    }
}
