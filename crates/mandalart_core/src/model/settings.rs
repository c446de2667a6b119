//! Presentation settings record.
//!
//! # Responsibility
//! - Define the persisted `mandalartSettings` record and its defaults.
//! - Validate font size and color values before they are applied.
//!
//! # Invariants
//! - Settings never interact with grid content or the mirror rule.
//! - A `Settings` value returned by `apply` has passed `validate`.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub const DEFAULT_FONT_SIZE: u32 = 14;
pub const DEFAULT_BACKGROUND_COLOR: &str = "#0f172a";
pub const MIN_FONT_SIZE: u32 = 8;
pub const MAX_FONT_SIZE: u32 = 72;

static HEX_COLOR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^#(?:[0-9a-fA-F]{3}|[0-9a-fA-F]{6})$").expect("valid color regex"));

/// Settings validation error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingsError {
    FontSizeOutOfRange(u32),
    InvalidColor { field: &'static str, value: String },
}

impl Display for SettingsError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::FontSizeOutOfRange(size) => write!(
                f,
                "font size {size}px is outside {MIN_FONT_SIZE}..={MAX_FONT_SIZE}px"
            ),
            Self::InvalidColor { field, value } => {
                write!(f, "{field} must be a #rgb or #rrggbb color, got `{value}`")
            }
        }
    }
}

impl Error for SettingsError {}

/// Font size, background color and optional text color for the board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    /// Base font size in pixels.
    #[serde(default = "default_font_size", deserialize_with = "deserialize_font_size")]
    pub font_size: u32,
    /// Older records stored this as `bgColor`.
    #[serde(default = "default_background_color", alias = "bgColor")]
    pub background_color: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_color: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            font_size: DEFAULT_FONT_SIZE,
            background_color: DEFAULT_BACKGROUND_COLOR.to_string(),
            text_color: None,
        }
    }
}

/// Partial update applied through `Settings::apply`.
///
/// `text_color: Some(None)` clears the text color.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SettingsPatch {
    pub font_size: Option<u32>,
    pub background_color: Option<String>,
    pub text_color: Option<Option<String>>,
}

impl SettingsPatch {
    pub fn is_empty(&self) -> bool {
        self.font_size.is_none() && self.background_color.is_none() && self.text_color.is_none()
    }
}

impl Settings {
    pub fn validate(&self) -> Result<(), SettingsError> {
        if !(MIN_FONT_SIZE..=MAX_FONT_SIZE).contains(&self.font_size) {
            return Err(SettingsError::FontSizeOutOfRange(self.font_size));
        }
        validate_color("backgroundColor", &self.background_color)?;
        if let Some(color) = &self.text_color {
            validate_color("textColor", color)?;
        }
        Ok(())
    }

    /// Returns a validated copy with `patch` applied; `self` is untouched.
    pub fn apply(&self, patch: SettingsPatch) -> Result<Settings, SettingsError> {
        let mut next = self.clone();
        if let Some(size) = patch.font_size {
            next.font_size = size;
        }
        if let Some(color) = patch.background_color {
            next.background_color = color.trim().to_string();
        }
        if let Some(color) = patch.text_color {
            next.text_color = color.map(|value| value.trim().to_string());
        }
        next.validate()?;
        Ok(next)
    }
}

fn validate_color(field: &'static str, value: &str) -> Result<(), SettingsError> {
    if HEX_COLOR_RE.is_match(value) {
        Ok(())
    } else {
        Err(SettingsError::InvalidColor {
            field,
            value: value.to_string(),
        })
    }
}

fn default_font_size() -> u32 {
    DEFAULT_FONT_SIZE
}

fn default_background_color() -> String {
    DEFAULT_BACKGROUND_COLOR.to_string()
}

/// Accepts numbers and numeric strings; form inputs stored the size as text.
fn deserialize_font_size<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum FontSizeRepr {
        Number(f64),
        Text(String),
    }

    let raw = match FontSizeRepr::deserialize(deserializer)? {
        FontSizeRepr::Number(value) => value,
        FontSizeRepr::Text(text) => text.trim().parse::<f64>().map_err(|_| {
            serde::de::Error::custom(format!("fontSize `{text}` is not a number"))
        })?,
    };
    if !raw.is_finite() || raw < 0.0 || raw > f64::from(u32::MAX) {
        return Err(serde::de::Error::custom(format!(
            "fontSize {raw} is not a valid pixel size"
        )));
    }
    Ok(raw.round() as u32)
}
