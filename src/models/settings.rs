use serde::{Deserialize, Serialize};

use crate::i18n::Language;

pub const ENGLISH_FONTS: [&str; 5] = ["Roboto", "Montserrat", "Source Sans 3", "Merriweather", "Ubuntu"];
pub const BENGALI_FONTS: [&str; 5] = [
    "Hind Siliguri",
    "Noto Sans Bengali",
    "Noto Serif Bengali",
    "Anek Bangla",
    "Atma",
];

pub const MIN_FONT_SIZE: f64 = 1.1;
pub const MAX_FONT_SIZE: f64 = 3.1;
pub const FONT_SIZE_STEP: f64 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
}

/// Reader settings. Field names on the wire match the browser-era records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    pub theme: Theme,
    pub language: Language,
    pub en_font: String,
    pub bn_font: String,
    /// Body text scale in rem.
    pub font_size: f64,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            theme: Theme::Dark,
            language: Language::Bn,
            en_font: "Roboto".to_string(),
            bn_font: "Hind Siliguri".to_string(),
            font_size: 1.2,
        }
    }
}

impl Settings {
    pub fn toggle_theme(&mut self) {
        self.theme = match self.theme {
            Theme::Dark => Theme::Light,
            Theme::Light => Theme::Dark,
        };
    }

    pub fn fonts_for(lang: Language) -> &'static [&'static str] {
        match lang {
            Language::En => &ENGLISH_FONTS,
            Language::Bn => &BENGALI_FONTS,
        }
    }

    /// Font family for the active UI language.
    pub fn active_font(&self) -> &str {
        match self.language {
            Language::En => &self.en_font,
            Language::Bn => &self.bn_font,
        }
    }

    /// Choose the font for the active language. Fonts outside that
    /// language's list are refused.
    pub fn set_font(&mut self, font: &str) -> bool {
        if !Self::fonts_for(self.language).contains(&font) {
            return false;
        }
        match self.language {
            Language::En => self.en_font = font.to_string(),
            Language::Bn => self.bn_font = font.to_string(),
        }
        true
    }

    /// Step the reading scale, rounded to one decimal and kept in
    /// [MIN_FONT_SIZE, MAX_FONT_SIZE].
    pub fn adjust_font_size(&mut self, delta: f64) {
        let next = ((self.font_size + delta) * 10.0).round() / 10.0;
        self.font_size = next.clamp(MIN_FONT_SIZE, MAX_FONT_SIZE);
    }

    /// Pull values from an untrusted record back into range: the font scale
    /// is clamped and unknown fonts fall back to the defaults.
    pub fn sanitized(mut self) -> Self {
        let defaults = Settings::default();
        if !self.font_size.is_finite() {
            self.font_size = defaults.font_size;
        }
        self.font_size = self.font_size.clamp(MIN_FONT_SIZE, MAX_FONT_SIZE);
        if !ENGLISH_FONTS.contains(&self.en_font.as_str()) {
            self.en_font = defaults.en_font;
        }
        if !BENGALI_FONTS.contains(&self.bn_font.as_str()) {
            self.bn_font = defaults.bn_font;
        }
        self
    }

    pub fn font_size_label(&self) -> String {
        format!("{:.1}", self.font_size)
    }
}
