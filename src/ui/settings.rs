use serde::{Deserialize, Serialize};
use egui::Color32;
use std::collections::HashMap;

use crate::engine::engine::DEFAULT_DEBOUNCE_MS;
use crate::engine::voice::Language;

pub const DEFAULT_AUTOSUBMIT_MS: u64 = 2000;

/// Colour slots the screens paint with.
pub const COLOR_KEYS: [&str; 7] = [
    "Background",
    "Panel",
    "Text",
    "Accent",
    "Current",
    "Winner",
    "Board",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Theme {
    Dark,
    Light,
    PubGreen,
}

impl Theme {
    pub const ALL: [Theme; 3] = [Theme::Dark, Theme::Light, Theme::PubGreen];

    pub fn label(&self) -> &'static str {
        match self {
            Theme::Dark => "Dark",
            Theme::Light => "Light",
            Theme::PubGreen => "Pub green",
        }
    }

    fn colors(&self) -> [(&'static str, [u8; 4]); 7] {
        match self {
            Theme::Dark => [
                ("Background", [24, 24, 28, 255]),
                ("Panel", [36, 36, 42, 255]),
                ("Text", [230, 230, 230, 255]),
                ("Accent", [200, 60, 50, 255]),
                ("Current", [40, 70, 120, 255]),
                ("Winner", [200, 160, 40, 255]),
                ("Board", [20, 20, 20, 255]),
            ],
            Theme::Light => [
                ("Background", [245, 245, 240, 255]),
                ("Panel", [228, 228, 222, 255]),
                ("Text", [30, 30, 30, 255]),
                ("Accent", [190, 40, 40, 255]),
                ("Current", [150, 190, 235, 255]),
                ("Winner", [240, 200, 80, 255]),
                ("Board", [40, 40, 40, 255]),
            ],
            Theme::PubGreen => [
                ("Background", [16, 40, 28, 255]),
                ("Panel", [24, 56, 38, 255]),
                ("Text", [235, 230, 210, 255]),
                ("Accent", [210, 50, 40, 255]),
                ("Current", [40, 90, 60, 255]),
                ("Winner", [220, 180, 60, 255]),
                ("Board", [15, 15, 15, 255]),
            ],
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct AppSettings {
    pub ui_scale: f32,
    pub dark_mode: bool,

    // Slot → color mapping (extensible)
    pub colors: HashMap<String, [u8; 4]>,

    pub debounce_ms: u64,
    pub voice_language: Language,
    pub voice_autosubmit_ms: u64,

    pub default_start_score: u16,
    pub default_double_out: bool,
}

impl Default for AppSettings {
    fn default() -> Self {
        let mut settings = Self {
            ui_scale: 1.0,
            dark_mode: true,
            colors: HashMap::new(),
            debounce_ms: DEFAULT_DEBOUNCE_MS,
            voice_language: Language::default(),
            voice_autosubmit_ms: DEFAULT_AUTOSUBMIT_MS,
            default_start_score: 501,
            default_double_out: true,
        };
        settings.apply_theme(Theme::Dark);
        settings
    }
}

impl AppSettings {
    pub fn color(&self, key: &str) -> Color32 {
        self.colors
            .get(key)
            .map(|c| Color32::from_rgba_unmultiplied(c[0], c[1], c[2], c[3]))
            .unwrap_or(Color32::WHITE)
    }

    pub fn set_color(&mut self, key: &str, color: Color32) {
        self.colors.insert(
            key.to_string(),
            [color.r(), color.g(), color.b(), color.a()],
        );
    }

    pub fn apply_theme(&mut self, theme: Theme) {
        for (key, rgba) in theme.colors() {
            self.colors.insert(key.to_string(), rgba);
        }
        self.dark_mode = theme != Theme::Light;
    }

    /// Clamps values a hand-edited settings file may have broken.
    pub fn sanitized(mut self) -> Self {
        if !self.ui_scale.is_finite() {
            self.ui_scale = 1.0;
        }
        self.ui_scale = self.ui_scale.clamp(0.75, 2.0);
        self.debounce_ms = self.debounce_ms.min(2000);
        self.voice_autosubmit_ms = self.voice_autosubmit_ms.clamp(500, 10_000);
        if !(101..=1001).contains(&self.default_start_score) {
            self.default_start_score = 501;
        }
        self
    }
}
