//! Demo settings
//!
//! Read once at startup from the page (the canvas `data-settings` JSON and
//! `data-quality` preset attributes) and never written back.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::SimError;

/// Quality preset levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum QualityPreset {
    Low,
    #[default]
    Medium,
    High,
}

impl QualityPreset {
    pub fn as_str(&self) -> &'static str {
        match self {
            QualityPreset::Low => "Low",
            QualityPreset::Medium => "Medium",
            QualityPreset::High => "High",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "low" => Some(QualityPreset::Low),
            "medium" | "med" => Some(QualityPreset::Medium),
            "high" => Some(QualityPreset::High),
            _ => None,
        }
    }

    /// Triangle fan segments for circles and ellipses
    pub fn circle_segments(&self) -> u32 {
        match self {
            QualityPreset::Low => 16,
            QualityPreset::Medium => 32,
            QualityPreset::High => 64,
        }
    }

    /// Glow rings drawn around each light
    pub fn glow_rings(&self) -> u32 {
        match self {
            QualityPreset::Low => 0,
            QualityPreset::Medium => 3,
            QualityPreset::High => 3,
        }
    }
}

/// Which line the shadow's vertical distance is measured to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ShadowAnchor {
    /// Light height above the ground line
    #[default]
    Ground,
    /// Light height above the stick top (exact similar triangles)
    ObstacleTop,
}

/// Demo settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Graphics quality preset
    pub quality: QualityPreset,

    // === Pendulum scene initial state ===
    pub gravity: f32,
    pub time_scale: f32,
    pub show_trail: bool,
    pub trail_capacity: usize,
    pub show_forces: bool,

    // === Light scene ===
    pub shadow_anchor: ShadowAnchor,
    /// Shadow endpoint to POST geometry to (disabled when `None`)
    pub shadow_endpoint: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            quality: QualityPreset::Medium,

            gravity: GRAVITY,
            time_scale: TIME_SCALE,
            show_trail: true,
            trail_capacity: TRAIL_CAPACITY,
            show_forces: false,

            shadow_anchor: ShadowAnchor::Ground,
            shadow_endpoint: None,
        }
    }
}

impl Settings {
    /// Create settings from a quality preset
    pub fn from_preset(preset: QualityPreset) -> Self {
        Self {
            quality: preset,
            ..Self::default()
        }
    }

    /// Parse settings JSON; missing fields take defaults, values are clamped
    /// to their control ranges.
    pub fn from_json(json: &str) -> Result<Self, SimError> {
        let settings: Settings = serde_json::from_str(json)?;
        Ok(settings.clamped())
    }

    /// Clamp numeric fields to their control ranges
    pub fn clamped(mut self) -> Self {
        self.gravity = crate::clamp_to(self.gravity, &GRAVITY_RANGE);
        self.time_scale = crate::clamp_to(self.time_scale, &TIME_SCALE_RANGE);
        self.trail_capacity = crate::clamp_to(self.trail_capacity, &TRAIL_RANGE);
        self
    }

    /// Settings from the canvas attributes: `data-settings` JSON, then a
    /// `data-quality` preset name on top. Bad input falls back to defaults.
    pub fn from_attributes(json: Option<&str>, quality: Option<&str>) -> Self {
        let preset = quality.and_then(|q| {
            let preset = QualityPreset::from_str(q);
            if preset.is_none() {
                log::warn!("Ignoring unknown data-quality {:?}", q);
            }
            preset
        });

        let mut settings = match json.map(Self::from_json) {
            Some(Ok(settings)) => settings,
            Some(Err(e)) => {
                log::warn!("Ignoring data-settings: {}", e);
                Self::default()
            }
            None => Self::from_preset(preset.unwrap_or_default()),
        };
        if let Some(preset) = preset {
            settings.quality = preset;
        }
        log::info!("Loaded settings (quality {})", settings.quality.as_str());
        settings
    }

    /// Load settings from the canvas element (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load(canvas: &web_sys::Element) -> Self {
        Self::from_attributes(
            canvas.get_attribute("data-settings").as_deref(),
            canvas.get_attribute("data-quality").as_deref(),
        )
    }
}
