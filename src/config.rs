// src/config.rs

//! Configuration for the web frame.
//!
//! The structs deserialize from JSON (for example a `<script type="application/json">`
//! block on the hosting page) and fall back to defaults section by section.

use anyhow::{Context, Result};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Process-wide default configuration. Read-only.
pub static CONFIG: Lazy<FrameConfig> = Lazy::new(FrameConfig::default);

/// Root configuration for a [`crate::Frame`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct FrameConfig {
    pub window: WindowConfig,
    pub canvas: CanvasConfig,
    pub surface: SurfaceOptions,
    pub assets: AssetConfig,
    pub logging: LoggingConfig,
}

impl FrameConfig {
    /// Parses a JSON document; missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("Failed to parse frame configuration")
    }
}

// --- Window ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    /// Document title.
    pub title: String,
    /// Requested window width. 0 leaves the browser's size alone.
    pub width: f64,
    pub height: f64,
}

impl Default for WindowConfig {
    fn default() -> Self {
        WindowConfig {
            title: "Castella".to_string(),
            width: 0.0,
            height: 0.0,
        }
    }
}

// --- Canvas / surface ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasConfig {
    /// DOM id of the full-viewport canvas the surface binds to.
    pub id: String,
    pub color_space: ColorSpace,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        CanvasConfig {
            id: "castella-app".to_string(),
            color_space: ColorSpace::Srgb,
        }
    }
}

/// Color space constant passed to the backend's surface factory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ColorSpace {
    #[default]
    Srgb,
    DisplayP3,
    AdobeRgb,
}

impl ColorSpace {
    /// Name of the constant on the backend's `ColorSpace` object.
    pub fn backend_name(self) -> &'static str {
        match self {
            ColorSpace::Srgb => "SRGB",
            ColorSpace::DisplayP3 => "DISPLAY_P3",
            ColorSpace::AdobeRgb => "ADOBE_RGB",
        }
    }
}

/// WebGL surface options.
///
/// Only `preserve_drawing_buffer` is enabled by default; it keeps buffer
/// contents across frames so partial repaints and readback work.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SurfaceOptions {
    pub preserve_drawing_buffer: bool,
    pub explicit_swap_control: bool,
    pub render_via_offscreen_back_buffer: bool,
}

impl Default for SurfaceOptions {
    fn default() -> Self {
        SurfaceOptions {
            preserve_drawing_buffer: true,
            explicit_swap_control: false,
            render_via_offscreen_back_buffer: false,
        }
    }
}

impl SurfaceOptions {
    /// The configuration map handed to the surface factory. Disabled options
    /// are left out.
    pub fn to_js_options(&self) -> Map<String, Value> {
        let mut options = Map::new();
        let flags = [
            ("preserveDrawingBuffer", self.preserve_drawing_buffer),
            ("explicitSwapControl", self.explicit_swap_control),
            ("renderViaOffscreenBackBuffer", self.render_via_offscreen_back_buffer),
        ];
        for (name, enabled) in flags {
            if enabled {
                options.insert(name.to_string(), Value::from(1));
            }
        }
        options
    }
}

// --- Assets ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetConfig {
    /// Font loaded in parallel with the drawing backend.
    pub font_url: String,
    /// Directory the backend's `.wasm` file is served from. `None` lets the
    /// backend loader resolve it next to its script.
    pub backend_wasm_dir: Option<String>,
}

impl Default for AssetConfig {
    fn default() -> Self {
        AssetConfig {
            font_url: "https://storage.googleapis.com/skia-cdn/misc/Roboto-Regular.ttf".to_string(),
            backend_wasm_dir: None,
        }
    }
}

// --- Logging ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `env_logger`-style filter, e.g. `"info"` or `"castella_web=debug"`.
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            filter: "info".to_string(),
        }
    }
}
