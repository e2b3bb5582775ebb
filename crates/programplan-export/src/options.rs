//! # Configuration
//!
//! Knobs shared by every export target.

use plan_canvas::palette::Locale;
use serde::{Deserialize, Serialize};

/// Export settings. Serializable so hosts can keep them in their own config.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportOptions {
    /// Language of headings and type names. Default: Chinese.
    pub locale: Locale,
    /// Nodes whose `y` differs by less than this share a wireframe row. Default: 30.0.
    pub row_threshold: f64,
    /// Outer width of a node sketch in chars. Default: 40.
    pub box_width: usize,
    /// Indentation per hierarchy level in chars. Default: 4.
    pub indent: usize,
    /// File name stem for downloads. Default: `program-plan`.
    pub file_base: String,
    #[serde(default)]
    pub image: ImageOptions,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            locale: Locale::Zh,
            row_threshold: 30.0,
            box_width: 40,
            indent: 4,
            file_base: "program-plan".to_string(),
            image: ImageOptions::default(),
        }
    }
}

/// What part of the canvas is rasterized and how.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageOptions {
    /// Element captured for the image.
    pub target_selector: String,
    /// Used when the target element is absent.
    pub fallback_selector: String,
    /// Elements carrying any of these classes are left out of the capture.
    pub excluded_classes: Vec<String>,
    /// Supersampling factor. Default: 2.
    pub pixel_ratio: f32,
    /// Fill behind transparent regions. Default: `#f8fafc`.
    pub background: String,
    pub format: ImageFormat,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    #[default]
    Png,
    Svg,
}

impl ImageFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ImageFormat::Png => "png",
            ImageFormat::Svg => "svg",
        }
    }

    pub fn mime(self) -> &'static str {
        match self {
            ImageFormat::Png => "image/png",
            ImageFormat::Svg => "image/svg+xml",
        }
    }
}

impl Default for ImageOptions {
    fn default() -> Self {
        Self {
            target_selector: ".react-flow__viewport".to_string(),
            fallback_selector: ".react-flow".to_string(),
            excluded_classes: vec![
                "react-flow__controls".to_string(),
                "react-flow__minimap".to_string(),
                "react-flow__panel".to_string(),
            ],
            pixel_ratio: 2.0,
            background: "#f8fafc".to_string(),
            format: ImageFormat::Png,
        }
    }
}
