//! # Image Export
//!
//! The crate does not draw pixels itself. A host-provided [`Rasterizer`]
//! captures the canvas according to an [`ImageExportRequest`]; the
//! exporter names the file and makes sure only one capture runs at a time.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::ExportError;
use crate::json::file_name;
use crate::options::{ImageFormat, ImageOptions};

/// Everything a rasterizer needs to capture the visible canvas.
#[derive(Clone, Debug, PartialEq)]
pub struct ImageExportRequest {
    pub target_selector: String,
    pub fallback_selector: String,
    pub excluded_classes: Vec<String>,
    pub pixel_ratio: f32,
    pub background: String,
    pub format: ImageFormat,
}

impl ImageExportRequest {
    pub fn from_options(options: &ImageOptions) -> Self {
        Self {
            target_selector: options.target_selector.clone(),
            fallback_selector: options.fallback_selector.clone(),
            excluded_classes: options.excluded_classes.clone(),
            pixel_ratio: options.pixel_ratio,
            background: options.background.clone(),
            format: options.format,
        }
    }

    /// True when an element with these classes must be left out of the image.
    pub fn excludes<'c>(&self, classes: impl IntoIterator<Item = &'c str>) -> bool {
        classes
            .into_iter()
            .any(|class| self.excluded_classes.iter().any(|ex| ex == class))
    }
}

#[async_trait]
pub trait Rasterizer: Send + Sync {
    /// Returns the encoded image in `request.format`.
    async fn rasterize(&self, request: &ImageExportRequest) -> Result<Vec<u8>, ExportError>;
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImageDocument {
    pub file_name: String,
    pub mime: &'static str,
    pub bytes: Vec<u8>,
}

/// Clears the in-progress flag on every exit path.
struct InProgress<'a>(&'a AtomicBool);

impl Drop for InProgress<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

pub struct ImageExporter {
    rasterizer: Arc<dyn Rasterizer>,
    options: ImageOptions,
    file_base: String,
    in_progress: AtomicBool,
}

impl ImageExporter {
    pub fn new(rasterizer: Arc<dyn Rasterizer>, options: ImageOptions, file_base: impl Into<String>) -> Self {
        Self {
            rasterizer,
            options,
            file_base: file_base.into(),
            in_progress: AtomicBool::new(false),
        }
    }

    pub fn is_exporting(&self) -> bool {
        self.in_progress.load(Ordering::SeqCst)
    }

    pub async fn export(&self) -> Result<ImageDocument, ExportError> {
        self.export_at(Utc::now()).await
    }

    /// Fails with [`ExportError::Busy`] while another capture is running.
    pub async fn export_at(&self, now: DateTime<Utc>) -> Result<ImageDocument, ExportError> {
        if self.in_progress.swap(true, Ordering::SeqCst) {
            tracing::warn!("Image export requested while another is running");
            return Err(ExportError::Busy);
        }
        let _guard = InProgress(&self.in_progress);

        let request = ImageExportRequest::from_options(&self.options);
        let bytes = self
            .rasterizer
            .rasterize(&request)
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Image export failed"))?;

        let file_name = file_name(&self.file_base, now, request.format.extension());
        tracing::info!(file = %file_name, size = bytes.len(), "Exported image");
        Ok(ImageDocument {
            file_name,
            mime: request.format.mime(),
            bytes,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overlays_are_excluded() {
        let request = ImageExportRequest::from_options(&ImageOptions::default());
        assert!(request.excludes(["react-flow__minimap"]));
        assert!(request.excludes(["panel", "react-flow__controls"]));
        assert!(!request.excludes(["react-flow__node"]));
        assert_eq!(request.pixel_ratio, 2.0);
        assert_eq!(request.background, "#f8fafc");
    }
}
