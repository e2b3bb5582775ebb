//! # ProgramPlan Export
//!
//! Output targets for a program plan: a JSON backup, a PNG capture of the
//! canvas through a host rasterizer, and a self-contained markdown document.

pub mod error;
pub mod image;
pub mod json;
pub mod markdown;
pub mod options;

pub use error::ExportError;
pub use image::{ImageDocument, ImageExportRequest, ImageExporter, Rasterizer};
pub use json::{JsonDocument, export_json, export_json_at, file_name};
pub use markdown::{MarkdownDocument, MarkdownExporter};
pub use options::{ExportOptions, ImageFormat, ImageOptions};
