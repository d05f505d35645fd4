//! PDF export.
//!
//! Rasterization happens outside this service; the core only derives the
//! filename, fixes the page options and guarantees one export at a time per
//! session (see `ResumeSession::export`).

pub mod handlers;
pub mod render_service;

use async_trait::async_trait;
use bytes::Bytes;
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

use crate::models::resume::PersonalInfo;
use crate::render::RenderedResume;

pub use render_service::RenderServiceExporter;

const DEFAULT_FILE_STEM: &str = "resume";

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("render target '{0}' is empty")]
    MissingTarget(&'static str),

    #[error("PDF rasterization failed: {0}")]
    Rasterize(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PageFormat {
    Letter,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    Portrait,
}

/// Page and rasterization settings sent along with the HTML.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportOptions {
    /// Top, right, bottom, left, in inches.
    pub margin_in: [f32; 4],
    pub image_type: &'static str,
    pub image_quality: f32,
    pub canvas_scale: u8,
    pub format: PageFormat,
    pub orientation: Orientation,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            margin_in: [0.5; 4],
            image_type: "jpeg",
            image_quality: 0.98,
            canvas_scale: 2,
            format: PageFormat::Letter,
            orientation: Orientation::Portrait,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ExportArtifact {
    pub filename: String,
    pub content: Bytes,
    /// Object key of the archived copy, when one was kept.
    pub archive_key: Option<String>,
}

#[async_trait]
pub trait Exporter: Send + Sync {
    async fn export(
        &self,
        user_id: Uuid,
        target: &RenderedResume,
        filename: &str,
        options: &ExportOptions,
    ) -> Result<ExportArtifact, ExportError>;
}

/// `"<full name>.pdf"`, or `"resume.pdf"` when the name is blank.
/// Path separators are replaced so the name is always a single segment.
pub fn export_filename(info: &PersonalInfo) -> String {
    let stem: String = info
        .full_name
        .trim()
        .chars()
        .map(|c| if matches!(c, '/' | '\\') { '_' } else { c })
        .collect();
    if stem.is_empty() {
        format!("{DEFAULT_FILE_STEM}.pdf")
    } else {
        format!("{stem}.pdf")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn named(name: &str) -> PersonalInfo {
        PersonalInfo {
            full_name: name.into(),
            ..PersonalInfo::default()
        }
    }

    #[test]
    fn test_filename_from_full_name() {
        assert_eq!(export_filename(&named("Ada Lovelace")), "Ada Lovelace.pdf");
        assert_eq!(export_filename(&named("  Ada  ")), "Ada.pdf");
    }

    #[test]
    fn test_blank_name_falls_back() {
        assert_eq!(export_filename(&named("")), "resume.pdf");
        assert_eq!(export_filename(&named("   ")), "resume.pdf");
    }

    #[test]
    fn test_path_separators_replaced() {
        assert_eq!(export_filename(&named("a/b\\c")), "a_b_c.pdf");
    }

    #[test]
    fn test_default_options() {
        let options = ExportOptions::default();
        assert_eq!(options.margin_in, [0.5, 0.5, 0.5, 0.5]);
        assert_eq!(options.canvas_scale, 2);
        let json = serde_json::to_value(&options).unwrap();
        assert_eq!(json["format"], "letter");
        assert_eq!(json["orientation"], "portrait");
    }
}
