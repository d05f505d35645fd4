// Template Renderer: ResumeDocument -> HTML preview.
// Pure: never mutates the document, never fails. Bad dates render as "".

pub mod handlers;
pub mod html;
pub mod templates;
pub mod view;

use serde::Serialize;

use crate::models::resume::{ResumeDocument, TemplateId};

pub use templates::PREVIEW_ELEMENT_ID;

#[derive(Debug, Clone, Serialize)]
pub struct RenderedResume {
    pub template: TemplateId,
    /// Id of the root element inside `html`.
    pub element_id: &'static str,
    pub html: String,
}

pub fn render_document(doc: &ResumeDocument, template: TemplateId) -> RenderedResume {
    let view = view::build_view(doc);
    RenderedResume {
        template,
        element_id: PREVIEW_ELEMENT_ID,
        html: templates::render_view(template, &view),
    }
}
