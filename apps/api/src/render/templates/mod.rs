//! The five layouts. Each is a pure function from `ResumeView` to an HTML
//! fragment rooted at the preview container.

mod creative;
mod executive;
mod minimal;
mod modern;
mod professional;

use crate::models::resume::TemplateId;
use crate::render::html::Html;
use crate::render::view::ResumeView;

/// Id of the root element handed to the exporter.
pub const PREVIEW_ELEMENT_ID: &str = "resume-preview";

pub fn render_view(template: TemplateId, view: &ResumeView) -> String {
    let mut html = Html::new();
    html.open_with_id(
        "div",
        PREVIEW_ELEMENT_ID,
        &format!("resume resume-{template}"),
    );
    match template {
        TemplateId::Modern => modern::render(&mut html, view),
        TemplateId::Professional => professional::render(&mut html, view),
        TemplateId::Creative => creative::render(&mut html, view),
        TemplateId::Minimal => minimal::render(&mut html, view),
        TemplateId::Executive => executive::render(&mut html, view),
    }
    html.close("div");
    html.finish()
}

/// Picture if one was uploaded, otherwise nothing. The initial stands in when
/// the image cannot be shown.
fn avatar(html: &mut Html, view: &ResumeView, class: &str) {
    let Some(picture) = view.picture.as_deref() else {
        return;
    };
    html.open("div", class).image(picture, "Profile", "avatar-image");
    if let Some(initial) = view.initial {
        html.element("span", "avatar-fallback", &initial.to_string());
    }
    html.close("div");
}

/// Email, phone and address, each only when set.
fn contact_items<'a>(view: &'a ResumeView) -> impl Iterator<Item = (&'static str, &'a str)> {
    [
        ("email", view.email.as_deref()),
        ("phone", view.phone.as_deref()),
        ("address", view.address.as_deref()),
    ]
    .into_iter()
    .filter_map(|(kind, value)| value.map(|v| (kind, v)))
}

fn date_range(start: &str, end: &str, separator: &str) -> String {
    format!("{start} {separator} {end}")
}
