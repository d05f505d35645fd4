use super::{avatar, contact_items, date_range};
use crate::render::html::Html;
use crate::render::view::ResumeView;

const HEADING: &str = "section-title small uppercase tracking-widest";
const SEPARATOR: &str = "—";

pub(super) fn render(html: &mut Html, view: &ResumeView) {
    html.open("header", "minimal-header");
    avatar(html, view, "avatar avatar-sm");
    html.element("h1", "name extralight", &view.name);
    html.open("div", "contact stacked");
    for (kind, value) in contact_items(view) {
        html.element("p", &format!("contact-{kind}"), value);
    }
    html.close("div").close("header");

    // The summary stands alone, without a heading.
    if let Some(summary) = &view.summary {
        html.element("p", "summary light", summary);
    }

    if !view.work.is_empty() {
        html.open("section", "work");
        html.element("h2", HEADING, "Experience");
        for work in &view.work {
            html.open("article", "entry");
            html.element("h3", "position", &work.position);
            html.element("p", "company light", &work.company);
            html.element(
                "span",
                "dates muted",
                &date_range(&work.start, &work.end, SEPARATOR),
            );
            if let Some(description) = &work.description {
                html.element("p", "description light", description);
            }
            html.close("article");
        }
        html.close("section");
    }

    if !view.education.is_empty() {
        html.open("section", "education");
        html.element("h2", HEADING, "Education");
        for edu in &view.education {
            html.open("article", "entry");
            html.element("h3", "degree", &edu.heading);
            html.element("p", "institution light", &edu.institution);
            html.element(
                "span",
                "dates muted",
                &date_range(&edu.start, &edu.end, SEPARATOR),
            );
            html.close("article");
        }
        html.close("section");
    }

    if !view.skill_groups.is_empty() {
        html.open("section", "skills");
        html.element("h2", HEADING, "Skills");
        for group in &view.skill_groups {
            html.open("div", "skill-group");
            html.element("h3", "category", &group.category);
            html.open("ul", "inline");
            for skill in &group.skills {
                html.open("li", "");
                html.text(&skill.name);
                html.element("span", "skill-level muted", &format!("({})", skill.level.label()));
                html.close("li");
            }
            html.close("ul").close("div");
        }
        html.close("section");
    }
}
