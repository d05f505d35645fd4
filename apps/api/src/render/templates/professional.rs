use super::{avatar, contact_items, date_range};
use crate::render::html::Html;
use crate::render::view::ResumeView;

const HEADING: &str = "section-title uppercase tracking-wider rule-below";

pub(super) fn render(html: &mut Html, view: &ResumeView) {
    html.open("header", "professional-header centered rule-below");
    avatar(html, view, "avatar avatar-md centered");
    html.element("h1", "name light", &view.name);
    html.open("div", "contact centered");
    for (kind, value) in contact_items(view) {
        html.element("span", &format!("contact-{kind}"), value);
    }
    html.close("div").close("header");

    if let Some(summary) = &view.summary {
        html.open("section", "summary");
        html.element("h2", HEADING, "Executive Summary");
        html.element("p", "summary-text justified", summary);
        html.close("section");
    }

    if !view.work.is_empty() {
        html.open("section", "work");
        html.element("h2", HEADING, "Professional Experience");
        for work in &view.work {
            html.open("article", "entry");
            html.open("div", "entry-head baseline");
            html.element("h3", "position", &work.position);
            html.element("span", "dates", &date_range(&work.start, &work.end, "-"));
            html.close("div");
            html.element("p", "company italic", &work.company);
            if let Some(description) = &work.description {
                html.element("p", "description justified", description);
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
            html.open("div", "entry-head baseline");
            html.element("h3", "degree", &edu.heading);
            html.element("span", "dates", &date_range(&edu.start, &edu.end, "-"));
            html.close("div");
            html.element("p", "institution italic", &edu.institution);
            html.close("article");
        }
        html.close("section");
    }

    if !view.skill_groups.is_empty() {
        html.open("section", "skills");
        html.element("h2", HEADING, "Core Competencies");
        html.open("div", "skill-columns");
        for group in &view.skill_groups {
            html.open("div", "skill-group");
            html.element("h3", "category uppercase", &group.category);
            for skill in &group.skills {
                html.open("div", "skill-row");
                html.element("span", "skill-name", &skill.name);
                html.element("span", "skill-level muted", skill.level.label());
                html.close("div");
            }
            html.close("div");
        }
        html.close("div").close("section");
    }
}
