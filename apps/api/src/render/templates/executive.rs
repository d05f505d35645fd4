use super::{avatar, contact_items, date_range};
use crate::render::html::Html;
use crate::render::view::ResumeView;

const HEADING: &str = "section-title text-red rule-below-thick";

pub(super) fn render(html: &mut Html, view: &ResumeView) {
    html.open("header", "executive-header banner-dark");
    avatar(html, view, "avatar avatar-lg bordered-gold");
    html.open("div", "");
    html.element("h1", "name serif", &view.name);
    html.open("div", "contact");
    for (kind, value) in contact_items(view) {
        html.element("span", &format!("contact-{kind}"), value);
    }
    html.close("div").close("div").close("header");

    if let Some(summary) = &view.summary {
        html.open("section", "summary");
        html.element("h2", "section-title text-red with-icon", "Executive Summary");
        html.element("p", "summary-text bordered-left", summary);
        html.close("section");
    }

    if !view.work.is_empty() {
        html.open("section", "work");
        html.element("h2", HEADING, "Executive Experience");
        for work in &view.work {
            html.open("article", "entry");
            html.open("div", "entry-head");
            html.element("h3", "position", &work.position);
            html.element("span", "dates badge", &date_range(&work.start, &work.end, "-"));
            html.close("div");
            html.element("p", "company text-red", &work.company);
            if let Some(description) = &work.description {
                html.element("p", "description", description);
            }
            html.close("article");
        }
        html.close("section");
    }

    if !view.education.is_empty() {
        html.open("section", "education");
        html.element("h2", HEADING, "Education & Credentials");
        for edu in &view.education {
            html.open("article", "entry");
            html.open("div", "entry-head");
            html.element("h3", "degree", &edu.heading);
            html.element("span", "dates", &date_range(&edu.start, &edu.end, "-"));
            html.close("div");
            html.element("p", "institution text-red", &edu.institution);
            html.close("article");
        }
        html.close("section");
    }

    if !view.skill_groups.is_empty() {
        html.open("section", "skills");
        html.element("h2", HEADING, "Executive Competencies");
        html.open("div", "skill-grid");
        for group in &view.skill_groups {
            html.open("div", "skill-card shaded");
            html.element("h3", "category text-red", &group.category);
            for skill in &group.skills {
                html.open("div", "skill-row");
                html.element("span", "skill-name", &skill.name);
                html.element("span", "skill-level badge", skill.level.label());
                html.close("div");
            }
            html.close("div");
        }
        html.close("div").close("section");
    }
}
