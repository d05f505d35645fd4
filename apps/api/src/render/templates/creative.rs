use super::{avatar, contact_items, date_range};
use crate::models::resume::SkillLevel;
use crate::render::html::Html;
use crate::render::view::ResumeView;

/// Sidebar layout: contact and skills on the left, story on the right.
pub(super) fn render(html: &mut Html, view: &ResumeView) {
    html.open("div", "creative-columns");

    html.open("aside", "sidebar gradient-purple");
    avatar(html, view, "avatar avatar-xl bordered-white");
    html.open("section", "contact");
    html.element("h3", "sidebar-title", "Contact");
    for (kind, value) in contact_items(view) {
        html.element("p", &format!("contact-{kind}"), value);
    }
    html.close("section");

    if !view.skill_groups.is_empty() {
        html.open("section", "skills");
        html.element("h3", "sidebar-title", "Skills");
        for group in &view.skill_groups {
            html.open("div", "skill-group");
            html.element("h4", "category", &group.category);
            for skill in &group.skills {
                html.open("div", "skill-row");
                html.element("span", "skill-name", &skill.name);
                html.element("span", "skill-level", skill.level.label());
                html.open("div", "level-track");
                html.bar("level-fill", level_percent(skill.level));
                html.close("div").close("div");
            }
            html.close("div");
        }
        html.close("section");
    }
    html.close("aside");

    html.open("main", "content");
    html.element("h1", "name gradient-text", &view.name);

    if let Some(summary) = &view.summary {
        html.open("section", "about");
        html.element("h2", "section-title text-purple", "About Me");
        html.element("p", "summary", summary);
        html.close("section");
    }

    if !view.work.is_empty() {
        html.open("section", "work");
        html.element("h2", "section-title text-purple", "Experience");
        for (index, work) in view.work.iter().enumerate() {
            html.open("article", "entry timeline");
            html.element("h3", "position", &work.position);
            html.element("p", "company text-pink", &work.company);
            html.element("span", "dates pill", &date_range(&work.start, &work.end, "-"));
            if let Some(description) = &work.description {
                html.element("p", "description", description);
            }
            html.close("article");
            if index + 1 < view.work.len() {
                html.open("hr", "divider");
            }
        }
        html.close("section");
    }

    if !view.education.is_empty() {
        html.open("section", "education");
        html.element("h2", "section-title text-purple", "Education");
        for edu in &view.education {
            html.open("article", "entry card-soft");
            html.element("h3", "degree", &edu.heading);
            html.element("p", "institution text-purple", &edu.institution);
            html.element("span", "dates", &date_range(&edu.start, &edu.end, "-"));
            html.close("article");
        }
        html.close("section");
    }

    html.close("main").close("div");
}

fn level_percent(level: SkillLevel) -> u8 {
    match level {
        SkillLevel::Expert => 100,
        SkillLevel::Advanced => 80,
        SkillLevel::Intermediate => 60,
        SkillLevel::Beginner => 40,
    }
}
