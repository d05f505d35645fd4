//! Template-independent data transform: everything the five layouts share.

use chrono::{DateTime, NaiveDate};

use crate::models::resume::{ResumeDocument, SkillEntry, SkillLevel};

const NAME_PLACEHOLDER: &str = "Your Name";
const PRESENT: &str = "Present";

#[derive(Debug, Clone, PartialEq)]
pub struct ResumeView {
    pub name: String,
    /// First letter of the real name, for the avatar fallback.
    pub initial: Option<char>,
    pub picture: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub summary: Option<String>,
    pub work: Vec<WorkView>,
    pub education: Vec<EducationView>,
    pub skill_groups: Vec<SkillGroup>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WorkView {
    pub position: String,
    pub company: String,
    pub start: String,
    pub end: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EducationView {
    pub heading: String,
    pub institution: String,
    pub start: String,
    pub end: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SkillGroup {
    pub category: String,
    pub skills: Vec<SkillView>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SkillView {
    pub name: String,
    pub level: SkillLevel,
}

pub fn build_view(doc: &ResumeDocument) -> ResumeView {
    let info = &doc.personal_info;
    ResumeView {
        name: non_empty(&info.full_name).unwrap_or_else(|| NAME_PLACEHOLDER.to_string()),
        initial: info.full_name.trim().chars().next(),
        picture: info.profile_picture.as_deref().and_then(non_empty),
        email: non_empty(&info.email),
        phone: non_empty(&info.phone),
        address: non_empty(&info.address),
        summary: non_empty(&info.summary),
        work: doc
            .work_experience
            .iter()
            .map(|w| WorkView {
                position: w.position.clone(),
                company: w.company.clone(),
                start: format_date(&w.start_date),
                end: if w.current {
                    PRESENT.to_string()
                } else {
                    format_date(&w.end_date)
                },
                description: non_empty(&w.description),
            })
            .collect(),
        education: doc
            .education
            .iter()
            .map(|e| EducationView {
                heading: format!("{} in {}", e.degree, e.field_of_study),
                institution: e.institution.clone(),
                start: format_date(&e.start_date),
                end: format_date(&e.end_date),
                description: e.description.as_deref().and_then(non_empty),
            })
            .collect(),
        skill_groups: group_skills(&doc.skills),
    }
}

/// Groups skills by category. Categories appear in first-seen order and each
/// keeps its skills in insertion order.
pub fn group_skills(skills: &[SkillEntry]) -> Vec<SkillGroup> {
    let mut groups: Vec<SkillGroup> = Vec::new();
    for skill in skills {
        let view = SkillView {
            name: skill.name.clone(),
            level: skill.level,
        };
        match groups.iter_mut().find(|g| g.category == skill.category) {
            Some(group) => group.skills.push(view),
            None => groups.push(SkillGroup {
                category: skill.category.clone(),
                skills: vec![view],
            }),
        }
    }
    groups
}

/// Formats a stored date as "Mon YYYY". Empty or unparsable input gives "".
pub fn format_date(raw: &str) -> String {
    parse_date(raw.trim())
        .map(|d| d.format("%b %Y").to_string())
        .unwrap_or_default()
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
    if raw.is_empty() {
        return None;
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| NaiveDate::parse_from_str(&format!("{raw}-01"), "%Y-%m-%d").ok())
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.date_naive()))
}

fn non_empty(s: &str) -> Option<String> {
    let trimmed = s.trim();
    (!trimmed.is_empty()).then(|| s.to_string())
}
