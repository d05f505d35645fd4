//! Field-by-field and row-by-row mutations of a `ResumeDocument`.
//!
//! Commands are pure: they mutate the document handed to them and nothing
//! else. The session routes them through the autosave coordinator.

pub mod handlers;
pub mod picture;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::models::resume::{
    EducationEntry, ResumeDocument, SkillEntry, SkillLevel, TemplateId, WorkEntry,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResumeList {
    Education,
    Work,
    Skills,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum EditError {
    #[error("no {list:?} entry with id '{id}'")]
    UnknownEntry { list: ResumeList, id: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PersonalField {
    FullName,
    Email,
    Phone,
    Address,
    Summary,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EducationPatch {
    pub institution: Option<String>,
    pub degree: Option<String>,
    pub field_of_study: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkPatch {
    pub company: Option<String>,
    pub position: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub current: Option<bool>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillPatch {
    pub name: Option<String>,
    pub category: Option<String>,
    pub level: Option<SkillLevel>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum EditCommand {
    SetTitle { title: String },
    SetTemplate { template_id: TemplateId },
    SetPersonalField { field: PersonalField, value: String },
    ClearProfilePicture,
    AddEducation,
    UpdateEducation { id: String, patch: EducationPatch },
    RemoveEducation { id: String },
    AddWork,
    UpdateWork { id: String, patch: WorkPatch },
    RemoveWork { id: String },
    AddSkill,
    UpdateSkill { id: String, patch: SkillPatch },
    RemoveSkill { id: String },
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EditOutcome {
    /// Identifier of the row created by an `add_*` command.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub added_id: Option<String>,
}

impl EditCommand {
    pub fn apply(self, doc: &mut ResumeDocument) -> Result<EditOutcome, EditError> {
        match self {
            EditCommand::SetTitle { title } => doc.title = title,
            EditCommand::SetTemplate { template_id } => doc.template_id = template_id,
            EditCommand::SetPersonalField { field, value } => {
                let info = &mut doc.personal_info;
                let slot = match field {
                    PersonalField::FullName => &mut info.full_name,
                    PersonalField::Email => &mut info.email,
                    PersonalField::Phone => &mut info.phone,
                    PersonalField::Address => &mut info.address,
                    PersonalField::Summary => &mut info.summary,
                };
                *slot = value;
            }
            EditCommand::ClearProfilePicture => doc.personal_info.profile_picture = None,

            EditCommand::AddEducation => {
                let id = fresh_id(doc.education.iter().map(|e| e.id.as_str()));
                doc.education.push(EducationEntry {
                    id: id.clone(),
                    ..Default::default()
                });
                return Ok(added(id));
            }
            EditCommand::UpdateEducation { id, patch } => {
                let entry = find_mut(&mut doc.education, |e| e.id == id)
                    .ok_or_else(|| unknown(ResumeList::Education, &id))?;
                set(&mut entry.institution, patch.institution);
                set(&mut entry.degree, patch.degree);
                set(&mut entry.field_of_study, patch.field_of_study);
                set(&mut entry.start_date, patch.start_date);
                set(&mut entry.end_date, patch.end_date);
                if let Some(description) = patch.description {
                    entry.description = Some(description);
                }
            }
            EditCommand::RemoveEducation { id } => {
                remove_by_id(&mut doc.education, |e| e.id == id)
                    .ok_or_else(|| unknown(ResumeList::Education, &id))?;
            }

            EditCommand::AddWork => {
                let id = fresh_id(doc.work_experience.iter().map(|w| w.id.as_str()));
                doc.work_experience.push(WorkEntry {
                    id: id.clone(),
                    ..Default::default()
                });
                return Ok(added(id));
            }
            EditCommand::UpdateWork { id, patch } => {
                let entry = find_mut(&mut doc.work_experience, |w| w.id == id)
                    .ok_or_else(|| unknown(ResumeList::Work, &id))?;
                set(&mut entry.company, patch.company);
                set(&mut entry.position, patch.position);
                set(&mut entry.start_date, patch.start_date);
                // A stale end date is kept when `current` is switched on.
                set(&mut entry.end_date, patch.end_date);
                set(&mut entry.current, patch.current);
                set(&mut entry.description, patch.description);
            }
            EditCommand::RemoveWork { id } => {
                remove_by_id(&mut doc.work_experience, |w| w.id == id)
                    .ok_or_else(|| unknown(ResumeList::Work, &id))?;
            }

            EditCommand::AddSkill => {
                let id = fresh_id(doc.skills.iter().map(|s| s.id.as_str()));
                doc.skills.push(SkillEntry {
                    id: id.clone(),
                    level: SkillLevel::Intermediate,
                    ..Default::default()
                });
                return Ok(added(id));
            }
            EditCommand::UpdateSkill { id, patch } => {
                let entry = find_mut(&mut doc.skills, |s| s.id == id)
                    .ok_or_else(|| unknown(ResumeList::Skills, &id))?;
                set(&mut entry.name, patch.name);
                set(&mut entry.category, patch.category);
                set(&mut entry.level, patch.level);
            }
            EditCommand::RemoveSkill { id } => {
                remove_by_id(&mut doc.skills, |s| s.id == id)
                    .ok_or_else(|| unknown(ResumeList::Skills, &id))?;
            }
        }
        Ok(EditOutcome::default())
    }
}

/// A new row identifier not already used in the list.
fn fresh_id<'a>(existing: impl Iterator<Item = &'a str> + Clone) -> String {
    loop {
        let candidate = Uuid::new_v4().to_string();
        if !existing.clone().any(|id| id == candidate) {
            return candidate;
        }
    }
}

fn find_mut<T>(list: &mut [T], matches: impl Fn(&T) -> bool) -> Option<&mut T> {
    list.iter_mut().find(|item| matches(item))
}

/// Removes the single matching row; the rest keep their relative order.
fn remove_by_id<T>(list: &mut Vec<T>, matches: impl Fn(&T) -> bool) -> Option<T> {
    let index = list.iter().position(matches)?;
    Some(list.remove(index))
}

fn set<T>(slot: &mut T, value: Option<T>) {
    if let Some(value) = value {
        *slot = value;
    }
}

fn added(id: String) -> EditOutcome {
    EditOutcome { added_id: Some(id) }
}

fn unknown(list: ResumeList, id: &str) -> EditError {
    EditError::UnknownEntry {
        list,
        id: id.to_string(),
    }
}
