//! Form state engine.
//!
//! Every operation takes the current document by reference and returns the next
//! snapshot, or an `EditRejection` with the input untouched. Entry collections and
//! bullet lists never drop below one element; removals that would do so are rejected.

pub mod session;
pub mod skills;

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::models::resume::{EducationEntry, ExperienceEntry, ProjectEntry, ResumeDocument};

pub use session::FormSession;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditRejection {
    #[error("{what} index {index} is out of range (length {len})")]
    IndexOutOfRange {
        what: &'static str,
        index: usize,
        len: usize,
    },

    #[error("{what} must keep at least one item")]
    BelowMinimumCount { what: &'static str },

    #[error("unknown collection '{0}'")]
    UnknownCollection(String),

    #[error("unknown field '{field}' for {collection}")]
    UnknownField { collection: String, field: String },

    #[error("unknown skill category '{0}'")]
    UnknownCategory(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collection {
    Education,
    Experience,
    Projects,
}

impl Collection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Collection::Education => "education",
            Collection::Experience => "experience",
            Collection::Projects => "projects",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Collection {
    type Err = EditRejection;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "education" => Ok(Collection::Education),
            "experience" => Ok(Collection::Experience),
            "projects" | "project" => Ok(Collection::Projects),
            _ => Err(EditRejection::UnknownCollection(s.to_string())),
        }
    }
}

/// Top-level personal details.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarField {
    Name,
    Phone,
    Email,
    Linkedin,
    Github,
}

impl FromStr for ScalarField {
    type Err = EditRejection;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "name" => Ok(ScalarField::Name),
            "phone" => Ok(ScalarField::Phone),
            "email" => Ok(ScalarField::Email),
            "linkedin" => Ok(ScalarField::Linkedin),
            "github" => Ok(ScalarField::Github),
            _ => Err(EditRejection::UnknownField {
                collection: "personal info".to_string(),
                field: s.to_string(),
            }),
        }
    }
}

/// One structural edit, as issued by the editor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Edit {
    SetScalar {
        field: ScalarField,
        value: String,
    },
    AddEntry(Collection),
    RemoveEntry {
        collection: Collection,
        index: usize,
    },
    UpdateEntryField {
        collection: Collection,
        index: usize,
        field: String,
        value: String,
    },
    AddBullet {
        collection: Collection,
        index: usize,
    },
    RemoveBullet {
        collection: Collection,
        index: usize,
        bullet: usize,
    },
    UpdateBullet {
        collection: Collection,
        index: usize,
        bullet: usize,
        value: String,
    },
    AddSkillCategory,
    RemoveSkillCategory(String),
    RenameSkillCategory {
        from: String,
        to: String,
    },
    AddSkill(String),
    RemoveSkill {
        category: String,
        index: usize,
    },
    UpdateSkill {
        category: String,
        index: usize,
        value: String,
    },
}

/// Applies a single edit and returns the next snapshot.
pub fn apply(doc: &ResumeDocument, edit: &Edit) -> Result<ResumeDocument, EditRejection> {
    match edit {
        Edit::SetScalar { field, value } => Ok(set_scalar_field(doc, *field, value)),
        Edit::AddEntry(collection) => Ok(add_entry(doc, *collection)),
        Edit::RemoveEntry { collection, index } => remove_entry(doc, *collection, *index),
        Edit::UpdateEntryField {
            collection,
            index,
            field,
            value,
        } => update_entry_field(doc, *collection, *index, field, value),
        Edit::AddBullet { collection, index } => add_bullet(doc, *collection, *index),
        Edit::RemoveBullet {
            collection,
            index,
            bullet,
        } => remove_bullet(doc, *collection, *index, *bullet),
        Edit::UpdateBullet {
            collection,
            index,
            bullet,
            value,
        } => update_bullet(doc, *collection, *index, *bullet, value),
        Edit::AddSkillCategory => Ok(skills::add_skill_category(doc)),
        Edit::RemoveSkillCategory(name) => skills::remove_skill_category(doc, name),
        Edit::RenameSkillCategory { from, to } => skills::rename_skill_category(doc, from, to),
        Edit::AddSkill(category) => skills::add_skill(doc, category),
        Edit::RemoveSkill { category, index } => skills::remove_skill(doc, category, *index),
        Edit::UpdateSkill {
            category,
            index,
            value,
        } => skills::update_skill(doc, category, *index, value),
    }
}

pub fn set_scalar_field(doc: &ResumeDocument, field: ScalarField, value: &str) -> ResumeDocument {
    let mut next = doc.clone();
    let slot = match field {
        ScalarField::Name => &mut next.name,
        ScalarField::Phone => &mut next.phone,
        ScalarField::Email => &mut next.email,
        ScalarField::Linkedin => &mut next.linkedin,
        ScalarField::Github => &mut next.github,
    };
    *slot = value.to_string();
    next
}

pub fn add_entry(doc: &ResumeDocument, collection: Collection) -> ResumeDocument {
    let mut next = doc.clone();
    match collection {
        Collection::Education => next.education.push(EducationEntry::default()),
        Collection::Experience => next.experience.push(ExperienceEntry::default()),
        Collection::Projects => next.projects.push(ProjectEntry::default()),
    }
    next
}

pub fn remove_entry(
    doc: &ResumeDocument,
    collection: Collection,
    index: usize,
) -> Result<ResumeDocument, EditRejection> {
    let mut next = doc.clone();
    let what = collection.as_str();
    match collection {
        Collection::Education => remove_at(&mut next.education, index, what)?,
        Collection::Experience => remove_at(&mut next.experience, index, what)?,
        Collection::Projects => remove_at(&mut next.projects, index, what)?,
    }
    Ok(next)
}

pub fn update_entry_field(
    doc: &ResumeDocument,
    collection: Collection,
    index: usize,
    field: &str,
    value: &str,
) -> Result<ResumeDocument, EditRejection> {
    let mut next = doc.clone();
    let unknown = || EditRejection::UnknownField {
        collection: collection.to_string(),
        field: field.to_string(),
    };

    let slot = match collection {
        Collection::Education => {
            let entry = entry_mut(&mut next.education, index, "education")?;
            match field {
                "institution" => &mut entry.institution,
                "location" => &mut entry.location,
                "degree" => &mut entry.degree,
                "dates" => &mut entry.dates,
                _ => return Err(unknown()),
            }
        }
        Collection::Experience => {
            let entry = entry_mut(&mut next.experience, index, "experience")?;
            match field {
                "position" => &mut entry.position,
                "company" => &mut entry.company,
                "location" => &mut entry.location,
                "dates" => &mut entry.dates,
                _ => return Err(unknown()),
            }
        }
        Collection::Projects => {
            let entry = entry_mut(&mut next.projects, index, "projects")?;
            match field {
                "name" => &mut entry.name,
                "technologies" => &mut entry.technologies,
                "dates" => &mut entry.dates,
                _ => return Err(unknown()),
            }
        }
    };
    *slot = value.to_string();
    Ok(next)
}

pub fn add_bullet(
    doc: &ResumeDocument,
    collection: Collection,
    index: usize,
) -> Result<ResumeDocument, EditRejection> {
    let mut next = doc.clone();
    bullets_mut(&mut next, collection, index)?.push(String::new());
    Ok(next)
}

pub fn remove_bullet(
    doc: &ResumeDocument,
    collection: Collection,
    index: usize,
    bullet: usize,
) -> Result<ResumeDocument, EditRejection> {
    let mut next = doc.clone();
    remove_at(bullets_mut(&mut next, collection, index)?, bullet, "bullets")?;
    Ok(next)
}

pub fn update_bullet(
    doc: &ResumeDocument,
    collection: Collection,
    index: usize,
    bullet: usize,
    value: &str,
) -> Result<ResumeDocument, EditRejection> {
    let mut next = doc.clone();
    let bullets = bullets_mut(&mut next, collection, index)?;
    *entry_mut(bullets, bullet, "bullets")? = value.to_string();
    Ok(next)
}

fn check_index(what: &'static str, index: usize, len: usize) -> Result<(), EditRejection> {
    if index < len {
        Ok(())
    } else {
        Err(EditRejection::IndexOutOfRange { what, index, len })
    }
}

pub(crate) fn entry_mut<'a, T>(
    items: &'a mut [T],
    index: usize,
    what: &'static str,
) -> Result<&'a mut T, EditRejection> {
    check_index(what, index, items.len())?;
    Ok(&mut items[index])
}

/// Removes `items[index]`, refusing to leave the list empty.
fn remove_at<T>(items: &mut Vec<T>, index: usize, what: &'static str) -> Result<(), EditRejection> {
    check_index(what, index, items.len())?;
    if items.len() <= 1 {
        return Err(EditRejection::BelowMinimumCount { what });
    }
    items.remove(index);
    Ok(())
}

fn bullets_mut(
    doc: &mut ResumeDocument,
    collection: Collection,
    index: usize,
) -> Result<&mut Vec<String>, EditRejection> {
    match collection {
        // education entries carry no bullets
        Collection::Education => Err(EditRejection::UnknownCollection(format!(
            "{collection} (no bullets)"
        ))),
        Collection::Experience => {
            Ok(&mut entry_mut(&mut doc.experience, index, "experience")?.bullets)
        }
        Collection::Projects => Ok(&mut entry_mut(&mut doc.projects, index, "projects")?.bullets),
    }
}
